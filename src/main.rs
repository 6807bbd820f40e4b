mod building;
mod graphics;
mod grid;
mod schedule;
mod settings;
mod tools;
mod ui;

use bevy::prelude::*;
use bevy_mod_raycast::prelude::CursorRayPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Serene Springs".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(CursorRayPlugin)
        .add_plugins(schedule::SchedulePlugin)
        .add_plugins(settings::SettingsPlugin)
        .add_plugins(grid::GridPlugin)
        .add_plugins(building::BuildingPlugin)
        .add_plugins(tools::toolbar::ToolbarPlugin)
        .add_plugins(graphics::camera::CameraPlugin)
        .add_plugins(graphics::grid_visuals::GridVisualsPlugin)
        .add_plugins(graphics::building_models::BuildingModelPlugin)
        .add_plugins(ui::egui::UiPlugin)
        .run();
}
