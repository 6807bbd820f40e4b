use bevy::prelude::*;
use bevy_egui::egui::{epaint, Align2};
use bevy_egui::{egui, EguiContexts, EguiPlugin};

use crate::{
    building::{asset::BuildingCatalog, day_cycle::DayClock},
    grid::{manager::BuildingGridManager, orientation::quarters_to_degrees},
    schedule::UpdateStage,
    tools::{building_tool::*, toolbar::ToolState, toolbar_events::ChangeToolRequest},
};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin).init_state::<MouseOver>().add_systems(Startup, ui_theme_selection).add_systems(
            Update,
            (
                update_ui_state.in_set(UpdateStage::UpdateView),
                (update_toolbar_window, update_palette_window, update_status_window).in_set(UpdateStage::UserInput),
            ),
        );
    }
}

#[derive(States, Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MouseOver {
    #[default]
    Ui,
    World,
}

fn update_ui_state(mut contexts: EguiContexts, mut next_state: ResMut<NextState<MouseOver>>) {
    if let Some(ctx) = contexts.try_ctx_mut() {
        next_state.set(match ctx.is_pointer_over_area() {
            true => MouseOver::Ui,
            false => MouseOver::World,
        });
    };
}

fn ui_theme_selection(mut contexts: EguiContexts) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };

    catppuccin_egui::set_theme(ctx, catppuccin_egui::MACCHIATO);

    let old = ctx.style().visuals.clone();
    ctx.set_visuals(egui::Visuals {
        window_shadow: epaint::Shadow {
            offset: [0.0, 0.0].into(),
            blur: 0.0,
            spread: 0.0,
            color: catppuccin_egui::MACCHIATO.base,
        },
        window_rounding: 0.0.into(),
        ..old
    });
}

pub fn update_toolbar_window(
    mut contexts: EguiContexts,
    mut change_tool: EventWriter<ChangeToolRequest>,
    state: Res<State<ToolState>>,
) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };

    egui::Window::new("Tools")
        .resizable(false)
        .collapsible(true)
        .default_open(false)
        .anchor(Align2::LEFT_BOTTOM, (0.0, 0.0))
        .constrain(true)
        .movable(false)
        .show(ctx, |ui| {
            let tool_button_size = egui::Vec2::new(100.0, 10.0);

            for (key, tool) in [("`", ToolState::View), ("1", ToolState::Building), ("2", ToolState::Eraser)] {
                let text = format!("[ {} ] {}", key, tool.label());
                let button = egui::Button::new(text).min_size(tool_button_size).selected(*state.get() == tool);
                if ui.add(button).clicked() {
                    change_tool.send(ChangeToolRequest(tool));
                }
            }
            ui.add_space(20.0);
            ui.label("[1-0]: Pick Building (while building)");
            ui.label("[R]: Rotate Building");
            ui.label("[PgUp/PgDn]: Change Floor");
            ui.label("[Esc / Right Mouse]: Cancel");
            ui.label("[Left Mouse]: Use tool");
            ui.add_space(20.0);
            ui.label("[Middle Mouse]: Rotate");
            ui.label("[Scroll Wheel]: Zoom");
            ui.label("[Q/E]: Rotate");
            ui.label("[WASD]: Pan");
            ui.add_space(20.0);
            ui.label("[G]: Toggle Ground Grid");
            ui.label("[K/M]: Adjust Sunlight");
        });
}

pub fn update_palette_window(
    mut contexts: EguiContexts,
    catalog: Option<Res<BuildingCatalog>>,
    tool: Res<BuildingTool>,
    mut commands: EventWriter<PlacementCommand>,
) {
    let (Some(ctx), Some(catalog)) = (contexts.try_ctx_mut(), catalog) else {
        return;
    };

    egui::Window::new("Buildings")
        .resizable(false)
        .collapsible(true)
        .anchor(Align2::LEFT_TOP, (0.0, 0.0))
        .constrain(true)
        .movable(false)
        .show(ctx, |ui| {
            for asset in catalog.iter() {
                let footprint = asset.footprint.size;
                let text = format!("{} ({}x{})", asset.name, footprint.x, footprint.y);
                let selected = tool.asset().is_some_and(|current| current.name == asset.name);
                let button = egui::Button::new(text).min_size(egui::Vec2::new(160.0, 10.0)).selected(selected);

                if ui.add(button).on_hover_text(asset.description.as_str()).clicked() {
                    commands.send(PlacementCommand::Enter(asset.clone()));
                }
            }
        });
}

pub fn update_status_window(
    mut contexts: EguiContexts,
    state: Res<State<ToolState>>,
    tool: Res<BuildingTool>,
    manager: Option<Res<BuildingGridManager>>,
    clock: Option<Res<DayClock>>,
) {
    let (Some(ctx), Some(manager)) = (contexts.try_ctx_mut(), manager) else {
        return;
    };

    let operational = manager.buildings().filter(|(_, building)| building.is_operational()).count();

    egui::Window::new("Status")
        .resizable(false)
        .collapsible(true)
        .default_open(false)
        .anchor(Align2::RIGHT_BOTTOM, (0.0, 0.0))
        .constrain(true)
        .movable(false)
        .show(ctx, |ui| {
            ui.label(format!("Tool: {}", state.get().label()));
            match tool.asset().filter(|_| tool.is_active()) {
                Some(asset) => ui.label(format!("Placing: {}", asset.name)),
                None => ui.label("Placing: -"),
            };
            ui.label(format!("Rotation: {}°", quarters_to_degrees(tool.rotation())));
            ui.label(format!("Floor: {} / {}", manager.active_floor() + 1, manager.max_floors()));
            ui.add_space(10.0);
            ui.label(format!("Buildings: {}", manager.building_count()));
            ui.label(format!("Operational: {}", operational));
            if let Some(clock) = clock {
                ui.label(format!("Day: {}", clock.day()));
            }
        });
}
