pub mod adjacency;
pub mod footprint;
pub mod grid;
pub mod grid_cell;
pub mod grid_events;
pub mod layout;
pub mod manager;
pub mod orientation;

use crate::settings::Settings;
use bevy::prelude::*;
use grid_events::*;
use layout::GridLayout;
use manager::BuildingGridManager;

pub struct GridPlugin;

impl Plugin for GridPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<OnBuildingPlaced>()
            .add_event::<OnBuildingRemoved>()
            .add_systems(PreStartup, spawn_grid_manager);
    }
}

fn spawn_grid_manager(mut commands: Commands, settings: Res<Settings>) {
    let layout = GridLayout::from_settings(&settings.grid);
    log::info!(
        "Initializing building grid {}x{} with {} floors ({} cells)",
        layout.size.x,
        layout.size.y,
        layout.max_floors,
        layout.cell_count()
    );
    commands.insert_resource(BuildingGridManager::new(layout));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GridSettings;

    #[test]
    fn test_plugin_sizes_grid_from_settings() {
        let mut app = App::new();
        app.insert_resource(Settings {
            grid: GridSettings {
                size_x: 7,
                size_y: 3,
                max_floors: 2,
                ..default()
            },
            ..default()
        })
        .add_plugins(GridPlugin);
        app.update();

        let manager = app.world().resource::<BuildingGridManager>();
        assert_eq!(manager.layout().size, IVec2::new(7, 3));
        assert_eq!(manager.cells().count(), 42);
        assert_eq!(manager.building_count(), 0);
    }
}
