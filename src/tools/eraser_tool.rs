use crate::{
    grid::{grid_events::*, manager::BuildingGridManager},
    schedule::UpdateStage,
    tools::{building_tool::PlacementCommand, toolbar::ToolState},
    ui::egui::MouseOver,
};
use bevy::prelude::*;
use bevy_mod_raycast::prelude::*;
use if_chain::if_chain;

pub struct EraserToolPlugin;

impl Plugin for EraserToolPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EraserTool>()
            .add_systems(OnEnter(ToolState::Eraser), show_grid)
            .add_systems(OnExit(ToolState::Eraser), hide_grid)
            .add_systems(
                Update,
                (
                    (update_hovered_cell).in_set(UpdateStage::UpdateView),
                    (adjust_floor).in_set(UpdateStage::UserInput),
                    (handle_tool_action)
                        .in_set(UpdateStage::Placement)
                        .run_if(in_state(MouseOver::World)),
                )
                    .run_if(in_state(ToolState::Eraser)),
            );
    }
}

#[derive(Resource, Debug, Default)]
pub struct EraserTool {
    hovered: Option<IVec2>,
}

impl EraserTool {
    pub fn hovered(&self) -> Option<IVec2> {
        self.hovered
    }
}

/// Removes whatever building covers the hovered cell of the active floor.
pub fn erase_at(manager: &mut BuildingGridManager, position: IVec2) -> Option<OnBuildingRemoved> {
    let floor = manager.active_floor();
    let (id, building) = manager.building_at(position, floor)?;
    let removed = OnBuildingRemoved {
        id,
        origin: building.origin(),
        floor: building.floor(),
    };

    manager.remove_building(position, floor).then_some(removed)
}

fn show_grid(mut manager: ResMut<BuildingGridManager>) {
    manager.set_grid_visualization_enabled(true);
}

fn hide_grid(mut manager: ResMut<BuildingGridManager>, mut tool: ResMut<EraserTool>) {
    tool.hovered = None;
    manager.reset_cell_visual_states();
    manager.set_grid_visualization_enabled(false);
}

fn update_hovered_cell(
    cursor_ray: Res<CursorRay>,
    mut tool: ResMut<EraserTool>,
    mut manager: ResMut<BuildingGridManager>,
) {
    let floor = manager.active_floor();
    let height = manager.layout().floor_base_height(floor);

    let hovered = (**cursor_ray)
        .and_then(|ray| {
            ray.intersect_plane(Vec3::Y * height, InfinitePlane3d::new(Vec3::Y))
                .map(|distance| ray.get_point(distance))
        })
        .filter(|point| manager.layout().contains_world(*point))
        .map(|point| manager.world_to_grid(point).0);

    if hovered != tool.hovered {
        tool.hovered = hovered;
        match hovered {
            Some(position) => {
                manager.highlight_building_at(position, floor);
            }
            None => manager.reset_cell_visual_states(),
        }
    }
}

fn adjust_floor(keyboard: Res<ButtonInput<KeyCode>>, mut tool: ResMut<EraserTool>, mut commands: EventWriter<PlacementCommand>) {
    if keyboard.just_pressed(KeyCode::PageUp) {
        commands.send(PlacementCommand::FloorUp);
        tool.hovered = None;
    }
    if keyboard.just_pressed(KeyCode::PageDown) {
        commands.send(PlacementCommand::FloorDown);
        tool.hovered = None;
    }
}

fn handle_tool_action(
    mut tool: ResMut<EraserTool>,
    mut manager: ResMut<BuildingGridManager>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut removed: EventWriter<OnBuildingRemoved>,
) {
    if_chain! {
        if mouse.just_pressed(MouseButton::Left);
        if let Some(position) = tool.hovered;
        if let Some(event) = erase_at(&mut manager, position);
        then {
            log::info!("Removed building at {} on floor {}", event.origin, event.floor);
            removed.send(event);
            tool.hovered = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        building::asset::*,
        grid::{footprint::BuildingFootprint, layout::GridLayout},
    };
    use std::sync::Arc;

    #[test]
    fn test_erase_any_cell_of_building() {
        let mut manager = BuildingGridManager::new(GridLayout::new(4, 4, 1.0, 2, 4.0));
        let villa = Arc::new(BuildingAsset::new("Villa", BuildingType::Villa, BuildingFootprint::rectangle(2, 2)));
        let id = manager.place_building(&villa, Vec3::new(1.5, 0.0, 1.5), 0, Some(0)).unwrap();

        let event = erase_at(&mut manager, IVec2::new(2, 2)).unwrap();
        assert_eq!(event, OnBuildingRemoved { id, origin: IVec2::new(1, 1), floor: 0 });
        assert_eq!(manager.building_count(), 0);
        assert!(erase_at(&mut manager, IVec2::new(2, 2)).is_none());
    }

    #[test]
    fn test_erase_uses_active_floor() {
        let mut manager = BuildingGridManager::new(GridLayout::new(4, 4, 1.0, 2, 4.0));
        let room = Arc::new(BuildingAsset::new("Room", BuildingType::StandardRoom, BuildingFootprint::default()));
        manager.place_building(&room, Vec3::new(0.5, 0.0, 0.5), 0, Some(0));
        let upper = manager.place_building(&room, Vec3::new(0.5, 0.0, 0.5), 0, Some(1)).unwrap();

        manager.set_active_floor_level(1);
        assert_eq!(erase_at(&mut manager, IVec2::ZERO).map(|event| event.id), Some(upper));
        assert_eq!(manager.building_count(), 1);
        assert!(manager.cell(IVec2::ZERO, 0).unwrap().is_occupied());
    }
}
