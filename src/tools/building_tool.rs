use crate::{
    building::{asset::*, building_object::BuildingId},
    grid::{grid_events::*, manager::BuildingGridManager},
    schedule::UpdateStage,
    tools::{toolbar::ToolState, toolbar_events::ChangeToolRequest},
    ui::egui::MouseOver,
};
use bevy::prelude::*;
use bevy_mod_raycast::prelude::*;
use if_chain::if_chain;
use std::sync::Arc;

pub struct BuildingToolPlugin;

impl Plugin for BuildingToolPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BuildingTool>()
            .add_event::<PlacementCommand>()
            .add_systems(OnEnter(ToolState::Building), enter_with_default_asset)
            .add_systems(OnExit(ToolState::Building), exit_placement_mode)
            .add_systems(
                Update,
                (
                    (update_cursor_hit).in_set(UpdateStage::UpdateView),
                    (select_catalog_entry, handle_tool_keys).in_set(UpdateStage::UserInput),
                    (handle_tool_clicks)
                        .in_set(UpdateStage::UserInput)
                        .run_if(in_state(MouseOver::World)),
                )
                    .run_if(in_state(ToolState::Building)),
            )
            .add_systems(Update, apply_placement_commands.in_set(UpdateStage::Placement));
    }
}

/// Every way the player can drive placement mode.
#[derive(Event, Debug, Clone)]
pub enum PlacementCommand {
    Enter(Arc<BuildingAsset>),
    Exit,
    Rotate,
    Confirm,
    Cancel,
    FloorUp,
    FloorDown,
    CursorMoved(Option<Vec3>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementOutcome {
    Ignored,
    ModeEntered,
    ModeExited,
    Rotated(i32),
    FloorChanged(i32),
    PreviewUpdated { valid: bool },
    Placed(BuildingId),
    Rejected,
}

/// Transient state of placement mode. All grid mutation goes through the manager.
#[derive(Resource, Debug, Default)]
pub struct BuildingTool {
    asset: Option<Arc<BuildingAsset>>,
    active: bool,
    rotation: i32,
    floor: i32,
    cursor: Option<Vec3>,
}

impl BuildingTool {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn asset(&self) -> Option<&Arc<BuildingAsset>> {
        self.asset.as_ref()
    }

    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    pub fn floor(&self) -> i32 {
        self.floor
    }

    pub fn cursor(&self) -> Option<Vec3> {
        self.cursor
    }

    pub fn handle(&mut self, command: PlacementCommand, manager: &mut BuildingGridManager) -> PlacementOutcome {
        match command {
            PlacementCommand::Enter(asset) => {
                log::debug!("Entering placement mode with {}", asset.name);
                self.asset = Some(asset);
                self.active = true;
                self.rotation = 0;
                manager.set_grid_visualization_enabled(true);
                manager.set_active_floor_level(self.floor);
                self.refresh_preview(manager);
                PlacementOutcome::ModeEntered
            }
            PlacementCommand::Exit | PlacementCommand::Cancel => {
                let was_active = self.active;
                self.leave_mode(manager);
                if was_active {
                    PlacementOutcome::ModeExited
                } else {
                    PlacementOutcome::Ignored
                }
            }
            PlacementCommand::Rotate => {
                if !self.active {
                    return PlacementOutcome::Ignored;
                }
                self.rotation = (self.rotation + 1) % 4;
                self.refresh_preview(manager);
                PlacementOutcome::Rotated(self.rotation)
            }
            PlacementCommand::FloorUp => {
                self.floor = (self.floor + 1).min(manager.max_floors() - 1).max(0);
                self.change_floor(manager)
            }
            PlacementCommand::FloorDown => {
                if self.floor <= 0 {
                    return PlacementOutcome::Ignored;
                }
                self.floor = (self.floor - 1).max(0);
                self.change_floor(manager)
            }
            PlacementCommand::CursorMoved(hit) => {
                self.cursor = hit;
                match self.refresh_preview(manager) {
                    Some(valid) => PlacementOutcome::PreviewUpdated { valid },
                    None => PlacementOutcome::Ignored,
                }
            }
            PlacementCommand::Confirm => self.confirm(manager),
        }
    }

    fn confirm(&mut self, manager: &mut BuildingGridManager) -> PlacementOutcome {
        if_chain! {
            if self.active;
            if let Some(asset) = self.asset.clone();
            if let Some(location) = self.cursor;
            then {
                match manager.place_building(&asset, location, self.rotation, Some(self.floor)) {
                    Some(id) => {
                        log::info!("Placed {} on floor {}", asset.name, self.floor);
                        self.leave_mode(manager);
                        PlacementOutcome::Placed(id)
                    }
                    None => {
                        log::warn!("Cannot place building at this location");
                        PlacementOutcome::Rejected
                    }
                }
            } else {
                PlacementOutcome::Ignored
            }
        }
    }

    /// Restores the grid state of an active mode.
    pub fn resume(&self, manager: &mut BuildingGridManager) {
        if !self.active {
            return;
        }
        manager.set_grid_visualization_enabled(true);
        manager.set_active_floor_level(self.floor);
        self.refresh_preview(manager);
    }

    fn change_floor(&mut self, manager: &mut BuildingGridManager) -> PlacementOutcome {
        manager.set_active_floor_level(self.floor);
        self.refresh_preview(manager);
        PlacementOutcome::FloorChanged(self.floor)
    }

    fn leave_mode(&mut self, manager: &mut BuildingGridManager) {
        self.active = false;
        self.asset = None;
        manager.reset_cell_visual_states();
        manager.set_grid_visualization_enabled(false);
    }

    /// Redraws the preview when in mode with an asset and a cursor hit.
    fn refresh_preview(&self, manager: &mut BuildingGridManager) -> Option<bool> {
        if_chain! {
            if self.active;
            if let Some(asset) = &self.asset;
            if let Some(location) = self.cursor;
            then {
                Some(manager.update_placement_preview(Some(asset.as_ref()), location, self.rotation, Some(self.floor)))
            } else {
                None
            }
        }
    }
}

/// A palette pick from another tool arrives already active; the old tool's exit may have cleared the grid.
fn enter_with_default_asset(
    tool: Res<BuildingTool>,
    catalog: Res<BuildingCatalog>,
    mut manager: ResMut<BuildingGridManager>,
    mut commands: EventWriter<PlacementCommand>,
) {
    if tool.is_active() {
        tool.resume(&mut manager);
        return;
    }
    if let Some(asset) = catalog.get(0) {
        commands.send(PlacementCommand::Enter(asset.clone()));
    }
}

fn exit_placement_mode(mut commands: EventWriter<PlacementCommand>) {
    commands.send(PlacementCommand::Exit);
}

fn update_cursor_hit(
    cursor_ray: Res<CursorRay>,
    tool: Res<BuildingTool>,
    manager: Res<BuildingGridManager>,
    mut commands: EventWriter<PlacementCommand>,
) {
    let height = manager.layout().floor_base_height(tool.floor());
    let hit = (**cursor_ray).and_then(|ray| {
        ray.intersect_plane(Vec3::Y * height, InfinitePlane3d::new(Vec3::Y))
            .map(|distance| ray.get_point(distance))
            .filter(|point| manager.layout().contains_world(*point))
    });

    let same_cell = match (hit, tool.cursor()) {
        (Some(hit), Some(previous)) => manager.world_to_grid(hit) == manager.world_to_grid(previous),
        (None, None) => true,
        _ => false,
    };

    if !same_cell {
        commands.send(PlacementCommand::CursorMoved(hit));
    }
}

const CATALOG_KEYS: [KeyCode; 10] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
    KeyCode::Digit0,
];

fn select_catalog_entry(
    keyboard: Res<ButtonInput<KeyCode>>,
    catalog: Res<BuildingCatalog>,
    mut commands: EventWriter<PlacementCommand>,
) {
    for (index, key) in CATALOG_KEYS.iter().enumerate() {
        if keyboard.just_pressed(*key) {
            if let Some(asset) = catalog.get(index) {
                commands.send(PlacementCommand::Enter(asset.clone()));
            }
        }
    }
}

fn handle_tool_keys(keyboard: Res<ButtonInput<KeyCode>>, mut commands: EventWriter<PlacementCommand>) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        commands.send(PlacementCommand::Rotate);
    }
    if keyboard.just_pressed(KeyCode::PageUp) {
        commands.send(PlacementCommand::FloorUp);
    }
    if keyboard.just_pressed(KeyCode::PageDown) {
        commands.send(PlacementCommand::FloorDown);
    }
    if keyboard.just_pressed(KeyCode::Escape) {
        commands.send(PlacementCommand::Cancel);
    }
}

fn handle_tool_clicks(mouse: Res<ButtonInput<MouseButton>>, mut commands: EventWriter<PlacementCommand>) {
    if mouse.just_pressed(MouseButton::Left) {
        commands.send(PlacementCommand::Confirm);
    } else if mouse.just_pressed(MouseButton::Right) {
        commands.send(PlacementCommand::Cancel);
    }
}

pub fn apply_placement_commands(
    mut commands: EventReader<PlacementCommand>,
    mut tool: ResMut<BuildingTool>,
    mut manager: ResMut<BuildingGridManager>,
    state: Option<Res<State<ToolState>>>,
    mut placed: EventWriter<OnBuildingPlaced>,
    mut change_tool: EventWriter<ChangeToolRequest>,
) {
    let in_building_state = state.is_some_and(|state| *state.get() == ToolState::Building);

    for command in commands.read() {
        match tool.handle(command.clone(), &mut manager) {
            PlacementOutcome::Placed(id) => {
                placed.send(OnBuildingPlaced(id));
                change_tool.send(ChangeToolRequest(ToolState::View));
            }
            PlacementOutcome::ModeExited if in_building_state => {
                change_tool.send(ChangeToolRequest(ToolState::View));
            }
            PlacementOutcome::ModeEntered if !in_building_state => {
                change_tool.send(ChangeToolRequest(ToolState::Building));
            }
            _ => {}
        }
    }
}
