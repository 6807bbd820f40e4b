use crate::{
    schedule::UpdateStage,
    tools::{building_tool::BuildingToolPlugin, eraser_tool::EraserToolPlugin, toolbar_events::*},
};
use bevy::prelude::*;

#[derive(States, Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ToolState {
    Building,
    Eraser,
    #[default]
    View,
}

impl ToolState {
    pub fn label(&self) -> &'static str {
        match *self {
            ToolState::Building => "Building",
            ToolState::Eraser => "Bulldozer",
            ToolState::View => "View",
        }
    }
}

pub struct ToolbarPlugin;

impl Plugin for ToolbarPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<ToolState>()
            .add_event::<ChangeToolRequest>()
            .add_plugins((BuildingToolPlugin, EraserToolPlugin))
            .add_systems(
                Update,
                (
                    change_tool_on_keypress.in_set(UpdateStage::UserInput),
                    handle_change_tool_requests.after(UpdateStage::Placement),
                ),
            );
    }
}

/// Digits pick catalog entries while placing, so they only switch tools elsewhere.
pub fn change_tool_on_keypress(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    state: Res<State<ToolState>>,
    mut change_tool: EventWriter<ChangeToolRequest>,
) {
    if keyboard_input.just_pressed(KeyCode::Backquote) {
        change_tool.send(ChangeToolRequest(ToolState::View));
        return;
    }

    if *state.get() == ToolState::Building {
        return;
    }

    if keyboard_input.just_pressed(KeyCode::Digit1) {
        change_tool.send(ChangeToolRequest(ToolState::Building));
    } else if keyboard_input.just_pressed(KeyCode::Digit2) {
        change_tool.send(ChangeToolRequest(ToolState::Eraser));
    }
}

pub fn handle_change_tool_requests(
    mut event: EventReader<ChangeToolRequest>,
    state: Res<State<ToolState>>,
    mut next_state: ResMut<NextState<ToolState>>,
) {
    for &ChangeToolRequest(mode) in event.read() {
        if *state.get() != mode {
            log::debug!("Switching tool from {:?} to {:?}", state.get(), mode);
            next_state.set(mode);
        }
    }
}
