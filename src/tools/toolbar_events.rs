use crate::tools::toolbar::ToolState;
use bevy::prelude::*;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeToolRequest(pub ToolState);
