use crate::building::building_object::BuildingId;
use bevy::prelude::*;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum CellVisualState {
    #[default]
    Normal,
    Valid,
    Invalid,
    Selected,
    Highlighted,
}

impl CellVisualState {
    pub const ALL: [CellVisualState; 5] = [
        CellVisualState::Normal,
        CellVisualState::Valid,
        CellVisualState::Invalid,
        CellVisualState::Selected,
        CellVisualState::Highlighted,
    ];

    pub fn index(&self) -> usize {
        match *self {
            CellVisualState::Normal => 0,
            CellVisualState::Valid => 1,
            CellVisualState::Invalid => 2,
            CellVisualState::Selected => 3,
            CellVisualState::Highlighted => 4,
        }
    }
}

/// One addressable cell on one floor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridCell {
    pub position: IVec2,
    pub floor: i32,
    pub walkable: bool,
    /// Anchor cell of the building occupying this cell, or the cell itself when vacant.
    pub object_origin: IVec2,
    occupant: Option<BuildingId>,
    pub path_cost: f32,
    pub visual_state: CellVisualState,
    pub has_water: bool,
    pub has_electricity: bool,
}

impl Default for GridCell {
    fn default() -> Self {
        GridCell::new(IVec2::ZERO, 0)
    }
}

impl GridCell {
    pub fn new(position: IVec2, floor: i32) -> Self {
        // Ground floor comes with utilities hooked up.
        let utilities = floor == 0;
        Self {
            position,
            floor,
            walkable: true,
            object_origin: position,
            occupant: None,
            path_cost: 1.0,
            visual_state: CellVisualState::Normal,
            has_water: utilities,
            has_electricity: utilities,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn occupant(&self) -> Option<BuildingId> {
        self.occupant
    }

    pub fn occupy(&mut self, building: BuildingId, origin: IVec2) {
        self.occupant = Some(building);
        self.object_origin = origin;
    }

    pub fn vacate(&mut self) {
        self.occupant = None;
        self.object_origin = self.position;
    }
}
