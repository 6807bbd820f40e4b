use crate::building::building_object::BuildingId;
use bevy::prelude::*;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnBuildingPlaced(pub BuildingId);

/// Carries the removed building's anchor so visuals can be cleaned up after the table entry is gone.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnBuildingRemoved {
    pub id: BuildingId,
    pub origin: IVec2,
    pub floor: i32,
}
