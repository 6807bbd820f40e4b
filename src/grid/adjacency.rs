use crate::building::asset::*;
use bevy::prelude::*;

/// Evaluates adjacency requirements around `origin`. `neighbor_type` reports the type of the
/// building on an in-bounds occupied cell, and `None` for vacant or out-of-bounds cells.
pub fn requirements_met<F>(requirements: &[AdjacencyRequirement], origin: IVec2, neighbor_type: F) -> bool
where
    F: Fn(IVec2) -> Option<BuildingType>,
{
    requirements
        .iter()
        .filter(|requirement| requirement.building_type != BuildingType::None)
        .all(|requirement| {
            let found = requirement
                .direction
                .expand()
                .iter()
                .any(|direction| neighbor_type(origin + direction.offset()) == Some(requirement.building_type));

            found != requirement.negative
        })
}
