pub mod asset;
pub mod building_object;
pub mod day_cycle;

use asset::load_building_catalog;
use bevy::prelude::*;
use day_cycle::DayCyclePlugin;

pub struct BuildingPlugin;

impl Plugin for BuildingPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(DayCyclePlugin).add_systems(PreStartup, load_building_catalog);
    }
}
