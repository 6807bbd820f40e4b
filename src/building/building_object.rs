use crate::{building::asset::*, grid::footprint::*};
use bevy::{prelude::*, utils::HashSet};
use std::sync::Arc;

static UNIT_FOOTPRINT: BuildingFootprint = BuildingFootprint {
    size: IVec2::ONE,
    cells: Vec::new(),
};

/// Handle into the grid manager's building table. Never reused for the lifetime of a grid.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct BuildingId(pub u32);

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum BuildingState {
    #[default]
    Construction = 0,
    Operational = 1,
}

/// A building placed on the grid along with its staff and guest bookkeeping.
#[derive(Debug, Clone)]
pub struct BuildingObject {
    asset: Option<Arc<BuildingAsset>>,
    building_type: BuildingType,
    origin: IVec2,
    floor: i32,
    rotation: i32,
    state: BuildingState,
    efficiency: f32,
    staff: HashSet<Entity>,
    guests: HashSet<Entity>,
}

impl Default for BuildingObject {
    fn default() -> Self {
        Self {
            asset: None,
            building_type: BuildingType::None,
            origin: IVec2::ZERO,
            floor: 0,
            rotation: 0,
            state: BuildingState::Construction,
            efficiency: 100.0,
            staff: HashSet::new(),
            guests: HashSet::new(),
        }
    }
}

impl BuildingObject {
    pub fn from_asset(asset: Arc<BuildingAsset>) -> Self {
        let mut building = BuildingObject::default();
        building.initialize_from_asset(asset);
        building
    }

    pub fn initialize_from_asset(&mut self, asset: Arc<BuildingAsset>) {
        self.building_type = asset.building_type;
        self.asset = Some(asset);
        self.state = BuildingState::Construction;
        self.efficiency = 100.0;
        self.staff.clear();
        self.guests.clear();
    }

    pub fn asset(&self) -> Option<&Arc<BuildingAsset>> {
        self.asset.as_ref()
    }

    pub fn building_type(&self) -> BuildingType {
        self.building_type
    }

    pub fn footprint(&self) -> &BuildingFootprint {
        self.asset.as_ref().map_or(&UNIT_FOOTPRINT, |asset| &asset.footprint)
    }

    pub fn set_grid_properties(&mut self, origin: IVec2, floor: i32, rotation: i32) {
        self.origin = origin;
        self.floor = floor;
        self.rotation = rotation;
    }

    pub fn origin(&self) -> IVec2 {
        self.origin
    }

    pub fn floor(&self) -> i32 {
        self.floor
    }

    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    pub fn occupied_cells(&self) -> Vec<IVec2> {
        self.footprint().occupied_cells(self.origin, self.rotation)
    }

    pub fn state(&self) -> BuildingState {
        self.state
    }

    pub fn efficiency(&self) -> f32 {
        self.efficiency
    }

    pub fn staff_count(&self) -> usize {
        self.staff.len()
    }

    pub fn guest_count(&self) -> usize {
        self.guests.len()
    }

    pub fn assign_staff(&mut self, member: Entity) -> bool {
        if self.staff.insert(member) {
            self.update_efficiency();
        }
        true
    }

    pub fn remove_staff(&mut self, member: Entity) -> bool {
        if self.staff.remove(&member) {
            self.update_efficiency();
            true
        } else {
            false
        }
    }

    pub fn max_guests(&self) -> u32 {
        self.asset.as_ref().map_or(1, |asset| asset.max_guests)
    }

    pub fn has_available_capacity(&self) -> bool {
        (self.guests.len() as u32) < self.max_guests()
    }

    pub fn register_guest(&mut self, guest: Entity) -> bool {
        if self.guests.contains(&guest) {
            return true;
        }
        if !self.has_available_capacity() {
            return false;
        }
        self.guests.insert(guest)
    }

    pub fn remove_guest(&mut self, guest: Entity) -> bool {
        self.guests.remove(&guest)
    }

    pub fn supports_treatment(&self, treatment: &str) -> bool {
        self.asset
            .as_ref()
            .is_some_and(|asset| asset.supported_treatments.iter().any(|t| t == treatment))
    }

    /// Staff are counted as a whole against every required role, regardless of their role.
    pub fn is_operational(&self) -> bool {
        if self.state != BuildingState::Operational {
            return false;
        }

        let assigned = self.staff.len() as u32;
        self.asset
            .as_ref()
            .map_or(true, |asset| asset.required_staff.values().all(|&required| assigned >= required))
    }

    pub fn calculate_maintenance_cost(&self) -> i32 {
        self.asset.as_ref().map_or(0, |asset| asset.maintenance_cost)
    }

    /// Returns true when this update finished construction.
    pub fn on_daily_update(&mut self) -> bool {
        let opened = self.state == BuildingState::Construction;
        if opened {
            self.state = BuildingState::Operational;
        }
        self.update_efficiency();
        opened
    }

    fn update_efficiency(&mut self) {
        let Some(asset) = &self.asset else {
            self.efficiency = 100.0;
            return;
        };

        let assigned = self.staff.len() as f32;
        let ratio = asset
            .required_staff
            .values()
            .map(|&required| if required == 0 { 1.0 } else { (assigned / required as f32).min(1.0) })
            .fold(1.0f32, f32::min);

        self.efficiency = ratio * 100.0;
    }
}
