use crate::{
    building::{asset::*, building_object::*},
    grid::{adjacency::*, grid::*, grid_cell::*, layout::*},
};
use bevy::{prelude::*, utils::HashMap};
use std::sync::Arc;

/// Sole owner and mutator of the grid store and the table of placed buildings.
#[derive(Resource, Debug)]
pub struct BuildingGridManager {
    grid: Grid,
    buildings: HashMap<BuildingId, BuildingObject>,
    next_id: u32,
    active_floor: i32,
    visualization_enabled: bool,
    revision: u64,
}

impl BuildingGridManager {
    pub fn new(layout: GridLayout) -> Self {
        Self {
            grid: Grid::new(layout),
            buildings: HashMap::new(),
            next_id: 0,
            active_floor: 0,
            visualization_enabled: false,
            revision: 0,
        }
    }

    /// Rebuilds the store from scratch, dropping every placed building.
    pub fn initialize_grid(&mut self, size_x: i32, size_y: i32, cell_size: f32, max_floors: i32) {
        let current = *self.grid.layout();
        let layout = GridLayout {
            origin: current.origin,
            ..GridLayout::new(size_x, size_y, cell_size, max_floors, current.floor_height)
        };

        self.grid = Grid::new(layout);
        self.buildings.clear();
        self.active_floor = layout.clamp_floor(self.active_floor);
        self.refresh_visuals();
    }

    pub fn layout(&self) -> &GridLayout {
        self.grid.layout()
    }

    pub fn max_floors(&self) -> i32 {
        self.layout().max_floors
    }

    pub fn active_floor(&self) -> i32 {
        self.active_floor
    }

    pub fn visualization_enabled(&self) -> bool {
        self.visualization_enabled
    }

    /// Bumped every time the visible projection of the grid may have changed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn world_to_grid(&self, world: Vec3) -> (IVec2, i32) {
        self.layout().world_to_grid(world)
    }

    pub fn grid_to_world(&self, position: IVec2, floor: i32) -> Vec3 {
        self.layout().grid_to_world(position, floor)
    }

    pub fn is_valid_grid_position(&self, position: IVec2, floor: i32) -> bool {
        self.layout().is_valid(position, floor)
    }

    pub fn cell(&self, position: IVec2, floor: i32) -> Result<&GridCell, GridBoundsError> {
        self.grid.cell(position, floor)
    }

    /// Copy of the cell, or a default cell when the position is out of bounds.
    pub fn cell_data(&self, position: IVec2, floor: i32) -> GridCell {
        self.grid.cell(position, floor).copied().unwrap_or_default()
    }

    pub fn floor_cells(&self, floor: i32) -> impl Iterator<Item = &GridCell> {
        self.grid.floor_cells(floor)
    }

    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.grid.cells()
    }

    pub fn building(&self, id: BuildingId) -> Option<&BuildingObject> {
        self.buildings.get(&id)
    }

    pub fn building_mut(&mut self, id: BuildingId) -> Option<&mut BuildingObject> {
        self.buildings.get_mut(&id)
    }

    pub fn building_at(&self, position: IVec2, floor: i32) -> Option<(BuildingId, &BuildingObject)> {
        let id = self.grid.cell(position, floor).ok()?.occupant()?;
        self.buildings.get(&id).map(|building| (id, building))
    }

    pub fn buildings(&self) -> impl Iterator<Item = (BuildingId, &BuildingObject)> {
        self.buildings.iter().map(|(&id, building)| (id, building))
    }

    pub fn building_count(&self) -> usize {
        self.buildings.len()
    }

    /// Grid origin and floor targeted by a world location. A missing or negative floor is
    /// taken from the location's height.
    pub fn resolve_target(&self, world_location: Vec3, floor: Option<i32>) -> (IVec2, i32) {
        let (origin, detected) = self.world_to_grid(world_location);
        match floor {
            Some(floor) if floor >= 0 => (origin, floor),
            _ => (origin, detected),
        }
    }

    pub fn can_place_building(
        &self,
        asset: &BuildingAsset,
        world_location: Vec3,
        rotation: i32,
        floor: Option<i32>,
    ) -> bool {
        let (origin, floor) = self.resolve_target(world_location, floor);
        self.are_cells_available(asset, origin, rotation, floor)
            && requirements_met(&asset.adjacency, origin, |cell| self.building_type_at(cell, floor))
    }

    pub fn place_building(
        &mut self,
        asset: &Arc<BuildingAsset>,
        world_location: Vec3,
        rotation: i32,
        floor: Option<i32>,
    ) -> Option<BuildingId> {
        if !self.can_place_building(asset, world_location, rotation, floor) {
            return None;
        }

        let (origin, floor) = self.resolve_target(world_location, floor);
        let id = BuildingId(self.next_id);
        self.next_id += 1;

        let mut building = BuildingObject::from_asset(asset.clone());
        building.set_grid_properties(origin, floor, rotation);

        for position in building.occupied_cells() {
            if let Ok(cell) = self.grid.cell_mut(position, floor) {
                cell.occupy(id, origin);
            }
        }

        log::debug!("Placed {} as {:?} at {} on floor {}", asset.name, id, origin, floor);
        self.buildings.insert(id, building);
        self.refresh_visuals();
        Some(id)
    }

    pub fn remove_building(&mut self, position: IVec2, floor: i32) -> bool {
        let Some(id) = self.grid.cell(position, floor).ok().and_then(|cell| cell.occupant()) else {
            return false;
        };
        let Some(building) = self.buildings.remove(&id) else {
            return false;
        };

        for cell_position in building.occupied_cells() {
            if let Ok(cell) = self.grid.cell_mut(cell_position, building.floor()) {
                if cell.occupant() == Some(id) {
                    cell.vacate();
                }
            }
        }

        log::debug!("Removed {:?} from {} on floor {}", id, building.origin(), building.floor());
        self.refresh_visuals();
        true
    }

    /// Marks the cells a candidate building would cover as valid or invalid. Occupancy is
    /// never touched. Returns whether the placement is currently valid.
    pub fn update_placement_preview(
        &mut self,
        asset: Option<&BuildingAsset>,
        world_location: Vec3,
        rotation: i32,
        floor: Option<i32>,
    ) -> bool {
        self.reset_cell_visual_states();

        let Some(asset) = asset else {
            return false;
        };

        let (origin, floor) = self.resolve_target(world_location, floor);
        let valid = self.can_place_building(asset, world_location, rotation, Some(floor));
        let state = if valid {
            CellVisualState::Valid
        } else {
            CellVisualState::Invalid
        };

        for position in asset.footprint.occupied_cells(origin, rotation) {
            if let Ok(cell) = self.grid.cell_mut(position, floor) {
                cell.visual_state = state;
            }
        }

        valid
    }

    /// Highlights every cell of the building covering `position`, clearing any other marks.
    pub fn highlight_building_at(&mut self, position: IVec2, floor: i32) -> bool {
        self.reset_cell_visual_states();

        let Some((_, building)) = self.building_at(position, floor) else {
            return false;
        };
        let floor = building.floor();
        for cell_position in building.occupied_cells() {
            if let Ok(cell) = self.grid.cell_mut(cell_position, floor) {
                cell.visual_state = CellVisualState::Highlighted;
            }
        }
        true
    }

    pub fn reset_cell_visual_states(&mut self) {
        for cell in self.grid.cells_mut() {
            cell.visual_state = CellVisualState::Normal;
        }
        self.refresh_visuals();
    }

    pub fn set_active_floor_level(&mut self, floor: i32) {
        self.active_floor = self.layout().clamp_floor(floor);
        self.refresh_visuals();
    }

    pub fn set_grid_visualization_enabled(&mut self, enabled: bool) {
        self.visualization_enabled = enabled;
        self.refresh_visuals();
    }

    /// Runs the daily hook on every building, returning those that finished construction.
    pub fn on_daily_update(&mut self) -> Vec<BuildingId> {
        let mut opened: Vec<BuildingId> = self
            .buildings
            .iter_mut()
            .filter_map(|(&id, building)| building.on_daily_update().then_some(id))
            .collect();
        opened.sort();
        opened
    }

    fn are_cells_available(&self, asset: &BuildingAsset, origin: IVec2, rotation: i32, floor: i32) -> bool {
        let cells = asset.footprint.occupied_cells(origin, rotation);
        // Every cell points back at the origin, so the origin must be one of them.
        if !cells.contains(&origin) {
            return false;
        }

        cells.into_iter().all(|position| {
            let Ok(cell) = self.grid.cell(position, floor) else {
                return false;
            };
            if cell.is_occupied() {
                return false;
            }
            // Upper floors need some building directly underneath.
            floor == 0 || self.grid.is_occupied(position, floor - 1).unwrap_or(false)
        })
    }

    fn building_type_at(&self, position: IVec2, floor: i32) -> Option<BuildingType> {
        self.building_at(position, floor).map(|(_, building)| building.building_type())
    }

    fn refresh_visuals(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{footprint::*, orientation::*};

    fn manager(size: i32, floors: i32) -> BuildingGridManager {
        BuildingGridManager::new(GridLayout::new(size, size, 100.0, floors, 400.0))
    }

    fn room(building_type: BuildingType) -> Arc<BuildingAsset> {
        Arc::new(BuildingAsset::new(
            building_type.display_name(),
            building_type,
            BuildingFootprint::rectangle(1, 1),
        ))
    }

    fn at(x: i32, y: i32) -> Vec3 {
        Vec3::new(x as f32 * 100.0 + 50.0, 0.0, y as f32 * 100.0 + 50.0)
    }

    fn assert_occupancy_consistent(manager: &BuildingGridManager) {
        for cell in manager.cells() {
            match cell.occupant() {
                Some(id) => {
                    let building = manager.building(id).expect("occupant must resolve");
                    assert_eq!(building.floor(), cell.floor);
                    assert_eq!(cell.object_origin, building.origin());
                    assert!(building.occupied_cells().contains(&cell.position));
                    let anchor = manager.cell(cell.object_origin, cell.floor).unwrap();
                    assert_eq!(anchor.occupant(), Some(id));
                }
                None => {
                    assert!(!cell.is_occupied());
                    assert_eq!(cell.object_origin, cell.position);
                }
            }
        }
    }

    #[test]
    fn test_place_and_remove_scenario() {
        let mut manager = manager(3, 1);
        let asset = room(BuildingType::StandardRoom);
        let location = Vec3::new(150.0, 0.0, 150.0);

        assert!(manager.can_place_building(&asset, location, 0, Some(0)));
        let id = manager.place_building(&asset, location, 0, Some(0)).unwrap();
        assert_eq!(manager.cell(IVec2::new(1, 1), 0).unwrap().occupant(), Some(id));
        assert_occupancy_consistent(&manager);

        assert!(!manager.can_place_building(&asset, location, 0, Some(0)));
        assert!(manager.place_building(&asset, location, 0, Some(0)).is_none());

        assert!(manager.remove_building(IVec2::new(1, 1), 0));
        assert!(!manager.cell(IVec2::new(1, 1), 0).unwrap().is_occupied());
        assert_eq!(manager.building_count(), 0);
        assert_occupancy_consistent(&manager);
    }

    #[test]
    fn test_removal_is_idempotent() {
        let mut manager = manager(3, 1);
        manager.place_building(&room(BuildingType::Garden), at(2, 2), 0, Some(0));
        assert!(manager.remove_building(IVec2::new(2, 2), 0));

        let before: Vec<GridCell> = manager.cells().copied().collect();
        assert!(!manager.remove_building(IVec2::new(2, 2), 0));
        let after: Vec<GridCell> = manager.cells().copied().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_remove_rejects_invalid_and_vacant_positions() {
        let mut manager = manager(3, 1);
        assert!(!manager.remove_building(IVec2::new(5, 5), 0));
        assert!(!manager.remove_building(IVec2::new(0, 0), 3));
        assert!(!manager.remove_building(IVec2::new(0, 0), 0));
    }

    #[test]
    fn test_structural_support_rule() {
        let mut manager = manager(3, 2);
        let asset = room(BuildingType::StandardRoom);
        let ground = at(1, 1);

        assert!(!manager.can_place_building(&asset, ground, 0, Some(1)));
        assert!(manager.place_building(&asset, ground, 0, Some(0)).is_some());
        assert!(manager.can_place_building(&asset, ground, 0, Some(1)));
        let upper = manager.place_building(&asset, ground, 0, Some(1)).unwrap();
        assert_eq!(manager.building(upper).unwrap().floor(), 1);
        assert_occupancy_consistent(&manager);
    }

    #[test]
    fn test_support_can_come_from_different_buildings() {
        let mut manager = manager(4, 2);
        let single = room(BuildingType::StandardRoom);
        let wide = Arc::new(BuildingAsset::new("Suite", BuildingType::Suite, BuildingFootprint::rectangle(2, 1)));

        manager.place_building(&single, at(1, 1), 0, Some(0));
        assert!(!manager.can_place_building(&wide, at(1, 1), 0, Some(1)));
        manager.place_building(&single, at(2, 1), 0, Some(0));
        assert!(manager.can_place_building(&wide, at(1, 1), 0, Some(1)));
    }

    #[test]
    fn test_floor_detected_from_height_when_unspecified() {
        let mut manager = manager(3, 2);
        let asset = room(BuildingType::StandardRoom);
        manager.place_building(&asset, at(0, 0), 0, Some(0));

        let high = at(0, 0) + Vec3::Y * 450.0;
        assert_eq!(manager.resolve_target(high, None), (IVec2::ZERO, 1));
        assert_eq!(manager.resolve_target(high, Some(-1)), (IVec2::ZERO, 1));
        assert_eq!(manager.resolve_target(high, Some(0)), (IVec2::ZERO, 0));

        let id = manager.place_building(&asset, high, 0, None).unwrap();
        assert_eq!(manager.building(id).unwrap().floor(), 1);
    }

    #[test]
    fn test_out_of_bounds_footprint_is_rejected() {
        let mut manager = manager(3, 1);
        let wide = Arc::new(BuildingAsset::new("Yoga", BuildingType::YogaStudio, BuildingFootprint::rectangle(2, 1)));
        assert!(!manager.can_place_building(&wide, at(2, 0), 0, Some(0)));
        assert!(manager.can_place_building(&wide, at(1, 0), 0, Some(0)));
        // Rotated a quarter turn the footprint extends towards negative x.
        assert!(!manager.can_place_building(&wide, at(0, 0), 1, Some(0)));
        assert!(manager.can_place_building(&wide, at(1, 0), 1, Some(0)));
        assert!(manager.place_building(&wide, at(2, 0), 0, Some(0)).is_none());
        assert!(!manager.can_place_building(&wide, at(0, 0), 0, Some(5)));
    }

    #[test]
    fn test_multi_cell_building_shares_origin() {
        let mut manager = manager(5, 1);
        let asset = Arc::new(BuildingAsset::new("Villa", BuildingType::Villa, BuildingFootprint::rectangle(2, 2)));
        let id = manager.place_building(&asset, at(1, 1), 0, Some(0)).unwrap();

        for position in [IVec2::new(1, 1), IVec2::new(2, 1), IVec2::new(1, 2), IVec2::new(2, 2)] {
            let cell = manager.cell(position, 0).unwrap();
            assert_eq!(cell.occupant(), Some(id));
            assert_eq!(cell.object_origin, IVec2::new(1, 1));
        }

        assert!(manager.remove_building(IVec2::new(2, 2), 0));
        for cell in manager.cells() {
            assert!(!cell.is_occupied());
            assert_eq!(cell.object_origin, cell.position);
        }
    }

    #[test]
    fn test_degenerate_footprints_are_rejected() {
        let mut manager = manager(4, 1);
        let detached = Arc::new(BuildingAsset::new(
            "Detached",
            BuildingType::Garden,
            BuildingFootprint::shape(vec![IVec2::new(1, 0)]),
        ));
        let empty = Arc::new(BuildingAsset::new("Empty", BuildingType::Garden, BuildingFootprint::rectangle(0, 0)));
        let flat = Arc::new(BuildingAsset::new("Flat", BuildingType::Garden, BuildingFootprint::rectangle(2, -1)));

        for asset in [&detached, &empty, &flat] {
            assert!(!manager.can_place_building(asset, at(1, 1), 0, Some(0)));
            assert_eq!(manager.place_building(asset, at(1, 1), 0, Some(0)), None);
        }
        assert_eq!(manager.building_count(), 0);
        assert!(manager.cells().all(|cell| !cell.is_occupied()));

        let anchored = Arc::new(BuildingAsset::new(
            "Anchored",
            BuildingType::Garden,
            BuildingFootprint::shape(vec![IVec2::ZERO, IVec2::new(1, 0)]),
        ));
        assert!(manager.place_building(&anchored, at(1, 1), 0, Some(0)).is_some());
        assert_occupancy_consistent(&manager);
    }

    #[test]
    fn test_negative_adjacency_north() {
        let mut manager = manager(4, 1);
        let spa = Arc::new(
            BuildingAsset::new("Spa", BuildingType::MassageRoom, BuildingFootprint::rectangle(1, 1))
                .with_adjacency(AdjacencyRequirement::new(BuildingType::Utility, GridDirection::North, true)),
        );

        assert!(manager.can_place_building(&spa, at(1, 2), 0, Some(0)));

        manager.place_building(&room(BuildingType::Office), at(1, 1), 0, Some(0));
        assert!(manager.can_place_building(&spa, at(1, 2), 0, Some(0)));

        assert!(manager.remove_building(IVec2::new(1, 1), 0));
        manager.place_building(&room(BuildingType::Utility), at(1, 1), 0, Some(0));
        assert!(!manager.can_place_building(&spa, at(1, 2), 0, Some(0)));
        assert!(manager.can_place_building(&spa, at(3, 3), 0, Some(0)));
    }

    #[test]
    fn test_positive_adjacency_any_direction() {
        let mut manager = manager(4, 1);
        let bar = Arc::new(
            BuildingAsset::new("Bar", BuildingType::JuiceBar, BuildingFootprint::rectangle(1, 1))
                .with_adjacency(AdjacencyRequirement::new(BuildingType::Garden, GridDirection::Any, false)),
        );

        assert!(!manager.can_place_building(&bar, at(1, 1), 0, Some(0)));
        manager.place_building(&room(BuildingType::Garden), at(0, 1), 0, Some(0));
        assert!(manager.can_place_building(&bar, at(1, 1), 0, Some(0)));
        assert!(!manager.can_place_building(&bar, at(3, 3), 0, Some(0)));
    }

    #[test]
    fn test_adjacency_only_looks_at_same_floor() {
        let mut manager = manager(3, 2);
        let bar = Arc::new(
            BuildingAsset::new("Bar", BuildingType::JuiceBar, BuildingFootprint::rectangle(1, 1))
                .with_adjacency(AdjacencyRequirement::new(BuildingType::Garden, GridDirection::East, false)),
        );
        manager.place_building(&room(BuildingType::Office), at(1, 1), 0, Some(0));
        manager.place_building(&room(BuildingType::Garden), at(2, 1), 0, Some(0));
        assert!(!manager.can_place_building(&bar, at(1, 1), 0, Some(1)));
        assert!(manager.place_building(&bar, at(1, 0), 0, Some(0)).is_none());
    }

    #[test]
    fn test_preview_marks_cells_without_occupying() {
        let mut manager = manager(4, 1);
        let suite = Arc::new(BuildingAsset::new("Suite", BuildingType::Suite, BuildingFootprint::rectangle(2, 1)));

        assert!(manager.update_placement_preview(Some(&suite), at(1, 1), 0, Some(0)));
        assert_eq!(manager.cell(IVec2::new(1, 1), 0).unwrap().visual_state, CellVisualState::Valid);
        assert_eq!(manager.cell(IVec2::new(2, 1), 0).unwrap().visual_state, CellVisualState::Valid);
        assert!(manager.cells().all(|cell| !cell.is_occupied()));

        // Moving the preview clears the previous marks.
        manager.place_building(&room(BuildingType::Garden), at(3, 3), 0, Some(0));
        assert!(!manager.update_placement_preview(Some(&suite), at(2, 3), 0, Some(0)));
        assert_eq!(manager.cell(IVec2::new(1, 1), 0).unwrap().visual_state, CellVisualState::Normal);
        assert_eq!(manager.cell(IVec2::new(2, 3), 0).unwrap().visual_state, CellVisualState::Invalid);
        assert_eq!(manager.cell(IVec2::new(3, 3), 0).unwrap().visual_state, CellVisualState::Invalid);

        assert!(!manager.update_placement_preview(None, at(0, 0), 0, Some(0)));
        assert!(manager.cells().all(|cell| cell.visual_state == CellVisualState::Normal));
    }

    #[test]
    fn test_preview_clips_cells_outside_grid() {
        let mut manager = manager(2, 1);
        let suite = Arc::new(BuildingAsset::new("Suite", BuildingType::Suite, BuildingFootprint::rectangle(2, 1)));
        assert!(!manager.update_placement_preview(Some(&suite), at(1, 0), 0, Some(0)));
        assert_eq!(manager.cell(IVec2::new(1, 0), 0).unwrap().visual_state, CellVisualState::Invalid);
        assert_eq!(
            manager.cells().filter(|cell| cell.visual_state == CellVisualState::Invalid).count(),
            1
        );
    }

    #[test]
    fn test_highlight_building() {
        let mut manager = manager(4, 1);
        let suite = Arc::new(BuildingAsset::new("Suite", BuildingType::Suite, BuildingFootprint::rectangle(2, 1)));
        manager.place_building(&suite, at(1, 1), 0, Some(0));

        assert!(manager.highlight_building_at(IVec2::new(2, 1), 0));
        let highlighted: Vec<IVec2> = manager
            .cells()
            .filter(|cell| cell.visual_state == CellVisualState::Highlighted)
            .map(|cell| cell.position)
            .collect();
        assert_eq!(highlighted, vec![IVec2::new(1, 1), IVec2::new(2, 1)]);

        assert!(!manager.highlight_building_at(IVec2::new(0, 0), 0));
        assert!(manager.cells().all(|cell| cell.visual_state == CellVisualState::Normal));
    }

    #[test]
    fn test_reset_visual_states_every_floor() {
        let mut manager = manager(3, 3);
        for floor in 0..3 {
            for cell in manager.grid.floor_cells(floor).map(|cell| cell.position).collect::<Vec<_>>() {
                manager.grid.cell_mut(cell, floor).unwrap().visual_state = CellVisualState::Highlighted;
            }
        }
        manager.reset_cell_visual_states();
        assert!(manager.cells().all(|cell| cell.visual_state == CellVisualState::Normal));
    }

    #[test]
    fn test_active_floor_is_clamped() {
        let mut manager = manager(3, 3);
        manager.set_active_floor_level(2);
        assert_eq!(manager.active_floor(), 2);
        manager.set_active_floor_level(9);
        assert_eq!(manager.active_floor(), 2);
        manager.set_active_floor_level(-4);
        assert_eq!(manager.active_floor(), 0);
    }

    #[test]
    fn test_mutations_bump_revision() {
        let mut manager = manager(3, 1);
        let start = manager.revision();
        manager.set_grid_visualization_enabled(true);
        assert!(manager.visualization_enabled());
        manager.place_building(&room(BuildingType::Office), at(0, 0), 0, Some(0));
        assert!(manager.revision() > start + 1);
    }

    #[test]
    fn test_cell_data_defaults_out_of_bounds() {
        let manager = manager(3, 1);
        assert_eq!(manager.cell_data(IVec2::new(9, 9), 0), GridCell::default());
        assert_eq!(manager.cell_data(IVec2::new(2, 1), 0).position, IVec2::new(2, 1));
        assert!(manager.cell(IVec2::new(9, 9), 0).is_err());
    }

    #[test]
    fn test_initialize_grid_replaces_store() {
        let mut manager = manager(3, 2);
        manager.place_building(&room(BuildingType::Office), at(0, 0), 0, Some(0));
        manager.set_active_floor_level(1);

        manager.initialize_grid(5, 4, 50.0, 1);
        assert_eq!(manager.building_count(), 0);
        assert_eq!(manager.cells().count(), 20);
        assert_eq!(manager.max_floors(), 1);
        assert_eq!(manager.active_floor(), 0);
        assert_eq!(manager.layout().cell_size, 50.0);
        assert!(manager.cells().all(|cell| !cell.is_occupied()));
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut manager = manager(3, 1);
        let asset = room(BuildingType::Office);
        let first = manager.place_building(&asset, at(0, 0), 0, Some(0)).unwrap();
        manager.remove_building(IVec2::ZERO, 0);
        let second = manager.place_building(&asset, at(0, 0), 0, Some(0)).unwrap();
        assert_ne!(first, second);
        assert!(manager.building(first).is_none());
    }

    #[test]
    fn test_daily_update_opens_buildings_once() {
        let mut manager = manager(3, 1);
        let asset = room(BuildingType::Garden);
        let a = manager.place_building(&asset, at(0, 0), 0, Some(0)).unwrap();
        let b = manager.place_building(&asset, at(2, 2), 0, Some(0)).unwrap();

        assert_eq!(manager.on_daily_update(), vec![a, b]);
        assert!(manager.on_daily_update().is_empty());
        assert_eq!(manager.building(a).unwrap().state(), BuildingState::Operational);
    }

    #[test]
    fn test_occupancy_consistent_through_mixed_operations() {
        let mut manager = manager(6, 2);
        let catalog = BuildingCatalog::default();
        let mut placed = 0;
        for (i, asset) in catalog.iter().enumerate() {
            let x = (i as i32 * 2) % 6;
            let y = (i as i32 * 3) % 6;
            for rotation in 0..4 {
                if manager.place_building(asset, at(x, y), rotation, Some(0)).is_some() {
                    placed += 1;
                    break;
                }
            }
            assert_occupancy_consistent(&manager);
        }
        assert!(placed > 0);

        let positions: Vec<IVec2> = manager.buildings().map(|(_, b)| b.origin()).collect();
        for position in positions.iter().step_by(2) {
            assert!(manager.remove_building(*position, 0));
            assert_occupancy_consistent(&manager);
        }
    }
}
