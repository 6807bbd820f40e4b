use crate::settings::GridSettings;
use bevy::prelude::*;

/// Fixed dimensions of the grid and its placement in the world.
///
/// The engine is Y-up: grid X runs along world `x`, grid Y along world `z`, and floors
/// stack along world `y`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridLayout {
    pub size: IVec2,
    pub max_floors: i32,
    pub cell_size: f32,
    pub floor_height: f32,
    pub origin: Vec3,
}

impl Default for GridLayout {
    fn default() -> Self {
        GridLayout::from_settings(&GridSettings::default())
    }
}

impl GridLayout {
    pub fn new(size_x: i32, size_y: i32, cell_size: f32, max_floors: i32, floor_height: f32) -> Self {
        Self {
            size: IVec2::new(size_x.max(0), size_y.max(0)),
            max_floors: max_floors.max(0),
            cell_size,
            floor_height,
            origin: Vec3::ZERO,
        }
    }

    pub fn from_settings(settings: &GridSettings) -> Self {
        Self {
            origin: Vec3::from_array(settings.origin),
            ..GridLayout::new(
                settings.size_x,
                settings.size_y,
                settings.cell_size,
                settings.max_floors,
                settings.floor_height,
            )
        }
    }

    pub fn is_valid(&self, position: IVec2, floor: i32) -> bool {
        floor >= 0
            && floor < self.max_floors
            && position.x >= 0
            && position.x < self.size.x
            && position.y >= 0
            && position.y < self.size.y
    }

    pub fn clamp_floor(&self, floor: i32) -> i32 {
        floor.clamp(0, (self.max_floors - 1).max(0))
    }

    /// Saturates out-of-range input to the grid bounds, never fails.
    ///
    /// Cell `n` spans `[n * cell_size, (n + 1) * cell_size)` from the origin, so the center
    /// returned by [`GridLayout::grid_to_world`] maps back to the same cell.
    pub fn world_to_grid(&self, world: Vec3) -> (IVec2, i32) {
        let floor = self.clamp_floor(((world.y - self.origin.y) / self.floor_height).floor() as i32);
        let gx = ((world.x - self.origin.x) / self.cell_size).floor() as i32;
        let gy = ((world.z - self.origin.z) / self.cell_size).floor() as i32;
        let position = IVec2::new(
            gx.clamp(0, (self.size.x - 1).max(0)),
            gy.clamp(0, (self.size.y - 1).max(0)),
        );
        (position, floor)
    }

    /// Center of the cell in X/Z; the floor contributes its base height only.
    pub fn grid_to_world(&self, position: IVec2, floor: i32) -> Vec3 {
        let half = self.cell_size * 0.5;
        Vec3::new(
            self.origin.x + position.x as f32 * self.cell_size + half,
            self.origin.y + floor as f32 * self.floor_height,
            self.origin.z + position.y as f32 * self.cell_size + half,
        )
    }

    /// Whether the X/Z projection of `world` falls on the grid, ignoring height.
    pub fn contains_world(&self, world: Vec3) -> bool {
        let local = (world - self.origin) / self.cell_size;
        local.x >= 0.0 && local.z >= 0.0 && local.x < self.size.x as f32 && local.z < self.size.y as f32
    }

    pub fn floor_base_height(&self, floor: i32) -> f32 {
        self.origin.y + floor as f32 * self.floor_height
    }

    pub fn cell_count(&self) -> usize {
        (self.size.x * self.size.y * self.max_floors) as usize
    }
}
