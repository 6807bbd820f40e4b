use crate::grid::orientation::*;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Shape of a building on the grid. Either a `size` rectangle or, when `cells` is non-empty,
/// an explicit list of offsets from the origin cell. Rotation is applied at query time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingFootprint {
    pub size: IVec2,
    pub cells: Vec<IVec2>,
}

impl Default for BuildingFootprint {
    fn default() -> Self {
        Self {
            size: IVec2::ONE,
            cells: Vec::new(),
        }
    }
}

impl BuildingFootprint {
    pub fn rectangle(width: i32, height: i32) -> Self {
        Self {
            size: IVec2::new(width, height),
            cells: Vec::new(),
        }
    }

    pub fn shape(cells: Vec<IVec2>) -> Self {
        Self { size: IVec2::ONE, cells }
    }

    pub fn rotated_size(&self, quarters: i32) -> IVec2 {
        if normalize_quarters(quarters) % 2 == 1 {
            IVec2::new(self.size.y, self.size.x)
        } else {
            self.size
        }
    }

    pub fn occupied_cells(&self, origin: IVec2, quarters: i32) -> Vec<IVec2> {
        if !self.cells.is_empty() {
            return self.cells.iter().map(|&cell| origin + rotate_offset(cell, quarters)).collect();
        }

        let size = self.rotated_size(quarters);
        let mut result = Vec::with_capacity((size.x.max(0) * size.y.max(0)) as usize);
        for x in 0..size.x {
            for y in 0..size.y {
                result.push(origin + rotate_offset(IVec2::new(x, y), quarters));
            }
        }
        result
    }

    /// Inclusive (min, max) cell corners covering the rotated footprint.
    pub fn bounds(&self, origin: IVec2, quarters: i32) -> Option<(IVec2, IVec2)> {
        let cells = self.occupied_cells(origin, quarters);
        let first = *cells.first()?;
        Some(cells.iter().fold((first, first), |(min, max), &cell| (min.min(cell), max.max(cell))))
    }
}
