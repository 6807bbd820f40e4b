use crate::grid::{grid_cell::*, layout::*};
use bevy::prelude::*;
use std::{error::Error, fmt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridBoundsError {
    pub position: IVec2,
    pub floor: i32,
}

impl fmt::Display for GridBoundsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "invalid index for the grid: cell {} on floor {} is out of bounds",
            self.position, self.floor
        )
    }
}

impl Error for GridBoundsError {}

/// Floors of rows of cells, sized once from a [`GridLayout`].
#[derive(Debug, Clone)]
pub struct Grid {
    layout: GridLayout,
    floors: Vec<Vec<Vec<GridCell>>>,
}

impl Grid {
    pub fn new(layout: GridLayout) -> Self {
        let floors = (0..layout.max_floors)
            .map(|floor| {
                (0..layout.size.y)
                    .map(|y| (0..layout.size.x).map(|x| GridCell::new(IVec2::new(x, y), floor)).collect())
                    .collect()
            })
            .collect();

        Self { layout, floors }
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn cell(&self, position: IVec2, floor: i32) -> Result<&GridCell, GridBoundsError> {
        if self.layout.is_valid(position, floor) {
            Ok(&self.floors[floor as usize][position.y as usize][position.x as usize])
        } else {
            Err(GridBoundsError { position, floor })
        }
    }

    pub fn cell_mut(&mut self, position: IVec2, floor: i32) -> Result<&mut GridCell, GridBoundsError> {
        if self.layout.is_valid(position, floor) {
            Ok(&mut self.floors[floor as usize][position.y as usize][position.x as usize])
        } else {
            Err(GridBoundsError { position, floor })
        }
    }

    pub fn is_occupied(&self, position: IVec2, floor: i32) -> Result<bool, GridBoundsError> {
        Ok(self.cell(position, floor)?.is_occupied())
    }

    /// Cells of one floor in row-major order; empty for an invalid floor.
    pub fn floor_cells(&self, floor: i32) -> impl Iterator<Item = &GridCell> {
        usize::try_from(floor)
            .ok()
            .and_then(|index| self.floors.get(index))
            .into_iter()
            .flat_map(|rows| rows.iter().flatten())
    }

    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.floors.iter().flatten().flatten()
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut GridCell> {
        self.floors.iter_mut().flatten().flatten()
    }
}
