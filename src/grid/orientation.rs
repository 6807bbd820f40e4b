use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Direction used by adjacency rules. North is towards negative grid Y.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum GridDirection {
    North,
    East,
    South,
    West,
    #[default]
    Any,
}

impl GridDirection {
    pub fn cardinals() -> [GridDirection; 4] {
        [GridDirection::North, GridDirection::East, GridDirection::South, GridDirection::West]
    }

    pub fn opposite(&self) -> GridDirection {
        match *self {
            GridDirection::North => GridDirection::South,
            GridDirection::East => GridDirection::West,
            GridDirection::South => GridDirection::North,
            GridDirection::West => GridDirection::East,
            GridDirection::Any => GridDirection::Any,
        }
    }

    pub fn offset(&self) -> IVec2 {
        match *self {
            GridDirection::North => IVec2::new(0, -1),
            GridDirection::East => IVec2::new(1, 0),
            GridDirection::South => IVec2::new(0, 1),
            GridDirection::West => IVec2::new(-1, 0),
            GridDirection::Any => IVec2::ZERO,
        }
    }

    /// The concrete directions this one stands for; `Any` expands to all four.
    pub fn expand(&self) -> Vec<GridDirection> {
        match *self {
            GridDirection::Any => GridDirection::cardinals().to_vec(),
            direction => vec![direction],
        }
    }
}

pub fn normalize_quarters(quarters: i32) -> i32 {
    quarters.rem_euclid(4)
}

pub fn degrees_to_quarters(degrees: f32) -> i32 {
    let degrees = degrees.rem_euclid(360.0);
    ((degrees / 90.0).round() as i32) % 4
}

pub fn quarters_to_degrees(quarters: i32) -> f32 {
    normalize_quarters(quarters) as f32 * 90.0
}

/// Rotates a grid offset by whole quarter turns around the origin.
pub fn rotate_offset(point: IVec2, quarters: i32) -> IVec2 {
    match normalize_quarters(quarters) {
        1 => IVec2::new(-point.y, point.x),
        2 => IVec2::new(-point.x, -point.y),
        3 => IVec2::new(point.y, -point.x),
        _ => point,
    }
}
