pub mod building_models;
pub mod camera;
pub mod grid_visuals;
