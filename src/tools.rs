pub mod building_tool;
pub mod eraser_tool;
pub mod toolbar;
pub mod toolbar_events;
