pub mod egui;
