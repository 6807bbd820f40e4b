use crate::{
    building::{asset::BuildingType, building_object::*},
    grid::{grid_events::*, layout::GridLayout, manager::BuildingGridManager},
    schedule::UpdateStage,
};
use bevy::prelude::*;
use rand::Rng;

const CROP: f32 = 0.04;

pub struct BuildingModelPlugin;

impl Plugin for BuildingModelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (despawn_removed_models, spawn_placed_models).in_set(UpdateStage::Visualize),
        );
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildingModel(pub BuildingId);

fn type_color(building_type: BuildingType) -> Vec3 {
    match building_type {
        BuildingType::None => Vec3::splat(0.5),
        BuildingType::StandardRoom => Vec3::new(0.85, 0.78, 0.65),
        BuildingType::Suite => Vec3::new(0.8, 0.68, 0.5),
        BuildingType::Villa => Vec3::new(0.75, 0.55, 0.4),
        BuildingType::MassageRoom => Vec3::new(0.65, 0.5, 0.75),
        BuildingType::YogaStudio => Vec3::new(0.55, 0.7, 0.8),
        BuildingType::MeditationRoom => Vec3::new(0.6, 0.6, 0.85),
        BuildingType::Restaurant => Vec3::new(0.85, 0.45, 0.35),
        BuildingType::JuiceBar => Vec3::new(0.95, 0.7, 0.3),
        BuildingType::Garden => Vec3::new(0.35, 0.7, 0.35),
        BuildingType::StaffRoom => Vec3::new(0.55, 0.55, 0.5),
        BuildingType::Office => Vec3::new(0.45, 0.5, 0.6),
        BuildingType::Utility => Vec3::new(0.35, 0.35, 0.38),
    }
}

/// One block per occupied cell, sitting on the building's floor.
pub fn block_transforms(layout: &GridLayout, building: &BuildingObject) -> Vec<Transform> {
    let height = layout.floor_height * (1.0 - CROP);
    let size = layout.cell_size * (1.0 - CROP);

    building
        .occupied_cells()
        .into_iter()
        .filter(|cell| layout.is_valid(*cell, building.floor()))
        .map(|cell| {
            let base = layout.grid_to_world(cell, building.floor());
            Transform::from_translation(base + Vec3::Y * height * 0.5).with_scale(Vec3::new(size, height, size))
        })
        .collect()
}

fn spawn_placed_models(
    mut commands: Commands,
    mut placed: EventReader<OnBuildingPlaced>,
    manager: Res<BuildingGridManager>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for &OnBuildingPlaced(id) in placed.read() {
        let Some(building) = manager.building(id) else {
            continue;
        };

        let jitter = rand::thread_rng().gen_range(-0.06..0.06);
        let tint = (type_color(building.building_type()) + Vec3::splat(jitter)).clamp(Vec3::ZERO, Vec3::ONE);
        let material = materials.add(Color::srgb(tint.x, tint.y, tint.z));
        let mesh = meshes.add(Cuboid::new(1.0, 1.0, 1.0));

        commands
            .spawn((SpatialBundle::default(), BuildingModel(id)))
            .with_children(|parent| {
                for transform in block_transforms(manager.layout(), building) {
                    parent.spawn(PbrBundle {
                        mesh: mesh.clone(),
                        material: material.clone(),
                        transform,
                        ..default()
                    });
                }
            });
    }
}

fn despawn_removed_models(
    mut commands: Commands,
    mut removed: EventReader<OnBuildingRemoved>,
    models: Query<(Entity, &BuildingModel)>,
) {
    for event in removed.read() {
        for (entity, model) in &models {
            if model.0 == event.id {
                commands.entity(entity).despawn_recursive();
            }
        }
    }
}
