use crate::{
    grid::{grid_cell::CellVisualState, layout::GridLayout, manager::BuildingGridManager},
    schedule::UpdateStage,
};
use bevy::{pbr::CascadeShadowConfigBuilder, prelude::*};
use bevy_infinite_grid::{InfiniteGrid, InfiniteGridBundle, InfiniteGridPlugin};

const MARKER_LIFT: f32 = 0.02;
const MARKER_INSET: f32 = 0.92;

pub struct GridVisualsPlugin;

impl Plugin for GridVisualsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InfiniteGridPlugin)
            .add_systems(
                Startup,
                (spawn_ground, spawn_grid_visualization, spawn_lights, create_marker_assets),
            )
            .add_systems(
                Update,
                (
                    (toggle_grid_visualization, adjust_sunlight).in_set(UpdateStage::UserInput),
                    sync_cell_markers.in_set(UpdateStage::Visualize),
                ),
            );
    }
}

#[derive(Component, Debug)]
pub struct Ground;

/// Flat tile drawn over one cell of the active floor.
#[derive(Component, Debug, Clone, Copy)]
pub struct CellMarker {
    pub position: IVec2,
}

#[derive(Resource, Debug, Clone)]
pub struct CellMarkerAssets {
    mesh: Handle<Mesh>,
    materials: [Handle<StandardMaterial>; 5],
}

impl CellMarkerAssets {
    pub fn material(&self, state: CellVisualState) -> Handle<StandardMaterial> {
        self.materials[state.index()].clone()
    }
}

fn marker_color(state: CellVisualState) -> Color {
    match state {
        CellVisualState::Normal => Color::srgba(1.0, 1.0, 1.0, 0.06),
        CellVisualState::Valid => Color::srgba(0.1, 0.9, 0.3, 0.55),
        CellVisualState::Invalid => Color::srgba(0.95, 0.15, 0.1, 0.55),
        CellVisualState::Selected => Color::srgba(0.2, 0.5, 1.0, 0.55),
        CellVisualState::Highlighted => Color::srgba(1.0, 0.85, 0.1, 0.55),
    }
}

pub fn marker_transform(layout: &GridLayout, position: IVec2, floor: i32) -> Transform {
    let center = layout.grid_to_world(position, floor);
    Transform::from_translation(center + Vec3::Y * MARKER_LIFT)
        .with_scale(Vec3::new(layout.cell_size * MARKER_INSET, 1.0, layout.cell_size * MARKER_INSET))
}

fn create_marker_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let materials = CellVisualState::ALL.map(|state| {
        materials.add(StandardMaterial {
            base_color: marker_color(state),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        })
    });

    commands.insert_resource(CellMarkerAssets {
        mesh: meshes.add(Plane3d::default().mesh().size(1.0, 1.0)),
        materials,
    });
}

/// Floor and dimensions the current markers were built for, plus the last seen revision.
#[derive(Default)]
struct MarkerSync {
    built_for: Option<(i32, IVec2)>,
    revision: Option<u64>,
}

fn sync_cell_markers(
    mut commands: Commands,
    manager: Res<BuildingGridManager>,
    assets: Res<CellMarkerAssets>,
    mut markers: Query<(Entity, &CellMarker, &mut Handle<StandardMaterial>, &mut Visibility)>,
    mut sync: Local<MarkerSync>,
) {
    let floor = manager.active_floor();
    let layout = *manager.layout();
    let visibility = if manager.visualization_enabled() {
        Visibility::Visible
    } else {
        Visibility::Hidden
    };

    if sync.built_for != Some((floor, layout.size)) {
        for (entity, ..) in &markers {
            commands.entity(entity).despawn();
        }

        for cell in manager.floor_cells(floor) {
            commands.spawn((
                PbrBundle {
                    mesh: assets.mesh.clone(),
                    material: assets.material(cell.visual_state),
                    transform: marker_transform(&layout, cell.position, floor),
                    visibility,
                    ..default()
                },
                CellMarker {
                    position: cell.position,
                },
            ));
        }

        log::debug!("Rebuilt cell markers for floor {}", floor);
        sync.built_for = Some((floor, layout.size));
        sync.revision = Some(manager.revision());
        return;
    }

    if sync.revision == Some(manager.revision()) {
        return;
    }

    for (_, marker, mut material, mut marker_visibility) in &mut markers {
        let state = manager.cell_data(marker.position, floor).visual_state;
        *material = assets.material(state);
        *marker_visibility = visibility;
    }
    sync.revision = Some(manager.revision());
}

fn spawn_ground(
    mut commands: Commands,
    manager: Res<BuildingGridManager>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let layout = manager.layout();
    let extent = layout.size.as_vec2() * layout.cell_size;
    let center = layout.origin + Vec3::new(extent.x, 0.0, extent.y) * 0.5;

    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Plane3d::default().mesh().size(extent.x, extent.y)),
            material: materials.add(Color::srgb(0.35, 0.55, 0.35)),
            transform: Transform::from_translation(center - Vec3::Y * MARKER_LIFT),
            ..default()
        },
        Ground,
    ));
}

fn spawn_grid_visualization(mut commands: Commands) {
    commands.spawn(InfiniteGridBundle::default());
}

fn toggle_grid_visualization(mut query: Query<&mut Visibility, With<InfiniteGrid>>, keyboard: Res<ButtonInput<KeyCode>>) {
    if keyboard.just_pressed(KeyCode::KeyG) {
        for mut viz in &mut query {
            *viz = match *viz {
                Visibility::Hidden => Visibility::Visible,
                _ => Visibility::Hidden,
            }
        }
    }
}

fn spawn_lights(mut commands: Commands) {
    commands.spawn(DirectionalLightBundle {
        transform: Transform::from_xyz(1.0, 2.0, 0.5).looking_at(Vec3::ZERO, Vec3::Y),
        directional_light: DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        cascade_shadow_config: CascadeShadowConfigBuilder {
            num_cascades: 3,
            maximum_distance: 100.0,
            ..default()
        }
        .into(),
        ..default()
    });
}

fn adjust_sunlight(mut dir_light_query: Query<&mut DirectionalLight>, keyboard: Res<ButtonInput<KeyCode>>) {
    for mut light in &mut dir_light_query {
        if keyboard.just_pressed(KeyCode::KeyK) {
            light.illuminance += 1_000.0;
        } else if keyboard.just_pressed(KeyCode::KeyM) {
            light.illuminance = (light.illuminance - 1_000.0).max(0.0);
        }
    }
}
