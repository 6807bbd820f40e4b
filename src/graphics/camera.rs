use crate::{schedule::UpdateStage, settings::*, ui::egui::MouseOver};
use bevy::{
    core_pipeline::{bloom::BloomSettings, fxaa::Fxaa, tonemapping::Tonemapping},
    input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel},
    prelude::*,
};

const PAN_SNAP_SQUARED: f32 = 0.0005;
const PAN_REST_EPSILON: f32 = 0.001;
const PIXELS_PER_SCROLL_LINE: f32 = 40.0;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera).add_systems(
            Update,
            (
                (
                    keyboard_panning,
                    keyboard_rotating,
                    (mouse_zoom, mouse_rotating).run_if(in_state(MouseOver::World)),
                )
                    .in_set(UpdateStage::UserInput),
                update_camera_rig.in_set(UpdateStage::Visualize),
            ),
        );
    }
}

/// Constant-ratio interpolation. Snaps to `target` once close enough and jumps there when
/// `speed` is not positive.
pub fn interp_to(current: f32, target: f32, delta: f32, speed: f32) -> f32 {
    if speed <= 0.0 {
        return target;
    }
    let distance = target - current;
    if distance * distance < 1.0e-8 {
        return target;
    }
    current + distance * (delta * speed).clamp(0.0, 1.0)
}

pub fn interp_vec2_to(current: Vec2, target: Vec2, delta: f32, speed: f32) -> Vec2 {
    if speed <= 0.0 {
        return target;
    }
    let distance = target - current;
    if distance.length_squared() < 1.0e-8 {
        return target;
    }
    current + distance * (delta * speed).clamp(0.0, 1.0)
}

/// Orbiting top-down rig: a focus point on the ground, a boom length (zoom), a yaw and a
/// fixed pitch. Input only moves targets; `update` eases the current values towards them.
#[derive(Component, Debug, Clone)]
pub struct TopDownCameraRig {
    pub focus: Vec3,
    zoom: f32,
    target_zoom: f32,
    yaw: f32,
    target_yaw: f32,
    pitch: f32,
    pan_velocity: Vec2,
    target_pan_velocity: Vec2,
    settings: CameraSettings,
}

impl TopDownCameraRig {
    pub fn new(focus: Vec3, settings: CameraSettings) -> Self {
        let zoom = settings.initial_zoom.max(settings.min_zoom).min(settings.max_zoom);
        Self {
            focus,
            zoom,
            target_zoom: zoom,
            yaw: 0.0,
            target_yaw: 0.0,
            pitch: settings.pitch_degrees,
            pan_velocity: Vec2::ZERO,
            target_pan_velocity: Vec2::ZERO,
            settings,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn target_zoom(&self) -> f32 {
        self.target_zoom
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn target_yaw(&self) -> f32 {
        self.target_yaw
    }

    pub fn pan_velocity(&self) -> Vec2 {
        self.pan_velocity
    }

    pub fn is_moving(&self) -> bool {
        self.pan_velocity != Vec2::ZERO || self.zoom != self.target_zoom || self.yaw != self.target_yaw
    }

    /// Positive values zoom in. Steps grow with distance so far zooms stay responsive.
    pub fn add_zoom_input(&mut self, amount: f32) {
        if amount == 0.0 {
            return;
        }
        let speed = (self.settings.zoom_speed * self.target_zoom / 10.0).max(self.settings.zoom_speed * 0.5);
        self.target_zoom = (self.target_zoom - amount * speed)
            .max(self.settings.min_zoom)
            .min(self.settings.max_zoom);
    }

    pub fn add_rotation_input(&mut self, degrees: f32) {
        self.target_yaw += degrees;
    }

    /// `input.x` is screen right and `input.y` screen forward. A zero input releases the pan.
    pub fn set_pan_input(&mut self, input: Vec2) {
        if input == Vec2::ZERO {
            if self.target_pan_velocity != Vec2::ZERO {
                self.target_pan_velocity = Vec2::ZERO;
                self.pan_velocity *= 0.5;
            }
            return;
        }

        let (forward, right) = self.ground_axes();
        let world = forward * input.y + right * input.x;
        self.target_pan_velocity = (world * self.settings.pan_speed).clamp_length_max(self.settings.max_pan_velocity);
    }

    pub fn update(&mut self, delta: f32) {
        self.zoom = interp_to(self.zoom, self.target_zoom, delta, self.settings.zoom_interpolation_speed);
        self.yaw = interp_to(self.yaw, self.target_yaw, delta, self.settings.rotation_interpolation_speed);

        let releasing = self.target_pan_velocity == Vec2::ZERO;
        let speed = if releasing {
            self.settings.pan_deceleration
        } else {
            self.settings.pan_interpolation_speed
        };
        self.pan_velocity = interp_vec2_to(self.pan_velocity, self.target_pan_velocity, delta, speed);

        if releasing && self.pan_velocity.length_squared() < PAN_SNAP_SQUARED {
            self.pan_velocity = Vec2::ZERO;
        }

        if self.pan_velocity.length() > PAN_REST_EPSILON {
            self.focus += Vec3::new(self.pan_velocity.x, 0.0, self.pan_velocity.y) * delta;
        }
    }

    pub fn transform(&self) -> Transform {
        let rotation = Quat::from_euler(EulerRot::YXZ, self.yaw.to_radians(), self.pitch.to_radians(), 0.0);
        Transform {
            translation: self.focus + rotation * Vec3::Z * self.zoom,
            rotation,
            ..default()
        }
    }

    /// Forward and right directions on the ground plane as (x, z) pairs.
    fn ground_axes(&self) -> (Vec2, Vec2) {
        let yaw = Quat::from_rotation_y(self.yaw.to_radians());
        let forward = yaw * Vec3::NEG_Z;
        let right = yaw * Vec3::X;
        (Vec2::new(forward.x, forward.z), Vec2::new(right.x, right.z))
    }
}

fn spawn_camera(mut commands: Commands, settings: Res<Settings>) {
    let grid = &settings.grid;
    let focus = Vec3::from_array(grid.origin)
        + Vec3::new(grid.size_x as f32 * grid.cell_size, 0.0, grid.size_y as f32 * grid.cell_size) * 0.5;
    let rig = TopDownCameraRig::new(focus, settings.camera.clone());
    let clear = Color::srgb(0.25, 0.25, 0.25);

    commands.spawn((
        Camera3dBundle {
            camera: Camera {
                hdr: false,
                clear_color: ClearColorConfig::Custom(clear),
                ..default()
            },
            tonemapping: Tonemapping::BlenderFilmic,
            transform: rig.transform(),
            ..default()
        },
        Fxaa::default(),
        BloomSettings::NATURAL,
        rig,
    ));
}

fn keyboard_panning(mut query: Query<&mut TopDownCameraRig>, keyboard: Res<ButtonInput<KeyCode>>) {
    if let Ok(mut rig) = query.get_single_mut() {
        let mut input = Vec2::ZERO;

        if keyboard.pressed(KeyCode::KeyW) {
            input.y += 1.0;
        }
        if keyboard.pressed(KeyCode::KeyS) {
            input.y -= 1.0;
        }
        if keyboard.pressed(KeyCode::KeyA) {
            input.x -= 1.0;
        }
        if keyboard.pressed(KeyCode::KeyD) {
            input.x += 1.0;
        }

        rig.set_pan_input(input.normalize_or_zero());
    }
}

fn keyboard_rotating(
    mut query: Query<&mut TopDownCameraRig>,
    keyboard: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    time: Res<Time>,
) {
    if let Ok(mut rig) = query.get_single_mut() {
        let mut direction = 0.0f32;

        if keyboard.pressed(KeyCode::KeyQ) {
            direction += 1.0;
        }
        if keyboard.pressed(KeyCode::KeyE) {
            direction -= 1.0;
        }

        if direction != 0.0 {
            rig.add_rotation_input(direction * settings.camera.rotation_speed * time.delta_seconds());
        }
    }
}

fn mouse_zoom(mut query: Query<&mut TopDownCameraRig>, mut mouse_wheel: EventReader<MouseWheel>) {
    if let Ok(mut rig) = query.get_single_mut() {
        for scroll in mouse_wheel.read() {
            let amount = match scroll.unit {
                MouseScrollUnit::Line => scroll.y,
                MouseScrollUnit::Pixel => scroll.y / PIXELS_PER_SCROLL_LINE,
            };
            rig.add_zoom_input(amount);
        }
    }
}

fn mouse_rotating(
    mut query: Query<&mut TopDownCameraRig>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut motion: EventReader<MouseMotion>,
    settings: Res<Settings>,
) {
    let drag: f32 = motion.read().map(|event| event.delta.x).sum();

    if let Ok(mut rig) = query.get_single_mut() {
        if mouse.pressed(MouseButton::Middle) && drag != 0.0 {
            rig.add_rotation_input(-drag * settings.camera.mouse_rotate_sensitivity);
        }
    }
}

fn update_camera_rig(mut query: Query<(&mut Transform, &mut TopDownCameraRig)>, time: Res<Time>) {
    for (mut transform, mut rig) in &mut query {
        rig.update(time.delta_seconds());
        *transform = rig.transform();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> TopDownCameraRig {
        TopDownCameraRig::new(Vec3::ZERO, CameraSettings::default())
    }

    #[test]
    fn test_interp_to() {
        assert_eq!(interp_to(0.0, 10.0, 0.1, 5.0), 5.0);
        assert_eq!(interp_to(0.0, 10.0, 1.0, 5.0), 10.0);
        assert_eq!(interp_to(3.0, 10.0, 0.1, 0.0), 10.0);
        assert_eq!(interp_to(9.99999, 10.0, 0.01, 1.0), 10.0);
        assert_eq!(interp_vec2_to(Vec2::ZERO, Vec2::new(4.0, 0.0), 0.25, 2.0), Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut rig = rig();
        for _ in 0..100 {
            rig.add_zoom_input(1.0);
        }
        assert_eq!(rig.target_zoom(), 5.0);
        for _ in 0..100 {
            rig.add_zoom_input(-1.0);
        }
        assert_eq!(rig.target_zoom(), 30.0);
    }

    #[test]
    fn test_inverted_zoom_bounds_do_not_panic() {
        let settings = CameraSettings {
            min_zoom: 20.0,
            max_zoom: 10.0,
            ..default()
        };
        let mut rig = TopDownCameraRig::new(Vec3::ZERO, settings);
        assert_eq!(rig.zoom(), 10.0);
        rig.add_zoom_input(1.0);
        rig.add_zoom_input(-1.0);
        assert_eq!(rig.target_zoom(), 10.0);
    }

    #[test]
    fn test_zoom_speed_scales_with_distance() {
        let mut rig = rig();
        rig.add_zoom_input(1.0);
        // 15 units away: 2 * 15 / 10 = 3 per step.
        assert!((rig.target_zoom() - 12.0).abs() < 1e-4);

        let mut close = TopDownCameraRig::new(
            Vec3::ZERO,
            CameraSettings {
                min_zoom: 1.0,
                initial_zoom: 2.0,
                ..default()
            },
        );
        close.add_zoom_input(-0.5);
        // Floored at half the base speed.
        assert!((close.target_zoom() - 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_update_eases_towards_targets() {
        let mut rig = rig();
        rig.add_zoom_input(1.0);
        rig.add_rotation_input(90.0);
        rig.update(0.05);
        assert!(rig.zoom() < 15.0 && rig.zoom() > rig.target_zoom());
        assert!(rig.yaw() > 0.0 && rig.yaw() < 90.0);
        assert!(rig.is_moving());

        for _ in 0..200 {
            rig.update(0.05);
        }
        assert_eq!(rig.zoom(), rig.target_zoom());
        assert_eq!(rig.yaw(), 90.0);
    }

    #[test]
    fn test_pan_velocity_is_capped() {
        let mut rig = TopDownCameraRig::new(
            Vec3::ZERO,
            CameraSettings {
                pan_speed: 100.0,
                ..default()
            },
        );
        rig.set_pan_input(Vec2::Y);
        for _ in 0..100 {
            rig.update(0.1);
        }
        assert!((rig.pan_velocity().length() - 20.0).abs() < 1e-3);
        // Forward at zero yaw heads towards -z.
        assert!(rig.focus.z < 0.0);
    }

    #[test]
    fn test_release_halves_then_stops() {
        let mut rig = rig();
        rig.set_pan_input(Vec2::X);
        for _ in 0..100 {
            rig.update(0.1);
        }
        let moving = rig.pan_velocity();
        assert!((moving - Vec2::new(10.0, 0.0)).length() < 1e-3);

        rig.set_pan_input(Vec2::ZERO);
        assert_eq!(rig.pan_velocity(), moving * 0.5);

        rig.update(0.1);
        assert_eq!(rig.pan_velocity(), Vec2::ZERO);
        assert!(!rig.is_moving());
    }

    #[test]
    fn test_transform_looks_down_at_focus() {
        let rig = TopDownCameraRig::new(Vec3::new(5.0, 0.0, 5.0), CameraSettings::default());
        let transform = rig.transform();
        assert!(transform.translation.y > 0.0);
        assert!((transform.translation.distance(rig.focus) - 15.0).abs() < 1e-3);

        let forward = transform.forward().as_vec3();
        let to_focus = (rig.focus - transform.translation).normalize();
        assert!(forward.dot(to_focus) > 0.999);
    }
}
