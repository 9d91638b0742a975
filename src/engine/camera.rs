// First-person camera
//
// Camera model:
//   - The eye sits at the agent's position; the camera only owns orientation
//   - Yaw/pitch from mouse motion, pitch clamped short of straight up/down
//   - WASD produces a desired displacement on the XZ plane relative to the
//     facing direction; the collision resolver decides where the agent ends up

use glam::{Mat4, Vec2, Vec3};
use super::input::InputState;
use winit::keyboard::KeyCode;

const MAX_PITCH: f32 = 89.0_f32 * std::f32::consts::PI / 180.0;

pub struct FirstPersonCamera {
    /// Horizontal rotation in radians (0 = looking along +X, PI/2 = along +Z)
    pub yaw: f32,

    /// Elevation angle in radians, clamped to ±89°
    pitch: f32,

    /// Vertical field of view in radians
    pub fov: f32,
    pub near: f32,
    pub far: f32,

    /// Walking speed in world units per second
    pub move_speed: f32,

    /// Radians of rotation per pixel of mouse motion
    pub sensitivity: f32,

    /// When false, mouse motion is ignored (cursor released for the overlay)
    pub mouse_look: bool,
}

impl FirstPersonCamera {
    pub fn new(move_speed: f32, sensitivity_deg: f32) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            fov: 60.0_f32.to_radians(),
            near: 0.05,
            far: 500.0,
            move_speed,
            sensitivity: sensitivity_deg.to_radians(),
            mouse_look: true,
        }
    }

    /// Apply this frame's mouse motion to yaw/pitch.
    pub fn update_look(&mut self, input: &InputState) {
        if !self.mouse_look {
            return;
        }
        let (dx, dy) = input.mouse_delta;
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch - dy * self.sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Desired XZ displacement for this frame from WASD.
    /// Diagonals are normalized so they are not faster than straight moves.
    pub fn desired_delta(&self, input: &InputState, dt: f32) -> Vec2 {
        let forward = Vec2::new(self.yaw.cos(), self.yaw.sin());
        let right = Vec2::new(-self.yaw.sin(), self.yaw.cos());

        let mut move_dir = Vec2::ZERO;

        if input.is_key_held(KeyCode::KeyW) { move_dir += forward; }
        if input.is_key_held(KeyCode::KeyS) { move_dir -= forward; }
        if input.is_key_held(KeyCode::KeyD) { move_dir += right; }
        if input.is_key_held(KeyCode::KeyA) { move_dir -= right; }

        move_dir.normalize_or_zero() * self.move_speed * dt
    }

    /// Unit view direction.
    pub fn front(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
    }

    /// Turn to face `dir` on the XZ plane (pitch reset to level).
    pub fn look_along(&mut self, dir: Vec2) {
        if dir != Vec2::ZERO {
            self.yaw = dir.y.atan2(dir.x);
            self.pitch = 0.0;
        }
    }

    pub fn view_matrix(&self, eye: Vec3) -> Mat4 {
        Mat4::look_to_rh(eye, self.front(), Vec3::Y)
    }

    /// Perspective projection matrix.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }

    /// Combined view-projection matrix ready to upload to the GPU.
    pub fn view_projection(&self, eye: Vec3, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix(eye)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn forward_follows_yaw() {
        let mut camera = FirstPersonCamera::new(2.0, 0.1);
        let mut input = InputState::new();
        input.press(KeyCode::KeyW);

        let d = camera.desired_delta(&input, 0.5);
        assert_relative_eq!(d.x, 1.0);
        assert_relative_eq!(d.y, 0.0);

        camera.yaw = std::f32::consts::FRAC_PI_2;
        let d = camera.desired_delta(&input, 0.5);
        assert_relative_eq!(d.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(d.y, 1.0);
    }

    #[test]
    fn diagonal_is_not_faster() {
        let camera = FirstPersonCamera::new(2.5, 0.1);
        let mut input = InputState::new();
        input.press(KeyCode::KeyW);
        input.press(KeyCode::KeyD);
        assert_relative_eq!(camera.desired_delta(&input, 1.0).length(), 2.5, epsilon = 1e-6);
    }

    #[test]
    fn opposite_keys_cancel() {
        let camera = FirstPersonCamera::new(2.5, 0.1);
        let mut input = InputState::new();
        input.press(KeyCode::KeyA);
        input.press(KeyCode::KeyD);
        assert_eq!(camera.desired_delta(&input, 1.0), Vec2::ZERO);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = FirstPersonCamera::new(2.5, 1.0);
        let mut input = InputState::new();
        input.mouse_delta = (0.0, -10_000.0);
        camera.update_look(&input);
        assert_relative_eq!(camera.pitch, MAX_PITCH);
        assert!(camera.front().y < 1.0);
    }

    #[test]
    fn look_along_sets_yaw() {
        let mut camera = FirstPersonCamera::new(2.5, 0.1);
        camera.look_along(Vec2::new(0.0, -3.0));
        let f = camera.front();
        assert_relative_eq!(f.z, -1.0);
        assert_relative_eq!(f.x, 0.0, epsilon = 1e-6);
    }
}
