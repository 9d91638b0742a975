// Input state tracking for keyboard and mouse
// Abstracts winit events into a queryable per-frame snapshot

use std::collections::HashSet;
use winit::event::{DeviceEvent, ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

#[derive(Default)]
pub struct InputState {
    // Keyboard
    keys_held: HashSet<KeyCode>,
    // Keys that went down this frame, reset in end_frame()
    keys_pressed: HashSet<KeyCode>,

    // Raw mouse motion accumulated this frame, reset in end_frame().
    // Comes from device events so it keeps working with a grabbed cursor.
    pub mouse_delta: (f32, f32),
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a winit WindowEvent into the input state.
    /// Call this once per event before the game's own event handling.
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed if !event.repeat => self.press(key),
                        ElementState::Pressed => {}
                        ElementState::Released => self.release(key),
                    }
                }
            }
            WindowEvent::Focused(false) => {
                // Releases are lost while unfocused; don't keep walking.
                self.keys_held.clear();
            }
            _ => {}
        }
    }

    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.mouse_delta.0 += delta.0 as f32;
            self.mouse_delta.1 += delta.1 as f32;
        }
    }

    pub fn press(&mut self, key: KeyCode) {
        if self.keys_held.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    pub fn release(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    /// Call once per frame after update() and render() have consumed input.
    /// Resets per-frame accumulators.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_delta = (0.0, 0.0);
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// True only on the frame the key went down.
    pub fn was_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_edge_triggered() {
        let mut input = InputState::new();
        input.press(KeyCode::KeyR);
        assert!(input.was_key_pressed(KeyCode::KeyR));
        assert!(input.is_key_held(KeyCode::KeyR));

        input.end_frame();
        input.press(KeyCode::KeyR);
        assert!(!input.was_key_pressed(KeyCode::KeyR));
        assert!(input.is_key_held(KeyCode::KeyR));

        input.release(KeyCode::KeyR);
        assert!(!input.is_key_held(KeyCode::KeyR));
    }

    #[test]
    fn mouse_motion_accumulates_until_end_of_frame() {
        let mut input = InputState::new();
        input.process_device_event(&DeviceEvent::MouseMotion { delta: (3.0, -1.0) });
        input.process_device_event(&DeviceEvent::MouseMotion { delta: (2.0, 4.0) });
        assert_eq!(input.mouse_delta, (5.0, 3.0));
        input.end_frame();
        assert_eq!(input.mouse_delta, (0.0, 0.0));
    }
}
