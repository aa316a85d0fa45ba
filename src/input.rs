use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::Instant;

use glium::glutin::event::{DeviceEvent, ElementState, KeyboardInput, VirtualKeyCode, WindowEvent};

use crate::camera::Movement;
use crate::float::*;

static MOVEMENT_KEYS: [(VirtualKeyCode, Movement); 6] = [
    (VirtualKeyCode::W, Movement::Forward),
    (VirtualKeyCode::S, Movement::Backward),
    (VirtualKeyCode::A, Movement::Left),
    (VirtualKeyCode::D, Movement::Right),
    (VirtualKeyCode::Space, Movement::Up),
    (VirtualKeyCode::LShift, Movement::Down),
];

/// One-shot commands bound to a key press
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    Faster,
    Slower,
    PrintCamera,
    ReloadShaders,
    Screenshot,
}

impl Action {
    pub fn from_key(key: VirtualKeyCode) -> Option<Action> {
        match key {
            VirtualKeyCode::Escape => Some(Action::Quit),
            VirtualKeyCode::Up => Some(Action::Faster),
            VirtualKeyCode::Down => Some(Action::Slower),
            VirtualKeyCode::C => Some(Action::PrintCamera),
            VirtualKeyCode::R => Some(Action::ReloadShaders),
            VirtualKeyCode::F12 => Some(Action::Screenshot),
            _ => None,
        }
    }
}

#[derive(Default)]
pub struct InputState {
    /// Currently pressed keys with the time of the press
    pub key_presses: HashMap<VirtualKeyCode, Instant>,
    /// Does the window have focus
    pub focused: bool,
}

impl InputState {
    /// Get a new empty input state
    pub fn new() -> InputState {
        InputState {
            focused: true,
            ..Default::default()
        }
    }

    /// Update the state with a window event.
    /// Returns the key if the event started a new press, key repeat does not count.
    pub fn update_window(&mut self, event: &WindowEvent<'_>) -> Option<VirtualKeyCode> {
        match *event {
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        state,
                        virtual_keycode: Some(key),
                        ..
                    },
                ..
            } => {
                if self.update_key(key, state) {
                    return Some(key);
                }
            }
            WindowEvent::Focused(focused) => {
                self.focused = focused;
                if !focused {
                    self.key_presses.clear();
                }
            }
            _ => (),
        }
        None
    }

    /// Mouse motion of a raw device event in pixels.
    /// Motion while the window is unfocused is dropped.
    pub fn update_device(&mut self, event: &DeviceEvent) -> Option<(Float, Float)> {
        match *event {
            DeviceEvent::MouseMotion { delta: (dx, dy) } if self.focused => {
                Some((dx.to_float(), dy.to_float()))
            }
            _ => None,
        }
    }

    /// Returns true for the first press of a key
    fn update_key(&mut self, key: VirtualKeyCode, state: ElementState) -> bool {
        match state {
            ElementState::Pressed => match self.key_presses.entry(key) {
                Entry::Occupied(_) => false,
                Entry::Vacant(entry) => {
                    entry.insert(Instant::now());
                    true
                }
            },
            ElementState::Released => {
                self.key_presses.remove(&key);
                false
            }
        }
    }

    pub fn is_pressed(&self, key: VirtualKeyCode) -> bool {
        self.key_presses.contains_key(&key)
    }

    /// Camera movements requested by the currently held keys
    pub fn movements(&self) -> impl Iterator<Item = Movement> + '_ {
        MOVEMENT_KEYS
            .iter()
            .filter(move |(key, _)| self.is_pressed(*key))
            .map(|(_, movement)| *movement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::consts;
    use cgmath::Deg;

    #[allow(deprecated)]
    fn key_event(key: VirtualKeyCode, state: ElementState) -> WindowEvent<'static> {
        WindowEvent::KeyboardInput {
            device_id: unsafe { glium::glutin::event::DeviceId::dummy() },
            input: KeyboardInput {
                scancode: 0,
                state,
                virtual_keycode: Some(key),
                modifiers: Default::default(),
            },
            is_synthetic: false,
        }
    }

    #[test]
    fn held_keys_map_to_movements() {
        let mut input = InputState::new();
        input.update_window(&key_event(VirtualKeyCode::W, ElementState::Pressed));
        input.update_window(&key_event(VirtualKeyCode::LShift, ElementState::Pressed));
        input.update_window(&key_event(VirtualKeyCode::Q, ElementState::Pressed));
        let movements: Vec<_> = input.movements().collect();
        assert_eq!(movements, vec![Movement::Forward, Movement::Down]);

        input.update_window(&key_event(VirtualKeyCode::W, ElementState::Released));
        let movements: Vec<_> = input.movements().collect();
        assert_eq!(movements, vec![Movement::Down]);
    }

    #[test]
    fn repeated_press_keeps_first_time() {
        let mut input = InputState::new();
        input.update_window(&key_event(VirtualKeyCode::A, ElementState::Pressed));
        let first = input.key_presses[&VirtualKeyCode::A];
        input.update_window(&key_event(VirtualKeyCode::A, ElementState::Pressed));
        assert_eq!(input.key_presses[&VirtualKeyCode::A], first);
    }

    #[test]
    fn key_repeat_is_reported_once() {
        let mut input = InputState::new();
        let up = key_event(VirtualKeyCode::Up, ElementState::Pressed);
        assert_eq!(input.update_window(&up), Some(VirtualKeyCode::Up));
        assert_eq!(input.update_window(&up), None);
        assert_eq!(input.update_window(&up), None);
        assert!(input.is_pressed(VirtualKeyCode::Up));

        let release = key_event(VirtualKeyCode::Up, ElementState::Released);
        assert_eq!(input.update_window(&release), None);
        assert_eq!(input.update_window(&up), Some(VirtualKeyCode::Up));
    }

    #[test]
    fn key_press_after_focus_loss_is_new() {
        let mut input = InputState::new();
        let down = key_event(VirtualKeyCode::Down, ElementState::Pressed);
        assert_eq!(input.update_window(&down), Some(VirtualKeyCode::Down));
        input.update_window(&WindowEvent::Focused(false));
        input.update_window(&WindowEvent::Focused(true));
        assert_eq!(input.update_window(&down), Some(VirtualKeyCode::Down));
    }

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(Action::from_key(VirtualKeyCode::Escape), Some(Action::Quit));
        assert_eq!(Action::from_key(VirtualKeyCode::Up), Some(Action::Faster));
        assert_eq!(Action::from_key(VirtualKeyCode::Down), Some(Action::Slower));
        assert_eq!(Action::from_key(VirtualKeyCode::C), Some(Action::PrintCamera));
        assert_eq!(Action::from_key(VirtualKeyCode::R), Some(Action::ReloadShaders));
        assert_eq!(Action::from_key(VirtualKeyCode::F12), Some(Action::Screenshot));
        for (key, _) in &MOVEMENT_KEYS {
            assert_eq!(Action::from_key(*key), None);
        }
    }

    #[test]
    fn escape_press_quits() {
        let mut input = InputState::new();
        let escape = key_event(VirtualKeyCode::Escape, ElementState::Pressed);
        let pressed = input.update_window(&escape);
        assert_eq!(pressed.and_then(Action::from_key), Some(Action::Quit));
    }

    #[test]
    fn mouse_motion_is_reported_per_event() {
        let mut input = InputState::new();
        let motion = DeviceEvent::MouseMotion { delta: (3.0, -1.0) };
        assert_eq!(input.update_device(&motion), Some((3.0, -1.0)));
        assert_eq!(input.update_device(&DeviceEvent::Added), None);
    }

    #[test]
    fn pitch_clamps_between_motion_events() {
        let mut input = InputState::new();
        let mut camera = Camera::default();
        camera.look(0.0, 800.0);
        let (start, _) = camera.angles();
        assert!((start.0 - 170.0).abs() < 1e-3);
        // Both events arrive within one frame, the first one runs into the limit
        for delta in &[(0.0, 200.0), (0.0, -100.0)] {
            let event = DeviceEvent::MouseMotion { delta: *delta };
            if let Some((dx, dy)) = input.update_device(&event) {
                camera.look(dx, dy);
            }
        }
        let (phi, _) = camera.angles();
        assert!((phi.0 - (consts::MAX_PHI - 10.0)).abs() < 1e-3, "{:?}", phi);
        assert!(phi < Deg(consts::MAX_PHI));
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut input = InputState::new();
        input.update_window(&key_event(VirtualKeyCode::D, ElementState::Pressed));
        input.update_window(&WindowEvent::Focused(false));
        assert_eq!(input.movements().count(), 0);
        let motion = DeviceEvent::MouseMotion { delta: (3.0, 3.0) };
        assert_eq!(input.update_device(&motion), None);
    }
}
