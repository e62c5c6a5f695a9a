//! Keyboard and pointer state

use glam::Vec2;
use rustc_hash::FxHashSet;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Input state fed by the host window and read by game logic and overlays.
///
/// Whitelisted keys are left to the host: the handler ignores them so that,
/// for example, browser or OS shortcuts keep working.
#[derive(Debug, Default)]
pub struct Input {
    pressed_keys: FxHashSet<KeyCode>,
    just_pressed_keys: FxHashSet<KeyCode>,
    just_released_keys: FxHashSet<KeyCode>,
    pressed_mouse_buttons: FxHashSet<MouseButton>,
    just_pressed_mouse_buttons: FxHashSet<MouseButton>,
    whitelisted_keys: Vec<KeyCode>,
    /// Pointer position in window coordinates
    mouse_position: Vec2,
    /// Top-left of the game viewport in window coordinates
    viewport_origin: Vec2,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-tick state; call once after game logic has run
    pub fn end_frame(&mut self) {
        self.just_pressed_keys.clear();
        self.just_released_keys.clear();
        self.just_pressed_mouse_buttons.clear();
    }

    /// Process a keyboard event. Returns `false` for whitelisted keys, which
    /// are not consumed.
    pub fn process_keyboard(&mut self, key_code: KeyCode, state: ElementState) -> bool {
        if self.whitelisted_keys.contains(&key_code) {
            return false;
        }
        match state {
            ElementState::Pressed => {
                if self.pressed_keys.insert(key_code) {
                    self.just_pressed_keys.insert(key_code);
                }
            }
            ElementState::Released => {
                if self.pressed_keys.remove(&key_code) {
                    self.just_released_keys.insert(key_code);
                }
            }
        }
        true
    }

    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.pressed_mouse_buttons.insert(button) {
                    self.just_pressed_mouse_buttons.insert(button);
                }
            }
            ElementState::Released => {
                self.pressed_mouse_buttons.remove(&button);
            }
        }
    }

    /// Record the pointer position in window coordinates
    pub fn process_mouse_motion(&mut self, position: Vec2) {
        self.mouse_position = position;
    }

    /// Where the game viewport starts inside the window
    pub fn set_viewport_origin(&mut self, origin: Vec2) {
        self.viewport_origin = origin;
    }

    #[must_use]
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    #[must_use]
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed_keys.contains(&key)
    }

    #[must_use]
    pub fn is_key_just_released(&self, key: KeyCode) -> bool {
        self.just_released_keys.contains(&key)
    }

    #[must_use]
    pub fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.pressed_mouse_buttons.contains(&button)
    }

    #[must_use]
    pub fn is_mouse_button_just_pressed(&self, button: MouseButton) -> bool {
        self.just_pressed_mouse_buttons.contains(&button)
    }

    /// Held keys, sorted by name for stable display
    #[must_use]
    pub fn keys_down(&self) -> Vec<KeyCode> {
        let mut keys: Vec<KeyCode> = self.pressed_keys.iter().copied().collect();
        keys.sort_by_key(|key| format!("{key:?}"));
        keys
    }

    /// Pointer position in window coordinates
    #[must_use]
    pub fn mouse_absolute(&self) -> Vec2 {
        self.mouse_position
    }

    /// Pointer position in whole viewport pixels
    #[must_use]
    pub fn mouse_relative(&self) -> Vec2 {
        (self.mouse_position - self.viewport_origin).floor()
    }

    // -------------------------------------------------------------------------
    // Whitelist
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn whitelisted_keys(&self) -> &[KeyCode] {
        &self.whitelisted_keys
    }

    /// Stop handling `key`; a held key is released
    pub fn add_whitelisted_key(&mut self, key: KeyCode) {
        if !self.whitelisted_keys.contains(&key) {
            self.whitelisted_keys.push(key);
            self.pressed_keys.remove(&key);
        }
    }

    pub fn add_whitelisted_keys(&mut self, keys: impl IntoIterator<Item = KeyCode>) {
        for key in keys {
            self.add_whitelisted_key(key);
        }
    }

    pub fn remove_whitelisted_key(&mut self, key: KeyCode) {
        self.whitelisted_keys.retain(|k| *k != key);
    }

    pub fn remove_whitelisted_keys(&mut self, keys: impl IntoIterator<Item = KeyCode>) {
        for key in keys {
            self.remove_whitelisted_key(key);
        }
    }
}
