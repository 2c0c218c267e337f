use std::collections::HashSet;

use super::types::{Action, Key, Modifiers, MouseButton};

/// Current input state for a single window.
///
/// Updated from native events before the matching user handler runs, so a
/// handler already observes the state that includes its own event.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    /// Modifiers from the most recent key or button event.
    pub modifiers: Modifiers,

    /// Whether the window has keyboard focus.
    pub focused: bool,

    /// Last cursor position in window pixels, if the cursor has moved yet.
    pub cursor: Option<(f64, f64)>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    pub fn apply_key(&mut self, key: Key, action: Action, modifiers: Modifiers) {
        self.modifiers = modifiers;
        match action {
            Action::Press | Action::Repeat => {
                self.keys_down.insert(key);
            }
            Action::Release => {
                self.keys_down.remove(&key);
            }
        }
    }

    pub fn apply_button(&mut self, button: MouseButton, action: Action, modifiers: Modifiers) {
        self.modifiers = modifiers;
        match action {
            Action::Press | Action::Repeat => {
                self.buttons_down.insert(button);
            }
            Action::Release => {
                self.buttons_down.remove(&button);
            }
        }
    }

    pub fn apply_cursor(&mut self, x: f64, y: f64) {
        self.cursor = Some((x, y));
    }

    pub fn apply_focus(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            // Releases are not delivered to unfocused windows.
            self.keys_down.clear();
            self.buttons_down.clear();
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }
}
