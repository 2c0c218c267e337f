use std::fmt;

/// Keyboard key symbol delivered to `on_key_press` / `on_key_release`.
///
/// Keys are identified by physical position (US layout names). A French
/// AZERTY user pressing the key labelled `Z` produces `Key::W`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,
    Meta,

    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    /// Key with no variant here; carries the backend's raw code.
    Unknown(u32),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Unknown(code) => write!(f, "Unknown({code:#x})"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Press/release state reported by the backend for keys and mouse buttons.
///
/// `Repeat` is auto-repeat while a key is held; windows do not dispatch it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Action {
    Press,
    Release,
    Repeat,
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// Modifier keys held when an input event fired.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}
