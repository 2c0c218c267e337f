use std::str::FromStr;

use crate::core::{EventContract, Signature};
use crate::error::ShellError;

/// Closed set of window lifecycle and input events.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EventKind {
    Draw,
    Resize,
    Close,
    KeyPress,
    KeyRelease,
    MousePress,
    MouseRelease,
    MouseMotion,
    MouseScroll,
    GainFocus,
    LoseFocus,
    Show,
    Hide,
}

impl EventKind {
    pub const ALL: [EventKind; 13] = [
        EventKind::Draw,
        EventKind::Resize,
        EventKind::Close,
        EventKind::KeyPress,
        EventKind::KeyRelease,
        EventKind::MousePress,
        EventKind::MouseRelease,
        EventKind::MouseMotion,
        EventKind::MouseScroll,
        EventKind::GainFocus,
        EventKind::LoseFocus,
        EventKind::Show,
        EventKind::Hide,
    ];
}

impl EventContract for EventKind {
    fn name(self) -> &'static str {
        match self {
            EventKind::Draw => "on_draw",
            EventKind::Resize => "on_resize",
            EventKind::Close => "on_close",
            EventKind::KeyPress => "on_key_press",
            EventKind::KeyRelease => "on_key_release",
            EventKind::MousePress => "on_mouse_press",
            EventKind::MouseRelease => "on_mouse_release",
            EventKind::MouseMotion => "on_mouse_motion",
            EventKind::MouseScroll => "on_mouse_scroll",
            EventKind::GainFocus => "on_gain_focus",
            EventKind::LoseFocus => "on_lose_focus",
            EventKind::Show => "on_show",
            EventKind::Hide => "on_hide",
        }
    }

    fn signature(self) -> Signature {
        match self {
            EventKind::Draw
            | EventKind::Close
            | EventKind::GainFocus
            | EventKind::LoseFocus
            | EventKind::Show
            | EventKind::Hide => Signature::Unit,
            EventKind::Resize => Signature::Size,
            EventKind::KeyPress | EventKind::KeyRelease => Signature::Key,
            EventKind::MousePress | EventKind::MouseRelease => Signature::Button,
            EventKind::MouseMotion => Signature::Cursor,
            EventKind::MouseScroll => Signature::Scroll,
        }
    }
}

impl FromStr for EventKind {
    type Err = ShellError;

    /// Accepts the event name with or without its `on_` prefix.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let bare = name.strip_prefix("on_").unwrap_or(name);
        EventKind::ALL
            .into_iter()
            .find(|k| &k.name()[3..] == bare)
            .ok_or_else(|| ShellError::UnknownEvent { name: name.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in EventKind::ALL {
            assert_eq!(kind.name().parse::<EventKind>(), Ok(kind));
        }
    }

    #[test]
    fn prefix_is_optional() {
        assert_eq!("draw".parse::<EventKind>(), Ok(EventKind::Draw));
        assert_eq!("mouse_scroll".parse::<EventKind>(), Ok(EventKind::MouseScroll));
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert_eq!(
            "on_update".parse::<EventKind>(),
            Err(ShellError::UnknownEvent { name: "on_update".into() })
        );
        assert!("on_".parse::<EventKind>().is_err());
    }

    #[test]
    fn draw_takes_no_arguments_and_press_takes_four() {
        assert_eq!(EventKind::Draw.signature().arity(), 0);
        assert_eq!(EventKind::MousePress.signature().arity(), 4);
        assert_eq!(EventKind::KeyRelease.signature(), Signature::Key);
    }
}
