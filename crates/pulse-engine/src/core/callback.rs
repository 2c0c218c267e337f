use std::fmt;
use std::time::Duration;

use crate::input::{Key, Modifiers, MouseButton};

/// Fixed parameter list of an event callback.
///
/// Every event kind has exactly one signature, known at compile time.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Signature {
    /// `()`
    Unit,
    /// `(dt)`
    Step,
    /// `(width, height)`
    Size,
    /// `(symbol, modifiers)`
    Key,
    /// `(x, y)`
    Cursor,
    /// `(x, y, button, modifiers)`
    Button,
    /// `(x, y, scroll_x, scroll_y)`
    Scroll,
}

impl Signature {
    /// Parameter names, in call order.
    pub const fn params(self) -> &'static [&'static str] {
        match self {
            Signature::Unit => &[],
            Signature::Step => &["dt"],
            Signature::Size => &["width", "height"],
            Signature::Key => &["symbol", "modifiers"],
            Signature::Cursor => &["x", "y"],
            Signature::Button => &["x", "y", "button", "modifiers"],
            Signature::Scroll => &["x", "y", "scroll_x", "scroll_y"],
        }
    }

    #[inline]
    pub const fn arity(self) -> usize {
        self.params().len()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.params().join(", "))
    }
}

/// A boxed event handler tagged with its signature.
///
/// Construct with the helper matching the event's parameters
/// (`Callback::unit`, `Callback::key`, ...). Registration rejects a callback
/// whose signature differs from the event's.
pub enum Callback {
    Unit(Box<dyn FnMut()>),
    Step(Box<dyn FnMut(Duration)>),
    Size(Box<dyn FnMut(u32, u32)>),
    Key(Box<dyn FnMut(Key, Modifiers)>),
    Cursor(Box<dyn FnMut(f64, f64)>),
    Button(Box<dyn FnMut(f64, f64, MouseButton, Modifiers)>),
    Scroll(Box<dyn FnMut(f64, f64, f64, f64)>),
}

impl Callback {
    pub fn unit(f: impl FnMut() + 'static) -> Self {
        Callback::Unit(Box::new(f))
    }

    pub fn step(f: impl FnMut(Duration) + 'static) -> Self {
        Callback::Step(Box::new(f))
    }

    pub fn size(f: impl FnMut(u32, u32) + 'static) -> Self {
        Callback::Size(Box::new(f))
    }

    pub fn key(f: impl FnMut(Key, Modifiers) + 'static) -> Self {
        Callback::Key(Box::new(f))
    }

    pub fn cursor(f: impl FnMut(f64, f64) + 'static) -> Self {
        Callback::Cursor(Box::new(f))
    }

    pub fn button(f: impl FnMut(f64, f64, MouseButton, Modifiers) + 'static) -> Self {
        Callback::Button(Box::new(f))
    }

    pub fn scroll(f: impl FnMut(f64, f64, f64, f64) + 'static) -> Self {
        Callback::Scroll(Box::new(f))
    }

    pub fn signature(&self) -> Signature {
        match self {
            Callback::Unit(_) => Signature::Unit,
            Callback::Step(_) => Signature::Step,
            Callback::Size(_) => Signature::Size,
            Callback::Key(_) => Signature::Key,
            Callback::Cursor(_) => Signature::Cursor,
            Callback::Button(_) => Signature::Button,
            Callback::Scroll(_) => Signature::Scroll,
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback{}", self.signature())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_counts_params() {
        assert_eq!(Signature::Unit.arity(), 0);
        assert_eq!(Signature::Step.arity(), 1);
        assert_eq!(Signature::Key.arity(), 2);
        assert_eq!(Signature::Button.arity(), 4);
    }

    #[test]
    fn signature_displays_param_list() {
        assert_eq!(Signature::Unit.to_string(), "()");
        assert_eq!(Signature::Scroll.to_string(), "(x, y, scroll_x, scroll_y)");
    }

    #[test]
    fn callback_reports_its_signature() {
        assert_eq!(Callback::unit(|| {}).signature(), Signature::Unit);
        assert_eq!(Callback::cursor(|_, _| {}).signature(), Signature::Cursor);
        assert_eq!(format!("{:?}", Callback::size(|_, _| {})), "Callback(width, height)");
    }
}
