//! Drawable content.
//!
//! A `Drawable` emits backend primitives (`Painter` calls) when asked to
//! draw. Drawables are shared as `Rc<RefCell<..>>` so a handler can move a
//! shape while a `Batch` keeps drawing it.

mod batch;
mod circle;
mod rect;

use std::cell::RefCell;
use std::rc::Rc;

use crate::backend::Painter;

pub use batch::Batch;
pub use circle::Circle;
pub use rect::Rectangle;

/// Shared drawable, as stored by a `Batch`.
pub type SharedDrawable = Rc<RefCell<dyn Drawable>>;

/// Anything that can draw itself with backend primitives.
pub trait Drawable {
    fn draw(&self, painter: &mut dyn Painter);

    /// Wraps the drawable for sharing and, when `batch` is given, adds it to
    /// that batch. This is the construction-time way of joining a batch;
    /// with `None` the caller draws the shape itself.
    fn into_shared(self, batch: Option<&mut Batch>) -> Rc<RefCell<Self>>
    where
        Self: Sized + 'static,
    {
        let shared = Rc::new(RefCell::new(self));
        if let Some(batch) = batch {
            batch.add(shared.clone());
        }
        shared
    }
}
