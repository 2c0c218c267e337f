use std::rc::Rc;

use crate::backend::Painter;

use super::SharedDrawable;

/// Set of drawables drawn together.
///
/// Drawables join through `Drawable::into_shared` and only then, so each
/// belongs to at most one batch. Membership is by identity. Members draw in
/// insertion order, so later members paint over earlier ones.
#[derive(Default)]
pub struct Batch {
    members: Vec<SharedDrawable>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `drawable` unless it is already a member. Returns whether it
    /// was inserted.
    pub(crate) fn add(&mut self, drawable: SharedDrawable) -> bool {
        if self.contains(&drawable) {
            return false;
        }
        self.members.push(drawable);
        true
    }

    pub fn contains(&self, drawable: &SharedDrawable) -> bool {
        self.members.iter().any(|m| same(m, drawable))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Draws every member.
    pub fn draw(&self, painter: &mut dyn Painter) {
        for member in &self.members {
            member.borrow().draw(painter);
        }
    }
}

// Data-pointer identity; vtable pointers of the same type may differ.
fn same(a: &SharedDrawable, b: &SharedDrawable) -> bool {
    std::ptr::eq(Rc::as_ptr(a).cast::<()>(), Rc::as_ptr(b).cast::<()>())
}

impl std::fmt::Debug for Batch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Batch").field("len", &self.members.len()).finish()
    }
}
