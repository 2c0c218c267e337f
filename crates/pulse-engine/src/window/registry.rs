use std::cell::RefCell;
use std::rc::Rc;

use super::Window;

/// Live list of every window created through one `Platform`.
///
/// Windows are appended by their constructor in creation order. Closing a
/// window does not remove it; call `prune_closed` to drop closed windows.
/// Single-threaded: clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct WindowRegistry {
    instances: Rc<RefCell<Vec<Window>>>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&self, window: Window) {
        self.instances.borrow_mut().push(window);
    }

    pub fn len(&self) -> usize {
        self.instances.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Window> {
        self.instances.borrow().get(index).cloned()
    }

    /// Copy of the list in registration order.
    ///
    /// The loop iterates a snapshot so handlers may create windows while it
    /// pumps; those are picked up on the next tick.
    pub fn snapshot(&self) -> Vec<Window> {
        self.instances.borrow().clone()
    }

    pub fn any_open(&self) -> bool {
        self.snapshot().iter().any(Window::is_open)
    }

    /// Drops closed windows, keeping the order of the rest. Returns how many
    /// were removed.
    pub fn prune_closed(&self) -> usize {
        // `is_open` borrows the backend; evaluate before touching the list.
        let keep: Vec<bool> = self.snapshot().iter().map(Window::is_open).collect();
        let mut list = self.instances.borrow_mut();
        let before = list.len();
        let mut flags = keep.into_iter();
        list.retain(|_| flags.next().unwrap_or(true));
        before - list.len()
    }
}
