use std::collections::HashMap;
use std::hash::Hash;

use crate::error::ShellError;

use super::callback::{Callback, Signature};

/// A closed set of event kinds with a fixed signature each.
pub trait EventContract: Copy + Eq + Hash {
    /// Registration name, also used in log lines and errors.
    fn name(self) -> &'static str;

    fn signature(self) -> Signature;
}

/// At most one callback per event kind.
///
/// A bound slot stays occupied while its callback is out for dispatch, so a
/// handler cannot rebind its own event.
pub(crate) struct HandlerTable<K> {
    handlers: HashMap<K, Option<Callback>>,
}

impl<K: EventContract> HandlerTable<K> {
    pub(crate) fn new() -> Self {
        Self { handlers: HashMap::new() }
    }

    /// Binds `callback` to `kind`.
    ///
    /// Checks duplicates before the signature. On failure the table is left
    /// unchanged.
    pub(crate) fn register(&mut self, kind: K, callback: Callback) -> Result<(), ShellError> {
        if self.handlers.contains_key(&kind) {
            return Err(ShellError::DuplicateRegistration { event: kind.name() });
        }

        let actual = callback.signature();
        if actual != kind.signature() {
            return Err(ShellError::ArityMismatch {
                event: kind.name(),
                expected: kind.signature(),
                actual,
            });
        }

        log::info!("event {} registered", kind.name());
        self.handlers.insert(kind, Some(callback));
        Ok(())
    }

    pub(crate) fn contains(&self, kind: K) -> bool {
        self.handlers.contains_key(&kind)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.handlers.len()
    }

    pub(crate) fn get_mut(&mut self, kind: K) -> Option<&mut Callback> {
        self.handlers.get_mut(&kind).and_then(Option::as_mut)
    }

    /// Lends out the callback for a re-entrant dispatch. The slot stays
    /// bound until `restore`.
    pub(crate) fn take(&mut self, kind: K) -> Option<Callback> {
        self.handlers.get_mut(&kind).and_then(Option::take)
    }

    /// Returns a callback lent out by `take`.
    pub(crate) fn restore(&mut self, kind: K, callback: Callback) {
        self.handlers.insert(kind, Some(callback));
    }
}
