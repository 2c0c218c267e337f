use std::fmt;

use crate::backend::BackendError;
use crate::core::Signature;

/// Contract violations surfaced by registration and window construction.
///
/// Every variant is raised synchronously by the call that caused it. None of
/// them is retried or swallowed by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellError {
    /// The backend failed to initialize or to create a native window.
    BackendInit(BackendError),

    /// A window event name outside the fixed lifecycle/input set.
    UnknownEvent { name: String },

    /// An update event name other than the variable/fixed update kinds.
    InvalidEventKind { name: String },

    /// The event already has a handler; the first registration stays active.
    DuplicateRegistration { event: &'static str },

    /// The callback's parameter list disagrees with the event contract.
    ArityMismatch {
        event: &'static str,
        expected: Signature,
        actual: Signature,
    },
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::BackendInit(e) => write!(f, "backend initialization failed: {e}"),
            ShellError::UnknownEvent { name } => write!(f, "event {name} does not exist"),
            ShellError::InvalidEventKind { name } => write!(
                f,
                "{name} is not allowed, only on_update and on_fix_update are"
            ),
            ShellError::DuplicateRegistration { event } => {
                write!(f, "event {event} already registered")
            }
            ShellError::ArityMismatch { event, expected, actual } => write!(
                f,
                "{event} expects {} arguments {expected} but got {} {actual}",
                expected.arity(),
                actual.arity()
            ),
        }
    }
}

impl std::error::Error for ShellError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShellError::BackendInit(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BackendError> for ShellError {
    fn from(e: BackendError) -> Self {
        ShellError::BackendInit(e)
    }
}
