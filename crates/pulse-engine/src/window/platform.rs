use crate::backend::{Backend, GraphicsBackend};
use crate::error::ShellError;

use super::{Window, WindowConfig, WindowRegistry};

/// A backend together with the registry of windows created on it.
///
/// Windows and the `App` each keep a clone; every clone refers to the same
/// backend and registry.
#[derive(Debug, Clone)]
pub struct Platform {
    backend: Backend,
    windows: WindowRegistry,
}

impl Platform {
    pub fn new<B: GraphicsBackend + 'static>(backend: B) -> Self {
        Self::from_backend(Backend::new(backend))
    }

    pub fn from_backend(backend: Backend) -> Self {
        Self {
            backend,
            windows: WindowRegistry::new(),
        }
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn windows(&self) -> &WindowRegistry {
        &self.windows
    }

    /// Shorthand for `Window::new(self, config)`.
    pub fn create_window(&self, config: WindowConfig) -> Result<Window, ShellError> {
        Window::new(self, config)
    }

    /// Tears the backend down, closing every window.
    pub fn terminate(&self) {
        log::debug!("terminating backend");
        self.backend.with(|b| b.terminate());
    }
}
