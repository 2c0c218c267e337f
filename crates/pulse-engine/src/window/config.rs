/// What happens when the user closes a window that has no `on_close` handler.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum ClosePolicy {
    /// Destroy only the window that received the close request.
    CloseThisWindowOnly,

    /// Destroy the window, then terminate the backend. This closes every
    /// other window of the process as well.
    #[default]
    ShutdownProcess,
}

/// Window creation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub close_policy: ClosePolicy,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Window".to_string(),
            close_policy: ClosePolicy::default(),
        }
    }
}

impl WindowConfig {
    pub fn new(width: u32, height: u32, title: impl Into<String>) -> Self {
        Self {
            width,
            height,
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn close_policy(mut self, policy: ClosePolicy) -> Self {
        self.close_policy = policy;
        self
    }
}
