use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use crate::paint::Color;
use crate::window::WindowConfig;

use super::{BackendError, GraphicsBackend, NativeEvent, NativeHandle, Painter, PrimitiveKind};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    CreateWindow {
        handle: NativeHandle,
        width: u32,
        height: u32,
        title: String,
    },
    DestroyWindow(NativeHandle),
    Terminate,
    MakeContextCurrent(NativeHandle),
    SetProjection {
        handle: NativeHandle,
        width: u32,
        height: u32,
    },
    SwapBuffers(NativeHandle),
    PollEvents,
    SetWindowSize {
        handle: NativeHandle,
        width: u32,
        height: u32,
    },
    SetWindowPos {
        handle: NativeHandle,
        x: i32,
        y: i32,
    },
    SetWindowTitle {
        handle: NativeHandle,
        title: String,
    },
    Clear(Color),
    SetColor(Color),
    Begin(PrimitiveKind),
    Vertex(f32, f32),
    End,
}

#[derive(Debug, Default)]
struct Recorder {
    calls: Vec<BackendCall>,
    next_handle: u64,
    open: BTreeSet<NativeHandle>,

    /// Injected, not yet delivered by `poll_events`.
    injected: Vec<(NativeHandle, NativeEvent)>,
    /// Delivered by `poll_events`, waiting for `drain_events`.
    delivered: HashMap<NativeHandle, Vec<NativeEvent>>,

    cursor: HashMap<NativeHandle, (f64, f64)>,
    fail_create: Option<String>,
}

/// In-memory backend that records every call.
///
/// Clones share one recorder, so a test keeps a handle while the `Platform`
/// owns another. Injected events stay queued until the next `poll_events`,
/// which is when a real backend would fire its native callbacks.
#[derive(Debug, Clone, Default)]
pub struct HeadlessBackend {
    inner: Rc<RefCell<Recorder>>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `create_window` fail with `message`.
    pub fn fail_window_creation(&self, message: impl Into<String>) {
        self.inner.borrow_mut().fail_create = Some(message.into());
    }

    /// Queues `event` for `handle`; it is delivered by the next `poll_events`.
    pub fn inject(&self, handle: NativeHandle, event: NativeEvent) {
        self.inner.borrow_mut().injected.push((handle, event));
    }

    /// Sets the position `cursor_position` reports for `handle`.
    pub fn set_cursor(&self, handle: NativeHandle, x: f64, y: f64) {
        self.inner.borrow_mut().cursor.insert(handle, (x, y));
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.inner.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.borrow_mut().calls.clear();
    }

    /// Handles of the windows currently alive, in creation order.
    pub fn open_windows(&self) -> Vec<NativeHandle> {
        self.inner.borrow().open.iter().copied().collect()
    }

    fn record(&self, call: BackendCall) {
        self.inner.borrow_mut().calls.push(call);
    }
}

impl Painter for HeadlessBackend {
    fn clear(&mut self, color: Color) {
        self.record(BackendCall::Clear(color));
    }

    fn set_color(&mut self, color: Color) {
        self.record(BackendCall::SetColor(color));
    }

    fn begin(&mut self, kind: PrimitiveKind) {
        self.record(BackendCall::Begin(kind));
    }

    fn vertex(&mut self, x: f32, y: f32) {
        self.record(BackendCall::Vertex(x, y));
    }

    fn end(&mut self) {
        self.record(BackendCall::End);
    }
}

impl GraphicsBackend for HeadlessBackend {
    fn create_window(&mut self, config: &WindowConfig) -> Result<NativeHandle, BackendError> {
        let mut rec = self.inner.borrow_mut();
        if let Some(msg) = &rec.fail_create {
            return Err(BackendError::new(msg.clone()));
        }

        rec.next_handle += 1;
        let handle = NativeHandle(rec.next_handle);
        rec.open.insert(handle);
        rec.calls.push(BackendCall::CreateWindow {
            handle,
            width: config.width,
            height: config.height,
            title: config.title.clone(),
        });
        Ok(handle)
    }

    fn destroy_window(&mut self, handle: NativeHandle) {
        let mut rec = self.inner.borrow_mut();
        rec.open.remove(&handle);
        rec.delivered.remove(&handle);
        rec.calls.push(BackendCall::DestroyWindow(handle));
    }

    fn window_exists(&self, handle: NativeHandle) -> bool {
        self.inner.borrow().open.contains(&handle)
    }

    fn terminate(&mut self) {
        let mut rec = self.inner.borrow_mut();
        rec.open.clear();
        rec.delivered.clear();
        rec.injected.clear();
        rec.calls.push(BackendCall::Terminate);
    }

    fn make_context_current(&mut self, handle: NativeHandle) {
        self.record(BackendCall::MakeContextCurrent(handle));
    }

    fn set_projection(&mut self, handle: NativeHandle, width: u32, height: u32) {
        self.record(BackendCall::SetProjection { handle, width, height });
    }

    fn swap_buffers(&mut self, handle: NativeHandle) {
        self.record(BackendCall::SwapBuffers(handle));
    }

    fn poll_events(&mut self) {
        let mut rec = self.inner.borrow_mut();
        rec.calls.push(BackendCall::PollEvents);

        let injected = std::mem::take(&mut rec.injected);
        for (handle, event) in injected {
            if rec.open.contains(&handle) {
                rec.delivered.entry(handle).or_default().push(event);
            }
        }
    }

    fn drain_events(&mut self, handle: NativeHandle) -> Vec<NativeEvent> {
        self.inner
            .borrow_mut()
            .delivered
            .remove(&handle)
            .unwrap_or_default()
    }

    fn set_window_size(&mut self, handle: NativeHandle, width: u32, height: u32) {
        self.record(BackendCall::SetWindowSize { handle, width, height });
    }

    fn set_window_pos(&mut self, handle: NativeHandle, x: i32, y: i32) {
        self.record(BackendCall::SetWindowPos { handle, x, y });
    }

    fn set_window_title(&mut self, handle: NativeHandle, title: &str) {
        self.record(BackendCall::SetWindowTitle {
            handle,
            title: title.to_string(),
        });
    }

    fn cursor_position(&self, handle: NativeHandle) -> (f64, f64) {
        self.inner
            .borrow()
            .cursor
            .get(&handle)
            .copied()
            .unwrap_or((0.0, 0.0))
    }

    fn as_painter(&mut self) -> &mut dyn Painter {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique_and_tracked() {
        let mut b = HeadlessBackend::new();
        let a = b.create_window(&WindowConfig::default()).unwrap();
        let c = b.create_window(&WindowConfig::default()).unwrap();
        assert_ne!(a, c);
        assert_eq!(b.open_windows(), vec![a, c]);

        b.destroy_window(a);
        assert!(!b.window_exists(a));
        assert!(b.window_exists(c));
    }

    #[test]
    fn injected_events_wait_for_poll() {
        let mut b = HeadlessBackend::new();
        let h = b.create_window(&WindowConfig::default()).unwrap();
        b.inject(h, NativeEvent::Close);
        assert!(b.drain_events(h).is_empty());

        b.poll_events();
        assert_eq!(b.drain_events(h), vec![NativeEvent::Close]);
        assert!(b.drain_events(h).is_empty());
    }

    #[test]
    fn terminate_closes_everything() {
        let mut b = HeadlessBackend::new();
        let h = b.create_window(&WindowConfig::default()).unwrap();
        b.terminate();
        assert!(!b.window_exists(h));
        assert_eq!(b.calls().last(), Some(&BackendCall::Terminate));
    }

    #[test]
    fn creation_failure_is_reported() {
        let mut b = HeadlessBackend::new();
        b.fail_window_creation("no display");
        let err = b.create_window(&WindowConfig::default()).unwrap_err();
        assert_eq!(err.message, "no display");
    }

    #[test]
    fn clones_share_the_recording() {
        let b = HeadlessBackend::new();
        let mut other = b.clone();
        other.set_color(Color::RED);
        assert_eq!(b.calls(), vec![BackendCall::SetColor(Color::RED)]);
    }
}
