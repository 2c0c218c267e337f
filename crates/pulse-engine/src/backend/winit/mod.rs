//! Desktop backend: winit windows, wgpu drawing.
//!
//! The event loop is never handed over to winit. `poll_events` pumps it with
//! a zero timeout, translating every window event into `NativeEvent`s queued
//! per window. Painting goes into a per-window `PrimitiveBatcher`; the batch
//! is rendered and presented by `swap_buffers`.

mod gpu;
mod renderer;
mod translate;

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Context;
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalPosition, LogicalSize, PhysicalSize};
use winit::event::{MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::coords::Viewport;
use crate::input::Modifiers;
use crate::paint::Color;
use crate::window::WindowConfig;

use super::{
    BackendError, GraphicsBackend, NativeEvent, NativeHandle, Painter, PrimitiveBatcher,
    PrimitiveKind,
};

use gpu::Gpu;
pub use gpu::GpuInit;
use renderer::ImmediateRenderer;

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct WindowSlot {
    entry: WindowEntry,
    batcher: PrimitiveBatcher,
    renderer: ImmediateRenderer,
    projection: Viewport,

    /// Logical pixels.
    cursor: (f64, f64),
    modifiers: Modifiers,
    maximized: bool,
    minimized: bool,
}

/// `GraphicsBackend` for desktop platforms.
///
/// Must be created on the main thread. Each window gets its own wgpu device
/// and surface. Coordinates exchanged with the core are logical pixels.
pub struct WinitBackend {
    event_loop: EventLoop<()>,
    gpu_init: GpuInit,

    slots: HashMap<NativeHandle, WindowSlot>,
    ids: HashMap<WindowId, NativeHandle>,
    inbox: HashMap<NativeHandle, Vec<NativeEvent>>,

    current: Option<NativeHandle>,
    /// Sink for painting while no window is current.
    detached: PrimitiveBatcher,

    next_handle: u64,
    terminated: bool,
}

impl WinitBackend {
    pub fn new() -> Result<Self, BackendError> {
        Self::with_gpu_init(GpuInit::default())
    }

    pub fn with_gpu_init(gpu_init: GpuInit) -> Result<Self, BackendError> {
        let event_loop = EventLoop::new()
            .context("failed to create winit EventLoop")
            .map_err(to_backend_error)?;

        Ok(Self {
            event_loop,
            gpu_init,
            slots: HashMap::new(),
            ids: HashMap::new(),
            inbox: HashMap::new(),
            current: None,
            detached: PrimitiveBatcher::new(),
            next_handle: 0,
            terminated: false,
        })
    }

    fn open_window(&mut self, config: &WindowConfig) -> anyhow::Result<WindowSlot> {
        anyhow::ensure!(!self.terminated, "backend was terminated");

        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width as f64, config.height as f64));

        // Windows are created outside of the application handler, between pumps.
        #[allow(deprecated)]
        let window = self
            .event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        Ok(WindowSlot {
            entry,
            batcher: PrimitiveBatcher::new(),
            renderer: ImmediateRenderer::default(),
            projection: Viewport::new(config.width as f32, config.height as f32),
            cursor: (0.0, 0.0),
            modifiers: Modifiers::NONE,
            maximized: false,
            minimized: false,
        })
    }

    fn painter(&mut self) -> &mut PrimitiveBatcher {
        match self.current.and_then(|h| self.slots.get_mut(&h)) {
            Some(slot) => &mut slot.batcher,
            None => &mut self.detached,
        }
    }

    fn with_window(&self, handle: NativeHandle, f: impl FnOnce(&Window)) {
        if let Some(slot) = self.slots.get(&handle) {
            slot.entry.with_window(|w| f(w));
        }
    }
}

fn to_backend_error(e: anyhow::Error) -> BackendError {
    BackendError::new(format!("{e:#}"))
}

impl Painter for WinitBackend {
    fn clear(&mut self, color: Color) {
        self.painter().clear(color);
    }

    fn set_color(&mut self, color: Color) {
        self.painter().set_color(color);
    }

    fn begin(&mut self, kind: PrimitiveKind) {
        self.painter().begin(kind);
    }

    fn vertex(&mut self, x: f32, y: f32) {
        self.painter().vertex(x, y);
    }

    fn end(&mut self) {
        self.painter().end();
    }
}

impl GraphicsBackend for WinitBackend {
    fn create_window(&mut self, config: &WindowConfig) -> Result<NativeHandle, BackendError> {
        let slot = self.open_window(config).map_err(to_backend_error)?;

        self.next_handle += 1;
        let handle = NativeHandle(self.next_handle);
        let id = slot.entry.with_window(|w| w.id());

        self.ids.insert(id, handle);
        self.slots.insert(handle, slot);
        Ok(handle)
    }

    fn destroy_window(&mut self, handle: NativeHandle) {
        // Dropping the entry releases the surface before the window.
        if self.slots.remove(&handle).is_some() {
            self.ids.retain(|_, h| *h != handle);
            self.inbox.remove(&handle);
            if self.current == Some(handle) {
                self.current = None;
            }
        }
    }

    fn window_exists(&self, handle: NativeHandle) -> bool {
        self.slots.contains_key(&handle)
    }

    fn terminate(&mut self) {
        self.slots.clear();
        self.ids.clear();
        self.inbox.clear();
        self.current = None;
        self.terminated = true;
    }

    fn make_context_current(&mut self, handle: NativeHandle) {
        if self.slots.contains_key(&handle) {
            self.current = Some(handle);
        }
    }

    fn set_projection(&mut self, handle: NativeHandle, width: u32, height: u32) {
        if let Some(slot) = self.slots.get_mut(&handle) {
            slot.projection = Viewport::new(width as f32, height as f32);
        }
    }

    fn swap_buffers(&mut self, handle: NativeHandle) {
        let Some(slot) = self.slots.get_mut(&handle) else { return };
        let WindowSlot {
            entry,
            batcher,
            renderer,
            projection,
            ..
        } = slot;

        let (vertices, clear) = batcher.finish();
        let result = entry.with_gpu(|gpu| renderer.render(gpu, *projection, clear, &vertices));

        if let Err(err) = result {
            let recovered = entry.with_gpu_mut(|gpu| gpu.recover(err.clone()));
            if recovered {
                log::debug!("window {handle}: frame skipped ({err})");
            } else {
                log::error!("window {handle}: surface error: {err}");
            }
        }
    }

    fn poll_events(&mut self) {
        if self.terminated {
            return;
        }

        let mut pump = Pump {
            ids: &self.ids,
            slots: &mut self.slots,
            inbox: &mut self.inbox,
        };

        if let PumpStatus::Exit(code) =
            self.event_loop.pump_app_events(Some(Duration::ZERO), &mut pump)
        {
            log::debug!("event loop exited with code {code}");
        }
    }

    fn drain_events(&mut self, handle: NativeHandle) -> Vec<NativeEvent> {
        self.inbox.remove(&handle).unwrap_or_default()
    }

    fn set_window_size(&mut self, handle: NativeHandle, width: u32, height: u32) {
        self.with_window(handle, |w| {
            let _ = w.request_inner_size(LogicalSize::new(width as f64, height as f64));
        });
    }

    fn set_window_pos(&mut self, handle: NativeHandle, x: i32, y: i32) {
        self.with_window(handle, |w| {
            w.set_outer_position(LogicalPosition::new(x as f64, y as f64));
        });
    }

    fn set_window_title(&mut self, handle: NativeHandle, title: &str) {
        self.with_window(handle, |w| w.set_title(title));
    }

    fn cursor_position(&self, handle: NativeHandle) -> (f64, f64) {
        self.slots.get(&handle).map_or((0.0, 0.0), |s| s.cursor)
    }

    fn as_painter(&mut self) -> &mut dyn Painter {
        self
    }
}

/// Application handler for one `pump_app_events` call.
struct Pump<'a> {
    ids: &'a HashMap<WindowId, NativeHandle>,
    slots: &'a mut HashMap<NativeHandle, WindowSlot>,
    inbox: &'a mut HashMap<NativeHandle, Vec<NativeEvent>>,
}

impl Pump<'_> {
    fn push(&mut self, handle: NativeHandle, event: NativeEvent) {
        self.inbox.entry(handle).or_default().push(event);
    }

    /// Reports maximize/minimize transitions, which winit only exposes as
    /// window state after a resize.
    fn push_state_changes(&mut self, handle: NativeHandle) {
        let Some(slot) = self.slots.get_mut(&handle) else { return };
        let (maximized, minimized) = slot
            .entry
            .with_window(|w| (w.is_maximized(), w.is_minimized().unwrap_or(false)));

        let mut events = Vec::new();
        if minimized != slot.minimized {
            slot.minimized = minimized;
            events.push(NativeEvent::Iconify(minimized));
        }
        if maximized != slot.maximized {
            slot.maximized = maximized;
            events.push(NativeEvent::Maximize(maximized));
        }
        for e in events {
            self.push(handle, e);
        }
    }
}

impl ApplicationHandler for Pump<'_> {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        let Some(&handle) = self.ids.get(&id) else { return };
        let Some(slot) = self.slots.get_mut(&handle) else { return };
        let scale = slot.entry.with_window(|w| w.scale_factor());

        let native = match event {
            WindowEvent::CloseRequested => Some(NativeEvent::Close),

            WindowEvent::Focused(focused) => Some(NativeEvent::Focus(focused)),

            WindowEvent::ModifiersChanged(m) => {
                slot.modifiers = translate::map_modifiers(m.state());
                None
            }

            WindowEvent::CursorMoved { position, .. } => {
                let p = position.to_logical::<f64>(scale);
                slot.cursor = (p.x, p.y);
                Some(NativeEvent::CursorPos { x: p.x, y: p.y })
            }

            WindowEvent::MouseInput { state, button, .. } => Some(NativeEvent::MouseButton {
                button: translate::map_mouse_button(button),
                action: translate::map_action(state, false),
                mods: slot.modifiers,
            }),

            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (x as f64, y as f64),
                    MouseScrollDelta::PixelDelta(p) => {
                        let l = p.to_logical::<f64>(scale);
                        (l.x, l.y)
                    }
                };
                Some(NativeEvent::Scroll { dx, dy })
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let (key, scancode) = translate::map_key(event.physical_key);
                Some(NativeEvent::Key {
                    key,
                    scancode,
                    action: translate::map_action(event.state, event.repeat),
                    mods: slot.modifiers,
                })
            }

            WindowEvent::Resized(size) => {
                slot.entry.with_gpu_mut(|gpu| gpu.resize(size));
                self.push_state_changes(handle);
                logical_size(size, scale)
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let size = slot.entry.with_window(|w| w.inner_size());
                slot.entry.with_gpu_mut(|gpu| gpu.resize(size));
                logical_size(size, scale_factor)
            }

            _ => None,
        };

        if let Some(native) = native {
            self.push(handle, native);
        }
    }
}

/// `Size` event in logical pixels; `None` while minimized to zero.
fn logical_size(size: PhysicalSize<u32>, scale: f64) -> Option<NativeEvent> {
    if size.width == 0 || size.height == 0 {
        return None;
    }
    let l = size.to_logical::<f64>(scale);
    Some(NativeEvent::Size {
        width: l.width.round() as u32,
        height: l.height.round() as u32,
    })
}
