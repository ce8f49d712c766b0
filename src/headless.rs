//! Host without a browser: programmable container size, hand-fired frames
//! and a recording surface. Clones share state, so a caller can keep one
//! handle while another is moved into [`bind`](crate::lifecycle::bind).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::{EngineError, Result};
use crate::lifecycle::Host;
use crate::scheduler::ManualFrames;
use crate::surface::{DrawOp, RecordingSurface};
use crate::viewport::Viewport;

#[derive(Clone)]
pub struct HeadlessHost {
    inner: Rc<HeadlessInner>,
}

struct HeadlessInner {
    size: Cell<(f64, f64)>,
    pixel_ratio: Cell<f64>,
    context_available: Cell<bool>,
    observe_fails: Cell<bool>,
    backing: Cell<(u32, u32)>,
    frames: ManualFrames,
    ops: Rc<RefCell<Vec<DrawOp>>>,
    listener: RefCell<Option<Rc<dyn Fn()>>>,
    /// Last listener ever registered, kept past unobserve for race tests.
    last_listener: RefCell<Option<Rc<dyn Fn()>>>,
    unobserved: Cell<usize>,
}

impl HeadlessHost {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            inner: Rc::new(HeadlessInner {
                size: Cell::new((width, height)),
                pixel_ratio: Cell::new(1.0),
                context_available: Cell::new(true),
                observe_fails: Cell::new(false),
                backing: Cell::new((0, 0)),
                frames: ManualFrames::new(),
                ops: Rc::new(RefCell::new(Vec::new())),
                listener: RefCell::new(None),
                last_listener: RefCell::new(None),
                unobserved: Cell::new(0),
            }),
        }
    }

    pub fn with_pixel_ratio(self, ratio: f64) -> Self {
        self.inner.pixel_ratio.set(ratio);
        self
    }

    /// Simulate a canvas whose 2D context cannot be obtained.
    pub fn without_context(self) -> Self {
        self.inner.context_available.set(false);
        self
    }

    /// Simulate a host that refuses resize observation.
    pub fn failing_observe(self) -> Self {
        self.inner.observe_fails.set(true);
        self
    }

    /// Change the container size and notify the observer, if any.
    pub fn resize_to(&self, width: f64, height: f64) {
        self.inner.size.set((width, height));
        self.notify_resize();
    }

    /// Deliver a resize notification without changing the size.
    pub fn notify_resize(&self) {
        let listener = self.inner.listener.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
    }

    /// Invoke the most recent resize listener even if it was detached,
    /// as a notification already in flight during teardown would.
    pub fn deliver_late_resize(&self) {
        let listener = self.inner.last_listener.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
    }

    pub fn frames_handle(&self) -> ManualFrames {
        self.inner.frames.clone()
    }

    /// Fire one display frame at `timestamp_ms`.
    pub fn fire_frame(&self, timestamp_ms: f64) -> usize {
        self.inner.frames.fire(timestamp_ms)
    }

    pub fn recording(&self) -> RecordingSurface {
        RecordingSurface::with_log(self.inner.ops.clone())
    }

    pub fn backing_size(&self) -> (u32, u32) {
        self.inner.backing.get()
    }

    pub fn is_observing(&self) -> bool {
        self.inner.listener.borrow().is_some()
    }

    pub fn unobserve_count(&self) -> usize {
        self.inner.unobserved.get()
    }
}

impl Host for HeadlessHost {
    type Surface = RecordingSurface;
    type Frames = ManualFrames;

    fn measure(&self) -> (f64, f64) {
        self.inner.size.get()
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.inner.pixel_ratio.get()
    }

    fn context(&self) -> Result<RecordingSurface> {
        if self.inner.context_available.get() {
            Ok(self.recording())
        } else {
            Err(EngineError::ContextUnavailable)
        }
    }

    fn apply_viewport(&self, viewport: &Viewport) {
        self.inner.backing.set(viewport.backing_size());
    }

    fn observe_resize(&self, on_resize: Rc<dyn Fn()>) -> Result<()> {
        if self.inner.observe_fails.get() {
            return Err(EngineError::ResizeObservation("observer rejected".into()));
        }
        *self.inner.last_listener.borrow_mut() = Some(on_resize.clone());
        *self.inner.listener.borrow_mut() = Some(on_resize);
        Ok(())
    }

    fn unobserve_resize(&self) {
        self.inner.listener.borrow_mut().take();
        self.inner.unobserved.set(self.inner.unobserved.get() + 1);
    }

    fn frames(&self) -> ManualFrames {
        self.inner.frames.clone()
    }
}
