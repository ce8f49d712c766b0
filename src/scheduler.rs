//! Per-display-frame redraw loop.
//!
//! The loop re-arms itself after each callback until its [`CancelToken`] is
//! cancelled (or dropped). Timestamps from the host are converted into
//! seconds since the first frame of the chain.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::error::{EngineError, Result};

/// Callback handed to a [`FrameHost`]; receives the host's monotonic
/// timestamp in milliseconds.
pub type FrameCallback = Rc<dyn Fn(f64)>;

/// Source of display-frame callbacks (`requestAnimationFrame` in browsers).
pub trait FrameHost {
    type Request: Copy + 'static;

    /// Run `tick` once on the next display frame.
    fn request(&self, tick: &FrameCallback) -> Result<Self::Request>;

    /// Drop a pending request so it never fires.
    fn cancel(&self, request: Self::Request);

    /// Release anything retained for the loop's sake. Called once, after
    /// the final cancel.
    fn release(&self) {}
}

/// Converts host timestamps to seconds elapsed since the first frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameClock {
    origin_ms: Option<f64>,
}

impl FrameClock {
    pub fn elapsed_seconds(&mut self, timestamp_ms: f64) -> f64 {
        let origin = *self.origin_ms.get_or_insert(timestamp_ms);
        ((timestamp_ms - origin) / 1000.0).max(0.0)
    }
}

trait Cancel {
    fn cancel(&self) -> bool;
    fn is_cancelled(&self) -> bool;
}

struct LoopState<F: FrameHost> {
    frames: F,
    clock: Cell<FrameClock>,
    on_frame: RefCell<Box<dyn FnMut(f64)>>,
    pending: Cell<Option<F::Request>>,
    cancelled: Cell<bool>,
    tick: RefCell<Option<FrameCallback>>,
}

impl<F: FrameHost> LoopState<F> {
    fn schedule(&self) -> Result<()> {
        let tick = self.tick.borrow().clone();
        if let Some(tick) = tick {
            let request = self.frames.request(&tick)?;
            self.pending.set(Some(request));
        }
        Ok(())
    }

    fn on_tick(&self, timestamp_ms: f64) {
        if self.cancelled.get() {
            return;
        }
        self.pending.set(None);

        let mut clock = self.clock.get();
        let elapsed = clock.elapsed_seconds(timestamp_ms);
        self.clock.set(clock);

        (self.on_frame.borrow_mut())(elapsed);

        if !self.cancelled.get() {
            if let Err(err) = self.schedule() {
                log::error!("frame loop stopped: {err}");
                self.cancel();
            }
        }
    }
}

impl<F: FrameHost> Cancel for LoopState<F> {
    fn cancel(&self) -> bool {
        if self.cancelled.replace(true) {
            return false;
        }
        if let Some(request) = self.pending.take() {
            self.frames.cancel(request);
        }
        self.tick.borrow_mut().take();
        self.frames.release();
        true
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

impl<F: FrameHost> Drop for LoopState<F> {
    fn drop(&mut self) {
        Cancel::cancel(&*self);
    }
}

/// Handle to a running loop.
pub struct CancelToken {
    state: Rc<dyn Cancel>,
}

impl CancelToken {
    /// Stop future callbacks. Returns false if the loop was already stopped.
    pub fn cancel(&self) -> bool {
        self.state.cancel()
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.is_cancelled()
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Start calling `on_frame(elapsed_seconds)` once per display frame.
pub fn start<F>(frames: F, on_frame: impl FnMut(f64) + 'static) -> Result<CancelToken>
where
    F: FrameHost + 'static,
{
    let state = Rc::new(LoopState {
        frames,
        clock: Cell::new(FrameClock::default()),
        on_frame: RefCell::new(Box::new(on_frame)),
        pending: Cell::new(None),
        cancelled: Cell::new(false),
        tick: RefCell::new(None),
    });

    let weak: Weak<LoopState<F>> = Rc::downgrade(&state);
    let tick: FrameCallback = Rc::new(move |timestamp_ms| {
        if let Some(state) = weak.upgrade() {
            state.on_tick(timestamp_ms);
        }
    });
    *state.tick.borrow_mut() = Some(tick);

    if let Err(err) = state.schedule() {
        state.cancel();
        return Err(err);
    }
    Ok(CancelToken { state })
}

/// Frame source driven by hand; frames fire only when [`ManualFrames::fire`]
/// is called. Clones share the same queue.
#[derive(Clone, Default)]
pub struct ManualFrames {
    inner: Rc<ManualInner>,
}

#[derive(Default)]
struct ManualInner {
    next_id: Cell<u32>,
    queue: RefCell<Vec<(u32, FrameCallback)>>,
    cancelled: Cell<usize>,
    released: Cell<usize>,
    refuse: Cell<bool>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every callback queued before this call. Returns how many ran.
    pub fn fire(&self, timestamp_ms: f64) -> usize {
        let due = std::mem::take(&mut *self.inner.queue.borrow_mut());
        for (_, tick) in &due {
            tick(timestamp_ms);
        }
        due.len()
    }

    pub fn pending(&self) -> usize {
        self.inner.queue.borrow().len()
    }

    /// Number of pending requests that were cancelled.
    pub fn cancellations(&self) -> usize {
        self.inner.cancelled.get()
    }

    pub fn releases(&self) -> usize {
        self.inner.released.get()
    }

    /// Make subsequent requests fail, as a host without frame support would.
    pub fn refuse_requests(&self, refuse: bool) {
        self.inner.refuse.set(refuse);
    }
}

impl FrameHost for ManualFrames {
    type Request = u32;

    fn request(&self, tick: &FrameCallback) -> Result<u32> {
        if self.inner.refuse.get() {
            return Err(EngineError::FrameRequest("frames unavailable".into()));
        }
        let id = self.inner.next_id.get().wrapping_add(1);
        self.inner.next_id.set(id);
        self.inner.queue.borrow_mut().push((id, tick.clone()));
        Ok(id)
    }

    fn cancel(&self, request: u32) {
        let mut queue = self.inner.queue.borrow_mut();
        let before = queue.len();
        queue.retain(|(id, _)| *id != request);
        if queue.len() != before {
            self.inner.cancelled.set(self.inner.cancelled.get() + 1);
        }
    }

    fn release(&self) {
        self.inner.released.set(self.inner.released.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_at_zero() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.elapsed_seconds(5_000.0), 0.0);
        assert_eq!(clock.elapsed_seconds(6_500.0), 1.5);
        // Timestamps never run backwards past the origin.
        assert_eq!(clock.elapsed_seconds(4_000.0), 0.0);
    }

    #[test]
    fn loop_rearms_each_frame() {
        let frames = ManualFrames::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let token = start(frames.clone(), move |t| sink.borrow_mut().push(t)).unwrap();

        assert_eq!(frames.pending(), 1);
        frames.fire(1_000.0);
        frames.fire(1_016.0);
        frames.fire(1_500.0);
        assert_eq!(*seen.borrow(), vec![0.0, 0.016, 0.5]);
        assert_eq!(frames.pending(), 1);
        assert!(!token.is_cancelled());
    }

    #[test]
    fn cancel_is_idempotent() {
        let frames = ManualFrames::new();
        let token = start(frames.clone(), |_| {}).unwrap();
        assert!(token.cancel());
        assert!(!token.cancel());
        assert_eq!(frames.cancellations(), 1);
        assert_eq!(frames.releases(), 1);
        assert_eq!(frames.pending(), 0);
    }

    #[test]
    fn dropping_token_stops_loop() {
        let frames = ManualFrames::new();
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let token = start(frames.clone(), move |_| counter.set(counter.get() + 1)).unwrap();
        frames.fire(0.0);
        drop(token);
        assert_eq!(frames.fire(16.0), 0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn refused_request_fails_start() {
        let frames = ManualFrames::new();
        frames.refuse_requests(true);
        let err = start(frames.clone(), |_| {}).unwrap_err();
        assert!(matches!(err, EngineError::FrameRequest(_)));
        assert_eq!(frames.releases(), 1);
    }
}
