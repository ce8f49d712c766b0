//! Binds a scene to a host element: sizing, resize observation and the
//! frame loop, torn down together by [`Mount::dispose`].

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::error::Result;
use crate::scene::Scene;
use crate::scheduler::{self, CancelToken, FrameHost};
use crate::surface::Surface;
use crate::viewport::{Viewport, ViewportSizer};

/// Environment a scene is mounted into.
pub trait Host: 'static {
    type Surface: Surface + 'static;
    type Frames: FrameHost + 'static;

    /// Container content box in CSS pixels.
    fn measure(&self) -> (f64, f64);

    fn device_pixel_ratio(&self) -> f64;

    /// Acquire the 2D drawing context. Failing here aborts the bind before
    /// anything is attached.
    fn context(&self) -> Result<Self::Surface>;

    /// Size the backing bitmap (and its displayed size) to the viewport.
    fn apply_viewport(&self, viewport: &Viewport);

    fn observe_resize(&self, on_resize: Rc<dyn Fn()>) -> Result<()>;

    fn unobserve_resize(&self);

    fn frames(&self) -> Self::Frames;
}

trait Lifecycle {
    fn dispose(&self) -> bool;
    fn is_disposed(&self) -> bool;
    fn viewport(&self) -> Viewport;
}

struct Instance<H: Host, S: Scene> {
    host: H,
    scene: RefCell<S>,
    surface: RefCell<Option<H::Surface>>,
    sizer: RefCell<ViewportSizer>,
    scheduler: RefCell<Option<CancelToken>>,
    observing: Cell<bool>,
    disposed: Cell<bool>,
}

impl<H: Host, S: Scene + 'static> Instance<H, S> {
    fn start(self: &Rc<Self>) -> Result<()> {
        let weak: Weak<Self> = Rc::downgrade(self);
        self.host.observe_resize(Rc::new(move || {
            if let Some(instance) = weak.upgrade() {
                instance.resize();
            }
        }))?;
        self.observing.set(true);

        self.resize();

        let weak: Weak<Self> = Rc::downgrade(self);
        let token = scheduler::start(self.host.frames(), move |elapsed| {
            if let Some(instance) = weak.upgrade() {
                instance.frame(elapsed);
            }
        })?;
        *self.scheduler.borrow_mut() = Some(token);
        Ok(())
    }

    fn resize(&self) {
        if self.disposed.get() {
            log::debug!("{}: resize after dispose ignored", self.scene.borrow().name());
            return;
        }
        let (width, height) = self.host.measure();
        let resized = self
            .sizer
            .borrow_mut()
            .resize(width, height, self.host.device_pixel_ratio());
        if !resized.changed {
            return;
        }

        let vp = resized.viewport;
        self.host.apply_viewport(&vp);
        if let Some(surface) = self.surface.borrow_mut().as_mut() {
            // Setting the bitmap size resets the transform.
            surface.set_transform(vp.pixel_ratio, 0.0, 0.0, vp.pixel_ratio, 0.0, 0.0);
        }
        self.scene.borrow_mut().layout(&vp);
    }

    fn frame(&self, elapsed: f64) {
        if self.disposed.get() {
            return;
        }
        let vp = self.viewport();
        if let Some(surface) = self.surface.borrow_mut().as_mut() {
            self.scene.borrow_mut().render(surface, &vp, elapsed);
        }
    }
}

impl<H: Host, S: Scene> Lifecycle for Instance<H, S> {
    fn dispose(&self) -> bool {
        if self.disposed.replace(true) {
            return false;
        }
        if let Some(token) = self.scheduler.borrow_mut().take() {
            token.cancel();
        }
        if self.observing.replace(false) {
            self.host.unobserve_resize();
        }
        self.surface.borrow_mut().take();
        log::debug!("{}: disposed", self.scene.borrow().name());
        true
    }

    fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    fn viewport(&self) -> Viewport {
        self.sizer.borrow().current().unwrap_or_default()
    }
}

/// A live, mounted animation. Dropping it disposes it.
pub struct Mount {
    inner: Rc<dyn Lifecycle>,
}

impl Mount {
    /// Cancel the frame loop, stop observing resizes and release the drawing
    /// context, in that order. Only the first call does anything; returns
    /// whether this call performed the teardown.
    pub fn dispose(&self) -> bool {
        self.inner.dispose()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }

    pub fn viewport(&self) -> Viewport {
        self.inner.viewport()
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        self.inner.dispose();
    }
}

impl std::fmt::Debug for Mount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mount")
            .field("disposed", &self.is_disposed())
            .field("viewport", &self.viewport())
            .finish()
    }
}

/// Mount `scene` on `host` and start animating immediately.
pub fn bind<H: Host, S: Scene + 'static>(host: H, scene: S) -> Result<Mount> {
    let name = scene.name();
    let surface = host.context().map_err(|err| {
        log::error!("{name}: {err}");
        err
    })?;

    let instance = Rc::new(Instance {
        host,
        scene: RefCell::new(scene),
        surface: RefCell::new(Some(surface)),
        sizer: RefCell::new(ViewportSizer::new()),
        scheduler: RefCell::new(None),
        observing: Cell::new(false),
        disposed: Cell::new(false),
    });
    // From here on the mount owns cleanup, including on a failed start.
    let mount = Mount {
        inner: instance.clone(),
    };

    if let Err(err) = instance.start() {
        log::error!("{name}: bind failed: {err}");
        mount.dispose();
        return Err(err);
    }

    let vp = mount.viewport();
    log::info!("{name}: mounted at {}x{} @{}x", vp.width, vp.height, vp.pixel_ratio);
    Ok(mount)
}
