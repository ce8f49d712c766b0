use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, Window};

use super::render::CanvasSurface;
use crate::error::{EngineError, Result};
use crate::lifecycle::Host;
use crate::scheduler::{FrameCallback, FrameHost};
use crate::viewport::Viewport;

/// A canvas sized to its parent element, resized with the window.
pub struct ElementHost {
    window: Window,
    canvas: HtmlCanvasElement,
    container: Element,
    listener: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl ElementHost {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| EngineError::MissingElement("window".into()))?;
        let container = canvas
            .parent_element()
            .unwrap_or_else(|| canvas.clone().into());
        Ok(Self {
            window,
            canvas,
            container,
            listener: RefCell::new(None),
        })
    }
}

impl Host for ElementHost {
    type Surface = CanvasSurface;
    type Frames = AnimationFrames;

    fn measure(&self) -> (f64, f64) {
        let rect = self.container.get_bounding_client_rect();
        (rect.width(), rect.height())
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    fn context(&self) -> Result<CanvasSurface> {
        let ctx = self
            .canvas
            .get_context("2d")
            .ok()
            .flatten()
            .ok_or(EngineError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| EngineError::ContextUnavailable)?;
        Ok(CanvasSurface::new(ctx))
    }

    fn apply_viewport(&self, viewport: &Viewport) {
        let (w, h) = viewport.backing_size();
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", viewport.width));
        let _ = style.set_property("height", &format!("{}px", viewport.height));
    }

    fn observe_resize(&self, on_resize: Rc<dyn Fn()>) -> Result<()> {
        let closure = Closure::wrap(Box::new(move || on_resize()) as Box<dyn FnMut()>);
        self.window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .map_err(|e| EngineError::ResizeObservation(format!("{e:?}")))?;
        *self.listener.borrow_mut() = Some(closure);
        Ok(())
    }

    fn unobserve_resize(&self) {
        if let Some(closure) = self.listener.borrow_mut().take() {
            let _ = self
                .window
                .remove_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        }
    }

    fn frames(&self) -> AnimationFrames {
        AnimationFrames {
            window: self.window.clone(),
            closure: RefCell::new(None),
        }
    }
}

/// `requestAnimationFrame` driver. The JS closure is created on the first
/// request and reused for every frame after it.
pub struct AnimationFrames {
    window: Window,
    closure: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl FrameHost for AnimationFrames {
    type Request = i32;

    fn request(&self, tick: &FrameCallback) -> Result<i32> {
        let mut slot = self.closure.borrow_mut();
        let closure = slot.get_or_insert_with(|| {
            let tick = tick.clone();
            Closure::wrap(Box::new(move |timestamp: f64| tick(timestamp)) as Box<dyn FnMut(f64)>)
        });
        self.window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .map_err(|e| EngineError::FrameRequest(format!("{e:?}")))
    }

    fn cancel(&self, request: i32) {
        let _ = self.window.cancel_animation_frame(request);
    }

    fn release(&self) {
        self.closure.borrow_mut().take();
    }
}
