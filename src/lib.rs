//! Procedural canvas backdrops for the ResQLink landing page: a terrain
//! hazard map, a mesh relay network, an ambient geometric field and two
//! hero/CTA fillers. Scenes are host-neutral; the wasm build binds them to
//! `<canvas>` elements, while [`headless`] drives them in tests.

pub mod color;
pub mod config;
pub mod contour;
pub mod error;
pub mod headless;
pub mod lifecycle;
pub mod scene;
pub mod scheduler;
pub mod surface;
pub mod viewport;

pub use error::{EngineError, Result};
pub use lifecycle::{bind, Host, Mount};
pub use scene::{AmbientField, Constellation, MeshNetwork, Scene, SignalGrid, TerrainMap};
pub use viewport::Viewport;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use crate::lifecycle::{bind, Mount};
    use crate::scene::{
        AmbientConfig, AmbientField, Constellation, ConstellationConfig, MeshNetwork, Scene,
        SignalGrid, TerrainMap,
    };

    mod host;
    mod render;

    pub use host::{AnimationFrames, ElementHost};
    pub use render::CanvasSurface;

    thread_local! {
        /// Mounts created for the page's well-known canvases. They live as
        /// long as the page does.
        static PAGE_MOUNTS: RefCell<Vec<Mount>> = RefCell::new(Vec::new());
    }

    /// A mounted canvas animation handed to JavaScript.
    #[wasm_bindgen]
    pub struct CanvasHandle {
        mount: Mount,
    }

    #[wasm_bindgen]
    impl CanvasHandle {
        /// Stop the animation and detach from the canvas. Safe to call twice.
        pub fn dispose(&self) -> bool {
            self.mount.dispose()
        }

        #[wasm_bindgen(getter)]
        pub fn disposed(&self) -> bool {
            self.mount.is_disposed()
        }
    }

    fn mount<S: Scene + 'static>(canvas: HtmlCanvasElement, scene: S) -> crate::Result<Mount> {
        bind(ElementHost::new(canvas)?, scene)
    }

    fn seed_or_random(seed: Option<f64>) -> u64 {
        seed.unwrap_or_else(|| js_sys::Math::random() * 9_007_199_254_740_992.0) as u64
    }

    #[wasm_bindgen]
    pub fn mount_terrain(canvas: HtmlCanvasElement) -> Result<CanvasHandle, JsValue> {
        Ok(CanvasHandle {
            mount: mount(canvas, TerrainMap::default())?,
        })
    }

    #[wasm_bindgen]
    pub fn mount_mesh(canvas: HtmlCanvasElement) -> Result<CanvasHandle, JsValue> {
        Ok(CanvasHandle {
            mount: mount(canvas, MeshNetwork::default())?,
        })
    }

    #[wasm_bindgen]
    pub fn mount_ambient(canvas: HtmlCanvasElement, seed: Option<f64>) -> Result<CanvasHandle, JsValue> {
        let config = AmbientConfig {
            seed: seed_or_random(seed),
            ..AmbientConfig::default()
        };
        Ok(CanvasHandle {
            mount: mount(canvas, AmbientField::new(config))?,
        })
    }

    #[wasm_bindgen]
    pub fn mount_constellation(
        canvas: HtmlCanvasElement,
        seed: Option<f64>,
    ) -> Result<CanvasHandle, JsValue> {
        let config = ConstellationConfig {
            seed: seed_or_random(seed),
            ..ConstellationConfig::default()
        };
        Ok(CanvasHandle {
            mount: mount(canvas, Constellation::new(config))?,
        })
    }

    #[wasm_bindgen]
    pub fn mount_signal_grid(canvas: HtmlCanvasElement) -> Result<CanvasHandle, JsValue> {
        Ok(CanvasHandle {
            mount: mount(canvas, SignalGrid::default())?,
        })
    }

    fn mount_by_id(document: &web_sys::Document, id: &str) -> Option<crate::Result<Mount>> {
        let canvas = document.get_element_by_id(id)?.dyn_into::<HtmlCanvasElement>().ok()?;
        Some(match id {
            "terrain-canvas" => mount(canvas, TerrainMap::default()),
            "mesh-canvas" => mount(canvas, MeshNetwork::default()),
            "geo-bg" => mount(
                canvas,
                AmbientField::new(AmbientConfig {
                    seed: seed_or_random(None),
                    ..AmbientConfig::default()
                }),
            ),
            "hero-canvas" => mount(
                canvas,
                Constellation::new(ConstellationConfig {
                    seed: seed_or_random(None),
                    ..ConstellationConfig::default()
                }),
            ),
            _ => mount(canvas, SignalGrid::default()),
        })
    }

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        // A second init (e.g. from tests) is harmless.
        let _ = console_log::init_with_level(log::Level::Info);

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        for id in ["terrain-canvas", "mesh-canvas", "geo-bg", "hero-canvas", "cta-canvas"] {
            match mount_by_id(&document, id) {
                Some(Ok(mount)) => PAGE_MOUNTS.with(|mounts| mounts.borrow_mut().push(mount)),
                Some(Err(err)) => log::warn!("#{id}: not animated: {err}"),
                None => log::debug!("#{id}: not on this page"),
            }
        }
        Ok(())
    }
}
