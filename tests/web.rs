#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

use resqlink_canvas::{bind, MeshNetwork, TerrainMap};

wasm_bindgen_test_configure!(run_in_browser);

fn attach_canvas(width: u32, height: u32) -> web_sys::HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let wrap = document
        .create_element("div")
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap();
    wrap.style()
        .set_property("width", &format!("{width}px"))
        .unwrap();
    wrap.style()
        .set_property("height", &format!("{height}px"))
        .unwrap();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .unwrap();
    wrap.append_child(&canvas).unwrap();
    document.body().unwrap().append_child(&wrap).unwrap();
    canvas
}

#[wasm_bindgen_test]
fn canvas_sized_to_container() {
    let canvas = attach_canvas(320, 200);
    let host = element_host(canvas.clone());
    let mount = bind(host, TerrainMap::default()).expect("terrain mounts");

    let vp = mount.viewport();
    assert_eq!((vp.width, vp.height), (320.0, 200.0));
    let (bw, bh) = vp.backing_size();
    assert_eq!((canvas.width(), canvas.height()), (bw, bh));

    assert!(mount.dispose());
    assert!(!mount.dispose());
}

#[wasm_bindgen_test]
fn exported_handle_disposes_once() {
    let canvas = attach_canvas(400, 300);
    let handle = resqlink_canvas::wasm::mount_mesh(canvas).expect("mesh mounts");
    assert!(!handle.disposed());
    assert!(handle.dispose());
    assert!(handle.disposed());
    assert!(!handle.dispose());
}

#[wasm_bindgen_test]
fn mesh_mounts_on_detached_canvas() {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .unwrap();
    let mount = bind(element_host(canvas), MeshNetwork::default()).expect("mounts");
    assert!(mount.viewport().is_empty());
}

fn element_host(canvas: web_sys::HtmlCanvasElement) -> resqlink_canvas::wasm::ElementHost {
    resqlink_canvas::wasm::ElementHost::new(canvas).unwrap()
}
