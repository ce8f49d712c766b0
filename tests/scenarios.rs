#![cfg(not(target_arch = "wasm32"))]

use std::cell::RefCell;
use std::rc::Rc;

use resqlink_canvas::headless::HeadlessHost;
use resqlink_canvas::surface::{DrawOp, Surface};
use resqlink_canvas::{bind, EngineError, MeshNetwork, Scene, TerrainMap, Viewport};

/// Records what the lifecycle asks of a scene.
#[derive(Default)]
struct Probe {
    layouts: Rc<RefCell<Vec<Viewport>>>,
    frames: Rc<RefCell<Vec<f64>>>,
}

impl Scene for Probe {
    fn name(&self) -> &'static str {
        "probe"
    }

    fn layout(&mut self, viewport: &Viewport) {
        self.layouts.borrow_mut().push(*viewport);
    }

    fn render(&mut self, surface: &mut dyn Surface, viewport: &Viewport, elapsed: f64) {
        surface.clear_rect(0.0, 0.0, viewport.width, viewport.height);
        self.frames.borrow_mut().push(elapsed);
    }
}

fn probe() -> (Probe, Rc<RefCell<Vec<Viewport>>>, Rc<RefCell<Vec<f64>>>) {
    let probe = Probe::default();
    let layouts = probe.layouts.clone();
    let frames = probe.frames.clone();
    (probe, layouts, frames)
}

fn clears(host: &HeadlessHost) -> usize {
    host.recording()
        .ops()
        .iter()
        .filter(|op| matches!(op, DrawOp::ClearRect(..)))
        .count()
}

#[test]
fn mesh_signal_starts_at_origin_and_loops() {
    let mesh = MeshNetwork::default();
    assert_eq!(mesh.nodes().len(), 17);
    assert_eq!(mesh.edges().len(), 24);

    assert_eq!(mesh.particle_progress(0, 0.0), 0.0);
    assert!((mesh.particle_progress(1, 0.0) - 1.0 / 3.0).abs() < 1e-12);
    assert!((mesh.particle_progress(2, 0.0) - 2.0 / 3.0).abs() < 1e-12);

    // One full cycle later the leading particle is back at the origin.
    let p = mesh.particle_progress(0, 4.0);
    assert!(p < 1e-9 || p > 1.0 - 1e-9, "progress {p}");
}

#[test]
fn mesh_renders_overlay_through_host() {
    let host = HeadlessHost::new(900.0, 500.0);
    let _mount = bind(host.clone(), MeshNetwork::default()).unwrap();
    assert_eq!(host.fire_frame(16.0), 1);

    let texts = host.recording().texts();
    assert!(texts.iter().any(|t| t == "ACTIVE NODES: 14 / 17"));
    assert!(texts.iter().any(|t| t == "HOP COUNT: 7 // LATENCY: ~84ms"));
}

#[test]
fn terrain_contours_lie_on_cell_edges() {
    let host = HeadlessHost::new(800.0, 400.0);
    let mut terrain = TerrainMap::default();
    let vp = Viewport::new(800.0, 400.0, 1.0);
    terrain.layout(&vp);

    let (cw, ch) = terrain.cell_size();
    let segments = terrain.contour(0.5);
    assert!(!segments.is_empty());

    let on_edge = |(x, y): (f64, f64)| {
        let gx = x / cw;
        let gy = y / ch;
        (gx - gx.round()).abs() < 1e-6 || (gy - gy.round()).abs() < 1e-6
    };
    for seg in &segments {
        assert!(on_edge(seg.a), "{:?}", seg.a);
        assert!(on_edge(seg.b), "{:?}", seg.b);
        assert!((0.0..=800.0 + 1e-6).contains(&seg.a.0));
        assert!((0.0..=400.0 + 1e-6).contains(&seg.a.1));
    }

    // The same scene mounted on a host produces the overlay text.
    let _mount = bind(host.clone(), terrain).unwrap();
    host.fire_frame(0.0);
    assert!(host
        .recording()
        .texts()
        .iter()
        .any(|t| t == "HAZARD_OVERLAY // 6 ACTIVE ZONES // REAL-TIME"));
}

#[test]
fn dispose_before_first_frame_renders_nothing() {
    let host = HeadlessHost::new(640.0, 360.0);
    let (scene, _, frames) = probe();
    let mount = bind(host.clone(), scene).unwrap();
    assert_eq!(host.frames_handle().pending(), 1);

    assert!(mount.dispose());
    assert_eq!(host.fire_frame(16.0), 0);
    assert!(frames.borrow().is_empty());
    assert_eq!(clears(&host), 0);
}

#[test]
fn dispose_is_idempotent() {
    let host = HeadlessHost::new(640.0, 360.0);
    let (scene, _, _) = probe();
    let mount = bind(host.clone(), scene).unwrap();
    host.fire_frame(0.0);

    assert!(mount.dispose());
    assert!(!mount.dispose());
    drop(mount);

    let frames = host.frames_handle();
    assert_eq!(frames.cancellations(), 1);
    assert_eq!(frames.pending(), 0);
    assert_eq!(host.unobserve_count(), 1);
    assert!(!host.is_observing());
}

#[test]
fn dropping_mount_disposes() {
    let host = HeadlessHost::new(640.0, 360.0);
    let (scene, _, frames) = probe();
    drop(bind(host.clone(), scene).unwrap());

    assert_eq!(host.fire_frame(16.0), 0);
    assert!(frames.borrow().is_empty());
    assert!(!host.is_observing());
}

#[test]
fn missing_context_attaches_nothing() {
    let host = HeadlessHost::new(640.0, 360.0).without_context();
    let (scene, layouts, _) = probe();

    let err = bind(host.clone(), scene).unwrap_err();
    assert_eq!(err, EngineError::ContextUnavailable);
    assert!(!host.is_observing());
    assert_eq!(host.frames_handle().pending(), 0);
    assert!(layouts.borrow().is_empty());
}

#[test]
fn failed_observation_is_reported() {
    let host = HeadlessHost::new(640.0, 360.0).failing_observe();
    let (scene, _, _) = probe();

    let err = bind(host.clone(), scene).unwrap_err();
    assert!(matches!(err, EngineError::ResizeObservation(_)));
    assert_eq!(host.frames_handle().pending(), 0);
    assert_eq!(host.unobserve_count(), 0);
}

#[test]
fn refused_frame_request_cleans_up() {
    let host = HeadlessHost::new(640.0, 360.0);
    host.frames_handle().refuse_requests(true);
    let (scene, _, _) = probe();

    let err = bind(host.clone(), scene).unwrap_err();
    assert!(matches!(err, EngineError::FrameRequest(_)));
    assert!(!host.is_observing());
    assert_eq!(host.unobserve_count(), 1);
}

#[test]
fn resize_keeps_clock_and_relayouts() {
    let host = HeadlessHost::new(600.0, 300.0);
    let (scene, layouts, frames) = probe();
    let mount = bind(host.clone(), scene).unwrap();
    assert_eq!(layouts.borrow().len(), 1);
    assert_eq!(host.backing_size(), (600, 300));

    host.fire_frame(1000.0);
    host.fire_frame(1500.0);
    host.resize_to(900.0, 450.0);
    host.fire_frame(2000.0);

    assert_eq!(*frames.borrow(), vec![0.0, 0.5, 1.0]);
    assert_eq!(layouts.borrow().len(), 2);
    assert_eq!(host.backing_size(), (900, 450));
    assert_eq!(mount.viewport(), Viewport::new(900.0, 450.0, 1.0));
}

#[test]
fn identical_resize_is_ignored() {
    let host = HeadlessHost::new(600.0, 300.0);
    let (scene, layouts, _) = probe();
    let _mount = bind(host.clone(), scene).unwrap();

    host.notify_resize();
    host.resize_to(600.0, 300.0);
    assert_eq!(layouts.borrow().len(), 1);
}

#[test]
fn late_resize_after_dispose_is_ignored() {
    let host = HeadlessHost::new(600.0, 300.0);
    let (scene, layouts, _) = probe();
    let mount = bind(host.clone(), scene).unwrap();
    mount.dispose();

    host.resize_to(1200.0, 800.0);
    host.deliver_late_resize();
    assert_eq!(layouts.borrow().len(), 1);
    assert_eq!(host.backing_size(), (600, 300));
}

#[test]
fn pixel_ratio_is_capped() {
    let host = HeadlessHost::new(400.0, 200.0).with_pixel_ratio(3.0);
    let (scene, _, _) = probe();
    let mount = bind(host.clone(), scene).unwrap();

    assert_eq!(mount.viewport().pixel_ratio, 2.0);
    assert_eq!(host.backing_size(), (800, 400));
    assert!(host
        .recording()
        .ops()
        .contains(&DrawOp::SetTransform([2.0, 0.0, 0.0, 2.0, 0.0, 0.0])));
}
