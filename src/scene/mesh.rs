//! Mesh network diagram: a fixed device topology with an SOS signal hopping
//! from its origin to the responder gateway.

use crate::color::{EMERGENCY, INK, SIGNAL_GREEN, WHITE};
use crate::config::{HOP_LATENCY_MS, MESH_GRID_SPACING, SIGNAL_CYCLE_SECONDS, SIGNAL_PARTICLES};
use crate::error::{EngineError, Result};
use crate::surface::{Gradient, Paint, Surface, SurfaceExt, TextAlign, TextBaseline};
use crate::viewport::Viewport;

use super::{cycle_progress, mono, pulse, Scene};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Citizen,
    Relay,
    SosOrigin,
    Gateway,
}

impl NodeKind {
    pub fn radius(self) -> f64 {
        match self {
            NodeKind::Citizen => 16.0,
            NodeKind::Relay => 20.0,
            NodeKind::SosOrigin => 24.0,
            NodeKind::Gateway => 28.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    pub x: f64,
    pub y: f64,
    pub kind: NodeKind,
    pub label: &'static str,
    pub active: bool,
}

const fn node(x: f64, y: f64, kind: NodeKind, label: &'static str, active: bool) -> MeshNode {
    MeshNode {
        x,
        y,
        kind,
        label,
        active,
    }
}

use NodeKind::{Citizen, Gateway, Relay, SosOrigin};

pub const DEFAULT_NODES: [MeshNode; 17] = [
    node(0.08, 0.3, Citizen, "Phone A", true),
    node(0.15, 0.65, Citizen, "Phone B", true),
    node(0.22, 0.4, Citizen, "Phone C", false),
    node(0.28, 0.75, Citizen, "Phone D", true),
    node(0.35, 0.25, Citizen, "Phone E", true),
    node(0.32, 0.55, Relay, "Relay 1", true),
    node(0.44, 0.45, Citizen, "Phone F", true),
    node(0.42, 0.7, Citizen, "Phone G", false),
    node(0.5, 0.3, Relay, "Relay 2", true),
    node(0.55, 0.6, Citizen, "Phone H", true),
    node(0.6, 0.42, Citizen, "Phone I", true),
    node(0.65, 0.72, Relay, "Relay 3", true),
    node(0.7, 0.28, Citizen, "Phone J", true),
    node(0.72, 0.52, Citizen, "Phone K", true),
    node(0.78, 0.38, Citizen, "Phone L", false),
    node(0.12, 0.45, SosOrigin, "SOS Origin", true),
    node(0.88, 0.45, Gateway, "Responder Gateway", true),
];

pub const DEFAULT_EDGES: [(usize, usize); 24] = [
    (15, 0),
    (15, 2),
    (0, 2),
    (0, 1),
    (1, 3),
    (2, 5),
    (2, 4),
    (5, 6),
    (5, 3),
    (4, 8),
    (6, 8),
    (6, 9),
    (8, 10),
    (9, 11),
    (10, 12),
    (10, 13),
    (11, 13),
    (12, 14),
    (13, 16),
    (12, 16),
    (14, 16),
    (3, 7),
    (7, 9),
    (11, 16),
];

pub const DEFAULT_SIGNAL_PATH: [usize; 8] = [15, 2, 5, 6, 8, 10, 13, 16];

#[derive(Debug, Clone)]
pub struct MeshConfig {
    pub nodes: Vec<MeshNode>,
    pub edges: Vec<(usize, usize)>,
    pub signal_path: Vec<usize>,
    pub cycle_seconds: f64,
    pub particles: usize,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            nodes: DEFAULT_NODES.to_vec(),
            edges: DEFAULT_EDGES.to_vec(),
            signal_path: DEFAULT_SIGNAL_PATH.to_vec(),
            cycle_seconds: SIGNAL_CYCLE_SECONDS,
            particles: SIGNAL_PARTICLES,
        }
    }
}

pub struct MeshNetwork {
    config: MeshConfig,
    /// Per-edge flag: true when the edge joins consecutive signal hops.
    signal_edges: Vec<bool>,
    pixels: Vec<(f64, f64)>,
}

impl MeshNetwork {
    /// Validate the topology: every edge and hop must name an existing node,
    /// and consecutive hops must be joined by an edge.
    pub fn new(config: MeshConfig) -> Result<Self> {
        let n = config.nodes.len();
        if let Some(&(a, b)) = config.edges.iter().find(|&&(a, b)| a >= n || b >= n) {
            return Err(EngineError::InvalidTopology(format!(
                "edge ({a}, {b}) references a node outside 0..{n}"
            )));
        }
        if let Some(&hop) = config.signal_path.iter().find(|&&hop| hop >= n) {
            return Err(EngineError::InvalidTopology(format!(
                "signal hop {hop} references a node outside 0..{n}"
            )));
        }
        for pair in config.signal_path.windows(2) {
            if !has_edge(&config.edges, pair[0], pair[1]) {
                return Err(EngineError::InvalidTopology(format!(
                    "signal hop {} -> {} has no edge",
                    pair[0], pair[1]
                )));
            }
        }

        Ok(Self::build(config))
    }

    fn build(config: MeshConfig) -> Self {
        let signal_edges = config
            .edges
            .iter()
            .map(|&(a, b)| on_path(&config.signal_path, a, b))
            .collect();
        Self {
            config,
            signal_edges,
            pixels: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &[MeshNode] {
        &self.config.nodes
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.config.edges
    }

    pub fn signal_path(&self) -> &[usize] {
        &self.config.signal_path
    }

    /// Node centres in CSS pixels for the current layout.
    pub fn node_pixels(&self) -> &[(f64, f64)] {
        &self.pixels
    }

    pub fn is_signal_edge(&self, a: usize, b: usize) -> bool {
        on_path(&self.config.signal_path, a, b)
    }

    pub fn hop_count(&self) -> usize {
        self.config.signal_path.len().saturating_sub(1)
    }

    pub fn active_count(&self) -> usize {
        self.config.nodes.iter().filter(|n| n.active).count()
    }

    /// Progress along the whole path, in [0, 1), of particle `index`.
    pub fn particle_progress(&self, index: usize, elapsed: f64) -> f64 {
        let count = self.config.particles.max(1);
        cycle_progress(elapsed, self.config.cycle_seconds, index as f64 / count as f64)
    }

    /// Pixel position of a particle at `progress`, interpolated along the
    /// current hop. None when the path has no hops or layout has not run.
    pub fn particle_position(&self, progress: f64) -> Option<(f64, f64)> {
        let path = &self.config.signal_path;
        let hops = path.len().checked_sub(1).filter(|&h| h > 0)?;
        let along = progress.clamp(0.0, 1.0) * hops as f64;
        let seg = (along.floor() as usize).min(hops - 1);
        let frac = along - seg as f64;
        let &(ax, ay) = self.pixels.get(path[seg])?;
        let &(bx, by) = self.pixels.get(path[seg + 1])?;
        Some((ax + (bx - ax) * frac, ay + (by - ay) * frac))
    }

    pub fn overlay_lines(&self) -> [String; 2] {
        [
            format!(
                "ACTIVE NODES: {} / {}",
                self.active_count(),
                self.config.nodes.len()
            ),
            format!(
                "HOP COUNT: {} // LATENCY: ~{}ms",
                self.hop_count(),
                self.hop_count() * HOP_LATENCY_MS
            ),
        ]
    }

    fn draw_edges(&self, surface: &mut dyn Surface, elapsed: f64) {
        let glow = pulse(elapsed * 2.0);
        for (&(i, j), &signal) in self.config.edges.iter().zip(&self.signal_edges) {
            let (Some(&(ax, ay)), Some(&(bx, by))) = (self.pixels.get(i), self.pixels.get(j)) else {
                continue;
            };
            if signal {
                let edge = Gradient::linear(ax, ay, bx, by)
                    .stop(0.0, EMERGENCY.alpha(0.4 + glow * 0.3))
                    .stop(0.5, EMERGENCY.alpha(0.6 + glow * 0.2))
                    .stop(1.0, EMERGENCY.alpha(0.4 + glow * 0.3));
                surface.set_stroke(&edge.into());
                surface.set_line_width(2.0);
            } else {
                let both_active = self.config.nodes[i].active && self.config.nodes[j].active;
                let alpha = if both_active { 0.06 } else { 0.025 };
                surface.set_stroke(&WHITE.alpha(alpha).into());
                surface.set_line_width(0.5);
            }
            surface.stroke_line(ax, ay, bx, by);
        }
    }

    fn draw_particles(&self, surface: &mut dyn Surface, elapsed: f64) {
        for p in 0..self.config.particles {
            let progress = self.particle_progress(p, elapsed);
            let Some((px, py)) = self.particle_position(progress) else {
                continue;
            };
            let halo = Gradient::radial(px, py, 0.0, 16.0)
                .stop(0.0, EMERGENCY.alpha(0.8))
                .stop(0.4, EMERGENCY.alpha(0.3))
                .stop(1.0, EMERGENCY.alpha(0.0));
            surface.fill_circle(px, py, 16.0, halo);
            surface.fill_circle(px, py, 3.0, EMERGENCY);
        }
    }

    fn draw_node(&self, surface: &mut dyn Surface, index: usize, elapsed: f64) {
        let node = &self.config.nodes[index];
        let (nx, ny) = self.pixels[index];
        let r = node.kind.radius();

        match node.kind {
            NodeKind::SosOrigin => {
                let phase = pulse(elapsed * 3.0);
                surface.stroke_circle(nx, ny, r + phase * 20.0, 1.5, EMERGENCY.alpha(0.3 * (1.0 - phase)));
                let echo = pulse(elapsed * 3.0 + 1.5);
                surface.stroke_circle(nx, ny, r + echo * 30.0, 1.0, EMERGENCY.alpha(0.15 * (1.0 - echo)));
                self.badge(surface, nx, ny, r, EMERGENCY, (0.25, 0.08), 0.7, "SOS");
                surface.set_font(&mono(8, false));
                surface.text(
                    &node.label.to_uppercase(),
                    nx,
                    ny + r + 12.0,
                    TextAlign::Center,
                    EMERGENCY.alpha(0.6),
                );
            }
            NodeKind::Gateway => {
                let phase = pulse(elapsed * 2.0);
                surface.stroke_circle(nx, ny, r + phase * 12.0, 1.5, SIGNAL_GREEN.alpha(0.25 * (1.0 - phase)));
                self.badge(surface, nx, ny, r, SIGNAL_GREEN, (0.2, 0.06), 0.6, "GW");
                surface.set_font(&mono(8, false));
                surface.text(
                    &node.label.to_uppercase(),
                    nx,
                    ny + r + 12.0,
                    TextAlign::Center,
                    SIGNAL_GREEN.alpha(0.5),
                );
            }
            NodeKind::Relay => {
                let fill = Gradient::radial(nx, ny, 0.0, r)
                    .stop(0.0, WHITE.alpha(0.08))
                    .stop(1.0, WHITE.alpha(0.02));
                surface.fill_circle(nx, ny, r, fill);
                surface.stroke_circle(nx, ny, r, 1.5, WHITE.alpha(0.2));
                let ring = pulse(elapsed * 1.5 + index as f64);
                surface.stroke_circle(nx, ny, r + 6.0 + ring * 4.0, 0.5, WHITE.alpha(0.08 * ring));
                surface.set_font(&mono(8, false));
                surface.set_text_baseline(TextBaseline::Middle);
                surface.text("↔", nx, ny, TextAlign::Center, WHITE.alpha(0.5));
                surface.set_font(&mono(7, false));
                surface.text(
                    &node.label.to_uppercase(),
                    nx,
                    ny + r + 10.0,
                    TextAlign::Center,
                    WHITE.alpha(0.2),
                );
            }
            NodeKind::Citizen => {
                let (fill, border, icon) = if node.active {
                    (0.15, 0.25, 0.4)
                } else {
                    (0.05, 0.08, 0.15)
                };
                surface.fill_circle(nx, ny, r, WHITE.alpha(fill));
                surface.stroke_circle(nx, ny, r, 1.0, WHITE.alpha(border));
                surface.set_font(&mono(7, false));
                surface.set_text_baseline(TextBaseline::Middle);
                surface.text("📱", nx, ny, TextAlign::Center, WHITE.alpha(icon));
            }
        }
    }

    /// Filled, outlined disc with a bold centred tag.
    #[allow(clippy::too_many_arguments)]
    fn badge(
        &self,
        surface: &mut dyn Surface,
        x: f64,
        y: f64,
        r: f64,
        color: crate::color::Rgba,
        fill: (f64, f64),
        border: f64,
        tag: &str,
    ) {
        let body = Gradient::radial(x, y, 0.0, r)
            .stop(0.0, color.alpha(fill.0))
            .stop(1.0, color.alpha(fill.1));
        surface.fill_circle(x, y, r, body);
        surface.stroke_circle(x, y, r, 2.0, color.alpha(border));
        surface.set_font(&mono(10, true));
        surface.set_text_baseline(TextBaseline::Middle);
        surface.text(tag, x, y, TextAlign::Center, color);
    }

    fn draw_overlay(&self, surface: &mut dyn Surface, viewport: &Viewport) {
        let (w, h) = (viewport.width, viewport.height);
        let [active, hops] = self.overlay_lines();
        surface.set_font(&mono(9, false));
        surface.set_text_baseline(TextBaseline::Alphabetic);
        let faint = WHITE.alpha(0.15);
        surface.text(
            "BLE_MESH_NETWORK // BAYANIHAN PROTOCOL v2.0",
            16.0,
            20.0,
            TextAlign::Left,
            faint,
        );
        surface.text(&active, 16.0, 34.0, TextAlign::Left, faint);
        surface.text(
            "SIGNAL PROPAGATION: ACTIVE",
            w - 16.0,
            h - 16.0,
            TextAlign::Right,
            EMERGENCY.alpha(0.3),
        );
        surface.text(&hops, 16.0, h - 16.0, TextAlign::Left, WHITE.alpha(0.12));
    }
}

impl Default for MeshNetwork {
    fn default() -> Self {
        Self::build(MeshConfig::default())
    }
}

fn has_edge(edges: &[(usize, usize)], a: usize, b: usize) -> bool {
    edges.iter().any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
}

/// True when `a` and `b` are consecutive hops of `path`, in either order.
fn on_path(path: &[usize], a: usize, b: usize) -> bool {
    path.windows(2)
        .any(|w| (w[0] == a && w[1] == b) || (w[0] == b && w[1] == a))
}

impl Scene for MeshNetwork {
    fn name(&self) -> &'static str {
        "mesh"
    }

    fn layout(&mut self, viewport: &Viewport) {
        self.pixels = self
            .config
            .nodes
            .iter()
            .map(|n| viewport.to_pixels(n.x, n.y))
            .collect();
    }

    fn render(&mut self, surface: &mut dyn Surface, viewport: &Viewport, elapsed: f64) {
        let (w, h) = (viewport.width, viewport.height);
        surface.clear_rect(0.0, 0.0, w, h);
        surface.set_fill(&Paint::Solid(INK));
        surface.fill_rect(0.0, 0.0, w, h);

        surface.set_stroke(&WHITE.alpha(0.025).into());
        surface.set_line_width(0.5);
        surface.stroke_lattice(w, h, MESH_GRID_SPACING, 0.0);

        if self.pixels.len() != self.config.nodes.len() {
            return;
        }

        self.draw_edges(surface, elapsed);
        self.draw_particles(surface, elapsed);
        for i in 0..self.config.nodes.len() {
            self.draw_node(surface, i, elapsed);
        }
        self.draw_overlay(surface, viewport);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    #[test]
    fn default_topology_is_valid() {
        let mesh = MeshNetwork::new(MeshConfig::default()).unwrap();
        assert_eq!(mesh.nodes().len(), 17);
        assert_eq!(mesh.edges().len(), 24);
        for pair in mesh.signal_path().windows(2) {
            assert!(has_edge(mesh.edges(), pair[0], pair[1]));
            assert!(mesh.is_signal_edge(pair[1], pair[0]));
        }
        assert_eq!(mesh.signal_edges.iter().filter(|&&s| s).count(), 7);
    }

    #[test]
    fn rejects_out_of_range_hop() {
        let config = MeshConfig {
            signal_path: vec![15, 99],
            ..MeshConfig::default()
        };
        assert!(matches!(
            MeshNetwork::new(config),
            Err(EngineError::InvalidTopology(_))
        ));
    }

    #[test]
    fn rejects_hop_without_edge() {
        let config = MeshConfig {
            signal_path: vec![15, 16],
            ..MeshConfig::default()
        };
        assert!(MeshNetwork::new(config).is_err());
    }

    #[test]
    fn particle_interpolates_along_hops() {
        let mut mesh = MeshNetwork::default();
        mesh.layout(&Viewport::new(1000.0, 100.0, 1.0));
        let start = mesh.particle_position(0.0).unwrap();
        assert_eq!(start, mesh.node_pixels()[15]);
        // Halfway through the first of seven hops.
        let (x, y) = mesh.particle_position(0.5 / 7.0).unwrap();
        let (ax, ay) = mesh.node_pixels()[15];
        let (bx, by) = mesh.node_pixels()[2];
        assert!((x - (ax + bx) / 2.0).abs() < 1e-9);
        assert!((y - (ay + by) / 2.0).abs() < 1e-9);
        let end = mesh.particle_position(1.0).unwrap();
        let gateway = mesh.node_pixels()[16];
        assert!((end.0 - gateway.0).abs() < 1e-9 && (end.1 - gateway.1).abs() < 1e-9);
    }

    #[test]
    fn overlay_reports_live_counts() {
        let mut mesh = MeshNetwork::default();
        let vp = Viewport::new(900.0, 500.0, 1.0);
        mesh.layout(&vp);
        let mut surface = RecordingSurface::new();
        mesh.render(&mut surface, &vp, 0.5);
        let texts = surface.texts();
        assert!(texts.contains(&"ACTIVE NODES: 14 / 17".to_string()));
        assert!(texts.contains(&"HOP COUNT: 7 // LATENCY: ~84ms".to_string()));
        assert!(texts.contains(&"SOS".to_string()));
        assert!(texts.contains(&"RESPONDER GATEWAY".to_string()));
    }
}
