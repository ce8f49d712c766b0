//! Topographic hazard map: contour lines over a procedural elevation field
//! with pulsing hotspot markers.

use crate::color::{COBALT, INK, TERRAIN_BG};
use crate::config::{
    CONTOUR_LEVELS, SCAN_LINE_SPEED, TERRAIN_COLS, TERRAIN_GRID_SPACING, TERRAIN_ROWS,
};
use crate::contour::{contour_segments, ElevationGrid, Segment};
use crate::surface::{Gradient, Surface, SurfaceExt, TextAlign, TextBaseline};
use crate::viewport::Viewport;

use super::{mono, pulse, Scene};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hotspot {
    pub x: f64,
    pub y: f64,
    pub intensity: f64,
    pub base_radius: f64,
}

impl Hotspot {
    const fn new(x: f64, y: f64, intensity: f64, base_radius: f64) -> Self {
        Self {
            x,
            y,
            intensity,
            base_radius,
        }
    }

    /// Pulse phase in [0, 1], desynchronised per hotspot by its position.
    pub fn phase(&self, elapsed: f64) -> f64 {
        pulse(elapsed * 1.5 + self.x * 10.0 + self.y * 7.0)
    }
}

pub const DEFAULT_HOTSPOTS: [Hotspot; 6] = [
    Hotspot::new(0.25, 0.35, 1.0, 35.0),
    Hotspot::new(0.62, 0.28, 0.8, 28.0),
    Hotspot::new(0.78, 0.55, 0.6, 22.0),
    Hotspot::new(0.15, 0.65, 0.5, 18.0),
    Hotspot::new(0.48, 0.72, 0.9, 32.0),
    Hotspot::new(0.88, 0.38, 0.4, 16.0),
];

#[derive(Debug, Clone)]
pub struct TerrainConfig {
    pub rows: usize,
    pub cols: usize,
    pub levels: Vec<f64>,
    pub hotspots: Vec<Hotspot>,
    pub grid_spacing: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            rows: TERRAIN_ROWS,
            cols: TERRAIN_COLS,
            levels: CONTOUR_LEVELS.to_vec(),
            hotspots: DEFAULT_HOTSPOTS.to_vec(),
            grid_spacing: TERRAIN_GRID_SPACING,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct TerrainLayout {
    cell_w: f64,
    cell_h: f64,
    hotspots: Vec<(f64, f64)>,
    contours: Vec<(f64, Vec<Segment>)>,
}

pub struct TerrainMap {
    config: TerrainConfig,
    grid: ElevationGrid,
    layout: TerrainLayout,
}

impl TerrainMap {
    pub fn new(config: TerrainConfig) -> Self {
        let grid = ElevationGrid::generate(config.rows, config.cols);
        Self {
            config,
            grid,
            layout: TerrainLayout::default(),
        }
    }

    pub fn grid(&self) -> &ElevationGrid {
        &self.grid
    }

    pub fn hotspots(&self) -> &[Hotspot] {
        &self.config.hotspots
    }

    /// Hotspot centres in CSS pixels for the current layout.
    pub fn hotspot_pixels(&self) -> &[(f64, f64)] {
        &self.layout.hotspots
    }

    /// Width and height of one grid cell in CSS pixels.
    pub fn cell_size(&self) -> (f64, f64) {
        (self.layout.cell_w, self.layout.cell_h)
    }

    /// Contour segments at an arbitrary level for the current layout.
    pub fn contour(&self, level: f64) -> Vec<Segment> {
        if let Some((_, cached)) = self.layout.contours.iter().find(|(l, _)| *l == level) {
            return cached.clone();
        }
        contour_segments(&self.grid, level, self.layout.cell_w, self.layout.cell_h)
    }

    fn draw_contours(&self, surface: &mut dyn Surface) {
        for (level, segments) in &self.layout.contours {
            surface.begin_path();
            surface.set_stroke(&INK.alpha(0.04 + (level - 0.2) * 0.04).into());
            surface.set_line_width(if *level > 0.6 { 1.0 } else { 0.5 });
            for seg in segments {
                surface.move_to(seg.a.0, seg.a.1);
                surface.line_to(seg.b.0, seg.b.1);
            }
            surface.stroke();
        }
    }

    fn draw_hotspots(&self, surface: &mut dyn Surface, elapsed: f64) {
        for (hs, &(cx, cy)) in self.config.hotspots.iter().zip(&self.layout.hotspots) {
            let phase = hs.phase(elapsed);
            let radius = hs.base_radius + phase * 12.0;

            let glow = Gradient::radial(cx, cy, 0.0, radius * 2.0)
                .stop(0.0, COBALT.alpha(0.12 * hs.intensity * (0.6 + phase * 0.4)))
                .stop(0.5, COBALT.alpha(0.05 * hs.intensity))
                .stop(1.0, COBALT.alpha(0.0));
            surface.fill_circle(cx, cy, radius * 2.0, glow);

            let ring = hs.base_radius * 0.6 + phase * hs.base_radius * 0.8;
            surface.stroke_circle(cx, cy, ring, 1.5, COBALT.alpha(0.25 * (1.0 - phase) * hs.intensity));

            surface.fill_circle(cx, cy, 3.0, COBALT.alpha(0.7 * hs.intensity));

            let cross = 8.0;
            surface.set_stroke(&COBALT.alpha(0.3 * hs.intensity).into());
            surface.set_line_width(0.5);
            surface.begin_path();
            surface.move_to(cx - cross, cy);
            surface.line_to(cx + cross, cy);
            surface.move_to(cx, cy - cross);
            surface.line_to(cx, cy + cross);
            surface.stroke();
        }
    }

    fn draw_labels(&self, surface: &mut dyn Surface, viewport: &Viewport) {
        let (w, h) = (viewport.width, viewport.height);
        surface.set_font(&mono(9, false));
        surface.set_text_baseline(TextBaseline::Alphabetic);
        let faint = INK.alpha(0.2);
        surface.text("14.5995° N", 12.0, 20.0, TextAlign::Left, faint);
        surface.text("120.9842° E", 12.0, 32.0, TextAlign::Left, faint);
        surface.text("TERRAIN.ELEV", w - 12.0, 20.0, TextAlign::Right, faint);
        surface.text("NCR METRO MANILA", w - 12.0, 32.0, TextAlign::Right, faint);
        surface.text(&self.status_line(), 12.0, h - 12.0, TextAlign::Left, INK.alpha(0.15));
    }

    pub fn status_line(&self) -> String {
        format!(
            "HAZARD_OVERLAY // {} ACTIVE ZONES // REAL-TIME",
            self.config.hotspots.len()
        )
    }
}

impl Default for TerrainMap {
    fn default() -> Self {
        Self::new(TerrainConfig::default())
    }
}

impl Scene for TerrainMap {
    fn name(&self) -> &'static str {
        "terrain"
    }

    fn layout(&mut self, viewport: &Viewport) {
        let cols = self.grid.cols().max(2);
        let rows = self.grid.rows().max(2);
        let cell_w = viewport.width / (cols - 1) as f64;
        let cell_h = viewport.height / (rows - 1) as f64;
        let contours = self
            .config
            .levels
            .iter()
            .map(|&level| (level, contour_segments(&self.grid, level, cell_w, cell_h)))
            .collect();
        let hotspots = self
            .config
            .hotspots
            .iter()
            .map(|hs| viewport.to_pixels(hs.x, hs.y))
            .collect();
        self.layout = TerrainLayout {
            cell_w,
            cell_h,
            hotspots,
            contours,
        };
    }

    fn render(&mut self, surface: &mut dyn Surface, viewport: &Viewport, elapsed: f64) {
        let (w, h) = (viewport.width, viewport.height);
        surface.clear_rect(0.0, 0.0, w, h);

        let bg = Gradient::linear(0.0, 0.0, w, h)
            .stop(0.0, TERRAIN_BG[0])
            .stop(0.5, TERRAIN_BG[1])
            .stop(1.0, TERRAIN_BG[2]);
        surface.set_fill(&bg.into());
        surface.fill_rect(0.0, 0.0, w, h);

        self.draw_contours(surface);

        surface.set_stroke(&INK.alpha(0.025).into());
        surface.set_line_width(0.5);
        surface.stroke_lattice(w, h, self.config.grid_spacing, 0.0);

        self.draw_hotspots(surface, elapsed);
        self.draw_labels(surface, viewport);

        if h > 0.0 {
            let scan_y = (elapsed * SCAN_LINE_SPEED).rem_euclid(h);
            surface.set_stroke(&COBALT.alpha(0.04).into());
            surface.set_line_width(1.0);
            surface.stroke_line(0.0, scan_y, w, scan_y);
        }
    }
}
