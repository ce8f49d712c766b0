//! Call-to-action backdrop: a slowly scrolling square grid with breathing
//! rings across the middle.

use crate::color::EMERGENCY;
use crate::config::{FRAMES_PER_SECOND, SIGNAL_GRID_RINGS, SIGNAL_GRID_SPACING};
use crate::surface::{Surface, SurfaceExt};
use crate::viewport::Viewport;

use super::Scene;

#[derive(Debug, Clone)]
pub struct SignalGrid {
    spacing: f64,
    rings: usize,
}

impl SignalGrid {
    pub fn new(spacing: f64, rings: usize) -> Self {
        Self {
            spacing: spacing.max(1.0),
            rings,
        }
    }

    /// Scroll offset of the lattice, in [0, spacing).
    pub fn offset(&self, elapsed: f64) -> f64 {
        (elapsed * FRAMES_PER_SECOND * 0.3).rem_euclid(self.spacing)
    }

    /// Centre and radius of ring `i` at `elapsed`.
    pub fn ring(&self, viewport: &Viewport, i: usize, elapsed: f64) -> (f64, f64, f64) {
        let frame = elapsed * FRAMES_PER_SECOND;
        let fi = i as f64;
        let cx = viewport.width * ((fi + 1.0) / (self.rings as f64 + 1.0));
        let cy = viewport.height / 2.0 + (frame * 0.008 + fi * 1.5).sin() * 30.0;
        let r = 15.0 + (frame * 0.01 + fi).sin() * 5.0;
        (cx, cy, r)
    }
}

impl Default for SignalGrid {
    fn default() -> Self {
        Self::new(SIGNAL_GRID_SPACING, SIGNAL_GRID_RINGS)
    }
}

impl Scene for SignalGrid {
    fn name(&self) -> &'static str {
        "signal-grid"
    }

    fn layout(&mut self, _viewport: &Viewport) {}

    fn render(&mut self, surface: &mut dyn Surface, viewport: &Viewport, elapsed: f64) {
        let (w, h) = (viewport.width, viewport.height);
        let frame = elapsed * FRAMES_PER_SECOND;
        surface.clear_rect(0.0, 0.0, w, h);

        surface.set_stroke(&EMERGENCY.alpha(0.04).into());
        surface.set_line_width(1.0);
        let start = self.offset(elapsed) - self.spacing;
        surface.stroke_lattice(w + self.spacing, h + self.spacing, self.spacing, start);

        for i in 0..self.rings {
            let (cx, cy, r) = self.ring(viewport, i, elapsed);
            let alpha = 0.05 + (frame * 0.01 + i as f64).sin() * 0.03;
            surface.stroke_circle(cx, cy, r, 1.0, EMERGENCY.alpha(alpha));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_loops_within_spacing() {
        let grid = SignalGrid::default();
        for t in [0.0, 1.0, 2.2, 1_000.0] {
            let o = grid.offset(t);
            assert!((0.0..40.0).contains(&o));
        }
        assert_eq!(grid.offset(0.0), 0.0);
    }

    #[test]
    fn rings_are_spread_evenly() {
        let grid = SignalGrid::default();
        let vp = Viewport::new(600.0, 200.0, 1.0);
        let xs: Vec<f64> = (0..5).map(|i| grid.ring(&vp, i, 0.0).0).collect();
        assert_eq!(xs, vec![100.0, 200.0, 300.0, 400.0, 500.0]);
    }
}
