//! Animated visualizations. Each scene owns its entity model and paints it
//! for a given viewport and elapsed time.

use std::f64::consts::{FRAC_PI_3, FRAC_PI_6};

use crate::surface::Surface;
use crate::viewport::Viewport;

pub mod ambient;
pub mod constellation;
pub mod mesh;
pub mod signal_grid;
pub mod terrain;

pub use ambient::{AmbientConfig, AmbientField};
pub use constellation::{Constellation, ConstellationConfig};
pub use mesh::{MeshConfig, MeshNetwork};
pub use signal_grid::SignalGrid;
pub use terrain::{TerrainConfig, TerrainMap};

pub trait Scene {
    fn name(&self) -> &'static str;

    /// Recompute pixel-space caches for a new viewport. Must not reset
    /// velocities or animation phases.
    fn layout(&mut self, viewport: &Viewport);

    /// Paint one frame. May advance transient per-entity state but never
    /// changes entity counts or topology.
    fn render(&mut self, surface: &mut dyn Surface, viewport: &Viewport, elapsed: f64);
}

/// Position in [0, 1) along a looping cycle of `period` seconds, shifted by
/// `offset` cycles.
pub fn cycle_progress(elapsed: f64, period: f64, offset: f64) -> f64 {
    if period <= 0.0 {
        return offset.rem_euclid(1.0);
    }
    let p = (elapsed / period + offset).rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if p >= 1.0 {
        0.0
    } else {
        p
    }
}

/// Sine remapped to [0, 1].
pub(crate) fn pulse(phase: f64) -> f64 {
    phase.sin() * 0.5 + 0.5
}

/// Flat-topped hexagon path centred on the current origin.
pub(crate) fn hexagon_path(surface: &mut dyn Surface, size: f64) {
    for i in 0..6 {
        let angle = FRAC_PI_3 * i as f64 - FRAC_PI_6;
        let (px, py) = (angle.cos() * size, angle.sin() * size);
        if i == 0 {
            surface.move_to(px, py);
        } else {
            surface.line_to(px, py);
        }
    }
    surface.close_path();
}

/// Monospace font string at `px` size.
pub(crate) fn mono(px: u32, bold: bool) -> String {
    let weight = if bold { "bold " } else { "" };
    format!("{weight}{px}px {}", crate::config::MONO_FONT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_wraps() {
        assert_eq!(cycle_progress(0.0, 4.0, 0.0), 0.0);
        assert_eq!(cycle_progress(2.0, 4.0, 0.0), 0.5);
        assert_eq!(cycle_progress(4.0, 4.0, 0.0), 0.0);
        assert!((cycle_progress(3.0, 4.0, 0.5) - 0.25).abs() < 1e-12);
        assert!(cycle_progress(-1e-18, 4.0, 0.0) < 1.0);
    }

    #[test]
    fn staggered_particles_are_evenly_offset() {
        let t = 1.37;
        let p: Vec<f64> = (0..3).map(|i| cycle_progress(t, 4.0, i as f64 / 3.0)).collect();
        for i in 0..3 {
            let next = p[(i + 1) % 3];
            let gap = (next - p[i]).rem_euclid(1.0);
            assert!((gap - 1.0 / 3.0).abs() < 1e-9, "gap {gap}");
        }
    }
}
