//! Hero backdrop: softly orbiting points linked by proximity, with a few
//! rotating hexagon outlines.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::color::EMERGENCY;
use crate::config::{CONSTELLATION_LINK_DISTANCE, CONSTELLATION_STARS, FRAMES_PER_SECOND};
use crate::surface::{Surface, SurfaceExt};
use crate::viewport::Viewport;

use super::{hexagon_path, Scene};

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    /// Rest position, relative to the viewport.
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub phase: f64,
}

#[derive(Debug, Clone)]
pub struct ConstellationConfig {
    pub stars: usize,
    pub link_distance: f64,
    pub seed: u64,
}

impl Default for ConstellationConfig {
    fn default() -> Self {
        Self {
            stars: CONSTELLATION_STARS,
            link_distance: CONSTELLATION_LINK_DISTANCE,
            seed: 0xC0FF_EE17,
        }
    }
}

pub struct Constellation {
    stars: Vec<Star>,
    link_distance: f64,
    /// Pixel positions computed for the frame being drawn.
    frame_positions: Vec<(f64, f64)>,
}

impl Constellation {
    pub fn new(config: ConstellationConfig) -> Self {
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let stars = (0..config.stars)
            .map(|_| Star {
                x: rng.gen(),
                y: rng.gen(),
                radius: 2.0 + rng.gen::<f64>() * 3.0,
                phase: rng.gen::<f64>() * std::f64::consts::TAU,
            })
            .collect();
        Self {
            stars,
            link_distance: config.link_distance,
            frame_positions: Vec::with_capacity(config.stars),
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Pixel position of every star at `elapsed`: rest position plus a
    /// 15 x 10 px Lissajous wobble.
    pub fn positions(&self, viewport: &Viewport, elapsed: f64) -> Vec<(f64, f64)> {
        let frame = elapsed * FRAMES_PER_SECOND;
        self.stars
            .iter()
            .map(|s| {
                let (bx, by) = viewport.to_pixels(s.x, s.y);
                (
                    bx + (frame * 0.008 + s.phase).sin() * 15.0,
                    by + (frame * 0.006 + s.phase).cos() * 10.0,
                )
            })
            .collect()
    }

    /// Index pairs closer than the link distance, with link opacity.
    pub fn links(&self, positions: &[(f64, f64)]) -> Vec<(usize, usize, f64)> {
        let mut links = Vec::new();
        for i in 0..positions.len() {
            for j in i + 1..positions.len() {
                let (dx, dy) = (positions[i].0 - positions[j].0, positions[i].1 - positions[j].1);
                let dist = dx.hypot(dy);
                if dist < self.link_distance {
                    links.push((i, j, (1.0 - dist / self.link_distance) * 0.15));
                }
            }
        }
        links
    }
}

impl Default for Constellation {
    fn default() -> Self {
        Self::new(ConstellationConfig::default())
    }
}

impl Scene for Constellation {
    fn name(&self) -> &'static str {
        "constellation"
    }

    fn layout(&mut self, _viewport: &Viewport) {
        // Rest positions are relative; nothing to cache per size.
    }

    fn render(&mut self, surface: &mut dyn Surface, viewport: &Viewport, elapsed: f64) {
        let (w, h) = (viewport.width, viewport.height);
        let frame = elapsed * FRAMES_PER_SECOND;
        surface.clear_rect(0.0, 0.0, w, h);

        self.frame_positions = self.positions(viewport, elapsed);

        surface.set_line_width(1.0);
        for (i, j, alpha) in self.links(&self.frame_positions) {
            surface.set_stroke(&EMERGENCY.alpha(alpha).into());
            let ((ax, ay), (bx, by)) = (self.frame_positions[i], self.frame_positions[j]);
            surface.stroke_line(ax, ay, bx, by);
        }

        for (s, &(x, y)) in self.stars.iter().zip(&self.frame_positions) {
            let glow = 0.3 + (frame * 0.02 + s.phase).sin() * 0.2;
            surface.fill_circle(x, y, s.radius, EMERGENCY.alpha(glow));
            surface.stroke_circle(x, y, s.radius + 4.0, 1.0, EMERGENCY.alpha(glow * 0.4));
        }

        for i in 0..3 {
            let fi = i as f64;
            let cx = w / 4.0 * (fi + 1.0);
            let cy = h / 2.0 + (frame * 0.01 + fi * 2.0).sin() * 30.0;
            surface.save();
            surface.translate(cx, cy);
            surface.rotate(frame * 0.003 + fi);
            surface.set_stroke(&EMERGENCY.alpha(0.06).into());
            surface.set_line_width(1.0);
            surface.begin_path();
            hexagon_path(surface, 30.0 + fi * 10.0);
            surface.stroke();
            surface.restore();
        }
    }
}
