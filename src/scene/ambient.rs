//! Full-page geometric background: drifting wireframe shapes, rising motes
//! and dashed scrolling grid lines.

use std::f64::consts::{PI, TAU};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::color::{EMERGENCY, MIST};
use crate::config::{
    AMBIENT_GRID_LINES, AMBIENT_MOTES, AMBIENT_SHAPES, FRAMES_PER_SECOND, MAX_STEP_SECONDS,
    MOTE_WRAP_MARGIN, SHAPE_WRAP_MARGIN,
};
use crate::surface::{Surface, SurfaceExt};
use crate::viewport::Viewport;

use super::{hexagon_path, Scene};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Triangle,
    Hexagon,
    Diamond,
    Circle,
    Square,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Triangle,
        ShapeKind::Hexagon,
        ShapeKind::Diamond,
        ShapeKind::Circle,
        ShapeKind::Square,
    ];
}

/// Positions are relative to the viewport; drift is in CSS pixels per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub rotation: f64,
    pub angular_velocity: f64,
    pub drift_x: f64,
    pub drift_y: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mote {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    /// Vertical speed in CSS pixels per frame; negative rises.
    pub rise: f64,
    pub sway: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLine {
    pub y: f64,
    pub opacity: f64,
    pub dash_offset: f64,
    pub speed: f64,
}

#[derive(Debug, Clone)]
pub struct AmbientConfig {
    pub shapes: usize,
    pub motes: usize,
    pub grid_lines: usize,
    pub seed: u64,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            shapes: AMBIENT_SHAPES,
            motes: AMBIENT_MOTES,
            grid_lines: AMBIENT_GRID_LINES,
            seed: 0x5EED_A3B1,
        }
    }
}

pub struct AmbientField {
    shapes: Vec<Shape>,
    motes: Vec<Mote>,
    grid_lines: Vec<GridLine>,
    rng: SmallRng,
    viewport: Viewport,
    last_elapsed: Option<f64>,
}

impl AmbientField {
    /// Draw every entity from a generator seeded with `config.seed`; equal
    /// seeds give equal fields.
    pub fn new(config: AmbientConfig) -> Self {
        let mut rng = SmallRng::seed_from_u64(config.seed);

        let shapes = (0..config.shapes)
            .map(|_| Shape {
                kind: ShapeKind::ALL[rng.gen_range(0..ShapeKind::ALL.len())],
                x: rng.gen(),
                y: rng.gen(),
                size: 20.0 + rng.gen::<f64>() * 50.0,
                rotation: rng.gen::<f64>() * TAU,
                angular_velocity: (rng.gen::<f64>() - 0.5) * 0.005,
                drift_x: (rng.gen::<f64>() - 0.5) * 0.3,
                drift_y: (rng.gen::<f64>() - 0.5) * 0.15,
                opacity: 0.03 + rng.gen::<f64>() * 0.06,
            })
            .collect();

        let motes = (0..config.motes)
            .map(|_| Mote {
                x: rng.gen(),
                y: rng.gen(),
                size: 1.0 + rng.gen::<f64>() * 2.0,
                rise: -0.2 - rng.gen::<f64>() * 0.5,
                sway: (rng.gen::<f64>() - 0.5) * 0.2,
                opacity: 0.05 + rng.gen::<f64>() * 0.1,
            })
            .collect();

        let lines = config.grid_lines.max(1) as f64;
        let grid_lines = (0..config.grid_lines)
            .map(|i| GridLine {
                // one line per band, jittered within it
                y: (i as f64 + rng.gen::<f64>()) / lines,
                opacity: 0.02 + rng.gen::<f64>() * 0.03,
                dash_offset: rng.gen::<f64>() * 100.0,
                speed: 0.2 + rng.gen::<f64>() * 0.3,
            })
            .collect();

        Self {
            shapes,
            motes,
            grid_lines,
            rng,
            viewport: Viewport::default(),
            last_elapsed: None,
        }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn motes(&self) -> &[Mote] {
        &self.motes
    }

    pub fn grid_lines(&self) -> &[GridLine] {
        &self.grid_lines
    }

    pub fn shape_pixels(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.shapes.iter().map(|s| self.viewport.to_pixels(s.x, s.y))
    }

    pub fn mote_pixels(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.motes.iter().map(|m| self.viewport.to_pixels(m.x, m.y))
    }

    /// Advance every entity by `frames` 60 Hz frames, wrapping at the edges.
    pub fn step(&mut self, frames: f64) {
        let (w, h) = (self.viewport.width, self.viewport.height);
        if w <= 0.0 || h <= 0.0 || frames <= 0.0 {
            return;
        }

        let (mx, my) = (SHAPE_WRAP_MARGIN / w, SHAPE_WRAP_MARGIN / h);
        for s in &mut self.shapes {
            s.rotation = (s.rotation + s.angular_velocity * frames).rem_euclid(TAU);
            s.x = wrap(s.x + s.drift_x * frames / w, -mx, 1.0 + mx);
            s.y = wrap(s.y + s.drift_y * frames / h, -my, 1.0 + my);
        }

        let (px, py) = (MOTE_WRAP_MARGIN / w, MOTE_WRAP_MARGIN / h);
        for m in &mut self.motes {
            m.x = wrap(m.x + m.sway * frames / w, -px, 1.0 + px);
            m.y += m.rise * frames / h;
            if m.y < -py {
                m.y = 1.0 + py;
                m.x = self.rng.gen();
            }
        }

        for line in &mut self.grid_lines {
            line.dash_offset = (line.dash_offset + line.speed * frames).rem_euclid(DASH_PERIOD);
        }
    }

    fn draw_shape(surface: &mut dyn Surface, s: &Shape, x: f64, y: f64) {
        surface.save();
        surface.translate(x, y);
        surface.rotate(s.rotation);
        surface.set_stroke(&EMERGENCY.alpha(s.opacity).into());
        surface.set_line_width(1.0);
        surface.begin_path();
        let size = s.size;
        match s.kind {
            ShapeKind::Triangle => {
                surface.move_to(0.0, -size);
                surface.line_to(size * 0.866, size * 0.5);
                surface.line_to(-size * 0.866, size * 0.5);
                surface.close_path();
            }
            ShapeKind::Hexagon => hexagon_path(surface, size),
            ShapeKind::Diamond => {
                surface.move_to(0.0, -size);
                surface.line_to(size * 0.6, 0.0);
                surface.line_to(0.0, size);
                surface.line_to(-size * 0.6, 0.0);
                surface.close_path();
            }
            ShapeKind::Circle => surface.arc(0.0, 0.0, size, 0.0, 2.0 * PI),
            ShapeKind::Square => surface.rect(-size / 2.0, -size / 2.0, size, size),
        }
        surface.stroke();
        surface.restore();
    }
}

/// Dash pattern is 4 on, 20 off.
const DASH: [f64; 2] = [4.0, 20.0];
const DASH_PERIOD: f64 = 24.0;

/// Toroidal wrap into [lo, hi].
fn wrap(v: f64, lo: f64, hi: f64) -> f64 {
    if v < lo {
        hi - (lo - v) % (hi - lo)
    } else if v > hi {
        lo + (v - hi) % (hi - lo)
    } else {
        v
    }
}

impl Default for AmbientField {
    fn default() -> Self {
        Self::new(AmbientConfig::default())
    }
}

impl Scene for AmbientField {
    fn name(&self) -> &'static str {
        "ambient"
    }

    fn layout(&mut self, viewport: &Viewport) {
        self.viewport = *viewport;
    }

    fn render(&mut self, surface: &mut dyn Surface, viewport: &Viewport, elapsed: f64) {
        let dt = match self.last_elapsed {
            Some(prev) => (elapsed - prev).clamp(0.0, MAX_STEP_SECONDS),
            None => 0.0,
        };
        self.last_elapsed = Some(elapsed);
        self.step(dt * FRAMES_PER_SECOND);

        let (w, h) = (viewport.width, viewport.height);
        surface.clear_rect(0.0, 0.0, w, h);

        for line in &self.grid_lines {
            surface.set_line_dash(&DASH, -line.dash_offset);
            surface.set_stroke(&MIST.alpha(line.opacity).into());
            surface.set_line_width(1.0);
            let y = line.y * h;
            surface.stroke_line(0.0, y, w, y);
        }
        surface.set_line_dash(&[], 0.0);

        for s in &self.shapes {
            let (x, y) = viewport.to_pixels(s.x, s.y);
            Self::draw_shape(surface, s, x, y);
        }

        for m in &self.motes {
            let (x, y) = viewport.to_pixels(m.x, m.y);
            surface.fill_circle(x, y, m.size, EMERGENCY.alpha(m.opacity));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = AmbientField::default();
        let b = AmbientField::default();
        assert_eq!(a.shapes(), b.shapes());
        assert_eq!(a.motes(), b.motes());
        assert_eq!(a.shapes().len(), 18);
        assert_eq!(a.motes().len(), 40);
        assert_eq!(a.grid_lines().len(), 12);

        let c = AmbientField::new(AmbientConfig {
            seed: 7,
            ..AmbientConfig::default()
        });
        assert_ne!(a.shapes(), c.shapes());
    }

    #[test]
    fn wrap_is_toroidal() {
        assert_eq!(wrap(0.5, 0.0, 1.0), 0.5);
        assert!((wrap(-0.25, 0.0, 1.0) - 0.75).abs() < 1e-12);
        assert!((wrap(1.25, 0.0, 1.0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn population_stays_within_margins() {
        let mut field = AmbientField::default();
        let vp = Viewport::new(320.0, 240.0, 1.0);
        field.layout(&vp);
        for _ in 0..2_000 {
            field.step(3.0);
        }
        assert_eq!(field.shapes().len(), 18);
        assert_eq!(field.motes().len(), 40);
        for (x, y) in field.shape_pixels() {
            assert!((-100.0..=420.0).contains(&x), "x {x}");
            assert!((-100.0..=340.0).contains(&y), "y {y}");
        }
        for (x, y) in field.mote_pixels() {
            assert!((-10.0..=330.0).contains(&x), "x {x}");
            assert!((-10.0..=250.0).contains(&y), "y {y}");
        }
    }

    #[test]
    fn resize_keeps_relative_layout() {
        let mut field = AmbientField::default();
        field.layout(&Viewport::new(800.0, 600.0, 1.0));
        field.step(10.0);
        let before = field.shapes().to_vec();
        field.layout(&Viewport::new(400.0, 300.0, 2.0));
        assert_eq!(before, field.shapes());
    }

    #[test]
    fn first_frame_does_not_move() {
        let mut field = AmbientField::default();
        let vp = Viewport::new(800.0, 600.0, 1.0);
        field.layout(&vp);
        let before = field.shapes().to_vec();
        field.render(&mut RecordingSurface::new(), &vp, 12.0);
        assert_eq!(before, field.shapes());
        field.render(&mut RecordingSurface::new(), &vp, 12.5);
        assert_ne!(before, field.shapes());
    }
}
