//! Canvas-like drawing surface used by every scene.
//!
//! The browser backend forwards to `CanvasRenderingContext2d`; the
//! [`RecordingSurface`] keeps a log of [`DrawOp`]s for headless use.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use crate::color::Rgba;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Alphabetic,
    Middle,
}

impl TextBaseline {
    pub fn as_str(self) -> &'static str {
        match self {
            TextBaseline::Alphabetic => "alphabetic",
            TextBaseline::Middle => "middle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientShape {
    Linear { x0: f64, y0: f64, x1: f64, y1: f64 },
    /// Concentric radial gradient from `r0` to `r1` around `(x, y)`.
    Radial { x: f64, y: f64, r0: f64, r1: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub shape: GradientShape,
    pub stops: Vec<(f64, Rgba)>,
}

impl Gradient {
    pub fn linear(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            shape: GradientShape::Linear { x0, y0, x1, y1 },
            stops: Vec::new(),
        }
    }

    pub fn radial(x: f64, y: f64, r0: f64, r1: f64) -> Self {
        Self {
            shape: GradientShape::Radial { x, y, r0, r1 },
            stops: Vec::new(),
        }
    }

    pub fn stop(mut self, offset: f64, color: Rgba) -> Self {
        self.stops.push((offset.clamp(0.0, 1.0), color));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Gradient(Gradient),
}

impl From<Rgba> for Paint {
    fn from(color: Rgba) -> Self {
        Paint::Solid(color)
    }
}

impl From<Gradient> for Paint {
    fn from(gradient: Gradient) -> Self {
        Paint::Gradient(gradient)
    }
}

/// The subset of the 2D canvas API the scenes draw with.
pub trait Surface {
    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64);
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn set_fill(&mut self, paint: &Paint);
    fn set_stroke(&mut self, paint: &Paint);
    fn set_line_width(&mut self, width: f64);
    fn set_line_dash(&mut self, segments: &[f64], offset: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64);
    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, angle: f64);
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: TextAlign);
    fn set_text_baseline(&mut self, baseline: TextBaseline);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
}

/// Convenience drawing built on the primitive surface calls.
pub trait SurfaceExt: Surface {
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, paint: impl Into<Paint>) {
        self.set_fill(&paint.into());
        self.begin_path();
        self.arc(x, y, radius.max(0.0), 0.0, TAU);
        self.fill();
    }

    fn stroke_circle(&mut self, x: f64, y: f64, radius: f64, width: f64, paint: impl Into<Paint>) {
        self.set_stroke(&paint.into());
        self.set_line_width(width);
        self.begin_path();
        self.arc(x, y, radius.max(0.0), 0.0, TAU);
        self.stroke();
    }

    fn stroke_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        self.begin_path();
        self.move_to(x0, y0);
        self.line_to(x1, y1);
        self.stroke();
    }

    /// Axis-aligned lattice of lines every `spacing` pixels starting at
    /// `offset`, covering `width` x `height`.
    fn stroke_lattice(&mut self, width: f64, height: f64, spacing: f64, offset: f64) {
        if spacing <= 0.0 {
            return;
        }
        let mut x = offset;
        while x < width {
            self.stroke_line(x, 0.0, x, height);
            x += spacing;
        }
        let mut y = offset;
        while y < height {
            self.stroke_line(0.0, y, width, y);
            y += spacing;
        }
    }

    fn text(&mut self, text: &str, x: f64, y: f64, align: TextAlign, color: Rgba) {
        self.set_text_align(align);
        self.set_fill(&Paint::Solid(color));
        self.fill_text(text, x, y);
    }
}

impl<S: Surface + ?Sized> SurfaceExt for S {}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    SetTransform([f64; 6]),
    ClearRect(f64, f64, f64, f64),
    FillRect(f64, f64, f64, f64),
    SetFill(Paint),
    SetStroke(Paint),
    LineWidth(f64),
    LineDash(Vec<f64>, f64),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Arc { x: f64, y: f64, radius: f64 },
    Rect(f64, f64, f64, f64),
    ClosePath,
    Fill,
    Stroke,
    Save,
    Restore,
    Translate(f64, f64),
    Rotate(f64),
    Font(String),
    TextAlign(TextAlign),
    TextBaseline(TextBaseline),
    FillText { text: String, x: f64, y: f64 },
}

/// Surface that appends every call to a shared log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    ops: Rc<RefCell<Vec<DrawOp>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface writing into an existing log, so the log can outlive it.
    pub fn with_log(ops: Rc<RefCell<Vec<DrawOp>>>) -> Self {
        Self { ops }
    }

    pub fn ops(&self) -> Vec<DrawOp> {
        self.ops.borrow().clone()
    }

    pub fn clear(&self) {
        self.ops.borrow_mut().clear();
    }

    /// Every string passed to `fill_text`, in order.
    pub fn texts(&self) -> Vec<String> {
        self.ops
            .borrow()
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&mut self, op: DrawOp) {
        self.ops.borrow_mut().push(op);
    }
}

impl Surface for RecordingSurface {
    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        self.push(DrawOp::SetTransform([a, b, c, d, e, f]));
    }
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.push(DrawOp::ClearRect(x, y, w, h));
    }
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.push(DrawOp::FillRect(x, y, w, h));
    }
    fn set_fill(&mut self, paint: &Paint) {
        self.push(DrawOp::SetFill(paint.clone()));
    }
    fn set_stroke(&mut self, paint: &Paint) {
        self.push(DrawOp::SetStroke(paint.clone()));
    }
    fn set_line_width(&mut self, width: f64) {
        self.push(DrawOp::LineWidth(width));
    }
    fn set_line_dash(&mut self, segments: &[f64], offset: f64) {
        self.push(DrawOp::LineDash(segments.to_vec(), offset));
    }
    fn begin_path(&mut self) {
        self.push(DrawOp::BeginPath);
    }
    fn move_to(&mut self, x: f64, y: f64) {
        self.push(DrawOp::MoveTo(x, y));
    }
    fn line_to(&mut self, x: f64, y: f64) {
        self.push(DrawOp::LineTo(x, y));
    }
    fn arc(&mut self, x: f64, y: f64, radius: f64, _start: f64, _end: f64) {
        self.push(DrawOp::Arc { x, y, radius });
    }
    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.push(DrawOp::Rect(x, y, w, h));
    }
    fn close_path(&mut self) {
        self.push(DrawOp::ClosePath);
    }
    fn fill(&mut self) {
        self.push(DrawOp::Fill);
    }
    fn stroke(&mut self) {
        self.push(DrawOp::Stroke);
    }
    fn save(&mut self) {
        self.push(DrawOp::Save);
    }
    fn restore(&mut self) {
        self.push(DrawOp::Restore);
    }
    fn translate(&mut self, x: f64, y: f64) {
        self.push(DrawOp::Translate(x, y));
    }
    fn rotate(&mut self, angle: f64) {
        self.push(DrawOp::Rotate(angle));
    }
    fn set_font(&mut self, font: &str) {
        self.push(DrawOp::Font(font.to_string()));
    }
    fn set_text_align(&mut self, align: TextAlign) {
        self.push(DrawOp::TextAlign(align));
    }
    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.push(DrawOp::TextBaseline(baseline));
    }
    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.push(DrawOp::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::EMERGENCY;

    #[test]
    fn lattice_covers_area() {
        let mut surface = RecordingSurface::new();
        surface.stroke_lattice(100.0, 50.0, 40.0, 0.0);
        let strokes = surface.ops().iter().filter(|op| **op == DrawOp::Stroke).count();
        // x = 0, 40, 80 and y = 0, 40
        assert_eq!(strokes, 5);
    }

    #[test]
    fn gradient_stops_clamp_offsets() {
        let g = Gradient::linear(0.0, 0.0, 1.0, 1.0).stop(1.4, EMERGENCY);
        assert_eq!(g.stops[0].0, 1.0);
    }

    #[test]
    fn shared_log_survives_surface() {
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let mut surface = RecordingSurface::with_log(log.clone());
            surface.fill_circle(1.0, 2.0, 3.0, EMERGENCY);
        }
        assert_eq!(log.borrow().len(), 4);
    }
}
