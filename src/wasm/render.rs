use wasm_bindgen::JsValue;
use web_sys::{CanvasGradient, CanvasRenderingContext2d};

use crate::surface::{Gradient, GradientShape, Paint, Surface, TextAlign, TextBaseline};

/// [`Surface`] backed by a browser 2D context.
///
/// Canvas calls that can throw (bad transform values, malformed gradient
/// stops) are ignored: a decorative frame is better partially drawn than
/// aborted.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    fn gradient(&self, gradient: &Gradient) -> Option<CanvasGradient> {
        let g = match gradient.shape {
            GradientShape::Linear { x0, y0, x1, y1 } => self.ctx.create_linear_gradient(x0, y0, x1, y1),
            GradientShape::Radial { x, y, r0, r1 } => {
                self.ctx.create_radial_gradient(x, y, r0, x, y, r1).ok()?
            }
        };
        for (offset, color) in &gradient.stops {
            g.add_color_stop(*offset as f32, &color.css()).ok()?;
        }
        Some(g)
    }
}

impl Surface for CanvasSurface {
    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        let _ = self.ctx.set_transform(a, b, c, d, e, f);
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.clear_rect(x, y, w, h);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.fill_rect(x, y, w, h);
    }

    fn set_fill(&mut self, paint: &Paint) {
        match paint {
            Paint::Solid(color) => self.ctx.set_fill_style_str(&color.css()),
            Paint::Gradient(gradient) => {
                if let Some(g) = self.gradient(gradient) {
                    self.ctx.set_fill_style_canvas_gradient(&g);
                }
            }
        }
    }

    fn set_stroke(&mut self, paint: &Paint) {
        match paint {
            Paint::Solid(color) => self.ctx.set_stroke_style_str(&color.css()),
            Paint::Gradient(gradient) => {
                if let Some(g) = self.gradient(gradient) {
                    self.ctx.set_stroke_style_canvas_gradient(&g);
                }
            }
        }
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_line_dash(&mut self, segments: &[f64], offset: f64) {
        let dash: js_sys::Array = segments.iter().map(|&s| JsValue::from_f64(s)).collect();
        let _ = self.ctx.set_line_dash(&dash);
        self.ctx.set_line_dash_offset(offset);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) {
        let _ = self.ctx.arc(x, y, radius, start, end);
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.rect(x, y, w, h);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f64, y: f64) {
        let _ = self.ctx.translate(x, y);
    }

    fn rotate(&mut self, angle: f64) {
        let _ = self.ctx.rotate(angle);
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.ctx.set_text_align(align.as_str());
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.ctx.set_text_baseline(baseline.as_str());
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let _ = self.ctx.fill_text(text, x, y);
    }
}
