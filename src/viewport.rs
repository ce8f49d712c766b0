use crate::config::MAX_PIXEL_RATIO;

/// Drawing area in CSS pixels plus the pixel ratio of the backing bitmap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            pixel_ratio: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self {
            width: sanitize_extent(width),
            height: sanitize_extent(height),
            pixel_ratio: sanitize_ratio(pixel_ratio),
        }
    }

    /// Physical size of the backing bitmap.
    pub fn backing_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).round() as u32,
            (self.height * self.pixel_ratio).round() as u32,
        )
    }

    /// Map a resolution-independent coordinate to CSS pixels.
    pub fn to_pixels(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.width, y * self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

fn sanitize_extent(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

fn sanitize_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}

/// Outcome of a sizing pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resized {
    pub viewport: Viewport,
    /// False when the container reported the same geometry as last time.
    pub changed: bool,
}

/// Tracks the last measured viewport so redundant resize notifications do
/// not trigger a re-layout.
#[derive(Debug, Default, Clone)]
pub struct ViewportSizer {
    current: Option<Viewport>,
}

impl ViewportSizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resize(&mut self, css_width: f64, css_height: f64, device_pixel_ratio: f64) -> Resized {
        let viewport = Viewport::new(css_width, css_height, device_pixel_ratio);
        let changed = self.current != Some(viewport);
        if changed {
            log::debug!(
                "viewport {}x{} @{}x",
                viewport.width,
                viewport.height,
                viewport.pixel_ratio
            );
            self.current = Some(viewport);
        }
        Resized { viewport, changed }
    }

    pub fn current(&self) -> Option<Viewport> {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_is_capped() {
        let vp = Viewport::new(100.0, 50.0, 3.0);
        assert_eq!(vp.pixel_ratio, 2.0);
        assert_eq!(vp.backing_size(), (200, 100));
    }

    #[test]
    fn invalid_inputs_fall_back() {
        let vp = Viewport::new(-4.0, f64::NAN, 0.0);
        assert_eq!(vp, Viewport::default());
        assert!(vp.is_empty());
    }

    #[test]
    fn fractional_ratio_rounds_backing() {
        let vp = Viewport::new(333.0, 101.0, 1.5);
        assert_eq!(vp.backing_size(), (500, 152));
    }

    #[test]
    fn resize_is_idempotent() {
        let mut sizer = ViewportSizer::new();
        let first = sizer.resize(800.0, 400.0, 2.0);
        let second = sizer.resize(800.0, 400.0, 2.0);
        assert!(first.changed);
        assert!(!second.changed);
        assert_eq!(first.viewport, second.viewport);

        let third = sizer.resize(640.0, 400.0, 2.0);
        assert!(third.changed);
        assert_eq!(sizer.current(), Some(third.viewport));
    }
}
