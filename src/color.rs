use std::fmt;

/// 8-bit RGB with a floating point alpha, formatted the way canvas
/// style strings expect (`rgba(r, g, b, a)`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same colour at a different opacity, clamped to [0, 1].
    pub fn alpha(self, a: f64) -> Self {
        Self {
            a: if a.is_nan() { 0.0 } else { a.clamp(0.0, 1.0) },
            ..self
        }
    }

    pub fn css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

pub const INK: Rgba = Rgba::rgb(26, 28, 30);
pub const COBALT: Rgba = Rgba::rgb(0, 41, 154);
pub const EMERGENCY: Rgba = Rgba::rgb(255, 69, 0);
pub const SIGNAL_GREEN: Rgba = Rgba::rgb(34, 197, 94);
pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
pub const MIST: Rgba = Rgba::rgb(224, 224, 224);

pub const TERRAIN_BG: [Rgba; 3] = [
    Rgba::rgb(0xED, 0xED, 0xEE),
    Rgba::rgb(0xE8, 0xE8, 0xEA),
    Rgba::rgb(0xF0, 0xF0, 0xF2),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_css_rgba() {
        assert_eq!(EMERGENCY.alpha(0.5).css(), "rgba(255, 69, 0, 0.5)");
        assert_eq!(INK.css(), "rgba(26, 28, 30, 1)");
    }

    #[test]
    fn alpha_is_clamped() {
        assert_eq!(WHITE.alpha(1.7).a, 1.0);
        assert_eq!(WHITE.alpha(-0.2).a, 0.0);
        assert_eq!(WHITE.alpha(f64::NAN).a, 0.0);
    }
}
