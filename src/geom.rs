//! Small value types shared by the confetti and balloon engines.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canvas-space point in CSS pixels (y grows downward).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Drawable area of a surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Opaque RGB triple, deserialized from `[r, g, b]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba { rgb: self, alpha }
    }
}

/// RGB plus alpha in 0..=1; `Display` yields a CSS `rgba(...)` string.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f64,
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.rgb.0;
        write!(f, "rgba({},{},{},{})", r, g, b, self.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_css() {
        let c = Rgb::new(255, 0, 12).with_alpha(0.4);
        assert_eq!(c.to_string(), "rgba(255,0,12,0.4)");
        assert_eq!(Rgb::new(1, 2, 3).with_alpha(1.0).to_string(), "rgba(1,2,3,1)");
    }

    #[test]
    fn test_rgb_from_json_array() {
        let c: Rgb = serde_json::from_str("[165, 104, 246]").unwrap();
        assert_eq!(c, Rgb::new(165, 104, 246));
    }
}
