//! RGB color handling for layout entry placement marks.

// Allow small types passed by reference for API consistency
#![allow(clippy::trivially_copy_pass_by_ref)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// RGB color value carried by layout entries.
///
/// Layout JSON expresses colors as a `[r, g, b]` triple (0-255 each);
/// this type serializes in the same shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct RgbColor {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl RgbColor {
    /// Creates a new `RgbColor` from individual channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Converts the color to a hex string in the format "#RRGGBB" (uppercase).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Converts the color to a Ratatui Color for terminal rendering.
    #[must_use]
    pub const fn to_ratatui_color(&self) -> ratatui::style::Color {
        ratatui::style::Color::Rgb(self.r, self.g, self.b)
    }

    /// Returns a dimmed version of the color at the given percentage.
    ///
    /// # Arguments
    ///
    /// * `percent` - Brightness percentage (0-100). 0 = black, 100 = original color.
    #[must_use]
    pub const fn dim(&self, percent: u8) -> Self {
        let percent = if percent > 100 { 100 } else { percent };
        Self {
            r: (self.r as u16 * percent as u16 / 100) as u8,
            g: (self.g as u16 * percent as u16 / 100) as u8,
            b: (self.b as u16 * percent as u16 / 100) as u8,
        }
    }
}

impl From<[u8; 3]> for RgbColor {
    fn from(triple: [u8; 3]) -> Self {
        Self::new(triple[0], triple[1], triple[2])
    }
}

impl From<RgbColor> for [u8; 3] {
    fn from(color: RgbColor) -> Self {
        [color.r, color.g, color.b]
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Default for RgbColor {
    /// Default color is white (#FFFFFF).
    fn default() -> Self {
        Self::new(255, 255, 255)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_hex() {
        let color = RgbColor::new(255, 0, 0);
        assert_eq!(color.to_hex(), "#FF0000");

        let color = RgbColor::new(0, 128, 255);
        assert_eq!(color.to_hex(), "#0080FF");

        let color = RgbColor::new(0, 0, 0);
        assert_eq!(color.to_hex(), "#000000");
    }

    #[test]
    fn test_from_triple() {
        let color = RgbColor::from([221, 35, 36]);
        assert_eq!(color, RgbColor::new(221, 35, 36));
    }

    #[test]
    fn test_triple_roundtrip() {
        let original = RgbColor::new(123, 45, 67);
        let triple: [u8; 3] = original.into();
        assert_eq!(RgbColor::from(triple), original);
    }

    #[test]
    fn test_serde_array_shape() {
        let color: RgbColor = serde_json::from_str("[10, 20, 30]").unwrap();
        assert_eq!(color, RgbColor::new(10, 20, 30));

        let encoded = serde_json::to_string(&color).unwrap();
        assert_eq!(encoded, "[10,20,30]");
    }

    #[test]
    fn test_dim() {
        let color = RgbColor::new(200, 100, 50);
        assert_eq!(color.dim(50), RgbColor::new(100, 50, 25));
        assert_eq!(color.dim(0), RgbColor::new(0, 0, 0));
        assert_eq!(color.dim(100), color);
        // Over-100 percentages clamp to the original color
        assert_eq!(color.dim(150), color);
    }

    #[test]
    fn test_default() {
        assert_eq!(RgbColor::default(), RgbColor::new(255, 255, 255));
    }
}
