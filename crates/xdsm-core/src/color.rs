//! Color handling for XDSM diagrams
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Colors are configured as CSS strings and emitted as
//! RGB triples for TikZ `\definecolor` declarations.

use std::str::FromStr;

use color::{DynamicColor, Srgb};

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use xdsm_core::color::Color;
    ///
    /// let green = Color::new("#dcf0dc").unwrap();
    /// let blue = Color::new("lightblue").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns the 8-bit sRGB components of this color, dropping alpha.
    ///
    /// # Examples
    ///
    /// ```
    /// use xdsm_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// assert_eq!(red.to_rgb8(), [255, 0, 0]);
    /// ```
    pub fn to_rgb8(self) -> [u8; 3] {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        [rgba.r, rgba.g, rgba.b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_new() {
        assert!(Color::new("#ff0000").is_ok());
        assert!(Color::new("rgb(220, 240, 220)").is_ok());

        let invalid = Color::new("not-a-color");
        assert!(invalid.is_err());
        assert!(invalid.unwrap_err().contains("not-a-color"));
    }

    #[test]
    fn test_color_to_rgb8() {
        let color = Color::new("#dcf0dc").unwrap();
        assert_eq!(color.to_rgb8(), [0xdc, 0xf0, 0xdc]);

        let named = Color::new("white").unwrap();
        assert_eq!(named.to_rgb8(), [255, 255, 255]);
    }
}
