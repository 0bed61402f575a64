//! layout::measure
//!
//! Text measurement seam.
//!
//! The layout engine needs label sizes to offset labels away from branch
//! lanes, but does not shape text itself. Callers supply a [`TextMeasurer`];
//! [`MonospaceMeasurer`] is a deterministic stand-in for environments
//! without a font stack (the CLI, tests).

use serde::{Deserialize, Serialize};

/// Font settings handed to the measurer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    pub family: String,
    pub size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 12.0,
        }
    }
}

/// Measured size of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TextSize {
    pub width: f64,
    pub height: f64,
}

/// Measures rendered text.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font: &FontConfig) -> TextSize;
}

impl<F> TextMeasurer for F
where
    F: Fn(&str, &FontConfig) -> TextSize,
{
    fn measure(&self, text: &str, font: &FontConfig) -> TextSize {
        self(text, font)
    }
}

/// Fixed advance per character.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasurer {
    /// Advance width as a fraction of the font size.
    pub advance: f64,
    /// Line height as a fraction of the font size.
    pub line_height: f64,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self {
            advance: 0.6,
            line_height: 1.2,
        }
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str, font: &FontConfig) -> TextSize {
        let lines: Vec<&str> = text.lines().collect();
        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        TextSize {
            width: widest as f64 * font.size * self.advance,
            height: lines.len().max(1) as f64 * font.size * self.line_height,
        }
    }
}
