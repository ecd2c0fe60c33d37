//! Numeric force/error readout and where to put it

use crate::consts::{READOUT_FONT_DIVISOR, READOUT_LINE_SPACING};

/// Values shown in the bottom-left corner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Readout {
    /// Rounded indicator displacement (0 while hovering)
    pub force: i32,
    /// Rounded horizontal offset of the indicator from the cursor
    pub error_x: i32,
    /// Rounded vertical offset of the indicator from the cursor
    pub error_y: i32,
}

impl Readout {
    /// Text lines, top to bottom, numbers right-justified to 4 columns
    pub fn lines(&self) -> [String; 3] {
        [
            format!("Force:  {:>4}", self.force),
            format!("ErrorX: {:>4}", self.error_x),
            format!("ErrorY: {:>4}", self.error_y),
        ]
    }
}

/// Text metrics for a canvas size. Lines are left-aligned and anchored at
/// their bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadoutLayout {
    pub font_size: f32,
    /// Left edge of every line
    pub margin: f32,
    pub line_height: f32,
    /// Bottom edge of each line, top to bottom
    pub baselines: [f32; 3],
}

impl ReadoutLayout {
    pub fn for_canvas(width: f32, height: f32) -> Self {
        let font_size = width.min(height) / READOUT_FONT_DIVISOR;
        let line_height = font_size * READOUT_LINE_SPACING;
        Self {
            font_size,
            margin: font_size,
            line_height,
            baselines: [
                height - line_height * 3.0,
                height - line_height * 2.0,
                height - line_height,
            ],
        }
    }
}
