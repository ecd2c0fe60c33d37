//! Render commands emitted by the simulation
//!
//! The frame controller never touches the GPU. It produces an ordered list of
//! commands which the renderer tessellates, so drawing order is list order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// RGBA color with 8-bit channels (alpha 0-255, like a 2D canvas)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    /// Same color with a fractional 0-255 alpha, rounded and clamped
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: alpha.round().clamp(0.0, 255.0) as u8,
            ..self
        }
    }

    /// Normalized channels for vertex data
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }

    /// CSS `rgba()` string for DOM overlays
    pub fn to_css(self) -> String {
        format!(
            "rgba({}, {}, {}, {:.3})",
            self.r,
            self.g,
            self.b,
            self.a as f32 / 255.0
        )
    }
}

/// Colors for scene elements
pub mod palette {
    use super::Color;

    pub const BACKGROUND: Color = Color::gray(240);
    pub const BLOCK: Color = Color::rgb(255, 20, 147);
    pub const FORCE: Color = Color::rgb(0, 150, 255);
    pub const TEXT: Color = Color::gray(0);
}

/// A single immediate-mode drawing operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole canvas
    Clear(Color),
    /// Filled circle
    Circle { center: Vec2, radius: f32, color: Color },
    /// Straight stroke of the given width
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
}
