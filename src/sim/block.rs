//! Circular attractor blocks

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::draw::{DrawCommand, palette};
use crate::consts::HALO_MAX_ALPHA;
use crate::map_range;

/// A fixed circular attractor. Never mutated after layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Centre in canvas pixels
    pub pos: Vec2,
    /// Diameter in pixels
    pub size: f32,
}

impl Block {
    pub fn new(pos: Vec2, size: f32) -> Self {
        Self { pos, size }
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// True when `point` lies strictly inside the block body
    #[inline]
    pub fn is_hovering(&self, point: Vec2) -> bool {
        self.pos.distance(point) < self.radius()
    }

    /// Pull exerted on `target`, pointing from `target` toward the centre.
    ///
    /// Strength falls linearly from `max_strength` at the centre to zero at
    /// `attraction_radius` and is then raised to the 4th power, which gives a
    /// sharp near-field. Zero while hovering and at or beyond the radius.
    pub fn attraction_force(&self, target: Vec2, attraction_radius: f32, max_strength: f32) -> Vec2 {
        if self.is_hovering(target) {
            return Vec2::ZERO;
        }

        let distance = self.pos.distance(target);
        if distance >= attraction_radius {
            return Vec2::ZERO;
        }

        let strength = map_range(distance, 0.0, attraction_radius, max_strength, 0.0);
        (self.pos - target).normalize_or_zero() * strength.powi(4)
    }

    /// Emit the fading halo (largest ring first) followed by the solid body
    pub fn draw(&self, attraction_radius: f32, halo_steps: u32, out: &mut Vec<DrawCommand>) {
        for i in (1..=halo_steps).rev() {
            let t = i as f32 / halo_steps as f32;
            let alpha = map_range(i as f32, 0.0, halo_steps as f32, 0.0, HALO_MAX_ALPHA);
            out.push(DrawCommand::Circle {
                center: self.pos,
                radius: attraction_radius * t,
                color: palette::BLOCK.with_alpha(alpha),
            });
        }

        out.push(DrawCommand::Circle {
            center: self.pos,
            radius: self.radius(),
            color: palette::BLOCK,
        });
    }
}
