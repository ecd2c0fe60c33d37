//! Random block placement by rejection sampling

use glam::Vec2;
use rand::Rng;

use super::block::Block;
use crate::settings::Settings;

/// Inputs to a layout pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Blocks wanted
    pub count: usize,
    /// Block diameter
    pub size: f32,
    /// Minimum distance between any two centres
    pub min_distance: f32,
    /// Candidate draws before giving up
    pub max_attempts: u32,
}

impl LayoutParams {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            count: settings.block_count,
            size: settings.block_size,
            min_distance: settings.attraction_radius * settings.min_spacing_factor,
            max_attempts: settings.placement_attempts,
        }
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Place up to `params.count` blocks inside a `width` x `height` canvas.
///
/// Each candidate keeps the whole body on screen and is rejected if it lands
/// closer than `min_distance` to an accepted centre. Running out of attempts
/// returns whatever was placed; a canvas too small for one block yields none.
pub fn generate_blocks<R: Rng + ?Sized>(
    width: f32,
    height: f32,
    params: &LayoutParams,
    rng: &mut R,
) -> Vec<Block> {
    let half = params.size / 2.0;
    let (min_x, max_x) = (half, width - half);
    let (min_y, max_y) = (half, height - half);

    let mut blocks: Vec<Block> =
        Vec::with_capacity(params.count.min(params.max_attempts as usize));
    if max_x < min_x || max_y < min_y {
        log::debug!(
            "Canvas {}x{} too small for block size {}",
            width,
            height,
            params.size
        );
        return blocks;
    }

    let mut attempts = 0;
    while blocks.len() < params.count && attempts < params.max_attempts {
        let candidate = Vec2::new(
            rng.random_range(min_x..=max_x),
            rng.random_range(min_y..=max_y),
        );

        let clear = blocks
            .iter()
            .all(|b| b.pos.distance(candidate) >= params.min_distance);
        if clear {
            blocks.push(Block::new(candidate, params.size));
        }

        attempts += 1;
    }

    log::debug!(
        "Placed {}/{} blocks in {} attempts",
        blocks.len(),
        params.count,
        attempts
    );
    blocks
}
