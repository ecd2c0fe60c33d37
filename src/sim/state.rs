//! Field state owned by the frame loop
//!
//! Everything the per-frame update reads or writes lives here, so the host
//! only has to hold one value between frames.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::block::Block;
use super::layout::{LayoutParams, generate_blocks};
use crate::settings::Settings;

/// Complete per-frame state
#[derive(Debug, Clone)]
pub struct FieldState {
    /// Seed the layout RNG was created from
    pub seed: u64,
    /// Canvas width in pixels
    pub width: f32,
    /// Canvas height in pixels
    pub height: f32,
    /// Current layout (replaced wholesale on resize)
    pub blocks: Vec<Block>,
    /// Last known cursor position
    pub cursor: Vec2,
    /// Where the indicator dot sits; carried over when nothing updates it
    pub ideal_pos: Vec2,
    /// Whether the cursor was over a block last frame
    pub hovering: bool,
    rng: Pcg32,
}

impl FieldState {
    /// Create a field with a fresh layout for the given canvas
    pub fn new(seed: u64, width: f32, height: f32, settings: &Settings) -> Self {
        let mut state = Self::with_blocks(seed, width, height, Vec::new());
        state.regenerate(settings);
        state
    }

    /// Create a field with an explicit layout
    pub fn with_blocks(seed: u64, width: f32, height: f32, blocks: Vec<Block>) -> Self {
        Self {
            seed,
            width,
            height,
            blocks,
            cursor: Vec2::ZERO,
            ideal_pos: Vec2::ZERO,
            hovering: false,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Replace the layout using the field's RNG stream
    pub fn regenerate(&mut self, settings: &Settings) {
        let params = LayoutParams::from_settings(settings);
        self.blocks = generate_blocks(self.width, self.height, &params, &mut self.rng);

        if self.blocks.len() < params.count {
            log::warn!(
                "Layout placed {} of {} blocks on {}x{} canvas (seed {})",
                self.blocks.len(),
                params.count,
                self.width,
                self.height,
                self.seed
            );
        } else {
            log::info!(
                "Layout placed {} blocks on {}x{} canvas (seed {})",
                self.blocks.len(),
                self.width,
                self.height,
                self.seed
            );
        }
    }

    /// First block with the strictly smallest distance to `point`
    pub fn nearest_block(&self, point: Vec2) -> Option<&Block> {
        let mut nearest = None;
        let mut min_dist = f32::INFINITY;
        for block in &self.blocks {
            let d = block.pos.distance(point);
            if d < min_dist {
                min_dist = d;
                nearest = Some(block);
            }
        }
        nearest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_layout() {
        let settings = Settings::default();
        let a = FieldState::new(42, 1280.0, 720.0, &settings);
        let b = FieldState::new(42, 1280.0, 720.0, &settings);
        assert_eq!(a.blocks, b.blocks);
        assert!(a.blocks.len() <= settings.block_count);
    }

    #[test]
    fn test_recorded_seed_rebuilds_first_layout() {
        let settings = Settings::default();
        let mut state = FieldState::new(9, 1280.0, 720.0, &settings);
        let first = state.blocks.clone();
        state.regenerate(&settings);

        let rebuilt = FieldState::new(state.seed, state.width, state.height, &settings);
        assert_eq!(rebuilt.seed, 9);
        assert_eq!(rebuilt.blocks, first);
    }

    #[test]
    fn test_regenerate_advances_rng() {
        let settings = Settings::default();
        let mut state = FieldState::new(42, 1280.0, 720.0, &settings);
        let first = state.blocks.clone();
        state.regenerate(&settings);
        assert_ne!(first, state.blocks);
    }

    #[test]
    fn test_nearest_block_ties_keep_first() {
        let blocks = vec![
            Block::new(Vec2::new(100.0, 100.0), 80.0),
            Block::new(Vec2::new(300.0, 100.0), 80.0),
        ];
        let state = FieldState::with_blocks(0, 400.0, 200.0, blocks);
        let nearest = state.nearest_block(Vec2::new(200.0, 100.0)).unwrap();
        assert_eq!(nearest.pos, Vec2::new(100.0, 100.0));

        let nearest = state.nearest_block(Vec2::new(260.0, 150.0)).unwrap();
        assert_eq!(nearest.pos, Vec2::new(300.0, 100.0));
    }

    #[test]
    fn test_nearest_block_none_when_empty() {
        let state = FieldState::with_blocks(0, 400.0, 200.0, Vec::new());
        assert!(state.nearest_block(Vec2::ZERO).is_none());
    }
}
