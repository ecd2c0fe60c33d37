//! Attract Field - blocks that pull the cursor toward them
//!
//! Core modules:
//! - `sim`: Deterministic per-frame model (blocks, layout, force, readout)
//! - `renderer`: WebGPU triangle pipeline fed by draw commands
//! - `settings`: Tunable parameters persisted in LocalStorage

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Settings};

/// Default tuning constants
pub mod consts {
    /// Number of blocks the layout tries to place
    pub const NUM_BLOCKS: usize = 8;
    /// Block diameter in pixels
    pub const BLOCK_SIZE: f32 = 80.0;
    /// Distance at which a block starts pulling the cursor
    pub const ATTRACTION_RADIUS: f32 = 200.0;
    /// Strength at distance zero, before the 4th power falloff
    pub const MAX_STRENGTH: f32 = 6.0;
    /// Minimum centre spacing, as a multiple of the attraction radius
    pub const MIN_SPACING_FACTOR: f32 = 1.2;
    /// Rejection sampling budget per layout
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;

    /// Concentric halo circles per block
    pub const HALO_STEPS: u32 = 20;
    /// Peak halo alpha (0-255 scale)
    pub const HALO_MAX_ALPHA: f32 = 15.0;

    /// Segments in the force line
    pub const LINE_STEPS: u32 = 20;
    /// Force line length multiplier
    pub const FORCE_LINE_SCALE: f32 = 3.0;
    /// Force line alpha at the cursor end (0-255 scale)
    pub const LINE_MAX_ALPHA: f32 = 180.0;
    /// Force line stroke width at the cursor end
    pub const LINE_BASE_WIDTH: f32 = 4.0;

    /// Ideal position dot diameter
    pub const INDICATOR_DIAMETER: f32 = 16.0;

    /// Readout font size is min(width, height) / this
    pub const READOUT_FONT_DIVISOR: f32 = 40.0;
    /// Readout line height as a multiple of font size
    pub const READOUT_LINE_SPACING: f32 = 1.5;
}

/// Linearly re-map `value` from `[start1, stop1]` onto `[start2, stop2]` (unclamped)
#[inline]
pub fn map_range(value: f32, start1: f32, stop1: f32, start2: f32, stop2: f32) -> f32 {
    start2 + (stop2 - start2) * ((value - start1) / (stop1 - start1))
}

/// Round half toward positive infinity, so -2.5 becomes -2
#[inline]
pub fn js_round(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}
