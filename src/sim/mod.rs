//! Deterministic field model
//!
//! All interaction logic lives here. This module must stay pure:
//! - Seeded RNG only (injected into layout)
//! - Stable iteration order (nearest-block ties go to the first block)
//! - No rendering or platform dependencies; output is a command list

pub mod block;
pub mod draw;
pub mod frame;
pub mod layout;
pub mod readout;
pub mod state;

pub use block::Block;
pub use draw::{Color, DrawCommand, palette};
pub use frame::{FrameInput, FrameOutput, on_frame, on_resize};
pub use layout::{LayoutParams, generate_blocks};
pub use readout::{Readout, ReadoutLayout};
pub use state::FieldState;
