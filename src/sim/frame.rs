//! Per-frame update
//!
//! `on_frame` advances the field by one display frame and returns what to
//! draw. `on_resize` swaps in a new layout for new canvas dimensions.

use glam::Vec2;

use super::draw::{DrawCommand, palette};
use super::readout::Readout;
use super::state::FieldState;
use crate::consts::{LINE_BASE_WIDTH, LINE_MAX_ALPHA};
use crate::settings::Settings;
use crate::{js_round, map_range};

/// Upper bound on the per-frame command reservation
const MAX_PREALLOCATED_COMMANDS: usize = 4096;

/// Input sampled by the host for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Pointer position in canvas pixels
    pub cursor: Vec2,
}

/// Everything the host needs to present a frame
#[derive(Debug, Clone, Default)]
pub struct FrameOutput {
    /// Draw commands in painter's order
    pub commands: Vec<DrawCommand>,
    pub readout: Readout,
}

/// Advance the field by one frame
pub fn on_frame(state: &mut FieldState, input: &FrameInput, settings: &Settings) -> FrameOutput {
    state.cursor = input.cursor;
    let cursor = state.cursor;

    let halo_steps = settings.effective_halo_steps();
    let expected = state
        .blocks
        .len()
        .saturating_mul((halo_steps as usize).saturating_add(1))
        .saturating_add(settings.line_steps as usize)
        .saturating_add(2);
    let mut commands = Vec::with_capacity(expected.min(MAX_PREALLOCATED_COMMANDS));
    commands.push(DrawCommand::Clear(palette::BACKGROUND));
    for block in &state.blocks {
        block.draw(settings.attraction_radius, halo_steps, &mut commands);
    }

    let hovering = state.blocks.iter().any(|b| b.is_hovering(cursor));
    state.hovering = hovering;

    if hovering {
        state.ideal_pos = cursor;
    } else {
        let total_force = state.blocks.iter().fold(Vec2::ZERO, |acc, b| {
            acc + b.attraction_force(cursor, settings.attraction_radius, settings.max_strength)
        });

        // Never push the indicator past the nearest block's centre
        if let Some(cap) = state.nearest_block(cursor).map(|b| cursor.distance(b.pos)) {
            state.ideal_pos =
                cursor + total_force.normalize_or_zero() * total_force.length().min(cap);
        }

        push_force_line(&mut commands, cursor, state.ideal_pos, settings);
    }

    commands.push(DrawCommand::Circle {
        center: state.ideal_pos,
        radius: settings.indicator_diameter / 2.0,
        color: palette::FORCE,
    });

    let offset = state.ideal_pos - cursor;
    let readout = Readout {
        force: if hovering { 0 } else { js_round(offset.length()) },
        error_x: js_round(offset.x),
        error_y: js_round(offset.y),
    };

    FrameOutput { commands, readout }
}

/// Adopt new canvas dimensions and replace the layout
pub fn on_resize(state: &mut FieldState, width: f32, height: f32, settings: &Settings) {
    state.width = width;
    state.height = height;
    state.regenerate(settings);
}

/// Tapered line from the cursor toward (and past) the ideal position.
/// Segments fade from opaque and wide at the cursor to clear and thin at the tip.
fn push_force_line(out: &mut Vec<DrawCommand>, cursor: Vec2, ideal: Vec2, settings: &Settings) {
    let steps = settings.line_steps;
    let tip = cursor + (ideal - cursor) * settings.force_line_scale;

    for i in (1..=steps).rev() {
        let t = i as f32 / steps as f32;
        let prev_t = (i - 1) as f32 / steps as f32;
        out.push(DrawCommand::Line {
            from: cursor.lerp(tip, prev_t),
            to: cursor.lerp(tip, t),
            width: map_range(t, 0.0, 1.0, LINE_BASE_WIDTH, LINE_BASE_WIDTH / 2.0),
            color: palette::FORCE.with_alpha(map_range(t, 0.0, 1.0, LINE_MAX_ALPHA, 0.0)),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::block::Block;

    fn single_block_field() -> FieldState {
        FieldState::with_blocks(
            0,
            800.0,
            600.0,
            vec![Block::new(Vec2::new(400.0, 300.0), 80.0)],
        )
    }

    fn frame_at(state: &mut FieldState, x: f32, y: f32) -> FrameOutput {
        on_frame(
            state,
            &FrameInput {
                cursor: Vec2::new(x, y),
            },
            &Settings::default(),
        )
    }

    fn lines(out: &FrameOutput) -> Vec<DrawCommand> {
        out.commands
            .iter()
            .copied()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .collect()
    }

    #[test]
    fn test_hovering_snaps_to_cursor() {
        let mut state = single_block_field();
        state.ideal_pos = Vec2::new(10.0, 10.0);
        let out = frame_at(&mut state, 400.0, 300.0);

        assert!(state.hovering);
        assert_eq!(state.ideal_pos, Vec2::new(400.0, 300.0));
        assert_eq!(out.readout, Readout::default());
        assert!(lines(&out).is_empty());
    }

    #[test]
    fn test_unsanitized_step_counts_do_not_overflow_reservation() {
        let mut state = single_block_field();
        let settings = Settings {
            show_halo: false,
            line_steps: u32::MAX,
            ..Settings::default()
        };
        // Hovering skips the force line, so only the reservation sees line_steps
        let out = on_frame(
            &mut state,
            &FrameInput {
                cursor: Vec2::new(400.0, 300.0),
            },
            &settings,
        );
        assert!(state.hovering);
        assert_eq!(out.commands.len(), 3);
    }

    #[test]
    fn test_boundary_distance_exerts_no_pull() {
        let mut state = single_block_field();
        let out = frame_at(&mut state, 400.0, 500.0);

        assert!(!state.hovering);
        assert_eq!(state.ideal_pos, Vec2::new(400.0, 500.0));
        assert_eq!(out.readout, Readout::default());
    }

    #[test]
    fn test_strong_pull_clamped_to_nearest_centre() {
        // Raw force is 410.0625 but the block is only 50px away
        let mut state = single_block_field();
        let out = frame_at(&mut state, 400.0, 350.0);

        assert!((state.ideal_pos - Vec2::new(400.0, 300.0)).length() < 1e-3);
        assert_eq!(
            out.readout,
            Readout {
                force: 50,
                error_x: 0,
                error_y: -50,
            }
        );
    }

    #[test]
    fn test_weak_pull_not_clamped() {
        // 150px away: strength 1.5, force 1.5^4 = 5.0625
        let mut state = single_block_field();
        let out = frame_at(&mut state, 250.0, 300.0);

        assert!((state.ideal_pos.x - 255.0625).abs() < 1e-3);
        assert!((state.ideal_pos.y - 300.0).abs() < 1e-3);
        assert_eq!(out.readout.force, 5);
        assert_eq!(out.readout.error_x, 5);
        assert_eq!(out.readout.error_y, 0);
    }

    #[test]
    fn test_opposing_blocks_cancel() {
        let blocks = vec![
            Block::new(Vec2::new(100.0, 300.0), 80.0),
            Block::new(Vec2::new(400.0, 300.0), 80.0),
        ];
        let mut state = FieldState::with_blocks(0, 800.0, 600.0, blocks);
        let out = frame_at(&mut state, 250.0, 300.0);

        assert!((state.ideal_pos - Vec2::new(250.0, 300.0)).length() < 1e-3);
        assert_eq!(out.readout.force, 0);
    }

    #[test]
    fn test_no_blocks_keeps_previous_ideal() {
        let mut state = FieldState::with_blocks(0, 800.0, 600.0, Vec::new());
        state.ideal_pos = Vec2::new(10.0, 10.0);
        let out = frame_at(&mut state, 50.0, 50.0);

        assert_eq!(state.ideal_pos, Vec2::new(10.0, 10.0));
        assert_eq!(
            out.readout,
            Readout {
                force: 57,
                error_x: -40,
                error_y: -40,
            }
        );
    }

    #[test]
    fn test_command_order() {
        let mut state = single_block_field();
        let out = frame_at(&mut state, 400.0, 350.0);

        assert_eq!(out.commands[0], DrawCommand::Clear(palette::BACKGROUND));
        // Clear + 20 halo rings + body + 20 line segments + indicator
        assert_eq!(out.commands.len(), 1 + 21 + 20 + 1);
        match out.commands.last() {
            Some(DrawCommand::Circle { radius, color, .. }) => {
                assert_eq!(*radius, 8.0);
                assert_eq!(*color, palette::FORCE);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_force_line_taper() {
        let mut state = single_block_field();
        let out = frame_at(&mut state, 400.0, 350.0);
        let segs = lines(&out);
        assert_eq!(segs.len(), 20);

        // Tip segment first: transparent and thin, ending 3x past the cursor
        match segs[0] {
            DrawCommand::Line { to, width, color, .. } => {
                assert!((to - Vec2::new(400.0, 200.0)).length() < 1e-2);
                assert_eq!(width, 2.0);
                assert_eq!(color.a, 0);
            }
            other => panic!("unexpected {other:?}"),
        }
        // Cursor segment last: starts at the cursor, nearly opaque
        match segs[19] {
            DrawCommand::Line { from, width, color, .. } => {
                assert_eq!(from, Vec2::new(400.0, 350.0));
                assert!((width - 3.9).abs() < 1e-4);
                assert_eq!(color.a, 171);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_on_resize_replaces_layout() {
        let settings = Settings::default();
        let mut state = FieldState::new(9, 800.0, 600.0, &settings);
        on_resize(&mut state, 60.0, 60.0, &settings);
        assert_eq!((state.width, state.height), (60.0, 60.0));
        assert!(state.blocks.is_empty());

        on_resize(&mut state, 1600.0, 1200.0, &settings);
        assert!(!state.blocks.is_empty());
    }
}
