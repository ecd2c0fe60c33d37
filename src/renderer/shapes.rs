//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::{Color, DrawCommand};

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    if radius <= 0.0 || segments < 3 {
        return Vec::new();
    }

    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a straight stroke of `width` (butt caps)
pub fn segment(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    // Direction from `from` to `to`
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO || width <= 0.0 {
        return Vec::new();
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    // Quad corners
    let a1 = from + perp;
    let b1 = from - perp;
    let a2 = to + perp;
    let b2 = to - perp;

    // Two triangles
    vec![
        Vertex::new(a1.x, a1.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(a2.x, a2.y, color),
        Vertex::new(b1.x, b1.y, color),
        Vertex::new(b2.x, b2.y, color),
    ]
}

/// Turn draw commands into a triangle list in painter's order.
///
/// Returns the color of the last `Clear` (if any) alongside the vertices;
/// a clear also discards everything tessellated before it.
pub fn tessellate(commands: &[DrawCommand], circle_segments: u32) -> (Option<Color>, Vec<Vertex>) {
    let mut clear = None;
    let mut vertices = Vec::new();

    for command in commands {
        match *command {
            DrawCommand::Clear(color) => {
                clear = Some(color);
                vertices.clear();
            }
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => {
                if color.a > 0 {
                    vertices.extend(circle(center, radius, color.to_f32(), circle_segments));
                }
            }
            DrawCommand::Line {
                from,
                to,
                width,
                color,
            } => {
                if color.a > 0 {
                    vertices.extend(segment(from, to, width, color.to_f32()));
                }
            }
        }
    }

    (clear, vertices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::palette;
    use proptest::prelude::*;

    #[test]
    fn test_circle_rim_on_radius() {
        let verts = circle(Vec2::new(10.0, 20.0), 5.0, [1.0; 4], 16);
        assert_eq!(verts.len(), 48);
        for tri in verts.chunks(3) {
            assert_eq!(tri[0].position, [10.0, 20.0]);
            for v in &tri[1..] {
                let d = Vec2::from(v.position).distance(Vec2::new(10.0, 20.0));
                assert!((d - 5.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_segment_width() {
        let verts = segment(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), 4.0, [1.0; 4]);
        assert_eq!(verts.len(), 6);
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert!(ys.iter().all(|y| (y.abs() - 2.0).abs() < 1e-6));
    }

    #[test]
    fn test_degenerate_shapes_are_empty() {
        assert!(segment(Vec2::ONE, Vec2::ONE, 4.0, [1.0; 4]).is_empty());
        assert!(circle(Vec2::ONE, 0.0, [1.0; 4], 16).is_empty());
    }

    #[test]
    fn test_tessellate_skips_transparent_and_tracks_clear() {
        let commands = [
            DrawCommand::Circle {
                center: Vec2::ZERO,
                radius: 3.0,
                color: palette::BLOCK,
            },
            DrawCommand::Clear(palette::BACKGROUND),
            DrawCommand::Line {
                from: Vec2::ZERO,
                to: Vec2::X,
                width: 2.0,
                color: palette::FORCE.with_alpha(0.0),
            },
            DrawCommand::Circle {
                center: Vec2::ZERO,
                radius: 3.0,
                color: palette::FORCE,
            },
        ];
        let (clear, verts) = tessellate(&commands, 12);
        assert_eq!(clear, Some(palette::BACKGROUND));
        assert_eq!(verts.len(), 36);
        assert_eq!(verts[0].color, palette::FORCE.to_f32());
    }

    proptest! {
        #[test]
        fn prop_circle_vertex_count(segments in 3u32..256, radius in 0.1f32..500.0) {
            let verts = circle(Vec2::ZERO, radius, [1.0; 4], segments);
            prop_assert_eq!(verts.len(), segments as usize * 3);
        }
    }
}
