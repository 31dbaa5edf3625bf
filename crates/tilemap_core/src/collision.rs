//! Collision shapes attached to tile definitions
//!
//! Coordinates are normalized to the tile (0-1 on each axis), so a shape
//! stays valid when a tileset's tile size changes.

use serde::{Deserialize, Serialize};

/// Collision shape of a tile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type")]
pub enum CollisionShape {
    /// No collision
    #[default]
    None,
    /// The whole tile
    Full,
    /// Axis-aligned rectangle
    Rectangle {
        #[serde(default)]
        offset: [f32; 2],
        #[serde(default = "default_full_size")]
        size: [f32; 2],
    },
    /// Closed polygon, vertices in order
    Polygon { points: Vec<[f32; 2]> },
}

fn default_full_size() -> [f32; 2] {
    [1.0, 1.0]
}

impl CollisionShape {
    /// Check if this shape has collision. Polygons need at least 3 points.
    pub fn has_collision(&self) -> bool {
        match self {
            CollisionShape::None => false,
            CollisionShape::Full => true,
            CollisionShape::Rectangle { size, .. } => size[0] > 0.0 && size[1] > 0.0,
            CollisionShape::Polygon { points } => points.len() >= 3,
        }
    }

    pub fn rectangle(offset: [f32; 2], size: [f32; 2]) -> Self {
        CollisionShape::Rectangle { offset, size }
    }

    pub fn polygon(points: Vec<[f32; 2]>) -> Self {
        CollisionShape::Polygon { points }
    }

    /// Mirror the shape the same way a flipped tile is drawn
    pub fn flipped(&self, flip_x: bool, flip_y: bool) -> Self {
        let mirror = |[x, y]: [f32; 2]| {
            [
                if flip_x { 1.0 - x } else { x },
                if flip_y { 1.0 - y } else { y },
            ]
        };
        match self {
            CollisionShape::Rectangle { offset, size } => CollisionShape::Rectangle {
                offset: [
                    if flip_x { 1.0 - offset[0] - size[0] } else { offset[0] },
                    if flip_y { 1.0 - offset[1] - size[1] } else { offset[1] },
                ],
                size: *size,
            },
            CollisionShape::Polygon { points } => {
                let mut points: Vec<_> = points.iter().copied().map(mirror).collect();
                // a single-axis mirror reverses winding
                if flip_x != flip_y {
                    points.reverse();
                }
                CollisionShape::Polygon { points }
            }
            other => other.clone(),
        }
    }
}
