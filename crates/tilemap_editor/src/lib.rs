//! tilemap_editor - Editing commands for chunked tile maps
//!
//! This crate wires the core crates into undoable editor operations:
//! - Tile and terrain brushes passed explicitly into each command
//! - Paint, erase and rectangle fill on unbounded chunked layers
//! - Terrain painting with bitmask autotiling
//! - Drag strokes that undo as one step
//! - Terrain catalog editing with its own undo history
//!
//! # Usage
//!
//! ```rust,ignore
//! use tilemap_editor::commands::{paint_terrain, Stroke};
//! use tilemap_editor::tilemap_history::ChunkedHistory;
//!
//! let mut history = ChunkedHistory::new(map);
//! let mut stroke = Stroke::begin(&mut history);
//! for (x, y) in dragged_cells {
//!     paint_terrain(&mut stroke, layer_id, x, y, &terrain_brush, &tilesets);
//! }
//! stroke.finish();
//! history.undo(); // reverts the whole drag
//! ```

pub mod brush;
pub mod commands;

pub use brush::{EditorTool, TerrainBrush, TileBrush};

// Re-export the tilemap_* crates
pub use tilemap_autotile;
pub use tilemap_core;
pub use tilemap_history;
