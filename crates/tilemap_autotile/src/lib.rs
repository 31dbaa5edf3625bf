//! Bitmask autotiling for tilemap_editor
//!
//! This crate picks tile variants from neighbor adjacency:
//! - `bitmask` - 9-bit 3x3 adjacency masks and the corner rule
//! - `terrain` - best-match lookup in a terrain layer's catalog
//! - `draw` - placing and erasing terrain with one ring of neighbor updates
//!
//! # Example
//!
//! ```rust,ignore
//! use tilemap_autotile::TerrainPainter;
//! use tilemap_core::ChunkedTiles;
//!
//! let painter = TerrainPainter::new(&tilesets, tileset_id, terrain_layer_id)
//!     .expect("selection is stale");
//! let mut grid = ChunkedTiles::new();
//! painter.paint(&mut grid, 5, 5);
//! painter.paint(&mut grid, 6, 5); // (5, 5) picks up its eastern edge
//! ```

pub mod bitmask;
pub mod draw;
pub mod terrain;

// Re-export main functions at crate root
pub use bitmask::{
    apply_corner_rule, bitmask_similarity, bitmask_to_grid, bits, calculate_bitmask_from_neighbors,
    grid_to_bitmask, is_bitmask_cell_set, toggle_bitmask_cell, BitmaskGrid,
};
pub use draw::{
    erase_terrain_tile, get_terrain_layer_for_tile, place_terrain_tile, remove_terrain_tile,
    terrain_bitmask_at, update_neighbors_around, TerrainPainter, NEIGHBOR_OFFSETS,
};
pub use terrain::{find_best_tile, find_tile_by_bitmask, get_tiles_for_terrain};

// Re-export tilemap_core
pub use tilemap_core;
