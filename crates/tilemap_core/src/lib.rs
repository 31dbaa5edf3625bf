//! Core data structures for tilemap_editor
//!
//! This crate provides the fundamental types for representing tile maps:
//! - `TileId` - Packed tile identifier (sprite position, tileset order, flips)
//! - `ChunkedTiles` - Sparse chunk storage over an unbounded plane
//! - `Layer` - A tile layer, chunked or legacy dense
//! - `Tileset` - Tile definitions and terrain catalogs
//! - `TileMap` - A stack of layers, with chunk snapshots for undo

mod chunk;
mod collision;
mod layer;
mod map;
mod tile_id;
mod tileset;

pub use chunk::{
    is_chunk_empty, Chunk, ChunkCoord, ChunkRecord, ChunkedTiles, TileGrid, CHUNK_AREA, CHUNK_SIZE,
};
pub use collision::CollisionShape;
pub use layer::{DenseTiles, Layer, LayerData, LayerKind};
pub use map::{ChunkKey, ChunkSnapshot, LayerEdit, MapEdit, StaleSnapshot, TileMap};
pub use tile_id::{TileId, TileIdError, TileRef, MAX_SPRITE_COORD, MAX_TILESETS};
pub use tileset::{TerrainLayer, TerrainTile, TileDefinition, Tileset};
