//! Sparse chunk storage for infinite tile layers
//!
//! A layer's tiles live in fixed-size square chunks keyed by chunk
//! coordinate. Absent chunks read as empty, and a chunk that becomes all
//! empty after a write is pruned, so the map only ever holds chunks with at
//! least one tile.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::tile_id::TileId;

/// Width and height of a chunk in tiles
pub const CHUNK_SIZE: u32 = 64;

/// Number of cells in one chunk
pub const CHUNK_AREA: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;

/// Uniform read/write access to a tile grid, whatever backs it
pub trait TileGrid {
    /// Tile at (x, y); `TileId::EMPTY` where nothing is stored
    fn get_tile(&self, x: i32, y: i32) -> TileId;

    /// Write a tile at (x, y). Writing `TileId::EMPTY` erases.
    fn set_tile(&mut self, x: i32, y: i32, tile: TileId);
}

/// Chunk coordinate: `floor(tile / CHUNK_SIZE)` on each axis
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk covering a tile position. Uses floor division, so tile -1 is in
    /// chunk -1, not chunk 0.
    pub const fn from_tile(x: i32, y: i32) -> Self {
        let size = CHUNK_SIZE as i32;
        Self {
            x: x.div_euclid(size),
            y: y.div_euclid(size),
        }
    }

    /// Row-major index of a tile inside its chunk
    pub const fn local_index(x: i32, y: i32) -> usize {
        let size = CHUNK_SIZE as i32;
        (y.rem_euclid(size) * size + x.rem_euclid(size)) as usize
    }

    /// True if every tile of this chunk has an `i32` position. Only these
    /// coordinates come out of [`ChunkCoord::from_tile`].
    pub const fn is_addressable(self) -> bool {
        let size = CHUNK_SIZE as i32;
        let lo = i32::MIN.div_euclid(size);
        let hi = i32::MAX.div_euclid(size);
        self.x >= lo && self.x <= hi && self.y >= lo && self.y <= hi
    }

    /// Tile position of this chunk's top-left cell. Only meaningful for
    /// addressable coordinates.
    pub const fn origin(self) -> (i32, i32) {
        let size = CHUNK_SIZE as i32;
        (self.x * size, self.y * size)
    }

    /// Every chunk overlapping the inclusive tile rectangle, row-major
    pub fn covering(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Vec<ChunkCoord> {
        let lo = ChunkCoord::from_tile(min_x.min(max_x), min_y.min(max_y));
        let hi = ChunkCoord::from_tile(min_x.max(max_x), min_y.max(max_y));
        let mut coords = Vec::new();
        for cy in lo.y..=hi.y {
            for cx in lo.x..=hi.x {
                coords.push(ChunkCoord::new(cx, cy));
            }
        }
        coords
    }
}

/// True iff every cell is empty. This is the predicate serializers use to
/// drop chunks.
pub fn is_chunk_empty(tiles: &[TileId]) -> bool {
    tiles.iter().all(|t| t.is_empty())
}

/// One dense `CHUNK_SIZE x CHUNK_SIZE` block, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    tiles: Vec<TileId>,
}

impl Default for Chunk {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunk {
    pub fn new() -> Self {
        Self {
            tiles: vec![TileId::EMPTY; CHUNK_AREA],
        }
    }

    /// Build a chunk from a flat array, padding or truncating to `CHUNK_AREA`
    pub fn from_tiles(mut tiles: Vec<TileId>) -> Self {
        tiles.resize(CHUNK_AREA, TileId::EMPTY);
        Self { tiles }
    }

    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    pub fn into_tiles(self) -> Vec<TileId> {
        self.tiles
    }

    pub fn get(&self, index: usize) -> TileId {
        self.tiles.get(index).copied().unwrap_or(TileId::EMPTY)
    }

    pub fn set(&mut self, index: usize, tile: TileId) {
        if let Some(cell) = self.tiles.get_mut(index) {
            *cell = tile;
        }
    }

    pub fn is_empty(&self) -> bool {
        is_chunk_empty(&self.tiles)
    }

    /// Number of non-empty cells
    pub fn occupied(&self) -> usize {
        self.tiles.iter().filter(|t| !t.is_empty()).count()
    }
}

/// Serialized form of one chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub x: i32,
    pub y: i32,
    pub tiles: Vec<TileId>,
}

/// Sparse map of chunks for an unbounded tile plane
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ChunkRecord>", into = "Vec<ChunkRecord>")]
pub struct ChunkedTiles {
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl ChunkedTiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Copy of a chunk's cells; all empty when the chunk is absent
    pub fn chunk_tiles(&self, coord: ChunkCoord) -> Vec<TileId> {
        match self.chunks.get(&coord) {
            Some(chunk) => chunk.tiles().to_vec(),
            None => vec![TileId::EMPTY; CHUNK_AREA],
        }
    }

    /// Replace a whole chunk. Empty data removes the chunk.
    pub fn write_chunk(&mut self, coord: ChunkCoord, tiles: Vec<TileId>) {
        if !coord.is_addressable() {
            log::warn!("dropping chunk ({}, {}) outside the tile plane", coord.x, coord.y);
            return;
        }
        let chunk = Chunk::from_tiles(tiles);
        if chunk.is_empty() {
            self.chunks.remove(&coord);
        } else {
            self.chunks.insert(coord, chunk);
        }
    }

    pub fn remove_chunk(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        self.chunks.remove(&coord)
    }

    /// Number of stored (non-empty) chunks
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChunkCoord, &Chunk)> {
        self.chunks.iter().map(|(coord, chunk)| (*coord, chunk))
    }

    /// Chunk coordinates in sorted order
    pub fn coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<_> = self.chunks.keys().copied().collect();
        coords.sort();
        coords
    }

    /// Inclusive tile bounds of all occupied cells: (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> Option<(i32, i32, i32, i32)> {
        let mut bounds: Option<(i32, i32, i32, i32)> = None;
        for (coord, chunk) in self.iter() {
            let (ox, oy) = coord.origin();
            for (index, tile) in chunk.tiles().iter().enumerate() {
                if tile.is_empty() {
                    continue;
                }
                let x = ox + (index as u32 % CHUNK_SIZE) as i32;
                let y = oy + (index as u32 / CHUNK_SIZE) as i32;
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }
        bounds
    }
}

impl TileGrid for ChunkedTiles {
    fn get_tile(&self, x: i32, y: i32) -> TileId {
        self.chunks
            .get(&ChunkCoord::from_tile(x, y))
            .map(|chunk| chunk.get(ChunkCoord::local_index(x, y)))
            .unwrap_or(TileId::EMPTY)
    }

    fn set_tile(&mut self, x: i32, y: i32, tile: TileId) {
        let coord = ChunkCoord::from_tile(x, y);
        let index = ChunkCoord::local_index(x, y);

        if tile.is_empty() {
            let Some(chunk) = self.chunks.get_mut(&coord) else {
                return;
            };
            chunk.set(index, tile);
            if chunk.is_empty() {
                self.chunks.remove(&coord);
            }
            return;
        }

        self.chunks.entry(coord).or_default().set(index, tile);
    }
}

impl From<Vec<ChunkRecord>> for ChunkedTiles {
    fn from(records: Vec<ChunkRecord>) -> Self {
        let mut tiles = ChunkedTiles::new();
        for record in records {
            tiles.write_chunk(ChunkCoord::new(record.x, record.y), record.tiles);
        }
        tiles
    }
}

impl From<ChunkedTiles> for Vec<ChunkRecord> {
    fn from(tiles: ChunkedTiles) -> Self {
        let mut records: Vec<ChunkRecord> = tiles
            .chunks
            .into_iter()
            .filter(|(_, chunk)| !chunk.is_empty())
            .map(|(coord, chunk)| ChunkRecord {
                x: coord.x,
                y: coord.y,
                tiles: chunk.into_tiles(),
            })
            .collect();
        records.sort_by_key(|r| (r.y, r.x));
        records
    }
}
