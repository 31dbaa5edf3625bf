//! Tile layers: infinite chunk-backed storage and legacy dense arrays

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chunk::{ChunkCoord, ChunkedTiles, TileGrid, CHUNK_AREA, CHUNK_SIZE};
use crate::tile_id::TileId;

/// A tile layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: Uuid,
    pub name: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    pub data: LayerData,
}

fn default_visible() -> bool {
    true
}

impl Layer {
    /// Create a new infinite chunk-backed layer
    pub fn new_chunked(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            visible: true,
            data: LayerData::Chunked {
                chunks: ChunkedTiles::new(),
            },
        }
    }

    /// Create a fixed-size layer in the legacy dense format
    pub fn new_dense(name: String, width: u32, height: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            visible: true,
            data: LayerData::Dense(DenseTiles::new(width, height)),
        }
    }

    /// Get the kind of storage backing this layer
    pub fn kind(&self) -> LayerKind {
        match &self.data {
            LayerData::Chunked { .. } => LayerKind::Chunked,
            LayerData::Dense(_) => LayerKind::Dense,
        }
    }

    /// Copy of one chunk-sized region, all empty where nothing is stored
    pub fn chunk_tiles(&self, coord: ChunkCoord) -> Vec<TileId> {
        match &self.data {
            LayerData::Chunked { chunks } => chunks.chunk_tiles(coord),
            LayerData::Dense(_) if !coord.is_addressable() => vec![TileId::EMPTY; CHUNK_AREA],
            LayerData::Dense(dense) => {
                let (ox, oy) = coord.origin();
                let mut tiles = Vec::with_capacity(CHUNK_AREA);
                for ly in 0..CHUNK_SIZE as i32 {
                    for lx in 0..CHUNK_SIZE as i32 {
                        tiles.push(dense.get_tile(ox + lx, oy + ly));
                    }
                }
                tiles
            }
        }
    }

    /// Overwrite one chunk-sized region. Cells outside a dense layer's
    /// bounds are dropped.
    pub fn write_chunk(&mut self, coord: ChunkCoord, tiles: Vec<TileId>) {
        match &mut self.data {
            LayerData::Chunked { chunks } => chunks.write_chunk(coord, tiles),
            LayerData::Dense(_) if !coord.is_addressable() => {}
            LayerData::Dense(dense) => {
                let (ox, oy) = coord.origin();
                for (index, tile) in tiles.into_iter().take(CHUNK_AREA).enumerate() {
                    let x = ox + (index as u32 % CHUNK_SIZE) as i32;
                    let y = oy + (index as u32 / CHUNK_SIZE) as i32;
                    dense.set_tile(x, y, tile);
                }
            }
        }
    }

    /// Convert a legacy dense layer into chunked storage. Tile (x, y) of
    /// the dense array lands at tile (x, y) of the infinite plane.
    pub fn migrate_to_chunks(&mut self) {
        if let LayerData::Dense(dense) = &self.data {
            let chunks = dense.to_chunked();
            log::debug!(
                "migrated layer '{}' from {}x{} dense to {} chunks",
                self.name,
                dense.width,
                dense.height,
                chunks.chunk_count()
            );
            self.data = LayerData::Chunked { chunks };
        }
    }

    /// Number of non-empty cells
    pub fn tile_count(&self) -> usize {
        match &self.data {
            LayerData::Chunked { chunks } => chunks.iter().map(|(_, c)| c.occupied()).sum(),
            LayerData::Dense(dense) => dense.tiles.iter().filter(|t| !t.is_empty()).count(),
        }
    }
}

impl TileGrid for Layer {
    fn get_tile(&self, x: i32, y: i32) -> TileId {
        match &self.data {
            LayerData::Chunked { chunks } => chunks.get_tile(x, y),
            LayerData::Dense(dense) => dense.get_tile(x, y),
        }
    }

    fn set_tile(&mut self, x: i32, y: i32, tile: TileId) {
        match &mut self.data {
            LayerData::Chunked { chunks } => chunks.set_tile(x, y, tile),
            LayerData::Dense(dense) => dense.set_tile(x, y, tile),
        }
    }
}

/// Storage kind of a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerKind {
    Chunked,
    Dense,
}

/// The tiles contained in a layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LayerData {
    /// Sparse chunks over an unbounded plane
    Chunked { chunks: ChunkedTiles },
    /// Legacy `width * height` row-major array
    Dense(DenseTiles),
}

#[derive(Deserialize)]
struct RawDenseTiles {
    width: u32,
    height: u32,
    #[serde(default)]
    tiles: Vec<TileId>,
}

/// Fixed-size legacy tile array. Reads outside the bounds are empty and
/// writes outside the bounds are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDenseTiles")]
pub struct DenseTiles {
    pub width: u32,
    pub height: u32,
    tiles: Vec<TileId>,
}

impl From<RawDenseTiles> for DenseTiles {
    fn from(raw: RawDenseTiles) -> Self {
        DenseTiles::from_tiles(raw.width, raw.height, raw.tiles)
    }
}

impl DenseTiles {
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_tiles(width, height, Vec::new())
    }

    /// Build from saved data. Older saves can hold fewer cells than
    /// `width * height` after the map grew; the gap is filled with empty
    /// tiles.
    pub fn from_tiles(width: u32, height: u32, mut tiles: Vec<TileId>) -> Self {
        let size = width as usize * height as usize;
        if tiles.len() != size {
            log::debug!(
                "dense layer data has {} cells, expected {}x{}; resizing",
                tiles.len(),
                width,
                height
            );
        }
        tiles.resize(size, TileId::EMPTY);
        Self {
            width,
            height,
            tiles,
        }
    }

    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Copy every tile into sparse chunked storage
    pub fn to_chunked(&self) -> ChunkedTiles {
        let mut chunks = ChunkedTiles::new();
        for (index, tile) in self.tiles.iter().enumerate() {
            if tile.is_empty() {
                continue;
            }
            let x = (index % self.width as usize) as i32;
            let y = (index / self.width as usize) as i32;
            chunks.set_tile(x, y, *tile);
        }
        chunks
    }
}

impl TileGrid for DenseTiles {
    fn get_tile(&self, x: i32, y: i32) -> TileId {
        self.index(x, y)
            .and_then(|i| self.tiles.get(i).copied())
            .unwrap_or(TileId::EMPTY)
    }

    fn set_tile(&mut self, x: i32, y: i32, tile: TileId) {
        if let Some(cell) = self.index(x, y).and_then(|i| self.tiles.get_mut(i)) {
            *cell = tile;
        }
    }
}
