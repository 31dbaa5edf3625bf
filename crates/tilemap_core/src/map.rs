//! Map document, chunk snapshots and guarded editing
//!
//! Edits that should be undoable go through two steps:
//!
//! 1. [`TileMap::snapshot`] copies the current contents of every chunk the
//!    edit may touch into a [`ChunkSnapshot`].
//! 2. [`TileMap::edit`] borrows the map mutably, but only hands out a
//!    [`MapEdit`] for an existing snapshot. Writes to chunks missing from the
//!    snapshot are rejected.
//!
//! The snapshot can therefore never be taken after the mutation it
//! describes, and the undo engine can diff just the snapshotted chunks.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use uuid::Uuid;

use crate::chunk::{ChunkCoord, TileGrid};
use crate::layer::Layer;
use crate::tile_id::TileId;

/// Identifies one chunk of one layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkKey {
    pub layer_id: Uuid,
    pub coord: ChunkCoord,
}

impl ChunkKey {
    pub const fn new(layer_id: Uuid, coord: ChunkCoord) -> Self {
        Self { layer_id, coord }
    }

    /// Chunk of a layer covering tile (x, y)
    pub const fn at_tile(layer_id: Uuid, x: i32, y: i32) -> Self {
        Self::new(layer_id, ChunkCoord::from_tile(x, y))
    }

    /// Every chunk of a layer overlapping the inclusive tile rectangle
    pub fn covering(layer_id: Uuid, min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Vec<Self> {
        ChunkCoord::covering(min_x, min_y, max_x, max_y)
            .into_iter()
            .map(|coord| Self::new(layer_id, coord))
            .collect()
    }

    /// Chunks within `radius` tiles of (x, y), e.g. radius 1 for a terrain
    /// paint that rewrites its 8 neighbors
    pub fn around(layer_id: Uuid, x: i32, y: i32, radius: i32) -> Vec<Self> {
        Self::covering(
            layer_id,
            x.saturating_sub(radius),
            y.saturating_sub(radius),
            x.saturating_add(radius),
            y.saturating_add(radius),
        )
    }
}

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

/// Process-wide unique stamp, so two maps never share a revision unless one
/// is a clone of the other at the same state
fn next_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::Relaxed)
}

/// A snapshot was taken before the map last changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("snapshot is from revision {snapshot}, map is at revision {current}")]
pub struct StaleSnapshot {
    pub snapshot: u64,
    pub current: u64,
}

/// A tile map: an ordered stack of layers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileMap {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    layers: Vec<Layer>,
    /// Changes on every mutation; not part of equality or the saved form
    #[serde(skip, default = "next_revision")]
    revision: u64,
}

impl PartialEq for TileMap {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name && self.layers == other.layers
    }
}

impl Default for TileMap {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl TileMap {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            layers: Vec::new(),
            revision: next_revision(),
        }
    }

    /// Current revision stamp
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = next_revision();
    }

    /// Layers, bottom first
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Add a layer on top and return its id
    pub fn add_layer(&mut self, layer: Layer) -> Uuid {
        let id = layer.id;
        self.touch();
        self.layers.push(layer);
        id
    }

    pub fn remove_layer(&mut self, id: Uuid) -> Option<Layer> {
        let pos = self.layers.iter().position(|l| l.id == id)?;
        self.touch();
        Some(self.layers.remove(pos))
    }

    pub fn layer(&self, id: Uuid) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layer_mut(&mut self, id: Uuid) -> Option<&mut Layer> {
        self.touch();
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// Tile at (x, y) of a layer; empty for unknown layers
    pub fn get_tile(&self, layer_id: Uuid, x: i32, y: i32) -> TileId {
        self.layer(layer_id)
            .map(|l| l.get_tile(x, y))
            .unwrap_or(TileId::EMPTY)
    }

    /// Current contents of a chunk, or `None` if the layer does not exist
    pub fn chunk_tiles(&self, key: ChunkKey) -> Option<Vec<TileId>> {
        self.layer(key.layer_id).map(|l| l.chunk_tiles(key.coord))
    }

    /// Overwrite a chunk. Unknown layers are skipped.
    pub fn write_chunk(&mut self, key: ChunkKey, tiles: Vec<TileId>) {
        self.touch();
        match self.layers.iter_mut().find(|l| l.id == key.layer_id) {
            Some(layer) => layer.write_chunk(key.coord, tiles),
            None => log::debug!("skipping chunk write for missing layer {}", key.layer_id),
        }
    }

    /// Copy the current contents of the given chunks. Keys naming a missing
    /// layer are dropped.
    pub fn snapshot(&self, keys: impl IntoIterator<Item = ChunkKey>) -> ChunkSnapshot {
        let mut chunks = BTreeMap::new();
        for key in keys {
            if chunks.contains_key(&key) {
                continue;
            }
            if let Some(tiles) = self.chunk_tiles(key) {
                chunks.insert(key, tiles);
            }
        }
        ChunkSnapshot {
            chunks,
            revision: self.revision,
        }
    }

    /// Whether `snapshot` was taken at the current revision
    pub fn is_current(&self, snapshot: &ChunkSnapshot) -> bool {
        snapshot.revision == self.revision
    }

    /// Mutable view restricted to the chunks captured in `snapshot`.
    /// Fails if the map changed after the snapshot was taken.
    pub fn edit<'a>(
        &'a mut self,
        snapshot: &'a ChunkSnapshot,
    ) -> Result<MapEdit<'a>, StaleSnapshot> {
        if !self.is_current(snapshot) {
            return Err(StaleSnapshot {
                snapshot: snapshot.revision,
                current: self.revision,
            });
        }
        self.touch();
        Ok(MapEdit {
            map: self,
            snapshot,
            rejected: 0,
        })
    }
}

/// Immutable copies of chunk contents taken before an edit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkSnapshot {
    chunks: BTreeMap<ChunkKey, Vec<TileId>>,
    revision: u64,
}

impl ChunkSnapshot {
    /// Map revision the copies were taken at
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn contains(&self, key: &ChunkKey) -> bool {
        self.chunks.contains_key(key)
    }

    pub fn get(&self, key: &ChunkKey) -> Option<&[TileId]> {
        self.chunks.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ChunkKey> {
        self.chunks.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChunkKey, &[TileId])> {
        self.chunks.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Layers covered by this snapshot
    pub fn layer_ids(&self) -> BTreeSet<Uuid> {
        self.chunks.keys().map(|k| k.layer_id).collect()
    }
}

/// Mutable access to a map, limited to snapshotted chunks
pub struct MapEdit<'a> {
    map: &'a mut TileMap,
    snapshot: &'a ChunkSnapshot,
    rejected: usize,
}

impl<'a> MapEdit<'a> {
    /// Read-only view of the whole map
    pub fn map(&self) -> &TileMap {
        self.map
    }

    pub fn snapshot(&self) -> &ChunkSnapshot {
        self.snapshot
    }

    /// Editing view of one layer, or `None` if the layer does not exist
    pub fn layer(&mut self, layer_id: Uuid) -> Option<LayerEdit<'_>> {
        let snapshot = self.snapshot;
        let rejected = &mut self.rejected;
        let layer = self.map.layers.iter_mut().find(|l| l.id == layer_id)?;
        Some(LayerEdit {
            layer,
            snapshot,
            rejected,
        })
    }

    /// Number of writes dropped so far because their chunk was not
    /// snapshotted
    pub fn rejected_writes(&self) -> usize {
        self.rejected
    }
}

/// A layer inside a [`MapEdit`]. Reads reach the whole layer; writes are
/// limited to snapshotted chunks.
pub struct LayerEdit<'a> {
    layer: &'a mut Layer,
    snapshot: &'a ChunkSnapshot,
    rejected: &'a mut usize,
}

impl<'a> LayerEdit<'a> {
    pub fn id(&self) -> Uuid {
        self.layer.id
    }

    pub fn layer(&self) -> &Layer {
        self.layer
    }

    /// Whether a write at (x, y) would be accepted
    pub fn can_write(&self, x: i32, y: i32) -> bool {
        self.snapshot
            .contains(&ChunkKey::at_tile(self.layer.id, x, y))
    }
}

impl TileGrid for LayerEdit<'_> {
    fn get_tile(&self, x: i32, y: i32) -> TileId {
        self.layer.get_tile(x, y)
    }

    fn set_tile(&mut self, x: i32, y: i32, tile: TileId) {
        if !self.can_write(x, y) {
            log::warn!(
                "rejected write at ({}, {}) on layer {}: chunk was not snapshotted",
                x,
                y,
                self.layer.id
            );
            *self.rejected += 1;
            return;
        }
        self.layer.set_tile(x, y, tile);
    }
}
