//! Chunk patches: the before/after diff of one edit

use std::time::{SystemTime, UNIX_EPOCH};

use tilemap_core::{ChunkCoord, ChunkKey, ChunkSnapshot, TileId, TileMap};
use uuid::Uuid;

/// Old and new contents of one chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkPatch {
    pub key: ChunkKey,
    pub old_tiles: Vec<TileId>,
    pub new_tiles: Vec<TileId>,
}

impl ChunkPatch {
    pub fn layer_id(&self) -> Uuid {
        self.key.layer_id
    }

    pub fn coord(&self) -> ChunkCoord {
        self.key.coord
    }

    /// True when applying the patch changes nothing
    pub fn is_noop(&self) -> bool {
        self.old_tiles == self.new_tiles
    }

    /// Number of cells that differ
    pub fn changed_cells(&self) -> usize {
        self.old_tiles
            .iter()
            .zip(&self.new_tiles)
            .filter(|(a, b)| a != b)
            .count()
    }
}

/// One undo step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub chunks: Vec<ChunkPatch>,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
}

impl HistoryEntry {
    pub fn new(chunks: Vec<ChunkPatch>) -> Self {
        Self {
            chunks,
            timestamp: now_millis(),
        }
    }

    /// Write every chunk's old contents, last patch first
    pub fn revert(&self, map: &mut TileMap) {
        for patch in self.chunks.iter().rev() {
            map.write_chunk(patch.key, patch.old_tiles.clone());
        }
    }

    /// Write every chunk's new contents, first patch first
    pub fn apply(&self, map: &mut TileMap) {
        for patch in &self.chunks {
            map.write_chunk(patch.key, patch.new_tiles.clone());
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Diff each snapshotted chunk against the map. Unchanged chunks and chunks
/// whose layer has since disappeared produce no patch.
pub fn diff_snapshot(snapshot: &ChunkSnapshot, map: &TileMap) -> Vec<ChunkPatch> {
    snapshot
        .iter()
        .filter_map(|(key, old)| {
            let new = map.chunk_tiles(*key)?;
            if old == new.as_slice() {
                return None;
            }
            Some(ChunkPatch {
                key: *key,
                old_tiles: old.to_vec(),
                new_tiles: new,
            })
        })
        .collect()
}

/// Fold new patches into a batch: an existing patch for the same chunk keeps
/// its (earliest) old tiles and takes the newest new tiles.
pub fn merge_patches(batch: &mut Vec<ChunkPatch>, patches: Vec<ChunkPatch>) {
    for patch in patches {
        match batch.iter_mut().find(|p| p.key == patch.key) {
            Some(existing) => existing.new_tiles = patch.new_tiles,
            None => batch.push(patch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilemap_core::{Layer, TileGrid};

    fn tile(x: u32) -> TileId {
        TileId::pack(x, 0, 0, false, false).unwrap()
    }

    #[test]
    fn test_diff_only_changed_chunks() {
        let mut map = TileMap::new("Test".to_string());
        let id = map.add_layer(Layer::new_chunked("Ground".to_string()));

        let snapshot = map.snapshot(ChunkKey::covering(id, 0, 0, 64, 0));
        map.layer_mut(id).unwrap().set_tile(1, 0, tile(16));

        let patches = diff_snapshot(&snapshot, &map);
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].coord(), ChunkCoord::new(0, 0));
        assert_eq!(patches[0].changed_cells(), 1);
        assert!(patches[0].old_tiles.iter().all(|t| t.is_empty()));
    }

    #[test]
    fn test_merge_keeps_oldest_old_and_newest_new() {
        let key = ChunkKey::at_tile(Uuid::new_v4(), 0, 0);
        let other = ChunkKey::at_tile(key.layer_id, 64, 0);
        let mut batch = vec![ChunkPatch {
            key,
            old_tiles: vec![tile(1)],
            new_tiles: vec![tile(2)],
        }];

        merge_patches(
            &mut batch,
            vec![
                ChunkPatch {
                    key,
                    old_tiles: vec![tile(2)],
                    new_tiles: vec![tile(3)],
                },
                ChunkPatch {
                    key: other,
                    old_tiles: vec![tile(7)],
                    new_tiles: vec![tile(8)],
                },
            ],
        );

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].old_tiles, vec![tile(1)]);
        assert_eq!(batch[0].new_tiles, vec![tile(3)]);
        assert_eq!(batch[1].key, other);
    }
}
