//! Drag strokes
//!
//! A stroke opens a history batch when the pointer goes down and closes it
//! when the pointer comes up, so a whole drag undoes in one step.

use std::ops::{Deref, DerefMut};

use tilemap_history::ChunkedHistory;

/// Batch guard over a [`ChunkedHistory`].
///
/// Closes the batch on [`Stroke::finish`] or when dropped. A stroke begun
/// while another batch is already open joins that batch and leaves closing
/// it to the outer owner.
pub struct Stroke<'h> {
    history: &'h mut ChunkedHistory,
    owns_batch: bool,
    finished: bool,
}

impl<'h> Stroke<'h> {
    pub fn begin(history: &'h mut ChunkedHistory) -> Self {
        let owns_batch = !history.is_batching();
        history.start_batch();
        Self {
            history,
            owns_batch,
            finished: false,
        }
    }

    /// End the stroke. Returns `true` if it was committed as a history entry.
    pub fn finish(mut self) -> bool {
        self.close()
    }

    fn close(&mut self) -> bool {
        if self.finished {
            return false;
        }
        self.finished = true;
        self.owns_batch && self.history.end_batch()
    }
}

impl Deref for Stroke<'_> {
    type Target = ChunkedHistory;

    fn deref(&self) -> &ChunkedHistory {
        self.history
    }
}

impl DerefMut for Stroke<'_> {
    fn deref_mut(&mut self) -> &mut ChunkedHistory {
        self.history
    }
}

impl Drop for Stroke<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::{TerrainBrush, TileBrush};
    use crate::commands::{erase_terrain, erase_tile, paint_terrain, paint_tile};
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use tilemap_core::{Layer, TerrainLayer, TileId, TileMap, Tileset};
    use uuid::Uuid;

    fn setup() -> (ChunkedHistory, Uuid, TileBrush) {
        let mut map = TileMap::new("Test".to_string());
        let id = map.add_layer(Layer::new_chunked("Ground".to_string()));
        let mut brush = TileBrush::new();
        brush.select(TileId::pack(16, 0, 0, false, false).unwrap());
        (ChunkedHistory::new(map), id, brush)
    }

    #[test]
    fn test_stroke_is_one_undo_step() {
        let (mut history, id, brush) = setup();
        let mut stroke = Stroke::begin(&mut history);
        for x in 0..5 {
            paint_tile(&mut stroke, id, x, 0, &brush);
        }
        assert!(stroke.is_batching());
        assert!(stroke.finish());

        assert_eq!(history.past_len(), 1);
        history.undo();
        assert_eq!(history.present().layer(id).unwrap().tile_count(), 0);
    }

    #[test]
    fn test_drop_closes_batch() {
        let (mut history, id, brush) = setup();
        {
            let mut stroke = Stroke::begin(&mut history);
            paint_tile(&mut stroke, id, 1, 1, &brush);
        }
        assert!(!history.is_batching());
        assert_eq!(history.past_len(), 1);
    }

    #[test]
    fn test_net_zero_stroke_commits_nothing() {
        let (mut history, id, brush) = setup();
        let mut stroke = Stroke::begin(&mut history);
        paint_tile(&mut stroke, id, 2, 2, &brush);
        erase_tile(&mut stroke, id, 2, 2);
        assert!(!stroke.finish());
        assert!(!history.can_undo());
    }

    #[test]
    fn test_nested_stroke_joins_outer_batch() {
        let (mut history, id, brush) = setup();
        history.start_batch();
        {
            let mut inner = Stroke::begin(&mut history);
            paint_tile(&mut inner, id, 0, 0, &brush);
            assert!(!inner.finish());
        }
        assert!(history.is_batching());
        paint_tile(&mut history, id, 1, 0, &brush);
        assert!(history.end_batch());
        assert_eq!(history.past_len(), 1);
    }

    #[test]
    fn test_random_terrain_stroke_undoes_to_start() {
        let (mut history, id, _) = setup();
        let mut tileset = Tileset::new("Terrain".to_string(), 0, 16, 16);
        let mut grass = TerrainLayer::new("Grass".to_string());
        for (column, bitmask) in [(0, 16), (1, 48), (2, 24), (3, 56), (4, 511)] {
            grass.set_tile_bitmask(tileset.tile_id_at_cell(column, 0).unwrap(), bitmask);
        }
        let terrain_id = tileset.add_terrain_layer(grass);
        let tilesets = vec![tileset];
        let mut brush = TerrainBrush::new();
        brush.select(tilesets[0].id, terrain_id);

        let start = history.present().clone();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut stroke = Stroke::begin(&mut history);
        for _ in 0..200 {
            let x = rng.gen_range(-70..70);
            let y = rng.gen_range(-70..70);
            if rng.gen_bool(0.25) {
                erase_terrain(&mut stroke, id, x, y, &tilesets);
            } else {
                paint_terrain(&mut stroke, id, x, y, &brush, &tilesets);
            }
        }
        stroke.finish();
        let painted = history.present().clone();

        assert_eq!(history.past_len(), 1);
        history.undo();
        assert_eq!(history.present(), &start);
        history.redo();
        assert_eq!(history.present(), &painted);
    }
}
