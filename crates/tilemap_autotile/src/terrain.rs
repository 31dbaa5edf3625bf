//! Terrain catalog matching
//!
//! Picks the catalog tile whose bitmask best fits a computed adjacency mask.

use tilemap_core::{TerrainLayer, TerrainTile, TileDefinition, TileId, Tileset};

use crate::bitmask::bitmask_similarity;

/// Find the best catalog entry for a target bitmask.
/// Returns `(entry, similarity)` where similarity is 0..=9 and 9 means an
/// exact match. Returns `None` only for an empty catalog.
pub fn find_best_tile(terrain_layer: &TerrainLayer, target: u16) -> Option<(&TerrainTile, u32)> {
    if let Some(exact) = terrain_layer.tiles.iter().find(|t| t.bitmask == target) {
        return Some((exact, 9));
    }

    let mut best: Option<(&TerrainTile, u32)> = None;
    for entry in &terrain_layer.tiles {
        let score = bitmask_similarity(entry.bitmask, target);
        match best {
            // strictly greater, so the first entry wins ties
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((entry, score)),
        }
    }
    best
}

/// Tile for a target bitmask: exact match first, otherwise the most similar
/// entry in catalog order. `None` when the catalog is empty.
pub fn find_tile_by_bitmask(terrain_layer: &TerrainLayer, target: u16) -> Option<TileId> {
    find_best_tile(terrain_layer, target).map(|(entry, _)| entry.tile_id)
}

/// Tile definitions of a terrain layer's catalog, in catalog order.
/// Catalog entries without a definition in the tileset are skipped.
pub fn get_tiles_for_terrain<'a>(
    tileset: &'a Tileset,
    terrain_layer: &TerrainLayer,
) -> Vec<&'a TileDefinition> {
    terrain_layer
        .tiles
        .iter()
        .filter_map(|entry| tileset.get_tile(entry.tile_id))
        .collect()
}
