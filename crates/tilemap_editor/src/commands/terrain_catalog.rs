//! Terrain catalog editing with undo
//!
//! Catalogs are small, so edits run through a whole-value
//! [`SnapshotHistory`] over the owning [`Tileset`].

use tilemap_autotile::{bits, toggle_bitmask_cell};
use tilemap_core::{TerrainLayer, TileId, Tileset};
use tilemap_history::SnapshotHistory;
use uuid::Uuid;

/// Undo history for one tileset's definitions and catalogs
pub type TilesetHistory = SnapshotHistory<Tileset>;

/// Flip one cell of a tile's bitmask in a terrain layer. A tile not yet in
/// the catalog starts from the center-only mask.
pub fn toggle_terrain_cell(
    history: &mut TilesetHistory,
    terrain_layer_id: Uuid,
    tile_id: TileId,
    row: usize,
    col: usize,
) -> bool {
    let tile_id = tile_id.unflipped();
    history.update(|tileset| {
        let Some(layer) = tileset.terrain_layer_mut(terrain_layer_id) else {
            log::debug!("terrain layer {} not found", terrain_layer_id);
            return;
        };
        let current = layer.entry(tile_id).map_or(bits::CENTER, |e| e.bitmask);
        layer.set_tile_bitmask(tile_id, toggle_bitmask_cell(current, row, col));
    })
}

/// Add a tile to a terrain catalog or replace its bitmask
pub fn assign_terrain_tile(
    history: &mut TilesetHistory,
    terrain_layer_id: Uuid,
    tile_id: TileId,
    bitmask: u16,
) -> bool {
    if tile_id.is_empty() {
        return false;
    }
    let tile_id = tile_id.unflipped();
    history.update(|tileset| {
        if let Some(layer) = tileset.terrain_layer_mut(terrain_layer_id) {
            layer.set_tile_bitmask(tile_id, bitmask);
        }
    })
}

/// Remove a tile from a terrain catalog
pub fn unassign_terrain_tile(
    history: &mut TilesetHistory,
    terrain_layer_id: Uuid,
    tile_id: TileId,
) -> bool {
    let tile_id = tile_id.unflipped();
    history.update(|tileset| {
        if let Some(layer) = tileset.terrain_layer_mut(terrain_layer_id) {
            layer.remove_tile(tile_id);
        }
    })
}

/// Create an empty terrain layer and return its id
pub fn add_terrain_layer(history: &mut TilesetHistory, name: impl Into<String>) -> Uuid {
    let layer = TerrainLayer::new(name.into());
    let id = layer.id;
    history.update(|tileset| {
        tileset.add_terrain_layer(layer);
    });
    id
}

pub fn remove_terrain_layer(history: &mut TilesetHistory, terrain_layer_id: Uuid) -> bool {
    history.update(|tileset| {
        tileset.remove_terrain_layer(terrain_layer_id);
    })
}

pub fn rename_terrain_layer(
    history: &mut TilesetHistory,
    terrain_layer_id: Uuid,
    name: impl Into<String>,
) -> bool {
    let name = name.into();
    history.update(|tileset| {
        if let Some(layer) = tileset.terrain_layer_mut(terrain_layer_id) {
            layer.name = name;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilemap_autotile::is_bitmask_cell_set;

    fn setup() -> (TilesetHistory, Uuid, TileId) {
        let tileset = Tileset::new("Terrain".to_string(), 0, 16, 16);
        let tile = tileset.tile_id_at_cell(1, 0).unwrap();
        let mut history = TilesetHistory::new(tileset);
        let layer_id = add_terrain_layer(&mut history, "Grass");
        (history, layer_id, tile)
    }

    fn bitmask(history: &TilesetHistory, layer_id: Uuid, tile: TileId) -> Option<u16> {
        history
            .present()
            .terrain_layer(layer_id)
            .and_then(|l| l.entry(tile))
            .map(|e| e.bitmask)
    }

    #[test]
    fn test_toggle_adds_and_undoes() {
        let (mut history, layer_id, tile) = setup();

        assert!(toggle_terrain_cell(&mut history, layer_id, tile, 1, 2));
        assert_eq!(bitmask(&history, layer_id, tile), Some(bits::CENTER | bits::E));

        assert!(toggle_terrain_cell(&mut history, layer_id, tile, 0, 1));
        let mask = bitmask(&history, layer_id, tile).unwrap();
        assert!(is_bitmask_cell_set(mask, 0, 1));

        history.undo();
        assert_eq!(bitmask(&history, layer_id, tile), Some(bits::CENTER | bits::E));
        history.undo();
        assert_eq!(bitmask(&history, layer_id, tile), None);
    }

    #[test]
    fn test_flipped_tile_edits_same_entry() {
        let (mut history, layer_id, tile) = setup();
        assign_terrain_tile(&mut history, layer_id, tile.with_flip(true, false), 16);
        assign_terrain_tile(&mut history, layer_id, tile, 48);

        let layer = history.present().terrain_layer(layer_id).unwrap();
        assert_eq!(layer.tiles.len(), 1);
        assert_eq!(layer.tiles[0].bitmask, 48);
    }

    #[test]
    fn test_unknown_layer_is_noop() {
        let (mut history, _, tile) = setup();
        let before = history.past_len();
        assert!(!toggle_terrain_cell(&mut history, Uuid::new_v4(), tile, 0, 0));
        assert!(!assign_terrain_tile(&mut history, Uuid::new_v4(), tile, 16));
        assert_eq!(history.past_len(), before);
    }

    #[test]
    fn test_unassign_and_remove_layer() {
        let (mut history, layer_id, tile) = setup();
        assign_terrain_tile(&mut history, layer_id, tile, 16);
        assert!(unassign_terrain_tile(&mut history, layer_id, tile));
        assert!(!unassign_terrain_tile(&mut history, layer_id, tile));

        assert!(rename_terrain_layer(&mut history, layer_id, "Dirt"));
        assert!(remove_terrain_layer(&mut history, layer_id));
        assert!(history.present().terrain_layer(layer_id).is_none());

        history.undo();
        assert_eq!(history.present().terrain_layer(layer_id).unwrap().name, "Dirt");
    }
}
