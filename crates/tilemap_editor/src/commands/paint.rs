//! Tile and terrain paint commands
//!
//! Each command snapshots exactly the chunks it may write and runs as one
//! history `set`. Inside a [`Stroke`](super::Stroke) the sets merge into a
//! single undo step.

use tilemap_core::{ChunkKey, TileGrid, TileId, Tileset};
use tilemap_history::ChunkedHistory;
use uuid::Uuid;

use crate::brush::{TerrainBrush, TileBrush};

/// Largest rectangle `fill_rect` accepts, in tiles
pub const MAX_FILL_AREA: i64 = 1 << 20;

/// Paint the brush tile at (x, y). Returns `true` if the map changed.
pub fn paint_tile(
    history: &mut ChunkedHistory,
    layer_id: Uuid,
    x: i32,
    y: i32,
    brush: &TileBrush,
) -> bool {
    let Some(tile) = brush.current() else {
        return false;
    };
    set_single(history, layer_id, x, y, tile)
}

/// Clear (x, y)
pub fn erase_tile(history: &mut ChunkedHistory, layer_id: Uuid, x: i32, y: i32) -> bool {
    set_single(history, layer_id, x, y, TileId::EMPTY)
}

fn set_single(history: &mut ChunkedHistory, layer_id: Uuid, x: i32, y: i32, tile: TileId) -> bool {
    let snapshot = history
        .present()
        .snapshot([ChunkKey::at_tile(layer_id, x, y)]);
    history.set(snapshot, |edit| {
        if let Some(mut layer) = edit.layer(layer_id) {
            layer.set_tile(x, y, tile);
        }
    })
}

/// Fill the inclusive rectangle between two corners with `tile`.
/// `TileId::EMPTY` clears the rectangle.
pub fn fill_rect(
    history: &mut ChunkedHistory,
    layer_id: Uuid,
    from: (i32, i32),
    to: (i32, i32),
    tile: TileId,
) -> bool {
    let (min_x, min_y, max_x, max_y) = normalize_rect(from, to);
    let area = rect_area(min_x, min_y, max_x, max_y);
    if area > MAX_FILL_AREA {
        log::warn!("fill of {} tiles exceeds limit of {}", area, MAX_FILL_AREA);
        return false;
    }

    let snapshot = history
        .present()
        .snapshot(ChunkKey::covering(layer_id, min_x, min_y, max_x, max_y));
    history.set(snapshot, |edit| {
        if let Some(mut layer) = edit.layer(layer_id) {
            for y in min_y..=max_y {
                for x in min_x..=max_x {
                    layer.set_tile(x, y, tile);
                }
            }
        }
    })
}

fn normalize_rect(from: (i32, i32), to: (i32, i32)) -> (i32, i32, i32, i32) {
    (
        from.0.min(to.0),
        from.1.min(to.1),
        from.0.max(to.0),
        from.1.max(to.1),
    )
}

fn rect_area(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> i64 {
    (i64::from(max_x) - i64::from(min_x) + 1) * (i64::from(max_y) - i64::from(min_y) + 1)
}

/// Paint terrain at (x, y) with the brush selection, updating one ring of
/// neighbors. Stale selections do nothing.
pub fn paint_terrain(
    history: &mut ChunkedHistory,
    layer_id: Uuid,
    x: i32,
    y: i32,
    brush: &TerrainBrush,
    tilesets: &[Tileset],
) -> bool {
    let Some(painter) = brush.painter(tilesets) else {
        return false;
    };
    let snapshot = history
        .present()
        .snapshot(ChunkKey::around(layer_id, x, y, 1));
    history.set(snapshot, |edit| {
        if let Some(mut layer) = edit.layer(layer_id) {
            painter.paint(&mut layer, x, y);
        }
    })
}

/// Paint terrain over an inclusive rectangle, cells in row-major order
pub fn fill_terrain_rect(
    history: &mut ChunkedHistory,
    layer_id: Uuid,
    from: (i32, i32),
    to: (i32, i32),
    brush: &TerrainBrush,
    tilesets: &[Tileset],
) -> bool {
    let Some(painter) = brush.painter(tilesets) else {
        return false;
    };
    let (min_x, min_y, max_x, max_y) = normalize_rect(from, to);
    let area = rect_area(min_x, min_y, max_x, max_y);
    if area > MAX_FILL_AREA {
        log::warn!("terrain fill of {} tiles exceeds limit of {}", area, MAX_FILL_AREA);
        return false;
    }

    // one extra ring for neighbor updates along the border
    let snapshot = history.present().snapshot(ChunkKey::covering(
        layer_id,
        min_x.saturating_sub(1),
        min_y.saturating_sub(1),
        max_x.saturating_add(1),
        max_y.saturating_add(1),
    ));
    history.set(snapshot, |edit| {
        if let Some(mut layer) = edit.layer(layer_id) {
            for y in min_y..=max_y {
                for x in min_x..=max_x {
                    painter.paint(&mut layer, x, y);
                }
            }
        }
    })
}

/// Erase (x, y) and fix up the neighbors of whatever terrain it held
pub fn erase_terrain(
    history: &mut ChunkedHistory,
    layer_id: Uuid,
    x: i32,
    y: i32,
    tilesets: &[Tileset],
) -> bool {
    let snapshot = history
        .present()
        .snapshot(ChunkKey::around(layer_id, x, y, 1));
    history.set(snapshot, |edit| {
        if let Some(mut layer) = edit.layer(layer_id) {
            tilemap_autotile::erase_terrain_tile(&mut layer, x, y, tilesets);
        }
    })
}
