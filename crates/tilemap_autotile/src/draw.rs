//! Terrain painting on a tile grid
//!
//! Placing a terrain tile computes the cell's adjacency bitmask from which
//! neighbors belong to the same terrain layer, picks the matching catalog
//! tile, and then recomputes the ring of 8 neighbors so their edges and
//! corners follow. Stale references (missing tileset, terrain layer or
//! catalog match) skip the cell instead of failing, so a paint gesture is
//! never interrupted.

use tilemap_core::{TerrainLayer, TileGrid, TileId, Tileset};
use uuid::Uuid;

use crate::bitmask::calculate_bitmask_from_neighbors;
use crate::terrain::find_tile_by_bitmask;

/// The 8 neighbor offsets in row-major order, center skipped.
/// Neighbor updates always run in this order.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Terrain layer a placed tile belongs to.
///
/// Looks up the tileset by the tile's packed order and scans its terrain
/// layers for a catalog entry at the tile's sprite position.
pub fn get_terrain_layer_for_tile(tile: TileId, tilesets: &[Tileset]) -> Option<Uuid> {
    let r = tile.unpack()?;
    let tileset = Tileset::find_by_order(tilesets, r.tileset_order)?;
    tileset
        .terrain_layers
        .iter()
        .find(|layer| layer.contains_sprite(r.x, r.y))
        .map(|layer| layer.id)
}

/// Adjacency bitmask of (x, y) with respect to one terrain layer. The
/// plane does not wrap: past `i32::MAX` or `i32::MIN` there is no neighbor.
pub fn terrain_bitmask_at<G>(
    grid: &G,
    x: i32,
    y: i32,
    terrain_layer_id: Uuid,
    tilesets: &[Tileset],
) -> u16
where
    G: TileGrid + ?Sized,
{
    calculate_bitmask_from_neighbors(|dx, dy| {
        let (Some(nx), Some(ny)) = (x.checked_add(dx), y.checked_add(dy)) else {
            return false;
        };
        get_terrain_layer_for_tile(grid.get_tile(nx, ny), tilesets) == Some(terrain_layer_id)
    })
}

/// Write the terrain tile that fits (x, y). Returns `false` and leaves the
/// cell untouched when the catalog has no match.
pub fn place_terrain_tile<G>(
    grid: &mut G,
    x: i32,
    y: i32,
    terrain_layer: &TerrainLayer,
    tileset_order: u32,
    tilesets: &[Tileset],
) -> bool
where
    G: TileGrid + ?Sized,
{
    let bitmask = terrain_bitmask_at(grid, x, y, terrain_layer.id, tilesets);

    let Some(tile_id) = find_tile_by_bitmask(terrain_layer, bitmask) else {
        log::debug!("terrain layer '{}' has no tiles to place", terrain_layer.name);
        return false;
    };
    let Some(sprite) = tile_id.unpack() else {
        log::debug!("terrain layer '{}' holds an empty tile id", terrain_layer.name);
        return false;
    };

    match TileId::pack(sprite.x, sprite.y, tileset_order, sprite.flip_x, sprite.flip_y) {
        Ok(packed) => {
            grid.set_tile(x, y, packed);
            true
        }
        Err(e) => {
            log::warn!("cannot place terrain tile at ({}, {}): {}", x, y, e);
            false
        }
    }
}

/// Recompute the 8 neighbors of (x, y) that belong to `terrain_layer_id`.
/// Exactly one ring; the neighbors' own neighbors are not revisited.
/// Returns the number of neighbors rewritten.
pub fn update_neighbors_around<G>(
    grid: &mut G,
    x: i32,
    y: i32,
    terrain_layer_id: Uuid,
    tileset: &Tileset,
    tileset_order: u32,
    tilesets: &[Tileset],
) -> usize
where
    G: TileGrid + ?Sized,
{
    let Some(terrain_layer) = tileset.terrain_layer(terrain_layer_id) else {
        log::debug!(
            "terrain layer {} not found in tileset '{}'",
            terrain_layer_id,
            tileset.name
        );
        return 0;
    };

    let mut updated = 0;
    for (dx, dy) in NEIGHBOR_OFFSETS {
        let (Some(nx), Some(ny)) = (x.checked_add(dx), y.checked_add(dy)) else {
            continue;
        };
        let neighbor = grid.get_tile(nx, ny);
        if get_terrain_layer_for_tile(neighbor, tilesets) != Some(terrain_layer_id) {
            continue;
        }
        if place_terrain_tile(grid, nx, ny, terrain_layer, tileset_order, tilesets) {
            updated += 1;
        }
    }
    updated
}

/// Clear (x, y) and return what was there. Callers follow up with
/// [`update_neighbors_around`] so the neighbors lose their edge toward it.
pub fn remove_terrain_tile<G>(grid: &mut G, x: i32, y: i32) -> TileId
where
    G: TileGrid + ?Sized,
{
    let previous = grid.get_tile(x, y);
    grid.set_tile(x, y, TileId::EMPTY);
    previous
}

/// Paint context for one terrain layer of one tileset.
///
/// Built from the current brush selection and passed into each call, so
/// painting never reads ambient editor state.
#[derive(Debug, Clone, Copy)]
pub struct TerrainPainter<'a> {
    pub tileset: &'a Tileset,
    pub terrain_layer: &'a TerrainLayer,
    pub tilesets: &'a [Tileset],
}

impl<'a> TerrainPainter<'a> {
    /// Resolve a selection. `None` if the tileset or terrain layer is gone.
    pub fn new(tilesets: &'a [Tileset], tileset_id: Uuid, terrain_layer_id: Uuid) -> Option<Self> {
        let tileset = tilesets.iter().find(|t| t.id == tileset_id)?;
        let terrain_layer = tileset.terrain_layer(terrain_layer_id)?;
        Some(Self {
            tileset,
            terrain_layer,
            tilesets,
        })
    }

    /// Place terrain at (x, y) and ripple one ring of neighbors.
    /// Returns `false` if nothing was placed.
    pub fn paint<G>(&self, grid: &mut G, x: i32, y: i32) -> bool
    where
        G: TileGrid + ?Sized,
    {
        let order = self.tileset.order;
        if !place_terrain_tile(grid, x, y, self.terrain_layer, order, self.tilesets) {
            return false;
        }
        update_neighbors_around(
            grid,
            x,
            y,
            self.terrain_layer.id,
            self.tileset,
            order,
            self.tilesets,
        );
        true
    }
}

/// Erase (x, y) and fix up neighbors of whatever terrain it held.
/// Returns `false` if the cell was already empty.
pub fn erase_terrain_tile<G>(grid: &mut G, x: i32, y: i32, tilesets: &[Tileset]) -> bool
where
    G: TileGrid + ?Sized,
{
    let previous = remove_terrain_tile(grid, x, y);
    if previous.is_empty() {
        return false;
    }

    let owner = previous
        .tileset_order()
        .and_then(|order| Tileset::find_by_order(tilesets, order));
    if let (Some(tileset), Some(terrain_layer_id)) =
        (owner, get_terrain_layer_for_tile(previous, tilesets))
    {
        update_neighbors_around(
            grid,
            x,
            y,
            terrain_layer_id,
            tileset,
            tileset.order,
            tilesets,
        );
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmask::bits;
    use tilemap_core::{ChunkedTiles, DenseTiles, TerrainTile};

    /// Tileset (order 0) with one "Grass" terrain covering the horizontal
    /// variants: lone, east-open, west-open, both-open.
    fn grass_tileset() -> (Tileset, Uuid) {
        let mut tileset = Tileset::new("Nature".to_string(), 0, 16, 16);
        let mut grass = TerrainLayer::new("Grass".to_string());
        for (column, bitmask) in [
            (0, bits::CENTER),
            (1, bits::CENTER | bits::E),
            (2, bits::CENTER | bits::W),
            (3, bits::CENTER | bits::E | bits::W),
        ] {
            grass.tiles.push(TerrainTile {
                tile_id: tileset.tile_id_at_cell(column, 0).unwrap(),
                bitmask,
            });
        }
        let id = tileset.add_terrain_layer(grass);
        (tileset, id)
    }

    fn sprite(grid: &ChunkedTiles, x: i32, y: i32) -> Option<(u32, u32)> {
        grid.get_tile(x, y).unpack().map(|r| (r.x, r.y))
    }

    #[test]
    fn test_terrain_layer_lookup() {
        let (tileset, grass) = grass_tileset();
        let tilesets = vec![tileset];

        let lone = tilesets[0].tile_id_at(0, 0).unwrap();
        assert_eq!(get_terrain_layer_for_tile(lone, &tilesets), Some(grass));

        // not in any catalog
        let other = tilesets[0].tile_id_at(0, 64).unwrap();
        assert_eq!(get_terrain_layer_for_tile(other, &tilesets), None);
        // unknown tileset order
        let foreign = TileId::pack(0, 0, 7, false, false).unwrap();
        assert_eq!(get_terrain_layer_for_tile(foreign, &tilesets), None);
        assert_eq!(get_terrain_layer_for_tile(TileId::EMPTY, &tilesets), None);
    }

    #[test]
    fn test_ripple_updates_western_neighbor() {
        let (tileset, grass) = grass_tileset();
        let tilesets = vec![tileset];
        let painter = TerrainPainter::new(&tilesets, tilesets[0].id, grass).unwrap();
        let mut grid = ChunkedTiles::new();

        assert!(painter.paint(&mut grid, 5, 5));
        assert_eq!(sprite(&grid, 5, 5), Some((0, 0)));
        let first = grid.get_tile(5, 5);

        assert!(painter.paint(&mut grid, 6, 5));
        // (5,5) now has an eastern neighbor, (6,5) a western one
        assert_ne!(grid.get_tile(5, 5), first);
        assert_eq!(sprite(&grid, 5, 5), Some((16, 0)));
        assert_eq!(sprite(&grid, 6, 5), Some((32, 0)));

        let mask = terrain_bitmask_at(&grid, 5, 5, grass, &tilesets);
        assert_ne!(mask & bits::E, 0);
    }

    #[test]
    fn test_neighbor_update_is_single_ring() {
        let (tileset, grass) = grass_tileset();
        let lone = tileset.tile_id_at(0, 0).unwrap();
        let tilesets = vec![tileset];
        let mut grid = ChunkedTiles::new();

        // a row of stale "lone" tiles
        for x in 0..3 {
            grid.set_tile(x, 0, lone);
        }
        grid.set_tile(3, 0, lone);

        let updated = update_neighbors_around(&mut grid, 3, 0, grass, &tilesets[0], 0, &tilesets);
        assert_eq!(updated, 1);
        // only (2,0) is inside the ring
        assert_eq!(sprite(&grid, 2, 0), Some((48, 0)));
        assert_eq!(grid.get_tile(1, 0), lone);
        assert_eq!(grid.get_tile(0, 0), lone);
    }

    #[test]
    fn test_other_terrain_is_not_a_neighbor() {
        let (mut tileset, grass) = grass_tileset();
        let mut water = TerrainLayer::new("Water".to_string());
        water.tiles.push(TerrainTile {
            tile_id: tileset.tile_id_at_cell(0, 1).unwrap(),
            bitmask: bits::CENTER,
        });
        let water_id = tileset.add_terrain_layer(water);
        let tilesets = vec![tileset];
        let mut grid = ChunkedTiles::new();

        TerrainPainter::new(&tilesets, tilesets[0].id, water_id)
            .unwrap()
            .paint(&mut grid, 4, 5);
        TerrainPainter::new(&tilesets, tilesets[0].id, grass)
            .unwrap()
            .paint(&mut grid, 5, 5);

        assert_eq!(sprite(&grid, 5, 5), Some((0, 0)));
        assert_eq!(sprite(&grid, 4, 5), Some((0, 16)));
    }

    #[test]
    fn test_erase_recomputes_neighbors() {
        let (tileset, grass) = grass_tileset();
        let tilesets = vec![tileset];
        let painter = TerrainPainter::new(&tilesets, tilesets[0].id, grass).unwrap();
        let mut grid = ChunkedTiles::new();

        for x in 0..3 {
            painter.paint(&mut grid, x, 0);
        }
        assert_eq!(sprite(&grid, 0, 0), Some((16, 0)));

        assert!(erase_terrain_tile(&mut grid, 1, 0, &tilesets));
        assert_eq!(grid.get_tile(1, 0), TileId::EMPTY);
        assert_eq!(sprite(&grid, 0, 0), Some((0, 0)));
        assert_eq!(sprite(&grid, 2, 0), Some((0, 0)));

        assert!(!erase_terrain_tile(&mut grid, 1, 0, &tilesets));
    }

    #[test]
    fn test_stale_selection_is_noop() {
        let (tileset, grass) = grass_tileset();
        let tilesets = vec![tileset];
        let mut grid = ChunkedTiles::new();

        assert!(TerrainPainter::new(&tilesets, Uuid::new_v4(), grass).is_none());
        assert!(TerrainPainter::new(&tilesets, tilesets[0].id, Uuid::new_v4()).is_none());

        let updated =
            update_neighbors_around(&mut grid, 0, 0, Uuid::new_v4(), &tilesets[0], 0, &tilesets);
        assert_eq!(updated, 0);

        let empty = TerrainLayer::new("Empty".to_string());
        assert!(!place_terrain_tile(&mut grid, 0, 0, &empty, 0, &tilesets));
        assert!(grid.is_empty());
    }

    #[test]
    fn test_place_repacks_with_given_order() {
        let (tileset, grass) = grass_tileset();
        let terrain = tileset.terrain_layer(grass).unwrap().clone();
        let tilesets = vec![tileset];
        let mut grid = ChunkedTiles::new();

        assert!(place_terrain_tile(&mut grid, 0, 0, &terrain, 9, &tilesets));
        assert_eq!(grid.get_tile(0, 0).tileset_order(), Some(9));
    }

    #[test]
    fn test_painting_is_deterministic_on_dense_layers() {
        let (tileset, grass) = grass_tileset();
        let tilesets = vec![tileset];
        let painter = TerrainPainter::new(&tilesets, tilesets[0].id, grass).unwrap();

        let run = || {
            let mut grid = DenseTiles::new(8, 8);
            for (x, y) in [(1, 1), (2, 1), (3, 1), (2, 2), (7, 7), (8, 8)] {
                painter.paint(&mut grid, x, y);
            }
            grid
        };

        let a = run();
        assert_eq!(a, run());
        assert_eq!(a.get_tile(8, 8), TileId::EMPTY);
        assert!(!a.get_tile(7, 7).is_empty());
    }

    #[test]
    fn test_plane_edge_has_no_wrapped_neighbors() {
        let (tileset, grass) = grass_tileset();
        let lone = tileset.tile_id_at(0, 0).unwrap();
        let tilesets = vec![tileset];
        let mut grid = ChunkedTiles::new();
        grid.set_tile(i32::MIN, 0, lone);

        assert_eq!(terrain_bitmask_at(&grid, i32::MAX, 0, grass, &tilesets), bits::CENTER);
    }

    #[test]
    fn test_painting_at_plane_edge_leaves_far_side_alone() {
        let (tileset, grass) = grass_tileset();
        let lone = tileset.tile_id_at(0, 0).unwrap();
        let tilesets = vec![tileset];
        let painter = TerrainPainter::new(&tilesets, tilesets[0].id, grass).unwrap();
        let mut grid = ChunkedTiles::new();
        grid.set_tile(i32::MIN, 0, lone);

        assert!(painter.paint(&mut grid, i32::MAX, 0));
        assert_eq!(sprite(&grid, i32::MAX, 0), Some((0, 0)));
        assert_eq!(grid.get_tile(i32::MIN, 0), lone);

        assert!(erase_terrain_tile(&mut grid, i32::MAX, 0, &tilesets));
        assert_eq!(grid.get_tile(i32::MIN, 0), lone);
    }
}
