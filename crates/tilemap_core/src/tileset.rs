//! Tileset configuration with tile definitions and terrain catalogs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::collision::CollisionShape;
use crate::tile_id::{TileId, TileIdError};

/// Per-tile definition, keyed by packed id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileDefinition {
    pub id: TileId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form gameplay type ("wall", "water", ...)
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub tile_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collision: Vec<CollisionShape>,
}

impl TileDefinition {
    pub fn new(id: TileId) -> Self {
        Self {
            id,
            name: None,
            tile_type: None,
            collision: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_type(mut self, tile_type: impl Into<String>) -> Self {
        self.tile_type = Some(tile_type.into());
        self
    }

    pub fn with_collision(mut self, shape: CollisionShape) -> Self {
        self.collision.push(shape);
        self
    }

    /// Check if this tile has any collision shape
    pub fn has_collision(&self) -> bool {
        self.collision.iter().any(|s| s.has_collision())
    }
}

/// One catalog entry: the tile that fits a 9-bit adjacency pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainTile {
    pub tile_id: TileId,
    /// Bit `row * 3 + col` of the 3x3 neighborhood, 0..=511
    pub bitmask: u16,
}

/// A named catalog associating tiles with adjacency bitmasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainLayer {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub tiles: Vec<TerrainTile>,
}

impl TerrainLayer {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            tiles: Vec::new(),
        }
    }

    /// Catalog entry for a tile, flips ignored
    pub fn entry(&self, tile_id: TileId) -> Option<&TerrainTile> {
        let tile_id = tile_id.unflipped();
        self.tiles.iter().find(|t| t.tile_id.unflipped() == tile_id)
    }

    /// Assign a bitmask to a tile, adding it to the catalog if missing.
    /// Flips are ignored when matching; an existing entry keeps its position
    /// and takes the new id.
    pub fn set_tile_bitmask(&mut self, tile_id: TileId, bitmask: u16) {
        let bitmask = bitmask & 0x1FF;
        let key = tile_id.unflipped();
        match self.tiles.iter_mut().find(|t| t.tile_id.unflipped() == key) {
            Some(entry) => {
                entry.tile_id = tile_id;
                entry.bitmask = bitmask;
            }
            None => self.tiles.push(TerrainTile { tile_id, bitmask }),
        }
    }

    /// Remove a tile from the catalog, flips ignored
    pub fn remove_tile(&mut self, tile_id: TileId) -> Option<TerrainTile> {
        let key = tile_id.unflipped();
        let pos = self
            .tiles
            .iter()
            .position(|t| t.tile_id.unflipped() == key)?;
        Some(self.tiles.remove(pos))
    }

    /// Whether the catalog holds a tile at this sprite position
    pub fn contains_sprite(&self, x: u32, y: u32) -> bool {
        self.tiles.iter().any(|t| {
            t.tile_id
                .unpack()
                .map(|r| r.x == x && r.y == y)
                .unwrap_or(false)
        })
    }
}

/// Tileset configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tileset {
    pub id: Uuid,
    pub name: String,
    /// Stable index baked into packed tile ids, independent of list position
    pub order: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    #[serde(default)]
    pub tiles: Vec<TileDefinition>,
    #[serde(default)]
    pub terrain_layers: Vec<TerrainLayer>,
}

impl Tileset {
    pub fn new(name: String, order: u32, tile_width: u32, tile_height: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            order,
            tile_width,
            tile_height,
            tiles: Vec::new(),
            terrain_layers: Vec::new(),
        }
    }

    /// Packed id of the sprite at pixel (x, y) in this tileset
    pub fn tile_id_at(&self, x: u32, y: u32) -> Result<TileId, TileIdError> {
        TileId::pack(x, y, self.order, false, false)
    }

    /// Packed id of the sprite at grid cell (column, row)
    pub fn tile_id_at_cell(&self, column: u32, row: u32) -> Result<TileId, TileIdError> {
        self.tile_id_at(
            column.saturating_mul(self.tile_width),
            row.saturating_mul(self.tile_height),
        )
    }

    /// Add a tile definition, replacing any existing one with the same id
    pub fn add_tile(&mut self, tile: TileDefinition) {
        match self.tiles.iter_mut().find(|t| t.id == tile.id) {
            Some(existing) => *existing = tile,
            None => self.tiles.push(tile),
        }
    }

    /// Remove a tile definition by id
    pub fn remove_tile(&mut self, id: TileId) -> Option<TileDefinition> {
        let pos = self.tiles.iter().position(|t| t.id == id)?;
        Some(self.tiles.remove(pos))
    }

    pub fn get_tile(&self, id: TileId) -> Option<&TileDefinition> {
        self.tiles.iter().find(|t| t.id == id)
    }

    pub fn get_tile_mut(&mut self, id: TileId) -> Option<&mut TileDefinition> {
        self.tiles.iter_mut().find(|t| t.id == id)
    }

    /// Add a terrain layer and return its id
    pub fn add_terrain_layer(&mut self, terrain_layer: TerrainLayer) -> Uuid {
        let id = terrain_layer.id;
        self.terrain_layers.push(terrain_layer);
        id
    }

    /// Remove a terrain layer by id
    pub fn remove_terrain_layer(&mut self, id: Uuid) -> Option<TerrainLayer> {
        let pos = self.terrain_layers.iter().position(|t| t.id == id)?;
        Some(self.terrain_layers.remove(pos))
    }

    pub fn terrain_layer(&self, id: Uuid) -> Option<&TerrainLayer> {
        self.terrain_layers.iter().find(|t| t.id == id)
    }

    pub fn terrain_layer_mut(&mut self, id: Uuid) -> Option<&mut TerrainLayer> {
        self.terrain_layers.iter_mut().find(|t| t.id == id)
    }

    /// Find a tileset by its `order`, never by list position
    pub fn find_by_order(tilesets: &[Tileset], order: u32) -> Option<&Tileset> {
        tilesets.iter().find(|t| t.order == order)
    }

    /// Lowest order not used by any tileset in the list
    pub fn next_free_order(tilesets: &[Tileset]) -> u32 {
        (0..)
            .find(|order| tilesets.iter().all(|t| t.order != *order))
            .unwrap_or(0)
    }
}
