//! Brush selection state
//!
//! Brushes are plain values owned by the caller and passed into each
//! command, so painting never reads editor-global state.

use serde::{Deserialize, Serialize};
use tilemap_autotile::TerrainPainter;
use tilemap_core::{TileId, Tileset};
use uuid::Uuid;

/// Editing tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EditorTool {
    #[default]
    Paint,
    Erase,
    Fill,
    Terrain,
}

impl EditorTool {
    /// Returns true if dragging with this tool should be one undo step
    pub fn is_stroke_tool(&self) -> bool {
        matches!(
            self,
            EditorTool::Paint | EditorTool::Erase | EditorTool::Terrain
        )
    }
}

/// Plain tile brush
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileBrush {
    pub tile: Option<TileId>,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl TileBrush {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a tile, keeping the current flip settings
    pub fn select(&mut self, tile: TileId) {
        self.tile = (!tile.is_empty()).then_some(tile.unflipped());
    }

    pub fn deselect(&mut self) {
        self.tile = None;
    }

    pub fn toggle_flip_x(&mut self) {
        self.flip_x = !self.flip_x;
    }

    pub fn toggle_flip_y(&mut self) {
        self.flip_y = !self.flip_y;
    }

    /// Tile to paint, with flips applied
    pub fn current(&self) -> Option<TileId> {
        self.tile.map(|t| t.with_flip(self.flip_x, self.flip_y))
    }
}

/// Terrain brush: which terrain layer of which tileset to paint with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainBrush {
    pub tileset_id: Option<Uuid>,
    pub terrain_layer_id: Option<Uuid>,
}

impl TerrainBrush {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, tileset_id: Uuid, terrain_layer_id: Uuid) {
        self.tileset_id = Some(tileset_id);
        self.terrain_layer_id = Some(terrain_layer_id);
    }

    pub fn deselect(&mut self) {
        self.tileset_id = None;
        self.terrain_layer_id = None;
    }

    pub fn is_active(&self) -> bool {
        self.tileset_id.is_some() && self.terrain_layer_id.is_some()
    }

    /// Resolve against the current tilesets. `None` when nothing is selected
    /// or the selection no longer exists.
    pub fn painter<'a>(&self, tilesets: &'a [Tileset]) -> Option<TerrainPainter<'a>> {
        let painter = TerrainPainter::new(tilesets, self.tileset_id?, self.terrain_layer_id?);
        if painter.is_none() {
            log::debug!("terrain brush selection is stale");
        }
        painter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilemap_core::TerrainLayer;

    #[test]
    fn test_tile_brush_flips() {
        let tile = TileId::pack(16, 32, 0, false, false).unwrap();
        let mut brush = TileBrush::new();
        assert_eq!(brush.current(), None);

        brush.select(tile);
        brush.toggle_flip_x();
        let painted = brush.current().unwrap().unpack().unwrap();
        assert!(painted.flip_x);
        assert!(!painted.flip_y);
        assert_eq!((painted.x, painted.y), (16, 32));

        brush.select(TileId::EMPTY);
        assert_eq!(brush.current(), None);
    }

    #[test]
    fn test_terrain_brush_resolves_selection() {
        let mut tileset = Tileset::new("Grass".to_string(), 0, 16, 16);
        let terrain_id = tileset.add_terrain_layer(TerrainLayer::new("Grass".to_string()));
        let tilesets = vec![tileset];

        let mut brush = TerrainBrush::new();
        assert!(brush.painter(&tilesets).is_none());

        brush.select(tilesets[0].id, terrain_id);
        assert!(brush.is_active());
        assert!(brush.painter(&tilesets).is_some());

        brush.select(tilesets[0].id, Uuid::new_v4());
        assert!(brush.painter(&tilesets).is_none());

        brush.deselect();
        assert!(!brush.is_active());
    }

    #[test]
    fn test_brush_json() {
        let brush = TerrainBrush::default();
        let json = serde_json::to_string(&brush).unwrap();
        assert_eq!(json, r#"{"tilesetId":null,"terrainLayerId":null}"#);
        assert!(EditorTool::Terrain.is_stroke_tool());
        assert!(!EditorTool::Fill.is_stroke_tool());
    }
}
