//! Undoable editing commands

mod paint;
mod stroke;
mod terrain_catalog;

pub use paint::{
    erase_terrain, erase_tile, fill_rect, fill_terrain_rect, paint_terrain, paint_tile,
    MAX_FILL_AREA,
};
pub use stroke::Stroke;
pub use terrain_catalog::{
    add_terrain_layer, assign_terrain_tile, remove_terrain_layer, rename_terrain_layer,
    toggle_terrain_cell, unassign_terrain_tile, TilesetHistory,
};
