//! Undo/redo history for tilemap_editor
//!
//! - `ChunkedHistory` - per-chunk diffs over a [`TileMap`](tilemap_core::TileMap)
//! - `SnapshotHistory` - full copies, for small documents
//! - `HistoryConfig` - capacity settings, loadable from TOML
//!
//! # Example
//!
//! ```rust,ignore
//! use tilemap_core::{ChunkKey, TileGrid};
//! use tilemap_history::ChunkedHistory;
//!
//! let mut history = ChunkedHistory::new(map);
//! let snapshot = history.present().snapshot(ChunkKey::around(layer_id, 5, 5, 1));
//! history.set(snapshot, |edit| {
//!     if let Some(mut layer) = edit.layer(layer_id) {
//!         layer.set_tile(5, 5, tile);
//!     }
//! });
//! history.undo();
//! ```

mod chunked;
mod config;
mod patch;
mod snapshot;

pub use chunked::{ChunkedHistory, EditFn, HistoryAction};
pub use config::{ConfigError, HistoryConfig, DEFAULT_MAX_ENTRIES};
pub use patch::{diff_snapshot, merge_patches, ChunkPatch, HistoryEntry};
pub use snapshot::{SnapshotAction, SnapshotHistory};
