//! Chunk-diff undo/redo for tile maps
//!
//! Instead of copying the whole map per edit, each history entry stores the
//! before/after contents of only the 64x64 chunks the edit touched. The
//! caller names those chunks up front with a [`ChunkSnapshot`]; the edit then
//! runs against a [`MapEdit`] that can only write inside them.

use std::collections::VecDeque;

use tilemap_core::{ChunkSnapshot, MapEdit, TileMap};

use crate::config::HistoryConfig;
use crate::patch::{diff_snapshot, merge_patches, ChunkPatch, HistoryEntry};

/// Edit callback run against the snapshotted chunks
pub type EditFn<'a> = Box<dyn FnOnce(&mut MapEdit<'_>) + 'a>;

/// Actions accepted by [`ChunkedHistory::dispatch`]
pub enum HistoryAction<'a> {
    /// Run an edit and record the diff of the snapshotted chunks
    Set {
        snapshot: ChunkSnapshot,
        edit: EditFn<'a>,
    },
    Undo,
    Redo,
    /// Replace the document and forget all history
    Reset(TileMap),
    StartBatch,
    EndBatch,
}

impl<'a> HistoryAction<'a> {
    pub fn set(snapshot: ChunkSnapshot, edit: impl FnOnce(&mut MapEdit<'_>) + 'a) -> Self {
        HistoryAction::Set {
            snapshot,
            edit: Box::new(edit),
        }
    }
}

/// Undo/redo state for one tile map document
#[derive(Debug, Clone)]
pub struct ChunkedHistory {
    present: TileMap,
    /// Oldest first
    past: VecDeque<HistoryEntry>,
    /// Next to redo first
    future: VecDeque<HistoryEntry>,
    batching: bool,
    batch: Vec<ChunkPatch>,
    config: HistoryConfig,
}

impl Default for ChunkedHistory {
    fn default() -> Self {
        Self::new(TileMap::default())
    }
}

impl ChunkedHistory {
    pub fn new(present: TileMap) -> Self {
        Self::with_config(present, HistoryConfig::default())
    }

    pub fn with_config(present: TileMap, config: HistoryConfig) -> Self {
        Self {
            present,
            past: VecDeque::new(),
            future: VecDeque::new(),
            batching: false,
            batch: Vec::new(),
            config,
        }
    }

    /// Apply one action
    pub fn dispatch(&mut self, action: HistoryAction<'_>) {
        match action {
            HistoryAction::Set { snapshot, edit } => {
                self.set(snapshot, edit);
            }
            HistoryAction::Undo => {
                self.undo();
            }
            HistoryAction::Redo => {
                self.redo();
            }
            HistoryAction::Reset(map) => self.reset(map),
            HistoryAction::StartBatch => self.start_batch(),
            HistoryAction::EndBatch => {
                self.end_batch();
            }
        }
    }

    /// Run `edit` on the present map and record what changed inside the
    /// snapshotted chunks. Returns `true` if any tile changed.
    ///
    /// A snapshot taken before the present last changed is refused and the
    /// edit does not run. While batching, the diff is merged into the open
    /// batch instead of becoming its own entry.
    pub fn set<F>(&mut self, snapshot: ChunkSnapshot, edit: F) -> bool
    where
        F: FnOnce(&mut MapEdit<'_>),
    {
        match self.present.edit(&snapshot) {
            Ok(mut view) => edit(&mut view),
            Err(e) => {
                log::warn!("edit refused: {}", e);
                return false;
            }
        }

        let patches = diff_snapshot(&snapshot, &self.present);
        if patches.is_empty() {
            return false;
        }

        if self.batching {
            merge_patches(&mut self.batch, patches);
        } else {
            self.commit(HistoryEntry::new(patches));
        }
        true
    }

    /// Revert the newest entry. Ignored while a batch is open.
    pub fn undo(&mut self) -> bool {
        if self.batching {
            log::debug!("undo ignored while a batch is open");
            return false;
        }
        let Some(entry) = self.past.pop_back() else {
            return false;
        };
        entry.revert(&mut self.present);
        self.future.push_front(entry);
        true
    }

    /// Re-apply the most recently undone entry. Ignored while a batch is open.
    pub fn redo(&mut self) -> bool {
        if self.batching {
            log::debug!("redo ignored while a batch is open");
            return false;
        }
        let Some(entry) = self.future.pop_front() else {
            return false;
        };
        entry.apply(&mut self.present);
        self.past.push_back(entry);
        self.trim_past();
        true
    }

    /// Switch to another document. History never carries across documents.
    pub fn reset(&mut self, map: TileMap) {
        self.present = map;
        self.past.clear();
        self.future.clear();
        self.batching = false;
        self.batch.clear();
    }

    /// Open a batch. Nested calls keep the existing batch.
    pub fn start_batch(&mut self) {
        if self.batching {
            return;
        }
        self.batching = true;
        self.batch.clear();
    }

    /// Close the batch and commit it as one entry. Returns `false` when the
    /// batch changed nothing overall, in which case history is untouched.
    pub fn end_batch(&mut self) -> bool {
        if !self.batching {
            return false;
        }
        self.batching = false;

        let mut patches = std::mem::take(&mut self.batch);
        patches.retain(|p| !p.is_noop());
        if patches.is_empty() {
            log::debug!("discarding empty batch");
            return false;
        }

        log::debug!("committing batch of {} chunk patches", patches.len());
        self.commit(HistoryEntry::new(patches));
        true
    }

    fn commit(&mut self, entry: HistoryEntry) {
        self.past.push_back(entry);
        self.future.clear();
        self.trim_past();
    }

    fn trim_past(&mut self) {
        while self.past.len() > self.config.max_entries {
            self.past.pop_front();
            log::debug!("history full, dropped oldest entry");
        }
    }

    pub fn present(&self) -> &TileMap {
        &self.present
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn is_batching(&self) -> bool {
        self.batching
    }

    /// Patches accumulated in the open batch
    pub fn batch_patches(&self) -> &[ChunkPatch] {
        &self.batch
    }

    /// Entries that can be undone, oldest first
    pub fn past(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.past.iter()
    }

    /// Timestamp of the entry `undo` would revert
    pub fn last_timestamp(&self) -> Option<u64> {
        self.past.back().map(|e| e.timestamp)
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }
}
