//! Whole-value undo/redo
//!
//! Suitable for small documents (tileset catalogs, project settings) where a
//! full clone per step is cheap.

use std::collections::VecDeque;

use crate::config::HistoryConfig;

/// Actions accepted by [`SnapshotHistory::dispatch`]
#[derive(Debug, Clone)]
pub enum SnapshotAction<T> {
    Set(T),
    Undo,
    Redo,
    Reset(T),
    StartBatch,
    EndBatch,
}

/// Undo/redo by storing full copies of previous values
#[derive(Debug, Clone)]
pub struct SnapshotHistory<T> {
    present: T,
    past: VecDeque<T>,
    future: VecDeque<T>,
    /// Value when the open batch started
    batch_start: Option<T>,
    config: HistoryConfig,
}

impl<T: Default + Clone + PartialEq> Default for SnapshotHistory<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq> SnapshotHistory<T> {
    pub fn new(present: T) -> Self {
        Self::with_config(present, HistoryConfig::default())
    }

    pub fn with_config(present: T, config: HistoryConfig) -> Self {
        Self {
            present,
            past: VecDeque::new(),
            future: VecDeque::new(),
            batch_start: None,
            config,
        }
    }

    pub fn dispatch(&mut self, action: SnapshotAction<T>) {
        match action {
            SnapshotAction::Set(value) => {
                self.set(value);
            }
            SnapshotAction::Undo => {
                self.undo();
            }
            SnapshotAction::Redo => {
                self.redo();
            }
            SnapshotAction::Reset(value) => self.reset(value),
            SnapshotAction::StartBatch => self.start_batch(),
            SnapshotAction::EndBatch => {
                self.end_batch();
            }
        }
    }

    /// Replace the present value. A value equal to the present is ignored.
    pub fn set(&mut self, value: T) -> bool {
        if value == self.present {
            return false;
        }
        let previous = std::mem::replace(&mut self.present, value);
        if self.batch_start.is_none() {
            self.commit(previous);
        }
        true
    }

    /// Modify a copy of the present value and record it if it changed
    pub fn update<F: FnOnce(&mut T)>(&mut self, f: F) -> bool {
        let mut value = self.present.clone();
        f(&mut value);
        self.set(value)
    }

    /// Step back one value. Ignored while a batch is open.
    pub fn undo(&mut self) -> bool {
        if self.batch_start.is_some() {
            return false;
        }
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        true
    }

    /// Step forward one value. Ignored while a batch is open.
    pub fn redo(&mut self) -> bool {
        if self.batch_start.is_some() {
            return false;
        }
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push_back(current);
        self.trim_past();
        true
    }

    pub fn reset(&mut self, value: T) {
        self.present = value;
        self.past.clear();
        self.future.clear();
        self.batch_start = None;
    }

    pub fn start_batch(&mut self) {
        if self.batch_start.is_none() {
            self.batch_start = Some(self.present.clone());
        }
    }

    /// Close the batch, recording one step if the value changed overall
    pub fn end_batch(&mut self) -> bool {
        let Some(start) = self.batch_start.take() else {
            return false;
        };
        if start == self.present {
            return false;
        }
        self.commit(start);
        true
    }

    fn commit(&mut self, previous: T) {
        self.past.push_back(previous);
        self.future.clear();
        self.trim_past();
    }

    fn trim_past(&mut self) {
        while self.past.len() > self.config.max_entries {
            self.past.pop_front();
        }
    }

    pub fn present(&self) -> &T {
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
        self.batch_start.is_some()
    }
}
