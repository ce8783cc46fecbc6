//! Linear undo/redo over per-layer pixel snapshots.
//!
//! A snapshot of the layer's whole grid is pushed at gesture start. Undo swaps
//! the live grid with the stored snapshot, so the entry then holds the
//! post-gesture state and redo is the same swap in reverse. Pushing while
//! undone discards the redo tail, and the log evicts its oldest entry past
//! capacity.

use std::mem;
use std::time::SystemTime;

use uuid::Uuid;

use crate::canvas::{PixelGrid, Sprite};
use crate::log_warn;

/// Oldest entries are evicted once the log grows past this.
pub const HISTORY_CAPACITY: usize = 50;

/// One restorable state: a full copy of a single layer's pixels, taken before
/// a gesture mutated it.
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    pub sprite_id: Uuid,
    pub layer_id: Uuid,
    pub pixels: PixelGrid,
    pub timestamp: SystemTime,
}

impl HistoryEntry {
    /// Deep-copy the given layer's current pixels. `None` if the layer does
    /// not exist on the sprite.
    pub fn snapshot(sprite: &Sprite, layer_id: Uuid) -> Option<Self> {
        let layer = sprite.layer(layer_id)?;
        Some(Self {
            sprite_id: sprite.id,
            layer_id,
            pixels: layer.pixels.clone(),
            timestamp: SystemTime::now(),
        })
    }
}

/// The undo/redo log for one document.
///
/// `cursor` counts applied entries: everything before it is undoable,
/// everything at or after it is redoable.
#[derive(Clone, Debug, Default)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    /// Record a pre-gesture snapshot. Any redo entries beyond the cursor are
    /// discarded first.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.cursor);
        self.entries.push(entry);
        if self.entries.len() > HISTORY_CAPACITY {
            self.entries.remove(0);
        }
        self.cursor = self.entries.len();
    }

    /// Step back one entry, restoring the snapshot onto the sprite. Returns
    /// `false` when there is nothing to undo or the entry's layer no longer
    /// exists.
    pub fn undo(&mut self, sprite: &mut Sprite) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let entry = &mut self.entries[self.cursor - 1];
        let Some(layer) = sprite.layer_mut(entry.layer_id) else {
            log_warn!("undo target layer {} no longer exists", entry.layer_id);
            return false;
        };
        // The entry now holds the post-gesture grid, ready for redo.
        mem::swap(&mut layer.pixels, &mut entry.pixels);
        self.cursor -= 1;
        true
    }

    /// Step forward one entry, restoring the state that the matching undo
    /// swapped out.
    pub fn redo(&mut self, sprite: &mut Sprite) -> bool {
        if self.cursor == self.entries.len() {
            return false;
        }
        let entry = &mut self.entries[self.cursor];
        let Some(layer) = sprite.layer_mut(entry.layer_id) else {
            log_warn!("redo target layer {} no longer exists", entry.layer_id);
            return false;
        };
        mem::swap(&mut layer.pixels, &mut entry.pixels);
        self.cursor += 1;
        true
    }
}
