//! A document: one open sprite, its undo history, and where it lives on disk.

use std::path::PathBuf;

use uuid::Uuid;

use crate::canvas::{Background, Sprite};
use crate::components::history::HistoryLog;

/// One open project. The editor context owns a list of these, one per tab.
#[derive(Clone, Debug)]
pub struct Document {
    pub id: Uuid,
    pub sprite: Sprite,
    pub history: HistoryLog,
    /// `None` until the first save or when created from scratch.
    pub path: Option<PathBuf>,
    pub is_dirty: bool,
}

impl Document {
    /// Fresh unsaved document around an existing sprite (open, paste-as-new).
    pub fn new(sprite: Sprite) -> Self {
        Self {
            id: Uuid::new_v4(),
            sprite,
            history: HistoryLog::new(),
            path: None,
            is_dirty: false,
        }
    }

    /// Fresh blank document with a single empty layer.
    pub fn new_untitled(
        name: impl Into<String>,
        width: u32,
        height: u32,
        background: Background,
    ) -> Self {
        Self::new(Sprite::new(name, width, height, background))
    }

    /// Document loaded from disk: remembers its path, starts clean.
    pub fn from_file(sprite: Sprite, path: PathBuf) -> Self {
        Self {
            id: Uuid::new_v4(),
            sprite,
            history: HistoryLog::new(),
            path: Some(path),
            is_dirty: false,
        }
    }

    /// Tab caption: the sprite name, starred while unsaved changes exist.
    pub fn display_title(&self) -> String {
        if self.is_dirty {
            format!("{}*", self.sprite.name)
        } else {
            self.sprite.name.clone()
        }
    }

    pub fn mark_dirty(&mut self) {
        self.is_dirty = true;
    }

    /// Called after a successful save.
    pub fn mark_saved(&mut self, path: PathBuf) {
        self.path = Some(path);
        self.is_dirty = false;
    }

    /// Step the history back one entry. Undoing a saved state dirties the
    /// document again.
    pub fn undo(&mut self) -> bool {
        let done = self.history.undo(&mut self.sprite);
        if done {
            self.is_dirty = true;
        }
        done
    }

    pub fn redo(&mut self) -> bool {
        let done = self.history.redo(&mut self.sprite);
        if done {
            self.is_dirty = true;
        }
        done
    }
}
