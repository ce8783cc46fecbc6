//! Editor context — the explicit application state object.
//!
//! Everything a shell needs to drive the core lives here: the open documents,
//! shared color/palette/zoom/grid state, the active selection and the tool
//! controller. Nothing in the crate reaches for ambient globals; deeper code
//! receives what it needs as arguments.

use uuid::Uuid;

use crate::canvas::{AntsPhase, Background, Color, Coord, SelectionSet, Sprite};
use crate::components::history::HistoryEntry;
use crate::components::tools::{
    GestureEnv, GestureOutcome, Modifiers, PointerButton, Tool, ToolController,
};
use crate::ops::{canvas_ops, transform};
use crate::project::Document;
use crate::{log_info, log_warn};

/// Zoom bounds and the zoom tool's click step.
pub const MIN_ZOOM: u32 = 1;
pub const MAX_ZOOM: u32 = 32;
pub const ZOOM_STEP: u32 = 2;
pub const DEFAULT_ZOOM: u32 = 10;

/// The starter swatch set offered for every new project.
pub const DEFAULT_PALETTE: [Color; 24] = [
    Color::rgb(0x00, 0x00, 0x00),
    Color::rgb(0xFF, 0xFF, 0xFF),
    Color::rgb(0xFF, 0x00, 0x00),
    Color::rgb(0x00, 0xFF, 0x00),
    Color::rgb(0x00, 0x00, 0xFF),
    Color::rgb(0xFF, 0xFF, 0x00),
    Color::rgb(0xFF, 0x00, 0xFF),
    Color::rgb(0x00, 0xFF, 0xFF),
    Color::rgb(0x80, 0x00, 0x00),
    Color::rgb(0x00, 0x80, 0x00),
    Color::rgb(0x00, 0x00, 0x80),
    Color::rgb(0x80, 0x80, 0x00),
    Color::rgb(0x80, 0x00, 0x80),
    Color::rgb(0x00, 0x80, 0x80),
    Color::rgb(0x80, 0x80, 0x80),
    Color::rgb(0xC0, 0xC0, 0xC0),
    Color::rgb(0xFF, 0xA5, 0x00),
    Color::rgb(0xA5, 0x2A, 0x2A),
    Color::rgb(0xDE, 0xB8, 0x87),
    Color::rgb(0x5F, 0x9E, 0xA0),
    Color::rgb(0x7F, 0xFF, 0x00),
    Color::rgb(0xD2, 0x69, 0x1E),
    Color::rgb(0xFF, 0x7F, 0x50),
    Color::rgb(0x64, 0x95, 0xED),
];

/// Grid overlay preferences (purely presentational).
#[derive(Clone, Copy, Debug)]
pub struct GridPrefs {
    pub show: bool,
    pub color: Color,
    pub size: u32,
    pub opacity: f32,
}

impl Default for GridPrefs {
    fn default() -> Self {
        Self {
            show: true,
            color: Color::rgb(0, 0, 0),
            size: 16,
            opacity: 1.0,
        }
    }
}

/// All editor state, owned in one place and passed down explicitly.
pub struct EditorContext {
    pub documents: Vec<Document>,
    active: Option<usize>,
    pub controller: ToolController,
    pub primary_color: Color,
    pub secondary_color: Color,
    pub palette: Vec<Color>,
    pub zoom: u32,
    pub grid: GridPrefs,
    pub selection: SelectionSet,
    pub ants: AntsPhase,
}

impl Default for EditorContext {
    fn default() -> Self {
        Self {
            documents: Vec::new(),
            active: None,
            controller: ToolController::new(),
            primary_color: Color::rgb(0, 0, 0),
            secondary_color: Color::rgb(0xFF, 0xFF, 0xFF),
            palette: DEFAULT_PALETTE.to_vec(),
            zoom: DEFAULT_ZOOM,
            grid: GridPrefs::default(),
            selection: SelectionSet::new(),
            ants: AntsPhase::default(),
        }
    }
}

impl EditorContext {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // documents
    // ------------------------------------------------------------------

    pub fn active_document(&self) -> Option<&Document> {
        self.active.and_then(|i| self.documents.get(i))
    }

    pub fn active_document_mut(&mut self) -> Option<&mut Document> {
        self.active.and_then(|i| self.documents.get_mut(i))
    }

    /// Create a blank document and focus it.
    pub fn new_sprite(
        &mut self,
        name: impl Into<String>,
        width: u32,
        height: u32,
        background: Background,
    ) -> &mut Document {
        let doc = Document::new_untitled(name, width, height, background);
        log_info!(
            "new sprite '{}' {}x{}",
            doc.sprite.name,
            doc.sprite.width,
            doc.sprite.height
        );
        self.push_document(doc)
    }

    /// Adopt an already-built document (loaded from disk, pasted) and focus
    /// it.
    pub fn push_document(&mut self, doc: Document) -> &mut Document {
        self.documents.push(doc);
        let idx = self.documents.len() - 1;
        self.active = Some(idx);
        self.selection.clear();
        &mut self.documents[idx]
    }

    /// Switch focus between open documents. The selection belongs to the
    /// focused document, so it drops on switch.
    pub fn focus_document(&mut self, index: usize) {
        if index < self.documents.len() && self.active != Some(index) {
            self.active = Some(index);
            self.selection.clear();
        }
    }

    pub fn close_document(&mut self, index: usize) {
        if index >= self.documents.len() {
            return;
        }
        self.documents.remove(index);
        self.selection.clear();
        self.active = if self.documents.is_empty() {
            None
        } else {
            match self.active {
                Some(a) if a > index => Some(a - 1),
                Some(a) if a == index => Some(a.min(self.documents.len() - 1)),
                other => other,
            }
        };
    }

    // ------------------------------------------------------------------
    // gestures
    // ------------------------------------------------------------------

    /// Route a pointer-down into the tool controller, applying any outcome
    /// that belongs to the shell state (zoom, picked color).
    pub fn pointer_down(&mut self, pos: Coord, button: PointerButton, mods: Modifiers) {
        let Some(idx) = self.active else { return };
        let doc = &mut self.documents[idx];
        let before = doc.history.len();
        let mut env = GestureEnv {
            sprite: &mut doc.sprite,
            selection: &mut self.selection,
            history: &mut doc.history,
            primary_color: self.primary_color,
            secondary_color: self.secondary_color,
        };
        match self.controller.pointer_down(&mut env, pos, button, mods) {
            GestureOutcome::ColorPicked(color) => self.primary_color = color,
            GestureOutcome::ZoomIn => self.zoom = (self.zoom + ZOOM_STEP).min(MAX_ZOOM),
            GestureOutcome::ZoomOut => {
                self.zoom = self.zoom.saturating_sub(ZOOM_STEP).max(MIN_ZOOM)
            }
            GestureOutcome::Handled | GestureOutcome::Ignored => {}
        }
        if self.documents[idx].history.len() != before {
            self.documents[idx].mark_dirty();
        }
    }

    pub fn pointer_move(&mut self, pos: Option<Coord>) {
        let Some(idx) = self.active else { return };
        let doc = &mut self.documents[idx];
        let mut env = GestureEnv {
            sprite: &mut doc.sprite,
            selection: &mut self.selection,
            history: &mut doc.history,
            primary_color: self.primary_color,
            secondary_color: self.secondary_color,
        };
        self.controller.pointer_move(&mut env, pos);
    }

    pub fn pointer_up(&mut self, pos: Option<Coord>, mods: Modifiers) {
        use crate::components::tools::DragPhase;
        let Some(idx) = self.active else { return };
        // A selection move always lands pixel changes; a two-point shape only
        // does so when it commits (in-canvas release, pixel-painting tool).
        let was_moving = matches!(self.controller.phase(), DragPhase::MovingSelection { .. });
        let commits_shape = matches!(self.controller.phase(), DragPhase::Dragging { .. })
            && self.controller.tool.is_two_point()
            && self.controller.tool != Tool::RectangleSelect
            && pos.is_some();
        let doc = &mut self.documents[idx];
        let mut env = GestureEnv {
            sprite: &mut doc.sprite,
            selection: &mut self.selection,
            history: &mut doc.history,
            primary_color: self.primary_color,
            secondary_color: self.secondary_color,
        };
        self.controller.pointer_up(&mut env, pos, mods);
        if was_moving || commits_shape {
            self.documents[idx].mark_dirty();
        }
    }

    pub fn pointer_leave(&mut self) {
        self.controller.pointer_leave();
    }

    /// Advance the marching-ants dash phase; call on the animation timer.
    pub fn tick_ants(&mut self) {
        self.ants.tick();
    }

    // ------------------------------------------------------------------
    // colors / palette / zoom
    // ------------------------------------------------------------------

    pub fn swap_colors(&mut self) {
        std::mem::swap(&mut self.primary_color, &mut self.secondary_color);
    }

    /// Append a swatch unless it is already present.
    pub fn add_palette_color(&mut self, color: Color) {
        if !self.palette.contains(&color) {
            self.palette.push(color);
        }
    }

    pub fn set_zoom(&mut self, zoom: u32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    // ------------------------------------------------------------------
    // undo / redo
    // ------------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        self.active_document_mut().is_some_and(Document::undo)
    }

    pub fn redo(&mut self) -> bool {
        self.active_document_mut().is_some_and(Document::redo)
    }

    // ------------------------------------------------------------------
    // selection commands
    // ------------------------------------------------------------------

    pub fn select_all(&mut self) {
        let Some(idx) = self.active else { return };
        canvas_ops::select_all(&self.documents[idx].sprite, &mut self.selection);
    }

    pub fn invert_selection(&mut self) {
        let Some(idx) = self.active else { return };
        canvas_ops::invert_selection(&self.documents[idx].sprite, &mut self.selection);
    }

    pub fn deselect(&mut self) {
        self.selection.clear();
    }

    /// Paint the whole selection with the primary color, as one undoable
    /// step.
    pub fn fill_selection(&mut self) {
        let color = self.primary_color;
        self.selection_paint(|sprite, selection| {
            canvas_ops::fill_selection(sprite, selection, color)
        });
    }

    /// Paint the selected cells on the selection's bounding-box edge.
    pub fn stroke_selection(&mut self) {
        let color = self.primary_color;
        self.selection_paint(|sprite, selection| {
            canvas_ops::stroke_selection(sprite, selection, color)
        });
    }

    /// Paint a one-pixel halo just outside the selection.
    pub fn outline_selection(&mut self) {
        let color = self.primary_color;
        self.selection_paint(|sprite, selection| {
            canvas_ops::outline_selection(sprite, selection, color)
        });
    }

    fn selection_paint<F>(&mut self, op: F)
    where
        F: FnOnce(&mut Sprite, &SelectionSet) -> bool,
    {
        let Some(idx) = self.active else { return };
        let doc = &mut self.documents[idx];
        let layer_id = doc.sprite.active_layer_id;
        let snapshot = HistoryEntry::snapshot(&doc.sprite, layer_id);
        if op(&mut doc.sprite, &self.selection) {
            if let Some(entry) = snapshot {
                doc.history.push(entry);
            }
            doc.mark_dirty();
        }
    }

    // ------------------------------------------------------------------
    // transforms
    // ------------------------------------------------------------------

    pub fn resize_canvas(&mut self, width: u32, height: u32) {
        self.transform_sprite(|s| transform::resize_canvas(s, width, height));
    }

    pub fn flip_horizontal(&mut self) {
        self.transform_sprite(transform::flip_horizontal);
    }

    pub fn flip_vertical(&mut self) {
        self.transform_sprite(transform::flip_vertical);
    }

    pub fn rotate_cw(&mut self) {
        self.transform_sprite(transform::rotate_cw);
    }

    pub fn rotate_ccw(&mut self) {
        self.transform_sprite(transform::rotate_ccw);
    }

    pub fn trim(&mut self) {
        self.transform_sprite(transform::trim);
    }

    /// Whole-sprite transforms remap every layer at once; per-layer pixel
    /// snapshots cannot represent that, so the history is cleared rather than
    /// left pointing at stale geometry.
    fn transform_sprite<F: FnOnce(&mut Sprite)>(&mut self, op: F) {
        let Some(idx) = self.active else { return };
        let doc = &mut self.documents[idx];
        op(&mut doc.sprite);
        doc.history.clear();
        doc.mark_dirty();
        self.selection.clear();
    }

    // ------------------------------------------------------------------
    // layers
    // ------------------------------------------------------------------

    pub fn add_layer(&mut self) -> Option<Uuid> {
        let doc = self.active_document_mut()?;
        let id = canvas_ops::add_layer(&mut doc.sprite);
        doc.mark_dirty();
        Some(id)
    }

    pub fn remove_layer(&mut self, layer_id: Uuid) -> bool {
        let Some(doc) = self.active_document_mut() else {
            return false;
        };
        let removed = canvas_ops::remove_layer(&mut doc.sprite, layer_id);
        if removed {
            doc.mark_dirty();
        } else {
            log_warn!("refused to remove layer {}", layer_id);
        }
        removed
    }

    pub fn duplicate_layer(&mut self, layer_id: Uuid) -> Option<Uuid> {
        let doc = self.active_document_mut()?;
        let id = canvas_ops::duplicate_layer(&mut doc.sprite, layer_id)?;
        doc.mark_dirty();
        Some(id)
    }

    pub fn reorder_layers(&mut self, order: &[Uuid]) {
        if let Some(doc) = self.active_document_mut() {
            canvas_ops::reorder_layers(&mut doc.sprite, order);
            doc.mark_dirty();
        }
    }

    pub fn update_layer(&mut self, layer_id: Uuid, update: canvas_ops::LayerUpdate) {
        if let Some(doc) = self.active_document_mut() {
            canvas_ops::update_layer(&mut doc.sprite, layer_id, update);
            doc.mark_dirty();
        }
    }

    pub fn set_active_layer(&mut self, layer_id: Uuid) {
        if let Some(doc) = self.active_document_mut() {
            canvas_ops::set_active_layer(&mut doc.sprite, layer_id);
        }
    }
}
