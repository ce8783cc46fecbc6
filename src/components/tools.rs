//! Tool state machine — turns pointer gestures into grid and selection
//! mutations.
//!
//! One gesture is pointer-down → move* → up. Continuous tools mutate the grid
//! on every event; two-point shape tools only draw a preview until the up
//! commits them; single-shot tools finish entirely inside pointer-down. A
//! drag that starts inside an existing selection with a selection tool moves
//! the selection instead.

use crate::canvas::{Color, Coord, SelectionSet, Sprite};
use crate::components::history::{HistoryEntry, HistoryLog};
use crate::ops::flood::{self, CombineMode};
use crate::ops::raster::{self, BrushShape};

// ============================================================================
// TOOL IDENTITY
// ============================================================================

/// The closed set of tools. Dispatch is an exhaustive match, so adding a
/// variant forces every gesture handler to account for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
    Brush,
    Pencil,
    Eraser,
    MagicEraser,
    ColorReplace,
    Bucket,
    Picker,
    Line,
    Rectangle,
    Ellipse,
    RectangleSelect,
    QuickSelect,
    MagicWand,
    Move,
    Zoom,
    Ai,
}

impl Tool {
    /// Tools that paint on every pointer event during a drag.
    pub fn is_continuous(self) -> bool {
        matches!(self, Tool::Brush | Tool::Pencil | Tool::Eraser)
    }

    /// Tools committed from two anchor points at pointer-up.
    pub fn is_two_point(self) -> bool {
        matches!(
            self,
            Tool::Line | Tool::Rectangle | Tool::Ellipse | Tool::RectangleSelect
        )
    }

    /// A drag started inside an existing selection moves it instead.
    pub fn can_move_selection(self) -> bool {
        matches!(self, Tool::RectangleSelect | Tool::QuickSelect)
    }

    /// Only the pixel-painting shape tools keep their drag alive when the
    /// pointer leaves the canvas; everything else, rectangle-select included,
    /// aborts.
    pub fn survives_leave(self) -> bool {
        matches!(self, Tool::Line | Tool::Rectangle | Tool::Ellipse)
    }
}

/// Which mouse button initiated a gesture. Chooses between the primary and
/// secondary paint colors, captured once at pointer-down for the whole
/// gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Modifier keys accompanying a pointer event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub fn combine_mode(self) -> CombineMode {
        CombineMode::from_modifiers(self.shift, self.ctrl)
    }
}

// ============================================================================
// TRANSIENT GESTURE STATE
// ============================================================================

/// Where the controller is within a gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging {
        anchor: Coord,
        last: Coord,
        button: PointerButton,
    },
    MovingSelection {
        anchor: Coord,
        offset: (i32, i32),
    },
}

/// Brush size bounds shared by brush, pencil, eraser and quick-select.
pub const MIN_BRUSH_SIZE: u32 = 1;
pub const MAX_BRUSH_SIZE: u32 = 50;

/// User-tunable tool parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToolOptions {
    pub brush_size: u32,
    pub shape_fill: bool,
    pub shape_outline: bool,
}

impl Default for ToolOptions {
    fn default() -> Self {
        Self {
            brush_size: 1,
            shape_fill: false,
            shape_outline: true,
        }
    }
}

impl ToolOptions {
    pub fn set_brush_size(&mut self, size: u32) {
        self.brush_size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
    }
}

/// What a renderer should overlay while a gesture is in flight. The real grid
/// is untouched until commit; the renderer clips preview coordinates to the
/// canvas.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Preview {
    #[default]
    None,
    /// Pending shape pixels in the gesture's paint color.
    Shape { coords: Vec<Coord>, color: Color },
    /// Rubber-band rectangle for rectangle-select.
    SelectionRect { anchor: Coord, current: Coord },
    /// Selection outline translated by the in-flight move offset.
    MovedSelection { dx: i32, dy: i32 },
}

/// Result of feeding a pointer event to the controller, for the shell to act
/// on (zoom changes and picked colors live outside the sprite).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Event consumed; nothing for the shell to do.
    Handled,
    /// Event was not for the editing core (pan, AI dialog, no-op).
    Ignored,
    ColorPicked(Color),
    ZoomIn,
    ZoomOut,
}

/// Everything a gesture may touch, borrowed for the duration of one event.
pub struct GestureEnv<'a> {
    pub sprite: &'a mut Sprite,
    pub selection: &'a mut SelectionSet,
    pub history: &'a mut HistoryLog,
    pub primary_color: Color,
    pub secondary_color: Color,
}

impl GestureEnv<'_> {
    fn color_for(&self, button: PointerButton) -> Color {
        match button {
            PointerButton::Primary => self.primary_color,
            PointerButton::Secondary => self.secondary_color,
        }
    }
}

#[derive(Clone, Copy)]
enum StampAction {
    Paint(Color),
    Erase,
}

// ============================================================================
// TOOL CONTROLLER
// ============================================================================

/// The gesture state machine. Owns only transient interaction state; the
/// sprite, selection and history are borrowed per event through
/// [`GestureEnv`].
#[derive(Clone, Debug)]
pub struct ToolController {
    pub tool: Tool,
    pub options: ToolOptions,
    phase: DragPhase,
    /// Quick-select combine mode, captured from modifiers at pointer-down.
    quick_mode: CombineMode,
    pub preview: Preview,
}

impl Default for ToolController {
    fn default() -> Self {
        Self {
            tool: Tool::Brush,
            options: ToolOptions::default(),
            phase: DragPhase::Idle,
            quick_mode: CombineMode::Replace,
            preview: Preview::None,
        }
    }
}

impl ToolController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Switching tools mid-gesture abandons the gesture.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.phase = DragPhase::Idle;
        self.preview = Preview::None;
    }

    // ------------------------------------------------------------------
    // pointer-down
    // ------------------------------------------------------------------

    pub fn pointer_down(
        &mut self,
        env: &mut GestureEnv<'_>,
        pos: Coord,
        button: PointerButton,
        mods: Modifiers,
    ) -> GestureOutcome {
        match self.tool {
            // Panning is a viewport concern, not an editing one.
            Tool::Move => return GestureOutcome::Ignored,
            Tool::Zoom => {
                return match button {
                    PointerButton::Primary => GestureOutcome::ZoomIn,
                    PointerButton::Secondary => GestureOutcome::ZoomOut,
                };
            }
            // Generation runs through an explicit command, not a gesture.
            Tool::Ai => return GestureOutcome::Ignored,
            _ => {}
        }

        // Secondary click cancels an existing selection instead of painting.
        // This runs before the bounds and lock gates: a right-click deselects
        // even off-canvas or on a locked layer.
        if button == PointerButton::Secondary && !env.selection.is_empty() {
            env.selection.clear();
            return GestureOutcome::Handled;
        }

        if !env.sprite.in_bounds(pos) {
            return GestureOutcome::Ignored;
        }
        // A locked active layer blocks every canvas tool, selection tools
        // included.
        if env.sprite.active_layer().is_none_or(|l| l.locked) {
            return GestureOutcome::Ignored;
        }

        // A selection tool pressed inside the selection starts a move.
        if self.tool.can_move_selection()
            && !env.selection.is_empty()
            && env.selection.contains(pos)
        {
            self.phase = DragPhase::MovingSelection {
                anchor: pos,
                offset: (0, 0),
            };
            return GestureOutcome::Handled;
        }

        let color = env.color_for(button);

        match self.tool {
            Tool::Brush => {
                self.push_active_snapshot(env);
                self.stamp(env, pos, BrushShape::Circle, StampAction::Paint(color));
                self.phase = DragPhase::Dragging { anchor: pos, last: pos, button };
            }
            Tool::Pencil => {
                // Single bare pixel on the down event; the square mask only
                // applies while dragging.
                self.push_active_snapshot(env);
                if env.selection.is_empty() || env.selection.contains(pos) {
                    let layer_id = env.sprite.active_layer_id;
                    env.sprite.set_pixel(layer_id, pos, color);
                }
                self.phase = DragPhase::Dragging { anchor: pos, last: pos, button };
            }
            Tool::Eraser => {
                self.push_active_snapshot(env);
                self.stamp(env, pos, BrushShape::Square, StampAction::Erase);
                self.phase = DragPhase::Dragging { anchor: pos, last: pos, button };
            }
            Tool::Bucket => {
                self.single_shot(env, |env| {
                    flood::bucket_fill(env.sprite, pos, color, env.selection)
                });
            }
            Tool::MagicEraser => {
                self.single_shot(env, |env| {
                    flood::magic_erase(env.sprite, pos, env.selection)
                });
            }
            Tool::ColorReplace => {
                self.single_shot(env, |env| {
                    flood::color_replace(env.sprite, pos, color, env.selection)
                });
            }
            Tool::Picker => {
                if let Some(layer) = env.sprite.active_layer()
                    && let Some(picked) = layer.pixels.get(pos)
                {
                    return GestureOutcome::ColorPicked(picked);
                }
            }
            Tool::MagicWand => {
                if let Some(region) = flood::magic_wand_region(env.sprite, pos) {
                    mods.combine_mode().apply(env.selection, region);
                }
            }
            Tool::QuickSelect => {
                self.quick_mode = mods.combine_mode();
                if self.quick_mode == CombineMode::Replace {
                    env.selection.clear();
                }
                self.phase = DragPhase::Dragging { anchor: pos, last: pos, button };
            }
            Tool::RectangleSelect | Tool::Line | Tool::Rectangle | Tool::Ellipse => {
                // No mutation yet; the up event commits from anchor to cursor.
                self.phase = DragPhase::Dragging { anchor: pos, last: pos, button };
                self.refresh_preview(env, pos);
            }
            Tool::Move | Tool::Zoom | Tool::Ai => unreachable!("handled above"),
        }
        GestureOutcome::Handled
    }

    // ------------------------------------------------------------------
    // pointer-move
    // ------------------------------------------------------------------

    pub fn pointer_move(&mut self, env: &mut GestureEnv<'_>, pos: Option<Coord>) {
        match self.phase {
            DragPhase::MovingSelection { anchor, .. } => {
                if let Some(pos) = pos {
                    let offset = (pos.x - anchor.x, pos.y - anchor.y);
                    self.phase = DragPhase::MovingSelection { anchor, offset };
                    self.preview = Preview::MovedSelection { dx: offset.0, dy: offset.1 };
                }
            }
            DragPhase::Dragging { anchor, last, button } => {
                let Some(pos) = pos else { return };
                let color = env.color_for(button);
                match self.tool {
                    Tool::Brush => {
                        self.stamp_line(env, last, pos, BrushShape::Circle, StampAction::Paint(color));
                        self.phase = DragPhase::Dragging { anchor, last: pos, button };
                    }
                    Tool::Pencil => {
                        // Dragging swaps the bare pixel for the square mask.
                        self.stamp_line(env, last, pos, BrushShape::Square, StampAction::Paint(color));
                        self.phase = DragPhase::Dragging { anchor, last: pos, button };
                    }
                    Tool::Eraser => {
                        self.stamp_line(env, last, pos, BrushShape::Square, StampAction::Erase);
                        self.phase = DragPhase::Dragging { anchor, last: pos, button };
                    }
                    Tool::QuickSelect => {
                        self.quick_select_footprint(env, pos);
                        self.phase = DragPhase::Dragging { anchor, last: pos, button };
                    }
                    Tool::Line | Tool::Rectangle | Tool::Ellipse | Tool::RectangleSelect => {
                        self.phase = DragPhase::Dragging { anchor, last: pos, button };
                        self.refresh_preview(env, pos);
                    }
                    _ => {}
                }
            }
            DragPhase::Idle => {}
        }
    }

    // ------------------------------------------------------------------
    // pointer-up
    // ------------------------------------------------------------------

    pub fn pointer_up(
        &mut self,
        env: &mut GestureEnv<'_>,
        pos: Option<Coord>,
        mods: Modifiers,
    ) {
        match self.phase {
            DragPhase::MovingSelection { anchor, offset } => {
                let (dx, dy) = match pos {
                    Some(pos) => (pos.x - anchor.x, pos.y - anchor.y),
                    None => offset,
                };
                self.commit_selection_move(env, dx, dy);
                self.phase = DragPhase::Idle;
                self.preview = Preview::None;
            }
            DragPhase::Dragging { anchor, button, .. } => {
                let Some(pos) = pos else {
                    // Released off-canvas: the gesture aborts and the
                    // selection is dropped with it.
                    self.phase = DragPhase::Idle;
                    self.preview = Preview::None;
                    env.selection.clear();
                    return;
                };
                match self.tool {
                    Tool::RectangleSelect => {
                        let region = raster::rectangle_points(anchor, pos, true, false);
                        // Combine mode is read at release for this tool.
                        mods.combine_mode().apply(env.selection, region);
                    }
                    Tool::Line => {
                        self.push_active_snapshot(env);
                        let color = env.color_for(button);
                        self.stamp_line(
                            env,
                            anchor,
                            pos,
                            BrushShape::Circle,
                            StampAction::Paint(color),
                        );
                    }
                    Tool::Rectangle => {
                        self.push_active_snapshot(env);
                        let color = env.color_for(button);
                        self.commit_shape(
                            env,
                            raster::rectangle_points(
                                anchor,
                                pos,
                                self.options.shape_fill,
                                self.options.shape_outline,
                            ),
                            color,
                        );
                    }
                    Tool::Ellipse => {
                        self.push_active_snapshot(env);
                        let color = env.color_for(button);
                        self.commit_shape(
                            env,
                            raster::ellipse_points(
                                anchor,
                                pos,
                                self.options.shape_fill,
                                self.options.shape_outline,
                            ),
                            color,
                        );
                    }
                    _ => {}
                }
                self.phase = DragPhase::Idle;
                self.preview = Preview::None;
            }
            DragPhase::Idle => {}
        }
    }

    // ------------------------------------------------------------------
    // pointer-leave
    // ------------------------------------------------------------------

    /// Leaving the canvas aborts in-flight drags without committing, except
    /// for the shape tools, whose preview stays live until release. A
    /// selection move also survives.
    pub fn pointer_leave(&mut self) {
        if let DragPhase::Dragging { .. } = self.phase
            && !self.tool.survives_leave()
        {
            self.phase = DragPhase::Idle;
            self.preview = Preview::None;
        }
    }

    // ------------------------------------------------------------------
    // internals
    // ------------------------------------------------------------------

    /// Snapshot the active layer into history before a mutating gesture.
    fn push_active_snapshot(&mut self, env: &mut GestureEnv<'_>) {
        let layer_id = env.sprite.active_layer_id;
        if let Some(entry) = HistoryEntry::snapshot(env.sprite, layer_id) {
            env.history.push(entry);
        }
    }

    /// Run a single-shot region operation, pushing the pre-state to history
    /// only when the operation actually changed the layer.
    fn single_shot<F>(&mut self, env: &mut GestureEnv<'_>, op: F)
    where
        F: FnOnce(&mut GestureEnv<'_>) -> bool,
    {
        let layer_id = env.sprite.active_layer_id;
        let snapshot = HistoryEntry::snapshot(env.sprite, layer_id);
        if op(env)
            && let Some(entry) = snapshot
        {
            env.history.push(entry);
        }
    }

    /// Stamp the brush footprint at `center`. The selection constraint is
    /// tested at the stamp center only; a stamp whose center is selected may
    /// spill past the selection border. That asymmetry is the established
    /// brush behavior.
    fn stamp(
        &self,
        env: &mut GestureEnv<'_>,
        center: Coord,
        shape: BrushShape,
        action: StampAction,
    ) {
        if !env.selection.is_empty() && !env.selection.contains(center) {
            return;
        }
        let layer_id = env.sprite.active_layer_id;
        for c in raster::brush_mask(center, self.options.brush_size, shape) {
            match action {
                StampAction::Paint(color) => env.sprite.set_pixel(layer_id, c, color),
                StampAction::Erase => env.sprite.clear_pixel(layer_id, c),
            }
        }
    }

    /// Brush-stamped line from `from` to `to` — the gap-free fast-drag path.
    fn stamp_line(
        &self,
        env: &mut GestureEnv<'_>,
        from: Coord,
        to: Coord,
        shape: BrushShape,
        action: StampAction,
    ) {
        for p in raster::line_points(from, to) {
            self.stamp(env, p, shape, action);
        }
    }

    /// Apply the circular brush footprint at `pos` to the selection, clipped
    /// to the canvas, honoring the combine mode captured at pointer-down.
    fn quick_select_footprint(&self, env: &mut GestureEnv<'_>, pos: Coord) {
        let coords: Vec<Coord> =
            raster::brush_mask(pos, self.options.brush_size, BrushShape::Circle)
                .into_iter()
                .filter(|c| env.sprite.in_bounds(*c))
                .collect();
        match self.quick_mode {
            CombineMode::Subtract => env.selection.subtract(coords),
            _ => env.selection.add(coords),
        }
    }

    /// Commit a rasterized shape to the active layer. Shape commits ignore
    /// the selection mask.
    fn commit_shape(&self, env: &mut GestureEnv<'_>, coords: Vec<Coord>, color: Color) {
        let layer_id = env.sprite.active_layer_id;
        for c in coords {
            env.sprite.set_pixel(layer_id, c, color);
        }
    }

    /// Materialize a selection move: read every member's color, delete all
    /// sources, then write translations — two passes so an overlapping
    /// translated write is never clobbered by a later source deletion. The
    /// selection follows the pixels; members pushed off-canvas are dropped.
    fn commit_selection_move(&self, env: &mut GestureEnv<'_>, dx: i32, dy: i32) {
        let Some(layer) = env.sprite.active_layer() else {
            return;
        };
        if layer.locked {
            return;
        }
        let layer_id = env.sprite.active_layer_id;

        let moves: Vec<(Coord, Coord, Option<Color>)> = env
            .selection
            .iter()
            .map(|from| {
                let to = from.translated(dx, dy);
                (from, to, env.sprite.layer(layer_id).and_then(|l| l.pixels.get(from)))
            })
            .collect();

        for (from, _, _) in &moves {
            env.sprite.clear_pixel(layer_id, *from);
        }
        // Off-canvas targets are silently dropped; their pixels are gone.
        for (_, to, color) in &moves {
            if let Some(color) = color
                && env.sprite.in_bounds(*to)
            {
                env.sprite.set_pixel(layer_id, *to, *color);
            }
        }

        let translated =
            env.selection
                .translated(dx, dy, env.sprite.width, env.sprite.height);
        env.selection.replace(translated);
    }

    /// Rebuild the shape/selection preview for the current anchor→cursor
    /// pair.
    fn refresh_preview(&mut self, env: &GestureEnv<'_>, pos: Coord) {
        let DragPhase::Dragging { anchor, button, .. } = self.phase else {
            return;
        };
        self.preview = match self.tool {
            Tool::Line => Preview::Shape {
                coords: raster::line_points(anchor, pos)
                    .into_iter()
                    .flat_map(|p| {
                        raster::brush_mask(p, self.options.brush_size, BrushShape::Circle)
                    })
                    .collect(),
                color: env.color_for(button),
            },
            Tool::Rectangle => Preview::Shape {
                coords: raster::rectangle_points(
                    anchor,
                    pos,
                    self.options.shape_fill,
                    self.options.shape_outline,
                ),
                color: env.color_for(button),
            },
            Tool::Ellipse => Preview::Shape {
                coords: raster::ellipse_points(
                    anchor,
                    pos,
                    self.options.shape_fill,
                    self.options.shape_outline,
                ),
                color: env.color_for(button),
            },
            Tool::RectangleSelect => Preview::SelectionRect { anchor, current: pos },
            _ => Preview::None,
        };
    }
}
