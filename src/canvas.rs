use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Smallest and largest canvas edge a sprite may have, in pixels.
pub const MIN_SPRITE_DIM: u32 = 1;
pub const MAX_SPRITE_DIM: u32 = 1024;

// ============================================================================
// COLOR
// ============================================================================

/// An RGBA color. Alpha 255 = opaque, 0 = fully transparent.
///
/// Fully transparent colors are never stored in a [`PixelGrid`]; absence of a
/// key is the one and only representation of transparency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Alpha as a fraction in [0, 1].
    pub fn alpha_f32(&self) -> f32 {
        self.a as f32 / 255.0
    }
}

/// Failure to parse a color string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(pub String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color: {}", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Accepts `#RRGGBB`, `#RRGGBBAA` and `rgba(r, g, b, a)` with a fractional
    /// alpha, the three spellings that occur in project files and imports.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            let parse_pair = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .map_err(|_| ParseColorError(s.to_string()))
            };
            return match hex.len() {
                6 => Ok(Color::rgb(parse_pair(0)?, parse_pair(2)?, parse_pair(4)?)),
                8 => Ok(Color::rgba(
                    parse_pair(0)?,
                    parse_pair(2)?,
                    parse_pair(4)?,
                    parse_pair(6)?,
                )),
                _ => Err(ParseColorError(s.to_string())),
            };
        }
        if let Some(body) = s.strip_prefix("rgba(").and_then(|r| r.strip_suffix(')')) {
            let parts: Vec<&str> = body.split(',').map(str::trim).collect();
            if parts.len() != 4 {
                return Err(ParseColorError(s.to_string()));
            }
            let chan = |p: &str| p.parse::<u8>().map_err(|_| ParseColorError(s.to_string()));
            let alpha: f32 = parts[3]
                .parse()
                .map_err(|_| ParseColorError(s.to_string()))?;
            if !(0.0..=1.0).contains(&alpha) {
                return Err(ParseColorError(s.to_string()));
            }
            return Ok(Color::rgba(
                chan(parts[0])?,
                chan(parts[1])?,
                chan(parts[2])?,
                (alpha * 255.0).round() as u8,
            ));
        }
        Err(ParseColorError(s.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// COORD
// ============================================================================

/// An integer pixel coordinate. The universal key across grids and selections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// The four edge-sharing neighbours. Diagonals are never neighbours.
    pub fn neighbors4(&self) -> [Coord; 4] {
        [
            Coord::new(self.x + 1, self.y),
            Coord::new(self.x - 1, self.y),
            Coord::new(self.x, self.y + 1),
            Coord::new(self.x, self.y - 1),
        ]
    }

    /// Project-file key form, `"x,y"`.
    pub fn key(&self) -> String {
        format!("{},{}", self.x, self.y)
    }

    /// Parse the `"x,y"` key form back into a coordinate.
    pub fn from_key(key: &str) -> Option<Self> {
        let (x, y) = key.split_once(',')?;
        Some(Coord::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ============================================================================
// PIXEL GRID — sparse coordinate→color storage for one layer
// ============================================================================

/// Sparse pixel storage. A missing key is a fully transparent pixel, and no
/// entry ever holds a fully transparent color.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PixelGrid {
    cells: HashMap<Coord, Color>,
}

impl PixelGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the pixel at `pos`. Writing a fully transparent
    /// color removes the entry instead of storing it.
    pub fn set(&mut self, pos: Coord, color: Color) {
        if color.is_transparent() {
            self.cells.remove(&pos);
        } else {
            self.cells.insert(pos, color);
        }
    }

    /// Remove the pixel at `pos` if present; no-op otherwise.
    pub fn clear(&mut self, pos: Coord) {
        self.cells.remove(&pos);
    }

    /// The color at `pos`, or `None` for transparent.
    pub fn get(&self, pos: Coord) -> Option<Color> {
        self.cells.get(&pos).copied()
    }

    pub fn contains(&self, pos: Coord) -> bool {
        self.cells.contains_key(&pos)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, Color)> + '_ {
        self.cells.iter().map(|(c, col)| (*c, *col))
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells.keys().copied()
    }

    /// Tight bounding box of all painted pixels as `(min, max)`, inclusive.
    pub fn bounds(&self) -> Option<(Coord, Coord)> {
        let mut iter = self.cells.keys();
        let first = iter.next()?;
        let (mut min, mut max) = (*first, *first);
        for c in iter {
            min.x = min.x.min(c.x);
            min.y = min.y.min(c.y);
            max.x = max.x.max(c.x);
            max.y = max.y.max(c.y);
        }
        Some((min, max))
    }
}

impl FromIterator<(Coord, Color)> for PixelGrid {
    fn from_iter<T: IntoIterator<Item = (Coord, Color)>>(iter: T) -> Self {
        let mut grid = PixelGrid::new();
        for (pos, color) in iter {
            grid.set(pos, color);
        }
        grid
    }
}

// ============================================================================
// LAYER
// ============================================================================

/// One named, independently visible/lockable plane of pixels within a sprite.
#[derive(Clone, Debug)]
pub struct Layer {
    pub id: Uuid,
    pub name: String,
    pub visible: bool,
    /// 0–100, applied uniformly when compositing.
    pub opacity: u8,
    /// Locked layers silently reject all pixel mutation.
    pub locked: bool,
    pub pixels: PixelGrid,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            visible: true,
            opacity: 100,
            locked: false,
            pixels: PixelGrid::new(),
        }
    }

    /// Deep copy with a fresh id and a " Copy" name suffix.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: format!("{} Copy", self.name),
            visible: self.visible,
            opacity: self.opacity,
            locked: self.locked,
            pixels: self.pixels.clone(),
        }
    }
}

// ============================================================================
// BACKGROUND
// ============================================================================

/// Canvas backdrop: a checkerboard stand-in (`Transparent`) or a solid fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Background {
    Transparent,
    Solid(Color),
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Background::Transparent => write!(f, "transparent"),
            Background::Solid(c) => write!(f, "{}", c),
        }
    }
}

impl FromStr for Background {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == "transparent" {
            Ok(Background::Transparent)
        } else {
            Ok(Background::Solid(s.parse()?))
        }
    }
}

// ============================================================================
// SPRITE
// ============================================================================

/// One editable image document: ordered layers sharing a single canvas size.
#[derive(Clone, Debug)]
pub struct Sprite {
    pub id: Uuid,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub background: Background,
    /// Bottom-most layer first; composited bottom-to-top.
    pub layers: Vec<Layer>,
    pub active_layer_id: Uuid,
}

impl Sprite {
    /// Create a sprite with a single empty "Layer 1". Dimensions are clamped
    /// to the supported range.
    pub fn new(name: impl Into<String>, width: u32, height: u32, background: Background) -> Self {
        let layer = Layer::new("Layer 1");
        let active_layer_id = layer.id;
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            width: width.clamp(MIN_SPRITE_DIM, MAX_SPRITE_DIM),
            height: height.clamp(MIN_SPRITE_DIM, MAX_SPRITE_DIM),
            background,
            layers: vec![layer],
            active_layer_id,
        }
    }

    pub fn in_bounds(&self, pos: Coord) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    pub fn layer(&self, id: Uuid) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layer_mut(&mut self, id: Uuid) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    pub fn active_layer(&self) -> Option<&Layer> {
        self.layer(self.active_layer_id)
    }

    pub fn active_layer_mut(&mut self) -> Option<&mut Layer> {
        let id = self.active_layer_id;
        self.layer_mut(id)
    }

    /// Paint one pixel on the given layer. Out-of-bounds coordinates and
    /// locked layers are silent no-ops, never errors — brush masks routinely
    /// probe points past the canvas edge.
    pub fn set_pixel(&mut self, layer_id: Uuid, pos: Coord, color: Color) {
        if !self.in_bounds(pos) {
            return;
        }
        if let Some(layer) = self.layer_mut(layer_id)
            && !layer.locked
        {
            layer.pixels.set(pos, color);
        }
    }

    /// Erase one pixel on the given layer, with the same no-op rules as
    /// [`Sprite::set_pixel`].
    pub fn clear_pixel(&mut self, layer_id: Uuid, pos: Coord) {
        if !self.in_bounds(pos) {
            return;
        }
        if let Some(layer) = self.layer_mut(layer_id)
            && !layer.locked
        {
            layer.pixels.clear(pos);
        }
    }
}

// ============================================================================
// SELECTION
// ============================================================================

/// Tight axis-aligned bound of a selection's members.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionBounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// The active set of coordinates that tool operations are constrained to.
/// Empty means "no selection": every tool operates on the whole canvas.
///
/// The cached bounding box is recomputed on every mutation so it is always
/// the tight bound of the member set (`None` iff empty).
#[derive(Clone, Debug, Default)]
pub struct SelectionSet {
    pixels: HashSet<Coord>,
    bounds: Option<SelectionBounds>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, pos: Coord) -> bool {
        self.pixels.contains(&pos)
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn bounds(&self) -> Option<SelectionBounds> {
        self.bounds
    }

    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.pixels.iter().copied()
    }

    /// Drop the current members and select exactly `coords`.
    pub fn replace(&mut self, coords: impl IntoIterator<Item = Coord>) {
        self.pixels = coords.into_iter().collect();
        self.recompute_bounds();
    }

    /// Union `coords` into the selection.
    pub fn add(&mut self, coords: impl IntoIterator<Item = Coord>) {
        self.pixels.extend(coords);
        self.recompute_bounds();
    }

    /// Remove `coords` from the selection.
    pub fn subtract(&mut self, coords: impl IntoIterator<Item = Coord>) {
        for c in coords {
            self.pixels.remove(&c);
        }
        self.recompute_bounds();
    }

    pub fn clear(&mut self) {
        self.pixels.clear();
        self.bounds = None;
    }

    /// Replace the selection with `universe` minus the current members.
    pub fn invert(&mut self, universe: impl IntoIterator<Item = Coord>) {
        let inverted: HashSet<Coord> = universe
            .into_iter()
            .filter(|c| !self.pixels.contains(c))
            .collect();
        self.pixels = inverted;
        self.recompute_bounds();
    }

    /// Members translated by `(dx, dy)`. Coordinates that land outside the
    /// `width`×`height` canvas are dropped — not wrapped, not clamped. Losing
    /// pixels off the edge is the intended selection-move behavior.
    pub fn translated(&self, dx: i32, dy: i32, width: u32, height: u32) -> Vec<Coord> {
        self.pixels
            .iter()
            .map(|c| c.translated(dx, dy))
            .filter(|c| {
                c.x >= 0 && c.y >= 0 && (c.x as u32) < width && (c.y as u32) < height
            })
            .collect()
    }

    fn recompute_bounds(&mut self) {
        let mut iter = self.pixels.iter();
        let Some(first) = iter.next() else {
            self.bounds = None;
            return;
        };
        let (mut min, mut max) = (*first, *first);
        for c in iter {
            min.x = min.x.min(c.x);
            min.y = min.y.min(c.y);
            max.x = max.x.max(c.x);
            max.y = max.y.max(c.y);
        }
        self.bounds = Some(SelectionBounds {
            x: min.x,
            y: min.y,
            width: max.x - min.x + 1,
            height: max.y - min.y + 1,
        });
    }

    /// Boundary edges for marching-ants rendering: one unit segment wherever a
    /// member's 4-neighbour on that side is not selected. Edges shared between
    /// adjacent cells are emitted once.
    pub fn outline_edges(&self) -> Vec<BoundaryEdge> {
        outline_edges_of(&self.pixels)
    }
}

impl FromIterator<Coord> for SelectionSet {
    fn from_iter<T: IntoIterator<Item = Coord>>(iter: T) -> Self {
        let mut sel = SelectionSet::new();
        sel.replace(iter);
        sel
    }
}

// ============================================================================
// MARCHING ANTS — selection outline extraction + dash phase
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeOrientation {
    /// Runs from `(x, y)` to `(x + 1, y)` in cell-corner space.
    Horizontal,
    /// Runs from `(x, y)` to `(x, y + 1)` in cell-corner space.
    Vertical,
}

/// One unit-length segment of a selection outline, addressed in cell-corner
/// coordinates so adjacent cells share edge identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundaryEdge {
    pub orientation: EdgeOrientation,
    pub x: i32,
    pub y: i32,
}

/// Outline extraction over an arbitrary coordinate set (used for both the live
/// selection and the translated move preview).
pub fn outline_edges_of(pixels: &HashSet<Coord>) -> Vec<BoundaryEdge> {
    let mut edges = Vec::new();
    let mut seen: HashSet<BoundaryEdge> = HashSet::new();
    let mut emit = |edge: BoundaryEdge| {
        if seen.insert(edge) {
            edges.push(edge);
        }
    };
    for &c in pixels {
        if !pixels.contains(&Coord::new(c.x, c.y - 1)) {
            emit(BoundaryEdge { orientation: EdgeOrientation::Horizontal, x: c.x, y: c.y });
        }
        if !pixels.contains(&Coord::new(c.x, c.y + 1)) {
            emit(BoundaryEdge { orientation: EdgeOrientation::Horizontal, x: c.x, y: c.y + 1 });
        }
        if !pixels.contains(&Coord::new(c.x - 1, c.y)) {
            emit(BoundaryEdge { orientation: EdgeOrientation::Vertical, x: c.x, y: c.y });
        }
        if !pixels.contains(&Coord::new(c.x + 1, c.y)) {
            emit(BoundaryEdge { orientation: EdgeOrientation::Vertical, x: c.x + 1, y: c.y });
        }
    }
    edges
}

/// How often the ants march.
pub const ANTS_TICK: Duration = Duration::from_millis(100);
/// Dash phase wraps after this many steps.
pub const ANTS_PHASE_STEPS: u8 = 8;

/// Dash-phase counter for the animated selection outline. Purely cosmetic;
/// a renderer offsets its dash pattern by the current phase and calls
/// [`AntsPhase::tick`] every [`ANTS_TICK`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AntsPhase(u8);

impl AntsPhase {
    pub fn phase(&self) -> u8 {
        self.0
    }

    pub fn tick(&mut self) {
        self.0 = (self.0 + 1) % ANTS_PHASE_STEPS;
    }
}
