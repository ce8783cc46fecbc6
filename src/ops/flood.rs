//! Region growing — 4-connected flood traversal and the tools built on it
//! (bucket fill, magic wand, magic eraser, contiguous color replace).
//!
//! The mutating front-ends report whether they changed the layer, so callers
//! can skip the history push for no-op invocations.

use std::collections::{HashSet, VecDeque};

use crate::canvas::{Color, Coord, SelectionSet, Sprite};

// ============================================================================
// COMBINE MODE
// ============================================================================

/// How a freshly grown region combines with the existing selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombineMode {
    Replace,
    Add,
    Subtract,
}

impl CombineMode {
    /// Modifier convention shared by magic wand, rectangle-select and
    /// quick-select: shift = add, shift+ctrl = subtract, plain = replace.
    pub fn from_modifiers(shift: bool, ctrl: bool) -> Self {
        if shift && ctrl {
            CombineMode::Subtract
        } else if shift {
            CombineMode::Add
        } else {
            CombineMode::Replace
        }
    }

    /// Merge `region` into `selection` under this mode.
    pub fn apply(self, selection: &mut SelectionSet, region: Vec<Coord>) {
        match self {
            CombineMode::Replace => selection.replace(region),
            CombineMode::Add => selection.add(region),
            CombineMode::Subtract => selection.subtract(region),
        }
    }
}

// ============================================================================
// GENERIC REGION GROWER
// ============================================================================

/// Breadth-first 4-connected flood from `seed` over a `width`×`height` grid.
///
/// `matches` decides membership per candidate. When `mask` is a non-empty
/// selection, traversal is restricted to its members, and a seed outside the
/// mask aborts with an empty region. Each accepted coordinate appears exactly
/// once; diagonal neighbours are never visited.
pub fn flood_region<F>(
    width: u32,
    height: u32,
    seed: Coord,
    mask: Option<&SelectionSet>,
    mut matches: F,
) -> Vec<Coord>
where
    F: FnMut(Coord) -> bool,
{
    let in_bounds = |c: Coord| {
        c.x >= 0 && c.y >= 0 && (c.x as u32) < width && (c.y as u32) < height
    };
    if !in_bounds(seed) {
        return Vec::new();
    }
    let mask = mask.filter(|m| !m.is_empty());
    if let Some(m) = mask
        && !m.contains(seed)
    {
        return Vec::new();
    }

    let mut region = Vec::new();
    let mut visited: HashSet<Coord> = HashSet::new();
    let mut queue: VecDeque<Coord> = VecDeque::from([seed]);

    while let Some(c) = queue.pop_front() {
        if !visited.insert(c) {
            continue;
        }
        if !matches(c) {
            continue;
        }
        if let Some(m) = mask
            && !m.contains(c)
        {
            continue;
        }
        region.push(c);
        for n in c.neighbors4() {
            if in_bounds(n) && !visited.contains(&n) {
                queue.push_back(n);
            }
        }
    }
    region
}

// ============================================================================
// TOOL FRONT-ENDS — all operate on the active layer
// ============================================================================

/// Bucket fill: repaint the connected same-colored region around `seed` with
/// `fill`. Transparent counts as a color, so empty areas fill too. Returns
/// `false` without touching anything when the region already has the fill
/// color, the seed falls outside an active selection, or the layer is locked.
pub fn bucket_fill(
    sprite: &mut Sprite,
    seed: Coord,
    fill: Color,
    selection: &SelectionSet,
) -> bool {
    let Some(layer) = sprite.active_layer() else {
        return false;
    };
    if layer.locked {
        return false;
    }
    let target = layer.pixels.get(seed);
    if target == Some(fill) {
        return false;
    }
    let mask = (!selection.is_empty()).then_some(selection);
    let pixels = &layer.pixels;
    let region = flood_region(sprite.width, sprite.height, seed, mask, |c| {
        pixels.get(c) == target
    });
    if region.is_empty() {
        return false;
    }
    let layer_id = sprite.active_layer_id;
    for c in region {
        sprite.set_pixel(layer_id, c, fill);
    }
    true
}

/// Magic eraser: delete the connected same-colored region around `seed`.
/// The seed must be a painted pixel; erasing from transparent is a no-op.
pub fn magic_erase(sprite: &mut Sprite, seed: Coord, selection: &SelectionSet) -> bool {
    let Some(layer) = sprite.active_layer() else {
        return false;
    };
    if layer.locked {
        return false;
    }
    let Some(target) = layer.pixels.get(seed) else {
        return false;
    };
    let mask = (!selection.is_empty()).then_some(selection);
    let pixels = &layer.pixels;
    let region = flood_region(sprite.width, sprite.height, seed, mask, |c| {
        pixels.get(c) == Some(target)
    });
    if region.is_empty() {
        return false;
    }
    let layer_id = sprite.active_layer_id;
    for c in region {
        sprite.clear_pixel(layer_id, c);
    }
    true
}

/// Contiguous color replace: repaint the connected region of the seed's color
/// with `replacement`. Unlike bucket fill, traversal ignores the selection —
/// only the *effect* is masked, so a region crossing the selection border is
/// recolored exactly where it overlaps the selection.
pub fn color_replace(
    sprite: &mut Sprite,
    seed: Coord,
    replacement: Color,
    selection: &SelectionSet,
) -> bool {
    let Some(layer) = sprite.active_layer() else {
        return false;
    };
    if layer.locked {
        return false;
    }
    let Some(target) = layer.pixels.get(seed) else {
        return false;
    };
    if target == replacement {
        return false;
    }
    let pixels = &layer.pixels;
    let region = flood_region(sprite.width, sprite.height, seed, None, |c| {
        pixels.get(c) == Some(target)
    });
    let layer_id = sprite.active_layer_id;
    let mut changed = false;
    for c in region {
        if selection.is_empty() || selection.contains(c) {
            sprite.set_pixel(layer_id, c, replacement);
            changed = true;
        }
    }
    changed
}

/// Magic wand: the connected same-colored region around a painted seed on the
/// active layer, for selection combination. `None` when the seed is
/// transparent or out of bounds.
pub fn magic_wand_region(sprite: &Sprite, seed: Coord) -> Option<Vec<Coord>> {
    let layer = sprite.active_layer()?;
    let target = layer.pixels.get(seed)?;
    let pixels = &layer.pixels;
    Some(flood_region(sprite.width, sprite.height, seed, None, |c| {
        pixels.get(c) == Some(target)
    }))
}
