//! Layer-stack management and whole-selection commands.

use uuid::Uuid;

use crate::canvas::{Color, Coord, SelectionSet, Sprite};
use crate::log_warn;

// ============================================================================
// LAYER OPS
// ============================================================================

/// Append a new empty layer on top of the stack and make it active.
/// Returns the new layer's id.
pub fn add_layer(sprite: &mut Sprite) -> Uuid {
    let layer = crate::canvas::Layer::new(format!("Layer {}", sprite.layers.len() + 1));
    let id = layer.id;
    sprite.layers.push(layer);
    sprite.active_layer_id = id;
    id
}

/// Delete a layer. Refused (returns `false`) for the last remaining layer —
/// a sprite always keeps at least one. If the active layer is removed, the
/// bottom layer becomes active.
pub fn remove_layer(sprite: &mut Sprite, layer_id: Uuid) -> bool {
    if sprite.layers.len() <= 1 {
        return false;
    }
    let Some(idx) = sprite.layers.iter().position(|l| l.id == layer_id) else {
        return false;
    };
    sprite.layers.remove(idx);
    if sprite.active_layer_id == layer_id {
        sprite.active_layer_id = sprite.layers[0].id;
    }
    true
}

/// Deep-copy a layer (fresh id, " Copy" name suffix), inserted directly above
/// the original and made active. Returns the copy's id.
pub fn duplicate_layer(sprite: &mut Sprite, layer_id: Uuid) -> Option<Uuid> {
    let idx = sprite.layers.iter().position(|l| l.id == layer_id)?;
    let copy = sprite.layers[idx].duplicate();
    let id = copy.id;
    sprite.layers.insert(idx + 1, copy);
    sprite.active_layer_id = id;
    Some(id)
}

/// Reorder the stack to match `order` (bottom first). Ids missing from
/// `order`, or ids in `order` that do not name a layer, make this a no-op.
pub fn reorder_layers(sprite: &mut Sprite, order: &[Uuid]) {
    if order.len() != sprite.layers.len() {
        log_warn!("layer reorder ignored: {} ids for {} layers", order.len(), sprite.layers.len());
        return;
    }
    let mut reordered = Vec::with_capacity(order.len());
    for id in order {
        match sprite.layers.iter().position(|l| l.id == *id) {
            Some(idx) => reordered.push(idx),
            None => {
                log_warn!("layer reorder ignored: unknown layer {}", id);
                return;
            }
        }
    }
    let mut taken: Vec<Option<crate::canvas::Layer>> =
        sprite.layers.drain(..).map(Some).collect();
    sprite.layers = reordered
        .into_iter()
        .filter_map(|idx| taken[idx].take())
        .collect();
}

/// Property updates applied together; `None` fields are left unchanged.
#[derive(Clone, Debug, Default)]
pub struct LayerUpdate {
    pub name: Option<String>,
    pub visible: Option<bool>,
    pub opacity: Option<u8>,
    pub locked: Option<bool>,
}

pub fn update_layer(sprite: &mut Sprite, layer_id: Uuid, update: LayerUpdate) {
    if let Some(layer) = sprite.layer_mut(layer_id) {
        if let Some(name) = update.name {
            layer.name = name;
        }
        if let Some(visible) = update.visible {
            layer.visible = visible;
        }
        if let Some(opacity) = update.opacity {
            layer.opacity = opacity.min(100);
        }
        if let Some(locked) = update.locked {
            layer.locked = locked;
        }
    }
}

/// Make `layer_id` the target of tool operations, if it exists.
pub fn set_active_layer(sprite: &mut Sprite, layer_id: Uuid) {
    if sprite.layer(layer_id).is_some() {
        sprite.active_layer_id = layer_id;
    }
}

// ============================================================================
// SELECTION COMMANDS
// ============================================================================

/// Select every coordinate of the canvas.
pub fn select_all(sprite: &Sprite, selection: &mut SelectionSet) {
    let coords = (0..sprite.height as i32)
        .flat_map(|y| (0..sprite.width as i32).map(move |x| Coord::new(x, y)));
    selection.replace(coords);
}

/// Replace the selection with its complement over the painted, visible parts
/// of the sprite: the universe is the union of all visible layers' painted
/// coordinates.
pub fn invert_selection(sprite: &Sprite, selection: &mut SelectionSet) {
    let universe: Vec<Coord> = sprite
        .layers
        .iter()
        .filter(|l| l.visible)
        .flat_map(|l| l.pixels.coords())
        .collect();
    selection.invert(universe);
}

/// Paint every selected coordinate on the active layer with `color`.
/// Returns `false` (untouched) when the selection is empty or the layer is
/// locked.
pub fn fill_selection(sprite: &mut Sprite, selection: &SelectionSet, color: Color) -> bool {
    if selection.is_empty() {
        return false;
    }
    if sprite.active_layer().is_none_or(|l| l.locked) {
        return false;
    }
    let layer_id = sprite.active_layer_id;
    for c in selection.iter() {
        sprite.set_pixel(layer_id, c, color);
    }
    true
}

/// Paint the selected cells lying on the edge of the selection's bounding
/// box. Interior members, and members away from the box edge, are left alone.
pub fn stroke_selection(sprite: &mut Sprite, selection: &SelectionSet, color: Color) -> bool {
    let Some(bounds) = selection.bounds() else {
        return false;
    };
    if sprite.active_layer().is_none_or(|l| l.locked) {
        return false;
    }
    let max_x = bounds.x + bounds.width - 1;
    let max_y = bounds.y + bounds.height - 1;
    let edge: Vec<Coord> = selection
        .iter()
        .filter(|c| c.x == bounds.x || c.x == max_x || c.y == bounds.y || c.y == max_y)
        .collect();
    let layer_id = sprite.active_layer_id;
    for c in edge {
        sprite.set_pixel(layer_id, c, color);
    }
    true
}

/// Paint a one-pixel halo around the selection: every in-bounds, unselected
/// 4-neighbour of a member.
pub fn outline_selection(sprite: &mut Sprite, selection: &SelectionSet, color: Color) -> bool {
    if selection.is_empty() {
        return false;
    }
    if sprite.active_layer().is_none_or(|l| l.locked) {
        return false;
    }
    let halo: Vec<Coord> = selection
        .iter()
        .flat_map(|c| c.neighbors4())
        .filter(|n| !selection.contains(*n) && sprite.in_bounds(*n))
        .collect();
    let layer_id = sprite.active_layer_id;
    for c in halo {
        sprite.set_pixel(layer_id, c, color);
    }
    true
}
