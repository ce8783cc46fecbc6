//! Whole-sprite geometric transforms. Each rewrites every layer's grid
//! consistently; pixels falling outside the new bounds are dropped.

use crate::canvas::{Coord, Sprite, MAX_SPRITE_DIM, MIN_SPRITE_DIM};

/// Resize the canvas to `width`×`height` (clamped to the supported range),
/// cropping pixels that fall outside the new bounds. Anchored at the origin.
pub fn resize_canvas(sprite: &mut Sprite, width: u32, height: u32) {
    let width = width.clamp(MIN_SPRITE_DIM, MAX_SPRITE_DIM);
    let height = height.clamp(MIN_SPRITE_DIM, MAX_SPRITE_DIM);
    for layer in &mut sprite.layers {
        layer.pixels = layer
            .pixels
            .iter()
            .filter(|(c, _)| c.x >= 0 && c.y >= 0 && (c.x as u32) < width && (c.y as u32) < height)
            .collect();
    }
    sprite.width = width;
    sprite.height = height;
}

/// Mirror every layer across the vertical center line.
pub fn flip_horizontal(sprite: &mut Sprite) {
    let w = sprite.width as i32;
    for layer in &mut sprite.layers {
        layer.pixels = layer
            .pixels
            .iter()
            .map(|(c, color)| (Coord::new(w - 1 - c.x, c.y), color))
            .collect();
    }
}

/// Mirror every layer across the horizontal center line.
pub fn flip_vertical(sprite: &mut Sprite) {
    let h = sprite.height as i32;
    for layer in &mut sprite.layers {
        layer.pixels = layer
            .pixels
            .iter()
            .map(|(c, color)| (Coord::new(c.x, h - 1 - c.y), color))
            .collect();
    }
}

/// Rotate the whole sprite 90° clockwise; width and height swap.
pub fn rotate_cw(sprite: &mut Sprite) {
    let h = sprite.height as i32;
    for layer in &mut sprite.layers {
        layer.pixels = layer
            .pixels
            .iter()
            .map(|(c, color)| (Coord::new(h - 1 - c.y, c.x), color))
            .collect();
    }
    std::mem::swap(&mut sprite.width, &mut sprite.height);
}

/// Rotate the whole sprite 90° counter-clockwise; width and height swap.
pub fn rotate_ccw(sprite: &mut Sprite) {
    let w = sprite.width as i32;
    for layer in &mut sprite.layers {
        layer.pixels = layer
            .pixels
            .iter()
            .map(|(c, color)| (Coord::new(c.y, w - 1 - c.x), color))
            .collect();
    }
    std::mem::swap(&mut sprite.width, &mut sprite.height);
}

/// Crop the canvas to the tight bounding box of all layers' painted pixels,
/// shifting every layer so the box's corner lands at the origin. A sprite
/// with no painted pixels, or one already tight, is left untouched.
pub fn trim(sprite: &mut Sprite) {
    let mut bounds: Option<(Coord, Coord)> = None;
    for layer in &sprite.layers {
        if let Some((lmin, lmax)) = layer.pixels.bounds() {
            bounds = Some(match bounds {
                None => (lmin, lmax),
                Some((min, max)) => (
                    Coord::new(min.x.min(lmin.x), min.y.min(lmin.y)),
                    Coord::new(max.x.max(lmax.x), max.y.max(lmax.y)),
                ),
            });
        }
    }
    let Some((min, max)) = bounds else {
        return;
    };
    let new_w = (max.x - min.x + 1) as u32;
    let new_h = (max.y - min.y + 1) as u32;
    if min.x == 0 && min.y == 0 && new_w == sprite.width && new_h == sprite.height {
        return;
    }
    for layer in &mut sprite.layers {
        layer.pixels = layer
            .pixels
            .iter()
            .map(|(c, color)| (c.translated(-min.x, -min.y), color))
            .collect();
    }
    sprite.width = new_w;
    sprite.height = new_h;
}
