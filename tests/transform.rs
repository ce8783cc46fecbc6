use pixo::canvas::{Background, Color, Coord, Sprite};
use pixo::ops::transform::{
    flip_horizontal, flip_vertical, resize_canvas, rotate_ccw, rotate_cw, trim,
};

const INK: Color = Color::rgb(200, 40, 40);
const ALT: Color = Color::rgb(40, 40, 200);

fn sprite_with(width: u32, height: u32, coords: &[(i32, i32)]) -> Sprite {
    let mut sprite = Sprite::new("t", width, height, Background::Transparent);
    let id = sprite.active_layer_id;
    for &(x, y) in coords {
        sprite.set_pixel(id, Coord::new(x, y), INK);
    }
    sprite
}

#[test]
fn flip_horizontal_twice_restores_the_grid() {
    let mut sprite = sprite_with(5, 4, &[(0, 0), (3, 2), (4, 3)]);
    let before = sprite.active_layer().unwrap().pixels.clone();
    flip_horizontal(&mut sprite);
    assert_ne!(sprite.active_layer().unwrap().pixels, before);
    flip_horizontal(&mut sprite);
    assert_eq!(sprite.active_layer().unwrap().pixels, before);
}

#[test]
fn flip_horizontal_mirrors_x() {
    let mut sprite = sprite_with(5, 4, &[(0, 1)]);
    flip_horizontal(&mut sprite);
    let grid = &sprite.active_layer().unwrap().pixels;
    assert_eq!(grid.get(Coord::new(4, 1)), Some(INK));
    assert_eq!(grid.len(), 1);
}

#[test]
fn flip_vertical_mirrors_y() {
    let mut sprite = sprite_with(5, 4, &[(2, 0)]);
    flip_vertical(&mut sprite);
    let grid = &sprite.active_layer().unwrap().pixels;
    assert_eq!(grid.get(Coord::new(2, 3)), Some(INK));
}

#[test]
fn rotate_cw_swaps_dimensions_and_maps_corners() {
    let mut sprite = sprite_with(6, 3, &[(0, 0), (5, 2)]);
    rotate_cw(&mut sprite);
    assert_eq!((sprite.width, sprite.height), (3, 6));
    let grid = &sprite.active_layer().unwrap().pixels;
    // Top-left lands on the top-right, bottom-right on the bottom-left.
    assert_eq!(grid.get(Coord::new(2, 0)), Some(INK));
    assert_eq!(grid.get(Coord::new(0, 5)), Some(INK));
}

#[test]
fn four_clockwise_rotations_are_identity() {
    let mut sprite = sprite_with(6, 3, &[(1, 0), (4, 2), (3, 1)]);
    let before = sprite.active_layer().unwrap().pixels.clone();
    for _ in 0..4 {
        rotate_cw(&mut sprite);
    }
    assert_eq!((sprite.width, sprite.height), (6, 3));
    assert_eq!(sprite.active_layer().unwrap().pixels, before);
}

#[test]
fn rotate_ccw_inverts_rotate_cw() {
    let mut sprite = sprite_with(6, 3, &[(1, 0), (4, 2)]);
    let before = sprite.active_layer().unwrap().pixels.clone();
    rotate_cw(&mut sprite);
    rotate_ccw(&mut sprite);
    assert_eq!(sprite.active_layer().unwrap().pixels, before);
}

#[test]
fn resize_crops_out_of_bounds_pixels() {
    let mut sprite = sprite_with(8, 8, &[(1, 1), (6, 6)]);
    resize_canvas(&mut sprite, 4, 4);
    assert_eq!((sprite.width, sprite.height), (4, 4));
    let grid = &sprite.active_layer().unwrap().pixels;
    assert_eq!(grid.len(), 1);
    assert_eq!(grid.get(Coord::new(1, 1)), Some(INK));
}

#[test]
fn resize_clamps_to_supported_range() {
    let mut sprite = sprite_with(8, 8, &[]);
    resize_canvas(&mut sprite, 0, 9999);
    assert_eq!((sprite.width, sprite.height), (1, 1024));
}

#[test]
fn trim_crops_to_the_painted_bounding_box() {
    let mut sprite = sprite_with(10, 10, &[(2, 3), (5, 6)]);
    trim(&mut sprite);
    assert_eq!((sprite.width, sprite.height), (4, 4));
    let grid = &sprite.active_layer().unwrap().pixels;
    assert_eq!(grid.get(Coord::new(0, 0)), Some(INK));
    assert_eq!(grid.get(Coord::new(3, 3)), Some(INK));
}

#[test]
fn trim_spans_all_layers() {
    let mut sprite = sprite_with(10, 10, &[(4, 4)]);
    let second = pixo::ops::canvas_ops::add_layer(&mut sprite);
    sprite.set_pixel(second, Coord::new(7, 2), ALT);
    trim(&mut sprite);
    // Union box: x 4..=7, y 2..=4.
    assert_eq!((sprite.width, sprite.height), (4, 3));
    assert_eq!(
        sprite.layers[0].pixels.get(Coord::new(0, 2)),
        Some(INK)
    );
    assert_eq!(
        sprite.layers[1].pixels.get(Coord::new(3, 0)),
        Some(ALT)
    );
}

#[test]
fn trim_on_an_empty_sprite_is_a_no_op() {
    let mut sprite = sprite_with(10, 10, &[]);
    trim(&mut sprite);
    assert_eq!((sprite.width, sprite.height), (10, 10));
}

#[test]
fn trim_on_a_tight_sprite_is_a_no_op() {
    let mut sprite = sprite_with(2, 2, &[(0, 0), (1, 1)]);
    let before = sprite.active_layer().unwrap().pixels.clone();
    trim(&mut sprite);
    assert_eq!((sprite.width, sprite.height), (2, 2));
    assert_eq!(sprite.active_layer().unwrap().pixels, before);
}
