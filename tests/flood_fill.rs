use pixo::canvas::{Background, Color, Coord, SelectionSet, Sprite};
use pixo::ops::flood::{
    bucket_fill, color_replace, flood_region, magic_erase, magic_wand_region, CombineMode,
};

const RED: Color = Color::rgb(255, 0, 0);
const GREEN: Color = Color::rgb(0, 255, 0);
const BLUE: Color = Color::rgb(0, 0, 255);

fn sprite_4x4() -> Sprite {
    Sprite::new("t", 4, 4, Background::Transparent)
}

fn paint(sprite: &mut Sprite, coords: &[(i32, i32)], color: Color) {
    let id = sprite.active_layer_id;
    for &(x, y) in coords {
        sprite.set_pixel(id, Coord::new(x, y), color);
    }
}

#[test]
fn bucket_fills_exactly_the_connected_region() {
    let mut sprite = sprite_4x4();
    // Two red regions separated by a diagonal-only touch: (1,1) and (2,2)
    // are not 4-connected.
    paint(&mut sprite, &[(0, 0), (1, 0), (1, 1)], RED);
    paint(&mut sprite, &[(2, 2), (3, 2)], RED);

    assert!(bucket_fill(&mut sprite, Coord::new(0, 0), GREEN, &SelectionSet::new()));

    let grid = &sprite.active_layer().unwrap().pixels;
    for c in [Coord::new(0, 0), Coord::new(1, 0), Coord::new(1, 1)] {
        assert_eq!(grid.get(c), Some(GREEN));
    }
    for c in [Coord::new(2, 2), Coord::new(3, 2)] {
        assert_eq!(grid.get(c), Some(RED), "disconnected region touched");
    }
}

#[test]
fn bucket_fills_transparent_areas() {
    let mut sprite = sprite_4x4();
    paint(&mut sprite, &[(1, 0), (1, 1), (1, 2), (1, 3)], RED);

    assert!(bucket_fill(&mut sprite, Coord::new(0, 0), BLUE, &SelectionSet::new()));

    let grid = &sprite.active_layer().unwrap().pixels;
    // The red wall splits the canvas; only the left column floods.
    assert_eq!(grid.get(Coord::new(0, 3)), Some(BLUE));
    assert_eq!(grid.get(Coord::new(2, 0)), None);
    assert_eq!(grid.get(Coord::new(1, 2)), Some(RED));
}

#[test]
fn bucket_with_same_color_is_a_no_op() {
    let mut sprite = sprite_4x4();
    paint(&mut sprite, &[(1, 1)], GREEN);
    let before = sprite.active_layer().unwrap().pixels.clone();
    assert!(!bucket_fill(&mut sprite, Coord::new(1, 1), GREEN, &SelectionSet::new()));
    assert_eq!(sprite.active_layer().unwrap().pixels, before);
}

#[test]
fn bucket_respects_selection_mask() {
    let mut sprite = sprite_4x4();
    // Uniform transparent canvas; select the top row only.
    let selection: SelectionSet = (0..4).map(|x| Coord::new(x, 0)).collect();

    assert!(bucket_fill(&mut sprite, Coord::new(1, 0), GREEN, &selection));

    let grid = &sprite.active_layer().unwrap().pixels;
    assert_eq!(grid.len(), 4);
    for x in 0..4 {
        assert_eq!(grid.get(Coord::new(x, 0)), Some(GREEN));
    }
    assert_eq!(grid.get(Coord::new(0, 1)), None);
}

#[test]
fn bucket_aborts_when_seed_is_outside_selection() {
    let mut sprite = sprite_4x4();
    let selection: SelectionSet = [Coord::new(0, 0)].into_iter().collect();
    assert!(!bucket_fill(&mut sprite, Coord::new(3, 3), GREEN, &selection));
    assert!(sprite.active_layer().unwrap().pixels.is_empty());
}

#[test]
fn bucket_on_locked_layer_is_refused() {
    let mut sprite = sprite_4x4();
    sprite.active_layer_mut().unwrap().locked = true;
    assert!(!bucket_fill(&mut sprite, Coord::new(0, 0), GREEN, &SelectionSet::new()));
}

#[test]
fn magic_erase_deletes_the_region() {
    let mut sprite = sprite_4x4();
    paint(&mut sprite, &[(0, 0), (0, 1), (1, 1)], RED);
    paint(&mut sprite, &[(3, 3)], RED);

    assert!(magic_erase(&mut sprite, Coord::new(0, 0), &SelectionSet::new()));

    let grid = &sprite.active_layer().unwrap().pixels;
    assert_eq!(grid.len(), 1);
    assert_eq!(grid.get(Coord::new(3, 3)), Some(RED));
}

#[test]
fn magic_erase_needs_a_painted_seed() {
    let mut sprite = sprite_4x4();
    paint(&mut sprite, &[(0, 0)], RED);
    assert!(!magic_erase(&mut sprite, Coord::new(2, 2), &SelectionSet::new()));
    assert_eq!(sprite.active_layer().unwrap().pixels.len(), 1);
}

#[test]
fn color_replace_traverses_past_the_selection_but_masks_the_effect() {
    let mut sprite = sprite_4x4();
    // One connected red row; select its two ends but not the middle.
    paint(&mut sprite, &[(0, 0), (1, 0), (2, 0), (3, 0)], RED);
    let selection: SelectionSet = [Coord::new(0, 0), Coord::new(3, 0)].into_iter().collect();

    assert!(color_replace(&mut sprite, Coord::new(0, 0), BLUE, &selection));

    let grid = &sprite.active_layer().unwrap().pixels;
    // Traversal crossed the unselected middle to reach (3,0), but only the
    // selected ends were recolored.
    assert_eq!(grid.get(Coord::new(0, 0)), Some(BLUE));
    assert_eq!(grid.get(Coord::new(3, 0)), Some(BLUE));
    assert_eq!(grid.get(Coord::new(1, 0)), Some(RED));
    assert_eq!(grid.get(Coord::new(2, 0)), Some(RED));
}

#[test]
fn magic_wand_selects_the_connected_region() {
    let mut sprite = sprite_4x4();
    paint(&mut sprite, &[(0, 0), (1, 0), (1, 1)], RED);
    paint(&mut sprite, &[(3, 3)], RED);

    let region = magic_wand_region(&sprite, Coord::new(0, 0)).unwrap();
    assert_eq!(region.len(), 3);
    assert!(magic_wand_region(&sprite, Coord::new(2, 2)).is_none());
}

#[test]
fn combine_modes_merge_regions() {
    let mut selection: SelectionSet = [Coord::new(0, 0)].into_iter().collect();
    CombineMode::Add.apply(&mut selection, vec![Coord::new(1, 0)]);
    assert_eq!(selection.len(), 2);
    CombineMode::Subtract.apply(&mut selection, vec![Coord::new(0, 0)]);
    assert_eq!(selection.len(), 1);
    CombineMode::Replace.apply(&mut selection, vec![Coord::new(5, 5)]);
    assert!(selection.contains(Coord::new(5, 5)));
    assert_eq!(selection.len(), 1);

    assert_eq!(CombineMode::from_modifiers(true, false), CombineMode::Add);
    assert_eq!(CombineMode::from_modifiers(true, true), CombineMode::Subtract);
    assert_eq!(CombineMode::from_modifiers(false, false), CombineMode::Replace);
    assert_eq!(CombineMode::from_modifiers(false, true), CombineMode::Replace);
}

#[test]
fn flood_region_never_visits_diagonals() {
    // Checkerboard of matching cells: only the seed itself is reachable.
    let matching = [Coord::new(0, 0), Coord::new(1, 1), Coord::new(2, 2)];
    let region = flood_region(4, 4, Coord::new(0, 0), None, |c| matching.contains(&c));
    assert_eq!(region, vec![Coord::new(0, 0)]);
}

#[test]
fn end_to_end_isolated_pixel_fill() {
    let mut sprite = sprite_4x4();
    let id = sprite.active_layer_id;
    sprite.set_pixel(id, Coord::new(1, 1), RED);

    // The red pixel is its own region; fill turns just it green.
    assert!(bucket_fill(&mut sprite, Coord::new(1, 1), GREEN, &SelectionSet::new()));
    assert_eq!(
        sprite.active_layer().unwrap().pixels.get(Coord::new(1, 1)),
        Some(GREEN)
    );

    // Filling green with green reports no change.
    let before = sprite.active_layer().unwrap().pixels.clone();
    assert!(!bucket_fill(&mut sprite, Coord::new(1, 1), GREEN, &SelectionSet::new()));
    assert_eq!(sprite.active_layer().unwrap().pixels, before);
}
