use pixo::canvas::{
    AntsPhase, Background, Color, Coord, EdgeOrientation, SelectionSet, Sprite, ANTS_PHASE_STEPS,
};
use pixo::ops::canvas_ops::{
    fill_selection, invert_selection, outline_selection, select_all, stroke_selection,
};

const INK: Color = Color::rgb(20, 20, 20);

#[test]
fn bounds_stay_tight_through_mutations() {
    let mut sel = SelectionSet::new();
    assert_eq!(sel.bounds(), None);

    sel.add([Coord::new(2, 2), Coord::new(5, 7)]);
    let b = sel.bounds().unwrap();
    assert_eq!((b.x, b.y, b.width, b.height), (2, 2, 4, 6));

    sel.subtract([Coord::new(5, 7)]);
    let b = sel.bounds().unwrap();
    assert_eq!((b.x, b.y, b.width, b.height), (2, 2, 1, 1));

    sel.replace([Coord::new(0, 0), Coord::new(1, 0)]);
    let b = sel.bounds().unwrap();
    assert_eq!((b.x, b.y, b.width, b.height), (0, 0, 2, 1));

    sel.clear();
    assert_eq!(sel.bounds(), None);
    assert!(sel.is_empty());
}

#[test]
fn subtracting_the_last_member_nulls_the_bounds() {
    let mut sel: SelectionSet = [Coord::new(3, 3)].into_iter().collect();
    sel.subtract([Coord::new(3, 3)]);
    assert_eq!(sel.bounds(), None);
}

#[test]
fn invert_complements_against_the_universe() {
    let universe = [Coord::new(0, 0), Coord::new(1, 0), Coord::new(2, 0)];
    let mut sel: SelectionSet = [Coord::new(1, 0), Coord::new(9, 9)].into_iter().collect();
    sel.invert(universe);
    assert_eq!(sel.len(), 2);
    assert!(sel.contains(Coord::new(0, 0)));
    assert!(sel.contains(Coord::new(2, 0)));
    assert!(!sel.contains(Coord::new(1, 0)));
    assert!(!sel.contains(Coord::new(9, 9)));
}

#[test]
fn translation_drops_members_pushed_off_canvas() {
    let sel: SelectionSet = [Coord::new(0, 0), Coord::new(3, 3)].into_iter().collect();
    let moved = sel.translated(-1, -1, 4, 4);
    assert_eq!(moved, vec![Coord::new(2, 2)]);

    let gone = sel.translated(-5, 0, 4, 4);
    assert!(gone.is_empty());
}

#[test]
fn single_cell_outline_has_four_edges() {
    let sel: SelectionSet = [Coord::new(2, 2)].into_iter().collect();
    assert_eq!(sel.outline_edges().len(), 4);
}

#[test]
fn adjacent_cells_share_no_outline_edge() {
    // Two cells side by side: the shared inner edge must not appear, and no
    // edge may be emitted twice.
    let sel: SelectionSet = [Coord::new(0, 0), Coord::new(1, 0)].into_iter().collect();
    let edges = sel.outline_edges();
    assert_eq!(edges.len(), 6);

    let verticals: Vec<_> = edges
        .iter()
        .filter(|e| e.orientation == EdgeOrientation::Vertical)
        .collect();
    assert_eq!(verticals.len(), 2);
    // The inner edge at x=1 is interior to the pair.
    assert!(verticals.iter().all(|e| e.x == 0 || e.x == 2));
}

#[test]
fn ants_phase_wraps_modulo_eight() {
    let mut ants = AntsPhase::default();
    assert_eq!(ants.phase(), 0);
    for _ in 0..ANTS_PHASE_STEPS {
        ants.tick();
    }
    assert_eq!(ants.phase(), 0);
    ants.tick();
    assert_eq!(ants.phase(), 1);
}

#[test]
fn select_all_covers_the_canvas() {
    let sprite = Sprite::new("s", 3, 2, Background::Transparent);
    let mut sel = SelectionSet::new();
    select_all(&sprite, &mut sel);
    assert_eq!(sel.len(), 6);
    let b = sel.bounds().unwrap();
    assert_eq!((b.x, b.y, b.width, b.height), (0, 0, 3, 2));
}

#[test]
fn invert_selection_uses_visible_painted_pixels() {
    let mut sprite = Sprite::new("s", 4, 4, Background::Transparent);
    let base = sprite.active_layer_id;
    sprite.set_pixel(base, Coord::new(0, 0), INK);
    sprite.set_pixel(base, Coord::new(1, 0), INK);

    // A hidden layer's pixels are not part of the universe.
    let hidden = pixo::ops::canvas_ops::add_layer(&mut sprite);
    sprite.set_pixel(hidden, Coord::new(3, 3), INK);
    sprite.layer_mut(hidden).unwrap().visible = false;

    let mut sel: SelectionSet = [Coord::new(0, 0)].into_iter().collect();
    invert_selection(&sprite, &mut sel);
    assert_eq!(sel.len(), 1);
    assert!(sel.contains(Coord::new(1, 0)));
}

#[test]
fn fill_selection_paints_every_member() {
    let mut sprite = Sprite::new("s", 4, 4, Background::Transparent);
    let sel: SelectionSet = [Coord::new(0, 0), Coord::new(2, 1)].into_iter().collect();
    assert!(fill_selection(&mut sprite, &sel, INK));
    let grid = &sprite.active_layer().unwrap().pixels;
    assert_eq!(grid.len(), 2);
    assert_eq!(grid.get(Coord::new(2, 1)), Some(INK));

    assert!(!fill_selection(&mut sprite, &SelectionSet::new(), INK));
}

#[test]
fn stroke_selection_paints_bounding_box_edge_members() {
    let mut sprite = Sprite::new("s", 5, 5, Background::Transparent);
    // 3x3 block selection: stroke paints the 8 ring members, not the center.
    let sel: SelectionSet = (1..4)
        .flat_map(|y| (1..4).map(move |x| Coord::new(x, y)))
        .collect();
    assert!(stroke_selection(&mut sprite, &sel, INK));
    let grid = &sprite.active_layer().unwrap().pixels;
    assert_eq!(grid.len(), 8);
    assert!(!grid.contains(Coord::new(2, 2)));
}

#[test]
fn outline_selection_paints_a_halo_outside() {
    let mut sprite = Sprite::new("s", 5, 5, Background::Transparent);
    let sel: SelectionSet = [Coord::new(2, 2)].into_iter().collect();
    assert!(outline_selection(&mut sprite, &sel, INK));
    let grid = &sprite.active_layer().unwrap().pixels;
    assert_eq!(grid.len(), 4);
    assert!(!grid.contains(Coord::new(2, 2)));
    assert!(grid.contains(Coord::new(1, 2)));
}

#[test]
fn outline_halo_is_clipped_at_the_canvas_edge() {
    let mut sprite = Sprite::new("s", 4, 4, Background::Transparent);
    let sel: SelectionSet = [Coord::new(0, 0)].into_iter().collect();
    assert!(outline_selection(&mut sprite, &sel, INK));
    // Only the two in-bounds neighbours get painted.
    assert_eq!(sprite.active_layer().unwrap().pixels.len(), 2);
}
