use pixo::canvas::{Background, Color, Coord, PixelGrid, Sprite};

#[test]
fn set_then_get_round_trips() {
    let mut grid = PixelGrid::new();
    let red = Color::rgb(255, 0, 0);
    grid.set(Coord::new(3, 4), red);
    assert_eq!(grid.get(Coord::new(3, 4)), Some(red));
    assert_eq!(grid.get(Coord::new(4, 3)), None);
}

#[test]
fn clear_is_idempotent() {
    let mut grid = PixelGrid::new();
    grid.set(Coord::new(1, 1), Color::rgb(0, 0, 0));
    grid.clear(Coord::new(1, 1));
    let after_one = grid.clone();
    grid.clear(Coord::new(1, 1));
    assert_eq!(grid, after_one);
    assert!(grid.is_empty());
}

#[test]
fn fully_transparent_color_is_never_stored() {
    let mut grid = PixelGrid::new();
    grid.set(Coord::new(0, 0), Color::rgb(10, 20, 30));
    grid.set(Coord::new(0, 0), Color::rgba(1, 2, 3, 0));
    assert_eq!(grid.get(Coord::new(0, 0)), None);
    assert!(grid.is_empty());
}

#[test]
fn grid_bounds_are_tight() {
    let mut grid = PixelGrid::new();
    assert_eq!(grid.bounds(), None);
    grid.set(Coord::new(2, 3), Color::rgb(1, 1, 1));
    grid.set(Coord::new(5, 6), Color::rgb(1, 1, 1));
    let (min, max) = grid.bounds().unwrap();
    assert_eq!((min, max), (Coord::new(2, 3), Coord::new(5, 6)));
}

#[test]
fn color_parses_hex_forms() {
    assert_eq!("#FF0000".parse::<Color>().unwrap(), Color::rgb(255, 0, 0));
    assert_eq!(
        "#01020380".parse::<Color>().unwrap(),
        Color::rgba(1, 2, 3, 0x80)
    );
    assert_eq!("#ff00ff".parse::<Color>().unwrap(), Color::rgb(255, 0, 255));
}

#[test]
fn color_parses_rgba_form() {
    let c = "rgba(255, 128, 0, 0.5)".parse::<Color>().unwrap();
    assert_eq!((c.r, c.g, c.b), (255, 128, 0));
    assert_eq!(c.a, 128);
}

#[test]
fn color_rejects_garbage() {
    assert!("red".parse::<Color>().is_err());
    assert!("#12345".parse::<Color>().is_err());
    assert!("rgba(1,2,3)".parse::<Color>().is_err());
    assert!("rgba(1, 2, 3, 1.5)".parse::<Color>().is_err());
}

#[test]
fn color_display_round_trips() {
    for s in ["#0A0B0C", "#0A0B0C7F"] {
        let c: Color = s.parse().unwrap();
        assert_eq!(c.to_string(), s);
    }
}

#[test]
fn coord_key_round_trips() {
    let c = Coord::new(-3, 17);
    assert_eq!(c.key(), "-3,17");
    assert_eq!(Coord::from_key(&c.key()), Some(c));
    assert_eq!(Coord::from_key("nope"), None);
}

#[test]
fn sprite_ignores_out_of_bounds_writes() {
    let mut sprite = Sprite::new("s", 4, 4, Background::Transparent);
    let layer_id = sprite.active_layer_id;
    sprite.set_pixel(layer_id, Coord::new(-1, 0), Color::rgb(1, 1, 1));
    sprite.set_pixel(layer_id, Coord::new(4, 0), Color::rgb(1, 1, 1));
    assert!(sprite.active_layer().unwrap().pixels.is_empty());
}

#[test]
fn locked_layer_rejects_mutation() {
    let mut sprite = Sprite::new("s", 4, 4, Background::Transparent);
    let layer_id = sprite.active_layer_id;
    sprite.set_pixel(layer_id, Coord::new(0, 0), Color::rgb(1, 1, 1));
    sprite.active_layer_mut().unwrap().locked = true;
    sprite.set_pixel(layer_id, Coord::new(1, 1), Color::rgb(1, 1, 1));
    sprite.clear_pixel(layer_id, Coord::new(0, 0));
    let layer = sprite.active_layer().unwrap();
    assert_eq!(layer.pixels.len(), 1);
    assert!(layer.pixels.contains(Coord::new(0, 0)));
}

#[test]
fn sprite_dimensions_are_clamped() {
    let sprite = Sprite::new("s", 0, 5000, Background::Transparent);
    assert_eq!((sprite.width, sprite.height), (1, 1024));
}
