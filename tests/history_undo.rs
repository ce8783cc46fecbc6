use pixo::canvas::{Background, Color, Coord, Sprite};
use pixo::components::history::{HistoryEntry, HistoryLog, HISTORY_CAPACITY};
use pixo::project::Document;

const INK: Color = Color::rgb(0, 0, 0);
const ALT: Color = Color::rgb(255, 255, 255);

fn sprite() -> Sprite {
    Sprite::new("h", 8, 8, Background::Transparent)
}

/// Snapshot the active layer, then run `mutate`.
fn record(sprite: &mut Sprite, log: &mut HistoryLog, mutate: impl FnOnce(&mut Sprite)) {
    let entry = HistoryEntry::snapshot(sprite, sprite.active_layer_id).unwrap();
    log.push(entry);
    mutate(sprite);
}

#[test]
fn undo_restores_the_exact_pre_mutation_grid() {
    let mut sprite = sprite();
    let id = sprite.active_layer_id;
    sprite.set_pixel(id, Coord::new(0, 0), INK);
    let before = sprite.active_layer().unwrap().pixels.clone();

    let mut log = HistoryLog::new();
    record(&mut sprite, &mut log, |s| {
        let id = s.active_layer_id;
        s.set_pixel(id, Coord::new(1, 1), ALT);
        s.clear_pixel(id, Coord::new(0, 0));
    });
    assert_ne!(sprite.active_layer().unwrap().pixels, before);

    assert!(log.undo(&mut sprite));
    assert_eq!(sprite.active_layer().unwrap().pixels, before);
}

#[test]
fn redo_restores_the_post_mutation_grid() {
    let mut sprite = sprite();
    let mut log = HistoryLog::new();
    record(&mut sprite, &mut log, |s| {
        let id = s.active_layer_id;
        s.set_pixel(id, Coord::new(2, 2), INK);
    });
    let after = sprite.active_layer().unwrap().pixels.clone();

    assert!(log.undo(&mut sprite));
    assert!(sprite.active_layer().unwrap().pixels.is_empty());
    assert!(log.redo(&mut sprite));
    assert_eq!(sprite.active_layer().unwrap().pixels, after);
}

#[test]
fn undo_and_redo_refuse_at_the_ends() {
    let mut sprite = sprite();
    let mut log = HistoryLog::new();
    assert!(!log.undo(&mut sprite));
    assert!(!log.redo(&mut sprite));

    record(&mut sprite, &mut log, |s| {
        let id = s.active_layer_id;
        s.set_pixel(id, Coord::new(0, 0), INK);
    });
    assert!(!log.redo(&mut sprite));
    assert!(log.undo(&mut sprite));
    assert!(!log.undo(&mut sprite));
}

#[test]
fn pushing_after_undo_discards_the_redo_tail() {
    let mut sprite = sprite();
    let mut log = HistoryLog::new();
    record(&mut sprite, &mut log, |s| {
        let id = s.active_layer_id;
        s.set_pixel(id, Coord::new(0, 0), INK);
    });
    record(&mut sprite, &mut log, |s| {
        let id = s.active_layer_id;
        s.set_pixel(id, Coord::new(1, 0), INK);
    });
    assert_eq!(log.len(), 2);

    assert!(log.undo(&mut sprite));
    assert!(log.can_redo());

    record(&mut sprite, &mut log, |s| {
        let id = s.active_layer_id;
        s.set_pixel(id, Coord::new(2, 0), ALT);
    });
    assert_eq!(log.len(), 2);
    assert!(!log.can_redo());
}

#[test]
fn capacity_evicts_the_oldest_entries() {
    let mut sprite = sprite();
    let mut log = HistoryLog::new();
    for i in 0..(HISTORY_CAPACITY + 5) {
        record(&mut sprite, &mut log, |s| {
            let id = s.active_layer_id;
            s.set_pixel(id, Coord::new((i % 8) as i32, (i / 8) as i32), INK);
        });
    }
    assert_eq!(log.len(), HISTORY_CAPACITY);

    // Only the newest HISTORY_CAPACITY states are reachable.
    let mut steps = 0;
    while log.undo(&mut sprite) {
        steps += 1;
    }
    assert_eq!(steps, HISTORY_CAPACITY);
}

#[test]
fn undo_skips_entries_for_deleted_layers() {
    let mut sprite = sprite();
    let extra = pixo::ops::canvas_ops::add_layer(&mut sprite);
    let mut log = HistoryLog::new();
    log.push(HistoryEntry::snapshot(&sprite, extra).unwrap());
    sprite.set_pixel(extra, Coord::new(0, 0), INK);

    pixo::ops::canvas_ops::remove_layer(&mut sprite, extra);
    assert!(!log.undo(&mut sprite));
}

#[test]
fn document_undo_marks_it_dirty() {
    let mut doc = Document::new_untitled("d", 8, 8, Background::Transparent);
    let id = doc.sprite.active_layer_id;
    doc.history
        .push(HistoryEntry::snapshot(&doc.sprite, id).unwrap());
    doc.sprite.set_pixel(id, Coord::new(0, 0), INK);
    doc.is_dirty = false;

    assert!(doc.undo());
    assert!(doc.is_dirty);
    assert_eq!(doc.display_title(), "d*");

    assert!(doc.redo());
    assert_eq!(
        doc.sprite.active_layer().unwrap().pixels.get(Coord::new(0, 0)),
        Some(INK)
    );
}

#[test]
fn clear_resets_both_directions() {
    let mut sprite = sprite();
    let mut log = HistoryLog::new();
    record(&mut sprite, &mut log, |s| {
        let id = s.active_layer_id;
        s.set_pixel(id, Coord::new(0, 0), INK);
    });
    log.clear();
    assert!(!log.can_undo());
    assert!(!log.can_redo());
    assert!(log.is_empty());
}
