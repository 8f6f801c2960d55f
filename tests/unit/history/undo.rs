use super::*;
use crate::{
    foundation::core::{BezPath, Color, Point},
    stroke::model::{Paint, Stroke, Tool},
};

fn stroke(x: f64) -> Stroke {
    let mut path = BezPath::new();
    path.move_to(Point::new(x, 0.0));
    path.line_to(Point::new(x, 10.0));
    Stroke::stroked(
        path,
        2.0,
        Paint {
            color: Color::BLACK,
            tool: Tool::Pen,
        },
    )
}

fn commit(log: &mut UndoLog, p: &mut Project, x: f64) {
    log.snapshot(p).unwrap();
    log.clear_redo();
    let l = p.current_layer_id();
    let f = p.current_frame();
    p.commit_stroke(l, f, stroke(x)).unwrap();
}

#[test]
fn undo_then_redo_reproduces_frames() {
    let mut p = Project::default();
    let l = p.current_layer_id();
    let mut log = UndoLog::default();
    for i in 0..10 {
        commit(&mut log, &mut p, f64::from(i));
    }
    let after = p.layer(l).unwrap().frames().to_vec();

    for _ in 0..10 {
        assert!(log.undo(&mut p).unwrap());
    }
    assert!(p.layer(l).unwrap().frames()[0].strokes().is_empty());
    assert!(!log.undo(&mut p).unwrap());

    for _ in 0..10 {
        assert!(log.redo(&mut p).unwrap());
    }
    assert_eq!(p.layer(l).unwrap().frames(), after.as_slice());
    assert!(!log.redo(&mut p).unwrap());
}

#[test]
fn cap_evicts_oldest_snapshots() {
    let mut p = Project::default();
    let l = p.current_layer_id();
    let mut log = UndoLog::new(3);
    for i in 0..5 {
        commit(&mut log, &mut p, f64::from(i));
    }
    assert_eq!(log.undo_len(), 3);
    while log.undo(&mut p).unwrap() {}
    // Oldest two commits are no longer undoable.
    assert_eq!(p.layer(l).unwrap().frames()[0].strokes().len(), 2);
}

#[test]
fn new_authoring_clears_redo() {
    let mut p = Project::default();
    let mut log = UndoLog::default();
    commit(&mut log, &mut p, 0.0);
    commit(&mut log, &mut p, 1.0);
    log.undo(&mut p).unwrap();
    assert!(log.can_redo());
    commit(&mut log, &mut p, 2.0);
    assert!(!log.can_redo());
}

#[test]
fn undo_moves_cursor_to_snapshot_coordinate() {
    let mut p = Project::default();
    let a = p.current_layer_id();
    let mut log = UndoLog::default();
    commit(&mut log, &mut p, 0.0);

    let b = p.add_layer(None);
    p.add_frame(b, 0).unwrap();
    assert_eq!(p.current_layer_id(), b);
    assert_eq!(p.current_frame(), 1);

    log.undo(&mut p).unwrap();
    assert_eq!(p.current_layer_id(), a);
    assert_eq!(p.current_frame(), 0);
}

#[test]
fn undo_follows_frame_after_earlier_frame_is_deleted() {
    let mut p = Project::default();
    let l = p.current_layer_id();
    let mut log = UndoLog::default();
    p.add_frame(l, 0).unwrap();
    commit(&mut log, &mut p, 0.0);
    assert_eq!(p.layer(l).unwrap().frames()[1].strokes().len(), 1);

    // The snapshotted frame shifts from index 1 to 0 but keeps its id.
    p.delete_frame(l, 0).unwrap();
    assert!(log.undo(&mut p).unwrap());
    assert!(p.layer(l).unwrap().frames()[0].strokes().is_empty());
    assert_eq!(p.current_frame(), 0);
}

#[test]
fn snapshot_of_deleted_frame_is_discarded() {
    let mut p = Project::default();
    let l = p.current_layer_id();
    let mut log = UndoLog::default();
    p.add_frame(l, 0).unwrap();
    commit(&mut log, &mut p, 0.0);
    p.delete_frame(l, 1).unwrap();
    assert!(!log.undo(&mut p).unwrap());
    assert!(!log.can_undo());
}

#[test]
fn snapshot_on_hold_frame_captures_source() {
    let mut p = Project::default();
    let l = p.current_layer_id();
    let mut log = UndoLog::default();
    commit(&mut log, &mut p, 0.0);
    let hold = p.add_hold(l, 0).unwrap();
    p.set_current_frame(hold);
    commit(&mut log, &mut p, 1.0);
    assert_eq!(p.layer(l).unwrap().frames()[0].strokes().len(), 2);
    log.undo(&mut p).unwrap();
    assert_eq!(p.layer(l).unwrap().frames()[0].strokes().len(), 1);
    assert_eq!(p.current_frame(), 0);
}
