use std::{cell::RefCell, rc::Rc, time::Duration};

use super::*;
use crate::{
    foundation::error::FrameinkError,
    persist::storage::MemoryStore,
    stroke::model::Tool,
};

#[derive(Clone, Default)]
struct SharedStore {
    saves: Rc<RefCell<Vec<String>>>,
    failing: Rc<RefCell<bool>>,
}

impl ProjectStore for SharedStore {
    fn load(&self) -> FrameinkResult<Option<String>> {
        Ok(self.saves.borrow().last().cloned())
    }

    fn save(&mut self, json: &str) -> FrameinkResult<()> {
        if *self.failing.borrow() {
            return Err(FrameinkError::Other(anyhow::anyhow!("quota exceeded")));
        }
        self.saves.borrow_mut().push(json.to_owned());
        Ok(())
    }
}

fn session() -> (Session, SharedStore) {
    let store = SharedStore::default();
    let s = Session::open(EditorSettings::default(), Box::new(store.clone()));
    (s, store)
}

fn draw(s: &mut Session, y: f64) -> Option<usize> {
    s.pointer_down(Sample::at(0.0, y));
    for i in 1..=10 {
        s.pointer_move(Sample::at(f64::from(i) * 10.0, y));
    }
    s.pointer_up().unwrap()
}

#[test]
fn stroke_flow_commits_snapshots_and_saves() {
    let (mut s, store) = session();
    assert!(!s.is_drawing());
    assert!(s.pointer_move(Sample::at(1.0, 1.0)).is_none());

    s.pointer_down(Sample::at(0.0, 0.0));
    assert!(s.is_drawing());
    let preview = s.pointer_move(Sample::at(50.0, 0.0)).unwrap();
    assert!(matches!(preview, StrokeGeometry::Stroked { .. }));
    assert_eq!(s.pointer_up().unwrap(), Some(0));

    assert_eq!(s.project().current_layer().frames()[0].strokes().len(), 1);
    assert!(s.history().can_undo());
    assert_eq!(store.saves.borrow().len(), 1);
    assert!(!s.is_dirty());
    assert_eq!(s.pointer_up().unwrap(), None);
}

#[test]
fn undo_redo_round_trip_through_session() {
    let (mut s, _) = session();
    draw(&mut s, 10.0);
    draw(&mut s, 20.0);
    let two = s.project().current_layer().frames()[0].clone();

    assert!(s.undo().unwrap());
    assert_eq!(s.project().current_layer().frames()[0].strokes().len(), 1);
    assert!(s.redo().unwrap());
    assert_eq!(s.project().current_layer().frames()[0], two);

    assert!(s.undo().unwrap());
    draw(&mut s, 30.0);
    assert!(!s.history().can_redo());
}

#[test]
fn clear_is_undoable() {
    let (mut s, _) = session();
    draw(&mut s, 10.0);
    assert_eq!(s.clear_current_frame().unwrap(), 0);
    assert!(s.project().current_layer().frames()[0].strokes().is_empty());
    s.undo().unwrap();
    assert_eq!(s.project().current_layer().frames()[0].strokes().len(), 1);
}

#[test]
fn drawing_on_a_hold_frame_writes_its_source() {
    let (mut s, _) = session();
    s.add_hold().unwrap();
    s.set_current_frame(1);
    assert_eq!(draw(&mut s, 10.0), Some(0));
    let layer = s.project().current_layer();
    assert_eq!(layer.frames()[0].strokes().len(), 1);
    assert!(layer.frames()[1].strokes().is_empty());
    assert_eq!(s.render().layers[0].strokes.len(), 1);
}

#[test]
fn commit_past_the_layer_end_is_rejected_cleanly() {
    let (mut s, _) = session();
    let first = s.project().current_layer_id();
    s.add_frame().unwrap();
    s.add_layer(None);
    s.set_current_frame(1);
    assert_ne!(s.project().current_layer_id(), first);

    s.pointer_down(Sample::at(0.0, 0.0));
    s.pointer_move(Sample::at(40.0, 0.0));
    let err = s.pointer_up().unwrap_err();
    assert!(err.is_user_rejection());
    assert!(!s.history().can_undo());
    assert!(!s.is_drawing());
}

#[test]
fn brush_changes_apply_to_the_next_stroke() {
    let (mut s, _) = session();
    s.set_brush(StrokeConfig {
        tool: Tool::Eraser,
        base_width: -3.0,
        ..StrokeConfig::default()
    });
    assert_eq!(s.brush().base_width, 1.0);
    draw(&mut s, 5.0);
    let stroke = &s.project().current_layer().frames()[0].strokes()[0];
    assert!(stroke.is_eraser());
}

#[test]
fn pointer_down_stops_playback() {
    let (mut s, _) = session();
    s.add_frame().unwrap();
    let tick = s.play().unwrap();
    assert!(s.is_playing());
    s.pointer_down(Sample::at(0.0, 0.0));
    assert!(!s.is_playing());
    let mut sink = |_: &RenderPlan| -> FrameinkResult<()> { Ok(()) };
    assert!(s.on_tick(tick, &mut sink).unwrap().is_none());
}

#[test]
fn playback_advances_and_fps_restarts() {
    let (mut s, _) = session();
    s.add_frame().unwrap();
    s.add_frame().unwrap();
    s.set_current_frame(0);
    let mut frames = Vec::new();
    let mut sink = |p: &RenderPlan| -> FrameinkResult<()> {
        frames.push(p.frame);
        Ok(())
    };
    let tick = s.play().unwrap();
    let tick = s.on_tick(tick, &mut sink).unwrap().unwrap();
    let restarted = s.set_fps(24).unwrap().unwrap();
    assert!(s.on_tick(tick, &mut sink).unwrap().is_none());
    s.on_tick(restarted, &mut sink).unwrap().unwrap();
    assert!(s.stop());
    drop(sink);
    assert_eq!(frames, vec![1, 2]);
    assert_eq!(s.project().fps.0, 24);
}

#[test]
fn failed_saves_keep_editing_and_retry_on_autosave() {
    let (mut s, store) = session();
    *store.failing.borrow_mut() = true;
    draw(&mut s, 10.0);
    assert!(s.is_dirty());
    assert_eq!(s.project().current_layer().frames()[0].strokes().len(), 1);

    *store.failing.borrow_mut() = false;
    assert!(s.autosave(Instant::now()));
    assert!(!s.is_dirty());
    assert_eq!(store.saves.borrow().len(), 1);
}

#[test]
fn autosave_waits_for_the_interval() {
    let (mut s, store) = session();
    s.add_layer(None);
    let saved_at = Instant::now();
    s.set_current_frame(0);
    assert!(s.is_dirty());

    assert!(!s.autosave(saved_at));
    let later = saved_at + s.settings().autosave_interval + Duration::from_secs(1);
    assert!(s.autosave(later));
    assert_eq!(store.saves.borrow().len(), 2);
    assert!(!s.autosave(later));
}

#[test]
fn reopening_restores_the_saved_project() {
    let (mut s, store) = session();
    draw(&mut s, 10.0);
    s.add_layer(Some("Ink".to_owned()));

    let reopened = Session::open(EditorSettings::default(), Box::new(store));
    assert_eq!(reopened.project().layers().len(), 2);
    assert_eq!(reopened.project().current_layer().name, "Ink");
}

#[test]
fn malformed_import_changes_nothing() {
    let (mut s, _) = session();
    draw(&mut s, 10.0);
    let before = s.project().clone();
    assert!(s.import_json("{\"version\": \"2.0\", \"layers\": []}").is_err());
    assert_eq!(s.project(), &before);
    assert!(s.history().can_undo());

    let json = s.export_json().unwrap();
    let mut other = Session::with_project(
        Project::default(),
        EditorSettings::default(),
        Box::new(MemoryStore::new()),
    );
    other.import_json(&json).unwrap();
    assert_eq!(other.project().current_layer().frames()[0].strokes().len(), 1);
    assert!(!other.history().can_undo());
}

#[test]
fn new_projects_use_the_configured_canvas() {
    let settings = EditorSettings {
        canvas: crate::foundation::core::Canvas::new(320, 200).unwrap(),
        ..EditorSettings::default()
    };
    let s = Session::open(settings, Box::new(MemoryStore::new()));
    assert_eq!(s.project().canvas.width, 320);
}
