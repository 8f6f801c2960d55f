use super::*;
use crate::{
    foundation::core::{BezPath, Point},
    stroke::model::{Paint, StrokeGeometry, Tool},
    timeline::model::LayerId,
};

fn stroke(x: f64, color: Color) -> Stroke {
    let mut path = BezPath::new();
    path.move_to(Point::new(x, 0.0));
    path.line_to(Point::new(x, 10.0));
    Stroke::stroked(
        path,
        2.0,
        Paint {
            color,
            tool: Tool::Pen,
        },
    )
}

/// Two layers; `a` has 4 frames with one stroke each, `b` has 2 frames.
fn project() -> (Project, LayerId, LayerId) {
    let mut p = Project::default();
    let a = p.current_layer_id();
    for i in 0..3 {
        p.add_frame(a, i).unwrap();
    }
    for i in 0..4 {
        p.commit_stroke(a, i, stroke(i as f64, Color::BLACK)).unwrap();
    }
    let b = p.add_layer(None);
    p.add_frame(b, 0).unwrap();
    p.commit_stroke(b, 0, stroke(50.0, Color::BLACK)).unwrap();
    p.commit_stroke(b, 1, stroke(51.0, Color::BLACK)).unwrap();
    p.set_current_frame(0);
    (p, a, b)
}

#[test]
fn layers_are_emitted_bottom_to_top() {
    let (p, a, b) = project();
    let plan = render(&p, 1);
    let ids: Vec<_> = plan.layers.iter().map(|l| l.layer_id).collect();
    assert_eq!(ids, vec![a, b]);
    assert_eq!(plan.layers[0].strokes, vec![stroke(1.0, Color::BLACK)]);
    assert_eq!(plan.layers[1].strokes, vec![stroke(51.0, Color::BLACK)]);
}

#[test]
fn hidden_layer_keeps_a_placeholder() {
    let (mut p, a, _) = project();
    p.set_layer_visible(a, false).unwrap();
    let plan = render(&p, 0);
    assert_eq!(plan.layers.len(), 2);
    assert!(!plan.layers[0].visible);
    assert_eq!(plan.layers[0].opacity, 0.0);
    assert!(plan.layers[0].strokes.is_empty());
    assert_eq!(plan.visible_layers().count(), 1);
}

#[test]
fn short_layer_contributes_nothing_past_its_end() {
    let (p, _, b) = project();
    let plan = render(&p, 3);
    let entry = plan.layers.iter().find(|l| l.layer_id == b).unwrap();
    assert!(entry.strokes.is_empty());
    assert_eq!(entry.source_frame, None);
}

#[test]
fn hold_frames_render_their_source() {
    let (mut p, a, _) = project();
    p.add_hold(a, 1).unwrap();
    let plan = render(&p, 2);
    assert_eq!(plan.layers[0].source_frame, Some(1));
    assert_eq!(plan.layers[0].strokes, vec![stroke(1.0, Color::BLACK)]);
}

#[test]
fn background_layer_shows_frame_zero_everywhere() {
    let (mut p, _, b) = project();
    p.set_background_layer(b, true).unwrap();
    for playhead in [0, 1, p.max_frames() - 1] {
        let plan = render(&p, playhead);
        let entry = plan.layers.iter().find(|l| l.layer_id == b).unwrap();
        assert_eq!(entry.strokes, vec![stroke(50.0, Color::BLACK)]);
    }
}

#[test]
fn ghost_opacity_falls_off_to_half() {
    assert!((ghost_opacity(40.0, 1, 3) - 0.4).abs() < 1e-12);
    assert!((ghost_opacity(40.0, 2, 3) - 0.4 * (1.0 - 0.5 / 3.0)).abs() < 1e-12);
    assert!((ghost_opacity(40.0, 3, 3) - 0.4 * (1.0 - 1.0 / 3.0)).abs() < 1e-12);
    assert_eq!(ghost_opacity(40.0, 1, 0), 0.0);
}

#[test]
fn onion_skin_disabled_yields_no_ghosts() {
    let (p, _, _) = project();
    assert!(render(&p, 2).ghosts.is_empty());
}

#[test]
fn ghosts_are_tinted_and_stop_at_bounds() {
    let (mut p, a, b) = project();
    p.onion_skin_enabled = true;
    p.onion_skin = OnionSkinSettings {
        frames_before: 3,
        frames_after: 3,
        ..OnionSkinSettings::default()
    };
    let plan = render(&p, 1);

    let before_a: Vec<_> = plan
        .ghosts
        .iter()
        .filter(|g| g.layer_id == a && g.offset < 0)
        .collect();
    assert_eq!(before_a.len(), 1);
    assert_eq!(before_a[0].offset, -1);
    assert_eq!(
        before_a[0].strokes,
        vec![stroke(0.0, p.onion_skin.before_color)]
    );

    let after_a: Vec<_> = plan
        .ghosts
        .iter()
        .filter(|g| g.layer_id == a && g.offset > 0)
        .map(|g| g.offset)
        .collect();
    assert_eq!(after_a, vec![1, 2]);

    // Layer b has no frame 2, so its after side stops immediately.
    assert!(
        plan.ghosts
            .iter()
            .all(|g| g.layer_id != b || g.offset == -1)
    );
}

#[test]
fn playhead_far_past_the_end_renders_nothing() {
    let (mut p, _, _) = project();
    p.onion_skin_enabled = true;
    p.onion_skin = OnionSkinSettings {
        frames_before: 2,
        frames_after: 2,
        ..OnionSkinSettings::default()
    };
    let plan = render(&p, usize::MAX);
    assert!(plan.ghosts.is_empty());
    assert!(plan.layers.iter().all(|l| l.strokes.is_empty()));
}

#[test]
fn zero_depth_disables_a_side() {
    let (mut p, _, _) = project();
    p.onion_skin_enabled = true;
    p.onion_skin = OnionSkinSettings {
        frames_before: 0,
        frames_after: 2,
        ..OnionSkinSettings::default()
    };
    let plan = render(&p, 2);
    assert!(plan.ghosts.iter().all(|g| g.offset > 0));
}

#[test]
fn background_and_hidden_layers_are_never_ghosted() {
    let (mut p, a, b) = project();
    p.onion_skin_enabled = true;
    p.set_background_layer(b, true).unwrap();
    p.set_layer_visible(a, false).unwrap();
    let plan = render(&p, 1);
    assert!(plan.ghosts.is_empty());
}

#[test]
fn recolor_changes_fill_of_filled_strokes_and_keeps_order() {
    let (mut p, a, _) = project();
    let mut outline = BezPath::new();
    outline.move_to(Point::new(0.0, 0.0));
    outline.line_to(Point::new(5.0, 0.0));
    outline.line_to(Point::new(5.0, 5.0));
    outline.close_path();
    p.commit_stroke(
        a,
        0,
        Stroke::filled(
            outline,
            Paint {
                color: Color::BLACK,
                tool: Tool::Pen,
            },
        ),
    )
    .unwrap();
    p.onion_skin_enabled = true;
    let plan = render(&p, 1);
    let ghost = plan
        .ghosts
        .iter()
        .find(|g| g.layer_id == a && g.offset == -1)
        .unwrap();
    assert_eq!(ghost.strokes.len(), 2);
    assert!(matches!(ghost.strokes[0].geometry, StrokeGeometry::Stroked { .. }));
    assert!(matches!(ghost.strokes[1].geometry, StrokeGeometry::Filled { .. }));
    assert!(
        ghost
            .strokes
            .iter()
            .all(|s| s.paint.color == p.onion_skin.before_color)
    );
}

#[test]
fn export_render_never_has_ghosts() {
    let (mut p, _, _) = project();
    p.onion_skin_enabled = true;
    assert!(render_for_export(&p, 1).ghosts.is_empty());
    assert!(!render(&p, 1).ghosts.is_empty());
}
