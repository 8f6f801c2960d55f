use super::*;
use crate::foundation::core::Color;
use kurbo::PathEl;

fn cfg() -> StrokeConfig {
    StrokeConfig {
        smoothing: 0.0,
        ..StrokeConfig::default()
    }
}

#[test]
fn single_sample_finishes_as_degenerate_dot() {
    let stroke = StrokeBuilder::begin(cfg(), Sample::at(4.0, 4.0)).finish();
    let StrokeGeometry::Stroked { path, .. } = &stroke.geometry else {
        panic!("expected stroked geometry");
    };
    assert_eq!(path.elements().len(), 2);
}

#[test]
fn two_samples_without_smoothing_are_a_straight_line() {
    let mut b = StrokeBuilder::begin(cfg(), Sample::at(0.0, 0.0));
    assert!(b.push(Sample::at(10.0, 10.0)));
    let StrokeGeometry::Stroked { path, width } = b.preview() else {
        panic!("expected stroked geometry");
    };
    assert_eq!(width, 4.0);
    assert_eq!(
        path.elements(),
        &[
            PathEl::MoveTo(Point::new(0.0, 0.0)),
            PathEl::LineTo(Point::new(10.0, 10.0))
        ]
    );
}

#[test]
fn admission_filter_drops_close_samples() {
    let mut b = StrokeBuilder::begin(
        StrokeConfig {
            smoothing: 5.0,
            ..StrokeConfig::default()
        },
        Sample::at(0.0, 0.0),
    );
    assert!(!b.push(Sample::at(2.0, 2.0)));
    assert!(b.push(Sample::at(6.0, 0.0)));
    assert_eq!(b.raw_points().len(), 2);
}

#[test]
fn constrained_stroke_uses_exactly_two_points() {
    let mut b = StrokeBuilder::begin(
        StrokeConfig {
            constrained: true,
            ..cfg()
        },
        Sample::at(0.0, 0.0),
    );
    b.push(Sample::at(40.0, 3.0));
    b.push(Sample::at(100.0, 5.0));
    let working = b.working_points();
    assert_eq!(working.len(), 2);
    assert!(working[1].y.abs() < 1e-9);
    assert_eq!(b.raw_points().len(), 1);
}

#[test]
fn modifiers_can_toggle_mid_stroke() {
    let mut b = StrokeBuilder::begin(cfg(), Sample::at(0.0, 0.0));
    b.push(Sample::at(10.0, 1.0));
    assert!(b.constraint().is_none());
    b.set_modifiers(true, true);
    let c = b.constraint().unwrap();
    assert_eq!(c.end, Point::new(10.0, 10.0));
}

#[test]
fn tapered_pen_produces_filled_outline() {
    let mut b = StrokeBuilder::begin(
        StrokeConfig {
            taper: 1.0,
            ..cfg()
        },
        Sample::at(0.0, 0.0),
    );
    for i in 1..6 {
        b.push(Sample::at(f64::from(i) * 10.0, 0.0));
    }
    let stroke = b.finish();
    let StrokeGeometry::Filled { outline } = &stroke.geometry else {
        panic!("expected filled geometry");
    };
    assert!(matches!(outline.elements().last(), Some(PathEl::ClosePath)));
}

#[test]
fn eraser_ignores_taper_and_constraint() {
    let mut b = StrokeBuilder::begin(
        StrokeConfig {
            tool: Tool::Eraser,
            taper: 1.0,
            constrained: true,
            smoothing: 0.0,
            color: Color::WHITE,
            ..StrokeConfig::default()
        },
        Sample::at(0.0, 0.0),
    );
    assert!(b.push(Sample::at(5.0, 1.0)));
    assert!(b.push(Sample::at(9.0, 7.0)));
    assert!(b.constraint().is_none());
    let stroke = b.finish();
    assert!(stroke.is_eraser());
    assert!(matches!(stroke.geometry, StrokeGeometry::Stroked { .. }));
}

#[test]
fn eraser_admits_close_samples_regardless_of_smoothing() {
    let mut b = StrokeBuilder::begin(
        StrokeConfig {
            tool: Tool::Eraser,
            smoothing: 10.0,
            ..StrokeConfig::default()
        },
        Sample::at(0.0, 0.0),
    );
    assert!(b.push(Sample::at(1.0, 0.0)));
    assert!(b.push(Sample::at(2.0, 0.5)));
    assert!(!b.push(Sample::at(2.0, 0.5)));
    assert_eq!(b.raw_points().len(), 3);
}

#[test]
fn pressure_is_recorded_per_admitted_point() {
    let mut b = StrokeBuilder::begin(
        cfg(),
        Sample {
            point: Point::new(0.0, 0.0),
            pressure: Some(0.3),
        },
    );
    b.push(Sample {
        point: Point::new(3.0, 0.0),
        pressure: Some(0.8),
    });
    assert_eq!(b.pressures(), &[Some(0.3), Some(0.8)]);
}

#[test]
fn sanitized_config_clamps_taper_and_width() {
    let b = StrokeBuilder::begin(
        StrokeConfig {
            taper: 3.0,
            base_width: -1.0,
            smoothing: f64::NAN,
            ..StrokeConfig::default()
        },
        Sample::at(0.0, 0.0),
    );
    assert_eq!(b.config().taper, 1.0);
    assert_eq!(b.config().base_width, 1.0);
    assert_eq!(b.config().smoothing, 0.0);
}
