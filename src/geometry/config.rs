use crate::{
    foundation::core::{Color, Point},
    stroke::model::Tool,
};

#[derive(Clone, Copy, Debug, PartialEq)]
/// One raw pointer sample captured while the pointer is down.
pub struct Sample {
    /// Canvas-space position (already scaled from viewport coordinates).
    pub point: Point,
    /// Pen pressure in `[0, 1]`, when the device reports one.
    pub pressure: Option<f64>,
}

impl Sample {
    /// Sample without pressure information.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            point: Point::new(x, y),
            pressure: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Brush configuration captured when a stroke begins.
pub struct StrokeConfig {
    /// Active tool.
    pub tool: Tool,
    /// Paint color.
    pub color: Color,
    /// Nominal line width.
    pub base_width: f64,
    /// Minimum admission distance and smoothing strength (`>= 0`).
    pub smoothing: f64,
    /// Taper strength in `[0, 1]`; zero draws a constant-width line.
    pub taper: f64,
    /// Constrain to a straight 45-degree line or a square-boxed circle.
    pub constrained: bool,
    /// Treat a constrained stroke as circle intent regardless of aspect ratio.
    pub force_circle: bool,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            tool: Tool::Pen,
            color: Color::BLACK,
            base_width: 4.0,
            smoothing: 2.0,
            taper: 0.0,
            constrained: false,
            force_circle: false,
        }
    }
}

impl StrokeConfig {
    /// Copy with out-of-range values pulled back into their domains.
    pub fn sanitized(self) -> Self {
        Self {
            base_width: if self.base_width.is_finite() && self.base_width > 0.0 {
                self.base_width
            } else {
                1.0
            },
            smoothing: if self.smoothing.is_finite() {
                self.smoothing.max(0.0)
            } else {
                0.0
            },
            taper: if self.taper.is_finite() {
                self.taper.clamp(0.0, 1.0)
            } else {
                0.0
            },
            ..self
        }
    }
}
