use crate::{
    foundation::core::Point,
    geometry::{
        config::{Sample, StrokeConfig},
        constrain::{Constraint, resolve_constraint},
        path::{eraser_path, tapered_outline, uniform_path},
        smooth::{admits, smooth_points},
    },
    stroke::model::{Paint, Stroke, StrokeGeometry, Tool},
};

/// Incremental stroke construction from pointer samples.
///
/// A builder lives from pointer-down to pointer-up. Every admitted sample updates the
/// preview geometry; [`StrokeBuilder::finish`] produces the committed [`Stroke`].
#[derive(Clone, Debug)]
pub struct StrokeBuilder {
    config: StrokeConfig,
    points: Vec<Point>,
    pressures: Vec<Option<f64>>,
    latest: Point,
}

impl StrokeBuilder {
    /// Start a stroke at the pointer-down sample.
    pub fn begin(config: StrokeConfig, sample: Sample) -> Self {
        Self {
            config: config.sanitized(),
            points: vec![sample.point],
            pressures: vec![sample.pressure],
            latest: sample.point,
        }
    }

    /// Configuration the stroke is being built with.
    pub fn config(&self) -> &StrokeConfig {
        &self.config
    }

    /// Update the constraint modifiers mid-stroke (for example a held shift key).
    pub fn set_modifiers(&mut self, constrained: bool, force_circle: bool) {
        self.config.constrained = constrained;
        self.config.force_circle = force_circle;
    }

    fn is_constrained(&self) -> bool {
        self.config.constrained && self.config.tool == Tool::Pen
    }

    /// Feed a pointer-move sample. Returns whether it was admitted into the point list.
    pub fn push(&mut self, sample: Sample) -> bool {
        self.latest = sample.point;
        if self.is_constrained() {
            return false;
        }
        // Erasers keep raw samples, dropping only exact repeats.
        let min_distance = match self.config.tool {
            Tool::Pen => self.config.smoothing,
            Tool::Eraser => 0.0,
        };
        if !admits(self.points.last().copied(), sample.point, min_distance) {
            return false;
        }
        self.points.push(sample.point);
        self.pressures.push(sample.pressure);
        true
    }

    /// Admitted raw points so far.
    pub fn raw_points(&self) -> &[Point] {
        &self.points
    }

    /// Pressures recorded alongside [`StrokeBuilder::raw_points`].
    pub fn pressures(&self) -> &[Option<f64>] {
        &self.pressures
    }

    /// Resolved constraint, when the stroke is a constrained pen stroke.
    pub fn constraint(&self) -> Option<Constraint> {
        if !self.is_constrained() {
            return None;
        }
        Some(resolve_constraint(
            self.points[0],
            self.latest,
            self.config.force_circle,
        ))
    }

    /// Points fed into path synthesis after constraint resolution and smoothing.
    pub fn working_points(&self) -> Vec<Point> {
        if let Some(c) = self.constraint() {
            return vec![c.start, c.end];
        }
        match self.config.tool {
            Tool::Eraser => self.points.clone(),
            Tool::Pen => smooth_points(&self.points, self.config.smoothing),
        }
    }

    /// Geometry for the current state of the stroke.
    pub fn preview(&self) -> StrokeGeometry {
        let points = self.working_points();
        let cfg = &self.config;
        match cfg.tool {
            Tool::Eraser => StrokeGeometry::Stroked {
                path: eraser_path(&points),
                width: cfg.base_width,
            },
            Tool::Pen if cfg.taper > 0.0 => StrokeGeometry::Filled {
                outline: tapered_outline(&points, cfg.base_width, cfg.taper),
            },
            Tool::Pen => StrokeGeometry::Stroked {
                path: uniform_path(&points),
                width: cfg.base_width,
            },
        }
    }

    /// Finalize at pointer-up.
    pub fn finish(self) -> Stroke {
        let geometry = self.preview();
        tracing::trace!(
            points = self.points.len(),
            tool = ?self.config.tool,
            "stroke finished"
        );
        Stroke {
            geometry,
            paint: Paint {
                color: self.config.color,
                tool: self.config.tool,
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/builder.rs"]
mod tests;
