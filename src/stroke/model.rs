use crate::foundation::{
    core::{BezPath, Color},
    error::FrameinkError,
};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
/// Drawing tool that produced a stroke.
pub enum Tool {
    /// Paints color on top of what is beneath.
    #[default]
    Pen,
    /// Removes what is beneath it within the same layer.
    Eraser,
}

#[derive(Clone, Debug, PartialEq)]
/// The two mutually exclusive path representations of a stroke.
pub enum StrokeGeometry {
    /// A centerline curve painted with a constant width.
    Stroked {
        /// Centerline path.
        path: BezPath,
        /// Line width in canvas units.
        width: f64,
    },
    /// A closed outline filled with the paint color (tapered brush).
    Filled {
        /// Closed outline path.
        outline: BezPath,
    },
}

impl StrokeGeometry {
    /// The path that is drawn, whichever representation this is.
    pub fn path(&self) -> &BezPath {
        match self {
            Self::Stroked { path, .. } => path,
            Self::Filled { outline } => outline,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Paint attributes of a stroke.
pub struct Paint {
    /// Stroke color for [`StrokeGeometry::Stroked`], fill color for [`StrokeGeometry::Filled`].
    pub color: Color,
    /// Tool that produced the stroke.
    pub tool: Tool,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(into = "StrokeRecord", try_from = "StrokeRecord")]
/// One committed drawing action. Immutable once committed.
pub struct Stroke {
    /// Path geometry.
    pub geometry: StrokeGeometry,
    /// Paint attributes.
    pub paint: Paint,
}

impl Stroke {
    /// Build a constant-width centerline stroke.
    pub fn stroked(path: BezPath, width: f64, paint: Paint) -> Self {
        Self {
            geometry: StrokeGeometry::Stroked { path, width },
            paint,
        }
    }

    /// Build a filled-outline stroke.
    pub fn filled(outline: BezPath, paint: Paint) -> Self {
        Self {
            geometry: StrokeGeometry::Filled { outline },
            paint,
        }
    }

    /// True when the stroke erases instead of painting.
    pub fn is_eraser(&self) -> bool {
        self.paint.tool == Tool::Eraser
    }

    /// Copy of this stroke painted with `color`. Eraser strokes are returned unchanged.
    pub fn recolored(&self, color: Color) -> Self {
        let mut out = self.clone();
        if !self.is_eraser() {
            out.paint.color = color;
        }
        out
    }

    /// Persisted record form of this stroke.
    pub fn to_record(&self) -> StrokeRecord {
        let color = self.paint.color.to_hex();
        match &self.geometry {
            StrokeGeometry::Stroked { path, width } => StrokeRecord {
                path_data: path.to_svg(),
                stroke: color,
                stroke_width: Some(*width),
                fill: NONE.to_string(),
                tool: self.paint.tool,
            },
            StrokeGeometry::Filled { outline } => StrokeRecord {
                path_data: outline.to_svg(),
                stroke: NONE.to_string(),
                stroke_width: None,
                fill: color,
                tool: self.paint.tool,
            },
        }
    }
}

const NONE: &str = "none";

/// SVG's initial `stroke-width`, used when a stroked record omits its width.
const DEFAULT_RECORD_WIDTH: f64 = 1.0;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Persisted per-stroke record (`pathData`, `stroke`, `strokeWidth`, `fill`, `tool`).
pub struct StrokeRecord {
    /// SVG path data.
    pub path_data: String,
    /// Stroke color or `"none"`.
    pub stroke: String,
    /// Stroke width; absent for filled strokes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    /// Fill color or `"none"`.
    pub fill: String,
    /// Tool that produced the stroke.
    #[serde(default)]
    pub tool: Tool,
}

impl From<Stroke> for StrokeRecord {
    fn from(s: Stroke) -> Self {
        s.to_record()
    }
}

impl TryFrom<StrokeRecord> for Stroke {
    type Error = FrameinkError;

    fn try_from(r: StrokeRecord) -> Result<Self, Self::Error> {
        let path = BezPath::from_svg(&r.path_data)
            .map_err(|e| FrameinkError::serde(format!("invalid pathData: {e}")))?;
        let fill = r.fill.trim();
        let stroke = r.stroke.trim();

        if !fill.is_empty() && fill != NONE && r.tool == Tool::Pen {
            let color = Color::parse(fill)?;
            return Ok(Self::filled(
                path,
                Paint {
                    color,
                    tool: r.tool,
                },
            ));
        }
        if stroke.is_empty() || stroke == NONE {
            return Err(FrameinkError::serde(
                "stroke record has neither a fill nor a stroke color",
            ));
        }
        let color = Color::parse(stroke)?;
        let width = r
            .stroke_width
            .filter(|w| w.is_finite() && *w > 0.0)
            .unwrap_or(DEFAULT_RECORD_WIDTH);
        Ok(Self::stroked(
            path,
            width,
            Paint {
                color,
                tool: r.tool,
            },
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stroke/model.rs"]
mod tests;
