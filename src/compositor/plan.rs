use crate::{
    foundation::core::{Background, Canvas},
    stroke::model::Stroke,
    timeline::model::LayerId,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Renderer-agnostic draw list for one playhead position.
///
/// Any renderer (retained scene graph, immediate-mode canvas, SVG emitter) can consume a
/// plan without the editor core depending on a display technology.
pub struct RenderPlan {
    /// Playhead the plan was built for.
    pub frame: usize,
    /// Canvas dimensions.
    pub canvas: Canvas,
    /// Fill applied before anything else.
    pub background: Background,
    /// One entry per layer, bottom to top, including hidden layers.
    pub layers: Vec<LayerDraw>,
    /// Onion-skin ghosts, drawn beneath [`RenderPlan::layers`].
    pub ghosts: Vec<GhostDraw>,
}

impl RenderPlan {
    /// Entries that actually paint something.
    pub fn visible_layers(&self) -> impl Iterator<Item = &LayerDraw> {
        self.layers
            .iter()
            .filter(|l| l.visible && l.opacity > 0.0 && !l.strokes.is_empty())
    }

    /// Total strokes across visible layers.
    pub fn stroke_count(&self) -> usize {
        self.visible_layers().map(|l| l.strokes.len()).sum()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Main-frame content of one layer.
///
/// Hidden layers keep a placeholder entry (zero opacity, no strokes) so renderers that key
/// retained groups by layer id see a stable set of layers.
pub struct LayerDraw {
    pub layer_id: LayerId,
    pub visible: bool,
    pub opacity: f64,
    /// Index of the frame whose strokes are drawn, after hold/background resolution.
    pub source_frame: Option<usize>,
    pub strokes: Vec<Stroke>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// A tinted, translucent neighbor frame.
pub struct GhostDraw {
    pub layer_id: LayerId,
    /// Signed distance from the playhead: negative before, positive after.
    pub offset: i64,
    pub opacity: f64,
    /// Strokes recolored to the side's tint, in authored order.
    pub strokes: Vec<Stroke>,
}
