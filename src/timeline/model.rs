use crate::{
    foundation::{
        core::{Background, Canvas, Color, Fps},
        error::{FrameinkError, FrameinkResult},
    },
    stroke::model::Stroke,
};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
/// Unique layer identifier within a project.
pub struct LayerId(pub u32);

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "layer_{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Frame identifier, stable within its layer across insertions and deletions.
pub struct FrameId(pub u32);

#[derive(Clone, Debug, PartialEq)]
/// A layer's content at one position of its local timeline.
pub struct Frame {
    pub(crate) id: FrameId,
    pub(crate) strokes: Vec<Stroke>,
    pub(crate) hold_count: u32,
    pub(crate) hold_of: Option<FrameId>,
}

impl Frame {
    pub(crate) fn empty(id: FrameId) -> Self {
        Self {
            id,
            strokes: Vec::new(),
            hold_count: 0,
            hold_of: None,
        }
    }

    pub(crate) fn with_strokes(id: FrameId, strokes: Vec<Stroke>) -> Self {
        Self {
            strokes,
            ..Self::empty(id)
        }
    }

    pub(crate) fn hold(id: FrameId, source: FrameId) -> Self {
        Self {
            hold_of: Some(source),
            ..Self::empty(id)
        }
    }

    /// Stable identity of this frame within its layer.
    pub fn id(&self) -> FrameId {
        self.id
    }

    /// Strokes authored on this frame, in drawing order. Always empty for hold frames.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Number of hold frames extending this frame.
    pub fn hold_count(&self) -> u32 {
        self.hold_count
    }

    /// Source frame this hold frame renders, if it is one.
    pub fn hold_of(&self) -> Option<FrameId> {
        self.hold_of
    }

    /// True for synthesized hold frames.
    pub fn is_hold(&self) -> bool {
        self.hold_of.is_some()
    }
}

#[derive(Clone, Debug, PartialEq)]
/// An independent frame sequence composited with the other layers.
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    pub is_background: bool,
    pub(crate) frames: Vec<Frame>,
    pub(crate) next_frame_id: u32,
}

impl Layer {
    /// A visible layer with one empty frame.
    pub fn new(id: LayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            visible: true,
            is_background: false,
            frames: vec![Frame::empty(FrameId(0))],
            next_frame_id: 1,
        }
    }

    /// Frames in local order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of frames, hold frames included.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Frame at a local index, without hold resolution.
    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Current local index of the frame with `id`.
    pub fn index_of(&self, id: FrameId) -> Option<usize> {
        self.frames.iter().position(|f| f.id == id)
    }

    pub(crate) fn alloc_frame_id(&mut self) -> FrameId {
        let id = FrameId(self.next_frame_id);
        self.next_frame_id += 1;
        id
    }

    /// Index of the frame that authors the content shown at `index`.
    pub(crate) fn authoring_index(&self, index: usize) -> Option<usize> {
        let frame = self.frames.get(index)?;
        match frame.hold_of {
            Some(source) => self.index_of(source),
            None => Some(index),
        }
    }

    /// One past the last hold frame of the block that starts at `source_index`.
    pub(crate) fn hold_block_end(&self, source_index: usize) -> usize {
        let Some(source) = self.frames.get(source_index) else {
            return self.frames.len();
        };
        let sid = source.id;
        let mut end = source_index + 1;
        while end < self.frames.len() && self.frames[end].hold_of == Some(sid) {
            end += 1;
        }
        end
    }

    /// Frame whose strokes render at `index`, or `None` when nothing is authored there.
    ///
    /// Background layers always resolve to frame 0; hold frames resolve to their source.
    pub fn resolve_effective_frame(&self, index: usize) -> Option<&Frame> {
        if self.is_background {
            return self.frames.first();
        }
        let frame = self.frames.get(index)?;
        match frame.hold_of {
            None => Some(frame),
            Some(source) => {
                let resolved = self.index_of(source).and_then(|i| self.frames.get(i));
                if resolved.is_none() {
                    tracing::debug!(layer = %self.id, index, "hold frame has no source");
                }
                resolved
            }
        }
    }

    /// Check hold invariants: sources exist and are not holds, counts match references.
    pub fn validate_holds(&self) -> FrameinkResult<()> {
        for (i, f) in self.frames.iter().enumerate() {
            if let Some(source) = f.hold_of {
                let Some(si) = self.index_of(source) else {
                    return Err(FrameinkError::inconsistency(format!(
                        "{}: frame {i} holds a missing frame",
                        self.id
                    )));
                };
                if self.frames[si].is_hold() {
                    return Err(FrameinkError::inconsistency(format!(
                        "{}: frame {i} holds another hold frame",
                        self.id
                    )));
                }
                if !f.strokes.is_empty() {
                    return Err(FrameinkError::inconsistency(format!(
                        "{}: hold frame {i} carries strokes",
                        self.id
                    )));
                }
            }
            let refs = self
                .frames
                .iter()
                .filter(|other| other.hold_of == Some(f.id))
                .count();
            if refs != f.hold_count as usize {
                return Err(FrameinkError::inconsistency(format!(
                    "{}: frame {i} hold count {} but {refs} holds reference it",
                    self.id, f.hold_count
                )));
            }
        }
        Ok(())
    }

    /// Drop dangling or chained hold references and recompute source counts.
    pub(crate) fn repair_holds(&mut self) -> usize {
        let mut repaired = 0;
        let ids: Vec<(FrameId, bool)> = self.frames.iter().map(|f| (f.id, f.is_hold())).collect();
        for f in &mut self.frames {
            if let Some(source) = f.hold_of {
                let ok = ids.iter().any(|&(id, is_hold)| id == source && !is_hold);
                if !ok || source == f.id {
                    f.hold_of = None;
                    repaired += 1;
                }
            }
        }
        for i in 0..self.frames.len() {
            let id = self.frames[i].id;
            let refs = self
                .frames
                .iter()
                .filter(|f| f.hold_of == Some(id))
                .count() as u32;
            if self.frames[i].hold_count != refs {
                self.frames[i].hold_count = refs;
                repaired += 1;
            }
        }
        repaired
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Ghost-frame configuration for onion skinning.
pub struct OnionSkinSettings {
    pub frames_before: u32,
    pub frames_after: u32,
    /// Percent, `0..=100`.
    pub before_opacity: f64,
    /// Percent, `0..=100`.
    pub after_opacity: f64,
    pub before_color: Color,
    pub after_color: Color,
}

impl Default for OnionSkinSettings {
    fn default() -> Self {
        Self {
            frames_before: 1,
            frames_after: 1,
            before_opacity: 30.0,
            after_opacity: 30.0,
            before_color: Color::rgb(255, 0, 0),
            after_color: Color::rgb(0, 0, 255),
        }
    }
}

impl OnionSkinSettings {
    /// Copy with opacities clamped into `0..=100`.
    pub fn sanitized(self) -> Self {
        fn pct(v: f64) -> f64 {
            if v.is_finite() { v.clamp(0.0, 100.0) } else { 0.0 }
        }
        Self {
            before_opacity: pct(self.before_opacity),
            after_opacity: pct(self.after_opacity),
            ..self
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// The single owned editing aggregate: layers, playhead and document settings.
pub struct Project {
    pub(crate) layers: Vec<Layer>,
    pub(crate) current_layer_id: LayerId,
    pub(crate) current_frame: usize,
    pub(crate) layer_id_counter: u32,
    pub fps: Fps,
    pub canvas: Canvas,
    pub background: Background,
    pub onion_skin_enabled: bool,
    pub onion_skin: OnionSkinSettings,
}

impl Default for Project {
    fn default() -> Self {
        Self::new(Canvas::default())
    }
}

impl Project {
    /// A project with a single layer holding a single empty frame.
    pub fn new(canvas: Canvas) -> Self {
        let first = LayerId(1);
        Self {
            layers: vec![Layer::new(first, "Layer 1")],
            current_layer_id: first,
            current_frame: 0,
            layer_id_counter: 1,
            fps: Fps::default(),
            canvas,
            background: Background::Solid(Color::WHITE),
            onion_skin_enabled: false,
            onion_skin: OnionSkinSettings::default(),
        }
    }

    /// Layers bottom (index 0) to top.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layer with `id`, if present.
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Stacking index of the layer with `id` (0 is the bottom).
    pub fn layer_index(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    pub(crate) fn layer_mut(&mut self, id: LayerId) -> FrameinkResult<&mut Layer> {
        self.layers
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| FrameinkError::invalid(format!("no such layer: {id}")))
    }

    pub(crate) fn layer_ref(&self, id: LayerId) -> FrameinkResult<&Layer> {
        self.layer(id)
            .ok_or_else(|| FrameinkError::invalid(format!("no such layer: {id}")))
    }

    /// Layer receiving new strokes.
    pub fn current_layer_id(&self) -> LayerId {
        self.current_layer_id
    }

    /// The layer receiving new strokes.
    pub fn current_layer(&self) -> &Layer {
        // `current_layer_id` always names an existing layer; fall back to the bottom layer
        // rather than panicking if that is ever violated.
        self.layer(self.current_layer_id).unwrap_or(&self.layers[0])
    }

    /// Project-wide playhead.
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Highest layer id handed out so far.
    pub fn layer_id_counter(&self) -> u32 {
        self.layer_id_counter
    }

    /// Longest layer's frame count, never less than 1.
    pub fn max_frames(&self) -> usize {
        self.layers
            .iter()
            .map(Layer::frame_count)
            .max()
            .unwrap_or(1)
            .max(1)
    }

    /// Move the playhead, clamped into `0..max_frames`.
    pub fn set_current_frame(&mut self, index: usize) -> usize {
        self.current_frame = index.min(self.max_frames() - 1);
        self.current_frame
    }

    pub(crate) fn clamp_playhead(&mut self) {
        let max = self.max_frames() - 1;
        if self.current_frame > max {
            self.current_frame = max;
        }
    }

    /// Change the playback rate; zero is rejected.
    pub fn set_fps(&mut self, fps: u32) -> FrameinkResult<()> {
        self.fps = Fps::new(fps)?;
        Ok(())
    }

    /// Replace the onion-skin settings, clamping out-of-range values.
    pub fn set_onion_skin(&mut self, settings: OnionSkinSettings) {
        self.onion_skin = settings.sanitized();
    }

    /// Check every structural invariant of the aggregate.
    pub fn validate(&self) -> FrameinkResult<()> {
        if self.layers.is_empty() {
            return Err(FrameinkError::inconsistency("project has no layers"));
        }
        if self.layer(self.current_layer_id).is_none() {
            return Err(FrameinkError::inconsistency(format!(
                "current layer {} does not exist",
                self.current_layer_id
            )));
        }
        for (i, l) in self.layers.iter().enumerate() {
            if l.frames.is_empty() {
                return Err(FrameinkError::inconsistency(format!("{} has no frames", l.id)));
            }
            if self.layers[..i].iter().any(|o| o.id == l.id) {
                return Err(FrameinkError::inconsistency(format!("duplicate {}", l.id)));
            }
            l.validate_holds()?;
        }
        if self.current_frame >= self.max_frames() {
            return Err(FrameinkError::inconsistency("playhead out of bounds"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/model.rs"]
mod tests;
