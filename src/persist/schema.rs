use crate::{
    foundation::{
        core::{Background, Canvas, Fps},
        error::{FrameinkError, FrameinkResult},
    },
    persist::migrate::{self, CURRENT_VERSION},
    stroke::model::Stroke,
    timeline::model::{Frame, FrameId, Layer, LayerId, OnionSkinSettings, Project},
};

/// On-disk project document, as written by [`ProjectFile::from_project`].
///
/// Hold references are stored as positional frame indices; stable frame ids are an in-memory
/// concern and are re-derived on load.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    pub layers: Vec<LayerRecord>,
    pub current_layer_id: LayerId,
    pub current_frame_index: usize,
    /// Written for readers of the file; ignored on load.
    #[serde(default)]
    pub max_frames: usize,
    pub layer_id_counter: u32,
    pub fps: Fps,
    pub background_color: Background,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_height: Option<u32>,
    #[serde(default)]
    pub onion_skin_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onion_skin_settings: Option<OnionSkinSettings>,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerRecord {
    pub id: LayerId,
    pub name: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_background: bool,
    pub frames: Vec<FrameRecord>,
}

fn default_visible() -> bool {
    true
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameRecord {
    #[serde(default)]
    pub strokes: Vec<Stroke>,
    /// Number of hold frames extending this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold: Option<u32>,
    /// Index of the source frame when this is a hold frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold_reference: Option<usize>,
}

impl ProjectFile {
    pub fn from_project(project: &Project) -> Self {
        let layers = project
            .layers()
            .iter()
            .map(|l| LayerRecord {
                id: l.id,
                name: l.name.clone(),
                visible: l.visible,
                is_background: l.is_background,
                frames: l
                    .frames()
                    .iter()
                    .map(|f| FrameRecord {
                        strokes: f.strokes().to_vec(),
                        hold: (f.hold_count() > 0).then_some(f.hold_count()),
                        hold_reference: f.hold_of().and_then(|src| l.index_of(src)),
                    })
                    .collect(),
            })
            .collect();

        Self {
            layers,
            current_layer_id: project.current_layer_id(),
            current_frame_index: project.current_frame(),
            max_frames: project.max_frames(),
            layer_id_counter: project.layer_id_counter(),
            fps: project.fps,
            background_color: project.background,
            canvas_width: Some(project.canvas.width),
            canvas_height: Some(project.canvas.height),
            onion_skin_enabled: project.onion_skin_enabled,
            onion_skin_settings: Some(project.onion_skin),
            version: CURRENT_VERSION.to_owned(),
        }
    }

    /// Build the in-memory aggregate. Nothing is applied unless the whole file is usable.
    pub fn into_project(self) -> FrameinkResult<Project> {
        if self.version != CURRENT_VERSION {
            return Err(FrameinkError::malformed(format!(
                "expected version {CURRENT_VERSION}, got {}",
                self.version
            )));
        }
        if self.layers.is_empty() {
            return Err(FrameinkError::malformed("project has no layers"));
        }

        let mut layers: Vec<Layer> = Vec::with_capacity(self.layers.len());
        for rec in self.layers {
            if layers.iter().any(|l| l.id == rec.id) {
                return Err(FrameinkError::malformed(format!("duplicate {}", rec.id)));
            }
            layers.push(layer_from_record(rec)?);
        }

        let fps = Fps::new(self.fps.0).map_err(|e| FrameinkError::malformed(e.to_string()))?;
        let canvas = match (self.canvas_width, self.canvas_height) {
            (Some(w), Some(h)) => {
                Canvas::new(w, h).map_err(|e| FrameinkError::malformed(e.to_string()))?
            }
            _ => Canvas::default(),
        };

        let current_layer_id = if layers.iter().any(|l| l.id == self.current_layer_id) {
            self.current_layer_id
        } else {
            tracing::debug!(missing = %self.current_layer_id, "current layer not found; using bottom layer");
            layers[0].id
        };
        let max_id = layers.iter().map(|l| l.id.0).max().unwrap_or(0);

        let mut project = Project {
            layers,
            current_layer_id,
            current_frame: self.current_frame_index,
            layer_id_counter: self.layer_id_counter.max(max_id),
            fps,
            canvas,
            background: self.background_color,
            onion_skin_enabled: self.onion_skin_enabled,
            onion_skin: self.onion_skin_settings.unwrap_or_default().sanitized(),
        };
        project.clamp_playhead();
        Ok(project)
    }
}

fn layer_from_record(rec: LayerRecord) -> FrameinkResult<Layer> {
    if rec.frames.is_empty() {
        return Err(FrameinkError::malformed(format!("{} has no frames", rec.id)));
    }
    let count = rec.frames.len();
    let frames = rec
        .frames
        .into_iter()
        .enumerate()
        .map(|(i, f)| {
            let id = FrameId(i as u32);
            match f.hold_reference {
                Some(src) if src < count && src != i => Frame::hold(id, FrameId(src as u32)),
                _ => Frame {
                    hold_count: f.hold.unwrap_or(0),
                    ..Frame::with_strokes(id, f.strokes)
                },
            }
        })
        .collect();

    let mut layer = Layer {
        id: rec.id,
        name: rec.name,
        visible: rec.visible,
        is_background: rec.is_background,
        frames,
        next_frame_id: count as u32,
    };
    let repaired = layer.repair_holds();
    if repaired > 0 {
        tracing::warn!(layer = %layer.id, repaired, "repaired hold references on load");
    }
    Ok(layer)
}

/// Serialize a project as pretty JSON in the current schema.
pub fn to_json(project: &Project) -> FrameinkResult<String> {
    Ok(serde_json::to_string_pretty(&ProjectFile::from_project(
        project,
    ))?)
}

/// Parse a persisted project of any supported version.
///
/// Older versions are migrated forward; an unknown version or a missing required field is
/// [`FrameinkError::MalformedProjectFile`].
pub fn from_json(text: &str) -> FrameinkResult<Project> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| FrameinkError::malformed(format!("not JSON: {e}")))?;
    let value = migrate::upgrade(value)?;
    let file: ProjectFile = serde_json::from_value(value)
        .map_err(|e| FrameinkError::malformed(e.to_string()))?;
    file.into_project()
}

/// [`from_json`], falling back to a default project when the text cannot be used.
pub fn load_or_default(text: &str) -> Project {
    match from_json(text) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, "discarding persisted project");
            Project::default()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/persist/schema.rs"]
mod tests;
