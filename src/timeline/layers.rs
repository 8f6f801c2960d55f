use crate::{
    foundation::error::{FrameinkError, FrameinkResult},
    timeline::model::{Layer, LayerId, Project},
};

impl Project {
    /// Add a layer above the current one and make it current.
    pub fn add_layer(&mut self, name: Option<String>) -> LayerId {
        self.layer_id_counter += 1;
        let id = LayerId(self.layer_id_counter);
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("Layer {}", id.0));
        let at = self
            .layer_index(self.current_layer_id)
            .map_or(self.layers.len(), |i| i + 1);
        self.layers.insert(at, Layer::new(id, name));
        self.current_layer_id = id;
        tracing::debug!(%id, at, "layer added");
        id
    }

    /// Delete a layer. Refuses to delete the last remaining layer.
    pub fn delete_layer(&mut self, id: LayerId) -> FrameinkResult<()> {
        let Some(index) = self.layer_index(id) else {
            return Err(FrameinkError::invalid(format!("no such layer: {id}")));
        };
        if self.layers.len() == 1 {
            return Err(FrameinkError::invalid("cannot delete the only layer"));
        }
        self.layers.remove(index);
        if self.current_layer_id == id {
            let neighbor = index.saturating_sub(1).min(self.layers.len() - 1);
            self.current_layer_id = self.layers[neighbor].id;
        }
        self.clamp_playhead();
        tracing::debug!(%id, "layer deleted");
        Ok(())
    }

    pub fn rename_layer(&mut self, id: LayerId, name: &str) -> FrameinkResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FrameinkError::invalid("layer name must be non-empty"));
        }
        self.layer_mut(id)?.name = name.to_string();
        Ok(())
    }

    pub fn set_layer_visible(&mut self, id: LayerId, visible: bool) -> FrameinkResult<()> {
        self.layer_mut(id)?.visible = visible;
        Ok(())
    }

    /// Flip visibility, returning the new state.
    pub fn toggle_layer_visible(&mut self, id: LayerId) -> FrameinkResult<bool> {
        let l = self.layer_mut(id)?;
        l.visible = !l.visible;
        Ok(l.visible)
    }

    /// Mark a layer as background: it shows its frame 0 everywhere and is never ghosted.
    pub fn set_background_layer(&mut self, id: LayerId, is_background: bool) -> FrameinkResult<()> {
        self.layer_mut(id)?.is_background = is_background;
        Ok(())
    }

    /// Move a layer in the stack; `new_index` is clamped to the top.
    pub fn move_layer(&mut self, id: LayerId, new_index: usize) -> FrameinkResult<usize> {
        let Some(index) = self.layer_index(id) else {
            return Err(FrameinkError::invalid(format!("no such layer: {id}")));
        };
        let target = new_index.min(self.layers.len() - 1);
        let layer = self.layers.remove(index);
        self.layers.insert(target, layer);
        Ok(target)
    }

    pub fn select_layer(&mut self, id: LayerId) -> FrameinkResult<()> {
        self.layer_ref(id)?;
        self.current_layer_id = id;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/layers.rs"]
mod tests;
