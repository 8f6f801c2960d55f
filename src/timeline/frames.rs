//! Structural frame operations. Every guard runs before the first mutation, so a rejected
//! operation leaves the project untouched.

use crate::{
    foundation::error::{FrameinkError, FrameinkResult},
    stroke::model::Stroke,
    timeline::model::{Frame, Layer, LayerId, Project},
};

fn frame_at(layer: &Layer, index: usize) -> FrameinkResult<&Frame> {
    layer.frame(index).ok_or_else(|| {
        FrameinkError::invalid(format!(
            "{} has no frame {index} (frames: {})",
            layer.id,
            layer.frame_count()
        ))
    })
}

impl Project {
    /// Insert an empty frame after `after_index` (appending when out of range) and move the
    /// playhead onto it. Insertions never split a hold block.
    pub fn add_frame(&mut self, layer: LayerId, after_index: usize) -> FrameinkResult<usize> {
        let l = self.layer_mut(layer)?;
        let at = match l.authoring_index(after_index) {
            Some(source) => l.hold_block_end(source).max(after_index + 1),
            None => l.frame_count(),
        };
        let id = l.alloc_frame_id();
        l.frames.insert(at, Frame::empty(id));
        self.current_frame = at;
        tracing::debug!(%layer, at, "frame added");
        Ok(at)
    }

    /// Deep-copy the strokes shown at `index` into a new frame right after it.
    pub fn duplicate_frame(&mut self, layer: LayerId, index: usize) -> FrameinkResult<usize> {
        let l = self.layer_mut(layer)?;
        frame_at(l, index)?;
        let source = l.authoring_index(index).unwrap_or(index);
        let strokes = l.frames[source].strokes.clone();
        let at = l.hold_block_end(source).max(index + 1);
        let id = l.alloc_frame_id();
        l.frames.insert(at, Frame::with_strokes(id, strokes));
        self.current_frame = at;
        tracing::debug!(%layer, index, at, "frame duplicated");
        Ok(at)
    }

    /// Remove a frame. Refuses to delete a layer's only frame.
    ///
    /// Deleting a hold frame shortens its block. Deleting a held source promotes the first
    /// hold frame to a real frame carrying the source's strokes, and re-points the rest of
    /// the block at it, so no hold reference is left dangling.
    pub fn delete_frame(&mut self, layer: LayerId, index: usize) -> FrameinkResult<()> {
        let is_current = layer == self.current_layer_id;
        let l = self.layer_mut(layer)?;
        frame_at(l, index)?;
        if l.frame_count() == 1 {
            return Err(FrameinkError::invalid(format!(
                "cannot delete the only frame of {layer}"
            )));
        }

        let removed = l.frames.remove(index);
        if let Some(source) = removed.hold_of {
            if let Some(si) = l.index_of(source) {
                l.frames[si].hold_count = l.frames[si].hold_count.saturating_sub(1);
            }
        } else if removed.hold_count > 0 {
            let heir = l.frames.iter().position(|f| f.hold_of == Some(removed.id));
            if let Some(hi) = heir {
                let heir_id = l.frames[hi].id;
                for f in l.frames.iter_mut() {
                    if f.hold_of == Some(removed.id) {
                        f.hold_of = Some(heir_id);
                    }
                }
                let heir = &mut l.frames[hi];
                heir.hold_of = None;
                heir.strokes = removed.strokes;
                heir.hold_count = removed.hold_count - 1;
            }
        }

        let layer_len = l.frame_count();
        if is_current && self.current_frame >= layer_len {
            self.current_frame = layer_len - 1;
        }
        self.clamp_playhead();
        tracing::debug!(%layer, index, "frame deleted");
        Ok(())
    }

    /// Extend the frame at `index` by one hold frame placed after its current hold block.
    pub fn add_hold(&mut self, layer: LayerId, index: usize) -> FrameinkResult<usize> {
        let l = self.layer_mut(layer)?;
        let source = frame_at(l, index)?;
        if source.is_hold() {
            return Err(FrameinkError::invalid(format!(
                "frame {index} of {layer} is a hold frame; holds cannot chain"
            )));
        }
        let source_id = source.id;
        let at = l.hold_block_end(index);
        let id = l.alloc_frame_id();
        l.frames.insert(at, Frame::hold(id, source_id));
        l.frames[index].hold_count += 1;
        tracing::debug!(%layer, index, at, "hold added");
        Ok(at)
    }

    /// Remove the most recently added hold frame of the source at `index`.
    ///
    /// `index` may also point at one of the source's hold frames.
    pub fn remove_hold(&mut self, layer: LayerId, index: usize) -> FrameinkResult<()> {
        let l = self.layer_mut(layer)?;
        frame_at(l, index)?;
        let Some(si) = l.authoring_index(index) else {
            return Err(FrameinkError::invalid(format!(
                "frame {index} of {layer} holds a missing frame"
            )));
        };
        let source_id = l.frames[si].id;
        let Some(last) = l.frames.iter().rposition(|f| f.hold_of == Some(source_id)) else {
            return Err(FrameinkError::invalid(format!(
                "frame {si} of {layer} has no holds"
            )));
        };
        l.frames.remove(last);
        if let Some(si) = l.index_of(source_id) {
            l.frames[si].hold_count = l.frames[si].hold_count.saturating_sub(1);
        }
        self.clamp_playhead();
        tracing::debug!(%layer, index, "hold removed");
        Ok(())
    }

    /// Frame rendered for `layer` at `index`; see [`Layer::resolve_effective_frame`].
    pub fn resolve_effective_frame(&self, layer: LayerId, index: usize) -> Option<&Frame> {
        self.layer(layer)?.resolve_effective_frame(index)
    }

    /// Index of the frame that authoring at `index` writes to.
    ///
    /// Hold frames redirect to their source; background layers always author frame 0.
    pub fn authoring_target(&self, layer: LayerId, index: usize) -> FrameinkResult<usize> {
        let l = self.layer_ref(layer)?;
        let index = if l.is_background { 0 } else { index };
        frame_at(l, index)?;
        l.authoring_index(index).ok_or_else(|| {
            FrameinkError::inconsistency(format!(
                "frame {index} of {layer} holds a missing frame"
            ))
        })
    }

    /// Append a finished stroke. Returns the index of the frame that received it.
    pub fn commit_stroke(
        &mut self,
        layer: LayerId,
        index: usize,
        stroke: Stroke,
    ) -> FrameinkResult<usize> {
        let target = self.authoring_target(layer, index)?;
        let l = self.layer_mut(layer)?;
        l.frames[target].strokes.push(stroke);
        Ok(target)
    }

    /// Remove every stroke from the frame authored at `index`.
    pub fn clear_frame(&mut self, layer: LayerId, index: usize) -> FrameinkResult<usize> {
        let target = self.authoring_target(layer, index)?;
        let l = self.layer_mut(layer)?;
        l.frames[target].strokes.clear();
        Ok(target)
    }

    /// Replace the strokes of the frame at `index` wholesale.
    pub(crate) fn replace_strokes(
        &mut self,
        layer: LayerId,
        index: usize,
        strokes: Vec<Stroke>,
    ) -> FrameinkResult<()> {
        let l = self.layer_mut(layer)?;
        let frame = l
            .frames
            .get_mut(index)
            .ok_or_else(|| FrameinkError::invalid(format!("{layer} has no frame {index}")))?;
        if frame.is_hold() {
            return Err(FrameinkError::invalid("hold frames cannot carry strokes"));
        }
        frame.strokes = strokes;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/frames.rs"]
mod tests;
