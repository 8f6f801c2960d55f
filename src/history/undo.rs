use std::collections::VecDeque;

use crate::{
    foundation::error::FrameinkResult,
    timeline::model::{Frame, LayerId, Project},
};

/// Default number of snapshots kept on each stack.
pub const DEFAULT_UNDO_CAP: usize = 50;

#[derive(Clone, Debug, PartialEq)]
/// Whole-frame snapshot keyed by its timeline coordinate.
pub struct UndoEntry {
    pub layer_id: LayerId,
    /// Frame position when the snapshot was taken.
    pub frame_index: usize,
    /// Deep copy of the frame. Its id locates the frame again if positions shifted.
    pub frame: Frame,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Undo,
    Redo,
}

/// Bounded undo/redo stacks of frame snapshots.
#[derive(Clone, Debug)]
pub struct UndoLog {
    undo: VecDeque<UndoEntry>,
    redo: VecDeque<UndoEntry>,
    cap: usize,
}

impl Default for UndoLog {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_CAP)
    }
}

fn push_bounded(stack: &mut VecDeque<UndoEntry>, entry: UndoEntry, cap: usize) {
    stack.push_back(entry);
    while stack.len() > cap {
        stack.pop_front();
    }
}

impl UndoLog {
    /// Empty log keeping at most `cap` undo entries (at least one).
    pub fn new(cap: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            cap: cap.max(1),
        }
    }

    /// Maximum number of undo entries kept.
    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Entries available to undo.
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Entries available to redo.
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Drop all undo and redo entries.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    /// Invalidate redo history; called for every new authoring action.
    pub fn clear_redo(&mut self) {
        self.redo.clear();
    }

    fn capture(project: &Project, layer: LayerId, index: usize) -> FrameinkResult<UndoEntry> {
        let target = project.authoring_target(layer, index)?;
        let frame = project.layer_ref(layer)?.frames[target].clone();
        Ok(UndoEntry {
            layer_id: layer,
            frame_index: target,
            frame,
        })
    }

    /// Snapshot the frame under the current layer and playhead.
    pub fn snapshot(&mut self, project: &Project) -> FrameinkResult<()> {
        self.snapshot_at(project, project.current_layer_id(), project.current_frame())
    }

    /// Snapshot the frame authored at `(layer, index)`.
    pub fn snapshot_at(
        &mut self,
        project: &Project,
        layer: LayerId,
        index: usize,
    ) -> FrameinkResult<()> {
        let entry = Self::capture(project, layer, index)?;
        push_bounded(&mut self.undo, entry, self.cap);
        Ok(())
    }

    /// Restore the most recent snapshot. Returns `false` when there was nothing to undo.
    pub fn undo(&mut self, project: &mut Project) -> FrameinkResult<bool> {
        self.step(project, Direction::Undo)
    }

    /// Re-apply the most recently undone snapshot. Returns `false` when there was nothing.
    pub fn redo(&mut self, project: &mut Project) -> FrameinkResult<bool> {
        self.step(project, Direction::Redo)
    }

    fn step(&mut self, project: &mut Project, dir: Direction) -> FrameinkResult<bool> {
        loop {
            let popped = match dir {
                Direction::Undo => self.undo.pop_back(),
                Direction::Redo => self.redo.pop_back(),
            };
            let Some(entry) = popped else {
                return Ok(false);
            };

            let index = project
                .layer(entry.layer_id)
                .and_then(|l| l.index_of(entry.frame.id()))
                .filter(|&i| {
                    project
                        .layer(entry.layer_id)
                        .is_some_and(|l| !l.frames[i].is_hold())
                });
            let Some(index) = index else {
                tracing::warn!(
                    layer = %entry.layer_id,
                    frame_index = entry.frame_index,
                    "discarding snapshot of a frame that no longer exists"
                );
                continue;
            };

            let current = Self::capture(project, entry.layer_id, index)?;
            project.replace_strokes(entry.layer_id, index, entry.frame.strokes)?;
            match dir {
                Direction::Undo => push_bounded(&mut self.redo, current, self.cap),
                Direction::Redo => push_bounded(&mut self.undo, current, self.cap),
            }
            project.select_layer(entry.layer_id)?;
            project.set_current_frame(index);
            return Ok(true);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/history/undo.rs"]
mod tests;
