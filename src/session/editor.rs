use std::time::Instant;

use crate::{
    compositor::{compose::render, plan::RenderPlan},
    foundation::error::FrameinkResult,
    geometry::{
        builder::StrokeBuilder,
        config::{Sample, StrokeConfig},
    },
    history::undo::UndoLog,
    persist::{
        schema::{from_json, to_json},
        storage::{ProjectStore, load_project, save_project},
    },
    playback::scheduler::{FrameSink, PlaybackScheduler, ScheduledTick},
    session::settings::EditorSettings,
    stroke::model::StrokeGeometry,
    timeline::model::{LayerId, OnionSkinSettings, Project},
};

/// One editing session: the project plus everything that acts on it.
///
/// Pointer input flows through a [`StrokeBuilder`] and is committed on pointer-up after an
/// undo snapshot. Structural edits are saved to the store immediately; playhead moves and
/// other cosmetic changes only mark the project dirty for [`Session::autosave`].
pub struct Session {
    project: Project,
    history: UndoLog,
    builder: Option<StrokeBuilder>,
    scheduler: PlaybackScheduler,
    settings: EditorSettings,
    brush: StrokeConfig,
    store: Box<dyn ProjectStore>,
    dirty: bool,
    last_save: Option<Instant>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("project", &self.project)
            .field("drawing", &self.builder.is_some())
            .field("playing", &self.scheduler.is_playing())
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Restore the stored project, or start a fresh one.
    pub fn open(settings: EditorSettings, store: Box<dyn ProjectStore>) -> Self {
        let project = load_project(store.as_ref(), settings.canvas);
        Self::with_project(project, settings, store)
    }

    pub fn with_project(
        project: Project,
        settings: EditorSettings,
        store: Box<dyn ProjectStore>,
    ) -> Self {
        Self {
            project,
            history: UndoLog::new(settings.undo_cap),
            builder: None,
            scheduler: PlaybackScheduler::new(settings.playback),
            brush: settings.brush.sanitized(),
            settings,
            store,
            dirty: false,
            last_save: None,
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn history(&self) -> &UndoLog {
        &self.history
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn store(&self) -> &dyn ProjectStore {
        self.store.as_ref()
    }

    pub fn brush(&self) -> &StrokeConfig {
        &self.brush
    }

    /// Brush for the next stroke; a stroke in progress keeps the one it started with.
    pub fn set_brush(&mut self, brush: StrokeConfig) {
        self.brush = brush.sanitized();
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Plan for the current playhead, with ghosts when onion skin is on.
    pub fn render(&self) -> RenderPlan {
        render(&self.project, self.project.current_frame())
    }

    // Drawing

    pub fn is_drawing(&self) -> bool {
        self.builder.is_some()
    }

    /// Start a stroke. Playback stops first; a stroke already in progress is discarded.
    pub fn pointer_down(&mut self, sample: Sample) {
        self.scheduler.stop();
        self.builder = Some(StrokeBuilder::begin(self.brush, sample));
    }

    /// Feed a move sample and return the preview, or `None` when no stroke is in progress.
    pub fn pointer_move(&mut self, sample: Sample) -> Option<StrokeGeometry> {
        let builder = self.builder.as_mut()?;
        builder.push(sample);
        Some(builder.preview())
    }

    pub fn set_modifiers(&mut self, constrained: bool, force_circle: bool) {
        if let Some(b) = self.builder.as_mut() {
            b.set_modifiers(constrained, force_circle);
        }
    }

    pub fn preview(&self) -> Option<StrokeGeometry> {
        self.builder.as_ref().map(StrokeBuilder::preview)
    }

    pub fn cancel_stroke(&mut self) -> bool {
        self.builder.take().is_some()
    }

    /// Finish the stroke in progress and commit it under the playhead.
    ///
    /// Returns the index of the frame that received it, or `None` when nothing was being
    /// drawn. A rejected commit (for example a playhead past the end of the current layer)
    /// leaves the project and history untouched.
    pub fn pointer_up(&mut self) -> FrameinkResult<Option<usize>> {
        let Some(builder) = self.builder.take() else {
            return Ok(None);
        };
        let stroke = builder.finish();
        let layer = self.project.current_layer_id();
        let index = self.project.current_frame();
        self.project.authoring_target(layer, index)?;

        self.history.snapshot_at(&self.project, layer, index)?;
        self.history.clear_redo();
        let target = self.project.commit_stroke(layer, index, stroke)?;
        self.persist();
        Ok(Some(target))
    }

    /// Remove every stroke from the current frame (undoable).
    pub fn clear_current_frame(&mut self) -> FrameinkResult<usize> {
        let layer = self.project.current_layer_id();
        let index = self.project.current_frame();
        self.project.authoring_target(layer, index)?;

        self.history.snapshot_at(&self.project, layer, index)?;
        self.history.clear_redo();
        let target = self.project.clear_frame(layer, index)?;
        self.persist();
        Ok(target)
    }

    pub fn undo(&mut self) -> FrameinkResult<bool> {
        let changed = self.history.undo(&mut self.project)?;
        if changed {
            self.persist();
        }
        Ok(changed)
    }

    pub fn redo(&mut self) -> FrameinkResult<bool> {
        let changed = self.history.redo(&mut self.project)?;
        if changed {
            self.persist();
        }
        Ok(changed)
    }

    // Timeline

    fn structural<T>(
        &mut self,
        op: impl FnOnce(&mut Project) -> FrameinkResult<T>,
    ) -> FrameinkResult<T> {
        let out = op(&mut self.project)?;
        self.persist();
        Ok(out)
    }

    pub fn add_frame(&mut self) -> FrameinkResult<usize> {
        let (layer, index) = self.cursor();
        self.structural(|p| p.add_frame(layer, index))
    }

    pub fn duplicate_frame(&mut self) -> FrameinkResult<usize> {
        let (layer, index) = self.cursor();
        self.structural(|p| p.duplicate_frame(layer, index))
    }

    pub fn delete_frame(&mut self) -> FrameinkResult<()> {
        let (layer, index) = self.cursor();
        self.structural(|p| p.delete_frame(layer, index))
    }

    pub fn add_hold(&mut self) -> FrameinkResult<usize> {
        let (layer, index) = self.cursor();
        self.structural(|p| p.add_hold(layer, index))
    }

    pub fn remove_hold(&mut self) -> FrameinkResult<()> {
        let (layer, index) = self.cursor();
        self.structural(|p| p.remove_hold(layer, index))
    }

    pub fn add_layer(&mut self, name: Option<String>) -> LayerId {
        let id = self.project.add_layer(name);
        self.persist();
        id
    }

    pub fn delete_layer(&mut self, id: LayerId) -> FrameinkResult<()> {
        self.structural(|p| p.delete_layer(id))
    }

    pub fn rename_layer(&mut self, id: LayerId, name: &str) -> FrameinkResult<()> {
        self.structural(|p| p.rename_layer(id, name))
    }

    pub fn toggle_layer_visible(&mut self, id: LayerId) -> FrameinkResult<bool> {
        self.structural(|p| p.toggle_layer_visible(id))
    }

    pub fn set_background_layer(&mut self, id: LayerId, is_background: bool) -> FrameinkResult<()> {
        self.structural(|p| p.set_background_layer(id, is_background))
    }

    pub fn move_layer(&mut self, id: LayerId, new_index: usize) -> FrameinkResult<usize> {
        self.structural(|p| p.move_layer(id, new_index))
    }

    pub fn select_layer(&mut self, id: LayerId) -> FrameinkResult<()> {
        self.project.select_layer(id)?;
        self.dirty = true;
        Ok(())
    }

    pub fn set_current_frame(&mut self, index: usize) -> usize {
        self.dirty = true;
        self.project.set_current_frame(index)
    }

    pub fn set_onion_skin(&mut self, enabled: bool, settings: OnionSkinSettings) {
        self.project.onion_skin_enabled = enabled;
        self.project.set_onion_skin(settings);
        self.persist();
    }

    fn cursor(&self) -> (LayerId, usize) {
        (self.project.current_layer_id(), self.project.current_frame())
    }

    // Playback

    pub fn is_playing(&self) -> bool {
        self.scheduler.is_playing()
    }

    /// Start playback; the host must deliver the returned tick back through [`Session::on_tick`].
    pub fn play(&mut self) -> Option<ScheduledTick> {
        self.builder = None;
        self.scheduler.start(&self.project)
    }

    pub fn stop(&mut self) -> bool {
        self.scheduler.stop()
    }

    pub fn on_tick(
        &mut self,
        tick: ScheduledTick,
        sink: &mut dyn FrameSink,
    ) -> FrameinkResult<Option<ScheduledTick>> {
        self.scheduler.on_tick(tick, &mut self.project, sink)
    }

    /// Change fps. A running playback restarts at the new cadence and its new tick is returned.
    pub fn set_fps(&mut self, fps: u32) -> FrameinkResult<Option<ScheduledTick>> {
        let next = self.scheduler.set_fps(&mut self.project, fps)?;
        self.persist();
        Ok(next)
    }

    // Persistence

    /// Replace the project with an imported document. A malformed document changes nothing.
    pub fn import_json(&mut self, text: &str) -> FrameinkResult<()> {
        let project = from_json(text)?;
        self.scheduler.stop();
        self.builder = None;
        self.history.clear();
        self.project = project;
        self.persist();
        Ok(())
    }

    pub fn export_json(&self) -> FrameinkResult<String> {
        to_json(&self.project)
    }

    /// Save now. Failures are logged and leave the project dirty.
    pub fn persist(&mut self) -> bool {
        let saved = save_project(self.store.as_mut(), &self.project);
        self.dirty = !saved;
        if saved {
            self.last_save = Some(Instant::now());
        }
        saved
    }

    /// Save a dirty project once the autosave interval has passed since the last save.
    pub fn autosave(&mut self, now: Instant) -> bool {
        if !self.dirty {
            return false;
        }
        let due = self
            .last_save
            .is_none_or(|at| now.saturating_duration_since(at) >= self.settings.autosave_interval);
        due && self.persist()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
