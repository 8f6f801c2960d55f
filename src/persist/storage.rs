use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    foundation::{core::Canvas, error::FrameinkResult},
    persist::schema::{from_json, to_json},
    timeline::model::Project,
};

/// Where a session keeps its serialized project.
pub trait ProjectStore {
    /// The stored document, or `None` when nothing has been saved yet.
    fn load(&self) -> FrameinkResult<Option<String>>;
    fn save(&mut self, json: &str) -> FrameinkResult<()>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    saved: Option<String>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(json: impl Into<String>) -> Self {
        Self {
            saved: Some(json.into()),
            saves: 0,
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.saved.as_deref()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl ProjectStore for MemoryStore {
    fn load(&self) -> FrameinkResult<Option<String>> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, json: &str) -> FrameinkResult<()> {
        self.saved = Some(json.to_owned());
        self.saves += 1;
        Ok(())
    }
}

/// A single JSON file. Saves go through a sibling temp file and a rename.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProjectStore for FileStore {
    fn load(&self) -> FrameinkResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("read project '{}'", self.path.display()))
                .into()),
        }
    }

    fn save(&mut self, json: &str) -> FrameinkResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create directory '{}'", parent.display()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).with_context(|| format!("write '{}'", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace '{}'", self.path.display()))?;
        Ok(())
    }
}

/// Load the stored project, or a fresh one on `canvas` when the store is empty, unreadable,
/// or holds an unusable document.
pub fn load_project(store: &dyn ProjectStore, canvas: Canvas) -> Project {
    match store.load() {
        Ok(Some(text)) => from_json(&text).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "discarding persisted project");
            Project::new(canvas)
        }),
        Ok(None) => Project::new(canvas),
        Err(e) => {
            tracing::warn!(error = %e, "project store unavailable; starting fresh");
            Project::new(canvas)
        }
    }
}

/// Serialize and save. Failures are logged and reported as `false`; the in-memory project
/// stays authoritative.
pub fn save_project(store: &mut dyn ProjectStore, project: &Project) -> bool {
    let result = to_json(project).and_then(|json| store.save(&json));
    if let Err(e) = &result {
        tracing::warn!(error = %e, "failed to persist project");
    }
    result.is_ok()
}

#[cfg(test)]
#[path = "../../tests/unit/persist/storage.rs"]
mod tests;
