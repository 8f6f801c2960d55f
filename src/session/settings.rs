use std::time::Duration;

use crate::{
    foundation::core::Canvas,
    geometry::config::StrokeConfig,
    history::undo::DEFAULT_UNDO_CAP,
    playback::scheduler::{DEFAULT_MAX_TICKS, MIN_TICK, PlaybackSettings},
};

/// Tunables for an editing session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EditorSettings {
    /// Brush used for new strokes until the host changes it.
    pub brush: StrokeConfig,
    /// Canvas size for projects created from scratch.
    pub canvas: Canvas,
    pub undo_cap: usize,
    pub playback: PlaybackSettings,
    /// Minimum spacing between background saves of a dirty project.
    pub autosave_interval: Duration,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            brush: StrokeConfig::default(),
            canvas: Canvas::default(),
            undo_cap: DEFAULT_UNDO_CAP,
            playback: PlaybackSettings::default(),
            autosave_interval: Duration::from_secs(30),
        }
    }
}

impl EditorSettings {
    /// Defaults overridden by `FRAMEINK_*` environment variables.
    ///
    /// Unparseable or out-of-range values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn parsed<T: std::str::FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            key: &str,
        ) -> Option<T> {
            lookup(key).and_then(|v| v.trim().parse::<T>().ok())
        }

        let mut s = Self::default();
        if let Some(n) = parsed::<usize>(&lookup, "FRAMEINK_UNDO_CAP").filter(|&n| n > 0) {
            s.undo_cap = n;
        }
        if let Some(ms) = parsed::<u64>(&lookup, "FRAMEINK_MIN_TICK_MS").filter(|&ms| ms > 0) {
            s.playback.min_tick = Duration::from_millis(ms).max(MIN_TICK);
        }
        if let Some(n) = parsed::<u64>(&lookup, "FRAMEINK_MAX_TICKS").filter(|&n| n > 0) {
            s.playback.max_ticks = n.min(DEFAULT_MAX_TICKS * 10);
        }
        if let Some(ms) = parsed::<u64>(&lookup, "FRAMEINK_AUTOSAVE_MS").filter(|&ms| ms > 0) {
            s.autosave_interval = Duration::from_millis(ms);
        }
        if let Some(w) = parsed::<f64>(&lookup, "FRAMEINK_BRUSH_WIDTH") {
            s.brush.base_width = w;
        }
        if let Some(v) = parsed::<f64>(&lookup, "FRAMEINK_SMOOTHING") {
            s.brush.smoothing = v;
        }
        if let Some(v) = parsed::<f64>(&lookup, "FRAMEINK_TAPER") {
            s.brush.taper = v;
        }
        if let (Some(w), Some(h)) = (
            parsed::<u32>(&lookup, "FRAMEINK_CANVAS_WIDTH"),
            parsed::<u32>(&lookup, "FRAMEINK_CANVAS_HEIGHT"),
        ) && let Ok(c) = Canvas::new(w, h)
        {
            s.canvas = c;
        }
        s.brush = s.brush.sanitized();
        s
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/settings.rs"]
mod tests;
