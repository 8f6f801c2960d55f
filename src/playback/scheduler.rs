use std::time::Duration;

use crate::{
    compositor::{compose::render, plan::RenderPlan},
    foundation::{core::Fps, error::FrameinkResult},
    timeline::model::Project,
};

/// Shortest tick interval, whatever the fps, so playback cannot starve the host loop.
pub const MIN_TICK: Duration = Duration::from_millis(16);
/// Ticks after which a single run is force-stopped.
pub const DEFAULT_MAX_TICKS: u64 = 100_000;

/// Receives each plan produced during playback.
pub trait FrameSink {
    fn present(&mut self, plan: &RenderPlan) -> FrameinkResult<()>;
}

impl<F> FrameSink for F
where
    F: FnMut(&RenderPlan) -> FrameinkResult<()>,
{
    fn present(&mut self, plan: &RenderPlan) -> FrameinkResult<()> {
        self(plan)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackSettings {
    pub min_tick: Duration,
    pub max_ticks: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            min_tick: MIN_TICK,
            max_ticks: DEFAULT_MAX_TICKS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

/// A continuation the host must deliver back through [`PlaybackScheduler::on_tick`] after
/// `delay` has elapsed.
///
/// Each run of the scheduler has its own generation; a tick from a stopped or replaced run is
/// ignored, so at most one tick chain can ever advance the playhead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledTick {
    generation: u64,
    pub delay: Duration,
}

#[derive(Clone, Copy, Debug)]
struct Run {
    generation: u64,
    ticks: u64,
    delay: Duration,
}

#[derive(Clone, Debug, Default)]
pub struct PlaybackScheduler {
    settings: PlaybackSettings,
    generation: u64,
    active: Option<Run>,
}

impl PlaybackScheduler {
    pub fn new(settings: PlaybackSettings) -> Self {
        Self {
            settings,
            generation: 0,
            active: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        if self.active.is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Stopped
        }
    }

    pub fn is_playing(&self) -> bool {
        self.active.is_some()
    }

    /// Ticks delivered in the current run.
    pub fn ticks(&self) -> u64 {
        self.active.map_or(0, |r| r.ticks)
    }

    pub fn tick_interval(&self, fps: Fps) -> Duration {
        Duration::from_millis(fps.frame_duration_ms()).max(self.settings.min_tick)
    }

    /// Begin playback. Any previous run is cancelled first.
    ///
    /// Returns `None` (and stays stopped) when there is only one frame to show.
    pub fn start(&mut self, project: &Project) -> Option<ScheduledTick> {
        self.stop();
        if project.max_frames() <= 1 {
            tracing::debug!("playback not started: single frame");
            return None;
        }
        self.generation += 1;
        let delay = self.tick_interval(project.fps);
        self.active = Some(Run {
            generation: self.generation,
            ticks: 0,
            delay,
        });
        tracing::debug!(generation = self.generation, ?delay, "playback started");
        Some(ScheduledTick {
            generation: self.generation,
            delay,
        })
    }

    /// Stop playback. Safe to call when already stopped; returns whether a run was active.
    pub fn stop(&mut self) -> bool {
        let was_playing = self.active.take().is_some();
        if was_playing {
            tracing::debug!(generation = self.generation, "playback stopped");
        }
        was_playing
    }

    /// Deliver a due tick: advance the playhead, render, and present.
    ///
    /// Stale ticks are no-ops. A sink error stops playback and is returned.
    pub fn on_tick(
        &mut self,
        tick: ScheduledTick,
        project: &mut Project,
        sink: &mut dyn FrameSink,
    ) -> FrameinkResult<Option<ScheduledTick>> {
        let Some(run) = self.active.as_mut() else {
            return Ok(None);
        };
        if run.generation != tick.generation {
            return Ok(None);
        }

        run.ticks += 1;
        let (generation, delay, ticks) = (run.generation, run.delay, run.ticks);
        if ticks > self.settings.max_ticks {
            tracing::warn!(ticks, "playback exceeded its tick budget; stopping");
            self.stop();
            return Ok(None);
        }

        let max_frames = project.max_frames();
        if max_frames <= 1 {
            self.stop();
            return Ok(None);
        }
        let next = (project.current_frame() + 1) % max_frames;
        project.set_current_frame(next);

        let plan = render(project, next);
        if let Err(e) = sink.present(&plan) {
            tracing::warn!(error = %e, "render failed during playback; stopping");
            self.stop();
            return Err(e);
        }
        Ok(Some(ScheduledTick { generation, delay }))
    }

    /// Change fps; a running playback restarts at the new cadence from the same playhead.
    pub fn set_fps(
        &mut self,
        project: &mut Project,
        fps: u32,
    ) -> FrameinkResult<Option<ScheduledTick>> {
        project.set_fps(fps)?;
        if self.is_playing() {
            return Ok(self.start(project));
        }
        Ok(None)
    }

    /// Drive playback from a plain loop, sleeping through `sleep` between ticks.
    ///
    /// Stops after `max_ticks` delivered ticks or when playback ends. Returns the number of
    /// ticks delivered.
    pub fn run_ticks(
        &mut self,
        project: &mut Project,
        sink: &mut dyn FrameSink,
        max_ticks: u64,
        mut sleep: impl FnMut(Duration),
    ) -> FrameinkResult<u64> {
        let mut next = self.start(project);
        let mut delivered = 0;
        while let Some(tick) = next {
            if delivered >= max_ticks {
                self.stop();
                break;
            }
            sleep(tick.delay);
            next = self.on_tick(tick, project, sink)?;
            if next.is_some() {
                delivered += 1;
            }
        }
        Ok(delivered)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/scheduler.rs"]
mod tests;
