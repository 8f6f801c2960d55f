//! Frameink is the core of a frame-by-frame vector animation editor.
//!
//! Pointer samples become smooth, optionally tapered strokes; strokes live in frames of
//! independent layers; any playhead composites into a renderer-agnostic [`RenderPlan`]:
//!
//! - Build strokes with [`StrokeBuilder`] (or let a [`Session`] drive it from pointer events)
//! - Edit the layered timeline through [`Project`]
//! - Composite with [`render`] and draw the plan as SVG ([`render_frame_to_vector_markup`]) or
//!   pixels ([`render_frame_to_surface`])
//! - Play back with [`PlaybackScheduler`], export with [`export_frames`]
//! - Persist with [`to_json`] / [`from_json`] behind a [`ProjectStore`]
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod compositor;
pub(crate) mod geometry;
pub(crate) mod history;
pub(crate) mod persist;
pub(crate) mod playback;
pub(crate) mod render;
pub(crate) mod session;
pub(crate) mod stroke;
pub(crate) mod timeline;

pub use crate::foundation::core::{
    Background, BezPath, Canvas, Color, Fps, Point, Rgba8Premul, Vec2,
};
pub use crate::foundation::error::{FrameinkError, FrameinkResult};

pub use crate::compositor::compose::{ghost_opacity, render, render_for_export};
pub use crate::compositor::plan::{GhostDraw, LayerDraw, RenderPlan};
pub use crate::geometry::builder::StrokeBuilder;
pub use crate::geometry::config::{Sample, StrokeConfig};
pub use crate::geometry::constrain::{
    CIRCLE_ASPECT_RATIO, CIRCLE_MIN_SIZE, Constraint, ConstraintKind, resolve_constraint,
};
pub use crate::geometry::path::{
    CURVE_TENSION, MAX_TAPER_REDUCTION, MIN_TAPER_WIDTH, dot_path, eraser_path, taper_width,
    taper_widths, tapered_outline, uniform_path,
};
pub use crate::geometry::smooth::{admits, smooth_points, smoothing_radius};
pub use crate::history::undo::{DEFAULT_UNDO_CAP, UndoEntry, UndoLog};
pub use crate::persist::migrate::{CURRENT_VERSION, supported_versions};
pub use crate::persist::schema::{
    FrameRecord, LayerRecord, ProjectFile, from_json, load_or_default, to_json,
};
pub use crate::persist::storage::{
    FileStore, MemoryStore, ProjectStore, load_project, save_project,
};
pub use crate::playback::scheduler::{
    DEFAULT_MAX_TICKS, FrameSink, MIN_TICK, PlaybackScheduler, PlaybackSettings, PlaybackState,
    ScheduledTick,
};
pub use crate::render::export::{
    ExportOptions, ExportedFrame, export_frames, write_gif, write_png_sequence,
};
pub use crate::render::raster::{
    FrameRGBA, RenderSettings, Surface, render_frame_to_surface, render_plan_to_surface,
};
pub use crate::render::svg::{plan_to_svg, render_frame_to_vector_markup};
pub use crate::session::editor::Session;
pub use crate::session::settings::EditorSettings;
pub use crate::stroke::model::{Paint, Stroke, StrokeGeometry, StrokeRecord, Tool};
pub use crate::timeline::model::{Frame, FrameId, Layer, LayerId, OnionSkinSettings, Project};
