use resvg::tiny_skia;

use crate::{
    compositor::{
        compose::{render, render_for_export},
        plan::RenderPlan,
    },
    foundation::{
        core::{Canvas, Rgba8Premul},
        error::{FrameinkError, FrameinkResult},
    },
    render::svg::plan_to_svg,
    timeline::model::Project,
};

const MAX_DIM: u32 = 16_384;

/// Output options shared by raster rendering and export.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSettings {
    /// Output pixels per canvas unit.
    pub scale: f32,
    /// Draw onion-skin ghosts as the editor would. Off for real exports.
    pub onion_skin: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            onion_skin: false,
        }
    }
}

impl RenderSettings {
    /// Pixel size of a canvas at this scale.
    pub fn output_size(&self, canvas: Canvas) -> FrameinkResult<(u32, u32)> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(FrameinkError::export(format!(
                "render scale must be finite and > 0, got {}",
                self.scale
            )));
        }
        let px = |v: u32| ((v as f32) * self.scale).round().max(1.0) as u32;
        let (w, h) = (px(canvas.width), px(canvas.height));
        if w > MAX_DIM || h > MAX_DIM {
            return Err(FrameinkError::export(format!(
                "output size too large: {w}x{h} (max {MAX_DIM}x{MAX_DIM})"
            )));
        }
        Ok((w, h))
    }

    pub(crate) fn plan(&self, project: &Project, frame: usize) -> RenderPlan {
        if self.onion_skin {
            render(project, frame)
        } else {
            render_for_export(project, frame)
        }
    }
}

/// A captured frame.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha RGBA8, as image encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if !self.premultiplied {
            return out;
        }
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }
}

/// Premultiplied RGBA8 render target.
#[derive(Clone, Debug)]
pub struct Surface {
    pixmap: tiny_skia::Pixmap,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> FrameinkResult<Self> {
        let pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            FrameinkError::export(format!("failed to allocate {width}x{height} surface"))
        })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8Premul> {
        self.pixmap.pixel(x, y).map(|p| Rgba8Premul {
            r: p.red(),
            g: p.green(),
            b: p.blue(),
            a: p.alpha(),
        })
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    pub fn to_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.width(),
            height: self.height(),
            data: self.data().to_vec(),
            premultiplied: true,
        }
    }
}

/// Rasterize one playhead (no ghosts), scaled to fill `surface`.
pub fn render_frame_to_surface(
    surface: &mut Surface,
    project: &Project,
    frame: usize,
) -> FrameinkResult<()> {
    render_plan_to_surface(surface, &render_for_export(project, frame))
}

#[tracing::instrument(level = "trace", skip(surface, plan), fields(frame = plan.frame))]
pub fn render_plan_to_surface(surface: &mut Surface, plan: &RenderPlan) -> FrameinkResult<()> {
    let markup = plan_to_svg(plan);
    let tree = usvg::Tree::from_str(&markup, &usvg::Options::default())
        .map_err(|e| FrameinkError::export(format!("frame {} markup rejected: {e}", plan.frame)))?;

    let sx = surface.width() as f32 / plan.canvas.width as f32;
    let sy = surface.height() as f32 / plan.canvas.height as f32;
    surface.clear();
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(sx, sy),
        &mut surface.pixmap.as_mut(),
    );
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
