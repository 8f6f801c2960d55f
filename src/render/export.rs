use std::{
    fs::File,
    io::BufWriter,
    ops::Range,
    path::{Path, PathBuf},
};

use image::codecs::gif::{GifEncoder, Repeat};

use crate::{
    foundation::error::{FrameinkError, FrameinkResult},
    render::raster::{FrameRGBA, RenderSettings, Surface, render_plan_to_surface},
    timeline::model::Project,
};

/// Options for [`export_frames`] and the file writers built on it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExportOptions {
    pub settings: RenderSettings,
    /// Playheads to export (exclusive end). `None` exports every frame.
    pub frames: Option<Range<usize>>,
}

impl ExportOptions {
    fn resolve_range(&self, project: &Project) -> FrameinkResult<Range<usize>> {
        let max = project.max_frames();
        let range = self.frames.clone().unwrap_or(0..max);
        if range.is_empty() || range.end > max {
            return Err(FrameinkError::export(format!(
                "export range {range:?} is outside 0..{max}"
            )));
        }
        Ok(range)
    }
}

/// One rasterized frame handed to an export callback.
#[derive(Clone, Copy, Debug)]
pub struct ExportedFrame<'a> {
    /// Playhead the pixels were rendered at.
    pub index: usize,
    /// Zero-based position within this export.
    pub position: usize,
    /// Frames in this export.
    pub total: usize,
    pub image: &'a FrameRGBA,
}

/// Rasterize frames one at a time, handing each to `callback` before rendering the next.
///
/// Returns the number of frames delivered. The first error, from rendering or from the
/// callback, ends the export.
#[tracing::instrument(skip(project, callback), fields(frames = project.max_frames()))]
pub fn export_frames<F>(
    project: &Project,
    opts: &ExportOptions,
    mut callback: F,
) -> FrameinkResult<usize>
where
    F: FnMut(ExportedFrame<'_>) -> FrameinkResult<()>,
{
    let range = opts.resolve_range(project)?;
    let (w, h) = opts.settings.output_size(project.canvas)?;
    let mut surface = Surface::new(w, h)?;
    let total = range.len();

    for (position, index) in range.enumerate() {
        let plan = opts.settings.plan(project, index);
        render_plan_to_surface(&mut surface, &plan)?;
        let image = surface.to_frame();
        callback(ExportedFrame {
            index,
            position,
            total,
            image: &image,
        })?;
        tracing::trace!(index, position, total, "frame exported");
    }
    Ok(total)
}

/// Write `frame_0000.png`, `frame_0001.png`, ... into `dir`.
///
/// On failure every file this call already wrote is removed.
pub fn write_png_sequence(
    project: &Project,
    dir: &Path,
    opts: &ExportOptions,
) -> FrameinkResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| {
        FrameinkError::export(format!("create output dir '{}': {e}", dir.display()))
    })?;

    let mut written = Vec::new();
    let result = export_frames(project, opts, |f| {
        let path = dir.join(format!("frame_{:04}.png", f.index));
        image::save_buffer_with_format(
            &path,
            &f.image.to_straight_rgba8(),
            f.image.width,
            f.image.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| FrameinkError::export(format!("write png '{}': {e}", path.display())))?;
        written.push(path);
        Ok(())
    });

    match result {
        Ok(_) => Ok(written),
        Err(e) => {
            for path in &written {
                let _ = std::fs::remove_file(path);
            }
            Err(e)
        }
    }
}

/// Write a looping animated GIF timed at the project's fps.
///
/// The file is assembled next to `path` and only moved into place once complete.
pub fn write_gif(project: &Project, path: &Path, opts: &ExportOptions) -> FrameinkResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            FrameinkError::export(format!("create output dir '{}': {e}", parent.display()))
        })?;
    }
    let partial = path.with_extension("gif.partial");
    let result = encode_gif(project, &partial, opts)
        .and_then(|()| {
            std::fs::rename(&partial, path).map_err(|e| {
                FrameinkError::export(format!("move gif into '{}': {e}", path.display()))
            })
        });
    if result.is_err() {
        let _ = std::fs::remove_file(&partial);
    }
    result
}

fn encode_gif(project: &Project, path: &Path, opts: &ExportOptions) -> FrameinkResult<()> {
    let file = File::create(path)
        .map_err(|e| FrameinkError::export(format!("create '{}': {e}", path.display())))?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder
        .set_repeat(Repeat::Infinite)
        .map_err(|e| FrameinkError::export(format!("gif: {e}")))?;
    let delay = image::Delay::from_numer_denom_ms(1000, project.fps.0.max(1));

    export_frames(project, opts, |f| {
        let img = image::RgbaImage::from_raw(
            f.image.width,
            f.image.height,
            f.image.to_straight_rgba8(),
        )
        .ok_or_else(|| FrameinkError::export("frame buffer does not match its size"))?;
        encoder
            .encode_frame(image::Frame::from_parts(img, 0, 0, delay))
            .map_err(|e| FrameinkError::export(format!("gif frame {}: {e}", f.index)))
    })?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/export.rs"]
mod tests;
