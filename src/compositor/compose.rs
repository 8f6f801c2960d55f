use crate::{
    compositor::plan::{GhostDraw, LayerDraw, RenderPlan},
    foundation::core::Color,
    stroke::model::Stroke,
    timeline::model::{Layer, OnionSkinSettings, Project},
};

/// Build the draw list for `playhead`, with onion-skin ghosts when the project enables them.
#[tracing::instrument(level = "trace", skip(project))]
pub fn render(project: &Project, playhead: usize) -> RenderPlan {
    compose(project, playhead, project.onion_skin_enabled)
}

/// Build the draw list for `playhead` without ghosts, as exporters want it.
pub fn render_for_export(project: &Project, playhead: usize) -> RenderPlan {
    compose(project, playhead, false)
}

fn compose(project: &Project, playhead: usize, with_ghosts: bool) -> RenderPlan {
    let layers = project
        .layers()
        .iter()
        .map(|layer| main_entry(layer, playhead))
        .collect();

    let mut ghosts = Vec::new();
    if with_ghosts {
        let settings = project.onion_skin.sanitized();
        let max_frames = project.max_frames();
        for layer in project.layers() {
            if layer.is_background || !layer.visible {
                continue;
            }
            collect_ghosts(layer, playhead, max_frames, &settings, &mut ghosts);
        }
    }

    RenderPlan {
        frame: playhead,
        canvas: project.canvas,
        background: project.background,
        layers,
        ghosts,
    }
}

fn main_entry(layer: &Layer, playhead: usize) -> LayerDraw {
    if !layer.visible {
        return LayerDraw {
            layer_id: layer.id,
            visible: false,
            opacity: 0.0,
            source_frame: None,
            strokes: Vec::new(),
        };
    }
    let resolved = layer.resolve_effective_frame(playhead);
    LayerDraw {
        layer_id: layer.id,
        visible: true,
        opacity: 1.0,
        source_frame: resolved.and_then(|f| layer.index_of(f.id())),
        strokes: resolved.map(|f| f.strokes().to_vec()).unwrap_or_default(),
    }
}

/// Opacity of the ghost `distance` frames away on a side configured with `depth` frames.
///
/// Falls off linearly to half the base opacity across the configured depth.
pub fn ghost_opacity(base_percent: f64, distance: u32, depth: u32) -> f64 {
    if depth == 0 || distance == 0 {
        return 0.0;
    }
    let falloff = 1.0 - f64::from(distance - 1) / f64::from(depth) * 0.5;
    (base_percent / 100.0) * falloff
}

fn collect_ghosts(
    layer: &Layer,
    playhead: usize,
    max_frames: usize,
    settings: &OnionSkinSettings,
    out: &mut Vec<GhostDraw>,
) {
    for i in 1..=settings.frames_before {
        let Some(index) = playhead.checked_sub(i as usize) else {
            break;
        };
        let Some(frame) = layer.resolve_effective_frame(index) else {
            break;
        };
        out.push(GhostDraw {
            layer_id: layer.id,
            offset: -i64::from(i),
            opacity: ghost_opacity(settings.before_opacity, i, settings.frames_before),
            strokes: tint(frame.strokes(), settings.before_color),
        });
    }

    for i in 1..=settings.frames_after {
        let Some(index) = playhead.checked_add(i as usize).filter(|&at| at < max_frames) else {
            break;
        };
        let Some(frame) = layer.resolve_effective_frame(index) else {
            break;
        };
        out.push(GhostDraw {
            layer_id: layer.id,
            offset: i64::from(i),
            opacity: ghost_opacity(settings.after_opacity, i, settings.frames_after),
            strokes: tint(frame.strokes(), settings.after_color),
        });
    }
}

fn tint(strokes: &[Stroke], color: Color) -> Vec<Stroke> {
    strokes.iter().map(|s| s.recolored(color)).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/compose.rs"]
mod tests;
