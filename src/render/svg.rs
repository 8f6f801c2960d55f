use crate::{
    compositor::{compose::render_for_export, plan::RenderPlan},
    foundation::core::{Canvas, Color},
    stroke::model::{Stroke, StrokeGeometry},
    timeline::model::Project,
};

/// SVG document for one playhead, without onion-skin ghosts.
pub fn render_frame_to_vector_markup(project: &Project, frame: usize) -> String {
    plan_to_svg(&render_for_export(project, frame))
}

/// SVG document for any plan. Paint order: background, ghosts, then layers bottom to top.
///
/// Eraser strokes become luminance masks wrapped around everything drawn before them in the
/// same layer group, so they never reach other layers or later strokes.
pub fn plan_to_svg(plan: &RenderPlan) -> String {
    let Canvas { width, height } = plan.canvas;
    let mut defs = String::new();
    let mut body = String::new();
    let mut masks = 0usize;

    if let Some(bg) = plan.background.color() {
        body.push_str(&format!(
            r#"<rect x="0" y="0" width="{width}" height="{height}" fill="{}"{}/>"#,
            hex6(bg),
            alpha_attr("fill-opacity", bg)
        ));
    }

    for ghost in &plan.ghosts {
        let content = layer_body(&ghost.strokes, plan.canvas, &mut defs, &mut masks);
        if content.is_empty() {
            continue;
        }
        body.push_str(&format!(
            r#"<g data-ghost="{}" data-offset="{}" opacity="{}">{content}</g>"#,
            ghost.layer_id, ghost.offset, ghost.opacity
        ));
    }

    for layer in plan.visible_layers() {
        let content = layer_body(&layer.strokes, plan.canvas, &mut defs, &mut masks);
        if content.is_empty() {
            continue;
        }
        if layer.opacity < 1.0 {
            body.push_str(&format!(
                r#"<g id="{}" opacity="{}">{content}</g>"#,
                layer.layer_id, layer.opacity
            ));
        } else {
            body.push_str(&format!(r#"<g id="{}">{content}</g>"#, layer.layer_id));
        }
    }

    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    if !defs.is_empty() {
        out.push_str("<defs>");
        out.push_str(&defs);
        out.push_str("</defs>");
    }
    out.push_str(&body);
    out.push_str("</svg>");
    out
}

fn layer_body(strokes: &[Stroke], canvas: Canvas, defs: &mut String, masks: &mut usize) -> String {
    let mut acc = String::new();
    for stroke in strokes {
        if !stroke.is_eraser() {
            acc.push_str(&stroke_element(stroke, stroke.paint.color));
            continue;
        }
        if acc.is_empty() {
            continue;
        }
        let id = format!("erase{}", *masks);
        *masks += 1;
        defs.push_str(&format!(
            r##"<mask id="{id}" maskUnits="userSpaceOnUse" x="0" y="0" width="{w}" height="{h}"><rect x="0" y="0" width="{w}" height="{h}" fill="#ffffff"/>{}</mask>"##,
            stroke_element(stroke, Color::BLACK),
            w = canvas.width,
            h = canvas.height,
        ));
        acc = format!(r#"<g mask="url(#{id})">{acc}</g>"#);
    }
    acc
}

fn stroke_element(stroke: &Stroke, color: Color) -> String {
    match &stroke.geometry {
        StrokeGeometry::Stroked { path, width } => format!(
            r#"<path d="{}" fill="none" stroke="{}"{} stroke-width="{width}" stroke-linecap="round" stroke-linejoin="round"/>"#,
            path.to_svg(),
            hex6(color),
            alpha_attr("stroke-opacity", color)
        ),
        StrokeGeometry::Filled { outline } => format!(
            r#"<path d="{}" fill="{}"{} stroke="none"/>"#,
            outline.to_svg(),
            hex6(color),
            alpha_attr("fill-opacity", color)
        ),
    }
}

fn hex6(c: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

fn alpha_attr(name: &str, c: Color) -> String {
    if c.a == 255 {
        String::new()
    } else {
        format!(r#" {name}="{:.4}""#, f64::from(c.a) / 255.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
