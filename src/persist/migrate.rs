//! Schema upgrades. Each step is a pure function taking a document at one version to the next.

use serde_json::{Map, Value};

use crate::foundation::{
    core::Canvas,
    error::{FrameinkError, FrameinkResult},
};

pub const CURRENT_VERSION: &str = "1.2";

type Migration = fn(Map<String, Value>) -> FrameinkResult<Map<String, Value>>;

/// `(from, to, step)` for every supported version gap.
const MIGRATIONS: &[(&str, &str, Migration)] = &[
    ("1.0", "1.1", v1_0_to_v1_1),
    ("1.1", "1.2", v1_1_to_v1_2),
];

pub fn supported_versions() -> impl Iterator<Item = &'static str> {
    MIGRATIONS
        .iter()
        .map(|(from, _, _)| *from)
        .chain(std::iter::once(CURRENT_VERSION))
}

/// Bring a raw document up to [`CURRENT_VERSION`].
pub fn upgrade(value: Value) -> FrameinkResult<Value> {
    let Value::Object(mut doc) = value else {
        return Err(FrameinkError::malformed("project must be a JSON object"));
    };
    loop {
        let version = match doc.get("version") {
            Some(Value::String(v)) => v.clone(),
            Some(_) => return Err(FrameinkError::malformed("version must be a string")),
            None => return Err(FrameinkError::malformed("missing version")),
        };
        if version == CURRENT_VERSION {
            return Ok(Value::Object(doc));
        }
        let Some((_, to, step)) = MIGRATIONS.iter().find(|(from, _, _)| *from == version) else {
            return Err(FrameinkError::malformed(format!("unsupported version {version:?}")));
        };
        tracing::debug!(from = %version, to, "migrating project");
        doc = step(doc)?;
        doc.insert("version".to_owned(), Value::String((*to).to_owned()));
    }
}

fn layers_mut(doc: &mut Map<String, Value>) -> FrameinkResult<&mut Vec<Value>> {
    match doc.get_mut("layers") {
        Some(Value::Array(layers)) => Ok(layers),
        _ => Err(FrameinkError::malformed("missing layers")),
    }
}

/// 1.0 had no background layers and no stored canvas size.
fn v1_0_to_v1_1(mut doc: Map<String, Value>) -> FrameinkResult<Map<String, Value>> {
    for layer in layers_mut(&mut doc)? {
        if let Value::Object(layer) = layer {
            layer.entry("isBackground").or_insert(Value::Bool(false));
        }
    }
    let canvas = Canvas::default();
    doc.entry("canvasWidth").or_insert(Value::from(canvas.width));
    doc.entry("canvasHeight").or_insert(Value::from(canvas.height));
    Ok(doc)
}

/// 1.1 had no onion-skin settings and no holds; stray hold keys are dropped.
fn v1_1_to_v1_2(mut doc: Map<String, Value>) -> FrameinkResult<Map<String, Value>> {
    for layer in layers_mut(&mut doc)? {
        let Some(Value::Array(frames)) = layer.get_mut("frames") else {
            continue;
        };
        for frame in frames {
            if let Value::Object(frame) = frame {
                frame.remove("hold");
                frame.remove("holdReference");
            }
        }
    }
    if !doc.contains_key("onionSkinSettings") {
        let defaults = serde_json::to_value(crate::timeline::model::OnionSkinSettings::default())?;
        doc.insert("onionSkinSettings".to_owned(), defaults);
    }
    Ok(doc)
}

#[cfg(test)]
#[path = "../../tests/unit/persist/migrate.rs"]
mod tests;
