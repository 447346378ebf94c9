// Configuration loading: saved (possibly partial) JSON merged over typed defaults.
// See DESIGN.md: Grounding ledger, src/config.rs

use serde_json::Value;

use crate::error::EngineError;
use crate::types::StickyActionConfig;

/// Parse a saved configuration document.
///
/// The document must be a JSON object. It is merged over the serialized
/// defaults (objects recursively, `null` keeps the default, everything else
/// replaces) and then decoded into the typed config.
pub fn load_config(json: &str) -> Result<StickyActionConfig, EngineError> {
    let saved: Value = serde_json::from_str(json)?;
    config_from_value(saved)
}

pub fn config_from_value(mut saved: Value) -> Result<StickyActionConfig, EngineError> {
    if !saved.is_object() {
        return Err(EngineError::InvalidConfig(format!(
            "expected a JSON object, got {}",
            kind_of(&saved)
        )));
    }
    canonicalize_aliases(&mut saved);
    let mut merged = serde_json::to_value(StickyActionConfig::default())?;
    merge_json(&mut merged, &saved);
    serde_json::from_value(merged).map_err(|e| EngineError::InvalidConfig(e.to_string()))
}

/// Short field names older documents use, keyed by the object that holds them.
const ALIASES: &[(&str, &str, &str)] = &[
    ("displayRules", "showAfterScroll", "showAfterScrollPercent"),
    ("displayRules", "showAfterDelay", "showAfterDelayMs"),
    ("animation", "duration", "durationMs"),
];

/// Rename alias keys to their canonical names so they are not shadowed by
/// the defaults during the merge. A canonical key already present wins.
fn canonicalize_aliases(saved: &mut Value) {
    for (section, alias, canonical) in ALIASES {
        let Some(Value::Object(map)) = saved.get_mut(*section) else {
            continue;
        };
        if let Some(value) = map.remove(*alias) {
            if !map.contains_key(*canonical) {
                map.insert((*canonical).to_string(), value);
            }
        }
    }
}

/// Deep-merge `overlay` into `base`.
pub fn merge_json(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        if !value.is_null() {
                            base.insert(key.clone(), value.clone());
                        }
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
