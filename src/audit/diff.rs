//! Human-readable diffs between entity snapshots

use serde_json::Value;

/// Describe top-level field changes between two snapshots
///
/// Returns `None` when nothing changed. Nested objects and arrays are
/// summarized rather than descended into.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let (Value::Object(before_obj), Value::Object(after_obj)) = (before, after) else {
        return (before != after)
            .then(|| format!("{} -> {}", format_value(before), format_value(after)));
    };

    let mut changes = Vec::new();

    for (key, old) in before_obj {
        match after_obj.get(key) {
            Some(new) if new != old => {
                changes.push(format!("{}: {} -> {}", key, format_value(old), format_value(new)))
            }
            Some(_) => {}
            None => changes.push(format!("{}: {} -> (removed)", key, format_value(old))),
        }
    }

    for (key, new) in after_obj {
        if !before_obj.contains_key(key) {
            changes.push(format!("{}: (added) -> {}", key, format_value(new)));
        }
    }

    // Timestamps churn on every write
    changes.retain(|c| !c.starts_with("updated_at:"));

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > 50 => {
            let head: String = s.chars().take(47).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}
