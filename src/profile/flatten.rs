use serde_json::Value;

/// Depth-first text rendering of a JSON value: `"key: value"` for mapping
/// entries and `"Item N: value"` for list elements, nested prefixes chained.
pub fn flatten_to_text(value: &Value) -> String {
    let mut lines = Vec::new();
    flatten_into(value, "", &mut lines);
    lines.join("\n")
}

fn flatten_into(value: &Value, prefix: &str, lines: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if child.is_object() || child.is_array() {
                    flatten_into(child, &format!("{}{}: ", prefix, key), lines);
                } else {
                    lines.push(format!("{}{}: {}", prefix, key, scalar_text(child)));
                }
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if item.is_object() || item.is_array() {
                    flatten_into(item, &format!("{}Item {}: ", prefix, i + 1), lines);
                } else {
                    lines.push(format!("{}Item {}: {}", prefix, i + 1, scalar_text(item)));
                }
            }
        }
        scalar => lines.push(format!("{}{}", prefix, scalar_text(scalar))),
    }
}

/// Strings verbatim, other scalars in their JSON form, null as nothing.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Text form of any value: strings verbatim, containers flattened.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Object(_) | Value::Array(_) => flatten_to_text(value),
        scalar => scalar_text(scalar),
    }
}
