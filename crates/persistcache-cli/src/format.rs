use serde_json::Value;

/// Truncate a string to a maximum number of characters, adding an ellipsis
/// if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Single-line rendering of a value for listings
pub fn preview(value: &Value, max_len: usize) -> String {
    let line = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    truncate_string(&line, max_len)
}

/// Short type label for a JSON value
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
