// Rendering of API payloads into the plain text agents read

use serde_json::Value;

/// Tool output is capped at this many bytes.
pub const MAX_OUTPUT_BYTES: usize = 100_000;

/// Render a scalar the way a person would write it: strings without quotes,
/// everything else as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `key: value` lines for every field of an object, in the order the API
/// sent them.
pub fn key_value_lines(object: &serde_json::Map<String, Value>) -> Vec<String> {
    object
        .iter()
        .map(|(key, value)| format!("{}: {}", key, display_value(value)))
        .collect()
}

/// Status dump for a query execution record.
///
/// Accepts both the flat shape and the `{"query_status": {...}}` envelope.
pub fn query_status(response: &Value) -> String {
    let status = response.get("query_status").unwrap_or(response);
    let field = |name: &str| {
        status
            .get(name)
            .or_else(|| response.get(name))
            .filter(|v| !v.is_null())
    };

    let mut lines = vec!["Query status:".to_string()];
    if let Some(id) = field("id") {
        lines.push(format!("ID: {}", display_value(id)));
    }
    let state = field("status")
        .map(display_value)
        .unwrap_or_else(|| "unknown".to_string());
    lines.push(format!("Status: {}", state));
    if let Some(complete) = field("complete") {
        lines.push(format!("Complete: {}", display_value(complete)));
    }
    if let Some(progress) = field("progress") {
        lines.push(format!("Progress: {}", display_value(progress)));
    }
    if let Some(error) = field("error_message").or_else(|| field("error")) {
        if error != &Value::Bool(false) {
            lines.push(format!("Error: {}", display_value(error)));
        }
    }
    if let Some(results) = field("results") {
        lines.push(format!("Results: {}", display_value(results)));
    }
    lines.join("\n")
}

/// Tabular rendering of a finished query: header, columns, one row per line.
///
/// Returns `None` when the response carries no `results` array.
pub fn query_results(response: &Value) -> Option<String> {
    let rows = response.get("results")?.as_array()?;

    let mut lines = vec![format!("Query results ({} rows):", rows.len())];
    if let Some(columns) = response.get("columns").and_then(Value::as_array) {
        let names: Vec<String> = columns.iter().map(display_value).collect();
        lines.push(format!("Columns: {}", names.join(", ")));
    }
    lines.extend(rows.iter().map(Value::to_string));
    Some(lines.join("\n"))
}

/// Cut oversized output at a char boundary and mark it.
pub fn truncate_output(mut output: String) -> String {
    if output.len() <= MAX_OUTPUT_BYTES {
        return output;
    }
    let mut cut = MAX_OUTPUT_BYTES;
    while !output.is_char_boundary(cut) {
        cut -= 1;
    }
    output.truncate(cut);
    output.push_str("\n\n... (truncated, content too large)");
    output
}
