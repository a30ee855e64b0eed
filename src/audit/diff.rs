//! Human-readable diffs of audit values
//!
//! Summarises an audit's old/new documents for terminal output. Keys only
//! present on one side show up as `(added)` or `(removed)`.

use serde_json::Value;

/// One-line summary of top-level changes between two documents
pub fn generate_diff(old: &Value, new: &Value) -> Option<String> {
    let changes = match (old, new) {
        (Value::Object(_), Value::Object(_)) => {
            // Only top-level keys; nested values are summarised
            let mut changes = Vec::new();
            collect_changes(old, new, "", false, &mut changes);
            changes
        }
        _ if old != new => vec![format!("{} -> {}", format_value(old), format_value(new))],
        _ => Vec::new(),
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

/// Every change down to nested object fields and array items, one per line
pub fn generate_detailed_diff(old: &Value, new: &Value) -> Vec<String> {
    let mut changes = Vec::new();
    collect_changes(old, new, "", true, &mut changes);
    changes
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn labelled(path: &str, text: String) -> String {
    if path.is_empty() {
        text
    } else {
        format!("{}: {}", path, text)
    }
}

fn collect_changes(old: &Value, new: &Value, path: &str, recurse: bool, out: &mut Vec<String>) {
    match (old, new) {
        (Value::Object(old_obj), Value::Object(new_obj)) => {
            for (key, old_val) in old_obj {
                let field = join_path(path, key);
                match new_obj.get(key) {
                    Some(new_val) if old_val == new_val => {}
                    Some(new_val) if recurse => collect_changes(old_val, new_val, &field, true, out),
                    Some(new_val) => out.push(labelled(
                        &field,
                        format!("{} -> {}", format_value(old_val), format_value(new_val)),
                    )),
                    None => out.push(labelled(
                        &field,
                        format!("{} -> (removed)", format_value(old_val)),
                    )),
                }
            }

            for (key, new_val) in new_obj {
                if !old_obj.contains_key(key) {
                    out.push(labelled(
                        &join_path(path, key),
                        format!("(added) -> {}", format_value(new_val)),
                    ));
                }
            }
        }
        (Value::Array(old_arr), Value::Array(new_arr)) if recurse => {
            if old_arr.len() != new_arr.len() {
                out.push(labelled(
                    path,
                    format!("[{} items] -> [{} items]", old_arr.len(), new_arr.len()),
                ));
                return;
            }
            for (i, (o, n)) in old_arr.iter().zip(new_arr.iter()).enumerate() {
                if o != n {
                    collect_changes(o, n, &format!("{}[{}]", path, i), true, out);
                }
            }
        }
        _ => {
            if old != new {
                out.push(labelled(
                    path,
                    format!("{} -> {}", format_value(old), format_value(new)),
                ));
            }
        }
    }
}

/// Format a JSON value for human-readable display
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            // Truncate long strings
            if s.chars().count() > 50 {
                let head: String = s.chars().take(47).collect();
                format!("\"{}...\"", head)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}
