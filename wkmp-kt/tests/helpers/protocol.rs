//! Protocol helpers for driving the server in tests

use serde_json::Value;
use std::path::Path;

/// One request line (with trailing newline)
pub fn request_line(id: &str, path: &Path, key: Option<&str>) -> String {
    let mut request = serde_json::json!({ "id": id, "path": path });
    if let Some(key) = key {
        request["key"] = Value::String(key.to_string());
    }
    format!("{}\n", request)
}

/// Parse every output line, failing on anything that is not a JSON object
pub fn collect_messages(output: &[u8]) -> Vec<Value> {
    let text = std::str::from_utf8(output).expect("output is not UTF-8");
    text.lines()
        .map(|line| {
            let value: Value = serde_json::from_str(line)
                .unwrap_or_else(|e| panic!("corrupt output line {:?}: {}", line, e));
            assert!(value.is_object(), "output line is not an object: {}", line);
            value
        })
        .collect()
}
