//! Response-shape normalization for the ledger API
//!
//! The provider's "list" results are JSON objects posing as arrays:
//! entries sit under numeric-string keys (`"0"`, `"1"`, ...), each
//! wrapping the actual object under its singular name. Occasionally the
//! numeric layer is skipped, or a real array appears. Everything here
//! flattens those shapes so the client never branches on key shape.

use serde_json::Value;

/// Whether the response body reports vendor-level success
pub fn status_is_ok(body: &Value) -> bool {
    body.pointer("/status/code").and_then(Value::as_str) == Some("OK")
}

/// Vendor status message, falling back to the status code
pub fn status_message(body: &Value) -> String {
    if let Some(message) = body.pointer("/status/message").and_then(Value::as_str) {
        if !message.trim().is_empty() {
            return message.trim().to_string();
        }
    }
    body.pointer("/status/code")
        .and_then(Value::as_str)
        .unwrap_or("unknown status")
        .to_string()
}

/// Extracts the entry objects under `module`, normalized to a plain list.
///
/// Handles all observed container shapes:
/// - `{"0": {"contractor": {...}}, "1": {...}}` (numeric keys, ascending)
/// - `{"contractor": {...}}` (singular, no numeric layer)
/// - `[{"contractor": {...}}, ...]` (a genuine array)
///
/// Entries missing the singular wrapper are taken as-is.
pub fn entries(body: &Value, module: &str, object: &str) -> Vec<Value> {
    let Some(container) = body.get(module) else {
        return Vec::new();
    };

    match container {
        Value::Object(map) => {
            let mut indexed: Vec<(u64, &Value)> = map
                .iter()
                .filter_map(|(key, value)| key.parse::<u64>().ok().map(|n| (n, value)))
                .collect();
            indexed.sort_by_key(|(n, _)| *n);

            let mut out: Vec<Value> =
                indexed.into_iter().map(|(_, entry)| unwrap_entry(entry, object)).collect();

            if out.is_empty() {
                if let Some(single) = map.get(object) {
                    out.push(single.clone());
                }
            }
            out
        }
        Value::Array(items) => items.iter().map(|entry| unwrap_entry(entry, object)).collect(),
        _ => Vec::new(),
    }
}

/// Whether an upstream error message points at the missing bookkeeping
/// scheme. Matched on the vendor's Polish wording.
pub fn mentions_accounting_scheme(message: &str) -> bool {
    message.to_lowercase().contains("schemat")
}

fn unwrap_entry(entry: &Value, object: &str) -> Value {
    entry.get(object).cloned().unwrap_or_else(|| entry.clone())
}
