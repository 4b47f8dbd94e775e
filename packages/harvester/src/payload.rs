//! Recovery of fragment-concatenated feed responses.
//!
//! The feed endpoint prefixes its body with an anti-scraping guard token and
//! may concatenate several JSON objects with no separator between them. The
//! fragment splitter is a pure total function over the raw text; `recover`
//! parses only the first reassembled fragment, since the primary payload is
//! always first and later fragments carry no feed content.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::error::HarvestError;

/// Guard token prepended to every response body.
const GUARD_TOKEN: &str = "for (;;);";

lazy_static! {
    /// Boundary between two concatenated object fragments.
    static ref FRAGMENT_BOUNDARY: Regex = Regex::new(r"\}\r*\n*\{").expect("valid regex");
}

/// Strip the guard token and split the body into brace-repaired fragments.
///
/// Splitting consumes the closing and opening braces at each boundary, so
/// every fragment except the first gets a `{` prepended and every fragment
/// except the last gets a `}` appended.
pub fn split_fragments(raw: &str) -> Vec<String> {
    let stripped = raw.replace(GUARD_TOKEN, "");
    let parts: Vec<&str> = FRAGMENT_BOUNDARY.split(&stripped).collect();

    if parts.len() == 1 {
        return vec![stripped];
    }

    let last = parts.len() - 1;
    parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            if i == 0 {
                format!("{part}}}")
            } else if i == last {
                format!("{{{part}")
            } else {
                format!("{{{part}}}")
            }
        })
        .collect()
}

/// Recover the primary payload from a raw response body.
///
/// Fails with `MalformedPayload` unless the first fragment parses as a JSON
/// object carrying a top-level `data` field.
pub fn recover(raw: &str) -> Result<Value, HarvestError> {
    let fragments = split_fragments(raw);
    // split always yields at least one part
    let first = &fragments[0];

    let doc: Value = serde_json::from_str(first)
        .map_err(|e| HarvestError::MalformedPayload(format!("first fragment is not JSON: {e}")))?;

    if doc.get("data").is_none() {
        return Err(HarvestError::MalformedPayload(
            "first fragment has no top-level `data` field".to_string(),
        ));
    }

    Ok(doc)
}
