//! Structured extraction of item drafts from a recovered feed document.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::types::{ExtractedPage, ItemDraft};

lazy_static! {
    static ref DIGIT_RUN: Regex = Regex::new(r"\d+").expect("valid regex");
}

const EDGES_PATH: &str = "/data/node/timeline_list_feed_units/edges";

/// Walk the feed edges of a recovered document into item drafts plus the
/// continuation token of the last edge.
///
/// Any missing intermediate field yields a `None` draft field, never an
/// error; edges without a feedback identifier are kept with `key = None` so
/// the writer can count them as skipped.
pub fn extract_page(doc: &Value) -> ExtractedPage {
    let edges = doc
        .pointer(EDGES_PATH)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let drafts = edges.iter().map(extract_edge).collect();

    let next_cursor = edges
        .last()
        .and_then(|edge| edge.get("cursor"))
        .and_then(Value::as_str)
        .map(str::to_string);

    ExtractedPage {
        drafts,
        next_cursor,
    }
}

fn extract_edge(edge: &Value) -> ItemDraft {
    let key = edge
        .pointer("/node/feedback/id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string);

    let external_id = key.as_deref().and_then(decode_external_id);

    let created_at = edge
        .pointer("/node/comet_sections/context_layout/story/comet_sections/metadata/0/story/creation_time")
        .and_then(Value::as_i64)
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

    let url = edge
        .pointer("/node/comet_sections/content/story/wwwURL")
        .and_then(Value::as_str)
        .map(str::to_string);

    let text = edge
        .pointer("/node/comet_sections/content/story/comet_sections/message/story/message/text")
        .and_then(Value::as_str)
        .map(str::to_string);

    let thread_id = edge
        .pointer("/node/comet_sections/content/story/id")
        .and_then(Value::as_str)
        .map(str::to_string);

    ItemDraft {
        key,
        external_id,
        created_at,
        url,
        text,
        thread_id,
    }
}

/// Base64-decode a feedback token and pull the leading run of digits.
fn decode_external_id(token: &str) -> Option<String> {
    let decoded = BASE64.decode(token).ok()?;
    let text = String::from_utf8_lossy(&decoded);
    DIGIT_RUN.find(&text).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // base64("feedback:123456")
    const FEEDBACK_TOKEN: &str = "ZmVlZGJhY2s6MTIzNDU2";

    fn edge(feedback_id: Option<&str>, cursor: &str) -> Value {
        json!({
            "node": {
                "feedback": feedback_id.map(|id| json!({"id": id})),
                "comet_sections": {
                    "context_layout": {
                        "story": {
                            "comet_sections": {
                                "metadata": [
                                    {"story": {"creation_time": 1_700_000_000}}
                                ]
                            }
                        }
                    },
                    "content": {
                        "story": {
                            "id": "story-1",
                            "wwwURL": "https://example.com/p/1",
                            "comet_sections": {
                                "message": {"story": {"message": {"text": "hello"}}}
                            }
                        }
                    }
                }
            },
            "cursor": cursor
        })
    }

    fn doc(edges: Vec<Value>) -> Value {
        json!({"data": {"node": {"timeline_list_feed_units": {"edges": edges}}}})
    }

    #[test]
    fn test_extracts_fields_and_cursor() {
        let doc = doc(vec![
            edge(Some(FEEDBACK_TOKEN), "AAA"),
            edge(Some(FEEDBACK_TOKEN), "BBB"),
        ]);

        let page = extract_page(&doc);
        assert_eq!(page.drafts.len(), 2);
        assert_eq!(page.next_cursor.as_deref(), Some("BBB"));

        let draft = &page.drafts[0];
        assert_eq!(draft.key.as_deref(), Some(FEEDBACK_TOKEN));
        assert_eq!(draft.external_id.as_deref(), Some("123456"));
        assert_eq!(draft.url.as_deref(), Some("https://example.com/p/1"));
        assert_eq!(draft.text.as_deref(), Some("hello"));
        assert_eq!(draft.thread_id.as_deref(), Some("story-1"));
        assert_eq!(
            draft.created_at,
            DateTime::<Utc>::from_timestamp(1_700_000_000, 0)
        );
    }

    #[test]
    fn test_edge_without_feedback_id_is_kept_unkeyed() {
        let page = extract_page(&doc(vec![edge(None, "AAA")]));
        assert_eq!(page.drafts.len(), 1);
        assert!(page.drafts[0].key.is_none());
        assert!(page.drafts[0].external_id.is_none());
        // still carries the continuation token
        assert_eq!(page.next_cursor.as_deref(), Some("AAA"));
    }

    #[test]
    fn test_missing_intermediate_fields_become_none() {
        let doc = doc(vec![json!({
            "node": {"feedback": {"id": FEEDBACK_TOKEN}},
            "cursor": "AAA"
        })]);

        let page = extract_page(&doc);
        let draft = &page.drafts[0];
        assert_eq!(draft.key.as_deref(), Some(FEEDBACK_TOKEN));
        assert!(draft.created_at.is_none());
        assert!(draft.url.is_none());
        assert!(draft.text.is_none());
        assert!(draft.thread_id.is_none());
    }

    #[test]
    fn test_empty_page_has_no_cursor() {
        let page = extract_page(&doc(vec![]));
        assert!(page.drafts.is_empty());
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn test_undecodable_token_yields_no_external_id() {
        assert!(decode_external_id("not-base64!!!").is_none());
    }
}
