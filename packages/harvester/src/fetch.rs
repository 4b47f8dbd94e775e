//! Outbound feed page requests.

use async_trait::async_trait;
use serde_json::json;

use crate::error::HarvestError;
use crate::types::SweepMode;

/// Network seam for fetching one feed page as raw text.
///
/// A failed fetch is fatal for the invocation; the next scheduled run
/// retries naturally once the lease expires.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch_page(
        &self,
        source_id: &str,
        cursor: Option<&str>,
        mode: SweepMode,
    ) -> Result<String, HarvestError>;
}

/// Fetcher hitting the timeline GraphQL batch endpoint with a persisted
/// query id and a JSON `variables` form field.
pub struct GraphFeedClient {
    http: reqwest::Client,
    endpoint: String,
    doc_id: String,
    page_size: u32,
}

impl GraphFeedClient {
    pub fn new(endpoint: String, doc_id: String, page_size: u32) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            doc_id,
            page_size,
        }
    }

    fn variables(&self, source_id: &str, cursor: Option<&str>) -> serde_json::Value {
        json!({
            "count": self.page_size,
            "cursor": cursor,
            "feedLocation": "TIMELINE",
            "feedbackSource": 0,
            "omitPinnedPost": true,
            "renderLocation": "timeline",
            "scale": 1,
            "stream_count": self.page_size,
            "useDefaultActor": false,
            "id": source_id,
        })
    }
}

#[async_trait]
impl FeedFetcher for GraphFeedClient {
    async fn fetch_page(
        &self,
        source_id: &str,
        cursor: Option<&str>,
        mode: SweepMode,
    ) -> Result<String, HarvestError> {
        tracing::debug!(
            source_id,
            ?mode,
            has_cursor = cursor.is_some(),
            "requesting feed page"
        );

        let form = [
            ("fb_api_caller_class", "RelayModern".to_string()),
            (
                "fb_api_req_friendly_name",
                "ProfileCometTimelineFeedRefetchQuery".to_string(),
            ),
            ("server_timestamps", "true".to_string()),
            ("doc_id", self.doc_id.clone()),
            ("variables", self.variables(source_id, cursor).to_string()),
        ];

        let response = self
            .http
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        tracing::debug!(source_id, bytes = body.len(), "feed page received");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables_carry_cursor_and_source() {
        let client = GraphFeedClient::new(
            "https://example.com/api/graphql/".to_string(),
            "12345".to_string(),
            3,
        );

        let vars = client.variables("acct-1", Some("CURSOR"));
        assert_eq!(vars["id"], "acct-1");
        assert_eq!(vars["cursor"], "CURSOR");
        assert_eq!(vars["count"], 3);

        let vars = client.variables("acct-1", None);
        assert!(vars["cursor"].is_null());
    }
}
