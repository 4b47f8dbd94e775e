use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

pub const DEFAULT_GRAPH_ENDPOINT: &str = "https://www.facebook.com/api/graphql/";

/// Worker configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub doc_id: String,
    pub graph_endpoint: String,
    pub page_size: u32,
    pub lease_seconds: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            doc_id: env::var("FEED_DOC_ID").context("FEED_DOC_ID must be set")?,
            graph_endpoint: env::var("GRAPH_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_GRAPH_ENDPOINT.to_string()),
            page_size: env::var("HARVEST_PAGE_SIZE")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .context("HARVEST_PAGE_SIZE must be a valid number")?,
            lease_seconds: env::var("HARVEST_LEASE_SECONDS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .context("HARVEST_LEASE_SECONDS must be a valid number")?,
        })
    }
}
