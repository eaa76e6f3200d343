use std::env;

use anyhow::Context;

/// Where the remote article API lives and how we authenticate against it.
///
/// The fetcher only ever sees this struct; how the key was obtained (a local
/// `.env`, the ambient environment, a test harness) is the caller's business.
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
}

pub const DEFAULT_BASE_URL: &str = "https://api.elsevier.com/content/article/pii";

impl ApiConfig {
    /// Read the configuration from the process environment, honouring a
    /// local `.env` file when one exists.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        let api_key = env::var("API_KEY").context("API_KEY is not set")?;
        let base_url = env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(ApiConfig { base_url, api_key })
    }
}

/// Constant values of the target schema.
///
/// Immutable and passed by reference into the transformer so the constants
/// live in exactly one place.
pub struct Defaults {
    pub thumbnail: Option<&'static str>,
    pub permission: &'static str,
    pub media_type: &'static str,
    pub tags: &'static str,
    pub kind: &'static str,
    pub created_by: Option<&'static str>,
    pub updated: &'static str,
    pub is_deleted: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            thumbnail: None,
            permission: "Global",
            media_type: "article",
            tags: "research",
            kind: "ki",
            created_by: None,
            updated: "",
            is_deleted: false,
        }
    }
}
