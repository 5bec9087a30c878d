use serde::{Deserialize, Serialize};

use crate::gateway::Endpoint;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Settings the host hands to the browser bundle at `/config`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: String,
    #[serde(default)]
    pub debug_mode: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            debug_mode: false,
        }
    }
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Self::default()
        }
    }

    /// Absolute URL of an endpoint; a trailing slash on the base is ignored.
    pub fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.api_base_url.trim_end_matches('/'), endpoint.path())
    }
}
