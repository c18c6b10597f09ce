//! Configuration schema structs

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tower_api::ClientConfig;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodConfig {
    pub api: ApiConfig,
    pub pod: NamespaceConfig,
}

/// API client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server address without the version suffix
    pub url: String,
    pub api_key: String,
    pub auth_header_name: String,
    pub prefix: String,
    pub verify_ssl: bool,
    pub raise_on_unexpected_status: bool,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "https://api.tower.dev".into(),
            api_key: String::new(),
            auth_header_name: "X-API-Key".into(),
            prefix: String::new(),
            verify_ssl: false,
            raise_on_unexpected_status: true,
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Versioned base address endpoints are joined to
    pub fn base_url(&self) -> String {
        format!("{}/v1", self.url.trim_end_matches('/'))
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url(),
            token: self.api_key.clone(),
            auth_header_name: self.auth_header_name.clone(),
            prefix: self.prefix.clone(),
            verify_ssl: self.verify_ssl,
            raise_on_unexpected_status: self.raise_on_unexpected_status,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Names of the namespaces announced in describe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceConfig {
    /// One var per operation, called with a single option map
    pub raw_namespace: String,
    /// Keyword-style wrappers over the raw namespace
    pub namespace: String,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            raw_namespace: "pod.tower.raw".into(),
            namespace: "pod.tower".into(),
        }
    }
}
