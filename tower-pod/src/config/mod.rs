//! Pod configuration

mod loader;
mod schema;

pub use loader::{ConfigLoader, API_KEY_ENV, URL_ENV};
pub use schema::{ApiConfig, NamespaceConfig, PodConfig};
