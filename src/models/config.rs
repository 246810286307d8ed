//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::pagination::DEFAULT_PAGE_SIZE;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// Page size used when a request does not name one.
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    /// Requested page sizes above this are clamped down to it.
    #[serde(default = "max_page_size")]
    pub max_page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn max_page_size() -> usize {
    100
}

impl From<&ServerConfig> for crate::forms::members::PageLimits {
    fn from(config: &ServerConfig) -> Self {
        Self {
            default_size: config.default_page_size,
            max_size: config.max_page_size,
        }
    }
}
