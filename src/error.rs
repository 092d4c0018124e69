use thiserror::Error;

/// Errors surfaced to the plugin host by a metrics fetch
#[derive(Debug, Error)]
pub enum PluginError {
    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    /// Network failure or timeout while talking to the stats endpoint
    #[error("Failed to fetch stats: {0}")]
    Request(#[source] reqwest::Error),
    /// The response body is not a JSON object
    #[error("Failed to decode stats response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl PluginError {
    /// Short machine-readable name, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Client(_) => "client_error",
            Self::Request(_) => "request_error",
            Self::Decode(_) => "decode_error",
        }
    }
}
