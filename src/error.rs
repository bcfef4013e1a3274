use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Required settings are missing or empty.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The server answered, but not with a success status.
    #[error("failed to fetch {url}: {status} {reason}")]
    Fetch {
        url: String,
        status: u16,
        reason: String,
    },

    /// The request never produced a response.
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid manifest from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("documentation container '{selector}' not found at {url}")]
    ContainerNotFound { url: String, selector: String },

    #[error("browser driver: {0}")]
    Driver(String),
}
