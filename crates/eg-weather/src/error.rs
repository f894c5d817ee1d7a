//! Weather client error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    /// Transport failure: DNS, connect, TLS, timeout, reading the body.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("HTTP {status} from {endpoint} endpoint")]
    Status { status: u16, endpoint: &'static str },

    /// The body was not the JSON shape we expect.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The HTTP client could not be built.
    #[error("Client error: {0}")]
    Client(String),
}

impl WeatherError {
    /// Request failed or came back non-2xx.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Status { .. })
    }

    /// Response arrived but could not be parsed.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// HTTP status for non-2xx responses.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
