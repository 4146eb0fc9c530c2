use thiserror::Error;

/// Failure outcomes of a query cycle.
///
/// All variants are recoverable: the coordinator turns them into a
/// `QueryState::Failure` and the front-end shows [`ErrorKind::user_message`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// The place name was empty after trimming. No request was made.
    #[error("No city name given")]
    EmptyInput,

    /// The geocoding search returned zero matches.
    #[error("No location found for '{query}'")]
    NotFound { query: String },

    /// Transport failure, non-2xx status or an undecodable/malformed body.
    #[error("Network error: {detail}")]
    NetworkError { detail: String },
}

impl ErrorKind {
    pub fn network(detail: impl Into<String>) -> Self {
        Self::NetworkError {
            detail: detail.into(),
        }
    }

    /// Short message suitable for the UI.
    pub fn user_message(&self) -> String {
        match self {
            ErrorKind::EmptyInput => "Please enter a city name.".to_string(),
            ErrorKind::NotFound { query } => {
                format!("City '{query}' not found. Check the spelling and try again.")
            }
            ErrorKind::NetworkError { .. } => {
                "Failed to fetch weather data. Check your connection and try again.".to_string()
            }
        }
    }
}
