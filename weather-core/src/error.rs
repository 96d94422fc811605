use thiserror::Error;

/// Why a weather fetch did not produce a snapshot.
///
/// Every variant is recoverable: the dashboard shows it to the user and keeps
/// whatever it was displaying before.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("City not found")]
    CityNotFound,

    #[error("Request failed: {0}")]
    RequestFailed(String),
}

impl FetchError {
    /// Text shown in the error notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidApiKey => {
                "Invalid API key. Please check your API key configuration.".to_string()
            }
            Self::CityNotFound => "City not found".to_string(),
            Self::RequestFailed(msg) => msg.clone(),
        }
    }
}
