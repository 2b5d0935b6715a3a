//! Error types for selection, submission and the prediction transport.

/// Error type for prediction server operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(String),
    /// Failed to parse response
    #[error("Parse error: {0}")]
    Parse(String),
    /// Failed to build the multipart request body
    #[error("Multipart error: {0}")]
    Multipart(String),
    /// Server returned an error status
    #[error("Server error (status {status}): {message}")]
    ServerError { status: u16, message: String },
}

#[cfg(target_arch = "wasm32")]
impl From<gloo_net::Error> for PredictError {
    fn from(err: gloo_net::Error) -> Self {
        PredictError::Http(err.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<reqwest::Error> for PredictError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PredictError::Parse(err.to_string())
        } else {
            PredictError::Http(err.to_string())
        }
    }
}

/// Conditions surfaced to the user as a blocking notification.
///
/// The `Display` text is the notification message itself.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UploadError {
    #[error("Please select a valid image file")]
    InvalidFileType { media_type: String },
    #[error("Please select an image")]
    NoImageSelected,
    #[error("A prediction is already in progress")]
    SubmitInFlight,
    #[error("Error during prediction")]
    RequestFailed(#[source] PredictError),
    #[error("Prediction cancelled")]
    Cancelled,
}

/// Unparsable configuration value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown selection policy '{0}' (expected 'retain' or 'clear-on-settle')")]
    UnknownSelectionPolicy(String),
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvasSize { width: u32, height: u32 },
}
