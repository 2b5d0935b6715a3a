//! Shared core of the image prediction frontends.
//!
//! Holds everything that does not depend on a particular UI: the wire and
//! result types, the upload reducer, histogram layout, configuration and the
//! HTTP client. All types must stay WASM-compatible.

pub mod config;
pub mod error;
pub mod histogram;
pub mod predict_client;
pub mod selection;
pub mod session;
pub mod state;
mod types;

pub use config::{PredictConfig, SelectionPolicy};
pub use error::{ConfigError, PredictError, UploadError};
pub use histogram::{layout_histogram, DrawCommand};
pub use predict_client::{request_prediction, PredictServerClient, PredictTransport, FILE_FIELD};
pub use selection::{FileReads, ReadCompletion, ReadTicket};
pub use session::UploadSession;
pub use state::{UploadEvent, UploadState};
pub use types::{
    validate_media_type, JpegDataUri, PredictResponse, PredictionItem, ResultBundle, SelectedImage,
};
