//! Prediction request and result types.

use std::fmt;

use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::UploadError;

/// Media type prefix every uploaded file must carry.
pub const IMAGE_MEDIA_PREFIX: &str = "image/";

/// Prefix turning the server's bare base64 JPEG payload into a displayable URI.
pub const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// Reject anything whose declared media type is not an image.
pub fn validate_media_type(media_type: &str) -> Result<(), UploadError> {
    if media_type.starts_with(IMAGE_MEDIA_PREFIX) {
        Ok(())
    } else {
        Err(UploadError::InvalidFileType {
            media_type: media_type.to_string(),
        })
    }
}

/// The file chosen by the user, held until it is submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedImage {
    /// File name as reported by the picker (sent as the multipart file name)
    pub name: String,
    /// Declared media type, e.g. "image/png"
    pub media_type: String,
    /// Raw file contents
    pub bytes: Bytes,
}

impl SelectedImage {
    /// Build a selection, rejecting non-image media types.
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Result<Self, UploadError> {
        let media_type = media_type.into();
        validate_media_type(&media_type)?;
        Ok(Self {
            name: name.into(),
            media_type,
            bytes: bytes.into(),
        })
    }
}

/// One detected object: label, confidence and box in image pixel coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionItem {
    /// Class label
    pub class: String,
    /// Confidence in [0, 1]
    pub confidence: f64,
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl fmt::Display for PredictionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Class: {}, Confidence: {:.2}%, Bounding Box: (X_min: {:.2}, Y_min: {:.2}, X_max: {:.2}, Y_max: {:.2})",
            self.class,
            self.confidence * 100.0,
            self.x_min,
            self.y_min,
            self.x_max,
            self.y_max
        )
    }
}

/// JSON body returned by `POST /predict/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    pub predictions: Vec<PredictionItem>,
    /// Annotated image, base64 JPEG without a data-URI prefix
    pub image: String,
    /// Edge-detection image, base64 JPEG without a data-URI prefix
    pub edges: String,
    pub histogram: Vec<f64>,
}

/// A JPEG carried as a `data:` URI, ready to use as an `<img>` source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JpegDataUri(String);

impl JpegDataUri {
    pub fn from_base64(payload: &str) -> Self {
        Self(format!("{JPEG_DATA_URI_PREFIX}{payload}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The base64 payload with the URI prefix removed.
    pub fn payload(&self) -> &str {
        self.0
            .strip_prefix(JPEG_DATA_URI_PREFIX)
            .unwrap_or(&self.0)
    }

    /// Decode the payload back into raw JPEG bytes.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(self.payload())
    }
}

impl fmt::Display for JpegDataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything derived from one successful prediction response.
///
/// The four fields are always replaced together; a failed request never
/// produces a bundle, so earlier results stay intact.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultBundle {
    pub annotated: JpegDataUri,
    pub edges: JpegDataUri,
    pub histogram: Vec<f64>,
    pub predictions: Vec<PredictionItem>,
}

impl From<PredictResponse> for ResultBundle {
    fn from(response: PredictResponse) -> Self {
        Self {
            annotated: JpegDataUri::from_base64(&response.image),
            edges: JpegDataUri::from_base64(&response.edges),
            histogram: response.histogram,
            predictions: response.predictions,
        }
    }
}
