//! HTTP client for the prediction server.
//!
//! The same client type works in the browser (gloo-net, `FormData` body) and
//! natively (reqwest multipart). Everything above the transport only sees
//! [`PredictTransport`], so tests can substitute their own.

use std::sync::Arc;

use crate::config::PREDICT_PATH;
use crate::error::PredictError;
use crate::state::UploadEvent;
use crate::types::{PredictResponse, ResultBundle, SelectedImage};

/// Multipart field carrying the uploaded file.
pub const FILE_FIELD: &str = "file";

/// Something that can turn an uploaded image into a prediction response.
#[allow(async_fn_in_trait)]
pub trait PredictTransport {
    async fn predict(&self, image: &SelectedImage) -> Result<PredictResponse, PredictError>;
}

/// Client for the prediction server's `POST /predict/` endpoint.
#[derive(Debug, Clone)]
pub struct PredictServerClient {
    base_url: String,
    #[cfg(not(target_arch = "wasm32"))]
    http: reqwest::Client,
}

impl PredictServerClient {
    /// Create a new client pointing to the given base URL.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the prediction server (e.g., "http://127.0.0.1:8000")
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            #[cfg(not(target_arch = "wasm32"))]
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn predict_url(&self) -> String {
        format!("{}{}", self.base_url, PREDICT_PATH)
    }
}

#[cfg(target_arch = "wasm32")]
impl PredictTransport for PredictServerClient {
    async fn predict(&self, image: &SelectedImage) -> Result<PredictResponse, PredictError> {
        use gloo_net::http::Request;

        let multipart = |e: wasm_bindgen::JsValue| PredictError::Multipart(format!("{e:?}"));

        let parts = js_sys::Array::new();
        parts.push(&js_sys::Uint8Array::from(&image.bytes[..]));
        let options = web_sys::BlobPropertyBag::new();
        options.set_type(&image.media_type);
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(multipart)?;

        let form = web_sys::FormData::new().map_err(multipart)?;
        form.append_with_blob_and_filename(FILE_FIELD, &blob, &image.name)
            .map_err(multipart)?;

        // The browser fills in `multipart/form-data; boundary=...` for FormData bodies.
        let response = Request::post(&self.predict_url())
            .body(form)?
            .send()
            .await?;

        if !response.ok() {
            return Err(PredictError::ServerError {
                status: response.status(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string()),
            });
        }

        response
            .json::<PredictResponse>()
            .await
            .map_err(|e| PredictError::Parse(e.to_string()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl PredictTransport for PredictServerClient {
    async fn predict(&self, image: &SelectedImage) -> Result<PredictResponse, PredictError> {
        use reqwest::multipart::{Form, Part};

        let part = Part::stream(image.bytes.clone())
            .file_name(image.name.clone())
            .mime_str(&image.media_type)
            .map_err(|e| PredictError::Multipart(e.to_string()))?;
        let form = Form::new().part(FILE_FIELD, part);

        // reqwest sets `multipart/form-data; boundary=...` from the form.
        let response = self
            .http
            .post(self.predict_url())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PredictError::ServerError {
                status: status.as_u16(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string()),
            });
        }

        response
            .json::<PredictResponse>()
            .await
            .map_err(|e| PredictError::Parse(e.to_string()))
    }
}

/// Issue one prediction request and translate the outcome into the event
/// that settles it.
pub async fn request_prediction<T: PredictTransport>(
    transport: &T,
    image: &SelectedImage,
) -> UploadEvent {
    tracing::debug!(
        name = %image.name,
        media_type = %image.media_type,
        size = image.bytes.len(),
        "submitting image for prediction"
    );

    match transport.predict(image).await {
        Ok(response) => {
            let bundle = ResultBundle::from(response);
            tracing::debug!(
                predictions = bundle.predictions.len(),
                bins = bundle.histogram.len(),
                "prediction received"
            );
            UploadEvent::SubmitSucceeded(Arc::new(bundle))
        }
        Err(e) => {
            tracing::error!("Error during prediction: {e}");
            UploadEvent::SubmitFailed(e)
        }
    }
}
