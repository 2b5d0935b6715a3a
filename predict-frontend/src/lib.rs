pub mod histogram;
pub mod upload_app;

pub use upload_app::UploadPredictClient;
