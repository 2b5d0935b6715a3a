//! Client configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Prediction server the client talks to unless configured otherwise.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Path of the prediction endpoint on the server.
pub const PREDICT_PATH: &str = "/predict/";

/// Histogram canvas size in logical units.
pub const DEFAULT_CANVAS_WIDTH: u32 = 600;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 400;

/// Fill color for histogram bars.
pub const DEFAULT_BAR_COLOR: &str = "blue";

/// What happens to the selected file once a request settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// Keep the selection; submitting again resends the same file.
    #[default]
    Retain,
    /// Drop the selection after success or failure.
    ClearOnSettle,
}

impl SelectionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionPolicy::Retain => "retain",
            SelectionPolicy::ClearOnSettle => "clear-on-settle",
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retain" => Ok(SelectionPolicy::Retain),
            "clear-on-settle" | "clear" => Ok(SelectionPolicy::ClearOnSettle),
            other => Err(ConfigError::UnknownSelectionPolicy(other.to_string())),
        }
    }
}

/// Settings shared by the browser and command-line frontends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictConfig {
    /// Base URL of the prediction server (e.g., "http://127.0.0.1:8000")
    pub server_url: String,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// CSS color used for histogram bars
    pub bar_color: String,
    pub selection_policy: SelectionPolicy,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            bar_color: DEFAULT_BAR_COLOR.to_string(),
            selection_policy: SelectionPolicy::default(),
        }
    }
}

impl PredictConfig {
    pub fn with_canvas_size(mut self, width: u32, height: u32) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidCanvasSize { width, height });
        }
        self.canvas_width = width;
        self.canvas_height = height;
        Ok(self)
    }
}
