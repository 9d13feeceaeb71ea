use serde::Serialize;

pub const POSITIVE_LABEL: &str = "YES";
pub const SUCCESS_MESSAGE: &str = "Prediction completed successfully";
pub const HIGH_RISK: &str = "High probability of Lung Cancer";
pub const LOW_RISK: &str = "Low probability of Lung Cancer";

/// Human readable verdict for a raw model label.
pub fn verdict(label: &str) -> &'static str {
    if label == POSITIVE_LABEL {
        HIGH_RISK
    } else {
        LOW_RISK
    }
}

/// Body of a successful `/predict` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionResponse {
    pub message: String,
    pub result: String,
    pub cancer: String,
}

impl PredictionResponse {
    pub fn from_label(label: String) -> Self {
        Self {
            message: SUCCESS_MESSAGE.to_string(),
            result: verdict(&label).to_string(),
            cancer: label,
        }
    }
}
