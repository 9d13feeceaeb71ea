//! Prediction pipeline: artifact loading and inference.
//!
//! The trained model is an opaque artifact produced by an external training
//! job. It is loaded once at startup and shared read-only between requests.
//! The shipped format is a JSON-serialized standard-scaler + logistic
//! regression pipeline; anything implementing [`Predictor`] can stand in.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::patient::{FIELDS, GENDER};
use crate::models::EncodedRecord;

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("failed to read pipeline artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to deserialize pipeline artifact {path}: {source}")]
    Format {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid pipeline artifact: {0}")]
    Invalid(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    #[error("no value for column '{0}'")]
    MissingColumn(String),

    #[error("row has {got} values, model expects {expected}")]
    Shape { expected: usize, got: usize },

    #[error("model produced a non-finite score")]
    NonFinite,

    #[error("model returned no prediction")]
    Empty,

    #[error("{0}")]
    Model(String),
}

/// Named columns with rows of numeric values.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl Frame {
    /// Builds a one-row frame for `record`, ordered as `columns`.
    pub fn single_row(columns: &[String], record: &EncodedRecord) -> Result<Self, PredictError> {
        let row = columns
            .iter()
            .map(|column| {
                field_for_column(column)
                    .and_then(|field| record.get(field))
                    .map(|v| v as f64)
                    .ok_or_else(|| PredictError::MissingColumn(column.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            columns: columns.to_vec(),
            rows: vec![row],
        })
    }
}

/// Resolves a training-time column name ("CHRONIC DISEASE", "FATIGUE ")
/// to the canonical record field.
pub fn field_for_column(column: &str) -> Option<&'static str> {
    let key = column
        .trim()
        .to_ascii_lowercase()
        .replace([' ', '-'], "_");

    if key == "male" {
        return Some(GENDER);
    }
    FIELDS.iter().copied().find(|field| *field == key)
}

/// A loaded model that labels rows of a [`Frame`].
pub trait Predictor: Send + Sync {
    /// Column order used at training time.
    fn columns(&self) -> &[String];

    /// One label per row.
    fn predict(&self, frame: &Frame) -> Result<Vec<String>, PredictError>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    fn transform(&self, i: usize, x: f64) -> f64 {
        // zero variance columns are left unscaled
        let scale = match self.scale[i] {
            s if s == 0.0 => 1.0,
            s => s,
        };
        (x - self.mean[i]) / scale
    }
}

fn default_threshold() -> f64 {
    0.5
}

/// Serialized scaler + logistic regression pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct LogisticPipeline {
    pub columns: Vec<String>,
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// `[negative, positive]`
    pub classes: [String; 2],
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl LogisticPipeline {
    /// Parses and checks an artifact; `origin` names it in errors.
    pub fn from_json(json: &str, origin: &str) -> Result<Self, ArtifactError> {
        let pipeline: Self = serde_json::from_str(json).map_err(|source| ArtifactError::Format {
            path: origin.to_string(),
            source,
        })?;
        pipeline.check()?;
        Ok(pipeline)
    }

    fn check(&self) -> Result<(), ArtifactError> {
        let width = self.columns.len();
        if width == 0 {
            return Err(ArtifactError::Invalid("no columns".into()));
        }
        if self.coefficients.len() != width {
            return Err(ArtifactError::Invalid(format!(
                "{} coefficients for {} columns",
                self.coefficients.len(),
                width
            )));
        }
        if let Some(scaler) = &self.scaler {
            if scaler.mean.len() != width || scaler.scale.len() != width {
                return Err(ArtifactError::Invalid(format!(
                    "scaler has {}/{} entries for {} columns",
                    scaler.mean.len(),
                    scaler.scale.len(),
                    width
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ArtifactError::Invalid(format!(
                "threshold {} outside [0, 1]",
                self.threshold
            )));
        }
        Ok(())
    }

    /// Probability of the positive class for one row.
    pub fn probability(&self, row: &[f64]) -> Result<f64, PredictError> {
        if row.len() != self.coefficients.len() {
            return Err(PredictError::Shape {
                expected: self.coefficients.len(),
                got: row.len(),
            });
        }

        let z = row
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let x = match &self.scaler {
                    Some(scaler) => scaler.transform(i, x),
                    None => x,
                };
                self.coefficients[i] * x
            })
            .sum::<f64>()
            + self.intercept;

        let p = 1.0 / (1.0 + (-z).exp());
        if p.is_finite() {
            Ok(p)
        } else {
            Err(PredictError::NonFinite)
        }
    }
}

impl Predictor for LogisticPipeline {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn predict(&self, frame: &Frame) -> Result<Vec<String>, PredictError> {
        frame
            .rows
            .iter()
            .map(|row| {
                let p = self.probability(row)?;
                debug!(probability = p, "scored row");
                let [negative, positive] = &self.classes;
                let label = if p >= self.threshold { positive } else { negative };
                Ok(label.clone())
            })
            .collect()
    }
}

/// Reads and checks the pipeline artifact at `path`.
pub fn load_pipeline(path: impl AsRef<Path>) -> Result<LogisticPipeline, ArtifactError> {
    let path = path.as_ref();
    let shown = path.display().to_string();

    let json = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: shown.clone(),
        source,
    })?;
    let pipeline = LogisticPipeline::from_json(&json, &shown)?;

    info!(path = %shown, columns = pipeline.columns.len(), "pipeline loaded");
    Ok(pipeline)
}

/// Process-wide handle on the loaded pipeline.
///
/// Holds no pipeline when the artifact could not be loaded; every call then
/// fails with [`InvokeError::Unavailable`].
#[derive(Clone)]
pub struct PredictionService {
    pipeline: Option<Arc<dyn Predictor>>,
}

#[derive(Error, Debug, PartialEq)]
pub enum InvokeError {
    #[error("pipeline not loaded")]
    Unavailable,

    #[error(transparent)]
    Predict(#[from] PredictError),
}

impl PredictionService {
    pub fn new(pipeline: Arc<dyn Predictor>) -> Self {
        Self {
            pipeline: Some(pipeline),
        }
    }

    pub fn unavailable() -> Self {
        Self { pipeline: None }
    }

    pub fn is_loaded(&self) -> bool {
        self.pipeline.is_some()
    }

    /// Label for a single encoded record.
    pub fn predict(&self, record: &EncodedRecord) -> Result<String, InvokeError> {
        let pipeline = self.pipeline.as_ref().ok_or(InvokeError::Unavailable)?;
        let frame = Frame::single_row(pipeline.columns(), record)?;
        let labels = pipeline.predict(&frame)?;
        labels
            .into_iter()
            .next()
            .ok_or(InvokeError::Predict(PredictError::Empty))
    }
}

impl fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictionService")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
