#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use lungcare::api::AppState;
use lungcare::config::FailurePolicy;
use lungcare::core::pipeline::{Frame, PredictError};
use lungcare::core::{load_pipeline, PredictionService, Predictor};
use serde_json::{json, Value};

pub fn artifact_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("pipeline/lung_cancer_prediction.json")
}

/// The documented example request.
pub fn example_payload() -> Value {
    json!({
        "gender": "m",
        "age": 50,
        "smoking": "y",
        "yellow_fingers": "n",
        "anxiety": "n",
        "peer_pressure": "n",
        "chronic_disease": "n",
        "fatigue": "y",
        "allergy": "n",
        "wheezing": "y",
        "alcohol_consuming": "n",
        "coughing": "y",
        "shortness_of_breath": "y",
        "swallowing_difficulty": "n",
        "chest_pain": "y"
    })
}

/// Every symptom set to `flag`.
pub fn uniform_payload(gender: &str, age: i64, flag: &str) -> Value {
    let mut payload = example_payload();
    let object = payload.as_object_mut().unwrap();
    for value in object.values_mut() {
        *value = json!(flag);
    }
    object.insert("gender".into(), json!(gender));
    object.insert("age".into(), json!(age));
    payload
}

pub fn shipped_state() -> AppState {
    let pipeline = load_pipeline(artifact_path()).expect("shipped artifact loads");
    AppState::new(PredictionService::new(Arc::new(pipeline)), FailurePolicy::Respond)
}

pub fn unavailable_state() -> AppState {
    AppState::new(PredictionService::unavailable(), FailurePolicy::Respond)
}

/// Predictor double that records how often it was called.
pub struct StubPredictor {
    pub columns: Vec<String>,
    pub outcome: Result<Vec<String>, PredictError>,
    pub calls: AtomicUsize,
}

impl StubPredictor {
    pub fn answering(labels: &[&str]) -> Arc<Self> {
        Self::with_outcome(Ok(labels.iter().map(|l| l.to_string()).collect()))
    }

    pub fn with_outcome(outcome: Result<Vec<String>, PredictError>) -> Arc<Self> {
        Arc::new(Self {
            columns: vec!["GENDER".into(), "AGE".into(), "SMOKING".into()],
            outcome,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Predictor for StubPredictor {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn predict(&self, _frame: &Frame) -> Result<Vec<String>, PredictError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

pub fn stub_state(stub: Arc<StubPredictor>) -> AppState {
    AppState::new(PredictionService::new(stub), FailurePolicy::Respond)
}
