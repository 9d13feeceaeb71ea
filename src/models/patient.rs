use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::FieldErrors;

pub const GENDER: &str = "gender";
pub const AGE: &str = "age";

/// The thirteen yes/no indicators, in training column order.
pub const SYMPTOM_FIELDS: [&str; 13] = [
    "smoking",
    "yellow_fingers",
    "anxiety",
    "peer_pressure",
    "chronic_disease",
    "fatigue",
    "allergy",
    "wheezing",
    "alcohol_consuming",
    "coughing",
    "shortness_of_breath",
    "swallowing_difficulty",
    "chest_pain",
];

/// Every required field of a patient record, in training column order.
pub const FIELDS: [&str; 15] = [
    GENDER,
    AGE,
    "smoking",
    "yellow_fingers",
    "anxiety",
    "peer_pressure",
    "chronic_disease",
    "fatigue",
    "allergy",
    "wheezing",
    "alcohol_consuming",
    "coughing",
    "shortness_of_breath",
    "swallowing_difficulty",
    "chest_pain",
];

const MISSING: &str = "Missing data for required field.";
const NULL: &str = "Field may not be null.";
const NOT_INTEGER: &str = "Not a valid integer.";
const NOT_STRING: &str = "Not a valid string.";
const UNKNOWN: &str = "Unknown field.";

/// Patient record as submitted by the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawPatientRecord {
    pub gender: String,
    pub age: i64,
    pub smoking: String,
    pub yellow_fingers: String,
    pub anxiety: String,
    pub peer_pressure: String,
    pub chronic_disease: String,
    pub fatigue: String,
    pub allergy: String,
    pub wheezing: String,
    pub alcohol_consuming: String,
    pub coughing: String,
    pub shortness_of_breath: String,
    pub swallowing_difficulty: String,
    pub chest_pain: String,
}

impl RawPatientRecord {
    /// Builds a record from a decoded JSON object.
    ///
    /// Presence and primitive types of every field are checked first and all
    /// problems are reported together; vocabulary rules are not applied here.
    pub fn from_object(object: Map<String, Value>) -> Result<Self, FieldErrors> {
        check_schema(&object)?;
        serde_json::from_value(Value::Object(object)).map_err(|e| {
            let mut errors = FieldErrors::new();
            errors.insert("_schema".to_string(), e.to_string());
            errors
        })
    }

    /// Symptom indicators paired with their field names.
    pub fn symptoms(&self) -> [(&'static str, &str); 13] {
        [
            ("smoking", self.smoking.as_str()),
            ("yellow_fingers", self.yellow_fingers.as_str()),
            ("anxiety", self.anxiety.as_str()),
            ("peer_pressure", self.peer_pressure.as_str()),
            ("chronic_disease", self.chronic_disease.as_str()),
            ("fatigue", self.fatigue.as_str()),
            ("allergy", self.allergy.as_str()),
            ("wheezing", self.wheezing.as_str()),
            ("alcohol_consuming", self.alcohol_consuming.as_str()),
            ("coughing", self.coughing.as_str()),
            ("shortness_of_breath", self.shortness_of_breath.as_str()),
            ("swallowing_difficulty", self.swallowing_difficulty.as_str()),
            ("chest_pain", self.chest_pain.as_str()),
        ]
    }
}

fn check_schema(object: &Map<String, Value>) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    for field in FIELDS {
        let problem = match object.get(field) {
            None => Some(MISSING),
            Some(Value::Null) => Some(NULL),
            Some(value) if field == AGE => (!value.is_i64()).then_some(NOT_INTEGER),
            Some(value) => (!value.is_string()).then_some(NOT_STRING),
        };
        if let Some(message) = problem {
            errors.insert(field.to_string(), message.to_string());
        }
    }

    for key in object.keys() {
        if !FIELDS.contains(&key.as_str()) {
            errors.insert(key.clone(), UNKNOWN.to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// All-integer form of a patient record, as the trained pipeline expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedRecord {
    pub gender: i64,
    pub age: i64,
    /// Same order as [`SYMPTOM_FIELDS`].
    pub symptoms: [i64; 13],
}

impl EncodedRecord {
    /// Value of a canonical field name.
    pub fn get(&self, field: &str) -> Option<i64> {
        match field {
            GENDER => Some(self.gender),
            AGE => Some(self.age),
            other => SYMPTOM_FIELDS
                .iter()
                .position(|name| *name == other)
                .map(|i| self.symptoms[i]),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, i64)> + '_ {
        FIELDS.iter().map(move |name| (*name, self.get(name).unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn example() -> Value {
        json!({
            "gender": "m", "age": 50, "smoking": "y", "yellow_fingers": "n",
            "anxiety": "n", "peer_pressure": "n", "chronic_disease": "n",
            "fatigue": "y", "allergy": "n", "wheezing": "y",
            "alcohol_consuming": "n", "coughing": "y", "shortness_of_breath": "y",
            "swallowing_difficulty": "n", "chest_pain": "y"
        })
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn builds_record_from_complete_object() {
        let record = RawPatientRecord::from_object(object(example())).unwrap();
        assert_eq!(record.gender, "m");
        assert_eq!(record.age, 50);
        assert_eq!(record.symptoms()[12], ("chest_pain", "y"));
    }

    #[test]
    fn reports_every_missing_field() {
        let mut map = object(example());
        map.remove("age");
        map.remove("chest_pain");

        let errors = RawPatientRecord::from_object(map).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["age"], MISSING);
        assert_eq!(errors["chest_pain"], MISSING);
    }

    #[test]
    fn rejects_wrong_primitive_types() {
        let mut map = object(example());
        map.insert("age".into(), json!("50"));
        map.insert("smoking".into(), json!(true));
        map.insert("fatigue".into(), Value::Null);

        let errors = RawPatientRecord::from_object(map).unwrap_err();
        assert_eq!(errors["age"], NOT_INTEGER);
        assert_eq!(errors["smoking"], NOT_STRING);
        assert_eq!(errors["fatigue"], NULL);
    }

    #[test]
    fn fractional_age_is_not_an_integer() {
        let mut map = object(example());
        map.insert("age".into(), json!(50.5));

        let errors = RawPatientRecord::from_object(map).unwrap_err();
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["age"]);
    }

    #[test]
    fn unknown_keys_are_reported() {
        let mut map = object(example());
        map.insert("GENDER".into(), json!("m"));

        let errors = RawPatientRecord::from_object(map).unwrap_err();
        assert_eq!(errors["GENDER"], UNKNOWN);
    }

    #[test]
    fn encoded_record_lookup_follows_field_names() {
        let mut symptoms = [1; 13];
        symptoms[3] = 2;
        let encoded = EncodedRecord { gender: 2, age: 61, symptoms };

        assert_eq!(encoded.get("gender"), Some(2));
        assert_eq!(encoded.get("age"), Some(61));
        assert_eq!(encoded.get("peer_pressure"), Some(2));
        assert_eq!(encoded.get("height"), None);
        assert_eq!(encoded.fields().count(), FIELDS.len());
    }
}
