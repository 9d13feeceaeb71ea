//! Vocabulary validation of raw patient records.

use std::borrow::Cow;

use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::FieldErrors;
use crate::models::patient::{AGE, GENDER};
use crate::models::RawPatientRecord;

pub const GENDER_VOCABULARY: [&str; 2] = ["m", "f"];
pub const FLAG_VOCABULARY: [&str; 2] = ["y", "n"];

fn one_of(code: &'static str, value: &str, allowed: &[&str]) -> Option<ValidationError> {
    if allowed.contains(&value) {
        return None;
    }
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::from(format!("Must be one of: {}.", allowed.join(", "))));
    error.add_param(Cow::from("value"), &value);
    Some(error)
}

// Matching is case-sensitive: "M" is not a gender token.
impl Validate for RawPatientRecord {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(error) = one_of("gender", &self.gender, &GENDER_VOCABULARY) {
            errors.add(GENDER, error);
        }

        if self.age <= 0 {
            let mut error = ValidationError::new("range");
            error.message = Some(Cow::from("Must be greater than 0."));
            error.add_param(Cow::from("value"), &self.age);
            errors.add(AGE, error);
        }

        for (field, value) in self.symptoms() {
            if let Some(error) = one_of("flag", value, &FLAG_VOCABULARY) {
                errors.add(field, error);
            }
        }

        if errors.field_errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Checks every field of `record` and returns all violations at once.
pub fn validate_record(record: &RawPatientRecord) -> Result<(), FieldErrors> {
    record.validate().map_err(|errors| flatten(&errors))
}

fn flatten(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, list)| {
            let first = list.first()?;
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| first.code.to_string());
            Some((field.to_string(), message))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn valid() -> RawPatientRecord {
        RawPatientRecord {
            gender: "m".into(),
            age: 50,
            smoking: "y".into(),
            yellow_fingers: "n".into(),
            anxiety: "n".into(),
            peer_pressure: "n".into(),
            chronic_disease: "n".into(),
            fatigue: "y".into(),
            allergy: "n".into(),
            wheezing: "y".into(),
            alcohol_consuming: "n".into(),
            coughing: "y".into(),
            shortness_of_breath: "y".into(),
            swallowing_difficulty: "n".into(),
            chest_pain: "y".into(),
        }
    }

    #[test]
    fn valid_record_passes_and_stays_valid() {
        let record = valid();
        assert_eq!(validate_record(&record), Ok(()));
        assert_eq!(validate_record(&record), Ok(()));
    }

    #[test_case("M" ; "uppercase male")]
    #[test_case("F" ; "uppercase female")]
    #[test_case("male" ; "full word")]
    #[test_case("" ; "empty")]
    fn gender_outside_vocabulary_is_the_only_error(gender: &str) {
        let record = RawPatientRecord { gender: gender.into(), ..valid() };

        let errors = validate_record(&record).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["gender"], "Must be one of: m, f.");
    }

    #[test_case(0 ; "zero")]
    #[test_case(-4 ; "negative")]
    fn non_positive_age_is_rejected(age: i64) {
        let record = RawPatientRecord { age, ..valid() };

        let errors = validate_record(&record).unwrap_err();
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["age"]);
        assert_eq!(errors["age"], "Must be greater than 0.");
    }

    #[test]
    fn collects_all_violations() {
        let record = RawPatientRecord {
            gender: "x".into(),
            age: 0,
            smoking: "Y".into(),
            chest_pain: "maybe".into(),
            ..valid()
        };

        let errors = validate_record(&record).unwrap_err();
        assert_eq!(
            errors.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["age", "chest_pain", "gender", "smoking"]
        );
        assert_eq!(errors["smoking"], "Must be one of: y, n.");
    }
}
