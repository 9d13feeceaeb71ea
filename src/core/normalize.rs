//! Maps validated categorical tokens onto the integer encoding used at
//! training time.

use thiserror::Error;

use crate::models::{EncodedRecord, RawPatientRecord};

/// Encoding for "no" and "female".
pub const NEGATIVE_CODE: i64 = 1;
/// Encoding for "yes" and "male".
pub const POSITIVE_CODE: i64 = 2;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("unexpected token {token:?} in field {field}")]
    UnexpectedToken { field: &'static str, token: String },
}

/// Case-insensitive: `n`/`f` -> 1, `y`/`m` -> 2.
pub fn encode_token(field: &'static str, token: &str) -> Result<i64, NormalizeError> {
    match token.to_ascii_lowercase().as_str() {
        "n" | "f" => Ok(NEGATIVE_CODE),
        "y" | "m" => Ok(POSITIVE_CODE),
        _ => Err(NormalizeError::UnexpectedToken {
            field,
            token: token.to_string(),
        }),
    }
}

/// Encodes a record that already passed validation. Age is carried over as is.
pub fn normalize(record: &RawPatientRecord) -> Result<EncodedRecord, NormalizeError> {
    let mut symptoms = [0; 13];
    for (slot, (field, token)) in symptoms.iter_mut().zip(record.symptoms()) {
        *slot = encode_token(field, token)?;
    }

    Ok(EncodedRecord {
        gender: encode_token("gender", &record.gender)?,
        age: record.age,
        symptoms,
    })
}
