//! Patient record representations.

pub mod patient;

pub use patient::{EncodedRecord, RawPatientRecord};
