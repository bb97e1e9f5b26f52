//! Domain types for a single prediction request.

pub mod enums;
pub mod patient;

pub use enums::{CancerType, Category, Gender, Stage, Treatment, UnknownCategory};
pub use patient::{FieldError, PatientForm, PatientRecord, ValidationError};
