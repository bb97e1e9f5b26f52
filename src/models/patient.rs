use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::enums::{CancerType, Gender, Stage, Treatment};

/// Inclusive upper bound for `Age`, in years.
pub const MAX_AGE_YEARS: f64 = 120.0;

/// Inclusive upper bound for `Tumor_Size`, in centimeters.
pub const MAX_TUMOR_SIZE_CM: f64 = 100.0;

/// Raw patient submission, exactly as posted by the form or JSON client.
///
/// Missing or `null` fields deserialize to empty strings and JSON numbers or
/// booleans to their text, so that validation can report them alongside
/// every other bad field instead of failing extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientForm {
    #[serde(rename = "Age", default, deserialize_with = "scalar_as_text")]
    pub age: String,
    #[serde(rename = "Gender", default, deserialize_with = "scalar_as_text")]
    pub gender: String,
    #[serde(rename = "Cancer_Type", default, deserialize_with = "scalar_as_text")]
    pub cancer_type: String,
    #[serde(rename = "Tumor_Size", default, deserialize_with = "scalar_as_text")]
    pub tumor_size: String,
    #[serde(rename = "Stage", default, deserialize_with = "scalar_as_text")]
    pub stage: String,
    #[serde(rename = "Treatment", default, deserialize_with = "scalar_as_text")]
    pub treatment: String,
}

/// Forms send text; JSON clients may send any scalar.
fn scalar_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
        Flag(bool),
        Null,
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
        Raw::Flag(b) => b.to_string(),
        Raw::Null => String::new(),
    })
}

/// Validated patient attributes. Built per request, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PatientRecord {
    pub age: f64,
    pub gender: Gender,
    pub cancer_type: CancerType,
    pub tumor_size_cm: f64,
    pub stage: Stage,
    pub treatment: Treatment,
}

/// One rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid patient fields: {}", join_fields(.0))]
    Fields(Vec<FieldError>),
}

impl ValidationError {
    pub fn fields(&self) -> &[FieldError] {
        match self {
            ValidationError::Fields(fields) => fields,
        }
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl TryFrom<&PatientForm> for PatientRecord {
    type Error = ValidationError;

    fn try_from(form: &PatientForm) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();

        let age = parse_bounded(&form.age, "Age", MAX_AGE_YEARS, "years", &mut errors);
        let gender = parse_category::<Gender>(&form.gender, "Gender", &mut errors);
        let cancer_type =
            parse_category::<CancerType>(&form.cancer_type, "Cancer_Type", &mut errors);
        let tumor_size_cm = parse_bounded(
            &form.tumor_size,
            "Tumor_Size",
            MAX_TUMOR_SIZE_CM,
            "cm",
            &mut errors,
        );
        let stage = parse_category::<Stage>(&form.stage, "Stage", &mut errors);
        let treatment = parse_category::<Treatment>(&form.treatment, "Treatment", &mut errors);

        match (age, gender, cancer_type, tumor_size_cm, stage, treatment) {
            (
                Some(age),
                Some(gender),
                Some(cancer_type),
                Some(tumor_size_cm),
                Some(stage),
                Some(treatment),
            ) if errors.is_empty() => Ok(PatientRecord {
                age,
                gender,
                cancer_type,
                tumor_size_cm,
                stage,
                treatment,
            }),
            _ => Err(ValidationError::Fields(errors)),
        }
    }
}

impl TryFrom<PatientForm> for PatientRecord {
    type Error = ValidationError;

    fn try_from(form: PatientForm) -> Result<Self, Self::Error> {
        PatientRecord::try_from(&form)
    }
}

fn parse_bounded(
    raw: &str,
    field: &'static str,
    max: f64,
    unit: &str,
    errors: &mut Vec<FieldError>,
) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.push(FieldError::new(field, "is required"));
        return None;
    }
    let value = match raw.parse::<f64>() {
        Ok(v) => v,
        Err(_) => {
            errors.push(FieldError::new(field, format!("must be a number, got '{raw}'")));
            return None;
        }
    };
    if !value.is_finite() || value <= 0.0 || value > max {
        errors.push(FieldError::new(
            field,
            format!("must be greater than 0 and at most {max} {unit}"),
        ));
        return None;
    }
    Some(value)
}

fn parse_category<T: FromStr>(
    raw: &str,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.push(FieldError::new(field, "is required"));
        return None;
    }
    match T::from_str(raw) {
        Ok(v) => Some(v),
        Err(_) => {
            errors.push(FieldError::new(field, format!("has unknown value '{raw}'")));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breast_form() -> PatientForm {
        PatientForm {
            age: "55".into(),
            gender: "F".into(),
            cancer_type: "Breast".into(),
            tumor_size: "3.2".into(),
            stage: "II".into(),
            treatment: "Surgery".into(),
        }
    }

    #[test]
    fn valid_form_builds_record() {
        let record = PatientRecord::try_from(breast_form()).unwrap();
        assert_eq!(record.age, 55.0);
        assert_eq!(record.gender, Gender::Female);
        assert_eq!(record.cancer_type, CancerType::Breast);
        assert_eq!(record.tumor_size_cm, 3.2);
        assert_eq!(record.stage, Stage::II);
        assert_eq!(record.treatment, Treatment::Surgery);
    }

    #[test]
    fn whitespace_is_trimmed() {
        let mut form = breast_form();
        form.age = " 61.5 ".into();
        form.treatment = " Hormone Therapy ".into();
        let record = PatientRecord::try_from(&form).unwrap();
        assert_eq!(record.age, 61.5);
        assert_eq!(record.treatment, Treatment::HormoneTherapy);
    }

    #[test]
    fn malformed_number_is_a_field_error() {
        let mut form = breast_form();
        form.age = "fifty".into();
        let err = PatientRecord::try_from(&form).unwrap_err();
        assert_eq!(err.fields().len(), 1);
        assert_eq!(err.fields()[0].field, "Age");
        assert!(err.fields()[0].message.contains("must be a number"));
    }

    #[test]
    fn out_of_range_numbers_rejected() {
        for (age, size) in [("0", "3.2"), ("-4", "3.2"), ("121", "3.2"), ("55", "0"), ("55", "NaN"), ("55", "inf")] {
            let mut form = breast_form();
            form.age = age.into();
            form.tumor_size = size.into();
            assert!(
                PatientRecord::try_from(&form).is_err(),
                "expected rejection for age={age} size={size}"
            );
        }
    }

    #[test]
    fn unknown_stage_is_rejected() {
        let mut form = breast_form();
        form.stage = "V".into();
        let err = PatientRecord::try_from(&form).unwrap_err();
        assert_eq!(err.fields()[0].field, "Stage");
        assert!(err.fields()[0].message.contains("'V'"));
    }

    #[test]
    fn unknown_cancer_type_is_rejected() {
        let mut form = breast_form();
        form.cancer_type = "Bone".into();
        let err = PatientRecord::try_from(&form).unwrap_err();
        assert_eq!(err.fields()[0].field, "Cancer_Type");
    }

    #[test]
    fn every_bad_field_is_reported() {
        let form = PatientForm {
            age: "abc".into(),
            gender: "".into(),
            cancer_type: "Bone".into(),
            tumor_size: "-1".into(),
            stage: "0".into(),
            treatment: "Magic".into(),
        };
        let err = PatientRecord::try_from(&form).unwrap_err();
        let fields: Vec<_> = err.fields().iter().map(|f| f.field).collect();
        assert_eq!(
            fields,
            vec!["Age", "Gender", "Cancer_Type", "Tumor_Size", "Stage", "Treatment"]
        );
        assert!(err.to_string().starts_with("invalid patient fields: Age"));
    }

    #[test]
    fn json_numbers_accepted_for_numeric_fields() {
        let form: PatientForm = serde_json::from_str(
            r#"{"Age": 55, "Gender": "F", "Cancer_Type": "Breast", "Tumor_Size": 3.2, "Stage": "II", "Treatment": "Surgery"}"#,
        )
        .unwrap();
        assert_eq!(form, breast_form());
    }

    #[test]
    fn json_scalars_in_category_fields_become_field_errors() {
        let form: PatientForm = serde_json::from_str(
            r#"{"Age": null, "Gender": true, "Cancer_Type": "Breast", "Tumor_Size": 3.2, "Stage": 2, "Treatment": null}"#,
        )
        .unwrap();
        assert_eq!(form.stage, "2");
        assert_eq!(form.gender, "true");
        let err = PatientRecord::try_from(&form).unwrap_err();
        let fields: Vec<(&str, &str)> = err
            .fields()
            .iter()
            .map(|f| (f.field, f.message.as_str()))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("Age", "is required"),
                ("Gender", "has unknown value 'true'"),
                ("Stage", "has unknown value '2'"),
                ("Treatment", "is required"),
            ]
        );
    }

    #[test]
    fn missing_fields_deserialize_empty() {
        let form: PatientForm = serde_json::from_str(r#"{"Age": "40"}"#).unwrap();
        assert_eq!(form.age, "40");
        assert!(form.gender.is_empty());
        let err = PatientRecord::try_from(&form).unwrap_err();
        assert_eq!(err.fields().len(), 5);
        assert!(err.fields().iter().all(|f| f.message == "is required"));
    }
}
