//! Feature alignment: patient record → model-ready feature vector.
//!
//! 1. Ordinal-encode `Stage` (I→1 … IV→4).
//! 2. Expand Gender / Cancer_Type / Treatment into drop-first indicator
//!    columns named `<field>_<value>`.
//! 3. Reconcile against the model's training columns: expected columns not
//!    generated stay 0, generated columns the model never saw are dropped.
//!
//! The column → index map is built once per model (`FeatureLayout::new`).
//! Dropped non-zero columns are never silent: they are reported, and the
//! `Strict` policy turns them into an error.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::{CancerType, Category, Gender, PatientRecord, Stage, Treatment};

pub const AGE_COLUMN: &str = "Age";
pub const TUMOR_SIZE_COLUMN: &str = "Tumor_Size (cm)";
pub const STAGE_COLUMN: &str = "Stage";

// ═══════════════════════════════════════════════════════════
// Encoding
// ═══════════════════════════════════════════════════════════

pub fn encode_stage(stage: Stage) -> f64 {
    f64::from(stage.ordinal())
}

/// Drop-first indicator columns for one categorical attribute.
fn one_hot<T: Category>(value: T, out: &mut Vec<(String, f64)>) {
    let reference = T::reference();
    for category in T::all() {
        if *category == reference {
            continue;
        }
        let indicator = if *category == value { 1.0 } else { 0.0 };
        out.push((category.column_name(), indicator));
    }
}

/// Every column the encoder can produce for `record`, in generation order.
pub fn encode_record(record: &PatientRecord) -> Vec<(String, f64)> {
    let mut columns = vec![
        (AGE_COLUMN.to_string(), record.age),
        (TUMOR_SIZE_COLUMN.to_string(), record.tumor_size_cm),
        (STAGE_COLUMN.to_string(), encode_stage(record.stage)),
    ];
    one_hot(record.gender, &mut columns);
    one_hot(record.cancer_type, &mut columns);
    one_hot(record.treatment, &mut columns);
    columns
}

/// Names of every column `encode_record` can emit.
pub fn known_columns() -> HashSet<String> {
    let mut names: HashSet<String> = [AGE_COLUMN, TUMOR_SIZE_COLUMN, STAGE_COLUMN]
        .into_iter()
        .map(String::from)
        .collect();
    names.extend(indicator_columns::<Gender>());
    names.extend(indicator_columns::<CancerType>());
    names.extend(indicator_columns::<Treatment>());
    names
}

fn indicator_columns<T: Category>() -> impl Iterator<Item = String> {
    let reference = T::reference();
    T::all()
        .iter()
        .filter(move |c| **c != reference)
        .map(|c| c.column_name())
}

/// Form field a generated column was derived from.
pub fn source_field(column: &str) -> Option<&'static str> {
    match column {
        AGE_COLUMN => Some("Age"),
        TUMOR_SIZE_COLUMN => Some("Tumor_Size"),
        STAGE_COLUMN => Some("Stage"),
        _ => [Gender::FIELD, CancerType::FIELD, Treatment::FIELD]
            .into_iter()
            .find(|field| {
                column
                    .strip_prefix(field)
                    .is_some_and(|rest| rest.starts_with('_'))
            }),
    }
}

// ═══════════════════════════════════════════════════════════
// Aligned output
// ═══════════════════════════════════════════════════════════

/// Fixed-width row whose columns are exactly the model's training columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    columns: Arc<[String]>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a named column, if the model has it.
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i])
    }
}

/// Generated columns that had no place in the model schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlignmentReport {
    /// Non-zero generated columns dropped during reconciliation.
    pub unmatched: Vec<String>,
}

impl AlignmentReport {
    pub fn is_clean(&self) -> bool {
        self.unmatched.is_empty()
    }

    /// Human-readable warnings, one per dropped column.
    pub fn warnings(&self) -> Vec<String> {
        self.unmatched
            .iter()
            .map(|c| format!("'{c}' is not a model input; its value was ignored"))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aligned {
    pub vector: FeatureVector,
    pub report: AlignmentReport,
}

/// What to do when an input produces a column the model was not fit on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentPolicy {
    /// Reject the record.
    #[default]
    Strict,
    /// Predict anyway and return the dropped columns as warnings.
    Lenient,
}

impl AlignmentPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlignmentPolicy::Strict => "strict",
            AlignmentPolicy::Lenient => "lenient",
        }
    }
}

impl std::str::FromStr for AlignmentPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(AlignmentPolicy::Strict),
            "lenient" => Ok(AlignmentPolicy::Lenient),
            other => Err(format!(
                "unknown alignment policy '{other}' (expected strict or lenient)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlignError {
    #[error("input does not match the model schema: {} not recognised by the model", .0.join(", "))]
    Unmatched(Vec<String>),
}

// ═══════════════════════════════════════════════════════════
// Layout
// ═══════════════════════════════════════════════════════════

/// The model's training columns with a precomputed name → index map.
#[derive(Debug, Clone)]
pub struct FeatureLayout {
    columns: Arc<[String]>,
    index: HashMap<String, usize>,
    unmapped: Vec<String>,
}

impl FeatureLayout {
    pub fn new(columns: &[String]) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        let known = known_columns();
        let unmapped = columns
            .iter()
            .filter(|c| !known.contains(c.as_str()))
            .cloned()
            .collect();
        Self {
            columns: columns.into(),
            index,
            unmapped,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Schema columns no known input can produce; always zero at inference.
    pub fn unmapped_columns(&self) -> &[String] {
        &self.unmapped
    }

    /// Place generated columns into a zero-filled row of the layout's width.
    ///
    /// Columns outside the layout are dropped; non-zero ones are reported.
    pub fn reconcile<I, S>(&self, generated: I) -> Aligned
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut values = vec![0.0; self.columns.len()];
        let mut report = AlignmentReport::default();
        for (name, value) in generated {
            let name = name.as_ref();
            match self.index.get(name) {
                Some(&i) => values[i] = value,
                None if value != 0.0 => report.unmatched.push(name.to_string()),
                None => {}
            }
        }
        Aligned {
            vector: FeatureVector {
                columns: Arc::clone(&self.columns),
                values,
            },
            report,
        }
    }

    /// Encode and reconcile one record under `policy`.
    pub fn align(
        &self,
        record: &PatientRecord,
        policy: AlignmentPolicy,
    ) -> Result<Aligned, AlignError> {
        let aligned = self.reconcile(encode_record(record));
        if policy == AlignmentPolicy::Strict && !aligned.report.is_clean() {
            return Err(AlignError::Unmatched(aligned.report.unmatched));
        }
        Ok(aligned)
    }
}
