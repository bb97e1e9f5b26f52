use serde::{Deserialize, Serialize};

/// A categorical value outside the set the form and model know about.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field} value '{value}'")]
pub struct UnknownCategory {
    pub field: &'static str,
    pub value: String,
}

/// Categorical attribute that expands into drop-first indicator columns.
pub trait Category: Copy + PartialEq + 'static {
    fn all() -> &'static [Self];
    fn reference() -> Self;
    fn column_name(&self) -> String;
}

/// Macro to generate a categorical enum with as_str + std::str::FromStr pattern.
///
/// `$field` is the column prefix used at training time; variants are listed
/// in the order the form presents them.
macro_rules! category_enum {
    ($name:ident, $field:literal { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            /// Training-time column prefix for this attribute.
            pub const FIELD: &'static str = $field;

            /// Every known value, in form display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            /// Labels of every known value, in form display order.
            pub fn labels() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.as_str()).collect()
            }

            /// Reference level dropped by drop-first one-hot expansion.
            ///
            /// Categories are sorted lexically before expansion at training
            /// time, so the reference is the smallest label.
            pub fn reference() -> Self {
                let mut reference = Self::ALL[0];
                for candidate in Self::ALL {
                    if candidate.as_str() < reference.as_str() {
                        reference = *candidate;
                    }
                }
                reference
            }

            /// Indicator column name, `<field>_<value>`.
            pub fn column_name(&self) -> String {
                format!("{}_{}", Self::FIELD, self.as_str())
            }
        }

        impl Category for $name {
            fn all() -> &'static [Self] {
                Self::ALL
            }

            fn reference() -> Self {
                $name::reference()
            }

            fn column_name(&self) -> String {
                $name::column_name(self)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownCategory;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(UnknownCategory {
                        field: Self::FIELD,
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

category_enum!(Gender, "Gender" {
    Male => "M",
    Female => "F",
});

category_enum!(CancerType, "Cancer_Type" {
    Colon => "Colon",
    Breast => "Breast",
    Leukemia => "Leukemia",
    Brain => "Brain",
    Skin => "Skin",
    Ovarian => "Ovarian",
    Pancreatic => "Pancreatic",
    Liver => "Liver",
    Lung => "Lung",
    Prostate => "Prostate",
});

category_enum!(Stage, "Stage" {
    I => "I",
    II => "II",
    III => "III",
    IV => "IV",
});

category_enum!(Treatment, "Treatment" {
    Chemotherapy => "Chemotherapy",
    Palliative => "Palliative",
    HormoneTherapy => "Hormone Therapy",
    Radiation => "Radiation",
    Surgery => "Surgery",
});

impl Stage {
    /// Ordinal encoding used by the model: I→1 … IV→4.
    pub fn ordinal(&self) -> u8 {
        match self {
            Stage::I => 1,
            Stage::II => 2,
            Stage::III => 3,
            Stage::IV => 4,
        }
    }
}
