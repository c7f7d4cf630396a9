//! Feature vector and user-facing messages for the analysis form.

use std::collections::HashMap;

use crate::model::domain::Diagnosis;

pub use crate::common::error::ValidationError;

/// Number of measurements the classifier was trained on.
pub const FEATURE_COUNT: usize = 9;

/// Form field names, in the column order the classifier expects.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Clump_Thickness",
    "Uniformity_of_Cell_Size",
    "Uniformity_of_Cell_Shape",
    "Marginal_Adhesion",
    "Single_Epithelial_Cell_Size",
    "Bare_Nuclei",
    "Bland_Chromatin",
    "Normal_Nucleoli",
    "Mitoses",
];

pub const MALIGNANT_MESSAGE: &str = "Based on the data, there is a high likelihood that the cells are malignant. Please consult a specialist physician.";
pub const BENIGN_MESSAGE: &str = "Based on the data, the cells appear to be benign.";
pub const MODEL_NOT_LOADED_MESSAGE: &str = "Error: the model is not loaded.";
pub const INPUT_ERROR_PREFIX: &str = "Input error: ";

/// One row of integer measurements in `FEATURE_NAMES` order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct FeatureVector([i64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [i64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[i64; FEATURE_COUNT] {
        &self.0
    }

    /// Widen to the floating point row the engines score.
    pub fn to_f64(&self) -> [f64; FEATURE_COUNT] {
        self.0.map(|v| v as f64)
    }

    /// Build a vector from decoded form pairs.
    ///
    /// Extra keys are ignored and the first occurrence of a repeated key wins.
    /// Fields are checked in column order, so the first missing or malformed
    /// one is reported. Values are trimmed and may carry a sign; no range
    /// check is applied. Only ASCII digits are accepted, without `_`
    /// separators, and values must fit in an `i64`.
    pub fn from_form<'a, I>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut form: HashMap<&str, &str> = HashMap::new();
        for (key, value) in pairs {
            form.entry(key).or_insert(value);
        }

        let mut values = [0i64; FEATURE_COUNT];
        for (slot, field) in values.iter_mut().zip(FEATURE_NAMES) {
            let raw = form
                .get(field)
                .ok_or(ValidationError::MissingField(field))?;
            *slot = raw
                .trim()
                .parse::<i64>()
                .map_err(|source| ValidationError::NotAnInteger {
                    field,
                    value: (*raw).to_string(),
                    source,
                })?;
        }

        Ok(Self(values))
    }
}

/// Fixed user-facing text for a prediction.
pub fn verdict_message(diagnosis: Diagnosis) -> &'static str {
    match diagnosis {
        Diagnosis::Malignant => MALIGNANT_MESSAGE,
        Diagnosis::Benign => BENIGN_MESSAGE,
    }
}
