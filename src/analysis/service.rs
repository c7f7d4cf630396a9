//! Submission flow for the analysis form.
//!
//! The handle is checked first, then the form is parsed, then the predictor
//! runs. Each failure kind maps to its status through its error code.

use axum::http::StatusCode;
use tracing::error;

use crate::common::error::{CytoError, CytoResult, ErrorCode, ValidationError};
use crate::common::{log, time};
use crate::model::domain::{Diagnosis, ModelHandle};

use super::domain::{
    verdict_message, FeatureVector, INPUT_ERROR_PREFIX, MODEL_NOT_LOADED_MESSAGE,
};

/// Decoded form body, or why it could not be decoded.
pub type FormInput = Result<Vec<(String, String)>, ValidationError>;

/// Result of one submission, ready to be rendered.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Outcome {
    pub status: StatusCode,
    pub message: String,
    pub diagnosis: Option<Diagnosis>,
    pub code: ErrorCode,
}

impl Outcome {
    fn from_result(result: CytoResult<Diagnosis>) -> Self {
        match result {
            Ok(diagnosis) => Self {
                status: StatusCode::OK,
                message: verdict_message(diagnosis).to_string(),
                diagnosis: Some(diagnosis),
                code: ErrorCode::Ok,
            },
            Err(err) => {
                let code = err.code();
                let message = match err {
                    CytoError::ModelUnavailable => MODEL_NOT_LOADED_MESSAGE.to_string(),
                    other => format!("{INPUT_ERROR_PREFIX}{other}"),
                };
                Self {
                    status: code.status(),
                    message,
                    diagnosis: None,
                    code,
                }
            }
        }
    }
}

/// Run one submission against the model handle.
pub fn analyse(handle: &ModelHandle, form: FormInput) -> Outcome {
    let start = time::now_ms();
    let result = classify(handle, form);

    if let Err(err @ CytoError::Prediction(_)) = &result {
        error!(error = %err, "prediction failed");
    }

    let outcome = Outcome::from_result(result);
    log::event("analysis", "submit", outcome.code, time::since_ms(start));
    outcome
}

fn classify(handle: &ModelHandle, form: FormInput) -> CytoResult<Diagnosis> {
    let predictor = handle.predictor()?;
    let pairs = form?;
    let row = FeatureVector::from_form(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
    predictor.predict(&row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::domain::{
        BENIGN_MESSAGE, FEATURE_NAMES, MALIGNANT_MESSAGE, MODEL_NOT_LOADED_MESSAGE,
    };
    use crate::model::domain::{ModelKind, Predictor};

    struct Fixed(Diagnosis);

    impl Predictor for Fixed {
        fn kind(&self) -> ModelKind {
            ModelKind::Logistic
        }

        fn predict(&self, _: &FeatureVector) -> CytoResult<Diagnosis> {
            Ok(self.0)
        }
    }

    struct Broken;

    impl Predictor for Broken {
        fn kind(&self) -> ModelKind {
            ModelKind::Forest
        }

        fn predict(&self, _: &FeatureVector) -> CytoResult<Diagnosis> {
            Err(CytoError::Prediction("engine exploded".into()))
        }
    }

    fn form() -> Vec<(String, String)> {
        FEATURE_NAMES
            .iter()
            .map(|name| (name.to_string(), "3".to_string()))
            .collect()
    }

    #[test]
    fn outcome_message_follows_the_prediction() {
        let malignant = analyse(&ModelHandle::loaded(Fixed(Diagnosis::Malignant)), Ok(form()));
        assert_eq!(malignant.status, StatusCode::OK);
        assert_eq!(malignant.message, MALIGNANT_MESSAGE);
        assert_eq!(malignant.diagnosis, Some(Diagnosis::Malignant));

        let benign = analyse(&ModelHandle::loaded(Fixed(Diagnosis::Benign)), Ok(form()));
        assert_eq!(benign.status, StatusCode::OK);
        assert_eq!(benign.message, BENIGN_MESSAGE);
    }

    #[test]
    fn unavailable_model_wins_over_bad_input() {
        let handle = ModelHandle::unavailable();
        for input in [
            Ok(form()),
            Ok(Vec::new()),
            Err(ValidationError::MalformedForm("bad body".into())),
        ] {
            let outcome = analyse(&handle, input);
            assert_eq!(outcome.status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(outcome.message, MODEL_NOT_LOADED_MESSAGE);
            assert_eq!(outcome.code, ErrorCode::ModelMissing);
        }
    }

    #[test]
    fn validation_failures_are_bad_requests() {
        let handle = ModelHandle::loaded(Fixed(Diagnosis::Benign));

        let mut missing = form();
        missing.retain(|(k, _)| k != "Mitoses");
        let outcome = analyse(&handle, Ok(missing));
        assert_eq!(outcome.status, StatusCode::BAD_REQUEST);
        assert_eq!(outcome.message, "Input error: missing field 'Mitoses'");
        assert_eq!(outcome.diagnosis, None);

        let malformed = analyse(
            &handle,
            Err(ValidationError::MalformedForm("Expected request with `Content-Type: application/x-www-form-urlencoded`".into())),
        );
        assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
        assert!(malformed.message.starts_with(INPUT_ERROR_PREFIX));
    }

    #[test]
    fn predictor_failures_degrade_to_bad_requests() {
        let outcome = analyse(&ModelHandle::loaded(Broken), Ok(form()));
        assert_eq!(outcome.status, StatusCode::BAD_REQUEST);
        assert_eq!(outcome.code, ErrorCode::Internal);
        assert!(outcome.message.contains("engine exploded"), "{}", outcome.message);
    }

    #[test]
    fn repeated_submissions_are_idempotent() {
        let handle = ModelHandle::loaded(Fixed(Diagnosis::Malignant));
        let first = analyse(&handle, Ok(form()));
        let second = analyse(&handle, Ok(form()));
        assert_eq!(first, second);
    }
}
