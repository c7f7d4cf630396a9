//! Model domain: the serialized classifier and the handle requests read it through.

pub mod domain;
pub mod engines;
pub mod repo_fs;

pub use domain::{Diagnosis, ModelHandle, ModelKind, Predictor};
