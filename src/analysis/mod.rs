//! Analysis domain: turning a submitted form into a verdict.

pub mod domain;
pub mod service;

pub use domain::{FeatureVector, FEATURE_NAMES};
pub use service::{analyse, Outcome};
