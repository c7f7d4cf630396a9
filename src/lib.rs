//! Web front-end that runs a pre-trained breast cytology classifier over
//! nine integer measurements submitted through an HTML form.

pub mod analysis;
pub mod api;
pub mod common;
pub mod model;

pub use api::{router, AppState};
pub use model::repo_fs::load_handle;
