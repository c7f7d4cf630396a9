//! Public entry points: the HTTP router and the pages it serves.

pub mod http;
pub mod pages;

pub use http::{router, AppState};
