//! HTTP surface: the welcome page and the analysis form.
//!
//! | route            | behaviour                                   |
//! |------------------|---------------------------------------------|
//! | `GET /`          | welcome page                                |
//! | `GET /analysis`  | empty form                                  |
//! | `POST /analysis` | verdict (200), bad input (400), no model (500) |

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::{Form, Router};

use crate::analysis::service::{self, FormInput};
use crate::common::error::ValidationError;
use crate::model::domain::ModelHandle;

use super::pages;

/// Application state shared across handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    model: ModelHandle,
}

impl AppState {
    pub fn new(model: ModelHandle) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }
}

/// Build the router for the front-end.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/analysis", get(show_form).post(submit_form))
        .with_state(state)
}

async fn welcome() -> Html<&'static str> {
    Html(pages::welcome())
}

async fn show_form() -> Html<String> {
    Html(pages::analysis(None))
}

async fn submit_form(
    State(state): State<AppState>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> (StatusCode, Html<String>) {
    let input: FormInput = form
        .map(|Form(pairs)| pairs)
        .map_err(|rejection| ValidationError::MalformedForm(rejection.body_text()));

    let outcome = service::analyse(state.model(), input);
    (outcome.status, Html(pages::analysis(Some(&outcome.message))))
}
