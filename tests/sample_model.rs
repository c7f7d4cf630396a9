use std::path::PathBuf;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use tower::ServiceExt;

use cytocheck::analysis::domain::{BENIGN_MESSAGE, FEATURE_NAMES, MALIGNANT_MESSAGE};
use cytocheck::analysis::FeatureVector;
use cytocheck::common::config::AppCfg;
use cytocheck::model::repo_fs::FsModelRepo;
use cytocheck::model::{Diagnosis, ModelKind};
use cytocheck::{load_handle, router, AppState};

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models/cancer_prediction_model.json")
}

fn form(values: [i64; 9]) -> String {
    FEATURE_NAMES
        .iter()
        .zip(values)
        .map(|(name, v)| format!("{name}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

#[test]
fn sample_artifact_separates_clear_cases() {
    let model = FsModelRepo::at(sample_path()).load().expect("sample artefact loads");
    assert_eq!(model.kind, ModelKind::Logistic);
    assert_eq!(model.name, "wbc-logistic-v1");

    let predictor = model.predictor;
    let cases = [
        ([1; 9], Diagnosis::Benign),
        ([5, 1, 1, 1, 2, 1, 3, 1, 1], Diagnosis::Benign),
        ([10; 9], Diagnosis::Malignant),
        ([5, 10, 10, 3, 7, 3, 8, 10, 2], Diagnosis::Malignant),
    ];
    for (values, expected) in cases {
        let got = predictor.predict(&FeatureVector::new(values)).unwrap();
        assert_eq!(got, expected, "{values:?}");
    }
}

#[test]
fn default_config_finds_the_shipped_artifact() {
    // Integration tests run from the package root, like the binary in a checkout.
    let cfg = AppCfg::default();
    assert!(cfg.model_path.is_relative());
    assert_eq!(
        std::fs::canonicalize(&cfg.model_path).expect("default path exists"),
        std::fs::canonicalize(sample_path()).expect("sample exists")
    );
    assert!(load_handle(&cfg).is_available());
}

#[tokio::test]
async fn sample_artifact_end_to_end() {
    let cfg = AppCfg {
        model_path: sample_path(),
        ..AppCfg::default()
    };
    let app = router(AppState::new(load_handle(&cfg)));

    for (values, message) in [([1; 9], BENIGN_MESSAGE), ([10; 9], MALIGNANT_MESSAGE)] {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/analysis")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form(values)))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(body.to_vec()).unwrap();
        assert!(page.contains(message), "{page}");
    }
}

#[tokio::test]
async fn absent_artifact_keeps_pages_up() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = AppCfg {
        model_path: tmp.path().join("cancer_prediction_model.json"),
        ..AppCfg::default()
    };
    let app = router(AppState::new(load_handle(&cfg)));

    let get = Request::builder().uri("/analysis").body(Body::empty()).unwrap();
    assert_eq!(app.clone().oneshot(get).await.unwrap().status(), StatusCode::OK);

    let post = Request::builder()
        .method(Method::POST)
        .uri("/analysis")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form([1; 9])))
        .unwrap();
    assert_eq!(
        app.oneshot(post).await.unwrap().status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}
