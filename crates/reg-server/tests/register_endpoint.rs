//! End-to-end tests for the registration endpoint, driven through the router
//! with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use tower::ServiceExt;

use reg_config::{S3Config, StorageBackend, StorageConfig};
use reg_db::service::RegService;
use reg_server::dto::RegistrationResponse;
use reg_server::{AppState, REGISTER_PATH, build_router};
use reg_storage::UploadStore;

const BOUNDARY: &str = "registrar-test-boundary";
const PDF: &[u8] = b"%PDF-1.4 marksheet";

async fn harness(max_body_bytes: usize) -> (Router, Arc<AppState>) {
    let service = RegService::new_local(":memory:").await.unwrap();
    let storage = StorageConfig::default();
    let uploads = UploadStore::in_memory(storage.upload_prefix());
    let state = Arc::new(AppState::new(service, uploads, storage));
    (build_router(Arc::clone(&state), max_body_bytes), state)
}

async fn app() -> (Router, Arc<AppState>) {
    harness(1024 * 1024).await
}

/// Hand-built `multipart/form-data` body.
#[derive(Default)]
struct Form {
    parts: Vec<Part>,
}

enum Part {
    Text(String, String),
    File(String, String, Vec<u8>),
}

impl Part {
    fn name(&self) -> &str {
        match self {
            Self::Text(name, _) | Self::File(name, _, _) => name,
        }
    }
}

impl Form {
    fn text(mut self, name: &str, value: &str) -> Self {
        self.parts.push(Part::Text(name.into(), value.into()));
        self
    }

    fn file(mut self, name: &str, filename: &str, content: &[u8]) -> Self {
        self.parts
            .push(Part::File(name.into(), filename.into(), content.to_vec()));
        self
    }

    fn without(mut self, field: &str) -> Self {
        self.parts.retain(|part| part.name() != field);
        self
    }

    fn valid() -> Self {
        Self::default()
            .text("name", "Asha Kumari")
            .text("dob", "2008-04-12")
            .text("father_name", "Ravi Kumar")
            .text("address", "12 MG Road, Pune")
            .text("student_class", "10")
            .text("percentage_10th", "91.5")
            .file("marksheet_pdf", "asha.pdf", PDF)
    }

    fn request(self) -> Request<Body> {
        let mut body = Vec::new();
        for part in self.parts {
            match part {
                Part::Text(name, value) => body.extend_from_slice(
                    format!(
                        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                    )
                    .as_bytes(),
                ),
                Part::File(name, filename, content) => {
                    body.extend_from_slice(
                        format!(
                            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(&content);
                    body.extend_from_slice(b"\r\n");
                }
            }
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(REGISTER_PATH)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }
}

fn raw_request(content_type: Option<&str>, body: impl Into<Body>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(REGISTER_PATH);
    if let Some(ct) = content_type {
        builder = builder.header(header::CONTENT_TYPE, ct);
    }
    builder.body(body.into()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn valid_registration_is_created() {
    let (app, state) = app().await;

    let (status, body) = send(&app, Form::valid().request()).await;
    assert_eq!(status, StatusCode::CREATED);

    let created: RegistrationResponse = serde_json::from_value(body).unwrap();
    assert!(reg_core::ids::has_prefix_format(&created.id, reg_core::ids::PREFIX_STUDENT));
    assert_eq!(created.name, "Asha Kumari");
    assert_eq!(created.dob.to_string(), "2008-04-12");
    assert_eq!(created.father_name, "Ravi Kumar");
    assert_eq!(created.address, "12 MG Road, Pune");
    assert_eq!(created.student_class, 10);
    assert!((created.percentage_10th - 91.5).abs() < f64::EPSILON);
    assert_eq!(created.marksheet_pdf, "/media/marksheets/asha.pdf");

    let stored = state.service.get_student(&created.id).await.unwrap();
    assert_eq!(stored.marksheet_pdf, "marksheets/asha.pdf");
    assert_eq!(state.uploads.read(&stored.marksheet_pdf).await.unwrap().as_ref(), PDF);
    assert_eq!(state.service.count_students().await.unwrap(), 1);
}

#[tokio::test]
async fn local_backend_writes_under_media_root() {
    let dir = tempfile::tempdir().unwrap();
    let storage = StorageConfig {
        backend: StorageBackend::Local,
        root: dir.path().join("media").to_string_lossy().into_owned(),
        ..Default::default()
    };
    let uploads = UploadStore::from_config(&storage, &S3Config::default())
        .await
        .unwrap();
    let service = RegService::new_local(":memory:").await.unwrap();
    let app = build_router(
        Arc::new(AppState::new(service, uploads, storage)),
        1024 * 1024,
    );

    let (first_status, first) = send(&app, Form::valid().request()).await;
    let (second_status, second) = send(&app, Form::valid().request()).await;
    assert_eq!(first_status, StatusCode::CREATED);
    assert_eq!(second_status, StatusCode::CREATED);
    assert_eq!(first["marksheet_pdf"], "/media/marksheets/asha.pdf");

    let on_disk = dir.path().join("media").join("marksheets");
    assert_eq!(std::fs::read(on_disk.join("asha.pdf")).unwrap(), PDF);
    let second_name = second["marksheet_pdf"]
        .as_str()
        .unwrap()
        .trim_start_matches("/media/marksheets/");
    assert_eq!(std::fs::read(on_disk.join(second_name)).unwrap(), PDF);
    assert_eq!(std::fs::read_dir(&on_disk).unwrap().count(), 2);
}

#[tokio::test]
async fn null_character_in_name_is_rejected() {
    let (app, state) = app().await;

    let form = Form::valid().without("name").text("name", "As\0ha");
    let (status, body) = send(&app, form.request()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "name": ["Null characters are not allowed."] }));
    assert_eq!(state.service.count_students().await.unwrap(), 0);
    assert!(!state.uploads.exists("marksheets/asha.pdf").await.unwrap());
}

#[tokio::test]
async fn padded_dob_is_rejected() {
    let (app, _) = app().await;

    let form = Form::valid().without("dob").text("dob", " 2008-04-12 ");
    let (status, body) = send(&app, form.request()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "dob": ["Date has wrong format. Use one of these formats instead: YYYY-MM-DD."] })
    );
}

#[tokio::test]
async fn missing_dob_writes_nothing() {
    let (app, state) = app().await;

    let (status, body) = send(&app, Form::valid().without("dob").request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "dob": ["This field is required."] }));

    assert_eq!(state.service.count_students().await.unwrap(), 0);
    assert!(!state.uploads.exists("marksheets/asha.pdf").await.unwrap());
}

#[rstest]
#[case("name")]
#[case("dob")]
#[case("father_name")]
#[case("address")]
#[case("student_class")]
#[case("percentage_10th")]
#[case("marksheet_pdf")]
#[tokio::test]
async fn each_missing_field_is_reported(#[case] field: &str) {
    let (app, state) = app().await;

    let (status, body) = send(&app, Form::valid().without(field).request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let expected = if field == "marksheet_pdf" {
        "No file was submitted."
    } else {
        "This field is required."
    };
    let mut errors = serde_json::Map::new();
    errors.insert(field.to_string(), json!([expected]));
    assert_eq!(body, Value::Object(errors));
    assert_eq!(state.service.count_students().await.unwrap(), 0);
}

#[tokio::test]
async fn non_numeric_class_and_percentage() {
    let (app, _) = app().await;

    let form = Form::valid()
        .without("student_class")
        .without("percentage_10th")
        .text("student_class", "tenth")
        .text("percentage_10th", "ninety");
    let (status, body) = send(&app, form.request()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "percentage_10th": ["A valid number is required."],
            "student_class": ["A valid integer is required."],
        })
    );
}

#[tokio::test]
async fn duplicate_submissions_create_distinct_records() {
    let (app, state) = app().await;

    let (first_status, first) = send(&app, Form::valid().request()).await;
    let (second_status, second) = send(&app, Form::valid().request()).await;
    assert_eq!(first_status, StatusCode::CREATED);
    assert_eq!(second_status, StatusCode::CREATED);

    assert_ne!(first["id"], second["id"]);
    assert_eq!(first["marksheet_pdf"], "/media/marksheets/asha.pdf");
    assert_ne!(first["marksheet_pdf"], second["marksheet_pdf"]);

    let second_url = second["marksheet_pdf"].as_str().unwrap();
    let second_path = second_url.trim_start_matches("/media/");
    assert!(second_path.starts_with("marksheets/asha_"));
    assert!(state.uploads.exists(second_path).await.unwrap());
    assert_eq!(state.service.count_students().await.unwrap(), 2);
}

#[tokio::test]
async fn json_body_without_file_flags_marksheet() {
    let (app, state) = app().await;

    let body = json!({
        "name": "Asha Kumari",
        "dob": "2008-04-12",
        "father_name": "Ravi Kumar",
        "address": "12 MG Road, Pune",
        "student_class": 10,
        "percentage_10th": 91.5,
    });
    let (status, errors) = send(
        &app,
        raw_request(Some("application/json"), body.to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(errors, json!({ "marksheet_pdf": ["No file was submitted."] }));
    assert_eq!(state.service.count_students().await.unwrap(), 0);
}

#[tokio::test]
async fn urlencoded_body_is_validated() {
    let (app, _) = app().await;

    let (status, errors) = send(
        &app,
        raw_request(
            Some("application/x-www-form-urlencoded"),
            "name=Asha&dob=12-04-2008&father_name=Ravi&address=Pune&student_class=10&percentage_10th=91.5",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        errors,
        json!({
            "dob": ["Date has wrong format. Use one of these formats instead: YYYY-MM-DD."],
            "marksheet_pdf": ["No file was submitted."],
        })
    );
}

#[tokio::test]
async fn unsupported_media_type() {
    let (app, _) = app().await;

    let (status, body) = send(&app, raw_request(Some("text/plain"), "name=Asha")).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(
        body,
        json!({ "detail": "Unsupported media type \"text/plain\" in request." })
    );
}

#[tokio::test]
async fn malformed_json_is_a_parse_error() {
    let (app, _) = app().await;

    let (status, body) = send(&app, raw_request(Some("application/json"), "{\"name\":")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .starts_with("JSON parse error - ")
    );
}

#[tokio::test]
async fn get_is_not_allowed() {
    let (app, _) = app().await;

    let request = Request::builder()
        .method("GET")
        .uri(REGISTER_PATH)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn no_content_type_flags_every_field() {
    let (app, _) = app().await;

    let (status, body) = send(&app, raw_request(None, Body::empty())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let errors = body.as_object().unwrap();
    assert_eq!(errors.len(), 7);
    assert_eq!(errors["marksheet_pdf"], json!(["No file was submitted."]));
    assert_eq!(errors["name"], json!(["This field is required."]));
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let (app, state) = harness(64).await;

    let padding = "x".repeat(256);
    let body = json!({ "name": padding }).to_string();
    let (status, body) = send(&app, raw_request(Some("application/json"), body)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["detail"].as_str().unwrap().starts_with("JSON parse error - "));
    assert_eq!(state.service.count_students().await.unwrap(), 0);
}

#[tokio::test]
async fn over_long_name_is_rejected() {
    let (app, state) = app().await;

    let form = Form::valid()
        .without("name")
        .text("name", &"a".repeat(101));
    let (status, body) = send(&app, form.request()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "name": ["Ensure this field has no more than 100 characters."] })
    );
    assert_eq!(state.service.count_students().await.unwrap(), 0);
}
