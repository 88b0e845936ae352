//! Body decoding into an untyped [`RawRecord`].
//!
//! Supports `multipart/form-data`, `application/x-www-form-urlencoded` and
//! `application/json`. A request without a content type carries no data.

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Form;
use bytes::Bytes;

use reg_core::{RawRecord, RawValue, UploadedFile};

use crate::error::ApiError;

const MULTIPART: &str = "multipart/form-data";
const URLENCODED: &str = "application/x-www-form-urlencoded";
const JSON: &str = "application/json";

/// Media type without parameters, lowercased.
fn media_type(request: &Request) -> Option<String> {
    let value = request.headers().get(CONTENT_TYPE)?.to_str().ok()?;
    let essence = value.split(';').next().unwrap_or_default().trim();
    (!essence.is_empty()).then(|| essence.to_ascii_lowercase())
}

/// Decode the request body according to its content type.
///
/// # Errors
///
/// Returns `ApiError::Parse` for malformed or oversized bodies and
/// `ApiError::UnsupportedMediaType` for content types without a parser.
pub async fn read_record(request: Request) -> Result<RawRecord, ApiError> {
    let Some(media_type) = media_type(&request) else {
        return Ok(RawRecord::new());
    };

    match media_type.as_str() {
        MULTIPART => read_multipart(request).await,
        URLENCODED => read_urlencoded(request).await,
        JSON => read_json(request).await,
        _ => Err(ApiError::UnsupportedMediaType(media_type)),
    }
}

async fn read_multipart(request: Request) -> Result<RawRecord, ApiError> {
    let parse_error = |status, reason: String| ApiError::Parse {
        status,
        parser: "Multipart form",
        reason,
    };

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|rejection| parse_error(rejection.status(), rejection.body_text()))?;

    let mut record = RawRecord::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| parse_error(e.status(), e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        let filename = field.file_name().map(str::to_string);
        match filename {
            // A file input left empty arrives with a blank filename; treat it as absent.
            Some(filename) if filename.is_empty() => {}
            Some(filename) => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| parse_error(e.status(), e.body_text()))?;
                record.insert(
                    name,
                    RawValue::File(UploadedFile::new(filename, content_type, bytes)),
                );
            }
            None => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| parse_error(e.status(), e.body_text()))?;
                record.insert(name, RawValue::Text(text));
            }
        }
    }

    Ok(record)
}

async fn read_urlencoded(request: Request) -> Result<RawRecord, ApiError> {
    let Form(pairs) = Form::<Vec<(String, String)>>::from_request(request, &())
        .await
        .map_err(|rejection| ApiError::Parse {
            status: rejection.status(),
            parser: "Form",
            reason: rejection.body_text(),
        })?;

    Ok(pairs
        .into_iter()
        .map(|(key, value)| (key, RawValue::Text(value)))
        .collect())
}

async fn read_json(request: Request) -> Result<RawRecord, ApiError> {
    let parse_error = |status, reason: String| ApiError::Parse {
        status,
        parser: "JSON",
        reason,
    };

    let body = Bytes::from_request(request, &())
        .await
        .map_err(|rejection| parse_error(rejection.status(), rejection.body_text()))?;

    if body.is_empty() {
        return Ok(RawRecord::new());
    }

    match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(serde_json::Value::Object(map)) => Ok(RawRecord::from(map)),
        Ok(_) => Err(parse_error(
            axum::http::StatusCode::BAD_REQUEST,
            "expected an object".into(),
        )),
        Err(e) => Err(parse_error(axum::http::StatusCode::BAD_REQUEST, e.to_string())),
    }
}
