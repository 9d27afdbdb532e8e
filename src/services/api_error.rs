use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::validation::ValidationErrorDetail;

/// Failure of a call to one of the backend services. The `Display` text is
/// what the user gets to see.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never made it to the service or back.
    #[error("{0}")]
    Transport(String),
    /// Non-2xx status.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// 2xx status but a body we could not make sense of.
    #[error("{0}")]
    Malformed(String),
}

#[derive(Deserialize)]
struct DetailText {
    detail: String,
}

#[derive(Deserialize)]
struct DetailList {
    detail: Vec<serde_json::Value>,
}

/// `{"detail": "..."}` bodies. Empty details count as absent.
pub fn detail_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<DetailText>(body)
        .ok()
        .map(|parsed| parsed.detail)
        .filter(|detail| !detail.trim().is_empty())
}

/// First entry of a `{"detail": [{"loc": [...], "msg": "..."}]}` body, if the
/// body has that shape. Remaining entries are ignored.
pub fn first_validation_error(body: &[u8]) -> Option<ValidationErrorDetail> {
    let parsed = serde_json::from_slice::<DetailList>(body).ok()?;
    let first = parsed.detail.into_iter().next()?;
    serde_json::from_value(first).ok()
}

/// "HTTP Error 502: Bad Gateway"
pub fn status_line_message(status: StatusCode) -> String {
    format!(
        "HTTP Error {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or_default()
    )
}
