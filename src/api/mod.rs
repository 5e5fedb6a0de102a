//! Backend API Client
//!
//! HTTP bindings to the comparison service, organized by domain.

mod ai;
mod compare;
mod denzita;
mod master;
mod pantone;
mod report;

use std::sync::OnceLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::multipart::Part;
use reqwest::{Client, Response};
use serde::Deserialize;
use thiserror::Error;

use crate::imaging::{DataUrl, ImagingError};

pub use ai::*;
pub use compare::*;
pub use denzita::*;
pub use master::*;
pub use pantone::*;
pub use report::*;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Server(String),
    #[error("Status {0}")]
    Status(u16),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Characters `encodeURIComponent` leaves alone
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// File sent as a multipart field
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: String,
}

impl Upload {
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            file_name: file_name.into(),
            mime: mime.into(),
        }
    }

    /// Decode a data URL into an upload
    pub fn from_data_url(url: &str, file_name: impl Into<String>) -> std::result::Result<Self, ImagingError> {
        let data = DataUrl::parse(url)?;
        Ok(Self::new(data.bytes, file_name, data.mime))
    }

    fn into_part(self) -> Result<Part> {
        Ok(Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime)?)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Server message from an error body, else the bare status
pub fn error_from_body(status: u16, body: &str) -> ApiError {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|msg| !msg.is_empty())
        .map(ApiError::Server)
        .unwrap_or(ApiError::Status(status))
}

async fn ensure_success(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(error_from_body(status.as_u16(), &body))
}

static CLIENT: OnceLock<Client> = OnceLock::new();

fn client() -> &'static Client {
    CLIENT.get_or_init(Client::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_is_shared() {
        assert!(std::ptr::eq(client(), client()));
    }

    #[test]
    fn test_encode_component_matches_browser() {
        assert_eq!(encode_component("P 77/a&b"), "P%2077%2Fa%26b");
        assert_eq!(encode_component("A-1_(x).*~!'"), "A-1_(x).*~!'");
        assert_eq!(encode_component("č"), "%C4%8D");
    }

    #[test]
    fn test_upload_from_data_url() {
        let upload = Upload::from_data_url("data:image/jpeg;base64,AAEC", "master.jpg").unwrap();
        assert_eq!(upload.bytes, vec![0, 1, 2]);
        assert_eq!(upload.mime, "image/jpeg");
        assert_eq!(upload.file_name, "master.jpg");
        assert!(Upload::from_data_url("not a data url", "x.png").is_err());
    }

    #[test]
    fn test_error_from_body() {
        assert!(matches!(error_from_body(500, r#"{"error":"Master neexistuje"}"#), ApiError::Server(m) if m == "Master neexistuje"));
        assert!(matches!(error_from_body(404, "not json"), ApiError::Status(404)));
        assert!(matches!(error_from_body(400, r#"{"error":""}"#), ApiError::Status(400)));
        assert_eq!(ApiError::Status(502).to_string(), "Status 502");
    }
}
