//! OCR Feedback Endpoint

use super::{client, ensure_success, Result};
use crate::config::endpoint;
use crate::models::FakeOcrError;

/// Mark an OCR mismatch as a false positive
pub async fn report_fake_ocr_error(body: &FakeOcrError) -> Result<()> {
    let resp = client()
        .post(endpoint("/api/ai/fake-ocr-error"))
        .json(body)
        .send()
        .await?;
    ensure_success(resp).await?;
    Ok(())
}
