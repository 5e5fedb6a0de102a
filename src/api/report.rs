//! Report Endpoints

use tracing::info;

use super::{client, ensure_success, ApiError, Result};
use crate::config::endpoint;
use crate::models::{SaveReportResponse, ScanReport};
use crate::verdict::CompareReportPayload;

/// Save a compare report; the error body's message is surfaced on failure
pub async fn save_report(report: &CompareReportPayload) -> Result<SaveReportResponse> {
    info!("saving compare report for product {}", report.product_number);
    let resp = client()
        .post(endpoint("/api/report/save"))
        .json(report)
        .send()
        .await?;
    let ok = resp.status().is_success();
    let body: SaveReportResponse = resp.json().await.unwrap_or_default();
    if ok {
        Ok(body)
    } else {
        Err(ApiError::Server(
            body.error.unwrap_or_else(|| "Neznáma chyba".to_string()),
        ))
    }
}

pub async fn list_reports() -> Result<Vec<ScanReport>> {
    let resp = client().get(endpoint("/api/report")).send().await?;
    Ok(ensure_success(resp).await?.json().await?)
}

pub async fn delete_report(id: i64) -> Result<()> {
    let resp = client()
        .delete(endpoint(&format!("/api/report/{id}")))
        .send()
        .await?;
    ensure_success(resp).await?;
    Ok(())
}
