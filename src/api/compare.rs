//! Compare Endpoint

use reqwest::multipart::Form;
use tracing::info;

use super::{client, ensure_success, Result, Upload};
use crate::config::endpoint;
use crate::models::CompareResponse;

/// Multipart fields of `POST /api/compare`
#[derive(Debug, Clone)]
pub struct CompareRequest {
    pub master: Upload,
    pub scan: Upload,
    pub rows: String,
    pub cols: String,
    pub wind: String,
    pub label_width_px: u32,
    pub label_height_px: u32,
    pub horizontal_gap_mm: String,
    pub vertical_gap_mm: String,
    pub dpi: u32,
    pub spool_number: String,
    pub product_number: String,
}

pub async fn compare(req: CompareRequest) -> Result<CompareResponse> {
    info!(
        "compare product={} rows={} cols={} wind={}",
        req.product_number, req.rows, req.cols, req.wind
    );
    let form = Form::new()
        .part("master", req.master.into_part()?)
        .part("scan", req.scan.into_part()?)
        .text("rows", req.rows)
        .text("cols", req.cols)
        .text("wind", req.wind)
        .text("labelWidthPx", req.label_width_px.to_string())
        .text("labelHeightPx", req.label_height_px.to_string())
        .text("horizontalGapMm", req.horizontal_gap_mm)
        .text("verticalGapMm", req.vertical_gap_mm)
        .text("dpi", req.dpi.to_string())
        .text("spoolNumber", req.spool_number)
        .text("productNumber", req.product_number);

    let resp = client()
        .post(endpoint("/api/compare"))
        .multipart(form)
        .send()
        .await?;
    Ok(ensure_success(resp).await?.json::<CompareResponse>().await?)
}
