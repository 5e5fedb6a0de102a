//! Density Endpoints

use reqwest::multipart::Form;

use super::{client, ensure_success, ApiError, Result, Upload};
use crate::config::endpoint;
use crate::denzita::{parse_result, DenzitaResult};
use crate::models::DenzitaReportPayload;

pub async fn denzita_compare(
    etiketa: Upload,
    product_number: &str,
    master: Option<Upload>,
    operator: Option<&str>,
) -> Result<DenzitaResult> {
    let mut form = Form::new()
        .part("etiketa", etiketa.into_part()?)
        .text("productNumber", product_number.to_string());
    if let Some(master) = master {
        form = form.part("master", master.into_part()?);
    }
    if let Some(operator) = operator.filter(|o| !o.is_empty()) {
        form = form.text("operator", operator.to_string());
    }
    let resp = client()
        .post(endpoint("/api/denzita-compare"))
        .multipart(form)
        .send()
        .await?;
    let resp = ensure_success(resp).await.map_err(|err| match err {
        ApiError::Status(_) => ApiError::Server("Chyba servera".to_string()),
        other => other,
    })?;
    Ok(parse_result(resp.json().await?))
}

pub async fn save_denzita_report(report: &DenzitaReportPayload) -> Result<()> {
    let resp = client()
        .post(endpoint("/api/denzita-report"))
        .json(report)
        .send()
        .await?;
    if !resp.status().is_success() {
        return Err(ApiError::Server("Chyba pri ukladaní reportu".to_string()));
    }
    Ok(())
}
