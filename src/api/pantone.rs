//! Pantone Endpoint

use super::{client, ApiError, Result};
use crate::config::endpoint;
use crate::models::{PantoneCompareRequest, PantoneResult};

pub async fn pantone_compare(req: &PantoneCompareRequest) -> Result<PantoneResult> {
    let resp = client()
        .post(endpoint("/api/pantone/compare"))
        .json(req)
        .send()
        .await?;
    if !resp.status().is_success() {
        return Err(ApiError::Server("Chyba porovnania".to_string()));
    }
    Ok(resp.json().await?)
}
