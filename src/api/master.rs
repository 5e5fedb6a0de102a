//! Master Label Endpoints

use reqwest::multipart::Form;

use super::{client, encode_component, ensure_success, Result, Upload};
use crate::config::endpoint;
use crate::models::{MasterLoadResponse, MasterMeta};

pub async fn save_master(product_number: &str, master: Upload, meta: &MasterMeta) -> Result<()> {
    let params = serde_json::to_string(meta)?;
    let master = Upload {
        file_name: format!("{product_number}.png"),
        ..master
    };
    let form = Form::new()
        .text("productNumber", product_number.to_string())
        .part("master", master.into_part()?)
        .text("params", params);
    let resp = client()
        .post(endpoint("/api/master/save"))
        .multipart(form)
        .send()
        .await?;
    ensure_success(resp).await?;
    Ok(())
}

pub async fn load_master(product_number: &str) -> Result<MasterLoadResponse> {
    let url = format!(
        "{}?productNumber={}",
        endpoint("/api/master/load"),
        encode_component(product_number)
    );
    let resp = client().get(url).send().await?;
    Ok(ensure_success(resp).await?.json().await?)
}

/// Image URL of the stored master, usable directly as `<img src>`
pub fn master_image_url(product_number: &str) -> String {
    format!(
        "{}?productNumber={}",
        endpoint("/api/master/image"),
        encode_component(product_number.trim())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_image_url() {
        assert!(master_image_url(" P 1 ").ends_with("/api/master/image?productNumber=P%201"));
    }
}
