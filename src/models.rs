//! Frontend Models
//!
//! JSON payloads exchanged with the comparison backend. Fields the UI does
//! not read are kept in `extra` so they survive being sent back in a report.

use leptos_overlay::{BoxKind, OverlayBox};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ========================
// Lenient field decoding
// ========================

/// Number from a JSON number or numeric string
pub fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_f64))
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(value_as_f64)
        .filter(|v| *v >= 0.0)
        .map(|v| v.round() as u32))
}

/// Null or unreadable number as zero
fn lenient_f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?.unwrap_or_default())
}

fn lenient_u32_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_u32(deserializer)?.unwrap_or_default())
}

/// Form values are stored as strings but older records hold numbers
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

// ========================
// Compare
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub x: f64,
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarcodeItem {
    /// 1-based label index
    #[serde(default, deserialize_with = "lenient_u32_or_zero")]
    pub index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub points: Vec<Point>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BarcodeItem {
    /// Only an explicit `valid: false` counts as a failure
    pub fn is_invalid(&self) -> bool {
        self.valid == Some(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrItem {
    #[serde(default, deserialize_with = "lenient_u32_or_zero")]
    pub label_index: u32,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub x: f64,
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub y: f64,
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub w: f64,
    #[serde(default, deserialize_with = "lenient_f64_or_zero")]
    pub h: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OcrItem {
    pub fn has_error(&self) -> bool {
        non_empty(&self.error).is_some()
    }
}

/// One CMYK channel of a colour measurement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelReading {
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub etiketa: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub master: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub rozdiel: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Cyan,
    Magenta,
    Yellow,
    Black,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Cyan, Channel::Magenta, Channel::Yellow, Channel::Black];

    /// JSON key
    pub fn key(&self) -> &'static str {
        match self {
            Channel::Cyan => "cyan",
            Channel::Magenta => "magenta",
            Channel::Yellow => "yellow",
            Channel::Black => "black",
        }
    }

    pub fn letter(&self) -> &'static str {
        match self {
            Channel::Cyan => "C",
            Channel::Magenta => "M",
            Channel::Yellow => "Y",
            Channel::Black => "K",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Channel::Cyan => "Cyan",
            Channel::Magenta => "Magenta",
            Channel::Yellow => "Yellow",
            Channel::Black => "Black",
        }
    }

    /// Swatch colour
    pub fn css_color(&self) -> &'static str {
        match self {
            Channel::Cyan => "#22d3ee",
            Channel::Magenta => "#f472b6",
            Channel::Yellow => "#fde047",
            Channel::Black => "#222",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorItem {
    #[serde(default, deserialize_with = "lenient_u32", skip_serializing_if = "Option::is_none")]
    pub label_index: Option<u32>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cyan: Option<ChannelReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magenta: Option<ChannelReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yellow: Option<ChannelReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub black: Option<ChannelReading>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ColorItem {
    pub fn channel(&self, channel: Channel) -> Option<&ChannelReading> {
        match channel {
            Channel::Cyan => self.cyan.as_ref(),
            Channel::Magenta => self.magenta.as_ref(),
            Channel::Yellow => self.yellow.as_ref(),
            Channel::Black => self.black.as_ref(),
        }
    }

    /// A present summary other than "OK"
    pub fn is_failing(&self) -> bool {
        non_empty(&self.summary).is_some_and(|s| s != "OK")
    }
}

/// Response of `POST /api/compare`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareResponse {
    #[serde(default, deserialize_with = "nullable_vec")]
    pub barcode_data: Vec<BarcodeItem>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub ocr_data: Vec<OcrItem>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub color_data: Vec<ColorItem>,
    #[serde(default)]
    pub wind_result: Option<String>,
    #[serde(default)]
    pub detected_wind: Option<String>,
    #[serde(default)]
    pub expected_wind: Option<String>,
    #[serde(default)]
    pub wind_detail: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CompareResponse {
    /// Error boxes to draw over label `label_index`
    pub fn label_boxes(&self, label_index: u32) -> Vec<OverlayBox> {
        let barcodes = self
            .barcode_data
            .iter()
            .filter(|b| b.index == label_index && b.is_invalid() && b.points.len() == 4)
            .map(|b| {
                let p = &b.points;
                let mut bx = OverlayBox::new(
                    BoxKind::Barcode,
                    b.index,
                    p[0].x,
                    p[0].y,
                    (p[1].x - p[0].x).abs(),
                    (p[3].y - p[0].y).abs(),
                );
                bx.error = Some(b.error.clone().unwrap_or_else(|| "Chyba barcode".to_string()));
                bx
            });

        let ocr = self
            .ocr_data
            .iter()
            .filter(|o| o.label_index == label_index && o.has_error())
            .map(|o| {
                let mut bx = OverlayBox::new(BoxKind::Ocr, o.label_index, o.x, o.y, o.w, o.h);
                bx.error = o.error.clone();
                bx.master_text = o.master_text.clone();
                bx.scan_text = o.scan_text.clone();
                bx
            });

        barcodes.chain(ocr).collect()
    }

    pub fn barcode_for(&self, label_index: u32) -> Option<&BarcodeItem> {
        self.barcode_data.iter().find(|b| b.index == label_index)
    }

    pub fn ocr_for(&self, label_index: u32) -> impl Iterator<Item = &OcrItem> {
        self.ocr_data.iter().filter(move |o| o.label_index == label_index)
    }
}

/// A label cut from the scanned strip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CroppedLabel {
    /// PNG data URL
    pub url: String,
    pub w: u32,
    pub h: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,
}

/// `POST /api/ai/fake-ocr-error` body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FakeOcrError {
    pub master_text: String,
    pub scan_text: String,
    pub product_number: String,
}

// ========================
// Master labels
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropSize {
    pub w: u32,
    pub h: u32,
}

/// Parameters stored next to a master image
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterMeta {
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub spool_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rows: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cols: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub label_width_mm: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub label_height_mm: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub horizontal_gap_mm: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub vertical_gap_mm: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub dpi: Option<u32>,
    #[serde(default)]
    pub crop_size: Option<CropSize>,
    #[serde(default)]
    pub wind: Option<String>,
}

/// Response of `GET /api/master/load`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterLoadResponse {
    /// Data URL of the stored master
    pub png_base64: String,
    #[serde(default)]
    pub meta: Option<MasterMeta>,
}

// ========================
// Reports
// ========================

/// Response of `POST /api/report/save` (also used for error bodies)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SaveReportResponse {
    #[serde(default)]
    pub txt: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Row of `GET /api/report`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details_json: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub file_size: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ========================
// Density
// ========================

/// One channel of `POST /api/denzita-compare`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DenzitaChannel {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rel_rozdiel: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub etiketa: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub master: Option<f64>,
}

/// `POST /api/denzita-report` body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DenzitaReportPayload {
    pub operator: String,
    pub product_code: String,
    pub datetime: String,
    pub cyan: Option<f64>,
    pub magenta: Option<f64>,
    pub yellow: Option<f64>,
    pub black: Option<f64>,
    pub summary: String,
    pub report_type: String,
}

// ========================
// Pantone
// ========================

/// `POST /api/pantone/compare` body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PantoneCompareRequest {
    pub pantone_code: String,
    /// PNG body without the data URL header
    pub image_base64: String,
    pub operator: String,
    pub product_code: String,
    pub datetime: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PantoneResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pantone_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pantone_hex: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub ref_r: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub ref_g: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub ref_b: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub sample_r: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub sample_g: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub sample_b: Option<f64>,
    #[serde(default, rename = "deltaE2000", deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub delta_e2000: Option<f64>,
    #[serde(default, rename = "deltaE76", deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub delta_e76: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub rgb_distance: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub match_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_response() -> CompareResponse {
        serde_json::from_value(json!({
            "barcodeData": [
                { "index": 1, "valid": false, "error": null,
                  "points": [{"x": 10, "y": 20}, {"x": 60, "y": 20}, {"x": 60, "y": 50}, {"x": 10, "y": 50}] },
                { "index": 2, "valid": false, "error": "EAN checksum",
                  "points": [{"x": 1, "y": 1}, {"x": 2, "y": 1}] },
                { "index": 3, "valid": true, "points": [] }
            ],
            "ocrData": [
                { "labelIndex": 1, "error": "Rozdiel v texte", "x": 5, "y": 6, "w": 70, "h": 12,
                  "masterText": "LOT 42", "scanText": "L0T 42" },
                { "labelIndex": 1, "error": "", "x": 0, "y": 0, "w": 1, "h": 1 }
            ],
            "colorData": null,
            "windResult": "OK",
            "detectedWind": "A2",
            "scanId": 991
        }))
        .unwrap()
    }

    #[test]
    fn test_label_boxes_extraction() {
        let resp = sample_response();
        let boxes = resp.label_boxes(1);
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].kind, BoxKind::Barcode);
        assert_eq!((boxes[0].x, boxes[0].y, boxes[0].w, boxes[0].h), (10.0, 20.0, 50.0, 30.0));
        assert_eq!(boxes[0].error.as_deref(), Some("Chyba barcode"));
        assert_eq!(boxes[1].kind, BoxKind::Ocr);
        assert_eq!(boxes[1].scan_text.as_deref(), Some("L0T 42"));
        // label 2 barcode has only two points
        assert!(resp.label_boxes(2).is_empty());
    }

    #[test]
    fn test_null_arrays_and_unknown_fields() {
        let resp = sample_response();
        assert!(resp.color_data.is_empty());
        assert_eq!(resp.extra.get("scanId"), Some(&json!(991)));
        let back = serde_json::to_value(&resp).unwrap();
        assert_eq!(back["scanId"], json!(991));
    }

    #[test]
    fn test_null_coordinates_and_indexes() {
        let resp: CompareResponse = serde_json::from_value(json!({
            "barcodeData": [
                { "index": null, "valid": true, "points": [{"x": null, "y": "4"}] }
            ],
            "ocrData": [
                { "labelIndex": 1, "error": "Rozdiel", "x": null, "y": 2, "w": null, "h": "3" }
            ]
        }))
        .unwrap();
        assert_eq!(resp.barcode_data[0].index, 0);
        assert_eq!(resp.barcode_data[0].points[0], Point { x: 0.0, y: 4.0 });
        let ocr = &resp.ocr_data[0];
        assert_eq!((ocr.label_index, ocr.x, ocr.y, ocr.w, ocr.h), (1, 0.0, 2.0, 0.0, 3.0));
    }

    #[test]
    fn test_channel_reading_lenient_numbers() {
        let item: ColorItem = serde_json::from_value(json!({
            "labelIndex": "2",
            "summary": "C mimo tolerancie",
            "cyan": { "etiketa": "41.26", "master": 39, "rozdiel": 2.26 },
            "magenta": { "etiketa": null, "rozdiel": "n/a" }
        }))
        .unwrap();
        assert_eq!(item.label_index, Some(2));
        assert!(item.is_failing());
        let cyan = item.channel(Channel::Cyan).unwrap();
        assert_eq!(cyan.etiketa, Some(41.26));
        assert_eq!(cyan.master, Some(39.0));
        assert_eq!(item.channel(Channel::Magenta).unwrap().rozdiel, None);
        assert!(item.channel(Channel::Black).is_none());
    }

    #[test]
    fn test_master_meta_accepts_numbers_and_strings() {
        let resp: MasterLoadResponse = serde_json::from_value(json!({
            "pngBase64": "data:image/png;base64,AAAA",
            "meta": { "rows": 3, "cols": "4", "dpi": "300", "wind": "A1",
                      "cropSize": { "w": 340, "h": 227 } }
        }))
        .unwrap();
        let meta = resp.meta.unwrap();
        assert_eq!(meta.rows.as_deref(), Some("3"));
        assert_eq!(meta.cols.as_deref(), Some("4"));
        assert_eq!(meta.dpi, Some(300));
        assert_eq!(meta.crop_size, Some(CropSize { w: 340, h: 227 }));
        assert_eq!(meta.label_width_mm, None);
    }

    #[test]
    fn test_pantone_result_field_names() {
        let res: PantoneResult = serde_json::from_value(json!({
            "pantoneCode": "485 C", "pantoneHex": "#DA291C",
            "deltaE2000": 1.234, "deltaE76": "2.5", "matchPercent": 97.3, "rating": "Výborné"
        }))
        .unwrap();
        assert_eq!(res.delta_e2000, Some(1.234));
        assert_eq!(res.delta_e76, Some(2.5));
        assert_eq!(res.rating.as_deref(), Some("Výborné"));
    }
}
