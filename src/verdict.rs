//! Compare Report Verdicts
//!
//! Pass/fail derivation over a compare result and the payload saved to
//! `/api/report/save`.

use percent_encoding::percent_decode_str;
use serde::Serialize;

use crate::config::DIFF_LIMIT;
use crate::models::{BarcodeItem, ColorItem, CompareResponse, CroppedLabel, OcrItem};

/// Everything the compare workflow hands to the report page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportDraft {
    pub operator: String,
    pub job_number: String,
    pub product: String,
    pub machine: String,
    pub product_number: String,
    pub spool_number: String,
    pub wind: String,
    pub result: CompareResponse,
    pub cropped_labels: Vec<CroppedLabel>,
}

impl ReportDraft {
    /// Backend's expected wind, else the one chosen in the workflow
    pub fn expected_wind(&self) -> String {
        self.result
            .expected_wind
            .clone()
            .filter(|w| !w.is_empty())
            .unwrap_or_else(|| self.wind.clone())
    }
}

// ========================
// Verdicts
// ========================

/// Labels whose barcode is invalid, in order
pub fn barcode_fail_indexes(items: &[BarcodeItem]) -> Vec<u32> {
    items.iter().filter(|b| b.is_invalid()).map(|b| b.index).collect()
}

/// Distinct labels with an OCR error, in first-occurrence order
pub fn ocr_fail_indexes(items: &[OcrItem]) -> Vec<u32> {
    let mut out: Vec<u32> = Vec::new();
    for o in items.iter().filter(|o| o.has_error()) {
        if !out.contains(&o.label_index) {
            out.push(o.label_index);
        }
    }
    out
}

pub fn image_ok(labels: &[CroppedLabel]) -> bool {
    labels.iter().all(|l| l.ok == Some(true))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorVerdict {
    NoData,
    Ok,
    Error,
}

impl ColorVerdict {
    pub fn from_items(items: &[ColorItem]) -> Self {
        if items.is_empty() {
            ColorVerdict::NoData
        } else if items.iter().any(ColorItem::is_failing) {
            ColorVerdict::Error
        } else {
            ColorVerdict::Ok
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorVerdict::NoData => "-",
            ColorVerdict::Ok => "OK",
            ColorVerdict::Error => "Chyba",
        }
    }
}

fn join_indexes(indexes: &[u32]) -> String {
    indexes.iter().map(u32::to_string).collect::<Vec<_>>().join(", ")
}

/// Derived pass/fail state of one compare result
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub wind_ok: bool,
    pub barcode_fails: Vec<u32>,
    pub ocr_fails: Vec<u32>,
    pub barcode_errors: usize,
    pub text_errors: usize,
    pub color: ColorVerdict,
    pub image_ok: bool,
}

impl Verdict {
    pub fn evaluate(result: &CompareResponse, labels: &[CroppedLabel]) -> Self {
        Self {
            wind_ok: result.wind_result.as_deref() == Some("OK"),
            barcode_fails: barcode_fail_indexes(&result.barcode_data),
            ocr_fails: ocr_fail_indexes(&result.ocr_data),
            barcode_errors: result.barcode_data.iter().filter(|b| b.is_invalid()).count(),
            text_errors: result.ocr_data.iter().filter(|o| o.has_error()).count(),
            color: ColorVerdict::from_items(&result.color_data),
            image_ok: image_ok(labels),
        }
    }

    pub fn barcode_ok(&self) -> bool {
        self.barcode_fails.is_empty()
    }

    pub fn ocr_ok(&self) -> bool {
        self.ocr_fails.is_empty()
    }

    /// "OK" or "Chyba v etikete č.1, 3"
    pub fn barcode_result(&self) -> String {
        if self.barcode_ok() {
            "OK".to_string()
        } else {
            format!("Chyba v etikete č.{}", join_indexes(&self.barcode_fails))
        }
    }

    /// "OK" or "Chyba v texte etiketa č.2"
    pub fn ocr_result(&self) -> String {
        if self.ocr_ok() {
            "OK".to_string()
        } else {
            format!("Chyba v texte etiketa č.{}", join_indexes(&self.ocr_fails))
        }
    }

    pub fn barcode_fail_list(&self) -> String {
        join_indexes(&self.barcode_fails)
    }

    pub fn ocr_fail_list(&self) -> String {
        join_indexes(&self.ocr_fails)
    }

    pub fn summary(&self) -> String {
        let ok_or = |ok: bool, err: String| if ok { "OK".to_string() } else { err };
        [
            format!("NAVIN: {}", ok_or(self.wind_ok, "Chyba".to_string())),
            format!(
                "Čiarový kód: {}",
                ok_or(self.barcode_errors == 0, format!("Chyba v {} etikete/kách", self.barcode_errors))
            ),
            format!(
                "Text: {}",
                ok_or(self.text_errors == 0, format!("Chyba v {} riadku/riadkoch", self.text_errors))
            ),
            format!(
                "Farebnosť: {}",
                ok_or(self.color != ColorVerdict::Error, "Chyba".to_string())
            ),
            format!("Obraz: {}", ok_or(self.image_ok, "Chyba".to_string())),
        ]
        .join(" | ")
    }
}

/// Badge text for the OCR state of one label
pub fn text_badge(errors: usize) -> String {
    match errors {
        0 => "Text: OK".to_string(),
        1 => "Text: Chyba v 1 riadku".to_string(),
        n => format!("Text: Chyba v {n} riadkoch"),
    }
}

// ========================
// Field fallbacks
// ========================

fn usable(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty() && *v != "-")
}

/// First usable of primary, secondary and the URL query value, else "-"
pub fn safe_value(primary: Option<&str>, secondary: Option<&str>, query: Option<&str>) -> String {
    usable(primary)
        .or_else(|| usable(secondary))
        .or_else(|| usable(query))
        .unwrap_or("-")
        .to_string()
}

/// Decoded value of `name` in a `?a=b&c=d` query string
pub fn query_param(search: &str, name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    search.trim_start_matches('?').split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key != name {
            return None;
        }
        let value = value.replace('+', " ");
        Some(percent_decode_str(&value).decode_utf8_lossy().into_owned())
    })
}

/// Required identifiers still missing before a report can be saved
pub fn missing_for_save(product_code: &str, job_number: &str) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if product_code.is_empty() || product_code == "-" {
        missing.push("číslo produktu");
    }
    if job_number.is_empty() || job_number == "-" {
        missing.push("číslo zákazky");
    }
    missing
}

pub fn missing_message(missing: &[&str]) -> String {
    format!("Chýba: {} – nemožno uložiť report!", missing.join(", "))
}

// ========================
// Colour table
// ========================

/// One decimal, "-" when not numeric
pub fn fmt_one(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.1}")).unwrap_or_else(|| "-".to_string())
}

pub fn diff_within_limit(diff: f64) -> bool {
    diff.abs() < DIFF_LIMIT
}

// ========================
// Payload
// ========================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareDetail {
    pub expected_wind: String,
    pub detected_wind: String,
    pub wind_result: String,
    pub wind_detail: String,
    pub barcode_data: Vec<BarcodeItem>,
    pub ocr_data: Vec<OcrItem>,
    pub color_data: Vec<ColorItem>,
    pub cropped_labels: Vec<CroppedLabel>,
    pub note: String,
}

/// `POST /api/report/save` body; identifiers go out under both key sets
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareReportPayload {
    pub report_type: &'static str,
    pub operator: String,
    pub job_number: String,
    pub zakazka: String,
    pub product_number: String,
    pub produkt: String,
    pub machine: String,
    pub stroj: String,
    pub datum: String,
    pub datetime: String,
    pub control_date: String,
    pub spool_number: String,
    pub summary: String,
    pub text_errors: usize,
    pub barcode_errors: usize,
    #[serde(flatten)]
    pub detail: CompareDetail,
    pub compare_detail: CompareDetail,
    pub barcode_result: String,
    pub ocr_result: String,
    pub color_result: &'static str,
}

/// Resolved header fields of the report page
#[derive(Debug, Clone, PartialEq)]
pub struct ReportHeader {
    pub job_number: String,
    pub product_code: String,
    pub machine: String,
    pub datetime: String,
}

impl CompareReportPayload {
    pub fn build(draft: &ReportDraft, header: &ReportHeader, verdict: &Verdict, note: &str) -> Self {
        let result = &draft.result;
        let detail = CompareDetail {
            expected_wind: draft.expected_wind(),
            detected_wind: result.detected_wind.clone().unwrap_or_default(),
            wind_result: result.wind_result.clone().unwrap_or_default(),
            wind_detail: result.wind_detail.clone().unwrap_or_default(),
            barcode_data: result.barcode_data.clone(),
            ocr_data: result.ocr_data.clone(),
            color_data: result.color_data.clone(),
            cropped_labels: draft.cropped_labels.clone(),
            note: note.to_string(),
        };
        Self {
            report_type: "COMPARE",
            operator: draft.operator.clone(),
            job_number: header.job_number.clone(),
            zakazka: header.job_number.clone(),
            product_number: header.product_code.clone(),
            produkt: header.product_code.clone(),
            machine: header.machine.clone(),
            stroj: header.machine.clone(),
            datum: header.datetime.clone(),
            datetime: header.datetime.clone(),
            control_date: header.datetime.clone(),
            spool_number: draft.spool_number.clone(),
            summary: verdict.summary(),
            text_errors: verdict.text_errors,
            barcode_errors: verdict.barcode_errors,
            compare_detail: detail.clone(),
            detail,
            barcode_result: verdict.barcode_result(),
            ocr_result: verdict.ocr_result(),
            color_result: verdict.color.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response() -> CompareResponse {
        serde_json::from_value(json!({
            "barcodeData": [
                { "index": 1, "valid": false, "error": "EAN" },
                { "index": 2, "valid": true },
                { "index": 3, "valid": false }
            ],
            "ocrData": [
                { "labelIndex": 2, "error": "LOT" },
                { "labelIndex": 2, "error": "EXP" },
                { "labelIndex": 1, "error": null }
            ],
            "colorData": [ { "labelIndex": 1, "summary": "OK" } ],
            "windResult": "CHYBA",
            "detectedWind": "A3"
        }))
        .unwrap()
    }

    #[test]
    fn test_fail_indexes() {
        let r = response();
        assert_eq!(barcode_fail_indexes(&r.barcode_data), vec![1, 3]);
        assert_eq!(ocr_fail_indexes(&r.ocr_data), vec![2]);
    }

    #[test]
    fn test_summary_line() {
        let v = Verdict::evaluate(&response(), &[]);
        assert_eq!(
            v.summary(),
            "NAVIN: Chyba | Čiarový kód: Chyba v 2 etikete/kách | Text: Chyba v 2 riadku/riadkoch | Farebnosť: OK | Obraz: OK"
        );
        assert_eq!(v.barcode_result(), "Chyba v etikete č.1, 3");
        assert_eq!(v.ocr_result(), "Chyba v texte etiketa č.2");
    }

    #[test]
    fn test_color_verdict() {
        assert_eq!(ColorVerdict::from_items(&[]).as_str(), "-");
        let failing: ColorItem = serde_json::from_value(json!({ "summary": "Y mimo" })).unwrap();
        let blank: ColorItem = serde_json::from_value(json!({ "summary": "" })).unwrap();
        assert_eq!(ColorVerdict::from_items(&[blank.clone()]), ColorVerdict::Ok);
        assert_eq!(ColorVerdict::from_items(&[blank, failing]), ColorVerdict::Error);
    }

    #[test]
    fn test_image_ok_requires_flag() {
        let label = |ok| CroppedLabel { url: String::new(), w: 1, h: 1, ok };
        assert!(image_ok(&[]));
        assert!(image_ok(&[label(Some(true))]));
        assert!(!image_ok(&[label(Some(true)), label(None)]));
    }

    #[test]
    fn test_safe_value_fallbacks() {
        assert_eq!(safe_value(Some("Z-1"), Some("Z-2"), None), "Z-1");
        assert_eq!(safe_value(Some(" - "), Some(""), Some("Z-9")), "Z-9");
        assert_eq!(safe_value(None, None, Some("-")), "-");
    }

    #[test]
    fn test_query_param_decoding() {
        let search = "?jobNumber=Z%2D10+A&productNumber=P77";
        assert_eq!(query_param(search, "jobNumber").as_deref(), Some("Z-10 A"));
        assert_eq!(query_param(search, "productNumber").as_deref(), Some("P77"));
        assert_eq!(query_param(search, "machine"), None);
    }

    #[test]
    fn test_missing_message() {
        let missing = missing_for_save("-", "-");
        assert_eq!(missing_message(&missing), "Chýba: číslo produktu, číslo zákazky – nemožno uložiť report!");
        assert!(missing_for_save("P1", "Z1").is_empty());
    }

    #[test]
    fn test_fmt_and_limits() {
        assert_eq!(fmt_one(Some(41.26)), "41.3");
        assert_eq!(fmt_one(None), "-");
        assert!(diff_within_limit(-2.4));
        assert!(!diff_within_limit(2.5));
        assert_eq!(text_badge(3), "Text: Chyba v 3 riadkoch");
    }

    #[test]
    fn test_payload_keys() {
        let draft = ReportDraft {
            operator: "admin".to_string(),
            spool_number: "4".to_string(),
            wind: "A2".to_string(),
            result: response(),
            ..Default::default()
        };
        let header = ReportHeader {
            job_number: "Z-1".to_string(),
            product_code: "P-1".to_string(),
            machine: "X4".to_string(),
            datetime: "7. 3. 2026 9:05:04".to_string(),
        };
        let verdict = Verdict::evaluate(&draft.result, &[]);
        let payload = serde_json::to_value(CompareReportPayload::build(&draft, &header, &verdict, "ok")).unwrap();
        assert_eq!(payload["reportType"], "COMPARE");
        assert_eq!(payload["zakazka"], "Z-1");
        assert_eq!(payload["produkt"], "P-1");
        assert_eq!(payload["stroj"], "X4");
        assert_eq!(payload["controlDate"], "7. 3. 2026 9:05:04");
        assert_eq!(payload["expectedWind"], "A2");
        assert_eq!(payload["compareDetail"]["note"], "ok");
        assert_eq!(payload["colorResult"], "OK");
        assert_eq!(payload["spoolNumber"], "4");
        assert_eq!(payload["barcodeData"].as_array().map(Vec::len), Some(3));
    }
}
