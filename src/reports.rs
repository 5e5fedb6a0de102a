//! Dashboard Report Helpers
//!
//! Filtering saved reports and merging their `detailsJson` into one view.

use serde_json::{Map, Value};

use crate::config::MAX_DETAIL_SIZE;
use crate::models::{value_as_f64, ScanReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Compare,
    Denzita,
    Pantone,
    Other,
}

impl ReportKind {
    pub fn of(report_type: Option<&str>) -> Self {
        match report_type.unwrap_or_default().to_uppercase().as_str() {
            "COMPARE" => ReportKind::Compare,
            "DENZITA" => ReportKind::Denzita,
            "PANTONE" => ReportKind::Pantone,
            _ => ReportKind::Other,
        }
    }
}

/// Dashboard type filter; `None` shows everything
pub fn filter_reports(reports: &[ScanReport], kind: Option<ReportKind>) -> Vec<ScanReport> {
    reports
        .iter()
        .filter(|r| kind.map_or(true, |k| ReportKind::of(r.report_type.as_deref()) == k))
        .cloned()
        .collect()
}

pub fn is_oversized(report: &ScanReport) -> bool {
    report.file_size.is_some_and(|size| size > MAX_DETAIL_SIZE as f64)
}

/// Report fields with `detailsJson` laid over them when it parses to an object
pub fn merge_details(report: &ScanReport) -> Map<String, Value> {
    let mut merged = match serde_json::to_value(report) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    let parsed = report
        .details_json
        .as_deref()
        .and_then(|raw| serde_json::from_str::<Value>(raw).ok());
    if let Some(Value::Object(details)) = parsed {
        merged.extend(details);
    }
    merged
}

/// First non-null value among `keys`
pub fn pick<'a>(detail: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|k| detail.get(*k)).find(|v| !v.is_null())
}

/// Display text of a JSON value
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// First non-null value among `keys` as text, else `fallback`
pub fn pick_text(detail: &Map<String, Value>, keys: &[&str], fallback: &str) -> String {
    pick(detail, keys)
        .map(display_value)
        .unwrap_or_else(|| fallback.to_string())
}

/// Numeric field with fixed decimals, "-" when missing or not numeric
pub fn pick_fixed(detail: &Map<String, Value>, keys: &[&str], decimals: usize) -> String {
    pick(detail, keys)
        .and_then(value_as_f64)
        .map(|v| format!("{v:.decimals$}"))
        .unwrap_or_else(|| "-".to_string())
}

/// Badge colour for a result string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeColor {
    Green,
    Red,
    Yellow,
    Gray,
}

impl BadgeColor {
    pub fn style(&self) -> &'static str {
        match self {
            BadgeColor::Green => "background:#dcfce7;color:#15803d",
            BadgeColor::Red => "background:#fee2e2;color:#b91c1c",
            BadgeColor::Yellow => "background:#fef9c3;color:#a16207",
            BadgeColor::Gray => "background:#e5e7eb;color:#1f2937",
        }
    }
}

/// Results mentioning "chyba" (any case) are failures
pub fn mentions_error(result: &str) -> bool {
    result.to_lowercase().contains("chyba")
}

/// Per-label row of a stored compare report
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRow {
    pub index: String,
    pub barcode_error: Option<String>,
    pub ocr_error: Option<String>,
    pub color_error: Option<String>,
    pub color_values: Option<String>,
}

impl LabelRow {
    pub fn has_error(&self) -> bool {
        self.barcode_error.is_some() || self.ocr_error.is_some() || self.color_error.is_some()
    }
}

fn truthy_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        other => Some(display_value(other)),
    }
}

/// `etikety` rows: ΔE when present, else the channel values with two decimals
pub fn label_rows(detail: &Map<String, Value>) -> Vec<LabelRow> {
    let Some(Value::Array(items)) = detail.get("etikety") else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_object)
        .map(|e| {
            let color_values = match (pick(e, &["colorDiff"]), e.get("colorValues")) {
                (Some(diff), _) => Some(format!("ΔE: {}", display_value(diff))),
                (None, Some(Value::Object(values))) => Some(
                    values
                        .iter()
                        .map(|(ch, v)| {
                            let num = value_as_f64(v).map(|n| format!("{n:.2}")).unwrap_or_else(|| "NaN".into());
                            format!("{}: {}", ch.to_uppercase(), num)
                        })
                        .collect::<Vec<_>>()
                        .join(" | "),
                ),
                _ => None,
            };
            LabelRow {
                index: e.get("index").map(display_value).unwrap_or_default(),
                barcode_error: truthy_text(e.get("barcodeError")),
                ocr_error: truthy_text(e.get("ocrError")),
                color_error: truthy_text(e.get("colorError")),
                color_values,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report(value: Value) -> ScanReport {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_filter_case_insensitive() {
        let reports = vec![
            report(json!({ "id": 1, "reportType": "compare" })),
            report(json!({ "id": 2, "reportType": "DENZITA" })),
            report(json!({ "id": 3 })),
        ];
        assert_eq!(filter_reports(&reports, None).len(), 3);
        let compare = filter_reports(&reports, Some(ReportKind::Compare));
        assert_eq!(compare.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1]);
        assert_eq!(ReportKind::of(None), ReportKind::Other);
    }

    #[test]
    fn test_merge_details_overrides() {
        let r = report(json!({
            "id": 7, "reportType": "COMPARE", "operator": "jano", "productCode": "P-1",
            "windResult": "OK",
            "detailsJson": "{\"windResult\":\"CHYBA\",\"spoolNumber\":\"3\",\"operator\":null}"
        }));
        let d = merge_details(&r);
        assert_eq!(pick_text(&d, &["windResult"], "-"), "CHYBA");
        assert_eq!(pick_text(&d, &["spoolNumber"], "-"), "3");
        // a null in details hides the report value; cards fall back to the row field
        assert_eq!(pick(&d, &["operator"]), None);
        assert_eq!(pick_text(&d, &["jobNumber", "zakazka"], "-"), "-");
    }

    #[test]
    fn test_merge_ignores_non_object_details() {
        let r = report(json!({ "id": 1, "operator": "eva", "detailsJson": "[1,2]" }));
        assert_eq!(pick_text(&merge_details(&r), &["operator"], "-"), "eva");
        let r = report(json!({ "id": 1, "operator": "eva", "detailsJson": "{broken" }));
        assert_eq!(pick_text(&merge_details(&r), &["operator"], "-"), "eva");
    }

    #[test]
    fn test_oversized() {
        assert!(is_oversized(&report(json!({ "id": 1, "fileSize": 20_971_521 }))));
        assert!(!is_oversized(&report(json!({ "id": 1, "fileSize": 20_971_520 }))));
        assert!(!is_oversized(&report(json!({ "id": 1 }))));
    }

    #[test]
    fn test_pick_fixed() {
        let d = json!({ "deltaE2000": "1.236", "de76": 3, "matchPercent": null });
        let d = d.as_object().unwrap();
        assert_eq!(pick_fixed(d, &["deltaE2000", "de2000"], 2), "1.24");
        assert_eq!(pick_fixed(d, &["deltaE76", "de76"], 2), "3.00");
        assert_eq!(pick_fixed(d, &["matchPercent"], 1), "-");
    }

    #[test]
    fn test_label_rows() {
        let d = json!({ "etikety": [
            { "index": 1, "barcodeError": "EAN", "colorDiff": 2.1 },
            { "index": 2, "ocrError": "", "colorValues": { "c": "41.256", "k": 9 } }
        ]});
        let rows = label_rows(d.as_object().unwrap());
        assert_eq!(rows.len(), 2);
        assert!(rows[0].has_error());
        assert_eq!(rows[0].color_values.as_deref(), Some("ΔE: 2.1"));
        assert!(!rows[1].has_error());
        assert_eq!(rows[1].color_values.as_deref(), Some("C: 41.26 | K: 9.00"));
    }

    #[test]
    fn test_mentions_error() {
        assert!(mentions_error("Chyba v etikete č.1"));
        assert!(!mentions_error("OK"));
    }
}
