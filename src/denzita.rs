//! Density (Denzita) Evaluation
//!
//! Ink advice derived from the relative density difference per channel.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::config::DENSITY_THRESHOLD;
use crate::models::{value_as_f64, Channel, DenzitaChannel, DenzitaReportPayload};

/// Result of `POST /api/denzita-compare`, keyed by channel name
pub type DenzitaResult = HashMap<String, DenzitaChannel>;

/// Channel objects of a density response; other keys are ignored
pub fn parse_result(value: Value) -> DenzitaResult {
    let Value::Object(map) = value else {
        return DenzitaResult::new();
    };
    map.into_iter()
        .filter(|(_, v)| v.is_object())
        .filter_map(|(k, v)| serde_json::from_value::<DenzitaChannel>(v).ok().map(|c| (k, c)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DensityAdvice {
    Ok,
    /// Add ink, value is |Δ| in percent
    Add(f64),
    /// Remove ink, value is |Δ| in percent
    Remove(f64),
}

impl DensityAdvice {
    /// |Δ| at or above the threshold needs a correction
    pub fn evaluate(delta: f64) -> Self {
        if delta.abs() >= DENSITY_THRESHOLD {
            if delta > 0.0 {
                DensityAdvice::Add(delta.abs())
            } else {
                DensityAdvice::Remove(delta.abs())
            }
        } else {
            DensityAdvice::Ok
        }
    }

    pub fn label(&self) -> String {
        match self {
            DensityAdvice::Ok => "OK".to_string(),
            DensityAdvice::Add(v) => format!("Pridať {}%", trim_number(*v)),
            DensityAdvice::Remove(v) => format!("Ubrať {}%", trim_number(*v)),
        }
    }

    /// Text colour; additions use the channel swatch
    pub fn color(&self, channel: Channel) -> &'static str {
        match self {
            DensityAdvice::Ok => "#15803d",
            DensityAdvice::Add(_) => channel.css_color(),
            DensityAdvice::Remove(_) => "#be185d",
        }
    }
}

/// Number without a trailing ".0"
pub fn trim_number(v: f64) -> String {
    let s = format!("{v}");
    s.strip_suffix(".0").map(str::to_string).unwrap_or(s)
}

/// "etiketa% / master%" when both readings are known
pub fn channel_tooltip(reading: &DenzitaChannel) -> String {
    match (reading.etiketa, reading.master) {
        (Some(e), Some(m)) => format!("{}% / {}%", trim_number(e), trim_number(m)),
        _ => String::new(),
    }
}

pub fn report_payload(operator: &str, product: &str, date: &str, time: &str, result: &DenzitaResult) -> DenzitaReportPayload {
    let delta = |channel: Channel| result.get(channel.key()).and_then(|c| c.rel_rozdiel);
    DenzitaReportPayload {
        operator: operator.to_string(),
        product_code: product.to_string(),
        datetime: format!("{date} {time}"),
        cyan: delta(Channel::Cyan),
        magenta: delta(Channel::Magenta),
        yellow: delta(Channel::Yellow),
        black: delta(Channel::Black),
        summary: "OK".to_string(),
        report_type: "DENZITA".to_string(),
    }
}

/// Stored value for a channel: `c`, `cyan`, `C`, `CYAN` (first non-null wins)
pub fn stored_channel_value(detail: &Map<String, Value>, channel: Channel) -> Option<&Value> {
    let key = channel.key();
    let short = &key[..1];
    [short.to_string(), key.to_string(), short.to_uppercase(), key.to_uppercase()]
        .iter()
        .filter_map(|k| detail.get(k))
        .find(|v| !v.is_null())
}

/// Dashboard rendering of a stored channel value: the text and the advice
/// when it is numeric
pub fn stored_channel_display(value: Option<&Value>) -> (String, Option<DensityAdvice>) {
    match value {
        None => ("-".to_string(), None),
        Some(Value::String(s)) if s.is_empty() => ("-".to_string(), None),
        Some(v) => match value_as_f64(v) {
            Some(n) => (format!("{n:.2}%"), Some(DensityAdvice::evaluate(n))),
            None => (v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()), None),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_advice_threshold() {
        assert_eq!(DensityAdvice::evaluate(6.99), DensityAdvice::Ok);
        assert_eq!(DensityAdvice::evaluate(7.0), DensityAdvice::Add(7.0));
        assert_eq!(DensityAdvice::evaluate(-8.5), DensityAdvice::Remove(8.5));
        assert_eq!(DensityAdvice::evaluate(-8.5).label(), "Ubrať 8.5%");
        assert_eq!(DensityAdvice::evaluate(12.0).label(), "Pridať 12%");
    }

    #[test]
    fn test_tooltip() {
        let reading = DenzitaChannel { rel_rozdiel: Some(1.0), etiketa: Some(41.5), master: Some(40.0) };
        assert_eq!(channel_tooltip(&reading), "41.5% / 40%");
        assert_eq!(channel_tooltip(&DenzitaChannel::default()), "");
    }

    #[test]
    fn test_payload() {
        let result = parse_result(json!({
            "cyan": { "rel_rozdiel": 3.2 },
            "black": { "rel_rozdiel": -9, "etiketa": 80, "master": 88 },
            "note": "ok"
        }));
        assert_eq!(result.len(), 2);
        let payload = serde_json::to_value(report_payload("jano", "P-5", "2026-03-07", "09:05", &result)).unwrap();
        assert_eq!(payload["datetime"], "2026-03-07 09:05");
        assert_eq!(payload["productCode"], "P-5");
        assert_eq!(payload["cyan"], json!(3.2));
        assert_eq!(payload["magenta"], Value::Null);
        assert_eq!(payload["black"], json!(-9.0));
        assert_eq!(payload["reportType"], "DENZITA");
    }

    #[test]
    fn test_stored_channel_lookup() {
        let detail = json!({ "c": null, "cyan": "8.456", "M": -2, "yellow": "n/a" });
        let detail = detail.as_object().unwrap();
        let cyan = stored_channel_value(detail, Channel::Cyan);
        assert_eq!(cyan, Some(&json!("8.456")));
        let (text, advice) = stored_channel_display(cyan);
        assert_eq!(text, "8.46%");
        assert_eq!(advice, Some(DensityAdvice::Add(8.456)));
        assert_eq!(stored_channel_display(stored_channel_value(detail, Channel::Magenta)).1, Some(DensityAdvice::Ok));
        assert_eq!(stored_channel_display(stored_channel_value(detail, Channel::Yellow)), ("n/a".to_string(), None));
        assert_eq!(stored_channel_display(stored_channel_value(detail, Channel::Black)).0, "-");
    }
}
