//! Pantone Palette
//!
//! Bundled name → hex table, fuzzy code lookup and result ratings.

use std::sync::OnceLock;

use chrono::{DateTime, Local};
use serde_json::{Map, Value};

use crate::models::PantoneResult;

const PALETTE_JSON: &str = include_str!("../assets/pantone-colors.json");

#[derive(Debug, Clone, PartialEq)]
pub struct PantoneEntry {
    /// Lowercase alphanumerics of the name
    pub key: String,
    pub name: String,
    pub hex: String,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub fn normalize_key(term: &str) -> String {
    term.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let h = hex.trim().trim_start_matches('#');
    if h.len() < 6 || !h.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&h[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Entries in file order; malformed hex values are skipped
pub fn parse_palette(json: &str) -> Result<Vec<PantoneEntry>, serde_json::Error> {
    let raw: Map<String, Value> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .filter_map(|(name, hex)| {
            let hex = hex.as_str()?.to_string();
            let (r, g, b) = hex_to_rgb(&hex)?;
            Some(PantoneEntry {
                key: normalize_key(&name),
                name,
                hex,
                r,
                g,
                b,
            })
        })
        .collect())
}

static PALETTE: OnceLock<Vec<PantoneEntry>> = OnceLock::new();

pub fn palette() -> &'static [PantoneEntry] {
    PALETTE.get_or_init(|| {
        parse_palette(PALETTE_JSON).unwrap_or_else(|err| {
            tracing::error!("Pantone palette is not valid JSON: {}", err);
            Vec::new()
        })
    })
}

/// Exact key, then prefix, then substring match
pub fn find_in<'a>(entries: &'a [PantoneEntry], term: &str) -> Option<&'a PantoneEntry> {
    let cleaned = normalize_key(term.trim());
    if cleaned.is_empty() {
        return None;
    }
    entries
        .iter()
        .find(|p| p.key == cleaned)
        .or_else(|| entries.iter().find(|p| p.key.starts_with(&cleaned)))
        .or_else(|| entries.iter().find(|p| p.key.contains(&cleaned)))
}

pub fn find_pantone(term: &str) -> Option<&'static PantoneEntry> {
    find_in(palette(), term)
}

/// Case-insensitive name filter for the palette panel
pub fn filter_in<'a>(entries: &'a [PantoneEntry], query: &str) -> Vec<&'a PantoneEntry> {
    let term = query.trim().to_lowercase();
    entries
        .iter()
        .filter(|p| term.is_empty() || p.name.to_lowercase().contains(&term))
        .collect()
}

// ========================
// Ratings
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Excellent,
    Good,
    Average,
    Poor,
    Unknown,
}

impl Rating {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("Výborné") => Rating::Excellent,
            Some("Dobre") => Rating::Good,
            Some("Priemerné") => Rating::Average,
            Some("Slabé") => Rating::Poor,
            _ => Rating::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rating::Excellent => "Výborné",
            Rating::Good => "Dobre",
            Rating::Average => "Priemerné",
            Rating::Poor => "Slabé",
            Rating::Unknown => "Neznáme",
        }
    }

    /// Badge style
    pub fn badge_style(&self) -> &'static str {
        match self {
            Rating::Excellent => "background:#22c55e;color:#fff",
            Rating::Good => "background:#facc15;color:#111827",
            Rating::Average => "background:#fb923c;color:#fff",
            Rating::Poor => "background:#ef4444;color:#fff",
            Rating::Unknown => "background:#9ca3af;color:#fff",
        }
    }

    pub fn human(&self, percent: &str) -> String {
        match self {
            Rating::Excellent => format!("Farba je takmer identická ({percent}% zhoda)"),
            Rating::Good => format!("Farba je veľmi podobná ({percent}% zhoda)"),
            Rating::Average => format!("Viditeľný rozdiel vo farbe ({percent}% zhoda)"),
            Rating::Poor => format!("Farba sa nezhoduje ({percent}% zhoda)"),
            Rating::Unknown => "Výsledok nie je možné určiť".to_string(),
        }
    }
}

/// Fixed decimals, "-" when missing
pub fn fmt_fixed(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{v:.decimals$}"))
        .unwrap_or_else(|| "-".to_string())
}

/// Plain number as the backend sent it
pub fn fmt_plain(value: Option<f64>) -> String {
    value
        .map(crate::denzita::trim_number)
        .unwrap_or_else(|| "-".to_string())
}

/// Clock text, e.g. "7. 3. 2026 09:05:04"
pub fn clock_text(now: DateTime<Local>) -> String {
    now.format("%-d. %-m. %Y %H:%M:%S").to_string()
}

/// Entry appended to the browser's `pantoneReports` list
pub fn stored_report(
    result: &PantoneResult,
    operator: &str,
    product_code: &str,
    datetime: &str,
    pantone_code: &str,
) -> Value {
    let mut map = match serde_json::to_value(result) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    map.insert("operator".into(), Value::from(operator));
    map.insert("productCode".into(), Value::from(product_code));
    map.insert("datetime".into(), Value::from(datetime));
    map.insert("pantoneCode".into(), Value::from(pantone_code));
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entries() -> Vec<PantoneEntry> {
        parse_palette(r##"{ "485 C": "#DA291C", "1485 C": "#FF8F1C", "Reflex Blue C": "#001489", "Bad": "#XYZ" }"##)
            .unwrap()
    }

    #[test]
    fn test_bundled_palette_loads() {
        assert!(palette().len() > 50);
        assert_eq!(find_pantone("485c").map(|p| p.hex.as_str()), Some("#DA291C"));
    }

    #[test]
    fn test_parse_skips_bad_hex() {
        let e = entries();
        assert_eq!(e.len(), 3);
        let red = e.iter().find(|p| p.name == "485 C").unwrap();
        assert_eq!((red.r, red.g, red.b), (0xDA, 0x29, 0x1C));
        assert_eq!(red.key, "485c");
    }

    #[test]
    fn test_lookup_order() {
        let e = entries();
        assert_eq!(find_in(&e, " 485-C ").map(|p| p.name.as_str()), Some("485 C"));
        assert_eq!(find_in(&e, "refl").map(|p| p.name.as_str()), Some("Reflex Blue C"));
        assert_eq!(find_in(&e, "blue").map(|p| p.name.as_str()), Some("Reflex Blue C"));
        assert!(find_in(&e, "---").is_none());
        assert!(find_in(&e, "999").is_none());
    }

    #[test]
    fn test_lookup_keeps_file_order() {
        let e = parse_palette(r##"{ "Zeta 1 C": "#000001", "Alpha 1 C": "#000002" }"##).unwrap();
        assert_eq!(e[0].name, "Zeta 1 C");
        assert_eq!(find_in(&e, "1c").map(|p| p.name.as_str()), Some("Zeta 1 C"));

        assert_eq!(find_pantone("yellow").map(|p| p.name.as_str()), Some("Yellow C"));
        assert_eq!(find_pantone("process").map(|p| p.name.as_str()), Some("Process Blue C"));
    }

    #[test]
    fn test_filter() {
        let e = entries();
        assert_eq!(filter_in(&e, "").len(), 3);
        assert_eq!(filter_in(&e, "485").len(), 2);
        assert_eq!(filter_in(&e, "BLUE").len(), 1);
    }

    #[test]
    fn test_rating_text() {
        let r = Rating::parse(Some("Dobre"));
        assert_eq!(r, Rating::Good);
        assert_eq!(r.human("91.5"), "Farba je veľmi podobná (91.5% zhoda)");
        assert_eq!(Rating::parse(None).label(), "Neznáme");
        assert_eq!(Rating::parse(Some("?")).human("1"), "Výsledok nie je možné určiť");
    }

    #[test]
    fn test_formatting() {
        assert_eq!(fmt_fixed(Some(1.2345), 2), "1.23");
        assert_eq!(fmt_fixed(None, 1), "-");
        assert_eq!(fmt_plain(Some(97.0)), "97");
        let at = Local.with_ymd_and_hms(2026, 3, 7, 9, 5, 4).unwrap();
        assert_eq!(clock_text(at), "7. 3. 2026 09:05:04");
    }

    #[test]
    fn test_stored_report_overrides_code() {
        let result = PantoneResult {
            pantone_code: Some("485C".to_string()),
            match_percent: Some(97.3),
            ..Default::default()
        };
        let v = stored_report(&result, "jano", "P-1", "7. 3. 2026 09:05:04", "485 C");
        assert_eq!(v["pantoneCode"], "485 C");
        assert_eq!(v["operator"], "jano");
        assert_eq!(v["matchPercent"], 97.3);
    }
}
