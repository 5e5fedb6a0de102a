//! Browser Helpers
//!
//! Dialogs, printing, the URL query string and the local Pantone report log.

use serde_json::Value;
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{Event, File, HtmlInputElement};

/// localStorage key of the Pantone results list
pub const PANTONE_REPORTS_KEY: &str = "pantoneReports";

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

pub fn print() {
    if let Some(window) = web_sys::window() {
        if let Err(err) = window.print() {
            warn!("print failed: {:?}", err);
        }
    }
}

/// `location.search` of the current page
pub fn location_search() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

/// First file picked in the `<input type="file">` that fired `ev`
pub fn picked_file(ev: &Event) -> Option<File> {
    ev.target()?
        .dyn_into::<HtmlInputElement>()
        .ok()?
        .files()?
        .get(0)
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Existing list with `entry` appended; unreadable lists start over
pub fn append_to_list(existing: Option<&str>, entry: Value) -> String {
    let mut list = existing
        .and_then(|raw| serde_json::from_str::<Value>(raw).ok())
        .and_then(|v| match v {
            Value::Array(items) => Some(items),
            _ => None,
        })
        .unwrap_or_default();
    list.push(entry);
    Value::Array(list).to_string()
}

pub fn append_pantone_report(entry: Value) {
    let Some(storage) = local_storage() else {
        warn!("localStorage unavailable, Pantone result not kept");
        return;
    };
    let existing = storage.get_item(PANTONE_REPORTS_KEY).ok().flatten();
    let updated = append_to_list(existing.as_deref(), entry);
    if let Err(err) = storage.set_item(PANTONE_REPORTS_KEY, &updated) {
        warn!("could not store Pantone result: {:?}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_append_to_list() {
        assert_eq!(append_to_list(None, json!({"a": 1})), r#"[{"a":1}]"#);
        assert_eq!(append_to_list(Some(r#"[{"a":1}]"#), json!(2)), r#"[{"a":1},2]"#);
        assert_eq!(append_to_list(Some("{oops"), json!(3)), "[3]");
        assert_eq!(append_to_list(Some(r#"{"a":1}"#), json!(4)), "[4]");
    }
}
