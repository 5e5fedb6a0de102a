//! Dashboard
//!
//! Saved reports with a type filter and a detail modal per report.

use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::api;
use crate::components::{Badge, DeleteConfirmButton};
use crate::denzita::{stored_channel_display, stored_channel_value};
use crate::models::{Channel, ScanReport};
use crate::reports::{
    filter_reports, is_oversized, label_rows, mentions_error, merge_details, pick, pick_fixed, pick_text,
    BadgeColor, LabelRow, ReportKind,
};

const FILTERS: [(Option<ReportKind>, &str, &str); 4] = [
    (None, "Všetky", "#1d4ed8"),
    (Some(ReportKind::Compare), "Porovnanie", "#1d4ed8"),
    (Some(ReportKind::Denzita), "Denzita", "#0e7490"),
    (Some(ReportKind::Pantone), "Pantone", "#be185d"),
];

#[component]
pub fn DashboardReport() -> impl IntoView {
    let reports = RwSignal::new(Vec::<ScanReport>::new());
    let filter = RwSignal::new(None::<ReportKind>);
    let loading = RwSignal::new(true);
    let selected = RwSignal::new(None::<ScanReport>);

    spawn_local(async move {
        match api::list_reports().await {
            Ok(list) => {
                info!("loaded {} reports", list.len());
                reports.set(list);
            }
            Err(err) => {
                warn!("report list unavailable: {}", err);
                reports.set(Vec::new());
            }
        }
        loading.set(false);
    });

    let on_delete = Callback::new(move |id: i64| {
        spawn_local(async move {
            if let Err(err) = api::delete_report(id).await {
                error!("delete of report {} failed: {}", id, err);
            }
            reports.update(|list| list.retain(|r| r.id != id));
            selected.set(None);
        });
    });

    let visible = move || reports.with(|list| filter_reports(list, filter.get()));

    let filter_buttons = FILTERS
        .iter()
        .map(|&(kind, label, active)| {
            view! {
                <button
                    style=move || format!(
                        "padding:8px 20px;border-radius:12px;font-weight:600;color:#fff;box-shadow:0 1px 3px rgba(0,0,0,0.2);background:{}",
                        if filter.get() == kind { active } else { "rgba(255,255,255,0.2)" },
                    )
                    on:click=move |_| filter.set(kind)
                >
                    {label}
                </button>
            }
        })
        .collect_view();

    let th = "padding:12px 16px;text-align:left;font-size:12px;font-weight:700;color:#6b7280;text-transform:uppercase";

    view! {
        <div style="width:100%;max-width:1024px;margin:0 auto;display:flex;flex-direction:column;align-items:center;padding:40px 12px">
            <h1 style="font-size:36px;font-weight:700;color:#fff;margin-bottom:40px;text-shadow:0 2px 8px rgba(0,0,0,0.4)">
                "Reporty zo Scancontroll"
            </h1>
            <div style="display:flex;gap:16px;margin-bottom:32px">{filter_buttons}</div>
            <div style="width:100%;max-width:768px;background:rgba(255,255,255,0.85);border-radius:12px;box-shadow:0 4px 12px rgba(0,0,0,0.15);overflow-x:auto">
                {move || {
                    if loading.get() {
                        return view! { <div style="text-align:center;color:#9ca3af;padding:32px 0;font-size:18px">"Načítava sa..."</div> }.into_any();
                    }
                    let rows = visible();
                    if rows.is_empty() {
                        return view! { <div style="text-align:center;color:#6b7280;padding:32px 0;font-size:18px">"Žiadne záznamy"</div> }.into_any();
                    }
                    view! {
                        <table style="min-width:100%;border-collapse:collapse">
                            <thead>
                                <tr>
                                    <th style=th>"Dátum"</th>
                                    <th style=th>"Produktové číslo"</th>
                                    <th style=th>"Operátor"</th>
                                    <th style="padding:12px 16px"></th>
                                </tr>
                            </thead>
                            <tbody>
                                {rows
                                    .into_iter()
                                    .map(|r| {
                                        let row = r.clone();
                                        view! {
                                            <tr style="cursor:pointer;border-top:1px solid #e5e7eb" on:click=move |_| selected.set(Some(row.clone()))>
                                                <td style="padding:12px 16px;white-space:nowrap;color:#1f2937;font-family:monospace">
                                                    {r.datetime.clone().unwrap_or_default()}
                                                </td>
                                                <td style="padding:12px 16px;white-space:nowrap;color:#1e3a8a;font-weight:600">
                                                    {r.product_code.clone().unwrap_or_default()}
                                                </td>
                                                <td style="padding:12px 16px;white-space:nowrap">{r.operator.clone().unwrap_or_default()}</td>
                                                <td style="padding:12px 16px;text-align:right">
                                                    <span style="color:#3b82f6;font-size:12px">"Detail"</span>
                                                </td>
                                            </tr>
                                        }
                                    })
                                    .collect_view()}
                            </tbody>
                        </table>
                    }
                        .into_any()
                }}
            </div>
        </div>

        {move || selected.get().map(|report| view! {
            <div style="position:fixed;inset:0;z-index:50;display:flex;align-items:center;justify-content:center;background:rgba(0,0,0,0.6)">
                <div style="background:#fff;border-radius:16px;box-shadow:0 20px 40px rgba(0,0,0,0.3);width:100%;max-width:1024px;position:relative;display:flex;flex-direction:column;max-height:96vh;min-height:300px">
                    <button
                        title="Zavrieť"
                        style="position:absolute;top:24px;right:32px;color:#6b7280;font-size:28px;font-weight:700;background:#fff;border-radius:100%;width:44px;height:44px;display:flex;align-items:center;justify-content:center;box-shadow:0 1px 6px #0001"
                        on:click=move |_| selected.set(None)
                    >
                        "✕"
                    </button>
                    <div style="overflow-y:auto;padding:40px;max-height:90vh">
                        <DetailCard report=report on_delete=on_delete />
                    </div>
                </div>
            </div>
        })}
    }
}

// ========================
// Detail cards
// ========================

/// Detail value, else the row field, else `fallback`
fn field(detail: &Map<String, Value>, key: &str, row: Option<&String>, fallback: &str) -> String {
    match pick(detail, &[key]) {
        Some(_) => pick_text(detail, &[key], fallback),
        None => row.cloned().unwrap_or_else(|| fallback.to_string()),
    }
}

fn delete_button(id: i64, on_delete: Callback<i64>) -> impl IntoView {
    view! {
        <div style="display:flex;gap:16px;margin-top:16px">
            <DeleteConfirmButton
                prompt="Naozaj chceš vymazať tento report?"
                on_confirm=move |_| on_delete.run(id)
            />
        </div>
    }
}

#[component]
fn DetailCard(report: ScanReport, on_delete: Callback<i64>) -> impl IntoView {
    if is_oversized(&report) {
        return view! {
            <div style="color:#b91c1c;font-size:18px;font-weight:700;padding:24px">
                "Tento report je príliš veľký (> 20MB) a nemožno ho zobraziť v dashboarde."
                <br />
                "Skontrolujte výstup na serveri alebo stiahnite súbor ručne."
            </div>
        }
        .into_any();
    }
    let detail = merge_details(&report);
    match ReportKind::of(report.report_type.as_deref()) {
        ReportKind::Compare => compare_card(&report, &detail, on_delete).into_any(),
        ReportKind::Denzita => denzita_card(&report, &detail, on_delete).into_any(),
        ReportKind::Pantone => pantone_card(&report, &detail, on_delete).into_any(),
        ReportKind::Other => view! {
            <div style="color:#6b7280;padding:16px">
                <h2 style="font-size:20px;font-weight:700;margin-bottom:8px">"Detail reportu"</h2>
                <p><b>"ID: "</b>{report.id}</p>
                <p><b>"Typ: "</b>{report.report_type.clone().unwrap_or_default()}</p>
                <p><b>"Dátum: "</b>{report.datetime.clone().unwrap_or_default()}</p>
            </div>
        }
        .into_any(),
    }
}

fn identity_line(label: &'static str, value: String) -> impl IntoView {
    view! {
        <span>{label}": "<span style="font-weight:700;color:#111827">{value}</span></span>
    }
}

fn compare_card(report: &ScanReport, detail: &Map<String, Value>, on_delete: Callback<i64>) -> impl IntoView {
    let wind = pick_text(detail, &["windResult"], "-");
    let detected = pick_text(detail, &["detectedWind"], "-");
    let barcode = pick_text(detail, &["barcodeResult"], "-");
    let ocr = pick_text(detail, &["ocrResult"], "-");
    let color = pick_text(detail, &["colorResult"], "-");
    let note = pick_text(detail, &["note"], "");

    let wind_badge = match wind.as_str() {
        "-" => (BadgeColor::Gray, "-".to_string()),
        w => {
            let c = if w == "OK" { BadgeColor::Green } else { BadgeColor::Red };
            let suffix = if detected == "-" { String::new() } else { format!(" ({detected})") };
            (c, format!("{w}{suffix}"))
        }
    };
    let verdict = |failed: bool, fail_color: BadgeColor| {
        if failed {
            view! { <Badge style=fail_color.style() text="Chyba" /> }
        } else {
            view! { <Badge style=BadgeColor::Green.style() text="OK" /> }
        }
    };

    view! {
        <div style="display:flex;flex-direction:column;gap:16px;width:100%;font-size:17px">
            <div style="display:flex;align-items:center;gap:12px;margin-bottom:8px">
                <h2 style="font-size:24px;font-weight:700;color:#1e3a8a">"Výsledok kontroly etikiet"</h2>
                <span style="color:#6b7280;margin-left:auto;font-family:monospace">
                    {report.datetime.clone().unwrap_or_default()}
                </span>
            </div>
            <div style="display:flex;flex-wrap:wrap;gap:32px;font-weight:600">
                {identity_line("Operátor", field(detail, "operator", report.operator.as_ref(), "-"))}
                {identity_line("Produkt", field(detail, "productCode", report.product_code.as_ref(), "-"))}
                {identity_line("Zakázka", pick_text(detail, &["jobNumber"], "-"))}
                {identity_line("Stroj", pick_text(detail, &["machine"], "-"))}
                {identity_line("Kotúč", pick_text(detail, &["spoolNumber"], "-"))}
            </div>
            <hr style="border-color:#e5e7eb" />
            <div style="display:grid;grid-template-columns:repeat(3, minmax(0, 1fr));gap:16px;font-size:18px">
                <div><b>"NAVIN: "</b><Badge style=wind_badge.0.style() text=wind_badge.1 /></div>
                <div><b>"Čiarový kód: "</b>{verdict(mentions_error(&barcode), BadgeColor::Red)}</div>
                <div><b>"Text: "</b>{verdict(mentions_error(&ocr), BadgeColor::Red)}</div>
            </div>
            <div style="font-size:18px">
                <b>"Farebnosť: "</b>{verdict(color != "OK", BadgeColor::Yellow)}
            </div>
            <div style="font-size:14px;color:#6b7280">{format!("Detegovaný navin: {detected}")}</div>
            {(!note.is_empty()).then(|| view! {
                <div style="color:#1f2937;font-style:italic;background:#eff6ff;padding:8px;border-radius:12px">
                    <span style="font-weight:600">"Poznámka: "</span>{note}
                </div>
            })}
            <div>
                <div style="font-weight:700;margin-bottom:8px;font-size:18px;color:#1e40af">"Výsledky jednotlivých etikiet:"</div>
                <div style="display:flex;flex-direction:column;gap:4px">
                    {label_rows(detail).into_iter().map(label_row).collect_view()}
                </div>
            </div>
            {delete_button(report.id, on_delete)}
        </div>
    }
}

fn label_row(row: LabelRow) -> impl IntoView {
    let background = if row.has_error() { "#fff7f7" } else { "#f6fefb" };
    let status = |err: Option<String>, color: &'static str| match err {
        Some(e) => view! { <span style=format!("color:{color};font-weight:600")>{e}</span> }.into_any(),
        None => view! { <span style="color:#15803d;font-weight:600">"OK"</span> }.into_any(),
    };
    view! {
        <div style=format!("padding:8px 8px 12px;border-bottom:1px solid #e5e7eb;background:{background}")>
            <div style="font-weight:600;margin-bottom:4px">{format!("Etiketa č.{}", row.index)}</div>
            <div><b>"Čiarový kód: "</b>{status(row.barcode_error, "#b91c1c")}</div>
            <div><b>"Text: "</b>{status(row.ocr_error, "#b91c1c")}</div>
            <div>
                <b>"Farebnosť: "</b>{status(row.color_error, "#ca8a04")}
                {row.color_values.map(|v| view! { <span style="margin-left:8px;font-size:12px;color:#1d4ed8">{v}</span> })}
            </div>
        </div>
    }
}

fn denzita_card(report: &ScanReport, detail: &Map<String, Value>, on_delete: Callback<i64>) -> impl IntoView {
    let channels = Channel::ALL
        .iter()
        .map(|&ch| {
            let (text, advice) = stored_channel_display(stored_channel_value(detail, ch));
            view! {
                <div style="display:flex;align-items:center;margin-bottom:4px;font-size:18px">
                    <div
                        style=format!("width:28px;height:28px;border-radius:4px;margin-right:16px;border:2px solid #d1d5db;background:{}", ch.css_color())
                        title=ch.name()
                    ></div>
                    <span style="font-weight:600;margin-right:12px">{ch.name()}</span>
                    <span style="color:#374151;margin-right:8px">{text}</span>
                    {advice.map(|a| view! {
                        <span style=format!("font-weight:700;margin-left:8px;color:{}", a.color(ch))>{a.label()}</span>
                    })}
                </div>
            }
        })
        .collect_view();
    let summary = pick_text(detail, &["summary"], "");

    view! {
        <div style="display:flex;flex-direction:column;gap:12px;width:100%">
            <h2 style="font-size:24px;font-weight:700;margin-bottom:8px;color:#164e63">"Výsledky CMYK"</h2>
            <div style="display:flex;flex-wrap:wrap;gap:24px;font-weight:600">
                {identity_line("Operátor", field(detail, "operator", report.operator.as_ref(), "-"))}
                {identity_line("Produkt", field(detail, "productCode", report.product_code.as_ref(), "-"))}
                <span style="color:#6b7280;margin-left:auto">{report.datetime.clone().unwrap_or_default()}</span>
            </div>
            <hr />
            {channels}
            {(!summary.is_empty()).then(|| view! { <div style="font-size:12px;color:#6b7280;margin-top:8px">{summary}</div> })}
            {delete_button(report.id, on_delete)}
        </div>
    }
}

fn pantone_card(report: &ScanReport, detail: &Map<String, Value>, on_delete: Callback<i64>) -> impl IntoView {
    let hex = pick_text(detail, &["pantoneHex"], "-");
    let swatch = if hex == "-" { "#eee".to_string() } else { hex.clone() };
    let percent = match pick_fixed(detail, &["matchPercent"], 1).as_str() {
        "-" => "-".to_string(),
        p => format!("{p}%"),
    };
    let original = [
        pick_text(detail, &["refR", "rgbRef"], "-"),
        pick_text(detail, &["refG"], "-"),
        pick_text(detail, &["refB"], "-"),
    ]
    .join(", ");
    let sample = ["sampleR", "sampleG", "sampleB"]
        .map(|k| pick_text(detail, &[k], "-"))
        .join(", ");

    view! {
        <div style="display:flex;flex-direction:column;gap:12px;width:100%">
            <h2 style="font-size:24px;font-weight:700;margin-bottom:8px;color:#831843">"Porovnanie Pantone"</h2>
            <div style="display:flex;flex-wrap:wrap;gap:24px;font-weight:600">
                {identity_line("Operátor", field(detail, "operator", report.operator.as_ref(), "-"))}
                {identity_line("Produkt", field(detail, "productCode", report.product_code.as_ref(), "-"))}
                <span style="color:#6b7280;margin-left:auto">{report.datetime.clone().unwrap_or_default()}</span>
            </div>
            <hr />
            <div style="display:flex;flex-direction:column;gap:8px">
                <div>
                    <b>"Pantone: "</b>{pick_text(detail, &["pantoneCode", "pantone"], "-")}
                    <span style=format!("background:{swatch};border:1px solid #ccc;padding:0 10px;border-radius:6px;margin-left:8px;color:#222")>
                        {hex}
                    </span>
                </div>
                <div><b>"Originál RGB: "</b>{original}</div>
                <div><b>"Sken RGB: "</b>{sample}</div>
                <div><b>"ΔE2000: "</b>{pick_fixed(detail, &["deltaE2000", "de2000"], 2)}</div>
                <div><b>"ΔE76: "</b>{pick_fixed(detail, &["deltaE76", "de76"], 2)}</div>
                <div><b>"% zhody: "</b>{percent}</div>
                <div><b>"Vyhodnotenie: "</b>{pick_text(detail, &["rating"], "-")}</div>
            </div>
            {delete_button(report.id, on_delete)}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_falls_back_to_row() {
        let detail = json!({ "operator": null, "productCode": "P-9" });
        let detail = detail.as_object().unwrap();
        let row_operator = "jano".to_string();
        assert_eq!(field(detail, "operator", Some(&row_operator), "-"), "jano");
        assert_eq!(field(detail, "productCode", None, "-"), "P-9");
        assert_eq!(field(detail, "machine", None, "-"), "-");
    }
}
