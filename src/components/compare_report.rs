//! Compare Report Page
//!
//! Verdict summary, job header, per-label badges, operator note and the CMYK
//! table of a finished comparison; saves the report or prints it.

use chrono::Local;
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::{error, info};

use crate::api::{self, ApiError};
use crate::browser;
use crate::config::DIFF_LIMIT;
use crate::context::{use_app_context, Page};
use crate::job::sk_timestamp;
use crate::models::{Channel, ColorItem, CompareResponse, CroppedLabel};
use crate::verdict::{
    diff_within_limit, fmt_one, missing_for_save, missing_message, query_param, safe_value,
    text_badge, ColorVerdict, CompareReportPayload, ReportDraft, ReportHeader, Verdict,
};

const OK_COLOR: &str = "color:#15803d";
const ERR_COLOR: &str = "color:#dc2626";

#[component]
pub fn CompareReport() -> impl IntoView {
    let ctx = use_app_context();
    // without a draft the identifiers fall back to the URL query
    let draft = ctx.draft.get_untracked().unwrap_or_default();

    let search = browser::location_search();
    let header = ReportHeader {
        job_number: safe_value(
            Some(&draft.job_number),
            None,
            query_param(&search, "jobNumber").as_deref(),
        ),
        product_code: safe_value(
            Some(&draft.product_number),
            Some(&draft.product),
            query_param(&search, "productNumber").as_deref(),
        ),
        machine: safe_value(Some(&draft.machine), None, None),
        datetime: sk_timestamp(Local::now()),
    };
    let verdict = Verdict::evaluate(&draft.result, &draft.cropped_labels);
    let can_save = missing_for_save(&header.product_code, &header.job_number).is_empty();

    let (note, set_note) = signal(String::new());
    let (missing, set_missing) = signal(Vec::<&'static str>::new());
    let (saving, set_saving) = signal(false);

    let save_draft = draft.clone();
    let save_header = header.clone();
    let save_verdict = verdict.clone();
    let on_save = move |_| {
        let missing_now = missing_for_save(&save_header.product_code, &save_header.job_number);
        set_missing.set(missing_now.clone());
        if !missing_now.is_empty() {
            return;
        }
        let payload = CompareReportPayload::build(&save_draft, &save_header, &save_verdict, &note.get_untracked());
        set_saving.set(true);
        spawn_local(async move {
            match api::save_report(&payload).await {
                Ok(saved) => {
                    info!("compare report saved");
                    browser::alert(&format!("Report uložený!\n{}", saved.txt.unwrap_or_default()));
                    ctx.navigate(Page::Dashboard);
                }
                Err(ApiError::Server(msg)) => {
                    error!("report save refused: {}", msg);
                    browser::alert(&format!("Chyba pri ukladaní reportu: {msg}"));
                }
                Err(err) => {
                    error!("report save failed: {}", err);
                    browser::alert(&format!("Chyba pri ukladaní reportu: {err}"));
                }
            }
            set_saving.set(false);
        });
    };

    let result = draft.result.clone();
    let labels = draft.cropped_labels.clone();

    view! {
        <div style="display:flex;flex-wrap:wrap;width:100%;max-width:1440px;margin:0 auto;padding:32px 24px;gap:32px">
            <SummaryPanel draft=draft.clone() verdict=verdict.clone() missing=missing />
            <div style="flex:1;display:flex;flex-direction:column;align-items:flex-end">
                <div style="background:rgba(255,255,255,0.9);border-radius:12px;padding:28px;box-shadow:0 4px 12px rgba(0,0,0,0.1);max-width:576px;width:100%;border:1px solid #d1d5db">
                    <div style="font-weight:700;font-size:24px;margin-bottom:12px">"Výsledky kontroly etikiet"</div>
                    <div style="font-size:18px;color:#1f2937">
                        <div>"Meno operátora: "<b>{if draft.operator.is_empty() { "-".to_string() } else { draft.operator.clone() }}</b></div>
                        <div>"Číslo zákazky: "<b style=missing_style(&header.job_number)>{header.job_number.clone()}</b></div>
                        <div>"Číslo produktu: "<b style=missing_style(&header.product_code)>{header.product_code.clone()}</b></div>
                        <div>"Stroj: "<b>{header.machine.clone()}</b></div>
                        <div>"Číslo kotúča: "<b>{if draft.spool_number.is_empty() { "-".to_string() } else { draft.spool_number.clone() }}</b></div>
                        <div>"Dátum a čas kontroly: "<b>{header.datetime.clone()}</b></div>
                    </div>
                </div>
            </div>
        </div>

        <div style="margin-top:24px;padding:0 24px 80px;display:grid;grid-template-columns:repeat(auto-fill, minmax(260px, 1fr));column-gap:48px;row-gap:64px;max-width:1440px;margin-left:auto;margin-right:auto">
            {labels
                .into_iter()
                .enumerate()
                .map(|(i, label)| label_card(i as u32 + 1, label, &result))
                .collect_view()}
        </div>

        <div style="max-width:896px;width:100%;margin:40px auto;padding:0 16px">
            <label style="display:block;margin-bottom:8px;font-weight:600;font-size:20px;color:#1f2937">
                "Poznámka operátora:"
            </label>
            <textarea
                style="width:100%;min-height:80px;max-height:300px;border:1px solid #9ca3af;border-radius:12px;padding:16px;font-size:18px"
                placeholder="Sem môže operátor napísať poznámku k výsledku kontroly..."
                prop:value=move || note.get()
                on:input=move |ev| set_note.set(event_target_value(&ev))
            ></textarea>
        </div>

        <ColorTable items=draft.result.color_data.clone() />

        <div class="print-hidden" style="display:flex;gap:32px;margin:48px 0 96px;justify-content:center">
            <button
                style="background:#16a34a;color:#fff;font-size:18px;padding:16px 40px;border-radius:12px;font-weight:600"
                disabled=move || !can_save || saving.get()
                on:click=on_save
            >
                "Uložiť Report"
            </button>
            <button
                style="background:#1d4ed8;color:#fff;font-size:18px;padding:16px 40px;border-radius:12px;font-weight:600"
                on:click=move |_| browser::print()
            >
                "Vytlačiť ako PDF"
            </button>
        </div>
    }
}

fn missing_style(value: &str) -> &'static str {
    if value == "-" { ERR_COLOR } else { "" }
}

#[component]
fn SummaryPanel(draft: ReportDraft, verdict: Verdict, missing: ReadSignal<Vec<&'static str>>) -> impl IntoView {
    let result = &draft.result;
    let detected = result.detected_wind.clone().filter(|w| !w.is_empty());
    let expected = draft.expected_wind();

    let wind_line = if verdict.wind_ok {
        let shown = detected.clone().unwrap_or_else(|| expected.clone());
        view! { <span style=OK_COLOR>{format!("{shown} – OK")}</span> }.into_any()
    } else {
        let detail = result.wind_detail.clone().filter(|d| !d.is_empty());
        view! {
            <span style=ERR_COLOR>
                "chyba (detegovaný: "<b>{detected.clone().unwrap_or_else(|| "-".to_string())}</b>
                {(!expected.is_empty()).then(|| view! { " , očakávaný: "<b>{expected.clone()}</b> })}
                ")"
                {detail.map(|d| view! { <div style="font-size:12px;color:#6b7280;margin-top:4px">{d}</div> })}
            </span>
        }
        .into_any()
    };

    let status = |ok: bool, fail: String| {
        if ok {
            view! { <span style=OK_COLOR>"OK"</span> }.into_any()
        } else {
            view! { <span style=ERR_COLOR>{fail}</span> }.into_any()
        }
    };

    let color = match verdict.color {
        ColorVerdict::Ok => view! { <span style=OK_COLOR>"OK"</span> }.into_any(),
        ColorVerdict::Error => view! { <span style=ERR_COLOR>"Chyba"</span> }.into_any(),
        ColorVerdict::NoData => view! { <span style="color:#6b7280">"–"</span> }.into_any(),
    };

    view! {
        <div style="display:flex;flex-direction:column;gap:12px;min-width:400px;max-width:600px;background:rgba(255,255,255,0.95);padding:32px;border-radius:16px;box-shadow:0 4px 12px rgba(0,0,0,0.1);border:1px solid #e5e7eb">
            <h1 style="font-weight:700;font-size:30px;margin:8px 0 20px">"Výsledky porovnania etikiet"</h1>
            <div style="font-size:18px"><b>"NAVIN:"</b>" "{wind_line}</div>
            <div style="font-size:18px">
                <b>"Čiarový kód:"</b>" "
                {status(verdict.barcode_ok(), format!("Etiketa č.{}", verdict.barcode_fail_list()))}
            </div>
            <div style="font-size:18px">
                <b>"Text:"</b>" "
                {status(verdict.ocr_ok(), format!("Etiketa č.{}", verdict.ocr_fail_list()))}
            </div>
            <div style="font-size:18px"><b>"Farebnosť:"</b>" "{color}</div>
            <div style="font-size:18px"><b>"Obraz:"</b>" "{status(verdict.image_ok, "Chyba".to_string())}</div>
            <Show when=move || missing.with(|m| !m.is_empty())>
                <div style="color:#dc2626;margin-top:16px;font-weight:600">
                    {move || missing_message(&missing.get())}
                </div>
            </Show>
        </div>
    }
}

const BADGE_OK: &str = "padding:4px 16px;background:#dcfce7;color:#166534;border-radius:12px;font-size:14px;border:1px solid #86efac;text-align:center";
const BADGE_ERR: &str = "padding:4px 16px;background:#fee2e2;color:#b91c1c;border-radius:12px;font-size:14px;border:1px solid #fca5a5;text-align:center";

fn label_card(idx: u32, label: CroppedLabel, result: &CompareResponse) -> impl IntoView {
    let barcode = match result.barcode_for(idx).filter(|b| b.is_invalid()) {
        Some(b) => {
            let err = b.error.clone().filter(|e| !e.is_empty()).unwrap_or_else(|| "Chyba".to_string());
            view! { <div style=BADGE_ERR>{format!("Čiarový kód: {err}")}</div> }.into_any()
        }
        None => view! { <div style=BADGE_OK>"Čiarový kód: OK"</div> }.into_any(),
    };
    let text_errors = result.ocr_for(idx).filter(|o| o.has_error()).count();
    let text_style = if text_errors > 0 { BADGE_ERR } else { BADGE_OK };

    view! {
        <div style="display:flex;flex-direction:column;align-items:center">
            <img
                src=label.url
                alt=format!("Etiketa č.{idx}")
                style="width:260px;height:360px;background:#f9f9f9;border-radius:12px;box-shadow:0 4px 6px rgba(0,0,0,0.1);border:1px solid #e5e7eb;object-fit:contain"
            />
            <div style="margin-top:8px;font-weight:600;color:#374151">{format!("Etiketa č.{idx}")}</div>
            <div style="font-size:12px;color:#6b7280">{format!("{} × {} px", label.w, label.h)}</div>
            <div style="display:flex;flex-direction:column;gap:8px;width:100%;align-items:center;margin-top:8px">
                {barcode}
                <div style=text_style>{text_badge(text_errors)}</div>
            </div>
        </div>
    }
}

// ========================
// CMYK table
// ========================

#[component]
pub fn ColorTable(items: Vec<ColorItem>) -> impl IntoView {
    if items.is_empty() {
        return ().into_any();
    }
    let rows = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let label = item.label_index.unwrap_or(i as u32 + 1);
            let values = Channel::ALL
                .iter()
                .map(|ch| format!("{}:{}", ch.letter(), fmt_one(item.channel(*ch).and_then(|r| r.etiketa))))
                .collect::<Vec<_>>()
                .join("\u{a0} ");
            let diffs = Channel::ALL
                .iter()
                .map(|ch| match item.channel(*ch).and_then(|r| r.rozdiel) {
                    Some(diff) => {
                        let color = if diff_within_limit(diff) { "#15803d" } else { "#dc2626" };
                        view! {
                            <span style=format!("margin-right:12px;font-family:monospace;font-weight:600;color:{color}")>
                                {format!("{}:{diff:.1}", ch.letter())}
                            </span>
                        }
                        .into_any()
                    }
                    None => view! {
                        <span style="margin-right:12px;font-family:monospace;color:#9ca3af">{format!("{}:-", ch.letter())}</span>
                    }
                    .into_any(),
                })
                .collect_view();
            let verdict = match item.summary.as_deref() {
                Some("OK") => view! { <span style="color:#15803d;font-weight:700">"OK"</span> }.into_any(),
                other => {
                    let text = other.filter(|s| !s.is_empty()).unwrap_or("Chyba").to_string();
                    view! { <span style="color:#dc2626;font-weight:700">{text}</span> }.into_any()
                }
            };
            view! {
                <tr style="border-bottom:1px solid #e5e7eb">
                    <td style="padding:8px 12px;font-weight:600">{format!("Etiketa č.{label}")}</td>
                    <td style="padding:8px 12px;font-family:monospace">{values}</td>
                    <td style="padding:8px 12px">{diffs}</td>
                    <td style="padding:8px 12px">{verdict}</td>
                </tr>
            }
        })
        .collect_view();

    view! {
        <div style="margin-top:48px;width:100%;max-width:1024px;margin-left:auto;margin-right:auto">
            <h3 style="font-weight:700;font-size:18px;margin-bottom:12px">"Vyhodnotenie farebnosti (CMYK)"</h3>
            <table style="width:100%;background:#fff;border-radius:6px;box-shadow:0 1px 3px rgba(0,0,0,0.1);font-size:14px">
                <thead>
                    <tr style="border-bottom:1px solid #e5e7eb;color:#374151">
                        <th style="padding:8px 12px;text-align:left">"Etiketa"</th>
                        <th style="padding:8px 12px;text-align:left">"C/M/Y/K etiketa"</th>
                        <th style="padding:8px 12px;text-align:left">"Rozdiel C/M/Y/K"</th>
                        <th style="padding:8px 12px;text-align:left">"Výsledok"</th>
                    </tr>
                </thead>
                <tbody>{rows}</tbody>
            </table>
            <div style="font-size:12px;color:#6b7280;margin-top:8px">
                {format!("Zelená: |rozdiel| < {DIFF_LIMIT}, červená: ≥ {DIFF_LIMIT}")}
            </div>
        </div>
    }
    .into_any()
}
