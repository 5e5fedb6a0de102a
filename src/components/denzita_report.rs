//! Density Page
//!
//! Compares one scanned label against its master per CMYK channel and
//! suggests ink corrections.

use chrono::Local;
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::{error, info};

use crate::api::{self, Upload};
use crate::browser;
use crate::context::{use_app_context, Page};
use crate::denzita::{channel_tooltip, report_payload, DensityAdvice, DenzitaResult};
use crate::imaging::{read_file_as_data_url, read_file_bytes, rotate_image};
use crate::job::{form_date, form_time};
use crate::models::Channel;

const FIELD_STYLE: &str = "background:rgba(255,255,255,0.9);color:#1f2937;border-radius:12px;padding:16px 24px;font-size:18px;text-align:center;box-shadow:0 1px 3px rgba(0,0,0,0.1);min-width:180px;border:none";
const PREVIEW_STYLE: &str = "border-radius:12px;border:1px solid #e5e7eb;margin-bottom:8px;max-width:320px;max-height:210px;object-fit:contain;background:#fafafa";
const PLACEHOLDER_STYLE: &str = "color:#9ca3af;margin-bottom:8px;min-height:110px;display:flex;align-items:center;justify-content:center;font-weight:600;width:320px";

/// Where the displayed master came from
#[derive(Debug, Clone, PartialEq)]
enum MasterSource {
    /// Stored master served by the backend
    Backend(String),
    /// Data URL of a file picked on this PC, sent with the comparison
    Uploaded { url: String, name: String },
}

impl MasterSource {
    fn url(&self) -> &str {
        match self {
            MasterSource::Backend(url) => url,
            MasterSource::Uploaded { url, .. } => url,
        }
    }
}

#[component]
pub fn DenzitaReport() -> impl IntoView {
    let ctx = use_app_context();
    let now = Local::now();
    let operator = RwSignal::new(ctx.job.get_untracked().map(|j| j.operator).unwrap_or_default());
    let product = RwSignal::new(String::new());
    let date = RwSignal::new(form_date(now));
    let time = RwSignal::new(form_time(now));
    let master = RwSignal::new(None::<MasterSource>);
    let label = RwSignal::new(None::<(Upload, String)>);
    let result = RwSignal::new(None::<DenzitaResult>);
    let loading = RwSignal::new(false);
    let error_text = RwSignal::new(None::<String>);

    let load_from_backend = move |_| {
        error_text.set(None);
        result.set(None);
        let pn = product.get_untracked();
        if pn.trim().is_empty() {
            error_text.set(Some("Zadaj číslo produktu".to_string()));
            return;
        }
        master.set(Some(MasterSource::Backend(api::master_image_url(&pn))));
    };

    let upload_master = move |ev: leptos::ev::Event| {
        let Some(file) = browser::picked_file(&ev) else {
            return;
        };
        spawn_local(async move {
            match read_file_as_data_url(&file).await {
                Ok(url) => master.set(Some(MasterSource::Uploaded { url, name: file.name() })),
                Err(err) => error!("master read failed: {}", err),
            }
        });
    };

    let upload_label = move |ev: leptos::ev::Event| {
        let Some(file) = browser::picked_file(&ev) else {
            return;
        };
        spawn_local(async move {
            let url = read_file_as_data_url(&file).await;
            let bytes = read_file_bytes(&file).await;
            match (url, bytes) {
                (Ok(url), Ok(bytes)) => label.set(Some((Upload::new(bytes, file.name(), file.type_()), url))),
                (Err(err), _) | (_, Err(err)) => error!("label read failed: {}", err),
            }
        });
    };

    let rotate_master = move |_| {
        let Some(current) = master.get_untracked() else {
            return;
        };
        loading.set(true);
        spawn_local(async move {
            match rotate_image(current.url(), 90).await {
                Ok(rotated) => master.set(Some(match current {
                    MasterSource::Backend(_) => MasterSource::Backend(rotated),
                    MasterSource::Uploaded { name, .. } => MasterSource::Uploaded { url: rotated, name },
                })),
                Err(err) => {
                    error!("master rotation failed: {}", err);
                    error_text.set(Some("Chyba pri rotácii obrázka".to_string()));
                }
            }
            loading.set(false);
        });
    };

    let compare = move |_| {
        let pn = product.get_untracked();
        let Some((etiketa, _)) = label.get_untracked().filter(|_| !pn.trim().is_empty()) else {
            error_text.set(Some("Vyber etiketu a zadaj produktové číslo!".to_string()));
            return;
        };
        let master_upload = match master.get_untracked() {
            Some(MasterSource::Uploaded { url, name }) => Upload::from_data_url(&url, name).ok(),
            _ => None,
        };
        let op = operator.get_untracked();
        loading.set(true);
        error_text.set(None);
        result.set(None);
        spawn_local(async move {
            match api::denzita_compare(etiketa, &pn, master_upload, Some(&op)).await {
                Ok(res) => {
                    info!("density compare for {}: {} channels", pn, res.len());
                    result.set(Some(res));
                }
                Err(err) => {
                    error!("density compare failed: {}", err);
                    error_text.set(Some(err.to_string()));
                }
            }
            loading.set(false);
        });
    };

    let save = move |_| {
        let pn = product.get_untracked();
        let Some(res) = result.get_untracked().filter(|_| !pn.is_empty()) else {
            error_text.set(Some("Najprv porovnaj etikety.".to_string()));
            return;
        };
        let payload = report_payload(
            &operator.get_untracked(),
            &pn,
            &date.get_untracked(),
            &time.get_untracked(),
            &res,
        );
        loading.set(true);
        error_text.set(None);
        spawn_local(async move {
            match api::save_denzita_report(&payload).await {
                Ok(()) => {
                    info!("density report saved for {}", payload.product_code);
                    ctx.navigate(Page::Dashboard);
                }
                Err(err) => {
                    error!("density report save failed: {}", err);
                    error_text.set(Some(err.to_string()));
                }
            }
            loading.set(false);
        });
    };

    let text_input = move |placeholder: &'static str, value: RwSignal<String>| {
        view! {
            <input
                type="text"
                style=FIELD_STYLE
                placeholder=placeholder
                autocomplete="off"
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        }
    };

    view! {
        <div style="min-height:100vh;width:100%;display:flex;flex-direction:column;align-items:center;justify-content:center;padding:32px 0">
            <h2 style="font-size:30px;font-weight:800;margin-bottom:16px;color:#111827;text-align:center">
                "Porovnanie denzity etikiet"
            </h2>

            <div style="display:flex;gap:24px;margin-bottom:40px;width:100%;justify-content:center">
                {text_input("Meno operátora", operator)}
                {text_input("Produktové číslo", product)}
                <input
                    type="date"
                    style=FIELD_STYLE
                    prop:value=move || date.get()
                    on:input=move |ev| date.set(event_target_value(&ev))
                />
                <input
                    type="time"
                    style=FIELD_STYLE
                    prop:value=move || time.get()
                    on:input=move |ev| time.set(event_target_value(&ev))
                />
            </div>

            <div style="display:flex;gap:96px;width:100%;max-width:896px;justify-content:center;align-items:flex-start;margin-bottom:24px">
                <div style="display:flex;flex-direction:column;align-items:center;flex:1">
                    <div style="display:flex;gap:12px;margin-bottom:12px">
                        <button
                            type="button"
                            style="width:170px;background:#1d4ed8;color:#fff;font-weight:700;padding:8px 0;border-radius:8px"
                            disabled=move || loading.get() || product.with(String::is_empty)
                            on:click=load_from_backend
                        >
                            "Načítať master z disku"
                        </button>
                        <label style="width:170px;background:#4b5563;color:#fff;font-weight:700;padding:8px 0;border-radius:8px;text-align:center;cursor:pointer;display:inline-block">
                            <input
                                type="file"
                                accept="image/*"
                                style="display:none"
                                disabled=move || loading.get()
                                on:change=upload_master
                            />
                            "Nahrať master z PC"
                        </label>
                    </div>
                    {move || match master.get() {
                        Some(src) => view! { <img src=src.url().to_string() alt="master" style=PREVIEW_STYLE /> }.into_any(),
                        None => view! { <div style=PLACEHOLDER_STYLE>"Master etiketa"</div> }.into_any(),
                    }}
                    <Show when=move || master.with(Option::is_some)>
                        <button
                            type="button"
                            style="background:#1f2937;color:#fff;padding:4px 16px;border-radius:8px;font-weight:500"
                            disabled=move || loading.get()
                            on:click=rotate_master
                        >
                            "⟳ Otočiť master o 90°"
                        </button>
                    </Show>
                </div>

                <div style="display:flex;flex-direction:column;align-items:center;flex:1">
                    <input
                        type="file"
                        accept="image/*"
                        style="margin-bottom:16px;width:270px"
                        disabled=move || loading.get()
                        on:change=upload_label
                    />
                    {move || match label.get() {
                        Some((_, url)) => view! { <img src=url alt="etiketa" style=PREVIEW_STYLE /> }.into_any(),
                        None => view! { <div style=PLACEHOLDER_STYLE>"Sken etiketa"</div> }.into_any(),
                    }}
                </div>
            </div>

            <div style="display:flex;gap:16px;margin-top:8px">
                <button
                    style="background:#15803d;color:#fff;font-weight:700;padding:12px 32px;border-radius:12px;font-size:18px"
                    disabled=move || master.with(Option::is_none) || label.with(Option::is_none) || loading.get()
                    on:click=compare
                >
                    {move || if loading.get() { "Porovnávam..." } else { "Porovnať" }}
                </button>
                <button
                    type="button"
                    style="background:#7e22ce;color:#fff;font-weight:700;padding:12px 32px;border-radius:12px;font-size:18px"
                    disabled=move || result.with(Option::is_none) || loading.get()
                    on:click=save
                >
                    "Uložiť"
                </button>
            </div>

            {move || error_text.get().map(|e| view! { <div style="color:#dc2626;margin-top:24px;font-weight:600">{e}</div> })}

            {move || result.get().map(|res| view! { <DensityResults result=res /> })}
        </div>
    }
}

#[component]
fn DensityResults(result: DenzitaResult) -> impl IntoView {
    let rows = Channel::ALL
        .iter()
        .filter_map(|ch| {
            let reading = result.get(ch.key())?;
            let delta = reading.rel_rozdiel?;
            let advice = DensityAdvice::evaluate(delta);
            Some(view! {
                <div style="display:flex;align-items:center;margin-bottom:12px;font-size:18px" title=channel_tooltip(reading)>
                    <div
                        style=format!("width:28px;height:28px;border-radius:4px;margin-right:16px;background:{};border:2px solid #bbb", ch.css_color())
                        title=ch.name()
                    ></div>
                    <span style=format!("font-weight:700;margin-left:16px;color:{}", advice.color(*ch))>
                        {advice.label()}
                    </span>
                </div>
            })
        })
        .collect_view();

    view! {
        <div style="margin-top:32px;width:100%;max-width:320px;display:flex;flex-direction:column;align-items:center">
            <h3 style="font-weight:700;font-size:20px;margin-bottom:12px;color:#111827;text-align:left;width:100%">
                "Výsledky CMYK"
            </h3>
            <div style="display:flex;flex-direction:column;gap:4px;width:100%">{rows}</div>
        </div>
    }
}
