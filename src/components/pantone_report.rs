//! Pantone Page
//!
//! Matches a cropped patch of a scanned label against a Pantone reference
//! colour. Results are kept in the browser for the dashboard.

use chrono::Local;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_overlay::CropMode;
use tracing::{error, info};

use crate::api;
use crate::browser;
use crate::components::crop_dialog::{CropDialog, CropOutcome, InitialBox};
use crate::config::MAX_PANTONE_UPLOAD_BYTES;
use crate::context::{use_app_context, Page};
use crate::imaging::{base64_body, read_file_as_data_url};
use crate::models::{PantoneCompareRequest, PantoneResult};
use crate::pantone::{clock_text, filter_in, find_pantone, fmt_fixed, fmt_plain, palette, stored_report, Rating};

const FIELD_STYLE: &str = "background:rgba(221,221,221,0.9);color:#4b5563;border-radius:12px;padding:16px 32px;font-size:20px;min-width:220px;text-align:center;box-shadow:0 1px 3px rgba(0,0,0,0.1);border:none";

/// Patch size sent to the backend
const PATCH_SIZE: (u32, u32) = (100, 100);

#[component]
pub fn PantoneReport() -> impl IntoView {
    let ctx = use_app_context();
    let code = RwSignal::new(String::new());
    let operator = RwSignal::new(ctx.job.get_untracked().map(|j| j.operator).unwrap_or_default());
    let product = RwSignal::new(String::new());
    let clock = RwSignal::new(clock_text(Local::now()));
    let source_url = RwSignal::new(None::<String>);
    let show_crop = RwSignal::new(false);
    let patch_url = RwSignal::new(None::<String>);
    let result = RwSignal::new(None::<PantoneResult>);
    let detail = RwSignal::new(false);
    let loading = RwSignal::new(false);

    // Ticks until the page is unmounted
    spawn_local(async move {
        loop {
            TimeoutFuture::new(1_000).await;
            if clock.try_set(clock_text(Local::now())).is_some() {
                break;
            }
        }
    });

    let entry = Memo::new(move |_| code.with(|c| find_pantone(c)));

    let pick_image = move |ev: leptos::ev::Event| {
        let Some(file) = browser::picked_file(&ev) else {
            return;
        };
        if file.size() > MAX_PANTONE_UPLOAD_BYTES {
            browser::alert("Obrázok je príliš veľký (max. 2MB)");
            return;
        }
        spawn_local(async move {
            match read_file_as_data_url(&file).await {
                Ok(url) => {
                    patch_url.set(None);
                    source_url.set(Some(url));
                    show_crop.set(true);
                }
                Err(err) => error!("pantone image read failed: {}", err),
            }
        });
    };

    let on_crop = move |outcome: CropOutcome| {
        patch_url.set(Some(outcome.url));
        show_crop.set(false);
    };

    let ready = move || {
        !loading.get()
            && patch_url.with(Option::is_some)
            && entry.get().is_some()
            && operator.with(|o| !o.is_empty())
            && product.with(|p| !p.is_empty())
    };

    let compare = move |_| {
        let (Some(entry), Some(patch)) = (entry.get_untracked(), patch_url.get_untracked()) else {
            return;
        };
        let (op, pn) = (operator.get_untracked(), product.get_untracked());
        if op.is_empty() || pn.is_empty() {
            return;
        }
        let Some(image_base64) = base64_body(&patch).map(str::to_string) else {
            return;
        };
        let datetime = clock.get_untracked();
        let req = PantoneCompareRequest {
            pantone_code: entry.name.clone(),
            image_base64,
            operator: op,
            product_code: pn,
            datetime,
        };
        loading.set(true);
        detail.set(false);
        result.set(None);
        spawn_local(async move {
            match api::pantone_compare(&req).await {
                Ok(res) => {
                    info!("pantone {} rated {:?}", req.pantone_code, res.rating);
                    browser::append_pantone_report(stored_report(
                        &res,
                        &req.operator,
                        &req.product_code,
                        &req.datetime,
                        &req.pantone_code,
                    ));
                    result.set(Some(res));
                    loading.set(false);
                    TimeoutFuture::new(1_000).await;
                    ctx.navigate(Page::Dashboard);
                }
                Err(err) => {
                    error!("pantone compare failed: {}", err);
                    result.set(None);
                    loading.set(false);
                    browser::alert(&format!("Chyba porovnania: {err}"));
                }
            }
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
        <div style="width:100%;max-width:1152px;margin:0 auto;display:flex;flex-direction:column;align-items:center;padding:32px 12px">
            <h2 style="font-size:36px;font-weight:700;text-align:center;margin-bottom:32px;color:#fff;text-shadow:0 2px 8px rgba(0,0,0,0.4)">
                "Porovnanie Pantone farieb"
            </h2>

            <div style="display:flex;flex-wrap:wrap;gap:24px;margin-bottom:32px;width:100%;justify-content:center">
                {text_input("Meno operátora", operator)}
                {text_input("Produktové číslo", product)}
                <input
                    type="text"
                    style="background:#f6f7fa;color:#374151;border-radius:12px;padding:16px 32px;font-size:20px;min-width:240px;text-align:center;border:none"
                    readonly=true
                    tabindex="-1"
                    prop:value=move || clock.get()
                />
            </div>

            <div style="width:100%;display:flex;flex-wrap:wrap;gap:48px;align-items:flex-start;justify-content:center;margin:8px 0 40px">
                <div style="display:flex;flex-direction:column;align-items:center;gap:8px;flex:1;min-width:280px">
                    <input
                        type="text"
                        list="pantone-autocomplete"
                        style="border:2px solid #9ca3af;padding:16px 24px;border-radius:8px;font-size:24px;text-align:center;font-family:monospace;font-weight:bold;letter-spacing:1px;background:rgba(255,255,255,0.9);min-width:160px;max-width:220px"
                        placeholder="Pantone (napr. 485C)"
                        autocomplete="off"
                        prop:value=move || code.get()
                        on:input=move |ev| code.set(event_target_value(&ev))
                    />
                    <datalist id="pantone-autocomplete">
                        {palette().iter().map(|p| view! { <option value=p.name.clone()></option> }).collect_view()}
                    </datalist>
                    <div style=move || format!(
                        "width:96px;height:64px;border-radius:4px;border:1px solid #aaa;box-shadow:0 1px 2px #0002;background:{}",
                        entry.get().map(|e| e.hex.as_str()).unwrap_or("#fff"),
                    )></div>
                    <div style="font-size:13px;color:#e5e7eb;font-family:monospace;min-height:18px">
                        {move || entry.get().map(|e| e.name.clone()).unwrap_or_else(|| "—".to_string())}
                    </div>
                    {move || result.get().map(|res| view! { <PantoneOutcome result=res detail=detail /> })}
                </div>

                <div style="display:flex;flex-direction:column;align-items:center;gap:12px;flex:1;min-width:280px">
                    <input
                        type="file"
                        accept="image/*"
                        style="font-size:12px;background:rgba(255,255,255,0.8);border-radius:4px;width:100%"
                        on:change=pick_image
                    />
                    {move || patch_url.get().map(|url| view! {
                        <img src=url alt="výrez" style="width:100px;height:100px;border:1px solid #bbb;border-radius:4px" />
                    })}
                    <Show when=move || source_url.with(Option::is_some) && !show_crop.get()>
                        <button
                            type="button"
                            style="font-size:12px;text-decoration:underline;color:#bfdbfe"
                            on:click=move |_| show_crop.set(true)
                        >
                            "Orezať znova"
                        </button>
                    </Show>
                    <div style="font-size:11px;color:#d1d5db">"Vyber / crop etiketu"</div>
                    <button
                        style="padding:12px 32px;background:#1d4ed8;color:#fff;border-radius:4px;font-weight:700;font-size:18px"
                        disabled=move || !ready()
                        on:click=compare
                    >
                        {move || if loading.get() { "Porovnáva sa..." } else { "Porovnať" }}
                    </button>
                </div>
            </div>

            <PantonePalette on_pick=move |name: String| code.set(name) />

            {move || {
                let src = source_url.get()?;
                show_crop.get().then(|| view! {
                    <CropDialog
                        src=src
                        mode=CropMode::Aspect(2.0)
                        view_size=(340.0, 180.0)
                        initial=InitialBox::Aspect(2.0)
                        output=PATCH_SIZE
                        confirm_label="Použiť výrez"
                        on_crop=on_crop
                        on_cancel=move |_| show_crop.set(false)
                    />
                })
            }}
        </div>
    }
}

#[component]
fn PantoneOutcome(result: PantoneResult, detail: RwSignal<bool>) -> impl IntoView {
    let rating = Rating::parse(result.rating.as_deref());
    let percent = fmt_plain(result.match_percent);
    let badge = format!(
        "padding:8px 16px;border-radius:16px;font-size:18px;font-weight:700;margin-bottom:8px;border:1px solid #d1d5db;{}",
        rating.badge_style(),
    );
    let rgb = |r: Option<f64>, g: Option<f64>, b: Option<f64>| {
        format!("{}, {}, {}", fmt_plain(r), fmt_plain(g), fmt_plain(b))
    };
    let original = rgb(result.ref_r, result.ref_g, result.ref_b);
    let sample = rgb(result.sample_r, result.sample_g, result.sample_b);
    let pantone = format!(
        "{} ({})",
        result.pantone_code.clone().unwrap_or_default(),
        result.pantone_hex.clone().unwrap_or_default(),
    );
    let de2000 = fmt_fixed(result.delta_e2000, 2);
    let de76 = fmt_fixed(result.delta_e76, 2);
    let distance = fmt_fixed(result.rgb_distance, 2);
    let rating_text = result.rating.clone().unwrap_or_else(|| rating.label().to_string());
    let human = rating.human(&percent);

    view! {
        <div style="display:flex;flex-direction:column;align-items:center;width:100%;max-width:320px;gap:4px;margin-top:8px">
            <span style=badge>{rating_text}</span>
            <div style="font-size:16px;font-weight:500;color:#fff">{human}</div>
            <button
                type="button"
                style="font-size:12px;text-decoration:underline;color:#bfdbfe"
                on:click=move |_| detail.update(|d| *d = !*d)
            >
                {move || if detail.get() { "Skryť detail" } else { "Detail" }}
            </button>
            <Show when=move || detail.get()>
                <div style="margin-top:8px;background:rgba(255,255,255,0.9);border:1px solid #e5e7eb;border-radius:12px;padding:12px;font-size:13px;color:#1f2937">
                    <div><b>"Pantone: "</b>{pantone.clone()}</div>
                    <div><b>"Originál RGB: "</b>{original.clone()}</div>
                    <div><b>"Sken RGB: "</b>{sample.clone()}</div>
                    <div><b>"ΔE2000: "</b>{de2000.clone()}</div>
                    <div><b>"ΔE76: "</b>{de76.clone()}</div>
                    <div><b>"RGB vzdialenosť: "</b>{distance.clone()}</div>
                    <div><b>"% zhody: "</b>{format!("{percent}%")}</div>
                </div>
            </Show>
        </div>
    }
}

/// Collapsible, filterable Pantone swatch grid
#[component]
pub fn PantonePalette(#[prop(into)] on_pick: Callback<String>) -> impl IntoView {
    let query = RwSignal::new(String::new());
    let open = RwSignal::new(false);

    let swatches = move || {
        query.with(|q| {
            filter_in(palette(), q)
                .into_iter()
                .map(|p| {
                    let name = p.name.clone();
                    view! {
                        <div
                            style=format!("border:1px solid #ddd;border-radius:6px;display:flex;flex-direction:column;align-items:center;padding:8px;cursor:pointer;user-select:none;background:{}12", p.hex)
                            on:click=move |_| on_pick.run(name.clone())
                        >
                            <div style=format!("width:100%;height:40px;border-radius:4px;margin-bottom:4px;border:1px solid #bbb;background:{}", p.hex)></div>
                            <div style="font-size:10px;font-weight:500;color:#222">{p.name.clone()}</div>
                        </div>
                    }
                })
                .collect_view()
        })
    };

    view! {
        <div style="border-radius:16px;padding:24px;margin-top:32px;border:1px solid #dde2e6;background:rgba(255,255,255,0.2);width:100%;max-width:1024px">
            <div style="display:flex;align-items:center;justify-content:space-between;flex-wrap:wrap;gap:16px;margin-bottom:16px">
                <h3 style="font-size:20px;font-weight:600;color:#fff">"Paleta Pantone"</h3>
                <div style="display:flex;gap:8px;align-items:center">
                    <input
                        type="text"
                        placeholder="Filtrovať..."
                        style="width:160px;border:1px solid #ccc;padding:8px 12px;border-radius:4px;font-size:14px;font-family:monospace;background:rgba(255,255,255,0.7)"
                        prop:value=move || query.get()
                        on:input=move |ev| query.set(event_target_value(&ev))
                    />
                    <button
                        type="button"
                        style=move || format!(
                            "padding:8px 16px;font-size:12px;border-radius:4px;font-weight:600;color:#fff;background:{}",
                            if open.get() { "#1f2937" } else { "#2563eb" },
                        )
                        on:click=move |_| open.update(|o| *o = !*o)
                    >
                        {move || if open.get() { "Skryť skalu" } else { "Ukázať skalu" }}
                    </button>
                </div>
            </div>
            <Show when=move || open.get()>
                <div style="display:grid;grid-template-columns:repeat(6, minmax(0, 1fr));gap:12px;max-height:340px;overflow:auto;padding-right:4px">
                    {swatches}
                </div>
            </Show>
        </div>
    }
}
