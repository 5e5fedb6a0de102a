//! Compare Workflow
//!
//! Master and strip inputs, the label grid with error overlays, and the
//! hand-off to the detailed report.

use std::collections::HashSet;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_overlay::{BoxKind, CropMode, OverlayBox};
use reactive_stores::Store;
use tracing::{debug, error, info, warn};

use crate::api::{self, ApiError, CompareRequest, Upload};
use crate::browser;
use crate::components::crop_dialog::{CropDialog, CropOutcome, InitialBox};
use crate::components::label_grid::LabelGrid;
use crate::components::wind_select::WindSelect;
use crate::context::use_app_context;
use crate::imaging::{crop_to_grid, read_file_as_data_url, read_file_bytes, rotate_image};
use crate::job::OperatorJob;
use crate::models::{CompareResponse, CropSize, CroppedLabel, FakeOcrError};
use crate::store::{
    clamp_dpi, store_apply_meta, store_touch_product, use_compare_store, CompareParams,
    CompareParamsStoreFields, CompareStore, InputMode,
};
use crate::verdict::ReportDraft;
use crate::wind::{self, index_for_code, next_index};

const PANEL_STYLE: &str = "border-radius:16px;box-shadow:0 10px 30px rgba(0,0,0,0.2);padding:32px;width:340px;display:flex;flex-direction:column;background:rgba(255,255,255,0.9)";
const INPUT_STYLE: &str = "width:100%;border:1px solid #cbd5e1;padding:8px;border-radius:6px;margin-bottom:16px";
const INVALID_INPUT_STYLE: &str = "width:100%;border:1px solid #dc2626;padding:8px;border-radius:6px;margin-bottom:4px";
const HINT_STYLE: &str = "color:#dc2626;font-size:12px;margin-bottom:8px";

/// Sequence number of the latest strip cut; older cuts are discarded
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CutGeneration(u64);

impl CutGeneration {
    fn next(self) -> Self {
        CutGeneration(self.0.wrapping_add(1))
    }
}

/// Images and results of one comparison session
#[derive(Clone, Copy)]
struct WorkflowState {
    wind_index: RwSignal<usize>,
    master_url: RwSignal<Option<String>>,
    /// File name of an uploaded master
    master_name: RwSignal<Option<String>>,
    crop_size: RwSignal<Option<CropSize>>,
    show_master_crop: RwSignal<bool>,
    strip_url: RwSignal<Option<String>>,
    /// Strip file as picked, sent as the scan
    strip_upload: RwSignal<Option<Upload>>,
    show_strip_crop: RwSignal<bool>,
    labels: RwSignal<Vec<CroppedLabel>>,
    cut_generation: RwSignal<CutGeneration>,
    result: RwSignal<Option<CompareResponse>>,
    acknowledged: RwSignal<HashSet<String>>,
    loading: RwSignal<bool>,
}

impl WorkflowState {
    fn new() -> Self {
        Self {
            wind_index: RwSignal::new(0),
            master_url: RwSignal::new(None),
            master_name: RwSignal::new(None),
            crop_size: RwSignal::new(None),
            show_master_crop: RwSignal::new(false),
            strip_url: RwSignal::new(None),
            strip_upload: RwSignal::new(None),
            show_strip_crop: RwSignal::new(false),
            labels: RwSignal::new(Vec::new()),
            cut_generation: RwSignal::new(CutGeneration::default()),
            result: RwSignal::new(None),
            acknowledged: RwSignal::new(HashSet::new()),
            loading: RwSignal::new(false),
        }
    }

    fn wind_code(&self) -> &'static str {
        wind::wind_at(self.wind_index.get_untracked()).as_str()
    }

    fn clear_outcome(&self) {
        self.labels.set(Vec::new());
        self.result.set(None);
    }
}

/// Workflow page; needs an operator job in context
#[component]
pub fn CompareWorkflow() -> impl IntoView {
    let ctx = use_app_context();

    move || match ctx.job.get() {
        Some(job) => view! { <CompareWorkspace job=job /> }.into_any(),
        None => view! {
            <div style="padding:40px;font-size:20px;color:#dc2626;font-weight:700">
                "Chýbajú vstupné údaje. Prosím, začni proces od začiatku."
            </div>
        }
        .into_any(),
    }
}

#[component]
fn CompareWorkspace(job: OperatorJob) -> impl IntoView {
    let ctx = use_app_context();
    let store: CompareStore = Store::new(CompareParams::for_product(&job.product));
    provide_context(store);
    let state = WorkflowState::new();

    // Cut the strip whenever the grid inputs change
    Effect::new(move |_| {
        let crop = state.crop_size.get();
        let strip = state.strip_url.get();
        let grid = store.with(|params| params.grid_spec(crop));
        let ticket = state.cut_generation.get_untracked().next();
        state.cut_generation.set(ticket);
        let (Some(strip), Some(grid)) = (strip, grid) else {
            return;
        };
        spawn_local(async move {
            let cells = crate::geometry::grid_cells(&grid);
            let outcome = crop_to_grid(&strip, &cells).await;
            if state.cut_generation.get_untracked() != ticket {
                debug!("dropping stale strip cut {:?}", ticket);
                return;
            }
            match outcome {
                Ok(labels) => {
                    info!("strip cut into {} labels", labels.len());
                    state.labels.set(labels);
                }
                Err(err) => error!("strip crop failed: {}", err),
            }
        });
    });

    let on_toggle = move |(bx, acked): (OverlayBox, bool)| {
        if !acked || bx.kind != BoxKind::Ocr {
            return;
        }
        let (Some(master_text), Some(scan_text)) = (bx.master_text.clone(), bx.scan_text.clone()) else {
            return;
        };
        let body = FakeOcrError {
            master_text,
            scan_text,
            product_number: store.product_number().get_untracked(),
        };
        spawn_local(async move {
            if let Err(err) = api::report_fake_ocr_error(&body).await {
                warn!("fake OCR feedback failed: {}", err);
            }
        });
    };

    let open_report = Callback::new(move |_: leptos::ev::MouseEvent| {
        let Some(result) = state.result.get_untracked() else {
            return;
        };
        let params = store.get_untracked();
        ctx.open_report(ReportDraft {
            operator: job.operator.clone(),
            job_number: job.job_number.clone(),
            product: job.product.clone(),
            machine: job.machine.clone(),
            product_number: params.product_number.trim().to_string(),
            spool_number: params.spool_number,
            wind: state.wind_code().to_string(),
            result,
            cropped_labels: state.labels.get_untracked(),
        });
    });

    view! {
        <img
            src="/images/navin.png"
            alt="Navin"
            style="position:absolute;top:112px;right:112px;width:144px;height:auto;z-index:50;pointer-events:none;box-shadow:0 2px 8px #0002;border-radius:10px"
        />
        <div style="display:flex;flex-direction:row;gap:56px;padding:56px 0;width:100%;max-width:1280px;margin:0 auto;align-items:flex-start">
            <ParamsPanel state=state />
            <div style="flex:1">
                <div style="display:flex;gap:48px;margin-bottom:16px">
                    <MasterPanel state=state />
                    <StripPanel state=state />
                </div>
                <LabelGrid
                    labels=state.labels
                    result=state.result
                    acknowledged=state.acknowledged
                    on_toggle=on_toggle
                />
            </div>
        </div>

        <Show when=move || state.show_master_crop.get() && state.master_url.get().is_some()>
            {move || {
                let src = state.master_url.get_untracked().unwrap_or_default();
                let (w, h) = store.with_untracked(CompareParams::label_px);
                view! {
                    <CropDialog
                        src=src
                        mode=CropMode::Fixed
                        view_size=(600.0, 400.0)
                        initial=InitialBox::Natural(w, h)
                        confirm_label="Orezať"
                        on_crop=move |outcome: CropOutcome| {
                            state.master_url.set(Some(outcome.url));
                            state.crop_size.set(Some(CropSize { w: outcome.region.width, h: outcome.region.height }));
                            state.show_master_crop.set(false);
                        }
                        on_cancel=move |_| state.show_master_crop.set(false)
                    />
                }
            }}
        </Show>

        <Show when=move || state.show_strip_crop.get() && state.strip_url.get().is_some()>
            {move || {
                let src = state.strip_url.get_untracked().unwrap_or_default();
                view! {
                    <CropDialog
                        src=src
                        mode=CropMode::Free
                        view_size=(800.0, 400.0)
                        initial=InitialBox::Full
                        confirm_label="Orezať pás"
                        on_crop=move |outcome: CropOutcome| {
                            state.strip_url.set(Some(outcome.url));
                            state.show_strip_crop.set(false);
                        }
                        on_cancel=move |_| state.show_strip_crop.set(false)
                    />
                }
            }}
        </Show>

        <Show when=move || state.result.with(Option::is_some)>
            <button
                style="position:fixed;bottom:24px;right:32px;background:#1d4ed8;color:#fff;padding:12px 24px;border-radius:12px;box-shadow:0 10px 30px rgba(0,0,0,0.3);z-index:50;font-size:18px;font-weight:600"
                on:click=move |ev| open_report.run(ev)
            >
                "Detailný report všetkých chýb"
            </button>
        </Show>
    }
}

// ========================
// Parameters
// ========================

/// Text or number input with a label
fn param_input(
    label: &'static str,
    kind: &'static str,
    min: &'static str,
    value: impl Fn() -> String + Send + Sync + 'static,
    on_input: impl Fn(String) + 'static,
) -> impl IntoView {
    view! {
        <label>{label}</label>
        <input
            type=kind
            min=min
            style=INPUT_STYLE
            prop:value=value
            on:input=move |ev| on_input(event_target_value(&ev))
        />
    }
}

#[component]
fn ParamsPanel(state: WorkflowState) -> impl IntoView {
    let store = use_compare_store();
    let mode = store.input_mode();

    let mode_button = move |target: InputMode, label: &'static str, radius: &'static str| {
        view! {
            <button
                type="button"
                style=move || {
                    let active = mode.get() == target;
                    format!(
                        "flex:1;padding:8px 0;border:1px solid #d1d5db;border-radius:{radius};{}",
                        if active { "background:#2563eb;color:#fff;font-weight:700" } else { "background:#fff;color:#374151" },
                    )
                }
                on:click=move |_| mode.set(target)
            >
                {label}
            </button>
        }
    };

    let on_compare = move |_| do_compare(store, state);
    let compare_disabled = move || {
        state.loading.get()
            || store.with(|p| p.product_missing() || p.spool_missing() || p.rows.is_empty() || p.cols.is_empty())
            || state.master_url.with(Option::is_none)
            || state.strip_url.with(Option::is_none)
    };

    view! {
        <div style=PANEL_STYLE>
            <div style="display:flex;gap:8px;margin-bottom:24px">
                {mode_button(InputMode::Manual, "Vyplniť ručne", "8px 0 0 8px")}
                {mode_button(InputMode::Disk, "Z disku", "0 8px 8px 0")}
            </div>

            <IdentityFields />

            <Show
                when=move || mode.get() == InputMode::Manual
                fallback=move || view! {
                    <button
                        type="button"
                        style="background:#2563eb;color:#fff;padding:8px;border-radius:6px;width:100%;margin-bottom:24px"
                        disabled=move || store.product_number().with(|pn| pn.trim().is_empty()) || state.loading.get()
                        on:click=move |_| do_load_master(store, state)
                    >
                        "Načítať master"
                    </button>
                }
            >
                {param_input("Počet riadkov *", "number", "1", move || store.rows().get(), move |v| store.rows().set(v))}
                {param_input("Počet stĺpcov *", "number", "1", move || store.cols().get(), move |v| store.cols().set(v))}
                {param_input("Šírka etikety (mm)", "number", "1", move || store.label_width_mm().get(), move |v| store.label_width_mm().set(v))}
                {param_input("Výška etikety (mm)", "number", "1", move || store.label_height_mm().get(), move |v| store.label_height_mm().set(v))}
                {param_input("Horizontálna medzera (mm)", "number", "0", move || store.horizontal_gap_mm().get(), move |v| store.horizontal_gap_mm().set(v))}
                {param_input("Vertikálna medzera (mm)", "number", "0", move || store.vertical_gap_mm().get(), move |v| store.vertical_gap_mm().set(v))}
                <label style="font-size:12px">"DPI (zvyčajne 96):"</label>
                <input
                    type="number"
                    min="30"
                    max="1200"
                    style=INPUT_STYLE
                    prop:value=move || store.dpi().get().to_string()
                    on:change=move |ev| store.dpi().set(clamp_dpi(&event_target_value(&ev)))
                />
                <button
                    type="button"
                    style="background:#3b82f6;color:#fff;padding:8px;border-radius:6px;margin-bottom:16px"
                    on:click=move |_| do_save_master(store, state)
                >
                    "Uložiť master"
                </button>
            </Show>

            <button
                type="button"
                style="margin-top:24px;width:100%;background:#22c55e;color:#fff;padding:12px;border-radius:6px"
                disabled=compare_disabled
                on:click=on_compare
            >
                {move || if state.loading.get() { "Porovnávam…" } else { "Porovnať" }}
            </button>
        </div>
    }
}

/// Product and spool number with their required-field hints
#[component]
fn IdentityFields() -> impl IntoView {
    let store = use_compare_store();
    let product_invalid = move || store.product_touched().get() && store.product_number().with(|pn| pn.trim().is_empty());
    let spool_invalid = move || store.spool_number().with(|s| s.trim().is_empty());

    view! {
        <label>"Číslo produktu *"</label>
        <input
            type="text"
            autofocus=true
            style=move || if product_invalid() { INVALID_INPUT_STYLE } else { INPUT_STYLE }
            prop:value=move || store.product_number().get()
            on:input=move |ev| store.product_number().set(event_target_value(&ev))
            on:blur=move |_| store.product_touched().set(true)
        />
        <Show when=product_invalid>
            <div style=HINT_STYLE>"Vyplň číslo produktu"</div>
        </Show>

        <label>"Číslo kotúča *"</label>
        <input
            type="number"
            min="1"
            style=move || if spool_invalid() { INVALID_INPUT_STYLE } else { INPUT_STYLE }
            prop:value=move || store.spool_number().get()
            on:input=move |ev| store.spool_number().set(event_target_value(&ev))
        />
        <Show when=spool_invalid>
            <div style=HINT_STYLE>"Vyplň číslo kotúča"</div>
        </Show>
    }
}

// ========================
// Images
// ========================

#[component]
fn MasterPanel(state: WorkflowState) -> impl IntoView {
    let on_master = move |ev: leptos::ev::Event| {
        let file = browser::picked_file(&ev);
        state.crop_size.set(None);
        state.clear_outcome();
        state.wind_index.set(0);
        let Some(file) = file else {
            state.master_url.set(None);
            state.master_name.set(None);
            return;
        };
        state.master_name.set(Some(file.name()));
        spawn_local(async move {
            match read_file_as_data_url(&file).await {
                Ok(url) => state.master_url.set(Some(url)),
                Err(err) => {
                    warn!("master read failed: {}", err);
                    state.master_url.set(None);
                }
            }
        });
    };

    let rotate = move |_| {
        let Some(url) = state.master_url.get_untracked() else {
            return;
        };
        spawn_local(async move {
            match rotate_image(&url, 90).await {
                Ok(rotated) => {
                    state.master_url.set(Some(rotated));
                    state.wind_index.update(|i| *i = next_index(*i));
                }
                Err(err) => {
                    error!("master rotation failed: {}", err);
                    browser::alert("Chyba pri rotácii obrázka");
                }
            }
        });
    };

    view! {
        <div style="display:flex;flex-direction:column;align-items:center">
            <label style="font-weight:700;margin-bottom:8px">"Master etiketa"</label>
            <input type="file" accept="image/*" style="margin-bottom:16px" on:change=on_master />
            <Show when=move || state.master_url.with(Option::is_some)>
                <img
                    src=move || state.master_url.get().unwrap_or_default()
                    alt="master"
                    style="max-width:180px;max-height:140px;object-fit:contain;border-radius:6px;margin-bottom:8px"
                />
                <div style="display:flex;gap:8px">
                    <button type="button" style="background:#2563eb;color:#fff;padding:4px 8px;border-radius:6px" on:click=rotate>
                        {move || format!("Otočiť ({})", wind::wind_at(state.wind_index.get()))}
                    </button>
                    <button
                        type="button"
                        style="background:#374151;color:#fff;padding:4px 8px;border-radius:6px"
                        on:click=move |_| state.show_master_crop.set(true)
                    >
                        "Orež"
                    </button>
                </div>
                {move || state.crop_size.get().map(|c| view! {
                    <div style="font-size:12px;color:#6b7280;margin-top:4px">{format!("{}×{}px", c.w, c.h)}</div>
                })}
            </Show>
            <div style="margin-top:12px">
                <WindSelect index=state.wind_index />
            </div>
        </div>
    }
}

#[component]
fn StripPanel(state: WorkflowState) -> impl IntoView {
    let on_strip = move |ev: leptos::ev::Event| {
        let file = browser::picked_file(&ev);
        state.clear_outcome();
        let Some(file) = file.filter(|f| f.type_().starts_with("image/")) else {
            state.strip_url.set(None);
            state.strip_upload.set(None);
            return;
        };
        spawn_local(async move {
            let url = read_file_as_data_url(&file).await;
            let bytes = read_file_bytes(&file).await;
            match (url, bytes) {
                (Ok(url), Ok(bytes)) => {
                    state.strip_upload.set(Some(Upload::new(bytes, file.name(), file.type_())));
                    state.strip_url.set(Some(url));
                }
                (Err(err), _) | (_, Err(err)) => {
                    warn!("strip read failed: {}", err);
                    state.strip_url.set(None);
                    state.strip_upload.set(None);
                }
            }
        });
    };

    view! {
        <div style="display:flex;flex-direction:column;align-items:center">
            <label style="font-weight:700;margin-bottom:8px">"Pás etikiet"</label>
            <input type="file" accept="image/*" style="margin-bottom:16px" on:change=on_strip />
            <Show
                when=move || state.strip_url.with(Option::is_some)
                fallback=|| view! { <p style="color:#9ca3af">"Nahraj pás, aby sa zobrazil náhľad"</p> }
            >
                <img
                    src=move || state.strip_url.get().unwrap_or_default()
                    alt="strip"
                    style="max-width:320px;max-height:220px;object-fit:contain;border-radius:6px;margin-bottom:8px"
                />
                <button
                    type="button"
                    style="background:#374151;color:#fff;padding:4px 8px;border-radius:6px"
                    on:click=move |_| state.show_strip_crop.set(true)
                >
                    "Orezať pás"
                </button>
            </Show>
        </div>
    }
}

// ========================
// Backend calls
// ========================

fn do_compare(store: CompareStore, state: WorkflowState) {
    let product = store_touch_product(&store);
    if product.is_empty() {
        browser::alert("Číslo produktu je povinné!");
        return;
    }
    let params = store.get_untracked();
    if params.spool_missing() {
        browser::alert("Číslo kotúča je povinné!");
        return;
    }
    let master = state
        .master_url
        .get_untracked()
        .and_then(|url| Upload::from_data_url(&url, "auto-master.png").ok());
    let scan = state.strip_upload.get_untracked();
    let (Some(master), Some(scan)) = (master, scan) else {
        browser::alert("Vyplň všetky polia a nahraj master + pás.");
        return;
    };
    if params.rows.is_empty() || params.cols.is_empty() {
        browser::alert("Vyplň všetky polia a nahraj master + pás.");
        return;
    }

    let (mm_w, mm_h) = params.label_px();
    let crop = state.crop_size.get_untracked();
    let request = CompareRequest {
        master,
        scan,
        rows: params.rows.clone(),
        cols: params.cols.clone(),
        wind: state.wind_code().to_string(),
        label_width_px: crop.map(|c| c.w).filter(|w| *w > 0).unwrap_or(mm_w),
        label_height_px: crop.map(|c| c.h).filter(|h| *h > 0).unwrap_or(mm_h),
        horizontal_gap_mm: params.horizontal_gap_mm.clone(),
        vertical_gap_mm: params.vertical_gap_mm.clone(),
        dpi: params.dpi,
        spool_number: params.spool_number.clone(),
        product_number: product,
    };

    state.loading.set(true);
    spawn_local(async move {
        match api::compare(request).await {
            Ok(result) => {
                info!(
                    "compare done: {} barcode, {} ocr, {} color items",
                    result.barcode_data.len(),
                    result.ocr_data.len(),
                    result.color_data.len()
                );
                state.result.set(Some(result));
                state.acknowledged.set(HashSet::new());
            }
            Err(err) => {
                error!("compare failed: {}", err);
                browser::alert("Chyba porovnania");
            }
        }
        state.loading.set(false);
    });
}

fn do_save_master(store: CompareStore, state: WorkflowState) {
    let product = store_touch_product(&store);
    let master_url = state.master_url.get_untracked();
    let crop = state.crop_size.get_untracked();
    let (Some(master_url), Some(_)) = (master_url.filter(|_| !product.is_empty()), crop) else {
        browser::alert("Vyplň číslo produktu, nahraj a orež master.");
        return;
    };
    let params = store.get_untracked();
    if params.spool_missing() {
        browser::alert("Vyplň číslo kotúča");
        return;
    }
    let meta = params.to_meta(crop, state.wind_code());
    let name = state.master_name.get_untracked().unwrap_or_else(|| "master.png".to_string());
    let upload = match Upload::from_data_url(&master_url, name) {
        Ok(upload) => upload,
        Err(err) => {
            error!("master data URL unreadable: {}", err);
            browser::alert("Chyba pri ukladaní masteru.");
            return;
        }
    };
    spawn_local(async move {
        match api::save_master(&product, upload, &meta).await {
            Ok(()) => {
                info!("master {} saved", product);
                browser::alert("Master úspešne uložený na server.");
            }
            Err(err) => {
                error!("master save failed: {}", err);
                browser::alert("Chyba pri ukladaní masteru.");
            }
        }
    });
}

fn do_load_master(store: CompareStore, state: WorkflowState) {
    let product = store_touch_product(&store);
    if product.is_empty() {
        browser::alert("Zadaj číslo produktu");
        return;
    }
    state.loading.set(true);
    spawn_local(async move {
        match api::load_master(&product).await {
            Ok(loaded) => {
                let meta = loaded.meta.unwrap_or_default();
                state.wind_index.set(index_for_code(meta.wind.as_deref()));
                state.master_url.set(Some(loaded.png_base64));
                state.master_name.set(None);
                store_apply_meta(&store, &meta);
                state.crop_size.set(meta.crop_size);
                state.clear_outcome();
                info!("master {} loaded", product);
                browser::alert("Master načítaný.");
            }
            Err(err) => {
                error!("master load failed: {}", err);
                let message = match err {
                    ApiError::Status(status) => format!("Nepodarilo sa načítať master etiketu: {status}"),
                    other => other.to_string(),
                };
                browser::alert(&message);
            }
        }
        state.loading.set(false);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_cut_supersedes_earlier() {
        let mut latest = CutGeneration::default();
        let first = latest.next();
        latest = first;
        let second = latest.next();
        latest = second;
        assert_ne!(latest, first);
        assert_eq!(latest, second);
        assert_eq!(CutGeneration(u64::MAX).next(), CutGeneration(0));
    }
}
