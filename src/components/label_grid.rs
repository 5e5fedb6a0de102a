//! Label Grid
//!
//! Cropped labels with their error overlays and per-label status lines.

use std::collections::HashSet;

use leptos::prelude::*;
use leptos_overlay::OverlayBox;

use crate::components::overlay_canvas::OverlayCanvas;
use crate::models::{CompareResponse, CroppedLabel};

#[component]
pub fn LabelGrid(
    labels: RwSignal<Vec<CroppedLabel>>,
    result: RwSignal<Option<CompareResponse>>,
    acknowledged: RwSignal<HashSet<String>>,
    #[prop(into)] on_toggle: Callback<(OverlayBox, bool)>,
) -> impl IntoView {
    let indexed = move || labels.get().into_iter().enumerate().collect::<Vec<_>>();

    view! {
        <Show when=move || labels.with(|l| !l.is_empty())>
            <div style="display:grid;grid-template-columns:repeat(3, minmax(0, 1fr));gap:32px;margin-top:24px">
                <For
                    each=indexed
                    key=|(i, label)| (*i, label.url.len(), label.w, label.h)
                    children=move |(i, label)| {
                        let idx = i as u32 + 1;
                        let boxes = Signal::derive(move || {
                            result.with(|r| r.as_ref().map(|r| r.label_boxes(idx)).unwrap_or_default())
                        });
                        view! {
                            <div style="display:flex;flex-direction:column;align-items:center">
                                <OverlayCanvas
                                    src=label.url.clone()
                                    boxes=boxes
                                    acknowledged=acknowledged
                                    on_toggle=on_toggle
                                />
                                <div style="font-size:12px;margin-top:4px;font-weight:600">{format!("Etiketa č.{idx}")}</div>
                                <div style="font-size:12px;color:#6b7280;margin-bottom:4px">
                                    {format!("{} × {} px", label.w, label.h)}
                                </div>
                                {move || barcode_status(result, idx)}
                                {move || ocr_status(result, idx)}
                            </div>
                        }
                    }
                />
            </div>
        </Show>
    }
}

fn barcode_status(result: RwSignal<Option<CompareResponse>>, idx: u32) -> Option<AnyView> {
    result.with(|r| {
        let bc = r.as_ref()?.barcode_for(idx)?;
        Some(if bc.valid == Some(true) {
            view! { <div style="font-size:12px;color:#15803d">"✅ Čiarový kód OK"</div> }.into_any()
        } else {
            let text = bc.error.clone().unwrap_or_default();
            view! { <div style="font-size:12px;color:#dc2626">{text}</div> }.into_any()
        })
    })
}

/// First OCR line of the label: its error, else the scanned text
fn ocr_status(result: RwSignal<Option<CompareResponse>>, idx: u32) -> Option<AnyView> {
    result.with(|r| {
        let first = r.as_ref()?.ocr_for(idx).next()?;
        Some(if first.has_error() {
            let text = first.error.clone().unwrap_or_default();
            view! { <div style="font-size:12px;color:#dc2626">{text}</div> }.into_any()
        } else {
            let text = first.scan_text.clone().unwrap_or_default();
            view! { <div style="font-size:12px;color:#15803d">{text}</div> }.into_any()
        })
    })
}
