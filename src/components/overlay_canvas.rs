//! Overlay Canvas Component
//!
//! One cropped label drawn at natural size with its error boxes on top.

use std::collections::HashSet;

use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_overlay::{
    create_overlay_signals, make_on_click, make_on_mouseleave, make_on_mousemove, paint_overlay,
    OverlayBox,
};
use tracing::{error, warn};
use web_sys::HtmlImageElement;

use crate::imaging::load_image;

#[component]
pub fn OverlayCanvas(
    #[prop(into)] src: String,
    #[prop(into)] boxes: Signal<Vec<OverlayBox>>,
    acknowledged: RwSignal<HashSet<String>>,
    /// Box clicked, with its new acknowledgement state
    #[prop(into)]
    on_toggle: Callback<(OverlayBox, bool)>,
) -> impl IntoView {
    let overlay = create_overlay_signals(acknowledged);
    let canvas_ref = NodeRef::<html::Canvas>::new();
    let image = RwSignal::new_local(None::<HtmlImageElement>);

    spawn_local(async move {
        match load_image(&src).await {
            Ok(img) => image.set(Some(img)),
            Err(err) => error!("label image failed to load: {}", err),
        }
    });

    Effect::new(move |_| {
        let hovered = overlay.hovered_read.get();
        let Some(canvas) = canvas_ref.get() else {
            return;
        };
        let acked = acknowledged.get();
        boxes.with(|list| {
            image.with(|img| {
                if let Some(img) = img {
                    if let Err(err) = paint_overlay(&canvas, img, list, &acked, hovered.as_deref()) {
                        warn!("overlay repaint failed: {:?}", err);
                    }
                }
            })
        });
    });

    let tooltip = move || {
        let id = overlay.hovered_read.get()?;
        boxes.with(|list| list.iter().find(|b| b.id() == id).map(OverlayBox::tooltip))
    };

    view! {
        <div style="position:relative;width:100%;max-width:240px">
            <canvas
                node_ref=canvas_ref
                style=move || {
                    let glow = if overlay.hovered_read.get().is_some() { ";box-shadow:0 0 0 4px #ffd4d4" } else { "" };
                    format!(
                        "width:100%;max-width:240px;max-height:180px;height:auto;border-radius:12px;border:2px solid #bbb;background:#fff;margin:0 auto;display:block;cursor:pointer{glow}",
                    )
                }
                on:mousemove=make_on_mousemove(overlay, boxes)
                on:mouseleave=make_on_mouseleave(overlay)
                on:click=make_on_click(overlay, boxes, move |b, acked| on_toggle.run((b, acked)))
            ></canvas>
            <Show when=move || tooltip().is_some()>
                <div
                    class="overlay-tooltip"
                    style="position:absolute;top:-30px;left:50%;transform:translateX(-50%);background:#fff;color:#b91c1c;border:1px solid #fca5a5;border-radius:6px;padding:2px 8px;font-size:12px;white-space:nowrap;pointer-events:none"
                >
                    {move || tooltip().unwrap_or_default()}
                </div>
            </Show>
        </div>
    }
}
