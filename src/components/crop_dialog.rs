//! Crop Dialog
//!
//! Modal with a crop box over a scaled image. The box is moved or drawn with
//! the mouse; confirming copies the selected natural-pixel region.

use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_overlay::{
    create_crop_signals, fit_scale, make_on_crop_mousedown, make_on_crop_mousemove,
    make_on_crop_mouseup, paint_crop_surface, Bounds, CropMode, CropRect, PixelRect,
};
use tracing::{error, warn};
use web_sys::HtmlImageElement;

use crate::imaging::{crop_image, load_image};

/// Where the crop box starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InitialBox {
    /// Natural-pixel size, centred
    Natural(u32, u32),
    /// Whole image
    Full,
    /// Centred box of the given width / height ratio
    Aspect(f64),
}

impl InitialBox {
    fn rect(&self, scale: f64, bounds: Bounds) -> CropRect {
        match *self {
            InitialBox::Natural(w, h) => CropRect::centered(w as f64 * scale, h as f64 * scale, bounds),
            InitialBox::Full => CropRect::full(bounds),
            InitialBox::Aspect(ratio) => {
                let w = (bounds.width * 0.6).min(bounds.height * 0.6 * ratio);
                CropRect::centered(w, w / ratio, bounds)
            }
        }
    }
}

/// Selected region and its PNG data URL
#[derive(Debug, Clone, PartialEq)]
pub struct CropOutcome {
    pub region: PixelRect,
    pub url: String,
}

#[component]
pub fn CropDialog(
    #[prop(into)] src: String,
    mode: CropMode,
    /// Display area the image is fitted into
    view_size: (f64, f64),
    initial: InitialBox,
    /// Resample the crop to this size
    #[prop(optional)]
    output: Option<(u32, u32)>,
    #[prop(into)] confirm_label: String,
    #[prop(into)] on_crop: Callback<CropOutcome>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let crop = create_crop_signals(mode);
    let canvas_ref = NodeRef::<html::Canvas>::new();
    let image = RwSignal::new_local(None::<HtmlImageElement>);
    let scale = RwSignal::new(1.0_f64);
    let (load_error, set_load_error) = signal(false);

    spawn_local(async move {
        match load_image(&src).await {
            Ok(img) => {
                let natural = Bounds::new(img.natural_width() as f64, img.natural_height() as f64);
                let s = fit_scale(natural, Bounds::new(view_size.0, view_size.1));
                let bounds = Bounds::new((natural.width * s).round(), (natural.height * s).round());
                scale.set(s);
                crop.bounds.set(bounds);
                crop.rect.set(initial.rect(s, bounds));
                image.set(Some(img));
            }
            Err(err) => {
                error!("crop image failed to load: {}", err);
                set_load_error.set(true);
            }
        }
    });

    Effect::new(move |_| {
        let rect = crop.rect.get();
        let s = scale.get();
        let Some(canvas) = canvas_ref.get() else {
            return;
        };
        image.with(|img| {
            if let Some(img) = img {
                if let Err(err) = paint_crop_surface(&canvas, img, s, &rect) {
                    warn!("crop repaint failed: {:?}", err);
                }
            }
        });
    });

    let confirm = move |_| {
        let rect = crop.rect.get_untracked();
        if rect.is_empty() {
            return;
        }
        let mut region = rect.to_natural(scale.get_untracked());
        let result = image.with_untracked(|img| {
            img.as_ref().map(|img| {
                // fixed boxes keep the exact requested size
                if let (CropMode::Fixed, InitialBox::Natural(w, h)) = (mode, initial) {
                    region.width = w.min(img.natural_width());
                    region.height = h.min(img.natural_height());
                    region.x = region.x.min(img.natural_width() - region.width);
                    region.y = region.y.min(img.natural_height() - region.height);
                }
                crop_image(img, region, output)
            })
        });
        match result {
            Some(Ok(url)) => on_crop.run(CropOutcome { region, url }),
            Some(Err(err)) => error!("crop failed: {}", err),
            None => {}
        }
    };

    view! {
        <div
            class="crop-dialog-backdrop"
            style="position:fixed;inset:0;background:rgba(0,0,0,0.6);display:flex;align-items:center;justify-content:center;z-index:50"
        >
            <div style="background:#fff;padding:24px;border-radius:8px;box-shadow:0 10px 30px rgba(0,0,0,0.3)">
                <div style=format!(
                    "width:{}px;height:{}px;display:flex;align-items:center;justify-content:center;background:#f1f5f9",
                    view_size.0,
                    view_size.1,
                )>
                    <Show
                        when=move || !load_error.get()
                        fallback=|| view! { <p style="color:#dc2626">"Obrázok sa nepodarilo načítať"</p> }
                    >
                        <canvas
                            node_ref=canvas_ref
                            style=move || {
                                if crop.gesture.get().is_some() { "cursor:grabbing" } else { "cursor:move" }
                            }
                            on:mousedown=make_on_crop_mousedown(crop)
                            on:mousemove=make_on_crop_mousemove(crop)
                            on:mouseup=make_on_crop_mouseup(crop)
                            on:mouseleave=make_on_crop_mouseup(crop)
                        ></canvas>
                    </Show>
                </div>
                <div style="display:flex;gap:8px;margin-top:16px">
                    <button
                        type="button"
                        style="background:#16a34a;color:#fff;padding:8px 16px;border-radius:6px"
                        on:click=confirm
                    >
                        {confirm_label}
                    </button>
                    <button
                        type="button"
                        style="background:#9ca3af;color:#fff;padding:8px 16px;border-radius:6px"
                        on:click=move |_| on_cancel.run(())
                    >
                        "Zrušiť"
                    </button>
                </div>
            </div>
        </div>
    }
}
