//! Leptos Overlay Utilities
//!
//! Canvas overlays for Leptos using mouse events: error boxes drawn over an
//! image with hover highlighting and click-to-acknowledge, plus a draggable
//! crop box.

mod geometry;

use std::collections::HashSet;

use leptos::prelude::*;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, MouseEvent};

pub use geometry::{
    apply_gesture, begin_gesture, client_to_canvas, fit_scale, hit_test, Bounds, BoxKind,
    ClientRect, CropGesture, CropMode, CropRect, OverlayBox, PixelRect,
};

const ERROR_COLOR: &str = "#d91e18";
const ACK_COLOR: &str = "#20c997";

/// Overlay state signals. Hover is per canvas, acknowledgements are shared.
#[derive(Clone, Copy)]
pub struct OverlaySignals {
    pub hovered_read: ReadSignal<Option<String>>,
    pub hovered_write: WriteSignal<Option<String>>,
    pub acknowledged: RwSignal<HashSet<String>>,
}

pub fn create_overlay_signals(acknowledged: RwSignal<HashSet<String>>) -> OverlaySignals {
    let (hovered_read, hovered_write) = signal(None::<String>);
    OverlaySignals {
        hovered_read,
        hovered_write,
        acknowledged,
    }
}

/// Flip acknowledgement of a box; returns true when it is now acknowledged
pub fn toggle_acknowledged(acknowledged: RwSignal<HashSet<String>>, box_id: &str) -> bool {
    let mut now_acked = false;
    acknowledged.update(|set| {
        if !set.remove(box_id) {
            set.insert(box_id.to_string());
            now_acked = true;
        }
    });
    now_acked
}

/// Mouse position in canvas pixels for an event fired on a canvas
pub fn event_canvas_point(ev: &MouseEvent) -> Option<(f64, f64)> {
    let canvas = ev.target()?.dyn_into::<HtmlCanvasElement>().ok()?;
    let rect = canvas.get_bounding_client_rect();
    client_to_canvas(
        ev.client_x() as f64,
        ev.client_y() as f64,
        ClientRect {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            height: rect.height(),
        },
        canvas.width() as f64,
        canvas.height() as f64,
    )
}

/// Create mousemove handler that tracks the hovered box
pub fn make_on_mousemove(
    overlay: OverlaySignals,
    boxes: Signal<Vec<OverlayBox>>,
) -> impl Fn(MouseEvent) + Copy + 'static {
    move |ev: MouseEvent| {
        let found = event_canvas_point(&ev).and_then(|(x, y)| {
            boxes.with_untracked(|list| hit_test(list, x, y).map(|b| b.id()))
        });
        if overlay.hovered_read.get_untracked() != found {
            overlay.hovered_write.set(found);
        }
    }
}

/// Create mouseleave handler
pub fn make_on_mouseleave(overlay: OverlaySignals) -> impl Fn(MouseEvent) + Copy + 'static {
    move |_ev: MouseEvent| {
        overlay.hovered_write.set(None);
    }
}

/// Create click handler: toggles acknowledgement of the clicked box and
/// reports it together with the new state
pub fn make_on_click<F>(
    overlay: OverlaySignals,
    boxes: Signal<Vec<OverlayBox>>,
    on_toggle: F,
) -> impl Fn(MouseEvent) + Clone + 'static
where
    F: Fn(OverlayBox, bool) + Clone + 'static,
{
    move |ev: MouseEvent| {
        let Some((x, y)) = event_canvas_point(&ev) else {
            return;
        };
        let hit = boxes.with_untracked(|list| hit_test(list, x, y).cloned());
        if let Some(b) = hit {
            let now_acked = toggle_acknowledged(overlay.acknowledged, &b.id());
            on_toggle(b, now_acked);
        }
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("No 2D context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| JsValue::from_str("No 2D context"))
}

/// Draw the image at natural size with every box on top
pub fn paint_overlay(
    canvas: &HtmlCanvasElement,
    image: &HtmlImageElement,
    boxes: &[OverlayBox],
    acknowledged: &HashSet<String>,
    hovered: Option<&str>,
) -> Result<(), JsValue> {
    let ctx = context_2d(canvas)?;
    canvas.set_width(image.natural_width());
    canvas.set_height(image.natural_height());
    ctx.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
    ctx.draw_image_with_html_image_element(image, 0.0, 0.0)?;

    for b in boxes {
        let id = b.id();
        let ack = acknowledged.contains(&id);
        let is_hovered = hovered == Some(id.as_str());

        ctx.save();
        ctx.set_global_alpha(1.0);
        ctx.set_stroke_style_str(if ack { ACK_COLOR } else { ERROR_COLOR });
        ctx.set_line_width(if is_hovered { 18.0 } else { 12.0 });
        if b.kind == BoxKind::Ocr && !ack {
            let dash = js_sys::Array::of2(&JsValue::from_f64(7.0), &JsValue::from_f64(7.0));
            ctx.set_line_dash(&dash)?;
        }
        ctx.stroke_rect(b.x, b.y, b.w, b.h);

        if is_hovered {
            ctx.set_global_alpha(0.24);
            ctx.set_fill_style_str(ERROR_COLOR);
            ctx.fill_rect(b.x, b.y, b.w, b.h);
            ctx.set_global_alpha(1.0);
        }

        ctx.set_font("bold 14px Arial");
        if ack {
            ctx.set_fill_style_str(ACK_COLOR);
            ctx.fill_text("AKCEPT.", b.x + 4.0, b.y + 18.0)?;
        } else if let Some(err) = b.error.as_deref() {
            ctx.set_fill_style_str(ERROR_COLOR);
            ctx.fill_text(err, b.x + 2.0, b.y + 18.0)?;
        }
        ctx.restore();
    }
    Ok(())
}

// ========================
// Crop Box
// ========================

/// Crop surface state signals
#[derive(Clone, Copy)]
pub struct CropSignals {
    pub rect: RwSignal<CropRect>,
    pub gesture: RwSignal<Option<CropGesture>>,
    pub bounds: RwSignal<Bounds>,
    pub mode: CropMode,
}

pub fn create_crop_signals(mode: CropMode) -> CropSignals {
    CropSignals {
        rect: RwSignal::new(CropRect::default()),
        gesture: RwSignal::new(None),
        bounds: RwSignal::new(Bounds::new(0.0, 0.0)),
        mode,
    }
}

/// Create mousedown handler for the crop canvas
pub fn make_on_crop_mousedown(crop: CropSignals) -> impl Fn(MouseEvent) + Copy + 'static {
    move |ev: MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        if let Some((x, y)) = event_canvas_point(&ev) {
            ev.prevent_default();
            let rect = crop.rect.get_untracked();
            crop.gesture.set(Some(begin_gesture(crop.mode, &rect, x, y)));
        }
    }
}

/// Create mousemove handler for the crop canvas
pub fn make_on_crop_mousemove(crop: CropSignals) -> impl Fn(MouseEvent) + Copy + 'static {
    move |ev: MouseEvent| {
        let Some(mut gesture) = crop.gesture.get_untracked() else {
            return;
        };
        let Some((x, y)) = event_canvas_point(&ev) else {
            return;
        };
        let rect = crop.rect.get_untracked();
        let next = apply_gesture(&mut gesture, crop.mode, &rect, x, y, crop.bounds.get_untracked());
        crop.gesture.set(Some(gesture));
        if next != rect {
            crop.rect.set(next);
        }
    }
}

/// Create mouseup / mouseleave handler ending the gesture
pub fn make_on_crop_mouseup(crop: CropSignals) -> impl Fn(MouseEvent) + Copy + 'static {
    move |_ev: MouseEvent| {
        crop.gesture.set(None);
    }
}

/// Draw the scaled image, shade everything outside the crop box and outline it
pub fn paint_crop_surface(
    canvas: &HtmlCanvasElement,
    image: &HtmlImageElement,
    scale: f64,
    rect: &CropRect,
) -> Result<(), JsValue> {
    let ctx = context_2d(canvas)?;
    let width = (image.natural_width() as f64 * scale).round();
    let height = (image.natural_height() as f64 * scale).round();
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);
    ctx.clear_rect(0.0, 0.0, width, height);
    ctx.draw_image_with_html_image_element_and_dw_and_dh(image, 0.0, 0.0, width, height)?;

    ctx.save();
    ctx.set_fill_style_str("rgba(0, 0, 0, 0.45)");
    ctx.fill_rect(0.0, 0.0, width, rect.y);
    ctx.fill_rect(0.0, rect.y + rect.h, width, height - rect.y - rect.h);
    ctx.fill_rect(0.0, rect.y, rect.x, rect.h);
    ctx.fill_rect(rect.x + rect.w, rect.y, width - rect.x - rect.w, rect.h);

    ctx.set_stroke_style_str("#39f");
    ctx.set_line_width(2.0);
    let dash = js_sys::Array::of2(&JsValue::from_f64(6.0), &JsValue::from_f64(4.0));
    ctx.set_line_dash(&dash)?;
    ctx.stroke_rect(rect.x, rect.y, rect.w, rect.h);
    ctx.restore();
    Ok(())
}
