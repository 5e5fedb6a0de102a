//! Image Utilities
//!
//! Data URL handling plus canvas based rotate and crop helpers.

use std::f64::consts::PI;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use js_sys::{Function, Promise, Uint8Array};
use leptos_overlay::PixelRect;
use thiserror::Error;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, File, FileReader, HtmlCanvasElement, HtmlImageElement};

use crate::geometry::rotated_size;
use crate::models::CroppedLabel;

#[derive(Debug, Error)]
pub enum ImagingError {
    #[error("neplatná data URL")]
    InvalidDataUrl,
    #[error("base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("obrázok sa nepodarilo načítať")]
    Load,
    #[error("No 2D context")]
    NoContext,
    #[error("{0}")]
    Js(String),
}

impl From<JsValue> for ImagingError {
    fn from(value: JsValue) -> Self {
        ImagingError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

// ========================
// Data URLs
// ========================

#[derive(Debug, Clone, PartialEq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DataUrl {
    /// Parse `data:<mime>;base64,<body>`; the mime type defaults to PNG
    pub fn parse(url: &str) -> Result<Self, ImagingError> {
        let (header, body) = url.split_once(',').ok_or(ImagingError::InvalidDataUrl)?;
        let mime = header
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .filter(|m| !m.is_empty())
            .unwrap_or("image/png");
        let bytes = STANDARD.decode(body.trim())?;
        Ok(Self {
            mime: mime.to_string(),
            bytes,
        })
    }
}

/// Base64 part of a data URL
pub fn base64_body(url: &str) -> Option<&str> {
    url.split_once(',').map(|(_, body)| body)
}

// ========================
// Browser helpers
// ========================

/// Read a picked file into a data URL
pub async fn read_file_as_data_url(file: &File) -> Result<String, ImagingError> {
    let reader = FileReader::new()?;
    let done = Promise::new(&mut |resolve: Function, reject: Function| {
        let ok_reader = reader.clone();
        let onload = Closure::once_into_js(move || {
            let _ = resolve.call1(&JsValue::NULL, &ok_reader.result().unwrap_or(JsValue::NULL));
        });
        let onerror = Closure::once_into_js(move || {
            let _ = reject.call0(&JsValue::NULL);
        });
        reader.set_onload(Some(onload.unchecked_ref()));
        reader.set_onerror(Some(onerror.unchecked_ref()));
    });
    reader.read_as_data_url(file)?;
    JsFuture::from(done)
        .await?
        .as_string()
        .ok_or(ImagingError::InvalidDataUrl)
}

/// Raw bytes of a picked file
pub async fn read_file_bytes(file: &File) -> Result<Vec<u8>, ImagingError> {
    let buffer = JsFuture::from(file.array_buffer()).await?;
    Ok(Uint8Array::new(&buffer).to_vec())
}

/// Resolves once the image has decoded
pub async fn load_image(src: &str) -> Result<HtmlImageElement, ImagingError> {
    let img = HtmlImageElement::new()?;
    let loaded = Promise::new(&mut |resolve: Function, reject: Function| {
        let onload = Closure::once_into_js(move || {
            let _ = resolve.call0(&JsValue::NULL);
        });
        let onerror = Closure::once_into_js(move || {
            let _ = reject.call0(&JsValue::NULL);
        });
        img.set_onload(Some(onload.unchecked_ref()));
        img.set_onerror(Some(onerror.unchecked_ref()));
    });
    // backend images are drawn onto canvases that get exported
    img.set_cross_origin(Some("anonymous"));
    img.set_src(src);
    JsFuture::from(loaded).await.map_err(|_| ImagingError::Load)?;
    Ok(img)
}

fn new_canvas(width: u32, height: u32) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), ImagingError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or(ImagingError::NoContext)?;
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| ImagingError::NoContext)?;
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx = canvas
        .get_context("2d")?
        .ok_or(ImagingError::NoContext)?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| ImagingError::NoContext)?;
    Ok((canvas, ctx))
}

/// Rotate clockwise by `degrees`; returns a PNG data URL
pub async fn rotate_image(src: &str, degrees: i32) -> Result<String, ImagingError> {
    let img = load_image(src).await?;
    let (nw, nh) = (img.natural_width(), img.natural_height());
    let (w, h) = rotated_size(nw, nh, degrees);
    let (canvas, ctx) = new_canvas(w, h)?;
    ctx.save();
    ctx.translate(w as f64 / 2.0, h as f64 / 2.0)?;
    ctx.rotate(degrees as f64 * PI / 180.0)?;
    ctx.draw_image_with_html_image_element(&img, -(nw as f64) / 2.0, -(nh as f64) / 2.0)?;
    ctx.restore();
    Ok(canvas.to_data_url_with_type("image/png")?)
}

/// Copy a natural-pixel region, optionally resampled to `output` size
pub fn crop_image(
    img: &HtmlImageElement,
    rect: PixelRect,
    output: Option<(u32, u32)>,
) -> Result<String, ImagingError> {
    let (dw, dh) = output.unwrap_or((rect.width, rect.height));
    let (canvas, ctx) = new_canvas(dw, dh)?;
    ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
        img,
        rect.x as f64,
        rect.y as f64,
        rect.width as f64,
        rect.height as f64,
        0.0,
        0.0,
        dw as f64,
        dh as f64,
    )?;
    Ok(canvas.to_data_url_with_type("image/png")?)
}

/// One PNG per grid cell
pub async fn crop_to_grid(src: &str, cells: &[PixelRect]) -> Result<Vec<CroppedLabel>, ImagingError> {
    let img = load_image(src).await?;
    cells
        .iter()
        .map(|cell| {
            Ok(CroppedLabel {
                url: crop_image(&img, *cell, None)?,
                w: cell.width,
                h: cell.height,
                ok: None,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_url() {
        let url = DataUrl::parse("data:image/jpeg;base64,AAEC/w==").unwrap();
        assert_eq!(url.mime, "image/jpeg");
        assert_eq!(url.bytes, vec![0, 1, 2, 255]);
    }

    #[test]
    fn test_parse_defaults_to_png() {
        let url = DataUrl::parse("data:;base64,aGk=").unwrap();
        assert_eq!(url.mime, "image/png");
        assert_eq!(url.bytes, b"hi".to_vec());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(DataUrl::parse("no comma here"), Err(ImagingError::InvalidDataUrl)));
        assert!(matches!(DataUrl::parse("data:image/png;base64,@@@"), Err(ImagingError::Base64(_))));
    }

    #[test]
    fn test_base64_body() {
        assert_eq!(base64_body("data:image/png;base64,QUJD"), Some("QUJD"));
        assert_eq!(base64_body("QUJD"), None);
    }
}
