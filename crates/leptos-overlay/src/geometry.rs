//! Overlay Geometry
//!
//! Pure math behind the overlay canvas: error boxes, hit testing, mapping
//! client coordinates into canvas pixels, and crop-box gestures.

/// What an overlay box marks on a label
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoxKind {
    Barcode,
    Ocr,
}

impl BoxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoxKind::Barcode => "barcode",
            BoxKind::Ocr => "ocr",
        }
    }
}

/// An error rectangle in image pixels
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub kind: BoxKind,
    /// 1-based label the box belongs to
    pub label_index: u32,
    pub error: Option<String>,
    pub master_text: Option<String>,
    pub scan_text: Option<String>,
}

impl OverlayBox {
    pub fn new(kind: BoxKind, label_index: u32, x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x,
            y,
            w,
            h,
            kind,
            label_index,
            error: None,
            master_text: None,
            scan_text: None,
        }
    }

    /// Stable identity used for hover and acknowledgement tracking
    pub fn id(&self) -> String {
        format!("{}-{}-{}-{}", self.label_index, self.x, self.y, self.kind.as_str())
    }

    /// Edges are inclusive
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }

    pub fn tooltip(&self) -> String {
        match (&self.error, self.kind) {
            (Some(err), _) if !err.is_empty() => err.clone(),
            (_, BoxKind::Barcode) => "Chyba čiarového kódu".to_string(),
            (_, BoxKind::Ocr) => "Chyba textu".to_string(),
        }
    }
}

/// First box containing the point
pub fn hit_test(boxes: &[OverlayBox], x: f64, y: f64) -> Option<&OverlayBox> {
    boxes.iter().find(|b| b.contains(x, y))
}

/// Element rectangle as reported by `getBoundingClientRect`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Map a mouse position into canvas pixel space (the canvas may be CSS-scaled)
pub fn client_to_canvas(
    client_x: f64,
    client_y: f64,
    rect: ClientRect,
    canvas_width: f64,
    canvas_height: f64,
) -> Option<(f64, f64)> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }
    Some((
        (client_x - rect.left) * canvas_width / rect.width,
        (client_y - rect.top) * canvas_height / rect.height,
    ))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Scale that fits `natural` inside `container`, preserving aspect ratio
pub fn fit_scale(natural: Bounds, container: Bounds) -> f64 {
    if natural.width <= 0.0 || natural.height <= 0.0 {
        return 1.0;
    }
    (container.width / natural.width).min(container.height / natural.height)
}

/// Integer rectangle in natural image pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Crop box in display (canvas) coordinates
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl CropRect {
    pub fn full(bounds: Bounds) -> Self {
        Self { x: 0.0, y: 0.0, w: bounds.width, h: bounds.height }
    }

    /// Box of the requested size centred in the bounds, shrunk to fit
    pub fn centered(w: f64, h: f64, bounds: Bounds) -> Self {
        let w = w.min(bounds.width).max(0.0);
        let h = h.min(bounds.height).max(0.0);
        Self {
            x: (bounds.width - w) / 2.0,
            y: (bounds.height - h) / 2.0,
            w,
            h,
        }
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }

    pub fn is_empty(&self) -> bool {
        self.w < 1.0 || self.h < 1.0
    }

    /// Move by a delta without leaving the bounds
    pub fn translated(&self, dx: f64, dy: f64, bounds: Bounds) -> Self {
        let max_x = (bounds.width - self.w).max(0.0);
        let max_y = (bounds.height - self.h).max(0.0);
        Self {
            x: (self.x + dx).clamp(0.0, max_x),
            y: (self.y + dy).clamp(0.0, max_y),
            ..*self
        }
    }

    /// Rectangle spanned from an anchor to the pointer, optionally locked to
    /// `aspect` (width / height)
    pub fn from_corners(
        anchor: (f64, f64),
        pointer: (f64, f64),
        aspect: Option<f64>,
        bounds: Bounds,
    ) -> Self {
        let (ax, ay) = (anchor.0.clamp(0.0, bounds.width), anchor.1.clamp(0.0, bounds.height));
        let (px, py) = (pointer.0.clamp(0.0, bounds.width), pointer.1.clamp(0.0, bounds.height));
        let dir_x = if px >= ax { 1.0 } else { -1.0 };
        let dir_y = if py >= ay { 1.0 } else { -1.0 };
        let room_x = if dir_x > 0.0 { bounds.width - ax } else { ax };
        let room_y = if dir_y > 0.0 { bounds.height - ay } else { ay };

        let mut w = (px - ax).abs();
        let mut h = (py - ay).abs();
        if let Some(ratio) = aspect.filter(|r| *r > 0.0) {
            h = w / ratio;
            if h > room_y {
                h = room_y;
                w = h * ratio;
            }
            w = w.min(room_x);
        }

        let x = if dir_x > 0.0 { ax } else { ax - w };
        let y = if dir_y > 0.0 { ay } else { ay - h };
        Self { x, y, w, h }
    }

    /// Convert display coordinates back to natural pixels
    pub fn to_natural(&self, scale: f64) -> PixelRect {
        let scale = if scale > 0.0 { scale } else { 1.0 };
        PixelRect {
            x: (self.x / scale).round().max(0.0) as u32,
            y: (self.y / scale).round().max(0.0) as u32,
            width: (self.w / scale).round().max(0.0) as u32,
            height: (self.h / scale).round().max(0.0) as u32,
        }
    }
}

/// How the crop box may change
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CropMode {
    /// Fixed size, can only be moved
    Fixed,
    /// Any rectangle
    Free,
    /// Locked width / height ratio
    Aspect(f64),
}

/// Gesture in progress on the crop surface
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CropGesture {
    Move { last_x: f64, last_y: f64 },
    Draw { anchor_x: f64, anchor_y: f64 },
}

/// Pressing inside the box (or anywhere in fixed mode) moves it, elsewhere
/// starts a new box
pub fn begin_gesture(mode: CropMode, rect: &CropRect, x: f64, y: f64) -> CropGesture {
    if mode == CropMode::Fixed || rect.contains(x, y) {
        CropGesture::Move { last_x: x, last_y: y }
    } else {
        CropGesture::Draw { anchor_x: x, anchor_y: y }
    }
}

/// Apply pointer movement; returns the updated box
pub fn apply_gesture(
    gesture: &mut CropGesture,
    mode: CropMode,
    rect: &CropRect,
    x: f64,
    y: f64,
    bounds: Bounds,
) -> CropRect {
    match gesture {
        CropGesture::Move { last_x, last_y } => {
            let moved = rect.translated(x - *last_x, y - *last_y, bounds);
            *last_x = x;
            *last_y = y;
            moved
        }
        CropGesture::Draw { anchor_x, anchor_y } => {
            let aspect = match mode {
                CropMode::Aspect(ratio) => Some(ratio),
                _ => None,
            };
            CropRect::from_corners((*anchor_x, *anchor_y), (x, y), aspect, bounds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ocr_box(x: f64, y: f64) -> OverlayBox {
        OverlayBox::new(BoxKind::Ocr, 2, x, y, 10.0, 5.0)
    }

    #[test]
    fn test_box_id_format() {
        let b = OverlayBox::new(BoxKind::Barcode, 3, 12.0, 40.5, 8.0, 8.0);
        assert_eq!(b.id(), "3-12-40.5-barcode");
    }

    #[test]
    fn test_hit_test_inclusive_edges_first_match() {
        let boxes = vec![ocr_box(0.0, 0.0), ocr_box(5.0, 0.0)];
        assert_eq!(hit_test(&boxes, 10.0, 5.0).map(|b| b.x), Some(0.0));
        assert_eq!(hit_test(&boxes, 14.0, 2.0).map(|b| b.x), Some(5.0));
        assert!(hit_test(&boxes, 16.0, 2.0).is_none());
    }

    #[test]
    fn test_tooltip_defaults() {
        let mut b = OverlayBox::new(BoxKind::Barcode, 1, 0.0, 0.0, 1.0, 1.0);
        assert_eq!(b.tooltip(), "Chyba čiarového kódu");
        b.error = Some("EAN checksum".to_string());
        assert_eq!(b.tooltip(), "EAN checksum");
        assert_eq!(ocr_box(0.0, 0.0).tooltip(), "Chyba textu");
    }

    #[test]
    fn test_client_to_canvas_scales() {
        let rect = ClientRect { left: 100.0, top: 50.0, width: 240.0, height: 180.0 };
        let (x, y) = client_to_canvas(220.0, 140.0, rect, 480.0, 360.0).unwrap();
        assert_eq!((x, y), (240.0, 180.0));
        let collapsed = ClientRect { width: 0.0, ..rect };
        assert!(client_to_canvas(0.0, 0.0, collapsed, 480.0, 360.0).is_none());
    }

    #[test]
    fn test_centered_shrinks_to_bounds() {
        let r = CropRect::centered(340.0, 227.0, Bounds::new(600.0, 200.0));
        assert_eq!(r, CropRect { x: 130.0, y: 0.0, w: 340.0, h: 200.0 });
    }

    #[test]
    fn test_translate_is_clamped() {
        let bounds = Bounds::new(100.0, 100.0);
        let r = CropRect { x: 10.0, y: 10.0, w: 50.0, h: 50.0 };
        assert_eq!(r.translated(100.0, -30.0, bounds), CropRect { x: 50.0, y: 0.0, w: 50.0, h: 50.0 });
    }

    #[test]
    fn test_from_corners_free_and_reversed() {
        let bounds = Bounds::new(200.0, 100.0);
        let r = CropRect::from_corners((50.0, 60.0), (10.0, 20.0), None, bounds);
        assert_eq!(r, CropRect { x: 10.0, y: 20.0, w: 40.0, h: 40.0 });
    }

    #[test]
    fn test_from_corners_aspect_limited_by_room() {
        let bounds = Bounds::new(200.0, 100.0);
        // 2:1 from (0, 60): width 160 would need height 80, only 40 remains
        let r = CropRect::from_corners((0.0, 60.0), (160.0, 70.0), Some(2.0), bounds);
        assert_eq!(r, CropRect { x: 0.0, y: 60.0, w: 80.0, h: 40.0 });
    }

    #[test]
    fn test_to_natural_rounds() {
        let r = CropRect { x: 15.0, y: 7.5, w: 150.0, h: 100.0 };
        assert_eq!(
            r.to_natural(0.5),
            PixelRect { x: 30, y: 15, width: 300, height: 200 }
        );
    }

    #[test]
    fn test_fixed_mode_always_moves() {
        let rect = CropRect { x: 10.0, y: 10.0, w: 20.0, h: 20.0 };
        let bounds = Bounds::new(100.0, 100.0);
        let mut g = begin_gesture(CropMode::Fixed, &rect, 80.0, 80.0);
        let moved = apply_gesture(&mut g, CropMode::Fixed, &rect, 85.0, 90.0, bounds);
        assert_eq!(moved, CropRect { x: 15.0, y: 20.0, w: 20.0, h: 20.0 });

        let mut g = begin_gesture(CropMode::Free, &rect, 80.0, 80.0);
        let drawn = apply_gesture(&mut g, CropMode::Free, &rect, 90.0, 95.0, bounds);
        assert_eq!(drawn, CropRect { x: 80.0, y: 80.0, w: 10.0, h: 15.0 });
    }

    #[test]
    fn test_fit_scale() {
        assert_eq!(fit_scale(Bounds::new(1200.0, 400.0), Bounds::new(600.0, 400.0)), 0.5);
        assert_eq!(fit_scale(Bounds::new(0.0, 0.0), Bounds::new(600.0, 400.0)), 1.0);
    }
}
