//! Compare Form Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity over the compare
//! workflow parameters.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::config::{
    DEFAULT_DPI, DEFAULT_GAP_MM, DEFAULT_LABEL_HEIGHT_MM, DEFAULT_LABEL_WIDTH_MM, MAX_DPI, MIN_DPI,
};
use crate::geometry::{mm_to_px, parse_count, parse_mm, GridSpec};
use crate::models::{CropSize, MasterMeta};

/// Where the master comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Parameters typed in, master uploaded and saved
    #[default]
    Manual,
    /// Stored master loaded from the backend
    Disk,
}

/// Compare form parameters with field-level reactivity
#[derive(Clone, Debug, PartialEq, Store)]
pub struct CompareParams {
    pub input_mode: InputMode,
    pub product_number: String,
    /// Product field was left or a submit was attempted
    pub product_touched: bool,
    pub spool_number: String,
    pub rows: String,
    pub cols: String,
    pub label_width_mm: String,
    pub label_height_mm: String,
    pub horizontal_gap_mm: String,
    pub vertical_gap_mm: String,
    pub dpi: u32,
}

impl Default for CompareParams {
    fn default() -> Self {
        Self {
            input_mode: InputMode::Manual,
            product_number: String::new(),
            product_touched: false,
            spool_number: String::new(),
            rows: String::new(),
            cols: String::new(),
            label_width_mm: DEFAULT_LABEL_WIDTH_MM.to_string(),
            label_height_mm: DEFAULT_LABEL_HEIGHT_MM.to_string(),
            horizontal_gap_mm: DEFAULT_GAP_MM.to_string(),
            vertical_gap_mm: DEFAULT_GAP_MM.to_string(),
            dpi: DEFAULT_DPI,
        }
    }
}

impl CompareParams {
    /// Fresh form for a job's product number
    pub fn for_product(product: &str) -> Self {
        Self {
            product_number: product.to_string(),
            ..Default::default()
        }
    }

    /// Label size in pixels from the millimetre fields
    pub fn label_px(&self) -> (u32, u32) {
        (
            mm_to_px(parse_mm(&self.label_width_mm), self.dpi),
            mm_to_px(parse_mm(&self.label_height_mm), self.dpi),
        )
    }

    pub fn gap_px(&self) -> (u32, u32) {
        (
            mm_to_px(parse_mm(&self.horizontal_gap_mm), self.dpi),
            mm_to_px(parse_mm(&self.vertical_gap_mm), self.dpi),
        )
    }

    /// Grid used to cut the strip; needs rows, cols and the cropped master size
    pub fn grid_spec(&self, crop: Option<CropSize>) -> Option<GridSpec> {
        let crop = crop?;
        let (gap_x, gap_y) = self.gap_px();
        Some(GridSpec {
            rows: parse_count(&self.rows)?,
            cols: parse_count(&self.cols)?,
            cell_width: crop.w,
            cell_height: crop.h,
            gap_x,
            gap_y,
        })
    }

    pub fn product_missing(&self) -> bool {
        self.product_number.trim().is_empty()
    }

    pub fn spool_missing(&self) -> bool {
        self.spool_number.trim().is_empty()
    }

    /// Parameters saved next to the master image
    pub fn to_meta(&self, crop: Option<CropSize>, wind: &str) -> MasterMeta {
        MasterMeta {
            product_number: Some(self.product_number.trim().to_string()),
            spool_number: Some(self.spool_number.clone()),
            rows: Some(self.rows.clone()),
            cols: Some(self.cols.clone()),
            label_width_mm: Some(self.label_width_mm.clone()),
            label_height_mm: Some(self.label_height_mm.clone()),
            horizontal_gap_mm: Some(self.horizontal_gap_mm.clone()),
            vertical_gap_mm: Some(self.vertical_gap_mm.clone()),
            dpi: Some(self.dpi),
            crop_size: crop,
            wind: Some(wind.to_string()),
        }
    }

    /// Restore every parameter from stored meta, with defaults for blanks
    pub fn apply_meta(&mut self, meta: &MasterMeta) {
        fn or_default(value: &Option<String>, default: &str) -> String {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_string()
        }
        self.spool_number = or_default(&meta.spool_number, "");
        self.rows = or_default(&meta.rows, "");
        self.cols = or_default(&meta.cols, "");
        self.label_width_mm = or_default(&meta.label_width_mm, DEFAULT_LABEL_WIDTH_MM);
        self.label_height_mm = or_default(&meta.label_height_mm, DEFAULT_LABEL_HEIGHT_MM);
        self.horizontal_gap_mm = or_default(&meta.horizontal_gap_mm, DEFAULT_GAP_MM);
        self.vertical_gap_mm = or_default(&meta.vertical_gap_mm, DEFAULT_GAP_MM);
        self.dpi = meta.dpi.filter(|d| *d > 0).unwrap_or(DEFAULT_DPI);
    }
}

/// DPI input value kept within the accepted range
pub fn clamp_dpi(value: &str) -> u32 {
    value
        .trim()
        .parse::<u32>()
        .map(|d| d.clamp(MIN_DPI, MAX_DPI))
        .unwrap_or(DEFAULT_DPI)
}

/// Type alias for the store
pub type CompareStore = Store<CompareParams>;

/// Get the compare store from context
pub fn use_compare_store() -> CompareStore {
    expect_context::<CompareStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Restore form fields from a loaded master
pub fn store_apply_meta(store: &CompareStore, meta: &MasterMeta) {
    store.update(|params| params.apply_meta(meta));
}

/// Mark the product field as touched; returns the trimmed product number
pub fn store_touch_product(store: &CompareStore) -> String {
    store.product_touched().set(true);
    store.product_number().get_untracked().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = CompareParams::for_product("P-77");
        assert_eq!(p.product_number, "P-77");
        assert_eq!(p.label_px(), (340, 227));
        assert_eq!(p.gap_px(), (0, 0));
        assert!(p.spool_missing());
    }

    #[test]
    fn test_grid_spec_requires_all_inputs() {
        let mut p = CompareParams::default();
        let crop = Some(CropSize { w: 300, h: 200 });
        assert_eq!(p.grid_spec(crop), None);
        p.rows = "2".to_string();
        p.cols = "3".to_string();
        p.horizontal_gap_mm = "2.54".to_string();
        assert_eq!(p.grid_spec(None), None);
        let grid = p.grid_spec(crop).unwrap();
        assert_eq!((grid.rows, grid.cols, grid.cell_width, grid.gap_x, grid.gap_y), (2, 3, 300, 10, 0));
    }

    #[test]
    fn test_meta_round_trip_with_defaults() {
        let mut p = CompareParams::for_product("P-1");
        p.spool_number = "5".to_string();
        p.rows = "4".to_string();
        p.dpi = 300;
        let meta = p.to_meta(Some(CropSize { w: 10, h: 20 }), "A4");
        assert_eq!(meta.wind.as_deref(), Some("A4"));

        let mut loaded = CompareParams::for_product("P-1");
        loaded.apply_meta(&meta);
        assert_eq!(loaded.rows, "4");
        assert_eq!(loaded.dpi, 300);

        loaded.apply_meta(&MasterMeta::default());
        assert_eq!(loaded.label_width_mm, "90");
        assert_eq!(loaded.dpi, 96);
        assert_eq!(loaded.spool_number, "");
    }

    #[test]
    fn test_clamp_dpi() {
        assert_eq!(clamp_dpi("10"), 30);
        assert_eq!(clamp_dpi("5000"), 1200);
        assert_eq!(clamp_dpi("300"), 300);
        assert_eq!(clamp_dpi(""), 96);
    }
}
