//! Label Sheet Geometry
//!
//! Millimetre to pixel conversion and the grid used to cut a scanned strip
//! into individual labels.

use leptos_overlay::PixelRect;

const MM_PER_INCH: f64 = 25.4;

/// Upper bound for typed row and column counts
pub const MAX_GRID_COUNT: u32 = 500;

pub fn mm_to_px(mm: f64, dpi: u32) -> u32 {
    let px = (mm / MM_PER_INCH * dpi as f64).round();
    if px.is_finite() && px > 0.0 {
        px as u32
    } else {
        0
    }
}

/// Parse a millimetre form field; blank or invalid reads as 0
pub fn parse_mm(value: &str) -> f64 {
    value.trim().replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Parse a positive count form field (rows, cols), at most `MAX_GRID_COUNT`
pub fn parse_count(value: &str) -> Option<u32> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|v| (1..=MAX_GRID_COUNT).contains(v))
}

/// Size of an image after rotating it by `degrees`
pub fn rotated_size(width: u32, height: u32, degrees: i32) -> (u32, u32) {
    if degrees.rem_euclid(180) != 0 {
        (height, width)
    } else {
        (width, height)
    }
}

/// Label cutting parameters, all in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    pub rows: u32,
    pub cols: u32,
    pub cell_width: u32,
    pub cell_height: u32,
    pub gap_x: u32,
    pub gap_y: u32,
}

/// Cells in row-major order; cell (r, c) starts at
/// `(c * (w + gap_x), r * (h + gap_y))`; offsets saturate at `u32::MAX`
pub fn grid_cells(spec: &GridSpec) -> Vec<PixelRect> {
    let rows = spec.rows.min(MAX_GRID_COUNT);
    let cols = spec.cols.min(MAX_GRID_COUNT);
    let step_x = spec.cell_width.saturating_add(spec.gap_x);
    let step_y = spec.cell_height.saturating_add(spec.gap_y);
    let mut cells = Vec::with_capacity((rows * cols) as usize);
    for r in 0..rows {
        for c in 0..cols {
            cells.push(PixelRect {
                x: c.saturating_mul(step_x),
                y: r.saturating_mul(step_y),
                width: spec.cell_width,
                height: spec.cell_height,
            });
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_to_px_default_dpi() {
        assert_eq!(mm_to_px(90.0, 96), 340);
        assert_eq!(mm_to_px(60.0, 96), 227);
        assert_eq!(mm_to_px(0.0, 96), 0);
        assert_eq!(mm_to_px(25.4, 300), 300);
    }

    #[test]
    fn test_parse_fields() {
        assert_eq!(parse_mm(" 2,5 "), 2.5);
        assert_eq!(parse_mm("abc"), 0.0);
        assert_eq!(parse_count("3"), Some(3));
        assert_eq!(parse_count("0"), None);
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("500"), Some(500));
        assert_eq!(parse_count("501"), None);
        assert_eq!(parse_count("4294967295"), None);
    }

    #[test]
    fn test_rotated_size() {
        assert_eq!(rotated_size(400, 300, 90), (300, 400));
        assert_eq!(rotated_size(400, 300, 180), (400, 300));
        assert_eq!(rotated_size(400, 300, -90), (300, 400));
    }

    #[test]
    fn test_grid_cells_with_gaps() {
        let spec = GridSpec { rows: 2, cols: 3, cell_width: 100, cell_height: 50, gap_x: 10, gap_y: 4 };
        let cells = grid_cells(&spec);
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], PixelRect { x: 0, y: 0, width: 100, height: 50 });
        assert_eq!(cells[2], PixelRect { x: 220, y: 0, width: 100, height: 50 });
        assert_eq!(cells[4], PixelRect { x: 110, y: 54, width: 100, height: 50 });
    }

    #[test]
    fn test_grid_cells_huge_values_saturate() {
        let spec = GridSpec {
            rows: u32::MAX,
            cols: 2,
            cell_width: u32::MAX,
            cell_height: 10,
            gap_x: 5,
            gap_y: u32::MAX,
        };
        let cells = grid_cells(&spec);
        assert_eq!(cells.len(), (MAX_GRID_COUNT * 2) as usize);
        assert_eq!(cells[1].x, u32::MAX);
        assert_eq!(cells[2].y, u32::MAX);
    }
}
