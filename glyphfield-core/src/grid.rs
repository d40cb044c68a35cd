/// Cell grid covering the canvas for one frame.
///
/// Columns and rows are derived from the CSS size and the effective cell size.
/// When the naive grid would exceed the cell budget, the cell size grows so
/// that the per-frame glyph count stays bounded regardless of screen size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Number of columns.
    pub cols: u32,
    /// Number of rows.
    pub rows: u32,
    /// Effective cell size in CSS pixels.
    pub cell_size: f64,
    /// True if the cell size was scaled up to respect the budget.
    pub density_corrected: bool,
}

impl GridLayout {
    /// Computes the grid for a CSS-sized canvas.
    ///
    /// A non-positive `cell_size` is treated as 1px and a zero `max_cells` as 1.
    pub fn compute(css_width: u32, css_height: u32, cell_size: f64, max_cells: u32) -> Self {
        let max_cells = u64::from(max_cells.max(1));
        let mut cell = if cell_size.is_finite() && cell_size > 0.0 { cell_size } else { 1.0 };

        let naive = cell_count(css_width, css_height, cell);
        let density_corrected = naive > max_cells;

        if density_corrected {
            let scale = (naive as f64 / max_cells as f64).sqrt();
            cell = (cell * scale).ceil();

            // ceil() on cols/rows can leave a sliver of overflow
            while cell_count(css_width, css_height, cell) > max_cells {
                cell += 1.0;
            }

            tracing::debug!(
                requested = cell_size,
                effective = cell,
                naive_cells = naive,
                max_cells,
                "grid density corrected"
            );
        }

        Self {
            cols: span(css_width, cell),
            rows: span(css_height, cell),
            cell_size: cell,
            density_corrected,
        }
    }

    /// Total number of cells in the grid.
    pub fn cell_count(&self) -> u64 {
        u64::from(self.cols) * u64::from(self.rows)
    }

    /// Top-left CSS position of a cell.
    pub fn cell_origin(&self, col: u32, row: u32) -> (f64, f64) {
        (f64::from(col) * self.cell_size, f64::from(row) * self.cell_size)
    }
}

fn span(extent: u32, cell: f64) -> u32 {
    (f64::from(extent) / cell).ceil() as u32
}

fn cell_count(width: u32, height: u32, cell: f64) -> u64 {
    u64::from(span(width, cell)) * u64::from(span(height, cell))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_correction_within_budget() {
        let grid = GridLayout::compute(1024, 768, 16.0, 200_000);

        assert_eq!((grid.cols, grid.rows), (64, 48));
        assert_eq!(grid.cell_count(), 3072);
        assert_eq!(grid.cell_size, 16.0);
        assert!(!grid.density_corrected);
    }

    #[test]
    fn test_partial_cells_round_up() {
        let grid = GridLayout::compute(1000, 10, 16.0, 200_000);
        assert_eq!((grid.cols, grid.rows), (63, 1));
    }

    #[test]
    fn test_density_correction_engages() {
        // 8192x8192 at 8px would be 1024*1024 = 1_048_576 cells
        let grid = GridLayout::compute(8192, 8192, 8.0, 200_000);

        assert!(grid.density_corrected);
        assert!(grid.cell_size > 8.0);
        assert!(grid.cell_count() <= 200_000);
    }

    #[test]
    fn test_tiny_budget() {
        let grid = GridLayout::compute(1920, 1080, 10.0, 1);
        assert_eq!(grid.cell_count(), 1);

        let grid = GridLayout::compute(1920, 1080, 10.0, 0);
        assert_eq!(grid.cell_count(), 1);
    }

    #[test]
    fn test_degenerate_cell_size() {
        let grid = GridLayout::compute(10, 10, 0.0, 1000);
        assert_eq!(grid.cell_size, 1.0);
        assert_eq!(grid.cell_count(), 100);
    }

    #[test]
    fn test_cell_origin() {
        let grid = GridLayout::compute(100, 100, 10.0, 1000);
        assert_eq!(grid.cell_origin(3, 2), (30.0, 20.0));
    }
}
