use compact_str::CompactString;
use unicode_width::UnicodeWidthStr;

use crate::{GlyphSurface, Viewport};

/// Alpha below which a faded glyph is considered gone (one 8-bit step).
const MIN_ALPHA: f32 = 1.0 / 255.0;

#[derive(Debug, Clone, PartialEq)]
struct TextCell {
    glyph: CompactString,
    alpha: f32,
}

/// A [`GlyphSurface`] backed by a character grid.
///
/// Glyph positions are mapped onto cells of `cell_px` CSS pixels; each cell
/// keeps the last glyph drawn into it together with an alpha that fades the
/// same way a `destination-in` fill fades canvas pixels.
#[derive(Debug, Clone)]
pub struct TextSurface {
    cell_px: f64,
    cols: usize,
    rows: usize,
    cells: Vec<Option<TextCell>>,
    font: CompactString,
    fill: CompactString,
    content_ops: u64,
}

impl TextSurface {
    /// Creates an empty surface mapping `cell_px` CSS pixels to one character.
    pub fn new(cell_px: f64) -> Self {
        Self {
            cell_px: if cell_px > 0.0 { cell_px } else { 1.0 },
            cols: 0,
            rows: 0,
            cells: Vec::new(),
            font: CompactString::default(),
            fill: CompactString::default(),
            content_ops: 0,
        }
    }

    /// Grid size in characters.
    pub fn size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Font last set by the renderer.
    pub fn font(&self) -> &str {
        &self.font
    }

    /// Fill color last set by the renderer.
    pub fn fill(&self) -> &str {
        &self.fill
    }

    /// Number of operations that changed (or could have changed) the content.
    pub fn content_ops(&self) -> u64 {
        self.content_ops
    }

    /// Glyph and alpha at a cell, if anything is visible there.
    pub fn cell(&self, col: usize, row: usize) -> Option<(&str, f32)> {
        if col >= self.cols || row >= self.rows {
            return None;
        }

        self.cells[row * self.cols + col]
            .as_ref()
            .map(|c| (c.glyph.as_str(), c.alpha))
    }

    /// Number of cells holding a visible glyph.
    pub fn visible_cells(&self) -> usize {
        self.cells.iter().flatten().count()
    }

    /// Renders the grid as lines of text; glyphs fainter than
    /// `min_alpha` print as spaces.
    pub fn render(&self, min_alpha: f32) -> String {
        let mut out = String::with_capacity((self.cols + 1) * self.rows);

        for row in 0..self.rows {
            let mut col = 0;
            while col < self.cols {
                match &self.cells[row * self.cols + col] {
                    Some(cell) if cell.alpha >= min_alpha => {
                        out.push_str(&cell.glyph);
                        // wide glyphs cover the next column too
                        col += cell.glyph.width().max(1);
                    },
                    _ => {
                        out.push(' ');
                        col += 1;
                    },
                }
            }
            out.push('\n');
        }

        out
    }

    fn cell_index(&self, x: f64, y: f64) -> Option<usize> {
        if x < 0.0 || y < 0.0 {
            return None;
        }

        let col = (x / self.cell_px).floor() as usize;
        let row = (y / self.cell_px).floor() as usize;
        (col < self.cols && row < self.rows).then_some(row * self.cols + col)
    }
}

impl GlyphSurface for TextSurface {
    fn configure(&mut self, viewport: &Viewport, font: &str) {
        let (w, h) = viewport.css_size();
        self.cols = (f64::from(w) / self.cell_px).ceil() as usize;
        self.rows = (f64::from(h) / self.cell_px).ceil() as usize;
        self.cells = vec![None; self.cols * self.rows];
        self.font = font.into();
        self.content_ops += 1;
    }

    fn set_font(&mut self, font: &str) {
        self.font = font.into();
    }

    fn clear(&mut self, _width: f64, _height: f64) {
        self.cells.iter_mut().for_each(|c| *c = None);
        self.content_ops += 1;
    }

    fn fade(&mut self, _width: f64, _height: f64, keep_alpha: f64) {
        let keep = keep_alpha.clamp(0.0, 1.0) as f32;
        for slot in &mut self.cells {
            let gone = match slot {
                Some(cell) => {
                    cell.alpha *= keep;
                    cell.alpha < MIN_ALPHA
                },
                None => false,
            };
            if gone {
                *slot = None;
            }
        }
        self.content_ops += 1;
    }

    fn set_fill(&mut self, color: &str) {
        self.fill = color.into();
    }

    fn fill_glyph(&mut self, glyph: &str, x: f64, y: f64) {
        if let Some(idx) = self.cell_index(x, y) {
            self.cells[idx] = Some(TextCell { glyph: glyph.into(), alpha: 1.0 });
        }
        self.content_ops += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(cols: u32, rows: u32) -> TextSurface {
        let mut s = TextSurface::new(10.0);
        let vp = Viewport { css_width: cols * 10, css_height: rows * 10, pixel_ratio: 1.0 };
        s.configure(&vp, "10px monospace");
        s
    }

    #[test]
    fn test_fill_and_render() {
        let mut s = surface(4, 2);
        s.fill_glyph("#", 0.0, 0.0);
        s.fill_glyph("@", 35.0, 15.0);
        // outside the grid
        s.fill_glyph("x", 40.0, 0.0);

        assert_eq!(s.render(0.5), "#   \n   @\n");
        assert_eq!(s.visible_cells(), 2);
        assert_eq!(s.cell(3, 1), Some(("@", 1.0)));
    }

    #[test]
    fn test_fade_decays_and_drops() {
        let mut s = surface(2, 1);
        s.fill_glyph("#", 0.0, 0.0);

        s.fade(20.0, 10.0, 0.5);
        assert_eq!(s.cell(0, 0), Some(("#", 0.5)));
        assert_eq!(s.render(0.6), "  \n");

        for _ in 0..10 {
            s.fade(20.0, 10.0, 0.5);
        }
        assert_eq!(s.cell(0, 0), None);
    }

    #[test]
    fn test_clear_and_reconfigure() {
        let mut s = surface(3, 3);
        s.fill_glyph("#", 0.0, 0.0);
        s.clear(30.0, 30.0);
        assert_eq!(s.visible_cells(), 0);

        s.fill_glyph("#", 0.0, 0.0);
        let vp = Viewport { css_width: 50, css_height: 20, pixel_ratio: 2.0 };
        s.configure(&vp, "12px monospace");
        assert_eq!(s.size(), (5, 2));
        assert_eq!(s.visible_cells(), 0);
        assert_eq!(s.font(), "12px monospace");
    }

    #[test]
    fn test_wide_glyph_render() {
        let mut s = surface(4, 1);
        s.fill_glyph("中", 0.0, 0.0);
        s.fill_glyph("#", 30.0, 0.0);

        assert_eq!(s.render(0.5), "中 #\n");
    }
}
