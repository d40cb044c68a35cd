use compact_str::CompactString;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::error::Error;

/// Ordered glyph lookup table, from sparse to dense.
///
/// The ramp maps a normalized field value in `[0, 1]` onto one of its glyphs.
/// Glyphs are split on grapheme boundaries, so combining sequences stay intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRamp {
    glyphs: Vec<CompactString>,
}

impl GlyphRamp {
    /// Creates a ramp from a string of glyphs.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if `glyphs` is empty.
    pub fn new(glyphs: &str) -> Result<Self, Error> {
        let glyphs: Vec<CompactString> = glyphs.graphemes(true).map(CompactString::from).collect();

        if glyphs.is_empty() {
            return Err(Error::empty_glyph_ramp());
        }

        Ok(Self { glyphs })
    }

    /// Number of glyphs in the ramp.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always false; an empty ramp cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Maps a normalized value to a glyph index.
    ///
    /// Values are clamped to `[0, 1]` and NaN maps to index 0; the result is
    /// always a valid index.
    pub fn index_for(&self, normalized: f64) -> usize {
        let n = if normalized.is_nan() { 0.0 } else { normalized.clamp(0.0, 1.0) };
        let last = self.glyphs.len() - 1;

        ((n * self.glyphs.len() as f64) as usize).min(last)
    }

    /// Returns the glyph at `index`.
    pub fn glyph(&self, index: usize) -> Option<&str> {
        self.glyphs.get(index).map(CompactString::as_str)
    }

    /// Returns true if the glyph at `index` draws nothing.
    pub fn is_blank(&self, index: usize) -> bool {
        self.glyph(index)
            .is_none_or(|g| g.chars().all(char::is_whitespace))
    }

    /// Returns the display width of the widest glyph, in terminal columns.
    pub fn max_width(&self) -> usize {
        self.glyphs
            .iter()
            .map(|g| g.width())
            .max()
            .unwrap_or(0)
    }

    /// Glyphs in ramp order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.glyphs.iter().map(CompactString::as_str)
    }
}
