use glyphfield_core::{ColorScheme, Error, Host};

/// [`Host`] for a fixed-size virtual container standing in for a terminal.
///
/// The container is `cols * cell_size` by `rows * cell_size` CSS pixels at a
/// pixel ratio of 1, so each grid cell maps onto one character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminalHost {
    width: f64,
    height: f64,
    scheme: ColorScheme,
}

impl TerminalHost {
    pub fn new(cols: u16, rows: u16, cell_size: f64, scheme: ColorScheme) -> Self {
        Self {
            width: f64::from(cols) * cell_size,
            height: f64::from(rows) * cell_size,
            scheme,
        }
    }
}

impl Host for TerminalHost {
    fn container_size(&self) -> Result<(f64, f64), Error> {
        Ok((self.width, self.height))
    }

    fn device_pixel_ratio(&self) -> f64 {
        1.0
    }

    fn viewport_width(&self) -> f64 {
        self.width
    }

    fn css_property(&self, _name: &str) -> Option<String> {
        None
    }

    fn color_scheme(&self) -> ColorScheme {
        self.scheme
    }

    fn prefers_reduced_motion(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_spans_grid() {
        let host = TerminalHost::new(80, 24, 10.0, ColorScheme::Dark);

        assert_eq!(host.container_size(), Ok((800.0, 240.0)));
        assert_eq!(host.viewport_width(), 800.0);
        assert_eq!(host.css_property("--glyph-color"), None);
    }
}
