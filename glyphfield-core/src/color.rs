use compact_str::CompactString;

/// System color-scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    /// Dark glyphs on a light page.
    #[default]
    Light,
    /// Light glyphs on a dark page.
    Dark,
}

/// Current glyph fill color.
///
/// Resolved from a CSS custom property when the host defines it, otherwise
/// from the light/dark fallback matching the color scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorState {
    fallback_light: CompactString,
    fallback_dark: CompactString,
    current: CompactString,
}

impl ColorState {
    /// Creates a color state showing the dark fallback until first resolved.
    pub fn new(fallback_light: &str, fallback_dark: &str) -> Self {
        Self {
            fallback_light: fallback_light.into(),
            fallback_dark: fallback_dark.into(),
            current: fallback_dark.into(),
        }
    }

    /// Recomputes the color; returns true if it changed.
    pub fn resolve(&mut self, css_value: Option<&str>, scheme: ColorScheme) -> bool {
        let next = match css_value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => value,
            None => match scheme {
                ColorScheme::Light => self.fallback_light.as_str(),
                ColorScheme::Dark => self.fallback_dark.as_str(),
            },
        };

        if self.current == next {
            return false;
        }

        self.current = next.into();
        true
    }

    /// The resolved fill color as a CSS color string.
    pub fn current(&self) -> &str {
        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_value_wins() {
        let mut color = ColorState::new("black", "white");

        assert!(color.resolve(Some("  #ff00ff "), ColorScheme::Dark));
        assert_eq!(color.current(), "#ff00ff");
    }

    #[test]
    fn test_scheme_fallback() {
        let mut color = ColorState::new("black", "white");
        assert_eq!(color.current(), "white");

        assert!(color.resolve(None, ColorScheme::Light));
        assert_eq!(color.current(), "black");

        // blank property values count as absent
        assert!(color.resolve(Some("   "), ColorScheme::Dark));
        assert_eq!(color.current(), "white");

        assert!(!color.resolve(None, ColorScheme::Dark));
    }
}
