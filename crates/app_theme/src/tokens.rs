//! Theme token tables and the built-in theme value.

use std::fmt::Write as _;

use crate::color_mode::ColorMode;

/// Color-mode behavior of a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeConfig {
    /// Mode used when no system preference applies.
    pub initial_color_mode: ColorMode,
    /// Whether the browser's `prefers-color-scheme` overrides [`Self::initial_color_mode`].
    pub use_system_color_mode: bool,
}

/// Named palette with numbered shades, addressed as `"<name>.<shade>"`.
#[derive(Debug, PartialEq, Eq)]
pub struct ColorScale {
    /// Palette name, e.g. `gray`.
    pub name: &'static str,
    /// `(shade, css color)` pairs in ascending shade order.
    pub shades: &'static [(u16, &'static str)],
}

/// Font stacks.
#[derive(Debug, PartialEq, Eq)]
pub struct Fonts {
    /// Headings.
    pub heading: &'static str,
    /// Body copy.
    pub body: &'static str,
    /// Code and tabular text.
    pub mono: &'static str,
}

/// Value that differs between light and dark mode. Either side may be a color token or a raw
/// CSS value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeValue {
    /// Light mode value.
    pub light: &'static str,
    /// Dark mode value.
    pub dark: &'static str,
}

impl ModeValue {
    /// Returns the side for `mode`.
    pub const fn pick(&self, mode: ColorMode) -> &'static str {
        match mode {
            ColorMode::Light => self.light,
            ColorMode::Dark => self.dark,
        }
    }
}

/// Page-level styles applied by the theme wrapper.
#[derive(Debug, PartialEq, Eq)]
pub struct GlobalStyles {
    /// Page background.
    pub body_bg: ModeValue,
    /// Default text color.
    pub body_color: ModeValue,
    /// Card and list-item surfaces.
    pub surface_bg: ModeValue,
}

/// Immutable set of design tokens.
#[derive(Debug, PartialEq, Eq)]
pub struct Theme {
    /// Color-mode behavior.
    pub config: ThemeConfig,
    /// Palettes.
    pub colors: &'static [ColorScale],
    /// Font stacks.
    pub fonts: Fonts,
    /// Corner radii keyed by size name.
    pub radii: &'static [(&'static str, &'static str)],
    /// Spacing scale keyed by step.
    pub space: &'static [(&'static str, &'static str)],
    /// Page-level styles.
    pub global: GlobalStyles,
}

impl Theme {
    /// Looks up a `"<palette>.<shade>"` token.
    pub fn color(&self, token: &str) -> Option<&'static str> {
        let (name, shade) = token.split_once('.')?;
        let shade: u16 = shade.parse().ok()?;
        self.colors
            .iter()
            .find(|scale| scale.name == name)?
            .shades
            .iter()
            .find(|(step, _)| *step == shade)
            .map(|(_, value)| *value)
    }

    /// Resolves a color token, passing raw CSS values through unchanged.
    pub fn resolve_color(&self, value: &'static str) -> &'static str {
        self.color(value).unwrap_or(value)
    }

    /// Resolves `value` for `mode`.
    pub fn mode_value(&self, value: ModeValue, mode: ColorMode) -> &'static str {
        self.resolve_color(value.pick(mode))
    }

    /// Renders every token as CSS custom properties for an inline `style` attribute.
    pub fn css_variables(&self, mode: ColorMode) -> String {
        let mut css = String::new();
        for scale in self.colors {
            for (shade, value) in scale.shades {
                let _ = write!(css, "--colors-{}-{shade}: {value}; ", scale.name);
            }
        }
        let _ = write!(
            css,
            "--fonts-heading: {}; --fonts-body: {}; --fonts-mono: {}; ",
            self.fonts.heading, self.fonts.body, self.fonts.mono
        );
        for (name, value) in self.radii {
            let _ = write!(css, "--radii-{name}: {value}; ");
        }
        for (step, value) in self.space {
            let _ = write!(css, "--space-{step}: {value}; ");
        }
        let _ = write!(
            css,
            "--global-bg: {}; --global-color: {}; --surface-bg: {};",
            self.mode_value(self.global.body_bg, mode),
            self.mode_value(self.global.body_color, mode),
            self.mode_value(self.global.surface_bg, mode),
        );
        css
    }
}

/// Built-in theme: dark by default, following the system preference when available.
pub static DEFAULT_THEME: Theme = Theme {
    config: ThemeConfig {
        initial_color_mode: ColorMode::Dark,
        use_system_color_mode: true,
    },
    colors: &[
        ColorScale {
            name: "gray",
            shades: &[
                (50, "#F7FAFC"),
                (100, "#EDF2F7"),
                (200, "#E2E8F0"),
                (300, "#CBD5E0"),
                (400, "#A0AEC0"),
                (500, "#718096"),
                (600, "#4A5568"),
                (700, "#2D3748"),
                (800, "#1A202C"),
                (900, "#171923"),
            ],
        },
        ColorScale {
            name: "green",
            shades: &[(100, "#C6F6D5"), (500, "#38A169"), (800, "#22543D")],
        },
        ColorScale {
            name: "yellow",
            shades: &[(100, "#FEFCBF"), (500, "#D69E2E"), (800, "#744210")],
        },
        ColorScale {
            name: "red",
            shades: &[(500, "#E53E3E")],
        },
        ColorScale {
            name: "blue",
            shades: &[(400, "#4299E1"), (500, "#3182CE")],
        },
    ],
    fonts: Fonts {
        heading: "system-ui, -apple-system, \"Segoe UI\", sans-serif",
        body: "system-ui, -apple-system, \"Segoe UI\", sans-serif",
        mono: "ui-monospace, SFMono-Regular, Menlo, monospace",
    },
    radii: &[("sm", "0.125rem"), ("md", "0.375rem"), ("lg", "0.5rem")],
    space: &[("1", "0.25rem"), ("2", "0.5rem"), ("4", "1rem"), ("8", "2rem")],
    global: GlobalStyles {
        body_bg: ModeValue {
            light: "gray.50",
            dark: "#1A202C",
        },
        body_color: ModeValue {
            light: "gray.800",
            dark: "gray.100",
        },
        surface_bg: ModeValue {
            light: "gray.200",
            dark: "gray.700",
        },
    },
};

/// Returns the built-in theme. Every call yields the same reference.
pub fn theme() -> &'static Theme {
    &DEFAULT_THEME
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn color_tokens_resolve_by_palette_and_shade() {
        let theme = theme();
        assert_eq!(theme.color("gray.500"), Some("#718096"));
        assert_eq!(theme.color("green.100"), Some("#C6F6D5"));
        assert_eq!(theme.color("gray.550"), None);
        assert_eq!(theme.color("purple.500"), None);
        assert_eq!(theme.color("gray"), None);
        assert_eq!(theme.resolve_color("#123456"), "#123456");
    }

    #[test]
    fn mode_values_follow_color_mode() {
        let theme = theme();
        assert_eq!(theme.mode_value(theme.global.body_bg, ColorMode::Light), "#F7FAFC");
        assert_eq!(theme.mode_value(theme.global.body_bg, ColorMode::Dark), "#1A202C");
    }

    #[test]
    fn css_variables_cover_tokens_and_globals() {
        let css = theme().css_variables(ColorMode::Light);
        assert!(css.contains("--colors-gray-500: #718096;"));
        assert!(css.contains("--radii-md: 0.375rem;"));
        assert!(css.contains("--space-4: 1rem;"));
        assert!(css.contains("--global-bg: #F7FAFC;"));
        assert!(css.contains("--global-color: #1A202C;"));
        assert!(theme().css_variables(ColorMode::Dark).contains("--global-color: #EDF2F7;"));
    }

    #[test]
    fn theme_accessor_returns_the_static_value() {
        assert!(std::ptr::eq(theme(), &DEFAULT_THEME));
        assert!(std::ptr::eq(theme(), theme()));
    }
}
