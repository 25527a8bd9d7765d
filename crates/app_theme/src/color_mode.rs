use crate::tokens::ThemeConfig;

/// Light or dark rendering of the theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorMode {
    /// Light surfaces, dark text.
    Light,
    /// Dark surfaces, light text.
    #[default]
    Dark,
}

impl ColorMode {
    /// Stable id used in `data-color-mode` attributes.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Returns the opposite mode.
    pub const fn toggle(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Parses an id produced by [`ColorMode::as_str`].
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

/// Picks the starting mode: the system preference when the theme opts in and one is known,
/// otherwise the theme's configured initial mode.
pub fn resolve_initial_color_mode(
    config: &ThemeConfig,
    system_prefers_dark: Option<bool>,
) -> ColorMode {
    match (config.use_system_color_mode, system_prefers_dark) {
        (true, Some(true)) => ColorMode::Dark,
        (true, Some(false)) => ColorMode::Light,
        _ => config.initial_color_mode,
    }
}

/// Reads the browser's `prefers-color-scheme` media query.
pub fn system_prefers_dark() -> Option<bool> {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|window| window.match_media("(prefers-color-scheme: dark)").ok())
            .flatten()
            .map(|query| query.matches())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_and_toggle() {
        for mode in [ColorMode::Light, ColorMode::Dark] {
            assert_eq!(ColorMode::from_id(mode.as_str()), Some(mode));
            assert_eq!(mode.toggle().toggle(), mode);
        }
        assert_eq!(ColorMode::from_id(" dark "), Some(ColorMode::Dark));
        assert_eq!(ColorMode::from_id("sepia"), None);
    }

    #[test]
    fn system_preference_wins_only_when_enabled() {
        let config = ThemeConfig {
            initial_color_mode: ColorMode::Dark,
            use_system_color_mode: true,
        };
        assert_eq!(resolve_initial_color_mode(&config, Some(false)), ColorMode::Light);
        assert_eq!(resolve_initial_color_mode(&config, None), ColorMode::Dark);

        let fixed = ThemeConfig {
            use_system_color_mode: false,
            ..config
        };
        assert_eq!(resolve_initial_color_mode(&fixed, Some(false)), ColorMode::Dark);
    }
}
