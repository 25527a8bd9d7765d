//! Leptos context wiring for the theme.

use leptos::*;

use crate::{
    color_mode::{resolve_initial_color_mode, system_prefers_dark, ColorMode},
    tokens::Theme,
};

/// Theme reference and reactive color mode shared with descendants.
#[derive(Clone, Copy)]
pub struct ThemeContext {
    /// The exact theme value handed to [`ThemeProvider`].
    pub theme: &'static Theme,
    /// Current color mode.
    pub color_mode: RwSignal<ColorMode>,
}

/// Provides [`ThemeContext`] and renders the themed wrapper element around `children`.
#[component]
pub fn ThemeProvider(
    /// Immutable theme value, borrowed for the lifetime of the page.
    theme: &'static Theme,
    children: Children,
) -> impl IntoView {
    let color_mode = create_rw_signal(resolve_initial_color_mode(
        &theme.config,
        system_prefers_dark(),
    ));
    provide_context(ThemeContext { theme, color_mode });

    view! {
        <div
            class="app-theme"
            data-color-mode=move || color_mode.get().as_str()
            style=move || theme.css_variables(color_mode.get())
        >
            {children()}
        </div>
    }
}

/// Returns the nearest [`ThemeContext`].
///
/// # Panics
///
/// Panics if called outside [`ThemeProvider`].
pub fn use_theme_context() -> ThemeContext {
    use_context::<ThemeContext>().expect("ThemeContext not provided")
}

/// Returns the theme provided by the nearest [`ThemeProvider`].
///
/// # Panics
///
/// Panics if called outside [`ThemeProvider`].
pub fn use_theme() -> &'static Theme {
    use_theme_context().theme
}

/// Returns the reactive color mode of the nearest [`ThemeProvider`].
///
/// # Panics
///
/// Panics if called outside [`ThemeProvider`].
pub fn use_color_mode() -> RwSignal<ColorMode> {
    use_theme_context().color_mode
}
