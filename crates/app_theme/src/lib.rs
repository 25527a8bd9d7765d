//! Design tokens and theme context for the Daily Tasks client.
//!
//! [`DEFAULT_THEME`] is an immutable `'static` value; the [`ThemeProvider`] borrows it and hands
//! the same reference to descendants together with the reactive [`ColorMode`].

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod color_mode;
mod provider;
mod tokens;

pub use color_mode::{resolve_initial_color_mode, system_prefers_dark, ColorMode};
pub use provider::{use_color_mode, use_theme, use_theme_context, ThemeContext, ThemeProvider};
pub use tokens::{
    theme, ColorScale, Fonts, GlobalStyles, ModeValue, Theme, ThemeConfig, DEFAULT_THEME,
};
