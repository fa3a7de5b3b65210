//! Light and dark palettes, and the switch the theme preference flips.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ratatui::style::Color;

use crate::persist::ThemeApplier;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub panel: Color,
    pub card: Color,
    pub highlight: Color,
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    pub gold: Color,
    pub error_bg: Color,
    pub error_fg: Color,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        bg: Color::Rgb(246, 247, 251),
        panel: Color::Rgb(255, 255, 255),
        card: Color::Rgb(238, 241, 247),
        highlight: Color::Rgb(199, 226, 255),
        text: Color::Rgb(15, 23, 42),
        dim: Color::Rgb(100, 116, 139),
        accent: Color::Rgb(225, 29, 72),
        gold: Color::Rgb(161, 98, 7),
        error_bg: Color::Rgb(254, 242, 242),
        error_fg: Color::Rgb(153, 27, 27),
    };

    pub const DARK: Palette = Palette {
        bg: Color::Rgb(15, 23, 42),
        panel: Color::Rgb(30, 41, 59),
        card: Color::Rgb(30, 41, 59),
        highlight: Color::Rgb(51, 65, 85),
        text: Color::Rgb(248, 250, 252),
        dim: Color::Rgb(148, 163, 184),
        accent: Color::Rgb(251, 113, 133),
        gold: Color::Rgb(250, 204, 21),
        error_bg: Color::Rgb(69, 10, 10),
        error_fg: Color::Rgb(254, 202, 202),
    };

    pub fn for_mode(dark: bool) -> Palette {
        if dark {
            Palette::DARK
        } else {
            Palette::LIGHT
        }
    }
}

/// Shared dark-mode switch read by the renderer.
#[derive(Clone, Debug, Default)]
pub struct PaletteSwitch {
    dark: Arc<AtomicBool>,
}

impl PaletteSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dark(&self) -> bool {
        self.dark.load(Ordering::Relaxed)
    }

    pub fn palette(&self) -> Palette {
        Palette::for_mode(self.is_dark())
    }

    pub fn applier(&self) -> ThemeApplier {
        let dark = Arc::clone(&self.dark);
        Box::new(move |value| {
            tracing::debug!(dark = value, "applying theme");
            dark.store(value, Ordering::Relaxed);
        })
    }
}
