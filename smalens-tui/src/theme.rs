//! Color tokens for the viewer.
//!
//! Series colors are fixed: close is green, SMA 50 blue, SMA 200 red.
//! Chrome uses a dark neon palette.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Near-black background (primary surface)
    pub background: Color,
    /// Electric cyan accent (focus, highlights)
    pub accent: Color,
    pub close: Color,
    pub sma_short: Color,
    pub sma_long: Color,
    /// Neon orange (warnings)
    pub warning: Color,
    /// Hot pink (load errors)
    pub error: Color,
    /// Steel blue (muted text, unfocused borders)
    pub muted: Color,
    pub text_primary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 255, 255),
            close: Color::Green,
            sma_short: Color::Blue,
            sma_long: Color::Red,
            warning: Color::Rgb(255, 140, 0),
            error: Color::Rgb(255, 20, 147),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
        }
    }
}

impl Theme {
    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.muted)
        }
    }

    pub fn highlight(&self, focused: bool) -> Style {
        let base = Style::default().fg(self.accent);
        if focused {
            base.add_modifier(Modifier::REVERSED)
        } else {
            base.add_modifier(Modifier::BOLD)
        }
    }

    pub fn muted_text(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Checkbox style for an overlay toggle drawn in `color`.
    pub fn toggle(&self, on: bool, color: Color) -> Style {
        if on {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            self.muted_text()
        }
    }
}
