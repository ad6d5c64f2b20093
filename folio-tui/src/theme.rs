//! Neon-on-dark style tokens shared by every panel.
//!
//! Styles are exposed as free functions so render code reads as
//! `theme::muted()` rather than threading a palette struct through
//! every call.

use ratatui::style::{Color, Modifier, Style};

use folio_core::table::Tone;

/// Electric cyan (focus, highlights).
const ACCENT: Color = Color::Rgb(0, 255, 255);
/// Neon green (gains, favorable amounts).
const POSITIVE: Color = Color::Rgb(0, 255, 128);
/// Hot pink (losses, errors).
const NEGATIVE: Color = Color::Rgb(255, 20, 147);
/// Neon orange (warnings, partial actions).
const WARNING: Color = Color::Rgb(255, 140, 0);
/// Cool purple (secondary info).
const NEUTRAL: Color = Color::Rgb(147, 112, 219);
/// Steel blue (muted text).
const MUTED: Color = Color::Rgb(100, 149, 237);

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(Color::White)
}

pub fn panel_border(active: bool) -> Style {
    if active { accent() } else { muted() }
}

pub fn panel_title(active: bool) -> Style {
    if active { accent_bold() } else { muted() }
}

/// Map a rendered cell's tone to a display style.
pub fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Default => text(),
        Tone::Muted => muted(),
        Tone::Accent => accent(),
        Tone::Favorable => positive(),
        Tone::Unfavorable => negative(),
        Tone::Warning => warning(),
    }
}

/// Style for a gain/loss number.
pub fn pnl_style(value: f64) -> Style {
    if value >= 0.0 { positive() } else { negative() }
}

/// Style for a qualitative factor rating.
pub fn factor_style(rating: &str) -> Style {
    match rating {
        "green" => positive(),
        "yellow" => warning(),
        "red" => negative(),
        _ => muted(),
    }
}

/// Style for a normalized broker recommendation label.
pub fn recommendation_style(label: &str) -> Style {
    match label {
        "BUY" | "ACCUMULATE" => positive(),
        "SELL" => negative(),
        "HOLD" => neutral(),
        _ => muted(),
    }
}
