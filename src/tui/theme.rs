use ratatui::style::{Color, Modifier, Style};

use crate::stats::achievements::Tier;

// Forest-and-coral palette, tuned for dark terminals.
pub const BG: Color = Color::Rgb(14, 20, 17);
pub const SURFACE: Color = Color::Rgb(22, 30, 26);
pub const BORDER: Color = Color::Rgb(42, 58, 50);
pub const BORDER_FOCUS: Color = Color::Rgb(224, 122, 95);
pub const TEXT: Color = Color::Rgb(222, 230, 224);
pub const TEXT_DIM: Color = Color::Rgb(122, 136, 127);
pub const CORAL: Color = Color::Rgb(224, 122, 95);
pub const GREEN: Color = Color::Rgb(82, 158, 118);
pub const SAND: Color = Color::Rgb(212, 163, 115);
pub const RED: Color = Color::Rgb(193, 68, 75);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn accent() -> Style {
    Style::default().fg(CORAL)
}

pub fn green() -> Style {
    Style::default().fg(GREEN)
}

pub fn sand() -> Style {
    Style::default().fg(SAND)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub fn tier(tier: Tier) -> Style {
    let color = match tier {
        Tier::Bronze => Color::Rgb(205, 127, 50),
        Tier::Silver => Color::Rgb(192, 192, 192),
        Tier::Gold => Color::Rgb(255, 215, 0),
        Tier::Platinum => Color::Rgb(229, 228, 226),
    };
    Style::default().fg(color)
}
