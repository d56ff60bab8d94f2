//! Theming and color definitions.
//!
//! This module defines the visual styling for block variants and chrome.
//! Uses ANSI colors that adapt to the terminal's color palette.

use ratatui::style::{Color, Modifier, Style};

use crate::block::Variant;

/// Color theme for the UI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub h1: Style,
    pub h2: Style,
    pub h3: Style,
    pub quote: Style,
    pub title: Style,
    pub placeholder: Style,
    pub info: Style,
    pub prefix: Style,
    pub checked: Style,
    pub selected: Style,
    pub menu: Style,
    pub menu_highlight: Style,
    pub status_bg: Color,
    pub status_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            h1: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            h2: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            h3: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            quote: Style::default()
                .fg(Color::Indexed(250))
                .add_modifier(Modifier::ITALIC),
            title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            placeholder: Style::default().fg(Color::Indexed(241)),
            info: Style::default().fg(Color::Indexed(245)),
            prefix: Style::default().fg(Color::Yellow),
            checked: Style::default()
                .fg(Color::Indexed(243))
                .add_modifier(Modifier::CROSSED_OUT),
            selected: Style::default().fg(Color::Yellow),
            menu: Style::default().bg(Color::Black).fg(Color::White),
            menu_highlight: Style::default()
                .bg(Color::Indexed(238))
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            status_bg: Color::Indexed(236), // Dark gray that works on both
            status_fg: Color::Indexed(252), // Light gray
        }
    }
}

impl Theme {
    /// Create a theme optimized for dark terminals.
    pub fn dark() -> Self {
        Self::default()
    }

    /// Create a theme optimized for light terminals.
    pub fn light() -> Self {
        Self {
            h1: Style::default()
                .fg(Color::Indexed(31)) // Darker cyan
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            h2: Style::default()
                .fg(Color::Indexed(28)) // Darker green
                .add_modifier(Modifier::BOLD),
            h3: Style::default()
                .fg(Color::Indexed(136)) // Darker yellow/olive
                .add_modifier(Modifier::BOLD),
            quote: Style::default()
                .fg(Color::Indexed(240))
                .add_modifier(Modifier::ITALIC),
            title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            placeholder: Style::default().fg(Color::Indexed(248)),
            info: Style::default().fg(Color::Indexed(243)),
            prefix: Style::default().fg(Color::Indexed(136)),
            checked: Style::default()
                .fg(Color::Indexed(246))
                .add_modifier(Modifier::CROSSED_OUT),
            selected: Style::default().fg(Color::Indexed(25)),
            menu: Style::default().bg(Color::Indexed(254)).fg(Color::Black),
            menu_highlight: Style::default()
                .bg(Color::Indexed(250))
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            status_bg: Color::Indexed(252),
            status_fg: Color::Indexed(235),
        }
    }

    /// Pick the theme matching the terminal background.
    pub fn detect() -> Self {
        let light = std::env::var("COLORFGBG")
            .ok()
            .is_some_and(|value| colorfgbg_is_light(&value));
        if light { Self::light() } else { Self::dark() }
    }

    /// Text style of a block's content.
    pub fn for_variant(&self, variant: Variant) -> Style {
        match variant {
            Variant::Heading1 => self.h1,
            Variant::Heading2 => self.h2,
            Variant::Heading3 => self.h3,
            Variant::Quote => self.quote,
            Variant::Toggle => Style::default().add_modifier(Modifier::BOLD),
            Variant::Text | Variant::BulletItem | Variant::NumberedItem | Variant::TodoItem => {
                Style::default()
            }
        }
    }
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`); backgrounds 7 and
/// 9-15 are light.
fn colorfgbg_is_light(value: &str) -> bool {
    value
        .rsplit(';')
        .next()
        .and_then(|bg| bg.trim().parse::<u8>().ok())
        .is_some_and(|bg| bg == 7 || (9..=15).contains(&bg))
}
