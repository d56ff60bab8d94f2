use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};

use super::style::Theme;

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect, theme: &Theme) {
    let watch_indicator = if model.watch_enabled {
        " [watching]"
    } else {
        ""
    };

    let status = match model.active_document() {
        Some(doc) => {
            let percent = model.viewport.scroll_percent();
            format!(
                " {} {}  [{}%]  {} blocks{}  Esc:gallery  F1:help",
                doc.icon,
                doc.display_title(),
                percent,
                doc.block_count(),
                watch_indicator
            )
        }
        None => {
            let count = model.gallery.len();
            let noun = if count == 1 { "project" } else { "projects" };
            format!(" Projects  {count} {noun}{watch_indicator}  n:new  ?:help  q:quit")
        }
    };

    let status_bar = Paragraph::new(status)
        .style(Style::default().bg(theme.status_bg).fg(theme.status_fg));

    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
