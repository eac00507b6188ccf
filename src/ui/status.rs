//! Bottom status bar: transient status messages, else per-view key hints.

use crate::app::{App, View};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.height < 1 {
        return;
    }

    if let Some((message, _)) = &app.status_message {
        let paragraph = Paragraph::new(message.as_ref())
            .style(Style::default().fg(Color::Black).bg(Color::Cyan));
        f.render_widget(paragraph, area);
        return;
    }

    let hints = if app.fatal.is_some() {
        "r: reload | q: quit"
    } else if app.pending_confirm.is_some() {
        "y: confirm | n/Esc: cancel"
    } else if app.show_help {
        "j/k: scroll | ?/Esc: close"
    } else if app.search_mode {
        "type to search | Enter: done | Esc: clear"
    } else {
        match app.view {
            View::Feed => {
                "j/k: move | Enter: read | /: search | 1/2/3: tabs | s: save | f: follow | n: write | ?: help | q: quit"
            }
            View::Reader => {
                "j/k: scroll | s: save | d: download | f: follow | a: author | o: open image | Esc: back"
            }
            View::Editor => {
                "Tab: field | Ctrl+S: publish | Ctrl+K: category | Ctrl+O: cover | Ctrl+D: import | Esc: discard"
            }
            View::Saved | View::Downloads => "j/k: move | Enter: read | s: save | d: download | Esc: back",
            View::History => "j/k: move | Enter: read | x: remove | X: clear all | Esc: back",
            View::Categories => "j/k: move | Enter: filter feed | Esc: back",
            View::Profile => "j/k: move | Enter: read | f: follow | x: delete | Esc: back",
            View::Settings => "Tab: field | Enter: save | Ctrl+X: sign out | Esc: back",
            View::Subscribe => "Enter: pay with Chapa | Esc: back",
            View::Audio | View::Feedback => "Esc: back",
        }
    };

    let paragraph = Paragraph::new(hints).style(Style::default().fg(Color::DarkGray));
    f.render_widget(paragraph, area);
}
