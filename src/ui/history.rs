//! Reading history view: most recent first, with relative view times.

use crate::app::App;
use crate::util::{relative_time_label, strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let entries = app.history_articles();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Reading History ");

    if entries.is_empty() {
        let paragraph = Paragraph::new("\nYour history is empty.")
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
        return;
    }

    let visible_rows = (area.height.saturating_sub(2) / 2) as usize;
    let offset = app
        .list_selected
        .saturating_sub(visible_rows.saturating_sub(1));
    let max = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = entries
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_rows.max(1))
        .map(|(i, (entry, article))| {
            let selected = i == app.list_selected;
            let title_style = if selected {
                Style::default()
                    .bg(Color::DarkGray)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            let meta_style = if selected {
                Style::default().bg(Color::DarkGray).fg(Color::Gray)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let title =
                truncate_to_width(&strip_control_chars(&article.title), max).into_owned();
            let viewed = chrono::DateTime::from_timestamp(entry.viewed_at, 0)
                .map(relative_time_label)
                .unwrap_or_else(|| "unknown".to_string());
            let meta = format!("{} • viewed {}", article.author, viewed);
            let meta = truncate_to_width(&meta, max).into_owned();
            ListItem::new(vec![
                Line::from(Span::styled(title, title_style)),
                Line::from(Span::styled(meta, meta_style)),
            ])
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}
