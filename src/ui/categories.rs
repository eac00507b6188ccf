//! Category explorer: every category in the working set with its story
//! count. Choosing one filters the feed; choosing the active one clears it.

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 5 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let banner = Paragraph::new(vec![
        Line::from(Span::styled(
            "Explore Categories",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Discover stories across various topics and interests.",
            Style::default().fg(Color::Gray),
        )),
    ]);
    f.render_widget(banner, chunks[0]);

    let items: Vec<ListItem> = app
        .categories()
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let selected = i == app.list_selected;
            let active = app.active_category.as_deref() == Some(category.as_ref());
            let style = if selected {
                Style::default()
                    .bg(Color::DarkGray)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else if active {
                Style::default().fg(Color::Magenta)
            } else {
                Style::default()
            };
            let count = app.category_count(category);
            let marker = if active { " (active filter)" } else { "" };
            ListItem::new(Line::from(Span::styled(
                format!("{}  —  {} Articles{}", category, count, marker),
                style,
            )))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL));
    f.render_widget(list, chunks[1]);
}
