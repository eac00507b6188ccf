//! Author profile: byline card plus every story under that byline. Locally
//! published stories carry a delete marker here regardless of who is
//! signed in.

use crate::app::App;
use crate::storage::Article;
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 6 {
        return;
    }
    let Some(author) = app.profile_author.clone() else {
        return;
    };
    let articles = app.profile_articles();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let follow_marker = if app.is_following(&author) {
        Span::styled("  ✓ following", Style::default().fg(Color::Green))
    } else {
        Span::styled("  (f to follow)", Style::default().fg(Color::DarkGray))
    };
    let card = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                author.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            follow_marker,
        ]),
        Line::from(Span::styled(
            format!("Editorial Writer • {} Stories", articles.len()),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ]);
    f.render_widget(card, chunks[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Articles by {} ", author));

    let visible_rows = (chunks[1].height.saturating_sub(2) / 2) as usize;
    let offset = app
        .list_selected
        .saturating_sub(visible_rows.saturating_sub(1));
    let max = chunks[1].width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = articles
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_rows.max(1))
        .map(|(i, article)| profile_row(article, i == app.list_selected, max))
        .collect();

    f.render_widget(List::new(items).block(block), chunks[1]);
}

fn profile_row<'a>(article: &'a Article, selected: bool, max: usize) -> ListItem<'a> {
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

    let deletable = if App::profile_delete_allowed(article) {
        "  [x deletes]"
    } else {
        ""
    };
    let title = truncate_to_width(&strip_control_chars(&article.title), max).into_owned();
    let meta = format!(
        "{} • {}{}",
        article.category, article.published, deletable
    );
    let meta = truncate_to_width(&meta, max).into_owned();

    ListItem::new(vec![
        Line::from(Span::styled(title, title_style)),
        Line::from(Span::styled(meta, meta_style)),
    ])
}
