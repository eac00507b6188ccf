//! Home feed: header, tab pills, featured cards, story list, and the
//! wide-terminal sidebar.

use crate::app::{App, FeedState, Tab, FEATURED_COUNT};
use crate::storage::Article;
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::helpers::article_row;

/// Width at which the sidebar (Editor's Picks, Who to Follow) appears.
const SIDEBAR_MIN_WIDTH: u16 = 100;
const SIDEBAR_WIDTH: u16 = 34;

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let columns = if area.width >= SIDEBAR_MIN_WIDTH {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(SIDEBAR_WIDTH)])
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0)])
            .split(area)
    };

    render_main_column(f, app, columns[0]);
    if columns.len() > 1 {
        render_sidebar(f, app, columns[1]);
    }
}

fn render_main_column(f: &mut Frame, app: &App, area: Rect) {
    let featured_height = if !app.feed.is_empty() && area.height > 16 {
        // One bordered card per featured slot
        (app.feed.len().min(FEATURED_COUNT) as u16) * 4
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),              // header
            Constraint::Length(1),              // tab pills
            Constraint::Length(featured_height),
            Constraint::Min(0),                 // list
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    render_tabs(f, app, chunks[1]);

    match &app.feed {
        FeedState::FollowingEmpty => {
            render_empty_state(
                f,
                chunks[3],
                "No Following Yet",
                "Follow authors from the sidebar or articles to see their latest stories here.",
            );
        }
        FeedState::NoMatches => {
            render_empty_state(
                f,
                chunks[3],
                "No matching articles",
                "Try clearing your filters or exploring a different category.",
            );
        }
        FeedState::Results(indices) => {
            let featured = app.feed.len().min(FEATURED_COUNT);
            if featured_height > 0 {
                render_featured(f, app, chunks[2], &indices[..featured]);
            }
            let rest_start = if featured_height > 0 { featured } else { 0 };
            render_list(f, app, chunks[3], &indices[rest_start..], rest_start);
        }
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(
            "Thoughts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("Hi, {}", app.display_name()),
            Style::default().fg(Color::Gray),
        ),
    ];
    if app.premium {
        spans.push(Span::styled(
            "  ★ Premium",
            Style::default().fg(Color::Yellow),
        ));
    } else {
        spans.push(Span::styled(
            "  Upgrade to Premium (p)",
            Style::default().fg(Color::DarkGray),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let mut spans: Vec<Span> = Vec::new();
    for (i, tab) in Tab::ALL.iter().enumerate() {
        let style = if *tab == app.tab {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} {} ", i + 1, tab.label()), style));
        spans.push(Span::raw(" "));
    }

    if let Some(category) = &app.active_category {
        spans.push(Span::styled(
            format!(" [{}] ", category),
            Style::default().fg(Color::Magenta),
        ));
    }
    if app.search_mode || !app.search_input.is_empty() {
        let cursor = if app.search_mode { "█" } else { "" };
        spans.push(Span::styled(
            format!(" /{}{} ", app.search_input, cursor),
            Style::default().fg(Color::Yellow),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// The first feed positions render as bordered cards with a badge, the way
/// the home page always led with a couple of big stories.
fn render_featured(f: &mut Frame, app: &App, area: Rect, indices: &[usize]) {
    let constraints: Vec<Constraint> = indices.iter().map(|_| Constraint::Length(4)).collect();
    let cards = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (pos, (&idx, card)) in indices.iter().zip(cards.iter()).enumerate() {
        let Some(article) = app.articles.get(idx) else {
            continue;
        };
        render_featured_card(f, *card, article, app.selected == pos);
    }
}

fn render_featured_card(f: &mut Frame, area: Rect, article: &Article, selected: bool) {
    let badge = if article.trending {
        Span::styled(" Trending ", Style::default().fg(Color::Black).bg(Color::Red))
    } else {
        Span::styled(
            " Recommended ",
            Style::default().fg(Color::Black).bg(Color::Green),
        )
    };
    let border_style = if selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let max = area.width.saturating_sub(4) as usize;
    let title = truncate_to_width(&strip_control_chars(&article.title), max).into_owned();
    let meta = format!(
        "{} • {} • {}",
        article.author, article.published, article.read_time
    );
    let meta = truncate_to_width(&meta, max).into_owned();

    let lines = vec![
        Line::from(vec![
            badge,
            Span::raw(" "),
            Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(Span::styled(meta, Style::default().fg(Color::DarkGray))),
    ];
    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    f.render_widget(card, area);
}

fn render_list(f: &mut Frame, app: &App, area: Rect, indices: &[usize], offset_base: usize) {
    if area.height < 3 {
        return;
    }
    let block = Block::default().borders(Borders::TOP);

    let visible_rows = (area.height.saturating_sub(1) / 2) as usize;
    let selected_in_list = app.selected.saturating_sub(offset_base);
    let scroll = selected_in_list.saturating_sub(visible_rows.saturating_sub(1));

    let items: Vec<ListItem> = indices
        .iter()
        .enumerate()
        .skip(scroll)
        .take(visible_rows.max(1))
        .filter_map(|(i, &idx)| {
            app.articles
                .get(idx)
                .map(|a| article_row(app, a, offset_base + i == app.selected, area.width))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn render_empty_state(f: &mut Frame, area: Rect, heading: &str, prompt: &str) {
    let text = format!("\n\n{}\n\n{}", heading, prompt);
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    // Editor's Picks
    let max = chunks[0].width.saturating_sub(4) as usize;
    let mut pick_lines: Vec<Line> = Vec::new();
    for article in app.curated_picks() {
        let title = truncate_to_width(&strip_control_chars(&article.title), max).into_owned();
        pick_lines.push(Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        pick_lines.push(Line::from(Span::styled(
            format!("{} • {}", article.author, article.read_time),
            Style::default().fg(Color::DarkGray),
        )));
    }
    let picks = Paragraph::new(pick_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Editor's Picks "),
    );
    f.render_widget(picks, chunks[0]);

    // Who to Follow
    let mut author_lines: Vec<Line> = Vec::new();
    for author in app.suggested_authors() {
        let marker = if app.is_following(author) {
            Span::styled(" ✓ following", Style::default().fg(Color::Green))
        } else {
            Span::styled(" + follow", Style::default().fg(Color::DarkGray))
        };
        author_lines.push(Line::from(vec![Span::raw(author.to_string()), marker]));
    }
    let authors = Paragraph::new(author_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Who to Follow "),
    );
    f.render_widget(authors, chunks[1]);
}
