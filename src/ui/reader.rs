//! Article reader: story header, markdown body, and numbered suggestions.

use crate::app::App;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub(super) fn render(f: &mut Frame, app: &mut App, area: Rect) {
    // Layout may produce zero-sized rects during extreme terminal resizes
    if area.width < 3 || area.height < 3 {
        return;
    }

    let Some(article) = app.reader_article.as_ref() else {
        let paragraph = Paragraph::new("Story not found. It may have been deleted.")
            .block(Block::default().borders(Borders::ALL).title(" Reader "));
        f.render_widget(paragraph, area);
        return;
    };

    let follow_marker = if app.is_following(&article.author) {
        " ✓ following"
    } else {
        ""
    };
    let mut state_markers = String::new();
    if app.is_saved(&article.id) {
        state_markers.push_str("  [saved]");
    }
    if app.is_downloaded(&article.id) {
        state_markers.push_str("  [offline]");
    }

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            format!(" {} ", article.category),
            Style::default().fg(Color::Black).bg(Color::Magenta),
        )),
        Line::from(""),
        Line::from(Span::styled(
            article.title.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(
                format!("by {}", article.author),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(follow_marker, Style::default().fg(Color::Green)),
        ]),
        Line::from(Span::styled(
            format!(
                "{} • {}{}",
                article.published, article.read_time, state_markers
            ),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            format!("Cover: {}", article.image),
            Style::default().fg(Color::Blue),
        )),
        Line::from(""),
    ];

    lines.extend(render_markdown(&article.body));

    let suggestions = app.reader_suggestions();
    if !suggestions.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "More stories",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        for (i, suggestion) in suggestions.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  ({}) ", i + 1),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(suggestion.title.to_string()),
                Span::styled(
                    format!(" — {}", suggestion.author),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }
    }

    if app.reader_delete_allowed(article) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "This is your story. Press (x) to delete it.",
            Style::default().fg(Color::Red),
        )));
    }

    // Record content bounds, then clamp BEFORE rendering so a resize never
    // paints one frame at a stale offset.
    app.reader_total_lines = lines.len();
    app.reader_visible_lines = area.height.saturating_sub(2) as usize;
    app.clamp_reader_scroll();

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(" Reader "))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset.min(u16::MAX as usize) as u16, 0));

    f.render_widget(paragraph, area);
}

/// Convert markdown to styled ratatui lines. Stories are stored as the
/// author typed them; headings, emphasis, and code spans render styled and
/// everything else falls through as plain text.
pub fn render_markdown(md: &str) -> Vec<Line<'static>> {
    let parser = Parser::new(md);
    let mut lines: Vec<Line<'static>> = Vec::with_capacity(md.lines().count());
    let mut current_spans: Vec<Span<'static>> = Vec::with_capacity(4);
    let mut in_code_block = false;
    let mut in_heading = false;
    let mut in_emphasis = false;
    let mut in_strong = false;

    for event in parser {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                in_heading = true;
            }
            Event::End(TagEnd::Heading(_)) => {
                if !current_spans.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut current_spans)));
                }
                lines.push(Line::from(""));
                in_heading = false;
            }
            Event::Start(Tag::Paragraph) => {}
            Event::End(TagEnd::Paragraph) => {
                if !current_spans.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut current_spans)));
                }
                lines.push(Line::from(""));
            }
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                lines.push(Line::from(""));
            }
            Event::Start(Tag::Emphasis) => {
                in_emphasis = true;
            }
            Event::End(TagEnd::Emphasis) => {
                in_emphasis = false;
            }
            Event::Start(Tag::Strong) => {
                in_strong = true;
            }
            Event::End(TagEnd::Strong) => {
                in_strong = false;
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                current_spans.push(Span::styled(
                    format!("[Image: {}]", dest_url),
                    Style::default().fg(Color::Blue),
                ));
            }
            Event::Text(text) => {
                let style = if in_code_block {
                    Style::default().fg(Color::Yellow).bg(Color::Black)
                } else if in_heading {
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .fg(Color::Cyan)
                } else if in_strong {
                    Style::default().add_modifier(Modifier::BOLD)
                } else if in_emphasis {
                    Style::default().add_modifier(Modifier::ITALIC)
                } else {
                    Style::default()
                };
                current_spans.push(Span::styled(text.into_string(), style));
            }
            Event::Code(code) => {
                current_spans.push(Span::styled(
                    format!("`{}`", code),
                    Style::default().fg(Color::Yellow),
                ));
            }
            Event::SoftBreak => {
                current_spans.push(Span::raw(" "));
            }
            Event::HardBreak => {
                if !current_spans.is_empty() {
                    lines.push(Line::from(std::mem::take(&mut current_spans)));
                }
            }
            _ => {}
        }
    }

    if !current_spans.is_empty() {
        lines.push(Line::from(current_spans));
    }

    lines
}
