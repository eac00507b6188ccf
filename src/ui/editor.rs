//! Compose view: the publish form plus the path prompt overlay.

use crate::app::{App, EditorField, PromptKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::helpers::centered_rect;

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 8 {
        return;
    }
    let Some(editor) = app.editor.as_ref() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // banner
            Constraint::Length(3), // title
            Constraint::Length(2), // category + cover
            Constraint::Min(4),    // body
        ])
        .split(area);

    let banner = Paragraph::new(vec![
        Line::from(Span::styled(
            "Tell Your Story",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Publish your article and share it with the world.",
            Style::default().fg(Color::Gray),
        )),
    ]);
    f.render_widget(banner, chunks[0]);

    let title_style = field_border(editor.focus == EditorField::Title);
    let title = Paragraph::new(editor.title.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(title_style)
            .title(" Title "),
    );
    f.render_widget(title, chunks[1]);

    let category = app
        .categories()
        .get(editor.category_index)
        .map(|c| c.to_string())
        .unwrap_or_else(|| "General".to_string());
    let cover = editor
        .cover
        .as_deref()
        .unwrap_or("(none — a placeholder is generated)");
    let meta = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Category: ", Style::default().fg(Color::DarkGray)),
            Span::styled(category, Style::default().fg(Color::Magenta)),
            Span::styled("  (Ctrl+K to change)", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
            Span::styled("Cover: ", Style::default().fg(Color::DarkGray)),
            Span::raw(cover.to_string()),
        ]),
    ]);
    f.render_widget(meta, chunks[2]);

    let body_style = field_border(editor.focus == EditorField::Body);
    let body = Paragraph::new(editor.body.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(body_style)
                .title(" Your story "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(body, chunks[3]);

    if let Some(prompt) = editor.prompt.as_ref() {
        let overlay = centered_rect(60, 20, f.area());
        if overlay.width < 10 || overlay.height < 3 {
            return;
        }
        let title = match prompt.kind {
            PromptKind::CoverImage => " Cover image (URL or file path) ",
            PromptKind::DraftFile => " Import draft (.txt or .md path) ",
        };
        f.render_widget(Clear, overlay);
        let input = Paragraph::new(format!("{}█", prompt.input)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(title),
        );
        f.render_widget(input, overlay);
    }
}

fn field_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}
