//! Help overlay: key bindings plus the Help Center FAQ.

use crate::app::App;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::helpers::centered_rect;

const BINDINGS: &[(&str, &str)] = &[
    ("j / k, ↑ / ↓", "Move selection / scroll reader"),
    ("Enter", "Open selected story"),
    ("1 / 2 / 3", "For You / Trending / Following"),
    ("Tab", "Cycle feed tabs"),
    ("/", "Search stories"),
    ("c", "Explore categories"),
    ("s", "Save / unsave story"),
    ("d", "Download / remove download"),
    ("f", "Follow / unfollow author"),
    ("a", "Open author profile"),
    ("b", "Saved library"),
    ("h", "Reading history"),
    ("w", "Offline downloads"),
    ("u", "Audio shelf"),
    ("n", "Write a new story"),
    ("e", "Account settings"),
    ("p", "Upgrade to Premium"),
    ("g", "Send feedback"),
    ("x / X", "Delete story / clear history"),
    ("o", "Open cover image in browser (reader)"),
    ("Esc", "Back to feed"),
    ("?", "Toggle this help"),
    ("q", "Quit"),
];

const FAQ: &[(&str, &str)] = &[
    (
        "How do I save articles?",
        "Press s on any story to add it to your library. Find it later under Saved.",
    ),
    (
        "Can I read offline?",
        "Yes! Press d on a story to download it for offline reading.",
    ),
    (
        "Is Thoughts Premium worth it?",
        "Absolutely. Ad-free reading, exclusive reports, and you support independent writers.",
    ),
];

pub(super) fn render(f: &mut Frame, app: &App) {
    let area = centered_rect(70, 80, f.area());
    if area.width < 20 || area.height < 6 {
        return;
    }

    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let heading_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled("Key Bindings", heading_style)));
    lines.push(Line::from(""));
    for (key, action) in BINDINGS {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<14}", key), key_style),
            Span::raw(*action),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Help Center", heading_style)));
    for (question, answer) in FAQ {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", question),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", answer),
            Style::default().fg(Color::Gray),
        )));
    }

    let visible = area.height.saturating_sub(2) as usize;
    let max_offset = lines.len().saturating_sub(visible);
    let offset = app.help_scroll_offset.min(max_offset);

    f.render_widget(Clear, area);
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help "),
        )
        .scroll((offset as u16, 0));
    f.render_widget(paragraph, area);
}

/// Number of content lines in the overlay, for input-side scroll clamping.
pub(super) fn content_lines() -> usize {
    // Heading + blank + bindings + blank + FAQ heading + 3 lines per entry
    2 + BINDINGS.len() + 2 + FAQ.len() * 3
}
