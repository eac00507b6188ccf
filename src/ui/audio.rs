//! Audio shelf. The platform never wired this up to real audio; it shows a
//! fixed set of episode cards and nothing plays.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const EPISODE_COUNT: usize = 3;

pub(super) fn render(f: &mut Frame, area: Rect) {
    if area.width < 3 || area.height < 5 {
        return;
    }

    let mut lines = vec![
        Line::from(Span::styled(
            "Audio Books & Podcasts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Listen to your favorite stories on the go.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];
    for n in 1..=EPISODE_COUNT {
        lines.push(Line::from(Span::styled(
            format!("  ▶ Audio Story #{}", n),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            "    45 mins • Editorial",
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(""));
    }

    let shelf = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Audio "));
    f.render_widget(shelf, area);
}
