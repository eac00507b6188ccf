//! Feedback view: a single text box. Submissions are acknowledged and
//! discarded; nothing is transmitted anywhere.

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 7 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3)])
        .split(area);

    let banner = Paragraph::new(vec![
        Line::from(Span::styled(
            "Send Feedback",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "We value your thoughts on our platform.",
            Style::default().fg(Color::Gray),
        )),
    ]);
    f.render_widget(banner, chunks[0]);

    let input = Paragraph::new(format!("{}█", app.feedback_input))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Your feedback "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(input, chunks[1]);
}
