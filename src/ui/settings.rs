//! Account settings form and the premium upgrade card.

use crate::app::{App, SettingsField};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 12 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // banner
            Constraint::Length(3), // name
            Constraint::Length(3), // email
            Constraint::Length(2), // premium row
            Constraint::Min(0),
        ])
        .split(area);

    let banner = Paragraph::new(vec![
        Line::from(Span::styled(
            "Account Settings",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Manage your profile and preferences.",
            Style::default().fg(Color::Gray),
        )),
    ]);
    f.render_widget(banner, chunks[0]);

    let name = Paragraph::new(app.settings_name.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(field_border(app.settings_field == SettingsField::Name))
            .title(" Name "),
    );
    f.render_widget(name, chunks[1]);

    let email = Paragraph::new(app.settings_email.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(field_border(app.settings_field == SettingsField::Email))
            .title(" Email "),
    );
    f.render_widget(email, chunks[2]);

    let premium_line = if app.premium {
        Line::from(Span::styled(
            "★ Premium member",
            Style::default().fg(Color::Yellow),
        ))
    } else if app.signed_in() {
        Line::from(Span::styled(
            "Free plan — press (p) from the feed to upgrade",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::styled(
            "Sign in by saving a name, then explore from the feed.",
            Style::default().fg(Color::DarkGray),
        ))
    };
    f.render_widget(Paragraph::new(premium_line), chunks[3]);
}

/// The premium upgrade card, a full view of its own.
pub(super) fn render_subscribe(f: &mut Frame, area: Rect) {
    if area.width < 3 || area.height < 10 {
        return;
    }

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Upgrade to Premium",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Experience Thoughts Platform without limits.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "150 ETB / month   Limited Time Offer",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("  ✓ Ad-free reading experience"),
        Line::from("  ✓ Exclusive detailed articles & reports"),
        Line::from("  ✓ Support independent writers"),
        Line::from("  ✓ Early access to new features"),
        Line::from(""),
        Line::from(Span::styled(
            "[ Enter: Pay with Chapa ]",
            Style::default().fg(Color::Black).bg(Color::Green),
        )),
        Line::from(Span::styled(
            "Secured by Chapa Payment Gateway",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let card = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Premium "))
        .alignment(Alignment::Center);
    f.render_widget(card, area);
}

fn field_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}
