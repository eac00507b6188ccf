//! Render functions for the TUI.
//!
//! This module handles all rendering logic, dispatching to the appropriate
//! view based on application state, then stacking overlays (help,
//! confirmation, fatal banner) on top.

use crate::app::{App, ConfirmAction, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{
    audio, categories, downloads, editor, feed, feedback, help, history, profile, reader, saved,
    settings, status,
};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Main render dispatch function.
///
/// Routes to the appropriate view renderer based on current application
/// state. A set fatal banner replaces the content area entirely; the status
/// bar stays so the reload/quit hints remain visible.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    // Minimum terminal size check for usable UI
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    if app.fatal.is_some() {
        render_fatal_banner(f, app, chunks[0]);
        status::render(f, app, chunks[1]);
        return;
    }

    match app.view {
        View::Feed => feed::render(f, app, chunks[0]),
        View::Reader => reader::render(f, app, chunks[0]),
        View::Editor => editor::render(f, app, chunks[0]),
        View::Saved => saved::render(f, app, chunks[0]),
        View::History => history::render(f, app, chunks[0]),
        View::Downloads => downloads::render(f, app, chunks[0]),
        View::Categories => categories::render(f, app, chunks[0]),
        View::Profile => profile::render(f, app, chunks[0]),
        View::Settings => settings::render(f, app, chunks[0]),
        View::Subscribe => settings::render_subscribe(f, chunks[0]),
        View::Audio => audio::render(f, chunks[0]),
        View::Feedback => feedback::render(f, app, chunks[0]),
    }

    status::render(f, app, chunks[1]);

    // Render help overlay on top of any view when active
    if app.show_help {
        help::render(f, app);
    }

    // Render confirmation dialog on top of any view when active
    if let Some(ref confirm) = app.pending_confirm {
        render_confirm_overlay(f, confirm);
    }
}

/// Render the fatal banner replacing the primary content area.
///
/// Nothing retries automatically; the user reloads in place or quits.
fn render_fatal_banner(f: &mut Frame, app: &App, area: Rect) {
    let error = app.fatal.as_deref().unwrap_or("Unknown error");
    let text = format!(
        "Something went wrong.\n\n{}\n\nPress (r) to reload, (q) to quit.",
        error
    );
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Error "),
        )
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Render a confirmation dialog overlay centered on screen.
fn render_confirm_overlay(f: &mut Frame, confirm: &ConfirmAction) {
    let area = f.area();

    let text = match confirm {
        ConfirmAction::DeleteStory { title, .. } => format!(
            "{}\n\n\"{}\"\n\n(y) Confirm  (n/Esc) Cancel",
            confirm.prompt(),
            title
        ),
        ConfirmAction::SignOut => {
            format!("{}\n\n(y) Confirm  (n/Esc) Cancel", confirm.prompt())
        }
    };

    // Size: at most 50 chars wide, 8 lines tall, centered
    let width = 50u16.min(area.width.saturating_sub(4));
    let height = 8u16.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay = Rect::new(x, y, width, height);

    if overlay.width < 10 || overlay.height < 5 {
        return;
    }

    f.render_widget(Clear, overlay);

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Confirm "),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, overlay);
}
