//! Helper functions for UI operations.
//!
//! Shared widgets (article rows, empty states, centered overlays) plus the
//! spawned file reads for the editor's cover and draft imports.

use crate::app::{App, AppEvent};
use crate::storage::Article;
use crate::util::{data_uri_for, strip_control_chars, truncate_to_width};
use futures::FutureExt;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Wraps a future to catch panics and convert them to errors.
///
/// Spawned file reads run off the event loop; without this a panic inside
/// one would silently vanish into the Tokio runtime. Instead it is turned
/// into an `Err(String)` the caller forwards as [`AppEvent::TaskPanicked`].
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Largest file the editor will read for a cover image or draft (5 MB).
/// Covers embed as data URIs, so anything bigger would bloat the database.
const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Spawn a read of a local cover image, delivered as a `data:` URI.
///
/// A new read aborts any in-flight one, so only the latest request can land
/// (last-write-wins, no queueing).
pub(super) fn spawn_cover_read(app: &mut App, path: PathBuf, event_tx: &mpsc::Sender<AppEvent>) {
    if let Some(handle) = app.file_read_handle.take() {
        handle.abort();
        tracing::debug!("Aborted previous file read task");
    }

    let tx = event_tx.clone();
    app.file_read_handle = Some(tokio::spawn(async move {
        let tx_panic = tx.clone();
        match catch_task_panic(async {
            let event = match read_capped(&path).await {
                Ok(bytes) => AppEvent::CoverImageRead {
                    data_uri: data_uri_for(&path, &bytes),
                },
                Err(e) => AppEvent::CoverImageFailed {
                    error: e.to_string(),
                },
            };
            if let Err(e) = tx.send(event).await {
                tracing::warn!(error = %e, "Channel send failed (receiver dropped)");
            }
        })
        .await
        {
            Ok(()) => {}
            Err(panic_msg) => {
                tracing::error!(task = "cover_read", error = %panic_msg, "Background task panicked");
                let _ = tx_panic
                    .send(AppEvent::TaskPanicked {
                        task: "cover_read",
                        error: panic_msg,
                    })
                    .await;
            }
        }
    }));
}

/// Spawn a read of a draft text file for the editor.
///
/// The draft's leading `# ` heading (if any) is split out as a title; the
/// file stem rides along as the title fallback. Same last-write-wins rule
/// as [`spawn_cover_read`].
pub(super) fn spawn_draft_read(app: &mut App, path: PathBuf, event_tx: &mpsc::Sender<AppEvent>) {
    if let Some(handle) = app.file_read_handle.take() {
        handle.abort();
        tracing::debug!("Aborted previous file read task");
    }

    let tx = event_tx.clone();
    app.file_read_handle = Some(tokio::spawn(async move {
        let tx_panic = tx.clone();
        match catch_task_panic(async {
            let event = match read_capped(&path).await {
                Ok(bytes) => match String::from_utf8(bytes) {
                    Ok(text) => {
                        let text = strip_control_chars(&text).into_owned();
                        let (heading, body) = crate::app::split_draft(&text);
                        let stem = path
                            .file_stem()
                            .and_then(|s| s.to_str())
                            .unwrap_or("Untitled")
                            .to_string();
                        AppEvent::DraftFileRead {
                            heading,
                            stem,
                            body,
                        }
                    }
                    Err(_) => AppEvent::DraftFileFailed {
                        error: "File is not valid UTF-8 text".to_string(),
                    },
                },
                Err(e) => AppEvent::DraftFileFailed {
                    error: e.to_string(),
                },
            };
            if let Err(e) = tx.send(event).await {
                tracing::warn!(error = %e, "Channel send failed (receiver dropped)");
            }
        })
        .await
        {
            Ok(()) => {}
            Err(panic_msg) => {
                tracing::error!(task = "draft_read", error = %panic_msg, "Background task panicked");
                let _ = tx_panic
                    .send(AppEvent::TaskPanicked {
                        task: "draft_read",
                        error: panic_msg,
                    })
                    .await;
            }
        }
    }));
}

/// Read a file, refusing anything over [`MAX_UPLOAD_BYTES`].
async fn read_capped(path: &std::path::Path) -> std::io::Result<Vec<u8>> {
    let meta = tokio::fs::metadata(path).await?;
    if meta.len() > MAX_UPLOAD_BYTES {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("File too large ({} bytes, max {})", meta.len(), MAX_UPLOAD_BYTES),
        ));
    }
    tokio::fs::read(path).await
}

// ============================================================================
// Shared Widgets
// ============================================================================

/// Build the two-line list row used by every article list: metadata line
/// (author • category, save/download markers), then the title.
pub(super) fn article_row<'a>(
    app: &App,
    article: &'a Article,
    selected: bool,
    width: u16,
) -> ListItem<'a> {
    let meta_style = if selected {
        Style::default().bg(Color::DarkGray).fg(Color::Gray)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title_style = if selected {
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let mut markers = String::new();
    if app.is_saved(&article.id) {
        markers.push_str(" [saved]");
    }
    if app.is_downloaded(&article.id) {
        markers.push_str(" [offline]");
    }
    if app.is_following(&article.author) {
        markers.push_str(" [following]");
    }

    let meta = format!(
        "{} • {} • {} • {}{}",
        article.author, article.category, article.published, article.read_time, markers
    );
    let max = width.saturating_sub(4) as usize;
    let meta = truncate_to_width(&strip_control_chars(&meta), max).into_owned();
    let title = truncate_to_width(&strip_control_chars(&article.title), max).into_owned();

    ListItem::new(vec![
        Line::from(Span::styled(title, title_style)),
        Line::from(Span::styled(meta, meta_style)),
    ])
}

/// Render a bordered list of article rows with a title, or a centered empty
/// state when the list is empty.
#[allow(clippy::too_many_arguments)]
pub(super) fn render_article_list(
    f: &mut Frame,
    app: &App,
    area: Rect,
    title: &str,
    articles: &[&Article],
    selected: usize,
    empty_heading: &str,
    empty_prompt: &str,
) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title));

    if articles.is_empty() {
        let text = format!("\n{}\n\n{}", empty_heading, empty_prompt);
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
        return;
    }

    // Two lines per row; keep the selection in view with a coarse offset.
    let visible_rows = (area.height.saturating_sub(2) / 2) as usize;
    let offset = selected.saturating_sub(visible_rows.saturating_sub(1));

    let items: Vec<ListItem> = articles
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_rows.max(1))
        .map(|(i, article)| article_row(app, article, i == selected, area.width))
        .collect();

    let list = List::new(items).block(block);
    f.render_widget(list, area);
}

/// Create a centered rectangle with the given percentage of the parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
