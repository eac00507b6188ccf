//! Offline downloads view.

use crate::app::App;
use ratatui::{layout::Rect, Frame};

use super::helpers::render_article_list;

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let articles = app.downloaded_articles();
    render_article_list(
        f,
        app,
        area,
        "Offline Downloads",
        &articles,
        app.list_selected,
        "Offline Downloads is Empty",
        "Articles you download for offline reading will appear here.",
    );
}
