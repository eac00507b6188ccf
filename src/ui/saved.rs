//! Saved library view.

use crate::app::App;
use ratatui::{layout::Rect, Frame};

use super::helpers::render_article_list;

pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let articles = app.saved_articles();
    render_article_list(
        f,
        app,
        area,
        "Saved",
        &articles,
        app.list_selected,
        "Your library is empty",
        "Articles you bookmark will appear here for quick access.",
    );
}
