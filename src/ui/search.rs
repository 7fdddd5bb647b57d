//! Search results pane

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::{panel, Theme};
use crate::app::{App, Focus};
use crate::models::FetchResult;
use crate::pipeline::MIN_QUERY_LEN;

pub fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let results = app.search_pipeline.results();
    let block = panel(
        format!(" RESULTS ({}) ", results.len()),
        app.focus == Focus::Results,
    );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let message = match app.search_pipeline.state() {
        FetchResult::Loading => Some(Paragraph::new("⟳ Loading...").style(Theme::loading())),
        FetchResult::Failure(msg) => {
            Some(Paragraph::new(format!("⛔ {}", msg)).style(Theme::error()))
        }
        FetchResult::Success(list) if list.is_empty() => {
            let hint = if app.search.query.trim().chars().count() < MIN_QUERY_LEN {
                format!("Search for a movie ({}+ characters)", MIN_QUERY_LEN)
            } else {
                "No results".to_string()
            };
            Some(Paragraph::new(hint).style(Theme::dimmed()))
        }
        _ => None,
    };

    if let Some(message) = message {
        frame.render_widget(
            message.alignment(Alignment::Center).wrap(Wrap { trim: true }),
            inner,
        );
        return;
    }

    let open = app.selection.current();
    let items: Vec<ListItem> = results
        .iter()
        .map(|movie| {
            let marker = if open == Some(movie.id.as_str()) { "▸ " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Theme::keybind()),
                Span::styled(movie.title.as_str(), Theme::text()),
                Span::styled(format!("  🗓 {}", movie.year), Theme::year()),
            ]))
        })
        .collect();

    let list = List::new(items).highlight_style(Theme::list_item_selected());
    let mut state = ListState::default().with_selected(Some(app.search.list.selected));
    frame.render_stateful_widget(list, inner, &mut state);
}
