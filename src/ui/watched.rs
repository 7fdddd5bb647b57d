//! Watched summary and list pane

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use super::{panel, Theme};
use crate::app::{App, Focus};

pub fn render_watched(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(area);

    let stats = app.watched.stats();
    let summary = Paragraph::new(Line::from(vec![
        Span::styled(format!("#️⃣ {} movies  ", stats.count), Theme::text()),
        Span::styled(format!("⭐ {:.2}  ", stats.avg_imdb_rating), Theme::star()),
        Span::styled(format!("🌟 {:.2}  ", stats.avg_user_rating), Theme::star()),
        Span::styled(format!("⏳ {:.0} min", stats.avg_runtime), Theme::dimmed()),
    ]))
    .block(panel(" MOVIES YOU WATCHED ".to_string(), false));
    frame.render_widget(summary, chunks[0]);

    let block = panel(" WATCHED ".to_string(), app.focus == Focus::Watched);
    let inner = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);

    if app.watched.is_empty() {
        let empty = Paragraph::new("Rate a movie and add it to your list")
            .style(Theme::dimmed())
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let items: Vec<ListItem> = app
        .watched
        .entries()
        .iter()
        .map(|entry| {
            ListItem::new(vec![
                Line::from(Span::styled(entry.title.as_str(), Theme::text())),
                Line::from(vec![
                    Span::styled(format!("  ⭐ {:.1}", entry.imdb_rating), Theme::star()),
                    Span::styled(format!("  🌟 {}", entry.user_rating), Theme::star()),
                    Span::styled(format!("  ⏳ {} min", entry.runtime_minutes), Theme::dimmed()),
                ]),
            ])
        })
        .collect();

    let list = List::new(items).highlight_style(Theme::list_item_selected());
    let mut state = ListState::default();
    if app.focus == Focus::Watched {
        state.select(Some(app.watched_list.selected));
    }
    frame.render_stateful_widget(list, inner, &mut state);
}
