//! Terminal UI
//!
//! Pure rendering of [`App`] state with ratatui. Left pane: search results.
//! Right pane: the open movie, or the watched summary and list.

pub mod detail;
pub mod search;
pub mod theme;
pub mod watched;

pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, InputMode};
use crate::pipeline::MIN_QUERY_LEN;

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Style::default().bg(Theme::BACKGROUND)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, chunks[0], app);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    search::render_results(frame, panes[0], app);
    if app.selection.is_open() {
        detail::render_detail(frame, panes[1], app);
    } else {
        watched::render_watched(frame, panes[1], app);
    }

    render_status_bar(frame, chunks[2], app);

    if let Some(ref error) = app.error {
        render_error_popup(frame, area, error);
    }
}

/// Logo, search box and result count
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(18), // Logo
            Constraint::Min(1),     // Search box
            Constraint::Length(22), // Result count
        ])
        .split(area);

    let logo = Paragraph::new(Line::from(vec![
        Span::raw("🍿 "),
        Span::styled(
            "usePopcorn",
            Style::default()
                .fg(Theme::PRIMARY_LIGHT)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(logo, header_chunks[0]);

    let editing = app.input_mode == InputMode::Editing;
    let search_text = if editing {
        let (before, after): (String, String) = {
            let split = app.search.cursor;
            let before = app.search.query.chars().take(split).collect();
            let after = app.search.query.chars().skip(split).collect();
            (before, after)
        };
        format!("⌕ {}│{}", before, after)
    } else if app.search.query.is_empty() {
        "⌕ Press / to search movies...".to_string()
    } else {
        format!("⌕ {}", app.search.query)
    };

    let search_box = Paragraph::new(search_text)
        .style(if editing {
            Theme::input().fg(Theme::PRIMARY_LIGHT)
        } else {
            Theme::input()
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(if editing {
                    Theme::border_focused()
                } else {
                    Theme::border()
                })
                .title(Span::styled(" SEARCH ", Theme::title())),
        );
    frame.render_widget(search_box, header_chunks[1]);

    let count = Paragraph::new(Line::from(vec![
        Span::styled("Found ", Theme::dimmed()),
        Span::styled(
            app.search_pipeline.results().len().to_string(),
            Theme::title(),
        ),
        Span::styled(" results", Theme::dimmed()),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(count, header_chunks[2]);
}

/// Mode indicator and key hints
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode_indicator = match app.input_mode {
        InputMode::Normal => Span::styled(
            " NORMAL ",
            Style::default().fg(Theme::TEXT).bg(Theme::PRIMARY),
        ),
        InputMode::Editing => Span::styled(
            " SEARCH ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::STAR),
        ),
    };

    let help = if app.input_mode == InputMode::Editing {
        format!(" type at least {} characters  ↵/ESC:done ", MIN_QUERY_LEN)
    } else if app.selection.is_open() {
        " 1-9,0:rate  a:add to list  ESC:close  q:quit ".to_string()
    } else {
        " /:search  ↵:open  tab:switch list  d:delete  r:retry  q:quit ".to_string()
    };

    let status_line = Line::from(vec![
        mode_indicator,
        Span::raw(" "),
        Span::styled(format!("{} watched", app.watched.len()), Theme::dimmed()),
        Span::raw(" │ "),
        Span::styled(help, Theme::dimmed()),
    ]);

    frame.render_widget(Paragraph::new(status_line).style(Theme::status_bar()), area);
}

/// Centered error overlay
fn render_error_popup(frame: &mut Frame, area: Rect, error: &str) {
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 5;

    let popup_area = Rect {
        x: area.x + (area.width.saturating_sub(popup_width)) / 2,
        y: area.y + (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height.min(area.height),
    };

    frame.render_widget(Clear, popup_area);

    let error_block = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(error, Theme::error())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Theme::error())
            .title(Span::styled(" ✗ ERROR ", Theme::error()))
            .style(Style::default().bg(Theme::BACKGROUND)),
    );

    frame.render_widget(error_block, popup_area);
}

/// Rounded panel block, highlighted when focused
pub(crate) fn panel(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        })
        .title(Span::styled(title, Theme::title()))
        .style(Style::default().bg(Theme::PANEL))
}
