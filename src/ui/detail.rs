//! Movie detail pane with the star rating widget

use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use super::{panel, Theme};
use crate::app::App;
use crate::models::{FetchResult, MovieDetail, MAX_USER_RATING};

pub fn render_detail(frame: &mut Frame, area: Rect, app: &App) {
    let title = app
        .detail
        .detail()
        .map(|d| format!(" {} ", d.title))
        .unwrap_or_else(|| " MOVIE ".to_string());
    let block = panel(title, true);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = match app.detail.state() {
        FetchResult::Success(detail) => Paragraph::new(detail_lines(app, detail)),
        FetchResult::Failure(msg) => Paragraph::new(format!("⛔ {}", msg))
            .style(Theme::error())
            .alignment(Alignment::Center),
        FetchResult::Loading | FetchResult::Idle => Paragraph::new("⟳ Loading...")
            .style(Theme::loading())
            .alignment(Alignment::Center),
    };

    frame.render_widget(paragraph.wrap(Wrap { trim: true }), inner);
}

fn detail_lines<'a>(app: &App, detail: &'a MovieDetail) -> Vec<Line<'a>> {
    let mut lines = vec![
        Line::from(Span::styled(detail.title.as_str(), Theme::title())),
        Line::from(Span::styled(
            format!("{} • {}", detail.released, detail.format_runtime()),
            Theme::dimmed(),
        )),
        Line::from(Span::styled(detail.genre.as_str(), Theme::dimmed())),
        Line::from(vec![
            Span::styled("⭐ ", Theme::star()),
            Span::styled(format!("{:.1} IMDb rating", detail.imdb_rating), Theme::text()),
        ]),
        Line::from(""),
    ];

    match app.watched_rating() {
        Some(rating) => lines.push(Line::from(Span::styled(
            format!("You rated this movie {} ⭐", rating),
            Theme::star(),
        ))),
        None => {
            let rating = app.detail.user_rating();
            lines.push(Line::from(vec![
                Span::styled(star_bar(rating), Theme::star()),
                Span::raw("  "),
                Span::styled(
                    if rating > 0 { rating.to_string() } else { String::new() },
                    Theme::star(),
                ),
            ]));
            if rating > 0 {
                lines.push(Line::from(vec![
                    Span::styled(" a ", Theme::keybind()),
                    Span::styled("+ Add to list", Theme::text()),
                ]));
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        detail.plot.as_str(),
        Theme::text().add_modifier(Modifier::ITALIC),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Starring ", Theme::dimmed()),
        Span::styled(detail.actors.as_str(), Theme::text()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Directed by ", Theme::dimmed()),
        Span::styled(detail.director.as_str(), Theme::text()),
    ]));
    lines
}

/// `rating` filled stars out of ten
pub fn star_bar(rating: u8) -> String {
    let filled = rating.min(MAX_USER_RATING) as usize;
    let empty = MAX_USER_RATING as usize - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_bar() {
        assert_eq!(star_bar(0), "☆☆☆☆☆☆☆☆☆☆");
        assert_eq!(star_bar(7), "★★★★★★★☆☆☆");
        assert_eq!(star_bar(12).chars().count(), 10);
    }
}
