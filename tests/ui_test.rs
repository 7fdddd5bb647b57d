//! UI rendering tests for popcorn
//!
//! Renders the full App into a ratatui TestBackend and checks what ends up
//! on screen for each state: empty, results, open movie, watched list, errors.

use async_trait::async_trait;
use popcorn::api::{LookupError, MovieSource};
use popcorn::app::App;
use popcorn::models::{MovieDetail, MovieSummary, WatchedEntry};
use popcorn::storage::MemoryStorage;
use popcorn::ui;
use popcorn::watched::WATCHED_KEY;
use ratatui::{backend::TestBackend, Terminal};
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Fixtures
// =============================================================================

struct Catalog;

#[async_trait]
impl MovieSource for Catalog {
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, LookupError> {
        if query == "nothing" {
            return Err(LookupError::NotFound);
        }
        Ok(vec![
            MovieSummary {
                id: "tt0078748".into(),
                title: "Alien".into(),
                year: "1979".into(),
                poster_url: String::new(),
            },
            MovieSummary {
                id: "tt0090605".into(),
                title: "Aliens".into(),
                year: "1986".into(),
                poster_url: String::new(),
            },
        ])
    }

    async fn detail(&self, id: &str) -> Result<MovieDetail, LookupError> {
        Ok(MovieDetail {
            id: id.to_string(),
            title: "Alien".into(),
            year: "1979".into(),
            poster_url: String::new(),
            runtime_minutes: 117,
            imdb_rating: 8.5,
            plot: "The crew of a commercial spacecraft meets a deadly lifeform.".into(),
            released: "22 Jun 1979".into(),
            actors: "Sigourney Weaver, Tom Skerritt".into(),
            director: "Ridley Scott".into(),
            genre: "Horror, Sci-Fi".into(),
        })
    }
}

fn app_with(storage: MemoryStorage) -> App {
    App::new(Arc::new(Catalog), Box::new(storage), Duration::from_secs(5))
}

fn app() -> App {
    app_with(MemoryStorage::new())
}

/// Render `app` and flatten the buffer into one line per row
fn render(app: &App, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| ui::render(frame, app)).unwrap();

    let buffer = terminal.backend().buffer();
    let mut screen = String::new();
    for y in 0..height {
        for x in 0..width {
            screen.push_str(buffer[(x, y)].symbol());
        }
        screen.push('\n');
    }
    screen
}

// =============================================================================
// Layout
// =============================================================================

#[test]
fn test_empty_app_at_minimum_size() {
    let app = app();
    let screen = render(&app, 80, 24);

    assert!(screen.contains("usePopcorn"));
    assert!(screen.contains("Press / to search"));
    assert!(screen.contains("RESULTS (0)"));
    assert!(screen.contains("Search for a movie"));
    assert!(screen.contains("MOVIES YOU WATCHED"));
    assert!(screen.contains("Rate a movie"));
    assert!(screen.contains("NORMAL"));
}

#[test]
fn test_renders_at_small_and_large_sizes() {
    let app = app();
    for (w, h) in [(40, 10), (80, 24), (200, 50)] {
        let screen = render(&app, w, h);
        assert_eq!(screen.lines().count(), h as usize);
    }
}

// =============================================================================
// States
// =============================================================================

#[tokio::test]
async fn test_results_list() {
    let mut app = app();
    app.set_query("alien");
    assert!(render(&app, 100, 30).contains("Loading"));

    app.settle().await;
    let screen = render(&app, 100, 30);
    assert!(screen.contains("RESULTS (2)"));
    assert!(screen.contains("Aliens"));
    assert!(screen.contains("1986"));
    assert!(screen.contains("Found 2 results"));
}

#[tokio::test]
async fn test_search_failure_message() {
    let mut app = app();
    app.set_query("nothing");
    app.settle().await;

    let screen = render(&app, 100, 30);
    assert!(screen.contains("Movie not found"));
    assert!(screen.contains("RESULTS (0)"));
}

#[tokio::test]
async fn test_open_movie_detail() {
    let mut app = app();
    app.select_movie("tt0078748");
    app.settle().await;

    let screen = render(&app, 120, 40);
    assert!(screen.contains("22 Jun 1979"));
    assert!(screen.contains("1h 57m"));
    assert!(screen.contains("8.5 IMDb rating"));
    assert!(screen.contains("Directed by Ridley Scott"));
    assert!(!screen.contains("Add to list"));
    assert!(screen.contains("ESC:close"));

    app.rate(8);
    let screen = render(&app, 120, 40);
    assert!(screen.contains("+ Add to list"));
}

#[tokio::test]
async fn test_watched_movie_shows_stored_rating() {
    let storage = MemoryStorage::new();
    let entry = WatchedEntry {
        id: "tt0078748".into(),
        title: "Alien".into(),
        year: "1979".into(),
        poster_url: String::new(),
        imdb_rating: 8.5,
        runtime_minutes: 117,
        user_rating: 9,
        rating_decision_count: 1,
    };
    storage.insert_raw(WATCHED_KEY, serde_json::to_string(&vec![entry]).unwrap());
    let mut app = app_with(storage);

    let screen = render(&app, 120, 40);
    assert!(screen.contains("1 movies"));
    assert!(screen.contains("117 min"));
    assert!(screen.contains("1 watched"));

    app.select_movie("tt0078748");
    app.settle().await;
    let screen = render(&app, 120, 40);
    assert!(screen.contains("You rated this movie 9"));
    assert!(!screen.contains("Add to list"));
}

#[test]
fn test_error_popup() {
    let mut app = app();
    app.set_error("Could not save watched list");

    let screen = render(&app, 80, 24);
    assert!(screen.contains("ERROR"));
    assert!(screen.contains("Could not save watched list"));
}
