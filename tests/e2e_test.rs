//! End-to-end flow tests for popcorn
//!
//! Drives the App against a mocked OMDb server and real file storage:
//! search -> select -> rate -> add to watched -> restart.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mockito::{Matcher, Mock, Server, ServerGuard};
use popcorn::api::OmdbClient;
use popcorn::app::{App, Focus, InputMode};
use popcorn::models::FetchResult;
use popcorn::storage::FileStorage;
use popcorn::title::DEFAULT_TITLE;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const KEY: &str = "testkey";
const INCEPTION: &str = "tt1375666";

// =============================================================================
// Mock Response Fixtures
// =============================================================================

fn search_body() -> &'static str {
    r#"{
        "Search": [
            {"Title": "Inception", "Year": "2010", "imdbID": "tt1375666", "Type": "movie", "Poster": "N/A"},
            {"Title": "Inception: The Cobol Job", "Year": "2010", "imdbID": "tt5295894", "Type": "movie", "Poster": "N/A"}
        ],
        "totalResults": "2",
        "Response": "True"
    }"#
}

fn detail_body() -> &'static str {
    r#"{
        "Title": "Inception",
        "Year": "2010",
        "Released": "16 Jul 2010",
        "Runtime": "148 min",
        "Genre": "Action, Adventure, Sci-Fi",
        "Director": "Christopher Nolan",
        "Actors": "Leonardo DiCaprio, Joseph Gordon-Levitt, Elliot Page",
        "Plot": "A thief who steals corporate secrets through dream-sharing technology.",
        "Poster": "N/A",
        "imdbRating": "8.8",
        "imdbID": "tt1375666",
        "Response": "True"
    }"#
}

async fn mock_omdb(server: &mut ServerGuard) -> (Mock, Mock) {
    let search = server
        .mock("GET", "/")
        .match_query(Matcher::Regex("(^|&)s=".into()))
        .with_status(200)
        .with_body(search_body())
        .expect_at_least(1)
        .create_async()
        .await;

    let detail = server
        .mock("GET", "/")
        .match_query(Matcher::UrlEncoded("i".into(), INCEPTION.into()))
        .with_status(200)
        .with_body(detail_body())
        .expect_at_least(1)
        .create_async()
        .await;

    (search, detail)
}

fn app(server: &ServerGuard, dir: &TempDir) -> App {
    let client = OmdbClient::with_base_url(KEY, server.url());
    App::new(
        Arc::new(client),
        Box::new(FileStorage::in_dir(dir.path())),
        Duration::from_secs(5),
    )
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::empty()));
}

// =============================================================================
// Full Journey
// =============================================================================

#[tokio::test]
async fn test_inception_journey() {
    let mut server = Server::new_async().await;
    let (search_mock, detail_mock) = mock_omdb(&mut server).await;
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(&server, &dir);

    // Search
    app.set_query("Inception");
    assert!(app.search_pipeline.state().is_loading());
    app.settle().await;
    let results = app.search_pipeline.results();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, INCEPTION);
    assert_eq!(results[0].title, "Inception");
    assert_eq!(results[0].year, "2010");

    // Select
    app.select_movie(INCEPTION);
    assert!(app.detail.state().is_loading());
    app.settle().await;
    let detail = app.detail.detail().expect("detail should be loaded");
    assert_eq!(detail.runtime_minutes, 148);
    assert_eq!(app.title().get(), "Movie | Inception");

    // Rate twice
    assert!(app.rate(9));
    assert!(app.rate(7));
    assert_eq!(app.detail.user_rating(), 7);
    assert_eq!(app.detail.rating_decisions(), 2);

    // Add to watched
    assert!(app.add_watched());
    assert_eq!(app.watched.len(), 1);
    let entry = &app.watched.entries()[0];
    assert_eq!(entry.id, INCEPTION);
    assert_eq!(entry.user_rating, 7);
    assert_eq!(entry.rating_decision_count, 2);
    assert_eq!(entry.runtime_minutes, 148);

    // Adding closes the movie and restores the title
    assert!(!app.selection.is_open());
    assert!(app.detail.state().is_idle());
    assert_eq!(app.title().get(), DEFAULT_TITLE);

    search_mock.assert_async().await;
    detail_mock.assert_async().await;

    // Restart: the entry is back and reopening shows the stored rating
    let mut restarted = self::app(&server, &dir);
    assert_eq!(restarted.watched.len(), 1);
    restarted.select_movie(INCEPTION);
    restarted.settle().await;
    assert_eq!(restarted.watched_rating(), Some(7));
    assert!(!restarted.rate(3));
    assert!(restarted.detail.watched_entry().is_none());
}

#[tokio::test]
async fn test_keyboard_journey() {
    let mut server = Server::new_async().await;
    let _mocks = mock_omdb(&mut server).await;
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(&server, &dir);

    // '/' focuses the search box
    press(&mut app, KeyCode::Char('/'));
    assert_eq!(app.input_mode, InputMode::Editing);
    for c in "inception".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    assert_eq!(app.search.query, "inception");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.input_mode, InputMode::Normal);

    app.settle().await;
    assert_eq!(app.search_pipeline.results().len(), 2);

    // Enter opens the highlighted result
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.selection.current(), Some(INCEPTION));
    app.settle().await;
    assert!(matches!(app.detail.state(), FetchResult::Success(_)));

    press(&mut app, KeyCode::Char('9'));
    press(&mut app, KeyCode::Char('7'));
    assert_eq!(app.detail.rating_decisions(), 2);
    press(&mut app, KeyCode::Char('a'));

    assert_eq!(app.watched.len(), 1);
    assert!(!app.selection.is_open());

    // Remove it again from the watched pane
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.focus, Focus::Watched);
    press(&mut app, KeyCode::Char('d'));
    assert!(app.watched.is_empty());
}

#[tokio::test]
async fn test_escape_closes_open_movie() {
    let mut server = Server::new_async().await;
    let _mocks = mock_omdb(&mut server).await;
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(&server, &dir);

    app.select_movie(INCEPTION);
    app.settle().await;
    assert_eq!(app.title().get(), "Movie | Inception");

    press(&mut app, KeyCode::Esc);
    assert!(!app.selection.is_open());
    assert_eq!(app.title().get(), DEFAULT_TITLE);

    // With nothing open Esc has no listener left
    assert_eq!(app.keys().listener_count(KeyCode::Esc), 0);
}

#[tokio::test]
async fn test_unknown_movie_shows_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"Response": "False", "Error": "Movie not found!"}"#)
        .create_async()
        .await;
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(&server, &dir);

    app.set_query("qwertyuiop");
    app.settle().await;
    assert_eq!(
        app.search_pipeline.state(),
        &FetchResult::Failure("Movie not found".into())
    );
    assert!(app.search_pipeline.results().is_empty());
}
