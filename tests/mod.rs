//! Integration tests for popcorn
//!
//! Tests are organized by component:
//! - omdb_test: OMDb client against a mocked server
//! - pipeline_test: Search and detail pipelines with out-of-order responses
//! - watched_test: Watched list persistence on disk
//! - cli_test: Argument parsing, JSON output and command exit codes
//! - ui_test: Full-screen rendering into a TestBackend
//! - e2e_test: End-to-end flow (Search -> Detail -> Rate -> Watched)

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
