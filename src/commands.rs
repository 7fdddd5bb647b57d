//! CLI Command Handlers
//!
//! Each handler drives the same pipelines and watched list the TUI uses,
//! awaiting them to completion instead of polling. Handlers take CLI args
//! and Output, and return an ExitCode.

use serde::Serialize;
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::api::{FailureKind, MovieSource, OmdbClient};
use crate::cli::{
    ExitCode, InfoCmd, MutationResponse, Output, SearchCmd, WatchedAddCmd, WatchedCmd,
    WatchedRemoveCmd,
};
use crate::config::Config;
use crate::models::{FetchResult, MovieDetail};
use crate::pipeline::{DetailPipeline, SearchPipeline, MIN_QUERY_LEN};
use crate::storage::FileStorage;
use crate::title::DisplayTitle;
use crate::watched::{WatchedError, WatchedList};

/// Everything a command needs from the environment
pub struct Context {
    pub source: Arc<dyn MovieSource>,
    pub data_dir: PathBuf,
    pub timeout: Duration,
}

impl Context {
    pub fn from_config(config: &Config) -> Self {
        let timeout = config.timeout();
        let client = OmdbClient::new(config.get_omdb_api_key()).with_timeout(timeout);
        Self {
            source: Arc::new(client),
            data_dir: config.data_dir(),
            timeout,
        }
    }

    fn watched(&self) -> WatchedList {
        WatchedList::hydrate(Box::new(FileStorage::in_dir(&self.data_dir)))
    }

    /// A detail pipeline for `id`, already settled
    async fn fetch_detail(&self, id: &str) -> DetailPipeline {
        let mut detail = DetailPipeline::new(Arc::clone(&self.source), DisplayTitle::default(), self.timeout);
        detail.select(Some(id));
        detail.settle().await;
        detail
    }
}

/// Print `items` as JSON or one per line
fn emit_list<T: Serialize + Display>(output: &Output, items: &[T]) -> ExitCode {
    if output.json {
        if let Err(e) = output.print(items) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else {
        for (i, item) in items.iter().enumerate() {
            println!("{:>3}. {}", i + 1, item);
        }
    }
    ExitCode::Success
}

fn emit<T: Serialize + Display>(output: &Output, item: &T) -> ExitCode {
    if output.json {
        if let Err(e) = output.print(item) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else {
        println!("{}", item);
    }
    ExitCode::Success
}

fn failure_code(kind: Option<FailureKind>) -> ExitCode {
    match kind {
        Some(FailureKind::NotFound) => ExitCode::NotFound,
        Some(FailureKind::Unavailable) | None => ExitCode::NetworkError,
    }
}

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, ctx: &Context, output: &Output) -> ExitCode {
    if cmd.query.trim().chars().count() < MIN_QUERY_LEN {
        output.info(format!("Queries need at least {} characters", MIN_QUERY_LEN));
    } else {
        output.info(format!("Searching for: {}", cmd.query));
    }

    let mut pipeline = SearchPipeline::new(Arc::clone(&ctx.source), ctx.timeout);
    pipeline.set_query(&cmd.query);

    pipeline.settle().await;
    match pipeline.state() {
        FetchResult::Success(results) => {
            let shown = &results[..results.len().min(cmd.limit)];
            emit_list(output, shown)
        }
        FetchResult::Failure(msg) => output.error(msg.clone(), failure_code(pipeline.failure_kind())),
        FetchResult::Idle | FetchResult::Loading => {
            output.error("Search did not complete", ExitCode::Error)
        }
    }
}

// =============================================================================
// Info Command
// =============================================================================

/// Detail plus whether (and how) the user already rated it
#[derive(Debug, Serialize)]
struct InfoResponse {
    #[serde(flatten)]
    detail: MovieDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    your_rating: Option<u8>,
}

impl Display for InfoResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let d = &self.detail;
        writeln!(f, "{}", d.title)?;
        writeln!(f, "{} • {} • {}", d.released, d.format_runtime(), d.genre)?;
        writeln!(f, "⭐ {:.1} IMDb rating", d.imdb_rating)?;
        if let Some(rating) = self.your_rating {
            writeln!(f, "You rated this movie {} ⭐", rating)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", d.plot)?;
        writeln!(f, "Starring {}", d.actors)?;
        write!(f, "Directed by {}", d.director)
    }
}

pub async fn info_cmd(cmd: InfoCmd, ctx: &Context, output: &Output) -> ExitCode {
    output.info(format!("Getting info for: {}", cmd.id));

    let pipeline = ctx.fetch_detail(&cmd.id).await;
    match pipeline.state() {
        FetchResult::Success(detail) => {
            let your_rating = ctx.watched().user_rating_for(&detail.id);
            let detail = detail.clone();
            emit(output, &InfoResponse { detail, your_rating })
        }
        FetchResult::Failure(msg) => output.error(msg.clone(), failure_code(pipeline.failure_kind())),
        FetchResult::Idle | FetchResult::Loading => {
            output.error("Lookup did not complete", ExitCode::Error)
        }
    }
}

// =============================================================================
// Watched Commands
// =============================================================================

pub async fn watched_cmd(cmd: WatchedCmd, ctx: &Context, output: &Output) -> ExitCode {
    match cmd {
        WatchedCmd::List => emit_list(output, ctx.watched().entries()),
        WatchedCmd::Stats => emit(output, &ctx.watched().stats()),
        WatchedCmd::Add(add) => watched_add(add, ctx, output).await,
        WatchedCmd::Remove(remove) => watched_remove(remove, ctx, output),
    }
}

fn watched_error(output: &Output, err: WatchedError) -> ExitCode {
    let code = match err {
        WatchedError::Duplicate(_) => ExitCode::Duplicate,
        WatchedError::InvalidRating(_) => ExitCode::InvalidArgs,
        WatchedError::Storage(_) | WatchedError::Serialize(_) => ExitCode::StorageError,
    };
    output.error(err.to_string(), code)
}

async fn watched_add(cmd: WatchedAddCmd, ctx: &Context, output: &Output) -> ExitCode {
    let mut list = ctx.watched();
    if list.contains(&cmd.id) {
        return watched_error(output, WatchedError::Duplicate(cmd.id));
    }

    output.info(format!("Fetching {}...", cmd.id));
    let mut detail = ctx.fetch_detail(&cmd.id).await;
    if let Some(msg) = detail.state().error() {
        return output.error(msg.to_string(), failure_code(detail.failure_kind()));
    }

    detail.rate(cmd.rating);
    let Some(entry) = detail.watched_entry() else {
        return output.error("Movie could not be rated", ExitCode::Error);
    };
    let id = entry.id.clone();

    match list.append(entry) {
        Ok(entries) => {
            let response = MutationResponse {
                status: "added",
                id,
                count: entries.len(),
            };
            if output.json {
                emit_json(output, &response)
            } else {
                println!("Added {} ({} watched)", response.id, response.count);
                ExitCode::Success
            }
        }
        Err(e) => watched_error(output, e),
    }
}

fn watched_remove(cmd: WatchedRemoveCmd, ctx: &Context, output: &Output) -> ExitCode {
    let mut list = ctx.watched();
    if !list.contains(&cmd.id) {
        return output.error(format!("{} is not in the watched list", cmd.id), ExitCode::NotFound);
    }

    match list.remove(&cmd.id) {
        Ok(entries) => {
            let response = MutationResponse {
                status: "removed",
                id: cmd.id,
                count: entries.len(),
            };
            if output.json {
                emit_json(output, &response)
            } else {
                println!("Removed {} ({} watched)", response.id, response.count);
                ExitCode::Success
            }
        }
        Err(e) => watched_error(output, e),
    }
}

fn emit_json<T: Serialize>(output: &Output, data: &T) -> ExitCode {
    match output.print(data) {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}
