use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use cm_common::api::{MatchRequest, MatchResponse};
use cm_common::logging::{init_tracing_subscriber, install_tracing_panic_hook, LogSettings};
use cm_common::matching::{MatchScorer, ScoringConfig, ScoringMode, WeightOverrides};
use cm_common::MatchError;
use dotenvy::dotenv;
use tracing::info;

const APP_NAME: &str = "cm-score";

#[derive(Debug, Parser)]
#[command(
    name = "cm-score",
    about = "Score a user's issue profile against an organization's profile"
)]
struct Cli {
    /// Path to a JSON match request, or `-` to read stdin
    #[arg(long, short, env = "CM_REQUEST_PATH", default_value = "-")]
    request: String,

    /// Scoring mode when the request does not name one
    /// (issue_action or issue_action_value). Without it CM_SCORING_MODE is
    /// read, and an unrecognised value there falls back to the default.
    #[arg(long)]
    mode: Option<ScoringMode>,

    /// Include the per-issue breakdown in the output
    #[arg(long)]
    explain: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read request {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid request JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Match(#[from] MatchError),
}

fn parse_request<R: Read>(reader: R) -> Result<MatchRequest, CliError> {
    Ok(serde_json::from_reader(reader)?)
}

fn read_request(path: &str) -> Result<MatchRequest, CliError> {
    let read_err = |source: io::Error| CliError::Read {
        path: path.to_string(),
        source,
    };

    if path == "-" {
        return parse_request(io::stdin().lock());
    }

    let file = File::open(PathBuf::from(path)).map_err(read_err)?;
    parse_request(BufReader::new(file))
}

fn base_config(mode: Option<ScoringMode>) -> ScoringConfig {
    match mode {
        Some(mode) => ScoringConfig::for_mode(mode).with_overrides(&WeightOverrides::from_env()),
        None => ScoringConfig::from_env(),
    }
}

fn score_request(
    request: &MatchRequest,
    base: ScoringConfig,
    explain: bool,
) -> Result<MatchResponse, CliError> {
    let scorer = MatchScorer::new(
        request.resolve_config(base),
        Arc::new(request.category_index()),
    )?;
    let scored_at = Utc::now();

    let response = if explain {
        let explanation = scorer.explain(&request.user, &request.organization)?;
        MatchResponse::from_explanation(explanation, scorer.config(), scored_at)
    } else {
        let score = scorer.score(&request.user, &request.organization)?;
        MatchResponse::from_score(score, scorer.config(), scored_at)
    };

    Ok(response)
}

fn run() -> Result<(), CliError> {
    dotenv().ok();
    let log_settings = LogSettings::from_env();
    init_tracing_subscriber(APP_NAME, &log_settings);
    install_tracing_panic_hook(APP_NAME, &log_settings);

    let cli = Cli::parse();
    let request = read_request(&cli.request)?;
    let response = score_request(&request, base_config(cli.mode), cli.explain)?;

    info!(
        mode = response.mode.as_ref(),
        total_score = response.score.total_score,
        "scored match request"
    );

    let output = if cli.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{output}");

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{APP_NAME} failed: {err}");
        std::process::exit(1);
    }
}
