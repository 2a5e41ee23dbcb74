//! One-shot command line search against the backend search service.

use clap::Parser;
use site_search::config::Config;
use site_search::render::{render_raw, render_text};
use site_search::{SearchClient, SearchFormController, UiState};
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(name = "site-search", about = "Ask a question about a single website")]
struct Opts {
    /// Site to search, e.g. example.com
    #[clap(long)]
    site: String,

    #[clap(long)]
    question: String,

    /// Backend base URL; overrides SITE_SEARCH_API_URL
    #[clap(long)]
    api_url: Option<String>,

    /// Request timeout; overrides SITE_SEARCH_TIMEOUT_SECS
    #[clap(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    /// Wrap width for the rendered answer
    #[clap(long, default_value_t = 80)]
    width: usize,

    /// Print the answer markdown as returned
    #[clap(long)]
    raw: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();
    let config = Config::from_env()?;

    let api_url = opts.api_url.unwrap_or(config.api_url);
    let timeout = opts
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(config.timeout);

    let mut controller = SearchFormController::new(SearchClient::with_timeout(&api_url, timeout)?);
    controller.update_site(opts.site);
    controller.update_question(opts.question);

    if !controller.submit().await {
        eprintln!("Both --site and --question must be non-empty");
        return Ok(ExitCode::from(2));
    }

    let state = controller.state();
    let output = if opts.raw {
        render_raw(&state)
    } else {
        render_text(&state, opts.width)
    };

    match state {
        UiState::Failure(_) => {
            eprint!("{}", output);
            Ok(ExitCode::FAILURE)
        }
        _ => {
            print!("{}", output);
            Ok(ExitCode::SUCCESS)
        }
    }
}
