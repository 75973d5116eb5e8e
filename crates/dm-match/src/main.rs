use clap::Parser;
use dm_common::config::parse_timeout_secs;
use dm_common::evidence::HttpPageFetcher;
use dm_common::logging::{init_tracing_subscriber, install_tracing_panic_hook};
use dm_common::{ConfigError, FetchConfig, MatchError, Matcher, TestKind, Weights};
use dotenvy::dotenv;
use thiserror::Error;
use tracing::info;

const APP_NAME: &str = "dm-match";

#[derive(Debug, Parser)]
#[command(
    name = "dm-match",
    about = "Estimate how likely each domain belongs to the named organization"
)]
struct Cli {
    /// Organization reference, e.g. "The Genco Olive Oil Company, LLP"
    reference: String,

    /// Domains to score against the reference
    #[arg(required = true)]
    domains: Vec<String>,

    /// Skip the home-page fetch (zero-weights web_page_ref)
    #[arg(long, default_value_t = false)]
    no_web: bool,

    /// Override a test weight, e.g. --weight root_phrase=60 (repeatable)
    #[arg(long = "weight", value_name = "TEST=POINTS")]
    weights: Vec<String>,

    /// Home-page fetch timeout in seconds (overrides DM_FETCH_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<String>,

    /// Print the full outcome as JSON lines instead of a summary
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{domain}: {source}")]
    Match {
        domain: String,
        #[source]
        source: MatchError,
    },
    #[error("failed to encode outcome: {0}")]
    Json(#[from] serde_json::Error),
}

fn build_matcher(cli: &Cli) -> Result<Matcher, ConfigError> {
    let mut weights = Weights::from_env()?;
    for pair in &cli.weights {
        weights.apply_override(pair)?;
    }
    if cli.no_web {
        weights.set(TestKind::WebPageRef, 0);
    }

    let mut fetch = FetchConfig::from_env()?;
    if let Some(raw) = cli.timeout_secs.as_deref() {
        fetch.timeout = parse_timeout_secs(raw)?;
    }

    Ok(Matcher::new()
        .with_weights(weights)
        .with_fetcher(HttpPageFetcher::new(fetch)))
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let matcher = build_matcher(&cli)?;
    info!(reference = %cli.reference, domains = cli.domains.len(), "matching domains");

    for domain in &cli.domains {
        let outcome = matcher
            .evaluate(&cli.reference, domain)
            .await
            .map_err(|source| CliError::Match {
                domain: domain.clone(),
                source,
            })?;

        if cli.json {
            let mut line = serde_json::to_value(&outcome)?;
            line["domain"] = serde_json::Value::String(domain.clone());
            println!("{line}");
        } else {
            let passed: Vec<&str> = outcome.passed.iter().map(|kind| kind.as_ref()).collect();
            println!(
                "{domain}\t{:.3}\traw={}\tpassed=[{}]",
                outcome.probability,
                outcome.raw_score,
                passed.join(",")
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing_subscriber(APP_NAME);
    install_tracing_panic_hook(APP_NAME);

    if let Err(err) = run(Cli::parse()).await {
        eprintln!("{APP_NAME} failed: {err}");
        std::process::exit(1);
    }
}
