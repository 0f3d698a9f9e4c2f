use clap::{Parser, Subcommand};
use std::process::Command;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use unified_search::engine::{external_trigger_url, CONFIGURING_COMMAND, INIT_TRIGGER};
use unified_search::query::normalize_input;
use unified_search::{
    ConfigAction, FuzzyScorer, JsonCustomizationStore, ParsedQuery, Ranker, Response,
    SearchCatalog, SearchEngine, SearchError, WorkflowSettings,
};

#[derive(Parser)]
#[command(name = "unified-search")]
#[command(about = "Unified Search workflow CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a script filter query
    Search {
        /// Raw launcher input
        input: Option<String>,
    },

    /// Apply the configuration action passed in the environment
    Configure,

    /// Rank names against a query and print the scores
    Rank {
        /// Query to score
        query: String,

        /// Candidate names
        names: Vec<String>,

        /// Include non-matching names
        #[arg(long)]
        all: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let settings = WorkflowSettings::from_env();

    // Logs go to stderr; stdout carries the launcher protocol
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search { input } => {
            let input = input.as_deref().and_then(normalize_input);
            let response = match input.as_deref() {
                None => Some(Response::info("Please enter text to search for.", "")),
                Some(CONFIGURING_COMMAND) => configure(&settings),
                Some(input) => Some(search(input, &settings)),
            };
            if let Some(response) = response {
                println!("{}", response.encoded()?);
            }
        }

        Commands::Configure => {
            if let Some(response) = configure(&settings) {
                println!("{}", response.encoded()?);
            }
        }

        Commands::Rank { query, names, all } => {
            let scorer = FuzzyScorer::new(settings.scoring.clone());
            let ranked = scorer.rank(&query, &names, !all);

            println!("🔍 {} ranking for: {:?}", scorer.name(), query);
            for result in &ranked {
                println!(
                    "   {:>5}  {}  {}",
                    result.score,
                    if result.is_match { "✓" } else { "·" },
                    result.candidate
                );
            }
        }
    }

    Ok(())
}

fn load_engine(settings: &WorkflowSettings) -> unified_search::Result<SearchEngine> {
    let store = Arc::new(JsonCustomizationStore::from_settings(settings)?);
    let catalog = SearchCatalog::load(settings, store.as_ref())?;
    Ok(SearchEngine::new(catalog, store, settings.clone()))
}

fn search(input: &str, settings: &WorkflowSettings) -> Response {
    let engine = match load_engine(settings) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!("Unable to load searches: {}", e);
            return Response::from_error(&e);
        }
    };

    let parsed = ParsedQuery::parse(input, settings.filter_behaviour);
    tracing::debug!("Parsed input: {:?}", parsed);

    engine.respond(&parsed)
}

/// Apply the action from a configuration row, then reopen the configuration
/// list. Returns a response only when something went wrong.
fn configure(settings: &WorkflowSettings) -> Option<Response> {
    let env = |key: &str| std::env::var(key).ok().filter(|value| !value.is_empty());

    if env("token").as_deref() != Some("valid") {
        return Some(Response::info("Command has been prevented from being triggered", ""));
    }

    let (Some(name), Some(action)) = (env("config_search_name"), env("config_action")) else {
        return Some(Response::info(
            "Failure trying to extract search name and config action.",
            "",
        ));
    };

    let result = action
        .parse::<ConfigAction>()
        .and_then(|parsed| load_engine(settings)?.configure(&name, parsed));

    match result {
        Ok(_) => {}
        Err(e @ SearchError::InvalidAction(_)) => return Some(Response::info(e.to_string(), name)),
        Err(e) => {
            tracing::error!("Config action {} on {} failed: {}", action, name, e);
            return Some(Response::info(
                format!("Error performing config action ({} on <{}>)", action, name),
                e.to_string(),
            ));
        }
    }

    let Some(bundle_id) = settings.bundle_id.as_deref() else {
        return Some(Response::failure(
            "Failure preparing for External Trigger",
            format!("BundleID: Must be set. TriggerID {}", INIT_TRIGGER),
        ));
    };

    let url = external_trigger_url(bundle_id, INIT_TRIGGER, &format!(":c {}", name));
    match Command::new("open").arg(&url).status() {
        Ok(status) if status.success() => None,
        Ok(status) => Some(Response::failure(
            "External Trigger failed",
            format!("open exited with {}", status),
        )),
        Err(e) => Some(Response::failure("External Trigger failed", e.to_string())),
    }
}
