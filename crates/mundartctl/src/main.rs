//! mundartctl - Franconian dialect attestation lookups from the terminal.
//!
//! Thin caller over the mundart_common pipeline: parses arguments, loads
//! configuration, runs one lookup, renders the result. All input checking
//! happens inside the library's validation boundary, never here.

use anyhow::Result;
use clap::{Parser, Subcommand};
use mundart_common::{
    geography, BdoClient, LookupError, MundartConfig, TranslationRequest, TranslationResult,
    TranslationService,
};
use owo_colors::OwoColorize;
use tracing::debug;

/// Exit codes: 0 success (including zero attestations), 1 corpus or
/// configuration failure, 2 rejected input.
const EXIT_OK: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_BAD_REQUEST: i32 = 2;

#[derive(Parser)]
#[command(name = "mundartctl", version, about = "Look up attested Franconian dialect forms")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up dialect attestations for a Standard German word
    Lookup {
        /// The Standard German word to look up
        word: String,

        /// Search scope: landkreis-ansbach, stadt-ansbach or custom-town
        #[arg(long, default_value = "landkreis-ansbach")]
        scope: String,

        /// Town name, required with --scope custom-town
        #[arg(long)]
        town: Option<String>,

        /// Maximum number of attestations to return
        #[arg(long)]
        limit: Option<usize>,

        /// Only return forms equal to the queried word
        #[arg(long)]
        exact: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the queryable towns
    Towns {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    std::process::exit(run(cli).await);
}

async fn run(cli: Cli) -> i32 {
    match cli.command {
        Command::Lookup {
            word,
            scope,
            town,
            limit,
            exact,
            json,
        } => {
            let request = TranslationRequest {
                word,
                scope: Some(scope),
                town,
                limit,
                exact_match: exact,
            };
            let service = match build_service() {
                Ok(service) => service,
                Err(error) => {
                    eprintln!("{} {error:#}", "Startup error:".red().bold());
                    return EXIT_FAILURE;
                }
            };
            match service.lookup(&request).await {
                Ok(result) => {
                    if json {
                        print_json(&result)
                    } else {
                        print_result(&result);
                        EXIT_OK
                    }
                }
                Err(LookupError::Validation(error)) => {
                    eprintln!("{} {}", "Invalid request:".red().bold(), error);
                    EXIT_BAD_REQUEST
                }
                Err(LookupError::Api(error)) => {
                    eprintln!("{} {}", "Lookup failed:".red().bold(), error);
                    EXIT_FAILURE
                }
            }
        }
        Command::Towns { json } => print_towns(json),
    }
}

fn build_service() -> Result<TranslationService<BdoClient>> {
    let config = MundartConfig::load()?;
    debug!("Corpus endpoint: {}", config.base_url);
    let client = BdoClient::new(&config)?;
    Ok(TranslationService::new(client))
}

fn print_result(result: &TranslationResult) {
    if result.attestations.is_empty() {
        if result.exact_match_applied {
            println!(
                "No exact dialect match for '{}' in {}.",
                result.queried_word.bold(),
                result.scope
            );
        } else {
            println!(
                "No attestations found for '{}' in {}.",
                result.queried_word.bold(),
                result.scope
            );
        }
        return;
    }

    println!(
        "Dialect forms for '{}' in {}:",
        result.queried_word.bold(),
        result.scope
    );
    for (rank, attestation) in result.attestations.iter().enumerate() {
        println!(
            "{:>3}. {}  ({}x, {})",
            rank + 1,
            attestation.dialect_form.green().bold(),
            attestation.frequency,
            attestation.location
        );
        if let Some(example) = &attestation.example_sentence {
            println!("     \"{}\"", example.italic());
        }
        if let Some(confidence) = attestation.confidence {
            println!("     confidence {:.0}%", confidence * 100.0);
        }
    }
    if result.total_before_limit > result.attestations.len() {
        println!(
            "... and {} more attested forms.",
            result.total_before_limit - result.attestations.len()
        );
    }
}

fn print_json(result: &TranslationResult) -> i32 {
    match serde_json::to_string_pretty(result) {
        Ok(rendered) => {
            println!("{rendered}");
            EXIT_OK
        }
        Err(error) => {
            eprintln!("Failed to render JSON: {error}");
            EXIT_FAILURE
        }
    }
}

fn print_towns(json: bool) -> i32 {
    let names: Vec<&str> = geography::all_entries().map(|entry| entry.name).collect();
    if json {
        match serde_json::to_string_pretty(&names) {
            Ok(rendered) => println!("{rendered}"),
            Err(error) => {
                eprintln!("Failed to render JSON: {error}");
                return EXIT_FAILURE;
            }
        }
    } else {
        println!("Queryable towns:");
        for name in names {
            println!("  {name}");
        }
    }
    EXIT_OK
}
