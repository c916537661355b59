//! MoodTune CLI
//!
//! Terminal front end for the MoodTune server: describe how you feel, get
//! music video suggestions, and rate them so the next search fits better.

mod api;
mod output;
mod repl;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "moodtune")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Music video suggestions for how you feel")]
#[command(long_about = r#"
MoodTune turns a free-text mood into a music search and learns from your
likes and dislikes.

Examples:
  moodtune                                   # Interactive session
  moodtune --genre jazz                      # Every search leans jazz
  moodtune search "tired but hopeful"        # One-off search
"#)]
struct Cli {
    /// Server URL
    #[arg(long, env = "MOODTUNE_SERVER_URL", default_value = "http://127.0.0.1:5000")]
    server: String,

    /// Preferred genre added to every search (e.g. jazz, rock)
    #[arg(short, long)]
    genre: Option<String>,

    /// Film music industry to lean towards (bollywood, hollywood)
    #[arg(short, long)]
    industry: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single search and print the results
    Search {
        /// How you feel, in your own words
        #[arg(required = true, num_args = 1..)]
        mood: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("moodtune_cli={},warn", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let api = api::ApiClient::new(&cli.server);

    match cli.command {
        Some(Commands::Search { mood }) => {
            let request = api::SearchRequest {
                mood_description: mood.join(" "),
                genre: cli.genre,
                industry: cli.industry,
            };
            match api.search(&request).await {
                Ok(result) => output::print_results(&result),
                Err(e) => {
                    output::error(&format!("{e:#}"));
                    std::process::exit(1);
                }
            }
        }
        None => {
            let mut repl = repl::MoodRepl::new(api, cli.genre, cli.industry)?;
            repl.run().await?;
        }
    }

    Ok(())
}
