//! Vietnamese Sentiment Assistant
//!
//! Terminal front-end for the sentiment classification API.

use clap::{Parser, Subcommand};
use sentiment_assistant::{
    client::{ApiClient, MockApi, SentimentApi},
    config::Config,
    notify::{Alert, Notifier},
    session::Session,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sentiment-assistant")]
#[command(about = "Classify Vietnamese sentences and browse recent results")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path (defaults to ./sentiment.toml if present)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Use the built-in in-memory server instead of the real API
    #[arg(long, global = true)]
    demo: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session (default)
    Interactive,
    /// Classify one sentence and show the updated history
    Classify {
        /// Sentence to classify
        text: String,
    },
    /// Show recent classifications
    History {
        /// Number of entries to fetch
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Check that the API is up
    Health,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never interleave with the page
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(&*shellexpand::tilde(path))?,
        None => Config::load_default()?,
    };

    let api: Arc<dyn SentimentApi> = if cli.demo {
        tracing::warn!("Running in DEMO mode - results come from an in-memory server");
        Arc::new(MockApi::new())
    } else {
        Arc::new(ApiClient::from_config(&config.api)?)
    };

    let alert: Arc<dyn Alert> = if cli.json {
        Arc::new(Notifier::disabled())
    } else {
        Arc::new(Notifier::new())
    };

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => {
            let session = Session::new(api, alert, &config);
            run_interactive(&session).await
        }
        Commands::Classify { text } => {
            let session = Session::new(api, alert, &config);
            classify_once(&session, &text, cli.json).await
        }
        Commands::History { limit } => {
            if let Some(limit) = limit {
                config = config.with_history_limit(limit)?;
            }
            let session = Session::new(api, alert, &config);
            show_history(&session, cli.json).await
        }
        Commands::Health => show_health(api.as_ref(), cli.json).await,
    }
}

async fn run_interactive(session: &Session) -> anyhow::Result<()> {
    tracing::info!("Starting interactive session");

    // History errors are part of the page
    let _ = session.mount().await;
    println!("{}", session.render());
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            ":q" | ":quit" => break,
            // Each refresh is awaited before the next line is read
            ":r" | ":refresh" => {
                let _ = session.refresh().await;
            }
            ":h" | ":help" => {
                print_help();
                continue;
            }
            _ => {
                let submit = session.submit(&line);
                let progress = async {
                    if session.flow().pending().in_flight {
                        println!("{}", session.render_form());
                    }
                };
                // Failures already sit in the form's inline error
                let (_, ()) = tokio::join!(submit, progress);
            }
        }
        println!("\n{}", session.render());
    }

    tracing::info!("Session ended");
    Ok(())
}

async fn classify_once(session: &Session, text: &str, json: bool) -> anyhow::Result<()> {
    let _ = session.mount().await;
    let result = match session.submit(text).await {
        Ok(result) => result,
        Err(e) => {
            if !json {
                println!("{}", session.render_form());
            }
            anyhow::bail!(e.user_message());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", session.render_history());
    }
    Ok(())
}

async fn show_history(session: &Session, json: bool) -> anyhow::Result<()> {
    let outcome = session.mount().await;

    if json {
        let list = outcome.map_err(|e| anyhow::anyhow!(e.to_string()))?;
        println!("{}", serde_json::to_string_pretty(list.entries())?);
        return Ok(());
    }

    println!("{}", session.render_history());
    Ok(())
}

async fn show_health(api: &dyn SentimentApi, json: bool) -> anyhow::Result<()> {
    let health = api.health().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&health)?);
    } else if health.is_ok() {
        println!("✅ API ok ({})", health.timestamp);
    } else {
        println!("⚠️ API status: {} ({})", health.status, health.timestamp);
    }
    Ok(())
}

fn print_help() {
    println!();
    println!("Nhập một câu rồi nhấn Enter để phân loại.");
    println!("  :r  làm mới lịch sử");
    println!("  :q  thoát");
}
