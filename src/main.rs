//! ReplyMesh - AI-assisted reply engine for social feed pages.
//!
//! CLI entry point: inspect and edit preferences, manage the usage
//! counter, and run one-shot generations through the same gateway the
//! page worker uses.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use replymesh_config::{FileSettingsStore, SettingsService};
use replymesh_gateway::{Gateway, GeminiGenerator};
use replymesh_ledger::{FileLedgerStore, UsageLedger};
use replymesh_protocols::{PageRequest, PageResponse, ReplyAction, Tone};

/// ReplyMesh CLI.
#[derive(Parser)]
#[command(name = "replymesh")]
#[command(about = "AI-assisted reply engine for social feed pages")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preferences management
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Usage counter management
    Usage {
        #[command(subcommand)]
        action: UsageAction,
    },

    /// Generate a reply to the given post text
    Reply {
        /// The post to reply to
        #[arg(long)]
        text: String,

        /// Author hint passed to the generator
        #[arg(long)]
        author: Option<String>,

        /// Date hint passed to the generator
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the current preferences
    Show,

    /// Update and persist preferences
    Set {
        /// API credential for the generative-text provider
        #[arg(long)]
        credential: Option<String>,

        /// Reply tone (professional, polite, friendly, concise)
        #[arg(long)]
        tone: Option<Tone>,

        /// Maximum reply length in characters (100-1000)
        #[arg(long)]
        max_length: Option<u32>,

        /// Default action for accepted replies (insert, copy)
        #[arg(long)]
        action: Option<ReplyAction>,

        /// Maximum replies per 24h window (1-10000)
        #[arg(long)]
        limit: Option<u32>,

        /// Type replies character by character
        #[arg(long)]
        paced: Option<bool>,
    },
}

#[derive(Subcommand)]
enum UsageAction {
    /// Print the current usage window
    Show,

    /// Zero the counter and start a fresh window
    Reset,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn build_gateway() -> Result<Gateway> {
    let settings_path =
        FileSettingsStore::default_path().context("no user config directory available")?;
    let usage_path =
        FileLedgerStore::default_path().context("no user data directory available")?;

    let settings = SettingsService::new(Arc::new(FileSettingsStore::new(settings_path)));
    let ledger = Arc::new(UsageLedger::new(
        Arc::new(FileLedgerStore::new(usage_path)),
        replymesh_config::Preferences::default().daily_limit,
    ));
    Ok(Gateway::new(
        settings,
        ledger,
        Arc::new(GeminiGenerator::new()),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let gateway = build_gateway()?;

    match cli.command {
        Commands::Settings { action } => match action {
            SettingsAction::Show => {
                let prefs = gateway.get_settings().await?;
                println!("{}", serde_json::to_string_pretty(&prefs)?);
            }
            SettingsAction::Set {
                credential,
                tone,
                max_length,
                action,
                limit,
                paced,
            } => {
                let mut prefs = gateway.get_settings().await?;
                if let Some(credential) = credential {
                    prefs.credential = credential;
                }
                if let Some(tone) = tone {
                    prefs.tone = tone;
                }
                if let Some(max_length) = max_length {
                    prefs.max_length = max_length;
                }
                if let Some(action) = action {
                    prefs.default_action = action;
                }
                if let Some(limit) = limit {
                    prefs.daily_limit = limit;
                }
                if let Some(paced) = paced {
                    prefs.paced_insertion = paced;
                }
                let saved = gateway.save_settings(serde_json::to_value(&prefs)?).await?;
                println!("{}", serde_json::to_string_pretty(&saved)?);
            }
        },

        Commands::Usage { action } => {
            let usage = match action {
                UsageAction::Show => gateway.usage().await?,
                UsageAction::Reset => gateway.reset_usage().await?,
            };
            println!(
                "{} of {} replies used; window ends {}",
                usage.count, usage.limit, usage.window_end
            );
        }

        Commands::Reply { text, author, date } => {
            let response = gateway
                .dispatch(PageRequest::GenerateReply {
                    post_text: text,
                    author_name: author,
                    post_date: date,
                })
                .await;
            match response {
                PageResponse::Reply {
                    success: true,
                    reply: Some(reply),
                    usage_count,
                    ..
                } => {
                    println!("{}", reply);
                    if let Some(count) = usage_count {
                        eprintln!("({} replies used in this window)", count);
                    }
                }
                PageResponse::Reply { error, .. } => {
                    anyhow::bail!(error.unwrap_or_else(|| "generation failed".to_string()));
                }
                other => anyhow::bail!("unexpected response: {:?}", other),
            }
        }
    }

    Ok(())
}
