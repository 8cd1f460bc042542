//! Stenographer CLI - operational tooling for the transcription plugin.
//!
//! Validates configuration, transcribes local audio files through the
//! configured endpoint, and inspects or edits the per-room preference store.

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use stenographer::prelude::*;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Stenographer - voice message transcription plugin
#[derive(Parser)]
#[command(name = "stenographer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "STENOGRAPHER_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration file
    Validate,

    /// Transcribe a local audio file through the configured endpoint
    Transcribe(TranscribeArgs),

    /// Inspect or edit per-room preferences
    Prefs(PrefsArgs),
}

/// Arguments for the transcribe command
#[derive(Args)]
struct TranscribeArgs {
    /// Audio file to transcribe
    file: PathBuf,

    /// Language code (overrides the configured default)
    #[arg(short, long)]
    language: Option<String>,
}

/// Arguments for the prefs command
#[derive(Args)]
struct PrefsArgs {
    /// Preference database path
    #[arg(long, env = "STENOGRAPHER_DB")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: PrefsCommands,
}

#[derive(Subcommand)]
enum PrefsCommands {
    /// Show stored overrides for a room
    Show {
        /// Room ID
        room: String,
    },
    /// Set the language override for a room
    Language {
        /// Room ID
        room: String,
        /// Language code (unvalidated; "auto" lets the API detect)
        code: String,
    },
    /// Set the auto-transcribe override for a room
    Auto {
        /// Room ID
        room: String,
        /// "on" or "off"
        state: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");

    match rt.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging with the given verbosity level.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "stenographer={level},{}",
            if verbosity >= 2 { "debug" } else { "warn" }
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let config_file = cli.config.unwrap_or_else(config_path);

    match cli.command {
        Commands::Validate => cmd_validate(config_file).await,
        Commands::Transcribe(args) => cmd_transcribe(args, config_file).await,
        Commands::Prefs(args) => cmd_prefs(args).await,
    }
}

/// Validate the configuration file.
async fn cmd_validate(config_file: PathBuf) -> Result<()> {
    let provider = ConfigProvider::new(&config_file);

    match provider.load().await {
        Ok(config) => {
            println!("Configuration is valid: {}", config_file.display());
            println!("  base_url:   {}", config.base_url);
            println!("  model_name: {}", config.model_name);
            println!("  language:   {}", config.language);
            println!(
                "  reaction:   {}",
                config.reaction.as_deref().unwrap_or("(disabled)")
            );
            println!("  auto:       {}", config.auto);
            Ok(())
        }
        Err(e) => {
            println!("error: {e}");
            Err(e.into())
        }
    }
}

/// Transcribe a local audio file.
async fn cmd_transcribe(args: TranscribeArgs, config_file: PathBuf) -> Result<()> {
    let provider = Arc::new(ConfigProvider::new(&config_file));
    let config = provider.load().await?;

    let extension = args
        .file
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("ogg");
    let format = AudioFormat::from_extension(extension).ok_or_else(|| {
        PluginError::internal(format!("unsupported audio format: {extension}"))
    })?;

    let bytes = tokio::fs::read(&args.file).await?;
    let attachment = AudioAttachment::new(bytes, format.mime_type());

    let language = args.language.unwrap_or_else(|| config.language.clone());
    let transcriber = OpenAiTranscriber::new(provider);

    let text = transcriber.transcribe(&attachment, &language).await?;
    println!("{text}");
    Ok(())
}

/// Inspect or edit per-room preferences.
async fn cmd_prefs(args: PrefsArgs) -> Result<()> {
    let db_path = args.db.unwrap_or_else(store_path);
    let store = SqliteStore::open(&db_path)?;

    match args.command {
        PrefsCommands::Show { room } => {
            let language = store.language(&room).await?;
            let auto = store.auto(&room).await?;
            println!("Room {room}");
            println!(
                "  language: {}",
                language.as_deref().unwrap_or("(global default)")
            );
            println!(
                "  auto:     {}",
                auto.map_or_else(|| "(global default)".to_owned(), |a| a.to_string())
            );
        }
        PrefsCommands::Language { room, code } => {
            store.set_language(&room, &code).await?;
            println!("Language for {room} set to {code}");
        }
        PrefsCommands::Auto { room, state } => {
            let auto = match state.as_str() {
                "on" => true,
                "off" => false,
                other => {
                    return Err(PluginError::internal(format!(
                        "expected \"on\" or \"off\", got {other:?}"
                    )));
                }
            };
            store.set_auto(&room, auto).await?;
            println!("Auto-transcribe for {room} set to {state}");
        }
    }

    Ok(())
}
