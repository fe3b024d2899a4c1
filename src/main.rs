use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use zcalc::config::Config;
use zcalc::history::{FileStore, HistoryRecorder, KeyValueStore, MemoryStore};
use zcalc::session::Session;
use zcalc::terminal;

#[derive(Parser, Debug)]
#[command(version, about = "A keyboard-driven calculator with a persistent history")]
struct Args {
    /// Path to the config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the history is stored in
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep the history in memory only
    #[arg(long)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate an expression and record it in the history
    Eval { expression: String },
    /// Print the calculation history
    History,
    /// Delete the calculation history
    ClearHistory,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).context("Failed to load config")?;
    if let Some(dir) = args.data_dir.clone() {
        config.data_dir = Some(dir);
    }

    init_tracing(&config.log_level);

    if args.ephemeral {
        return run(MemoryStore::new(), &config, args.command).await;
    }

    let data_dir = config.resolve_data_dir()?;
    info!(data_dir = %data_dir.display(), "Using history storage");
    run(FileStore::new(data_dir), &config, args.command).await
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run<S: KeyValueStore>(store: S, config: &Config, command: Option<Command>) -> Result<()> {
    let mut history = HistoryRecorder::open(store, config.history_key.as_str()).await;

    match command {
        None => {
            let mut session = Session::new(history);
            terminal::run(&mut session).await
        }
        Some(Command::Eval { expression }) => {
            let Ok((result, notice)) = terminal::eval_once(&mut history, &expression).await else {
                println!("Error");
                std::process::exit(1);
            };
            println!("{result}");

            if let Some(notice) = notice {
                eprintln!("Warning: {notice}");
            }
            Ok(())
        }
        Some(Command::History) => {
            print!("{}", terminal::render_history(history.entries()));
            Ok(())
        }
        Some(Command::ClearHistory) => {
            history.clear().await.context("Failed to clear history")?;
            println!("History cleared!");
            Ok(())
        }
    }
}
