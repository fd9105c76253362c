use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;

use boss_client::HttpClient;
use crypto_client::OracleClient;
use gift_fetch::{FetchOrchestrator, Layout, RunLog, SizeClassDecoder, source};
use gift_formats::NameTables;

#[derive(Parser)]
#[command(
    name = "gift-fetch",
    about = "Watches BOSS distribution sources for new gift archives",
    version,
    long_about = "Polls the filelist server for each configured source, downloads new \
                  archives, decrypts them through the external crypto oracle, and sorts \
                  the payloads into wondercard, cup, and regulation stores."
)]
struct Cli {
    /// Set the logging level
    #[arg(short, long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Root directory for all stores
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Address of the decryption oracle
    #[arg(long, default_value = "192.168.1.137:8081")]
    oracle: String,

    /// Override the filelist server base URL
    #[arg(long)]
    filelist_base: Option<String>,

    /// Override the file server base URL
    #[arg(long)]
    file_base: Option<String>,

    /// Directory holding species.txt, items.txt, and moves.txt name lists
    #[arg(long)]
    names_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check every source, download new archives, decrypt and extract
    Run,
    /// Only test connectivity and configuration of the decryption oracle
    SelfTest,
}

/// Universe sizes used for the numeric fallback tables when no name dump
/// is provided: generation-7 species, item, and move counts.
const FALLBACK_UNIVERSES: (usize, usize, usize) = (802, 920, 720);

async fn load_names(dir: Option<&PathBuf>) -> anyhow::Result<NameTables> {
    let Some(dir) = dir else {
        let (species, items, moves) = FALLBACK_UNIVERSES;
        return Ok(NameTables::indexed(species, items, moves));
    };

    let read_list = |name: &'static str| {
        let path = dir.join(name);
        async move {
            let text = tokio::fs::read_to_string(&path).await?;
            Ok::<_, anyhow::Error>(text.lines().map(str::to_string).collect::<Vec<_>>())
        }
    };

    Ok(NameTables::new(
        read_list("species.txt").await?,
        read_list("items.txt").await?,
        read_list("moves.txt").await?,
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .init();

    let oracle = OracleClient::new(cli.oracle.clone());

    match cli.command {
        Commands::SelfTest => {
            oracle.self_test().await?;
            println!("Oracle self-test succeeded.");
            Ok(())
        }
        Commands::Run => {
            let mut http = HttpClient::new()?;
            if let Some(base) = &cli.filelist_base {
                http = http.with_filelist_base(base);
            }
            if let Some(base) = &cli.file_base {
                http = http.with_file_base(base);
            }

            let layout = Layout::new(&cli.data_dir);
            let names = load_names(cli.names_dir.as_ref()).await?;
            let orchestrator = FetchOrchestrator::new(
                http,
                oracle,
                layout.clone(),
                names,
                Box::new(SizeClassDecoder),
            );

            let stamp = chrono::Local::now()
                .format("%B %d, %Y - %H-%M-%S")
                .to_string();
            let mut log = RunLog::create(&layout.log_dir(), &stamp).await?;
            log.line(&format!("gift-fetch v{}", env!("CARGO_PKG_VERSION")))
                .await?;
            log.line(&stamp).await?;

            let result = orchestrator
                .run(&source::builtin_sources(), &mut log)
                .await;
            if let Err(e) = &result {
                log.mark_noteworthy();
                log.line(&format!("Run failed: {e}")).await?;
            }
            log.finish().await?;
            result.map_err(Into::into)
        }
    }
}
