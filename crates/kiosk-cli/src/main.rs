use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(
    name = "kiosk",
    about = "kioskgrid — simulated kiosk fleet updates",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the kiosk fleet
    List {
        /// Path to kiosk.toml (defaults apply when absent)
        #[arg(short, long, default_value = "kiosk.toml")]
        config: String,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Select kiosks and run a simulated bulk update.
    ///
    /// Each selected kiosk gets one independent update that settles after
    /// a random delay. The table is printed before dispatch and again once
    /// every update has settled.
    Simulate {
        #[arg(short, long, default_value = "kiosk.toml")]
        config: String,
        /// Kiosk ids to select, comma separated (default: first page)
        #[arg(short, long, value_delimiter = ',', conflicts_with = "all")]
        select: Vec<u64>,
        /// Select every kiosk
        #[arg(long)]
        all: bool,
        /// RNG seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
        /// Force every update to succeed or fail
        #[arg(long, value_enum)]
        force: Option<ForcedOutcome>,
        /// Override simulation.max_delay_ms
        #[arg(long)]
        max_delay_ms: Option<u64>,
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Write a kiosk.toml with every default spelled out
    Init {
        #[arg(short, long, default_value = "kiosk.toml")]
        path: String,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ForcedOutcome {
    Success,
    Failure,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("warn,kiosk_cli=info,kioskgrid_update=info")
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { config, format } => commands::list::list(&config, format).await,
        Commands::Simulate {
            config,
            select,
            all,
            seed,
            force,
            max_delay_ms,
            format,
        } => {
            let options = commands::simulate::SimulateOptions {
                select,
                all,
                seed,
                force,
                max_delay_ms,
                format,
            };
            commands::simulate::simulate(&config, options).await
        }
        Commands::Init { path, force } => commands::init::init(&path, force),
    }
}
