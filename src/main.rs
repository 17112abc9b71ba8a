use clap::{Parser, Subcommand};
use keystat::config::Config;
use keystat::error::KsResult;
use std::path::PathBuf;
use std::process;
use tracing::{debug, error, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, long, default_value = "config.json")]
    config: PathBuf,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score layouts against a corpus
    Analyze(cmd::analyze::AnalyzeArgs),
    /// Print the trigram classification table
    Table,
    /// Build a corpus file from raw texts
    Corpus(cmd::corpus::CorpusArgs),
    /// Manage the results cache
    Cache(cmd::cache::CacheArgs),
    /// Show or edit the saved configuration
    Config(cmd::config::ConfigArgs),
}

fn run(cli: Cli) -> KsResult<()> {
    let mut config = Config::load_or_default(&cli.config)?;
    debug!("Using config {:?}", cli.config);

    match cli.command {
        Commands::Analyze(args) => cmd::analyze::run(args, &mut config),
        Commands::Table => cmd::table::run(),
        Commands::Corpus(args) => cmd::corpus::run(args),
        Commands::Cache(args) => cmd::cache::run(args, &config),
        Commands::Config(args) => cmd::config::run(args, &mut config, &cli.config),
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        error!("{}", e);
        process::exit(1);
    }
}
