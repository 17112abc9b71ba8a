use clap::{Args, Subcommand};
use keystat::cache::ResultsCache;
use keystat::config::Config;
use keystat::error::KsResult;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,

    /// Cache file; defaults to the configured one
    #[arg(long)]
    pub cache: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CacheAction {
    /// Delete the cache file
    Clear,
}

pub fn run(args: CacheArgs, config: &Config) -> KsResult<()> {
    let path = args.cache.unwrap_or_else(|| config.cache_file.clone());
    match args.action {
        CacheAction::Clear => {
            if ResultsCache::clear_file(&path)? {
                println!("Cleared {}", path.display());
            } else {
                info!("Nothing to clear at {:?}", path);
            }
        }
    }
    Ok(())
}
