use clap::{Args, Subcommand};
use keystat::config::{Config, ThumbMode};
use keystat::error::{KeyStatError, KsResult};
use keystat::metrics::Metric;
use keystat::ranking;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the active configuration
    Show,
    /// Write the active configuration to PATH (or the config file)
    Save { path: Option<PathBuf> },
    /// Replace the config file with a saved one
    Load { path: PathBuf },
    /// Restore defaults
    Reset,
    /// Set the thumb mode used for the space key
    Thumb {
        #[arg(value_enum, ignore_case = true)]
        mode: ThumbMode,
    },
    /// Set sort terms, e.g. `40%roll alternate -sfb`
    Sort {
        /// Sort ascending instead
        #[arg(long, default_value_t = false)]
        low: bool,

        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        terms: Vec<String>,
    },
    /// Keep only layouts at or above thresholds, e.g. `30%roll`
    Filter { thresholds: Vec<String> },
    /// Show only these layouts (no names: show all enabled)
    Mode { layouts: Vec<String> },
    /// Toggle metric columns on or off
    Columns {
        #[arg(required = true)]
        metrics: Vec<String>,
    },
    /// Toggle layouts on or off
    Layouts {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

fn parse_metrics(names: &[String]) -> KsResult<Vec<Metric>> {
    names
        .iter()
        .map(|n| {
            n.parse()
                .map_err(|_| KeyStatError::Config(format!("unknown metric '{}'", n)))
        })
        .collect()
}

pub fn run(args: ConfigArgs, config: &mut Config, path: &Path) -> KsResult<()> {
    match args.action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(config)?);
            return Ok(());
        }
        ConfigAction::Save { path: target } => {
            let target = target.unwrap_or_else(|| path.to_path_buf());
            config.save_to_file(&target)?;
            println!("Saved config to {}", target.display());
            return Ok(());
        }
        ConfigAction::Load { path: source } => {
            *config = Config::load_from_file(&source)?;
            info!("Loaded config from {:?}", source);
        }
        ConfigAction::Reset => *config = Config::default(),
        ConfigAction::Thumb { mode } => config.set_thumb(mode),
        ConfigAction::Sort { low, terms } => {
            config.set_sort(ranking::parse_sort_terms(&terms)?, !low);
        }
        ConfigAction::Filter { thresholds } => {
            config.set_filters(ranking::parse_filters(&thresholds)?);
        }
        ConfigAction::Mode { layouts } => config.set_mode(&layouts),
        ConfigAction::Columns { metrics } => config.toggle_columns(&parse_metrics(&metrics)?),
        ConfigAction::Layouts { names } => config.toggle_layouts(&names),
    }

    config.save_to_file(path)?;
    info!("Updated {:?}", path);
    Ok(())
}
