use crate::reports;
use clap::Args;
use keystat::cache::ResultsCache;
use keystat::config::{Config, ThumbMode};
use keystat::corpus::Corpus;
use keystat::error::KsResult;
use keystat::layout;
use keystat::metrics::{MetricsEngine, MetricsResult};
use keystat::ranking;
use std::path::PathBuf;
use tracing::{info, warn};

/// Per-run overrides of the saved configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeArgs {
    #[arg(long)]
    pub corpus: Option<PathBuf>,

    #[arg(long)]
    pub layouts: Option<PathBuf>,

    #[arg(long)]
    pub cache: Option<PathBuf>,

    #[arg(long, value_enum, ignore_case = true)]
    pub thumb: Option<ThumbMode>,

    /// Only analyze these layouts (repeatable)
    #[arg(short, long = "layout")]
    pub layout: Vec<String>,

    /// Print each layout's key grid
    #[arg(long, default_value_t = false)]
    pub grid: bool,

    /// Also write every metric to a CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

impl AnalyzeArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(p) = &self.corpus {
            config.corpus = p.clone();
        }
        if let Some(p) = &self.layouts {
            config.layout_dir = p.clone();
        }
        if let Some(p) = &self.cache {
            config.cache_file = p.clone();
        }
        if let Some(mode) = self.thumb {
            config.set_thumb(mode);
        }
        if !self.layout.is_empty() {
            config.set_mode(&self.layout);
        }
    }
}

pub fn run(args: AnalyzeArgs, config: &mut Config) -> KsResult<()> {
    args.apply(config);

    info!("📂 Loading corpus: {:?}", config.corpus);
    let corpus = Corpus::load_from_file(&config.corpus)?;
    let layouts = layout::load_dir(&config.layout_dir)?;

    for name in &config.single_mode {
        if !layouts.iter().any(|l| l.name.eq_ignore_ascii_case(name)) {
            warn!("⚠️  No layout named '{}' in {:?}", name, config.layout_dir);
        }
    }

    let mut cache = ResultsCache::load_or_default(&config.cache_file, &corpus)?;
    let engine = MetricsEngine::default();
    let mode = config.thumb_space;

    let mut rows: Vec<(String, MetricsResult)> = Vec::new();
    for layout in layouts.iter().filter(|l| config.is_layout_shown(&l.name)) {
        let result = cache.get_or_compute(layout, &corpus, mode, &engine)?;
        rows.push((layout.name.clone(), result.clone()));

        if args.grid {
            reports::print_layout_grid(layout);
        }
    }

    cache.persist(&config.cache_file)?;

    rows.retain(|(_, r)| ranking::passes_filters(r, &config.filters));
    if config.single_mode.is_empty() {
        ranking::sort_results(&mut rows, &config.sort, config.sort_high);
    } else {
        let position = |name: &str| {
            config
                .single_mode
                .iter()
                .position(|n| n.eq_ignore_ascii_case(name))
                .unwrap_or(usize::MAX)
        };
        rows.sort_by_key(|(name, _)| position(name));
    }

    if rows.is_empty() {
        warn!("⚠️  No layouts left to show");
        return Ok(());
    }

    info!("📊 {} layouts, thumb mode {}", rows.len(), mode);
    reports::print_results(&rows, config);

    if let Some(path) = &args.csv {
        reports::write_csv(path, &rows)?;
        info!("💾 Wrote {:?}", path);
    }
    Ok(())
}
