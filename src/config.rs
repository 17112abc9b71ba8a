use crate::error::KsResult;
use crate::metrics::Metric;
use crate::ranking::SortTerm;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use tracing::info;

/// Which thumb (or neither, or both averaged) stands in for the space character.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    EnumIter,
    EnumString,
    Display,
    AsRefStr,
    Serialize,
    Deserialize,
    ValueEnum,
)]
#[strum(ascii_case_insensitive)]
pub enum ThumbMode {
    #[strum(serialize = "LT")]
    #[serde(rename = "LT")]
    #[value(name = "lt")]
    LeftThumb,
    #[strum(serialize = "RT")]
    #[serde(rename = "RT")]
    #[value(name = "rt")]
    RightThumb,
    #[strum(serialize = "NONE")]
    #[serde(rename = "NONE")]
    #[value(name = "none")]
    NoThumb,
    #[default]
    #[strum(serialize = "AVG")]
    #[serde(rename = "AVG")]
    #[value(name = "avg")]
    Average,
}

impl ThumbMode {
    /// Whether space presses count toward the thumb bucket.
    pub fn uses_thumb(self) -> bool {
        self != ThumbMode::NoThumb
    }
}

/// Persistent run configuration. Every toggle is a flat name -> flag map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub thumb_space: ThumbMode,
    pub corpus: PathBuf,
    pub layout_dir: PathBuf,
    pub cache_file: PathBuf,

    pub sort: Vec<SortTerm>,
    pub sort_high: bool,
    pub filters: BTreeMap<Metric, f64>,

    /// Column visibility; metrics not listed are shown.
    pub columns: BTreeMap<Metric, bool>,
    /// Layout visibility by lower-cased name; layouts not listed are shown.
    pub layouts: BTreeMap<String, bool>,
    /// When non-empty, only these layouts are shown, in this order.
    pub single_mode: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thumb_space: ThumbMode::Average,
            corpus: PathBuf::from("data/corpus.json"),
            layout_dir: PathBuf::from("layouts"),
            cache_file: PathBuf::from("cache/results.json"),
            sort: vec![SortTerm {
                metric: Metric::Roll,
                weight: 1.0,
            }],
            sort_high: true,
            filters: BTreeMap::new(),
            columns: BTreeMap::new(),
            layouts: BTreeMap::new(),
            single_mode: Vec::new(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> KsResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Missing file gives the defaults; a malformed one is an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> KsResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            info!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> KsResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn set_thumb(&mut self, mode: ThumbMode) {
        self.thumb_space = mode;
    }

    pub fn set_sort(&mut self, terms: Vec<SortTerm>, high: bool) {
        self.sort = terms;
        self.sort_high = high;
        self.single_mode.clear();
    }

    pub fn set_filters(&mut self, filters: BTreeMap<Metric, f64>) {
        self.filters = filters;
        self.single_mode.clear();
    }

    pub fn set_mode<S: AsRef<str>>(&mut self, layouts: &[S]) {
        self.single_mode = layouts.iter().map(|s| s.as_ref().to_lowercase()).collect();
    }

    pub fn toggle_columns(&mut self, metrics: &[Metric]) {
        for &m in metrics {
            let visible = self.is_column_visible(m);
            self.columns.insert(m, !visible);
        }
    }

    pub fn toggle_layouts<S: AsRef<str>>(&mut self, names: &[S]) {
        for name in names {
            let key = name.as_ref().to_lowercase();
            let enabled = self.is_layout_enabled(&key);
            self.layouts.insert(key, !enabled);
        }
    }

    pub fn is_column_visible(&self, metric: Metric) -> bool {
        self.columns.get(&metric).copied().unwrap_or(true)
    }

    pub fn is_layout_enabled(&self, name: &str) -> bool {
        self.layouts.get(&name.to_lowercase()).copied().unwrap_or(true)
    }

    /// Whether a layout should be analyzed in this run.
    pub fn is_layout_shown(&self, name: &str) -> bool {
        let key = name.to_lowercase();
        if self.single_mode.is_empty() {
            self.is_layout_enabled(&key)
        } else {
            self.single_mode.contains(&key)
        }
    }
}
