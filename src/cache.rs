use crate::config::ThumbMode;
use crate::corpus::Corpus;
use crate::error::KsResult;
use crate::layout::Layout;
use crate::metrics::{MetricsEngine, MetricsResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Anything that can produce a metric map for one layout and thumb mode.
pub trait MetricsSource {
    fn compute(&self, layout: &Layout, corpus: &Corpus, mode: ThumbMode) -> KsResult<MetricsResult>;
}

impl MetricsSource for MetricsEngine<'_> {
    fn compute(&self, layout: &Layout, corpus: &Corpus, mode: ThumbMode) -> KsResult<MetricsResult> {
        self.analyze(layout, corpus, mode)
    }
}

/// Stored results for one layout name, valid for exactly one content hash.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub hash: String,
    #[serde(flatten)]
    pub results: BTreeMap<ThumbMode, MetricsResult>,
}

impl CacheEntry {
    pub fn new(hash: &str) -> Self {
        Self {
            hash: hash.to_string(),
            results: BTreeMap::new(),
        }
    }
}

/// Per-layout memo of computed metrics, keyed by layout name.
///
/// One process owns a cache file at a time; concurrent runs against the same
/// file race on the final rename.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsCache {
    /// Label of the corpus the stored results were computed from.
    pub file: String,
    /// Content hash of that corpus; the cache is only reused when it matches.
    #[serde(default)]
    pub corpus_hash: String,
    pub data: BTreeMap<String, CacheEntry>,
}

impl ResultsCache {
    pub fn new(corpus: &Corpus) -> Self {
        Self {
            file: corpus.file.clone(),
            corpus_hash: corpus.content_hash(),
            data: BTreeMap::new(),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> KsResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Loads the cache built for `corpus`.
    ///
    /// An absent file starts empty. A cache built from other corpus contents
    /// is discarded, whatever the corpus is called. A malformed file is an
    /// error.
    pub fn load_or_default<P: AsRef<Path>>(path: P, corpus: &Corpus) -> KsResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No cache at {:?}, starting empty", path);
            return Ok(Self::new(corpus));
        }

        let mut cache = Self::load_from_file(path)?;
        let hash = corpus.content_hash();
        if cache.corpus_hash != hash {
            info!(
                "Cache was built from other contents than '{}'; discarding",
                corpus.file
            );
            return Ok(Self::new(corpus));
        }
        cache.file = corpus.file.clone();

        debug!("Loaded cache with {} layouts", cache.data.len());
        Ok(cache)
    }

    /// Writes the whole cache to a sibling temp file, then renames it over
    /// `path` so an interrupted write never leaves a truncated cache.
    pub fn persist<P: AsRef<Path>>(&self, path: P) -> KsResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = temp_sibling(path);
        fs::write(&tmp, serde_json::to_string_pretty(self)?)?;
        fs::rename(&tmp, path)?;
        info!("Persisted {} layouts to {:?}", self.data.len(), path);
        Ok(())
    }

    /// Removes the cache file if present. Returns whether anything was deleted.
    pub fn clear_file<P: AsRef<Path>>(path: P) -> KsResult<bool> {
        let path = path.as_ref();
        if path.exists() {
            fs::remove_file(path)?;
            info!("Removed cache {:?}", path);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn entry(&self, name: &str) -> Option<&CacheEntry> {
        self.data.get(name)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the stored result for `layout` under `mode`, computing it first
    /// if needed.
    ///
    /// A missing entry or a stale hash replaces the entry outright, dropping
    /// every mode stored for that name. Only `mode` is ever computed.
    pub fn get_or_compute<M: MetricsSource + ?Sized>(
        &mut self,
        layout: &Layout,
        corpus: &Corpus,
        mode: ThumbMode,
        source: &M,
    ) -> KsResult<&MetricsResult> {
        let stale = match self.data.get(&layout.name) {
            Some(entry) if entry.hash == layout.hash => false,
            Some(entry) => {
                info!(
                    "'{}' changed ({} -> {}), invalidating cached results",
                    layout.name, entry.hash, layout.hash
                );
                true
            }
            None => true,
        };
        if stale {
            self.data
                .insert(layout.name.clone(), CacheEntry::new(&layout.hash));
        }

        let entry = self
            .data
            .entry(layout.name.clone())
            .or_insert_with(|| CacheEntry::new(&layout.hash));

        if entry.results.contains_key(&mode) {
            debug!("Cache hit for '{}' ({})", layout.name, mode);
        } else {
            debug!("Computing '{}' ({})", layout.name, mode);
            let result = source.compute(layout, corpus, mode)?;
            entry.results.insert(mode, result);
        }

        Ok(&entry.results[&mode])
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("cache"));
    name.push(".tmp");
    path.with_file_name(name)
}
