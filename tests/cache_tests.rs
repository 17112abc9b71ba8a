mod common;

use common::{colemak, corpus, qwerty, sample_corpus, LayoutBuilder};
use keystat::cache::{MetricsSource, ResultsCache};
use keystat::config::ThumbMode;
use keystat::corpus::Corpus;
use keystat::error::KsResult;
use keystat::fingers::Finger;
use keystat::layout::{Layout, Row};
use keystat::metrics::{Metric, MetricsEngine, MetricsResult};
use std::cell::Cell;
use std::fs;
use strum::IntoEnumIterator;

/// Counts how often it is asked to compute; returns the call number as `roll`.
#[derive(Default)]
struct CountingSource {
    calls: Cell<usize>,
}

impl MetricsSource for CountingSource {
    fn compute(&self, _: &Layout, _: &Corpus, _: ThumbMode) -> KsResult<MetricsResult> {
        self.calls.set(self.calls.get() + 1);
        Ok([(Metric::Roll, self.calls.get() as f64)].into_iter().collect())
    }
}

fn layout(hash: &str) -> Layout {
    LayoutBuilder::new("demo")
        .hash(hash)
        .key('a', Finger::LeftIndex)
        .key('b', Finger::RightIndex)
        .build()
}

#[test]
fn test_second_lookup_does_not_recompute() {
    let source = CountingSource::default();
    let c = corpus(&[], &[]);
    let mut cache = ResultsCache::new(&c);
    let l = layout("h1");

    let first = cache
        .get_or_compute(&l, &c, ThumbMode::LeftThumb, &source)
        .unwrap()
        .clone();
    let second = cache
        .get_or_compute(&l, &c, ThumbMode::LeftThumb, &source)
        .unwrap()
        .clone();

    assert_eq!(source.calls.get(), 1);
    assert_eq!(first, second);
}

#[test]
fn test_each_mode_is_computed_on_demand() {
    let source = CountingSource::default();
    let c = corpus(&[], &[]);
    let mut cache = ResultsCache::new(&c);
    let l = layout("h1");

    cache.get_or_compute(&l, &c, ThumbMode::LeftThumb, &source).unwrap();
    cache.get_or_compute(&l, &c, ThumbMode::NoThumb, &source).unwrap();
    assert_eq!(source.calls.get(), 2);

    let entry = cache.entry("demo").unwrap();
    assert_eq!(entry.results.len(), 2);
    assert!(!entry.results.contains_key(&ThumbMode::Average));
}

#[test]
fn test_hash_change_drops_every_mode() {
    let source = CountingSource::default();
    let c = corpus(&[], &[]);
    let mut cache = ResultsCache::new(&c);

    cache.get_or_compute(&layout("h1"), &c, ThumbMode::LeftThumb, &source).unwrap();
    cache.get_or_compute(&layout("h1"), &c, ThumbMode::RightThumb, &source).unwrap();

    let fresh = cache
        .get_or_compute(&layout("h2"), &c, ThumbMode::NoThumb, &source)
        .unwrap()
        .clone();
    assert_eq!(fresh.metric(Metric::Roll), 3.0);

    let entry = cache.entry("demo").unwrap();
    assert_eq!(entry.hash, "h2");
    assert_eq!(entry.results.len(), 1);
    assert!(entry.results.contains_key(&ThumbMode::NoThumb));

    // the old mode is recomputed, not resurrected
    cache.get_or_compute(&layout("h2"), &c, ThumbMode::LeftThumb, &source).unwrap();
    assert_eq!(source.calls.get(), 4);
}

#[test]
fn test_other_layouts_are_kept() {
    let source = CountingSource::default();
    let c = corpus(&[], &[]);
    let mut cache = ResultsCache::new(&c);
    let other = LayoutBuilder::new("other").key('a', Finger::LeftPinky).build();

    cache.get_or_compute(&other, &c, ThumbMode::Average, &source).unwrap();
    cache.get_or_compute(&layout("h1"), &c, ThumbMode::Average, &source).unwrap();
    cache.get_or_compute(&layout("h2"), &c, ThumbMode::Average, &source).unwrap();

    assert_eq!(cache.len(), 2);
    assert!(cache.entry("other").is_some());
}

#[test]
fn test_persist_round_trip_keeps_infinity() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("cache.json");

    let c = corpus(&[('a', 1), ('b', 1)], &[("aab", 1), ("ab ", 1)]);
    let l = LayoutBuilder::new("demo")
        .hash("h1")
        .key_on_row('a', Finger::LeftIndex, Row::Home)
        .key_on_row('b', Finger::RightIndex, Row::Home)
        .build();
    let engine = MetricsEngine::default();

    let mut cache = ResultsCache::new(&c);
    let computed = cache
        .get_or_compute(&l, &c, ThumbMode::LeftThumb, &engine)
        .unwrap()
        .clone();
    cache.persist(&path).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"inf\""));
    assert!(raw.contains("\"LT\""));

    let loaded = ResultsCache::load_or_default(&path, &c).unwrap();
    assert_eq!(loaded, cache);
    let stored = &loaded.entry("demo").unwrap().results[&ThumbMode::LeftThumb];
    assert_eq!(stored.metric(Metric::RollRatio), computed.metric(Metric::RollRatio));
}

#[test]
fn test_absent_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let c = corpus(&[('a', 1)], &[]);
    let cache = ResultsCache::load_or_default(dir.path().join("none.json"), &c).unwrap();
    assert!(cache.is_empty());
    assert_eq!(cache.file, "test-corpus");
    assert_eq!(cache.corpus_hash, c.content_hash());
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_file(dir.path(), "cache.json", "{ not json");
    assert!(ResultsCache::load_or_default(&path, &corpus(&[], &[])).is_err());
}

#[test]
fn test_cache_follows_corpus_contents_not_label() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    let source = CountingSource::default();

    let first = corpus(&[('a', 2)], &[("aaa", 1)]);
    let mut cache = ResultsCache::new(&first);
    cache
        .get_or_compute(&layout("h1"), &first, ThumbMode::Average, &source)
        .unwrap();
    cache.persist(&path).unwrap();

    // same counts reached through another path
    let mut renamed = first.clone();
    renamed.file = "elsewhere/corpus.json".to_string();
    let reloaded = ResultsCache::load_or_default(&path, &renamed).unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.file, "elsewhere/corpus.json");

    // edited counts under the old label
    let mut edited = first.clone();
    edited.monograms.insert('a', 3);
    assert!(ResultsCache::load_or_default(&path, &edited).unwrap().is_empty());
}

#[test]
fn test_cache_without_corpus_hash_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_file(
        dir.path(),
        "cache.json",
        r#"{"file": "test-corpus", "data": {"demo": {"hash": "h1", "LT": {"roll": 0.5}}}}"#,
    );
    let c = corpus(&[('a', 1)], &[]);
    assert!(ResultsCache::load_or_default(&path, &c).unwrap().is_empty());
}

#[test]
fn test_persist_replaces_file_without_leftovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_file(dir.path(), "cache.json", "stale contents");
    let c = corpus(&[], &[]);

    ResultsCache::new(&c).persist(&path).unwrap();

    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("cache.json")]);
    assert!(ResultsCache::load_or_default(&path, &c).unwrap().is_empty());
}

#[test]
fn test_reloaded_results_match_fresh_analysis_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    let c = sample_corpus();
    let engine = MetricsEngine::default();
    let layouts = [qwerty(), colemak()];

    let mut cache = ResultsCache::new(&c);
    for l in &layouts {
        for mode in ThumbMode::iter() {
            cache.get_or_compute(l, &c, mode, &engine).unwrap();
        }
    }
    cache.persist(&path).unwrap();

    let loaded = ResultsCache::load_or_default(&path, &c).unwrap();
    assert_eq!(loaded, cache);

    for l in &layouts {
        for mode in ThumbMode::iter() {
            let fresh = engine.analyze(l, &c, mode).unwrap();
            let stored = &loaded.entry(&l.name).unwrap().results[&mode];
            for (key, value) in fresh.iter() {
                let restored = stored.get(key).unwrap();
                assert_eq!(restored.to_bits(), value.to_bits(), "{} {} {}", l.name, mode, key);
            }

            assert_eq!(
                stored.metric(Metric::Roll),
                stored.metric(Metric::RollIn) + stored.metric(Metric::RollOut)
            );
            assert_eq!(
                stored.metric(Metric::Onehand),
                stored.metric(Metric::OnehandIn) + stored.metric(Metric::OnehandOut)
            );
            assert_eq!(
                stored.metric(Metric::Dsfb),
                stored.metric(Metric::DsfbAlt) + stored.metric(Metric::DsfbRed)
            );
        }
    }
}

#[test]
fn test_fractions_survive_json_bit_for_bit() {
    for d in 3..200u32 {
        for n in 1..d {
            let value = n as f64 / d as f64;
            let r: MetricsResult = [(Metric::Sfb, value)].into_iter().collect();
            let back: MetricsResult =
                serde_json::from_str(&serde_json::to_string(&r).unwrap()).unwrap();
            assert_eq!(back.metric(Metric::Sfb).to_bits(), value.to_bits(), "{}/{}", n, d);
        }
    }
}

#[test]
fn test_clear_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_file(dir.path(), "cache.json", "{}");
    assert!(ResultsCache::clear_file(&path).unwrap());
    assert!(!path.exists());
    assert!(!ResultsCache::clear_file(&path).unwrap());
}
