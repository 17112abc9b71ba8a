#![allow(dead_code)]

use keystat::corpus::{Corpus, Trigram};
use keystat::fingers::Finger;
use keystat::layout::{KeyInfo, Layout, Row};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const EPS: f64 = keystat::consts::FRACTION_TOLERANCE;

pub const QWERTY_KEYS: &str = "qwertyuiopasdfghjkl;zxcvbnm,./";
pub const COLEMAK_KEYS: &str = "qwfpgjluy;arstdhneiozxcvbkm,./";

/// Builder for hand-made layouts in tests.
pub struct LayoutBuilder {
    layout: Layout,
}

impl LayoutBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            layout: Layout {
                name: name.to_string(),
                hash: "h0".to_string(),
                keys: HashMap::new(),
            },
        }
    }

    pub fn hash(mut self, hash: &str) -> Self {
        self.layout.hash = hash.to_string();
        self
    }

    pub fn key(mut self, c: char, finger: Finger) -> Self {
        self.layout.keys.insert(
            c,
            KeyInfo {
                finger,
                row: None,
                col: None,
                shift: false,
            },
        );
        self
    }

    pub fn key_on_row(mut self, c: char, finger: Finger, row: Row) -> Self {
        self.layout.keys.insert(
            c,
            KeyInfo {
                finger,
                row: Some(row),
                col: None,
                shift: false,
            },
        );
        self
    }

    pub fn build(self) -> Layout {
        self.layout
    }
}

pub fn corpus(monograms: &[(char, u64)], trigrams: &[(&str, u64)]) -> Corpus {
    Corpus {
        file: "test-corpus".to_string(),
        monograms: monograms.iter().copied().collect(),
        trigrams: trigrams
            .iter()
            .map(|(k, v)| (Trigram::parse(k).unwrap(), *v))
            .collect(),
    }
}

/// Small English-ish corpus that touches every trigram shape on a 3x10 board.
pub fn sample_corpus() -> Corpus {
    keystat::corpus::generate(
        "sample",
        &[
            "the quick brown fox jumps over the lazy dog",
            "pack my box with five dozen liquor jugs",
            "sphinx of black quartz, judge my vow.",
            "it's a little bit of all of this and that",
        ],
    )
}

pub fn qwerty() -> Layout {
    Layout::from_key_string("qwerty", QWERTY_KEYS).unwrap()
}

pub fn colemak() -> Layout {
    Layout::from_key_string("colemak", COLEMAK_KEYS).unwrap()
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Layout text file in the 3x10 form with standard finger columns.
pub fn layout_text(name: &str, keys: &str) -> String {
    let chars: Vec<char> = keys.chars().collect();
    let mut out = format!("{}\n", name);
    for row in chars.chunks(10) {
        let tokens: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        out.push_str(&tokens.join(" "));
        out.push('\n');
    }
    for _ in 0..3 {
        out.push_str("0 1 2 3 3 4 4 5 6 7\n");
    }
    out
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {} to be within {} of {}",
        actual,
        EPS,
        expected
    );
}
