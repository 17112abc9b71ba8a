use crate::error::{KeyStatError, KsResult};
use crate::util;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;

/// Three consecutive corpus characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Trigram(pub [char; 3]);

impl Trigram {
    pub fn parse(s: &str) -> KsResult<Self> {
        let mut it = s.chars();
        match (it.next(), it.next(), it.next(), it.next()) {
            (Some(a), Some(b), Some(c), None) => Ok(Self([a, b, c])),
            _ => Err(KeyStatError::Validation(format!(
                "3-gram key {:?} is not exactly 3 characters",
                s
            ))),
        }
    }

    pub fn chars(&self) -> [char; 3] {
        self.0
    }

    /// True when all three characters are the same character.
    pub fn is_uniform(&self) -> bool {
        let [a, b, c] = self.0;
        a == b && b == c
    }

    /// True when any character appears more than once.
    pub fn has_repeat(&self) -> bool {
        let [a, b, c] = self.0;
        a == b || b == c || a == c
    }
}

impl fmt::Display for Trigram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "{}{}{}", a, b, c)
    }
}

/// On-disk shape of a corpus file; keys are only strings at this point.
#[derive(Debug, Serialize, Deserialize)]
struct RawCorpus {
    #[serde(default)]
    file: String,
    #[serde(rename = "1-grams")]
    monograms: BTreeMap<String, u64>,
    #[serde(rename = "3-grams")]
    trigrams: BTreeMap<String, u64>,
}

/// Character and 3-character sequence counts. A space is the thumb key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    pub file: String,
    pub monograms: HashMap<char, u64>,
    pub trigrams: HashMap<Trigram, u64>,
}

impl Corpus {
    pub fn monogram_total(&self) -> u64 {
        self.monograms.values().sum()
    }

    pub fn trigram_total(&self) -> u64 {
        self.trigrams.values().sum()
    }

    /// SHA-256 over the counts alone; the `file` label does not take part.
    pub fn content_hash(&self) -> String {
        let raw = self.to_raw();
        let tokens: Vec<String> = raw
            .monograms
            .iter()
            .map(|(k, v)| format!("1:{}:{}", k, v))
            .chain(raw.trigrams.iter().map(|(k, v)| format!("3:{}:{}", k, v)))
            .collect();
        util::content_hash(&tokens)
    }

    pub fn from_json_str(s: &str) -> KsResult<Self> {
        let raw: RawCorpus = serde_json::from_str(s)?;
        Self::from_raw(raw)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> KsResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut corpus = Self::from_json_str(&content)?;
        if corpus.file.is_empty() {
            corpus.file = path.display().to_string();
        }
        info!(
            "Loaded corpus '{}': {} 1-grams, {} 3-grams",
            corpus.file,
            corpus.monograms.len(),
            corpus.trigrams.len()
        );
        Ok(corpus)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> KsResult<()> {
        let content = serde_json::to_string_pretty(&self.to_raw())?;
        fs::write(path, content)?;
        Ok(())
    }

    fn from_raw(raw: RawCorpus) -> KsResult<Self> {
        let mut monograms = HashMap::with_capacity(raw.monograms.len());
        for (k, v) in raw.monograms {
            let mut it = k.chars();
            match (it.next(), it.next()) {
                (Some(c), None) => {
                    monograms.insert(c, v);
                }
                _ => {
                    return Err(KeyStatError::Validation(format!(
                        "1-gram key {:?} is not exactly 1 character",
                        k
                    )))
                }
            }
        }

        let trigrams = raw
            .trigrams
            .into_iter()
            .map(|(k, v)| Trigram::parse(&k).map(|t| (t, v)))
            .collect::<KsResult<HashMap<_, _>>>()?;

        Ok(Self {
            file: raw.file,
            monograms,
            trigrams,
        })
    }

    fn to_raw(&self) -> RawCorpus {
        RawCorpus {
            file: self.file.clone(),
            monograms: self
                .monograms
                .iter()
                .map(|(c, v)| (c.to_string(), *v))
                .collect(),
            trigrams: self
                .trigrams
                .iter()
                .map(|(t, v)| (t.to_string(), *v))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TextSource {
    texts: Vec<String>,
}

/// Reads generator input of the form `{"texts": ["...", ...]}`.
pub fn load_texts<P: AsRef<Path>>(path: P) -> KsResult<Vec<String>> {
    let content = fs::read_to_string(path)?;
    let source: TextSource = serde_json::from_str(&content)?;
    Ok(source.texts)
}

/// Counts 1-grams and 3-grams over `texts`, joined by single-space word boundaries.
pub fn generate<S: AsRef<str>>(file: &str, texts: &[S]) -> Corpus {
    let mut chars: Vec<char> = Vec::new();
    for (i, text) in texts.iter().enumerate() {
        if i > 0 {
            chars.push(' ');
        }
        chars.extend(text.as_ref().chars());
    }

    let mut corpus = Corpus {
        file: file.to_string(),
        ..Default::default()
    };

    for &c in &chars {
        *corpus.monograms.entry(c).or_default() += 1;
    }
    for w in chars.windows(3) {
        *corpus.trigrams.entry(Trigram([w[0], w[1], w[2]])).or_default() += 1;
    }

    corpus
}
