use crate::consts::{FINGER_COUNT, TABLE_SIZE};
use crate::error::{KeyStatError, KsResult};
use crate::fingers::Finger;
use itertools::iproduct;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use tracing::debug;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    Display,
    AsRefStr,
    Serialize,
    Deserialize,
)]
pub enum Category {
    #[strum(serialize = "alternate")]
    #[serde(rename = "alternate")]
    Alternate,
    #[strum(serialize = "roll-in")]
    #[serde(rename = "roll-in")]
    RollIn,
    #[strum(serialize = "roll-out")]
    #[serde(rename = "roll-out")]
    RollOut,
    #[strum(serialize = "oneh-in")]
    #[serde(rename = "oneh-in")]
    OnehandIn,
    #[strum(serialize = "oneh-out")]
    #[serde(rename = "oneh-out")]
    OnehandOut,
    #[strum(serialize = "redirect")]
    #[serde(rename = "redirect")]
    Redirect,
    #[strum(serialize = "sfb")]
    #[serde(rename = "sfb")]
    Sfb,
    #[strum(serialize = "dsfb-alt")]
    #[serde(rename = "dsfb-alt")]
    DsfbAlt,
    #[strum(serialize = "dsfb-red")]
    #[serde(rename = "dsfb-red")]
    DsfbRed,
    #[strum(serialize = "sfT")]
    #[serde(rename = "sfT")]
    SfT,
}

/// Ordered triple of actuator classes; the typed form of keys like `"LP-LR-LI"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FingerTriple(pub [Finger; 3]);

impl FingerTriple {
    pub fn new(a: Finger, b: Finger, c: Finger) -> Self {
        Self([a, b, c])
    }

    #[inline(always)]
    fn slot(&self) -> usize {
        let [a, b, c] = self.0;
        a.index() * FINGER_COUNT * FINGER_COUNT + b.index() * FINGER_COUNT + c.index()
    }
}

impl fmt::Display for FingerTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "{}-{}-{}", a, b, c)
    }
}

impl FromStr for FingerTriple {
    type Err = KeyStatError;

    fn from_str(s: &str) -> KsResult<Self> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 3 {
            return Err(KeyStatError::Validation(format!(
                "Finger triple '{}' must have exactly 3 parts",
                s
            )));
        }
        Ok(Self([
            Finger::parse(parts[0])?,
            Finger::parse(parts[1])?,
            Finger::parse(parts[2])?,
        ]))
    }
}

/// Classifies one ordered triple of actuator classes.
pub fn classify(a: Finger, b: Finger, c: Finger) -> Category {
    // Same-finger overrides replace whatever the hand pattern says.
    if a != c && (b == a || b == c) {
        return Category::Sfb;
    }
    if a == c && a != b {
        return if a.hand() == b.hand() {
            Category::DsfbRed
        } else {
            Category::DsfbAlt
        };
    }
    if a == b && b == c {
        return Category::SfT;
    }

    hand_pattern(a, b, c)
}

fn hand_pattern(a: Finger, b: Finger, c: Finger) -> Category {
    if a.hand() == c.hand() && a.hand() != b.hand() {
        return Category::Alternate;
    }

    if a.hand() != c.hand() {
        // Exactly one adjacent pair shares a hand.
        let (from, to) = if a.hand() == b.hand() { (a, b) } else { (b, c) };
        return match from.rank().cmp(&to.rank()) {
            Ordering::Less => Category::RollOut,
            Ordering::Greater => Category::RollIn,
            Ordering::Equal => Category::Sfb,
        };
    }

    let (r1, r2, r3) = (a.rank(), b.rank(), c.rank());
    if r1 < r2 && r2 < r3 {
        Category::OnehandOut
    } else if r1 > r2 && r2 > r3 {
        Category::OnehandIn
    } else {
        Category::Redirect
    }
}

/// Category of every ordered triple of actuator classes.
///
/// Pure function of the finger model; build it once and share it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationTable {
    entries: Vec<Category>,
}

impl ClassificationTable {
    pub fn build() -> Self {
        let mut entries = vec![Category::SfT; TABLE_SIZE];
        for (a, b, c) in iproduct!(Finger::iter(), Finger::iter(), Finger::iter()) {
            entries[FingerTriple::new(a, b, c).slot()] = classify(a, b, c);
        }
        debug!("Classification table built: {} entries", entries.len());
        Self { entries }
    }

    /// Process-wide table, built on first use.
    pub fn shared() -> &'static ClassificationTable {
        static TABLE: OnceLock<ClassificationTable> = OnceLock::new();
        TABLE.get_or_init(ClassificationTable::build)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline(always)]
    pub fn get(&self, triple: &FingerTriple) -> Option<Category> {
        self.entries.get(triple.slot()).copied()
    }

    /// Lookup by the joined string key, e.g. `"LP-LR-LI"`.
    pub fn get_key(&self, key: &str) -> Option<Category> {
        key.parse::<FingerTriple>()
            .ok()
            .and_then(|triple| self.get(&triple))
    }

    pub fn iter(&self) -> impl Iterator<Item = (FingerTriple, Category)> + '_ {
        iproduct!(Finger::iter(), Finger::iter(), Finger::iter()).map(move |(a, b, c)| {
            let triple = FingerTriple::new(a, b, c);
            (triple, self.entries[triple.slot()])
        })
    }

    /// Entries grouped by category for display; lookups should use `get`.
    pub fn sorted_entries(&self) -> Vec<(FingerTriple, Category)> {
        let mut rows: Vec<_> = self.iter().collect();
        rows.sort_by_key(|&(triple, cat)| (cat, triple));
        rows
    }

    pub fn category_counts(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for cat in &self.entries {
            *counts.entry(*cat).or_default() += 1;
        }
        counts
    }

    /// The string-keyed form, as the table is exchanged with other tools.
    pub fn to_string_map(&self) -> BTreeMap<String, Category> {
        self.iter().map(|(t, c)| (t.to_string(), c)).collect()
    }
}
