use crate::fingers::Finger;
use crate::layout::Row;
use crate::table::Category;
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Every key the engine can emit.
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
#[serde(try_from = "String", into = "String")]
pub enum Metric {
    // Primary trigram buckets
    #[strum(serialize = "alternate")]
    Alternate,
    #[strum(serialize = "roll-in")]
    RollIn,
    #[strum(serialize = "roll-out")]
    RollOut,
    #[strum(serialize = "oneh-in")]
    OnehandIn,
    #[strum(serialize = "oneh-out")]
    OnehandOut,
    #[strum(serialize = "redirect")]
    Redirect,
    #[strum(serialize = "sfb")]
    Sfb,
    #[strum(serialize = "dsfb-alt")]
    DsfbAlt,
    #[strum(serialize = "dsfb-red")]
    DsfbRed,
    #[strum(serialize = "sfT")]
    SfT,
    #[strum(serialize = "sfR")]
    SfR,
    #[strum(serialize = "unknown")]
    Unknown,

    // Derived trigram aggregates
    #[strum(serialize = "roll")]
    Roll,
    #[strum(serialize = "onehand")]
    Onehand,
    #[strum(serialize = "dsfb")]
    Dsfb,
    #[strum(serialize = "roll-rt")]
    RollRatio,
    #[strum(serialize = "oneh-rt")]
    OnehandRatio,

    // Finger use
    #[strum(serialize = "LP")]
    LeftPinky,
    #[strum(serialize = "LR")]
    LeftRing,
    #[strum(serialize = "LM")]
    LeftMiddle,
    #[strum(serialize = "LI")]
    LeftIndex,
    #[strum(serialize = "RI")]
    RightIndex,
    #[strum(serialize = "RM")]
    RightMiddle,
    #[strum(serialize = "RR")]
    RightRing,
    #[strum(serialize = "RP")]
    RightPinky,
    #[strum(serialize = "TB")]
    Thumb,
    #[strum(serialize = "LTotal")]
    LeftTotal,
    #[strum(serialize = "RTotal")]
    RightTotal,

    // Row use
    #[strum(serialize = "top")]
    Top,
    #[strum(serialize = "home")]
    Home,
    #[strum(serialize = "bottom")]
    Bottom,
}

impl Metric {
    /// Buckets that partition the trigram normalization base.
    pub const PRIMARY_TRIGRAMS: [Metric; 12] = [
        Metric::RollIn,
        Metric::RollOut,
        Metric::Alternate,
        Metric::Redirect,
        Metric::OnehandIn,
        Metric::OnehandOut,
        Metric::Sfb,
        Metric::DsfbAlt,
        Metric::DsfbRed,
        Metric::SfT,
        Metric::SfR,
        Metric::Unknown,
    ];

    /// Buckets that partition the finger-use normalization base.
    pub const FINGER_USE: [Metric; 9] = [
        Metric::LeftPinky,
        Metric::LeftRing,
        Metric::LeftMiddle,
        Metric::LeftIndex,
        Metric::RightIndex,
        Metric::RightMiddle,
        Metric::RightRing,
        Metric::RightPinky,
        Metric::Thumb,
    ];

    pub const ROW_USE: [Metric; 3] = [Metric::Top, Metric::Home, Metric::Bottom];
}

impl From<Category> for Metric {
    fn from(c: Category) -> Self {
        match c {
            Category::Alternate => Metric::Alternate,
            Category::RollIn => Metric::RollIn,
            Category::RollOut => Metric::RollOut,
            Category::OnehandIn => Metric::OnehandIn,
            Category::OnehandOut => Metric::OnehandOut,
            Category::Redirect => Metric::Redirect,
            Category::Sfb => Metric::Sfb,
            Category::DsfbAlt => Metric::DsfbAlt,
            Category::DsfbRed => Metric::DsfbRed,
            Category::SfT => Metric::SfT,
        }
    }
}

impl From<Finger> for Metric {
    /// Both thumbs share the single `TB` bucket.
    fn from(f: Finger) -> Self {
        match f {
            Finger::LeftPinky => Metric::LeftPinky,
            Finger::LeftRing => Metric::LeftRing,
            Finger::LeftMiddle => Metric::LeftMiddle,
            Finger::LeftIndex => Metric::LeftIndex,
            Finger::LeftThumb | Finger::RightThumb => Metric::Thumb,
            Finger::RightIndex => Metric::RightIndex,
            Finger::RightMiddle => Metric::RightMiddle,
            Finger::RightRing => Metric::RightRing,
            Finger::RightPinky => Metric::RightPinky,
        }
    }
}

impl From<Row> for Metric {
    fn from(r: Row) -> Self {
        match r {
            Row::Top => Metric::Top,
            Row::Home => Metric::Home,
            Row::Bottom => Metric::Bottom,
        }
    }
}

impl TryFrom<String> for Metric {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse().map_err(|_| format!("unknown metric '{}'", s))
    }
}

impl From<Metric> for String {
    fn from(m: Metric) -> String {
        m.to_string()
    }
}

/// Flat name -> value map produced by one analysis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsResult {
    values: BTreeMap<String, f64>,
}

impl MetricsResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        self.values.insert(metric.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Missing metrics read as 0.
    pub fn metric(&self, metric: Metric) -> f64 {
        self.get(metric.as_ref()).unwrap_or(0.0)
    }

    pub fn contains(&self, metric: Metric) -> bool {
        self.values.contains_key(metric.as_ref())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn extend(&mut self, other: MetricsResult) {
        self.values.extend(other.values);
    }

    /// Sum of a group of metrics.
    pub fn sum(&self, metrics: &[Metric]) -> f64 {
        metrics.iter().map(|&m| self.metric(m)).sum()
    }

    /// Pairwise arithmetic mean over the union of keys (a missing key reads as 0).
    pub fn average(a: &MetricsResult, b: &MetricsResult) -> MetricsResult {
        let mut values = BTreeMap::new();
        for key in a.values.keys().chain(b.values.keys()) {
            if values.contains_key(key) {
                continue;
            }
            let x = a.get(key).unwrap_or(0.0);
            let y = b.get(key).unwrap_or(0.0);
            values.insert(key.clone(), (x + y) / 2.0);
        }
        MetricsResult { values }
    }
}

impl FromIterator<(Metric, f64)> for MetricsResult {
    fn from_iter<I: IntoIterator<Item = (Metric, f64)>>(iter: I) -> Self {
        let mut r = MetricsResult::new();
        for (m, v) in iter {
            r.set(m, v);
        }
        r
    }
}

// JSON has no infinity; non-finite values travel as strings.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum StoredValue {
    Number(f64),
    Text(String),
}

impl Serialize for MetricsResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (k, v) in &self.values {
            if v.is_finite() {
                map.serialize_entry(k, v)?;
            } else if v.is_nan() {
                map.serialize_entry(k, "nan")?;
            } else if *v > 0.0 {
                map.serialize_entry(k, "inf")?;
            } else {
                map.serialize_entry(k, "-inf")?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MetricsResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, StoredValue>::deserialize(deserializer)?;
        let mut values = BTreeMap::new();
        for (k, v) in raw {
            let value = match v {
                StoredValue::Number(n) => n,
                StoredValue::Text(s) => match s.as_str() {
                    "inf" => f64::INFINITY,
                    "-inf" => f64::NEG_INFINITY,
                    "nan" => f64::NAN,
                    other => {
                        return Err(serde::de::Error::custom(format!(
                            "invalid value '{}' for metric '{}'",
                            other, k
                        )))
                    }
                },
            };
            values.insert(k, value);
        }
        Ok(MetricsResult { values })
    }
}
