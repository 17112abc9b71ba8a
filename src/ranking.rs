use crate::error::{KeyStatError, KsResult};
use crate::metrics::{Metric, MetricsResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// One weighted term of a sort key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SortTerm {
    pub metric: Metric,
    pub weight: f64,
}

fn parse_metric(name: &str) -> KsResult<Metric> {
    name.parse()
        .map_err(|_| KeyStatError::Config(format!("unknown metric '{}'", name)))
}

fn parse_percent(raw: &str, arg: &str) -> KsResult<f64> {
    raw.trim()
        .parse::<f64>()
        .map(|v| v / 100.0)
        .map_err(|_| KeyStatError::Config(format!("bad percentage in '{}'", arg)))
}

/// Parses sort arguments into weighted terms.
///
/// `"40%roll"` pins the weight at 0.40. Bare names split whatever is left of
/// `1 - Σ|pinned|` equally; a leading `-` makes that share negative.
pub fn parse_sort_terms<S: AsRef<str>>(args: &[S]) -> KsResult<Vec<SortTerm>> {
    let mut terms = Vec::with_capacity(args.len());
    let mut shared: Vec<(usize, f64)> = Vec::new();
    let mut pinned = 0.0;

    for arg in args {
        let arg = arg.as_ref().trim();
        if let Some((pct, name)) = arg.split_once('%') {
            let weight = parse_percent(pct, arg)?;
            pinned += weight.abs();
            terms.push(SortTerm {
                metric: parse_metric(name)?,
                weight,
            });
        } else {
            let (sign, name) = match arg.strip_prefix('-') {
                Some(rest) => (-1.0, rest),
                None => (1.0, arg),
            };
            shared.push((terms.len(), sign));
            terms.push(SortTerm {
                metric: parse_metric(name)?,
                weight: 0.0,
            });
        }
    }

    if !shared.is_empty() {
        let share = (1.0 - pinned) / shared.len() as f64;
        for (i, sign) in shared {
            terms[i].weight = sign * share;
        }
    }

    Ok(terms)
}

/// Parses `"50%roll"` style thresholds.
pub fn parse_filters<S: AsRef<str>>(args: &[S]) -> KsResult<BTreeMap<Metric, f64>> {
    let mut filters = BTreeMap::new();
    for arg in args {
        let arg = arg.as_ref().trim();
        let (pct, name) = arg
            .split_once('%')
            .ok_or_else(|| KeyStatError::Config(format!("filter '{}' needs a percentage", arg)))?;
        filters.insert(parse_metric(name)?, parse_percent(pct, arg)?);
    }
    Ok(filters)
}

/// Weighted sum over `terms`. Zero-weight terms are skipped so an infinite
/// ratio carrying no weight does not turn the score into NaN.
pub fn score(result: &MetricsResult, terms: &[SortTerm]) -> f64 {
    terms
        .iter()
        .filter(|t| t.weight != 0.0)
        .map(|t| t.weight * result.metric(t.metric))
        .sum()
}

/// Orders two scores, highest first when `high`. NaN ranks last either way.
fn compare_scores(a: f64, b: f64, high: bool) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            if high {
                ord.reverse()
            } else {
                ord
            }
        }
    }
}

/// Stable sort of `(name, result)` rows by score; highest first when `high`.
pub fn sort_results<T>(rows: &mut [(T, MetricsResult)], terms: &[SortTerm], high: bool) {
    rows.sort_by(|(_, a), (_, b)| compare_scores(score(a, terms), score(b, terms), high));
}

pub fn passes_filters(result: &MetricsResult, filters: &BTreeMap<Metric, f64>) -> bool {
    filters
        .iter()
        .all(|(&m, &threshold)| result.metric(m) >= threshold)
}
