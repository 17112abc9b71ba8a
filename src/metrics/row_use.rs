use super::result::{Metric, MetricsResult};
use crate::consts::THUMB_CHAR;
use crate::corpus::Corpus;
use crate::error::{KeyStatError, KsResult};
use crate::layout::Layout;
use std::collections::BTreeMap;

/// Share of keystrokes per row, over characters that carry row metadata only.
pub fn count_row_use(layout: &Layout, corpus: &Corpus) -> KsResult<MetricsResult> {
    let mut buckets: BTreeMap<Metric, u64> = Metric::ROW_USE.iter().map(|&m| (m, 0)).collect();

    for (&c, &n) in &corpus.monograms {
        if c == THUMB_CHAR {
            continue;
        }
        if let Some(row) = layout.key(c).and_then(|k| k.row) {
            *buckets.entry(Metric::from(row)).or_default() += n;
        }
    }

    let total: u64 = buckets.values().sum();
    if total == 0 {
        return Err(KeyStatError::EmptyNormalization { group: "row-use" });
    }
    let total = total as f64;

    Ok(buckets
        .into_iter()
        .map(|(m, n)| (m, n as f64 / total))
        .collect())
}
