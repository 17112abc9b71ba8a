use super::result::{Metric, MetricsResult};
use crate::consts::THUMB_CHAR;
use crate::corpus::{Corpus, Trigram};
use crate::error::{KeyStatError, KsResult};
use crate::fingers::Finger;
use crate::layout::Layout;
use crate::table::{ClassificationTable, FingerTriple};
use std::collections::BTreeMap;
use tracing::debug;

/// Resolves the actuator triple for a corpus trigram.
///
/// `thumb` stands in for spaces; `None` means sequences with a space are
/// excluded. Any character missing from the layout excludes the sequence.
#[inline(always)]
fn resolve(layout: &Layout, t: &Trigram, thumb: Option<Finger>) -> Option<FingerTriple> {
    let mut fingers = [Finger::LeftThumb; 3];
    for (slot, &c) in fingers.iter_mut().zip(t.chars().iter()) {
        *slot = if c == THUMB_CHAR {
            thumb?
        } else {
            layout.finger(c)?
        };
    }
    Some(FingerTriple(fingers))
}

/// Bucket for one sequence.
///
/// A literal character repeat is `sfR`, except a triple of one character,
/// which keeps the table's `sfT`.
#[inline(always)]
pub fn bucket_for(table: &ClassificationTable, t: &Trigram, triple: &FingerTriple) -> Metric {
    if t.has_repeat() && !t.is_uniform() {
        return Metric::SfR;
    }
    match table.get(triple) {
        Some(cat) => Metric::from(cat),
        None => Metric::Unknown,
    }
}

/// Primary trigram buckets for a single thumb assignment, plus derived metrics.
pub fn count_trigrams(
    layout: &Layout,
    corpus: &Corpus,
    thumb: Option<Finger>,
    table: &ClassificationTable,
) -> KsResult<MetricsResult> {
    let mut buckets: BTreeMap<Metric, u64> =
        Metric::PRIMARY_TRIGRAMS.iter().map(|&m| (m, 0)).collect();
    let mut skipped = 0usize;

    for (t, &n) in &corpus.trigrams {
        let Some(triple) = resolve(layout, t, thumb) else {
            skipped += 1;
            continue;
        };
        *buckets.entry(bucket_for(table, t, &triple)).or_default() += n;
    }

    debug!(
        "trigrams: '{}' thumb={:?}, {} sequences excluded",
        layout.name, thumb, skipped
    );

    let total: u64 = buckets.values().sum();
    if total == 0 {
        return Err(KeyStatError::EmptyNormalization { group: "trigrams" });
    }
    let total = total as f64;

    let mut result: MetricsResult = buckets
        .into_iter()
        .map(|(m, n)| (m, n as f64 / total))
        .collect();

    derive_aggregates(&mut result);
    result.set(
        Metric::RollRatio,
        ratio(result.metric(Metric::RollIn), result.metric(Metric::RollOut)),
    );
    result.set(
        Metric::OnehandRatio,
        ratio(result.metric(Metric::OnehandIn), result.metric(Metric::OnehandOut)),
    );

    Ok(result)
}

/// Mean of the left-thumb and right-thumb runs.
///
/// Buckets and ratios are averaged pairwise; the sum aggregates are rebuilt
/// from the averaged buckets so `roll == roll-in + roll-out` stays exact.
pub fn average_thumbs(left: &MetricsResult, right: &MetricsResult) -> MetricsResult {
    let mut avg = MetricsResult::average(left, right);
    derive_aggregates(&mut avg);
    avg
}

pub fn derive_aggregates(result: &mut MetricsResult) {
    let roll = result.metric(Metric::RollIn) + result.metric(Metric::RollOut);
    let onehand = result.metric(Metric::OnehandIn) + result.metric(Metric::OnehandOut);
    let dsfb = result.metric(Metric::DsfbAlt) + result.metric(Metric::DsfbRed);
    result.set(Metric::Roll, roll);
    result.set(Metric::Onehand, onehand);
    result.set(Metric::Dsfb, dsfb);
}

/// `num / den`, or `+inf` when the denominator bucket is exactly zero.
#[inline(always)]
pub fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        f64::INFINITY
    } else {
        num / den
    }
}
