use super::result::{Metric, MetricsResult};
use crate::config::ThumbMode;
use crate::consts::THUMB_CHAR;
use crate::corpus::Corpus;
use crate::error::{KeyStatError, KsResult};
use crate::fingers::{Finger, Hand};
use crate::layout::Layout;
use std::collections::BTreeMap;
use tracing::debug;

/// Share of keystrokes per finger, thumb bucket `TB` included.
///
/// The space count lands in `TB` unless the mode is `NONE`, where it is
/// dropped rather than redistributed. Characters missing from the layout are
/// skipped.
pub fn count_finger_use(layout: &Layout, corpus: &Corpus, mode: ThumbMode) -> KsResult<MetricsResult> {
    let mut buckets: BTreeMap<Metric, u64> = Metric::FINGER_USE.iter().map(|&m| (m, 0)).collect();
    let mut skipped = 0usize;

    for (&c, &n) in &corpus.monograms {
        if c == THUMB_CHAR {
            if mode.uses_thumb() {
                *buckets.entry(Metric::Thumb).or_default() += n;
            }
            continue;
        }

        let Some(finger) = layout.finger(c) else {
            skipped += 1;
            continue;
        };

        *buckets.entry(Metric::from(finger)).or_default() += n;
    }

    if skipped > 0 {
        debug!("finger-use: {} characters not on '{}'", skipped, layout.name);
    }

    let total: u64 = buckets.values().sum();
    if total == 0 {
        return Err(KeyStatError::EmptyNormalization { group: "finger-use" });
    }
    let total = total as f64;

    let mut result: MetricsResult = buckets
        .into_iter()
        .map(|(m, n)| (m, n as f64 / total))
        .collect();

    let left = hand_total(&result, Hand::Left);
    let right = hand_total(&result, Hand::Right);
    result.set(Metric::LeftTotal, left);
    result.set(Metric::RightTotal, right);

    Ok(result)
}

/// Hand totals as the sum of the four same-hand finger fractions.
pub fn hand_total(result: &MetricsResult, hand: Hand) -> f64 {
    Finger::columns()
        .filter(|f| f.hand() == hand)
        .map(|f| result.metric(Metric::from(f)))
        .sum()
}
