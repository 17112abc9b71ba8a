pub mod finger_use;
pub mod result;
pub mod row_use;
pub mod trigrams;

pub use self::result::{Metric, MetricsResult};

use crate::config::ThumbMode;
use crate::corpus::Corpus;
use crate::error::KsResult;
use crate::fingers::{Finger, Hand};
use crate::layout::Layout;
use crate::table::ClassificationTable;
use tracing::debug;

/// Scores a layout against a corpus: finger use, row use and trigram taxonomy.
#[derive(Debug, Clone, Copy)]
pub struct MetricsEngine<'t> {
    table: &'t ClassificationTable,
}

impl Default for MetricsEngine<'static> {
    fn default() -> Self {
        Self::new(ClassificationTable::shared())
    }
}

impl<'t> MetricsEngine<'t> {
    pub fn new(table: &'t ClassificationTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'t ClassificationTable {
        self.table
    }

    /// Full metric map for one layout under one thumb mode.
    pub fn analyze(&self, layout: &Layout, corpus: &Corpus, mode: ThumbMode) -> KsResult<MetricsResult> {
        debug!("Analyzing '{}' ({})", layout.name, mode);

        let mut result = finger_use::count_finger_use(layout, corpus, mode)?;
        result.extend(row_use::count_row_use(layout, corpus)?);
        result.extend(self.trigram_metrics(layout, corpus, mode)?);
        Ok(result)
    }

    pub fn trigram_metrics(&self, layout: &Layout, corpus: &Corpus, mode: ThumbMode) -> KsResult<MetricsResult> {
        match mode {
            ThumbMode::LeftThumb => {
                trigrams::count_trigrams(layout, corpus, Some(Finger::thumb(Hand::Left)), self.table)
            }
            ThumbMode::RightThumb => {
                trigrams::count_trigrams(layout, corpus, Some(Finger::thumb(Hand::Right)), self.table)
            }
            ThumbMode::NoThumb => trigrams::count_trigrams(layout, corpus, None, self.table),
            ThumbMode::Average => {
                let left = self.trigram_metrics(layout, corpus, ThumbMode::LeftThumb)?;
                let right = self.trigram_metrics(layout, corpus, ThumbMode::RightThumb)?;
                Ok(trigrams::average_thumbs(&left, &right))
            }
        }
    }
}
