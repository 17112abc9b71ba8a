use crate::reports;
use keystat::error::KsResult;
use keystat::table::ClassificationTable;

pub fn run() -> KsResult<()> {
    reports::print_classification(ClassificationTable::shared());
    Ok(())
}
