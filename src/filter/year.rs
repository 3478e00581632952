use super::{RecordFilter, YearRange};
use crate::record::EventRecord;

/// Keeps records whose year lies inside the range. Records without a year
/// always pass: they are never excluded (nor included) by the bound.
pub struct YearFilter {
    range: YearRange,
}

impl YearFilter {
    pub fn new(range: YearRange) -> Self {
        Self { range }
    }
}

impl RecordFilter for YearFilter {
    fn matches(&self, record: &EventRecord) -> bool {
        match record.year {
            Some(year) => self.range.contains(year),
            None => true,
        }
    }

    fn description(&self) -> String {
        format!("Year: {}..={}", self.range.min, self.range.max)
    }
}
