//! Year clustering: one aggregated node per distinct year.

use crate::record::EventRecord;
use std::collections::BTreeMap;

/// All filtered records sharing one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineNode {
    pub year: i64,
    /// Sorted, deduplicated union of the members' tags.
    pub tags: Vec<String>,
    /// First member's title, with a "+N more..." suffix when aggregated.
    pub title: String,
    /// Record indices in original order.
    pub members: Vec<usize>,
}

impl TimelineNode {
    pub fn count(&self) -> usize {
        self.members.len()
    }
}

/// Title for a group of records; `titles` is non-empty and in record order.
pub fn node_title(titles: &[&str]) -> String {
    match titles {
        [] => String::new(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{} +{} more...", first, rest.len()),
    }
}

/// Group the filtered records by year, ascending. Records without a year are
/// skipped; every dated record contributes to its node.
pub fn cluster_by_year(records: &[EventRecord], filtered: &[usize]) -> Vec<TimelineNode> {
    let mut by_year: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for &idx in filtered {
        let Some(year) = records.get(idx).and_then(|r| r.year) else {
            continue;
        };
        by_year.entry(year).or_default().push(idx);
    }

    by_year
        .into_iter()
        .map(|(year, members)| {
            let mut tags: Vec<String> = members
                .iter()
                .flat_map(|&i| records[i].tags.iter().cloned())
                .collect();
            tags.sort();
            tags.dedup();
            let titles: Vec<&str> = members.iter().map(|&i| records[i].title.as_str()).collect();
            TimelineNode {
                year,
                tags,
                title: node_title(&titles),
                members,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{filter_indices, FilterState, YearRange};
    use crate::table::VisibilityState;
    use proptest::prelude::*;

    fn record(year: Option<i64>, title: &str, tags: &[&str]) -> EventRecord {
        EventRecord {
            year,
            title: title.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    fn scenario() -> Vec<EventRecord> {
        vec![
            record(Some(1600), "A", &["x"]),
            record(Some(1600), "B", &["y"]),
            record(Some(1650), "C", &["x"]),
        ]
    }

    fn run(records: &[EventRecord], state: &FilterState) -> Vec<TimelineNode> {
        let filtered = filter_indices(records, state, &VisibilityState::default());
        cluster_by_year(records, &filtered)
    }

    #[test]
    fn test_aggregates_same_year() {
        let nodes = run(&scenario(), &FilterState::default());
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].year, 1600);
        assert_eq!(nodes[0].title, "A +1 more...");
        assert_eq!(nodes[0].tags, vec!["x", "y"]);
        assert_eq!(nodes[1].year, 1650);
        assert_eq!(nodes[1].title, "C");
        assert_eq!(nodes[1].tags, vec!["x"]);
    }

    #[test]
    fn test_tag_filter_then_cluster() {
        let mut state = FilterState::default();
        state.toggle_tag("y");
        let nodes = run(&scenario(), &state);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].year, 1600);
        assert_eq!(nodes[0].title, "B");
        assert_eq!(nodes[0].tags, vec!["y"]);
    }

    #[test]
    fn test_year_range_then_cluster() {
        let state = FilterState {
            year_range: YearRange::new(1601, 1700),
            ..Default::default()
        };
        let nodes = run(&scenario(), &state);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].year, 1650);
    }

    #[test]
    fn test_undated_records_skipped() {
        let records = vec![record(None, "undated", &["z"]), record(Some(1700), "dated", &[])];
        let nodes = cluster_by_year(&records, &[0, 1]);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].members, vec![1]);
    }

    #[test]
    fn test_ascending_order_regardless_of_input() {
        let records = vec![record(Some(1700), "late", &[]), record(Some(1500), "early", &[])];
        let nodes = cluster_by_year(&records, &[0, 1]);
        assert_eq!(nodes.iter().map(|n| n.year).collect::<Vec<_>>(), vec![1500, 1700]);
    }

    #[test]
    fn test_node_title() {
        assert_eq!(node_title(&["A"]), "A");
        assert_eq!(node_title(&["A", "B", "C"]), "A +2 more...");
    }

    proptest! {
        #[test]
        fn prop_counts_conserved(years in proptest::collection::vec(proptest::option::of(1600i64..1610), 0..50)) {
            let records: Vec<EventRecord> = years.iter().map(|y| record(*y, "t", &[])).collect();
            let filtered: Vec<usize> = (0..records.len()).collect();
            let nodes = cluster_by_year(&records, &filtered);
            let total: usize = nodes.iter().map(TimelineNode::count).sum();
            prop_assert_eq!(total, years.iter().filter(|y| y.is_some()).count());
            prop_assert!(nodes.windows(2).all(|w| w[0].year < w[1].year));
            for node in &nodes {
                if node.count() > 1 {
                    let expected = format!("+{} more...", node.count() - 1);
                    prop_assert!(node.title.ends_with(&expected));
                }
            }
        }
    }
}
