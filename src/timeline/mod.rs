//! Chronological branch: clustering filtered records by year and laying the
//! resulting nodes out along a horizontal axis.

pub mod cluster;
pub mod layout;

pub use cluster::{cluster_by_year, TimelineNode};
pub use layout::{LabelPlacement, LayoutParams, NodeBox, Point, ResolvedNode, Slot, TimelineLayout};

use crate::record::EventRecord;

/// Cluster and run the logical layout pass in one step.
pub fn build_timeline(records: &[EventRecord], filtered: &[usize], params: LayoutParams) -> TimelineLayout {
    TimelineLayout::new(cluster_by_year(records, filtered), params)
}
