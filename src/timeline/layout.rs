//! Node layout for the timeline.
//!
//! Layout runs in two passes. The logical pass places nodes from data alone:
//! each node gets a left margin proportional to the year gap to its
//! predecessor and a label side chosen by index parity. The geometry pass
//! runs after the presentation has placed the node boxes and reported where
//! they actually ended up; connector, title badge and hover tooltip anchors
//! are derived from those measured boxes rather than from logical positions.
//!
//! Nodes live in an arena addressed by index. Measurements are kept in a
//! separate table so a re-render can refresh them without touching nodes.

use super::cluster::TimelineNode;

/// Which side of the axis a node's title badge sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPlacement {
    Above,
    Below,
}

impl LabelPlacement {
    /// Even indices go above the axis, odd indices below.
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            LabelPlacement::Above
        } else {
            LabelPlacement::Below
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            LabelPlacement::Above => LabelPlacement::Below,
            LabelPlacement::Below => LabelPlacement::Above,
        }
    }
}

/// Geometry constants, all in the presentation's unit (pixels, cells, ...).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Diameter of a node marker.
    pub node_width: f64,
    /// Fixed spacing between consecutive markers.
    pub node_spacing: f64,
    /// Extra spacing per missing year between consecutive nodes.
    pub year_gap_unit: f64,
    pub leading_padding: f64,
    pub trailing_padding: f64,
    /// Vertical distance from the marker top to the title badge.
    pub label_offset: f64,
    pub connector_offset_above: f64,
    pub connector_offset_below: f64,
    /// Horizontal distance from the marker's left edge to its connector.
    pub connector_inset: f64,
    /// Vertical distance from the marker top to the hover tooltip.
    pub tooltip_offset: f64,
}

impl LayoutParams {
    /// Pixel geometry with a 16px root font size.
    pub fn pixels() -> Self {
        Self {
            node_width: 24.0,
            node_spacing: 16.0,
            year_gap_unit: 10.0,
            leading_padding: 16.0,
            trailing_padding: 32.0,
            label_offset: 40.0,
            connector_offset_above: 16.0,
            connector_offset_below: 27.2,
            connector_inset: 12.8,
            tooltip_offset: 32.0,
        }
    }

    /// Character-cell geometry for terminal rendering.
    pub fn cells(year_gap_unit: f64) -> Self {
        Self {
            node_width: 1.0,
            node_spacing: 1.0,
            year_gap_unit,
            leading_padding: 1.0,
            trailing_padding: 2.0,
            label_offset: 2.0,
            connector_offset_above: 1.0,
            connector_offset_below: 1.0,
            connector_inset: 0.0,
            tooltip_offset: 2.0,
        }
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self::pixels()
    }
}

/// Result of the logical pass for one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// Extra left margin from the year gap; zero for the first node.
    pub margin: f64,
    /// Logical left edge in content coordinates.
    pub x: f64,
    pub placement: LabelPlacement,
}

/// A node marker's box as placed by the presentation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NodeBox {
    pub fn contains_x(&self, x: f64) -> bool {
        self.x <= x && x < self.x + self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Result of the geometry pass for one node.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedNode {
    pub index: usize,
    pub placement: LabelPlacement,
    pub marker: NodeBox,
    /// Top-left of the title badge.
    pub label: Point,
    /// Top of the connector between the marker and the badge.
    pub connector: Point,
    /// Present only while the node is hovered; shows the year.
    pub tooltip: Option<Point>,
}

/// Arena of timeline nodes plus their logical slots and measured boxes.
#[derive(Debug, Clone)]
pub struct TimelineLayout {
    params: LayoutParams,
    nodes: Vec<TimelineNode>,
    slots: Vec<Slot>,
    measured: Vec<Option<NodeBox>>,
    hovered: Option<usize>,
}

impl TimelineLayout {
    /// Logical pass.
    pub fn new(nodes: Vec<TimelineNode>, params: LayoutParams) -> Self {
        let mut slots = Vec::with_capacity(nodes.len());
        let mut x = params.leading_padding;
        for (index, node) in nodes.iter().enumerate() {
            let margin = match index.checked_sub(1).map(|prev| &nodes[prev]) {
                Some(prev) => year_gap_margin(prev.year, node.year, params.year_gap_unit),
                None => 0.0,
            };
            if index > 0 {
                x += params.node_width + params.node_spacing;
            }
            x += margin;
            slots.push(Slot {
                margin,
                x,
                placement: LabelPlacement::for_index(index),
            });
        }
        let measured = vec![None; nodes.len()];
        Self {
            params,
            nodes,
            slots,
            measured,
            hovered: None,
        }
    }

    pub fn empty(params: LayoutParams) -> Self {
        Self::new(Vec::new(), params)
    }

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    pub fn nodes(&self) -> &[TimelineNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&TimelineNode> {
        self.nodes.get(index)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Logical width of the whole timeline including padding.
    pub fn content_width(&self) -> f64 {
        match self.slots.last() {
            Some(last) => last.x + self.params.node_width + self.params.trailing_padding,
            None => self.params.leading_padding + self.params.trailing_padding,
        }
    }

    /// Geometry pass input: where the presentation put node `index`.
    /// Returns false for an index outside the arena.
    pub fn record_measurement(&mut self, index: usize, marker: NodeBox) -> bool {
        match self.measured.get_mut(index) {
            Some(slot) => {
                *slot = Some(marker);
                true
            }
            None => false,
        }
    }

    /// Use the logical positions as measurements, for consumers that place
    /// markers exactly where the logical pass says.
    pub fn measure_logical(&mut self, top: f64) {
        let width = self.params.node_width;
        for (index, slot) in self.slots.iter().enumerate() {
            self.measured[index] = Some(NodeBox {
                x: slot.x,
                y: top,
                width,
                height: width,
            });
        }
    }

    pub fn measured(&self, index: usize) -> Option<NodeBox> {
        self.measured.get(index).copied().flatten()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Set or clear the hovered node. Indices outside the arena clear it.
    pub fn set_hovered(&mut self, index: Option<usize>) {
        self.hovered = index.filter(|&i| i < self.nodes.len());
    }

    /// Index of the measured marker under a horizontal position.
    pub fn hit_test(&self, x: f64) -> Option<usize> {
        self.measured
            .iter()
            .position(|m| m.is_some_and(|b| b.contains_x(x)))
    }

    /// Geometry pass for one node. `None` until the node has been measured.
    pub fn resolve(&self, index: usize) -> Option<ResolvedNode> {
        let marker = self.measured(index)?;
        let placement = self.slots.get(index)?.placement;
        let p = &self.params;
        let (label_dy, connector_dy) = match placement {
            LabelPlacement::Above => (-p.label_offset, -p.connector_offset_above),
            LabelPlacement::Below => (p.label_offset, p.connector_offset_below),
        };
        let tooltip = (self.hovered == Some(index)).then(|| {
            let dy = match placement.opposite() {
                LabelPlacement::Above => -p.tooltip_offset,
                LabelPlacement::Below => p.tooltip_offset,
            };
            Point {
                x: marker.x,
                y: marker.y + dy,
            }
        });
        Some(ResolvedNode {
            index,
            placement,
            marker,
            label: Point {
                x: marker.x,
                y: marker.y + label_dy,
            },
            connector: Point {
                x: marker.x + p.connector_inset,
                y: marker.y + connector_dy,
            },
            tooltip,
        })
    }

    /// Geometry pass over every measured node, in index order.
    pub fn resolve_all(&self) -> Vec<ResolvedNode> {
        (0..self.nodes.len()).filter_map(|i| self.resolve(i)).collect()
    }

    /// Horizontal room for node `index`'s badge before the next badge on the
    /// same side starts. `None` when no later node shares the side.
    pub fn label_room(&self, index: usize) -> Option<f64> {
        let next = index + 2;
        if next >= self.nodes.len() {
            return None;
        }
        let x_of = |i: usize| self.measured(i).map(|b| b.x).unwrap_or(self.slots[i].x);
        Some((x_of(next) - x_of(index) - self.params.node_spacing).max(0.0))
    }
}

/// Margin before a node whose predecessor is `prev` years earlier.
/// Consecutive years get no extra margin.
pub fn year_gap_margin(prev_year: i64, year: i64, unit: f64) -> f64 {
    let missing = year.saturating_sub(prev_year).saturating_sub(1).max(0);
    missing as f64 * unit
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn node(year: i64) -> TimelineNode {
        TimelineNode {
            year,
            tags: Vec::new(),
            title: format!("event {}", year),
            members: vec![0],
        }
    }

    fn layout(years: &[i64]) -> TimelineLayout {
        TimelineLayout::new(years.iter().map(|&y| node(y)).collect(), LayoutParams::pixels())
    }

    #[test]
    fn test_first_node_has_no_margin() {
        let l = layout(&[1600, 1650]);
        assert_eq!(l.slots()[0].margin, 0.0);
        assert_eq!(l.slots()[0].x, 16.0);
    }

    #[test]
    fn test_margin_proportional_to_gap() {
        let l = layout(&[1600, 1601, 1611]);
        assert_eq!(l.slots()[1].margin, 0.0);
        assert_eq!(l.slots()[2].margin, 90.0);
        // 24 wide + 16 spacing between markers
        assert_eq!(l.slots()[1].x, 16.0 + 40.0);
        assert_eq!(l.slots()[2].x, 16.0 + 40.0 + 40.0 + 90.0);
    }

    #[test]
    fn test_alternating_placement() {
        let l = layout(&[1, 2, 3, 4, 5]);
        let placements: Vec<_> = l.slots().iter().map(|s| s.placement).collect();
        assert_eq!(
            placements,
            vec![
                LabelPlacement::Above,
                LabelPlacement::Below,
                LabelPlacement::Above,
                LabelPlacement::Below,
                LabelPlacement::Above
            ]
        );
        for i in (0..l.len() - 1).step_by(2) {
            assert_ne!(l.slots()[i].placement, l.slots()[i + 1].placement);
        }
    }

    #[test]
    fn test_content_width() {
        assert_eq!(layout(&[]).content_width(), 48.0);
        let l = layout(&[1600]);
        assert_eq!(l.content_width(), 16.0 + 24.0 + 32.0);
    }

    #[test]
    fn test_resolve_requires_measurement() {
        let l = layout(&[1600]);
        assert!(l.resolve(0).is_none());
        assert!(l.resolve_all().is_empty());
    }

    #[test]
    fn test_resolve_uses_measured_box() {
        let mut l = layout(&[1600, 1601]);
        let marker = NodeBox { x: 100.0, y: 50.0, width: 24.0, height: 24.0 };
        assert!(l.record_measurement(1, marker));
        assert!(!l.record_measurement(5, marker));

        let resolved = l.resolve(1).unwrap();
        assert_eq!(resolved.placement, LabelPlacement::Below);
        assert_eq!(resolved.label, Point { x: 100.0, y: 90.0 });
        assert!((resolved.connector.x - 112.8).abs() < 1e-9);
        assert!((resolved.connector.y - 77.2).abs() < 1e-9);
        assert!(resolved.tooltip.is_none());
    }

    #[test]
    fn test_tooltip_opposite_label() {
        let mut l = layout(&[1600, 1601]);
        l.measure_logical(50.0);

        l.set_hovered(Some(0));
        let above = l.resolve(0).unwrap();
        assert_eq!(above.placement, LabelPlacement::Above);
        assert!(above.label.y < 50.0);
        assert!(above.tooltip.unwrap().y > 50.0);
        assert!(l.resolve(1).unwrap().tooltip.is_none());

        l.set_hovered(Some(1));
        let below = l.resolve(1).unwrap();
        assert!(below.label.y > 50.0);
        assert!(below.tooltip.unwrap().y < 50.0);
    }

    #[test]
    fn test_hover_out_of_range_clears() {
        let mut l = layout(&[1600]);
        l.set_hovered(Some(0));
        assert_eq!(l.hovered(), Some(0));
        l.set_hovered(Some(3));
        assert_eq!(l.hovered(), None);
    }

    #[test]
    fn test_hit_test() {
        let mut l = layout(&[1600, 1610]);
        l.measure_logical(0.0);
        let second = l.slots()[1].x;
        assert_eq!(l.hit_test(second + 1.0), Some(1));
        assert_eq!(l.hit_test(0.0), None);
    }

    #[test]
    fn test_label_room() {
        let mut l = TimelineLayout::new(vec![node(1), node(2), node(3)], LayoutParams::cells(1.0));
        l.measure_logical(0.0);
        // cells: x = 1, 3, 5; badge 0 may run until badge 2 minus spacing
        assert_eq!(l.label_room(0), Some(3.0));
        assert_eq!(l.label_room(1), None);
    }

    #[test]
    fn test_year_gap_margin() {
        assert_eq!(year_gap_margin(1600, 1601, 10.0), 0.0);
        assert_eq!(year_gap_margin(1600, 1603, 10.0), 20.0);
        assert_eq!(year_gap_margin(1600, 1600, 10.0), 0.0);
    }

    proptest! {
        #[test]
        fn prop_labels_alternate_in_pairs(gaps in proptest::collection::vec(1i64..50, 0..40)) {
            let years: Vec<i64> = gaps
                .iter()
                .scan(1500, |year, gap| {
                    *year += gap;
                    Some(*year)
                })
                .collect();
            let l = layout(&years);
            prop_assert_eq!(l.len(), years.len());
            for i in (0..l.len().saturating_sub(1)).step_by(2) {
                prop_assert_ne!(l.slots()[i].placement, l.slots()[i + 1].placement);
            }
            for (i, slot) in l.slots().iter().enumerate() {
                prop_assert_eq!(slot.placement, LabelPlacement::for_index(i));
            }
        }
    }
}
