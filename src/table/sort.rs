//! Stable multi-key ordering of filtered records.

use super::cell::start_case;
use super::column;
use crate::filter::text::fold_key;
use crate::record::{EventRecord, Field, FieldValue};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Ascending),
            "desc" | "descending" => Some(SortDirection::Descending),
            _ => None,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "⬆",
            SortDirection::Descending => "⬇",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: Field,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: Field, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

/// Ordered list of sort keys; earlier keys take precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    keys: Vec<SortKey>,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            keys: vec![SortKey::new(Field::Year, SortDirection::Descending)],
        }
    }
}

impl SortState {
    pub fn new(keys: Vec<SortKey>) -> Self {
        let mut state = Self { keys: Vec::new() };
        for key in keys {
            if column(key.field).sortable && state.direction_of(key.field).is_none() {
                state.keys.push(key);
            }
        }
        state
    }

    pub fn unsorted() -> Self {
        Self { keys: Vec::new() }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn direction_of(&self, field: Field) -> Option<SortDirection> {
        self.keys.iter().find(|k| k.field == field).map(|k| k.direction)
    }

    /// Cycle a column through first direction, reversed direction, unsorted.
    ///
    /// Numeric columns start descending, text columns ascending. Without
    /// `multi` the column replaces every other key; with it the column is
    /// added to (or updated within) the existing key list.
    pub fn toggle(&mut self, field: Field, multi: bool) {
        if !column(field).sortable {
            return;
        }
        let first = if field.is_numeric() {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        let next = match self.direction_of(field) {
            None => Some(first),
            Some(dir) if dir == first => Some(first.reversed()),
            Some(_) => None,
        };

        if !multi {
            self.keys = next.map(|d| vec![SortKey::new(field, d)]).unwrap_or_default();
            return;
        }
        match (self.keys.iter().position(|k| k.field == field), next) {
            (Some(pos), Some(direction)) => self.keys[pos].direction = direction,
            (Some(pos), None) => {
                self.keys.remove(pos);
            }
            (None, Some(direction)) => self.keys.push(SortKey::new(field, direction)),
            (None, None) => {}
        }
    }
}

/// Text key for a field: title-cased, case and accent folded. `None` when missing.
fn text_key(value: FieldValue<'_>) -> Option<String> {
    match value {
        FieldValue::Text(s) if !s.is_empty() => Some(fold_key(&start_case(s))),
        FieldValue::List(items) if !items.is_empty() => {
            let joined = items.iter().map(|s| start_case(s)).collect::<Vec<_>>().join(", ");
            Some(fold_key(&joined))
        }
        _ => None,
    }
}

/// Missing values sort last in either direction.
fn compare_present<T: Ord>(a: Option<T>, b: Option<T>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match direction {
            SortDirection::Ascending => a.cmp(&b),
            SortDirection::Descending => b.cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn compare_records(a: &EventRecord, b: &EventRecord, key: SortKey) -> Ordering {
    match (a.value(key.field), b.value(key.field)) {
        (FieldValue::Year(ya), FieldValue::Year(yb)) => compare_present(ya, yb, key.direction),
        (va, vb) => compare_present(text_key(va), text_key(vb), key.direction),
    }
}

/// Order record indices by the sort keys. Ties keep their input order.
pub fn sort_indices(records: &[EventRecord], indices: &[usize], sort: &SortState) -> Vec<usize> {
    let mut out: Vec<usize> = indices.iter().copied().filter(|&i| i < records.len()).collect();
    if sort.keys.is_empty() {
        return out;
    }
    out.sort_by(|&ia, &ib| {
        let (a, b) = (&records[ia], &records[ib]);
        sort.keys
            .iter()
            .map(|key| compare_records(a, b, *key))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    });
    out
}
