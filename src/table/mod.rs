//! Sort and visibility engine for the table presentation.

pub mod cell;
pub mod sort;

use crate::record::{EventRecord, Field};
use std::collections::BTreeMap;

pub use cell::{render_cell, start_case, Cell, SourceRef};
pub use sort::{sort_indices, SortDirection, SortKey, SortState};

/// Static description of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub field: Field,
    pub sortable: bool,
    pub hideable: bool,
}

/// Columns in display order.
pub const COLUMNS: [ColumnDescriptor; 9] = [
    ColumnDescriptor { field: Field::Year, sortable: true, hideable: true },
    ColumnDescriptor { field: Field::Title, sortable: true, hideable: true },
    ColumnDescriptor { field: Field::Tags, sortable: false, hideable: true },
    ColumnDescriptor { field: Field::Author, sortable: true, hideable: true },
    ColumnDescriptor { field: Field::Language, sortable: true, hideable: true },
    ColumnDescriptor { field: Field::Details, sortable: true, hideable: true },
    ColumnDescriptor { field: Field::Sources, sortable: false, hideable: true },
    ColumnDescriptor { field: Field::City, sortable: true, hideable: true },
    ColumnDescriptor { field: Field::Individuals, sortable: false, hideable: true },
];

pub fn column(field: Field) -> ColumnDescriptor {
    COLUMNS
        .into_iter()
        .find(|c| c.field == field)
        .unwrap_or(ColumnDescriptor { field, sortable: false, hideable: true })
}

/// Fields visible by default.
pub const DEFAULT_VISIBLE: [Field; 3] = [Field::Year, Field::Author, Field::Tags];

/// Per-field visibility flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityState {
    flags: BTreeMap<Field, bool>,
}

impl VisibilityState {
    /// Only the given fields are visible.
    pub fn only(fields: &[Field]) -> Self {
        Self {
            flags: Field::ALL.into_iter().map(|f| (f, fields.contains(&f))).collect(),
        }
    }

    pub fn all_hidden() -> Self {
        Self::only(&[])
    }

    pub fn is_visible(&self, field: Field) -> bool {
        self.flags.get(&field).copied().unwrap_or(false)
    }

    /// Hidden state is ignored for columns that cannot be hidden.
    pub fn set(&mut self, field: Field, visible: bool) {
        if !visible && !column(field).hideable {
            return;
        }
        self.flags.insert(field, visible);
    }

    pub fn toggle(&mut self, field: Field) {
        let visible = self.is_visible(field);
        self.set(field, !visible);
    }

    /// Visible fields in column order.
    pub fn visible_fields(&self) -> Vec<Field> {
        COLUMNS
            .iter()
            .map(|c| c.field)
            .filter(|f| self.is_visible(*f))
            .collect()
    }

    pub fn nothing_visible(&self) -> bool {
        !self.flags.values().any(|v| *v)
    }
}

impl Default for VisibilityState {
    fn default() -> Self {
        Self::only(&DEFAULT_VISIBLE)
    }
}

/// What the table presentation should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableView {
    /// No column is visible. Informational, not an error.
    NothingVisible,
    /// Columns are visible but no record survived filtering.
    Empty { columns: Vec<Field> },
    /// Record indices in display order.
    Rows { columns: Vec<Field>, rows: Vec<usize> },
}

impl TableView {
    pub fn columns(&self) -> &[Field] {
        match self {
            TableView::NothingVisible => &[],
            TableView::Empty { columns } | TableView::Rows { columns, .. } => columns,
        }
    }

    pub fn rows(&self) -> &[usize] {
        match self {
            TableView::Rows { rows, .. } => rows,
            _ => &[],
        }
    }
}

/// Resolve the visible columns and order the filtered records.
pub fn build_table(
    records: &[EventRecord],
    filtered: &[usize],
    visibility: &VisibilityState,
    sort: &SortState,
) -> TableView {
    let columns = visibility.visible_fields();
    if columns.is_empty() {
        return TableView::NothingVisible;
    }
    if filtered.is_empty() {
        return TableView::Empty { columns };
    }
    let rows = sort_indices(records, filtered, sort);
    TableView::Rows { columns, rows }
}
