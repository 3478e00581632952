use crate::record::Field;
use crate::timeline::NodeBox;
use crate::year_range::Bound;

/// Discrete changes to a browsing session.
/// Front-ends translate input into these instead of mutating state directly.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    // Filter criteria
    SetFreeText(String),
    ToggleFreeTextVisibleOnly,
    EditYear { bound: Bound, text: String },
    CorrectYearRange, // apply the pending correction immediately
    ToggleTag(String),
    ClearTags,

    // Table shape
    SetColumnVisible { field: Field, visible: bool },
    ToggleColumn(Field),
    ToggleSort { field: Field, multi: bool },
    ClearSort,

    // Timeline view
    PointerDown(f64),
    PointerMove(f64),
    PointerUp,
    Wheel(f64), // positive zooms out
    PanBy(f64),
    ZoomIn,
    ZoomOut,
    ResetView,
    ResizeViewport(f64),
    HoverAt(Option<f64>), // screen x, None when the pointer leaves
    HoverNode(Option<usize>),
    NodeMeasured { index: usize, marker: NodeBox },
}
