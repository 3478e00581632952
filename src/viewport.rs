//! Viewport manages the pan offset and zoom scale of the timeline.
//!
//! Panning is a drag state machine: pointer-down inside the timeline starts a
//! drag, pointer-up anywhere ends it, and every move while dragging recomputes
//! the offset from the drag baseline. The offset is clamped so the scaled
//! content can never be dragged fully out of view. Zoom is multiplicative and
//! bounded; it does not anchor on the cursor.

pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 2.0;
/// Scale factor applied when the wheel scrolls toward the viewer.
pub const ZOOM_OUT_FACTOR: f64 = 0.9;
/// Scale factor applied when the wheel scrolls away from the viewer.
pub const ZOOM_IN_FACTOR: f64 = 1.1;

/// Pan offset and zoom scale, applied as translate-then-scale from the
/// content's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// Horizontal pan in screen units; never positive.
    pub offset_x: f64,
    pub scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            scale: 1.0,
        }
    }
}

impl ViewTransform {
    /// Map a content x coordinate to a screen x coordinate.
    pub fn apply(&self, content_x: f64) -> f64 {
        self.offset_x + content_x * self.scale
    }

    /// Inverse of [`ViewTransform::apply`].
    pub fn invert(&self, screen_x: f64) -> f64 {
        (screen_x - self.offset_x) / self.scale
    }
}

/// Pan interaction state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    /// `baseline_x` is the pointer x minus the offset at drag start.
    Dragging { baseline_x: f64 },
}

/// View transform plus the drag state and extents it is clamped against.
#[derive(Debug, Clone)]
pub struct Viewport {
    transform: ViewTransform,
    drag: DragState,
    /// Unscaled width of the timeline content.
    content_width: f64,
    /// Width of the visible area.
    viewport_width: f64,
}

impl Viewport {
    pub fn new(content_width: f64, viewport_width: f64) -> Self {
        Self {
            transform: ViewTransform::default(),
            drag: DragState::Idle,
            content_width: content_width.max(0.0),
            viewport_width: viewport_width.max(0.0),
        }
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn content_width(&self) -> f64 {
        self.content_width
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    /// Update extents after a relayout or resize and re-clamp the offset.
    pub fn set_extent(&mut self, content_width: f64, viewport_width: f64) {
        self.content_width = content_width.max(0.0);
        self.viewport_width = viewport_width.max(0.0);
        self.transform.offset_x = self.clamp_offset(self.transform.offset_x);
    }

    /// How far the content may be dragged left; zero when it fits.
    pub fn max_pan(&self) -> f64 {
        (self.content_width * self.transform.scale - self.viewport_width).max(0.0)
    }

    fn clamp_offset(&self, candidate: f64) -> f64 {
        let max_pan = self.max_pan();
        if max_pan <= 0.0 || !candidate.is_finite() {
            return 0.0;
        }
        candidate.clamp(-max_pan, 0.0)
    }

    /// Idle -> Dragging. Ignored while already dragging.
    pub fn pointer_down(&mut self, pointer_x: f64) {
        if self.is_dragging() {
            return;
        }
        self.drag = DragState::Dragging {
            baseline_x: pointer_x - self.transform.offset_x,
        };
    }

    /// Dragging -> Idle, wherever the pointer is.
    pub fn pointer_up(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Pan while dragging; no-op when idle.
    pub fn pointer_move(&mut self, pointer_x: f64) {
        if let DragState::Dragging { baseline_x } = self.drag {
            self.transform.offset_x = self.clamp_offset(pointer_x - baseline_x);
        }
    }

    /// Positive `delta_y` scrolls toward the viewer and zooms out.
    pub fn wheel(&mut self, delta_y: f64) {
        if delta_y > 0.0 {
            self.zoom_by(ZOOM_OUT_FACTOR);
        } else {
            self.zoom_by(ZOOM_IN_FACTOR);
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom_by(ZOOM_IN_FACTOR);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_by(ZOOM_OUT_FACTOR);
    }

    fn zoom_by(&mut self, factor: f64) {
        self.transform.scale = (self.transform.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        self.transform.offset_x = self.clamp_offset(self.transform.offset_x);
    }

    /// Keyboard panning by a screen distance; positive moves content right.
    pub fn pan_by(&mut self, delta: f64) {
        self.transform.offset_x = self.clamp_offset(self.transform.offset_x + delta);
    }

    pub fn reset(&mut self) {
        self.transform = ViewTransform::default();
        self.drag = DragState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_initial_state() {
        let vp = Viewport::new(500.0, 100.0);
        assert_eq!(vp.transform(), ViewTransform::default());
        assert_eq!(vp.drag_state(), DragState::Idle);
    }

    #[test]
    fn test_drag_clamped_to_max_pan() {
        // content * scale - viewport = 30
        let mut vp = Viewport::new(130.0, 100.0);
        vp.pointer_down(200.0);
        vp.pointer_move(150.0);
        assert_eq!(vp.transform().offset_x, -30.0);
    }

    #[test]
    fn test_drag_cannot_go_positive() {
        let mut vp = Viewport::new(500.0, 100.0);
        vp.pointer_down(10.0);
        vp.pointer_move(80.0);
        assert_eq!(vp.transform().offset_x, 0.0);
    }

    #[test]
    fn test_content_fits_forces_zero() {
        let mut vp = Viewport::new(80.0, 100.0);
        vp.pointer_down(50.0);
        vp.pointer_move(0.0);
        assert_eq!(vp.transform().offset_x, 0.0);
    }

    #[test]
    fn test_move_when_idle_is_ignored() {
        let mut vp = Viewport::new(500.0, 100.0);
        vp.pointer_move(-100.0);
        assert_eq!(vp.transform().offset_x, 0.0);
    }

    #[test]
    fn test_pointer_up_ends_drag() {
        let mut vp = Viewport::new(500.0, 100.0);
        vp.pointer_down(100.0);
        assert!(vp.is_dragging());
        vp.pointer_move(60.0);
        vp.pointer_up();
        assert!(!vp.is_dragging());
        vp.pointer_move(0.0);
        assert_eq!(vp.transform().offset_x, -40.0);
    }

    #[test]
    fn test_second_drag_continues_from_offset() {
        let mut vp = Viewport::new(500.0, 100.0);
        vp.pointer_down(100.0);
        vp.pointer_move(60.0);
        vp.pointer_up();
        vp.pointer_down(10.0);
        vp.pointer_move(0.0);
        assert_eq!(vp.transform().offset_x, -50.0);
    }

    #[test]
    fn test_wheel_direction_and_bounds() {
        let mut vp = Viewport::new(500.0, 100.0);
        vp.wheel(1.0);
        assert!((vp.transform().scale - 0.9).abs() < 1e-12);
        vp.wheel(-1.0);
        assert!((vp.transform().scale - 0.99).abs() < 1e-12);
        for _ in 0..50 {
            vp.wheel(1.0);
        }
        assert_eq!(vp.transform().scale, MIN_SCALE);
        for _ in 0..50 {
            vp.wheel(-1.0);
        }
        assert_eq!(vp.transform().scale, MAX_SCALE);
    }

    #[test]
    fn test_zoom_out_reclamps_offset() {
        let mut vp = Viewport::new(200.0, 100.0);
        vp.pointer_down(100.0);
        vp.pointer_move(0.0);
        vp.pointer_up();
        assert_eq!(vp.transform().offset_x, -100.0);
        for _ in 0..10 {
            vp.zoom_out();
        }
        // 200 * 0.5 fits in 100
        assert_eq!(vp.transform().offset_x, 0.0);
    }

    #[test]
    fn test_apply_translate_then_scale() {
        let t = ViewTransform {
            offset_x: -20.0,
            scale: 2.0,
        };
        assert_eq!(t.apply(10.0), 0.0);
        assert_eq!(t.invert(0.0), 10.0);
    }

    #[test]
    fn test_set_extent_reclamps() {
        let mut vp = Viewport::new(500.0, 100.0);
        vp.pan_by(-300.0);
        assert_eq!(vp.transform().offset_x, -300.0);
        vp.set_extent(150.0, 100.0);
        assert_eq!(vp.transform().offset_x, -50.0);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Down(f64),
        Move(f64),
        Up,
        Wheel(f64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (-1000.0..1000.0f64).prop_map(Op::Down),
            (-1000.0..1000.0f64).prop_map(Op::Move),
            Just(Op::Up),
            (-5.0..5.0f64).prop_map(Op::Wheel),
        ]
    }

    proptest! {
        #[test]
        fn prop_transform_stays_bounded(
            content in 0.0..2000.0f64,
            viewport in 1.0..800.0f64,
            ops in proptest::collection::vec(op(), 0..60),
        ) {
            let mut vp = Viewport::new(content, viewport);
            for op in ops {
                match op {
                    Op::Down(x) => vp.pointer_down(x),
                    Op::Move(x) => vp.pointer_move(x),
                    Op::Up => vp.pointer_up(),
                    Op::Wheel(d) => vp.wheel(d),
                }
                let t = vp.transform();
                prop_assert!((MIN_SCALE..=MAX_SCALE).contains(&t.scale));
                prop_assert!(t.offset_x <= 0.0);
                prop_assert!(t.offset_x >= -vp.max_pan());
                if content * t.scale <= viewport {
                    prop_assert_eq!(t.offset_x, 0.0);
                }
            }
        }
    }
}
