//! Shared numeric constants for the interaction core.

// ── Camera ──────────────────────────────────────────────────────

/// Minimum zoom factor.
pub const MIN_ZOOM: f64 = 0.1;

/// Maximum zoom factor.
pub const MAX_ZOOM: f64 = 10.0;

/// Zoom difference below which a smooth-zoom animation snaps to its target.
pub const ZOOM_SNAP_EPSILON: f64 = 1e-3;

/// Wheel-delta to zoom-factor exponent scale for ctrl+wheel zooming.
pub const WHEEL_ZOOM_SENSITIVITY: f64 = 0.002;

/// Default screen-pixel padding around content for zoom-to-fit.
pub const ZOOM_FIT_PADDING_PX: f64 = 50.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Side length of a resize/rotate handle's hit square, in screen pixels.
pub const HANDLE_SIZE_PX: f64 = 8.0;

/// Distance from the bounding box edge to the rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 24.0;

/// Screen-space hit slop for thin segments, in pixels.
pub const LINE_HIT_TOLERANCE_PX: f64 = 6.0;

// ── Gestures ────────────────────────────────────────────────────

/// Screen-space distance a pointer must travel before a press becomes a drag.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

/// Maximum interval between two clicks that counts as a double-click.
pub const DOUBLE_CLICK_MS: f64 = 400.0;

/// Maximum screen-space distance between two clicks that counts as a double-click.
pub const DOUBLE_CLICK_DIST_PX: f64 = 5.0;

/// Rotation snap increment when shift is held (15°).
pub const ROTATION_SNAP_STEP: f64 = std::f64::consts::PI / 12.0;

/// Screen-pixel radius within which a dragged connector endpoint attaches to an anchor.
pub const ANCHOR_SNAP_PX: f64 = 12.0;

// ── Geometry floors ─────────────────────────────────────────────

/// Minimum width/height for rectangles and ellipses, in world units.
pub const MIN_SHAPE_SIZE: f64 = 5.0;

/// Minimum width for text shapes, in world units.
pub const MIN_TEXT_WIDTH: f64 = 20.0;

// ── Snapping ────────────────────────────────────────────────────

/// Grid spacing in world units.
pub const GRID_SPACING: f64 = 20.0;

/// Maximum world-unit distance at which a snap candidate engages.
pub const SNAP_THRESHOLD: f64 = 8.0;

// ── Spatial index ───────────────────────────────────────────────

/// Items a quadtree node holds before subdividing.
pub const QUADTREE_NODE_CAPACITY: usize = 8;

/// Maximum quadtree depth; leaves at this depth hold overflow without splitting.
pub const QUADTREE_MAX_DEPTH: usize = 8;
