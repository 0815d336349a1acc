//! Input model: tools, modifier keys, normalized pointer events, and the
//! gesture state machine's working memory.
//!
//! `PointerInput` is the host-facing event struct, built once per raw
//! platform event. The engine augments it with world coordinates into a
//! `PointerEvent` before dispatching. `Gesture` is the select tool's
//! entire working state for one interaction: a single tagged union, so
//! returning to [`Gesture::Idle`] provably clears everything.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::{Camera, Point};
use crate::doc::{Shape, ShapeId};
use crate::hit::{EdgeEnd, ResizeAnchor};

/// Which tool is currently active.
///
/// Only [`Tool::Select`] is interpreted by this crate; the other variants
/// exist so the host can park the engine while one of its own drawing or
/// panning tools owns the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Pan the canvas by dragging.
    Pan,
    /// Draw a rectangle.
    Rect,
    /// Draw an ellipse.
    Ellipse,
    /// Create a text block.
    Text,
    /// Draw a straight line segment.
    Line,
    /// Draw a connector between shapes.
    Connector,
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// The platform "command" chord: ctrl on most systems, meta on macOS.
    #[must_use]
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key, named as the platform reports it (e.g. `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// A pointer event as the host delivers it: screen coordinates plus the
/// full input snapshot. `time_ms` is any monotonic millisecond clock;
/// it is only compared against itself (double-click detection).
#[derive(Debug, Clone, Copy)]
pub struct PointerInput {
    pub screen: Point,
    pub button: Button,
    pub modifiers: Modifiers,
    pub pressure: f64,
    pub time_ms: f64,
}

/// A pointer event normalized into both coordinate spaces.
#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    pub screen: Point,
    pub world: Point,
    pub button: Button,
    pub modifiers: Modifiers,
    pub pressure: f64,
    pub time_ms: f64,
}

impl PointerEvent {
    /// Normalize a host event against the current camera.
    #[must_use]
    pub fn from_input(input: PointerInput, camera: &Camera) -> Self {
        Self {
            screen: input.screen,
            world: camera.screen_to_world(input.screen),
            button: input.button,
            modifiers: input.modifiers,
            pressure: input.pressure,
            time_ms: input.time_ms,
        }
    }
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
}

/// Pre-drag position snapshot for one translated shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranslateOrigin {
    pub x: f64,
    pub y: f64,
    /// Second endpoint, for two-point shapes.
    pub x2: Option<f64>,
    pub y2: Option<f64>,
}

/// The select tool's gesture state machine.
///
/// Each active variant carries exactly the context needed to compute
/// incremental geometry and to revert it on cancel. All variants are
/// dropped wholesale on gesture completion, so no field can leak into the
/// next interaction.
#[derive(Debug, Clone)]
pub enum Gesture {
    /// No gesture in progress; waiting for the next pointer-down.
    Idle,
    /// Pointer is down but has not yet moved past the drag threshold;
    /// this press may still resolve into a click.
    Pending {
        /// Screen position of the pointer-down, for the drag threshold.
        start_screen: Point,
        /// World position of the pointer-down; the translate anchor.
        start_world: Point,
        /// The shape under the pointer at press time, if any.
        hit: Option<ShapeId>,
        /// Whether that shape was already selected when pressed. Selection
        /// changes for it are deferred to pointer-up so a drag can start
        /// without destroying a multi-selection.
        hit_was_selected: bool,
    },
    /// Dragging the current selection across the canvas.
    Translating {
        /// World position of the pointer-down; deltas are measured from here.
        start_world: Point,
        /// Pre-drag snapshots in z-order; the first entry drives group snapping.
        origins: Vec<(ShapeId, TranslateOrigin)>,
    },
    /// Dragging out a selection rectangle on empty canvas.
    Marquee {
        /// The corner where the drag started, in world coordinates.
        start_world: Point,
        /// The live opposite corner, updated every move.
        current_world: Point,
    },
    /// Dragging one of a shape's eight resize handles.
    Resizing {
        /// Id of the shape being resized.
        id: ShapeId,
        /// Which handle is being dragged.
        anchor: ResizeAnchor,
        /// Full snapshot of the shape at gesture start, for math and revert.
        original: Shape,
        /// World position of the fixed opposite handle; it must not move.
        anchor_world: Point,
    },
    /// Dragging the rotate handle.
    Rotating {
        /// Id of the shape being rotated.
        id: ShapeId,
        /// The rotation pivot: the shape center at gesture start.
        pivot: Point,
        /// Pointer angle around the pivot at gesture start.
        start_angle: f64,
        /// Shape rotation at gesture start.
        original_rotation: f64,
    },
    /// Dragging one endpoint of a line or connector.
    DraggingEndpoint {
        /// Id of the two-point shape being edited.
        id: ShapeId,
        /// Which endpoint is being dragged.
        end: EdgeEnd,
        /// Full snapshot at gesture start, for revert.
        original: Shape,
    },
}

impl Default for Gesture {
    fn default() -> Self {
        Self::Idle
    }
}

impl Gesture {
    /// Whether any gesture is active (anything but `Idle`).
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}
