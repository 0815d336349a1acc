//! Top-level engine: owns the collaborators and routes normalized events.
//!
//! `EngineCore` is pure Rust with no platform types, so the whole
//! interaction loop is testable headlessly. The host feeds it pointer,
//! wheel, and key events; it returns [`Action`]s describing every side
//! effect the host must mirror (store mutations to persist, cursor
//! changes, and a coalesced render request).

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use crate::camera::{Camera, Point, Transform};
use crate::consts::{WHEEL_ZOOM_SENSITIVITY, ZOOM_FIT_PADDING_PX};
use crate::doc::{Bounds, PartialShape, Shape, ShapeAnchor, ShapeId, ShapeStore};
use crate::index::SpatialIndex;
use crate::input::{Key, Modifiers, PointerEvent, PointerInput, Tool, UiState, WheelDelta};
use crate::select::{SelectTool, SnapGuides, ToolContext};
use crate::selection::SelectionState;

/// Side effects returned from event handlers for the host to process.
#[derive(Debug, Clone)]
pub enum Action {
    /// A shape's fields changed; mirror them to the outer store.
    ShapeUpdated { id: ShapeId, fields: PartialShape },
    /// A shape was deleted.
    ShapeDeleted { id: ShapeId },
    /// The user double-clicked a labelable shape; open the text editor.
    EditTextRequested { id: ShapeId, content: String },
    /// Change the pointer cursor to this CSS cursor name.
    SetCursor(String),
    /// Something visible changed; schedule a redraw. Emitted at most once
    /// per event, so redraws within one tick coalesce naturally.
    RenderNeeded,
}

/// Core engine state: document, camera, index, selection, and the tool.
pub struct EngineCore {
    pub doc: ShapeStore,
    pub camera: Camera,
    pub index: SpatialIndex,
    pub selection: SelectionState,
    pub ui: UiState,
    pub select_tool: SelectTool,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            doc: ShapeStore::new(),
            camera: Camera::default(),
            index: SpatialIndex::new(),
            selection: SelectionState::new(),
            ui: UiState::default(),
            select_tool: SelectTool::new(),
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Update viewport dimensions.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.camera.set_viewport(width, height);
    }

    // ── Data inputs ─────────────────────────────────────────────

    /// Hydrate the document from a host snapshot and rebuild the index.
    pub fn load_snapshot(&mut self, shapes: Vec<Shape>) {
        self.doc.load_snapshot(shapes);
        self.index.rebuild(self.doc.sorted_shapes());
        self.selection.retain(|id| self.doc.contains(id));
        tracing::debug!(shapes = self.doc.len(), indexed = self.index.len(), "snapshot loaded");
    }

    /// Apply a host broadcast: shape created.
    pub fn apply_create(&mut self, shape: Shape) {
        self.index.insert(&shape);
        self.doc.add(shape);
    }

    /// Apply a host broadcast: shape updated.
    pub fn apply_update(&mut self, id: &ShapeId, fields: &PartialShape) {
        if self.doc.apply_partial(id, fields) {
            if let Some(shape) = self.doc.get(id) {
                self.index.update(shape);
            }
        }
    }

    /// Apply a host broadcast: shape deleted.
    pub fn apply_delete(&mut self, id: &ShapeId) {
        self.doc.remove(id);
        self.index.remove(id);
        self.selection.remove(id);
    }

    // ── Tool ────────────────────────────────────────────────────

    /// Switch the active tool. Leaving the select tool mid-gesture cancels
    /// and reverts the gesture.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.ui.tool == Tool::Select && tool != Tool::Select {
            let mut ctx = ToolContext {
                doc: &mut self.doc,
                selection: &mut self.selection,
                index: &mut self.index,
                camera: &self.camera,
            };
            actions = self.select_tool.cancel(&mut ctx);
        }
        self.ui.tool = tool;
        actions
    }

    // ── Input events ────────────────────────────────────────────

    pub fn on_pointer_down(&mut self, input: PointerInput) -> Vec<Action> {
        if self.ui.tool != Tool::Select {
            return Vec::new();
        }
        let ev = PointerEvent::from_input(input, &self.camera);
        let mut ctx = ToolContext {
            doc: &mut self.doc,
            selection: &mut self.selection,
            index: &mut self.index,
            camera: &self.camera,
        };
        self.select_tool.on_pointer_down(&mut ctx, &ev)
    }

    pub fn on_pointer_move(&mut self, input: PointerInput) -> Vec<Action> {
        if self.ui.tool != Tool::Select {
            return Vec::new();
        }
        let ev = PointerEvent::from_input(input, &self.camera);
        let mut ctx = ToolContext {
            doc: &mut self.doc,
            selection: &mut self.selection,
            index: &mut self.index,
            camera: &self.camera,
        };
        self.select_tool.on_pointer_move(&mut ctx, &ev)
    }

    pub fn on_pointer_up(&mut self, input: PointerInput) -> Vec<Action> {
        if self.ui.tool != Tool::Select {
            return Vec::new();
        }
        let ev = PointerEvent::from_input(input, &self.camera);
        let mut ctx = ToolContext {
            doc: &mut self.doc,
            selection: &mut self.selection,
            index: &mut self.index,
            camera: &self.camera,
        };
        self.select_tool.on_pointer_up(&mut ctx, &ev)
    }

    /// Wheel input: plain scroll pans; ctrl/cmd+scroll zooms at the cursor.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.command() {
            let factor = (-delta.dy * WHEEL_ZOOM_SENSITIVITY).exp();
            self.camera.zoom_at(screen_pt, factor);
        } else {
            self.camera.pan(Point::new(-delta.dx, -delta.dy));
        }
        vec![Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if self.ui.tool != Tool::Select {
            return Vec::new();
        }
        let mut ctx = ToolContext {
            doc: &mut self.doc,
            selection: &mut self.selection,
            index: &mut self.index,
            camera: &self.camera,
        };
        self.select_tool.on_key_down(&mut ctx, key, modifiers)
    }

    /// No key state is latched; modifiers arrive fresh on every event.
    pub fn on_key_up(&mut self, _key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        Vec::new()
    }

    // ── Camera conveniences ─────────────────────────────────────

    /// Fit the whole document into the viewport with default padding.
    pub fn zoom_to_fit_content(&mut self) -> Vec<Action> {
        let mut content: Option<Bounds> = None;
        for shape in self.doc.sorted_shapes() {
            if let Some(b) = shape.bounds() {
                content = Some(content.map_or(b, |acc| acc.union(&b)));
            }
        }
        let Some(bounds) = content else {
            return Vec::new();
        };
        self.camera.zoom_to_fit(&bounds, ZOOM_FIT_PADDING_PX);
        vec![Action::RenderNeeded]
    }

    /// Advance the smooth-zoom animation one frame. Returns a render
    /// request while the zoom is still moving.
    pub fn update_smooth_zoom(&mut self, screen_pt: Point, smoothing: f64) -> Vec<Action> {
        let before = self.camera.zoom;
        let animating = self.camera.update_zoom(screen_pt, smoothing);
        if animating || self.camera.zoom != before {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    // ── Renderer-facing queries ─────────────────────────────────

    /// The world→screen matrix for the renderer.
    #[must_use]
    pub fn transform(&self) -> Transform {
        self.camera.transform()
    }

    /// The live marquee rectangle, when one is being dragged.
    #[must_use]
    pub fn marquee_rect(&self) -> Option<Bounds> {
        self.select_tool.marquee_rect()
    }

    /// Engaged snap guide lines for the overlay.
    #[must_use]
    pub fn snap_guides(&self) -> SnapGuides {
        self.select_tool.snap_guides()
    }

    /// The anchor a dragged connector endpoint is snapped to, for the
    /// overlay indicator.
    #[must_use]
    pub fn active_anchor(&self) -> Option<&ShapeAnchor> {
        self.select_tool.active_anchor()
    }

    /// Look up a shape by id.
    #[must_use]
    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.doc.get(id)
    }
}
