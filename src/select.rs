//! The select tool: a gesture state machine over pointer and key events.
//!
//! Every interaction follows the same arc: pointer-down decides what the
//! gesture *could* become, pointer-move past the drag threshold commits it
//! to one of the drag states, and pointer-up (or Escape) ends it. All
//! working memory lives in one [`Gesture`] value, taken with
//! `std::mem::take` on completion, so nothing can leak between gestures.
//!
//! Geometry changes are pushed to the store on every move tick so the
//! renderer tracks the drag live; the spatial index is reconciled once on
//! release. Escape reverts the applied geometry from the gesture's own
//! snapshots and re-syncs the index.

#[cfg(test)]
#[path = "select_test.rs"]
mod select_test;

use std::collections::HashSet;

use crate::camera::{Camera, Point};
use crate::consts::{
    ANCHOR_SNAP_PX, DOUBLE_CLICK_DIST_PX, DOUBLE_CLICK_MS, DRAG_THRESHOLD_PX, GRID_SPACING,
    HANDLE_SIZE_PX, LINE_HIT_TOLERANCE_PX, MIN_SHAPE_SIZE, MIN_TEXT_WIDTH,
    ROTATE_HANDLE_OFFSET_PX, ROTATION_SNAP_STEP, SNAP_THRESHOLD,
};
use crate::doc::{
    Attachment, Bounds, PartialShape, Shape, ShapeAnchor, ShapeId, ShapeKind, ShapeStore,
};
use crate::engine::Action;
use crate::hit::{self, EdgeEnd, Hit, HitPart, ResizeAnchor};
use crate::index::SpatialIndex;
use crate::input::{Button, Gesture, Key, Modifiers, PointerEvent, TranslateOrigin};
use crate::selection::SelectionState;
use crate::snap;

/// Mutable views of the collaborators the select tool orchestrates.
///
/// Built fresh by the engine for each event dispatch; the tool never holds
/// onto any of these across events.
pub struct ToolContext<'a> {
    pub doc: &'a mut ShapeStore,
    pub selection: &'a mut SelectionState,
    pub index: &'a mut SpatialIndex,
    pub camera: &'a Camera,
}

/// Guide lines for the renderer while a snap is engaged.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SnapGuides {
    /// Vertical guide at this world x, if the x axis is snapped.
    pub x: Option<f64>,
    /// Horizontal guide at this world y, if the y axis is snapped.
    pub y: Option<f64>,
}

/// The last completed click, kept for double-click detection.
#[derive(Debug, Clone, Copy)]
struct ClickStamp {
    id: ShapeId,
    screen: Point,
    time_ms: f64,
}

/// Proposed post-drag geometry for one translated shape.
struct Proposal {
    id: ShapeId,
    x: f64,
    y: f64,
    x2: Option<f64>,
    y2: Option<f64>,
}

/// The select tool's full state between events.
pub struct SelectTool {
    gesture: Gesture,
    snap_enabled: bool,
    guides: SnapGuides,
    active_anchor: Option<ShapeAnchor>,
    last_click: Option<ClickStamp>,
    cursor: &'static str,
}

impl Default for SelectTool {
    fn default() -> Self {
        Self {
            gesture: Gesture::Idle,
            snap_enabled: true,
            guides: SnapGuides::default(),
            active_anchor: None,
            last_click: None,
            cursor: "default",
        }
    }
}

impl SelectTool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current gesture state.
    #[must_use]
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Enable or disable grid/shape snapping during drags.
    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.snap_enabled = enabled;
    }

    #[must_use]
    pub fn snap_enabled(&self) -> bool {
        self.snap_enabled
    }

    /// The live marquee rectangle, in world coordinates, when marqueeing.
    #[must_use]
    pub fn marquee_rect(&self) -> Option<Bounds> {
        match &self.gesture {
            Gesture::Marquee { start_world, current_world } => {
                Some(Bounds::from_points(*start_world, *current_world))
            }
            _ => None,
        }
    }

    /// Engaged snap guide lines, for the overlay.
    #[must_use]
    pub fn snap_guides(&self) -> SnapGuides {
        self.guides
    }

    /// The anchor a dragged connector endpoint is currently snapped to.
    #[must_use]
    pub fn active_anchor(&self) -> Option<&ShapeAnchor> {
        self.active_anchor.as_ref()
    }

    // ── Pointer events ──────────────────────────────────────────

    pub fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>, ev: &PointerEvent) -> Vec<Action> {
        if ev.button != Button::Primary {
            return Vec::new();
        }
        // A handle grab on the single selected shape bypasses Pending.
        if let Some(selected) = ctx.selection.single() {
            if let Some(shape) = ctx.doc.get(&selected) {
                let handle_size = ctx.camera.screen_dist_to_world(HANDLE_SIZE_PX);
                let rotate_offset = ctx.camera.screen_dist_to_world(ROTATE_HANDLE_OFFSET_PX);
                if let Some(grab) =
                    hit::hit_test_handles(ev.world, &[shape], handle_size, rotate_offset)
                {
                    return self.begin_handle_gesture(ctx, grab, ev);
                }
            }
        }
        let tolerance = ctx.camera.screen_dist_to_world(LINE_HIT_TOLERANCE_PX);
        let hit = hit::hit_test_point(ev.world, ctx.doc, ctx.index, tolerance);
        let hit_was_selected = hit.is_some_and(|id| ctx.selection.is_selected(&id));
        if let Some(id) = hit {
            if !hit_was_selected {
                if ev.modifiers.shift {
                    ctx.selection.add(id);
                } else {
                    ctx.selection.select_only(id);
                }
            }
        }
        self.gesture = Gesture::Pending {
            start_screen: ev.screen,
            start_world: ev.world,
            hit,
            hit_was_selected,
        };
        vec![Action::RenderNeeded]
    }

    pub fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>, ev: &PointerEvent) -> Vec<Action> {
        match &self.gesture {
            Gesture::Idle => self.hover_feedback(ctx, ev),
            Gesture::Pending { start_screen, start_world, hit, .. } => {
                if ev.screen.distance_to(*start_screen) <= DRAG_THRESHOLD_PX {
                    return Vec::new();
                }
                let start_world = *start_world;
                let hit = *hit;
                if hit.is_some() {
                    let origins = collect_translate_origins(ctx.doc, ctx.selection);
                    self.gesture = Gesture::Translating { start_world, origins };
                } else {
                    self.gesture =
                        Gesture::Marquee { start_world, current_world: ev.world };
                }
                // Apply the move that crossed the threshold immediately.
                self.on_pointer_move(ctx, ev)
            }
            Gesture::Translating { .. } => self.continue_translate(ctx, ev),
            Gesture::Marquee { .. } => {
                if let Gesture::Marquee { current_world, .. } = &mut self.gesture {
                    *current_world = ev.world;
                }
                vec![Action::RenderNeeded]
            }
            Gesture::Resizing { .. } => self.continue_resize(ctx, ev),
            Gesture::Rotating { .. } => self.continue_rotate(ctx, ev),
            Gesture::DraggingEndpoint { .. } => self.continue_endpoint(ctx, ev),
        }
    }

    pub fn on_pointer_up(&mut self, ctx: &mut ToolContext<'_>, ev: &PointerEvent) -> Vec<Action> {
        if ev.button != Button::Primary {
            return Vec::new();
        }
        let gesture = std::mem::take(&mut self.gesture);
        match gesture {
            Gesture::Idle => Vec::new(),
            Gesture::Pending { hit, hit_was_selected, .. } => {
                self.finish_click(ctx, ev, hit, hit_was_selected)
            }
            Gesture::Translating { origins, .. } => {
                for (id, _) in &origins {
                    if let Some(shape) = ctx.doc.get(id) {
                        ctx.index.update(shape);
                    }
                }
                self.guides = SnapGuides::default();
                vec![Action::RenderNeeded]
            }
            Gesture::Marquee { start_world, current_world } => {
                let rect = Bounds::from_points(start_world, current_world);
                let ids = hit::hit_test_rect(&rect, ctx.doc, ctx.index);
                ctx.selection.select_many(ids);
                vec![Action::RenderNeeded]
            }
            Gesture::Resizing { id, .. }
            | Gesture::Rotating { id, .. }
            | Gesture::DraggingEndpoint { id, .. } => {
                if let Some(shape) = ctx.doc.get(&id) {
                    ctx.index.update(shape);
                }
                self.active_anchor = None;
                vec![Action::RenderNeeded]
            }
        }
    }

    // ── Keyboard ────────────────────────────────────────────────

    pub fn on_key_down(
        &mut self,
        ctx: &mut ToolContext<'_>,
        key: &Key,
        modifiers: Modifiers,
    ) -> Vec<Action> {
        match key.0.as_str() {
            "Escape" => self.cancel(ctx),
            "Delete" | "Backspace" => self.delete_selection(ctx),
            "a" | "A" if modifiers.command() => {
                ctx.selection.select_many(ctx.doc.order().iter().copied());
                vec![Action::RenderNeeded]
            }
            _ => Vec::new(),
        }
    }

    /// Abort the in-progress gesture, reverting any geometry it already
    /// pushed to the store. Invoked on Escape and on tool deactivation.
    pub fn cancel(&mut self, ctx: &mut ToolContext<'_>) -> Vec<Action> {
        let gesture = std::mem::take(&mut self.gesture);
        self.guides = SnapGuides::default();
        self.active_anchor = None;
        match gesture {
            Gesture::Idle | Gesture::Pending { .. } => Vec::new(),
            Gesture::Marquee { .. } => vec![Action::RenderNeeded],
            Gesture::Translating { origins, .. } => {
                tracing::debug!(shapes = origins.len(), "translate cancelled, reverting");
                let mut actions = Vec::new();
                for (id, origin) in origins {
                    let fields = PartialShape {
                        x: Some(origin.x),
                        y: Some(origin.y),
                        x2: origin.x2,
                        y2: origin.y2,
                        ..PartialShape::default()
                    };
                    if ctx.doc.apply_partial(&id, &fields) {
                        if let Some(shape) = ctx.doc.get(&id) {
                            ctx.index.update(shape);
                        }
                        actions.push(Action::ShapeUpdated { id, fields });
                    }
                }
                actions.push(Action::RenderNeeded);
                actions
            }
            Gesture::Resizing { id, original, .. }
            | Gesture::DraggingEndpoint { id, original, .. } => {
                tracing::debug!(id = %id, "resize cancelled, reverting");
                self.revert_one(ctx, id, PartialShape::geometry_of(&original))
            }
            Gesture::Rotating { id, original_rotation, .. } => {
                tracing::debug!(id = %id, "rotate cancelled, reverting");
                let fields =
                    PartialShape { rotation: Some(original_rotation), ..PartialShape::default() };
                self.revert_one(ctx, id, fields)
            }
        }
    }

    // ── Gesture bodies ──────────────────────────────────────────

    fn begin_handle_gesture(
        &mut self,
        ctx: &mut ToolContext<'_>,
        grab: Hit,
        ev: &PointerEvent,
    ) -> Vec<Action> {
        let Some(shape) = ctx.doc.get(&grab.shape_id) else {
            return Vec::new();
        };
        match grab.part {
            HitPart::ResizeHandle(anchor) => {
                let anchor_world = opposite_handle_world(shape, anchor);
                self.gesture = Gesture::Resizing {
                    id: shape.id,
                    anchor,
                    original: shape.clone(),
                    anchor_world,
                };
            }
            HitPart::RotateHandle => {
                let pivot = shape.center();
                self.gesture = Gesture::Rotating {
                    id: shape.id,
                    pivot,
                    start_angle: (ev.world.y - pivot.y).atan2(ev.world.x - pivot.x),
                    original_rotation: shape.rotation,
                };
            }
            HitPart::EdgeEndpoint(end) => {
                self.gesture =
                    Gesture::DraggingEndpoint { id: shape.id, end, original: shape.clone() };
            }
            HitPart::Body => {}
        }
        vec![Action::RenderNeeded]
    }

    fn continue_translate(&mut self, ctx: &mut ToolContext<'_>, ev: &PointerEvent) -> Vec<Action> {
        let (start_world, origins) = match &self.gesture {
            Gesture::Translating { start_world, origins } => (*start_world, origins.clone()),
            _ => return Vec::new(),
        };
        let delta = Point::new(ev.world.x - start_world.x, ev.world.y - start_world.y);
        let mut proposals: Vec<Proposal> = origins
            .iter()
            .map(|(id, origin)| Proposal {
                id: *id,
                x: origin.x + delta.x,
                y: origin.y + delta.y,
                x2: origin.x2.map(|v| v + delta.x),
                y2: origin.y2.map(|v| v + delta.y),
            })
            .collect();

        let mut guides = SnapGuides::default();
        if self.snap_enabled {
            let moving: HashSet<ShapeId> = proposals.iter().map(|p| p.id).collect();
            let mut union: Option<Bounds> = None;
            let mut first_center: Option<Point> = None;
            for proposal in &proposals {
                let Some(shape) = ctx.doc.get(&proposal.id) else {
                    continue;
                };
                let ghost = proposal.applied_to(shape);
                if let Some(b) = ghost.bounds() {
                    union = Some(union.map_or(b, |u| u.union(&b)));
                    if first_center.is_none() {
                        first_center = Some(ghost.center());
                    }
                }
            }
            if let (Some(union), Some(first_center)) = (union, first_center) {
                let result = snap::snap_bounds(
                    &union,
                    first_center,
                    ctx.doc,
                    GRID_SPACING,
                    SNAP_THRESHOLD,
                    &moving,
                );
                let offset = Point::new(
                    result.position.x - first_center.x,
                    result.position.y - first_center.y,
                );
                for proposal in &mut proposals {
                    proposal.shift(offset);
                }
                guides = SnapGuides { x: result.line_x, y: result.line_y };
            }
        }

        let mut actions = Vec::new();
        for proposal in proposals {
            let fields = PartialShape {
                x: Some(proposal.x),
                y: Some(proposal.y),
                x2: proposal.x2,
                y2: proposal.y2,
                ..PartialShape::default()
            };
            if ctx.doc.apply_partial(&proposal.id, &fields) {
                actions.push(Action::ShapeUpdated { id: proposal.id, fields });
            }
        }
        self.guides = guides;
        actions.push(Action::RenderNeeded);
        actions
    }

    fn continue_resize(&mut self, ctx: &mut ToolContext<'_>, ev: &PointerEvent) -> Vec<Action> {
        let (id, anchor, original, anchor_world) = match &self.gesture {
            Gesture::Resizing { id, anchor, original, anchor_world } => {
                (*id, *anchor, original.clone(), *anchor_world)
            }
            _ => return Vec::new(),
        };
        let Some(fields) =
            resize_box(&original, anchor, anchor_world, ev.world, ev.modifiers.shift)
        else {
            return Vec::new();
        };
        if !ctx.doc.apply_partial(&id, &fields) {
            tracing::debug!(id = %id, "resize target vanished, aborting gesture");
            self.gesture = Gesture::Idle;
            return Vec::new();
        }
        vec![Action::ShapeUpdated { id, fields }, Action::RenderNeeded]
    }

    fn continue_rotate(&mut self, ctx: &mut ToolContext<'_>, ev: &PointerEvent) -> Vec<Action> {
        let (id, pivot, start_angle, original_rotation) = match &self.gesture {
            Gesture::Rotating { id, pivot, start_angle, original_rotation } => {
                (*id, *pivot, *start_angle, *original_rotation)
            }
            _ => return Vec::new(),
        };
        let angle = (ev.world.y - pivot.y).atan2(ev.world.x - pivot.x);
        let mut rotation = original_rotation + (angle - start_angle);
        if ev.modifiers.shift {
            rotation = (rotation / ROTATION_SNAP_STEP).round() * ROTATION_SNAP_STEP;
        }
        let fields = PartialShape { rotation: Some(rotation), ..PartialShape::default() };
        if !ctx.doc.apply_partial(&id, &fields) {
            tracing::debug!(id = %id, "rotate target vanished, aborting gesture");
            self.gesture = Gesture::Idle;
            return Vec::new();
        }
        vec![Action::ShapeUpdated { id, fields }, Action::RenderNeeded]
    }

    fn continue_endpoint(&mut self, ctx: &mut ToolContext<'_>, ev: &PointerEvent) -> Vec<Action> {
        let (id, end) = match &self.gesture {
            Gesture::DraggingEndpoint { id, end, .. } => (*id, *end),
            _ => return Vec::new(),
        };
        let Some(dragged) = ctx.doc.get(&id) else {
            tracing::debug!(id = %id, "endpoint target vanished, aborting gesture");
            self.gesture = Gesture::Idle;
            return Vec::new();
        };
        let is_connector = dragged.is_connector();

        let mut pos = ev.world;
        let mut attachment: Option<Attachment> = None;
        self.active_anchor = None;
        if is_connector {
            let threshold = ctx.camera.screen_dist_to_world(ANCHOR_SNAP_PX);
            if let Some(anchor) = nearest_anchor(ctx.doc, ev.world, threshold, &id) {
                pos = anchor.point;
                attachment =
                    Some(Attachment { shape_id: anchor.shape_id, anchor: anchor.position });
                self.active_anchor = Some(anchor);
            }
        }

        let mut fields = PartialShape::default();
        match end {
            EdgeEnd::A => {
                fields.x = Some(pos.x);
                fields.y = Some(pos.y);
                if is_connector {
                    fields.start = Some(attachment);
                }
            }
            EdgeEnd::B => {
                fields.x2 = Some(pos.x);
                fields.y2 = Some(pos.y);
                if is_connector {
                    fields.end = Some(attachment);
                }
            }
        }
        if ctx.doc.apply_partial(&id, &fields) {
            return vec![Action::ShapeUpdated { id, fields }, Action::RenderNeeded];
        }
        Vec::new()
    }

    // ── Clicks and deletion ─────────────────────────────────────

    fn finish_click(
        &mut self,
        ctx: &mut ToolContext<'_>,
        ev: &PointerEvent,
        hit: Option<ShapeId>,
        hit_was_selected: bool,
    ) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(id) = hit {
            let is_double = self.last_click.as_ref().is_some_and(|stamp| {
                stamp.id == id
                    && ev.time_ms - stamp.time_ms <= DOUBLE_CLICK_MS
                    && ev.screen.distance_to(stamp.screen) <= DOUBLE_CLICK_DIST_PX
            });
            if is_double {
                if let Some(shape) = ctx.doc.get(&id) {
                    if shape.supports_label_edit() {
                        let content = match &shape.kind {
                            ShapeKind::Text { content, .. } => content.clone(),
                            _ => String::new(),
                        };
                        actions.push(Action::EditTextRequested { id, content });
                    }
                }
                self.last_click = None;
            } else {
                if hit_was_selected {
                    if ev.modifiers.shift {
                        ctx.selection.remove(&id);
                    } else {
                        ctx.selection.select_only(id);
                    }
                }
                self.last_click =
                    Some(ClickStamp { id, screen: ev.screen, time_ms: ev.time_ms });
            }
        } else {
            if !ev.modifiers.shift {
                ctx.selection.clear();
            }
            self.last_click = None;
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn delete_selection(&mut self, ctx: &mut ToolContext<'_>) -> Vec<Action> {
        if self.gesture.is_active() || ctx.selection.is_empty() {
            return Vec::new();
        }
        let ids: Vec<ShapeId> = ctx
            .doc
            .order()
            .iter()
            .filter(|id| ctx.selection.is_selected(id))
            .copied()
            .collect();
        let mut actions = Vec::new();
        for id in ids {
            if ctx.doc.remove(&id).is_some() {
                ctx.index.remove(&id);
                actions.push(Action::ShapeDeleted { id });
            }
        }
        ctx.selection.clear();
        actions.push(Action::RenderNeeded);
        actions
    }

    // ── Hover ───────────────────────────────────────────────────

    fn hover_feedback(&mut self, ctx: &mut ToolContext<'_>, ev: &PointerEvent) -> Vec<Action> {
        let mut cursor = "default";
        if let Some(selected) = ctx.selection.single() {
            if let Some(shape) = ctx.doc.get(&selected) {
                let handle_size = ctx.camera.screen_dist_to_world(HANDLE_SIZE_PX);
                let rotate_offset = ctx.camera.screen_dist_to_world(ROTATE_HANDLE_OFFSET_PX);
                if let Some(grab) =
                    hit::hit_test_handles(ev.world, &[shape], handle_size, rotate_offset)
                {
                    cursor = match grab.part {
                        HitPart::ResizeHandle(anchor) => anchor.cursor(),
                        HitPart::RotateHandle => "grab",
                        HitPart::EdgeEndpoint(_) => "crosshair",
                        HitPart::Body => "move",
                    };
                }
            }
        }
        if cursor == "default" {
            let tolerance = ctx.camera.screen_dist_to_world(LINE_HIT_TOLERANCE_PX);
            if hit::hit_test_point(ev.world, ctx.doc, ctx.index, tolerance).is_some() {
                cursor = "move";
            }
        }
        if cursor == self.cursor {
            return Vec::new();
        }
        self.cursor = cursor;
        vec![Action::SetCursor(cursor.to_string())]
    }

    fn revert_one(
        &mut self,
        ctx: &mut ToolContext<'_>,
        id: ShapeId,
        fields: PartialShape,
    ) -> Vec<Action> {
        if !ctx.doc.apply_partial(&id, &fields) {
            return vec![Action::RenderNeeded];
        }
        if let Some(shape) = ctx.doc.get(&id) {
            ctx.index.update(shape);
        }
        vec![Action::ShapeUpdated { id, fields }, Action::RenderNeeded]
    }
}

impl Proposal {
    /// A clone of `shape` with this proposal's geometry applied, used to
    /// measure bounds before committing.
    fn applied_to(&self, shape: &Shape) -> Shape {
        let mut ghost = shape.clone();
        ghost.x = self.x;
        ghost.y = self.y;
        match &mut ghost.kind {
            ShapeKind::Line { x2, y2 } | ShapeKind::Connector { x2, y2, .. } => {
                if let Some(v) = self.x2 {
                    *x2 = v;
                }
                if let Some(v) = self.y2 {
                    *y2 = v;
                }
            }
            _ => {}
        }
        ghost
    }

    fn shift(&mut self, offset: Point) {
        self.x += offset.x;
        self.y += offset.y;
        if let Some(v) = &mut self.x2 {
            *v += offset.x;
        }
        if let Some(v) = &mut self.y2 {
            *v += offset.y;
        }
    }
}

/// Snapshot the current selection for a translate, in z-order so the
/// bottom-most shape deterministically drives group snapping.
fn collect_translate_origins(
    doc: &ShapeStore,
    selection: &SelectionState,
) -> Vec<(ShapeId, TranslateOrigin)> {
    doc.order()
        .iter()
        .filter(|id| selection.is_selected(id))
        .filter_map(|id| {
            let shape = doc.get(id)?;
            let (x2, y2) = match shape.endpoints() {
                Some((_, b)) => (Some(b.x), Some(b.y)),
                None => (None, None),
            };
            Some((*id, TranslateOrigin { x: shape.x, y: shape.y, x2, y2 }))
        })
        .collect()
}

/// World position of the handle opposite `anchor` on the shape's box.
fn opposite_handle_world(shape: &Shape, anchor: ResizeAnchor) -> Point {
    let Some((w, h)) = shape.box_dims() else {
        return shape.center();
    };
    let center = shape.center();
    let (dx, dy) = anchor.opposite().direction();
    let local = Point::new(dx * w * 0.5, dy * h * 0.5).rotated(shape.rotation);
    Point::new(center.x + local.x, center.y + local.y)
}

/// The nearest attachable anchor to `point` within `threshold`, searching
/// every non-connector shape except the dragged one (and, through groups,
/// their children).
fn nearest_anchor(
    doc: &ShapeStore,
    point: Point,
    threshold: f64,
    dragged: &ShapeId,
) -> Option<ShapeAnchor> {
    let mut best: Option<(f64, ShapeAnchor)> = None;
    for shape in doc.sorted_shapes() {
        if shape.id == *dragged || shape.is_connector() {
            continue;
        }
        for anchor in shape.anchors() {
            let dist = anchor.point.distance_to(point);
            if dist <= threshold && best.is_none_or(|(b, _)| dist < b) {
                best = Some((dist, anchor));
            }
        }
    }
    best.map(|(_, anchor)| anchor)
}

/// Shape-kind-specific resize. Transforms the fixed anchor and live cursor
/// into the shape's local frame, derives new extents (aspect-locked for
/// corner drags when `aspect_lock`), floors them, and rotates the new
/// center back to world space. Returns `None` for kinds without a box.
fn resize_box(
    original: &Shape,
    anchor: ResizeAnchor,
    anchor_world: Point,
    cursor_world: Point,
    aspect_lock: bool,
) -> Option<PartialShape> {
    let (w0, h0) = original.box_dims()?;
    let center0 = original.center();
    let rotation = original.rotation;
    let local_anchor =
        Point::new(anchor_world.x - center0.x, anchor_world.y - center0.y).rotated(-rotation);
    let local_cursor =
        Point::new(cursor_world.x - center0.x, cursor_world.y - center0.y).rotated(-rotation);

    let (dir_x, dir_y) = anchor.direction();
    let free_x = dir_x != 0.0;
    let free_y = dir_y != 0.0;
    let span_x = local_cursor.x - local_anchor.x;
    let span_y = local_cursor.y - local_anchor.y;

    let mut new_w = if free_x { span_x.abs() } else { w0 };
    let mut new_h = if free_y { span_y.abs() } else { h0 };
    if aspect_lock && anchor.is_corner() && w0 > 0.0 && h0 > 0.0 {
        // Preserve w0/h0: the dominant axis wins, the other follows.
        if new_w * h0 >= new_h * w0 {
            new_h = new_w * h0 / w0;
        } else {
            new_w = new_h * w0 / h0;
        }
    }
    let (min_w, min_h) = match original.kind {
        ShapeKind::Text { .. } => (MIN_TEXT_WIDTH, MIN_SHAPE_SIZE),
        _ => (MIN_SHAPE_SIZE, MIN_SHAPE_SIZE),
    };
    new_w = new_w.max(min_w);
    new_h = new_h.max(min_h);

    let sign_x = if span_x == 0.0 { dir_x } else { span_x.signum() };
    let sign_y = if span_y == 0.0 { dir_y } else { span_y.signum() };
    let center_local = Point::new(
        if free_x { local_anchor.x + sign_x * new_w * 0.5 } else { 0.0 },
        if free_y { local_anchor.y + sign_y * new_h * 0.5 } else { 0.0 },
    );
    let rotated = center_local.rotated(rotation);
    let mut fields = PartialShape {
        x: Some(center0.x + rotated.x),
        y: Some(center0.y + rotated.y),
        ..PartialShape::default()
    };
    match original.kind {
        ShapeKind::Rect { .. } | ShapeKind::Text { .. } => {
            fields.width = Some(new_w);
            fields.height = Some(new_h);
        }
        ShapeKind::Ellipse { .. } => {
            fields.rx = Some(new_w * 0.5);
            fields.ry = Some(new_h * 0.5);
        }
        _ => return None,
    }
    Some(fields)
}
