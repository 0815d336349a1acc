//! Document model: shapes, their geometry capabilities, and the in-memory store.
//!
//! This module defines the core data types that describe what is on the
//! canvas. Shape kinds are a closed sum type (`ShapeKind`), so every
//! geometry capability (bounds, center, anchors) is an exhaustive match
//! with no runtime dispatch that can miss.
//!
//! Data flows into this layer from the host (snapshot deserialization) and
//! from the select tool (mutations). The renderer reads from `ShapeStore`
//! via `sorted_shapes` to determine draw order.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;

/// Unique identifier for a shape.
pub type ShapeId = Uuid;

/// Axis-aligned bounding box, always normalized so min ≤ max.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Build a normalized box from any two opposite corners' coordinates.
    #[must_use]
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            min_x: x0.min(x1),
            min_y: y0.min(y1),
            max_x: x0.max(x1),
            max_y: y0.max(y1),
        }
    }

    /// Build a normalized box from two corner points.
    #[must_use]
    pub fn from_points(a: Point, b: Point) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    /// Build a box from a center and half-extents.
    #[must_use]
    pub fn from_center(center: Point, half_w: f64, half_h: f64) -> Self {
        Self::new(center.x - half_w, center.y - half_h, center.x + half_w, center.y + half_h)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) * 0.5, (self.min_y + self.max_y) * 0.5)
    }

    /// Whether `p` lies inside the box. Boundary points count.
    #[must_use]
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Whether this box fully contains `other`.
    #[must_use]
    pub fn contains(&self, other: &Bounds) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    /// Whether the two boxes overlap. Touching edges count.
    #[must_use]
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// The smallest box containing both.
    #[must_use]
    pub fn union(&self, other: &Bounds) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// The box grown by `amount` on every side.
    #[must_use]
    pub fn inflate(&self, amount: f64) -> Self {
        Self::new(
            self.min_x - amount,
            self.min_y - amount,
            self.max_x + amount,
            self.max_y + amount,
        )
    }

    /// The box shifted by a delta.
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            min_x: self.min_x + dx,
            min_y: self.min_y + dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }
}

/// A named attachment point on a shape's boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorPosition {
    Top,
    Right,
    Bottom,
    Left,
}

impl AnchorPosition {
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];
}

/// A connector endpoint's connection reference to another shape's anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub shape_id: ShapeId,
    pub anchor: AnchorPosition,
}

/// One resolvable anchor point: which shape, which side, where in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeAnchor {
    pub shape_id: ShapeId,
    pub position: AnchorPosition,
    pub point: Point,
}

/// Per-kind geometry of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ShapeKind {
    /// Axis-aligned rectangle (before rotation), centered on `x` / `y`.
    Rect { width: f64, height: f64 },
    /// Ellipse with the given radii, centered on `x` / `y`.
    Ellipse { rx: f64, ry: f64 },
    /// Text block centered on `x` / `y`.
    Text { width: f64, height: f64, content: String },
    /// Straight segment from `x` / `y` to the second endpoint.
    Line { x2: f64, y2: f64 },
    /// Segment whose endpoints may attach to other shapes' anchors.
    Connector {
        x2: f64,
        y2: f64,
        start: Option<Attachment>,
        end: Option<Attachment>,
    },
    /// A translate-only container. Child coordinates are relative to the
    /// group origin; groups do not rotate or resize.
    Group { children: Vec<Shape> },
}

/// A shape as stored in the document.
///
/// `x` / `y` is the center for rect/ellipse/text, the first endpoint for
/// line and connector, and the local origin for groups. `rotation` is in
/// radians, clockwise-positive in the y-down world frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub stroke_width: f64,
    #[serde(flatten)]
    pub kind: ShapeKind,
}

impl Shape {
    /// Construct with a fresh id, no rotation, and a hairline stroke.
    #[must_use]
    pub fn new(x: f64, y: f64, kind: ShapeKind) -> Self {
        Self { id: Uuid::new_v4(), x, y, rotation: 0.0, stroke_width: 1.0, kind }
    }

    /// The rotation pivot: the geometric center of the shape.
    #[must_use]
    pub fn center(&self) -> Point {
        match &self.kind {
            ShapeKind::Rect { .. } | ShapeKind::Ellipse { .. } | ShapeKind::Text { .. } => {
                Point::new(self.x, self.y)
            }
            ShapeKind::Line { x2, y2 } | ShapeKind::Connector { x2, y2, .. } => {
                Point::new((self.x + x2) * 0.5, (self.y + y2) * 0.5)
            }
            ShapeKind::Group { .. } => self
                .bounds()
                .map_or(Point::new(self.x, self.y), |b| b.center()),
        }
    }

    /// Width and height of the un-rotated box, for kinds that have one.
    #[must_use]
    pub fn box_dims(&self) -> Option<(f64, f64)> {
        match &self.kind {
            ShapeKind::Rect { width, height } | ShapeKind::Text { width, height, .. } => {
                Some((*width, *height))
            }
            ShapeKind::Ellipse { rx, ry } => Some((rx * 2.0, ry * 2.0)),
            ShapeKind::Line { .. } | ShapeKind::Connector { .. } | ShapeKind::Group { .. } => None,
        }
    }

    /// Both endpoints, for two-point kinds.
    #[must_use]
    pub fn endpoints(&self) -> Option<(Point, Point)> {
        match &self.kind {
            ShapeKind::Line { x2, y2 } | ShapeKind::Connector { x2, y2, .. } => {
                Some((Point::new(self.x, self.y), Point::new(*x2, *y2)))
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn is_connector(&self) -> bool {
        matches!(self.kind, ShapeKind::Connector { .. })
    }

    #[must_use]
    pub fn is_two_point(&self) -> bool {
        matches!(self.kind, ShapeKind::Line { .. } | ShapeKind::Connector { .. })
    }

    /// Whether a double-click on this shape should open label editing.
    #[must_use]
    pub fn supports_label_edit(&self) -> bool {
        matches!(
            self.kind,
            ShapeKind::Rect { .. } | ShapeKind::Ellipse { .. } | ShapeKind::Text { .. }
        )
    }

    /// The world-space axis-aligned bounding box.
    ///
    /// Rotation is folded in, so the box covers the rotated geometry
    /// exactly. Segment kinds include half their stroke width. Returns
    /// `None` when no finite box exists (an empty group).
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        match &self.kind {
            ShapeKind::Rect { width, height } | ShapeKind::Text { width, height, .. } => {
                let (sin, cos) = self.rotation.sin_cos();
                let hw = (width * 0.5 * cos).abs() + (height * 0.5 * sin).abs();
                let hh = (width * 0.5 * sin).abs() + (height * 0.5 * cos).abs();
                Some(Bounds::from_center(Point::new(self.x, self.y), hw, hh))
            }
            ShapeKind::Ellipse { rx, ry } => {
                let (sin, cos) = self.rotation.sin_cos();
                let hw = ((rx * cos).powi(2) + (ry * sin).powi(2)).sqrt();
                let hh = ((rx * sin).powi(2) + (ry * cos).powi(2)).sqrt();
                Some(Bounds::from_center(Point::new(self.x, self.y), hw, hh))
            }
            ShapeKind::Line { x2, y2 } | ShapeKind::Connector { x2, y2, .. } => Some(
                Bounds::new(self.x, self.y, *x2, *y2).inflate(self.stroke_width * 0.5),
            ),
            ShapeKind::Group { children } => {
                let mut acc: Option<Bounds> = None;
                for child in children {
                    if let Some(b) = child.bounds() {
                        let b = b.translated(self.x, self.y);
                        acc = Some(acc.map_or(b, |a| a.union(&b)));
                    }
                }
                acc
            }
        }
    }

    /// All anchor points this shape offers to connector endpoints, in world
    /// coordinates. Segment kinds offer none; groups offer their children's
    /// anchors, recursively.
    #[must_use]
    pub fn anchors(&self) -> Vec<ShapeAnchor> {
        let mut out = Vec::new();
        self.anchors_into(Point::new(0.0, 0.0), &mut out);
        out
    }

    fn anchors_into(&self, offset: Point, out: &mut Vec<ShapeAnchor>) {
        match &self.kind {
            ShapeKind::Rect { .. } | ShapeKind::Ellipse { .. } | ShapeKind::Text { .. } => {
                let Some((w, h)) = self.box_dims() else { return };
                let center = Point::new(self.x + offset.x, self.y + offset.y);
                for position in AnchorPosition::ALL {
                    let local = match position {
                        AnchorPosition::Top => Point::new(0.0, -h * 0.5),
                        AnchorPosition::Right => Point::new(w * 0.5, 0.0),
                        AnchorPosition::Bottom => Point::new(0.0, h * 0.5),
                        AnchorPosition::Left => Point::new(-w * 0.5, 0.0),
                    };
                    let rotated = local.rotated(self.rotation);
                    out.push(ShapeAnchor {
                        shape_id: self.id,
                        position,
                        point: Point::new(center.x + rotated.x, center.y + rotated.y),
                    });
                }
            }
            ShapeKind::Line { .. } | ShapeKind::Connector { .. } => {}
            ShapeKind::Group { children } => {
                let origin = Point::new(self.x + offset.x, self.y + offset.y);
                for child in children {
                    child.anchors_into(origin, out);
                }
            }
        }
    }
}

/// Sparse update for a shape. Only present fields are applied; kind-specific
/// fields are ignored when the target shape's kind does not carry them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialShape {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    /// Rect/text width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Rect/text height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Ellipse x-radius.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx: Option<f64>,
    /// Ellipse y-radius.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ry: Option<f64>,
    /// Second endpoint of line/connector.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y2: Option<f64>,
    /// Text content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Connector start attachment; `Some(None)` detaches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Option<Attachment>>,
    /// Connector end attachment; `Some(None)` detaches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Option<Attachment>>,
}

impl PartialShape {
    /// A partial that, applied to any shape of the same kind, reproduces
    /// `shape`'s full geometry. Used to revert a cancelled gesture.
    #[must_use]
    pub fn geometry_of(shape: &Shape) -> Self {
        let mut partial = Self {
            x: Some(shape.x),
            y: Some(shape.y),
            rotation: Some(shape.rotation),
            ..Self::default()
        };
        match &shape.kind {
            ShapeKind::Rect { width, height } => {
                partial.width = Some(*width);
                partial.height = Some(*height);
            }
            ShapeKind::Text { width, height, .. } => {
                partial.width = Some(*width);
                partial.height = Some(*height);
            }
            ShapeKind::Ellipse { rx, ry } => {
                partial.rx = Some(*rx);
                partial.ry = Some(*ry);
            }
            ShapeKind::Line { x2, y2 } => {
                partial.x2 = Some(*x2);
                partial.y2 = Some(*y2);
            }
            ShapeKind::Connector { x2, y2, start, end } => {
                partial.x2 = Some(*x2);
                partial.y2 = Some(*y2);
                partial.start = Some(*start);
                partial.end = Some(*end);
            }
            ShapeKind::Group { .. } => {}
        }
        partial
    }
}

/// In-memory store of shapes plus their z-order.
///
/// The `order` list is the stacking order: first id is the bottom-most
/// shape, last id renders on top.
pub struct ShapeStore {
    shapes: HashMap<ShapeId, Shape>,
    order: Vec<ShapeId>,
}

impl ShapeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { shapes: HashMap::new(), order: Vec::new() }
    }

    /// Insert a shape on top of the stack. Re-adding an existing id
    /// replaces the shape in place, keeping its z-position.
    pub fn add(&mut self, shape: Shape) {
        let id = shape.id;
        if self.shapes.insert(id, shape).is_none() {
            self.order.push(id);
        }
    }

    /// Remove a shape by id, returning it if it was present.
    pub fn remove(&mut self, id: &ShapeId) -> Option<Shape> {
        let removed = self.shapes.remove(id);
        if removed.is_some() {
            self.order.retain(|o| o != id);
        }
        removed
    }

    /// Remove several shapes, returning how many were present.
    pub fn remove_many(&mut self, ids: &[ShapeId]) -> usize {
        ids.iter().filter(|id| self.remove(id).is_some()).count()
    }

    #[must_use]
    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn get_mut(&mut self, id: &ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(id)
    }

    #[must_use]
    pub fn contains(&self, id: &ShapeId) -> bool {
        self.shapes.contains_key(id)
    }

    /// The z-order id list, first = bottom.
    #[must_use]
    pub fn order(&self) -> &[ShapeId] {
        &self.order
    }

    /// All shapes, in no particular order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }

    /// All shapes in z-order, bottom first.
    #[must_use]
    pub fn sorted_shapes(&self) -> Vec<&Shape> {
        self.order.iter().filter_map(|id| self.shapes.get(id)).collect()
    }

    /// Apply a sparse update. Returns false if the shape doesn't exist.
    pub fn apply_partial(&mut self, id: &ShapeId, partial: &PartialShape) -> bool {
        let Some(shape) = self.shapes.get_mut(id) else {
            return false;
        };
        if let Some(x) = partial.x {
            shape.x = x;
        }
        if let Some(y) = partial.y {
            shape.y = y;
        }
        if let Some(r) = partial.rotation {
            shape.rotation = r;
        }
        if let Some(sw) = partial.stroke_width {
            shape.stroke_width = sw;
        }
        match &mut shape.kind {
            ShapeKind::Rect { width, height } => {
                if let Some(w) = partial.width {
                    *width = w;
                }
                if let Some(h) = partial.height {
                    *height = h;
                }
            }
            ShapeKind::Text { width, height, content } => {
                if let Some(w) = partial.width {
                    *width = w;
                }
                if let Some(h) = partial.height {
                    *height = h;
                }
                if let Some(ref c) = partial.content {
                    content.clone_from(c);
                }
            }
            ShapeKind::Ellipse { rx, ry } => {
                if let Some(r) = partial.rx {
                    *rx = r;
                }
                if let Some(r) = partial.ry {
                    *ry = r;
                }
            }
            ShapeKind::Line { x2, y2 } => {
                if let Some(v) = partial.x2 {
                    *x2 = v;
                }
                if let Some(v) = partial.y2 {
                    *y2 = v;
                }
            }
            ShapeKind::Connector { x2, y2, start, end } => {
                if let Some(v) = partial.x2 {
                    *x2 = v;
                }
                if let Some(v) = partial.y2 {
                    *y2 = v;
                }
                if let Some(a) = partial.start {
                    *start = a;
                }
                if let Some(a) = partial.end {
                    *end = a;
                }
            }
            ShapeKind::Group { .. } => {}
        }
        true
    }

    /// Apply a batch of sparse updates; missing ids are skipped.
    pub fn apply_batch(&mut self, updates: &[(ShapeId, PartialShape)]) {
        for (id, partial) in updates {
            self.apply_partial(id, partial);
        }
    }

    /// Replace all shapes with a full snapshot. The vector order becomes
    /// the z-order, first = bottom.
    pub fn load_snapshot(&mut self, shapes: Vec<Shape>) {
        self.shapes.clear();
        self.order.clear();
        for shape in shapes {
            self.add(shape);
        }
    }

    /// Number of top-level shapes currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if the store contains no shapes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl Default for ShapeStore {
    fn default() -> Self {
        Self::new()
    }
}
