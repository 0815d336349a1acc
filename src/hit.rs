//! Hit-testing: precise point/rect/handle resolution over index candidates.
//!
//! The spatial index narrows the field to bounding-box candidates; this
//! module runs the per-kind geometry predicate that decides the actual hit.
//! Point tests walk candidates top-down so the visually top-most shape
//! wins; rect tests return every touched shape bottom-up, since a marquee
//! selects a set rather than a single target.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use std::collections::HashSet;

use crate::camera::Point;
use crate::doc::{Bounds, Shape, ShapeId, ShapeKind, ShapeStore};
use crate::index::SpatialIndex;

/// Which part of a shape was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeAnchor),
    RotateHandle,
    EdgeEndpoint(EdgeEnd),
}

/// Anchor position for resize handles, compass-named. `N` is the top edge
/// of the un-rotated shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    pub const ALL: [Self; 8] = [
        Self::N,
        Self::Ne,
        Self::E,
        Self::Se,
        Self::S,
        Self::Sw,
        Self::W,
        Self::Nw,
    ];

    /// The handle diagonally or directly across the shape.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::N => Self::S,
            Self::Ne => Self::Sw,
            Self::E => Self::W,
            Self::Se => Self::Nw,
            Self::S => Self::N,
            Self::Sw => Self::Ne,
            Self::W => Self::E,
            Self::Nw => Self::Se,
        }
    }

    /// Unit direction from the shape center toward this handle, in the
    /// shape's local (un-rotated) frame. Zero on the fixed axis of edge
    /// handles.
    #[must_use]
    pub fn direction(self) -> (f64, f64) {
        match self {
            Self::N => (0.0, -1.0),
            Self::Ne => (1.0, -1.0),
            Self::E => (1.0, 0.0),
            Self::Se => (1.0, 1.0),
            Self::S => (0.0, 1.0),
            Self::Sw => (-1.0, 1.0),
            Self::W => (-1.0, 0.0),
            Self::Nw => (-1.0, -1.0),
        }
    }

    /// Whether this is a corner handle (both axes free during resize).
    #[must_use]
    pub fn is_corner(self) -> bool {
        matches!(self, Self::Ne | Self::Se | Self::Sw | Self::Nw)
    }

    /// CSS cursor hint for hovering this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::Ne | Self::Sw => "nesw-resize",
            Self::Se | Self::Nw => "nwse-resize",
        }
    }
}

/// Which end of a two-point shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEnd {
    A,
    B,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub shape_id: ShapeId,
    pub part: HitPart,
}

/// An interactive control point on a selected shape. Positions are world
/// coordinates; the renderer draws them at a fixed screen size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub part: HitPart,
    pub pos: Point,
    pub cursor: &'static str,
}

// ── Geometry predicates ─────────────────────────────────────────

/// Point containment in a rectangle of `w`×`h` centered on `center`,
/// rotated by `rotation` radians.
#[must_use]
pub fn point_in_rotated_rect(p: Point, center: Point, w: f64, h: f64, rotation: f64) -> bool {
    let local = Point::new(p.x - center.x, p.y - center.y).rotated(-rotation);
    local.x.abs() <= w * 0.5 && local.y.abs() <= h * 0.5
}

/// Point containment in an ellipse with radii `rx`/`ry` centered on
/// `center`, rotated by `rotation` radians. Zero radii never contain.
#[must_use]
pub fn point_in_rotated_ellipse(p: Point, center: Point, rx: f64, ry: f64, rotation: f64) -> bool {
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let local = Point::new(p.x - center.x, p.y - center.y).rotated(-rotation);
    (local.x / rx).powi(2) + (local.y / ry).powi(2) <= 1.0
}

/// Distance from `p` to the segment `a`–`b`. A zero-length segment is
/// treated as the point `a`.
#[must_use]
pub fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance_to(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance_to(Point::new(a.x + t * dx, a.y + t * dy))
}

/// The per-kind precise hit predicate. `tolerance` is the world-space slop
/// applied to segment kinds (on top of half their stroke width); area kinds
/// hit on their interior only.
#[must_use]
pub fn shape_contains_point(shape: &Shape, p: Point, tolerance: f64) -> bool {
    match &shape.kind {
        ShapeKind::Rect { width, height } => {
            point_in_rotated_rect(p, shape.center(), *width, *height, shape.rotation)
        }
        ShapeKind::Text { width, height, .. } => {
            point_in_rotated_rect(p, shape.center(), *width, *height, shape.rotation)
        }
        ShapeKind::Ellipse { rx, ry } => {
            point_in_rotated_ellipse(p, shape.center(), *rx, *ry, shape.rotation)
        }
        ShapeKind::Line { x2, y2 } | ShapeKind::Connector { x2, y2, .. } => {
            let a = Point::new(shape.x, shape.y);
            let b = Point::new(*x2, *y2);
            segment_distance(p, a, b) <= shape.stroke_width * 0.5 + tolerance
        }
        ShapeKind::Group { children } => {
            let local = Point::new(p.x - shape.x, p.y - shape.y);
            children.iter().any(|child| shape_contains_point(child, local, tolerance))
        }
    }
}

// ── Point / rect tests ──────────────────────────────────────────

/// The top-most shape under `world_pt`, or `None`.
///
/// Candidates come from the spatial index (the query is inflated by
/// `tolerance` so hairline segments still surface); they are then walked in
/// reverse z-order and precise-tested, first match wins.
#[must_use]
pub fn hit_test_point(
    world_pt: Point,
    doc: &ShapeStore,
    index: &SpatialIndex,
    tolerance: f64,
) -> Option<ShapeId> {
    let query = Bounds::from_center(world_pt, tolerance, tolerance);
    let candidates: HashSet<ShapeId> = index.query_rect(&query).into_iter().collect();
    for id in doc.order().iter().rev() {
        if !candidates.contains(id) {
            continue;
        }
        if let Some(shape) = doc.get(id) {
            if shape_contains_point(shape, world_pt, tolerance) {
                return Some(*id);
            }
        }
    }
    None
}

/// Index-free variant of [`hit_test_point`]: a full O(n) scan for callers
/// that cannot trust the index to be current.
#[must_use]
pub fn hit_test_point_direct<'a>(
    world_pt: Point,
    shapes_in_order: &[&'a Shape],
    tolerance: f64,
) -> Option<&'a Shape> {
    shapes_in_order
        .iter()
        .rev()
        .find(|shape| shape_contains_point(shape, world_pt, tolerance))
        .copied()
}

/// All shapes whose bounds intersect `rect`, in ascending z-order (bottom
/// first). Used for marquee selection.
#[must_use]
pub fn hit_test_rect(rect: &Bounds, doc: &ShapeStore, index: &SpatialIndex) -> Vec<ShapeId> {
    let candidates: HashSet<ShapeId> = index.query_rect(rect).into_iter().collect();
    doc.order()
        .iter()
        .filter(|id| candidates.contains(*id))
        .filter(|id| {
            doc.get(id)
                .and_then(Shape::bounds)
                .is_some_and(|b| b.intersects(rect))
        })
        .copied()
        .collect()
}

// ── Handles ─────────────────────────────────────────────────────

/// The handle set for a shape: 8 resize handles plus a rotate handle for
/// box kinds, endpoint handles for two-point kinds, none for groups.
///
/// `rotate_offset` is the world-space distance from the top edge to the
/// rotate handle (the caller scales the screen-pixel constant by `1/zoom`).
#[must_use]
pub fn handles_for(shape: &Shape, rotate_offset: f64) -> Vec<Handle> {
    if let Some((w, h)) = shape.box_dims() {
        let center = shape.center();
        let mut handles: Vec<Handle> = ResizeAnchor::ALL
            .iter()
            .map(|anchor| {
                let (dx, dy) = anchor.direction();
                let local = Point::new(dx * w * 0.5, dy * h * 0.5).rotated(shape.rotation);
                Handle {
                    part: HitPart::ResizeHandle(*anchor),
                    pos: Point::new(center.x + local.x, center.y + local.y),
                    cursor: anchor.cursor(),
                }
            })
            .collect();
        let local = Point::new(0.0, -h * 0.5 - rotate_offset).rotated(shape.rotation);
        handles.push(Handle {
            part: HitPart::RotateHandle,
            pos: Point::new(center.x + local.x, center.y + local.y),
            cursor: "grab",
        });
        return handles;
    }
    if let Some((a, b)) = shape.endpoints() {
        return vec![
            Handle { part: HitPart::EdgeEndpoint(EdgeEnd::A), pos: a, cursor: "crosshair" },
            Handle { part: HitPart::EdgeEndpoint(EdgeEnd::B), pos: b, cursor: "crosshair" },
        ];
    }
    Vec::new()
}

/// The first handle under `world_pt`, searching `shapes` in reverse order
/// (top-most shape first). Each handle hits as an axis-aligned square of
/// side `handle_size` in world units.
#[must_use]
pub fn hit_test_handles(
    world_pt: Point,
    shapes: &[&Shape],
    handle_size: f64,
    rotate_offset: f64,
) -> Option<Hit> {
    let half = handle_size * 0.5;
    for shape in shapes.iter().rev() {
        for handle in handles_for(shape, rotate_offset) {
            if (world_pt.x - handle.pos.x).abs() <= half
                && (world_pt.y - handle.pos.y).abs() <= half
            {
                return Some(Hit { shape_id: shape.id, part: handle.part });
            }
        }
    }
    None
}
