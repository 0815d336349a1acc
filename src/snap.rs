//! Snapping: grid and shape-edge/center alignment for dragged geometry.
//!
//! Every function here is pure: it proposes an adjusted position and
//! reports which guide lines engaged; the select tool decides whether to
//! apply it. The two axes snap independently: an x snapped to a shape edge
//! can coexist with a y snapped to the grid. Shape targets beat grid
//! targets per axis, and within shape targets the closest candidate wins,
//! with ties going to the earlier shape in z-order.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use std::collections::HashSet;

use crate::camera::Point;
use crate::doc::{Bounds, ShapeId, ShapeStore};

/// What a snapped axis latched onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapSource {
    Grid,
    ShapeEdge,
    ShapeCenter,
}

/// An adjusted position plus per-axis provenance. `line_x` / `line_y` are
/// the world coordinates of the engaged guide lines, for the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    pub position: Point,
    pub snapped_x: bool,
    pub snapped_y: bool,
    pub line_x: Option<f64>,
    pub line_y: Option<f64>,
    pub source_x: Option<SnapSource>,
    pub source_y: Option<SnapSource>,
}

impl SnapResult {
    fn unsnapped(position: Point) -> Self {
        Self {
            position,
            snapped_x: false,
            snapped_y: false,
            line_x: None,
            line_y: None,
            source_x: None,
            source_y: None,
        }
    }
}

/// Best target found so far on one axis.
#[derive(Clone, Copy)]
struct AxisMatch {
    delta: f64,
    target: f64,
    source: SnapSource,
}

impl AxisMatch {
    /// Keep the closer of two candidates; the incumbent wins ties.
    fn consider(best: &mut Option<Self>, delta: f64, target: f64, source: SnapSource) {
        let better = best.map_or(true, |b| delta.abs() < b.delta.abs());
        if better {
            *best = Some(Self { delta, target, source });
        }
    }
}

/// Snap a point to the nearest grid line on each axis, if within
/// `threshold` world units.
#[must_use]
pub fn snap_to_grid(point: Point, spacing: f64, threshold: f64) -> SnapResult {
    let mut result = SnapResult::unsnapped(point);
    if spacing <= 0.0 {
        return result;
    }
    let nearest_x = (point.x / spacing).round() * spacing;
    if (nearest_x - point.x).abs() <= threshold {
        result.position.x = nearest_x;
        result.snapped_x = true;
        result.line_x = Some(nearest_x);
        result.source_x = Some(SnapSource::Grid);
    }
    let nearest_y = (point.y / spacing).round() * spacing;
    if (nearest_y - point.y).abs() <= threshold {
        result.position.y = nearest_y;
        result.snapped_y = true;
        result.line_y = Some(nearest_y);
        result.source_y = Some(SnapSource::Grid);
    }
    result
}

/// Snap a point to other shapes' centers and edge coordinates, per axis.
/// Shapes in `exclude` (the ones being moved) are skipped.
#[must_use]
pub fn snap_to_shapes(
    point: Point,
    doc: &ShapeStore,
    threshold: f64,
    exclude: &HashSet<ShapeId>,
) -> SnapResult {
    let mut best_x: Option<AxisMatch> = None;
    let mut best_y: Option<AxisMatch> = None;
    for shape in doc.sorted_shapes() {
        if exclude.contains(&shape.id) {
            continue;
        }
        let Some(bounds) = shape.bounds() else {
            continue;
        };
        consider_shape_axis(&mut best_x, point.x, &bounds, Axis::X, threshold);
        consider_shape_axis(&mut best_y, point.y, &bounds, Axis::Y, threshold);
    }
    let mut result = SnapResult::unsnapped(point);
    if let Some(m) = best_x {
        result.position.x = m.target;
        result.snapped_x = true;
        result.line_x = Some(m.target);
        result.source_x = Some(m.source);
    }
    if let Some(m) = best_y {
        result.position.y = m.target;
        result.snapped_y = true;
        result.line_y = Some(m.target);
        result.source_y = Some(m.source);
    }
    result
}

/// Combined snap: shape targets take precedence per axis; the grid fills
/// in any axis the shapes left unsnapped.
#[must_use]
pub fn snap(
    point: Point,
    doc: &ShapeStore,
    spacing: f64,
    threshold: f64,
    exclude: &HashSet<ShapeId>,
) -> SnapResult {
    let mut result = snap_to_shapes(point, doc, threshold, exclude);
    if result.snapped_x && result.snapped_y {
        return result;
    }
    let grid = snap_to_grid(point, spacing, threshold);
    if !result.snapped_x && grid.snapped_x {
        result.position.x = grid.position.x;
        result.snapped_x = true;
        result.line_x = grid.line_x;
        result.source_x = grid.source_x;
    }
    if !result.snapped_y && grid.snapped_y {
        result.position.y = grid.position.y;
        result.snapped_y = true;
        result.line_y = grid.line_y;
        result.source_y = grid.source_y;
    }
    result
}

/// Snap a moving shape by its whole bounds: each axis tests the bounds'
/// min/center/max against other shapes' edges and centers, then against
/// grid lines. `center` is the moving shape's proposed center; the returned
/// `position` is that center shifted by the winning per-axis deltas, so the
/// caller can apply the same offset to everything being moved.
#[must_use]
pub fn snap_bounds(
    bounds: &Bounds,
    center: Point,
    doc: &ShapeStore,
    spacing: f64,
    threshold: f64,
    exclude: &HashSet<ShapeId>,
) -> SnapResult {
    let moving_x = [bounds.min_x, center.x, bounds.max_x];
    let moving_y = [bounds.min_y, center.y, bounds.max_y];

    let mut best_x: Option<AxisMatch> = None;
    let mut best_y: Option<AxisMatch> = None;
    for shape in doc.sorted_shapes() {
        if exclude.contains(&shape.id) {
            continue;
        }
        let Some(b) = shape.bounds() else {
            continue;
        };
        let bc = b.center();
        for &value in &moving_x {
            for (target, source) in [
                (b.min_x, SnapSource::ShapeEdge),
                (b.max_x, SnapSource::ShapeEdge),
                (bc.x, SnapSource::ShapeCenter),
            ] {
                let delta = target - value;
                if delta.abs() <= threshold {
                    AxisMatch::consider(&mut best_x, delta, target, source);
                }
            }
        }
        for &value in &moving_y {
            for (target, source) in [
                (b.min_y, SnapSource::ShapeEdge),
                (b.max_y, SnapSource::ShapeEdge),
                (bc.y, SnapSource::ShapeCenter),
            ] {
                let delta = target - value;
                if delta.abs() <= threshold {
                    AxisMatch::consider(&mut best_y, delta, target, source);
                }
            }
        }
    }
    if spacing > 0.0 {
        if best_x.is_none() {
            for &value in &moving_x {
                let target = (value / spacing).round() * spacing;
                let delta = target - value;
                if delta.abs() <= threshold {
                    AxisMatch::consider(&mut best_x, delta, target, SnapSource::Grid);
                }
            }
        }
        if best_y.is_none() {
            for &value in &moving_y {
                let target = (value / spacing).round() * spacing;
                let delta = target - value;
                if delta.abs() <= threshold {
                    AxisMatch::consider(&mut best_y, delta, target, SnapSource::Grid);
                }
            }
        }
    }

    let mut result = SnapResult::unsnapped(center);
    if let Some(m) = best_x {
        result.position.x = center.x + m.delta;
        result.snapped_x = true;
        result.line_x = Some(m.target);
        result.source_x = Some(m.source);
    }
    if let Some(m) = best_y {
        result.position.y = center.y + m.delta;
        result.snapped_y = true;
        result.line_y = Some(m.target);
        result.source_y = Some(m.source);
    }
    result
}

enum Axis {
    X,
    Y,
}

fn consider_shape_axis(
    best: &mut Option<AxisMatch>,
    value: f64,
    bounds: &Bounds,
    axis: Axis,
    threshold: f64,
) {
    let center = bounds.center();
    let candidates = match axis {
        Axis::X => [
            (bounds.min_x, SnapSource::ShapeEdge),
            (bounds.max_x, SnapSource::ShapeEdge),
            (center.x, SnapSource::ShapeCenter),
        ],
        Axis::Y => [
            (bounds.min_y, SnapSource::ShapeEdge),
            (bounds.max_y, SnapSource::ShapeEdge),
            (center.y, SnapSource::ShapeCenter),
        ],
    };
    for (target, source) in candidates {
        let delta = target - value;
        if delta.abs() <= threshold {
            AxisMatch::consider(best, delta, target, source);
        }
    }
}
