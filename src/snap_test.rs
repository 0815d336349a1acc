#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use std::collections::HashSet;

use super::*;
use crate::doc::{Shape, ShapeKind};

fn rect_shape(x: f64, y: f64, w: f64, h: f64) -> Shape {
    Shape::new(x, y, ShapeKind::Rect { width: w, height: h })
}

fn store_of(shapes: Vec<Shape>) -> ShapeStore {
    let mut doc = ShapeStore::new();
    for s in shapes {
        doc.add(s);
    }
    doc
}

fn no_exclusions() -> HashSet<ShapeId> {
    HashSet::new()
}

// --- snap_to_grid ---

#[test]
fn grid_snaps_both_axes_within_threshold() {
    let r = snap_to_grid(Point::new(18.0, 42.0), 20.0, 8.0);
    assert!(r.snapped_x);
    assert!(r.snapped_y);
    assert_eq!(r.position, Point::new(20.0, 40.0));
    assert_eq!(r.line_x, Some(20.0));
    assert_eq!(r.line_y, Some(40.0));
    assert_eq!(r.source_x, Some(SnapSource::Grid));
}

#[test]
fn grid_axes_snap_independently() {
    let r = snap_to_grid(Point::new(18.0, 30.0), 20.0, 5.0);
    assert!(r.snapped_x);
    assert!(!r.snapped_y);
    assert_eq!(r.position, Point::new(20.0, 30.0));
    assert_eq!(r.line_y, None);
}

#[test]
fn grid_threshold_is_inclusive() {
    let r = snap_to_grid(Point::new(15.0, 0.0), 20.0, 5.0);
    assert!(r.snapped_x);
    assert_eq!(r.position.x, 20.0);
}

#[test]
fn grid_outside_threshold_leaves_point() {
    let r = snap_to_grid(Point::new(10.0, 10.0), 20.0, 5.0);
    assert!(!r.snapped_x);
    assert!(!r.snapped_y);
    assert_eq!(r.position, Point::new(10.0, 10.0));
}

#[test]
fn grid_zero_spacing_is_noop() {
    let r = snap_to_grid(Point::new(18.0, 42.0), 0.0, 8.0);
    assert!(!r.snapped_x);
    assert!(!r.snapped_y);
}

#[test]
fn grid_negative_coordinates_snap() {
    let r = snap_to_grid(Point::new(-18.0, -42.0), 20.0, 8.0);
    assert_eq!(r.position, Point::new(-20.0, -40.0));
}

// --- snap_to_shapes ---

#[test]
fn shape_edge_snap_wins_within_threshold() {
    // Rect at origin, 100x80: edges at x = ±50, y = ±40, center (0, 0).
    let doc = store_of(vec![rect_shape(0.0, 0.0, 100.0, 80.0)]);
    let r = snap_to_shapes(Point::new(53.0, 0.0), &doc, 8.0, &no_exclusions());
    assert!(r.snapped_x);
    assert_eq!(r.position.x, 50.0);
    assert_eq!(r.source_x, Some(SnapSource::ShapeEdge));
    // y snapped to the center line.
    assert!(r.snapped_y);
    assert_eq!(r.source_y, Some(SnapSource::ShapeCenter));
}

#[test]
fn shape_center_competes_with_edges() {
    let doc = store_of(vec![rect_shape(0.0, 0.0, 100.0, 80.0)]);
    // x = 3 is closest to the center (0) vs edges (±50).
    let r = snap_to_shapes(Point::new(3.0, 100.0), &doc, 8.0, &no_exclusions());
    assert!(r.snapped_x);
    assert_eq!(r.position.x, 0.0);
    assert_eq!(r.source_x, Some(SnapSource::ShapeCenter));
    assert!(!r.snapped_y);
}

#[test]
fn excluded_shapes_do_not_attract() {
    let moving = rect_shape(0.0, 0.0, 100.0, 80.0);
    let mut exclude = HashSet::new();
    exclude.insert(moving.id);
    let doc = store_of(vec![moving]);
    let r = snap_to_shapes(Point::new(51.0, 0.0), &doc, 8.0, &exclude);
    assert!(!r.snapped_x);
    assert!(!r.snapped_y);
}

#[test]
fn closest_shape_wins_per_axis() {
    let a = rect_shape(0.0, 0.0, 100.0, 80.0); // right edge at 50
    let b = rect_shape(110.0, 0.0, 100.0, 80.0); // left edge at 60
    let doc = store_of(vec![a, b]);
    let r = snap_to_shapes(Point::new(57.0, 100.0), &doc, 8.0, &no_exclusions());
    assert_eq!(r.position.x, 60.0);
}

#[test]
fn equidistant_targets_go_to_earlier_shape() {
    let a = rect_shape(0.0, 0.0, 100.0, 80.0); // right edge at 50
    let b = rect_shape(120.0, 0.0, 100.0, 80.0); // left edge at 70
    let doc = store_of(vec![a, b]);
    // x = 60 is 10 from both edges; threshold is generous.
    let r = snap_to_shapes(Point::new(60.0, 100.0), &doc, 15.0, &no_exclusions());
    assert_eq!(r.position.x, 50.0);
}

// --- snap (combined) ---

#[test]
fn shape_snap_takes_precedence_over_grid() {
    // Shape edge at 53; grid line at 60. Point at 56 is 3 from the edge
    // and 4 from the grid — but shape snap wins regardless per axis.
    let doc = store_of(vec![rect_shape(3.0, 300.0, 100.0, 80.0)]);
    let r = snap(Point::new(56.0, 0.0), &doc, 20.0, 8.0, &no_exclusions());
    assert_eq!(r.position.x, 53.0);
    assert_eq!(r.source_x, Some(SnapSource::ShapeEdge));
    // y has no shape target in range; grid fills in.
    assert!(r.snapped_y);
    assert_eq!(r.position.y, 0.0);
    assert_eq!(r.source_y, Some(SnapSource::Grid));
}

#[test]
fn grid_fills_unsnapped_axes_only() {
    let doc = store_of(Vec::new());
    let r = snap(Point::new(19.0, 7.0), &doc, 20.0, 5.0, &no_exclusions());
    assert!(r.snapped_x);
    assert_eq!(r.position.x, 20.0);
    assert!(!r.snapped_y);
    assert_eq!(r.position.y, 7.0);
}

// --- snap_bounds ---

#[test]
fn bounds_snap_aligns_moving_edge_to_target_edge() {
    // Static rect: edges at x = 100 and 200.
    let doc = store_of(vec![rect_shape(150.0, 0.0, 100.0, 80.0)]);
    // Moving box 40 wide whose right edge sits at 97: 3 away from 100.
    let moving = Bounds::new(57.0, 200.0, 97.0, 240.0);
    let center = moving.center();
    let r = snap_bounds(&moving, center, &doc, 0.0, 8.0, &no_exclusions());
    assert!(r.snapped_x);
    // Center shifts by the same +3 delta that aligns the edge.
    assert_eq!(r.position.x, center.x + 3.0);
    assert_eq!(r.line_x, Some(100.0));
    assert_eq!(r.source_x, Some(SnapSource::ShapeEdge));
}

#[test]
fn bounds_snap_center_to_center() {
    let doc = store_of(vec![rect_shape(0.0, 0.0, 100.0, 80.0)]);
    // Moving box centered at (2, 300): center-to-center x delta is -2.
    let moving = Bounds::from_center(Point::new(2.0, 300.0), 10.0, 10.0);
    let r = snap_bounds(&moving, moving.center(), &doc, 0.0, 8.0, &no_exclusions());
    assert!(r.snapped_x);
    assert_eq!(r.position.x, 0.0);
    assert_eq!(r.source_x, Some(SnapSource::ShapeCenter));
}

#[test]
fn bounds_snap_uses_grid_when_no_shape_in_range() {
    let doc = store_of(Vec::new());
    // Left edge at 18 is 2 from the 20 grid line.
    let moving = Bounds::new(18.0, 500.0, 58.0, 540.0);
    let center = moving.center();
    let r = snap_bounds(&moving, center, &doc, 20.0, 5.0, &no_exclusions());
    assert!(r.snapped_x);
    assert_eq!(r.position.x, center.x + 2.0);
    assert_eq!(r.source_x, Some(SnapSource::Grid));
}

#[test]
fn bounds_snap_nothing_in_range_returns_center() {
    let doc = store_of(Vec::new());
    let moving = Bounds::new(7.3, 9.1, 12.3, 14.1);
    let center = moving.center();
    let r = snap_bounds(&moving, center, &doc, 0.0, 2.0, &no_exclusions());
    assert!(!r.snapped_x);
    assert!(!r.snapped_y);
    assert_eq!(r.position, center);
}

#[test]
fn bounds_snap_excludes_moving_shapes() {
    let stationary = rect_shape(0.0, 0.0, 100.0, 80.0);
    let moving_shape = rect_shape(300.0, 0.0, 40.0, 40.0);
    let mut exclude = HashSet::new();
    exclude.insert(moving_shape.id);
    let moving_bounds = moving_shape.bounds().unwrap();
    let doc = store_of(vec![stationary, moving_shape]);
    // The moving shape's own edges must not attract it.
    let r = snap_bounds(
        &moving_bounds,
        moving_bounds.center(),
        &doc,
        0.0,
        8.0,
        &exclude,
    );
    assert!(!r.snapped_x);
    assert!(!r.snapped_y);
}

#[test]
fn snapping_is_pure() {
    let doc = store_of(vec![rect_shape(0.0, 0.0, 100.0, 80.0)]);
    let before: Vec<Shape> = doc.sorted_shapes().into_iter().cloned().collect();
    let _unused = snap(Point::new(49.0, 39.0), &doc, 20.0, 8.0, &no_exclusions());
    let after: Vec<Shape> = doc.sorted_shapes().into_iter().cloned().collect();
    assert_eq!(before, after);
}
