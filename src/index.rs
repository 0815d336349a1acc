//! Spatial index: quadtree over shape bounding boxes.
//!
//! The index is a derived cache of [`Shape::bounds`], never the source of
//! truth. Callers keep it in sync with the store (insert-on-create,
//! update-on-move, remove-on-delete) and treat query results as candidate
//! sets only; precise geometry tests live in [`crate::hit`].
//!
//! Items are stored at the deepest node that fully contains them, with a
//! keyed entry map alongside the tree for O(1) membership checks and
//! removals. The root grows by doubling when a shape lands outside it, so
//! the infinite canvas never needs a preconfigured world size.

#[cfg(test)]
#[path = "index_test.rs"]
mod index_test;

use std::collections::HashMap;

use crate::camera::Point;
use crate::consts::{QUADTREE_MAX_DEPTH, QUADTREE_NODE_CAPACITY};
use crate::doc::{Bounds, Shape, ShapeId};

/// Half-extent of the initial root node, in world units.
const INITIAL_ROOT_HALF: f64 = 1024.0;

struct Node {
    boundary: Bounds,
    depth: usize,
    items: Vec<(ShapeId, Bounds)>,
    children: Option<Box<[Node; 4]>>,
}

impl Node {
    fn new(boundary: Bounds, depth: usize) -> Self {
        Self { boundary, depth, items: Vec::new(), children: None }
    }

    fn insert(&mut self, id: ShapeId, bounds: Bounds) {
        if let Some(children) = &mut self.children {
            for child in children.iter_mut() {
                if child.boundary.contains(&bounds) {
                    child.insert(id, bounds);
                    return;
                }
            }
            self.items.push((id, bounds));
            return;
        }
        self.items.push((id, bounds));
        if self.items.len() > QUADTREE_NODE_CAPACITY && self.depth < QUADTREE_MAX_DEPTH {
            self.subdivide();
        }
    }

    fn subdivide(&mut self) {
        let b = &self.boundary;
        let center = b.center();
        let depth = self.depth + 1;
        let quads = [
            Bounds::new(b.min_x, b.min_y, center.x, center.y),
            Bounds::new(center.x, b.min_y, b.max_x, center.y),
            Bounds::new(b.min_x, center.y, center.x, b.max_y),
            Bounds::new(center.x, center.y, b.max_x, b.max_y),
        ];
        let mut children = Box::new(quads.map(|q| Node::new(q, depth)));
        let items = std::mem::take(&mut self.items);
        for (id, bounds) in items {
            let target = children.iter_mut().find(|c| c.boundary.contains(&bounds));
            match target {
                Some(child) => child.insert(id, bounds),
                None => self.items.push((id, bounds)),
            }
        }
        self.children = Some(children);
    }

    /// Remove an item by walking the same containment path `insert` used.
    fn remove(&mut self, id: &ShapeId, bounds: &Bounds) -> bool {
        if let Some(pos) = self.items.iter().position(|(item_id, _)| item_id == id) {
            self.items.swap_remove(pos);
            return true;
        }
        if let Some(children) = &mut self.children {
            for child in children.iter_mut() {
                if child.boundary.contains(bounds) {
                    return child.remove(id, bounds);
                }
            }
        }
        false
    }

    fn query_point(&self, p: Point, out: &mut Vec<ShapeId>) {
        for (id, bounds) in &self.items {
            if bounds.contains_point(p) {
                out.push(*id);
            }
        }
        if let Some(children) = &self.children {
            for child in children.iter() {
                if child.boundary.contains_point(p) {
                    child.query_point(p, out);
                }
            }
        }
    }

    fn query_rect(&self, rect: &Bounds, out: &mut Vec<ShapeId>) {
        for (id, bounds) in &self.items {
            if bounds.intersects(rect) {
                out.push(*id);
            }
        }
        if let Some(children) = &self.children {
            for child in children.iter() {
                if child.boundary.intersects(rect) {
                    child.query_rect(rect, out);
                }
            }
        }
    }
}

/// Quadtree spatial index over shape bounding boxes.
pub struct SpatialIndex {
    root: Node,
    entries: HashMap<ShapeId, Bounds>,
}

impl SpatialIndex {
    /// Create an empty index covering the initial world window.
    #[must_use]
    pub fn new() -> Self {
        let half = INITIAL_ROOT_HALF;
        Self {
            root: Node::new(Bounds::new(-half, -half, half, half), 0),
            entries: HashMap::new(),
        }
    }

    /// Number of indexed shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a shape id is currently indexed.
    #[must_use]
    pub fn contains(&self, id: &ShapeId) -> bool {
        self.entries.contains_key(id)
    }

    /// The indexed bounding box for a shape, if any.
    #[must_use]
    pub fn bounds_of(&self, id: &ShapeId) -> Option<Bounds> {
        self.entries.get(id).copied()
    }

    /// Index a shape's current bounds. A shape with no computable bounds
    /// (an empty group) is skipped.
    pub fn insert(&mut self, shape: &Shape) {
        let Some(bounds) = shape.bounds() else {
            tracing::debug!(id = %shape.id, "skipping unindexable shape");
            return;
        };
        self.insert_bounds(shape.id, bounds);
    }

    /// Re-index a shape after a geometry change. Remove-then-reinsert;
    /// tolerant of the shape not yet being indexed.
    pub fn update(&mut self, shape: &Shape) {
        self.remove(&shape.id);
        self.insert(shape);
    }

    /// Drop a shape from the index. A no-op for unknown ids.
    pub fn remove(&mut self, id: &ShapeId) {
        if let Some(bounds) = self.entries.remove(id) {
            self.root.remove(id, &bounds);
        }
    }

    /// Discard everything and re-index the given shapes in one pass.
    pub fn rebuild<'a>(&mut self, shapes: impl IntoIterator<Item = &'a Shape>) {
        self.entries.clear();
        self.root = Node::new(self.root.boundary, 0);
        for shape in shapes {
            self.insert(shape);
        }
    }

    /// Ids of all indexed boxes containing `p` (boundary inclusive).
    #[must_use]
    pub fn query_point(&self, p: Point) -> Vec<ShapeId> {
        let mut out = Vec::new();
        self.root.query_point(p, &mut out);
        out
    }

    /// Ids of all indexed boxes intersecting `rect` (touching edges count).
    #[must_use]
    pub fn query_rect(&self, rect: &Bounds) -> Vec<ShapeId> {
        let mut out = Vec::new();
        self.root.query_rect(rect, &mut out);
        out
    }

    fn insert_bounds(&mut self, id: ShapeId, bounds: Bounds) {
        let finite = bounds.min_x.is_finite()
            && bounds.min_y.is_finite()
            && bounds.max_x.is_finite()
            && bounds.max_y.is_finite();
        if !finite {
            tracing::debug!(id = %id, "skipping shape with non-finite bounds");
            return;
        }
        // Re-inserting an indexed id must not leave a stale copy behind.
        if let Some(old) = self.entries.get(&id).copied() {
            self.root.remove(&id, &old);
        }
        if !self.root.boundary.contains(&bounds) {
            self.grow_to(&bounds);
        }
        self.entries.insert(id, bounds);
        self.root.insert(id, bounds);
    }

    /// Double the root boundary about its center until it contains
    /// `bounds`, then rebuild the tree from the entry map. Growth is
    /// geometric, so repeated far-flung inserts amortize to O(log extent).
    fn grow_to(&mut self, bounds: &Bounds) {
        let mut boundary = self.root.boundary;
        while !boundary.contains(bounds) {
            let center = boundary.center();
            let half_w = boundary.width();
            let half_h = boundary.height();
            boundary = Bounds::from_center(center, half_w, half_h);
        }
        tracing::debug!(
            min_x = boundary.min_x,
            min_y = boundary.min_y,
            max_x = boundary.max_x,
            max_y = boundary.max_y,
            "expanding spatial index root"
        );
        self.root = Node::new(boundary, 0);
        for (id, b) in &self.entries {
            self.root.insert(*id, *b);
        }
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
