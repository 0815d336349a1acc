//! Camera: pan/zoom viewport state and screen↔world coordinate conversion.
//!
//! The camera maps an infinite world plane onto a finite screen viewport.
//! `x` / `y` is the world point that projects to the screen center, which
//! keeps zooming symmetric around the viewport regardless of pan. All zoom
//! mutations clamp to [`MIN_ZOOM`, `MAX_ZOOM`]; no camera operation fails.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_ZOOM, MIN_ZOOM, ZOOM_SNAP_EPSILON};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This point rotated by `angle` radians around the origin.
    ///
    /// Positive angles rotate clockwise in the y-down world frame.
    #[must_use]
    pub fn rotated(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A 2D affine transform; the implicit third row of the 3×3 matrix is `[0 0 1]`.
///
/// Applies as `x' = a·x + c·y + tx`, `y' = b·x + d·y + ty` (the Canvas2D
/// coefficient convention).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Transform {
    pub const IDENTITY: Self = Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, tx: 0.0, ty: 0.0 };

    /// Apply the transform to a point.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.tx,
            y: self.b * p.x + self.d * p.y + self.ty,
        }
    }

    /// The algebraic inverse. A singular transform inverts to the identity.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f64::EPSILON {
            return Self::IDENTITY;
        }
        let inv = 1.0 / det;
        Self {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            tx: (self.c * self.ty - self.d * self.tx) * inv,
            ty: (self.b * self.tx - self.a * self.ty) * inv,
        }
    }
}

/// Camera state for pan/zoom on the infinite canvas.
///
/// `x` / `y` is the world point mapped to the screen center, in world units.
/// `zoom` is a scale factor (1.0 = one world unit per screen pixel).
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
    pub screen_width: f64,
    pub screen_height: f64,
    target_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, zoom: 1.0, screen_width: 0.0, screen_height: 0.0, target_zoom: 1.0 }
    }
}

impl Camera {
    /// Create a camera centered on the world origin for the given viewport.
    #[must_use]
    pub fn new(screen_width: f64, screen_height: f64) -> Self {
        Self { screen_width, screen_height, ..Self::default() }
    }

    /// Update the viewport dimensions (e.g. on window resize).
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.screen_width = width;
        self.screen_height = height;
    }

    /// The screen-space center of the viewport.
    #[must_use]
    pub fn screen_center(&self) -> Point {
        Point::new(self.screen_width * 0.5, self.screen_height * 0.5)
    }

    /// Convert a screen-space point (pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        let center = self.screen_center();
        Point {
            x: self.x + (screen.x - center.x) / self.zoom,
            y: self.y + (screen.y - center.y) / self.zoom,
        }
    }

    /// Convert a world-space point to screen coordinates (pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        let center = self.screen_center();
        Point {
            x: (world.x - self.x) * self.zoom + center.x,
            y: (world.y - self.y) * self.zoom + center.y,
        }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Pan by a screen-space delta. The camera moves opposite to pointer
    /// motion, scaled by zoom, so dragging feels 1:1 in screen pixels.
    pub fn pan(&mut self, screen_delta: Point) {
        self.x -= screen_delta.x / self.zoom;
        self.y -= screen_delta.y / self.zoom;
    }

    /// Set the zoom directly, clamped. Ends any smooth-zoom animation.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.target_zoom = self.zoom;
    }

    /// Multiply the zoom by `factor`, keeping the world point under
    /// `screen_pt` stationary on screen. Ends any smooth-zoom animation.
    pub fn zoom_at(&mut self, screen_pt: Point, factor: f64) {
        self.apply_zoom_at(screen_pt, factor);
        self.target_zoom = self.zoom;
    }

    fn apply_zoom_at(&mut self, screen_pt: Point, factor: f64) {
        let before = self.screen_to_world(screen_pt);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let after = self.screen_to_world(screen_pt);
        self.x += before.x - after.x;
        self.y += before.y - after.y;
    }

    /// Center the viewport on `bounds` and zoom so it fits with `padding`
    /// screen pixels on every side. Degenerate (zero-area) bounds only
    /// recenter; the zoom is left unchanged.
    pub fn zoom_to_fit(&mut self, bounds: &crate::doc::Bounds, padding: f64) {
        let center = bounds.center();
        self.x = center.x;
        self.y = center.y;
        let (w, h) = (bounds.width(), bounds.height());
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let avail_w = self.screen_width - padding * 2.0;
        let avail_h = self.screen_height - padding * 2.0;
        if avail_w <= 0.0 || avail_h <= 0.0 {
            return;
        }
        self.zoom = (avail_w / w).min(avail_h / h).clamp(MIN_ZOOM, MAX_ZOOM);
        self.target_zoom = self.zoom;
    }

    /// The world→screen matrix, `Translate(screen_center) · Scale(zoom) ·
    /// Translate(-camera)`. Consumed verbatim by the renderer.
    #[must_use]
    pub fn transform(&self) -> Transform {
        let center = self.screen_center();
        Transform {
            a: self.zoom,
            b: 0.0,
            c: 0.0,
            d: self.zoom,
            tx: center.x - self.x * self.zoom,
            ty: center.y - self.y * self.zoom,
        }
    }

    /// The screen→world matrix; inverse of [`Camera::transform`].
    #[must_use]
    pub fn inverse_transform(&self) -> Transform {
        self.transform().inverse()
    }

    // ── Smooth zoom ─────────────────────────────────────────────

    /// Store a clamped zoom target for [`Camera::update_zoom`] to approach.
    pub fn set_target_zoom(&mut self, zoom: f64) {
        self.target_zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// The zoom level a smooth-zoom animation is approaching.
    #[must_use]
    pub fn target_zoom(&self) -> f64 {
        self.target_zoom
    }

    /// Advance the smooth-zoom animation one step, interpolating the zoom
    /// toward the target by `smoothing` (0..1) and re-anchoring at
    /// `screen_pt`. Returns `true` while the animation is still running;
    /// within [`ZOOM_SNAP_EPSILON`] of the target it snaps exactly and ends.
    pub fn update_zoom(&mut self, screen_pt: Point, smoothing: f64) -> bool {
        let diff = self.target_zoom - self.zoom;
        if diff.abs() < ZOOM_SNAP_EPSILON {
            if diff != 0.0 {
                let target = self.target_zoom;
                self.apply_zoom_at(screen_pt, target / self.zoom);
                self.zoom = target;
            }
            return false;
        }
        let next = self.zoom + diff * smoothing;
        self.apply_zoom_at(screen_pt, next / self.zoom);
        true
    }
}
