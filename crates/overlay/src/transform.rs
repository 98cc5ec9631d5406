//! Per-image visual transform

use crate::geometry::Point;

pub const MIN_OPACITY: f64 = 0.1;
pub const MAX_OPACITY: f64 = 1.0;

/// Position, rotation, scale and opacity of one displayed image.
///
/// Rotation and scale pivot on the image center; `offset` is the
/// overlay position of the unrotated, unscaled top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub offset: Point,
    /// Degrees, clockwise on screen
    pub angle: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub opacity: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            offset: Point::ZERO,
            angle: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            opacity: MAX_OPACITY,
        }
    }
}

impl Transform {
    /// Map a vector from the image frame to the overlay frame.
    /// Scale is applied first, then rotation.
    pub fn to_overlay_vector(&self, v: Point) -> Point {
        v.scaled(self.scale_x, self.scale_y).rotated(self.angle)
    }

    /// Inverse of [`Transform::to_overlay_vector`]
    pub fn to_local_vector(&self, v: Point) -> Point {
        v.rotated(-self.angle)
            .scaled(1.0 / self.scale_x, 1.0 / self.scale_y)
    }

    /// Map a point of an image of `size` (w, h) to overlay coordinates
    pub fn to_overlay(&self, local: Point, size: Point) -> Point {
        let center = size.scaled(0.5, 0.5);
        self.offset + center + self.to_overlay_vector(local - center)
    }

    /// Map an overlay point back into the frame of an image of `size`
    pub fn to_local(&self, overlay: Point, size: Point) -> Point {
        let center = size.scaled(0.5, 0.5);
        center + self.to_local_vector(overlay - self.offset - center)
    }

    /// Clamp and store a new opacity
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity.clamp(MIN_OPACITY, MAX_OPACITY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn identity_maps_local_to_offset_space() {
        let t = Transform {
            offset: Point::new(10.0, 20.0),
            ..Default::default()
        };
        let size = Point::new(100.0, 50.0);
        assert!(approx(t.to_overlay(Point::ZERO, size), Point::new(10.0, 20.0)));
    }

    #[test]
    fn rotation_pivots_on_center() {
        let t = Transform {
            angle: 180.0,
            ..Default::default()
        };
        let size = Point::new(100.0, 50.0);
        let mapped = t.to_overlay(Point::ZERO, size);
        assert!(approx(mapped, Point::new(100.0, 50.0)));
        assert!(approx(t.to_overlay(Point::new(50.0, 25.0), size), Point::new(50.0, 25.0)));
    }

    #[test]
    fn to_local_inverts_to_overlay() {
        let t = Transform {
            offset: Point::new(-30.0, 12.5),
            angle: 37.0,
            scale_x: 1.5,
            scale_y: 1.5,
            opacity: 0.4,
        };
        let size = Point::new(64.0, 48.0);
        let local = Point::new(5.0, 40.0);
        assert!(approx(t.to_local(t.to_overlay(local, size), size), local));
    }

    #[test]
    fn opacity_is_clamped() {
        let mut t = Transform::default();
        t.set_opacity(-3.0);
        assert_eq!(t.opacity, MIN_OPACITY);
        t.set_opacity(7.0);
        assert_eq!(t.opacity, MAX_OPACITY);
    }
}
