//! Collection of displayed images and the gestures that transform them

use crate::geometry::Point;
use crate::loader::{ImageData, LoadError};
use crate::transform::Transform;
use crate::{OverlayError, OverlayResult};
use log::{debug, info};
use std::fmt;
use std::path::Path;

/// Mouse wheel units per detent
pub const WHEEL_DELTA: f64 = 120.0;

/// Stable handle to an image in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub usize);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One displayed image
#[derive(Debug, Clone)]
pub struct ImageEntry {
    pub image: ImageData,
    pub transform: Transform,
}

impl ImageEntry {
    pub fn new(image: ImageData) -> Self {
        Self {
            image,
            transform: Transform::default(),
        }
    }

    /// Natural size as a vector
    pub fn size(&self) -> Point {
        Point::new(self.image.width as f64, self.image.height as f64)
    }

    /// Corners in overlay coordinates: top-left, top-right, bottom-left, bottom-right
    pub fn corners(&self) -> [Point; 4] {
        let size = self.size();
        [
            Point::ZERO,
            Point::new(size.x, 0.0),
            Point::new(0.0, size.y),
            size,
        ]
        .map(|p| self.transform.to_overlay(p, size))
    }

    /// Overlay position of the rotate thumb (top-right corner)
    pub fn rotate_handle(&self) -> Point {
        self.corners()[1]
    }

    pub fn contains(&self, point: Point) -> bool {
        let size = self.size();
        let local = self.transform.to_local(point, size);
        (0.0..=size.x).contains(&local.x) && (0.0..=size.y).contains(&local.y)
    }
}

/// State captured when a rotate drag starts
#[derive(Debug, Clone, Copy, PartialEq)]
struct RotateGesture {
    id: ImageId,
    center: Point,
    /// Degrees between the thumb and the horizontal axis through the center
    initial_offset: f64,
}

/// Append-only set of images shown by the overlay
#[derive(Debug, Default)]
pub struct Scene {
    entries: Vec<ImageEntry>,
    rotation: Option<RotateGesture>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: ImageId) -> Option<&ImageEntry> {
        self.entries.get(id.0)
    }

    /// Entries in paint order (bottom first)
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (ImageId, &ImageEntry)> {
        self.entries.iter().enumerate().map(|(i, e)| (ImageId(i), e))
    }

    fn entry_mut(&mut self, id: ImageId) -> OverlayResult<&mut ImageEntry> {
        self.entries
            .get_mut(id.0)
            .ok_or(OverlayError::UnknownImage(id))
    }

    /// Decode `path` and append it with an identity transform.
    /// On error the scene is left untouched.
    pub fn load_image(&mut self, path: &Path) -> Result<ImageId, LoadError> {
        let image = ImageData::load(path)?;
        let id = ImageId(self.entries.len());
        info!(
            "loaded {} as {} ({}x{})",
            path.display(),
            id,
            image.width,
            image.height
        );
        self.entries.push(ImageEntry::new(image));
        Ok(id)
    }

    /// Topmost image under `point`
    pub fn hit_test(&self, point: Point) -> Option<ImageId> {
        self.iter()
            .rev()
            .find(|(_, entry)| entry.contains(point))
            .map(|(id, _)| id)
    }

    /// Topmost image whose rotate thumb lies within `radius` of `point`
    pub fn rotate_handle_at(&self, point: Point, radius: f64) -> Option<ImageId> {
        self.iter()
            .rev()
            .find(|(_, entry)| (entry.rotate_handle() - point).length() <= radius)
            .map(|(id, _)| id)
    }

    /// Start a rotate drag on `id`
    pub fn begin_rotate(&mut self, id: ImageId) -> OverlayResult<()> {
        let entry = self.get(id).ok_or(OverlayError::UnknownImage(id))?;
        let half_w = entry.image.width as f64 / 2.0;
        let half_h = entry.image.height as f64 / 2.0;

        let initial_offset = if half_w > 0.0 {
            (half_h / half_w).atan().to_degrees()
        } else {
            0.0
        };

        self.rotation = Some(RotateGesture {
            id,
            center: Point::new(half_w, half_h),
            initial_offset,
        });
        Ok(())
    }

    /// Set the angle so the rotate thumb follows `pointer` (overlay coordinates).
    ///
    /// The angle is zeroed first so the pointer is measured in the unrotated
    /// image frame; the result is absolute, not an increment.
    pub fn drag_rotate(&mut self, id: ImageId, pointer: Point) -> OverlayResult<()> {
        let gesture = match self.rotation {
            Some(gesture) if gesture.id == id => gesture,
            _ => {
                debug!("rotate drag on {} without begin_rotate", id);
                return Ok(());
            }
        };

        let entry = self.entry_mut(id)?;
        let size = entry.size();
        entry.transform.angle = 0.0;

        let pos = entry.transform.to_local(pointer, size);
        let angle = (pos.y - gesture.center.y)
            .atan2(pos.x - gesture.center.x)
            .to_degrees()
            + gesture.initial_offset;
        entry.transform.angle = angle;
        Ok(())
    }

    pub fn end_rotate(&mut self) {
        self.rotation = None;
    }

    /// Double click on the rotate thumb
    pub fn double_click_rotate_reset(&mut self, id: ImageId) -> OverlayResult<()> {
        self.entry_mut(id)?.transform.angle = 0.0;
        Ok(())
    }

    /// Move by `delta`, given in the image's own (scaled, rotated) frame
    pub fn drag_move(&mut self, id: ImageId, delta: Point) -> OverlayResult<()> {
        let transform = &mut self.entry_mut(id)?.transform;
        let change = transform.to_overlay_vector(delta);
        transform.offset += change;
        Ok(())
    }

    /// Mouse wheel over an image: scale with `modifier`, opacity otherwise.
    /// `delta` is in wheel units ([`WHEEL_DELTA`] per detent).
    pub fn scroll_adjust(&mut self, id: ImageId, delta: f64, modifier: bool) -> OverlayResult<()> {
        let entry = self.entry_mut(id)?;
        if !delta.is_finite() {
            return Ok(());
        }

        if modifier {
            let width = entry.image.width as f64;
            let factor = (width + delta / 5.0) / width;
            if !factor.is_finite() || factor <= 0.0 {
                debug!("ignoring scale factor {} for {}", factor, id);
                return Ok(());
            }
            entry.transform.scale_x *= factor;
            entry.transform.scale_y *= factor;
        } else {
            let opacity = entry.transform.opacity + delta / 2000.0;
            entry.transform.set_opacity(opacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{MAX_OPACITY, MIN_OPACITY};
    use std::path::PathBuf;

    fn scene_with(width: u32, height: u32) -> (Scene, ImageId) {
        let mut scene = Scene::new();
        scene.entries.push(ImageEntry::new(ImageData {
            path: PathBuf::from("mem.png"),
            width,
            height,
            rgba: vec![0; (width * height * 4) as usize],
        }));
        (scene, ImageId(0))
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn opacity_stays_within_bounds() {
        let (mut scene, id) = scene_with(100, 100);

        scene.scroll_adjust(id, -10_000.0, false).unwrap();
        assert_eq!(scene.get(id).unwrap().transform.opacity, MIN_OPACITY);

        scene.scroll_adjust(id, 10_000.0, false).unwrap();
        assert_eq!(scene.get(id).unwrap().transform.opacity, MAX_OPACITY);

        scene.scroll_adjust(id, -WHEEL_DELTA, false).unwrap();
        assert!(close(scene.get(id).unwrap().transform.opacity, 0.94));
    }

    #[test]
    fn modifier_scroll_scales_by_width_ratio() {
        let (mut scene, id) = scene_with(240, 100);
        scene.scroll_adjust(id, WHEEL_DELTA, true).unwrap();

        let t = scene.get(id).unwrap().transform;
        assert!(close(t.scale_x, 1.1));
        assert!(close(t.scale_y, 1.1));
        assert_eq!(t.opacity, 1.0);
    }

    #[test]
    fn collapsing_scale_is_ignored() {
        let (mut scene, id) = scene_with(10, 10);
        scene.scroll_adjust(id, -10_000.0, true).unwrap();
        assert_eq!(scene.get(id).unwrap().transform.scale_x, 1.0);
    }

    #[test]
    fn rotate_reset_zeroes_any_angle() {
        let (mut scene, id) = scene_with(50, 30);
        for angle in [-720.0, -45.0, 0.0, 13.5, 359.0] {
            scene.entries[0].transform.angle = angle;
            scene.double_click_rotate_reset(id).unwrap();
            assert_eq!(scene.get(id).unwrap().transform.angle, 0.0);
        }
    }

    #[test]
    fn grabbing_thumb_without_moving_keeps_angle() {
        let (mut scene, id) = scene_with(200, 100);
        scene.begin_rotate(id).unwrap();
        let handle = scene.get(id).unwrap().rotate_handle();
        scene.drag_rotate(id, handle).unwrap();
        assert!(close(scene.get(id).unwrap().transform.angle, 0.0));
    }

    #[test]
    fn rotate_follows_pointer_absolutely() {
        let (mut scene, id) = scene_with(100, 100);
        scene.begin_rotate(id).unwrap();

        // Straight right of the center is 45 degrees past the top-right thumb.
        scene.drag_rotate(id, Point::new(150.0, 50.0)).unwrap();
        assert!(close(scene.get(id).unwrap().transform.angle, 45.0));

        // Repeating the same pointer does not accumulate.
        scene.drag_rotate(id, Point::new(150.0, 50.0)).unwrap();
        assert!(close(scene.get(id).unwrap().transform.angle, 45.0));
    }

    #[test]
    fn rotate_without_begin_is_a_no_op() {
        let (mut scene, id) = scene_with(100, 100);
        scene.entries[0].transform.angle = 30.0;
        scene.drag_rotate(id, Point::new(0.0, 0.0)).unwrap();
        assert_eq!(scene.get(id).unwrap().transform.angle, 30.0);

        scene.begin_rotate(id).unwrap();
        scene.end_rotate();
        scene.drag_rotate(id, Point::new(0.0, 0.0)).unwrap();
        assert_eq!(scene.get(id).unwrap().transform.angle, 30.0);
    }

    #[test]
    fn move_delta_follows_rotation_and_scale() {
        let (mut scene, id) = scene_with(100, 100);
        scene.entries[0].transform.angle = 90.0;
        scene.entries[0].transform.scale_x = 2.0;
        scene.entries[0].transform.scale_y = 2.0;

        scene.drag_move(id, Point::new(10.0, 0.0)).unwrap();
        let offset = scene.get(id).unwrap().transform.offset;
        assert!(close(offset.x, 0.0));
        assert!(close(offset.y, 20.0));
    }

    #[test]
    fn hit_test_prefers_topmost_and_respects_rotation() {
        let (mut scene, first) = scene_with(100, 20);
        let copy = scene.entries[0].clone();
        scene.entries.push(copy);
        let second = ImageId(1);
        scene.entries[1].transform.offset = Point::new(50.0, 0.0);

        assert_eq!(scene.hit_test(Point::new(60.0, 10.0)), Some(second));
        assert_eq!(scene.hit_test(Point::new(10.0, 10.0)), Some(first));
        assert_eq!(scene.hit_test(Point::new(10.0, 40.0)), None);

        // A quarter turn makes the first image tall around its center (50, 10).
        scene.entries[0].transform.angle = 90.0;
        assert_eq!(scene.hit_test(Point::new(45.0, 50.0)), Some(first));
    }

    #[test]
    fn unknown_id_is_an_error() {
        let mut scene = Scene::new();
        let err = scene.drag_move(ImageId(3), Point::ZERO).unwrap_err();
        assert!(matches!(err, OverlayError::UnknownImage(ImageId(3))));
        assert!(scene.begin_rotate(ImageId(0)).is_err());
    }
}
