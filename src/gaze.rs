//! Gaze tracking
//!
//! Each pupil is shifted from its socket centre toward the pointer, but never
//! further than a fixed radius. Everything here is pure arithmetic on screen
//! coordinates; the caller decides when to recompute.

use glam::{DVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::consts::MAX_OFFSET;

/// Eye sockets are plain screen rects
pub type SocketRect = Rect;

/// Which eye a socket belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EyeSide {
    Left,
    Right,
}

impl EyeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            EyeSide::Left => "left",
            EyeSide::Right => "right",
        }
    }
}

/// Pupil offset for a socket using the default `MAX_OFFSET`
#[inline]
pub fn compute_offset(socket: &Rect, pointer: Vec2) -> Vec2 {
    compute_offset_with_limit(socket, pointer, MAX_OFFSET)
}

/// Pupil offset for a socket, bounded by `max_offset`
///
/// The vector from the socket centre to the pointer is returned as-is while
/// it is shorter than `max_offset` and scaled down to exactly `max_offset`
/// otherwise. A pointer sitting on the centre yields `Vec2::ZERO`.
///
/// Works in f64 so pointers far outside the f32 length range still give a
/// unit direction.
pub fn compute_offset_with_limit(socket: &Rect, pointer: Vec2, max_offset: f32) -> Vec2 {
    let center = DVec2::new(
        socket.left as f64 + socket.width as f64 / 2.0,
        socket.top as f64 + socket.height as f64 / 2.0,
    );
    let raw = pointer.as_dvec2() - center;
    let dist = raw.length();
    let denom = if dist != 0.0 { dist } else { 1.0 };
    let scale = (max_offset as f64).min(dist) / denom;
    (raw * scale).as_vec2()
}

/// Offsets for both pupils
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PupilOffsets {
    pub left: Vec2,
    pub right: Vec2,
}

impl PupilOffsets {
    /// Compute both offsets from one pointer; each eye uses its own centre
    pub fn compute(left: &Rect, right: &Rect, pointer: Vec2, max_offset: f32) -> Self {
        Self {
            left: compute_offset_with_limit(left, pointer, max_offset),
            right: compute_offset_with_limit(right, pointer, max_offset),
        }
    }

    pub fn get(&self, side: EyeSide) -> Vec2 {
        match side {
            EyeSide::Left => self.left,
            EyeSide::Right => self.right,
        }
    }
}

/// Eye sockets plus the latest pointer and the offsets derived from it
#[derive(Debug, Clone)]
pub struct GazeTracker {
    left: Rect,
    right: Rect,
    max_offset: f32,
    pointer: Vec2,
    offsets: PupilOffsets,
}

impl GazeTracker {
    /// Pointer starts at the origin, like a freshly loaded page
    pub fn new(left: Rect, right: Rect, max_offset: f32) -> Self {
        let mut tracker = Self {
            left,
            right,
            max_offset,
            pointer: Vec2::ZERO,
            offsets: PupilOffsets::default(),
        };
        tracker.recompute();
        tracker
    }

    /// Record a new pointer position and recompute both pupils
    pub fn look_at(&mut self, pointer: Vec2) -> PupilOffsets {
        self.pointer = pointer;
        self.recompute();
        self.offsets
    }

    /// Replace socket rects after a layout change, keeping the last pointer
    pub fn relayout(&mut self, left: Rect, right: Rect) -> PupilOffsets {
        self.left = left;
        self.right = right;
        self.recompute();
        self.offsets
    }

    fn recompute(&mut self) {
        self.offsets = PupilOffsets::compute(&self.left, &self.right, self.pointer, self.max_offset);
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn offsets(&self) -> PupilOffsets {
        self.offsets
    }

    pub fn max_offset(&self) -> f32 {
        self.max_offset
    }

    pub fn socket(&self, side: EyeSide) -> Rect {
        match side {
            EyeSide::Left => self.left,
            EyeSide::Right => self.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-4;

    /// 10x10 socket whose centre is (100, 100)
    fn socket_at_100() -> Rect {
        Rect::new(95.0, 95.0, 10.0, 10.0)
    }

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < EPS
    }

    #[test]
    fn test_pointer_at_center() {
        let offset = compute_offset(&socket_at_100(), Vec2::new(100.0, 100.0));
        assert_eq!(offset, Vec2::ZERO);
    }

    #[test]
    fn test_pointer_inside_radius_not_clamped() {
        let offset = compute_offset(&socket_at_100(), Vec2::new(105.0, 100.0));
        assert!(approx(offset, Vec2::new(5.0, 0.0)), "got {offset:?}");
    }

    #[test]
    fn test_pointer_far_right_clamped() {
        let offset = compute_offset(&socket_at_100(), Vec2::new(200.0, 100.0));
        assert!(approx(offset, Vec2::new(10.0, 0.0)), "got {offset:?}");
    }

    #[test]
    fn test_pointer_above_clamped_upward() {
        let offset = compute_offset(&socket_at_100(), Vec2::new(100.0, 80.0));
        assert!(approx(offset, Vec2::new(0.0, -10.0)), "got {offset:?}");
    }

    #[test]
    fn test_pointer_exactly_at_limit() {
        let offset = compute_offset(&socket_at_100(), Vec2::new(106.0, 108.0));
        assert!(approx(offset, Vec2::new(6.0, 8.0)), "got {offset:?}");
    }

    #[test]
    fn test_custom_limit() {
        let offset = compute_offset_with_limit(&socket_at_100(), Vec2::new(100.0, 200.0), 4.0);
        assert!(approx(offset, Vec2::new(0.0, 4.0)));
    }

    #[test]
    fn test_eyes_track_independently() {
        let left = Rect::new(0.0, 0.0, 40.0, 40.0);
        let right = Rect::new(100.0, 0.0, 40.0, 40.0);
        // Pointer between the eyes: they should look toward each other
        let offsets = PupilOffsets::compute(&left, &right, Vec2::new(70.0, 20.0), 10.0);
        assert!(offsets.left.x > 0.0);
        assert!(offsets.right.x < 0.0);
        assert!(approx(offsets.get(EyeSide::Left), Vec2::new(10.0, 0.0)));
        assert!(approx(offsets.get(EyeSide::Right), Vec2::new(-10.0, 0.0)));
    }

    #[test]
    fn test_tracker_starts_at_origin() {
        let tracker = GazeTracker::new(socket_at_100(), socket_at_100(), MAX_OFFSET);
        assert_eq!(tracker.pointer(), Vec2::ZERO);
        // Origin is up-left of the sockets
        let left = tracker.offsets().left;
        assert!(left.x < 0.0 && left.y < 0.0);
        assert!((left.length() - MAX_OFFSET).abs() < EPS);
    }

    #[test]
    fn test_tracker_relayout_uses_last_pointer() {
        let mut tracker = GazeTracker::new(socket_at_100(), socket_at_100(), MAX_OFFSET);
        tracker.look_at(Vec2::new(103.0, 100.0));
        assert!(approx(tracker.offsets().left, Vec2::new(3.0, 0.0)));

        // Sockets move 200px right: pointer is now far to their left
        let moved = socket_at_100().translated(Vec2::new(200.0, 0.0));
        let offsets = tracker.relayout(moved, moved);
        assert!(approx(offsets.left, Vec2::new(-10.0, 0.0)));
        assert_eq!(tracker.socket(EyeSide::Right), moved);
    }

    #[test]
    fn test_rect_helpers() {
        let rect = Rect::centered_at(Vec2::new(50.0, 60.0), 20.0, 10.0);
        assert_eq!(rect, Rect::new(40.0, 55.0, 20.0, 10.0));
        assert_eq!(rect.center(), Vec2::new(50.0, 60.0));
        assert!(rect.contains(Vec2::new(59.0, 64.0)));
        assert!(!rect.contains(Vec2::new(61.0, 60.0)));
    }

    #[test]
    fn test_huge_pointer_keeps_direction() {
        let s = Rect::new(-20.0, -20.0, 40.0, 40.0);
        let offset = compute_offset(&s, Vec2::new(2.0e19, 0.0));
        assert!(approx(offset, Vec2::new(10.0, 0.0)), "got {offset:?}");

        let offset = compute_offset(&s, Vec2::new(f32::MAX, -f32::MAX));
        let expected = Vec2::new(1.0, -1.0).normalize() * MAX_OFFSET;
        assert!(approx(offset, expected), "got {offset:?}");
    }

    fn coord() -> impl Strategy<Value = f32> {
        -5000.0f32..5000.0
    }

    fn socket() -> impl Strategy<Value = Rect> {
        (coord(), coord(), 0.0f32..200.0, 0.0f32..200.0)
            .prop_map(|(l, t, w, h)| Rect::new(l, t, w, h))
    }

    proptest! {
        #[test]
        fn prop_offset_never_exceeds_limit(s in socket(), x in coord(), y in coord(), limit in 0.0f32..50.0) {
            let offset = compute_offset_with_limit(&s, Vec2::new(x, y), limit);
            prop_assert!(offset.length() <= limit + 1e-3);
        }

        #[test]
        fn prop_offset_points_toward_pointer(s in socket(), x in coord(), y in coord()) {
            let pointer = Vec2::new(x, y);
            let raw = pointer - s.center();
            prop_assume!(raw.length() > 1e-2);
            let offset = compute_offset(&s, pointer);
            // Collinear and same direction
            let cross = raw.perp_dot(offset) / raw.length();
            prop_assert!(cross.abs() < 1e-2);
            prop_assert!(raw.dot(offset) > 0.0);
        }

        #[test]
        fn prop_close_pointer_is_unchanged(s in socket(), dx in -7.0f32..7.0, dy in -7.0f32..7.0) {
            let pointer = s.center() + Vec2::new(dx, dy);
            let offset = compute_offset(&s, pointer);
            prop_assert!((offset - (pointer - s.center())).length() < 2e-3);
        }
    }
}
