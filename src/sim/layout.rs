//! Screen placement of Chompo and the play area
//!
//! Chompo is a fixed-size sprite centred horizontally and resting on the
//! bottom edge of the viewport. Eye sockets and the mouth are defined in
//! sprite coordinates and reported here in screen coordinates.

use glam::Vec2;

use crate::consts::*;
use crate::{Rect, Viewport};
use crate::gaze::EyeSide;

/// Screen-space rects derived from the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChompoLayout {
    pub viewport: Viewport,
    /// Sprite bounds
    pub body: Rect,
    pub left_socket: Rect,
    pub right_socket: Rect,
    pub mouth: Rect,
    /// Region where food spawns and plays (top of the viewport)
    pub play_area: Rect,
}

impl ChompoLayout {
    pub fn for_viewport(viewport: Viewport) -> Self {
        let origin = Vec2::new(
            viewport.width / 2.0 - CHOMPO_SIZE / 2.0,
            viewport.height - CHOMPO_SIZE,
        );
        let body = Rect::new(origin.x, origin.y, CHOMPO_SIZE, CHOMPO_SIZE);

        let socket = |(x, y): (f32, f32)| {
            Rect::new(origin.x + x, origin.y + y, EYE_SOCKET_SIZE, EYE_SOCKET_SIZE)
        };
        let (mx, my, mw, mh) = MOUTH_RECT;

        Self {
            viewport,
            body,
            left_socket: socket(LEFT_SOCKET_ORIGIN),
            right_socket: socket(RIGHT_SOCKET_ORIGIN),
            mouth: Rect::new(origin.x + mx, origin.y + my, mw, mh),
            play_area: Rect::new(0.0, 0.0, viewport.width, viewport.height * PLAY_AREA_FRACTION),
        }
    }

    pub fn socket(&self, side: EyeSide) -> Rect {
        match side {
            EyeSide::Left => self.left_socket,
            EyeSide::Right => self.right_socket,
        }
    }

    /// Resting position of a pupil inside its socket (top-left, socket-local)
    pub fn pupil_rest() -> Vec2 {
        let inset = (EYE_SOCKET_SIZE - PUPIL_SIZE) / 2.0;
        Vec2::splat(inset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_bottom_center() {
        let layout = ChompoLayout::for_viewport(Viewport::new(800.0, 600.0));
        assert_eq!(layout.body, Rect::new(272.0, 344.0, 256.0, 256.0));
        assert_eq!(layout.left_socket, Rect::new(352.0, 434.0, 40.0, 40.0));
        assert_eq!(layout.right_socket, Rect::new(428.0, 434.0, 40.0, 40.0));
        assert_eq!(layout.mouth, Rect::new(350.0, 494.0, 100.0, 60.0));
        assert_eq!(layout.play_area.height, 420.0);
    }

    #[test]
    fn test_layout_follows_viewport() {
        let layout = ChompoLayout::for_viewport(Viewport::new(1000.0, 700.0));
        let mid = layout.viewport.width / 2.0;
        assert!((layout.mouth.center().x - mid).abs() < 1e-3);
        assert_eq!(layout.body.bottom(), 700.0);

        let l = layout.socket(EyeSide::Left);
        let r = layout.socket(EyeSide::Right);
        assert_eq!(l.top, r.top);
        assert!(l.center().x < r.center().x);
    }

    #[test]
    fn test_pupil_rest_is_centered() {
        assert_eq!(ChompoLayout::pupil_rest(), Vec2::splat(8.0));
    }
}
