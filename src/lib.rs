//! Chompo - a hungry monster that watches your cursor
//!
//! Core modules:
//! - `gaze`: Pupil offsets that make the eyes follow the pointer
//! - `sim`: Scene state (layout, food, physics world, drag and drop, chomping)
//! - `view`: CSS transforms the DOM layer applies every frame
//! - `settings`: Tunables with optional page-supplied overrides

pub mod gaze;
pub mod settings;
pub mod sim;
pub mod view;

pub use gaze::{EyeSide, GazeTracker, PupilOffsets, SocketRect, compute_offset};
pub use settings::{ConfigError, Settings};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Toy configuration constants
pub mod consts {
    /// How far pupils can move from their socket centre (pixels)
    pub const MAX_OFFSET: f32 = 10.0;

    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest frame delta fed to the clock (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Chompo sprite size (square, pixels)
    pub const CHOMPO_SIZE: f32 = 256.0;
    /// Eye socket size (square, pixels)
    pub const EYE_SOCKET_SIZE: f32 = 40.0;
    /// Socket top-left corners inside the sprite
    pub const LEFT_SOCKET_ORIGIN: (f32, f32) = (80.0, 90.0);
    pub const RIGHT_SOCKET_ORIGIN: (f32, f32) = (156.0, 90.0);
    /// Pupil sprite size (square, pixels)
    pub const PUPIL_SIZE: f32 = 24.0;

    /// Mouth rectangle inside the sprite: (left, top, width, height)
    pub const MOUTH_RECT: (f32, f32, f32, f32) = (78.0, 150.0, 100.0, 60.0);

    /// Fraction of the viewport height (from the top) where food lives
    pub const PLAY_AREA_FRACTION: f32 = 0.7;

    /// Thickness of the invisible floor and walls (pixels)
    pub const BOUNDARY_THICKNESS: f32 = 40.0;
}

/// Axis-aligned rectangle in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rect of the given size centred on a point
    pub fn centered_at(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left && point.x <= self.right() && point.y >= self.top && point.y <= self.bottom()
    }

    /// Same rect shifted by `delta`
    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.left + delta.x, self.top + delta.y, self.width, self.height)
    }
}

/// Visible browser area in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True if the point lies inside the viewport
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}
