//! View model
//!
//! A `Frame` is everything the DOM layer needs to redraw: pupil offsets,
//! Chompo's scale and one transform per food sprite. It is captured from the
//! scene once per animation frame and turned into CSS `transform` strings.

use glam::Vec2;

use crate::gaze::{EyeSide, PupilOffsets};
use crate::sim::{DragState, FoodKind, Scene};

/// CSS transform for a pupil shifted by `offset`
pub fn pupil_transform(offset: Vec2) -> String {
    format!("translate({:.2}px, {:.2}px)", offset.x, offset.y)
}

/// CSS transform for the Chompo sprite (horizontally centred on its anchor)
pub fn chompo_transform(scale: f32) -> String {
    format!("translateX(-50%) scale({:.3})", scale)
}

/// One food sprite, positioned by its top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodSprite {
    pub id: u32,
    pub kind: FoodKind,
    /// Body centre in screen pixels
    pub center: Vec2,
    /// Clockwise rotation (radians)
    pub angle: f32,
    pub size: Vec2,
}

impl FoodSprite {
    pub fn top_left(&self) -> Vec2 {
        self.center - self.size / 2.0
    }

    /// Sprites rotate around their own centre (`transform-origin: center`)
    pub fn css_transform(&self) -> String {
        let p = self.top_left();
        format!("translate({:.2}px, {:.2}px) rotate({:.4}rad)", p.x, p.y, self.angle)
    }
}

/// Template being dragged from the palette
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ghost {
    pub kind: FoodKind,
    pub center: Vec2,
    pub size: Vec2,
}

impl Ghost {
    pub fn css_transform(&self) -> String {
        let p = self.center - self.size / 2.0;
        format!("translate({:.2}px, {:.2}px)", p.x, p.y)
    }
}

/// Snapshot of everything drawn this frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub pupils: PupilOffsets,
    pub chompo_scale: f32,
    pub sprites: Vec<FoodSprite>,
    pub ghost: Option<Ghost>,
    pub held: Option<u32>,
    pub eaten: u32,
}

impl Frame {
    pub fn capture(scene: &Scene) -> Self {
        let sprites = scene
            .foods()
            .iter()
            .filter_map(|food| {
                let (center, angle) = scene.food_transform(food.id)?;
                Some(FoodSprite {
                    id: food.id,
                    kind: food.kind,
                    center,
                    angle,
                    size: food.kind.template().shape.extent(),
                })
            })
            .collect();

        let ghost = match *scene.drag() {
            DragState::Template { kind, pointer } => Some(Ghost {
                kind,
                center: pointer,
                size: kind.template().shape.extent(),
            }),
            _ => None,
        };

        Self {
            pupils: scene.pupil_offsets(),
            chompo_scale: scene.chompo_scale(),
            sprites,
            ghost,
            held: scene.drag().held_food(),
            eaten: scene.eaten_count(),
        }
    }

    pub fn pupil_transform(&self, side: EyeSide) -> String {
        pupil_transform(self.pupils.get(side))
    }

    pub fn chompo_transform(&self) -> String {
        chompo_transform(self.chompo_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewport;
    use crate::settings::Settings;

    #[test]
    fn test_transform_strings() {
        assert_eq!(pupil_transform(Vec2::new(5.0, -2.5)), "translate(5.00px, -2.50px)");
        assert_eq!(chompo_transform(1.0), "translateX(-50%) scale(1.000)");

        let sprite = FoodSprite {
            id: 1,
            kind: FoodKind::Apple,
            center: Vec2::new(100.0, 50.0),
            angle: 0.5,
            size: Vec2::new(36.0, 36.0),
        };
        assert_eq!(sprite.top_left(), Vec2::new(82.0, 32.0));
        assert_eq!(sprite.css_transform(), "translate(82.00px, 32.00px) rotate(0.5000rad)");
    }

    #[test]
    fn test_frame_tracks_scene() {
        let mut scene = Scene::new(Settings::default(), Viewport::new(800.0, 600.0), 3);
        scene.pointer_move(Vec2::new(372.0, 300.0));
        let id = scene.spawn(FoodKind::Toast, Vec2::new(120.0, 80.0));

        let frame = Frame::capture(&scene);
        assert_eq!(frame.sprites.len(), 1);
        let sprite = frame.sprites[0];
        assert_eq!(sprite.id, id);
        assert!((sprite.center - Vec2::new(120.0, 80.0)).length() < 1e-3);
        assert_eq!(sprite.size, Vec2::new(44.0, 36.0));
        assert_eq!(frame.ghost, None);
        assert_eq!(frame.held, None);
        // Pointer straight above the left socket centre
        assert_eq!(frame.pupil_transform(EyeSide::Left), "translate(0.00px, -10.00px)");
    }

    #[test]
    fn test_frame_shows_ghost_while_dragging_template() {
        let mut scene = Scene::new(Settings::default(), Viewport::new(800.0, 600.0), 3);
        scene.grab_template(FoodKind::Candy, Vec2::new(50.0, 60.0));

        let frame = Frame::capture(&scene);
        let ghost = frame.ghost.expect("ghost while dragging");
        assert_eq!(ghost.kind, FoodKind::Candy);
        assert_eq!(ghost.center, Vec2::new(50.0, 60.0));
        assert!(frame.sprites.is_empty());
    }
}
