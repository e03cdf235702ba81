//! Drag and drop state
//!
//! Two kinds of drag: a template picked from the palette (nothing exists in
//! the world until it is dropped) and an existing food body picked up from
//! the play area.

use glam::Vec2;

use super::food::FoodKind;

/// Current pointer interaction
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Dragging a palette template; a ghost sprite follows the pointer
    Template { kind: FoodKind, pointer: Vec2 },
    /// Holding a spawned body
    Body {
        food_id: u32,
        /// Body position minus pointer at grab time
        grab_offset: Vec2,
        pointer: Vec2,
        /// Measured over the last step (pixels/s), used as the throw velocity
        velocity: Vec2,
    },
}

/// What to do when the pointer is released
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropAction {
    None,
    Spawn { kind: FoodKind, position: Vec2 },
    Release { food_id: u32, velocity: Vec2 },
}

impl DragState {
    pub fn begin_template(kind: FoodKind, pointer: Vec2) -> Self {
        DragState::Template { kind, pointer }
    }

    pub fn begin_body(food_id: u32, body_pos: Vec2, pointer: Vec2) -> Self {
        DragState::Body {
            food_id,
            grab_offset: body_pos - pointer,
            pointer,
            velocity: Vec2::ZERO,
        }
    }

    pub fn is_dragging(&self) -> bool {
        !matches!(self, DragState::Idle)
    }

    pub fn held_food(&self) -> Option<u32> {
        match self {
            DragState::Body { food_id, .. } => Some(*food_id),
            _ => None,
        }
    }

    /// Track the pointer while dragging
    pub fn pointer_moved(&mut self, to: Vec2) {
        match self {
            DragState::Idle => {}
            DragState::Template { pointer, .. } | DragState::Body { pointer, .. } => *pointer = to,
        }
    }

    /// Where a held body should be this step
    pub fn body_target(&self) -> Option<(u32, Vec2)> {
        match self {
            DragState::Body {
                food_id,
                grab_offset,
                pointer,
                ..
            } => Some((*food_id, *pointer + *grab_offset)),
            _ => None,
        }
    }

    /// Record the held body's velocity for the eventual throw
    pub fn set_velocity(&mut self, v: Vec2) {
        if let DragState::Body { velocity, .. } = self {
            *velocity = v;
        }
    }

    /// Finish the drag, returning to `Idle`
    ///
    /// Templates are only spawned when `inside` accepts the drop point.
    pub fn release(&mut self, at: Vec2, inside: impl Fn(Vec2) -> bool, max_speed: f32) -> DropAction {
        let action = match *self {
            DragState::Idle => DropAction::None,
            DragState::Template { kind, .. } => {
                if inside(at) {
                    DropAction::Spawn { kind, position: at }
                } else {
                    DropAction::None
                }
            }
            DragState::Body { food_id, velocity, .. } => DropAction::Release {
                food_id,
                velocity: velocity.clamp_length_max(max_speed),
            },
        };
        *self = DragState::Idle;
        action
    }

    /// Forget a held body that no longer exists
    pub fn forget(&mut self, food_id: u32) {
        if self.held_food() == Some(food_id) {
            *self = DragState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anywhere(_: Vec2) -> bool {
        true
    }

    #[test]
    fn test_template_drop_spawns_at_pointer() {
        let mut drag = DragState::begin_template(FoodKind::Apple, Vec2::new(10.0, 10.0));
        drag.pointer_moved(Vec2::new(200.0, 150.0));
        assert_eq!(
            drag,
            DragState::Template {
                kind: FoodKind::Apple,
                pointer: Vec2::new(200.0, 150.0)
            }
        );

        let action = drag.release(Vec2::new(200.0, 150.0), anywhere, 1000.0);
        assert_eq!(
            action,
            DropAction::Spawn {
                kind: FoodKind::Apple,
                position: Vec2::new(200.0, 150.0)
            }
        );
        assert_eq!(drag, DragState::Idle);
    }

    #[test]
    fn test_template_drop_outside_is_discarded() {
        let mut drag = DragState::begin_template(FoodKind::Toast, Vec2::ZERO);
        let action = drag.release(Vec2::new(-5.0, 0.0), |p| p.x >= 0.0, 1000.0);
        assert_eq!(action, DropAction::None);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_body_keeps_grab_offset() {
        let mut drag = DragState::begin_body(3, Vec2::new(100.0, 100.0), Vec2::new(90.0, 95.0));
        assert_eq!(drag.held_food(), Some(3));
        drag.pointer_moved(Vec2::new(190.0, 195.0));
        assert_eq!(drag.body_target(), Some((3, Vec2::new(200.0, 200.0))));
    }

    #[test]
    fn test_body_release_clamps_throw() {
        let mut drag = DragState::begin_body(3, Vec2::ZERO, Vec2::ZERO);
        drag.set_velocity(Vec2::new(3000.0, 4000.0));
        let action = drag.release(Vec2::ZERO, anywhere, 500.0);
        match action {
            DropAction::Release { food_id, velocity } => {
                assert_eq!(food_id, 3);
                assert!((velocity - Vec2::new(300.0, 400.0)).length() < 1e-3);
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn test_idle_release_does_nothing() {
        let mut drag = DragState::Idle;
        drag.pointer_moved(Vec2::ONE);
        assert_eq!(drag.release(Vec2::ONE, anywhere, 1.0), DropAction::None);
        assert_eq!(drag.body_target(), None);
    }

    #[test]
    fn test_forget_only_matching_food() {
        let mut drag = DragState::begin_body(8, Vec2::ZERO, Vec2::ZERO);
        drag.forget(9);
        assert_eq!(drag.held_food(), Some(8));
        drag.forget(8);
        assert_eq!(drag, DragState::Idle);
    }
}
