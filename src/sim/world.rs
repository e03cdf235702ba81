//! Physics world
//!
//! Thin adapter over `rapier2d`. The rest of the crate speaks screen pixels
//! with y pointing down; this module converts to metres on the way in and
//! back on the way out, and reports collision starts as pairs of labels.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use glam::Vec2;
use rapier2d::prelude::*;

use super::food::{FoodShape, FoodTemplate};
use super::layout::ChompoLayout;
use crate::consts::BOUNDARY_THICKNESS;
use crate::Rect;

/// Identity attached to every collider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyLabel {
    Mouth,
    Floor,
    Wall,
    Food(u32),
}

impl BodyLabel {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mouth" => Some(BodyLabel::Mouth),
            "floor" => Some(BodyLabel::Floor),
            "wall" => Some(BodyLabel::Wall),
            _ => s
                .strip_prefix("food-")
                .and_then(|id| id.parse().ok())
                .map(BodyLabel::Food),
        }
    }

    pub fn food_id(&self) -> Option<u32> {
        match self {
            BodyLabel::Food(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for BodyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyLabel::Mouth => write!(f, "mouth"),
            BodyLabel::Floor => write!(f, "floor"),
            BodyLabel::Wall => write!(f, "wall"),
            BodyLabel::Food(id) => write!(f, "food-{}", id),
        }
    }
}

/// Two colliders that started touching during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactStart {
    pub a: BodyLabel,
    pub b: BodyLabel,
}

impl ContactStart {
    /// Food id if this contact is a food entering the mouth
    pub fn food_in_mouth(&self) -> Option<u32> {
        match (self.a, self.b) {
            (BodyLabel::Food(id), BodyLabel::Mouth) | (BodyLabel::Mouth, BodyLabel::Food(id)) => Some(id),
            _ => None,
        }
    }
}

/// Collects collision starts raised during `PhysicsPipeline::step`
#[derive(Default)]
struct CollisionLog {
    started: Mutex<Vec<(ColliderHandle, ColliderHandle)>>,
}

impl CollisionLog {
    fn drain(&self) -> Vec<(ColliderHandle, ColliderHandle)> {
        match self.started.lock() {
            Ok(mut started) => std::mem::take(&mut *started),
            Err(_) => Vec::new(),
        }
    }
}

impl EventHandler for CollisionLog {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let CollisionEvent::Started(h1, h2, _) = event {
            if let Ok(mut started) = self.started.lock() {
                started.push((h1, h2));
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// Bodies, boundaries and the mouth sensor
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    events: CollisionLog,
    labels: HashMap<ColliderHandle, BodyLabel>,
    foods: HashMap<u32, RigidBodyHandle>,
    boundaries: Vec<ColliderHandle>,
    pixels_per_meter: f32,
}

impl PhysicsWorld {
    /// `gravity` in m/s² (pointing down the screen)
    pub fn new(layout: &ChompoLayout, gravity: f32, pixels_per_meter: f32) -> Self {
        let mut world = Self {
            gravity: vector![0.0, gravity],
            params: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            events: CollisionLog::default(),
            labels: HashMap::new(),
            foods: HashMap::new(),
            boundaries: Vec::new(),
            pixels_per_meter,
        };
        world.set_bounds(layout);
        world
    }

    fn to_world(&self, p: Vec2) -> Vector<Real> {
        vector![p.x / self.pixels_per_meter, p.y / self.pixels_per_meter]
    }

    fn to_screen(&self, v: &Vector<Real>) -> Vec2 {
        Vec2::new(v.x * self.pixels_per_meter, v.y * self.pixels_per_meter)
    }

    /// Rebuild floor, walls and mouth sensor for a new layout
    pub fn set_bounds(&mut self, layout: &ChompoLayout) {
        for handle in std::mem::take(&mut self.boundaries) {
            self.labels.remove(&handle);
            self.colliders
                .remove(handle, &mut self.islands, &mut self.bodies, true);
        }

        let w = layout.viewport.width;
        let h = layout.viewport.height;
        let t = BOUNDARY_THICKNESS;
        // Walls reach well above the viewport so flung food comes back down
        let wall_h = h * 4.0;

        self.add_boundary(Rect::new(-t, h, w + 2.0 * t, t), BodyLabel::Floor, false);
        self.add_boundary(Rect::new(-t, h - wall_h, t, wall_h), BodyLabel::Wall, false);
        self.add_boundary(Rect::new(w, h - wall_h, t, wall_h), BodyLabel::Wall, false);
        self.add_boundary(layout.mouth, BodyLabel::Mouth, true);

        log::debug!("Physics bounds set for {}x{}", w, h);
    }

    fn add_boundary(&mut self, rect: Rect, label: BodyLabel, sensor: bool) {
        let half = Vec2::new(rect.width, rect.height) / 2.0 / self.pixels_per_meter;
        let collider = ColliderBuilder::cuboid(half.x, half.y)
            .translation(self.to_world(rect.center()))
            .sensor(sensor)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let handle = self.colliders.insert(collider);
        self.labels.insert(handle, label);
        self.boundaries.push(handle);
    }

    fn collider_for(&self, shape: &FoodShape) -> ColliderBuilder {
        let ppm = self.pixels_per_meter;
        match shape {
            FoodShape::Circle { radius } => ColliderBuilder::ball(radius / ppm),
            FoodShape::Rect { width, height } => ColliderBuilder::cuboid(width / 2.0 / ppm, height / 2.0 / ppm),
            FoodShape::Polygon { points } => {
                let points: Vec<Point<Real>> = points
                    .iter()
                    .map(|p| Point::new(p.x / ppm, p.y / ppm))
                    .collect();
                ColliderBuilder::convex_hull(&points).unwrap_or_else(|| {
                    log::warn!("Degenerate polygon, falling back to a ball");
                    ColliderBuilder::ball(shape.extent().max_element() / 2.0 / ppm)
                })
            }
        }
    }

    /// Add a dynamic food body; replaces any body already using `id`
    pub fn spawn(&mut self, id: u32, template: &FoodTemplate, position: Vec2, angle: f32, angvel: f32) {
        self.remove(id);

        let body = RigidBodyBuilder::dynamic()
            .translation(self.to_world(position))
            .rotation(angle)
            .angvel(angvel)
            .ccd_enabled(true)
            .build();
        let body_handle = self.bodies.insert(body);

        let collider = self
            .collider_for(&template.shape)
            .restitution(template.restitution)
            .friction(template.friction)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let collider_handle = self
            .colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies);

        self.labels.insert(collider_handle, BodyLabel::Food(id));
        self.foods.insert(id, body_handle);
    }

    /// Remove a food body. Unknown ids are ignored.
    pub fn remove(&mut self, id: u32) -> bool {
        let Some(handle) = self.foods.remove(&id) else {
            return false;
        };
        if let Some(body) = self.bodies.get(handle) {
            for collider in body.colliders() {
                self.labels.remove(collider);
            }
        }
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        true
    }

    /// Take a body out of the simulation's control so the pointer can move it
    pub fn grab(&mut self, id: u32) -> bool {
        let Some(body) = self.foods.get(&id).and_then(|h| self.bodies.get_mut(*h)) else {
            return false;
        };
        body.set_body_type(RigidBodyType::KinematicPositionBased, true);
        body.set_linvel(vector![0.0, 0.0], true);
        body.set_angvel(0.0, true);
        true
    }

    /// Move a grabbed body; takes effect on the next step
    pub fn drag_to(&mut self, id: u32, position: Vec2) {
        let target = self.to_world(position);
        if let Some(body) = self.foods.get(&id).and_then(|h| self.bodies.get_mut(*h)) {
            body.set_next_kinematic_translation(target);
        }
    }

    /// Hand a grabbed body back to the simulation with a velocity (pixels/s)
    pub fn release(&mut self, id: u32, velocity: Vec2) {
        let linvel = self.to_world(velocity);
        if let Some(body) = self.foods.get(&id).and_then(|h| self.bodies.get_mut(*h)) {
            body.set_body_type(RigidBodyType::Dynamic, true);
            body.set_linvel(linvel, true);
        }
    }

    pub fn is_grabbed(&self, id: u32) -> bool {
        self.foods
            .get(&id)
            .and_then(|h| self.bodies.get(*h))
            .is_some_and(|b| b.is_kinematic())
    }

    /// Advance one fixed step and report contacts that began during it
    pub fn step(&mut self, dt: f32) -> Vec<ContactStart> {
        self.params.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &self.events,
        );

        self.events
            .drain()
            .into_iter()
            .filter_map(|(h1, h2)| {
                // Colliders removed since the event was raised have no label
                let a = *self.labels.get(&h1)?;
                let b = *self.labels.get(&h2)?;
                Some(ContactStart { a, b })
            })
            .collect()
    }

    /// Screen position (pixels) and rotation (radians, clockwise) of a food
    pub fn transform(&self, id: u32) -> Option<(Vec2, f32)> {
        let body = self.bodies.get(*self.foods.get(&id)?)?;
        Some((self.to_screen(body.translation()), body.rotation().angle()))
    }

    /// Screen velocity (pixels/s) of a food
    pub fn velocity(&self, id: u32) -> Option<Vec2> {
        let body = self.bodies.get(*self.foods.get(&id)?)?;
        Some(self.to_screen(body.linvel()))
    }

    pub fn food_count(&self) -> usize {
        self.foods.len()
    }
}
