//! Scene state
//!
//! Everything the toy knows lives here: the layout, the eyes, the food in
//! the physics world, the current drag and the chomp animation. Input
//! handlers and the frame loop call into this type and nothing else.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::drag::{DragState, DropAction};
use super::food::FoodKind;
use super::layout::ChompoLayout;
use super::world::{ContactStart, PhysicsWorld};
use crate::Viewport;
use crate::gaze::{GazeTracker, PupilOffsets};
use crate::settings::Settings;

/// A food item currently in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub id: u32,
    pub kind: FoodKind,
}

/// Things that happened since the last `take_events`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    Spawned { id: u32, kind: FoodKind },
    Eaten { id: u32, kind: FoodKind },
    /// Dropped to stay under `max_food`
    Evicted { id: u32 },
    Cleared { count: usize },
}

/// Scale pulse played after eating
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Chomp {
    /// Seconds left in the pulse (0 = at rest)
    pub remaining: f32,
    pub duration: f32,
}

impl Chomp {
    pub fn start(&mut self, duration: f32) {
        self.duration = duration;
        self.remaining = duration;
    }

    pub fn advance(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Current scale given the peak: ramps up then back down to 1.0
    pub fn scale(&self, peak: f32) -> f32 {
        if !self.is_active() || self.duration <= 0.0 {
            return 1.0;
        }
        let t = 1.0 - self.remaining / self.duration;
        let envelope = 1.0 - (2.0 * t - 1.0).abs();
        1.0 + (peak - 1.0) * envelope
    }
}

pub struct Scene {
    settings: Settings,
    layout: ChompoLayout,
    gaze: GazeTracker,
    world: PhysicsWorld,
    /// Oldest first
    foods: Vec<Food>,
    drag: DragState,
    chomp: Chomp,
    eaten: u32,
    rng: Pcg32,
    events: Vec<SceneEvent>,
    next_id: u32,
}

impl Scene {
    pub fn new(settings: Settings, viewport: Viewport, seed: u64) -> Self {
        let layout = ChompoLayout::for_viewport(viewport);
        let gaze = GazeTracker::new(layout.left_socket, layout.right_socket, settings.max_offset);
        let world = PhysicsWorld::new(&layout, settings.gravity, settings.pixels_per_meter);

        Self {
            settings,
            layout,
            gaze,
            world,
            foods: Vec::new(),
            drag: DragState::Idle,
            chomp: Chomp::default(),
            eaten: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        }
    }

    fn next_food_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // === Input ===

    /// Pointer moved anywhere in the window
    pub fn pointer_move(&mut self, pointer: Vec2) {
        self.gaze.look_at(pointer);
        self.drag.pointer_moved(pointer);
    }

    /// Pointer pressed on a palette entry
    pub fn grab_template(&mut self, kind: FoodKind, pointer: Vec2) {
        self.pointer_move(pointer);
        self.let_go();
        self.drag = DragState::begin_template(kind, pointer);
    }

    /// Pointer pressed on a spawned food; false if it no longer exists
    pub fn grab_food(&mut self, id: u32, pointer: Vec2) -> bool {
        self.pointer_move(pointer);
        let Some((pos, _)) = self.world.transform(id) else {
            return false;
        };
        self.let_go();
        if !self.world.grab(id) {
            return false;
        }
        self.drag = DragState::begin_body(id, pos, pointer);
        true
    }

    /// Drop whatever body is held without a throw; a new drag replaces it
    fn let_go(&mut self) {
        if let Some(prev) = self.drag.held_food() {
            self.world.release(prev, Vec2::ZERO);
        }
        self.drag = DragState::Idle;
    }

    /// Pointer released anywhere in the window
    pub fn pointer_up(&mut self, pointer: Vec2) {
        self.pointer_move(pointer);
        let viewport = self.layout.viewport;
        let action = self
            .drag
            .release(pointer, |p| viewport.contains(p), self.settings.max_fling_speed);

        match action {
            DropAction::None => {}
            DropAction::Spawn { kind, position } => {
                self.spawn(kind, position);
            }
            DropAction::Release { food_id, velocity } => {
                self.world.release(food_id, velocity);
            }
        }
    }

    /// Viewport changed size
    pub fn resize(&mut self, viewport: Viewport) {
        self.layout = ChompoLayout::for_viewport(viewport);
        self.world.set_bounds(&self.layout);
        if self.settings.track_layout {
            self.gaze.relayout(self.layout.left_socket, self.layout.right_socket);
        }
        log::debug!("Resized to {}x{}", viewport.width, viewport.height);
    }

    // === Food ===

    /// Drop a new food at a screen position; returns its id
    pub fn spawn(&mut self, kind: FoodKind, position: Vec2) -> u32 {
        while self.foods.len() >= self.settings.max_food {
            let oldest = self.foods[0].id;
            self.remove_food(oldest);
            self.events.push(SceneEvent::Evicted { id: oldest });
            log::debug!("Evicted food {}", oldest);
        }

        let id = self.next_food_id();
        let angle = self.rng.random_range(-0.3..0.3);
        let angvel = self.rng.random_range(-2.0..2.0);
        self.world.spawn(id, &kind.template(), position, angle, angvel);
        self.foods.push(Food { id, kind });
        self.events.push(SceneEvent::Spawned { id, kind });
        log::debug!("Spawned {} #{} at ({:.0}, {:.0})", kind.as_str(), id, position.x, position.y);
        id
    }

    fn remove_food(&mut self, id: u32) -> Option<Food> {
        let index = self.foods.iter().position(|f| f.id == id)?;
        self.world.remove(id);
        self.drag.forget(id);
        Some(self.foods.remove(index))
    }

    /// Remove every food item
    pub fn clear_food(&mut self) {
        let count = self.foods.len();
        for food in std::mem::take(&mut self.foods) {
            self.world.remove(food.id);
        }
        self.drag = DragState::Idle;
        self.events.push(SceneEvent::Cleared { count });
        log::debug!("Cleared {} food items", count);
    }

    // === Simulation ===

    /// Advance one fixed step
    pub fn step(&mut self, dt: f32) {
        if let Some((id, target)) = self.drag.body_target() {
            if let Some((pos, _)) = self.world.transform(id) {
                self.drag.set_velocity((target - pos) / dt);
            }
            self.world.drag_to(id, target);
        }

        let contacts = self.world.step(dt);
        self.handle_contacts(&contacts);

        self.chomp.advance(dt);
    }

    /// Eat every food that touched the mouth
    fn handle_contacts(&mut self, contacts: &[ContactStart]) {
        for contact in contacts {
            let Some(id) = contact.food_in_mouth() else {
                continue;
            };
            // Several contacts for one food in the same step: only the first counts
            if let Some(food) = self.remove_food(id) {
                self.eaten += 1;
                self.chomp.start(self.settings.chomp_duration);
                self.events.push(SceneEvent::Eaten { id, kind: food.kind });
                log::info!("Chompo ate {} #{} (total {})", food.kind.as_str(), id, self.eaten);
            }
        }
    }

    pub fn take_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    // === Queries ===

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn layout(&self) -> &ChompoLayout {
        &self.layout
    }

    pub fn pointer(&self) -> Vec2 {
        self.gaze.pointer()
    }

    pub fn pupil_offsets(&self) -> PupilOffsets {
        self.gaze.offsets()
    }

    pub fn foods(&self) -> &[Food] {
        &self.foods
    }

    /// Screen position and rotation of a food
    pub fn food_transform(&self, id: u32) -> Option<(Vec2, f32)> {
        self.world.transform(id)
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn eaten_count(&self) -> u32 {
        self.eaten
    }

    pub fn chomp(&self) -> &Chomp {
        &self.chomp
    }

    /// Current scale of the Chompo sprite
    pub fn chompo_scale(&self) -> f32 {
        self.chomp.scale(self.settings.effective_chomp_scale())
    }
}
