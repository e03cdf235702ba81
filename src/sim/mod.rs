//! Scene simulation module
//!
//! Layout, food, physics and pointer interaction. Nothing in here touches
//! the DOM, so the whole module runs (and is tested) natively:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Food kept in spawn order

pub mod clock;
pub mod drag;
pub mod food;
pub mod layout;
pub mod scene;
pub mod world;

pub use clock::FrameClock;
pub use drag::{DragState, DropAction};
pub use food::{FoodKind, FoodShape, FoodTemplate};
pub use layout::ChompoLayout;
pub use scene::{Chomp, Food, Scene, SceneEvent};
pub use world::{BodyLabel, ContactStart, PhysicsWorld};
