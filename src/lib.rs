//! tessera is a small 2D game engine: a batching renderer drawing a scene
//! of entities into a fixed size off-screen buffer, and a kinematic mover
//! that steps entities one pixel at a time against tagged colliders.
//!
//! ## Example
//! A falling box landing on a tile floor, rendered through a recording
//! device:
//! ```
//! use tessera::engine::{Engine, EngineConfig};
//! use tessera::graphic::testing::RecordingDevice;
//! use tessera::math::Vec2;
//! use tessera::physics::{Hitbox, Hitgrid, Physics, PhysicsModule};
//! use tessera::scene::Entity;
//! use std::time::Duration;
//!
//! let (device, _log) = RecordingDevice::new(640, 360);
//! let mut engine = Engine::new(EngineConfig::default(), Box::new(device)).unwrap();
//! engine.add_module(PhysicsModule);
//!
//! let mut scene = engine.create_scene();
//!
//! let mut floor = Entity::default();
//! let mut grid = Hitgrid::new(8.0, 8.0).with_tags(&["solid"]);
//! grid.set_rect(0, 4, 10, 1, true);
//! floor.add(grid);
//! scene.add(floor);
//!
//! let mut player = Entity::new(Vec2::new(16.0, 0.0));
//! let hitbox = player.add(Hitbox::new(0.0, 0.0, 8.0, 8.0));
//! let mut physics = Physics::new(hitbox).with_solids(&["solid"]);
//! physics.speed.y = 120.0;
//! player.add(physics);
//! let player = scene.add(player);
//!
//! engine.goto(scene);
//! for _ in 0..60 {
//!     engine.step_with_delta(Duration::from_millis(16)).unwrap();
//! }
//!
//! assert_eq!(engine.scene().unwrap().entity(player).unwrap().position.y, 24.0);
//! ```
//!
//! ### This Crate
//! The `tessera` crate is a container crate that makes it easier to consume
//! tessera subcrates. Each module in the root of this crate can also be used
//! directly, with `tessera_` appended to the front, e.g. `scene` ->
//! `tessera_scene`.

pub mod engine {
    //! Frame driver, configuration and logging.
    pub use tessera_engine::*;
}

pub mod math {
    //! Math types.
    pub use tessera_math::*;
}

pub mod graphic {
    //! Batching renderer, camera, textures and the graphics device seam.
    pub use tessera_graphic::*;
}

pub mod scene {
    //! Entities, components, colliders and the scene that owns them.
    pub use tessera_scene::*;
}

pub mod physics {
    //! Hitbox and tile grid colliders and the kinematic mover.
    pub use tessera_physics::*;
}
