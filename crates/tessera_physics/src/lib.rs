mod hitbox;
mod hitgrid;
mod overlap;
mod physics;

pub use hitbox::*;
pub use hitgrid::*;
pub use overlap::*;
pub use physics::*;
use tessera_engine::{Engine, Module};

/// Registers the hitbox and hitgrid overlap tests on the engine.
#[derive(Default, Debug)]
pub struct PhysicsModule;

impl Module for PhysicsModule {
    fn init(self, engine: &mut Engine) {
        register_overlap_tests(engine.overlaps_mut());
    }
}
