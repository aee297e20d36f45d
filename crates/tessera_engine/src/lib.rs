mod config;
mod time;

use std::{rc::Rc, time::Duration};

pub use config::*;
pub use log;
pub use time::*;

use tessera_graphic::{Camera, Graphics, GraphicsDevice, GraphicsError};
use tessera_scene::{OverlapRegistry, Scene};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Graphics(#[from] GraphicsError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Engine wide setup, e.g. registering overlap tests
pub trait Module {
    fn init(self, engine: &mut Engine);
}

/// Drives the active [Scene] one frame at a time
///
/// The host calls [Engine::step] once per frame. Switching scene with
/// [Engine::goto] takes effect at the start of the next frame.
pub struct Engine {
    config: EngineConfig,
    graphics: Graphics,
    overlaps: Rc<OverlapRegistry>,
    scene: Option<Scene>,
    next_scene: Option<Scene>,
    limiter: Option<FrameLimiter>,
    time: Time,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("graphics", &self.graphics)
            .field("scene", &self.scene)
            .field("time", &self.time)
            .finish()
    }
}

impl Engine {
    pub fn init_logger(level: log::LevelFilter) {
        cfg_if::cfg_if! {
            if #[cfg(target_arch = "wasm32")] {
                std::panic::set_hook(Box::new(console_error_panic_hook::hook));
                if let Some(level) = level.to_level() {
                    let _ = console_log::init_with_level(level);
                }
            } else {
                use simplelog::{Config, SimpleLogger, TermLogger, TerminalMode};
                if TermLogger::init(level, Config::default(), TerminalMode::Mixed).is_err() {
                    let _ = SimpleLogger::init(level, Config::default());
                }

                log_panics::init();
            }
        }

        log::set_max_level(level);
    }

    /// Installs the logger at the `log_level` of `config`
    pub fn init_logger_with_config(config: &EngineConfig) {
        Self::init_logger(config.log_level);
    }

    /// Builds the renderer at the buffer size of `config`
    pub fn new(
        config: EngineConfig,
        device: Box<dyn GraphicsDevice>,
    ) -> Result<Self, EngineError> {
        let mut graphics = Graphics::new(device, config.width, config.height)?;
        graphics.resolution_style = config.resolution_style;
        graphics.clear_color = config.clear_color;
        graphics.border_color = config.border_color;

        log::info!(
            "{} started with a {}x{} buffer",
            config.title,
            config.width,
            config.height
        );

        Ok(Self {
            limiter: config.target_fps.map(FrameLimiter::new),
            config,
            graphics,
            overlaps: Rc::new(OverlapRegistry::new()),
            scene: None,
            next_scene: None,
            time: Time::default(),
        })
    }

    pub fn add_module(&mut self, module: impl Module) -> &mut Self {
        module.init(self);

        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn graphics(&self) -> &Graphics {
        &self.graphics
    }

    pub fn graphics_mut(&mut self) -> &mut Graphics {
        &mut self.graphics
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    pub fn overlaps(&self) -> &OverlapRegistry {
        &self.overlaps
    }

    /// Scenes created before a change keep the registry they were created
    /// with
    pub fn overlaps_mut(&mut self) -> &mut OverlapRegistry {
        Rc::make_mut(&mut self.overlaps)
    }

    /// A scene sharing the engine overlap tests, with a camera covering the
    /// off-screen buffer
    pub fn create_scene(&self) -> Scene {
        Scene::new(
            self.overlaps.clone(),
            Camera::new(self.config.width as f32, self.config.height as f32),
        )
    }

    /// Makes `scene` the active scene from the next frame on
    pub fn goto(&mut self, scene: Scene) {
        self.next_scene = Some(scene);
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }

    /// Runs a frame with the time measured since the previous one
    pub fn step(&mut self) -> Result<(), EngineError> {
        let delta = self.time.measure(self.limiter.as_ref());
        self.step_with_delta(delta)
    }

    pub fn step_with_delta(&mut self, delta: Duration) -> Result<(), EngineError> {
        self.time.advance(delta);
        self.update();
        self.render()
    }

    fn switch_scene(&mut self) {
        if let Some(mut next) = self.next_scene.take() {
            if let Some(mut previous) = self.scene.take() {
                previous.ended();
            }
            next.begin();
            self.scene = Some(next);
        }
    }

    pub fn update(&mut self) {
        self.switch_scene();

        let delta = self.time.delta_seconds();
        if let Some(scene) = self.scene.as_mut() {
            scene.update(delta);
        }
    }

    pub fn render(&mut self) -> Result<(), EngineError> {
        self.graphics.reset();
        if let Some(scene) = self.scene.as_mut() {
            scene.render(&mut self.graphics, self.config.debug);
        }
        self.graphics.finalize();
        self.graphics.present()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use tessera_graphic::testing::{DeviceCall, DeviceLog, RecordingDevice};
    use tessera_graphic::Color;
    use tessera_scene::{
        Collider, Component, ComponentContext, Entity, Placed, Rectsprite,
    };

    use super::*;

    #[derive(Debug, Default)]
    struct Drift {
        tags: Vec<String>,
    }

    impl Component for Drift {
        fn update(&mut self, ctx: &mut ComponentContext) {
            let delta = ctx.delta();
            ctx.entity_mut().position.x += 10.0 * delta;
        }

        fn as_collider(&self) -> Option<&dyn Collider> {
            Some(self)
        }
    }

    impl Collider for Drift {
        fn tags(&self) -> &[String] {
            &self.tags
        }

        fn tags_mut(&mut self) -> &mut Vec<String> {
            &mut self.tags
        }

        fn offset(&self) -> Vec2 {
            Vec2::ZERO
        }
    }

    struct DriftModule;

    impl Module for DriftModule {
        fn init(self, engine: &mut Engine) {
            engine
                .overlaps_mut()
                .register(|_: Placed<Drift>, _: Placed<Drift>| true);
        }
    }

    fn engine(config: EngineConfig) -> (Engine, DeviceLog) {
        let (device, log) = RecordingDevice::new(640, 360);
        let engine = Engine::new(config, Box::new(device)).unwrap();
        log.clear();
        (engine, log)
    }

    #[test]
    fn goto_waits_for_the_next_frame() {
        let (mut engine, _) = engine(EngineConfig::default());
        let mut scene = engine.create_scene();
        let id = scene.add(Entity::default());

        engine.goto(scene);
        assert!(engine.scene().is_none());

        engine.step_with_delta(Duration::from_millis(16)).unwrap();
        let scene = engine.scene().unwrap();
        assert!(scene.is_running());
        assert!(scene.entity(id).is_some());

        engine.goto(engine.create_scene());
        assert!(engine.scene().unwrap().entity(id).is_some());
        engine.step_with_delta(Duration::from_millis(16)).unwrap();
        assert!(engine.scene().unwrap().entity(id).is_none());
    }

    #[test]
    fn step_updates_renders_and_presents() {
        let (mut engine, log) = engine(EngineConfig {
            clear_color: Color::new(0.0, 0.0, 1.0, 1.0),
            ..Default::default()
        });
        let mut scene = engine.create_scene();
        let mut entity = Entity::default();
        entity.add(Drift::default());
        entity.add(Rectsprite::new(4.0, 4.0, Color::WHITE));
        let id = scene.add(entity);
        engine.goto(scene);

        engine.step_with_delta(Duration::from_millis(500)).unwrap();

        assert_eq!(engine.scene().unwrap().entity(id).unwrap().position.x, 5.0);
        assert_eq!(engine.time().frame(), 1);
        assert_eq!(engine.time().elapsed(), Duration::from_millis(500));

        let calls = log.calls();
        assert!(calls.contains(&DeviceCall::Clear(Color::new(0.0, 0.0, 1.0, 1.0))));
        assert_eq!(calls.last(), Some(&DeviceCall::Present));
        // the scene into the buffer, then the buffer onto the surface
        let draws = log.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].target, Some(engine.graphics().buffer().id));
        assert_eq!(draws[1].target, None);
    }

    #[test]
    fn scenes_share_the_registry_of_their_creation() {
        let (mut engine, _) = engine(EngineConfig::default());
        let before = engine.create_scene();

        engine.add_module(DriftModule);
        let after = engine.create_scene();

        assert!(!before.overlaps().contains::<Drift, Drift>());
        assert!(after.overlaps().contains::<Drift, Drift>());
        assert!(engine.overlaps().contains::<Drift, Drift>());
    }

    #[test]
    fn logger_follows_the_configured_level() {
        let config = EngineConfig::from_yaml("log_level: warn").unwrap();

        Engine::init_logger_with_config(&config);
        assert_eq!(log::max_level(), log::LevelFilter::Warn);

        // a second install keeps the first logger but still applies the level
        Engine::init_logger_with_config(&EngineConfig::default());
        assert_eq!(log::max_level(), log::LevelFilter::Info);
    }

    #[test]
    fn step_measures_the_frame() {
        let (mut engine, _) = engine(EngineConfig {
            target_fps: Some(1),
            ..Default::default()
        });

        engine.step().unwrap();
        engine.step().unwrap();

        assert_eq!(engine.time().frame(), 2);
        assert!(engine.time().delta() <= Duration::from_secs(1));
    }
}
