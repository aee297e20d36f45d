use std::fmt::Debug;

use tessera_graphic::{BlendMode, Camera, Graphics, RenderTarget, ShaderId};

use crate::Scene;

/// Draws some or all the entities of a [Scene]
///
/// The scene calls its renderers in order, after sorting its entities by
/// depth.
pub trait Renderer: Debug {
    fn update(&mut self, _scene: &Scene, _delta: f32) {}

    fn render(&mut self, scene: &Scene, gfx: &mut Graphics);
}

/// State a renderer binds before drawing
///
/// Every field falls back to the scene default: the scene camera, the
/// texture shader and the off-screen buffer.
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub camera: Option<Camera>,
    pub shader: Option<ShaderId>,
    pub blend: BlendMode,
    pub target: Option<RenderTarget>,
}

impl RenderState {
    /// Binds the state and returns the camera to draw with
    pub fn apply<'a>(&'a self, scene: &'a Scene, gfx: &mut Graphics) -> &'a Camera {
        let target = self.target.unwrap_or(*gfx.buffer());
        gfx.set_render_target(Some(&target));

        let shader = self.shader.unwrap_or(gfx.texture_shader());
        gfx.set_shader(shader);
        gfx.set_blend_mode(self.blend);

        let camera = self.camera.as_ref().unwrap_or(&scene.camera);
        let matrix = gfx.orthographic() * camera.matrix();
        gfx.set_matrix(&matrix);

        camera
    }
}

/// Renders every visible entity
#[derive(Debug, Clone, Default)]
pub struct EverythingRenderer {
    pub state: RenderState,
}

impl Renderer for EverythingRenderer {
    fn render(&mut self, scene: &Scene, gfx: &mut Graphics) {
        let camera = self.state.apply(scene, gfx);
        for entity in scene.entities().filter(|entity| entity.visible) {
            entity.render(gfx, camera);
        }
    }
}

/// Renders the visible entities belonging to at least one of its groups
#[derive(Debug, Clone, Default)]
pub struct GroupRenderer {
    pub groups: Vec<String>,
    pub state: RenderState,
}

impl GroupRenderer {
    pub fn new(groups: &[&str]) -> Self {
        Self {
            groups: groups.iter().map(|group| group.to_string()).collect(),
            state: RenderState::default(),
        }
    }
}

impl Renderer for GroupRenderer {
    fn render(&mut self, scene: &Scene, gfx: &mut Graphics) {
        let camera = self.state.apply(scene, gfx);
        for entity in scene.entities().filter(|entity| {
            entity.visible && self.groups.iter().any(|group| entity.in_group(group))
        }) {
            entity.render(gfx, camera);
        }
    }
}
