use glam::Vec2;
use tessera_math::{Matrix, Rect, VectorExt};

use crate::{
    BlendMode, Color, GraphicsDevice, GraphicsError, RenderTarget, ResolutionStyle, Shader,
    ShaderDescriptor, TargetId, Texture, UniformValue,
};

/// Handle of a shader registered in [Graphics]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShaderId(usize);

/// Optional parameters of [Graphics::texture]
#[derive(Clone, Debug, PartialEq)]
pub struct TextureParams {
    /// Region of the texture to draw, in logical texture coordinates
    pub crop: Option<Rect>,
    pub color: Color,
    pub origin: Vec2,
    pub scale: Vec2,
    pub rotation: f32,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl Default for TextureParams {
    fn default() -> Self {
        Self {
            crop: None,
            color: Color::WHITE,
            origin: Vec2::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
            flip_x: false,
            flip_y: false,
        }
    }
}

/// Batching 2D renderer
///
/// Geometry is accumulated into three parallel vertex streams and drawn with
/// a single call until the shader, its uniforms, the blend mode or the render
/// target change. Every state change flushes what was queued under the old
/// state first, so queued geometry is never drawn with state set after it.
pub struct Graphics {
    device: Box<dyn GraphicsDevice>,
    shaders: Vec<Shader>,
    current_shader: Option<ShaderId>,
    next_shader: ShaderId,
    current_blend: Option<BlendMode>,
    next_blend: BlendMode,
    target: Option<TargetId>,
    vertices: Vec<f32>,
    texcoords: Vec<f32>,
    colors: Vec<f32>,
    draw_calls: usize,
    orthographic: Matrix,
    buffer: RenderTarget,
    pixel: Texture,
    texture_shader: ShaderId,
    primitive_shader: ShaderId,
    pub resolution_style: ResolutionStyle,
    pub clear_color: Color,
    pub border_color: Color,
}

impl std::fmt::Debug for Graphics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graphics")
            .field("shaders", &self.shaders.len())
            .field("current_shader", &self.current_shader)
            .field("next_shader", &self.next_shader)
            .field("current_blend", &self.current_blend)
            .field("next_blend", &self.next_blend)
            .field("target", &self.target)
            .field("queued_vertices", &self.vertex_count())
            .field("draw_calls", &self.draw_calls)
            .finish()
    }
}

impl Graphics {
    /// Sets up the built-in shaders and an off-screen buffer of
    /// `width` x `height` pixels the scene is rendered into
    pub fn new(
        mut device: Box<dyn GraphicsDevice>,
        width: u32,
        height: u32,
    ) -> Result<Self, GraphicsError> {
        let texture_descriptor = ShaderDescriptor::texture();
        let primitive_descriptor = ShaderDescriptor::primitive();
        let texture_program = device.create_program(&texture_descriptor)?;
        let primitive_program = device.create_program(&primitive_descriptor)?;

        let pixel = Texture::new(device.create_texture(1, 1, &[255, 255, 255, 255])?, 1, 1);
        let (target, target_texture) = device.create_render_target(width, height)?;

        log::debug!("graphics ready with a {}x{} buffer", width, height);

        Ok(Self {
            device,
            shaders: vec![
                Shader::new(texture_program, &texture_descriptor),
                Shader::new(primitive_program, &primitive_descriptor),
            ],
            current_shader: None,
            next_shader: ShaderId(0),
            current_blend: None,
            next_blend: BlendMode::Normal,
            target: None,
            vertices: Vec::new(),
            texcoords: Vec::new(),
            colors: Vec::new(),
            draw_calls: 0,
            orthographic: Matrix::orthographic(width as f32, height as f32),
            buffer: RenderTarget::new(target, target_texture, width, height),
            pixel,
            texture_shader: ShaderId(0),
            primitive_shader: ShaderId(1),
            resolution_style: ResolutionStyle::default(),
            clear_color: Color::BLACK,
            border_color: Color::BLACK,
        })
    }

    pub fn create_shader(
        &mut self,
        descriptor: &ShaderDescriptor,
    ) -> Result<ShaderId, GraphicsError> {
        let program = self.device.create_program(descriptor)?;
        log::debug!("created shader `{}`", descriptor.name);
        self.shaders.push(Shader::new(program, descriptor));
        Ok(ShaderId(self.shaders.len() - 1))
    }

    /// Uploads an RGBA8 image
    pub fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<Texture, GraphicsError> {
        let id = self.device.create_texture(width, height, pixels)?;
        log::debug!("created texture {:?} of {}x{}", id, width, height);
        Ok(Texture::new(id, width, height))
    }

    pub fn create_render_target(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<RenderTarget, GraphicsError> {
        let (id, texture) = self.device.create_render_target(width, height)?;
        log::debug!("created render target {:?} of {}x{}", id, width, height);
        Ok(RenderTarget::new(id, texture, width, height))
    }

    pub fn texture_shader(&self) -> ShaderId {
        self.texture_shader
    }

    pub fn primitive_shader(&self) -> ShaderId {
        self.primitive_shader
    }

    pub fn shader(&self) -> ShaderId {
        self.next_shader
    }

    pub fn shader_ref(&self, id: ShaderId) -> &Shader {
        &self.shaders[id.0]
    }

    /// Uniform writes through this reference are picked up by the next push
    pub fn shader_mut(&mut self, id: ShaderId) -> &mut Shader {
        &mut self.shaders[id.0]
    }

    /// Selects the shader used by the next pushed vertex
    pub fn set_shader(&mut self, id: ShaderId) {
        if id.0 >= self.shaders.len() {
            panic!("unknown shader {:?}", id);
        }
        self.next_shader = id;
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.next_blend
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.next_blend = mode;
    }

    /// Assigns the projection of the pending shader
    pub fn set_matrix(&mut self, matrix: &Matrix) {
        self.shaders[self.next_shader.0].set_matrix(matrix);
    }

    /// Assigns the sampler of the pending shader
    pub fn set_shader_texture(&mut self, texture: &Texture) {
        self.shaders[self.next_shader.0].set_texture(texture.id);
    }

    /// Assigns a named uniform of the pending shader
    pub fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.shaders[self.next_shader.0].set(name, value);
    }

    /// Pixel to clip space matrix of the bound target
    pub fn orthographic(&self) -> Matrix {
        self.orthographic
    }

    pub fn buffer(&self) -> &RenderTarget {
        &self.buffer
    }

    pub fn draw_calls(&self) -> usize {
        self.draw_calls
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 2
    }

    /// Flushes when a shader, uniform or blend change is pending, then
    /// applies the new state
    pub fn check_state(&mut self) {
        let next = self.next_shader;
        let shader_swap = self.current_shader != Some(next);
        let blend_swap = self.current_blend != Some(self.next_blend);
        let dirty = self.shaders[next.0].is_dirty();

        if !(shader_swap || blend_swap || dirty) {
            return;
        }

        self.flush();

        let program = self.shaders[next.0].program();
        if shader_swap {
            self.device.use_program(program);
            self.current_shader = Some(next);
        }
        if blend_swap {
            self.device.set_blend_mode(self.next_blend);
            self.current_blend = Some(self.next_blend);
        }
        for (index, value) in self.shaders[next.0].take_dirty() {
            self.device.set_uniform(program, index, &value);
        }
    }

    pub fn push(&mut self, x: f32, y: f32, u: f32, v: f32, color: &Color) {
        self.check_state();
        self.push_unsafe(x, y, u, v, color);
    }

    /// Appends a vertex without looking at pending state, only valid right
    /// after a [Graphics::push] of the same primitive
    pub fn push_unsafe(&mut self, x: f32, y: f32, u: f32, v: f32, color: &Color) {
        self.vertices.extend_from_slice(&[x, y]);
        self.texcoords.extend_from_slice(&[u, v]);
        self.colors.extend_from_slice(&color.to_array());
    }

    /// Draws everything queued with the current state
    pub fn flush(&mut self) {
        if self.vertices.is_empty() {
            return;
        }

        log::trace!("flush {} vertices", self.vertex_count());
        self.device
            .draw_triangles(&self.vertices, &self.texcoords, &self.colors);
        self.draw_calls += 1;

        self.vertices.clear();
        self.texcoords.clear();
        self.colors.clear();
    }

    /// Redirects drawing to `target`, or to the visible surface with `None`
    pub fn set_render_target(&mut self, target: Option<&RenderTarget>) {
        match target {
            Some(target) => self.bind_target(Some(target.id), (target.width(), target.height())),
            None => {
                let size = self.device.surface_size();
                self.bind_target(None, size)
            }
        }
    }

    fn bind_target(&mut self, target: Option<TargetId>, size: (u32, u32)) {
        self.flush();
        self.device.bind_target(target, size);
        self.target = target;
        self.orthographic = Matrix::orthographic(size.0 as f32, size.1 as f32);
    }

    pub fn clear(&mut self, color: Color) {
        self.flush();
        self.device.clear(color);
    }

    /// Starts a frame: binds the off-screen buffer and clears it
    pub fn reset(&mut self) {
        self.draw_calls = 0;
        self.next_shader = self.texture_shader;
        self.next_blend = BlendMode::Normal;

        let size = (self.buffer.width(), self.buffer.height());
        self.bind_target(Some(self.buffer.id), size);
        self.clear(self.clear_color);
    }

    /// Ends a frame: blits the off-screen buffer on the surface following
    /// the resolution style
    pub fn finalize(&mut self) {
        self.set_render_target(None);
        self.clear(self.border_color);

        let (width, height) = self.device.surface_size();
        let buffer = self.buffer.texture;
        let fit = self.resolution_style.fit(
            Vec2::new(buffer.width(), buffer.height()),
            Vec2::new(width as f32, height as f32),
        );

        self.set_shader(self.texture_shader);
        self.set_blend_mode(BlendMode::Normal);
        let orthographic = self.orthographic;
        self.set_matrix(&orthographic);

        self.texture(
            &buffer,
            fit.position(),
            &TextureParams {
                scale: Vec2::new(fit.width / buffer.width(), fit.height / buffer.height()),
                ..Default::default()
            },
        );
        self.flush();
    }

    pub fn present(&mut self) -> Result<(), GraphicsError> {
        self.device.present()
    }

    /// Recreates the off-screen buffer with a new size
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), GraphicsError> {
        self.flush();
        let buffer = self.create_render_target(width, height)?;
        let old = std::mem::replace(&mut self.buffer, buffer);
        if self.target == Some(old.id) {
            self.bind_target(Some(buffer.id), (width, height));
        }
        self.device.destroy_render_target(old.id, old.texture.id);
        Ok(())
    }

    /// Draws a textured quad
    ///
    /// Corners are built from the texture frame, then moved by `-origin`,
    /// scaled, rotated and finally translated to `position`.
    pub fn texture(&mut self, texture: &Texture, position: Vec2, params: &TextureParams) {
        let shader = &self.shaders[self.next_shader.0];
        if !shader.has_sampler() {
            panic!(
                "cannot draw a texture with shader `{}`, it has no sampler2D uniform",
                shader.name()
            );
        }

        let texture = match params.crop {
            Some(crop) => texture.subtexture(crop),
            None => *texture,
        };
        self.set_shader_texture(&texture);

        let left = -texture.frame.x;
        let top = -texture.frame.y;
        let right = left + texture.bounds.width;
        let bottom = top + texture.bounds.height;

        let [tl, tr, br, bl] = [
            Vec2::new(left, top),
            Vec2::new(right, top),
            Vec2::new(right, bottom),
            Vec2::new(left, bottom),
        ]
        .map(|corner| {
            ((corner - params.origin) * params.scale).rotated(params.rotation) + position
        });

        let (mut u0, mut v0, mut u1, mut v1) = texture.uv();
        if params.flip_x {
            std::mem::swap(&mut u0, &mut u1);
        }
        if params.flip_y {
            std::mem::swap(&mut v0, &mut v1);
        }

        let color = params.color;
        self.push(tl.x, tl.y, u0, v0, &color);
        self.push_unsafe(tr.x, tr.y, u1, v0, &color);
        self.push_unsafe(br.x, br.y, u1, v1, &color);
        self.push_unsafe(tl.x, tl.y, u0, v0, &color);
        self.push_unsafe(br.x, br.y, u1, v1, &color);
        self.push_unsafe(bl.x, bl.y, u0, v1, &color);
    }

    /// Untextured geometry samples the white pixel when the shader needs a
    /// texture
    fn bind_pixel(&mut self) {
        if self.shaders[self.next_shader.0].has_sampler() {
            let pixel = self.pixel;
            self.set_shader_texture(&pixel);
        }
    }

    pub fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: &Color) {
        self.bind_pixel();
        self.push(a.x, a.y, 0.0, 0.0, color);
        self.push_unsafe(b.x, b.y, 0.0, 0.0, color);
        self.push_unsafe(c.x, c.y, 0.0, 0.0, color);
    }

    pub fn quad(&mut self, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: &Color) {
        self.bind_pixel();
        self.push(a.x, a.y, 0.0, 0.0, color);
        self.push_unsafe(b.x, b.y, 0.0, 0.0, color);
        self.push_unsafe(c.x, c.y, 0.0, 0.0, color);
        self.push_unsafe(a.x, a.y, 0.0, 0.0, color);
        self.push_unsafe(c.x, c.y, 0.0, 0.0, color);
        self.push_unsafe(d.x, d.y, 0.0, 0.0, color);
    }

    pub fn rect(&mut self, rect: Rect, color: &Color) {
        self.quad(
            Vec2::new(rect.left(), rect.top()),
            Vec2::new(rect.right(), rect.top()),
            Vec2::new(rect.right(), rect.bottom()),
            Vec2::new(rect.left(), rect.bottom()),
            color,
        );
    }

    /// Frame of four filled rectangles, `stroke` pixels thick, inside `rect`
    pub fn hollow_rect(&mut self, rect: Rect, stroke: f32, color: &Color) {
        let inner_height = rect.height - stroke * 2.0;

        self.rect(Rect::new(rect.x, rect.y, rect.width, stroke), color);
        self.rect(
            Rect::new(rect.x, rect.bottom() - stroke, rect.width, stroke),
            color,
        );
        self.rect(Rect::new(rect.x, rect.y + stroke, stroke, inner_height), color);
        self.rect(
            Rect::new(rect.right() - stroke, rect.y + stroke, stroke, inner_height),
            color,
        );
    }

    /// Triangle fan of `steps` slices around `center`
    pub fn circle(&mut self, center: Vec2, radius: f32, steps: u32, color: &Color) {
        let steps = steps.max(3);
        let slice = std::f32::consts::TAU / steps as f32;

        let mut last = center + Vec2::new(radius, 0.0);
        for step in 1..=steps {
            let next = center + Vec2::new(radius, 0.0).rotated(slice * step as f32);
            self.triangle(center, last, next, color);
            last = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::testing::{DeviceCall, DeviceLog, RecordingDevice};
    use crate::{ProgramId, TextureId};

    fn graphics() -> (Graphics, DeviceLog) {
        let (device, log) = RecordingDevice::new(640, 360);
        let graphics = Graphics::new(Box::new(device), 320, 180).unwrap();
        log.clear();
        (graphics, log)
    }

    fn square(gfx: &mut Graphics) {
        gfx.rect(Rect::new(0.0, 0.0, 8.0, 8.0), &Color::WHITE);
    }

    #[test]
    fn same_state_is_one_draw_call() {
        let (mut gfx, log) = graphics();

        square(&mut gfx);
        square(&mut gfx);
        square(&mut gfx);
        gfx.flush();

        let draws = log.draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].vertex_count(), 18);
        assert_eq!(gfx.draw_calls(), 1);
    }

    #[test]
    fn state_change_flushes_under_old_state() {
        let (mut gfx, log) = graphics();

        square(&mut gfx);
        gfx.set_blend_mode(BlendMode::Add);
        square(&mut gfx);
        gfx.set_shader(gfx.primitive_shader());
        square(&mut gfx);
        gfx.flush();

        let draws = log.draws();
        assert_eq!(draws.len(), 3);
        assert_eq!(draws[0].blend, BlendMode::Normal);
        assert_eq!(draws[0].program, Some(ProgramId(0)));
        assert_eq!(draws[1].blend, BlendMode::Add);
        assert_eq!(draws[1].program, Some(ProgramId(0)));
        assert_eq!(draws[2].program, Some(ProgramId(1)));
    }

    #[test]
    fn state_changes_without_geometry_are_free() {
        let (mut gfx, log) = graphics();

        square(&mut gfx);
        gfx.set_shader(gfx.primitive_shader());
        gfx.set_blend_mode(BlendMode::Multiply);
        gfx.set_shader(gfx.texture_shader());
        gfx.set_blend_mode(BlendMode::Normal);
        square(&mut gfx);
        gfx.flush();
        gfx.flush();

        assert_eq!(log.draws().len(), 1);
    }

    #[test]
    fn draw_calls_match_contiguous_state_runs() {
        let (mut gfx, log) = graphics();
        let runs = [
            (gfx.texture_shader(), BlendMode::Normal, 2),
            (gfx.texture_shader(), BlendMode::Normal, 1),
            (gfx.primitive_shader(), BlendMode::Normal, 0),
            (gfx.primitive_shader(), BlendMode::Add, 3),
            (gfx.texture_shader(), BlendMode::Add, 1),
            (gfx.texture_shader(), BlendMode::Screen, 0),
            (gfx.texture_shader(), BlendMode::Add, 2),
        ];

        for (shader, blend, squares) in runs {
            gfx.set_shader(shader);
            gfx.set_blend_mode(blend);
            for _ in 0..squares {
                square(&mut gfx);
            }
        }
        gfx.flush();

        // runs with content: (tex, normal), (prim, add), (tex, add)
        assert_eq!(log.draws().len(), 3);
    }

    #[test]
    fn uniform_change_flushes() {
        let (mut gfx, log) = graphics();

        let mut matrix = Matrix::IDENTITY;
        gfx.set_matrix(&matrix);
        square(&mut gfx);
        gfx.set_matrix(&matrix);
        square(&mut gfx);
        matrix.translate(4.0, 0.0);
        gfx.set_matrix(&matrix);
        square(&mut gfx);
        gfx.flush();

        let draws = log.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].vertex_count(), 12);
    }

    #[test]
    fn render_target_switch_flushes() {
        let (mut gfx, log) = graphics();
        let target = gfx.create_render_target(64, 64).unwrap();

        square(&mut gfx);
        gfx.set_render_target(Some(&target));
        square(&mut gfx);
        gfx.flush();

        let draws = log.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].target, None);
        assert_eq!(draws[1].target, Some(target.id));
        assert_eq!(gfx.orthographic(), Matrix::orthographic(64.0, 64.0));
    }

    #[test]
    fn texture_corners_follow_origin_scale_position() {
        let (mut gfx, log) = graphics();
        let texture = gfx.create_texture(32, 16, &[0; 32 * 16 * 4]).unwrap();

        gfx.texture(
            &texture,
            Vec2::new(10.0, 20.0),
            &TextureParams {
                origin: Vec2::new(16.0, 8.0),
                scale: Vec2::new(2.0, 1.0),
                flip_x: true,
                ..Default::default()
            },
        );
        gfx.flush();

        let draws = log.draws();
        assert_eq!(
            draws[0].positions,
            vec![-22.0, 12.0, 42.0, 12.0, 42.0, 28.0, -22.0, 12.0, 42.0, 28.0, -22.0, 28.0]
        );
        assert_eq!(
            draws[0].texcoords,
            vec![1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0]
        );
        assert_eq!(draws[0].texture, Some(texture.id));
    }

    #[test]
    fn texture_scales_before_rotating() {
        let (mut gfx, log) = graphics();
        let texture = gfx.create_texture(32, 16, &[0; 32 * 16 * 4]).unwrap();

        gfx.texture(
            &texture,
            Vec2::new(100.0, 50.0),
            &TextureParams {
                origin: Vec2::new(16.0, 8.0),
                scale: Vec2::new(2.0, 1.0),
                rotation: std::f32::consts::FRAC_PI_2,
                ..Default::default()
            },
        );
        gfx.flush();

        let expected: [f32; 12] = [
            108.0, 18.0, 108.0, 82.0, 92.0, 82.0, 108.0, 18.0, 92.0, 82.0, 92.0, 18.0,
        ];
        let positions = &log.draws()[0].positions;
        assert_eq!(positions.len(), expected.len());
        for (actual, expected) in positions.iter().zip(expected) {
            assert_relative_eq!(*actual, expected, epsilon = 1e-4);
        }
    }

    #[test]
    fn switching_texture_flushes() {
        let (mut gfx, log) = graphics();
        let a = gfx.create_texture(1, 1, &[0; 4]).unwrap();
        let b = gfx.create_texture(1, 1, &[0; 4]).unwrap();

        gfx.texture(&a, Vec2::ZERO, &TextureParams::default());
        gfx.texture(&a, Vec2::ZERO, &TextureParams::default());
        gfx.texture(&b, Vec2::ZERO, &TextureParams::default());
        gfx.flush();

        let draws = log.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].texture, Some(a.id));
        assert_eq!(draws[1].texture, Some(b.id));
    }

    #[test]
    #[should_panic(expected = "has no sampler2D uniform")]
    fn texture_with_primitive_shader_is_fatal() {
        let (mut gfx, _log) = graphics();
        let texture = gfx.create_texture(1, 1, &[0; 4]).unwrap();

        gfx.set_shader(gfx.primitive_shader());
        gfx.texture(&texture, Vec2::ZERO, &TextureParams::default());
    }

    #[test]
    fn untextured_geometry_binds_pixel() {
        let (mut gfx, log) = graphics();

        square(&mut gfx);
        gfx.flush();

        assert_eq!(log.draws()[0].texture, Some(TextureId(0)));
    }

    #[test]
    fn hollow_rect_is_four_rects() {
        let (mut gfx, log) = graphics();

        gfx.hollow_rect(Rect::new(0.0, 0.0, 10.0, 10.0), 1.0, &Color::RED);
        gfx.circle(Vec2::ZERO, 4.0, 8, &Color::RED);
        gfx.flush();

        assert_eq!(log.draws()[0].vertex_count(), 4 * 6 + 8 * 3);
    }

    #[test]
    fn resize_releases_the_old_buffer() {
        let (mut gfx, log) = graphics();
        gfx.reset();
        let old = *gfx.buffer();

        gfx.resize(160, 90).unwrap();

        let buffer = *gfx.buffer();
        assert_ne!(buffer.id, old.id);
        assert_eq!((buffer.width(), buffer.height()), (160, 90));
        let calls = log.calls();
        assert_eq!(
            calls.last(),
            Some(&DeviceCall::DestroyRenderTarget(old.id))
        );
        // the new buffer takes over the binding of the released one
        assert!(calls.contains(&DeviceCall::BindTarget(Some(buffer.id))));

        square(&mut gfx);
        gfx.flush();
        assert_eq!(log.draws()[0].target, Some(buffer.id));
    }

    #[test]
    fn frame_blits_buffer_on_surface() {
        let (mut gfx, log) = graphics();
        gfx.resolution_style = ResolutionStyle::Contain;

        gfx.reset();
        square(&mut gfx);
        gfx.finalize();
        gfx.present().unwrap();

        let draws = log.draws();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].target, Some(gfx.buffer().id));

        let blit = &draws[1];
        assert_eq!(blit.target, None);
        assert_eq!(blit.texture, Some(gfx.buffer().texture.id));
        assert_eq!(
            blit.positions,
            vec![0.0, 0.0, 640.0, 0.0, 640.0, 360.0, 0.0, 0.0, 640.0, 360.0, 0.0, 360.0]
        );
        assert_eq!(gfx.draw_calls(), 2);

        let calls = log.calls();
        assert!(matches!(calls.last(), Some(DeviceCall::Present)));
        assert!(calls.contains(&DeviceCall::Clear(Color::BLACK)));
    }
}
