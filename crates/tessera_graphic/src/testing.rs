//! A [GraphicsDevice] that records every call instead of talking to a GPU
//!
//! Used to observe batching from tests, in this crate and in the crates that
//! build on top of it.

use std::{cell::RefCell, rc::Rc};

use rustc_hash::FxHashMap;

use crate::{
    BlendMode, Color, GraphicsDevice, GraphicsError, ProgramId, ShaderDescriptor, TargetId,
    TextureId, UniformValue,
};

/// One recorded draw with the state it was issued under
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub positions: Vec<f32>,
    pub texcoords: Vec<f32>,
    pub colors: Vec<f32>,
    pub program: Option<ProgramId>,
    pub blend: BlendMode,
    pub target: Option<TargetId>,
    pub texture: Option<TextureId>,
}

impl DrawCall {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 2
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeviceCall {
    CreateProgram(String),
    CreateTexture { width: u32, height: u32 },
    CreateRenderTarget { width: u32, height: u32 },
    DestroyRenderTarget(TargetId),
    UseProgram(ProgramId),
    SetUniform {
        program: ProgramId,
        index: usize,
        value: UniformValue,
    },
    SetBlendMode(BlendMode),
    BindTarget(Option<TargetId>),
    Clear(Color),
    Draw(DrawCall),
    Present,
}

/// Shared view on the calls received by a [RecordingDevice]
#[derive(Clone, Debug, Default)]
pub struct DeviceLog(Rc<RefCell<Vec<DeviceCall>>>);

impl DeviceLog {
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.0.borrow().clone()
    }

    pub fn draws(&self) -> Vec<DrawCall> {
        self.0
            .borrow()
            .iter()
            .filter_map(|call| match call {
                DeviceCall::Draw(draw) => Some(draw.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    fn record(&self, call: DeviceCall) {
        self.0.borrow_mut().push(call);
    }
}

#[derive(Debug)]
pub struct RecordingDevice {
    log: DeviceLog,
    surface: (u32, u32),
    programs: usize,
    textures: usize,
    targets: usize,
    program: Option<ProgramId>,
    blend: BlendMode,
    target: Option<TargetId>,
    samplers: FxHashMap<ProgramId, TextureId>,
}

impl RecordingDevice {
    pub fn new(surface_width: u32, surface_height: u32) -> (Self, DeviceLog) {
        let log = DeviceLog::default();
        (
            Self {
                log: log.clone(),
                surface: (surface_width, surface_height),
                programs: 0,
                textures: 0,
                targets: 0,
                program: None,
                blend: BlendMode::Normal,
                target: None,
                samplers: FxHashMap::default(),
            },
            log,
        )
    }
}

impl GraphicsDevice for RecordingDevice {
    fn create_program(
        &mut self,
        descriptor: &ShaderDescriptor,
    ) -> Result<ProgramId, GraphicsError> {
        self.log
            .record(DeviceCall::CreateProgram(descriptor.name.clone()));
        self.programs += 1;
        Ok(ProgramId(self.programs - 1))
    }

    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<TextureId, GraphicsError> {
        let expected = (width * height * 4) as usize;
        if pixels.len() != expected {
            return Err(GraphicsError::TextureSize {
                expected,
                actual: pixels.len(),
            });
        }

        self.log.record(DeviceCall::CreateTexture { width, height });
        self.textures += 1;
        Ok(TextureId(self.textures - 1))
    }

    fn create_render_target(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<(TargetId, TextureId), GraphicsError> {
        self.log
            .record(DeviceCall::CreateRenderTarget { width, height });
        self.targets += 1;
        self.textures += 1;
        Ok((TargetId(self.targets - 1), TextureId(self.textures - 1)))
    }

    fn destroy_render_target(&mut self, target: TargetId, _texture: TextureId) {
        self.log.record(DeviceCall::DestroyRenderTarget(target));
    }

    fn use_program(&mut self, program: ProgramId) {
        self.log.record(DeviceCall::UseProgram(program));
        self.program = Some(program);
    }

    fn set_uniform(&mut self, program: ProgramId, index: usize, value: &UniformValue) {
        if let UniformValue::Sampler2D(Some(texture)) = value {
            self.samplers.insert(program, *texture);
        }
        self.log.record(DeviceCall::SetUniform {
            program,
            index,
            value: value.clone(),
        });
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.log.record(DeviceCall::SetBlendMode(mode));
        self.blend = mode;
    }

    fn bind_target(&mut self, target: Option<TargetId>, _viewport: (u32, u32)) {
        self.log.record(DeviceCall::BindTarget(target));
        self.target = target;
    }

    fn clear(&mut self, color: Color) {
        self.log.record(DeviceCall::Clear(color));
    }

    fn draw_triangles(&mut self, positions: &[f32], texcoords: &[f32], colors: &[f32]) {
        let texture = self
            .program
            .and_then(|program| self.samplers.get(&program).copied());

        self.log.record(DeviceCall::Draw(DrawCall {
            positions: positions.to_vec(),
            texcoords: texcoords.to_vec(),
            colors: colors.to_vec(),
            program: self.program,
            blend: self.blend,
            target: self.target,
            texture,
        }));
    }

    fn surface_size(&self) -> (u32, u32) {
        self.surface
    }

    fn present(&mut self) -> Result<(), GraphicsError> {
        self.log.record(DeviceCall::Present);
        Ok(())
    }
}
