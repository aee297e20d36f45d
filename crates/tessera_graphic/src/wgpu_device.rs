use std::{iter, num::NonZeroU64, ops::Range};

use rustc_hash::FxHashMap;

use crate::{
    BlendMode, Color, GraphicsDevice, GraphicsError, ProgramId, ShaderDescriptor, TargetId,
    TextureId, UniformType, UniformValue,
};

/// Size of the uniform block slot every draw gets, the minimum dynamic
/// offset alignment guaranteed by wgpu
const UNIFORM_SLOT: usize = 256;

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
const TEXCOORD_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x2];
const COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x4];

/// Requests an adapter, a device and its queue able to draw on `surface`
pub async fn create_adapter_device_queue(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface,
) -> Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue), GraphicsError> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(surface),
            force_fallback_adapter: false,
        })
        .await
        .ok_or(GraphicsError::NoAdapter)?;

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: None,
                features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
            },
            None,
        )
        .await?;

    Ok((adapter, device, queue))
}

/// Byte offset and type of every non sampler uniform, following the WGSL
/// uniform address space layout rules
fn uniform_block_layout(descriptor: &ShaderDescriptor) -> (Vec<Option<usize>>, usize) {
    let mut offset = 0;
    let offsets = descriptor
        .uniforms
        .iter()
        .map(|(_, uniform_type)| {
            let (align, size) = match uniform_type {
                UniformType::Float => (4, 4),
                UniformType::Float2 => (8, 8),
                UniformType::Float4 => (16, 16),
                UniformType::Matrix3 => (16, 48),
                UniformType::Sampler2D => return None,
            };
            let aligned = (offset + align - 1) / align * align;
            offset = aligned + size;
            Some(aligned)
        })
        .collect();

    (offsets, (offset + 15) / 16 * 16)
}

fn blend_state(mode: BlendMode) -> wgpu::BlendState {
    let color = match mode {
        BlendMode::Normal => wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        BlendMode::Add => wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
        BlendMode::Multiply => wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::Dst,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        BlendMode::Screen => wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrc,
            operation: wgpu::BlendOperation::Add,
        },
    };

    wgpu::BlendState {
        color,
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

fn to_wgpu_color(color: Color) -> wgpu::Color {
    wgpu::Color {
        r: color.r() as f64,
        g: color.g() as f64,
        b: color.b() as f64,
        a: color.a() as f64,
    }
}

struct Program {
    name: String,
    module: wgpu::ShaderModule,
    layout: wgpu::PipelineLayout,
    textured: bool,
    offsets: Vec<Option<usize>>,
    block: Vec<u8>,
    texture: Option<TextureId>,
    /// Uniform slot of the current block in this frame, if already staged
    slot: Option<u32>,
    pipelines: FxHashMap<BlendMode, wgpu::RenderPipeline>,
}

struct GpuTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

struct GpuTarget {
    view: wgpu::TextureView,
}

/// Stores `value` in the first free slot, or a new one at the end
fn insert_slot<T>(slots: &mut Vec<Option<T>>, value: T) -> usize {
    match slots.iter().position(Option::is_none) {
        Some(index) => {
            slots[index] = Some(value);
            index
        }
        None => {
            slots.push(Some(value));
            slots.len() - 1
        }
    }
}

#[derive(Debug)]
enum Command {
    Clear {
        target: Option<TargetId>,
        color: Color,
    },
    Draw {
        target: Option<TargetId>,
        program: ProgramId,
        blend: BlendMode,
        texture: Option<TextureId>,
        uniform_offset: u32,
        vertices: Range<u32>,
    },
}

impl Command {
    fn target(&self) -> Option<TargetId> {
        match self {
            Command::Clear { target, .. } | Command::Draw { target, .. } => *target,
        }
    }
}

struct Pass {
    target: Option<TargetId>,
    clear: Option<Color>,
    commands: Range<usize>,
}

/// [GraphicsDevice] drawing through wgpu
///
/// Draws are recorded while the frame is built and encoded on
/// [GraphicsDevice::present], one render pass for every run of commands on
/// the same target.
pub struct WgpuDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface,
    config: wgpu::SurfaceConfiguration,
    uniform_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    programs: Vec<Program>,
    textures: Vec<Option<GpuTexture>>,
    targets: Vec<Option<GpuTarget>>,
    /// Destroyed targets, released once the frame that may still draw them
    /// is presented
    retired: Vec<(TargetId, TextureId)>,
    program: Option<ProgramId>,
    blend: BlendMode,
    target: Option<TargetId>,
    commands: Vec<Command>,
    positions: Vec<f32>,
    texcoords: Vec<f32>,
    colors: Vec<f32>,
    uniforms: Vec<u8>,
    buffers: Option<[wgpu::Buffer; 4]>,
}

impl std::fmt::Debug for WgpuDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WgpuDevice")
            .field("format", &self.config.format)
            .field("size", &(self.config.width, self.config.height))
            .field("programs", &self.programs.len())
            .field("textures", &self.textures.iter().flatten().count())
            .field("targets", &self.targets.iter().flatten().count())
            .field("commands", &self.commands.len())
            .finish()
    }
}

impl WgpuDevice {
    /// Builds a device drawing on `surface`, the host owns the window the
    /// surface was created from
    pub fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface,
        width: u32,
        height: u32,
    ) -> Result<Self, GraphicsError> {
        let (adapter, device, queue) =
            pollster::block_on(create_adapter_device_queue(instance, &surface))?;
        Self::from_parts(&adapter, device, queue, surface, width, height)
    }

    /// Builds a device from an already requested device and queue, for hosts
    /// that cannot block on [create_adapter_device_queue]
    pub fn from_parts(
        adapter: &wgpu::Adapter,
        device: wgpu::Device,
        queue: wgpu::Queue,
        surface: wgpu::Surface,
        width: u32,
        height: u32,
    ) -> Result<Self, GraphicsError> {
        let capabilities = surface.get_capabilities(adapter);
        let format = capabilities
            .formats
            .first()
            .copied()
            .ok_or(GraphicsError::NoAdapter)?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: capabilities.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        log::debug!("surface configured as {:?} {}x{}", format, width, height);

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(UNIFORM_SLOT as u64),
                },
                count: None,
            }],
            label: Some("uniform_bind_group_layout"),
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
            label: Some("texture_bind_group_layout"),
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Ok(Self {
            device,
            queue,
            surface,
            config,
            uniform_layout,
            texture_layout,
            sampler,
            programs: Vec::new(),
            textures: Vec::new(),
            targets: Vec::new(),
            retired: Vec::new(),
            program: None,
            blend: BlendMode::Normal,
            target: None,
            commands: Vec::new(),
            positions: Vec::new(),
            texcoords: Vec::new(),
            colors: Vec::new(),
            uniforms: Vec::new(),
            buffers: None,
        })
    }

    /// Reconfigures the surface after the host window changed size
    pub fn resize_surface(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    fn bind_texture(&self, view: &wgpu::TextureView) -> wgpu::BindGroup {
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
            label: Some("texture_bind_group"),
        })
    }

    fn create_pipelines(&mut self) {
        let format = self.config.format;
        for command in &self.commands {
            let (program, blend) = match command {
                Command::Draw { program, blend, .. } => (&mut self.programs[program.0], *blend),
                Command::Clear { .. } => continue,
            };
            if program.pipelines.contains_key(&blend) {
                continue;
            }

            log::debug!("creating pipeline for `{}` with {:?}", program.name, blend);
            let pipeline = self
                .device
                .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some(program.name.as_str()),
                    layout: Some(&program.layout),
                    vertex: wgpu::VertexState {
                        module: &program.module,
                        entry_point: "vs_main",
                        buffers: &[
                            wgpu::VertexBufferLayout {
                                array_stride: 8,
                                step_mode: wgpu::VertexStepMode::Vertex,
                                attributes: &POSITION_ATTRIBUTES,
                            },
                            wgpu::VertexBufferLayout {
                                array_stride: 8,
                                step_mode: wgpu::VertexStepMode::Vertex,
                                attributes: &TEXCOORD_ATTRIBUTES,
                            },
                            wgpu::VertexBufferLayout {
                                array_stride: 16,
                                step_mode: wgpu::VertexStepMode::Vertex,
                                attributes: &COLOR_ATTRIBUTES,
                            },
                        ],
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &program.module,
                        entry_point: "fs_main",
                        targets: &[Some(wgpu::ColorTargetState {
                            format,
                            blend: Some(blend_state(blend)),
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                    }),
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        cull_mode: None,
                        ..Default::default()
                    },
                    depth_stencil: None,
                    multisample: wgpu::MultisampleState::default(),
                    multiview: None,
                });
            program.pipelines.insert(blend, pipeline);
        }
    }

    fn upload_frame_data(&mut self) -> [wgpu::Buffer; 4] {
        let sizes = [
            self.positions.len() * 4,
            self.texcoords.len() * 4,
            self.colors.len() * 4,
            self.uniforms.len().max(UNIFORM_SLOT),
        ];

        let buffers = match self.buffers.take() {
            Some(buffers)
                if buffers
                    .iter()
                    .zip(sizes.iter())
                    .all(|(buffer, size)| buffer.size() >= *size as u64) =>
            {
                buffers
            }
            _ => {
                let create = |label: &str, size: usize, usage: wgpu::BufferUsages| {
                    self.device.create_buffer(&wgpu::BufferDescriptor {
                        label: Some(label),
                        size: (size.max(UNIFORM_SLOT) as u64).next_power_of_two(),
                        usage: usage | wgpu::BufferUsages::COPY_DST,
                        mapped_at_creation: false,
                    })
                };
                [
                    create("position_buffer", sizes[0], wgpu::BufferUsages::VERTEX),
                    create("texcoord_buffer", sizes[1], wgpu::BufferUsages::VERTEX),
                    create("color_buffer", sizes[2], wgpu::BufferUsages::VERTEX),
                    create("uniform_buffer", sizes[3], wgpu::BufferUsages::UNIFORM),
                ]
            }
        };

        self.queue
            .write_buffer(&buffers[0], 0, bytemuck::cast_slice(self.positions.as_slice()));
        self.queue
            .write_buffer(&buffers[1], 0, bytemuck::cast_slice(self.texcoords.as_slice()));
        self.queue
            .write_buffer(&buffers[2], 0, bytemuck::cast_slice(self.colors.as_slice()));
        self.queue.write_buffer(&buffers[3], 0, &self.uniforms);

        buffers
    }

    fn passes(&self) -> Vec<Pass> {
        let mut passes: Vec<Pass> = Vec::new();
        for (index, command) in self.commands.iter().enumerate() {
            let clear = match command {
                Command::Clear { color, .. } => Some(*color),
                Command::Draw { .. } => None,
            };

            match passes.last_mut() {
                Some(pass) if pass.target == command.target() && clear.is_none() => {
                    pass.commands.end = index + 1;
                }
                _ => passes.push(Pass {
                    target: command.target(),
                    clear,
                    commands: index..index + 1,
                }),
            }
        }
        passes
    }

    fn end_frame(&mut self) {
        self.commands.clear();
        self.positions.clear();
        self.texcoords.clear();
        self.colors.clear();
        self.uniforms.clear();
        for program in &mut self.programs {
            program.slot = None;
        }
        for (target, texture) in std::mem::take(&mut self.retired) {
            self.targets[target.0] = None;
            self.textures[texture.0] = None;
            log::debug!("released render target {:?}", target);
        }
    }
}

impl GraphicsDevice for WgpuDevice {
    fn create_program(
        &mut self,
        descriptor: &ShaderDescriptor,
    ) -> Result<ProgramId, GraphicsError> {
        let (offsets, size) = uniform_block_layout(descriptor);
        if size > UNIFORM_SLOT {
            log::error!("uniform block of `{}` is {} bytes", descriptor.name, size);
            return Err(GraphicsError::UniformBlockTooLarge {
                shader: descriptor.name.clone(),
                size,
                max: UNIFORM_SLOT,
            });
        }

        let textured = descriptor
            .uniforms
            .iter()
            .any(|(_, uniform_type)| *uniform_type == UniformType::Sampler2D);

        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(descriptor.name.as_str()),
                source: wgpu::ShaderSource::Wgsl(descriptor.source.as_str().into()),
            });

        let mut bind_group_layouts = vec![&self.uniform_layout];
        if textured {
            bind_group_layouts.push(&self.texture_layout);
        }
        let layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(descriptor.name.as_str()),
                bind_group_layouts: &bind_group_layouts,
                push_constant_ranges: &[],
            });

        self.programs.push(Program {
            name: descriptor.name.clone(),
            module,
            layout,
            textured,
            offsets,
            block: vec![0; UNIFORM_SLOT],
            texture: None,
            slot: None,
            pipelines: FxHashMap::default(),
        });

        Ok(ProgramId(self.programs.len() - 1))
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

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            label: Some("texture"),
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            pixels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.bind_texture(&view);
        let id = insert_slot(
            &mut self.textures,
            GpuTexture {
                _texture: texture,
                bind_group,
            },
        );

        Ok(TextureId(id))
    }

    fn create_render_target(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<(TargetId, TextureId), GraphicsError> {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.config.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING,
            label: Some("render_target"),
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.bind_texture(&view);
        let texture = insert_slot(
            &mut self.textures,
            GpuTexture {
                _texture: texture,
                bind_group,
            },
        );
        let target = insert_slot(&mut self.targets, GpuTarget { view });

        Ok((TargetId(target), TextureId(texture)))
    }

    fn destroy_render_target(&mut self, target: TargetId, texture: TextureId) {
        self.retired.push((target, texture));
    }

    fn use_program(&mut self, program: ProgramId) {
        self.program = Some(program);
    }

    fn set_uniform(&mut self, program: ProgramId, index: usize, value: &UniformValue) {
        let program = &mut self.programs[program.0];
        program.slot = None;

        let offset = match (value, program.offsets[index]) {
            (UniformValue::Sampler2D(texture), _) => {
                program.texture = *texture;
                return;
            }
            (_, Some(offset)) => offset,
            (_, None) => return,
        };

        let block = &mut program.block;
        match value {
            UniformValue::Float(v) => {
                block[offset..offset + 4].copy_from_slice(bytemuck::bytes_of(v))
            }
            UniformValue::Float2(v) => {
                block[offset..offset + 8].copy_from_slice(bytemuck::cast_slice(&v[..]))
            }
            UniformValue::Float4(v) => {
                block[offset..offset + 16].copy_from_slice(bytemuck::cast_slice(&v[..]))
            }
            UniformValue::Matrix3(m) => {
                for column in 0..3 {
                    let start = offset + column * 16;
                    block[start..start + 12]
                        .copy_from_slice(bytemuck::cast_slice(&m[column * 3..column * 3 + 3]));
                }
            }
            UniformValue::Sampler2D(_) => {}
        }
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend = mode;
    }

    fn bind_target(&mut self, target: Option<TargetId>, _viewport: (u32, u32)) {
        self.target = target;
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(Command::Clear {
            target: self.target,
            color,
        });
    }

    fn draw_triangles(&mut self, positions: &[f32], texcoords: &[f32], colors: &[f32]) {
        let Some(program_id) = self.program else {
            log::warn!("draw without a program, {} vertices dropped", positions.len() / 2);
            return;
        };

        let program = &mut self.programs[program_id.0];
        if program.textured && program.texture.is_none() {
            log::warn!("draw with `{}` but no texture bound", program.name);
            return;
        }

        let slot = match program.slot {
            Some(slot) => slot,
            None => {
                let slot = self.uniforms.len() as u32;
                self.uniforms.extend_from_slice(&program.block);
                program.slot = Some(slot);
                slot
            }
        };

        let first = (self.positions.len() / 2) as u32;
        self.positions.extend_from_slice(positions);
        self.texcoords.extend_from_slice(texcoords);
        self.colors.extend_from_slice(colors);
        let last = (self.positions.len() / 2) as u32;

        self.commands.push(Command::Draw {
            target: self.target,
            program: program_id,
            blend: self.blend,
            texture: program.texture.filter(|_| program.textured),
            uniform_offset: slot,
            vertices: first..last,
        });
    }

    fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn present(&mut self) -> Result<(), GraphicsError> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                self.end_frame();
                return Ok(());
            }
            Err(error) => {
                log::error!("cannot acquire the next frame: {}", error);
                self.end_frame();
                return Err(error.into());
            }
        };
        let surface_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.create_pipelines();
        let buffers = self.upload_frame_data();
        let passes = self.passes();

        let uniform_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffers[3],
                    offset: 0,
                    size: NonZeroU64::new(UNIFORM_SLOT as u64),
                }),
            }],
            label: Some("uniform_bind_group"),
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        for pass in &passes {
            let view = match pass.target {
                Some(target) => {
                    &self.targets[target.0]
                        .as_ref()
                        .unwrap_or_else(|| panic!("render target {:?} was destroyed", target))
                        .view
                }
                None => &surface_view,
            };
            let load = match pass.clear {
                Some(color) => wgpu::LoadOp::Clear(to_wgpu_color(color)),
                None => wgpu::LoadOp::Load,
            };

            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frame_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations { load, store: true },
                })],
                depth_stencil_attachment: None,
            });

            render_pass.set_vertex_buffer(0, buffers[0].slice(..));
            render_pass.set_vertex_buffer(1, buffers[1].slice(..));
            render_pass.set_vertex_buffer(2, buffers[2].slice(..));

            for command in &self.commands[pass.commands.clone()] {
                if let Command::Draw {
                    program,
                    blend,
                    texture,
                    uniform_offset,
                    vertices,
                    ..
                } = command
                {
                    let program = &self.programs[program.0];
                    render_pass.set_pipeline(&program.pipelines[blend]);
                    render_pass.set_bind_group(0, &uniform_bind_group, &[*uniform_offset]);
                    if let Some(texture) = texture {
                        let bound = self.textures[texture.0]
                            .as_ref()
                            .unwrap_or_else(|| panic!("texture {:?} was destroyed", texture));
                        render_pass.set_bind_group(1, &bound.bind_group, &[]);
                    }
                    render_pass.draw(vertices.clone(), 0..1);
                }
            }
        }

        self.queue.submit(iter::once(encoder.finish()));
        frame.present();

        self.buffers = Some(buffers);
        self.end_frame();
        Ok(())
    }
}
