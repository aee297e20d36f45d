use tessera_math::Matrix;

use crate::{ProgramId, TextureId};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UniformType {
    Float,
    Float2,
    Float4,
    Matrix3,
    Sampler2D,
}

#[derive(Clone, Debug, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Float2([f32; 2]),
    Float4([f32; 4]),
    Matrix3([f32; 9]),
    Sampler2D(Option<TextureId>),
}

impl UniformValue {
    fn default_for(uniform_type: UniformType) -> Self {
        match uniform_type {
            UniformType::Float => UniformValue::Float(0.0),
            UniformType::Float2 => UniformValue::Float2([0.0; 2]),
            UniformType::Float4 => UniformValue::Float4([0.0; 4]),
            UniformType::Matrix3 => {
                UniformValue::Matrix3(Matrix::IDENTITY.to_cols_array())
            }
            UniformType::Sampler2D => UniformValue::Sampler2D(None),
        }
    }

    pub fn uniform_type(&self) -> UniformType {
        match self {
            UniformValue::Float(_) => UniformType::Float,
            UniformValue::Float2(_) => UniformType::Float2,
            UniformValue::Float4(_) => UniformType::Float4,
            UniformValue::Matrix3(_) => UniformType::Matrix3,
            UniformValue::Sampler2D(_) => UniformType::Sampler2D,
        }
    }
}

/// Which per-vertex stream an attribute reads
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AttributeType {
    Position,
    Texcoord,
    Color,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderAttribute {
    pub name: String,
    pub attribute_type: AttributeType,
}

impl ShaderAttribute {
    pub fn new(name: &str, attribute_type: AttributeType) -> Self {
        Self {
            name: name.to_owned(),
            attribute_type,
        }
    }
}

/// Everything a device needs to build a program
#[derive(Clone, Debug)]
pub struct ShaderDescriptor {
    pub name: String,
    /// WGSL source with a `vs_main` and a `fs_main` entry point
    pub source: String,
    pub uniforms: Vec<(String, UniformType)>,
    pub attributes: Vec<ShaderAttribute>,
}

impl ShaderDescriptor {
    fn default_attributes() -> Vec<ShaderAttribute> {
        vec![
            ShaderAttribute::new("a_position", AttributeType::Position),
            ShaderAttribute::new("a_texcoord", AttributeType::Texcoord),
            ShaderAttribute::new("a_color", AttributeType::Color),
        ]
    }

    /// Samples a texture and tints it with the vertex color
    pub fn texture() -> Self {
        Self {
            name: String::from("texture"),
            source: include_str!("shader_texture.wgsl").to_owned(),
            uniforms: vec![
                (String::from("u_matrix"), UniformType::Matrix3),
                (String::from("u_texture"), UniformType::Sampler2D),
            ],
            attributes: Self::default_attributes(),
        }
    }

    /// Flat vertex colors, used by the debug overlay
    pub fn primitive() -> Self {
        Self {
            name: String::from("primitive"),
            source: include_str!("shader_primitive.wgsl").to_owned(),
            uniforms: vec![(String::from("u_matrix"), UniformType::Matrix3)],
            attributes: Self::default_attributes(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Uniform {
    name: String,
    value: UniformValue,
    dirty: bool,
}

impl Uniform {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &UniformValue {
        &self.value
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// CPU side mirror of a linked program
///
/// Uniform writes are only recorded here; [Graphics](crate::Graphics)
/// uploads the dirty ones the next time geometry is pushed, after flushing
/// whatever was batched under the old values.
#[derive(Debug)]
pub struct Shader {
    name: String,
    program: ProgramId,
    uniforms: Vec<Uniform>,
    attributes: Vec<ShaderAttribute>,
    sampler: Option<usize>,
    matrix: Option<usize>,
}

impl Shader {
    pub(crate) fn new(program: ProgramId, descriptor: &ShaderDescriptor) -> Self {
        let uniforms: Vec<Uniform> = descriptor
            .uniforms
            .iter()
            .map(|(name, uniform_type)| Uniform {
                name: name.clone(),
                value: UniformValue::default_for(*uniform_type),
                dirty: true,
            })
            .collect();

        let position_of = |wanted: UniformType| {
            descriptor
                .uniforms
                .iter()
                .position(|(_, uniform_type)| *uniform_type == wanted)
        };

        Self {
            name: descriptor.name.clone(),
            program,
            sampler: position_of(UniformType::Sampler2D),
            matrix: position_of(UniformType::Matrix3),
            uniforms,
            attributes: descriptor.attributes.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn program(&self) -> ProgramId {
        self.program
    }

    pub fn uniforms(&self) -> &[Uniform] {
        &self.uniforms
    }

    pub fn attributes(&self) -> &[ShaderAttribute] {
        &self.attributes
    }

    pub fn has_sampler(&self) -> bool {
        self.sampler.is_some()
    }

    pub fn is_dirty(&self) -> bool {
        self.uniforms.iter().any(|u| u.dirty)
    }

    /// Assigns a uniform by name, an unchanged value keeps the uniform clean
    pub fn set(&mut self, name: &str, value: UniformValue) {
        let index = self
            .uniforms
            .iter()
            .position(|u| u.name == name)
            .unwrap_or_else(|| panic!("shader `{}` has no uniform `{}`", self.name, name));
        self.set_at(index, value);
    }

    /// Assigns the first matrix uniform of the shader
    pub fn set_matrix(&mut self, matrix: &Matrix) {
        let index = self
            .matrix
            .unwrap_or_else(|| panic!("shader `{}` has no matrix uniform", self.name));
        self.set_at(index, UniformValue::Matrix3(matrix.to_cols_array()));
    }

    /// Assigns the sampler uniform of the shader
    pub fn set_texture(&mut self, texture: TextureId) {
        let index = self
            .sampler
            .unwrap_or_else(|| panic!("shader `{}` has no sampler2D uniform", self.name));
        self.set_at(index, UniformValue::Sampler2D(Some(texture)));
    }

    pub fn texture(&self) -> Option<TextureId> {
        self.sampler.and_then(|index| match self.uniforms[index].value {
            UniformValue::Sampler2D(texture) => texture,
            _ => None,
        })
    }

    fn set_at(&mut self, index: usize, value: UniformValue) {
        let uniform = &mut self.uniforms[index];
        let expected = uniform.value.uniform_type();
        if value.uniform_type() != expected {
            panic!(
                "uniform `{}` of shader `{}` is {:?}, got {:?}",
                uniform.name,
                self.name,
                expected,
                value.uniform_type()
            );
        }

        if uniform.value != value {
            uniform.value = value;
            uniform.dirty = true;
        }
    }

    /// Returns the dirty uniforms with their index and marks them clean
    pub(crate) fn take_dirty(&mut self) -> Vec<(usize, UniformValue)> {
        self.uniforms
            .iter_mut()
            .enumerate()
            .filter(|(_, u)| u.dirty)
            .map(|(index, u)| {
                u.dirty = false;
                (index, u.value.clone())
            })
            .collect()
    }
}
