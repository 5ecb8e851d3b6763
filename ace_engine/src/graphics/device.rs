/// GraphicsDevice trait, GPU object handles and the descriptors passed to it.
///
/// The trait is the seam between the backend-agnostic wrappers (`Shader`,
/// `Texture`) and a concrete API. It mirrors the immediate-mode OpenGL calls
/// the exercises make; a backend translates each method to one or a few GL
/// calls. All methods take `&self`: the device is single-threaded and shared
/// through `Rc`.

use std::num::NonZeroU32;
use bitflags::bitflags;

use crate::error::Result;
use crate::math::Mat4;

// ===== HANDLES =====

macro_rules! gpu_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub NonZeroU32);

        impl $name {
            /// Raw API object name
            pub fn id(self) -> u32 {
                self.0.get()
            }
        }
    };
}

gpu_handle!(
    /// Compiled shader stage object
    ShaderHandle
);
gpu_handle!(
    /// Linked program object
    ProgramHandle
);
gpu_handle!(
    /// Texture object
    TextureHandle
);
gpu_handle!(
    /// Buffer object
    BufferHandle
);
gpu_handle!(
    /// Vertex array object
    VertexArrayHandle
);

/// Uniform location inside one program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

// ===== SHADERS =====

/// Programmable pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// GLSL type of an active attribute or uniform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlslType {
    Bool,
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
    Sampler2D,
    Sampler3D,
    SamplerCube,
    Sampler2DShadow,
    /// Any type not listed above (raw API enum)
    Other(u32),
}

impl GlslType {
    /// GLSL spelling, `"other"` for unlisted types
    pub fn name(self) -> &'static str {
        match self {
            GlslType::Bool => "bool",
            GlslType::Int => "int",
            GlslType::Float => "float",
            GlslType::Vec2 => "vec2",
            GlslType::Vec3 => "vec3",
            GlslType::Vec4 => "vec4",
            GlslType::Mat2 => "mat2",
            GlslType::Mat3 => "mat3",
            GlslType::Mat4 => "mat4",
            GlslType::Sampler2D => "sampler2D",
            GlslType::Sampler3D => "sampler3D",
            GlslType::SamplerCube => "samplerCube",
            GlslType::Sampler2DShadow => "sampler2DShadow",
            GlslType::Other(_) => "other",
        }
    }
}

/// Active attribute or uniform reported by program introspection
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveVariable {
    pub name: String,
    /// Array length, 1 for non-arrays
    pub size: i32,
    pub ty: GlslType,
}

impl ActiveVariable {
    /// Names to query locations for: `name[0]..name[size-1]` for arrays
    pub fn expanded_names(&self) -> Vec<String> {
        if self.size > 1 {
            let base = self.name.strip_suffix("[0]").unwrap_or(&self.name);
            (0..self.size).map(|j| format!("{}[{}]", base, j)).collect()
        } else {
            vec![self.name.clone()]
        }
    }
}

/// Value for a `set_uniform` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat4(Mat4),
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::Int(v)
    }
}

impl From<bool> for UniformValue {
    fn from(v: bool) -> Self {
        UniformValue::Int(v as i32)
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<[f32; 2]> for UniformValue {
    fn from(v: [f32; 2]) -> Self {
        UniformValue::Vec2(v)
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from(v: [f32; 3]) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<crate::math::Vec3> for UniformValue {
    fn from(v: crate::math::Vec3) -> Self {
        UniformValue::Vec3([v.x, v.y, v.z])
    }
}

impl From<[f32; 4]> for UniformValue {
    fn from(v: [f32; 4]) -> Self {
        UniformValue::Vec4(v)
    }
}

impl From<Mat4> for UniformValue {
    fn from(m: Mat4) -> Self {
        UniformValue::Mat4(m)
    }
}

impl From<glam::Mat4> for UniformValue {
    fn from(m: glam::Mat4) -> Self {
        UniformValue::Mat4(m.into())
    }
}

// ===== TEXTURES =====

/// Texture formats the wrappers upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    /// 8-bit RGBA, sampled with sRGB-to-linear conversion
    R8G8B8A8_SRGB,
    /// 8-bit RGBA, linear
    R8G8B8A8_UNORM,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureWrap {
    Repeat,
    ClampToEdge,
    MirroredRepeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

/// Descriptor for creating a 2D texture
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format (source data is always tightly packed RGBA8)
    pub format: TextureFormat,
    /// Wrap mode on S and T
    pub wrap: TextureWrap,
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
}

// ===== BUFFERS AND DRAW STATE =====

/// Expected update frequency of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Written once
    Static,
    /// Rewritten every frame
    Dynamic,
}

/// One float vertex attribute read from a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    /// Components per vertex (1 to 4)
    pub components: i32,
    /// Bytes between consecutive vertices (0 = tightly packed)
    pub stride: i32,
    /// Byte offset of the first component
    pub offset: i32,
}

impl VertexAttribute {
    /// Tightly packed attribute starting at offset 0
    pub fn packed(location: u32, components: i32) -> Self {
        Self { location, components, stride: 0, offset: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    Triangles,
    TriangleStrip,
    Lines,
    Points,
}

/// Winding order of front-facing triangles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontFace {
    Clockwise,
    CounterClockwise,
}

bitflags! {
    /// Buffers cleared by `clear`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearMask: u32 {
        const COLOR = 0b01;
        const DEPTH = 0b10;
    }
}

// ===== DEVICE TRAIT =====

/// Immediate-mode graphics device
///
/// Create methods return `Err` when the API hands back no object; every
/// other call is fire-and-forget, matching the underlying GL semantics
/// (errors surface through the backend's error checking).
pub trait GraphicsDevice {
    // ----- shaders and programs -----

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderHandle>;
    fn shader_source(&self, shader: ShaderHandle, source: &str);
    fn compile_shader(&self, shader: ShaderHandle);
    fn shader_compile_status(&self, shader: ShaderHandle) -> bool;
    fn shader_info_log(&self, shader: ShaderHandle) -> String;
    fn delete_shader(&self, shader: ShaderHandle);

    fn create_program(&self) -> Result<ProgramHandle>;
    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle);
    fn link_program(&self, program: ProgramHandle);
    fn program_link_status(&self, program: ProgramHandle) -> bool;
    /// Run program validation and return the validate status
    fn validate_program(&self, program: ProgramHandle) -> bool;
    fn program_info_log(&self, program: ProgramHandle) -> String;
    fn attached_shader_count(&self, program: ProgramHandle) -> i32;
    fn delete_program(&self, program: ProgramHandle);

    /// Bind a program (`None` unbinds)
    fn use_program(&self, program: Option<ProgramHandle>);
    /// Program currently bound on the context
    fn current_program(&self) -> Option<ProgramHandle>;

    fn active_attributes(&self, program: ProgramHandle) -> Vec<ActiveVariable>;
    fn active_uniforms(&self, program: ProgramHandle) -> Vec<ActiveVariable>;
    fn attribute_location(&self, program: ProgramHandle, name: &str) -> Option<u32>;
    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation>;
    /// Upload a uniform to the currently bound program
    fn set_uniform(&self, location: UniformLocation, value: &UniformValue);

    // ----- textures -----

    /// Create a 2D texture from tightly packed RGBA8 pixels
    fn create_texture(&self, desc: &TextureDesc, rgba_pixels: &[u8]) -> Result<TextureHandle>;
    /// Bind to texture unit `unit` (`None` unbinds the unit)
    fn bind_texture(&self, unit: u32, texture: Option<TextureHandle>);
    fn delete_texture(&self, texture: TextureHandle);

    // ----- buffers and vertex arrays -----

    fn create_buffer(&self, data: &[u8], usage: BufferUsage) -> Result<BufferHandle>;
    fn update_buffer(&self, buffer: BufferHandle, offset: usize, data: &[u8]);
    fn delete_buffer(&self, buffer: BufferHandle);

    fn create_vertex_array(&self) -> Result<VertexArrayHandle>;
    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>);
    /// Describe and enable `attribute` on the bound vertex array, sourced from `buffer`
    fn vertex_attribute(&self, buffer: BufferHandle, attribute: VertexAttribute);
    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle);

    // ----- fixed-function state and drawing -----

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&self, mask: ClearMask);
    fn set_depth_test(&self, enabled: bool);
    /// Back-face culling with the given front face, or disabled with `None`
    fn set_culling(&self, front_face: Option<FrontFace>);
    fn draw_arrays(&self, topology: PrimitiveTopology, first: i32, count: i32);

    /// Read the `width x height` region at (x, y) as RGB8, bottom row first
    fn read_pixels_rgb(&self, x: i32, y: i32, width: i32, height: i32) -> Vec<u8>;
}
