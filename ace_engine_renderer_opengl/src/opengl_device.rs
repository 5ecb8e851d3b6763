/// OpenGL implementation of the GraphicsDevice trait
///
/// Thin translation layer over `glow`: engine handles wrap the raw GL object
/// names, engine enums map to GL enums, and every call goes straight to the
/// context that was current when the device was created.

use std::num::NonZeroU32;

use ace_engine::ace::graphics::{
    ActiveVariable, BufferHandle, BufferUsage, ClearMask, FrontFace, GlslType, GraphicsDevice,
    PrimitiveTopology, ProgramHandle, ShaderHandle, ShaderStage, TextureDesc, TextureFilter,
    TextureFormat, TextureHandle, TextureWrap, UniformLocation, UniformValue, VertexArrayHandle,
    VertexAttribute,
};
use ace_engine::ace::{Error, Result};
use ace_engine::{engine_bail, engine_err};
use glow::HasContext;

use crate::gl_debug;

const LOG_SOURCE: &str = "ace::opengl";

/// OpenGL graphics device
///
/// Owns the loaded function table. Created by `OpenGlEngine::init` once the
/// context is current, and shared with `Shader`/`Texture` through `Rc`.
pub struct OpenGlDevice {
    gl: glow::Context,
}

impl OpenGlDevice {
    /// Wrap a loaded `glow` context
    pub fn new(gl: glow::Context) -> Self {
        Self { gl }
    }

    /// Raw `glow` context for calls the trait does not cover
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// `GL_RENDERER` string
    pub fn renderer(&self) -> String {
        unsafe { self.gl.get_parameter_string(glow::RENDERER) }
    }

    /// `GL_VERSION` string
    pub fn version(&self) -> String {
        unsafe { self.gl.get_parameter_string(glow::VERSION) }
    }

    /// Drain pending GL errors, logging each. Returns `true` if any were pending.
    pub fn check_errors(&self, context: &str) -> bool {
        gl_debug::check_and_clear_gl_errors(&self.gl, Some(context))
    }

    /// Log the context limits
    pub fn log_params(&self) {
        gl_debug::log_gl_params(&self.gl);
    }

    /// Enable or disable `GL_FRAMEBUFFER_SRGB`
    pub fn set_framebuffer_srgb(&self, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(glow::FRAMEBUFFER_SRGB);
            } else {
                self.gl.disable(glow::FRAMEBUFFER_SRGB);
            }
        }
    }

    /// Enable or disable `GL_MULTISAMPLE`
    pub fn set_multisample(&self, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(glow::MULTISAMPLE);
            } else {
                self.gl.disable(glow::MULTISAMPLE);
            }
        }
    }
}

// ===== HANDLE CONVERSION =====

fn native_shader(shader: ShaderHandle) -> glow::NativeShader {
    glow::NativeShader(shader.0)
}

fn native_program(program: ProgramHandle) -> glow::NativeProgram {
    glow::NativeProgram(program.0)
}

fn native_texture(texture: TextureHandle) -> glow::NativeTexture {
    glow::NativeTexture(texture.0)
}

fn native_buffer(buffer: BufferHandle) -> glow::NativeBuffer {
    glow::NativeBuffer(buffer.0)
}

fn native_vertex_array(vertex_array: VertexArrayHandle) -> glow::NativeVertexArray {
    glow::NativeVertexArray(vertex_array.0)
}

// ===== ENUM CONVERSION =====

/// GL enum of an active variable type
pub(crate) fn glsl_type_from_gl(gltype: u32) -> GlslType {
    match gltype {
        glow::BOOL => GlslType::Bool,
        glow::INT => GlslType::Int,
        glow::FLOAT => GlslType::Float,
        glow::FLOAT_VEC2 => GlslType::Vec2,
        glow::FLOAT_VEC3 => GlslType::Vec3,
        glow::FLOAT_VEC4 => GlslType::Vec4,
        glow::FLOAT_MAT2 => GlslType::Mat2,
        glow::FLOAT_MAT3 => GlslType::Mat3,
        glow::FLOAT_MAT4 => GlslType::Mat4,
        glow::SAMPLER_2D => GlslType::Sampler2D,
        glow::SAMPLER_3D => GlslType::Sampler3D,
        glow::SAMPLER_CUBE => GlslType::SamplerCube,
        glow::SAMPLER_2D_SHADOW => GlslType::Sampler2DShadow,
        other => GlslType::Other(other),
    }
}

pub(crate) fn shader_stage_to_gl(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

/// Internal format for a texture format (source data is always RGBA8)
pub(crate) fn texture_internal_format(format: TextureFormat) -> u32 {
    match format {
        TextureFormat::R8G8B8A8_SRGB => glow::SRGB8_ALPHA8,
        TextureFormat::R8G8B8A8_UNORM => glow::RGBA8,
    }
}

pub(crate) fn texture_wrap_to_gl(wrap: TextureWrap) -> u32 {
    match wrap {
        TextureWrap::Repeat => glow::REPEAT,
        TextureWrap::ClampToEdge => glow::CLAMP_TO_EDGE,
        TextureWrap::MirroredRepeat => glow::MIRRORED_REPEAT,
    }
}

pub(crate) fn texture_filter_to_gl(filter: TextureFilter) -> u32 {
    match filter {
        TextureFilter::Nearest => glow::NEAREST,
        TextureFilter::Linear => glow::LINEAR,
    }
}

pub(crate) fn buffer_usage_to_gl(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::Static => glow::STATIC_DRAW,
        BufferUsage::Dynamic => glow::DYNAMIC_DRAW,
    }
}

pub(crate) fn topology_to_gl(topology: PrimitiveTopology) -> u32 {
    match topology {
        PrimitiveTopology::Triangles => glow::TRIANGLES,
        PrimitiveTopology::TriangleStrip => glow::TRIANGLE_STRIP,
        PrimitiveTopology::Lines => glow::LINES,
        PrimitiveTopology::Points => glow::POINTS,
    }
}

pub(crate) fn front_face_to_gl(front_face: FrontFace) -> u32 {
    match front_face {
        FrontFace::Clockwise => glow::CW,
        FrontFace::CounterClockwise => glow::CCW,
    }
}

pub(crate) fn clear_mask_to_gl(mask: ClearMask) -> u32 {
    let mut bits = 0;
    if mask.contains(ClearMask::COLOR) {
        bits |= glow::COLOR_BUFFER_BIT;
    }
    if mask.contains(ClearMask::DEPTH) {
        bits |= glow::DEPTH_BUFFER_BIT;
    }
    bits
}

// ===== GRAPHICS DEVICE IMPLEMENTATION =====

impl GraphicsDevice for OpenGlDevice {
    // ----- shaders and programs -----

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderHandle> {
        let shader = unsafe { self.gl.create_shader(shader_stage_to_gl(stage)) }
            .map_err(|e| engine_err!(LOG_SOURCE, "glCreateShader({:?}) failed: {}", stage, e))?;
        Ok(ShaderHandle(shader.0))
    }

    fn shader_source(&self, shader: ShaderHandle, source: &str) {
        unsafe { self.gl.shader_source(native_shader(shader), source) };
    }

    fn compile_shader(&self, shader: ShaderHandle) {
        unsafe { self.gl.compile_shader(native_shader(shader)) };
    }

    fn shader_compile_status(&self, shader: ShaderHandle) -> bool {
        unsafe { self.gl.get_shader_compile_status(native_shader(shader)) }
    }

    fn shader_info_log(&self, shader: ShaderHandle) -> String {
        unsafe { self.gl.get_shader_info_log(native_shader(shader)) }
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        unsafe { self.gl.delete_shader(native_shader(shader)) };
    }

    fn create_program(&self) -> Result<ProgramHandle> {
        let program = unsafe { self.gl.create_program() }
            .map_err(|e| engine_err!(LOG_SOURCE, "glCreateProgram failed: {}", e))?;
        Ok(ProgramHandle(program.0))
    }

    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        unsafe { self.gl.attach_shader(native_program(program), native_shader(shader)) };
    }

    fn link_program(&self, program: ProgramHandle) {
        unsafe { self.gl.link_program(native_program(program)) };
    }

    fn program_link_status(&self, program: ProgramHandle) -> bool {
        unsafe { self.gl.get_program_link_status(native_program(program)) }
    }

    fn validate_program(&self, program: ProgramHandle) -> bool {
        unsafe {
            self.gl.validate_program(native_program(program));
            self.gl.get_program_parameter_i32(native_program(program), glow::VALIDATE_STATUS) != 0
        }
    }

    fn program_info_log(&self, program: ProgramHandle) -> String {
        unsafe { self.gl.get_program_info_log(native_program(program)) }
    }

    fn attached_shader_count(&self, program: ProgramHandle) -> i32 {
        unsafe { self.gl.get_program_parameter_i32(native_program(program), glow::ATTACHED_SHADERS) }
    }

    fn delete_program(&self, program: ProgramHandle) {
        unsafe { self.gl.delete_program(native_program(program)) };
    }

    fn use_program(&self, program: Option<ProgramHandle>) {
        unsafe { self.gl.use_program(program.map(native_program)) };
    }

    fn current_program(&self) -> Option<ProgramHandle> {
        let current = unsafe { self.gl.get_parameter_i32(glow::CURRENT_PROGRAM) };
        NonZeroU32::new(current as u32).map(ProgramHandle)
    }

    fn active_attributes(&self, program: ProgramHandle) -> Vec<ActiveVariable> {
        let program = native_program(program);
        unsafe {
            let count = self.gl.get_active_attributes(program);
            (0..count)
                .filter_map(|index| self.gl.get_active_attribute(program, index))
                .map(|attribute| ActiveVariable {
                    name: attribute.name,
                    size: attribute.size,
                    ty: glsl_type_from_gl(attribute.atype),
                })
                .collect()
        }
    }

    fn active_uniforms(&self, program: ProgramHandle) -> Vec<ActiveVariable> {
        let program = native_program(program);
        unsafe {
            let count = self.gl.get_active_uniforms(program);
            (0..count)
                .filter_map(|index| self.gl.get_active_uniform(program, index))
                .map(|uniform| ActiveVariable {
                    name: uniform.name,
                    size: uniform.size,
                    ty: glsl_type_from_gl(uniform.utype),
                })
                .collect()
        }
    }

    fn attribute_location(&self, program: ProgramHandle, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(native_program(program), name) }
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        unsafe { self.gl.get_uniform_location(native_program(program), name) }
            .map(|location| UniformLocation(location.0))
    }

    fn set_uniform(&self, location: UniformLocation, value: &UniformValue) {
        let location = glow::NativeUniformLocation(location.0);
        let location = Some(&location);
        unsafe {
            match value {
                UniformValue::Int(v) => self.gl.uniform_1_i32(location, *v),
                UniformValue::Float(v) => self.gl.uniform_1_f32(location, *v),
                UniformValue::Vec2([x, y]) => self.gl.uniform_2_f32(location, *x, *y),
                UniformValue::Vec3([x, y, z]) => self.gl.uniform_3_f32(location, *x, *y, *z),
                UniformValue::Vec4([x, y, z, w]) => self.gl.uniform_4_f32(location, *x, *y, *z, *w),
                UniformValue::Mat4(m) => self.gl.uniform_matrix_4_f32_slice(location, false, m.as_slice()),
            }
        }
    }

    // ----- textures -----

    fn create_texture(&self, desc: &TextureDesc, rgba_pixels: &[u8]) -> Result<TextureHandle> {
        let expected = desc.width as usize * desc.height as usize * 4;
        if rgba_pixels.len() != expected {
            return Err(Error::InvalidResource(format!(
                "texture data is {} bytes, expected {} for {}x{} RGBA",
                rgba_pixels.len(),
                expected,
                desc.width,
                desc.height
            )));
        }

        let texture = unsafe { self.gl.create_texture() }
            .map_err(|e| engine_err!(LOG_SOURCE, "glGenTextures failed: {}", e))?;

        let wrap = texture_wrap_to_gl(desc.wrap) as i32;
        unsafe {
            self.gl.active_texture(glow::TEXTURE0);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                texture_internal_format(desc.format) as i32,
                desc.width as i32,
                desc.height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(rgba_pixels)),
            );
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap);
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                texture_filter_to_gl(desc.min_filter) as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                texture_filter_to_gl(desc.mag_filter) as i32,
            );
        }

        if self.check_errors("create_texture") {
            unsafe { self.gl.delete_texture(texture) };
            engine_bail!(LOG_SOURCE, "Texture upload failed ({}x{})", desc.width, desc.height);
        }

        Ok(TextureHandle(texture.0))
    }

    fn bind_texture(&self, unit: u32, texture: Option<TextureHandle>) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, texture.map(native_texture));
        }
    }

    fn delete_texture(&self, texture: TextureHandle) {
        unsafe { self.gl.delete_texture(native_texture(texture)) };
    }

    // ----- buffers and vertex arrays -----

    fn create_buffer(&self, data: &[u8], usage: BufferUsage) -> Result<BufferHandle> {
        let buffer = unsafe { self.gl.create_buffer() }
            .map_err(|e| engine_err!(LOG_SOURCE, "glGenBuffers failed: {}", e))?;
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, data, buffer_usage_to_gl(usage));
        }

        if self.check_errors("create_buffer") {
            unsafe { self.gl.delete_buffer(buffer) };
            return Err(Error::OutOfMemory);
        }

        Ok(BufferHandle(buffer.0))
    }

    fn update_buffer(&self, buffer: BufferHandle, offset: usize, data: &[u8]) {
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(native_buffer(buffer)));
            self.gl.buffer_sub_data_u8_slice(glow::ARRAY_BUFFER, offset as i32, data);
        }
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        unsafe { self.gl.delete_buffer(native_buffer(buffer)) };
    }

    fn create_vertex_array(&self) -> Result<VertexArrayHandle> {
        let vertex_array = unsafe { self.gl.create_vertex_array() }
            .map_err(|e| engine_err!(LOG_SOURCE, "glGenVertexArrays failed: {}", e))?;
        Ok(VertexArrayHandle(vertex_array.0))
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>) {
        unsafe { self.gl.bind_vertex_array(vertex_array.map(native_vertex_array)) };
    }

    fn vertex_attribute(&self, buffer: BufferHandle, attribute: VertexAttribute) {
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(native_buffer(buffer)));
            self.gl.vertex_attrib_pointer_f32(
                attribute.location,
                attribute.components,
                glow::FLOAT,
                false,
                attribute.stride,
                attribute.offset,
            );
            self.gl.enable_vertex_attrib_array(attribute.location);
        }
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle) {
        unsafe { self.gl.delete_vertex_array(native_vertex_array(vertex_array)) };
    }

    // ----- fixed-function state and drawing -----

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) };
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { self.gl.clear_color(r, g, b, a) };
    }

    fn clear(&self, mask: ClearMask) {
        unsafe { self.gl.clear(clear_mask_to_gl(mask)) };
    }

    fn set_depth_test(&self, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(glow::DEPTH_TEST);
                self.gl.depth_func(glow::LESS);
            } else {
                self.gl.disable(glow::DEPTH_TEST);
            }
        }
    }

    fn set_culling(&self, front_face: Option<FrontFace>) {
        unsafe {
            match front_face {
                Some(front_face) => {
                    self.gl.enable(glow::CULL_FACE);
                    self.gl.cull_face(glow::BACK);
                    self.gl.front_face(front_face_to_gl(front_face));
                }
                None => self.gl.disable(glow::CULL_FACE),
            }
        }
    }

    fn draw_arrays(&self, topology: PrimitiveTopology, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(topology_to_gl(topology), first, count) };
    }

    fn read_pixels_rgb(&self, x: i32, y: i32, width: i32, height: i32) -> Vec<u8> {
        if width <= 0 || height <= 0 {
            return Vec::new();
        }

        let mut pixels = vec![0u8; width as usize * height as usize * 3];
        unsafe {
            self.gl.pixel_store_i32(glow::PACK_ALIGNMENT, 1);
            self.gl.read_pixels(
                x,
                y,
                width,
                height,
                glow::RGB,
                glow::UNSIGNED_BYTE,
                glow::PixelPackData::Slice(Some(&mut pixels)),
            );
        }
        pixels
    }
}

#[cfg(test)]
#[path = "opengl_device_tests.rs"]
mod tests;
