/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Records every call by name, tracks object lifetimes and derives program
/// introspection from the GLSL source it was given:
/// - a source containing `COMPILE_ERROR` fails to compile
/// - a program with a stage containing `LINK_ERROR` fails to link
/// - `uniform <type> <name>;` lines become active uniforms (location = index)
/// - `in <type> <name>;` lines of the vertex stage become active attributes

use std::cell::{Cell, RefCell};
use std::num::NonZeroU32;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::Result;
use crate::engine_bail;
use super::device::{
    ActiveVariable, BufferHandle, BufferUsage, ClearMask, FrontFace, GlslType, GraphicsDevice,
    PrimitiveTopology, ProgramHandle, ShaderHandle, ShaderStage, TextureDesc, TextureHandle,
    UniformLocation, UniformValue, VertexArrayHandle, VertexAttribute,
};

// ============================================================================
// Mock objects
// ============================================================================

#[derive(Debug, Clone)]
pub struct MockShaderObject {
    pub stage: ShaderStage,
    pub source: String,
    pub compiled: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MockProgramObject {
    pub attached: Vec<u32>,
    pub linked: bool,
    pub attributes: Vec<ActiveVariable>,
    pub uniforms: Vec<ActiveVariable>,
}

// ============================================================================
// Mock device
// ============================================================================

#[derive(Default)]
pub struct MockDevice {
    next_id: Cell<u32>,
    pub calls: RefCell<Vec<&'static str>>,
    pub shaders: RefCell<FxHashMap<u32, MockShaderObject>>,
    pub programs: RefCell<FxHashMap<u32, MockProgramObject>>,
    pub textures: RefCell<FxHashMap<u32, (TextureDesc, Vec<u8>)>>,
    pub buffers: RefCell<FxHashMap<u32, Vec<u8>>>,
    pub vertex_arrays: RefCell<FxHashSet<u32>>,
    pub deleted: RefCell<Vec<u32>>,
    pub current_program: Cell<Option<ProgramHandle>>,
    pub bound_textures: RefCell<FxHashMap<u32, Option<TextureHandle>>>,
    pub uniform_uploads: RefCell<Vec<(UniformLocation, UniformValue)>>,
    /// When set, every create_* call fails
    pub fail_create: Cell<bool>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, name: &'static str) {
        self.calls.borrow_mut().push(name);
    }

    fn next_handle(&self) -> NonZeroU32 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        NonZeroU32::new(id).unwrap_or(NonZeroU32::MIN)
    }

    /// Number of recorded calls named `name`
    pub fn call_count(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|c| **c == name).count()
    }

    /// Objects created and not yet deleted
    pub fn live_object_count(&self) -> usize {
        self.shaders.borrow().len()
            + self.programs.borrow().len()
            + self.textures.borrow().len()
            + self.buffers.borrow().len()
            + self.vertex_arrays.borrow().len()
    }

    pub fn is_deleted(&self, id: u32) -> bool {
        self.deleted.borrow().contains(&id)
    }

    fn mark_deleted(&self, id: u32) {
        self.deleted.borrow_mut().push(id);
    }
}

fn parse_glsl_type(token: &str) -> GlslType {
    match token {
        "bool" => GlslType::Bool,
        "int" => GlslType::Int,
        "float" => GlslType::Float,
        "vec2" => GlslType::Vec2,
        "vec3" => GlslType::Vec3,
        "vec4" => GlslType::Vec4,
        "mat2" => GlslType::Mat2,
        "mat3" => GlslType::Mat3,
        "mat4" => GlslType::Mat4,
        "sampler2D" => GlslType::Sampler2D,
        "sampler3D" => GlslType::Sampler3D,
        "samplerCube" => GlslType::SamplerCube,
        "sampler2DShadow" => GlslType::Sampler2DShadow,
        _ => GlslType::Other(0),
    }
}

/// Declarations `<qualifier> <type> <name>[N];` found in `source`
fn parse_declarations(source: &str, qualifier: &str) -> Vec<ActiveVariable> {
    source
        .lines()
        .filter_map(|line| {
            let line = line.trim().trim_end_matches(';');
            // Skip layout(...) prefixes
            let line = match line.find(')') {
                Some(pos) if line.starts_with("layout") => line[pos + 1..].trim(),
                _ => line,
            };
            let mut tokens = line.split_whitespace();
            if tokens.next()? != qualifier {
                return None;
            }
            let ty = parse_glsl_type(tokens.next()?);
            let declarator = tokens.next()?;
            let (name, size) = match declarator.split_once('[') {
                Some((base, rest)) => {
                    let size = rest.trim_end_matches(']').parse().unwrap_or(1);
                    (format!("{}[0]", base), size)
                }
                None => (declarator.to_string(), 1),
            };
            Some(ActiveVariable { name, size, ty })
        })
        .collect()
}

impl GraphicsDevice for MockDevice {
    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderHandle> {
        self.record("create_shader");
        if self.fail_create.get() {
            engine_bail!("ace::MockDevice", "create_shader failed");
        }
        let handle = self.next_handle();
        self.shaders.borrow_mut().insert(
            handle.get(),
            MockShaderObject { stage, source: String::new(), compiled: false },
        );
        Ok(ShaderHandle(handle))
    }

    fn shader_source(&self, shader: ShaderHandle, source: &str) {
        self.record("shader_source");
        if let Some(object) = self.shaders.borrow_mut().get_mut(&shader.id()) {
            object.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: ShaderHandle) {
        self.record("compile_shader");
        if let Some(object) = self.shaders.borrow_mut().get_mut(&shader.id()) {
            object.compiled = !object.source.contains("COMPILE_ERROR");
        }
    }

    fn shader_compile_status(&self, shader: ShaderHandle) -> bool {
        self.record("shader_compile_status");
        self.shaders.borrow().get(&shader.id()).is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: ShaderHandle) -> String {
        self.record("shader_info_log");
        match self.shaders.borrow().get(&shader.id()) {
            Some(s) if !s.compiled => "0:1(1): error: syntax error, unexpected COMPILE_ERROR".to_string(),
            _ => String::new(),
        }
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        self.record("delete_shader");
        self.shaders.borrow_mut().remove(&shader.id());
        self.mark_deleted(shader.id());
    }

    fn create_program(&self) -> Result<ProgramHandle> {
        self.record("create_program");
        if self.fail_create.get() {
            engine_bail!("ace::MockDevice", "create_program failed");
        }
        let handle = self.next_handle();
        self.programs.borrow_mut().insert(handle.get(), MockProgramObject::default());
        Ok(ProgramHandle(handle))
    }

    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        self.record("attach_shader");
        if let Some(object) = self.programs.borrow_mut().get_mut(&program.id()) {
            object.attached.push(shader.id());
        }
    }

    fn link_program(&self, program: ProgramHandle) {
        self.record("link_program");
        let shaders = self.shaders.borrow();
        let mut programs = self.programs.borrow_mut();
        let Some(object) = programs.get_mut(&program.id()) else {
            return;
        };

        let stages: Vec<&MockShaderObject> =
            object.attached.iter().filter_map(|id| shaders.get(id)).collect();
        object.linked = !stages.is_empty()
            && stages.iter().all(|s| s.compiled && !s.source.contains("LINK_ERROR"));

        if object.linked {
            object.attributes = stages
                .iter()
                .filter(|s| s.stage == ShaderStage::Vertex)
                .flat_map(|s| parse_declarations(&s.source, "in"))
                .collect();
            object.uniforms.clear();
            for stage in &stages {
                for uniform in parse_declarations(&stage.source, "uniform") {
                    if !object.uniforms.iter().any(|u| u.name == uniform.name) {
                        object.uniforms.push(uniform);
                    }
                }
            }
        }
    }

    fn program_link_status(&self, program: ProgramHandle) -> bool {
        self.record("program_link_status");
        self.programs.borrow().get(&program.id()).is_some_and(|p| p.linked)
    }

    fn validate_program(&self, program: ProgramHandle) -> bool {
        self.record("validate_program");
        self.programs.borrow().get(&program.id()).is_some_and(|p| p.linked)
    }

    fn program_info_log(&self, program: ProgramHandle) -> String {
        self.record("program_info_log");
        match self.programs.borrow().get(&program.id()) {
            Some(p) if !p.linked => "error: LINK_ERROR: unresolved symbol".to_string(),
            _ => String::new(),
        }
    }

    fn attached_shader_count(&self, program: ProgramHandle) -> i32 {
        self.record("attached_shader_count");
        self.programs
            .borrow()
            .get(&program.id())
            .map_or(0, |p| p.attached.len() as i32)
    }

    fn delete_program(&self, program: ProgramHandle) {
        self.record("delete_program");
        self.programs.borrow_mut().remove(&program.id());
        self.mark_deleted(program.id());
        if self.current_program.get() == Some(program) {
            self.current_program.set(None);
        }
    }

    fn use_program(&self, program: Option<ProgramHandle>) {
        self.record("use_program");
        self.current_program.set(program);
    }

    fn current_program(&self) -> Option<ProgramHandle> {
        self.record("current_program");
        self.current_program.get()
    }

    fn active_attributes(&self, program: ProgramHandle) -> Vec<ActiveVariable> {
        self.record("active_attributes");
        self.programs
            .borrow()
            .get(&program.id())
            .map(|p| p.attributes.clone())
            .unwrap_or_default()
    }

    fn active_uniforms(&self, program: ProgramHandle) -> Vec<ActiveVariable> {
        self.record("active_uniforms");
        self.programs
            .borrow()
            .get(&program.id())
            .map(|p| p.uniforms.clone())
            .unwrap_or_default()
    }

    fn attribute_location(&self, program: ProgramHandle, name: &str) -> Option<u32> {
        self.record("attribute_location");
        let programs = self.programs.borrow();
        let attributes = &programs.get(&program.id())?.attributes;
        attributes.iter().position(|a| a.name == name).map(|i| i as u32)
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        self.record("uniform_location");
        let programs = self.programs.borrow();
        let uniforms = &programs.get(&program.id())?.uniforms;
        uniforms
            .iter()
            .position(|u| u.name == name || u.name == format!("{}[0]", name))
            .map(|i| UniformLocation(i as u32))
    }

    fn set_uniform(&self, location: UniformLocation, value: &UniformValue) {
        self.record("set_uniform");
        self.uniform_uploads.borrow_mut().push((location, *value));
    }

    fn create_texture(&self, desc: &TextureDesc, rgba_pixels: &[u8]) -> Result<TextureHandle> {
        self.record("create_texture");
        if self.fail_create.get() {
            engine_bail!("ace::MockDevice", "create_texture failed");
        }
        let expected = desc.width as usize * desc.height as usize * 4;
        if rgba_pixels.len() != expected {
            engine_bail!(
                "ace::MockDevice",
                "texture data is {} bytes, expected {}",
                rgba_pixels.len(),
                expected
            );
        }
        let handle = self.next_handle();
        self.textures.borrow_mut().insert(handle.get(), (desc.clone(), rgba_pixels.to_vec()));
        Ok(TextureHandle(handle))
    }

    fn bind_texture(&self, unit: u32, texture: Option<TextureHandle>) {
        self.record("bind_texture");
        self.bound_textures.borrow_mut().insert(unit, texture);
    }

    fn delete_texture(&self, texture: TextureHandle) {
        self.record("delete_texture");
        self.textures.borrow_mut().remove(&texture.id());
        self.mark_deleted(texture.id());
    }

    fn create_buffer(&self, data: &[u8], _usage: BufferUsage) -> Result<BufferHandle> {
        self.record("create_buffer");
        if self.fail_create.get() {
            engine_bail!("ace::MockDevice", "create_buffer failed");
        }
        let handle = self.next_handle();
        self.buffers.borrow_mut().insert(handle.get(), data.to_vec());
        Ok(BufferHandle(handle))
    }

    fn update_buffer(&self, buffer: BufferHandle, offset: usize, data: &[u8]) {
        self.record("update_buffer");
        if let Some(contents) = self.buffers.borrow_mut().get_mut(&buffer.id()) {
            let end = (offset + data.len()).min(contents.len());
            if offset < end {
                contents[offset..end].copy_from_slice(&data[..end - offset]);
            }
        }
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        self.record("delete_buffer");
        self.buffers.borrow_mut().remove(&buffer.id());
        self.mark_deleted(buffer.id());
    }

    fn create_vertex_array(&self) -> Result<VertexArrayHandle> {
        self.record("create_vertex_array");
        if self.fail_create.get() {
            engine_bail!("ace::MockDevice", "create_vertex_array failed");
        }
        let handle = self.next_handle();
        self.vertex_arrays.borrow_mut().insert(handle.get());
        Ok(VertexArrayHandle(handle))
    }

    fn bind_vertex_array(&self, _vertex_array: Option<VertexArrayHandle>) {
        self.record("bind_vertex_array");
    }

    fn vertex_attribute(&self, _buffer: BufferHandle, _attribute: VertexAttribute) {
        self.record("vertex_attribute");
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle) {
        self.record("delete_vertex_array");
        self.vertex_arrays.borrow_mut().remove(&vertex_array.id());
        self.mark_deleted(vertex_array.id());
    }

    fn viewport(&self, _x: i32, _y: i32, _width: i32, _height: i32) {
        self.record("viewport");
    }

    fn clear_color(&self, _r: f32, _g: f32, _b: f32, _a: f32) {
        self.record("clear_color");
    }

    fn clear(&self, _mask: ClearMask) {
        self.record("clear");
    }

    fn set_depth_test(&self, _enabled: bool) {
        self.record("set_depth_test");
    }

    fn set_culling(&self, _front_face: Option<FrontFace>) {
        self.record("set_culling");
    }

    fn draw_arrays(&self, _topology: PrimitiveTopology, _first: i32, _count: i32) {
        self.record("draw_arrays");
    }

    fn read_pixels_rgb(&self, _x: i32, _y: i32, width: i32, height: i32) -> Vec<u8> {
        self.record("read_pixels_rgb");
        vec![0; (width.max(0) * height.max(0) * 3) as usize]
    }
}

#[cfg(test)]
#[path = "mock_device_tests.rs"]
mod tests;
