/// Shader - vertex + fragment program loaded from GLSL files.
///
/// Owns one vertex stage, one fragment stage and the linked program, and
/// releases all three on drop. `reload()` rebuilds from the stored paths and
/// only swaps the new objects in when the whole pipeline succeeds.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::{engine_error, engine_info, engine_warn};
use super::device::{GraphicsDevice, ProgramHandle, ShaderHandle, ShaderStage, UniformLocation, UniformValue};

const LOG_SOURCE: &str = "ace::Shader";

/// The three GPU objects of one build attempt
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ShaderObjects {
    vertex: Option<ShaderHandle>,
    fragment: Option<ShaderHandle>,
    program: Option<ProgramHandle>,
}

impl ShaderObjects {
    fn release(&mut self, device: &dyn GraphicsDevice) {
        if let Some(vertex) = self.vertex.take() {
            device.delete_shader(vertex);
        }
        if let Some(fragment) = self.fragment.take() {
            device.delete_shader(fragment);
        }
        if let Some(program) = self.program.take() {
            device.delete_program(program);
        }
    }
}

pub struct Shader {
    device: Rc<dyn GraphicsDevice>,
    objects: ShaderObjects,
    vertex_path: PathBuf,
    fragment_path: PathBuf,
}

/// Read a whole shader file. Missing and zero-length files are both failures;
/// whitespace-only sources go on to the compiler.
fn read_source(path: &Path) -> Result<String> {
    let source = std::fs::read_to_string(path).map_err(|e| {
        engine_error!(LOG_SOURCE, "Could not open shader file {}: {}", path.display(), e);
        Error::Io(format!("{}: {}", path.display(), e))
    })?;

    if source.is_empty() {
        engine_error!(LOG_SOURCE, "Shader file {} is empty", path.display());
        return Err(Error::Io(format!("{}: empty shader file", path.display())));
    }

    Ok(source)
}

impl Shader {
    /// Empty shader bound to `device`; nothing is created until a load
    pub fn new(device: Rc<dyn GraphicsDevice>) -> Self {
        Self {
            device,
            objects: ShaderObjects::default(),
            vertex_path: PathBuf::new(),
            fragment_path: PathBuf::new(),
        }
    }

    /// Convenience: `new` followed by `load_from_files`
    pub fn from_files(
        device: Rc<dyn GraphicsDevice>,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let mut shader = Self::new(device);
        shader.load_from_files(vertex_path, fragment_path)?;
        Ok(shader)
    }

    /// Compile both stages and link the program.
    ///
    /// The paths are recorded first so a failed initial load can still be
    /// fixed on disk and retried with [`Shader::reload`]. Objects created
    /// before a failure remain owned by the shader until drop or reload.
    ///
    /// # Errors
    ///
    /// - `Error::Io` if a file is missing or empty
    /// - `Error::ShaderCompilation` / `Error::ShaderLink` with the info log
    pub fn load_from_files(&mut self, vertex_path: impl AsRef<Path>, fragment_path: impl AsRef<Path>) -> Result<()> {
        self.vertex_path = vertex_path.as_ref().to_path_buf();
        self.fragment_path = fragment_path.as_ref().to_path_buf();

        // Objects from a previous load are replaced
        self.objects.release(self.device.as_ref());

        let mut objects = ShaderObjects::default();
        let result = self.build(&mut objects);
        self.objects = objects;
        result
    }

    fn build(&self, objects: &mut ShaderObjects) -> Result<()> {
        engine_info!(
            LOG_SOURCE,
            "Loading shaders: {}, {}",
            self.vertex_path.display(),
            self.fragment_path.display()
        );

        let vertex_source = read_source(&self.vertex_path);
        let fragment_source = read_source(&self.fragment_path);
        let (vertex_source, fragment_source) = match (vertex_source, fragment_source) {
            (Ok(v), Ok(f)) => (v, f),
            (Err(e), _) | (_, Err(e)) => {
                engine_error!(LOG_SOURCE, "Failed to load shader files");
                return Err(e);
            }
        };

        let device = self.device.as_ref();
        let vertex = device.create_shader(ShaderStage::Vertex)?;
        objects.vertex = Some(vertex);
        let fragment = device.create_shader(ShaderStage::Fragment)?;
        objects.fragment = Some(fragment);

        if let Err(e) = self.compile(vertex, &vertex_source) {
            engine_error!(LOG_SOURCE, "Vertex shader compilation failed");
            return Err(e);
        }
        if let Err(e) = self.compile(fragment, &fragment_source) {
            engine_error!(LOG_SOURCE, "Fragment shader compilation failed");
            return Err(e);
        }

        let program = device.create_program()?;
        objects.program = Some(program);
        device.attach_shader(program, vertex);
        device.attach_shader(program, fragment);

        device.link_program(program);
        if !device.program_link_status(program) {
            let info_log = device.program_info_log(program);
            engine_error!(
                LOG_SOURCE,
                "Could not link shader programme GL index {}\nprogram info log:\n{}",
                program.id(),
                info_log
            );
            return Err(Error::ShaderLink(info_log));
        }

        engine_info!(LOG_SOURCE, "Shader programme {} loaded successfully", program.id());
        Ok(())
    }

    fn compile(&self, shader: ShaderHandle, source: &str) -> Result<()> {
        let device = self.device.as_ref();
        device.shader_source(shader, source);
        device.compile_shader(shader);

        if !device.shader_compile_status(shader) {
            let info_log = device.shader_info_log(shader);
            engine_error!(
                LOG_SOURCE,
                "GL shader index {} did not compile\nshader info log:\n{}",
                shader.id(),
                info_log
            );
            return Err(Error::ShaderCompilation(info_log));
        }

        engine_info!(LOG_SOURCE, "Shader {} compiled successfully", shader.id());
        Ok(())
    }

    /// Rebuild from the stored paths.
    ///
    /// On success the previous objects are released and the new program
    /// becomes live (it is not bound; call `use_program`). On failure the
    /// objects of the failed attempt are released and the previous program
    /// stays exactly as it was.
    pub fn reload(&mut self) -> Result<()> {
        engine_info!(
            LOG_SOURCE,
            "Reloading shaders: {}, {}",
            self.vertex_path.display(),
            self.fragment_path.display()
        );

        let mut fresh = ShaderObjects::default();
        match self.build(&mut fresh) {
            Ok(()) => {
                let mut old = std::mem::replace(&mut self.objects, fresh);
                old.release(self.device.as_ref());
                engine_info!(LOG_SOURCE, "Shaders reloaded successfully");
                Ok(())
            }
            Err(e) => {
                fresh.release(self.device.as_ref());
                engine_error!(LOG_SOURCE, "Shader reload failed, keeping old shaders");
                Err(e)
            }
        }
    }

    /// Bind the program. No check is made that loading succeeded.
    pub fn use_program(&self) {
        self.device.use_program(self.objects.program);
    }

    /// True if this program is the one bound on the device
    pub fn is_in_use(&self) -> bool {
        self.objects.program.is_some() && self.device.current_program() == self.objects.program
    }

    /// Run program validation, logging the status and the info log on failure
    pub fn validate(&self) -> bool {
        let Some(program) = self.objects.program else {
            engine_warn!(LOG_SOURCE, "validate() called on a shader with no program");
            return false;
        };

        let valid = self.device.validate_program(program);
        engine_info!(LOG_SOURCE, "program {} GL_VALIDATE_STATUS = {}", program.id(), valid as i32);
        if !valid {
            self.log_program_info(program);
        }
        valid
    }

    /// Location of an active uniform. Warns when it is not found.
    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        let location = self
            .objects
            .program
            .and_then(|program| self.device.uniform_location(program, name));
        if location.is_none() {
            engine_warn!(LOG_SOURCE, "uniform '{}' not found or not active", name);
        }
        location
    }

    /// Set a uniform on this program.
    ///
    /// The program must be bound: otherwise the call is logged as a usage
    /// error and skipped.
    pub fn set_uniform(&self, name: &str, value: impl Into<UniformValue>) {
        if !self.is_in_use() {
            engine_error!(
                LOG_SOURCE,
                "Trying to set uniform '{}' but shader {} is not in use",
                name,
                self.program_id()
            );
            return;
        }

        if let Some(location) = self.uniform_location(name) {
            self.device.set_uniform(location, &value.into());
        }
    }

    /// Log link status, attached stages, active attributes and uniforms
    pub fn print_all(&self) {
        let Some(program) = self.objects.program else {
            engine_warn!(LOG_SOURCE, "print_all() called on a shader with no program");
            return;
        };
        let device = self.device.as_ref();

        engine_info!(LOG_SOURCE, "--------------------\nshader programme {} info:", program.id());
        engine_info!(LOG_SOURCE, "GL_LINK_STATUS = {}", device.program_link_status(program) as i32);
        engine_info!(LOG_SOURCE, "GL_ATTACHED_SHADERS = {}", device.attached_shader_count(program));

        let attributes = device.active_attributes(program);
        engine_info!(LOG_SOURCE, "GL_ACTIVE_ATTRIBUTES = {}", attributes.len());
        for (i, attribute) in attributes.iter().enumerate() {
            for name in attribute.expanded_names() {
                let location = device
                    .attribute_location(program, &name)
                    .map_or(-1, |l| l as i64);
                engine_info!(
                    LOG_SOURCE,
                    "  {}) type:{} name:{} location:{}",
                    i,
                    attribute.ty.name(),
                    name,
                    location
                );
            }
        }

        let uniforms = device.active_uniforms(program);
        engine_info!(LOG_SOURCE, "GL_ACTIVE_UNIFORMS = {}", uniforms.len());
        for (i, uniform) in uniforms.iter().enumerate() {
            for name in uniform.expanded_names() {
                let location = device
                    .uniform_location(program, &name)
                    .map_or(-1, |l| l.0 as i64);
                engine_info!(
                    LOG_SOURCE,
                    "  {}) type:{} name:{} location:{}",
                    i,
                    uniform.ty.name(),
                    name,
                    location
                );
            }
        }

        self.log_program_info(program);
    }

    fn log_program_info(&self, program: ProgramHandle) {
        engine_info!(
            LOG_SOURCE,
            "program info log for GL index {}:\n{}",
            program.id(),
            self.device.program_info_log(program)
        );
    }

    /// Linked program, `None` before a successful load
    pub fn program(&self) -> Option<ProgramHandle> {
        self.objects.program
    }

    /// Raw program name, 0 when there is none
    pub fn program_id(&self) -> u32 {
        self.objects.program.map_or(0, |p| p.id())
    }

    pub fn vertex_path(&self) -> &Path {
        &self.vertex_path
    }

    pub fn fragment_path(&self) -> &Path {
        &self.fragment_path
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        self.objects.release(self.device.as_ref());
    }
}

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
