//! Graphics module - device abstraction plus the Shader and Texture wrappers.
//!
//! `GraphicsDevice` is implemented by the OpenGL backend crate. The wrappers
//! hold the device through `Rc` and own their GPU objects exclusively.

mod device;
mod shader;
mod texture;

#[cfg(test)]
pub(crate) mod mock_device;

pub use device::{
    ActiveVariable, BufferHandle, BufferUsage, ClearMask, FrontFace, GlslType, GraphicsDevice,
    PrimitiveTopology, ProgramHandle, ShaderHandle, ShaderStage, TextureDesc, TextureFilter,
    TextureFormat, TextureHandle, TextureWrap, UniformLocation, UniformValue, VertexArrayHandle,
    VertexAttribute,
};
pub use shader::Shader;
pub use texture::Texture;
