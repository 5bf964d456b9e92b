mod native;
pub mod shaders;
pub mod uniforms;

pub use native::Renderer;
pub use uniforms::{GlobalUniform, ObjectUniform};
