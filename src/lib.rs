//! Per-pixel shading for a small text scene: Blinn-Phong plastic and metal
//! glyphs lit by a pulsing Fresnel glow cube.
//!
//! Everything except [`render`] is plain data and math, so scenes can be
//! built, stepped and shaded on the CPU without a window or GPU.

pub mod animation;
pub mod app;
pub mod camera;
pub mod config;
pub mod glyph;
pub mod input;
pub mod material;
pub mod mesh;
pub mod probe;
pub mod render;
pub mod scene;
pub mod shading;

pub use animation::{AnimationState, Controls, FrameSteps};
pub use camera::{CameraParams, PerspectiveCamera};
pub use config::SceneConfig;
pub use glyph::{BlockFont, GlyphError, GlyphMesher, ObjGlyphLibrary, TextStyle};
pub use input::{InputState, KeyBindings, KeyCode, NamedKey};
pub use material::{BlendMode, Glow, Material, RenderState};
pub use mesh::{Mesh, Vertex};
pub use probe::{probe_object, ProbeReport};
pub use render::Renderer;
pub use scene::{ObjectRole, Scene, SceneObject};
pub use shading::{shade, FrameInputs, SurfacePoint};
