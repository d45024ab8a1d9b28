//! Rendering module
//!
//! The scene painter draws through the `Surface` trait. The shipped surface
//! tessellates into colored triangles that the WebGPU pipeline uploads.

pub mod font;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod surface;
pub mod tessellator;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::render;
pub use surface::{Glow, Surface};
pub use tessellator::Tessellator;
pub use vertex::Vertex;
