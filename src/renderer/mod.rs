//! WebGPU rendering module
//!
//! Draw commands from `sim` are tessellated into flat-colored triangles and
//! drawn in one alpha-blended pass.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::tessellate;
pub use vertex::Vertex;
