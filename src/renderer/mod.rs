//! wgpu rendering
//!
//! Game code fills a [`ShapeBatch`] in world pixels; [`RenderState`] maps it
//! onto the letterboxed surface and draws it in one pass.

pub mod font;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, Viewport};
pub use shapes::ShapeBatch;
pub use vertex::{Vertex, colors};
