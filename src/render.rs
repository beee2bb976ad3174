/// High-level rendering entry points.
pub mod facade;
/// Sprite cache for interactive previews.
pub mod sprite;
/// CPU raster surface and image buffers.
pub mod surface;

pub(crate) mod content;
pub(crate) mod text;
