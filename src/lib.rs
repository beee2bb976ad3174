//! Kokuban draws construction-photo blackboards over photographs.
//!
//! The engine lays out a field grid from a saved template, fits it to the
//! drawn photo area, and rasterizes it on the CPU. The public API is
//! renderer-oriented:
//!
//! - Parse a [`Template`] and a [`BlackboardInfo`] record
//! - Create a [`BoardRenderer`] from font bytes
//! - Composite full photos with [`BoardRenderer::compose`], or drive an
//!   interactive preview through [`SpriteCache`] and [`DragController`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod layout;

/// Pointer interaction with the board.
pub mod interact;
/// Rasterization, compositing and the sprite cache.
pub mod render;
/// Boundary template/board records and their adaptation.
pub mod template;

pub use crate::foundation::error::{KokubanError, KokubanResult};
pub use crate::foundation::geom::{Anchor, Fit, NormRect, PxRect};

pub use crate::interact::drag::{DragController, DragEvents, EDGE_SNAP_EPS, FrameScheduler};
pub use crate::layout::height::min_content_height;
pub use crate::layout::rect::{BoardRects, resolve_rects};
pub use crate::render::facade::{BoardRenderer, PreviewTarget, RenderOptions};
pub use crate::render::sprite::{SpriteCache, SpriteKey};
pub use crate::render::surface::{BoardImage, BoardSurface, OversampleOpts, Photo};
pub use crate::template::adapter::{LayoutConfig, LayoutSource, ResolvedLayout, adapt};
pub use crate::template::color::ColorDef;
pub use crate::template::fields::{DrawStrategy, FieldKey, ResolvedField, resolve_fields};
pub use crate::template::model::{BlackboardInfo, BoardVariant, Template, TitlePlacement};
