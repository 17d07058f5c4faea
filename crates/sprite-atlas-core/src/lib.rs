//! Sprite atlas builder.
//!
//! - Packing: MaxRects bin with five placement heuristics (BSSF/BLSF/BAF/BL/CP), no rotation
//! - Builder: `pack_textures` grows the sheet from `initial_size` until every image fits,
//!   composites RGBA pixels and optionally extrudes edges into the padding gutter
//! - Registry: `SpriteAtlas` keeps sprites by name and carries 9-slice borders across rebuilds
//! - JSON: import frame lists packed by other tools, export the registry in the same shape
//!
//! Quick example:
//! ```ignore
//! use image::ImageReader;
//! use sprite_atlas_core::{InputImage, PackingConfig, SpriteAtlas};
//! # fn main() -> anyhow::Result<()> {
//! let inputs = vec![
//!   InputImage::new("button", ImageReader::open("button.png")?.decode()?),
//!   InputImage::new("panel", ImageReader::open("panel.png")?.decode()?),
//! ];
//! let cfg = PackingConfig { max_atlas_size: 1024, ..Default::default() };
//! let mut atlas = SpriteAtlas::default();
//! let (texture, stats) = atlas.rebuild(&inputs, &cfg)?;
//! println!("{}x{}: {}", texture.width(), texture.height(), stats.summary());
//! # Ok(()) }
//! ```

pub mod compositing;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod model;
pub mod packer;
pub mod pipeline;
pub mod registry;

pub use config::*;
pub use error::*;
pub use export::*;
pub use import::*;
pub use model::*;
pub use packer::RectBin;
pub use pipeline::*;
pub use registry::*;

/// Convenience prelude for common types and functions.
/// Importing `sprite_atlas_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{Heuristic, PackingConfig, PackingConfigBuilder};
    pub use crate::error::{AtlasError, Result};
    pub use crate::model::{Border, PackStats, Rect, SpriteItem, UvRect};
    pub use crate::packer::RectBin;
    pub use crate::pipeline::{
        InputImage, NamedRgba, PackLayout, PackOutput, Placement, SourceImage, pack_layout,
        pack_textures,
    };
    pub use crate::registry::SpriteAtlas;
}
