use std::borrow::Cow;

use image::{DynamicImage, RgbaImage};
use tracing::{debug, info, instrument};

use crate::compositing::{blit_rgba, extrude_edges};
use crate::config::PackingConfig;
use crate::error::{AtlasError, Dimension, Result};
use crate::model::{PackStats, Rect, SpriteItem, UvRect};
use crate::packer::RectBin;

/// Anything that can be packed: a name, a size and RGBA pixels.
pub trait SourceImage {
    fn name(&self) -> &str;
    fn dimensions(&self) -> (u32, u32);
    fn pixels(&self) -> Cow<'_, RgbaImage>;
    /// Opaque handle recorded on the resulting sprite.
    fn source_ref(&self) -> Option<&str> {
        None
    }
}

impl<T: SourceImage + ?Sized> SourceImage for &T {
    fn name(&self) -> &str {
        (**self).name()
    }
    fn dimensions(&self) -> (u32, u32) {
        (**self).dimensions()
    }
    fn pixels(&self) -> Cow<'_, RgbaImage> {
        (**self).pixels()
    }
    fn source_ref(&self) -> Option<&str> {
        (**self).source_ref()
    }
}

/// In-memory decoded image to pack.
pub struct InputImage {
    pub name: String,
    pub image: DynamicImage,
    pub source_ref: Option<String>,
}

impl InputImage {
    pub fn new(name: impl Into<String>, image: DynamicImage) -> Self {
        Self {
            name: name.into(),
            image,
            source_ref: None,
        }
    }

    pub fn with_source_ref(mut self, source_ref: impl Into<String>) -> Self {
        self.source_ref = Some(source_ref.into());
        self
    }
}

impl SourceImage for InputImage {
    fn name(&self) -> &str {
        &self.name
    }
    fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
    fn pixels(&self) -> Cow<'_, RgbaImage> {
        match &self.image {
            DynamicImage::ImageRgba8(rgba) => Cow::Borrowed(rgba),
            other => Cow::Owned(other.to_rgba8()),
        }
    }
    fn source_ref(&self) -> Option<&str> {
        self.source_ref.as_deref()
    }
}

/// Raw RGBA buffer with a name.
pub struct NamedRgba {
    pub name: String,
    pub rgba: RgbaImage,
}

impl NamedRgba {
    pub fn new(name: impl Into<String>, rgba: RgbaImage) -> Self {
        Self {
            name: name.into(),
            rgba,
        }
    }
}

impl SourceImage for NamedRgba {
    fn name(&self) -> &str {
        &self.name
    }
    fn dimensions(&self) -> (u32, u32) {
        self.rgba.dimensions()
    }
    fn pixels(&self) -> Cow<'_, RgbaImage> {
        Cow::Borrowed(&self.rgba)
    }
}

/// Where one input ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Position of the item in the caller's input list.
    pub index: usize,
    pub name: String,
    pub source_ref: Option<String>,
    /// Reserved footprint in the sheet, padding included.
    pub slot: Rect,
    /// Sprite pixels only (top-left of `slot`).
    pub frame: Rect,
    pub uv: UvRect,
}

/// Geometry of a finished pack. Placements are in packing order (area descending).
#[derive(Debug, Clone)]
pub struct PackLayout {
    pub width: u32,
    pub height: u32,
    pub padding: u32,
    pub placements: Vec<Placement>,
    pub stats: PackStats,
}

impl PackLayout {
    pub fn placement(&self, name: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.name == name)
    }

    /// Placements re-ordered to match the caller's input list.
    pub fn placements_by_input(&self) -> Vec<&Placement> {
        let mut v: Vec<&Placement> = self.placements.iter().collect();
        v.sort_by_key(|p| p.index);
        v
    }

    pub fn sprites(&self) -> Vec<SpriteItem> {
        self.placements
            .iter()
            .map(|p| {
                SpriteItem::new(p.name.clone(), p.uv, (p.frame.w, p.frame.h))
                    .with_source_ref(p.source_ref.clone())
            })
            .collect()
    }
}

/// Output of a packing run: the composite sheet plus its layout.
pub struct PackOutput {
    pub image: RgbaImage,
    pub layout: PackLayout,
}

impl PackOutput {
    pub fn width(&self) -> u32 {
        self.layout.width
    }
    pub fn height(&self) -> u32 {
        self.layout.height
    }
    pub fn stats(&self) -> PackStats {
        self.layout.stats
    }
    /// Sprite records for every placement, borders left at zero.
    pub fn sprites(&self) -> Vec<SpriteItem> {
        self.layout.sprites()
    }
}

struct Item {
    index: usize,
    name: String,
    source_ref: Option<String>,
    w: u32,
    h: u32,
}

/// Packs sizes only, without touching pixels. Inputs are `(name, width, height)`.
pub fn pack_layout<K: Into<String>>(
    inputs: Vec<(K, u32, u32)>,
    cfg: &PackingConfig,
) -> Result<PackLayout> {
    let items = inputs
        .into_iter()
        .enumerate()
        .map(|(index, (k, w, h))| Item {
            index,
            name: k.into(),
            source_ref: None,
            w,
            h,
        })
        .collect();
    layout_items(items, cfg)
}

#[instrument(skip_all, fields(count = images.len()))]
/// Packs `images` into one sheet and composites their pixels.
///
/// Notes:
/// - Items are placed largest area first; equal areas keep input order.
/// - The sheet starts at `initial_size` and doubles its smaller side until everything fits.
/// - Fails with `AtlasError::AtlasTooLarge` rather than returning a partial atlas.
pub fn pack_textures<S: SourceImage>(images: &[S], cfg: &PackingConfig) -> Result<PackOutput> {
    let items = images
        .iter()
        .enumerate()
        .map(|(index, img)| {
            let (w, h) = img.dimensions();
            Item {
                index,
                name: img.name().to_string(),
                source_ref: img.source_ref().map(str::to_string),
                w,
                h,
            }
        })
        .collect();
    let layout = layout_items(items, cfg)?;

    let mut canvas = RgbaImage::new(layout.width, layout.height);
    let extrude = cfg.extrude_amount();
    for p in &layout.placements {
        let pixels = images[p.index].pixels();
        if pixels.dimensions() != (p.frame.w, p.frame.h) {
            return Err(AtlasError::InvalidInput(format!(
                "image '{}' reported {}x{} but its pixel buffer is {}x{}",
                p.name,
                p.frame.w,
                p.frame.h,
                pixels.width(),
                pixels.height()
            )));
        }
        blit_rgba(&pixels, &mut canvas, p.frame.x, p.frame.y);
        if extrude > 0 {
            extrude_edges(&mut canvas, &p.frame, extrude);
        }
    }

    info!(
        width = layout.width,
        height = layout.height,
        sprites = layout.placements.len(),
        "atlas composed"
    );
    Ok(PackOutput {
        image: canvas,
        layout,
    })
}

fn layout_items(mut items: Vec<Item>, cfg: &PackingConfig) -> Result<PackLayout> {
    cfg.validate()?;
    if items.is_empty() {
        return Err(AtlasError::Empty);
    }
    let pad = cfg.padding;
    let max = cfg.max_atlas_size;
    for it in &items {
        if it.w == 0 || it.h == 0 {
            return Err(AtlasError::InvalidInput(format!(
                "image '{}' has zero size ({}x{})",
                it.name, it.w, it.h
            )));
        }
        let (fw, fh) = (it.w.saturating_add(pad), it.h.saturating_add(pad));
        if fw > max {
            return Err(too_large(Dimension::Width, fw, max));
        }
        if fh > max {
            return Err(too_large(Dimension::Height, fh, max));
        }
    }

    // stable: equal areas keep input order
    items.sort_by(|a, b| (b.w as u64 * b.h as u64).cmp(&(a.w as u64 * a.h as u64)));

    let (mut width, mut height) = seed_size(cfg);
    let mut attempts = 0u32;
    let slots = loop {
        attempts += 1;
        debug!(width, height, attempt = attempts, "trying bin");
        let mut bin = RectBin::new(width, height);
        let placed: Option<Vec<Rect>> = items
            .iter()
            .map(|it| bin.insert(it.w + pad, it.h + pad, cfg.heuristic))
            .collect();
        match placed {
            Some(slots) => break slots,
            None => (width, height) = grow(width, height, cfg)?,
        }
    };

    let mut used_area = 0u64;
    let placements: Vec<Placement> = items
        .into_iter()
        .zip(slots)
        .map(|(it, slot)| {
            used_area += slot.area();
            let frame = Rect::new(slot.x, slot.y, it.w, it.h);
            Placement {
                index: it.index,
                name: it.name,
                source_ref: it.source_ref,
                slot,
                frame,
                uv: UvRect::from_pixels(&frame, width, height),
            }
        })
        .collect();

    let bin_area = width as u64 * height as u64;
    let stats = PackStats {
        attempts,
        num_sprites: placements.len(),
        bin_area,
        used_area,
        occupancy: used_area as f64 / bin_area as f64,
    };
    debug!(width, height, summary = %stats.summary(), "layout done");
    Ok(PackLayout {
        width,
        height,
        padding: pad,
        placements,
        stats,
    })
}

/// First sheet size: `initial_size` clamped to the cap, square or landscape.
fn seed_size(cfg: &PackingConfig) -> (u32, u32) {
    let max = cfg.max_atlas_size;
    let (w, h) = (cfg.initial_size.0.min(max), cfg.initial_size.1.min(max));
    if cfg.force_square {
        let s = w.max(h);
        (s, s)
    } else if h > w {
        (h, w)
    } else {
        (w, h)
    }
}

/// Doubles the smaller side (width on ties, both when square), clamped to the cap.
fn grow(width: u32, height: u32, cfg: &PackingConfig) -> Result<(u32, u32)> {
    let max = cfg.max_atlas_size;
    if cfg.force_square {
        if width >= max {
            return Err(too_large(Dimension::Width, width.saturating_mul(2), max));
        }
        let s = width.saturating_mul(2).min(max);
        return Ok((s, s));
    }
    let grow_height = height < width;
    match (grow_height, width < max, height < max) {
        (true, _, true) | (false, false, true) => Ok((width, height.saturating_mul(2).min(max))),
        (false, true, _) | (true, true, false) => Ok((width.saturating_mul(2).min(max), height)),
        _ => {
            let dimension = if grow_height {
                Dimension::Height
            } else {
                Dimension::Width
            };
            let current = if grow_height { height } else { width };
            Err(too_large(dimension, current.saturating_mul(2), max))
        }
    }
}

fn too_large(dimension: Dimension, attempted: u32, max_size: u32) -> AtlasError {
    AtlasError::AtlasTooLarge {
        dimension,
        attempted,
        max_size,
    }
}
