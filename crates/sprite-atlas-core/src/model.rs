use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn right(&self) -> u32 {
        self.x + self.w
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
    /// True for the zero-height rect a bin hands back when it cannot place an item.
    pub fn is_placement_failure(&self) -> bool {
        self.h == 0
    }
    /// Returns true if `r` is fully inside `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
    /// Returns true if the interiors of the two rects overlap.
    pub fn intersects(&self, r: &Rect) -> bool {
        !(self.x >= r.right() || r.x >= self.right() || self.y >= r.bottom() || r.y >= self.bottom())
    }
}

/// Rectangle in normalized texture space (0..1), origin at the top-left pixel row.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct UvRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl UvRect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Normalizes a pixel rect against a `width x height` texture.
    pub fn from_pixels(r: &Rect, width: u32, height: u32) -> Self {
        let (tw, th) = (width.max(1) as f32, height.max(1) as f32);
        Self {
            x: r.x as f32 / tw,
            y: r.y as f32 / th,
            w: r.w as f32 / tw,
            h: r.h as f32 / th,
        }
    }

    /// Scales back to pixels, rounding to the nearest whole pixel.
    pub fn to_pixels(&self, width: u32, height: u32) -> Rect {
        let (tw, th) = (width as f32, height as f32);
        Rect::new(
            (self.x * tw).round() as u32,
            (self.y * th).round() as u32,
            (self.w * tw).round() as u32,
            (self.h * th).round() as u32,
        )
    }
}

/// 9-slice insets in pixels.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Border {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Border {
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
    pub fn uniform(v: u32) -> Self {
        Self::new(v, v, v, v)
    }
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// One named sprite inside an atlas texture.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpriteItem {
    /// Unique key within the atlas.
    pub name: String,
    /// Location in the atlas texture, normalized.
    pub region: UvRect,
    /// Sprite size without the padding gutter.
    pub size_in_pixels: (u32, u32),
    #[serde(default)]
    pub border: Border,
    /// Opaque handle to the image the sprite was built from (path, asset id, ...).
    #[serde(default)]
    pub source_ref: Option<String>,
    /// Always false; atlases never store rotated sprites.
    #[serde(default)]
    pub rotated: bool,
    /// Soft-delete flag: excluded from the next rebuild, then dropped.
    #[serde(default)]
    pub deleted: bool,
}

impl SpriteItem {
    pub fn new(name: impl Into<String>, region: UvRect, size_in_pixels: (u32, u32)) -> Self {
        Self {
            name: name.into(),
            region,
            size_in_pixels,
            border: Border::default(),
            source_ref: None,
            rotated: false,
            deleted: false,
        }
    }

    pub fn with_border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    pub fn with_source_ref(mut self, source_ref: Option<String>) -> Self {
        self.source_ref = source_ref;
        self
    }
}

/// A rect recorded in a bin's used list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedItem {
    /// Insertion order within the bin.
    pub order: usize,
    pub rect: Rect,
}

/// Statistics about one successful pack.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct PackStats {
    /// Number of bins tried, including the one that succeeded.
    pub attempts: u32,
    pub num_sprites: usize,
    /// `width * height` of the final sheet.
    pub bin_area: u64,
    /// Sum of the padded footprints.
    pub used_area: u64,
    /// `used_area / bin_area` (0.0 to 1.0).
    pub occupancy: f64,
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Sprites: {}, Attempts: {}, Occupancy: {:.2}%, Sheet Area: {} px², Used Area: {} px²",
            self.num_sprites,
            self.attempts,
            self.occupancy * 100.0,
            self.bin_area,
            self.used_area,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.bin_area.saturating_sub(self.used_area)
    }
}
