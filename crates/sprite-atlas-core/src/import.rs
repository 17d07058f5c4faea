//! Loading sprite regions that another tool already packed.
//!
//! Accepts the common JSON export shapes:
//! `{ "frames": { "<name>": { "frame": {x,y,w,h}, "rotated": bool } }, "meta": { "size": {w,h} } }`
//! and the array form `{ "frames": [ { "filename": "<name>", "frame": ..., "rotated": ... } ] }`.

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{AtlasError, Result};
use crate::model::{Border, Rect, SpriteItem, UvRect};
use crate::registry::SpriteAtlas;

#[derive(Debug, Deserialize)]
struct FrameRect {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

#[derive(Debug, Deserialize)]
struct FrameEntry {
    #[serde(default)]
    filename: Option<String>,
    frame: FrameRect,
    #[serde(default)]
    rotated: bool,
    #[serde(default)]
    border: Option<Border>,
}

#[derive(Debug, Deserialize)]
struct SizeEntry {
    w: u32,
    h: u32,
}

/// Result of an import: what loaded and what was skipped (with the reason).
#[derive(Debug, Default)]
pub struct ImportReport {
    pub width: u32,
    pub height: u32,
    pub sprites: Vec<SpriteItem>,
    pub skipped: Vec<(String, AtlasError)>,
}

impl ImportReport {
    pub fn skipped_names(&self) -> Vec<&str> {
        self.skipped.iter().map(|(n, _)| n.as_str()).collect()
    }
}

/// Parses a frame list. The texture size is read from `meta.size` when present,
/// otherwise `texture_size` must be given.
pub fn parse_frames(json: &str, texture_size: Option<(u32, u32)>) -> Result<ImportReport> {
    let root: Value = serde_json::from_str(json)?;
    let (width, height) = match root.pointer("/meta/size") {
        Some(v) => {
            let s: SizeEntry = serde_json::from_value(v.clone())?;
            (s.w, s.h)
        }
        None => texture_size.ok_or_else(|| {
            AtlasError::InvalidInput("no meta.size in JSON and no texture size given".into())
        })?,
    };
    if width == 0 || height == 0 {
        return Err(AtlasError::InvalidInput(format!(
            "texture size must be non-zero, got {width}x{height}"
        )));
    }

    let entries: Vec<(String, Value)> = match root.get("frames") {
        Some(Value::Object(map)) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        Some(Value::Array(list)) => list
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let name = v
                    .get("filename")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("frame_{i}"));
                (name, v.clone())
            })
            .collect(),
        _ => {
            return Err(AtlasError::InvalidInput(
                "expected a 'frames' object or array".into(),
            ));
        }
    };

    let mut report = ImportReport {
        width,
        height,
        ..Default::default()
    };
    for (key, value) in entries {
        match parse_entry(&key, value, width, height) {
            Ok(sprite) => report.sprites.push(sprite),
            Err(e) => {
                let name = sprite_name(&key);
                warn!(%name, error = %e, "skipping frame");
                report.skipped.push((name, e));
            }
        }
    }
    Ok(report)
}

fn parse_entry(key: &str, value: Value, width: u32, height: u32) -> Result<SpriteItem> {
    let entry: FrameEntry = serde_json::from_value(value)?;
    let raw_name = entry.filename.as_deref().unwrap_or(key);
    let name = sprite_name(raw_name);
    if entry.rotated {
        return Err(AtlasError::UnsupportedRotation { name });
    }
    let frame = Rect::new(entry.frame.x, entry.frame.y, entry.frame.w, entry.frame.h);
    // untrusted input: `x + w` may overflow
    let spills =
        |start: u32, len: u32, limit: u32| start.checked_add(len).is_none_or(|end| end > limit);
    if frame.w == 0
        || frame.h == 0
        || spills(frame.x, frame.w, width)
        || spills(frame.y, frame.h, height)
    {
        return Err(AtlasError::InvalidInput(format!(
            "frame '{name}' ({}x{} at {},{}) is empty or outside the {width}x{height} texture",
            frame.w, frame.h, frame.x, frame.y
        )));
    }
    Ok(SpriteItem::new(
        name,
        UvRect::from_pixels(&frame, width, height),
        (frame.w, frame.h),
    )
    .with_border(entry.border.unwrap_or_default()))
}

/// Strips a trailing image file extension: `"ui/button.png"` → `"ui/button"`.
pub fn sprite_name(raw: &str) -> String {
    const EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "tga", "bmp", "gif"];
    if let Some((stem, ext)) = raw.rsplit_once('.') {
        if !stem.is_empty() && EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
            return stem.to_string();
        }
    }
    raw.to_string()
}

impl SpriteAtlas {
    /// Loads an externally packed frame list into this registry, bypassing the packer.
    ///
    /// Existing sprites with the same name are replaced; their border is kept unless the
    /// frame carries a non-zero `border` of its own.
    /// Rotated or malformed frames are skipped and listed in the report.
    pub fn import_frames(
        &mut self,
        json: &str,
        texture_size: Option<(u32, u32)>,
    ) -> Result<ImportReport> {
        let report = parse_frames(json, texture_size)?;
        self.width = report.width;
        self.height = report.height;
        for sprite in &report.sprites {
            let mut sprite = sprite.clone();
            if let Some(prev) = self.lookup(&sprite.name) {
                if sprite.border.is_zero() {
                    sprite.border = prev.border;
                }
            }
            self.add_item(sprite);
        }
        self.sort();
        info!(
            loaded = report.sprites.len(),
            skipped = report.skipped.len(),
            "frames imported"
        );
        Ok(report)
    }
}
