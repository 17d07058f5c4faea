use serde_json::{Value, json};

use crate::registry::SpriteAtlas;

/// Flatten sprites keyed by name in the widely used JSON-hash shape.
/// Shape: `{ frames: { name: { frame, rotated, trimmed, sourceSize, border, region } }, meta }`.
/// `import_frames` reads this back, so exports round-trip.
pub fn to_json_hash(atlas: &SpriteAtlas) -> Value {
    let mut frames = serde_json::Map::new();
    for s in atlas.iter() {
        let px = s.region.to_pixels(atlas.width, atlas.height);
        frames.insert(
            s.name.clone(),
            json!({
                "frame": {"x": px.x, "y": px.y, "w": s.size_in_pixels.0, "h": s.size_in_pixels.1},
                "rotated": s.rotated,
                "trimmed": false,
                "sourceSize": {"w": s.size_in_pixels.0, "h": s.size_in_pixels.1},
                "border": {
                    "left": s.border.left,
                    "top": s.border.top,
                    "right": s.border.right,
                    "bottom": s.border.bottom,
                },
                "region": {"x": s.region.x, "y": s.region.y, "w": s.region.w, "h": s.region.h},
            }),
        );
    }
    json!({
        "frames": frames,
        "meta": {
            "app": "sprite-atlas",
            "version": env!("CARGO_PKG_VERSION"),
            "format": "RGBA8888",
            "size": {"w": atlas.width, "h": atlas.height},
        }
    })
}
