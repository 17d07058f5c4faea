use std::collections::{HashMap, HashSet};

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::config::PackingConfig;
use crate::error::Result;
use crate::model::{PackStats, SpriteItem};
use crate::pipeline::{SourceImage, pack_textures};

/// Authoritative name → sprite mapping for one atlas texture.
///
/// Sprites are kept sorted by name after every bulk operation so that two rebuilds
/// of the same content serialize identically.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpriteAtlas {
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
    sprites: Vec<SpriteItem>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl SpriteAtlas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            sprites: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Builds a registry from existing sprites. Later duplicates replace earlier ones.
    pub fn from_sprites(width: u32, height: u32, sprites: Vec<SpriteItem>) -> Self {
        let mut atlas = Self::new(width, height);
        for s in sprites {
            atlas.add_item(s);
        }
        atlas.sort();
        atlas
    }

    /// Parses a registry previously written with `serde_json`.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut atlas: SpriteAtlas = serde_json::from_str(json)?;
        atlas.dedupe();
        atlas.sort();
        Ok(atlas)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn sprites(&self) -> &[SpriteItem] {
        &self.sprites
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpriteItem> {
        self.sprites.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sprites.iter().map(|s| s.name.as_str())
    }

    pub fn lookup(&self, name: &str) -> Option<&SpriteItem> {
        self.index.get(name).map(|&i| &self.sprites[i])
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut SpriteItem> {
        self.index.get(name).map(|&i| &mut self.sprites[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Inserts `item`, replacing any sprite with the same name. Nothing of the old
    /// entry is kept; callers carry fields such as `border` forward themselves.
    pub fn add_item(&mut self, item: SpriteItem) {
        match self.index.get(&item.name) {
            Some(&i) => self.sprites[i] = item,
            None => {
                self.index.insert(item.name.clone(), self.sprites.len());
                self.sprites.push(item);
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<SpriteItem> {
        let i = self.index.remove(name)?;
        let item = self.sprites.remove(i);
        self.rebuild_index();
        Some(item)
    }

    /// Soft-deletes `name`; it is skipped by the next rebuild. Returns false if unknown.
    pub fn mark_deleted(&mut self, name: &str) -> bool {
        match self.lookup_mut(name) {
            Some(s) => {
                s.deleted = true;
                true
            }
            None => false,
        }
    }

    /// Physically removes soft-deleted sprites and returns their names.
    pub fn purge_deleted(&mut self) -> Vec<String> {
        let mut purged = Vec::new();
        self.sprites.retain(|s| {
            if s.deleted {
                purged.push(s.name.clone());
            }
            !s.deleted
        });
        if !purged.is_empty() {
            self.rebuild_index();
        }
        purged
    }

    /// Canonical by-name ordering.
    pub fn sort(&mut self) {
        self.sprites.sort_by(|a, b| a.name.cmp(&b.name));
        self.rebuild_index();
    }

    pub fn rebuild_index(&mut self) {
        self.index = self
            .sprites
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), i))
            .collect();
    }

    /// Repacks the atlas from `images` and returns the new texture with its stats.
    ///
    /// Images named after a soft-deleted sprite are left out, and soft-deleted sprites
    /// are purged. Borders are carried forward by name. The sprite list is replaced by
    /// what was packed; when nothing is left to pack the registry becomes an empty
    /// 0x0 atlas. On error the registry is unchanged.
    #[instrument(skip_all, fields(images = images.len(), sprites = self.sprites.len()))]
    pub fn rebuild<S: SourceImage>(
        &mut self,
        images: &[S],
        cfg: &PackingConfig,
    ) -> Result<(RgbaImage, PackStats)> {
        let deleted: HashSet<&str> = self
            .sprites
            .iter()
            .filter(|s| s.deleted)
            .map(|s| s.name.as_str())
            .collect();

        // last image wins when names collide
        let mut last_by_name: HashMap<&str, usize> = HashMap::new();
        for (i, img) in images.iter().enumerate() {
            if last_by_name.insert(img.name(), i).is_some() {
                warn!(name = img.name(), "duplicate image name, keeping the last one");
            }
        }
        let selected: Vec<&S> = images
            .iter()
            .enumerate()
            .filter(|(i, img)| {
                last_by_name.get(img.name()) == Some(i) && !deleted.contains(img.name())
            })
            .map(|(_, img)| img)
            .collect();

        if selected.is_empty() {
            cfg.validate()?;
            let purged = self.purge_deleted();
            info!(purged = purged.len(), "nothing left to pack, atlas cleared");
            *self = SpriteAtlas::default();
            return Ok((RgbaImage::new(0, 0), PackStats::default()));
        }

        let out = pack_textures(&selected, cfg)?;

        let mut next = SpriteAtlas::new(out.width(), out.height());
        for mut sprite in out.sprites() {
            if let Some(prev) = self.lookup(&sprite.name) {
                sprite.border = prev.border;
            }
            next.add_item(sprite);
        }
        next.sort();
        let purged = self.purge_deleted();
        info!(
            width = next.width,
            height = next.height,
            sprites = next.len(),
            purged = purged.len(),
            "atlas rebuilt"
        );
        *self = next;
        let stats = out.stats();
        Ok((out.image, stats))
    }

    fn dedupe(&mut self) {
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut deduped: Vec<SpriteItem> = Vec::with_capacity(self.sprites.len());
        for s in self.sprites.drain(..) {
            match seen.get(&s.name) {
                Some(&i) => deduped[i] = s,
                None => {
                    seen.insert(s.name.clone(), deduped.len());
                    deduped.push(s);
                }
            }
        }
        self.sprites = deduped;
        self.rebuild_index();
    }
}
