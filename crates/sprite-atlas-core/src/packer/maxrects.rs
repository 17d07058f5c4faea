use tracing::trace;

use super::heuristic::{ScoreContext, find_position};
use crate::config::Heuristic;
use crate::model::{PlacedItem, Rect};

/// MaxRects bin: a fixed-size sheet tracking maximal free rectangles.
///
/// The free list may overlap; it never holds a rect contained in another one.
#[derive(Debug, Clone)]
pub struct RectBin {
    width: u32,
    height: u32,
    free: Vec<Rect>,
    used: Vec<PlacedItem>,
}

impl RectBin {
    pub fn new(width: u32, height: u32) -> Self {
        let mut bin = Self {
            width: 0,
            height: 0,
            free: Vec::new(),
            used: Vec::new(),
        };
        bin.init(width, height);
        bin
    }

    /// Resets the bin to a single free rect covering `width x height`.
    pub fn init(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.free.clear();
        self.used.clear();
        if width > 0 && height > 0 {
            self.free.push(Rect::new(0, 0, width, height));
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn free_rects(&self) -> &[Rect] {
        &self.free
    }

    pub fn used_rects(&self) -> &[PlacedItem] {
        &self.used
    }

    /// Places a `width x height` item. `None` means it does not fit in this bin.
    pub fn insert(&mut self, width: u32, height: u32, heuristic: Heuristic) -> Option<Rect> {
        if width == 0 || height == 0 {
            return None;
        }
        let ctx = ScoreContext {
            bin_width: self.width,
            bin_height: self.height,
            used: &self.used,
        };
        let (node, score) = find_position(heuristic, &self.free, width, height, &ctx)?;
        trace!(?node, ?score, "placed");
        self.place_rect(node);
        Some(node)
    }

    /// Like `insert` but hands back the zero-height sentinel instead of `None`.
    pub fn insert_or_sentinel(&mut self, width: u32, height: u32, heuristic: Heuristic) -> Rect {
        self.insert(width, height, heuristic).unwrap_or_default()
    }

    /// Fraction of the bin covered by used rects.
    pub fn occupancy(&self) -> f64 {
        let total = self.width as u64 * self.height as u64;
        if total == 0 {
            return 0.0;
        }
        let used: u64 = self.used.iter().map(|p| p.rect.area()).sum();
        used as f64 / total as f64
    }

    fn place_rect(&mut self, node: Rect) {
        let original_len = self.free.len();
        let mut kept: Vec<Rect> = Vec::with_capacity(original_len + 4);
        let mut split: Vec<Rect> = Vec::new();
        for fr in self.free.drain(..) {
            if fr.intersects(&node) {
                split_free_node(&fr, &node, &mut split);
            } else {
                kept.push(fr);
            }
        }
        kept.extend(split);
        self.free = kept;
        self.prune_free_list();
        self.used.push(PlacedItem {
            order: self.used.len(),
            rect: node,
        });
    }

    fn prune_free_list(&mut self) {
        let mut i = 0;
        while i < self.free.len() {
            let mut j = i + 1;
            let mut remove_i = false;
            while j < self.free.len() {
                if self.free[j].contains(&self.free[i]) {
                    remove_i = true;
                    break;
                }
                if self.free[i].contains(&self.free[j]) {
                    self.free.remove(j);
                    continue;
                }
                j += 1;
            }
            if remove_i {
                self.free.remove(i);
            } else {
                i += 1;
            }
        }
    }
}

/// Pushes the maximal leftovers of `fr` around `node` (which must intersect it).
fn split_free_node(fr: &Rect, node: &Rect, out: &mut Vec<Rect>) {
    if node.x < fr.right() && node.right() > fr.x {
        // above
        if node.y > fr.y && node.y < fr.bottom() {
            out.push(Rect::new(fr.x, fr.y, fr.w, node.y - fr.y));
        }
        // below
        if node.bottom() < fr.bottom() {
            out.push(Rect::new(fr.x, node.bottom(), fr.w, fr.bottom() - node.bottom()));
        }
    }
    if node.y < fr.bottom() && node.bottom() > fr.y {
        // left
        if node.x > fr.x && node.x < fr.right() {
            out.push(Rect::new(fr.x, fr.y, node.x - fr.x, fr.h));
        }
        // right
        if node.right() < fr.right() {
            out.push(Rect::new(node.right(), fr.y, fr.right() - node.right(), fr.h));
        }
    }
}
