//! Scoring rules for choosing a free rectangle.
//!
//! Every heuristic produces a `(primary, secondary)` pair where lower is better.
//! Contact-point wants the *largest* contact length, so its primary score is negated.

use crate::config::Heuristic;
use crate::model::{PlacedItem, Rect};

/// What a scorer may look at besides the candidate itself.
pub struct ScoreContext<'a> {
    pub bin_width: u32,
    pub bin_height: u32,
    pub used: &'a [PlacedItem],
}

pub fn score(heuristic: Heuristic, fr: &Rect, w: u32, h: u32, ctx: &ScoreContext<'_>) -> (i64, i64) {
    let leftover_h = fr.w as i64 - w as i64;
    let leftover_v = fr.h as i64 - h as i64;
    let short_fit = leftover_h.abs().min(leftover_v.abs());
    let long_fit = leftover_h.abs().max(leftover_v.abs());
    match heuristic {
        Heuristic::BestShortSideFit => (short_fit, long_fit),
        Heuristic::BestLongSideFit => (long_fit, short_fit),
        Heuristic::BestAreaFit => (fr.area() as i64 - (w as u64 * h as u64) as i64, short_fit),
        Heuristic::BottomLeft => (fr.y as i64 + h as i64, fr.x as i64),
        Heuristic::ContactPoint => {
            let contact = contact_point_score(&Rect::new(fr.x, fr.y, w, h), ctx);
            (-(contact as i64), 0)
        }
    }
}

/// Picks where a `w x h` item goes. Only a strictly better `(s1, s2)` replaces the
/// current best, so the earliest free rect wins ties.
pub fn find_position(
    heuristic: Heuristic,
    free: &[Rect],
    w: u32,
    h: u32,
    ctx: &ScoreContext<'_>,
) -> Option<(Rect, (i64, i64))> {
    let mut best: Option<(Rect, (i64, i64))> = None;
    for fr in free {
        if fr.w < w || fr.h < h {
            continue;
        }
        let s = score(heuristic, fr, w, h, ctx);
        match best {
            Some((_, bs)) if s >= bs => {}
            _ => best = Some((Rect::new(fr.x, fr.y, w, h), s)),
        }
    }
    best
}

/// Total edge length `node` shares with the bin border and with placed rects.
pub fn contact_point_score(node: &Rect, ctx: &ScoreContext<'_>) -> u32 {
    let mut score = 0u32;
    if node.x == 0 {
        score += node.h;
    }
    if node.right() == ctx.bin_width {
        score += node.h;
    }
    if node.y == 0 {
        score += node.w;
    }
    if node.bottom() == ctx.bin_height {
        score += node.w;
    }

    for u in ctx.used.iter().map(|p| &p.rect) {
        // left/right edges
        if node.x == u.right() || u.x == node.right() {
            score += overlap_1d(node.y, node.bottom(), u.y, u.bottom());
        }
        // top/bottom edges
        if node.y == u.bottom() || u.y == node.bottom() {
            score += overlap_1d(node.x, node.right(), u.x, u.right());
        }
    }
    score
}

fn overlap_1d(a1: u32, a2: u32, b1: u32, b2: u32) -> u32 {
    a2.min(b2).saturating_sub(a1.max(b1))
}
