use sprite_atlas_core::config::Heuristic;
use sprite_atlas_core::model::{PlacedItem, Rect};
use sprite_atlas_core::packer::RectBin;
use sprite_atlas_core::packer::heuristic::{ScoreContext, contact_point_score, find_position};

fn ctx(used: &[PlacedItem]) -> ScoreContext<'_> {
    ScoreContext {
        bin_width: 200,
        bin_height: 200,
        used,
    }
}

// A is narrow and tall on the left edge, B is squarer and touches the top.
// For a 25x50 item: A leaves (5, 50), B leaves (35, 10).
fn candidates() -> Vec<Rect> {
    vec![Rect::new(0, 10, 30, 100), Rect::new(100, 0, 60, 60)]
}

fn choose(h: Heuristic) -> Rect {
    let free = candidates();
    let (r, _) = find_position(h, &free, 25, 50, &ctx(&[])).expect("both candidates fit");
    r
}

#[test]
fn each_heuristic_picks_its_own_candidate() {
    let a = Rect::new(0, 10, 25, 50);
    let b = Rect::new(100, 0, 25, 50);
    assert_eq!(choose(Heuristic::BestShortSideFit), a);
    assert_eq!(choose(Heuristic::BestLongSideFit), b);
    assert_eq!(choose(Heuristic::BestAreaFit), a);
    assert_eq!(choose(Heuristic::BottomLeft), b);
    assert_eq!(choose(Heuristic::ContactPoint), a);
}

#[test]
fn ties_go_to_the_first_free_rect() {
    let free = vec![Rect::new(60, 0, 50, 50), Rect::new(120, 0, 50, 50)];
    for h in [
        Heuristic::BestShortSideFit,
        Heuristic::BestLongSideFit,
        Heuristic::BestAreaFit,
    ] {
        let (r, _) = find_position(h, &free, 10, 10, &ctx(&[])).expect("fits");
        assert_eq!((r.x, r.y), (60, 0), "{h}");
    }
}

#[test]
fn nothing_fits_returns_none() {
    let free = vec![Rect::new(0, 0, 10, 10)];
    for h in Heuristic::ALL {
        assert!(find_position(h, &free, 11, 5, &ctx(&[])).is_none());
    }
}

#[test]
fn contact_score_counts_bin_edges_and_neighbours() {
    let used = [PlacedItem {
        order: 0,
        rect: Rect::new(0, 0, 10, 10),
    }];
    let c = ctx(&used);
    // touches the top border (10) and the neighbour's right edge over 5px
    assert_eq!(contact_point_score(&Rect::new(10, 0, 10, 5), &c), 15);
    // touches the left border (5) and the neighbour's bottom edge over 10px
    assert_eq!(contact_point_score(&Rect::new(0, 10, 10, 5), &c), 15);
    // a rect filling the whole bin touches all four borders
    assert_eq!(contact_point_score(&Rect::new(0, 0, 200, 200), &ctx(&[])), 800);
    // floating in the middle touches nothing
    assert_eq!(contact_point_score(&Rect::new(50, 50, 10, 10), &c), 0);
}

#[test]
fn bottom_left_prefers_the_lower_top_edge() {
    let mut bin = RectBin::new(100, 100);
    bin.insert(50, 50, Heuristic::BottomLeft).expect("fits");
    let r = bin.insert(10, 10, Heuristic::BottomLeft).expect("fits");
    assert_eq!((r.x, r.y), (50, 0));

    // best-area sees two equal candidates and keeps the first one in the free list
    let mut bin = RectBin::new(100, 100);
    bin.insert(50, 50, Heuristic::BestAreaFit).expect("fits");
    let r = bin.insert(10, 10, Heuristic::BestAreaFit).expect("fits");
    assert_eq!((r.x, r.y), (0, 50));
}

#[test]
fn contact_point_hugs_placed_rects() {
    let mut bin = RectBin::new(128, 128);
    bin.insert(32, 32, Heuristic::ContactPoint).expect("fits");
    let r = bin.insert(16, 16, Heuristic::ContactPoint).expect("fits");
    // next to the first rect along a border, never floating
    assert!(r.x == 0 || r.y == 0);
    assert!(r.x == 32 || r.y == 32);
}

#[test]
fn heuristic_names_parse() {
    for h in Heuristic::ALL {
        assert_eq!(h.short_name().parse::<Heuristic>().expect("short name"), h);
    }
    assert_eq!("BestAreaFit".parse::<Heuristic>().expect("long name"), Heuristic::BestAreaFit);
    assert_eq!("contactpoint".parse::<Heuristic>().expect("long name"), Heuristic::ContactPoint);
    assert!("skyline".parse::<Heuristic>().is_err());
}
