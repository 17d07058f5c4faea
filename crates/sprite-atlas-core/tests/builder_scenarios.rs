use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng};
use sprite_atlas_core::prelude::*;
use sprite_atlas_core::error::Dimension;

fn solid(name: &str, w: u32, h: u32, rgba: [u8; 4]) -> NamedRgba {
    NamedRgba::new(name, RgbaImage::from_pixel(w, h, Rgba(rgba)))
}

fn cfg(padding: u32, max: u32, heuristic: Heuristic) -> PackingConfig {
    PackingConfig::builder()
        .padding(padding)
        .max_atlas_size(max)
        .heuristic(heuristic)
        .build()
}

#[test]
fn three_64px_images_fit_one_256x128_sheet() {
    let images = vec![
        solid("a", 64, 64, [255, 0, 0, 255]),
        solid("b", 64, 64, [0, 255, 0, 255]),
        solid("c", 64, 64, [0, 0, 255, 255]),
    ];
    let out = pack_textures(&images, &cfg(2, 256, Heuristic::BestAreaFit)).expect("pack");
    assert_eq!((out.width(), out.height()), (256, 128));
    assert_eq!(out.image.dimensions(), (256, 128));
    assert_eq!(out.stats().attempts, 1);

    let slots: Vec<Rect> = out.layout.placements.iter().map(|p| p.slot).collect();
    for (i, a) in slots.iter().enumerate() {
        assert_eq!((a.w, a.h), (66, 66));
        for b in &slots[i + 1..] {
            assert!(!a.intersects(b));
        }
    }
    for sprite in out.sprites() {
        assert_eq!(sprite.size_in_pixels, (64, 64));
        assert!(!sprite.rotated);
    }
    let a = out.layout.placement("a").expect("a placed");
    assert_eq!(a.uv, UvRect::new(0.0, 0.0, 0.25, 0.5));
}

#[test]
fn image_larger_than_the_cap_is_rejected() {
    let images = vec![solid("big", 300, 300, [1, 2, 3, 255])];
    let err = pack_textures(&images, &cfg(2, 256, Heuristic::BestAreaFit))
        .err()
        .expect("must not fit");
    match err {
        AtlasError::AtlasTooLarge {
            dimension,
            attempted,
            max_size,
        } => {
            assert_eq!(dimension, Dimension::Width);
            assert_eq!(attempted, 302);
            assert_eq!(max_size, 256);
        }
        other => panic!("expected AtlasTooLarge, got {other:?}"),
    }
}

#[test]
fn too_much_total_area_terminates_with_an_error() {
    let inputs: Vec<(String, u32, u32)> = (0..40).map(|i| (format!("s{i}"), 64, 64)).collect();
    let err = pack_layout(inputs, &cfg(0, 256, Heuristic::BottomLeft))
        .err()
        .expect("40 tiles of 64px cannot fit in 256x256");
    assert!(matches!(
        err,
        AtlasError::AtlasTooLarge {
            max_size: 256,
            attempted: 512,
            ..
        }
    ));
    assert!(err.to_string().contains("256"));
}

#[test]
fn sheet_grows_smaller_side_first() {
    let base = PackingConfig::builder()
        .padding(0)
        .max_atlas_size(1024)
        .initial_size(64, 64);
    let layout = pack_layout(vec![("x", 100, 100)], &base.clone().build()).expect("pack");
    // 64x64 -> 128x64 -> 128x128
    assert_eq!((layout.width, layout.height), (128, 128));
    assert_eq!(layout.stats.attempts, 3);

    let layout = pack_layout(vec![("x", 100, 100)], &base.force_square(true).build()).expect("pack");
    assert_eq!((layout.width, layout.height), (128, 128));
    assert_eq!(layout.stats.attempts, 2);
}

#[test]
fn seed_is_landscape_or_square() {
    let portrait = PackingConfig::builder().initial_size(64, 256).build();
    let layout = pack_layout(vec![("x", 8, 8)], &portrait).expect("pack");
    assert_eq!((layout.width, layout.height), (256, 64));

    let square = PackingConfig::builder().force_square(true).build();
    let layout = pack_layout(vec![("x", 8, 8)], &square).expect("pack");
    assert_eq!((layout.width, layout.height), (256, 256));

    let capped = PackingConfig::builder().max_atlas_size(128).build();
    let layout = pack_layout(vec![("x", 8, 8)], &capped).expect("pack");
    assert_eq!((layout.width, layout.height), (128, 128));
}

#[test]
fn larger_items_are_placed_first_and_ties_keep_input_order() {
    let inputs = vec![("small", 8, 8), ("wide", 32, 16), ("tall", 16, 32), ("big", 40, 40)];
    let layout = pack_layout(inputs, &PackingConfig::default()).expect("pack");
    let order: Vec<&str> = layout.placements.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(order, vec!["big", "wide", "tall", "small"]);
    let by_input: Vec<usize> = layout.placements_by_input().iter().map(|p| p.index).collect();
    assert_eq!(by_input, vec![0, 1, 2, 3]);
}

#[test]
fn random_sets_satisfy_layout_invariants() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(1234);
    for heuristic in Heuristic::ALL {
        let inputs: Vec<(String, u32, u32)> = (0..80)
            .map(|i| (format!("r{i}"), rng.gen_range(4..=90), rng.gen_range(4..=90)))
            .collect();
        let padding = rng.gen_range(0..=4);
        let layout = pack_layout(inputs.clone(), &cfg(padding, 2048, heuristic)).expect("pack");
        let bounds = Rect::new(0, 0, layout.width, layout.height);

        let mut footprint_area = 0u64;
        for (i, p) in layout.placements.iter().enumerate() {
            assert!(bounds.contains(&p.slot), "{heuristic}: {:?} outside", p.slot);
            for q in &layout.placements[i + 1..] {
                assert!(!p.slot.intersects(&q.slot), "{heuristic}: overlap");
            }
            let (_, w, h) = &inputs[p.index];
            assert_eq!((p.frame.w, p.frame.h), (*w, *h));
            assert_eq!((p.slot.w, p.slot.h), (w + padding, h + padding));
            footprint_area += p.slot.area();

            // UV -> pixels reproduces the sprite rect
            assert_eq!(p.uv.to_pixels(layout.width, layout.height), p.frame);
        }
        assert!(layout.width as u64 * layout.height as u64 >= footprint_area);
        assert_eq!(layout.stats.used_area, footprint_area);
        assert_eq!(layout.placements.len(), inputs.len());
    }
}

#[test]
fn repacking_identical_input_is_identical() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let inputs: Vec<(String, u32, u32)> = (0..120)
        .map(|i| (format!("r{i}"), rng.gen_range(4..=64), rng.gen_range(4..=64)))
        .collect();
    for heuristic in Heuristic::ALL {
        let cfg = cfg(2, 4096, heuristic);
        let a = pack_layout(inputs.clone(), &cfg).expect("pack");
        let b = pack_layout(inputs.clone(), &cfg).expect("pack");
        assert_eq!((a.width, a.height), (b.width, b.height));
        assert_eq!(a.placements, b.placements);
    }
}

#[test]
fn empty_and_degenerate_inputs_are_errors() {
    let none: Vec<(String, u32, u32)> = vec![];
    assert!(matches!(
        pack_layout(none, &PackingConfig::default()),
        Err(AtlasError::Empty)
    ));
    assert!(matches!(
        pack_layout(vec![("flat", 10, 0)], &PackingConfig::default()),
        Err(AtlasError::InvalidInput(_))
    ));
    let bad = PackingConfig::builder().max_atlas_size(1000).build();
    assert!(matches!(
        pack_layout(vec![("x", 10, 10)], &bad),
        Err(AtlasError::InvalidConfig(_))
    ));
}
