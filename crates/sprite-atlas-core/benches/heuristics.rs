use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use sprite_atlas_core::prelude::*;

fn generate_sprites(count: usize, min_size: u32, max_size: u32) -> Vec<(String, u32, u32)> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(count as u64);
    (0..count)
        .map(|i| {
            let w = rng.gen_range(min_size..=max_size);
            let h = rng.gen_range(min_size..=max_size);
            (format!("sprite_{i}"), w, h)
        })
        .collect()
}

fn bench_heuristics(c: &mut Criterion) {
    let mut group = c.benchmark_group("heuristics");

    for count in [50, 200, 500] {
        let sprites = generate_sprites(count, 8, 96);
        group.throughput(Throughput::Elements(count as u64));

        for heuristic in Heuristic::ALL {
            let cfg = PackingConfig::builder()
                .heuristic(heuristic)
                .max_atlas_size(4096)
                .build();
            group.bench_with_input(
                BenchmarkId::new(heuristic.short_name(), count),
                &sprites,
                |b, sprites| {
                    b.iter(|| black_box(pack_layout(sprites.clone(), &cfg)));
                },
            );
        }
    }

    group.finish();
}

fn bench_single_bin(c: &mut Criterion) {
    let sprites = generate_sprites(300, 8, 64);
    c.bench_function("rect_bin_fill_1024", |b| {
        b.iter(|| {
            let mut bin = RectBin::new(1024, 1024);
            for (_, w, h) in &sprites {
                black_box(bin.insert(*w, *h, Heuristic::BestShortSideFit));
            }
            bin.occupancy()
        });
    });
}

criterion_group!(benches, bench_heuristics, bench_single_bin);
criterion_main!(benches);
