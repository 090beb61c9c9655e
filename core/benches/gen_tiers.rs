use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use mine3d_core::{Difficulty, generate_board};

fn gen_tiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for difficulty in Difficulty::ALL {
        group.bench_function(difficulty.label(), |b| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                black_box(generate_board(difficulty, seed))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, gen_tiers);
criterion_main!(benches);
