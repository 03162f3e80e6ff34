use craft_ai::{ActionPolicy, RandomPolicy};
use craft_core::{CraftState, MaterialCondition};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_choose(c: &mut Criterion) {
    let mut standard = CraftState::new();
    standard.step_number = 4;
    let mut good = standard;
    good.material_condition = MaterialCondition::Good;

    let mut policy = RandomPolicy::new(42);
    c.bench_function("random_choose_standard", |b| {
        b.iter(|| black_box(policy.choose(black_box(&standard))))
    });
    c.bench_function("random_choose_good", |b| {
        b.iter(|| black_box(policy.choose(black_box(&good))))
    });
}

criterion_group!(benches, bench_choose);
criterion_main!(benches);
