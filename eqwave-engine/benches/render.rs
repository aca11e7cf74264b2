use criterion::{black_box, criterion_group, criterion_main, Criterion};
use eqwave_core::rng::SeededSource;
use eqwave_engine::config::{GenerationConfig, Preset};
use eqwave_engine::Engine;

fn bench_render(c: &mut Criterion) {
    c.bench_function("render_classic_markup", |b| {
        b.iter(|| {
            let mut engine = Engine::new(GenerationConfig::default(), SeededSource::new(black_box(7))).unwrap();
            black_box(engine.render_markup().unwrap())
        })
    });

    let seamless = GenerationConfig { preset: Preset::Hyper, seamless: true, ..GenerationConfig::default() };
    c.bench_function("render_seamless_hyper_scene", |b| {
        b.iter(|| {
            let mut engine = Engine::new(seamless.clone(), SeededSource::new(black_box(7))).unwrap();
            black_box(engine.render().unwrap())
        })
    });
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
