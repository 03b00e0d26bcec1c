use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use genetic_signals::demo_data::{clustered_cities, DemoTrafficSimulator};
use genetic_signals::{GeneticConfig, GeneticOptimizer, ScheduleEncoding, TourEncoding};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn tour_generation(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let cities = clustered_cities(100, 4, 5.0, &mut rng).unwrap();
    let optimizer =
        GeneticOptimizer::new(TourEncoding::new(cities), GeneticConfig::travelling_salesman()).unwrap();
    let ranked = optimizer.evaluate(optimizer.generate(&mut rng));

    c.bench_function("tour next_generation (100 cities)", |b| {
        b.iter_batched(
            || StdRng::seed_from_u64(7),
            |mut rng| optimizer.evaluate(optimizer.next_generation(black_box(&ranked), &mut rng)),
            BatchSize::SmallInput,
        )
    });
}

fn schedule_generation(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let optimizer = GeneticOptimizer::new(
        ScheduleEncoding::new(50, DemoTrafficSimulator::default()),
        GeneticConfig::traffic_signals(),
    )
    .unwrap();
    let ranked = optimizer.evaluate(optimizer.generate(&mut rng));

    c.bench_function("schedule next_generation (50 intersections)", |b| {
        b.iter_batched(
            || StdRng::seed_from_u64(7),
            |mut rng| optimizer.evaluate(optimizer.next_generation(black_box(&ranked), &mut rng)),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, tour_generation, schedule_generation);
criterion_main!(benches);
