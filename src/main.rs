use chrono::Local;
use csv::Writer;
use genetic_signals::demo_data::{clustered_cities, reference_cities, DemoTrafficSimulator};
use genetic_signals::tour::mst_lower_bound;
use genetic_signals::visualization::{visualize_history, visualize_schedule, visualize_tour};
use genetic_signals::{
    ConsoleReporter, Elitism, Encoding, EncodingKind, GeneticConfig, GeneticOptimizer,
    HistoryReporter, ScheduleEncoding, TourEncoding,
};
use itertools::{iproduct, Itertools};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::error::Error;
use std::fs::OpenOptions;
use std::hash::{Hash, Hasher};
use std::iter::Sum;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub struct TestSchema {
    encodings: Vec<EncodingKind>,
    genome_len: Vec<usize>,
    population_size: Vec<usize>,
    generations: Vec<usize>,
    mutation_rate: Vec<f64>,
    crossover_rate: Vec<f64>,
    elitism_percentage: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct FinalTestResult {
    pub scenario: u64,
    pub repetitions: u64,
    pub encoding: EncodingKind,
    pub genome_len: usize,
    pub population_size: usize,
    pub generations: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub elitism_size: usize,
    pub lower_bound: Option<f64>,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub mean_runtime: f64,
    pub var_fitness: f64,
    pub var_runtime: f64,
}

#[derive(Debug)]
pub struct RunResult {
    runtime: f64,
    fitness: f64,
}

const REPETITIONS: u64 = 5;

fn mean_variance<T: Copy + Into<f64> + Sum<T>>(values: &[T]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }

    let n = values.len() as f64;
    let sum: f64 = values.iter().map(|&v| v.into()).sum();
    let mean = sum / n;

    let variance = values
        .iter()
        .map(|&v| {
            let diff = v.into() - mean;
            diff * diff
        })
        .sum::<f64>()
        / n;

    (mean, variance)
}

fn hash_combination(
    encoding: &EncodingKind,
    genome_len: &usize,
    population_size: &usize,
    generations: &usize,
    mutation_rate: &f64,
    crossover_rate: &f64,
    elitism_p: &f64,
) -> u64 {
    let mut hasher = DefaultHasher::new();

    encoding.hash(&mut hasher);
    genome_len.hash(&mut hasher);
    population_size.hash(&mut hasher);
    generations.hash(&mut hasher);
    mutation_rate.to_bits().hash(&mut hasher);
    crossover_rate.to_bits().hash(&mut hasher);
    elitism_p.to_bits().hash(&mut hasher);

    hasher.finish()
}

fn benchmark_run<E: Encoding>(optimizer: &GeneticOptimizer<E>, seed: u64) -> RunResult {
    let mut rng = StdRng::seed_from_u64(seed);

    let start = Instant::now();
    let solution = optimizer.run(&mut rng);
    let runtime = start.elapsed().as_secs_f64();

    RunResult {
        runtime,
        fitness: solution.fitness,
    }
}

fn repeat_runs<E: Encoding>(optimizer: &GeneticOptimizer<E>, scenario: u64) -> Vec<RunResult> {
    (0..REPETITIONS)
        .map(|i| {
            println!("-- Repetition {} of {} is being run...", i, scenario);
            benchmark_run(optimizer, scenario.wrapping_add(i))
        })
        .collect()
}

fn collect_benchmarks(schemas: &[TestSchema], file_path: &str) -> Result<(), Box<dyn Error>> {
    let mut visited: HashSet<u64> = HashSet::new();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(file_path)?;
    let mut writer = Writer::from_writer(file);

    for schema in schemas {
        for (
            &encoding,
            &genome_len,
            &population_size,
            &generations,
            &mutation_rate,
            &crossover_rate,
            &elitism_p,
        ) in iproduct!(
            &schema.encodings,
            &schema.genome_len,
            &schema.population_size,
            &schema.generations,
            &schema.mutation_rate,
            &schema.crossover_rate,
            &schema.elitism_percentage
        ) {
            let hash = hash_combination(
                &encoding,
                &genome_len,
                &population_size,
                &generations,
                &mutation_rate,
                &crossover_rate,
                &elitism_p,
            );

            if !visited.insert(hash) {
                println!("Scenario {} already evaluated, skipping...", hash);
                continue;
            }
            println!("Scenario {} is being run...", hash);

            let config = GeneticConfig {
                population_size,
                generations,
                mutation_rate,
                crossover_rate,
                elitism: Elitism::Fraction(elitism_p),
            };

            let (runs, lower_bound) = match encoding {
                EncodingKind::Schedule => {
                    let encoding = ScheduleEncoding::new(genome_len, DemoTrafficSimulator::default());
                    let optimizer = GeneticOptimizer::new(encoding, config.clone())?;
                    (repeat_runs(&optimizer, hash), None)
                }
                EncodingKind::Tour => {
                    let mut rng = StdRng::seed_from_u64(hash);
                    let cities = clustered_cities(genome_len, 4, 5.0, &mut rng)?;
                    let lower_bound = mst_lower_bound(&cities);
                    let optimizer = GeneticOptimizer::new(TourEncoding::new(cities), config.clone())?;
                    (repeat_runs(&optimizer, hash), Some(lower_bound))
                }
            };

            let fitness_values: Vec<f64> = runs.iter().map(|r| r.fitness).collect();
            let runtime_values: Vec<f64> = runs.iter().map(|r| r.runtime).collect();

            let (mean_fitness, var_fitness) = mean_variance(&fitness_values);
            let (mean_runtime, var_runtime) = mean_variance(&runtime_values);

            let result = FinalTestResult {
                scenario: hash,
                repetitions: REPETITIONS,
                encoding,
                genome_len,
                population_size,
                generations,
                mutation_rate,
                crossover_rate,
                elitism_size: config.elite_count(),
                lower_bound,
                best_fitness: fitness_values.iter().copied().fold(f64::INFINITY, f64::min),
                mean_fitness,
                mean_runtime,
                var_fitness,
                var_runtime,
            };

            writer.serialize(result)?;
            writer.flush()?;
        }
    }

    Ok(())
}

fn run_reference_problems() -> Result<(), Box<dyn Error>> {
    let mut rng = StdRng::from_entropy();

    let encoding = ScheduleEncoding::new(10, DemoTrafficSimulator::default());
    let optimizer = GeneticOptimizer::new(encoding, GeneticConfig::traffic_signals())?;
    let mut reporters = (ConsoleReporter { interval: 10 }, HistoryReporter::default());
    let solution = optimizer.optimize(&mut rng, &mut reporters);

    println!(
        "Best Traffic Signal Schedule: [{}]",
        solution.genes.iter().join(", ")
    );
    println!("Best Fitness (Congestion and Travel Time): {}", solution.fitness);
    visualize_schedule(&solution.genes, "best_schedule.png")?;
    visualize_history(&reporters.1.history, "schedule_history.png")?;

    let cities = reference_cities();
    let optimizer = GeneticOptimizer::new(
        TourEncoding::new(cities.clone()),
        GeneticConfig::travelling_salesman(),
    )?;
    let mut reporters = (ConsoleReporter { interval: 50 }, HistoryReporter::default());
    let solution = optimizer.optimize(&mut rng, &mut reporters);

    println!("\nBest Route Found: {:?}", solution.genes);
    println!("Total Distance: {}", solution.fitness);
    println!("Spanning Tree Bound: {}", mst_lower_bound(&cities));
    visualize_tour(&cities, &solution.genes, "best_tour.png")?;
    visualize_history(&reporters.1.history, "tour_history.png")?;

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if std::env::args().nth(1).as_deref() != Some("benchmark") {
        return run_reference_problems();
    }

    let schemas = vec![
        TestSchema {
            encodings: vec![EncodingKind::Tour],
            genome_len: vec![20, 50, 100],
            population_size: vec![100, 200],
            generations: vec![500],
            mutation_rate: vec![0.05, 0.1, 0.2],
            crossover_rate: vec![1.0],
            elitism_percentage: vec![0.02, 0.1],
        },
        TestSchema {
            encodings: vec![EncodingKind::Schedule],
            genome_len: vec![10, 50],
            population_size: vec![50, 100],
            generations: vec![100, 200],
            mutation_rate: vec![0.05, 0.1],
            crossover_rate: vec![0.5, 0.7, 0.9],
            elitism_percentage: vec![0.1],
        },
    ];

    let now = Local::now();
    let date_str = now.format("%Y-%m-%d_%H-%M-%S").to_string();
    let filename = format!("benchmark_results_{}.csv", date_str);

    collect_benchmarks(&schemas, &filename)
}
