//! Generational genetic algorithm with two problem encodings: per-intersection
//! traffic-signal timings and closed tours through a set of cities.

pub mod candidate;
pub mod config;
pub mod demo_data;
pub mod genetic_algorithm;
pub mod genetic_optimizer;
pub mod reporter;
pub mod schedule;
pub mod selection;
pub mod tour;
pub mod visualization;

pub use candidate::Candidate;
pub use config::{ConfigError, Elitism, GeneticConfig};
pub use genetic_algorithm::{Encoding, EncodingKind};
pub use genetic_optimizer::{GeneticOptimizer, Solution};
pub use reporter::{ConsoleReporter, GenerationStats, HistoryReporter, Reporter, SilentReporter};
pub use schedule::{FlowMetrics, ScheduleEncoding, SignalTiming, TrafficSimulator};
pub use tour::{Point, TourEncoding};
