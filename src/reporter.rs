use crate::candidate::Candidate;
use colored::Colorize;
use serde::Serialize;
use std::fmt::Debug;

// This trait represents an observer of the run. It sees every generation once,
// after the population has been evaluated and ranked (best first).
pub trait Reporter<G> {
    fn report(&mut self, generation: usize, population: &[Candidate<G>]);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl<G> Reporter<G> for SilentReporter {
    fn report(&mut self, _generation: usize, _population: &[Candidate<G>]) {}
}

impl<G, A, B> Reporter<G> for (A, B)
where
    A: Reporter<G>,
    B: Reporter<G>,
{
    fn report(&mut self, generation: usize, population: &[Candidate<G>]) {
        self.0.report(generation, population);
        self.1.report(generation, population);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub best: f64,
    pub mean: f64,
    pub worst: f64,
}

impl GenerationStats {
    pub fn from_ranked<G>(generation: usize, population: &[Candidate<G>]) -> Self {
        let fitness: Vec<f64> = population
            .iter()
            .map(|candidate| candidate.fitness.unwrap_or(f64::INFINITY))
            .collect();

        let mean = if fitness.is_empty() {
            f64::NAN
        } else {
            fitness.iter().sum::<f64>() / fitness.len() as f64
        };

        Self {
            generation,
            best: fitness.first().copied().unwrap_or(f64::NAN),
            mean,
            worst: fitness.last().copied().unwrap_or(f64::NAN),
        }
    }
}

/// Keeps per-generation statistics for charts and convergence checks.
#[derive(Debug, Default, Clone)]
pub struct HistoryReporter {
    pub history: Vec<GenerationStats>,
}

impl HistoryReporter {
    pub fn best_fitness(&self) -> Vec<f64> {
        self.history.iter().map(|stats| stats.best).collect()
    }
}

impl<G> Reporter<G> for HistoryReporter {
    fn report(&mut self, generation: usize, population: &[Candidate<G>]) {
        self.history
            .push(GenerationStats::from_ranked(generation, population));
    }
}

/// Prints the best candidate of every `interval`-th generation.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    pub interval: usize,
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self { interval: 1 }
    }
}

impl<G: Debug> Reporter<G> for ConsoleReporter {
    fn report(&mut self, generation: usize, population: &[Candidate<G>]) {
        if self.interval == 0 || generation % self.interval != 0 {
            return;
        }

        if let Some(best) = population.first() {
            println!(
                "{} - Best fitness: {:.8}, genome: {:?}",
                format!("Generation {:3}", generation + 1).bold().red(),
                best.fitness.unwrap_or(f64::INFINITY),
                best.genes,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetic_algorithm::EncodingKind;

    fn ranked(fitness: &[f64]) -> Vec<Candidate<usize>> {
        fitness
            .iter()
            .map(|&f| Candidate {
                genes: vec![0],
                fitness: Some(f),
                kind: EncodingKind::Tour,
            })
            .collect()
    }

    #[test]
    fn it_summarises_a_ranked_population() {
        let stats = GenerationStats::from_ranked(4, &ranked(&[1.0, 2.0, 6.0]));

        assert_eq!(stats.generation, 4);
        assert_eq!(stats.best, 1.0);
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.worst, 6.0);
    }

    #[test]
    fn it_records_history() {
        let mut reporter = HistoryReporter::default();
        reporter.report(0, &ranked(&[3.0, 4.0]));
        reporter.report(1, &ranked(&[2.0, 4.0]));

        assert_eq!(reporter.best_fitness(), vec![3.0, 2.0]);
        assert_eq!(reporter.history[1].generation, 1);
    }
}
