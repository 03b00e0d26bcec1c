use crate::candidate::Candidate;
use crate::config::{ConfigError, GeneticConfig};
use crate::genetic_algorithm::Encoding;
use crate::reporter::{Reporter, SilentReporter};
use crate::selection::roulette_selection;
use rand::Rng;
use rayon::prelude::*;
use tracing::instrument;

/// Best candidate of a finished run.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution<G> {
    pub genes: Vec<G>,
    pub fitness: f64,
    pub generations: usize,
}

/// Generational genetic algorithm with elitism over any [`Encoding`].
///
/// Each generation evaluates the candidates that lack a fitness, ranks the
/// population, carries the elites over unchanged and fills the remaining slots
/// with mutated offspring of roulette-selected parents. The run stops after
/// `config.generations` generations.
#[derive(Debug)]
pub struct GeneticOptimizer<E> {
    encoding: E,
    config: GeneticConfig,
}

impl<E: Encoding> GeneticOptimizer<E> {
    pub fn new(encoding: E, config: GeneticConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        if encoding.genome_len() == 0 {
            return Err(ConfigError::EmptyGenome);
        }

        Ok(Self { encoding, config })
    }

    pub fn encoding(&self) -> &E {
        &self.encoding
    }

    pub fn config(&self) -> &GeneticConfig {
        &self.config
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Candidate<E::Gene>> {
        (0..self.config.population_size)
            .map(|_| self.encoding.random_candidate(rng))
            .collect()
    }

    /// Scores every candidate without a current fitness, then sorts ascending.
    /// The sort is stable, so equally fit candidates keep their relative order.
    pub fn evaluate(&self, mut population: Vec<Candidate<E::Gene>>) -> Vec<Candidate<E::Gene>> {
        population
            .par_iter_mut()
            .for_each(|candidate| candidate.evaluate_with(&self.encoding));

        population.sort_by(|a, b| a.cmp_fitness(b));
        population
    }

    pub fn elitism(&self, ranked: &[Candidate<E::Gene>]) -> Vec<Candidate<E::Gene>> {
        ranked[..self.config.elite_count().min(ranked.len())].to_vec()
    }

    fn mutate<R: Rng + ?Sized>(&self, candidate: &mut Candidate<E::Gene>, rng: &mut R) {
        if self
            .encoding
            .mutate(&mut candidate.genes, self.config.mutation_rate, rng)
        {
            candidate.invalidate();
        }
    }

    /// Builds the generation that follows a ranked, fully evaluated population.
    pub fn next_generation<R: Rng + ?Sized>(
        &self,
        ranked: &[Candidate<E::Gene>],
        rng: &mut R,
    ) -> Vec<Candidate<E::Gene>> {
        let population_size = self.config.population_size;
        let mut next = Vec::with_capacity(population_size);
        next.extend(self.elitism(ranked));

        while next.len() < population_size {
            let parent_1 = roulette_selection(ranked, rng);
            let parent_2 = roulette_selection(ranked, rng);

            let (mut child_1, mut child_2) =
                self.encoding
                    .crossover(parent_1, parent_2, self.config.crossover_rate, rng);
            self.mutate(&mut child_1, rng);
            self.mutate(&mut child_2, rng);

            next.push(child_1);
            if next.len() < population_size {
                next.push(child_2);
            }
        }

        next
    }

    #[instrument(level = "debug", skip_all, fields(encoding = %E::KIND, population_size = self.config.population_size, generations = self.config.generations))]
    pub fn optimize<R, P>(&self, rng: &mut R, reporter: &mut P) -> Solution<E::Gene>
    where
        R: Rng + ?Sized,
        P: Reporter<E::Gene> + ?Sized,
    {
        let mut generation = 0;
        let mut population = self.generate(rng);

        while generation < self.config.generations {
            population = self.evaluate(population);
            reporter.report(generation, &population);

            tracing::debug!(
                generation,
                best_fitness = population[0].fitness.unwrap_or(f64::INFINITY),
                "Generation ranked"
            );

            population = self.next_generation(&population, rng);
            generation += 1;
        }

        population = self.evaluate(population);
        let best = &population[0];
        let fitness = best.fitness.unwrap_or(f64::INFINITY);

        tracing::info!(generations = generation, fitness, "Optimization finished");

        Solution {
            genes: best.genes.clone(),
            fitness,
            generations: generation,
        }
    }

    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Solution<E::Gene> {
        self.optimize(rng, &mut SilentReporter)
    }
}
