use serde::{Deserialize, Serialize};

/// How many of the best candidates are carried unchanged into the next generation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Elitism {
    /// Share of the population, rounded up.
    Fraction(f64),
    /// Fixed number of candidates.
    Count(usize),
}

// Products within this distance of an integer count as that integer.
const FRACTION_EPSILON: f64 = 1e-9;

impl Elitism {
    /// Number of elites for the given population size, never more than the population.
    pub fn count(&self, population_size: usize) -> usize {
        let count = match *self {
            Elitism::Fraction(fraction) => {
                let exact = fraction * population_size as f64;
                if (exact - exact.round()).abs() < FRACTION_EPSILON {
                    exact.round() as usize
                } else {
                    exact.ceil() as usize
                }
            }
            Elitism::Count(count) => count,
        };

        count.min(population_size)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("population_size must be at least 1")]
    EmptyPopulation,
    #[error("generations must be at least 1")]
    NoGenerations,
    #[error("mutation_rate must be between 0.0 and 1.0, got: {0}")]
    MutationRateOutOfRange(f64),
    #[error("crossover_rate must be between 0.0 and 1.0, got: {0}")]
    CrossoverRateOutOfRange(f64),
    #[error("elitism fraction must be between 0.0 and 1.0, got: {0}")]
    ElitismFractionOutOfRange(f64),
    #[error("elitism count {count} exceeds population_size {population_size}")]
    ElitismCountTooLarge { count: usize, population_size: usize },
    #[error("genome length must be at least 1")]
    EmptyGenome,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneticConfig {
    pub population_size: usize,
    pub generations: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub elitism: Elitism,
}

impl GeneticConfig {
    /// Parameters of the traffic-signal timing problem.
    pub fn traffic_signals() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            mutation_rate: 0.05,
            crossover_rate: 0.7,
            elitism: Elitism::Fraction(0.1),
        }
    }

    /// Parameters of the closed-tour routing problem. Order crossover is always applied.
    pub fn travelling_salesman() -> Self {
        Self {
            population_size: 100,
            generations: 500,
            mutation_rate: 0.1,
            crossover_rate: 1.0,
            elitism: Elitism::Count(2),
        }
    }

    /// Checks ranges before a run starts.
    ///
    /// Zero elites are accepted. Without at least one elite the best fitness may
    /// get worse from one generation to the next.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }

        if self.generations == 0 {
            return Err(ConfigError::NoGenerations);
        }

        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::MutationRateOutOfRange(self.mutation_rate));
        }

        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(ConfigError::CrossoverRateOutOfRange(self.crossover_rate));
        }

        match self.elitism {
            Elitism::Fraction(fraction) if !(0.0..=1.0).contains(&fraction) => {
                Err(ConfigError::ElitismFractionOutOfRange(fraction))
            }
            Elitism::Count(count) if count > self.population_size => {
                Err(ConfigError::ElitismCountTooLarge {
                    count,
                    population_size: self.population_size,
                })
            }
            _ => Ok(()),
        }
    }

    pub fn elite_count(&self) -> usize {
        self.elitism.count(self.population_size)
    }
}
