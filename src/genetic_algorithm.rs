use crate::candidate::Candidate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Tag carried by every candidate so that a genome can be told apart from
/// genomes of the other problem family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncodingKind {
    Schedule,
    Tour,
}

impl fmt::Display for EncodingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingKind::Schedule => write!(f, "schedule"),
            EncodingKind::Tour => write!(f, "tour"),
        }
    }
}

// This trait represents the representation of a solution to the problem
// we're solving, together with the operators that know how to keep that
// representation valid. The optimizer only ever talks to a problem through it.
pub trait Encoding: Send + Sync + Debug {
    type Gene: Clone + Send + Sync + Debug + PartialEq;

    const KIND: EncodingKind;

    /// Number of genes in every genome of this encoding.
    fn genome_len(&self) -> usize;

    /// Draws a structurally valid random genome.
    fn random_genome<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Self::Gene>;

    /// Scalar cost of a genome, lower is better.
    fn evaluate(&self, genome: &[Self::Gene]) -> f64;

    /// Recombines two parents into two children.
    fn crossover<R: Rng + ?Sized>(
        &self,
        parent_1: &Candidate<Self::Gene>,
        parent_2: &Candidate<Self::Gene>,
        crossover_rate: f64,
        rng: &mut R,
    ) -> (Candidate<Self::Gene>, Candidate<Self::Gene>);

    /// Perturbs a genome in place. Returns `true` when the genome changed.
    fn mutate<R: Rng + ?Sized>(
        &self,
        genome: &mut [Self::Gene],
        mutation_rate: f64,
        rng: &mut R,
    ) -> bool;

    fn random_candidate<R: Rng + ?Sized>(&self, rng: &mut R) -> Candidate<Self::Gene> {
        Candidate::new(self.random_genome(rng), Self::KIND)
    }
}
