use crate::genetic_algorithm::{Encoding, EncodingKind};
use std::cmp::Ordering;

/// A single solution: its genome plus the cached cost of that genome.
///
/// `fitness` is `None` until the owning optimizer evaluates the genome, and is
/// reset whenever the genome is replaced or mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate<G> {
    pub genes: Vec<G>,
    pub fitness: Option<f64>,
    pub kind: EncodingKind,
}

impl<G> Candidate<G> {
    pub fn new(genes: Vec<G>, kind: EncodingKind) -> Self {
        Self {
            genes,
            fitness: None,
            kind,
        }
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Drops the cached fitness after the genome was changed in place.
    pub fn invalidate(&mut self) {
        self.fitness = None;
    }

    /// Computes the fitness unless a current value is already cached.
    pub fn evaluate_with<E>(&mut self, encoding: &E)
    where
        E: Encoding<Gene = G>,
    {
        if self.fitness.is_none() {
            self.fitness = Some(encoding.evaluate(&self.genes));
        }
    }

    /// Ascending order on cost. Unevaluated candidates rank last.
    pub fn cmp_fitness(&self, other: &Self) -> Ordering {
        match (self.fitness, other.fitness) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_orders_by_ascending_fitness() {
        let mut a = Candidate::new(vec![0usize], EncodingKind::Tour);
        let mut b = Candidate::new(vec![1usize], EncodingKind::Tour);
        a.fitness = Some(2.0);
        b.fitness = Some(1.0);

        assert_eq!(a.cmp_fitness(&b), Ordering::Greater);
        assert_eq!(b.cmp_fitness(&a), Ordering::Less);
    }

    #[test]
    fn it_ranks_unevaluated_candidates_last() {
        let mut a = Candidate::new(vec![0usize], EncodingKind::Tour);
        let b = Candidate::new(vec![1usize], EncodingKind::Tour);
        a.fitness = Some(f64::INFINITY);

        assert_eq!(a.cmp_fitness(&b), Ordering::Less);
        assert!(!b.is_evaluated());
    }

    #[test]
    fn it_invalidates_cached_fitness() {
        let mut a = Candidate::new(vec![0usize], EncodingKind::Tour);
        a.fitness = Some(1.0);
        a.invalidate();

        assert!(!a.is_evaluated());
    }
}
