//! Fitness-proportionate parent selection for cost-minimising populations.
//!
//! Every candidate is weighted by the inverse of its cost, so cheaper candidates
//! occupy a larger slice of the wheel. Two cases fall outside that rule:
//!
//! - a cost of zero (or below) would need an infinite weight, so such candidates
//!   win outright and are drawn uniformly among themselves;
//! - an infinite, NaN or missing cost weighs nothing.
//!
//! When no candidate carries any weight the draw is uniform over the population.

use crate::candidate::Candidate;
use rand::seq::SliceRandom;
use rand::Rng;

fn inverse_weight(fitness: Option<f64>) -> f64 {
    match fitness {
        Some(fitness) if fitness.is_finite() && fitness > 0.0 => 1.0 / fitness,
        _ => 0.0,
    }
}

/// Walks the wheel in population order and returns the index of the first
/// candidate whose cumulative weight exceeds `spin`.
fn spin_roulette(weights: &[f64], spin: f64) -> usize {
    let mut cumulative = 0.0;

    for (index, weight) in weights.iter().enumerate() {
        cumulative += weight;
        if cumulative > spin {
            return index;
        }
    }

    // Rounding can leave the sum just short of the draw
    weights
        .iter()
        .rposition(|&weight| weight > 0.0)
        .unwrap_or(weights.len() - 1)
}

/// Selects one parent by roulette wheel over inverse fitness.
///
/// The population is expected to be ranked and fully evaluated.
///
/// # Panics
///
/// Panics if `population` is empty.
pub fn roulette_selection<'a, G, R>(population: &'a [Candidate<G>], rng: &mut R) -> &'a Candidate<G>
where
    R: Rng + ?Sized,
{
    assert!(!population.is_empty(), "cannot select from an empty population");
    debug_assert!(population.iter().all(Candidate::is_evaluated));

    let free: Vec<usize> = population
        .iter()
        .enumerate()
        .filter(|(_, candidate)| matches!(candidate.fitness, Some(fitness) if fitness <= 0.0))
        .map(|(index, _)| index)
        .collect();

    if let Some(&index) = free.choose(rng) {
        return &population[index];
    }

    let weights: Vec<f64> = population
        .iter()
        .map(|candidate| inverse_weight(candidate.fitness))
        .collect();
    let total: f64 = weights.iter().sum();

    if !total.is_finite() || total <= 0.0 {
        return &population[rng.gen_range(0..population.len())];
    }

    let spin = rng.gen_range(0.0..total);
    &population[spin_roulette(&weights, spin)]
}
