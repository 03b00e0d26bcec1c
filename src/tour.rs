use crate::candidate::Candidate;
use crate::genetic_algorithm::{Encoding, EncodingKind};
use petgraph::algo::min_spanning_tree;
use petgraph::data::FromElements;
use petgraph::graph::UnGraph;
use rand::seq::SliceRandom;
use rand::Rng;

pub type Point = (f64, f64);

pub fn distance(from: Point, to: Point) -> f64 {
    (to.0 - from.0).hypot(to.1 - from.1)
}

/// Length of the closed path visiting `route` in order and returning to its start.
/// Empty and single-city routes have length zero.
pub fn tour_length(distance_matrix: &[Vec<f64>], route: &[usize]) -> f64 {
    if route.len() < 2 {
        return 0.0;
    }

    let open: f64 = route
        .windows(2)
        .map(|pair| distance_matrix[pair[0]][pair[1]])
        .sum();

    open + distance_matrix[route[route.len() - 1]][route[0]]
}

/// True when `genome` holds every index of `0..len` exactly once.
pub fn is_permutation(genome: &[usize], len: usize) -> bool {
    if genome.len() != len {
        return false;
    }

    let mut seen = vec![false; len];
    for &gene in genome {
        if gene >= len || seen[gene] {
            return false;
        }
        seen[gene] = true;
    }

    true
}

/// Builds one order-crossover child: `segment_parent[point_1..point_2]` stays in
/// place, every other slot takes the next unused city of `fill_parent` in scan order.
fn order_child(segment_parent: &[usize], fill_parent: &[usize], point_1: usize, point_2: usize) -> Vec<usize> {
    let len = segment_parent.len();
    let mut child: Vec<Option<usize>> = vec![None; len];
    let mut used = vec![false; len];

    for i in point_1..point_2 {
        child[i] = Some(segment_parent[i]);
        used[segment_parent[i]] = true;
    }

    let mut donors = fill_parent.iter().copied().filter(|&city| !used[city]);
    for slot in child.iter_mut().filter(|slot| slot.is_none()) {
        *slot = donors.next();
    }

    let child: Vec<usize> = child.into_iter().flatten().collect();
    debug_assert_eq!(child.len(), len);
    child
}

/// Order crossover over the segment `[point_1, point_2)`.
///
/// Any `0 <= point_1 <= point_2 <= len` yields two valid permutations, including an
/// empty segment (each child is then a copy of the other parent).
pub fn order_crossover(
    parent_1: &[usize],
    parent_2: &[usize],
    point_1: usize,
    point_2: usize,
) -> (Vec<usize>, Vec<usize>) {
    (
        order_child(parent_1, parent_2, point_1, point_2),
        order_child(parent_2, parent_1, point_1, point_2),
    )
}

/// Weight of the minimum spanning tree over all cities. No closed tour is shorter.
pub fn mst_lower_bound(cities: &[Point]) -> f64 {
    let n = cities.len();
    if n < 2 {
        return 0.0;
    }

    let mut graph = UnGraph::<(), f64>::with_capacity(n, n * (n - 1) / 2);
    let nodes: Vec<_> = (0..n).map(|_| graph.add_node(())).collect();

    for i in 0..n {
        for j in (i + 1)..n {
            graph.add_edge(nodes[i], nodes[j], distance(cities[i], cities[j]));
        }
    }

    let tree = UnGraph::<(), f64>::from_elements(min_spanning_tree(&graph));
    tree.edge_weights().sum()
}

/// A route through a fixed set of cities, encoded as a permutation of their indices.
#[derive(Debug, Clone)]
pub struct TourEncoding {
    cities: Vec<Point>,
    distance_matrix: Vec<Vec<f64>>,
}

impl TourEncoding {
    pub fn new(cities: Vec<Point>) -> Self {
        let distance_matrix = cities
            .iter()
            .map(|&from| cities.iter().map(|&to| distance(from, to)).collect())
            .collect();

        Self {
            cities,
            distance_matrix,
        }
    }

    pub fn cities(&self) -> &[Point] {
        &self.cities
    }

    pub fn distance_matrix(&self) -> &[Vec<f64>] {
        &self.distance_matrix
    }
}

impl Encoding for TourEncoding {
    type Gene = usize;

    const KIND: EncodingKind = EncodingKind::Tour;

    fn genome_len(&self) -> usize {
        self.cities.len()
    }

    fn random_genome<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<usize> {
        let mut route: Vec<usize> = (0..self.cities.len()).collect();
        route.shuffle(rng);
        route
    }

    fn evaluate(&self, genome: &[usize]) -> f64 {
        tour_length(&self.distance_matrix, genome)
    }

    /// Order crossover between two randomly drawn cut indices. Every pair of
    /// parents is recombined; `crossover_rate` only applies to schedules.
    fn crossover<R: Rng + ?Sized>(
        &self,
        parent_1: &Candidate<usize>,
        parent_2: &Candidate<usize>,
        _crossover_rate: f64,
        rng: &mut R,
    ) -> (Candidate<usize>, Candidate<usize>) {
        let len = parent_1.genes.len();
        if len == 0 {
            return (parent_1.clone(), parent_2.clone());
        }

        let cut_a = rng.gen_range(0..len);
        let cut_b = rng.gen_range(0..len);
        let (point_1, point_2) = (cut_a.min(cut_b), cut_a.max(cut_b));

        let (genes_1, genes_2) = order_crossover(&parent_1.genes, &parent_2.genes, point_1, point_2);
        debug_assert!(is_permutation(&genes_1, len) && is_permutation(&genes_2, len));

        (
            Candidate::new(genes_1, Self::KIND),
            Candidate::new(genes_2, Self::KIND),
        )
    }

    /// Swaps two random positions with probability `mutation_rate`.
    fn mutate<R: Rng + ?Sized>(&self, genome: &mut [usize], mutation_rate: f64, rng: &mut R) -> bool {
        if genome.is_empty() || !rng.gen_bool(mutation_rate) {
            return false;
        }

        let i = rng.gen_range(0..genome.len());
        let j = rng.gen_range(0..genome.len());
        genome.swap(i, j);

        i != j
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo_data::reference_cities;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn square() -> TourEncoding {
        TourEncoding::new(vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)])
    }

    #[test]
    fn it_measures_closed_tours() {
        let encoding = square();

        assert!((encoding.evaluate(&[0, 1, 2, 3]) - 4.0).abs() < 1e-12);
        assert!((encoding.evaluate(&[0, 2, 1, 3]) - (2.0 + 2.0 * 2f64.sqrt())).abs() < 1e-12);
    }

    #[test]
    fn it_handles_degenerate_tours() {
        let encoding = TourEncoding::new(vec![(3.0, 4.0)]);

        assert_eq!(encoding.evaluate(&[]), 0.0);
        assert_eq!(encoding.evaluate(&[0]), 0.0);
        assert!((tour_length(square().distance_matrix(), &[0, 2]) - 2.0 * 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn it_ignores_rotation_of_the_starting_city() {
        let encoding = TourEncoding::new(reference_cities());
        let route = vec![3, 0, 5, 1, 4, 2];
        let length = encoding.evaluate(&route);

        for shift in 1..route.len() {
            let mut rotated = route.clone();
            rotated.rotate_left(shift);
            assert!((encoding.evaluate(&rotated) - length).abs() < 1e-9);
        }
    }

    #[test]
    fn it_generates_permutations() {
        let encoding = TourEncoding::new(reference_cities());
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let candidate = encoding.random_candidate(&mut rng);
            assert!(is_permutation(&candidate.genes, 6));
            assert_eq!(candidate.kind, EncodingKind::Tour);
            assert!(candidate.fitness.is_none());
        }
    }

    #[test]
    fn it_performs_order_crossover() {
        let parent_1 = [0, 1, 2, 3, 4, 5];
        let parent_2 = [5, 4, 3, 2, 1, 0];

        let (child_1, child_2) = order_crossover(&parent_1, &parent_2, 2, 4);
        assert_eq!(child_1, vec![5, 4, 2, 3, 1, 0]);
        assert_eq!(child_2, vec![0, 1, 3, 2, 4, 5]);
    }

    #[test]
    fn it_handles_order_crossover_boundaries() {
        let parent_1 = [2, 0, 4, 1, 5, 3];
        let parent_2 = [5, 3, 1, 0, 2, 4];

        for (point_1, point_2) in [(0, 0), (3, 3), (6, 6), (0, 6), (0, 3), (3, 6), (5, 6)] {
            let (child_1, child_2) = order_crossover(&parent_1, &parent_2, point_1, point_2);
            assert!(is_permutation(&child_1, 6), "{point_1}..{point_2}: {child_1:?}");
            assert!(is_permutation(&child_2, 6), "{point_1}..{point_2}: {child_2:?}");
            assert_eq!(child_1[point_1..point_2], parent_1[point_1..point_2]);
            assert_eq!(child_2[point_1..point_2], parent_2[point_1..point_2]);
        }

        let (child_1, child_2) = order_crossover(&parent_1, &parent_2, 4, 4);
        assert_eq!(child_1, parent_2.to_vec());
        assert_eq!(child_2, parent_1.to_vec());

        let (child_1, child_2) = order_crossover(&parent_1, &parent_2, 0, 6);
        assert_eq!(child_1, parent_1.to_vec());
        assert_eq!(child_2, parent_2.to_vec());
    }

    #[test]
    fn it_preserves_permutations_through_operators() {
        let encoding = TourEncoding::new(reference_cities());
        let mut rng = StdRng::seed_from_u64(1234);

        for _ in 0..500 {
            let parent_1 = encoding.random_candidate(&mut rng);
            let parent_2 = encoding.random_candidate(&mut rng);
            let (mut child_1, mut child_2) = encoding.crossover(&parent_1, &parent_2, 1.0, &mut rng);

            encoding.mutate(&mut child_1.genes, 0.5, &mut rng);
            encoding.mutate(&mut child_2.genes, 0.5, &mut rng);

            assert!(is_permutation(&child_1.genes, 6));
            assert!(is_permutation(&child_2.genes, 6));
        }
    }

    #[test]
    fn it_swaps_at_most_two_positions() {
        let encoding = TourEncoding::new(reference_cities());
        let mut rng = StdRng::seed_from_u64(8);

        for _ in 0..100 {
            let mut genome = encoding.random_genome(&mut rng);
            let before = genome.clone();
            let changed = encoding.mutate(&mut genome, 1.0, &mut rng);

            let moved = genome.iter().zip(before.iter()).filter(|(a, b)| a != b).count();
            assert!(moved == 0 || moved == 2);
            assert_eq!(changed, moved == 2);
        }

        let mut genome = vec![0, 1, 2, 3, 4, 5];
        assert!(!encoding.mutate(&mut genome, 0.0, &mut rng));
        assert_eq!(genome, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn it_rejects_non_permutations() {
        assert!(is_permutation(&[2, 0, 1], 3));
        assert!(!is_permutation(&[2, 0, 0], 3));
        assert!(!is_permutation(&[2, 0, 3], 3));
        assert!(!is_permutation(&[0, 1], 3));
    }

    #[test]
    fn it_bounds_tours_from_below() {
        let encoding = square();
        assert!((mst_lower_bound(encoding.cities()) - 3.0).abs() < 1e-12);
        assert_eq!(mst_lower_bound(&[(1.0, 1.0)]), 0.0);

        let cities = reference_cities();
        let encoding = TourEncoding::new(cities.clone());
        assert!(mst_lower_bound(&cities) <= encoding.evaluate(&[0, 1, 2, 3, 4, 5]));
    }
}
