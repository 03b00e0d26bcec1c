use crate::candidate::Candidate;
use crate::genetic_algorithm::{Encoding, EncodingKind};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::ops::RangeInclusive;

/// Signal phase durations of one intersection, in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignalTiming {
    pub green: u32,
    pub yellow: u32,
    pub red: u32,
}

impl SignalTiming {
    pub fn new(green: u32, yellow: u32, red: u32) -> Self {
        Self { green, yellow, red }
    }

    pub fn cycle_length(&self) -> u32 {
        self.green + self.yellow + self.red
    }
}

impl fmt::Display for SignalTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.green, self.yellow, self.red)
    }
}

/// Legal duration range of every phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalBounds {
    pub green: RangeInclusive<u32>,
    pub yellow: RangeInclusive<u32>,
    pub red: RangeInclusive<u32>,
}

impl Default for SignalBounds {
    fn default() -> Self {
        Self {
            green: 30..=120,
            yellow: 5..=15,
            red: 30..=120,
        }
    }
}

impl SignalBounds {
    pub fn contains(&self, timing: &SignalTiming) -> bool {
        self.green.contains(&timing.green)
            && self.yellow.contains(&timing.yellow)
            && self.red.contains(&timing.red)
    }

    fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> SignalTiming {
        SignalTiming {
            green: rng.gen_range(self.green.clone()),
            yellow: rng.gen_range(self.yellow.clone()),
            red: rng.gen_range(self.red.clone()),
        }
    }
}

/// Outcome of simulating one intersection under a given timing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowMetrics {
    pub congestion: f64,
    pub waiting_time: f64,
    pub flow_efficiency: f64,
}

// This trait represents the traffic-flow model the schedule is scored against.
// Implementations must be pure: the same timing always yields the same metrics.
pub trait TrafficSimulator: Send + Sync + Debug {
    fn simulate_traffic_flow(&self, timing: &SignalTiming) -> FlowMetrics;
}

/// Reports the same metrics for every timing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConstantSimulator {
    pub metrics: FlowMetrics,
}

impl TrafficSimulator for ConstantSimulator {
    fn simulate_traffic_flow(&self, _timing: &SignalTiming) -> FlowMetrics {
        self.metrics
    }
}

/// Sum of congestion and waiting time over all intersections plus the inverse of
/// the total flow efficiency. A total efficiency of exactly zero costs `f64::INFINITY`.
pub fn schedule_cost<S: TrafficSimulator + ?Sized>(simulator: &S, schedule: &[SignalTiming]) -> f64 {
    let mut total_congestion = 0.0;
    let mut total_waiting_time = 0.0;
    let mut total_flow_efficiency = 0.0;

    for timing in schedule {
        let metrics = simulator.simulate_traffic_flow(timing);
        total_congestion += metrics.congestion;
        total_waiting_time += metrics.waiting_time;
        total_flow_efficiency += metrics.flow_efficiency;
    }

    if total_flow_efficiency == 0.0 {
        return f64::INFINITY;
    }

    total_congestion + total_waiting_time + 1.0 / total_flow_efficiency
}

/// Takes genes before `point` from one parent and the rest from the other.
fn single_point_crossover<G: Clone>(parent_1: &[G], parent_2: &[G], point: usize) -> (Vec<G>, Vec<G>) {
    let mut genes_1 = Vec::with_capacity(parent_1.len());
    let mut genes_2 = Vec::with_capacity(parent_2.len());

    genes_1.extend_from_slice(&parent_1[..point]);
    genes_2.extend_from_slice(&parent_2[..point]);
    genes_1.extend_from_slice(&parent_2[point..]);
    genes_2.extend_from_slice(&parent_1[point..]);

    (genes_1, genes_2)
}

/// One timing triple per intersection, scored by a [`TrafficSimulator`].
#[derive(Debug)]
pub struct ScheduleEncoding<S> {
    intersections: usize,
    bounds: SignalBounds,
    simulator: S,
}

impl<S: TrafficSimulator> ScheduleEncoding<S> {
    pub fn new(intersections: usize, simulator: S) -> Self {
        Self {
            intersections,
            bounds: SignalBounds::default(),
            simulator,
        }
    }

    pub fn bounds(&self) -> &SignalBounds {
        &self.bounds
    }

    pub fn simulator(&self) -> &S {
        &self.simulator
    }
}

impl<S: TrafficSimulator> Encoding for ScheduleEncoding<S> {
    type Gene = SignalTiming;

    const KIND: EncodingKind = EncodingKind::Schedule;

    fn genome_len(&self) -> usize {
        self.intersections
    }

    fn random_genome<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<SignalTiming> {
        (0..self.intersections)
            .map(|_| self.bounds.random(rng))
            .collect()
    }

    fn evaluate(&self, genome: &[SignalTiming]) -> f64 {
        schedule_cost(&self.simulator, genome)
    }

    /// Single-point crossover, applied with probability `crossover_rate`.
    ///
    /// Skipped crossovers, and schedules too short to hold a cut point, hand back
    /// copies of the parents with their fitness intact.
    fn crossover<R: Rng + ?Sized>(
        &self,
        parent_1: &Candidate<SignalTiming>,
        parent_2: &Candidate<SignalTiming>,
        crossover_rate: f64,
        rng: &mut R,
    ) -> (Candidate<SignalTiming>, Candidate<SignalTiming>) {
        let len = parent_1.genes.len();

        if !rng.gen_bool(crossover_rate) || len < 2 {
            return (parent_1.clone(), parent_2.clone());
        }

        let point = rng.gen_range(1..len);
        let (genes_1, genes_2) = single_point_crossover(&parent_1.genes, &parent_2.genes, point);

        (
            Candidate::new(genes_1, Self::KIND),
            Candidate::new(genes_2, Self::KIND),
        )
    }

    /// Each intersection mutates with probability `mutation_rate`: one of its
    /// three phases is redrawn from that phase's bounds.
    fn mutate<R: Rng + ?Sized>(
        &self,
        genome: &mut [SignalTiming],
        mutation_rate: f64,
        rng: &mut R,
    ) -> bool {
        let mut changed = false;

        for timing in genome.iter_mut() {
            if !rng.gen_bool(mutation_rate) {
                continue;
            }

            let before = *timing;
            match rng.gen_range(0..3) {
                0 => timing.green = rng.gen_range(self.bounds.green.clone()),
                1 => timing.yellow = rng.gen_range(self.bounds.yellow.clone()),
                _ => timing.red = rng.gen_range(self.bounds.red.clone()),
            }

            changed |= *timing != before;
        }

        changed
    }
}
