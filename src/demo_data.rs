use crate::schedule::{FlowMetrics, SignalTiming, TrafficSimulator};
use crate::tour::Point;
use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError};

/// The six-city instance the routing problem was first posed on.
pub fn reference_cities() -> Vec<Point> {
    vec![
        (0.0, 0.0),
        (1.0, 3.0),
        (4.0, 3.0),
        (6.0, 1.0),
        (2.0, 7.0),
        (8.0, 8.0),
    ]
}

/// Scatters `cities` points around `clusters` random centres on a 100 x 100 map.
/// Each point is offset from its centre by a normal draw with deviation `spread`.
pub fn clustered_cities<R: Rng + ?Sized>(
    cities: usize,
    clusters: usize,
    spread: f64,
    rng: &mut R,
) -> Result<Vec<Point>, NormalError> {
    let offset = Normal::new(0.0, spread)?;
    let centres: Vec<Point> = (0..clusters.max(1))
        .map(|_| (rng.gen_range(0.0..=100.0), rng.gen_range(0.0..=100.0)))
        .collect();

    Ok((0..cities)
        .map(|i| {
            let (x, y) = centres[i % centres.len()];
            (x + offset.sample(rng), y + offset.sample(rng))
        })
        .collect())
}

/// Fixed-demand approach to a signalised intersection.
///
/// Vehicles arrive at `arrival_rate` per second and discharge at `saturation_flow`
/// per second of green. Waiting time follows the uniform-delay term of Webster's
/// formula; congestion is the degree of saturation, squared and amplified once
/// demand exceeds capacity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DemoTrafficSimulator {
    pub arrival_rate: f64,
    pub saturation_flow: f64,
}

impl Default for DemoTrafficSimulator {
    fn default() -> Self {
        Self {
            arrival_rate: 0.25,
            saturation_flow: 0.5,
        }
    }
}

impl TrafficSimulator for DemoTrafficSimulator {
    fn simulate_traffic_flow(&self, timing: &SignalTiming) -> FlowMetrics {
        let cycle = timing.cycle_length().max(1) as f64;
        let green_share = timing.green as f64 / cycle;
        let capacity = self.saturation_flow * green_share;

        let saturation = if capacity > 0.0 {
            self.arrival_rate / capacity
        } else {
            f64::INFINITY
        };

        let congestion = if saturation < 1.0 {
            saturation * saturation
        } else {
            10.0 * saturation
        };

        let bounded = saturation.min(0.99);
        let waiting_time =
            cycle * (1.0 - green_share).powi(2) / (2.0 * (1.0 - bounded * green_share));

        let throughput = if self.arrival_rate > 0.0 {
            (capacity / self.arrival_rate).min(1.0)
        } else {
            1.0
        };
        let flow_efficiency = throughput * timing.green as f64 / (timing.green + timing.yellow).max(1) as f64;

        FlowMetrics {
            congestion,
            waiting_time,
            flow_efficiency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn it_clusters_requested_number_of_cities() {
        let mut rng = StdRng::seed_from_u64(42);
        let cities = clustered_cities(40, 4, 3.0, &mut rng).unwrap();

        assert_eq!(cities.len(), 40);
        assert!(cities.iter().all(|(x, y)| x.is_finite() && y.is_finite()));
    }

    #[test]
    fn it_rejects_invalid_spread() {
        let mut rng = StdRng::seed_from_u64(42);

        assert!(clustered_cities(5, 2, f64::NAN, &mut rng).is_err());
    }

    #[test]
    fn it_simulates_deterministically() {
        let simulator = DemoTrafficSimulator::default();
        let timing = SignalTiming::new(60, 10, 40);

        assert_eq!(
            simulator.simulate_traffic_flow(&timing),
            simulator.simulate_traffic_flow(&timing)
        );
    }

    #[test]
    fn it_prefers_longer_green_under_load() {
        let simulator = DemoTrafficSimulator::default();
        let short_green = simulator.simulate_traffic_flow(&SignalTiming::new(30, 15, 120));
        let long_green = simulator.simulate_traffic_flow(&SignalTiming::new(120, 5, 30));

        assert!(long_green.congestion < short_green.congestion);
        assert!(long_green.waiting_time < short_green.waiting_time);
        assert!(long_green.flow_efficiency > short_green.flow_efficiency);
    }
}
