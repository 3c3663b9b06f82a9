use rand::Rng;

use super::{ExperimentRecord, ExperimentRunner};

/// Simulates experiments with bounded random outcomes.
///
/// Holds no state; every call draws from the thread-local generator, so
/// repeated calls are independent.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomExperimentRunner;

impl RandomExperimentRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ExperimentRunner for RandomExperimentRunner {
    fn run_experiment(&self, hypothesis: &str) -> ExperimentRecord {
        tracing::debug!(hypothesis, "Running experiment");

        let mut rng = rand::rng();
        let sample_size = rng.random_range(50..=200);
        let success_rate = round_to_hundredths(rng.random_range(0.65..=0.95));

        ExperimentRecord {
            hypothesis: hypothesis.to_string(),
            sample_size,
            success_rate,
            confidence: "95%".to_string(),
            status: "Success".to_string(),
        }
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcomes_stay_in_range() {
        let runner = RandomExperimentRunner::new();
        for _ in 0..1000 {
            let record = runner.run_experiment("Testing hypothesis 1");
            assert!((50..=200).contains(&record.sample_size));
            assert!((0.65..=0.95).contains(&record.success_rate));
            let scaled = record.success_rate * 100.0;
            assert!((scaled - scaled.round()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_record_echoes_hypothesis() {
        let record = RandomExperimentRunner::new().run_experiment("H");
        assert_eq!(record.hypothesis, "H");
        assert_eq!(record.confidence, "95%");
        assert_eq!(record.status, "Success");
    }

    #[test]
    fn test_repeated_calls_vary() {
        let runner = RandomExperimentRunner::new();
        let draws: std::collections::HashSet<u32> = (0..100)
            .map(|_| runner.run_experiment("same").sample_size)
            .collect();
        assert!(draws.len() > 1);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_to_hundredths(0.654), 0.65);
        assert_eq!(round_to_hundredths(0.9449), 0.94);
        assert_eq!(round_to_hundredths(0.95), 0.95);
    }
}
