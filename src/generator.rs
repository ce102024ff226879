//! Random parameter generation.
//!
//! Produces reproducible staffing instances for demos, benchmarks, and
//! randomized tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

use crate::models::{StaffingParams, DEFAULT_MAX_MINUTES_PER_DAY};

/// Configuration for random instance generation.
///
/// # Examples
///
/// ```
/// use u_staffing::generator::ParameterGenerator;
///
/// let params = ParameterGenerator::default()
///     .with_counts(4, 6)
///     .with_volume_range(5, 20)
///     .with_seed(42)
///     .generate();
/// assert_eq!(params.num_processes, 4);
/// assert_eq!(params.worker_skills.len(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct ParameterGenerator {
    /// Number of processes.
    pub num_processes: usize,
    /// Number of workers.
    pub num_workers: usize,
    /// Inclusive volume range per process.
    pub volume_range: (i64, i64),
    /// Inclusive normative range (minutes per unit).
    pub normative_range: (i64, i64),
    /// Probability that a worker has any given skill.
    pub skill_probability: f64,
    /// Give every process at least one skilled worker.
    pub ensure_coverage: bool,
    /// Daily shift cap written into the instance.
    pub max_minutes_per_day: i64,
    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for ParameterGenerator {
    fn default() -> Self {
        Self {
            num_processes: 3,
            num_workers: 7,
            volume_range: (1, 30),
            normative_range: (1, 20),
            skill_probability: 0.3,
            ensure_coverage: true,
            max_minutes_per_day: DEFAULT_MAX_MINUTES_PER_DAY,
            seed: None,
        }
    }
}

impl ParameterGenerator {
    pub fn with_counts(mut self, num_processes: usize, num_workers: usize) -> Self {
        self.num_processes = num_processes;
        self.num_workers = num_workers;
        self
    }

    pub fn with_volume_range(mut self, min: i64, max: i64) -> Self {
        self.volume_range = (min, max);
        self
    }

    pub fn with_normative_range(mut self, min: i64, max: i64) -> Self {
        self.normative_range = (min, max);
        self
    }

    pub fn with_skill_probability(mut self, p: f64) -> Self {
        self.skill_probability = p;
        self
    }

    pub fn with_coverage(mut self, ensure: bool) -> Self {
        self.ensure_coverage = ensure;
        self
    }

    pub fn with_max_minutes_per_day(mut self, minutes: i64) -> Self {
        self.max_minutes_per_day = minutes;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Generates an instance, seeded from `seed` or from the OS.
    pub fn generate(&self) -> StaffingParams {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.generate_with(&mut rng)
    }

    /// Generates an instance from the given random source.
    pub fn generate_with<R: Rng>(&self, rng: &mut R) -> StaffingParams {
        let sample = |rng: &mut R, (a, b): (i64, i64)| rng.random_range(a.min(b)..=a.max(b));
        let probability = self.skill_probability.clamp(0.0, 1.0);

        let process_volumes: Vec<i64> = (0..self.num_processes)
            .map(|_| sample(rng, self.volume_range))
            .collect();
        let process_normatives: Vec<i64> = (0..self.num_processes)
            .map(|_| sample(rng, self.normative_range))
            .collect();

        let mut worker_skills: Vec<BTreeSet<usize>> = (0..self.num_workers)
            .map(|_| {
                (0..self.num_processes)
                    .filter(|_| rng.random_bool(probability))
                    .collect()
            })
            .collect();

        if self.ensure_coverage && self.num_workers > 0 {
            for p in 0..self.num_processes {
                if !worker_skills.iter().any(|skills| skills.contains(&p)) {
                    let w = rng.random_range(0..self.num_workers);
                    worker_skills[w].insert(p);
                }
            }
        }

        StaffingParams {
            num_processes: self.num_processes,
            process_volumes,
            process_normatives,
            num_workers: self.num_workers,
            worker_skills,
            max_minutes_per_day: self.max_minutes_per_day,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_params;

    #[test]
    fn test_seed_reproducible() {
        let generator = ParameterGenerator::default().with_counts(5, 8).with_seed(7);
        assert_eq!(generator.generate(), generator.generate());
    }

    #[test]
    fn test_ranges_respected() {
        let params = ParameterGenerator::default()
            .with_counts(20, 3)
            .with_volume_range(4, 6)
            .with_normative_range(9, 9)
            .with_seed(1)
            .generate();

        assert!(params.process_volumes.iter().all(|v| (4..=6).contains(v)));
        assert!(params.process_normatives.iter().all(|&n| n == 9));
        assert_eq!(params.num_workers, 3);
    }

    #[test]
    fn test_reversed_range_is_normalized() {
        let params = ParameterGenerator::default()
            .with_volume_range(10, 2)
            .with_seed(3)
            .generate();
        assert!(params.process_volumes.iter().all(|v| (2..=10).contains(v)));
    }

    #[test]
    fn test_coverage_guaranteed() {
        for seed in 0..20 {
            let params = ParameterGenerator::default()
                .with_counts(6, 4)
                .with_skill_probability(0.0)
                .with_seed(seed)
                .generate();
            assert!(validate_params(&params).is_ok(), "seed {seed}");
        }
    }

    #[test]
    fn test_no_coverage_leaves_workers_unskilled() {
        let params = ParameterGenerator::default()
            .with_skill_probability(0.0)
            .with_coverage(false)
            .with_seed(11)
            .generate();
        assert!(params.worker_skills.iter().all(|s| s.is_empty()));
    }
}
