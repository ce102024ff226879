//! Staffing parameter record.
//!
//! The flat input of one optimization run. The same record is the
//! persisted parameter format: a JSON object with exactly these keys.
//!
//! ```json
//! {
//!   "num_processes": 3,
//!   "process_volumes": [10, 20, 30],
//!   "process_normatives": [10, 20, 15],
//!   "num_workers": 7,
//!   "worker_skills": [[0], [1], [2], [], [], [], []],
//!   "max_minutes_per_day": 480
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use super::{Process, Worker};
use crate::error::Result;

/// Default cap on a worker's daily shift length (minutes).
pub const DEFAULT_MAX_MINUTES_PER_DAY: i64 = 480;

fn default_max_minutes_per_day() -> i64 {
    DEFAULT_MAX_MINUTES_PER_DAY
}

/// Input parameters for one staffing run.
///
/// Values are stored as given; nothing is checked until
/// [`validate_params`](crate::validation::validate_params) runs (the
/// model builder does this before building).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaffingParams {
    /// Number of processes `P`.
    pub num_processes: usize,
    /// Units required per process (length `P`).
    pub process_volumes: Vec<i64>,
    /// Minutes per unit per process (length `P`).
    pub process_normatives: Vec<i64>,
    /// Number of workers `W`.
    pub num_workers: usize,
    /// Skill set per worker (length `W`), as process indices.
    pub worker_skills: Vec<BTreeSet<usize>>,
    /// Longest allowed shift (minutes).
    #[serde(default = "default_max_minutes_per_day")]
    pub max_minutes_per_day: i64,
}

impl StaffingParams {
    /// Assembles a parameter record from domain entities.
    ///
    /// Entities are placed by position; their `index` fields are not
    /// consulted.
    pub fn new(processes: &[Process], workers: &[Worker]) -> Self {
        Self {
            num_processes: processes.len(),
            process_volumes: processes.iter().map(|p| p.volume).collect(),
            process_normatives: processes.iter().map(|p| p.normative).collect(),
            num_workers: workers.len(),
            worker_skills: workers.iter().map(|w| w.skills.clone()).collect(),
            max_minutes_per_day: DEFAULT_MAX_MINUTES_PER_DAY,
        }
    }

    /// Sets the daily shift cap.
    pub fn with_max_minutes_per_day(mut self, minutes: i64) -> Self {
        self.max_minutes_per_day = minutes;
        self
    }

    /// Three processes and seven workers, three of them with a single
    /// skill each and four with none.
    pub fn reference() -> Self {
        let processes = [
            Process::new(0, 10, 10),
            Process::new(1, 20, 20),
            Process::new(2, 30, 15),
        ];
        let mut workers: Vec<Worker> = (0..3).map(|i| Worker::new(i).with_skill(i)).collect();
        workers.extend((3..7).map(Worker::new));
        Self::new(&processes, &workers)
    }

    /// Process entities, in index order.
    pub fn processes(&self) -> Vec<Process> {
        self.process_volumes
            .iter()
            .zip(&self.process_normatives)
            .enumerate()
            .map(|(i, (&volume, &normative))| Process::new(i, volume, normative))
            .collect()
    }

    /// Worker entities, in index order.
    pub fn workers(&self) -> Vec<Worker> {
        self.worker_skills
            .iter()
            .enumerate()
            .map(|(i, skills)| Worker::new(i).with_skills(skills.iter().copied()))
            .collect()
    }

    /// Whether worker `w` may perform process `p`.
    pub fn compatible(&self, worker: usize, process: usize) -> bool {
        self.worker_skills
            .get(worker)
            .is_some_and(|skills| skills.contains(&process))
    }

    /// Workers skilled for process `p`.
    pub fn workers_for_process(&self, process: usize) -> Vec<usize> {
        (0..self.worker_skills.len())
            .filter(|&w| self.compatible(w, process))
            .collect()
    }

    /// Sum of `volume * normative` over all processes.
    pub fn total_required_minutes(&self) -> i64 {
        self.processes().iter().map(Process::required_minutes).sum()
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the record to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Reads a record from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StaffingError;

    #[test]
    fn test_reference_params() {
        let params = StaffingParams::reference();
        assert_eq!(params.num_processes, 3);
        assert_eq!(params.num_workers, 7);
        assert_eq!(params.process_volumes, vec![10, 20, 30]);
        assert_eq!(params.process_normatives, vec![10, 20, 15]);
        assert_eq!(params.max_minutes_per_day, 480);
        assert_eq!(params.total_required_minutes(), 100 + 400 + 450);
        assert!(params.compatible(1, 1));
        assert!(!params.compatible(1, 0));
        assert!(!params.compatible(6, 2));
        assert!(!params.compatible(99, 0));
        assert_eq!(params.workers_for_process(2), vec![2]);
    }

    #[test]
    fn test_entities_roundtrip() {
        let params = StaffingParams::reference();
        let rebuilt = StaffingParams::new(&params.processes(), &params.workers());
        assert_eq!(rebuilt, params);
    }

    #[test]
    fn test_json_default_max_minutes() {
        let json = r#"{
            "num_processes": 1,
            "process_volumes": [5],
            "process_normatives": [100],
            "num_workers": 1,
            "worker_skills": [[0]]
        }"#;
        let params = StaffingParams::from_json(json).unwrap();
        assert_eq!(params.max_minutes_per_day, DEFAULT_MAX_MINUTES_PER_DAY);
        assert!(params.compatible(0, 0));
    }

    #[test]
    fn test_json_rejects_unknown_keys() {
        let json = r#"{
            "num_processes": 1,
            "process_volumes": [5],
            "process_normatives": [100],
            "num_workers": 1,
            "worker_skills": [[0]],
            "shift_start": 8
        }"#;
        let err = StaffingParams::from_json(json).unwrap_err();
        assert!(matches!(err, StaffingError::Json(_)));
    }

    #[test]
    fn test_save_and_load() {
        let params = StaffingParams::reference().with_max_minutes_per_day(420);
        let path = std::env::temp_dir().join(format!(
            "u-staffing-params-{}.json",
            std::process::id()
        ));

        params.save(&path).unwrap();
        let loaded = StaffingParams::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, params);
    }

    #[test]
    fn test_load_missing_file() {
        let err = StaffingParams::load("/nonexistent/u-staffing/params.json").unwrap_err();
        assert!(matches!(err, StaffingError::Io(_)));
    }
}
