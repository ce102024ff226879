//! Worker model.
//!
//! Workers perform units of processes they are skilled for. Skills are a
//! plain compatibility relation: a worker either may perform a process or
//! may not. There are no proficiency levels and no per-worker cost.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A worker that can be assigned process units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    /// Position in the parameter record.
    pub index: usize,
    /// Indices of processes this worker may perform.
    pub skills: BTreeSet<usize>,
}

impl Worker {
    /// Creates a worker with no skills.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            skills: BTreeSet::new(),
        }
    }

    /// Adds a skill.
    pub fn with_skill(mut self, process: usize) -> Self {
        self.skills.insert(process);
        self
    }

    /// Adds several skills.
    pub fn with_skills(mut self, processes: impl IntoIterator<Item = usize>) -> Self {
        self.skills.extend(processes);
        self
    }

    /// Whether this worker may perform the given process.
    #[inline]
    pub fn has_skill(&self, process: usize) -> bool {
        self.skills.contains(&process)
    }

    /// Compatibility multiplier (1 if skilled, else 0).
    #[inline]
    pub fn compatibility(&self, process: usize) -> f64 {
        if self.has_skill(process) {
            1.0
        } else {
            0.0
        }
    }

    /// Whether this worker can perform nothing at all.
    pub fn is_unskilled(&self) -> bool {
        self.skills.is_empty()
    }

    /// Binary compatibility vector of length `num_processes`.
    pub fn skill_vector(&self, num_processes: usize) -> Vec<bool> {
        (0..num_processes).map(|p| self.has_skill(p)).collect()
    }
}
