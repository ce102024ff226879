//! Staffing plan (solution) model.
//!
//! A plan is the interpreted solver output: which workers are active, how
//! many units of each process every worker produces, and each worker's
//! shift window. It can be re-checked against its parameters, yielding
//! violations for anything that breaks a model invariant.

use serde::{Deserialize, Serialize};

use super::StaffingParams;

/// A worker's shift window within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    /// Start hour (0..=23).
    pub start_hour: i64,
    /// End hour (0..=24), never before `start_hour`.
    pub end_hour: i64,
    /// `(end_hour - start_hour) * 60`.
    pub work_minutes: i64,
}

impl Shift {
    /// Creates a shift, deriving `work_minutes` from the window.
    pub fn new(start_hour: i64, end_hour: i64) -> Self {
        Self {
            start_hour,
            end_hour,
            work_minutes: (end_hour - start_hour) * 60,
        }
    }

    /// Whether the window lies inside one day and is not reversed.
    pub fn is_well_formed(&self) -> bool {
        (0..=23).contains(&self.start_hour)
            && (0..=24).contains(&self.end_hour)
            && self.end_hour >= self.start_hour
    }
}

/// A complete staffing plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaffingPlan {
    /// Indices of workers with `active = 1`, ascending.
    pub active_workers: Vec<usize>,
    /// `units[w][p]`: units of process `p` assigned to worker `w` (W × P).
    pub units: Vec<Vec<i64>>,
    /// Shift window per worker (length W).
    pub shifts: Vec<Shift>,
    /// Minutes of assigned work per worker (length W).
    pub assigned_minutes: Vec<i64>,
}

/// A broken invariant found in a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity, e.g. `"process 2"` or `"worker 0"`.
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of plan violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// A process's produced units differ from its volume.
    IncompleteProcess,
    /// Assigned minutes exceed the worker's shift.
    CapacityExceeded,
    /// Shift longer than the daily maximum.
    ShiftTooLong,
    /// Shift window outside 0..24 or reversed.
    MalformedShift,
    /// Units assigned to a worker lacking the skill.
    SkillMismatch,
    /// An inactive worker has work or a non-empty shift.
    InactiveWorkerAssigned,
    /// Plan dimensions do not match the parameters.
    DimensionMismatch,
}

impl Violation {
    fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

impl StaffingPlan {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active workers (the objective value).
    pub fn active_count(&self) -> usize {
        self.active_workers.len()
    }

    /// Whether worker `w` is active.
    pub fn is_active(&self, worker: usize) -> bool {
        self.active_workers.binary_search(&worker).is_ok()
    }

    /// Units of process `p` assigned to worker `w` (0 if out of range).
    pub fn units_for(&self, worker: usize, process: usize) -> i64 {
        self.units
            .get(worker)
            .and_then(|row| row.get(process))
            .copied()
            .unwrap_or(0)
    }

    /// Total units of process `p` across all workers.
    pub fn process_total(&self, process: usize) -> i64 {
        self.units
            .iter()
            .filter_map(|row| row.get(process))
            .sum()
    }

    /// Shift of worker `w`.
    pub fn shift(&self, worker: usize) -> Option<&Shift> {
        self.shifts.get(worker)
    }

    /// Fraction of the worker's shift filled with assigned work.
    ///
    /// Returns `None` for an empty shift.
    pub fn utilization(&self, worker: usize) -> Option<f64> {
        let shift = self.shifts.get(worker)?;
        if shift.work_minutes <= 0 {
            return None;
        }
        let assigned = self.assigned_minutes.get(worker).copied().unwrap_or(0);
        Some(assigned as f64 / shift.work_minutes as f64)
    }

    /// Re-checks every model invariant against the parameters.
    ///
    /// An empty result means the plan completes every process exactly,
    /// keeps assigned work inside each shift, respects the daily cap and
    /// skill sets, and only gives work to active workers.
    pub fn violations(&self, params: &StaffingParams) -> Vec<Violation> {
        let mut violations = Vec::new();
        let num_workers = params.num_workers;
        let num_processes = params.num_processes;

        if params.process_volumes.len() != num_processes
            || params.process_normatives.len() != num_processes
            || params.worker_skills.len() != num_workers
        {
            violations.push(Violation::new(
                ViolationType::DimensionMismatch,
                "params",
                format!(
                    "expected {num_processes} volumes and normatives and {num_workers} skill sets, got {}, {} and {}",
                    params.process_volumes.len(),
                    params.process_normatives.len(),
                    params.worker_skills.len()
                ),
            ));
            return violations;
        }

        if self.units.len() != num_workers
            || self.shifts.len() != num_workers
            || self.units.iter().any(|row| row.len() != num_processes)
        {
            violations.push(Violation::new(
                ViolationType::DimensionMismatch,
                "plan",
                format!(
                    "expected {num_workers} workers x {num_processes} processes, got {} rows and {} shifts",
                    self.units.len(),
                    self.shifts.len()
                ),
            ));
            return violations;
        }

        for (p, process) in params.processes().iter().enumerate() {
            let produced: i64 = (0..num_workers)
                .filter(|&w| params.compatible(w, p))
                .map(|w| self.units[w][p])
                .sum();
            if produced != process.volume {
                violations.push(Violation::new(
                    ViolationType::IncompleteProcess,
                    format!("process {p}"),
                    format!("produced {produced} of {} units", process.volume),
                ));
            }
        }

        for w in 0..num_workers {
            let entity = format!("worker {w}");
            let shift = self.shifts[w];
            let mut assigned = 0;

            for (p, &normative) in params.process_normatives.iter().enumerate() {
                let units = self.units[w][p];
                if !params.compatible(w, p) {
                    if units != 0 {
                        violations.push(Violation::new(
                            ViolationType::SkillMismatch,
                            entity.clone(),
                            format!("{units} units of process {p} without the skill"),
                        ));
                    }
                    continue;
                }
                assigned += units * normative;
            }

            if !shift.is_well_formed() {
                violations.push(Violation::new(
                    ViolationType::MalformedShift,
                    entity.clone(),
                    format!("shift {}..{} is not a same-day window", shift.start_hour, shift.end_hour),
                ));
            }
            if shift.work_minutes > params.max_minutes_per_day {
                violations.push(Violation::new(
                    ViolationType::ShiftTooLong,
                    entity.clone(),
                    format!(
                        "{} shift minutes exceed the daily maximum of {}",
                        shift.work_minutes, params.max_minutes_per_day
                    ),
                ));
            }
            if assigned > shift.work_minutes {
                violations.push(Violation::new(
                    ViolationType::CapacityExceeded,
                    entity.clone(),
                    format!(
                        "{assigned} assigned minutes exceed the {}-minute shift",
                        shift.work_minutes
                    ),
                ));
            }
            let total_units: i64 = self.units[w].iter().sum();
            if !self.is_active(w) && (total_units > 0 || shift.work_minutes > 0) {
                violations.push(Violation::new(
                    ViolationType::InactiveWorkerAssigned,
                    entity,
                    format!(
                        "inactive but has {total_units} units and a {}-minute shift",
                        shift.work_minutes
                    ),
                ));
            }
        }

        violations
    }
}
