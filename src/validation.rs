//! Input validation for staffing problems.
//!
//! Checks structural integrity of a parameter record before any model is
//! built. Detects:
//! - Empty process or worker sets
//! - Length mismatches between counts and per-item vectors
//! - Negative volumes and normatives
//! - Skills referring to processes that do not exist
//! - A non-positive daily shift cap
//! - Processes with demand but no skilled worker (coverage)
//!
//! Coverage is the one structural infeasibility that can be proven without
//! a solver. Capacity shortfalls are left to the solver.

use crate::error::StaffingError;
use crate::models::StaffingParams;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Offending parameter field, e.g. `process_volumes[2]`.
    pub field: String,
    /// Process or worker index the error refers to, if any.
    pub index: Option<usize>,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// `num_processes` is zero.
    NoProcesses,
    /// `num_workers` is zero.
    NoWorkers,
    /// A per-item vector's length disagrees with its count.
    LengthMismatch,
    /// A process volume is negative.
    NegativeVolume,
    /// A process normative is negative.
    NegativeNormative,
    /// A worker skill names a process index `>= num_processes`.
    UnknownSkill,
    /// `max_minutes_per_day` is zero or negative.
    NonPositiveMaxMinutes,
    /// A process with positive volume has no skilled worker.
    UncoveredProcess,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: field.into(),
            index: None,
            message: message.into(),
        }
    }

    fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

/// Validates a parameter record.
///
/// Checks:
/// 1. At least one process and one worker
/// 2. Vector lengths match `num_processes` / `num_workers`
/// 3. No negative volumes or normatives
/// 4. Every skill refers to an existing process
/// 5. `max_minutes_per_day > 0`
/// 6. Every process with positive volume has a skilled worker
///
/// Coverage (6) is only checked once 1–4 pass, since it is meaningless on a
/// malformed record.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_params(params: &StaffingParams) -> ValidationResult {
    let mut errors = Vec::new();

    if params.num_processes == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoProcesses,
            "num_processes",
            "at least one process is required",
        ));
    }
    if params.num_workers == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoWorkers,
            "num_workers",
            "at least one worker is required",
        ));
    }

    let lengths = [
        ("process_volumes", params.process_volumes.len(), params.num_processes),
        ("process_normatives", params.process_normatives.len(), params.num_processes),
        ("worker_skills", params.worker_skills.len(), params.num_workers),
    ];
    for (field, actual, expected) in lengths {
        if actual != expected {
            errors.push(ValidationError::new(
                ValidationErrorKind::LengthMismatch,
                field,
                format!("expected {expected} entries, got {actual}"),
            ));
        }
    }

    for (p, &volume) in params.process_volumes.iter().enumerate() {
        if volume < 0 {
            errors.push(
                ValidationError::new(
                    ValidationErrorKind::NegativeVolume,
                    format!("process_volumes[{p}]"),
                    format!("must be non-negative, got {volume}"),
                )
                .at(p),
            );
        }
    }
    for (p, &normative) in params.process_normatives.iter().enumerate() {
        if normative < 0 {
            errors.push(
                ValidationError::new(
                    ValidationErrorKind::NegativeNormative,
                    format!("process_normatives[{p}]"),
                    format!("must be non-negative, got {normative}"),
                )
                .at(p),
            );
        }
    }

    for (w, skills) in params.worker_skills.iter().enumerate() {
        for &p in skills.iter().filter(|&&p| p >= params.num_processes) {
            errors.push(
                ValidationError::new(
                    ValidationErrorKind::UnknownSkill,
                    format!("worker_skills[{w}]"),
                    format!("process {p} does not exist (num_processes = {})", params.num_processes),
                )
                .at(w),
            );
        }
    }

    if params.max_minutes_per_day <= 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NonPositiveMaxMinutes,
            "max_minutes_per_day",
            format!("must be positive, got {}", params.max_minutes_per_day),
        ));
    }

    if errors.is_empty() {
        for p in uncovered_processes(params) {
            errors.push(
                ValidationError::new(
                    ValidationErrorKind::UncoveredProcess,
                    format!("process_volumes[{p}]"),
                    format!(
                        "process {p} needs {} units but no worker has the skill",
                        params.process_volumes[p]
                    ),
                )
                .at(p),
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Processes with positive volume that no worker is skilled for.
pub fn uncovered_processes(params: &StaffingParams) -> Vec<usize> {
    params
        .processes()
        .iter()
        .filter(|p| p.has_demand() && params.workers_for_process(p.index).is_empty())
        .map(|p| p.index)
        .collect()
}

/// Collapses validation errors into the error surfaced to callers.
///
/// Malformed input wins over coverage: the first malformed field becomes
/// `InvalidParameter`. A record that is only uncovered becomes
/// `UnsatisfiableDemand` listing every uncovered process.
pub fn to_staffing_error(errors: &[ValidationError]) -> StaffingError {
    if let Some(first) = errors
        .iter()
        .find(|e| e.kind != ValidationErrorKind::UncoveredProcess)
    {
        return StaffingError::invalid(first.field.clone(), first.message.clone());
    }

    let processes = errors
        .iter()
        .filter(|e| e.kind == ValidationErrorKind::UncoveredProcess)
        .filter_map(|e| e.index)
        .collect();
    StaffingError::UnsatisfiableDemand { processes }
}
