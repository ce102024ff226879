//! Error types for staffing optimization.
//!
//! Every failure path of a run maps to exactly one variant, so the
//! presentation layer can tell a bad input from an infeasible plan from a
//! broken solver.

use thiserror::Error;

use crate::milp::SolveStatus;

/// Errors that can occur while building, solving, or interpreting a
/// staffing model.
#[derive(Debug, Error)]
pub enum StaffingError {
    /// Malformed or out-of-range input, rejected before model construction.
    #[error("invalid parameter `{field}`: {message}")]
    InvalidParameter { field: String, message: String },

    /// Some process with positive volume has no compatible worker.
    #[error("unsatisfiable demand: no worker is skilled for process(es) {processes:?}")]
    UnsatisfiableDemand { processes: Vec<usize> },

    /// The solver proved the model infeasible or unbounded.
    #[error("no solution: solver reported {status}")]
    NoSolution { status: SolveStatus },

    /// The solver failed or is unavailable.
    #[error("solver error: {0}")]
    Solver(String),

    /// Solver output disagrees with the model: a fractional integral
    /// variable, a violated row, or a plan breaking a staffing rule.
    #[error("inconsistent solution: `{name}` {detail}")]
    InconsistentSolution { name: String, detail: String },

    /// IO error while reading or writing a parameter file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StaffingError {
    /// Creates an `InvalidParameter` error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        StaffingError::InvalidParameter {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether the error stems from the input rather than the solver.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            StaffingError::InvalidParameter { .. } | StaffingError::UnsatisfiableDemand { .. }
        )
    }
}

/// Result alias for staffing operations.
pub type Result<T> = std::result::Result<T, StaffingError>;
