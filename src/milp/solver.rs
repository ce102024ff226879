//! MILP solver interface and the `good_lp` backend.

use std::fmt;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use good_lp::{
    constraint, default_solver, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::model::{LinearExpr, MilpModel, Relation, Sense, VarId, VarKind};

/// Status reported by a solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// Proven optimal solution found.
    Optimal,
    /// No feasible solution exists.
    Infeasible,
    /// Objective can be improved without bound.
    Unbounded,
    /// The solver failed, was unavailable, or ran out of time.
    Error,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Raw solver output: one value per model variable plus a status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSolution {
    /// Solver status.
    pub status: SolveStatus,
    /// Variable values indexed by [`VarId`]. Empty unless `Optimal`.
    pub values: Vec<f64>,
    /// Objective function value (if solved).
    pub objective_value: Option<f64>,
    /// Diagnostic message for `Error` outcomes.
    pub message: Option<String>,
    /// Solve time in milliseconds.
    pub solve_time_ms: i64,
}

impl RawSolution {
    /// Creates an empty solution with the given status.
    pub fn empty(status: SolveStatus) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective_value: None,
            message: None,
            solve_time_ms: 0,
        }
    }

    /// Creates an `Error` solution carrying a diagnostic message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::empty(SolveStatus::Error)
        }
    }

    /// Creates an `Optimal` solution.
    pub fn optimal(values: Vec<f64>, objective_value: f64) -> Self {
        Self {
            status: SolveStatus::Optimal,
            values,
            objective_value: Some(objective_value),
            message: None,
            solve_time_ms: 0,
        }
    }

    /// Sets the solve time.
    pub fn with_solve_time(mut self, solve_time_ms: i64) -> Self {
        self.solve_time_ms = solve_time_ms;
        self
    }

    /// Whether an optimal solution was found.
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// Value of a variable, if present.
    pub fn value(&self, id: VarId) -> Option<f64> {
        self.values.get(id.0).copied()
    }
}

/// Solver configuration.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_staffing::milp::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_time_limit(Duration::from_secs(30))
///     .with_integrality_tolerance(1e-7);
/// assert_eq!(config.time_limit, Some(Duration::from_secs(30)));
/// ```
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum wall time for a single solve. `None` = wait indefinitely.
    pub time_limit: Option<Duration>,
    /// Largest distance from the nearest integer accepted for an integral
    /// variable when interpreting a solution.
    pub integrality_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit: None,
            integrality_tolerance: 1e-6,
        }
    }
}

impl SolverConfig {
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_integrality_tolerance(mut self, tolerance: f64) -> Self {
        self.integrality_tolerance = tolerance;
        self
    }
}

/// Trait for MILP solver implementations.
///
/// The solver is a black box: it receives the model and returns a value
/// per variable plus a status. Failures are reported through
/// [`SolveStatus::Error`], never by panicking.
pub trait MilpSolver {
    /// Solves the model and returns the raw solution.
    fn solve(&self, model: &MilpModel, config: &SolverConfig) -> RawSolution;
}

/// Exact branch-and-bound solver backed by `good_lp`'s default backend.
#[derive(Debug, Clone, Copy)]
pub struct GoodLpSolver;

impl GoodLpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GoodLpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MilpSolver for GoodLpSolver {
    fn solve(&self, model: &MilpModel, config: &SolverConfig) -> RawSolution {
        if let Err(e) = model.validate() {
            return RawSolution::error(format!("invalid model: {e}"));
        }

        debug!(
            model = %model.name,
            variables = model.variable_count(),
            integral = model.integral_count(),
            constraints = model.constraint_count(),
            "solving MILP"
        );

        let start_time = Instant::now();
        let solution = match config.time_limit {
            None => solve_blocking(model),
            Some(limit) => solve_with_deadline(model, limit),
        };
        let elapsed = start_time.elapsed().as_millis() as i64;

        debug!(status = %solution.status, elapsed_ms = elapsed, "MILP solve finished");
        solution.with_solve_time(elapsed)
    }
}

/// Runs the solve on a helper thread and gives up after `limit`.
///
/// The backend has no cancellation hook, so an expired solve keeps running
/// detached until it finishes on its own.
fn solve_with_deadline(model: &MilpModel, limit: Duration) -> RawSolution {
    let (tx, rx) = mpsc::channel();
    let owned = model.clone();
    let spawned = std::thread::Builder::new()
        .name("milp-solve".into())
        .spawn(move || {
            // Receiver may be gone after a timeout.
            let _ = tx.send(solve_blocking(&owned));
        });

    if let Err(e) = spawned {
        return RawSolution::error(format!("failed to start solver thread: {e}"));
    }

    match rx.recv_timeout(limit) {
        Ok(solution) => solution,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            warn!(limit_ms = limit.as_millis() as u64, "MILP solve exceeded time limit");
            RawSolution::error(format!("time limit of {} ms exceeded", limit.as_millis()))
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            RawSolution::error("solver thread terminated without a result")
        }
    }
}

fn solve_blocking(model: &MilpModel) -> RawSolution {
    let mut vars = ProblemVariables::new();
    let handles: Vec<good_lp::Variable> = model
        .variables
        .iter()
        .map(|v| {
            let def = variable().name(v.name.clone());
            let def = match v.kind {
                VarKind::Binary => def.binary(),
                VarKind::Integer => def.integer().min(v.lower).max(v.upper),
                VarKind::Continuous => def.min(v.lower).max(v.upper),
            };
            vars.add(def)
        })
        .collect();

    let (sense, objective) = match &model.objective {
        Some(obj) => (obj.sense, to_expression(&obj.expr, &handles)),
        None => (Sense::Minimize, Expression::from(0.0)),
    };
    let unsolved = match sense {
        Sense::Minimize => vars.minimise(objective),
        Sense::Maximize => vars.maximise(objective),
    };
    let mut problem = unsolved.using(default_solver);

    for c in &model.constraints {
        // Constant rows are decided here; some backends reject empty rows.
        if c.expr.is_empty() {
            if c.is_satisfied(&[], 0.0) {
                continue;
            }
            return RawSolution::empty(SolveStatus::Infeasible);
        }
        let lhs = to_expression(&c.expr, &handles);
        let rhs = c.rhs;
        let row = match c.relation {
            Relation::LessEq => constraint!(lhs <= rhs),
            Relation::Equal => constraint!(lhs == rhs),
            Relation::GreaterEq => constraint!(lhs >= rhs),
        };
        problem = problem.with(row);
    }

    match problem.solve() {
        Ok(solution) => {
            let values: Vec<f64> = handles.iter().map(|h| solution.value(*h)).collect();
            let objective_value = model
                .objective
                .as_ref()
                .map(|o| o.expr.evaluate(&values))
                .unwrap_or(0.0);
            RawSolution::optimal(values, objective_value)
        }
        Err(ResolutionError::Infeasible) => RawSolution::empty(SolveStatus::Infeasible),
        Err(ResolutionError::Unbounded) => RawSolution::empty(SolveStatus::Unbounded),
        Err(other) => RawSolution::error(other.to_string()),
    }
}

fn to_expression(expr: &LinearExpr, handles: &[good_lp::Variable]) -> Expression {
    let mut out = Expression::from(0.0);
    for (id, coef) in &expr.terms {
        out += *coef * handles[id.0];
    }
    out
}
