//! Staffing model builder.
//!
//! # Formulation
//!
//! Variables, per worker `w` and process `p`:
//! - `units[w][p]` ∈ ℤ, `0 <= units <= volume[p]` if skilled, else fixed to 0
//! - `active[w]` ∈ {0, 1}
//! - `start[w]` ∈ ℤ [0, 23], `end[w]` ∈ ℤ [0, 24]
//!
//! `work_minutes[w] = 60·end[w] − 60·start[w]` is an expression, never a
//! variable of its own.
//!
//! Objective: minimize `Σ_w active[w]`.
//!
//! Constraints:
//! 1. completion — `Σ_w c(w,p)·units[w][p] == volume[p]`
//! 2. shift cap — `work_minutes[w] <= MAX`
//! 3. capacity — `Σ_p c(w,p)·normative[p]·units[w][p] <= work_minutes[w]`
//! 4. activation — `work_minutes[w] / L <= active[w]`, `L = min(MAX, 1440)`
//! 5. shift order — `end[w] >= start[w]`
//! 6. free units — `units[w][p] <= volume[p]·active[w]`, only for skilled
//!    pairs whose normative is 0
//!
//! where `c(w,p)` is the 0/1 skill compatibility. Activation (4) is stated
//! in minutes: any positive shift pushes the left side into (0, 1], which
//! forces the binary `active[w]` to 1, while an empty shift leaves it free
//! to drop to 0. `L` is the longest shift a worker can actually have, so
//! one shift hour always weighs at least 1/24 regardless of the cap.

use tracing::debug;

use crate::error::{Result, StaffingError};
use crate::milp::{
    LinearConstraint, LinearExpr, MilpModel, MilpSolver, SolveStatus, SolverConfig, VarId,
    Variable,
};
use crate::models::{StaffingParams, StaffingPlan};
use crate::validation::{to_staffing_error, validate_params};

use super::interpreter::{Outcome, SolutionInterpreter};

/// Minutes in one shift hour.
pub const MINUTES_PER_HOUR: i64 = 60;
/// Latest hour a shift may start.
pub const LATEST_START_HOUR: i64 = 23;
/// Hour at which the day ends.
pub const DAY_END_HOUR: i64 = 24;

/// A built staffing model: the MILP plus the variable layout needed to read
/// a solution back.
///
/// Two models built from equal parameters compare equal.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffingModel {
    /// The integer program handed to the solver.
    pub milp: MilpModel,
    /// Number of processes `P`.
    pub num_processes: usize,
    /// Number of workers `W`.
    pub num_workers: usize,
    /// Daily shift cap (minutes).
    pub max_minutes_per_day: i64,
    normatives: Vec<i64>,
    compatible: Vec<Vec<bool>>,
    units: Vec<Vec<VarId>>,
    active: Vec<VarId>,
    start: Vec<VarId>,
    end: Vec<VarId>,
}

impl StaffingModel {
    /// Variable `units[w][p]`.
    pub fn units_var(&self, worker: usize, process: usize) -> VarId {
        self.units[worker][process]
    }

    /// Variable `active[w]`.
    pub fn active_var(&self, worker: usize) -> VarId {
        self.active[worker]
    }

    /// Variable `start[w]`.
    pub fn start_var(&self, worker: usize) -> VarId {
        self.start[worker]
    }

    /// Variable `end[w]`.
    pub fn end_var(&self, worker: usize) -> VarId {
        self.end[worker]
    }

    /// Whether worker `w` is skilled for process `p`.
    pub fn is_compatible(&self, worker: usize, process: usize) -> bool {
        self.compatible[worker][process]
    }

    /// Minutes per unit of process `p`.
    pub fn normative(&self, process: usize) -> i64 {
        self.normatives[process]
    }

    /// The expression `60·end[w] − 60·start[w]`.
    pub fn work_minutes_expr(&self, worker: usize) -> LinearExpr {
        let per_hour = MINUTES_PER_HOUR as f64;
        LinearExpr::new()
            .with_term(self.end[worker], per_hour)
            .with_term(self.start[worker], -per_hour)
    }

    /// Name of a variable in the underlying MILP.
    pub fn variable_name(&self, id: VarId) -> &str {
        self.milp
            .variable(id)
            .map(|v| v.name.as_str())
            .unwrap_or("<unknown>")
    }
}

/// Names of the per-index constraint families.
pub(crate) mod names {
    pub fn completion(process: usize) -> String {
        format!("completion[{process}]")
    }
    pub fn shift_cap(worker: usize) -> String {
        format!("shift_cap[{worker}]")
    }
    pub fn capacity(worker: usize) -> String {
        format!("capacity[{worker}]")
    }
    pub fn activation(worker: usize) -> String {
        format!("activation[{worker}]")
    }
    pub fn shift_order(worker: usize) -> String {
        format!("shift_order[{worker}]")
    }
    pub fn free_units(worker: usize, process: usize) -> String {
        format!("free_units[{worker}][{process}]")
    }
}

/// Builds a staffing MILP from a parameter record.
///
/// # Example
/// ```
/// use u_staffing::formulation::StaffingModelBuilder;
/// use u_staffing::milp::{GoodLpSolver, SolverConfig};
/// use u_staffing::models::StaffingParams;
///
/// let params = StaffingParams::reference();
/// let builder = StaffingModelBuilder::new(&params);
/// let plan = builder.solve(&GoodLpSolver::new(), &SolverConfig::default()).unwrap();
/// assert_eq!(plan.active_workers, vec![0, 1, 2]);
/// ```
pub struct StaffingModelBuilder<'a> {
    params: &'a StaffingParams,
}

impl<'a> StaffingModelBuilder<'a> {
    /// Creates a new builder.
    pub fn new(params: &'a StaffingParams) -> Self {
        Self { params }
    }

    /// Validates the parameters and builds the model.
    ///
    /// # Errors
    /// - `InvalidParameter` for malformed input
    /// - `UnsatisfiableDemand` when a process with demand has no skilled worker
    pub fn build(&self) -> Result<StaffingModel> {
        let params = self.params;
        if let Err(errors) = validate_params(params) {
            for e in &errors {
                debug!(field = %e.field, kind = ?e.kind, "{}", e.message);
            }
            return Err(to_staffing_error(&errors));
        }

        let num_processes = params.num_processes;
        let num_workers = params.num_workers;
        let max_minutes = params.max_minutes_per_day as f64;
        let per_hour = MINUTES_PER_HOUR as f64;
        // No shift is longer than the day, whatever the cap says.
        let longest_shift = params
            .max_minutes_per_day
            .min(DAY_END_HOUR * MINUTES_PER_HOUR) as f64;

        let workers = params.workers();
        let compatible: Vec<Vec<bool>> = workers
            .iter()
            .map(|w| w.skill_vector(num_processes))
            .collect();

        let mut milp = MilpModel::new("workers to processes");

        let mut units = Vec::with_capacity(num_workers);
        for (w, skills) in compatible.iter().enumerate() {
            let row: Vec<VarId> = skills
                .iter()
                .zip(&params.process_volumes)
                .enumerate()
                .map(|(p, (&skilled, &volume))| {
                    let upper = if skilled { volume as f64 } else { 0.0 };
                    milp.add_variable(Variable::integer(format!("units[{w}][{p}]"), 0.0, upper))
                })
                .collect();
            units.push(row);
        }

        let mut active = Vec::with_capacity(num_workers);
        let mut start = Vec::with_capacity(num_workers);
        let mut end = Vec::with_capacity(num_workers);
        for w in 0..num_workers {
            active.push(milp.add_variable(Variable::binary(format!("active[{w}]"))));
            start.push(milp.add_variable(Variable::integer(
                format!("start[{w}]"),
                0.0,
                LATEST_START_HOUR as f64,
            )));
            end.push(milp.add_variable(Variable::integer(
                format!("end[{w}]"),
                0.0,
                DAY_END_HOUR as f64,
            )));
        }

        let mut objective = LinearExpr::new();
        for &a in &active {
            objective.add_term(a, 1.0);
        }
        milp.minimize(objective);

        for (p, &volume) in params.process_volumes.iter().enumerate() {
            let mut expr = LinearExpr::new();
            for w in 0..num_workers {
                expr.add_term(units[w][p], workers[w].compatibility(p));
            }
            milp.add_constraint(LinearConstraint::equal(
                names::completion(p),
                expr,
                volume as f64,
            ));
        }

        for w in 0..num_workers {
            // coef·end[w] − coef·start[w]
            let shift_terms = |coef: f64| {
                LinearExpr::new()
                    .with_term(end[w], coef)
                    .with_term(start[w], -coef)
            };

            milp.add_constraint(LinearConstraint::leq(
                names::shift_cap(w),
                shift_terms(per_hour),
                max_minutes,
            ));

            let mut capacity = LinearExpr::new();
            for (p, &normative) in params.process_normatives.iter().enumerate() {
                capacity.add_term(units[w][p], workers[w].compatibility(p) * normative as f64);
            }
            for (var, coef) in shift_terms(-per_hour).terms {
                capacity.add_term(var, coef);
            }
            milp.add_constraint(LinearConstraint::leq(names::capacity(w), capacity, 0.0));

            let activation = shift_terms(per_hour / longest_shift).with_term(active[w], -1.0);
            milp.add_constraint(LinearConstraint::leq(names::activation(w), activation, 0.0));

            milp.add_constraint(LinearConstraint::geq(
                names::shift_order(w),
                LinearExpr::new().with_term(end[w], 1.0).with_term(start[w], -1.0),
                0.0,
            ));

            // Zero-normative units take no shift time, so rows 3 and 4 cannot
            // keep them off inactive workers.
            let free_processes = params
                .process_normatives
                .iter()
                .zip(&params.process_volumes)
                .enumerate()
                .filter(|&(p, (&normative, &volume))| {
                    normative == 0 && volume > 0 && compatible[w][p]
                });
            for (p, (_, &volume)) in free_processes {
                milp.add_constraint(LinearConstraint::leq(
                    names::free_units(w, p),
                    LinearExpr::new()
                        .with_term(units[w][p], 1.0)
                        .with_term(active[w], -(volume as f64)),
                    0.0,
                ));
            }
        }

        debug!(
            processes = num_processes,
            workers = num_workers,
            unskilled = workers.iter().filter(|w| w.is_unskilled()).count(),
            variables = milp.variable_count(),
            constraints = milp.constraint_count(),
            "built staffing model"
        );

        Ok(StaffingModel {
            milp,
            num_processes,
            num_workers,
            max_minutes_per_day: params.max_minutes_per_day,
            normatives: params.process_normatives.clone(),
            compatible,
            units,
            active,
            start,
            end,
        })
    }

    /// Builds, solves, and interprets the model.
    ///
    /// # Errors
    /// Build errors, plus `NoSolution` for infeasible/unbounded models,
    /// `Solver` when the solver fails, and `InconsistentSolution` when the
    /// solver's values do not satisfy the model or the resulting plan
    /// breaks a staffing rule.
    pub fn solve<S: MilpSolver>(&self, solver: &S, config: &SolverConfig) -> Result<StaffingPlan> {
        let model = self.build()?;
        let raw = solver.solve(&model.milp, config);
        debug!(
            status = %raw.status,
            objective = ?raw.objective_value,
            solve_time_ms = raw.solve_time_ms,
            "solver returned"
        );

        let interpreter = SolutionInterpreter::new(config.integrality_tolerance);
        match interpreter.interpret(&model, &raw)? {
            Outcome::Solved(plan) => match plan.violations(self.params).into_iter().next() {
                Some(v) => Err(StaffingError::InconsistentSolution {
                    name: v.entity_id,
                    detail: v.message,
                }),
                None => Ok(plan),
            },
            Outcome::NoSolution {
                status: SolveStatus::Error,
                message,
            } => Err(StaffingError::Solver(
                message.unwrap_or_else(|| "solver failed without a message".into()),
            )),
            Outcome::NoSolution { status, .. } => Err(StaffingError::NoSolution { status }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::milp::{Relation, VarKind};
    use crate::models::{Process, Worker};

    fn two_by_two() -> StaffingParams {
        // Worker 0 can do both, worker 1 only process 1.
        StaffingParams::new(
            &[Process::new(0, 4, 30), Process::new(1, 6, 10)],
            &[Worker::new(0).with_skills([0, 1]), Worker::new(1).with_skill(1)],
        )
    }

    #[test]
    fn test_variable_layout() {
        let params = two_by_two();
        let model = StaffingModelBuilder::new(&params).build().unwrap();

        // 2x2 units + 3 per worker (active, start, end)
        assert_eq!(model.milp.variable_count(), 4 + 2 * 3);
        assert_eq!(model.variable_name(model.units_var(1, 0)), "units[1][0]");
        assert_eq!(model.variable_name(model.active_var(1)), "active[1]");

        let active = model.milp.variable(model.active_var(0)).unwrap();
        assert_eq!(active.kind, VarKind::Binary);

        let start = model.milp.variable(model.start_var(0)).unwrap();
        assert_eq!((start.lower, start.upper), (0.0, 23.0));
        let end = model.milp.variable(model.end_var(0)).unwrap();
        assert_eq!((end.lower, end.upper), (0.0, 24.0));
    }

    #[test]
    fn test_incompatible_units_fixed_to_zero() {
        let params = two_by_two();
        let model = StaffingModelBuilder::new(&params).build().unwrap();

        let blocked = model.milp.variable(model.units_var(1, 0)).unwrap();
        assert_eq!(blocked.kind, VarKind::Integer);
        assert_eq!((blocked.lower, blocked.upper), (0.0, 0.0));

        let open = model.milp.variable(model.units_var(0, 0)).unwrap();
        assert_eq!((open.lower, open.upper), (0.0, 4.0));
        assert!(!model.is_compatible(1, 0));
        assert!(model.is_compatible(1, 1));
    }

    #[test]
    fn test_constraint_families() {
        let params = two_by_two();
        let model = StaffingModelBuilder::new(&params).build().unwrap();

        // 2 completion + 4 per worker
        assert_eq!(model.milp.constraint_count(), 2 + 2 * 4);

        let completion = model.milp.constraint(&names::completion(0)).unwrap();
        assert_eq!(completion.relation, Relation::Equal);
        assert_eq!(completion.rhs, 4.0);
        // Worker 1 lacks skill 0: its term is absent.
        assert_eq!(completion.expr.terms, vec![(model.units_var(0, 0), 1.0)]);

        let cap = model.milp.constraint(&names::shift_cap(1)).unwrap();
        assert_eq!(cap.relation, Relation::LessEq);
        assert_eq!(cap.rhs, 480.0);
        assert_eq!(cap.expr, model.work_minutes_expr(1));

        let capacity = model.milp.constraint(&names::capacity(0)).unwrap();
        assert_eq!(
            capacity.expr.terms,
            vec![
                (model.units_var(0, 0), 30.0),
                (model.units_var(0, 1), 10.0),
                (model.end_var(0), -60.0),
                (model.start_var(0), 60.0),
            ]
        );
        assert_eq!(capacity.rhs, 0.0);

        let activation = model.milp.constraint(&names::activation(1)).unwrap();
        assert_eq!(
            activation.expr.terms,
            vec![
                (model.end_var(1), 60.0 / 480.0),
                (model.start_var(1), -60.0 / 480.0),
                (model.active_var(1), -1.0),
            ]
        );

        let order = model.milp.constraint(&names::shift_order(0)).unwrap();
        assert_eq!(order.relation, Relation::GreaterEq);
    }

    #[test]
    fn test_objective_counts_active_workers() {
        let params = two_by_two();
        let model = StaffingModelBuilder::new(&params).build().unwrap();
        let objective = model.milp.objective.as_ref().unwrap();
        assert_eq!(
            objective.expr.terms,
            vec![(model.active_var(0), 1.0), (model.active_var(1), 1.0)]
        );
    }

    #[test]
    fn test_empty_worker_is_idle_feasible() {
        // An idle worker (zero units, start == end, active 0) satisfies its rows.
        let params = two_by_two();
        let model = StaffingModelBuilder::new(&params).build().unwrap();
        let mut values = vec![0.0; model.milp.variable_count()];
        values[model.start_var(1).0] = 9.0;
        values[model.end_var(1).0] = 9.0;

        for name in [
            names::shift_cap(1),
            names::capacity(1),
            names::activation(1),
            names::shift_order(1),
        ] {
            let c = model.milp.constraint(&name).unwrap();
            assert!(c.is_satisfied(&values, 1e-9), "{name} violated");
        }
    }

    #[test]
    fn test_positive_shift_forces_activation() {
        let params = two_by_two();
        let model = StaffingModelBuilder::new(&params).build().unwrap();
        let mut values = vec![0.0; model.milp.variable_count()];
        values[model.start_var(0).0] = 8.0;
        values[model.end_var(0).0] = 9.0;

        let activation = model.milp.constraint(&names::activation(0)).unwrap();
        assert!(!activation.is_satisfied(&values, 1e-9));
        values[model.active_var(0).0] = 1.0;
        assert!(activation.is_satisfied(&values, 1e-9));
    }

    #[test]
    fn test_build_rejects_invalid_params() {
        let mut params = two_by_two();
        params.process_volumes[0] = -1;
        let err = StaffingModelBuilder::new(&params).build().unwrap_err();
        assert!(matches!(
            err,
            StaffingError::InvalidParameter { ref field, .. } if field == "process_volumes[0]"
        ));
    }

    #[test]
    fn test_build_rejects_uncovered_demand() {
        let params = StaffingParams::new(
            &[Process::new(0, 2, 10), Process::new(1, 2, 10)],
            &[Worker::new(0).with_skill(1)],
        );
        let err = StaffingModelBuilder::new(&params).build().unwrap_err();
        assert!(matches!(
            err,
            StaffingError::UnsatisfiableDemand { ref processes } if processes == &vec![0]
        ));
    }

    #[test]
    fn test_zero_normative_links_units_to_activation() {
        let params = StaffingParams::new(
            &[Process::new(0, 5, 0), Process::new(1, 3, 10)],
            &[Worker::new(0).with_skills([0, 1]), Worker::new(1).with_skill(1)],
        );
        let model = StaffingModelBuilder::new(&params).build().unwrap();

        let row = model.milp.constraint(&names::free_units(0, 0)).unwrap();
        assert_eq!(
            row.expr.terms,
            vec![(model.units_var(0, 0), 1.0), (model.active_var(0), -5.0)]
        );
        // Only skilled, zero-normative pairs get the row.
        assert!(model.milp.constraint(&names::free_units(0, 1)).is_none());
        assert!(model.milp.constraint(&names::free_units(1, 0)).is_none());
        assert_eq!(model.milp.constraint_count(), 2 + 2 * 4 + 1);
    }

    #[test]
    fn test_build_is_deterministic() {
        let params = StaffingParams::reference();
        let a = StaffingModelBuilder::new(&params).build().unwrap();
        let b = StaffingModelBuilder::new(&params).build().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_max_minutes_scales_rows() {
        let params = two_by_two().with_max_minutes_per_day(600);
        let model = StaffingModelBuilder::new(&params).build().unwrap();
        assert_eq!(model.milp.constraint(&names::shift_cap(0)).unwrap().rhs, 600.0);
        let activation = model.milp.constraint(&names::activation(0)).unwrap();
        assert_eq!(activation.expr.terms[0].1, 60.0 / 600.0);
    }

    #[test]
    fn test_activation_scale_limited_to_one_day() {
        let params = two_by_two().with_max_minutes_per_day(1_000_000_000);
        let model = StaffingModelBuilder::new(&params).build().unwrap();

        assert_eq!(
            model.milp.constraint(&names::shift_cap(0)).unwrap().rhs,
            1_000_000_000.0
        );
        let activation = model.milp.constraint(&names::activation(0)).unwrap();
        assert_eq!(activation.expr.terms[0].1, 60.0 / 1440.0);
        assert_eq!(activation.expr.terms[1].1, -60.0 / 1440.0);

        // A one-hour shift without activation must violate the row.
        let mut values = vec![0.0; model.milp.variable_count()];
        values[model.start_var(0).0] = 0.0;
        values[model.end_var(0).0] = 1.0;
        assert!(!activation.is_satisfied(&values, 1e-6));
    }
}
