//! Solution interpreter.
//!
//! Turns raw solver output into a [`StaffingPlan`]. Integral variables are
//! rounded to the nearest integer; anything further from an integer than
//! the tolerance means the solver and the model disagree, and is reported
//! rather than truncated.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StaffingError};
use crate::milp::{RawSolution, SolveStatus, VarId};
use crate::models::{Shift, StaffingPlan};

use super::builder::StaffingModel;

/// Interpretation of one solver run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    /// The solver proved optimality.
    Solved(StaffingPlan),
    /// No plan: the solver status and its message, with no partial data.
    NoSolution {
        status: SolveStatus,
        message: Option<String>,
    },
}

/// Derives presentation-ready results from a raw solution.
#[derive(Debug, Clone, Copy)]
pub struct SolutionInterpreter {
    tolerance: f64,
}

impl Default for SolutionInterpreter {
    fn default() -> Self {
        Self::new(1e-6)
    }
}

impl SolutionInterpreter {
    /// Creates an interpreter with the given integrality tolerance.
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Interprets a raw solution against the model it was solved from.
    ///
    /// Integral values are rounded first, then every model row is
    /// re-evaluated on the rounded values before a plan is assembled.
    ///
    /// # Errors
    /// - `InconsistentSolution` if an integral variable is fractional
    ///   beyond the tolerance, or a row is violated by the rounded values
    /// - `Solver` if an optimal solution lacks values for model variables
    pub fn interpret(&self, model: &StaffingModel, raw: &RawSolution) -> Result<Outcome> {
        if !raw.is_optimal() {
            debug!(status = %raw.status, "no plan to interpret");
            return Ok(Outcome::NoSolution {
                status: raw.status,
                message: raw.message.clone(),
            });
        }

        let expected = model.milp.variable_count();
        if raw.values.len() != expected {
            return Err(StaffingError::Solver(format!(
                "solution has {} values for {expected} variables",
                raw.values.len()
            )));
        }

        let values = self.rounded_values(model, raw)?;
        self.check_rows(model, &values)?;

        let value = |id: VarId| values[id.0] as i64;
        let mut plan = StaffingPlan::new();
        for w in 0..model.num_workers {
            let row: Vec<i64> = (0..model.num_processes)
                .map(|p| value(model.units_var(w, p)))
                .collect();

            let assigned: i64 = row
                .iter()
                .enumerate()
                .filter(|&(p, _)| model.is_compatible(w, p))
                .map(|(p, &units)| units * model.normative(p))
                .sum();

            if value(model.active_var(w)) == 1 {
                plan.active_workers.push(w);
            }

            plan.units.push(row);
            plan.shifts
                .push(Shift::new(value(model.start_var(w)), value(model.end_var(w))));
            plan.assigned_minutes.push(assigned);
        }

        debug!(
            active = plan.active_count(),
            workers = model.num_workers,
            "interpreted optimal solution"
        );
        Ok(Outcome::Solved(plan))
    }

    /// Raw values with every integral variable snapped to its integer.
    fn rounded_values(&self, model: &StaffingModel, raw: &RawSolution) -> Result<Vec<f64>> {
        model
            .milp
            .variables
            .iter()
            .zip(&raw.values)
            .map(|(var, &value)| {
                if !var.is_integral() {
                    return Ok(value);
                }
                let rounded = value.round();
                // NaN fails this comparison too.
                if !((value - rounded).abs() <= self.tolerance) {
                    return Err(StaffingError::InconsistentSolution {
                        name: var.name.clone(),
                        detail: format!("has non-integral value {value}"),
                    });
                }
                Ok(rounded)
            })
            .collect()
    }

    fn check_rows(&self, model: &StaffingModel, values: &[f64]) -> Result<()> {
        match model
            .milp
            .constraints
            .iter()
            .find(|c| !c.is_satisfied(values, self.tolerance))
        {
            Some(c) => Err(StaffingError::InconsistentSolution {
                name: c.name.clone(),
                detail: format!(
                    "evaluates to {} but must be {} {}",
                    c.expr.evaluate(values),
                    c.relation.symbol(),
                    c.rhs
                ),
            }),
            None => Ok(()),
        }
    }
}
