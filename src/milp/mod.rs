//! Mixed-integer linear programming (MILP) layer.
//!
//! Provides a solver-independent model for linear programs with integer,
//! binary, and continuous variables, plus the seam through which a model
//! is handed to a numeric solver.
//!
//! # Key Components
//!
//! - **Model**: [`MilpModel`] — variables, named linear constraints, objective
//! - **Solver**: [`MilpSolver`] trait — black-box interface returning a [`RawSolution`]
//! - **Backend**: [`GoodLpSolver`] — exact branch-and-bound via `good_lp`
//!
//! # Design
//!
//! The model is a plain value (`Clone + PartialEq + Serialize`). Two models
//! built from the same inputs compare equal bit-for-bit, which makes the
//! formulation testable without a solver. Any solver (CBC, HiGHS, a mock)
//! can be plugged in through [`MilpSolver`].
//!
//! # References
//!
//! Wolsey (2020), "Integer Programming", 2nd ed.

mod model;
mod solver;

pub use model::{
    LinearConstraint, LinearExpr, MilpModel, Objective, Relation, Sense, VarId, VarKind, Variable,
};
pub use solver::{GoodLpSolver, MilpSolver, RawSolution, SolveStatus, SolverConfig};
