//! Minimum-headcount staffing of workers to processes.
//!
//! Given processes (a unit volume and minutes per unit each) and workers
//! (each skilled for a subset of processes), builds an exact integer
//! program that assigns every unit to a skilled worker, picks a same-day
//! shift window per worker, and minimizes the number of active workers.
//! The solver's answer is read back as a [`models::StaffingPlan`].
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Process`, `Worker`, `StaffingParams`,
//!   `StaffingPlan`, `Shift`, `Violation`
//! - **`validation`**: Input integrity checks (lengths, signs, skill refs, coverage)
//! - **`milp`**: Solver-independent MILP model and the `good_lp` backend
//! - **`formulation`**: Model builder and solution interpreter
//! - **`generator`**: Seeded random instances
//! - **`report`**: Console and JSON result sinks
//!
//! # Example
//!
//! ```
//! use u_staffing::formulation::StaffingModelBuilder;
//! use u_staffing::milp::{GoodLpSolver, SolverConfig};
//! use u_staffing::models::{Process, StaffingParams, Worker};
//!
//! let params = StaffingParams::new(
//!     &[Process::new(0, 4, 60), Process::new(1, 4, 60)],
//!     &[Worker::new(0).with_skills([0, 1]), Worker::new(1).with_skill(1)],
//! );
//! let plan = StaffingModelBuilder::new(&params)
//!     .solve(&GoodLpSolver::new(), &SolverConfig::default())
//!     .unwrap();
//! assert_eq!(plan.active_workers, vec![0]);
//! ```
//!
//! # References
//!
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"
//! - Wolsey (2020), "Integer Programming"

pub mod error;
pub mod formulation;
pub mod generator;
pub mod milp;
pub mod models;
pub mod report;
pub mod validation;

pub use error::{Result, StaffingError};
