//! Staffing formulation.
//!
//! Translates a [`StaffingParams`](crate::models::StaffingParams) record
//! into an integer program that assigns process units to workers and picks
//! shift windows, minimizing the number of active workers, then reads the
//! solver's answer back as a [`StaffingPlan`](crate::models::StaffingPlan).
//!
//! # Key Components
//!
//! - **Builder**: [`StaffingModelBuilder`] — validation plus MILP construction
//! - **Model**: [`StaffingModel`] — the MILP and its variable layout
//! - **Interpreter**: [`SolutionInterpreter`] — raw values → [`Outcome`]
//!
//! # Reference
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"

mod builder;
mod interpreter;

pub use builder::{
    StaffingModel, StaffingModelBuilder, DAY_END_HOUR, LATEST_START_HOUR, MINUTES_PER_HOUR,
};
pub use interpreter::{Outcome, SolutionInterpreter};
