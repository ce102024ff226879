//! Staffing domain models.
//!
//! Provides the data types for describing a staffing problem and its
//! solution.
//!
//! # Domain Mappings
//!
//! | u-staffing | Manufacturing | Warehouse | Call Center |
//! |------------|---------------|-----------|-------------|
//! | Process | Production step | Pick/pack line | Queue |
//! | Normative | Cycle time | Handling time | Handle time |
//! | Worker | Operator | Picker | Agent |
//! | Shift | Work shift | Shift | Roster slot |

mod params;
mod plan;
mod process;
mod worker;

pub use params::{StaffingParams, DEFAULT_MAX_MINUTES_PER_DAY};
pub use plan::{Shift, StaffingPlan, Violation, ViolationType};
pub use process::Process;
pub use worker::Worker;
