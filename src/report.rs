//! Result reporting.
//!
//! A run ends in either a plan or an error, and a [`ResultSink`] decides
//! how that is presented. [`ConsoleSink`] prints plain-text tables,
//! [`JsonSink`] writes one structured [`StaffingResponse`] document.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StaffingError};
use crate::milp::SolveStatus;
use crate::models::{StaffingParams, StaffingPlan, Violation};

/// Destination for the result of a staffing run.
pub trait ResultSink {
    /// Reports an optimal plan.
    fn plan(&mut self, params: &StaffingParams, plan: &StaffingPlan) -> io::Result<()>;

    /// Reports a failed run.
    fn failure(&mut self, error: &StaffingError) -> io::Result<()>;

    /// Reports whichever side of `result` is present.
    fn report(&mut self, params: &StaffingParams, result: &Result<StaffingPlan>) -> io::Result<()> {
        match result {
            Ok(plan) => self.plan(params, plan),
            Err(e) => self.failure(e),
        }
    }
}

/// Plain-text tables: active workers, the units matrix, and shifts.
pub struct ConsoleSink<W: Write> {
    out: W,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl ConsoleSink<io::Stdout> {
    /// Console sink on standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ResultSink for ConsoleSink<W> {
    fn plan(&mut self, params: &StaffingParams, plan: &StaffingPlan) -> io::Result<()> {
        let out = &mut self.out;
        writeln!(out, "Status: optimal")?;
        writeln!(out, "Active workers: {}", plan.active_count())?;
        let listed: Vec<String> = plan.active_workers.iter().map(|w| w.to_string()).collect();
        writeln!(out, "Active worker indices: [{}]", listed.join(", "))?;

        writeln!(out)?;
        write!(out, "{:>8}", "units")?;
        for p in 0..params.num_processes {
            write!(out, "{:>8}", format!("p{p}"))?;
        }
        writeln!(out)?;
        for w in &plan.active_workers {
            write!(out, "{:>8}", format!("w{w}"))?;
            for p in 0..params.num_processes {
                write!(out, "{:>8}", plan.units_for(*w, p))?;
            }
            writeln!(out)?;
        }
        write!(out, "{:>8}", "total")?;
        for p in 0..params.num_processes {
            write!(out, "{:>8}", plan.process_total(p))?;
        }
        writeln!(out)?;

        writeln!(out)?;
        writeln!(
            out,
            "{:>8}{:>8}{:>8}{:>10}{:>10}{:>8}",
            "worker", "start", "end", "minutes", "assigned", "util"
        )?;
        for &w in &plan.active_workers {
            let Some(shift) = plan.shift(w) else { continue };
            let assigned = plan.assigned_minutes.get(w).copied().unwrap_or(0);
            let utilization = plan
                .utilization(w)
                .map(|u| format!("{:.0}%", u * 100.0))
                .unwrap_or_else(|| "-".into());
            writeln!(
                out,
                "{:>8}{:>8}{:>8}{:>10}{:>10}{:>8}",
                format!("w{w}"),
                shift.start_hour,
                shift.end_hour,
                shift.work_minutes,
                assigned,
                utilization
            )?;
        }
        Ok(())
    }

    fn failure(&mut self, error: &StaffingError) -> io::Result<()> {
        writeln!(self.out, "Status: {}", error_kind(error))?;
        writeln!(self.out, "Error: {error}")
    }
}

/// Structured response written by [`JsonSink`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingResponse {
    /// `"optimal"` or the failure kind, e.g. `"infeasible"`.
    pub status: String,
    /// Number of active workers (objective value), if solved.
    pub active_count: Option<usize>,
    /// The plan, if solved.
    pub plan: Option<StaffingPlan>,
    /// Invariant violations found when re-checking the plan.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
    /// Error description, if the run failed.
    pub error: Option<String>,
}

impl StaffingResponse {
    pub fn solved(params: &StaffingParams, plan: &StaffingPlan) -> Self {
        Self {
            status: SolveStatus::Optimal.to_string(),
            active_count: Some(plan.active_count()),
            plan: Some(plan.clone()),
            violations: plan.violations(params),
            error: None,
        }
    }

    pub fn failed(error: &StaffingError) -> Self {
        Self {
            status: error_kind(error).to_string(),
            active_count: None,
            plan: None,
            violations: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Pretty-printed JSON, one document per run.
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, response: &StaffingResponse) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut self.out, response)?;
        writeln!(self.out)
    }
}

impl JsonSink<io::Stdout> {
    /// JSON sink on standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ResultSink for JsonSink<W> {
    fn plan(&mut self, params: &StaffingParams, plan: &StaffingPlan) -> io::Result<()> {
        self.write(&StaffingResponse::solved(params, plan))
    }

    fn failure(&mut self, error: &StaffingError) -> io::Result<()> {
        self.write(&StaffingResponse::failed(error))
    }
}

/// Short machine-readable name of an error.
pub fn error_kind(error: &StaffingError) -> &'static str {
    match error {
        StaffingError::InvalidParameter { .. } => "invalid_parameter",
        StaffingError::UnsatisfiableDemand { .. } => "unsatisfiable_demand",
        StaffingError::NoSolution {
            status: SolveStatus::Unbounded,
        } => "unbounded",
        StaffingError::NoSolution { .. } => "infeasible",
        StaffingError::Solver(_) => "solver_error",
        StaffingError::InconsistentSolution { .. } => "inconsistent_solution",
        StaffingError::Io(_) | StaffingError::Json(_) => "io_error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Shift;

    fn reference_plan() -> StaffingPlan {
        let mut units = vec![vec![0; 3]; 7];
        units[0][0] = 10;
        units[1][1] = 20;
        units[2][2] = 30;
        let mut shifts = vec![Shift::new(0, 0); 7];
        shifts[0] = Shift::new(8, 10);
        shifts[1] = Shift::new(8, 15);
        shifts[2] = Shift::new(8, 16);
        StaffingPlan {
            active_workers: vec![0, 1, 2],
            units,
            shifts,
            assigned_minutes: vec![100, 400, 450, 0, 0, 0, 0],
        }
    }

    #[test]
    fn test_console_plan() {
        let params = StaffingParams::reference();
        let mut sink = ConsoleSink::new(Vec::new());
        sink.plan(&params, &reference_plan()).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();

        assert!(text.contains("Active workers: 3"));
        assert!(text.contains("Active worker indices: [0, 1, 2]"));
        // Only active workers get a row.
        assert!(text.contains("      w2       0       0      30"));
        assert!(!text.contains("      w5"));
        assert!(text.contains("   total      10      20      30"));
        assert!(text.contains("      w1       8      15       420       400     95%"));
    }

    #[test]
    fn test_console_failure() {
        let mut sink = ConsoleSink::new(Vec::new());
        sink.failure(&StaffingError::NoSolution {
            status: SolveStatus::Infeasible,
        })
        .unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert!(text.starts_with("Status: infeasible\n"));
        assert!(text.contains("no solution: solver reported infeasible"));
    }

    #[test]
    fn test_json_plan() {
        let params = StaffingParams::reference();
        let mut sink = JsonSink::new(Vec::new());
        sink.report(&params, &Ok(reference_plan())).unwrap();

        let response: StaffingResponse = serde_json::from_slice(&sink.into_inner()).unwrap();
        assert_eq!(response.status, "optimal");
        assert_eq!(response.active_count, Some(3));
        assert_eq!(response.plan, Some(reference_plan()));
        assert!(response.violations.is_empty());
        assert!(response.error.is_none());
    }

    #[test]
    fn test_json_failure() {
        let params = StaffingParams::reference();
        let mut sink = JsonSink::new(Vec::new());
        let result: Result<StaffingPlan> = Err(StaffingError::UnsatisfiableDemand {
            processes: vec![2],
        });
        sink.report(&params, &result).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&sink.into_inner()).unwrap();
        assert_eq!(value["status"], "unsatisfiable_demand");
        assert!(value["plan"].is_null());
        assert!(value.get("violations").is_none());
        assert!(value["error"].as_str().unwrap().contains("[2]"));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(error_kind(&StaffingError::invalid("num_workers", "zero")), "invalid_parameter");
        assert_eq!(
            error_kind(&StaffingError::NoSolution {
                status: SolveStatus::Unbounded
            }),
            "unbounded"
        );
        assert_eq!(error_kind(&StaffingError::Solver("x".into())), "solver_error");
    }
}
