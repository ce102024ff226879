//! Process model.
//!
//! A process is a production step with a required volume (units of work)
//! and a normative (minutes per unit). Its total time demand is
//! `volume * normative` minutes.

use serde::{Deserialize, Serialize};

/// A production process to be staffed.
///
/// Identified by its position `0..P-1` in the parameter record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    /// Position in the parameter record.
    pub index: usize,
    /// Units of work required.
    pub volume: i64,
    /// Minutes required per unit.
    pub normative: i64,
}

impl Process {
    /// Creates a new process.
    pub fn new(index: usize, volume: i64, normative: i64) -> Self {
        Self {
            index,
            volume,
            normative,
        }
    }

    /// Total minutes needed to complete the whole volume.
    #[inline]
    pub fn required_minutes(&self) -> i64 {
        self.volume * self.normative
    }

    /// Whether any unit has to be produced.
    #[inline]
    pub fn has_demand(&self) -> bool {
        self.volume > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_minutes() {
        let p = Process::new(1, 20, 20);
        assert_eq!(p.index, 1);
        assert_eq!(p.required_minutes(), 400);
        assert!(p.has_demand());
    }

    #[test]
    fn test_zero_volume() {
        let p = Process::new(0, 0, 15);
        assert_eq!(p.required_minutes(), 0);
        assert!(!p.has_demand());
    }
}
