//! Optimization results
//!
//! Gantree: L5_Optim → OptimizeResult

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one minimization
/// Gantree: OptimizeResult // x, fun, 반복/평가 수
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeResult {
    /// Final parameters
    pub x: Vec<f64>,

    /// Objective at `x`
    pub fun: f64,

    /// Iterations performed
    pub n_iterations: usize,

    /// Objective evaluations (gradient evaluations count once)
    pub n_evaluations: usize,

    /// Whether a tolerance (not a cap) ended the run
    pub converged: bool,

    /// Termination reason
    pub message: String,

    /// Objective after each iteration
    pub history: Vec<f64>,
}

impl OptimizeResult {
    /// Objective improvement from the first to the last recorded value
    pub fn improvement(&self) -> f64 {
        match (self.history.first(), self.history.last()) {
            (Some(first), Some(last)) => first - last,
            _ => 0.0,
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> hea_core::HeaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for OptimizeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fun={:.10}, iterations={}, evaluations={}, converged={} ({})",
            self.fun, self.n_iterations, self.n_evaluations, self.converged, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_improvement_and_display() {
        let r = OptimizeResult {
            x: vec![0.0],
            fun: -1.0,
            n_iterations: 3,
            n_evaluations: 7,
            converged: true,
            message: "gradient below tolerance".into(),
            history: vec![0.5, -0.5, -1.0],
        };
        assert_eq!(r.improvement(), 1.5);
        assert!(r.to_string().contains("converged=true"));
        assert!(r.to_json().unwrap().contains("\"n_evaluations\": 7"));
    }
}
