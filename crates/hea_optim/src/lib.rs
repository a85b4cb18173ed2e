//! # HEA Optim
//!
//! Local minimizers for variational energies.
//!
//! ## Gantree Architecture
//!
//! ```text
//! hea_optim // L5: Optimization
//!     Objective // value, value_and_grad
//!     OptimizerConfig // kind + tolerances, presets
//!     Optimizer // minimize(objective, x0)
//!         Lbfgs // 준뉴턴, Armijo
//!         Adam // 확률적 경사, 윈도우 조기 종료
//!         NelderMead // 무미분 심플렉스
//!     Convergence // 윈도우 수렴 판단
//!     OptimizeResult // x, fun, history
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use hea_optim::prelude::*;
//! use hea_core::HeaResult;
//!
//! struct Bowl;
//!
//! impl Objective for Bowl {
//!     fn num_params(&self) -> usize { 2 }
//!     fn value(&mut self, x: &[f64]) -> HeaResult<f64> {
//!         Ok((x[0] - 1.0).powi(2) + (x[1] + 2.0).powi(2))
//!     }
//!     fn value_and_grad(&mut self, x: &[f64]) -> HeaResult<(f64, Vec<f64>)> {
//!         Ok((self.value(x)?, vec![2.0 * (x[0] - 1.0), 2.0 * (x[1] + 2.0)]))
//!     }
//! }
//!
//! let result = minimize(&OptimizerConfig::lbfgs(), &mut Bowl, &[0.0, 0.0]).unwrap();
//! assert!(result.converged);
//! assert!((result.x[0] - 1.0).abs() < 1e-6);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Objective trait (Gantree: L5_Optim → Objective)
pub mod objective;

/// Optimizer configuration (Gantree: L5_Optim → OptimizerConfig)
pub mod config;

/// Window convergence detector (Gantree: L5_Optim → Convergence)
pub mod convergence;

/// Optimization results (Gantree: L5_Optim → OptimizeResult)
pub mod result;

/// Optimizer trait and dispatch (Gantree: L5_Optim → Optimizer)
pub mod optimizer;

/// L-BFGS (Gantree: L5_Optim → Lbfgs)
pub mod lbfgs;

/// Adam (Gantree: L5_Optim → Adam)
pub mod adam;

/// Nelder-Mead (Gantree: L5_Optim → NelderMead)
pub mod nelder_mead;

// ============================================================================
// Re-exports
// ============================================================================

pub use adam::Adam;
pub use config::{OptimizerConfig, OptimizerKind};
pub use convergence::Convergence;
pub use lbfgs::Lbfgs;
pub use nelder_mead::NelderMead;
pub use objective::Objective;
pub use optimizer::{build_optimizer, minimize, Optimizer};
pub use result::OptimizeResult;

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases

    pub use crate::config::{OptimizerConfig, OptimizerKind};
    pub use crate::convergence::Convergence;
    pub use crate::objective::Objective;
    pub use crate::optimizer::{minimize, Optimizer};
    pub use crate::result::OptimizeResult;
    pub use crate::{Adam, Lbfgs, NelderMead};
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use crate::objective::testing::{Quadratic, Rosenbrock};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_restarts_keep_best() {
        // f(x) = (x² - 1)² + 0.3x has a shallow minimum near +1 and a deeper one near -1
        struct DoubleWell;
        impl Objective for DoubleWell {
            fn num_params(&self) -> usize {
                1
            }
            fn value(&mut self, x: &[f64]) -> hea_core::HeaResult<f64> {
                Ok((x[0] * x[0] - 1.0).powi(2) + 0.3 * x[0])
            }
            fn value_and_grad(&mut self, x: &[f64]) -> hea_core::HeaResult<(f64, Vec<f64>)> {
                let g = 4.0 * x[0] * (x[0] * x[0] - 1.0) + 0.3;
                Ok((self.value(x)?, vec![g]))
            }
        }
        let config = OptimizerConfig::lbfgs();
        let results: Vec<OptimizeResult> = [0.9, -0.9, 2.0]
            .iter()
            .map(|&x0| minimize(&config, &mut DoubleWell, &[x0]).unwrap())
            .collect();
        let best = results
            .iter()
            .min_by(|a, b| a.fun.total_cmp(&b.fun))
            .unwrap();
        assert!(best.x[0] < 0.0);
        assert!(results.iter().any(|r| r.x[0] > 0.0));
    }

    #[test]
    fn test_lbfgs_and_nelder_mead_on_rosenbrock() {
        let lbfgs = minimize(&OptimizerConfig::lbfgs(), &mut Rosenbrock, &[0.0, 0.0]).unwrap();
        assert_abs_diff_eq!(lbfgs.fun, 0.0, epsilon = 1e-8);
        let nm = minimize(
            &OptimizerConfig::nelder_mead().with_max_evals(4000),
            &mut Rosenbrock,
            &[0.0, 0.0],
        )
        .unwrap();
        assert!(nm.fun < 1e-6, "{}", nm);
    }

    #[test]
    fn test_evaluation_counts() {
        let mut q = Quadratic::new(vec![1.0, 2.0, 3.0]);
        let res = minimize(&OptimizerConfig::nelder_mead(), &mut q, &[0.0; 3]).unwrap();
        assert_eq!(res.n_evaluations, q.calls);
        assert!(res.n_evaluations <= 600 + 5);
    }
}
