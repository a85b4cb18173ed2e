//! Adam
//!
//! Gantree: L5_Optim → Adam
//!
//! Fixed-rate first-order updates with bias-corrected moment estimates.
//! Suited to sampled objectives: no line search, and the run stops early
//! once recent energies settle inside the convergence window. The lowest
//! evaluated energy and its parameters are returned, not the last iterate.

use crate::config::OptimizerConfig;
use crate::convergence::Convergence;
use crate::objective::{check_x0, Objective};
use crate::optimizer::{check_finite, Optimizer};
use crate::result::OptimizeResult;
use hea_core::error::HeaResult;
use log::{debug, trace};

/// Adam minimizer
/// Gantree: Adam // 확률적 경사
#[derive(Debug, Clone)]
pub struct Adam {
    max_iter: usize,
    learning_rate: f64,
    beta1: f64,
    beta2: f64,
    epsilon: f64,
    window: usize,
    window_threshold: f64,
}

impl Adam {
    /// Build from configuration
    pub fn from_config(config: &OptimizerConfig) -> Self {
        Self {
            max_iter: config.max_iter,
            learning_rate: config.learning_rate,
            beta1: config.beta1,
            beta2: config.beta2,
            epsilon: config.epsilon,
            window: config.window,
            window_threshold: config.window_threshold,
        }
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self::from_config(&OptimizerConfig::adam())
    }
}

impl Optimizer for Adam {
    fn name(&self) -> &'static str {
        "adam"
    }

    /// Gantree: minimize(objective, x0) -> Result<OptimizeResult> // 최소화
    fn minimize(&self, objective: &mut dyn Objective, x0: &[f64]) -> HeaResult<OptimizeResult> {
        check_x0(objective, x0)?;
        let n = x0.len();
        let mut x = x0.to_vec();
        let mut m = vec![0.0; n];
        let mut v = vec![0.0; n];
        let mut conv = Convergence::new(self.window, self.window_threshold);
        let mut history = Vec::with_capacity(self.max_iter + 1);
        let mut n_evals = 0;
        let mut converged = false;
        let mut iterations = 0;
        let mut best_x = x.clone();
        let mut best_f = f64::INFINITY;

        for t in 1..=self.max_iter {
            let (fx, g) = objective.value_and_grad(&x)?;
            n_evals += 1;
            check_finite(fx, "energy")?;
            history.push(fx);
            if fx < best_f {
                best_f = fx;
                best_x.copy_from_slice(&x);
            }
            conv.push(fx);
            if conv.check() {
                converged = true;
                break;
            }

            let bc1 = 1.0 - self.beta1.powi(t as i32);
            let bc2 = 1.0 - self.beta2.powi(t as i32);
            for j in 0..n {
                m[j] = self.beta1 * m[j] + (1.0 - self.beta1) * g[j];
                v[j] = self.beta2 * v[j] + (1.0 - self.beta2) * g[j] * g[j];
                let m_hat = m[j] / bc1;
                let v_hat = v[j] / bc2;
                x[j] -= self.learning_rate * m_hat / (v_hat.sqrt() + self.epsilon);
            }
            iterations = t;
            trace!("adam iter {}: f = {:.10}", t, fx);
        }

        let last = objective.value(&x)?;
        n_evals += 1;
        check_finite(last, "final energy")?;
        history.push(last);
        if last < best_f {
            best_f = last;
            best_x = x;
        }

        let message = if converged {
            "energy window settled".to_string()
        } else {
            "iteration limit reached".to_string()
        };
        debug!("adam finished after {} iterations: {}", iterations, message);
        Ok(OptimizeResult {
            x: best_x,
            fun: best_f,
            n_iterations: iterations,
            n_evaluations: n_evals,
            converged,
            message,
            history,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
