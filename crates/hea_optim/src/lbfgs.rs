//! Limited-memory BFGS
//!
//! Gantree: L5_Optim → Lbfgs
//!
//! Two-loop recursion over the last `m` curvature pairs, Armijo
//! backtracking from a unit step. Pairs with `s·y ≤ 1e-12` are skipped so
//! the implicit Hessian stays positive definite.
//!
//! Stops when `‖g‖∞ ≤ gtol`, when the relative energy change drops to
//! `ftol`, or at `max_iter`.

use crate::config::OptimizerConfig;
use crate::objective::{check_x0, Objective};
use crate::optimizer::{check_finite, Optimizer};
use crate::result::OptimizeResult;
use hea_core::error::HeaResult;
use hea_core::optim;
use log::{debug, trace};
use std::collections::VecDeque;

const CURVATURE_EPS: f64 = 1e-12;

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn inf_norm(a: &[f64]) -> f64 {
    a.iter().fold(0.0, |m, v| m.max(v.abs()))
}

/// L-BFGS minimizer
/// Gantree: Lbfgs // 준뉴턴
#[derive(Debug, Clone)]
pub struct Lbfgs {
    max_iter: usize,
    max_evals: usize,
    history_size: usize,
    gtol: f64,
    ftol: f64,
}

impl Lbfgs {
    /// Build from configuration
    pub fn from_config(config: &OptimizerConfig, num_params: usize) -> Self {
        Self {
            max_iter: config.max_iter,
            max_evals: config.eval_budget(num_params),
            history_size: config.history_size,
            gtol: config.gtol,
            ftol: config.ftol,
        }
    }

    /// Apply the inverse-Hessian estimate to `g`
    fn two_loop(&self, g: &[f64], s: &VecDeque<Vec<f64>>, y: &VecDeque<Vec<f64>>) -> Vec<f64> {
        let mut q = g.to_vec();
        let rho: Vec<f64> = s.iter().zip(y).map(|(si, yi)| 1.0 / dot(si, yi)).collect();
        let mut alpha = vec![0.0; s.len()];
        for i in (0..s.len()).rev() {
            alpha[i] = rho[i] * dot(&s[i], &q);
            q.iter_mut().zip(&y[i]).for_each(|(qj, yj)| *qj -= alpha[i] * yj);
        }
        let gamma = match (s.back(), y.back()) {
            (Some(sl), Some(yl)) => dot(sl, yl) / dot(yl, yl),
            _ => 1.0 / dot(g, g).sqrt().max(1.0),
        };
        let mut r: Vec<f64> = q.iter().map(|v| gamma * v).collect();
        for i in 0..s.len() {
            let beta = rho[i] * dot(&y[i], &r);
            r.iter_mut().zip(&s[i]).for_each(|(rj, sj)| *rj += (alpha[i] - beta) * sj);
        }
        r
    }
}

impl Default for Lbfgs {
    fn default() -> Self {
        Self {
            max_iter: optim::LBFGS_MAX_ITER,
            max_evals: usize::MAX,
            history_size: optim::LBFGS_HISTORY,
            gtol: optim::LBFGS_GTOL,
            ftol: optim::LBFGS_FTOL,
        }
    }
}

impl Optimizer for Lbfgs {
    fn name(&self) -> &'static str {
        "l-bfgs"
    }

    /// Gantree: minimize(objective, x0) -> Result<OptimizeResult> // 최소화
    fn minimize(&self, objective: &mut dyn Objective, x0: &[f64]) -> HeaResult<OptimizeResult> {
        check_x0(objective, x0)?;
        let mut x = x0.to_vec();
        let (mut fx, mut g) = objective.value_and_grad(&x)?;
        check_finite(fx, "initial energy")?;
        let mut n_evals = 1;
        let mut history = vec![fx];
        let mut s_hist: VecDeque<Vec<f64>> = VecDeque::with_capacity(self.history_size);
        let mut y_hist: VecDeque<Vec<f64>> = VecDeque::with_capacity(self.history_size);

        let mut converged = false;
        let mut message = String::from("iteration limit reached");
        let mut iterations = 0;

        while iterations < self.max_iter {
            if inf_norm(&g) <= self.gtol {
                converged = true;
                message = "gradient below tolerance".into();
                break;
            }

            let mut d: Vec<f64> = self.two_loop(&g, &s_hist, &y_hist).iter().map(|v| -v).collect();
            let mut slope = dot(&g, &d);
            if !(slope < 0.0) {
                // not a descent direction: restart from scaled steepest descent
                s_hist.clear();
                y_hist.clear();
                d = self.two_loop(&g, &s_hist, &y_hist).iter().map(|v| -v).collect();
                slope = dot(&g, &d);
            }

            let mut t = 1.0;
            let mut accepted = None;
            for _ in 0..optim::MAX_BACKTRACK {
                if n_evals >= self.max_evals {
                    break;
                }
                let xn: Vec<f64> = x.iter().zip(&d).map(|(xi, di)| xi + t * di).collect();
                let (fn_, gn) = objective.value_and_grad(&xn)?;
                n_evals += 1;
                if fn_.is_finite() && fn_ <= fx + optim::ARMIJO_C1 * t * slope {
                    accepted = Some((xn, fn_, gn));
                    break;
                }
                t *= 0.5;
            }
            let Some((xn, fn_, gn)) = accepted else {
                message = if n_evals >= self.max_evals {
                    "evaluation limit reached".into()
                } else {
                    "line search failed".into()
                };
                break;
            };

            let s: Vec<f64> = xn.iter().zip(&x).map(|(a, b)| a - b).collect();
            let y: Vec<f64> = gn.iter().zip(&g).map(|(a, b)| a - b).collect();
            if dot(&s, &y) > CURVATURE_EPS {
                if s_hist.len() == self.history_size {
                    s_hist.pop_front();
                    y_hist.pop_front();
                }
                s_hist.push_back(s);
                y_hist.push_back(y);
            }

            let rel = (fx - fn_).abs() / fx.abs().max(fn_.abs()).max(1.0);
            x = xn;
            fx = fn_;
            g = gn;
            history.push(fx);
            iterations += 1;
            trace!("l-bfgs iter {}: f = {:.12}, |g|inf = {:.3e}, t = {}", iterations, fx, inf_norm(&g), t);

            if rel <= self.ftol {
                converged = true;
                message = "relative energy change below tolerance".into();
                break;
            }
        }

        debug!("l-bfgs finished after {} iterations: {}", iterations, message);
        Ok(OptimizeResult {
            x,
            fun: fx,
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
