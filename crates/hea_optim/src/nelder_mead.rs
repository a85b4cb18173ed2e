//! Nelder-Mead downhill simplex
//!
//! Gantree: L5_Optim → NelderMead
//!
//! Reflection 1, expansion 2, contraction 1/2, shrink 1/2. The simplex
//! starts at `x0` plus `initial_step` along each axis. Stops when both the
//! simplex size (`xatol`) and the function spread (`fatol`) are small, or
//! when the evaluation budget runs out.

use crate::config::OptimizerConfig;
use crate::objective::{check_x0, Objective};
use crate::optimizer::Optimizer;
use crate::result::OptimizeResult;
use hea_core::error::HeaResult;
use log::{debug, trace};

/// Nelder-Mead minimizer
/// Gantree: NelderMead // 심플렉스
#[derive(Debug, Clone)]
pub struct NelderMead {
    max_iter: usize,
    max_evals: usize,
    initial_step: f64,
    xatol: f64,
    fatol: f64,
}

/// Objective with a call counter; non-finite values rank last
struct Counted<'a> {
    objective: &'a mut dyn Objective,
    evals: usize,
}

impl Counted<'_> {
    fn eval(&mut self, x: &[f64]) -> HeaResult<f64> {
        self.evals += 1;
        let f = self.objective.value(x)?;
        Ok(if f.is_finite() { f } else { f64::INFINITY })
    }
}

fn lerp(a: &[f64], b: &[f64], t: f64) -> Vec<f64> {
    // a + t (b - a)
    a.iter().zip(b).map(|(ai, bi)| ai + t * (bi - ai)).collect()
}

impl NelderMead {
    /// Build from configuration
    pub fn from_config(config: &OptimizerConfig, num_params: usize) -> Self {
        Self {
            max_iter: config.max_iter,
            max_evals: config.eval_budget(num_params),
            initial_step: config.initial_step,
            xatol: config.xatol,
            fatol: config.fatol,
        }
    }

    fn sort(simplex: &mut [(Vec<f64>, f64)]) {
        simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
    }

    fn is_tight(&self, simplex: &[(Vec<f64>, f64)]) -> bool {
        let (best, f_best) = (&simplex[0].0, simplex[0].1);
        simplex[1..].iter().all(|(x, f)| {
            (f - f_best).abs() <= self.fatol
                && x.iter().zip(best).all(|(a, b)| (a - b).abs() <= self.xatol)
        })
    }
}

impl Optimizer for NelderMead {
    fn name(&self) -> &'static str {
        "nelder-mead"
    }

    /// Gantree: minimize(objective, x0) -> Result<OptimizeResult> // 최소화
    fn minimize(&self, objective: &mut dyn Objective, x0: &[f64]) -> HeaResult<OptimizeResult> {
        check_x0(objective, x0)?;
        let n = x0.len();
        let mut f = Counted { objective, evals: 0 };

        let mut simplex = Vec::with_capacity(n + 1);
        simplex.push((x0.to_vec(), f.eval(x0)?));
        for i in 0..n {
            let mut v = x0.to_vec();
            v[i] += self.initial_step;
            let fv = f.eval(&v)?;
            simplex.push((v, fv));
        }
        Self::sort(&mut simplex);
        let mut history = vec![simplex[0].1];
        if n == 0 {
            let (x, fun) = simplex.swap_remove(0);
            return Ok(OptimizeResult {
                x,
                fun,
                n_iterations: 0,
                n_evaluations: f.evals,
                converged: true,
                message: "no parameters".into(),
                history,
            });
        }

        let mut converged = false;
        let mut message = String::from("evaluation limit reached");
        let mut iterations = 0;

        loop {
            if self.is_tight(&simplex) {
                converged = true;
                message = "simplex below tolerance".into();
                break;
            }
            if f.evals >= self.max_evals {
                break;
            }
            if iterations >= self.max_iter {
                message = "iteration limit reached".into();
                break;
            }

            let mut centroid = vec![0.0; n];
            for (x, _) in &simplex[..n] {
                centroid.iter_mut().zip(x).for_each(|(c, xi)| *c += xi / n as f64);
            }
            let (worst, f_worst) = simplex[n].clone();
            let f_best = simplex[0].1;
            let f_second = simplex[n - 1].1;

            let xr = lerp(&centroid, &worst, -1.0);
            let fr = f.eval(&xr)?;

            let mut shrink = false;
            if fr < f_best {
                let xe = lerp(&centroid, &worst, -2.0);
                let fe = f.eval(&xe)?;
                simplex[n] = if fe < fr { (xe, fe) } else { (xr, fr) };
            } else if fr < f_second {
                simplex[n] = (xr, fr);
            } else if fr < f_worst {
                let xc = lerp(&centroid, &xr, 0.5);
                let fc = f.eval(&xc)?;
                if fc <= fr {
                    simplex[n] = (xc, fc);
                } else {
                    shrink = true;
                }
            } else {
                let xcc = lerp(&centroid, &worst, 0.5);
                let fcc = f.eval(&xcc)?;
                if fcc < f_worst {
                    simplex[n] = (xcc, fcc);
                } else {
                    shrink = true;
                }
            }

            if shrink {
                let best = simplex[0].0.clone();
                for vertex in simplex.iter_mut().skip(1) {
                    let x = lerp(&best, &vertex.0, 0.5);
                    let fx = f.eval(&x)?;
                    *vertex = (x, fx);
                }
            }

            Self::sort(&mut simplex);
            iterations += 1;
            history.push(simplex[0].1);
            trace!("nelder-mead iter {}: f = {:.10}", iterations, simplex[0].1);
        }
        let (x, fun) = simplex.swap_remove(0);
        debug!("nelder-mead finished after {} iterations: {}", iterations, message);
        Ok(OptimizeResult {
            x,
            fun,
            n_iterations: iterations,
            n_evaluations: f.evals,
            converged,
            message,
            history,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
