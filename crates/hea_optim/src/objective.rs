//! Objective functions
//!
//! Gantree: L5_Optim → Objective

use hea_core::error::{HeaError, HeaResult};

/// Scalar function of a parameter vector
///
/// Methods take `&mut self` because sampled objectives advance a random
/// stream on every call.
/// Gantree: Objective // 목적 함수 trait
pub trait Objective {
    /// Length of the parameter vector
    fn num_params(&self) -> usize;

    /// `f(x)`
    fn value(&mut self, x: &[f64]) -> HeaResult<f64>;

    /// `f(x)` and `∇f(x)`
    fn value_and_grad(&mut self, x: &[f64]) -> HeaResult<(f64, Vec<f64>)>;

    /// Check if `value_and_grad` yields a gradient
    fn has_gradient(&self) -> bool {
        true
    }
}

/// Parameter vector must match the objective
pub(crate) fn check_x0(objective: &dyn Objective, x0: &[f64]) -> HeaResult<()> {
    if x0.len() != objective.num_params() {
        return Err(HeaError::ShapeMismatch {
            what: "x0",
            expected: objective.num_params(),
            actual: x0.len(),
        });
    }
    Ok(())
}

// ============================================================================
// Test Functions
// ============================================================================

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// `(1-x)² + 100(y-x²)²`
    pub struct Rosenbrock;

    impl Objective for Rosenbrock {
        fn num_params(&self) -> usize {
            2
        }

        fn value(&mut self, x: &[f64]) -> HeaResult<f64> {
            Ok((1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2))
        }

        fn value_and_grad(&mut self, x: &[f64]) -> HeaResult<(f64, Vec<f64>)> {
            let f = self.value(x)?;
            let t = x[1] - x[0] * x[0];
            let g = vec![-2.0 * (1.0 - x[0]) - 400.0 * x[0] * t, 200.0 * t];
            Ok((f, g))
        }
    }

    /// `Σ w_i (x_i - c_i)²`, counting calls
    pub struct Quadratic {
        pub center: Vec<f64>,
        pub weights: Vec<f64>,
        pub calls: usize,
    }

    impl Quadratic {
        pub fn new(center: Vec<f64>) -> Self {
            let weights = (1..=center.len()).map(|i| i as f64).collect();
            Self {
                center,
                weights,
                calls: 0,
            }
        }
    }

    impl Objective for Quadratic {
        fn num_params(&self) -> usize {
            self.center.len()
        }

        fn value(&mut self, x: &[f64]) -> HeaResult<f64> {
            self.calls += 1;
            Ok(x.iter()
                .zip(&self.center)
                .zip(&self.weights)
                .map(|((xi, ci), wi)| wi * (xi - ci).powi(2))
                .sum())
        }

        fn value_and_grad(&mut self, x: &[f64]) -> HeaResult<(f64, Vec<f64>)> {
            let f = self.value(x)?;
            let g = x
                .iter()
                .zip(&self.center)
                .zip(&self.weights)
                .map(|((xi, ci), wi)| 2.0 * wi * (xi - ci))
                .collect();
            Ok((f, g))
        }
    }

    /// Quadratic whose value and gradient carry a deterministic jitter
    pub struct NoisyQuadratic {
        pub inner: Quadratic,
        pub amplitude: f64,
        pub step: u64,
    }

    impl NoisyQuadratic {
        fn jitter(&mut self) -> f64 {
            // xorshift64, seeded by `step` (must be nonzero)
            self.step ^= self.step << 13;
            self.step ^= self.step >> 7;
            self.step ^= self.step << 17;
            self.amplitude * ((self.step % 2001) as f64 / 1000.0 - 1.0)
        }
    }

    impl Objective for NoisyQuadratic {
        fn num_params(&self) -> usize {
            self.inner.num_params()
        }

        fn value(&mut self, x: &[f64]) -> HeaResult<f64> {
            let f = self.inner.value(x)?;
            Ok(f + self.jitter())
        }

        fn value_and_grad(&mut self, x: &[f64]) -> HeaResult<(f64, Vec<f64>)> {
            let (f, g) = self.inner.value_and_grad(x)?;
            let f = f + self.jitter();
            let g = g.into_iter().map(|gi| gi + self.jitter()).collect();
            Ok((f, g))
        }
    }

    #[test]
    fn test_rosenbrock_gradient() {
        let (f, g) = Rosenbrock.value_and_grad(&[1.0, 1.0]).unwrap();
        assert_eq!(f, 0.0);
        assert_eq!(g, vec![0.0, 0.0]);
    }

    #[test]
    fn test_check_x0() {
        let q = Quadratic::new(vec![1.0, 2.0]);
        assert!(check_x0(&q, &[0.0, 0.0]).is_ok());
        assert!(matches!(
            check_x0(&q, &[0.0]),
            Err(HeaError::ShapeMismatch { what: "x0", .. })
        ));
    }
}
