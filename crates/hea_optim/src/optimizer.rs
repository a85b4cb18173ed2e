//! Optimizer interface and dispatch
//!
//! Gantree: L5_Optim → Optimizer

use crate::adam::Adam;
use crate::config::{OptimizerConfig, OptimizerKind};
use crate::lbfgs::Lbfgs;
use crate::nelder_mead::NelderMead;
use crate::objective::Objective;
use crate::result::OptimizeResult;
use hea_core::error::{HeaError, HeaResult};
use log::info;

/// A local minimizer
/// Gantree: Optimizer // 최적화기 trait
pub trait Optimizer {
    /// Algorithm name
    fn name(&self) -> &'static str;

    /// Minimize `objective` starting from `x0`
    fn minimize(&self, objective: &mut dyn Objective, x0: &[f64]) -> HeaResult<OptimizeResult>;
}

pub(crate) fn check_finite(value: f64, what: &str) -> HeaResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(HeaError::OptimizationFailed(format!("{} is {}", what, value)))
    }
}

/// Optimizer described by `config`, sized for `num_params`
/// Gantree: build_optimizer(config, n) -> Box<dyn Optimizer> // 생성
pub fn build_optimizer(config: &OptimizerConfig, num_params: usize) -> Box<dyn Optimizer> {
    match config.kind {
        OptimizerKind::Lbfgs => Box::new(Lbfgs::from_config(config, num_params)),
        OptimizerKind::Adam => Box::new(Adam::from_config(config)),
        OptimizerKind::NelderMead => Box::new(NelderMead::from_config(config, num_params)),
    }
}

/// Validate `config` and run its optimizer
/// Gantree: minimize(config, objective, x0) -> Result<OptimizeResult> // 최소화 실행
pub fn minimize(
    config: &OptimizerConfig,
    objective: &mut dyn Objective,
    x0: &[f64],
) -> HeaResult<OptimizeResult> {
    config.validate()?;
    if config.kind.uses_gradient() && !objective.has_gradient() {
        return Err(HeaError::incompatible(
            "optimizer",
            config.kind.name(),
            "objective provides no gradient",
        ));
    }
    let optimizer = build_optimizer(config, objective.num_params());
    info!(
        "minimizing {} parameters with {}",
        objective.num_params(),
        config
    );
    let result = optimizer.minimize(objective, x0)?;
    info!("{} done: {}", optimizer.name(), result);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::testing::Quadratic;

    struct ValueOnly(Quadratic);

    impl Objective for ValueOnly {
        fn num_params(&self) -> usize {
            self.0.num_params()
        }
        fn value(&mut self, x: &[f64]) -> HeaResult<f64> {
            self.0.value(x)
        }
        fn value_and_grad(&mut self, x: &[f64]) -> HeaResult<(f64, Vec<f64>)> {
            Ok((self.0.value(x)?, Vec::new()))
        }
        fn has_gradient(&self) -> bool {
            false
        }
    }

    struct Diverging;

    impl Objective for Diverging {
        fn num_params(&self) -> usize {
            1
        }
        fn value(&mut self, _x: &[f64]) -> HeaResult<f64> {
            Ok(f64::NAN)
        }
        fn value_and_grad(&mut self, _x: &[f64]) -> HeaResult<(f64, Vec<f64>)> {
            Ok((f64::NAN, vec![0.0]))
        }
    }

    #[test]
    fn test_dispatch() {
        for config in [
            OptimizerConfig::lbfgs(),
            OptimizerConfig::adam().with_max_iter(1000),
            OptimizerConfig::nelder_mead(),
        ] {
            let mut q = Quadratic::new(vec![0.5, -0.5]);
            let res = minimize(&config, &mut q, &[0.0, 0.0]).unwrap();
            assert!(res.fun < 1e-3, "{}: {}", config.kind, res);
            assert_eq!(build_optimizer(&config, 2).name(), config.kind.name());
        }
    }

    #[test]
    fn test_gradient_required() {
        let mut f = ValueOnly(Quadratic::new(vec![1.0]));
        let err = minimize(&OptimizerConfig::lbfgs(), &mut f, &[0.0]).unwrap_err();
        assert_eq!(err.field(), Some("optimizer"));
        let res = minimize(&OptimizerConfig::nelder_mead(), &mut f, &[0.0]).unwrap();
        assert!(res.fun < 1e-6);
    }

    #[test]
    fn test_non_finite_energy() {
        let err = minimize(&OptimizerConfig::lbfgs(), &mut Diverging, &[0.0]).unwrap_err();
        assert!(matches!(err, HeaError::OptimizationFailed(_)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut q = Quadratic::new(vec![1.0]);
        let config = OptimizerConfig::adam().with_learning_rate(0.0);
        assert!(minimize(&config, &mut q, &[0.0]).is_err());
    }
}
