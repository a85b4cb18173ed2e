//! Optimizer configuration
//!
//! Gantree: L5_Optim → OptimizerConfig
//!
//! One flat configuration for every optimizer; each algorithm reads the
//! fields that concern it. Presets carry the per-algorithm defaults.

use hea_core::error::{HeaError, HeaResult};
use hea_core::optim;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Optimizer Kind
// ============================================================================

/// Optimization algorithm
/// Gantree: OptimizerKind // l-bfgs | adam | nelder-mead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptimizerKind {
    /// Limited-memory BFGS with Armijo backtracking
    #[serde(rename = "l-bfgs")]
    Lbfgs,
    /// Adam stochastic gradient descent
    #[serde(rename = "adam")]
    Adam,
    /// Derivative-free downhill simplex
    #[serde(rename = "nelder-mead")]
    NelderMead,
}

impl OptimizerKind {
    /// Configuration string
    pub fn name(&self) -> &'static str {
        match self {
            OptimizerKind::Lbfgs => "l-bfgs",
            OptimizerKind::Adam => "adam",
            OptimizerKind::NelderMead => "nelder-mead",
        }
    }

    /// Check if the algorithm consumes gradients
    pub fn uses_gradient(&self) -> bool {
        !matches!(self, OptimizerKind::NelderMead)
    }
}

impl FromStr for OptimizerKind {
    type Err = HeaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "l-bfgs" | "lbfgs" | "l-bfgs-b" => Ok(OptimizerKind::Lbfgs),
            "adam" => Ok(OptimizerKind::Adam),
            "nelder-mead" | "neldermead" => Ok(OptimizerKind::NelderMead),
            _ => Err(HeaError::unknown("optimizer", s)),
        }
    }
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Optimizer Config
// ============================================================================

/// Optimizer settings
/// Gantree: OptimizerConfig // 최적화 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Algorithm
    pub kind: OptimizerKind,

    /// Iteration cap
    pub max_iter: usize,

    /// Objective-evaluation cap; `None` means the algorithm's default
    pub max_evals: Option<usize>,

    // ========================================================================
    // L-BFGS
    // ========================================================================
    /// ∞-norm gradient tolerance
    pub gtol: f64,

    /// Relative function-change tolerance
    pub ftol: f64,

    /// Number of stored curvature pairs
    pub history_size: usize,

    // ========================================================================
    // Adam
    // ========================================================================
    /// Step size
    pub learning_rate: f64,

    /// First-moment decay
    pub beta1: f64,

    /// Second-moment decay
    pub beta2: f64,

    /// Denominator guard
    pub epsilon: f64,

    /// Early-stop window (recent energies)
    pub window: usize,

    /// Relative spread of the window that counts as converged
    pub window_threshold: f64,

    // ========================================================================
    // Nelder-Mead
    // ========================================================================
    /// Initial simplex edge
    pub initial_step: f64,

    /// Simplex-size tolerance
    pub xatol: f64,

    /// Function-spread tolerance
    pub fatol: f64,
}

impl OptimizerConfig {
    // ========================================================================
    // Presets
    // ========================================================================

    fn base(kind: OptimizerKind, max_iter: usize) -> Self {
        Self {
            kind,
            max_iter,
            max_evals: None,
            gtol: optim::LBFGS_GTOL,
            ftol: optim::LBFGS_FTOL,
            history_size: optim::LBFGS_HISTORY,
            learning_rate: optim::ADAM_LR,
            beta1: optim::ADAM_BETA1,
            beta2: optim::ADAM_BETA2,
            epsilon: optim::ADAM_EPSILON,
            window: optim::CONVERGENCE_WINDOW,
            window_threshold: optim::CONVERGENCE_THRESHOLD,
            initial_step: optim::NM_INITIAL_STEP,
            xatol: optim::NM_XATOL,
            fatol: optim::NM_FATOL,
        }
    }

    /// L-BFGS defaults
    /// Gantree: lbfgs() -> Self // L-BFGS 프리셋
    pub fn lbfgs() -> Self {
        Self::base(OptimizerKind::Lbfgs, optim::LBFGS_MAX_ITER)
    }

    /// Adam defaults
    /// Gantree: adam() -> Self // Adam 프리셋
    pub fn adam() -> Self {
        Self::base(OptimizerKind::Adam, optim::ADAM_MAX_ITER)
    }

    /// Nelder-Mead defaults (the evaluation cap scales with the dimension)
    /// Gantree: nelder_mead() -> Self // 심플렉스 프리셋
    pub fn nelder_mead() -> Self {
        Self::base(OptimizerKind::NelderMead, usize::MAX)
    }

    /// Defaults for `kind`
    pub fn for_kind(kind: OptimizerKind) -> Self {
        match kind {
            OptimizerKind::Lbfgs => Self::lbfgs(),
            OptimizerKind::Adam => Self::adam(),
            OptimizerKind::NelderMead => Self::nelder_mead(),
        }
    }

    /// Parse from JSON and validate
    pub fn from_json(json: &str) -> HeaResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> HeaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set iteration cap
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set evaluation cap
    pub fn with_max_evals(mut self, max_evals: usize) -> Self {
        self.max_evals = Some(max_evals);
        self
    }

    /// Set gradient tolerance
    pub fn with_gtol(mut self, gtol: f64) -> Self {
        self.gtol = gtol;
        self
    }

    /// Set relative function tolerance
    pub fn with_ftol(mut self, ftol: f64) -> Self {
        self.ftol = ftol;
        self
    }

    /// Set Adam step size
    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    /// Set early-stop window
    pub fn with_window(mut self, window: usize, threshold: f64) -> Self {
        self.window = window;
        self.window_threshold = threshold;
        self
    }

    /// Set initial simplex edge
    pub fn with_initial_step(mut self, step: f64) -> Self {
        self.initial_step = step;
        self
    }

    // ========================================================================
    // Derived Values
    // ========================================================================

    /// Evaluation cap for an `n`-parameter problem
    pub fn eval_budget(&self, n: usize) -> usize {
        match (self.max_evals, self.kind) {
            (Some(m), _) => m,
            (None, OptimizerKind::NelderMead) => optim::NM_EVALS_PER_PARAM * n.max(1),
            (None, _) => usize::MAX,
        }
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate configuration
    /// Gantree: validate() -> Result<()> // 설정 검증
    pub fn validate(&self) -> HeaResult<()> {
        let invalid = |field: &'static str, reason: &str| {
            Err(HeaError::InvalidConfig {
                field,
                reason: reason.to_string(),
            })
        };
        if self.max_iter == 0 {
            return invalid("max_iter", "must be positive");
        }
        if self.max_evals == Some(0) {
            return invalid("max_evals", "must be positive");
        }
        if !(self.gtol >= 0.0 && self.ftol >= 0.0 && self.xatol >= 0.0 && self.fatol >= 0.0) {
            return invalid("tolerance", "tolerances must be non-negative");
        }
        if self.history_size == 0 {
            return invalid("history_size", "must be positive");
        }
        if !(self.learning_rate > 0.0) {
            return invalid("learning_rate", "must be positive");
        }
        if !(0.0..1.0).contains(&self.beta1) || !(0.0..1.0).contains(&self.beta2) {
            return invalid("beta", "decay rates must lie in [0, 1)");
        }
        if !(self.epsilon > 0.0) {
            return invalid("epsilon", "must be positive");
        }
        if self.window < 2 {
            return invalid("window", "needs at least two energies");
        }
        if !(self.initial_step > 0.0) {
            return invalid("initial_step", "must be positive");
        }
        Ok(())
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::lbfgs()
    }
}

impl fmt::Display for OptimizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            OptimizerKind::Lbfgs => write!(
                f,
                "l-bfgs(max_iter={}, gtol={:.0e}, m={})",
                self.max_iter, self.gtol, self.history_size
            ),
            OptimizerKind::Adam => write!(
                f,
                "adam(max_iter={}, lr={}, window={})",
                self.max_iter, self.learning_rate, self.window
            ),
            OptimizerKind::NelderMead => write!(
                f,
                "nelder-mead(step={}, xatol={:.0e}, fatol={:.0e})",
                self.initial_step, self.xatol, self.fatol
            ),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
