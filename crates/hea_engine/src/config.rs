//! Solver configuration
//!
//! Gantree: L6_Engine → SolverConfig
//!
//! Engine, numeric backend and gradient method are parsed once into closed
//! enums and checked together, so an unsupported combination fails before
//! any circuit is simulated.

use hea_backend::{Engine, NumericBackend, SimulatorBackend};
use hea_core::error::{HeaError, HeaResult};
use hea_core::sim;
use hea_noise::NoiseModel;
use hea_optim::{OptimizerConfig, OptimizerKind};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ChaCha stream used for initial guesses
pub const GUESS_STREAM: u64 = 1;

// ============================================================================
// Gradient Method
// ============================================================================

/// How the energy gradient is obtained
/// Gantree: GradMethod // param-shift | autodiff | free
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradMethod {
    /// Two shifted evaluations per rotation
    #[default]
    ParamShift,
    /// Reverse-mode differentiation through the simulator
    Autodiff,
    /// No gradient; derivative-free optimizer
    Free,
}

impl GradMethod {
    /// All gradient methods
    pub const ALL: [GradMethod; 3] = [GradMethod::ParamShift, GradMethod::Autodiff, GradMethod::Free];

    /// Configuration string
    pub fn name(&self) -> &'static str {
        match self {
            GradMethod::ParamShift => "param-shift",
            GradMethod::Autodiff => "autodiff",
            GradMethod::Free => "free",
        }
    }

    /// Check if the objective provides a gradient
    pub fn uses_gradient(&self) -> bool {
        !matches!(self, GradMethod::Free)
    }
}

impl FromStr for GradMethod {
    type Err = HeaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "param-shift" | "parameter-shift" => Ok(GradMethod::ParamShift),
            "autodiff" => Ok(GradMethod::Autodiff),
            "free" => Ok(GradMethod::Free),
            _ => Err(HeaError::unknown("grad", s)),
        }
    }
}

impl fmt::Display for GradMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Solver Config
// ============================================================================

/// Everything that decides how an energy is evaluated and minimized
/// Gantree: SolverConfig // 통합 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Execution engine
    pub engine: Engine,

    /// Numeric backend
    pub backend: NumericBackend,

    /// Gradient method
    pub grad: GradMethod,

    /// Shots per measured group (sampled engines)
    pub shots: u64,

    /// Noise model (noisy engines)
    pub noise: NoiseModel,

    /// Optimizer override; `None` picks one from `grad` and `engine`
    #[serde(default)]
    pub optimizer: Option<OptimizerConfig>,

    /// Seed for initial guesses and shot sampling
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            engine: Engine::default(),
            backend: NumericBackend::default(),
            grad: GradMethod::default(),
            shots: sim::DEFAULT_SHOTS as u64,
            noise: NoiseModel::default(),
            optimizer: None,
            seed: None,
        }
    }
}

impl SolverConfig {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Parse the three option strings and validate the combination
    /// Gantree: from_names(engine, backend, grad) -> Result<Self> // 문자열 설정
    pub fn from_names(engine: &str, backend: &str, grad: &str) -> HeaResult<Self> {
        let config = Self {
            engine: engine.parse()?,
            backend: backend.parse()?,
            grad: grad.parse()?,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from JSON string
    pub fn from_json(json: &str) -> HeaResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> HeaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set the engine
    pub fn with_engine(mut self, engine: Engine) -> Self {
        self.engine = engine;
        self
    }

    /// Set the numeric backend
    pub fn with_backend(mut self, backend: NumericBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Set the gradient method
    pub fn with_grad(mut self, grad: GradMethod) -> Self {
        self.grad = grad;
        self
    }

    /// Set shots per measured group
    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = shots;
        self
    }

    /// Set the noise model
    pub fn with_noise(mut self, noise: NoiseModel) -> Self {
        self.noise = noise;
        self
    }

    /// Override the optimizer
    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = Some(optimizer);
        self
    }

    /// Fix the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Reject combinations that cannot be computed
    /// Gantree: validate() -> Result<()> // 조합 검증
    pub fn validate(&self) -> HeaResult<()> {
        if self.grad == GradMethod::Autodiff {
            if !self.backend.is_differentiable() {
                return Err(HeaError::incompatible(
                    "grad",
                    self.grad.name(),
                    format!("backend '{}' is not differentiable; use jax", self.backend),
                ));
            }
            if !self.engine.supports_autodiff() {
                return Err(HeaError::incompatible(
                    "grad",
                    self.grad.name(),
                    format!("engine '{}' samples shots and cannot be differentiated", self.engine),
                ));
            }
        }
        if self.engine.is_sampled() && self.shots == 0 {
            return Err(HeaError::InvalidConfig {
                field: "shots",
                reason: format!("engine '{}' needs at least one shot", self.engine),
            });
        }
        self.noise.validate()?;
        if let Some(opt) = &self.optimizer {
            opt.validate()?;
            if opt.kind.uses_gradient() && !self.grad.uses_gradient() {
                return Err(HeaError::incompatible(
                    "optimizer",
                    opt.kind.name(),
                    "gradient method 'free' provides no gradient",
                ));
            }
        }
        Ok(())
    }

    // ========================================================================
    // Derived Settings
    // ========================================================================

    /// Optimizer to run: the override, or the default for `grad` and `engine`
    /// Gantree: optimizer_config() -> OptimizerConfig // 최적화기 선택
    pub fn optimizer_config(&self) -> OptimizerConfig {
        if let Some(opt) = &self.optimizer {
            return opt.clone();
        }
        let kind = match (self.grad.uses_gradient(), self.engine.is_sampled()) {
            (false, _) => OptimizerKind::NelderMead,
            (true, false) => OptimizerKind::Lbfgs,
            (true, true) => OptimizerKind::Adam,
        };
        OptimizerConfig::for_kind(kind)
    }

    /// Simulator for this configuration
    /// Gantree: simulator() -> SimulatorBackend // 백엔드 생성
    pub fn simulator(&self) -> SimulatorBackend {
        let backend = SimulatorBackend::new(self.engine)
            .with_numeric_backend(self.backend)
            .with_noise(self.noise)
            .with_shots(self.shots);
        match self.seed {
            Some(seed) => backend.with_seed(seed),
            None => backend,
        }
    }

    /// Generator for initial guesses
    ///
    /// Reads stream [`GUESS_STREAM`] of the seed; the shot sampler reads stream 0.
    pub fn guess_rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rng.set_stream(GUESS_STREAM);
                rng
            }
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

impl fmt::Display for SolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "engine={}, backend={}, grad={}",
            self.engine, self.backend, self.grad
        )?;
        if self.engine.is_sampled() {
            write!(f, ", shots={}", self.shots)?;
        }
        if self.engine.is_noisy() {
            write!(f, ", noise=[{}]", self.noise)?;
        }
        write!(f, ", optimizer={}", self.optimizer_config())
    }
}

// ============================================================================
// Tests
// ============================================================================
