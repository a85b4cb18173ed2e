//! Execution engine and numeric backend selection
//!
//! Gantree: L4_Backend → Engine
//!
//! Both are closed enums parsed once from their configuration strings and
//! threaded explicitly through the solver.

use hea_core::error::{HeaError, HeaResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Engine
// ============================================================================

/// How expectation values are computed
/// Gantree: Engine // 실행 엔진
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Engine {
    /// Exact amplitudes, no sampling
    #[default]
    #[serde(rename = "tensornetwork")]
    TensorNetwork,
    /// Exact density matrix with gate and readout noise
    #[serde(rename = "tensornetwork-noise")]
    TensorNetworkNoise,
    /// Finite-shot estimates from the exact state
    #[serde(rename = "tensornetwork-shot")]
    TensorNetworkShot,
    /// Finite-shot estimates from the noisy density matrix
    #[serde(rename = "tensornetwork-noise&shot")]
    TensorNetworkNoiseShot,
}

impl Engine {
    /// All engines
    pub const ALL: [Engine; 4] = [
        Engine::TensorNetwork,
        Engine::TensorNetworkNoise,
        Engine::TensorNetworkShot,
        Engine::TensorNetworkNoiseShot,
    ];

    /// Configuration string
    pub fn name(&self) -> &'static str {
        match self {
            Engine::TensorNetwork => "tensornetwork",
            Engine::TensorNetworkNoise => "tensornetwork-noise",
            Engine::TensorNetworkShot => "tensornetwork-shot",
            Engine::TensorNetworkNoiseShot => "tensornetwork-noise&shot",
        }
    }

    /// Check if gate and readout noise are simulated
    pub fn is_noisy(&self) -> bool {
        matches!(self, Engine::TensorNetworkNoise | Engine::TensorNetworkNoiseShot)
    }

    /// Check if expectations are finite-shot estimates
    pub fn is_sampled(&self) -> bool {
        matches!(self, Engine::TensorNetworkShot | Engine::TensorNetworkNoiseShot)
    }

    /// Check if reverse-mode differentiation through the engine is possible
    /// Gantree: supports_autodiff() -> bool // 자동미분 가능
    pub fn supports_autodiff(&self) -> bool {
        !self.is_sampled()
    }
}

impl FromStr for Engine {
    type Err = HeaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('_', "-");
        Engine::ALL
            .into_iter()
            .find(|e| e.name() == key)
            .ok_or_else(|| HeaError::unknown("engine", s))
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Numeric Backend
// ============================================================================

/// Array backend of the objective
/// Gantree: NumericBackend // numpy | jax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericBackend {
    /// Plain arrays; no reverse-mode differentiation
    #[default]
    Numpy,
    /// Differentiable arrays
    Jax,
}

impl NumericBackend {
    /// Configuration string
    pub fn name(&self) -> &'static str {
        match self {
            NumericBackend::Numpy => "numpy",
            NumericBackend::Jax => "jax",
        }
    }

    /// Check if reverse-mode gradients are available
    pub fn is_differentiable(&self) -> bool {
        matches!(self, NumericBackend::Jax)
    }
}

impl FromStr for NumericBackend {
    type Err = HeaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "numpy" => Ok(NumericBackend::Numpy),
            "jax" => Ok(NumericBackend::Jax),
            _ => Err(HeaError::unknown("backend", s)),
        }
    }
}

impl fmt::Display for NumericBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Reject reverse-mode differentiation where it cannot be computed
/// Gantree: check_autodiff(engine, backend) -> Result<()> // 자동미분 검증
pub fn check_autodiff(engine: Engine, backend: NumericBackend) -> HeaResult<()> {
    if !backend.is_differentiable() {
        return Err(HeaError::incompatible(
            "backend",
            backend.name(),
            "autodiff needs a differentiable backend (jax)",
        ));
    }
    if !engine.supports_autodiff() {
        return Err(HeaError::incompatible(
            "engine",
            engine.name(),
            "autodiff cannot differentiate through shot sampling",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_parse_roundtrip() {
        for e in Engine::ALL {
            assert_eq!(e.name().parse::<Engine>().unwrap(), e);
        }
        assert_eq!(
            "TensorNetwork_Shot".parse::<Engine>().unwrap(),
            Engine::TensorNetworkShot
        );
        let err = "mps".parse::<Engine>().unwrap_err();
        assert_eq!(err.field(), Some("engine"));
    }

    #[test]
    fn test_engine_flags() {
        assert!(!Engine::TensorNetwork.is_noisy());
        assert!(Engine::TensorNetworkNoiseShot.is_noisy());
        assert!(Engine::TensorNetworkNoiseShot.is_sampled());
        assert!(Engine::TensorNetworkNoise.supports_autodiff());
        assert!(!Engine::TensorNetworkShot.supports_autodiff());
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!("JAX".parse::<NumericBackend>().unwrap(), NumericBackend::Jax);
        assert!("torch".parse::<NumericBackend>().is_err());
        assert!(!NumericBackend::Numpy.is_differentiable());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Engine::TensorNetworkNoiseShot).unwrap();
        assert_eq!(json, "\"tensornetwork-noise&shot\"");
        let b: NumericBackend = serde_json::from_str("\"jax\"").unwrap();
        assert_eq!(b, NumericBackend::Jax);
    }

    #[test]
    fn test_check_autodiff() {
        assert!(check_autodiff(Engine::TensorNetwork, NumericBackend::Jax).is_ok());
        assert!(check_autodiff(Engine::TensorNetworkNoise, NumericBackend::Jax).is_ok());
        let err = check_autodiff(Engine::TensorNetwork, NumericBackend::Numpy).unwrap_err();
        assert_eq!(err.field(), Some("backend"));
        let err = check_autodiff(Engine::TensorNetworkShot, NumericBackend::Jax).unwrap_err();
        assert!(err.is_configuration_error());
        assert_eq!(err.field(), Some("engine"));
    }
}
