//! Noise model for the noisy engines
//!
//! Gantree: L3_Noise → NoiseModel
//!
//! Gate errors are symmetric depolarizing channels inserted after each gate;
//! readout error is a symmetric bit flip applied to every measured bit.

use crate::channel::Channel;
use hea_core::error::{HeaError, HeaResult};
use hea_core::gate::Gate;
use hea_core::sim;
use hea_core::types::Probability;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gate and readout error rates
/// Gantree: NoiseModel // 게이트/측정 노이즈
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseModel {
    /// Single-qubit depolarizing probability
    /// Gantree: gate_error_1q: f64 // 1Q 에러
    gate_error_1q: f64,

    /// Two-qubit depolarizing probability
    /// Gantree: gate_error_2q: f64 // 2Q 에러
    gate_error_2q: f64,

    /// Readout bit-flip probability
    /// Gantree: readout_error: f64 // 측정 에러
    readout_error: f64,
}

impl NoiseModel {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a new noise model with validation
    /// Gantree: new(e1, e2, ro) -> Result<Self> // 생성+검증
    pub fn new(gate_error_1q: f64, gate_error_2q: f64, readout_error: f64) -> HeaResult<Self> {
        let model = Self {
            gate_error_1q,
            gate_error_2q,
            readout_error,
        };
        model.validate()?;
        Ok(model)
    }

    /// Noiseless model
    /// Gantree: ideal() -> Self // 이상적
    pub fn ideal() -> Self {
        Self {
            gate_error_1q: 0.0,
            gate_error_2q: 0.0,
            readout_error: 0.0,
        }
    }

    /// Two-qubit depolarizing error `p` after every entangling gate
    /// Gantree: from_depol(p) -> Result<Self> // depol 기반
    pub fn from_depol(p_depol: f64) -> HeaResult<Self> {
        if !(0.0..=sim::MAX_DEPOL_2Q).contains(&p_depol) {
            return Err(HeaError::InvalidNoiseLevel(p_depol, sim::MAX_DEPOL_2Q));
        }
        Ok(Self {
            gate_error_2q: p_depol,
            ..Self::ideal()
        })
    }

    /// Read from JSON (validated)
    pub fn from_json(json: &str) -> HeaResult<Self> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> HeaResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set single-qubit gate error
    pub fn with_gate_error_1q(mut self, error: f64) -> Self {
        self.gate_error_1q = error;
        self
    }

    /// Set two-qubit gate error
    pub fn with_gate_error_2q(mut self, error: f64) -> Self {
        self.gate_error_2q = error;
        self
    }

    /// Set readout error
    pub fn with_readout_error(mut self, error: f64) -> Self {
        self.readout_error = error;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get single-qubit gate error rate
    pub fn gate_error_1q(&self) -> f64 {
        self.gate_error_1q
    }

    /// Get two-qubit gate error rate
    pub fn gate_error_2q(&self) -> f64 {
        self.gate_error_2q
    }

    /// Get readout error rate
    pub fn readout_error(&self) -> f64 {
        self.readout_error
    }

    /// Check for a model that changes nothing
    pub fn is_ideal(&self) -> bool {
        !self.has_gate_noise() && self.readout_error == 0.0
    }

    /// Check for any depolarizing gate error
    pub fn has_gate_noise(&self) -> bool {
        self.gate_error_1q > 0.0 || self.gate_error_2q > 0.0
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate error rates
    /// Gantree: validate(&self) -> Result // 범위 검증
    pub fn validate(&self) -> HeaResult<()> {
        if !(0.0..=sim::MAX_DEPOL_1Q).contains(&self.gate_error_1q) {
            return Err(HeaError::InvalidNoiseLevel(self.gate_error_1q, sim::MAX_DEPOL_1Q));
        }
        if !(0.0..=sim::MAX_DEPOL_2Q).contains(&self.gate_error_2q) {
            return Err(HeaError::InvalidNoiseLevel(self.gate_error_2q, sim::MAX_DEPOL_2Q));
        }
        Probability::new(self.readout_error)?;
        Ok(())
    }

    // ========================================================================
    // Channels
    // ========================================================================

    /// Error channels that follow `gate`
    /// Gantree: channels_after(gate) -> Vec<Channel> // 게이트 후 채널
    pub fn channels_after(&self, gate: &Gate) -> Vec<Channel> {
        let p = if gate.is_two_qubit() {
            self.gate_error_2q
        } else {
            self.gate_error_1q
        };
        if p > 0.0 {
            vec![Channel::Depolarizing {
                qubits: gate.qubits(),
                p,
            }]
        } else {
            Vec::new()
        }
    }

    /// Factor by which readout error shrinks `<P>` for a string of `weight`
    /// measured factors
    pub fn readout_attenuation(&self, weight: usize) -> f64 {
        (1.0 - 2.0 * self.readout_error).powi(weight as i32)
    }
}

impl Default for NoiseModel {
    /// Two-qubit depolarizing error after each entangling gate
    fn default() -> Self {
        Self {
            gate_error_2q: sim::DEFAULT_DEPOL_2Q,
            ..Self::ideal()
        }
    }
}

impl fmt::Display for NoiseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NoiseModel(1Q={:.4}, 2Q={:.4}, RO={:.4})",
            self.gate_error_1q, self.gate_error_2q, self.readout_error
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_noise_model_new() {
        let model = NoiseModel::new(0.001, 0.01, 0.02).unwrap();
        assert_eq!(model.gate_error_1q(), 0.001);
        assert_eq!(model.readout_error(), 0.02);
        assert!(!model.is_ideal());
    }

    #[test]
    fn test_noise_model_ideal() {
        let model = NoiseModel::ideal();
        assert!(model.is_ideal());
        assert!(model.channels_after(&Gate::Cnot(0, 1)).is_empty());
    }

    #[test]
    fn test_default_is_two_qubit_depolarizing() {
        let model = NoiseModel::default();
        assert_eq!(model.gate_error_2q(), 0.02);
        assert_eq!(model.gate_error_1q(), 0.0);
        assert!(model.channels_after(&Gate::Ry(0, 0.3)).is_empty());
        assert_eq!(
            model.channels_after(&Gate::Cnot(2, 1)),
            vec![Channel::Depolarizing {
                qubits: vec![2, 1],
                p: 0.02
            }]
        );
    }

    #[test]
    fn test_from_depol_bounds() {
        assert!(NoiseModel::from_depol(0.05).is_ok());
        assert!(matches!(
            NoiseModel::from_depol(0.95),
            Err(HeaError::InvalidNoiseLevel(..))
        ));
        assert!(NoiseModel::from_depol(-0.1).is_err());
    }

    #[test]
    fn test_validation() {
        assert!(NoiseModel::new(0.8, 0.0, 0.0).is_err());
        assert!(matches!(
            NoiseModel::new(0.0, 0.0, 1.5),
            Err(HeaError::InvalidProbability(_))
        ));
        let bad = NoiseModel::ideal().with_gate_error_2q(f64::NAN);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let model = NoiseModel::default().with_readout_error(0.01);
        let back = NoiseModel::from_json(&model.to_json().unwrap()).unwrap();
        assert_eq!(model, back);
        let bad = r#"{"gate_error_1q":0.0,"gate_error_2q":2.0,"readout_error":0.0}"#;
        assert!(NoiseModel::from_json(bad).is_err());
    }

    #[test]
    fn test_readout_attenuation() {
        let model = NoiseModel::ideal().with_readout_error(0.1);
        assert_abs_diff_eq!(model.readout_attenuation(2), 0.64, epsilon = 1e-12);
        assert_eq!(NoiseModel::ideal().readout_attenuation(5), 1.0);
    }

    #[test]
    fn test_readout_error_must_be_a_probability() {
        for bad in [-0.01, 1.01, f64::NAN] {
            let model = NoiseModel::ideal().with_readout_error(bad);
            assert!(matches!(model.validate(), Err(HeaError::InvalidProbability(_))));
        }
        assert!(NoiseModel::ideal().with_readout_error(1.0).validate().is_ok());
    }
}
