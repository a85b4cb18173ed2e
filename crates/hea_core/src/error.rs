//! Error types for HEA
//!
//! Gantree: L0_Foundation → Errors
//!
//! Configuration errors are raised eagerly (at construction or before a
//! kernel run); numerical shortfalls such as shot noise are never errors.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use thiserror::Error;

/// Main error type for HEA
/// Gantree: HeaError // enum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HeaError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Unknown fermion-to-qubit encoding
    /// Gantree: InvalidMapping(String) // 매핑 이름
    #[error("Invalid mapping '{0}': expected one of jordan-wigner, parity, bravyi-kitaev")]
    InvalidMapping(String),

    /// Unparseable option string for a named configuration field
    #[error("Unknown {field} '{value}'")]
    UnknownOption { field: &'static str, value: String },

    /// Engine / backend / gradient combination that cannot be computed
    /// Gantree: IncompatibleConfiguration{{field,value,reason}} // 조합 오류
    #[error("Incompatible configuration: {field} = '{value}' ({reason})")]
    IncompatibleConfiguration {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// Invalid value for a configuration field
    #[error("Invalid configuration: {field} ({reason})")]
    InvalidConfig { field: &'static str, reason: String },

    // ========================================================================
    // Shape Errors
    // ========================================================================
    /// Vector / tensor length mismatch
    /// Gantree: ShapeMismatch{{what,expected,actual}} // 길이 불일치
    #[error("Shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Hamiltonian and ansatz act on different qubit counts
    #[error("Qubit count mismatch: Hamiltonian acts on {hamiltonian} qubits, circuit on {circuit}")]
    QubitCountMismatch { hamiltonian: usize, circuit: usize },

    // ========================================================================
    // State Errors
    // ========================================================================
    /// Result requested before an optimization run
    /// Gantree: NotConverged(String) // 미수렴
    #[error("Not converged: {0} requested before kernel()")]
    NotConverged(String),

    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// Probability value out of range [0, 1]
    #[error("Invalid probability {0}: must be in range [0, 1]")]
    InvalidProbability(f64),

    /// Invalid depolarizing noise level
    #[error("Invalid noise level {0}: must be in range [0, {1}]")]
    InvalidNoiseLevel(f64, f64),

    /// Electron count inconsistent with the orbital space
    #[error("Invalid electron count: {0}")]
    InvalidElectronCount(String),

    /// Malformed integral data
    #[error("Invalid integrals: {0}")]
    InvalidIntegrals(String),

    /// Qubit index out of range
    #[error("Qubit {qubit} out of range: max is {max}")]
    QubitOutOfRange { qubit: usize, max: usize },

    /// Gate on non-existent qubit
    #[error("Gate references qubit {qubit} but circuit has only {num_qubits} qubits")]
    GateQubitMismatch { qubit: usize, num_qubits: usize },

    /// Register too large for dense simulation
    #[error("Too many qubits for {engine}: {qubits} > {max}")]
    TooManyQubits {
        engine: &'static str,
        qubits: usize,
        max: usize,
    },

    /// Operator expected to be Hermitian has a complex coefficient
    #[error("Operator is not Hermitian: term {term} has imaginary part {imag:.3e}")]
    NonHermitian { term: String, imag: f64 },

    // ========================================================================
    // Optimization Errors
    // ========================================================================
    /// Objective returned a non-finite value or the optimizer broke down
    #[error("Optimization failed: {0}")]
    OptimizationFailed(String),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// File I/O error
    #[error("File error: {0}")]
    FileError(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type alias for HEA operations
/// Gantree: HeaResult<T> // type alias
pub type HeaResult<T> = Result<T, HeaError>;

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for HeaError {
    fn from(err: serde_json::Error) -> Self {
        HeaError::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for HeaError {
    fn from(err: std::io::Error) -> Self {
        HeaError::FileError(err.to_string())
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl HeaError {
    /// Shorthand for an unknown option string
    pub fn unknown(field: &'static str, value: impl Into<String>) -> Self {
        HeaError::UnknownOption {
            field,
            value: value.into(),
        }
    }

    /// Shorthand for an incompatible configuration
    pub fn incompatible(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        HeaError::IncompatibleConfiguration {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Check if error stems from solver configuration
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            HeaError::InvalidMapping(_)
                | HeaError::UnknownOption { .. }
                | HeaError::IncompatibleConfiguration { .. }
                | HeaError::InvalidConfig { .. }
        )
    }

    /// Check if error is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            HeaError::ShapeMismatch { .. }
                | HeaError::QubitCountMismatch { .. }
                | HeaError::InvalidProbability(_)
                | HeaError::InvalidNoiseLevel(..)
                | HeaError::InvalidElectronCount(_)
                | HeaError::InvalidIntegrals(_)
                | HeaError::QubitOutOfRange { .. }
                | HeaError::GateQubitMismatch { .. }
        )
    }

    /// Name of the configuration field at fault, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            HeaError::InvalidMapping(_) => Some("mapping"),
            HeaError::UnknownOption { field, .. }
            | HeaError::IncompatibleConfiguration { field, .. }
            | HeaError::InvalidConfig { field, .. } => Some(field),
            HeaError::ShapeMismatch { what, .. } => Some(what),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_mapping_display() {
        let err = HeaError::InvalidMapping("gray-code".into());
        assert!(err.to_string().contains("gray-code"));
        assert_eq!(err.field(), Some("mapping"));
    }

    #[test]
    fn test_incompatible_names_field() {
        let err = HeaError::incompatible("grad", "autodiff", "numpy backend is not differentiable");
        let msg = err.to_string();
        assert!(msg.contains("grad"));
        assert!(msg.contains("autodiff"));
        assert!(err.is_configuration_error());
        assert_eq!(err.field(), Some("grad"));
    }

    #[test]
    fn test_shape_mismatch() {
        let err = HeaError::ShapeMismatch {
            what: "init_guess",
            expected: 8,
            actual: 6,
        };
        assert!(err.to_string().contains("init_guess"));
        assert!(err.is_validation_error());
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn test_not_converged() {
        let err = HeaError::NotConverged("rdm1".into());
        assert!(err.to_string().contains("rdm1"));
        assert_eq!(err.field(), None);
    }
}
