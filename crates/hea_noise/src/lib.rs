//! # HEA Noise
//!
//! Gate and readout error models for the noisy simulation engines.
//!
//! ## Gantree Architecture
//!
//! ```text
//! hea_noise // L3: Noise Model
//!     NoiseModel // 게이트/측정 노이즈
//!         gate_error_1q, gate_error_2q, readout_error
//!         ideal(), default(), from_depol()
//!         channels_after(), readout_attenuation()
//!     Channel // 노이즈 채널
//!         Depolarizing { qubits, p }
//!         pauli_mixture()
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use hea_noise::prelude::*;
//! use hea_core::Gate;
//!
//! // Default: 2% depolarizing after every two-qubit gate
//! let model = NoiseModel::default();
//! let channels = model.channels_after(&Gate::Cnot(0, 1));
//! assert_eq!(channels.len(), 1);
//! assert!(model.channels_after(&Gate::Ry(0, 0.5)).is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Error channels (Gantree: L3_Noise → Channel)
pub mod channel;

/// Noise model (Gantree: L3_Noise → NoiseModel)
pub mod noise_model;

// ============================================================================
// Re-exports
// ============================================================================

pub use channel::Channel;
pub use noise_model::NoiseModel;

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases

    pub use crate::channel::Channel;
    pub use crate::noise_model::NoiseModel;
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Integration Tests
// ============================================================================
