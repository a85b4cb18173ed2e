//! # HEA Backend
//!
//! Simulation engines that turn a bound circuit and a qubit Hamiltonian
//! into an energy, and (where possible) its gradient.
//!
//! ## Gantree Architecture
//!
//! ```text
//! hea_backend // L4: Backend
//!     Engine // tensornetwork | -noise | -shot | -noise&shot
//!     NumericBackend // numpy | jax
//!     QuantumState // 상태 trait
//!         StateVector // 순수 상태
//!         DensityMatrix // 혼합 상태, U ⊗ U*
//!     Sampler // QWC 그룹 측정, 판독 오류
//!     Adjoint // 역전파 기울기
//!     SimulatorBackend // 엔진 디스패치
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use hea_backend::prelude::*;
//! use hea_core::prelude::*;
//!
//! let circuit = Circuit::from_gates(2, vec![Gate::H(0), Gate::Cnot(0, 1)]).unwrap();
//! let zz = QubitOperator::from("Z0 Z1".parse::<PauliString>().unwrap());
//!
//! let mut exact = SimulatorBackend::new(Engine::TensorNetwork);
//! assert!((exact.expectation(&circuit, &zz).unwrap() - 1.0).abs() < 1e-12);
//!
//! // 2% two-qubit depolarizing after the CNOT
//! let mut noisy = SimulatorBackend::new(Engine::TensorNetworkNoise);
//! assert!(noisy.expectation(&circuit, &zz).unwrap() < 1.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Engine and numeric backend selection (Gantree: L4_Backend → Engine)
pub mod engine;

/// Common state interface (Gantree: L4_Backend → QuantumState)
pub mod state;

/// Statevector simulation (Gantree: L4_Backend → StateVector)
pub mod statevector;

/// Density-matrix simulation (Gantree: L4_Backend → DensityMatrix)
pub mod density;

/// Finite-shot measurement (Gantree: L4_Backend → Sampler)
pub mod sampler;

/// Reverse-mode gradients (Gantree: L4_Backend → Adjoint)
pub mod adjoint;

/// Simulator backend (Gantree: L4_Backend → SimulatorBackend)
pub mod simulator;

// ============================================================================
// Re-exports
// ============================================================================

pub use density::DensityMatrix;
pub use engine::{check_autodiff, Engine, NumericBackend};
pub use sampler::MeasurementResult;
pub use simulator::{Backend, SimulatorBackend};
pub use state::QuantumState;
pub use statevector::StateVector;

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases

    pub use crate::density::DensityMatrix;
    pub use crate::engine::{check_autodiff, Engine, NumericBackend};
    pub use crate::sampler::MeasurementResult;
    pub use crate::simulator::{Backend, SimulatorBackend};
    pub use crate::state::QuantumState;
    pub use crate::statevector::StateVector;
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use approx::assert_abs_diff_eq;
    use hea_core::prelude::*;
    use hea_noise::NoiseModel;

    /// Two-qubit Hamiltonian with every Pauli type present
    fn hamiltonian() -> QubitOperator {
        let c = |x: f64| Complex64::new(x, 0.0);
        QubitOperator::from(vec![
            (PauliString::identity(), c(-0.5)),
            ("Z0".parse().unwrap(), c(0.3)),
            ("Z1".parse().unwrap(), c(-0.3)),
            ("Z0 Z1".parse().unwrap(), c(0.2)),
            ("X0 X1".parse().unwrap(), c(0.18)),
            ("Y0 Y1".parse().unwrap(), c(0.18)),
        ])
    }

    fn ansatz() -> ParamCircuit {
        ParamCircuitBuilder::new(2)
            .ry_layer()
            .cnot_chain()
            .ry_layer()
            .build()
            .unwrap()
    }

    #[test]
    fn test_engines_agree_on_ideal_circuit() {
        let pc = ansatz();
        let circuit = pc.bind(&[0.3, -0.2, 1.1, 0.4]).unwrap().circuit;
        let h = hamiltonian();
        let exact = SimulatorBackend::new(Engine::TensorNetwork)
            .expectation(&circuit, &h)
            .unwrap();
        let dm = SimulatorBackend::new(Engine::TensorNetworkNoise)
            .with_noise(NoiseModel::ideal())
            .expectation(&circuit, &h)
            .unwrap();
        assert_abs_diff_eq!(exact, dm, epsilon = 1e-12);

        let mut shot = SimulatorBackend::new(Engine::TensorNetworkShot)
            .with_shots(50_000)
            .with_seed(9);
        let est = shot.expectation(&circuit, &h).unwrap();
        assert!((est - exact).abs() < 0.02, "shot {} vs exact {}", est, exact);
    }

    #[test]
    fn test_shot_error_shrinks_with_shots() {
        let circuit = ansatz().bind(&[0.7, 0.1, -0.5, 0.9]).unwrap().circuit;
        let h = hamiltonian();
        let exact = SimulatorBackend::ideal().expectation(&circuit, &h).unwrap();
        let spread = |shots: u64| {
            let mut b = SimulatorBackend::new(Engine::TensorNetworkShot)
                .with_shots(shots)
                .with_seed(21);
            let errs: Vec<f64> = (0..20)
                .map(|_| (b.expectation(&circuit, &h).unwrap() - exact).powi(2))
                .collect();
            (errs.iter().sum::<f64>() / errs.len() as f64).sqrt()
        };
        assert!(spread(16_000) < spread(100));
    }

    #[test]
    fn test_noise_biases_energy() {
        let circuit = ansatz().bind(&[0.3, -0.2, 1.1, 0.4]).unwrap().circuit;
        let zz = QubitOperator::from("Z0 Z1".parse::<PauliString>().unwrap());
        let exact = SimulatorBackend::ideal().expectation(&circuit, &zz).unwrap();
        let noisy = SimulatorBackend::new(Engine::TensorNetworkNoise)
            .with_noise(NoiseModel::from_depol(0.1).unwrap())
            .expectation(&circuit, &zz)
            .unwrap();
        // a single two-qubit channel scales <ZZ> by 1 - 16p/15
        assert_abs_diff_eq!(noisy, exact * (1.0 - 16.0 * 0.1 / 15.0), epsilon = 1e-12);
    }

    #[test]
    fn test_adjoint_matches_parameter_shift() {
        let pc = ansatz();
        let h = hamiltonian();
        let x = [0.2, 0.9, -0.4, 1.3];
        let backend = SimulatorBackend::ideal().with_numeric_backend(NumericBackend::Jax);
        let grad = backend
            .gradient(&pc.bind(&x).unwrap(), pc.num_params(), &h)
            .unwrap();
        let mut b = backend.clone();
        for i in 0..x.len() {
            let mut xp = x;
            let mut xm = x;
            xp[i] += hea_core::optim::PARAMETER_SHIFT;
            xm[i] -= hea_core::optim::PARAMETER_SHIFT;
            let ep = b.expectation(&pc.bind(&xp).unwrap().circuit, &h).unwrap();
            let em = b.expectation(&pc.bind(&xm).unwrap().circuit, &h).unwrap();
            assert_abs_diff_eq!(grad[i], 0.5 * (ep - em), epsilon = 1e-10);
        }
    }

    #[test]
    fn test_batch_expectation() {
        let pc = ansatz();
        let circuits: Vec<Circuit> = (0..4)
            .map(|i| pc.bind(&[0.1 * i as f64, 0.2, 0.3, 0.4]).unwrap().circuit)
            .collect();
        let mut backend = SimulatorBackend::ideal();
        let values = backend.expectation_batch(&circuits, &hamiltonian()).unwrap();
        assert_eq!(values.len(), 4);
        assert_eq!(backend.name(), "hea_simulator");
    }
}
