//! # HEA Engine
//!
//! Variational ground-state solver over a hardware-efficient ansatz.
//!
//! ## Gantree Architecture
//!
//! ```text
//! hea_engine // L6: Engine
//!     SolverConfig // engine × backend × grad 검증
//!         GradMethod // param-shift | autodiff | free
//!         optimizer_config() - 기본 최적화기 선택
//!     Ansatz // ry, real_amplitudes, 외부 회로
//!     EnergyObjective // 에너지 + 기울기
//!     Hea // 솔버
//!         ry() / from_molecule() / new()
//!         kernel() / kernel_restarts()
//!         make_rdm1() / make_rdm2()
//!         summary()
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use hea_engine::prelude::*;
//!
//! let h2 = molecules::h2();
//! let config = SolverConfig::default().with_seed(1);
//! let mut hea = Hea::from_molecule(&h2, 3, Mapping::Parity, config).unwrap();
//!
//! let e = hea.kernel().unwrap();
//! assert!((e - h2.fci_energy).abs() < 1e-3);
//!
//! let rdm1 = hea.make_rdm1().unwrap();
//! assert!((rdm1.diag().sum() - 2.0).abs() < 1e-6);
//! println!("{}", hea.summary());
//! ```
//!
//! ## Engines and Gradients
//!
//! ```rust
//! use hea_engine::prelude::*;
//!
//! // autodiff needs the differentiable backend
//! assert!(SolverConfig::from_names("tensornetwork", "numpy", "autodiff").is_err());
//! let config = SolverConfig::from_names("tensornetwork-noise", "jax", "autodiff").unwrap();
//! assert_eq!(config.optimizer_config().kind, OptimizerKind::Lbfgs);
//!
//! // sampled engines fall back to Adam
//! let shot = SolverConfig::from_names("tensornetwork-shot", "numpy", "param-shift").unwrap();
//! assert_eq!(shot.optimizer_config().kind, OptimizerKind::Adam);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Solver configuration (Gantree: L6_Engine → SolverConfig)
pub mod config;

/// Ansatz families (Gantree: L6_Engine → Ansatz)
pub mod ansatz;

/// Energy objective (Gantree: L6_Engine → EnergyObjective)
pub mod objective;

/// Solver (Gantree: L6_Engine → Hea)
pub mod hea;

// ============================================================================
// Re-exports
// ============================================================================

pub use ansatz::Ansatz;
pub use config::{GradMethod, SolverConfig};
pub use hea::Hea;
pub use objective::EnergyObjective;

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use hea_engine::prelude::*;
    //! ```

    pub use crate::ansatz::Ansatz;
    pub use crate::config::{GradMethod, SolverConfig};
    pub use crate::hea::Hea;
    pub use hea_backend::{Engine, NumericBackend};
    pub use hea_chem::{molecules, ElectronCount, Mapping, MolecularIntegrals, Molecule};
    pub use hea_noise::NoiseModel;
    pub use hea_optim::{OptimizeResult, OptimizerConfig, OptimizerKind};
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
    use hea_chem::{FciResult, FciSolver, QubitMapper};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn fci(mol: &Molecule) -> FciResult {
        FciSolver::new(&mol.integrals, mol.electrons)
            .unwrap()
            .kernel()
            .unwrap()
    }

    fn assert_close_all<'a>(
        a: impl IntoIterator<Item = &'a f64>,
        b: impl IntoIterator<Item = &'a f64>,
        atol: f64,
    ) {
        for (x, y) in a.into_iter().zip(b) {
            assert_abs_diff_eq!(*x, *y, epsilon = atol);
        }
    }

    #[test]
    fn test_h2_three_layers_exact_param_shift() {
        let h2 = molecules::h2();
        let config = SolverConfig::from_names("tensornetwork", "numpy", "param-shift")
            .unwrap()
            .with_seed(2024);
        let mut hea = Hea::from_molecule(&h2, 3, Mapping::Parity, config).unwrap();
        assert_eq!(hea.num_params(), 8);
        let e = hea.kernel().unwrap();
        assert_abs_diff_eq!(e, h2.fci_energy, epsilon = 0.1);
        assert!(e >= h2.fci_energy - 1e-9);
    }

    #[test]
    fn test_engine_backend_grad_matrix() {
        let h2 = molecules::h2();
        for engine in Engine::ALL {
            for backend in [NumericBackend::Jax, NumericBackend::Numpy] {
                for grad in GradMethod::ALL {
                    let config = SolverConfig::default()
                        .with_engine(engine)
                        .with_backend(backend)
                        .with_grad(grad)
                        .with_seed(7);
                    let built = Hea::from_molecule(&h2, 3, Mapping::Parity, config);
                    let incompatible = grad == GradMethod::Autodiff
                        && (!backend.is_differentiable() || engine.is_sampled());
                    if incompatible {
                        let err = built.unwrap_err();
                        assert!(err.is_configuration_error(), "{} {} {}: {}", engine, backend, grad, err);
                        assert_eq!(err.field(), Some("grad"));
                        continue;
                    }
                    let mut hea = built.unwrap();
                    let e = hea.kernel().unwrap();
                    let atol = if engine == Engine::TensorNetworkNoiseShot && grad == GradMethod::Free {
                        0.2
                    } else {
                        0.1
                    };
                    assert!(
                        (e - h2.fci_energy).abs() < atol,
                        "{} / {} / {}: E = {}",
                        engine,
                        backend,
                        grad,
                        e
                    );
                }
            }
        }
    }

    #[test]
    fn test_mappings_reach_the_same_energy() {
        let h2 = molecules::h2();
        for mapping in [Mapping::JordanWigner, Mapping::BravyiKitaev] {
            let config = SolverConfig::default().with_seed(5);
            let mut hea = Hea::from_molecule(&h2, 3, mapping, config).unwrap();
            assert_eq!(hea.n_qubits(), 4);
            let e = hea.kernel_restarts(3).unwrap();
            assert_abs_diff_eq!(e, h2.fci_energy, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_rdms_match_fci() {
        let h2 = molecules::h2();
        let reference = fci(&h2);
        for mapping in [Mapping::JordanWigner, Mapping::Parity, Mapping::BravyiKitaev] {
            let config = SolverConfig::default()
                .with_backend(NumericBackend::Jax)
                .with_grad(GradMethod::Autodiff)
                .with_seed(9);
            let mut hea = Hea::from_molecule(&h2, 3, mapping, config).unwrap();
            let e = hea.kernel_restarts(3).unwrap();
            assert_abs_diff_eq!(e, h2.fci_energy, epsilon = 1e-6);

            let rdm1 = hea.make_rdm1().unwrap();
            let rdm2 = hea.make_rdm2().unwrap();
            assert_close_all(rdm1.iter(), reference.rdm1.iter(), 1e-4);
            assert_close_all(rdm2.iter(), reference.rdm2.iter(), 1e-4);

            let e_rdm = h2.integrals.energy_from_rdms(&rdm1, &rdm2).unwrap();
            assert_abs_diff_eq!(e_rdm, e, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_h3_open_shell_with_restarts() {
        let h3 = molecules::h3_chain();
        let reference = fci(&h3);
        assert_abs_diff_eq!(reference.energy, h3.fci_energy, epsilon = 1e-4);

        let config = SolverConfig::default()
            .with_backend(NumericBackend::Jax)
            .with_grad(GradMethod::Autodiff)
            .with_seed(3);
        let mut hea = Hea::from_molecule(&h3, 6, Mapping::Parity, config).unwrap();
        assert_eq!(hea.n_qubits(), 4);
        let e = hea.kernel_restarts(5).unwrap();
        assert_abs_diff_eq!(e, reference.energy, epsilon = 2e-3);

        let rdm1 = hea.make_rdm1().unwrap();
        let rdm2 = hea.make_rdm2().unwrap();
        assert_close_all(rdm1.iter(), reference.rdm1.iter(), 5e-3);
        assert_close_all(rdm2.iter(), reference.rdm2.iter(), 5e-3);
    }

    #[test]
    fn test_external_real_amplitudes_circuit() {
        let h2 = molecules::h2();
        let mapper = QubitMapper::new(Mapping::Parity, 4, h2.electrons).unwrap();
        let h = mapper.map_hamiltonian(&h2.integrals).unwrap();
        let ansatz = Ansatz::real_amplitudes(2, 3).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let guess: Vec<f64> = (0..ansatz.num_params()).map(|_| rng.gen()).collect();

        let mut hea = Hea::new(h, ansatz, guess, SolverConfig::default().with_seed(42)).unwrap();
        let e = hea.kernel_restarts(3).unwrap();
        assert_abs_diff_eq!(e, h2.fci_energy, epsilon = 1e-5);
        let summary = hea.summary();
        assert!(summary.contains("external"));
        assert!(summary.contains("real_amplitudes(reps=3)"));
    }

    #[test]
    fn test_param_shift_and_autodiff_optimize_alike() {
        let h2 = molecules::h2();
        let mut energies = Vec::new();
        for grad in [GradMethod::ParamShift, GradMethod::Autodiff] {
            let config = SolverConfig::default()
                .with_backend(NumericBackend::Jax)
                .with_grad(grad)
                .with_seed(21);
            let mut hea = Hea::from_molecule(&h2, 2, Mapping::Parity, config).unwrap();
            let start = hea.init_guess().to_vec();
            let (_, g) = hea.energy_and_grad(&start).unwrap();
            assert_eq!(g.len(), hea.num_params());
            energies.push((hea.kernel().unwrap(), g));
        }
        assert_abs_diff_eq!(energies[0].0, energies[1].0, epsilon = 1e-8);
        assert_close_all(energies[0].1.iter(), energies[1].1.iter(), 1e-10);
    }
}
