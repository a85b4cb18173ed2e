//! Constants for HEA
//!
//! Gantree: L0_Foundation → Constants
//!
//! Simulation defaults, optimizer defaults and numerical tolerances.

// ============================================================================
// Simulation Constants
// Gantree: sim // 시뮬레이션 상수
// ============================================================================

pub mod sim {
    //! Defaults for the simulation engines

    /// Default number of measurement shots per qubit-wise-commuting group
    /// Gantree: DEFAULT_SHOTS: usize = 4096
    pub const DEFAULT_SHOTS: usize = 4096;

    /// Default two-qubit depolarizing probability for noisy engines
    /// Gantree: DEFAULT_DEPOL_2Q: f64 = 0.02
    pub const DEFAULT_DEPOL_2Q: f64 = 0.02;

    /// Largest admissible single-qubit depolarizing probability
    pub const MAX_DEPOL_1Q: f64 = 0.75;

    /// Largest admissible two-qubit depolarizing probability
    pub const MAX_DEPOL_2Q: f64 = 15.0 / 16.0;

    /// Register limit for the statevector engines
    /// Gantree: MAX_QUBITS_STATEVECTOR: usize = 24
    pub const MAX_QUBITS_STATEVECTOR: usize = 24;

    /// Register limit for the density-matrix engines (2n-qubit vector)
    pub const MAX_QUBITS_DENSITY: usize = 12;

    /// Pauli strings are stored as 64-bit masks
    pub const MAX_QUBITS_PAULI: usize = 64;
}

// ============================================================================
// Optimizer Constants
// Gantree: optim // 최적화 상수
// ============================================================================

pub mod optim {
    //! Defaults for the classical optimizers

    use std::f64::consts::FRAC_PI_2;

    /// Parameter-shift displacement for Pauli rotations
    /// Gantree: PARAMETER_SHIFT: f64 = π/2
    pub const PARAMETER_SHIFT: f64 = FRAC_PI_2;

    /// L-BFGS iteration cap
    pub const LBFGS_MAX_ITER: usize = 1000;

    /// L-BFGS history length
    pub const LBFGS_HISTORY: usize = 10;

    /// L-BFGS ∞-norm gradient tolerance
    pub const LBFGS_GTOL: f64 = 1e-8;

    /// L-BFGS relative function-change tolerance
    pub const LBFGS_FTOL: f64 = 1e-15;

    /// Armijo sufficient-decrease constant
    pub const ARMIJO_C1: f64 = 1e-4;

    /// Maximum number of backtracking halvings per line search
    pub const MAX_BACKTRACK: usize = 40;

    /// Adam learning rate
    /// Gantree: ADAM_LR: f64 = 0.05
    pub const ADAM_LR: f64 = 0.05;

    /// Adam iteration cap
    pub const ADAM_MAX_ITER: usize = 150;

    /// Adam first-moment decay
    pub const ADAM_BETA1: f64 = 0.9;

    /// Adam second-moment decay
    pub const ADAM_BETA2: f64 = 0.999;

    /// Adam denominator guard
    pub const ADAM_EPSILON: f64 = 1e-8;

    /// Nelder-Mead evaluation budget per parameter
    pub const NM_EVALS_PER_PARAM: usize = 200;

    /// Nelder-Mead initial simplex edge
    pub const NM_INITIAL_STEP: f64 = 0.5;

    /// Nelder-Mead simplex-size tolerance
    pub const NM_XATOL: f64 = 1e-6;

    /// Nelder-Mead function-spread tolerance
    pub const NM_FATOL: f64 = 1e-8;

    /// Sliding window for stochastic early stopping
    /// Gantree: CONVERGENCE_WINDOW: usize = 20
    pub const CONVERGENCE_WINDOW: usize = 20;

    /// Relative spread of the window considered converged
    pub const CONVERGENCE_THRESHOLD: f64 = 1e-6;
}

// ============================================================================
// Numerical Tolerances
// Gantree: tol // 수치 허용 오차
// ============================================================================

pub mod tol {
    //! Numerical tolerances

    /// Coefficients below this magnitude are dropped from operators
    /// Gantree: COEFF_TOL: f64 = 1e-12
    pub const COEFF_TOL: f64 = 1e-12;

    /// Imaginary residue tolerated in a Hermitian operator
    pub const HERMITIAN_TOL: f64 = 1e-8;

    /// Symmetry tolerance on molecular integrals
    pub const INTEGRAL_SYMMETRY_TOL: f64 = 1e-8;

    /// Off-diagonal threshold for Jacobi sweeps
    pub const JACOBI_TOL: f64 = 1e-12;

    /// Jacobi sweep cap
    pub const JACOBI_MAX_SWEEPS: usize = 100;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_is_quarter_turn() {
        assert!((optim::PARAMETER_SHIFT * 2.0 - std::f64::consts::PI).abs() < 1e-15);
    }

    #[test]
    fn test_depol_bounds() {
        assert!(sim::DEFAULT_DEPOL_2Q < sim::MAX_DEPOL_2Q);
        assert_eq!(sim::MAX_DEPOL_2Q, 0.9375);
    }
}
