//! # HEA Core
//!
//! Foundation types, circuits and Pauli operators for the hardware-efficient
//! variational eigensolver.
//!
//! ## Gantree Architecture
//!
//! ```text
//! hea_core // L0+L1: Foundation + Circuit + Operator
//!     L0_Foundation // 기반 타입/상수/에러
//!         CoreTypes // 핵심 타입
//!         Constants // 시뮬레이션/최적화 상수
//!         Errors // 에러 타입
//!     L1_Circuit // 회로 구조
//!         Gate // 게이트 enum
//!         Circuit // 고정 회로
//!         ParamCircuit // 파라미터 회로
//!         ParamCircuitBuilder // 빌더 패턴
//!     L1_Operator // 연산자
//!         Pauli // 파울리 문자열 / 큐비트 연산자
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use hea_core::prelude::*;
//!
//! // Two-qubit ry ansatz with one entangling layer
//! let ansatz = ParamCircuitBuilder::new(2)
//!     .ry_layer()
//!     .cnot_chain()
//!     .ry_layer()
//!     .build()
//!     .unwrap();
//! assert_eq!(ansatz.num_params(), 4);
//!
//! let bound = ansatz.bind(&[0.1, 0.2, 0.3, 0.4]).unwrap();
//! assert_eq!(bound.circuit.count_2q(), 1);
//! ```
//!
//! ## Pauli Algebra
//!
//! ```rust
//! use hea_core::prelude::*;
//!
//! let zz: PauliString = "Z0 Z1".parse().unwrap();
//! let xx: PauliString = "X0 X1".parse().unwrap();
//! assert!(zz.commutes(&xx));
//! assert!(!zz.commutes_qubitwise(&xx));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types (Gantree: L0_Foundation → CoreTypes)
pub mod types;

/// Constants (Gantree: L0_Foundation → Constants)
pub mod constants;

/// Error types (Gantree: L0_Foundation → Errors)
pub mod error;

/// Quantum gates (Gantree: L1_Circuit → Gate)
pub mod gate;

/// Bound circuits (Gantree: L1_Circuit → Circuit)
pub mod circuit;

/// Parameterized circuits (Gantree: L1_Circuit → ParamCircuit)
pub mod param_circuit;

/// Parameterized circuit builder (Gantree: L1_Circuit → ParamCircuitBuilder)
pub mod builder;

/// Pauli strings and qubit operators (Gantree: L1_Operator → Pauli)
pub mod pauli;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::ParamCircuitBuilder;
pub use circuit::Circuit;
pub use constants::{optim, sim, tol};
pub use error::{HeaError, HeaResult};
pub use gate::{Gate, RotationAxis};
pub use param_circuit::{BoundCircuit, ParamCircuit, ParamOp};
pub use pauli::{Pauli, PauliString, QubitOperator};
pub use types::{Angle, Basis, Bitstring, Counts, ParamVec, Probability, QubitId};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use hea_core::prelude::*;
    //! ```

    pub use crate::builder::ParamCircuitBuilder;
    pub use crate::circuit::Circuit;
    pub use crate::constants::{optim, sim, tol};
    pub use crate::error::{HeaError, HeaResult};
    pub use crate::gate::{Gate, RotationAxis};
    pub use crate::param_circuit::{BoundCircuit, ParamCircuit, ParamOp};
    pub use crate::pauli::{Pauli, PauliString, QubitOperator};
    pub use crate::types::{Angle, Basis, Bitstring, Counts, ParamVec, Probability, QubitId};
    pub use num_complex::Complex64;
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================
