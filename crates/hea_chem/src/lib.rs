//! # HEA Chem
//!
//! Molecular integrals, fermion-to-qubit mappings and exact references for
//! the hardware-efficient variational eigensolver.
//!
//! ## Gantree Architecture
//!
//! ```text
//! hea_chem // L2: Chemistry
//!     L2_Chemistry // 분자 문제 정의
//!         Integrals // 분자 적분
//!         Electrons // 전자 수
//!         FermionOperator // 페르미온 연산자
//!         Mapping // JW / parity / BK 매핑
//!         RdmOperators // RDM 연산자
//!         Linalg // 야코비 대각화
//!         FciSolver // 정확 기준 에너지
//!         Molecules // 내장 분자 적분
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use hea_chem::prelude::*;
//!
//! let mol = molecules::h2();
//! let mapper = QubitMapper::new(Mapping::Parity, 4, mol.electrons).unwrap();
//! let h = mapper.map_hamiltonian(&mol.integrals).unwrap();
//! assert_eq!(mapper.n_qubits(), 2);
//!
//! let e0 = ground_state_energy(&h).unwrap();
//! assert!((e0 - mol.fci_energy).abs() < 1e-8);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Molecular integrals (Gantree: L2_Chemistry → Integrals)
pub mod integrals;

/// Electron counts (Gantree: L2_Chemistry → Electrons)
pub mod electrons;

/// Fermion operators (Gantree: L2_Chemistry → FermionOperator)
pub mod fermion;

/// Fermion-to-qubit mappings (Gantree: L2_Chemistry → Mapping)
pub mod mapping;

/// Dense eigen-solvers (Gantree: L2_Chemistry → Linalg)
pub mod linalg;

/// Exact FCI reference (Gantree: L2_Chemistry → FciSolver)
pub mod fci;

/// RDM operators (Gantree: L2_Chemistry → RdmOperators)
pub mod rdm;

/// Shipped molecular integrals (Gantree: L2_Chemistry → Molecules)
pub mod molecules;

// ============================================================================
// Re-exports
// ============================================================================

pub use electrons::ElectronCount;
pub use fci::{FciResult, FciSolver};
pub use fermion::{FermionOperator, Ladder};
pub use integrals::MolecularIntegrals;
pub use linalg::{dense_matrix, ground_state_energy, hermitian_ground_state, symmetric_eigen};
pub use mapping::{bravyi_kitaev, jordan_wigner, parity, BinaryEncoding, Mapping, QubitMapper};
pub use molecules::Molecule;
pub use rdm::RdmOperators;

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use hea_chem::prelude::*;
    //! ```

    pub use crate::electrons::ElectronCount;
    pub use crate::fci::{FciResult, FciSolver};
    pub use crate::fermion::FermionOperator;
    pub use crate::integrals::MolecularIntegrals;
    pub use crate::linalg::{dense_matrix, ground_state_energy};
    pub use crate::mapping::{Mapping, QubitMapper};
    pub use crate::molecules::{self, Molecule};
    pub use crate::rdm::RdmOperators;
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
