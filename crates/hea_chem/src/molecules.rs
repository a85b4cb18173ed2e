//! Pre-computed molecular integrals
//!
//! Gantree: L2_Chemistry → Molecules
//!
//! STO-3G integrals in restricted Hartree-Fock molecular orbitals, with
//! their exact (FCI) ground-state energies for reference. Only the unique
//! entries of the 8-fold symmetric ERI tensor are listed.

use crate::electrons::ElectronCount;
use crate::integrals::{expand_unique_eri, MolecularIntegrals};
use ndarray::array;
use std::fmt;

/// Integrals plus electron count of a small test molecule
/// Gantree: Molecule // name, integrals, electrons, fci_energy
#[derive(Debug, Clone)]
pub struct Molecule {
    /// Short name
    pub name: &'static str,
    /// MO-basis integrals
    pub integrals: MolecularIntegrals,
    /// Electron count per spin
    pub electrons: ElectronCount,
    /// Exact ground-state energy (Hartree)
    pub fci_energy: f64,
}

impl Molecule {
    /// Number of spatial orbitals
    pub fn n_orb(&self) -> usize {
        self.integrals.n_orb()
    }
}

impl fmt::Display for Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} orbitals, electrons {}, E_FCI = {:.10}",
            self.name,
            self.n_orb(),
            self.electrons,
            self.fci_energy
        )
    }
}

/// H2, STO-3G, R = 1.4 bohr
///
/// Closed shell, 2 orbitals: 4 qubits (JW / BK), 2 qubits (reduced parity).
pub fn h2() -> Molecule {
    let int1e = array![[-1.2527970618358268, 0.0], [0.0, -0.4756022993743026]];
    let eri = [
        ((0, 0, 0, 0), 0.6745940843233689),
        ((0, 0, 1, 1), 0.6635639912205439),
        ((0, 1, 0, 1), 0.1812579147931136),
        ((1, 1, 1, 1), 0.697495346680168),
    ];
    Molecule {
        name: "H2",
        integrals: MolecularIntegrals::new_unchecked(
            int1e,
            expand_unique_eri(2, &eri),
            0.7142857142857143,
        ),
        electrons: ElectronCount::new(1, 1),
        fci_energy: -1.1372759436170656,
    }
}

/// Linear H3, STO-3G, 0.8 Å spacing, doublet (2α, 1β)
///
/// Orbitals from the closed-shell cation. 3 orbitals: 6 qubits (JW / BK),
/// 4 qubits (reduced parity).
pub fn h3_chain() -> Molecule {
    let h02 = 0.10471054857607992;
    let int1e = array![
        [-1.7377960222367517, 0.0, h02],
        [0.0, -1.2372990648108746, 0.0],
        [h02, 0.0, -0.5917125394447286]
    ];
    let eri = [
        ((0, 0, 0, 0), 0.6193780349294292),
        ((0, 0, 0, 2), -0.10471055198258931),
        ((0, 0, 1, 1), 0.5327689211630822),
        ((0, 0, 2, 2), 0.6261184707274511),
        ((0, 1, 0, 1), 0.1456005765163521),
        ((0, 1, 1, 2), 0.1350237711221542),
        ((0, 2, 0, 2), 0.12956192330824812),
        ((0, 2, 1, 1), 0.019892687438525312),
        ((0, 2, 2, 2), -0.09290166574512193),
        ((1, 1, 1, 1), 0.5720630126236464),
        ((1, 1, 2, 2), 0.5660658756596191),
        ((1, 2, 1, 2), 0.15401363816160374),
        ((2, 2, 2, 2), 0.6768715953731508),
    ];
    Molecule {
        name: "H3",
        integrals: MolecularIntegrals::new_unchecked(
            int1e,
            expand_unique_eri(3, &eri),
            1.6536787840718747,
        ),
        electrons: ElectronCount::new(2, 1),
        fci_energy: -1.552028610913388,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_fixtures_validate() {
        for mol in [h2(), h3_chain()] {
            assert!(mol.integrals.validate().is_ok(), "{}", mol.name);
            assert!(mol.electrons.validate(mol.n_orb()).is_ok());
        }
    }

    #[test]
    fn test_h2_hf_energy() {
        let mol = h2();
        let hf = mol.integrals.hf_energy(&mol.electrons).unwrap();
        assert_abs_diff_eq!(hf, -1.1167143250625706, epsilon = 1e-12);
    }
}
