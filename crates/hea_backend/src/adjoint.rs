//! Reverse-mode gradients
//!
//! Gantree: L4_Backend → Adjoint
//!
//! For a rotation `exp(-iθG/2)` the derivative of `<H>` is
//! `Im <λ|G|ψ>` with `ψ` the state right after the rotation and `λ` the
//! observable pulled back to the same point. One forward and one backward
//! sweep give every component; shared parameters accumulate.
//!
//! The density-matrix sweep keeps a snapshot of `ρ` after every rotation,
//! since noise channels cannot be undone.

use crate::density::DensityMatrix;
use crate::state::QuantumState;
use crate::statevector::StateVector;
use hea_core::error::{HeaError, HeaResult};
use hea_core::gate::{Gate, RotationAxis};
use hea_core::param_circuit::BoundCircuit;
use hea_core::pauli::{Pauli, PauliString, QubitOperator};
use hea_noise::NoiseModel;
use log::debug;

/// Pauli generator of a rotation gate
fn generator(gate: &Gate) -> HeaResult<PauliString> {
    let axis = gate
        .axis()
        .ok_or_else(|| HeaError::InternalError(format!("{} carries no parameter", gate)))?;
    let pauli = match axis {
        RotationAxis::X => Pauli::X,
        RotationAxis::Y => Pauli::Y,
        RotationAxis::Z => Pauli::Z,
    };
    PauliString::single(gate.qubits()[0], pauli)
}

fn check_bound(bound: &BoundCircuit, num_params: usize) -> HeaResult<()> {
    let gates = bound.circuit.gates().len();
    if bound.param_map.len() != gates {
        return Err(HeaError::ShapeMismatch {
            what: "param_map",
            expected: gates,
            actual: bound.param_map.len(),
        });
    }
    if let Some(k) = bound.param_map.iter().flatten().find(|&&k| k >= num_params) {
        return Err(HeaError::ShapeMismatch {
            what: "parameter index",
            expected: num_params,
            actual: k + 1,
        });
    }
    Ok(())
}

// ============================================================================
// Statevector
// ============================================================================

/// `∂<op>/∂θ` on the ideal statevector
/// Gantree: statevector_gradient(bound, n_params, op) -> Result<Vec<f64>> // 상태벡터 역전파
pub fn statevector_gradient(
    bound: &BoundCircuit,
    num_params: usize,
    op: &QubitOperator,
) -> HeaResult<Vec<f64>> {
    check_bound(bound, num_params)?;
    let mut psi = StateVector::new(bound.circuit.num_qubits())?;
    psi.apply_circuit(&bound.circuit)?;
    let mut lambda = psi.apply_operator(op)?;

    let mut grad = vec![0.0; num_params];
    for (gate, slot) in bound.circuit.gates().iter().zip(&bound.param_map).rev() {
        if let Some(k) = *slot {
            let mut g_psi = psi.clone();
            g_psi.apply_pauli(&generator(gate)?);
            grad[k] += lambda.inner(&g_psi)?.im;
        }
        let inv = gate.inverse();
        psi.apply_gate(&inv)?;
        lambda.apply_gate(&inv)?;
    }
    debug!("statevector adjoint: {} gates, {} params", bound.param_map.len(), num_params);
    Ok(grad)
}

// ============================================================================
// Density Matrix
// ============================================================================

/// `∂Tr(op ρ)/∂θ` through the noisy density-matrix evolution
///
/// `op` is taken as given; readout attenuation, if any, must already be
/// folded into it.
/// Gantree: density_gradient(bound, n_params, op, noise) -> Result<Vec<f64>> // 밀도행렬 역전파
pub fn density_gradient(
    bound: &BoundCircuit,
    num_params: usize,
    op: &QubitOperator,
    noise: &NoiseModel,
) -> HeaResult<Vec<f64>> {
    check_bound(bound, num_params)?;
    let n = bound.circuit.num_qubits();
    let gates = bound.circuit.gates();

    // forward: ρ after each rotation, before its channels
    let mut rho = DensityMatrix::new(n)?;
    let mut snapshots = Vec::new();
    for (gate, slot) in gates.iter().zip(&bound.param_map) {
        rho.apply_gate(gate)?;
        if slot.is_some() {
            snapshots.push(rho.clone());
        }
        for ch in noise.channels_after(gate) {
            rho.apply_channel(&ch)?;
        }
    }

    // backward: Pauli channels are self-adjoint, gates pull back as U† O U
    let mut obs = DensityMatrix::from_operator(op, n)?;
    let mut grad = vec![0.0; num_params];
    for (gate, slot) in gates.iter().zip(&bound.param_map).rev() {
        for ch in noise.channels_after(gate).iter().rev() {
            obs.apply_channel(ch)?;
        }
        if let Some(k) = *slot {
            let sigma = snapshots
                .pop()
                .ok_or_else(|| HeaError::InternalError("missing forward snapshot".into()))?;
            grad[k] += DensityMatrix::trace_product(&obs, &generator(gate)?, &sigma).im;
        }
        obs.apply_gate(&gate.inverse())?;
    }
    debug!("density adjoint: {} gates, {} params", gates.len(), num_params);
    Ok(grad)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use hea_core::builder::ParamCircuitBuilder;
    use hea_core::param_circuit::ParamCircuit;
    use num_complex::Complex64;

    fn hamiltonian() -> QubitOperator {
        QubitOperator::from(vec![
            ("Z0".parse().unwrap(), Complex64::new(0.4, 0.0)),
            ("Z0 Z1".parse().unwrap(), Complex64::new(-0.7, 0.0)),
            ("X0 X1".parse().unwrap(), Complex64::new(0.25, 0.0)),
            ("Y1".parse().unwrap(), Complex64::new(0.1, 0.0)),
            (PauliString::identity(), Complex64::new(-1.0, 0.0)),
        ])
    }

    fn ansatz() -> ParamCircuit {
        ParamCircuitBuilder::new(2)
            .ry_layer()
            .cnot_chain()
            .rotation(RotationAxis::X, 0)
            .rz_param(1)
            .cnot_chain()
            .ry_layer()
            .build()
            .unwrap()
    }

    fn energy_sv(pc: &ParamCircuit, x: &[f64], op: &QubitOperator) -> f64 {
        let mut sv = StateVector::new(pc.num_qubits()).unwrap();
        sv.apply_circuit(&pc.bind(x).unwrap().circuit).unwrap();
        sv.expectation(op).unwrap()
    }

    fn energy_dm(pc: &ParamCircuit, x: &[f64], op: &QubitOperator, noise: &NoiseModel) -> f64 {
        let mut dm = DensityMatrix::new(pc.num_qubits()).unwrap();
        for g in pc.bind(x).unwrap().circuit.gates() {
            dm.apply_gate(g).unwrap();
            for ch in noise.channels_after(g) {
                dm.apply_channel(&ch).unwrap();
            }
        }
        dm.expectation(op).unwrap()
    }

    fn central_difference(f: impl Fn(&[f64]) -> f64, x: &[f64]) -> Vec<f64> {
        let h = 1e-6;
        (0..x.len())
            .map(|i| {
                let mut xp = x.to_vec();
                let mut xm = x.to_vec();
                xp[i] += h;
                xm[i] -= h;
                (f(&xp) - f(&xm)) / (2.0 * h)
            })
            .collect()
    }

    #[test]
    fn test_single_rotation() {
        // <Z> = cos θ after Ry(θ)
        let pc = ParamCircuitBuilder::new(1).ry_param(0).build().unwrap();
        let z = QubitOperator::from("Z0".parse::<PauliString>().unwrap());
        let theta = 0.8;
        let g = statevector_gradient(&pc.bind(&[theta]).unwrap(), 1, &z).unwrap();
        assert_abs_diff_eq!(g[0], -theta.sin(), epsilon = 1e-12);
    }

    #[test]
    fn test_statevector_matches_finite_difference() {
        let pc = ansatz();
        let h = hamiltonian();
        let x: Vec<f64> = (0..pc.num_params()).map(|i| 0.3 + 0.17 * i as f64).collect();
        let g = statevector_gradient(&pc.bind(&x).unwrap(), pc.num_params(), &h).unwrap();
        let fd = central_difference(|p| energy_sv(&pc, p, &h), &x);
        for (a, b) in g.iter().zip(&fd) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_shared_parameter_accumulates() {
        let mut pc = ParamCircuit::new(2);
        pc.push_rotation(RotationAxis::Y, 0, 0).unwrap();
        pc.push_gate(Gate::Cnot(0, 1)).unwrap();
        pc.push_rotation(RotationAxis::Y, 1, 0).unwrap();
        let h = hamiltonian();
        let x = [0.9];
        let g = statevector_gradient(&pc.bind(&x).unwrap(), 1, &h).unwrap();
        let fd = central_difference(|p| energy_sv(&pc, p, &h), &x);
        assert_abs_diff_eq!(g[0], fd[0], epsilon = 1e-6);
    }

    #[test]
    fn test_density_matches_statevector_without_noise() {
        let pc = ansatz();
        let h = hamiltonian();
        let x: Vec<f64> = (0..pc.num_params()).map(|i| 1.0 - 0.2 * i as f64).collect();
        let bound = pc.bind(&x).unwrap();
        let a = statevector_gradient(&bound, pc.num_params(), &h).unwrap();
        let b = density_gradient(&bound, pc.num_params(), &h, &NoiseModel::ideal()).unwrap();
        for (u, v) in a.iter().zip(&b) {
            assert_abs_diff_eq!(u, v, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_density_matches_finite_difference_with_noise() {
        let pc = ansatz();
        let h = hamiltonian();
        let noise = NoiseModel::new(0.01, 0.05, 0.0).unwrap();
        let x: Vec<f64> = (0..pc.num_params()).map(|i| 0.5 + 0.1 * i as f64).collect();
        let g = density_gradient(&pc.bind(&x).unwrap(), pc.num_params(), &h, &noise).unwrap();
        let fd = central_difference(|p| energy_dm(&pc, p, &h, &noise), &x);
        for (a, b) in g.iter().zip(&fd) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_param_index_checked() {
        let pc = ansatz();
        let bound = pc.bind(&vec![0.0; pc.num_params()]).unwrap();
        let err = statevector_gradient(&bound, 1, &hamiltonian()).unwrap_err();
        assert!(matches!(err, HeaError::ShapeMismatch { .. }));
    }
}
