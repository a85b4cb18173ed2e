//! Finite-shot measurement
//!
//! Gantree: L4_Backend → Sampler
//!
//! Terms of an operator are grouped into qubit-wise-commuting sets. Each
//! group is measured once: the state is rotated into the group's basis
//! (X: H, Y: Sdg H), `shots` bitstrings are drawn, readout flips applied,
//! and every term is estimated as the mean parity of its support.

use crate::state::QuantumState;
use hea_core::error::{HeaError, HeaResult};
use hea_core::gate::Gate;
use hea_core::pauli::{PauliString, QubitOperator};
use hea_core::types::{Bitstring, Counts};
use log::trace;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Measurement Result
// ============================================================================

/// Counts of one measured basis setting
/// Gantree: MeasurementResult // counts + shots
#[derive(Debug, Clone)]
pub struct MeasurementResult {
    /// Outcome counts
    pub counts: Counts,
    /// Number of shots drawn
    pub shots: u64,
}

impl MeasurementResult {
    /// Total count (equals `shots`)
    pub fn total_counts(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Relative frequency of a bitstring
    pub fn probability(&self, bitstring: &Bitstring) -> f64 {
        let count = self.counts.get(bitstring).copied().unwrap_or(0);
        count as f64 / self.shots as f64
    }

    /// Mean of `(-1)^{popcount(b & mask)}`
    /// Gantree: parity_expectation(mask) -> f64 // 패리티 기대값
    pub fn parity_expectation(&self, mask: u64) -> f64 {
        let sum: f64 = self
            .counts
            .iter()
            .map(|(b, &count)| b.parity_sign(mask) * count as f64)
            .sum();
        sum / self.shots as f64
    }
}

impl fmt::Display for MeasurementResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MeasurementResult(shots={}, unique={})",
            self.shots,
            self.counts.len()
        )
    }
}

// ============================================================================
// Sampling
// ============================================================================

/// Draw `shots` outcomes from `probs` with symmetric readout flips
/// Gantree: sample_counts(probs, n, shots, ro, rng) -> Result<MeasurementResult> // 샘플링
pub fn sample_counts<R: Rng>(
    probs: &[f64],
    num_qubits: usize,
    shots: u64,
    readout_error: f64,
    rng: &mut R,
) -> HeaResult<MeasurementResult> {
    let dist = WeightedIndex::new(probs.iter().map(|p| p.max(0.0)))
        .map_err(|e| HeaError::InternalError(format!("cannot sample distribution: {}", e)))?;
    let mut by_index: HashMap<usize, u64> = HashMap::new();
    for _ in 0..shots {
        let mut outcome = dist.sample(rng);
        if readout_error > 0.0 {
            for bit in 0..num_qubits {
                if rng.gen::<f64>() < readout_error {
                    outcome ^= 1 << bit;
                }
            }
        }
        *by_index.entry(outcome).or_insert(0) += 1;
    }
    let counts = by_index
        .into_iter()
        .map(|(i, c)| (Bitstring::from_index(i, num_qubits), c))
        .collect();
    Ok(MeasurementResult { counts, shots })
}

/// Single-qubit factors shared by a qubit-wise-commuting group
fn group_basis(group: &[PauliString]) -> PauliString {
    let (mut x, mut z) = (0u64, 0u64);
    for p in group {
        x |= p.x_mask();
        z |= p.z_mask();
    }
    PauliString::new(x, z)
}

/// Shot estimate of `<op>` on `state`
/// Gantree: sampled_expectation(state, op, shots, ro, rng) -> Result<f64> // 샷 기대값
pub fn sampled_expectation<S, R>(
    state: &S,
    op: &QubitOperator,
    shots: u64,
    readout_error: f64,
    rng: &mut R,
) -> HeaResult<f64>
where
    S: QuantumState,
    R: Rng,
{
    if shots == 0 {
        return Err(HeaError::InvalidConfig {
            field: "shots",
            reason: "sampled engines need at least one shot".into(),
        });
    }
    let n = state.num_qubits();
    let mut energy = op.constant_term();
    let groups = op.qubitwise_groups();
    for group in &groups {
        let terms: Vec<&PauliString> = group.iter().filter(|p| !p.is_identity()).collect();
        if terms.is_empty() {
            continue;
        }
        let basis = group_basis(group);
        let mut rotated = state.clone();
        for (q, pauli) in basis.ops() {
            if let Some(b) = pauli.basis() {
                for g in Gate::basis_transform(q, b) {
                    rotated.apply_gate(&g)?;
                }
            }
        }
        let result = sample_counts(&rotated.probabilities(), n, shots, readout_error, rng)?;
        for p in terms {
            energy += op.coefficient(p).re * result.parity_expectation(p.support());
        }
    }
    trace!("sampled {} groups x {} shots: {:.6}", groups.len(), shots, energy);
    Ok(energy)
}

// ============================================================================
// Tests
// ============================================================================
