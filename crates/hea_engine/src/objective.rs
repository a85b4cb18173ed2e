//! Energy objective
//!
//! Gantree: L6_Engine → EnergyObjective
//!
//! `E(θ) = <ψ(θ)|H|ψ(θ)>` under the configured engine. Parameter-shift
//! evaluates every rotation occurrence at `θ ± π/2` and adds half the
//! difference to the parameter it reads; shared parameters accumulate.

use crate::ansatz::Ansatz;
use crate::config::GradMethod;
use hea_backend::{Backend, SimulatorBackend};
use hea_core::error::{HeaError, HeaResult};
use hea_core::{optim, Circuit, ParamOp, QubitOperator};
use hea_optim::Objective;
use log::trace;

/// Energy of an ansatz under one simulator
/// Gantree: EnergyObjective // 에너지 + 기울기
pub struct EnergyObjective<'a> {
    hamiltonian: &'a QubitOperator,
    ansatz: &'a Ansatz,
    backend: &'a mut SimulatorBackend,
    grad: GradMethod,
    circuits: usize,
}

impl<'a> EnergyObjective<'a> {
    /// Borrow the pieces of a solver
    pub fn new(
        hamiltonian: &'a QubitOperator,
        ansatz: &'a Ansatz,
        backend: &'a mut SimulatorBackend,
        grad: GradMethod,
    ) -> Self {
        Self {
            hamiltonian,
            ansatz,
            backend,
            grad,
            circuits: 0,
        }
    }

    /// Circuits simulated so far (shifted circuits included)
    pub fn circuits_run(&self) -> usize {
        self.circuits
    }

    /// Energy at `params`
    /// Gantree: energy(params) -> Result<f64> // 에너지
    pub fn energy(&mut self, params: &[f64]) -> HeaResult<f64> {
        let bound = self.ansatz.bind(params)?;
        self.circuits += 1;
        self.backend.expectation(&bound.circuit, self.hamiltonian)
    }

    /// Energy and gradient at `params`
    /// Gantree: energy_and_grad(params) -> Result<(f64, Vec<f64>)> // 에너지+기울기
    pub fn energy_and_grad(&mut self, params: &[f64]) -> HeaResult<(f64, Vec<f64>)> {
        let result = match self.grad {
            GradMethod::ParamShift => {
                let e = self.energy(params)?;
                (e, self.param_shift(params)?)
            }
            GradMethod::Autodiff => {
                let bound = self.ansatz.bind(params)?;
                let g = self.backend.gradient(&bound, params.len(), self.hamiltonian)?;
                self.circuits += 1;
                let e = self.backend.expectation(&bound.circuit, self.hamiltonian)?;
                (e, g)
            }
            GradMethod::Free => {
                return Err(HeaError::incompatible(
                    "grad",
                    self.grad.name(),
                    "no gradient is computed in gradient-free mode",
                ));
            }
        };
        trace!("E = {:.12}, |g| = {:.3e}", result.0, norm(&result.1));
        Ok(result)
    }

    /// Parameter-shift gradient
    fn param_shift(&mut self, params: &[f64]) -> HeaResult<Vec<f64>> {
        let bound = self.ansatz.bind(params)?;
        let n_qubits = bound.circuit.num_qubits();
        let mut shifted = Vec::with_capacity(2 * self.ansatz.circuit().num_rotations());
        let mut targets = Vec::with_capacity(self.ansatz.circuit().num_rotations());
        for (i, op) in self.ansatz.circuit().ops().iter().enumerate() {
            let ParamOp::Rotation { axis, qubit, param } = *op else {
                continue;
            };
            for shift in [optim::PARAMETER_SHIFT, -optim::PARAMETER_SHIFT] {
                let mut gates = bound.circuit.gates().to_vec();
                gates[i] = axis.gate(qubit, params[param] + shift);
                shifted.push(Circuit::from_gates(n_qubits, gates)?);
            }
            targets.push(param);
        }
        let values = self.backend.expectation_batch(&shifted, self.hamiltonian)?;
        self.circuits += shifted.len();

        let mut grad = vec![0.0; params.len()];
        for (pair, &param) in values.chunks_exact(2).zip(&targets) {
            grad[param] += 0.5 * (pair[0] - pair[1]);
        }
        Ok(grad)
    }
}

fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

impl Objective for EnergyObjective<'_> {
    fn num_params(&self) -> usize {
        self.ansatz.num_params()
    }

    fn value(&mut self, x: &[f64]) -> HeaResult<f64> {
        self.energy(x)
    }

    fn value_and_grad(&mut self, x: &[f64]) -> HeaResult<(f64, Vec<f64>)> {
        self.energy_and_grad(x)
    }

    fn has_gradient(&self) -> bool {
        self.grad.uses_gradient()
    }
}

// ============================================================================
// Tests
// ============================================================================
