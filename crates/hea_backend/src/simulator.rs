//! Simulator backend
//!
//! Gantree: L4_Backend → SimulatorBackend
//!
//! Evaluates `<H>` on a bound circuit under one of the four engines and,
//! when the engine allows it, its reverse-mode gradient.

use crate::adjoint::{density_gradient, statevector_gradient};
use crate::density::DensityMatrix;
use crate::engine::{check_autodiff, Engine, NumericBackend};
use crate::sampler::sampled_expectation;
use crate::state::QuantumState;
use crate::statevector::StateVector;
use hea_core::circuit::Circuit;
use hea_core::error::{HeaError, HeaResult};
use hea_core::param_circuit::BoundCircuit;
use hea_core::pauli::QubitOperator;
use hea_core::sim;
use hea_noise::NoiseModel;
use log::{debug, trace};
use num_complex::Complex64;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fmt;

// ============================================================================
// Backend Trait
// ============================================================================

/// Anything that turns a bound circuit and an observable into a number
/// Gantree: Backend // 백엔드 trait
pub trait Backend {
    /// Backend name
    fn name(&self) -> &str;

    /// Engine in use
    fn engine(&self) -> Engine;

    /// Expectation value of `op` after `circuit`
    /// Gantree: expectation(circuit, op) -> Result<f64>
    fn expectation(&mut self, circuit: &Circuit, op: &QubitOperator) -> HeaResult<f64>;

    /// Expectation values for several circuits
    fn expectation_batch(&mut self, circuits: &[Circuit], op: &QubitOperator) -> HeaResult<Vec<f64>> {
        circuits.iter().map(|c| self.expectation(c, op)).collect()
    }

    /// Check if repeated evaluations return the same value
    fn is_exact(&self) -> bool {
        !self.engine().is_sampled()
    }
}

// ============================================================================
// Simulator Backend
// ============================================================================

/// Dense simulator for every engine
/// Gantree: SimulatorBackend // 시뮬레이터 구현
#[derive(Debug, Clone)]
pub struct SimulatorBackend {
    /// Backend name
    name: String,

    /// Engine
    engine: Engine,

    /// Numeric backend (decides whether gradients are available)
    numeric: NumericBackend,

    /// Noise model; only read by noisy engines
    noise: NoiseModel,

    /// Shots per measured group
    shots: u64,

    /// Seed of `rng`, if fixed
    seed: Option<u64>,

    rng: ChaCha8Rng,
}

impl SimulatorBackend {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a simulator for `engine`; noisy engines start from the default noise model
    /// Gantree: new(engine) -> Self // 생성자
    pub fn new(engine: Engine) -> Self {
        let noise = if engine.is_noisy() {
            NoiseModel::default()
        } else {
            NoiseModel::ideal()
        };
        Self {
            name: "hea_simulator".to_string(),
            engine,
            numeric: NumericBackend::default(),
            noise,
            shots: sim::DEFAULT_SHOTS as u64,
            seed: None,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Exact noiseless simulator
    pub fn ideal() -> Self {
        Self::new(Engine::TensorNetwork)
    }

    /// Set the noise model
    pub fn with_noise(mut self, noise: NoiseModel) -> Self {
        self.noise = noise;
        self
    }

    /// Set shots per measured group
    pub fn with_shots(mut self, shots: u64) -> Self {
        self.shots = shots;
        self
    }

    /// Fix the sampling seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    /// Set the numeric backend
    pub fn with_numeric_backend(mut self, numeric: NumericBackend) -> Self {
        self.numeric = numeric;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Numeric backend
    pub fn numeric_backend(&self) -> NumericBackend {
        self.numeric
    }

    /// Configured noise model
    pub fn noise(&self) -> &NoiseModel {
        &self.noise
    }

    /// Shots per measured group
    pub fn shots(&self) -> u64 {
        self.shots
    }

    /// Sampling seed
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Noise the engine actually applies
    pub fn effective_noise(&self) -> NoiseModel {
        if self.engine.is_noisy() {
            self.noise
        } else {
            NoiseModel::ideal()
        }
    }

    // ========================================================================
    // States
    // ========================================================================

    /// Ideal final state of `circuit`
    /// Gantree: statevector(circuit) -> Result<StateVector> // 상태 벡터
    pub fn statevector(&self, circuit: &Circuit) -> HeaResult<StateVector> {
        let mut sv = StateVector::new(circuit.num_qubits())?;
        sv.apply_circuit(circuit)?;
        Ok(sv)
    }

    /// Final density matrix with the engine's gate noise after every gate
    /// Gantree: density_matrix(circuit) -> Result<DensityMatrix> // 밀도 행렬
    pub fn density_matrix(&self, circuit: &Circuit) -> HeaResult<DensityMatrix> {
        let noise = self.effective_noise();
        let mut dm = DensityMatrix::new(circuit.num_qubits())?;
        for gate in circuit.gates() {
            dm.apply_gate(gate)?;
            for ch in noise.channels_after(gate) {
                dm.apply_channel(&ch)?;
            }
        }
        Ok(dm)
    }

    /// Exact outcome probabilities (before readout error)
    pub fn probabilities(&self, circuit: &Circuit) -> HeaResult<Vec<f64>> {
        if self.engine.is_noisy() {
            Ok(self.density_matrix(circuit)?.probabilities())
        } else {
            Ok(self.statevector(circuit)?.probabilities())
        }
    }

    /// `op` with each term shrunk by the readout attenuation of its weight
    /// Gantree: attenuated(op) -> QubitOperator // 측정 오류 반영
    pub fn attenuated(&self, op: &QubitOperator) -> QubitOperator {
        let noise = self.effective_noise();
        if noise.readout_error() == 0.0 {
            return op.clone();
        }
        let terms: Vec<_> = op
            .iter()
            .map(|(p, c)| (*p, c * Complex64::new(noise.readout_attenuation(p.weight()), 0.0)))
            .collect();
        QubitOperator::from(terms)
    }

    fn check_operator(circuit: &Circuit, op: &QubitOperator) -> HeaResult<()> {
        if op.num_qubits() > circuit.num_qubits() {
            return Err(HeaError::QubitCountMismatch {
                hamiltonian: op.num_qubits(),
                circuit: circuit.num_qubits(),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Gradients
    // ========================================================================

    /// Reverse-mode gradient of `<op>` w.r.t. the bound parameters
    /// Gantree: gradient(bound, n_params, op) -> Result<Vec<f64>> // 역전파 기울기
    pub fn gradient(
        &self,
        bound: &BoundCircuit,
        num_params: usize,
        op: &QubitOperator,
    ) -> HeaResult<Vec<f64>> {
        check_autodiff(self.engine, self.numeric)?;
        Self::check_operator(&bound.circuit, op)?;
        debug!("adjoint gradient on {}", self);
        if self.engine.is_noisy() {
            density_gradient(bound, num_params, &self.attenuated(op), &self.noise)
        } else {
            statevector_gradient(bound, num_params, op)
        }
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::ideal()
    }
}

impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn engine(&self) -> Engine {
        self.engine
    }

    /// Gantree: expectation(circuit, op) -> Result<f64> // 엔진별 기대값
    fn expectation(&mut self, circuit: &Circuit, op: &QubitOperator) -> HeaResult<f64> {
        Self::check_operator(circuit, op)?;
        let value = match self.engine {
            Engine::TensorNetwork => self.statevector(circuit)?.expectation(op)?,
            Engine::TensorNetworkNoise => {
                let op = self.attenuated(op);
                self.density_matrix(circuit)?.expectation(&op)?
            }
            Engine::TensorNetworkShot => {
                let sv = self.statevector(circuit)?;
                sampled_expectation(&sv, op, self.shots, 0.0, &mut self.rng)?
            }
            Engine::TensorNetworkNoiseShot => {
                let dm = self.density_matrix(circuit)?;
                let readout = self.noise.readout_error();
                sampled_expectation(&dm, op, self.shots, readout, &mut self.rng)?
            }
        };
        trace!("{} <H> = {:.10}", self.engine, value);
        Ok(value)
    }
}

impl fmt::Display for SimulatorBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {}", self.name, self.engine, self.numeric)?;
        if self.engine.is_sampled() {
            write!(f, ", shots={}", self.shots)?;
        }
        if self.engine.is_noisy() {
            write!(f, ", {}", self.noise)?;
        }
        write!(f, ")")
    }
}

// ============================================================================
// Tests
// ============================================================================
