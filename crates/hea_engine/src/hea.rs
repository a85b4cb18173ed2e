//! Hardware-efficient ansatz solver
//!
//! Gantree: L6_Engine → Hea
//!
//! Owns the qubit Hamiltonian, the ansatz, the current initial guess and
//! the last optimization result. Every configuration change is validated
//! before it is applied, so a solver never holds an unsupported
//! engine / backend / gradient combination.

use crate::ansatz::Ansatz;
use crate::config::{GradMethod, SolverConfig};
use crate::objective::EnergyObjective;
use hea_backend::{Backend, SimulatorBackend, StateVector};
use hea_chem::{ElectronCount, Mapping, MolecularIntegrals, Molecule, QubitMapper, RdmOperators};
use hea_core::error::{HeaError, HeaResult};
use hea_core::QubitOperator;
use hea_optim::{minimize, OptimizeResult};
use log::{debug, info};
use ndarray::{Array2, Array4};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::fmt;

/// Variational solver over a hardware-efficient ansatz
/// Gantree: Hea // HEA 솔버
#[derive(Debug, Clone)]
pub struct Hea {
    hamiltonian: QubitOperator,
    ansatz: Ansatz,
    config: SolverConfig,
    mapper: Option<QubitMapper>,
    rdm_ops: Option<RdmOperators>,
    init_guess: Vec<f64>,
    rng: ChaCha8Rng,
    backend: SimulatorBackend,
    result: Option<OptimizeResult>,
}

impl Hea {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Map the integrals and build an `ry` ansatz on the mapped register
    /// Gantree: ry(ints, electrons, n_layers, mapping, config) -> Result<Self> // 분자 생성
    pub fn ry(
        integrals: &MolecularIntegrals,
        electrons: ElectronCount,
        n_layers: usize,
        mapping: Mapping,
        config: SolverConfig,
    ) -> HeaResult<Self> {
        config.validate()?;
        integrals.validate()?;
        let mapper = QubitMapper::new(mapping, 2 * integrals.n_orb(), electrons)?;
        let hamiltonian = mapper.map_hamiltonian(integrals)?;
        let ansatz = Ansatz::ry(mapper.n_qubits(), n_layers)?;
        let mut hea = Self::assemble(hamiltonian, ansatz, config, Some(mapper))?;
        hea.randomize_init_guess();
        Ok(hea)
    }

    /// [`Hea::ry`] on a shipped molecule
    pub fn from_molecule(
        molecule: &Molecule,
        n_layers: usize,
        mapping: Mapping,
        config: SolverConfig,
    ) -> HeaResult<Self> {
        Self::ry(&molecule.integrals, molecule.electrons, n_layers, mapping, config)
    }

    /// Solver for an already mapped Hamiltonian and an external ansatz
    /// Gantree: new(h, ansatz, init_guess, config) -> Result<Self> // 외부 회로 생성
    pub fn new(
        hamiltonian: QubitOperator,
        ansatz: Ansatz,
        init_guess: Vec<f64>,
        config: SolverConfig,
    ) -> HeaResult<Self> {
        config.validate()?;
        let mut hea = Self::assemble(hamiltonian, ansatz, config, None)?;
        hea.set_init_guess(init_guess)?;
        Ok(hea)
    }

    fn assemble(
        hamiltonian: QubitOperator,
        ansatz: Ansatz,
        config: SolverConfig,
        mapper: Option<QubitMapper>,
    ) -> HeaResult<Self> {
        if hamiltonian.num_qubits() > ansatz.num_qubits() {
            return Err(HeaError::QubitCountMismatch {
                hamiltonian: hamiltonian.num_qubits(),
                circuit: ansatz.num_qubits(),
            });
        }
        let hamiltonian = hamiltonian.to_hermitian()?;
        let rng = config.guess_rng();
        let backend = config.simulator();
        debug!(
            "HEA: {} Pauli terms, ansatz {}, {}",
            hamiltonian.len(),
            ansatz,
            config
        );
        Ok(Self {
            init_guess: vec![0.0; ansatz.num_params()],
            hamiltonian,
            ansatz,
            config,
            mapper,
            rdm_ops: None,
            rng,
            backend,
            result: None,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Qubit Hamiltonian
    pub fn hamiltonian(&self) -> &QubitOperator {
        &self.hamiltonian
    }

    /// Ansatz
    pub fn ansatz(&self) -> &Ansatz {
        &self.ansatz
    }

    /// Configuration
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Fermion-to-qubit mapper, when built from integrals
    pub fn mapper(&self) -> Option<&QubitMapper> {
        self.mapper.as_ref()
    }

    /// Qubit count
    pub fn n_qubits(&self) -> usize {
        self.ansatz.num_qubits()
    }

    /// Free parameter count
    pub fn num_params(&self) -> usize {
        self.ansatz.num_params()
    }

    /// Starting point of the next kernel run
    pub fn init_guess(&self) -> &[f64] {
        &self.init_guess
    }

    /// Replace the starting point
    /// Gantree: set_init_guess(params) -> Result<()> // 초기값 설정
    pub fn set_init_guess(&mut self, params: Vec<f64>) -> HeaResult<()> {
        self.ansatz.validate_params(&params)?;
        self.init_guess = params;
        Ok(())
    }

    /// Draw a fresh starting point, uniform in `[0, 1)`
    /// Gantree: randomize_init_guess() // 무작위 초기값
    pub fn randomize_init_guess(&mut self) {
        let rng = &mut self.rng;
        self.init_guess = (0..self.ansatz.num_params()).map(|_| rng.gen::<f64>()).collect();
    }

    /// Change the gradient method; rejected combinations leave the solver unchanged
    /// Gantree: set_grad(grad) -> Result<()> // 기울기 방식 변경
    pub fn set_grad(&mut self, grad: GradMethod) -> HeaResult<()> {
        let candidate = self.config.clone().with_grad(grad);
        candidate.validate()?;
        self.config = candidate;
        Ok(())
    }

    /// Parameters of the last kernel run
    /// Gantree: params() -> Result<&[f64]> // 최적 파라미터
    pub fn params(&self) -> HeaResult<&[f64]> {
        self.result
            .as_ref()
            .map(|r| r.x.as_slice())
            .ok_or_else(|| HeaError::NotConverged("params".to_string()))
    }

    /// Last optimization result
    pub fn opt_result(&self) -> Option<&OptimizeResult> {
        self.result.as_ref()
    }

    // ========================================================================
    // Energy
    // ========================================================================

    /// Energy at `params`
    /// Gantree: energy(params) -> Result<f64> // 에너지
    pub fn energy(&mut self, params: &[f64]) -> HeaResult<f64> {
        EnergyObjective::new(&self.hamiltonian, &self.ansatz, &mut self.backend, self.config.grad)
            .energy(params)
    }

    /// Energy and gradient at `params`
    /// Gantree: energy_and_grad(params) -> Result<(f64, Vec<f64>)> // 에너지+기울기
    pub fn energy_and_grad(&mut self, params: &[f64]) -> HeaResult<(f64, Vec<f64>)> {
        EnergyObjective::new(&self.hamiltonian, &self.ansatz, &mut self.backend, self.config.grad)
            .energy_and_grad(params)
    }

    /// Statevector prepared by the noiseless circuit at `params`
    pub fn statevector(&self, params: &[f64]) -> HeaResult<StateVector> {
        let bound = self.ansatz.bind(params)?;
        self.backend.statevector(&bound.circuit)
    }

    // ========================================================================
    // Optimization
    // ========================================================================

    fn run(&mut self) -> HeaResult<OptimizeResult> {
        let optimizer = self.config.optimizer_config();
        let mut objective =
            EnergyObjective::new(&self.hamiltonian, &self.ansatz, &mut self.backend, self.config.grad);
        let result = minimize(&optimizer, &mut objective, &self.init_guess)?;
        debug!(
            "{} circuits simulated for {} objective calls",
            objective.circuits_run(),
            result.n_evaluations
        );
        Ok(result)
    }

    /// Minimize the energy from the current initial guess
    /// Gantree: kernel() -> Result<f64> // 최적화 실행
    pub fn kernel(&mut self) -> HeaResult<f64> {
        self.config.validate()?;
        info!(
            "HEA kernel: {} qubits, {} parameters, {}",
            self.n_qubits(),
            self.num_params(),
            self.config
        );
        let result = self.run()?;
        info!("HEA energy {:.12} ({})", result.fun, result.message);
        let energy = result.fun;
        self.result = Some(result);
        Ok(energy)
    }

    /// Run `restarts` independent minimizations and keep the lowest
    ///
    /// The first run starts from the current initial guess, the others
    /// from fresh random guesses.
    /// Gantree: kernel_restarts(n) -> Result<f64> // 다중 시작
    pub fn kernel_restarts(&mut self, restarts: usize) -> HeaResult<f64> {
        if restarts == 0 {
            return Err(HeaError::InvalidConfig {
                field: "restarts",
                reason: "at least one run is needed".to_string(),
            });
        }
        self.config.validate()?;
        let mut best: Option<OptimizeResult> = None;
        for k in 0..restarts {
            if k > 0 {
                self.randomize_init_guess();
            }
            let result = self.run()?;
            info!("HEA restart {}/{}: E = {:.12}", k + 1, restarts, result.fun);
            if best.as_ref().map_or(true, |b| result.fun < b.fun) {
                best = Some(result);
            }
        }
        let best = best.ok_or_else(|| HeaError::InternalError("no restart result".to_string()))?;
        let energy = best.fun;
        self.result = Some(best);
        Ok(energy)
    }

    // ========================================================================
    // Reduced Density Matrices
    // ========================================================================

    /// Spin-traced one-body RDM at the optimized parameters
    /// Gantree: make_rdm1() -> Result<Array2> // 1-RDM
    pub fn make_rdm1(&mut self) -> HeaResult<Array2<f64>> {
        let params = self.params()?.to_vec();
        self.make_rdm1_with(&params)
    }

    /// Spin-traced two-body RDM at the optimized parameters
    /// Gantree: make_rdm2() -> Result<Array4> // 2-RDM
    pub fn make_rdm2(&mut self) -> HeaResult<Array4<f64>> {
        let params = self.params()?.to_vec();
        self.make_rdm2_with(&params)
    }

    /// One-body RDM at `params`
    pub fn make_rdm1_with(&mut self, params: &[f64]) -> HeaResult<Array2<f64>> {
        Ok(self.rdms_with(params)?.0)
    }

    /// Two-body RDM at `params`
    pub fn make_rdm2_with(&mut self, params: &[f64]) -> HeaResult<Array4<f64>> {
        Ok(self.rdms_with(params)?.1)
    }

    fn rdms_with(&mut self, params: &[f64]) -> HeaResult<(Array2<f64>, Array4<f64>)> {
        let bound = self.ansatz.bind(params)?;
        if self.rdm_ops.is_none() {
            let mapper = self.mapper.as_ref().ok_or_else(|| HeaError::InvalidConfig {
                field: "mapping",
                reason: "RDMs need the fermion-to-qubit mapper; build the solver from integrals"
                    .to_string(),
            })?;
            self.rdm_ops = Some(RdmOperators::new(mapper, mapper.n_modes() / 2)?);
        }
        let Some(ops) = &self.rdm_ops else {
            return Err(HeaError::InternalError("RDM operators missing".to_string()));
        };
        let backend = &mut self.backend;
        ops.evaluate(|op| backend.expectation(&bound.circuit, op))
    }

    // ========================================================================
    // Reporting
    // ========================================================================

    /// Multi-line report of the problem, the configuration and the last run
    /// Gantree: summary() -> String // 요약 출력
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "HEA summary".to_string(),
            format!(
                "  mapping    : {}",
                self.mapper
                    .as_ref()
                    .map_or("external".to_string(), |m| m.mapping().to_string())
            ),
            format!("  qubits     : {}", self.n_qubits()),
            format!("  terms      : {}", self.hamiltonian.len()),
            format!("  ansatz     : {}", self.ansatz),
            format!("  engine     : {}", self.config.engine),
            format!("  backend    : {}", self.config.backend),
            format!("  gradient   : {}", self.config.grad),
            format!("  optimizer  : {}", self.config.optimizer_config()),
        ];
        match &self.result {
            Some(r) => {
                lines.push(format!("  energy     : {:.12}", r.fun));
                lines.push(format!(
                    "  outcome    : {} (converged={}, {} iterations, {} evaluations)",
                    r.message, r.converged, r.n_iterations, r.n_evaluations
                ));
            }
            None => lines.push("  outcome    : kernel not run".to_string()),
        }
        lines.join("\n")
    }
}

impl fmt::Display for Hea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HEA({}, {})", self.ansatz, self.config)?;
        if let Some(r) = &self.result {
            write!(f, " E = {:.10}", r.fun)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
