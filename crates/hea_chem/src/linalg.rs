//! Dense linear algebra for exact references
//!
//! Gantree: L2_Chemistry → Linalg
//!
//! Pure-Rust cyclic Jacobi diagonalization for real symmetric matrices.
//! Complex Hermitian matrices `A + iB` are handled through the real
//! symmetric embedding `[[A, -B], [B, A]]`.

use hea_core::error::{HeaError, HeaResult};
use hea_core::pauli::QubitOperator;
use hea_core::tol;
use ndarray::{Array1, Array2};
use num_complex::Complex64;

/// Largest register [`dense_matrix`] will materialize
pub const MAX_DENSE_QUBITS: usize = 10;

/// Eigen-decomposition of a real symmetric matrix, ascending eigenvalues;
/// eigenvectors are the columns of the returned matrix
/// Gantree: symmetric_eigen(m) -> Result<(Array1, Array2)> // 야코비 대각화
pub fn symmetric_eigen(m: &Array2<f64>) -> HeaResult<(Array1<f64>, Array2<f64>)> {
    let n = m.nrows();
    if m.ncols() != n {
        return Err(HeaError::ShapeMismatch {
            what: "symmetric matrix",
            expected: n,
            actual: m.ncols(),
        });
    }
    let mut a = m.clone();
    let mut v = Array2::<f64>::eye(n);
    let scale = a.iter().map(|x| x * x).sum::<f64>().sqrt().max(1.0);

    let mut converged = n < 2;
    for _ in 0..tol::JACOBI_MAX_SWEEPS {
        let off: f64 = (0..n)
            .flat_map(|i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
            .map(|(i, j)| a[[i, j]] * a[[i, j]])
            .sum::<f64>()
            .sqrt();
        if off <= tol::JACOBI_TOL * scale {
            converged = true;
            break;
        }
        for p in 0..n {
            for q in p + 1..n {
                if a[[p, q]].abs() <= f64::MIN_POSITIVE {
                    continue;
                }
                let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * a[[p, q]]);
                let sign = if theta >= 0.0 { 1.0 } else { -1.0 };
                let t = sign / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;
                rotate(&mut a, &mut v, p, q, c, s);
            }
        }
    }
    if !converged {
        return Err(HeaError::OptimizationFailed(
            "Jacobi diagonalization did not converge".into(),
        ));
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| a[[i, i]].total_cmp(&a[[j, j]]));
    let values = Array1::from_iter(order.iter().map(|&i| a[[i, i]]));
    let mut vectors = Array2::<f64>::zeros((n, n));
    for (col, &i) in order.iter().enumerate() {
        vectors.column_mut(col).assign(&v.column(i));
    }
    Ok((values, vectors))
}

/// Apply the Jacobi rotation `A <- Jᵀ A J`, `V <- V J` in the (p, q) plane
fn rotate(a: &mut Array2<f64>, v: &mut Array2<f64>, p: usize, q: usize, c: f64, s: f64) {
    let n = a.nrows();
    for k in 0..n {
        let (akp, akq) = (a[[k, p]], a[[k, q]]);
        a[[k, p]] = c * akp - s * akq;
        a[[k, q]] = s * akp + c * akq;
    }
    for k in 0..n {
        let (apk, aqk) = (a[[p, k]], a[[q, k]]);
        a[[p, k]] = c * apk - s * aqk;
        a[[q, k]] = s * apk + c * aqk;
    }
    for k in 0..n {
        let (vkp, vkq) = (v[[k, p]], v[[k, q]]);
        v[[k, p]] = c * vkp - s * vkq;
        v[[k, q]] = s * vkp + c * vkq;
    }
}

/// Lowest eigenpair of a Hermitian matrix; the eigenvector is normalized
/// Gantree: hermitian_ground_state(m) -> Result<(f64, Vec<Complex64>)> // 바닥 상태
pub fn hermitian_ground_state(m: &Array2<Complex64>) -> HeaResult<(f64, Vec<Complex64>)> {
    let n = m.nrows();
    let is_real = m.iter().all(|z| z.im.abs() <= tol::HERMITIAN_TOL);
    if is_real {
        let (vals, vecs) = symmetric_eigen(&m.mapv(|z| z.re))?;
        let ground = vecs.column(0).iter().map(|&x| Complex64::new(x, 0.0)).collect();
        return Ok((vals[0], ground));
    }
    let mut big = Array2::<f64>::zeros((2 * n, 2 * n));
    for i in 0..n {
        for j in 0..n {
            let z = m[[i, j]];
            big[[i, j]] = z.re;
            big[[i + n, j + n]] = z.re;
            big[[i, j + n]] = -z.im;
            big[[i + n, j]] = z.im;
        }
    }
    let (vals, vecs) = symmetric_eigen(&big)?;
    let mut ground: Vec<Complex64> = (0..n)
        .map(|i| Complex64::new(vecs[[i, 0]], vecs[[i + n, 0]]))
        .collect();
    let norm = ground.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt();
    for z in &mut ground {
        *z /= norm;
    }
    Ok((vals[0], ground))
}

/// Dense matrix of `op` on `n_qubits` qubits
/// Gantree: dense_matrix(op, n) -> Result<Array2<Complex64>> // 밀집 행렬
pub fn dense_matrix(op: &QubitOperator, n_qubits: usize) -> HeaResult<Array2<Complex64>> {
    if n_qubits > MAX_DENSE_QUBITS {
        return Err(HeaError::TooManyQubits {
            engine: "dense matrix",
            qubits: n_qubits,
            max: MAX_DENSE_QUBITS,
        });
    }
    if op.num_qubits() > n_qubits {
        return Err(HeaError::QubitCountMismatch {
            hamiltonian: op.num_qubits(),
            circuit: n_qubits,
        });
    }
    let dim = 1usize << n_qubits;
    let mut m = Array2::<Complex64>::zeros((dim, dim));
    for (p, c) in op.iter() {
        for i in 0..dim {
            let (phase, j) = p.apply_basis(i);
            m[[j, i]] += c * phase;
        }
    }
    Ok(m)
}

/// Lowest eigenvalue of a Hermitian qubit operator
/// Gantree: ground_state_energy(op) -> Result<f64> // 최저 고유값
pub fn ground_state_energy(op: &QubitOperator) -> HeaResult<f64> {
    let n = op.num_qubits();
    Ok(hermitian_ground_state(&dense_matrix(op, n)?)?.0)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use hea_core::pauli::PauliString;
    use ndarray::array;

    #[test]
    fn test_symmetric_eigen_2x2() {
        let m = array![[2.0, 1.0], [1.0, 2.0]];
        let (vals, vecs) = symmetric_eigen(&m).unwrap();
        assert_abs_diff_eq!(vals[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(vals[1], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(vecs[[0, 0]].abs(), std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn test_symmetric_eigen_reconstructs() {
        let m = array![
            [4.0, -2.0, 0.5, 0.0],
            [-2.0, 3.0, 0.1, 1.0],
            [0.5, 0.1, -1.0, 0.3],
            [0.0, 1.0, 0.3, 2.0]
        ];
        let (vals, vecs) = symmetric_eigen(&m).unwrap();
        for k in 0..4 {
            let col = vecs.column(k);
            let mv = m.dot(&col);
            for i in 0..4 {
                assert_abs_diff_eq!(mv[i], vals[k] * col[i], epsilon = 1e-10);
            }
        }
        assert!(vals.windows(2).into_iter().all(|w| w[0] <= w[1]));
        assert_abs_diff_eq!(vals.sum(), 8.0, epsilon = 1e-10);
    }

    #[test]
    fn test_complex_hermitian_ground_state() {
        // Y has eigenvalues ±1 with complex eigenvectors
        let y: PauliString = "Y0".parse().unwrap();
        let op = QubitOperator::from(y);
        let m = dense_matrix(&op, 1).unwrap();
        let (e, psi) = hermitian_ground_state(&m).unwrap();
        assert_abs_diff_eq!(e, -1.0, epsilon = 1e-12);
        let exp = op.expectation(&psi).unwrap();
        assert_abs_diff_eq!(exp.re, -1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_ground_state_energy_heisenberg_pair() {
        // XX + YY + ZZ has singlet energy -3
        let op = QubitOperator::from(vec![
            ("X0 X1".parse().unwrap(), Complex64::new(1.0, 0.0)),
            ("Y0 Y1".parse().unwrap(), Complex64::new(1.0, 0.0)),
            ("Z0 Z1".parse().unwrap(), Complex64::new(1.0, 0.0)),
        ]);
        assert_abs_diff_eq!(ground_state_energy(&op).unwrap(), -3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_dense_matrix_limits() {
        let op = QubitOperator::from("Z3".parse::<PauliString>().unwrap());
        assert!(dense_matrix(&op, 2).is_err());
        assert!(dense_matrix(&op, MAX_DENSE_QUBITS + 1).is_err());
    }
}
