//! Window convergence detector
//!
//! Gantree: L5_Optim → Convergence
//!
//! Keeps the last `window` objective values. The run counts as converged
//! once the window is full and its spread falls below
//! `threshold · max(1, |mean|)`.

use crate::config::OptimizerConfig;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Sliding-window convergence checker
/// Gantree: Convergence // 수렴 판단
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Convergence {
    /// Window size
    /// Gantree: window: usize // 윈도우 크기
    pub window: usize,

    /// Relative spread threshold
    /// Gantree: threshold: f64 // 임계
    pub threshold: f64,

    /// Recent values
    history: VecDeque<f64>,
}

impl Convergence {
    /// Create new convergence checker
    /// Gantree: new(window, threshold) -> Self // 생성자
    pub fn new(window: usize, threshold: f64) -> Self {
        Self {
            window,
            threshold,
            history: VecDeque::with_capacity(window),
        }
    }

    /// Window settings of an optimizer configuration
    pub fn from_config(config: &OptimizerConfig) -> Self {
        Self::new(config.window, config.window_threshold)
    }

    /// Record a value
    /// Gantree: push(&mut, value) // 이력 추가
    pub fn push(&mut self, value: f64) {
        self.history.push_back(value);
        while self.history.len() > self.window {
            self.history.pop_front();
        }
    }

    /// `max - min` over the window
    pub fn spread(&self) -> f64 {
        let (lo, hi) = self
            .history
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        hi - lo
    }

    /// Mean over the window
    pub fn mean(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }
        self.history.iter().sum::<f64>() / self.history.len() as f64
    }

    /// Check if converged
    /// Gantree: check(&self) -> bool // 수렴 체크
    pub fn check(&self) -> bool {
        self.history.len() >= self.window
            && self.spread() <= self.threshold * self.mean().abs().max(1.0)
    }

    /// Forget the history
    /// Gantree: reset(&mut) // 초기화
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Check if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl Default for Convergence {
    fn default() -> Self {
        Self::from_config(&OptimizerConfig::adam())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_full_window() {
        let mut conv = Convergence::new(3, 1e-6);
        conv.push(1.0);
        conv.push(1.0);
        assert!(!conv.check());
        conv.push(1.0);
        assert!(conv.check());
    }

    #[test]
    fn test_window_slides() {
        let mut conv = Convergence::new(3, 1e-3);
        for v in [5.0, 2.0, -1.0, -1.0, -1.0] {
            conv.push(v);
        }
        assert_eq!(conv.len(), 3);
        assert!(conv.check());
        conv.push(-1.5);
        assert!(!conv.check());
        assert_eq!(conv.spread(), 0.5);
    }

    #[test]
    fn test_threshold_is_relative() {
        let mut conv = Convergence::new(2, 1e-6);
        conv.push(-1000.0);
        conv.push(-1000.0005);
        assert!(conv.check());
        conv.reset();
        assert!(conv.is_empty());
        conv.push(0.1);
        conv.push(0.1005);
        assert!(!conv.check());
    }

    #[test]
    fn test_default_matches_adam() {
        let conv = Convergence::default();
        assert_eq!(conv.window, 20);
        assert_eq!(conv.threshold, 1e-6);
    }
}
