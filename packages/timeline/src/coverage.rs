// ABOUTME: Counts of actionable steps that carry advice
// ABOUTME: Progress display only; derived from the phase list on demand

use std::iter::Sum;
use std::ops::Add;

use leadflow_core::CustomPhaseConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdviceCoverage {
    pub with_advice: usize,
    pub total: usize,
}

impl AdviceCoverage {
    pub fn of_phase(phase: &CustomPhaseConfig) -> Self {
        Self {
            with_advice: phase
                .actionable_steps
                .iter()
                .filter(|s| s.has_advice())
                .count(),
            total: phase.actionable_steps.len(),
        }
    }

    /// Whole percentage; an empty phase counts as fully covered
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        (100.0 * self.with_advice as f64 / self.total as f64).round() as u8
    }

    pub fn is_complete(&self) -> bool {
        self.with_advice == self.total
    }
}

impl Add for AdviceCoverage {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            with_advice: self.with_advice + other.with_advice,
            total: self.total + other.total,
        }
    }
}

impl Sum for AdviceCoverage {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounds() {
        let coverage = AdviceCoverage {
            with_advice: 1,
            total: 3,
        };
        assert_eq!(coverage.percent(), 33);
        assert!(!coverage.is_complete());
    }

    #[test]
    fn test_empty_is_complete() {
        assert_eq!(AdviceCoverage::default().percent(), 100);
        assert!(AdviceCoverage::default().is_complete());
    }
}
