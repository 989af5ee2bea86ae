//! Solution derivation.
//!
//! Walks the decision tree over the reference wheel, then applies the final
//! swap and parity reversal:
//!
//! 1. For each level: decide, apply any pre-digit effect, slice the wheel,
//!    append the digit, apply any post-digit effect.
//! 2. Swap one pair of positions (first matching rule wins):
//!    last serial digit even → 0↔2; battery count odd → 1↔2; otherwise 0↔3.
//! 3. Reverse the whole code if its digit sum is even.
//!
//! Derivation is a pure function of the grid and snapshot.

use serde::{Deserialize, Serialize};

use crate::code::{DigitCode, SolutionCode};
use crate::decision::{decide, PathDecision, PathEffect, LEVEL_COUNT};
use crate::error::DerivationError;
use crate::grid::ButtonColorGrid;
use crate::snapshot::PuzzleStateSnapshot;
use crate::wheel::{pick_from, CHOICES_PER_LEVEL, REFERENCE_WHEEL};

/// Which positional swap fired after assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinalSwap {
    /// Last serial digit even: positions 0 and 2.
    EvenSerialDigit,
    /// Battery count odd: positions 1 and 2.
    OddBatteryCount,
    /// Neither rule matched: positions 0 and 3.
    Fallback,
}

impl FinalSwap {
    pub fn select(snapshot: &PuzzleStateSnapshot) -> Self {
        if snapshot.last_serial_digit() % 2 == 0 {
            FinalSwap::EvenSerialDigit
        } else if snapshot.battery_count() % 2 == 1 {
            FinalSwap::OddBatteryCount
        } else {
            FinalSwap::Fallback
        }
    }

    pub fn positions(self) -> (usize, usize) {
        match self {
            FinalSwap::EvenSerialDigit => (0, 2),
            FinalSwap::OddBatteryCount => (1, 2),
            FinalSwap::Fallback => (0, 3),
        }
    }
}

/// One level of a derivation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelStep {
    pub level: usize,
    pub decision: PathDecision,
    /// Digit cut from the wheel at this level.
    pub digit: u8,
    /// Length of the wheel left for the next level.
    pub remaining: usize,
    /// Code after this level's digit and effects.
    pub code_after: DigitCode,
}

/// Full record of a derivation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationTrace {
    pub steps: Vec<LevelStep>,
    /// Code after the four levels, before the swap.
    pub assembled: DigitCode,
    pub swap: FinalSwap,
    /// Whether the even digit sum reversed the code.
    pub reversed: bool,
    pub solution: SolutionCode,
}

impl DerivationTrace {
    pub fn paths(&self) -> Vec<usize> {
        self.steps.iter().map(|s| s.decision.path).collect()
    }
}

/// Derive the code for `grid` and `snapshot` from the reference wheel.
pub fn derive_solution(
    grid: &ButtonColorGrid,
    snapshot: &PuzzleStateSnapshot,
) -> Result<SolutionCode, DerivationError> {
    Ok(derive_traced(grid, snapshot)?.solution)
}

/// Like [`derive_solution`], keeping every intermediate step.
pub fn derive_traced(
    grid: &ButtonColorGrid,
    snapshot: &PuzzleStateSnapshot,
) -> Result<DerivationTrace, DerivationError> {
    derive_from_wheel(REFERENCE_WHEEL, grid, snapshot)
}

/// Derivation over an arbitrary wheel. A wheel that does not divide evenly
/// at some level aborts with [`DerivationError::Slice`].
pub fn derive_from_wheel(
    wheel: &str,
    grid: &ButtonColorGrid,
    snapshot: &PuzzleStateSnapshot,
) -> Result<DerivationTrace, DerivationError> {
    let mut code = DigitCode::new();
    let mut remainder = wheel;
    let mut steps = Vec::with_capacity(LEVEL_COUNT);

    for (level, choices) in CHOICES_PER_LEVEL.into_iter().enumerate() {
        let decision =
            decide(level, grid, snapshot).ok_or(DerivationError::UnknownLevel { level })?;

        if let Some(effect) = decision.effect.filter(|e| e.precedes_digit()) {
            apply_effect(&mut code, effect)?;
        }

        let (digit, rest) = pick_from(remainder, decision.path, choices)
            .map_err(|source| DerivationError::Slice { level, source })?;
        remainder = rest;
        code.push(digit)?;

        if let Some(effect) = decision.effect.filter(|e| !e.precedes_digit()) {
            apply_effect(&mut code, effect)?;
        }

        steps.push(LevelStep {
            level,
            decision,
            digit,
            remaining: remainder.len(),
            code_after: code,
        });
    }

    let assembled = code;

    let swap = FinalSwap::select(snapshot);
    let (a, b) = swap.positions();
    code.swap(a, b)?;

    let reversed = code.digit_sum() % 2 == 0;
    if reversed {
        code.reverse();
    }

    Ok(DerivationTrace {
        steps,
        assembled,
        swap,
        reversed,
        solution: code.freeze()?,
    })
}

fn apply_effect(code: &mut DigitCode, effect: PathEffect) -> Result<(), DerivationError> {
    match effect {
        PathEffect::DecrementFirst => code.decrement_at(0),
        PathEffect::ReverseCode => {
            code.reverse();
            Ok(())
        }
        PathEffect::IncrementAll => {
            code.increment_all();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ButtonColor::*;
    use crate::error::SliceError;

    fn snapshot(serial: &str, batteries: u32, ports: u32) -> PuzzleStateSnapshot {
        PuzzleStateSnapshot::new(serial, batteries, ports, 0).unwrap()
    }

    #[test]
    fn test_all_red_grid() {
        let grid = ButtonColorGrid::from_colors([Red; 10]);
        let trace = derive_traced(&grid, &snapshot("BCD5F1", 0, 0)).unwrap();
        assert_eq!(trace.paths(), vec![1, 1, 1, 0]);
        assert_eq!(trace.assembled.to_string(), "3769");
        assert_eq!(trace.swap, FinalSwap::Fallback);
        assert!(!trace.reversed);
        assert_eq!(trace.solution.to_string(), "9763");
    }

    #[test]
    fn test_remaining_wheel_shrinks() {
        let grid = ButtonColorGrid::from_colors([Red; 10]);
        let trace = derive_traced(&grid, &snapshot("BCD5F1", 0, 0)).unwrap();
        let remaining: Vec<usize> = trace.steps.iter().map(|s| s.remaining).collect();
        assert_eq!(remaining, vec![28, 6, 2, 0]);
    }

    #[test]
    fn test_swap_priority() {
        // even serial digit wins even with an odd battery count
        assert_eq!(
            FinalSwap::select(&snapshot("AB1CD4", 3, 0)),
            FinalSwap::EvenSerialDigit
        );
        assert_eq!(
            FinalSwap::select(&snapshot("AB1CD5", 3, 0)),
            FinalSwap::OddBatteryCount
        );
        assert_eq!(
            FinalSwap::select(&snapshot("AB1CD5", 4, 0)),
            FinalSwap::Fallback
        );
        // zero counts as even
        assert_eq!(
            FinalSwap::select(&snapshot("AB1CD0", 1, 0)),
            FinalSwap::EvenSerialDigit
        );
    }

    #[test]
    fn test_broken_wheel_fails_fast() {
        let grid = ButtonColorGrid::from_colors([Red; 10]);
        let err = derive_from_wheel("1234567", &grid, &snapshot("BCD5F1", 0, 0)).unwrap_err();
        assert_eq!(
            err,
            DerivationError::Slice {
                level: 0,
                source: SliceError::UnevenSplit { len: 7, choices: 4 }
            }
        );
    }

    #[test]
    fn test_wheel_too_short_for_later_levels() {
        // 8 digits split into 4 shares leaves a 1-digit remainder for level 1.
        let grid = ButtonColorGrid::from_colors([Red; 10]);
        let err = derive_from_wheel("12345678", &grid, &snapshot("BCD5F1", 0, 0)).unwrap_err();
        assert!(matches!(err, DerivationError::Slice { level: 1, .. }));
    }
}
