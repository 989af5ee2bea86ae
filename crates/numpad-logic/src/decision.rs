//! The 4-level decision tree.
//!
//! Each level looks at the color grid and the bomb snapshot and picks which
//! share of the remaining wheel to take. Some paths also carry an effect on
//! the code assembled so far; the evaluator only reports it, the assembler
//! applies it.
//!
//! | Level | Paths | Checks, first match wins |
//! |-------|-------|---------------------------|
//! | 0 | 4 | ≥3 yellow · middle row all white/blue/red · vowel in serial · else |
//! | 1 | 4 | ≥2 blue and ≥3 green · button 5 not blue/white · <2 ports · else (maybe decrement) |
//! | 2 | 2 | >2 white and >2 yellow · else (reverse) |
//! | 3 | 2 | ≤2 yellow (increment all) · else |

use serde::{Deserialize, Serialize};

use crate::color::ButtonColor::{self, Blue, Green, Red, White, Yellow};
use crate::grid::ButtonColorGrid;
use crate::snapshot::PuzzleStateSnapshot;

/// Number of levels in the tree.
pub const LEVEL_COUNT: usize = 4;

/// Buttons 4, 5, 6.
const MIDDLE_ROW: [usize; 3] = [4, 5, 6];

/// Buttons 7, 8, 9.
const BOTTOM_ROW: [usize; 3] = [7, 8, 9];

/// Colors the middle row must be drawn from for level 0 path 1.
const COOL_OR_RED: [ButtonColor; 3] = [White, Blue, Red];

/// Extra change to the code that rides along with a chosen path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathEffect {
    /// Subtract one (mod 10) from digit 0, before this level's digit is appended.
    DecrementFirst,
    /// Reverse the code, after this level's digit is appended.
    ReverseCode,
    /// Add one (mod 10) to every digit, after this level's digit is appended.
    IncrementAll,
}

impl PathEffect {
    /// Whether the effect lands before the level's digit is appended.
    pub fn precedes_digit(self) -> bool {
        matches!(self, PathEffect::DecrementFirst)
    }
}

/// Outcome of one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathDecision {
    pub path: usize,
    pub effect: Option<PathEffect>,
}

impl PathDecision {
    fn plain(path: usize) -> Self {
        Self { path, effect: None }
    }

    fn with(path: usize, effect: PathEffect) -> Self {
        Self {
            path,
            effect: Some(effect),
        }
    }
}

/// Evaluate `level` (0–3). Returns `None` for any other level.
pub fn decide(
    level: usize,
    grid: &ButtonColorGrid,
    snapshot: &PuzzleStateSnapshot,
) -> Option<PathDecision> {
    match level {
        0 => Some(level_0(grid, snapshot)),
        1 => Some(level_1(grid, snapshot)),
        2 => Some(level_2(grid)),
        3 => Some(level_3(grid)),
        _ => None,
    }
}

fn level_0(grid: &ButtonColorGrid, snapshot: &PuzzleStateSnapshot) -> PathDecision {
    let colors = grid.colors();
    if grid.count(Yellow) >= 3 {
        PathDecision::plain(0)
    } else if MIDDLE_ROW.iter().all(|b| COOL_OR_RED.contains(&colors[*b])) {
        PathDecision::plain(1)
    } else if snapshot.serial_has_vowel() {
        PathDecision::plain(2)
    } else {
        PathDecision::plain(3)
    }
}

fn level_1(grid: &ButtonColorGrid, snapshot: &PuzzleStateSnapshot) -> PathDecision {
    let colors = grid.colors();
    if grid.count(Blue) >= 2 && grid.count(Green) >= 3 {
        PathDecision::plain(0)
    } else if colors[5] != Blue && colors[5] != White {
        PathDecision::plain(1)
    } else if snapshot.port_count() < 2 {
        PathDecision::plain(2)
    } else if BOTTOM_ROW.iter().any(|b| colors[*b] == Green) {
        PathDecision::with(3, PathEffect::DecrementFirst)
    } else {
        PathDecision::plain(3)
    }
}

fn level_2(grid: &ButtonColorGrid) -> PathDecision {
    if grid.count(White) > 2 && grid.count(Yellow) > 2 {
        PathDecision::plain(0)
    } else {
        PathDecision::with(1, PathEffect::ReverseCode)
    }
}

fn level_3(grid: &ButtonColorGrid) -> PathDecision {
    if grid.count(Yellow) <= 2 {
        PathDecision::with(0, PathEffect::IncrementAll)
    } else {
        PathDecision::plain(1)
    }
}
