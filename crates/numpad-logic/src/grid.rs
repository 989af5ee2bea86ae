//! The 10-button color grid.
//!
//! Each numbered button (0–9) gets one color, drawn uniformly and
//! independently when the module is built. The grid never changes after
//! that. Randomness is injected so tests can replay fixed grids:
//!
//! ```
//! use numpad_logic::grid::ButtonColorGrid;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let a = ButtonColorGrid::random(&mut StdRng::seed_from_u64(7));
//! let b = ButtonColorGrid::random(&mut StdRng::seed_from_u64(7));
//! assert_eq!(a, b);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::ButtonColor;

/// Number of digit buttons on the keypad.
pub const BUTTON_COUNT: usize = 10;

/// Colors of buttons 0–9, indexed by the digit printed on the button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ButtonColorGrid {
    colors: [ButtonColor; BUTTON_COUNT],
}

impl ButtonColorGrid {
    /// Draw a fresh grid from `rng`.
    pub fn random(rng: &mut impl Rng) -> Self {
        let palette = ButtonColor::all();
        let mut colors = [ButtonColor::White; BUTTON_COUNT];
        for color in colors.iter_mut() {
            *color = palette[rng.gen_range(0..palette.len())];
        }
        Self { colors }
    }

    pub fn from_colors(colors: [ButtonColor; BUTTON_COUNT]) -> Self {
        Self { colors }
    }

    /// Build a grid from raw color indices (0 = white … 4 = red).
    /// Returns `None` if any index is out of range.
    pub fn from_indices(indices: [u8; BUTTON_COUNT]) -> Option<Self> {
        let mut colors = [ButtonColor::White; BUTTON_COUNT];
        for (slot, index) in colors.iter_mut().zip(indices) {
            *slot = ButtonColor::from_index(index)?;
        }
        Some(Self { colors })
    }

    pub fn colors(&self) -> &[ButtonColor; BUTTON_COUNT] {
        &self.colors
    }

    /// Color of the button labelled `digit`.
    pub fn color(&self, digit: usize) -> Option<ButtonColor> {
        self.colors.get(digit).copied()
    }

    /// How many buttons carry `color`.
    pub fn count(&self, color: ButtonColor) -> usize {
        self.colors.iter().filter(|c| **c == color).count()
    }

    /// Per-color totals, indexed by [`ButtonColor::index`].
    pub fn counts(&self) -> [usize; ButtonColor::COUNT] {
        let mut counts = [0; ButtonColor::COUNT];
        for color in &self.colors {
            counts[color.index()] += 1;
        }
        counts
    }

    /// Label shown on button `digit`: its digit, or its color initial while
    /// the colorblind overlay is active.
    pub fn label(&self, digit: usize, colorblind: bool) -> Option<char> {
        let color = self.color(digit)?;
        if colorblind {
            Some(color.initial())
        } else {
            char::from_digit(digit as u32, 10)
        }
    }

    pub fn labels(&self, colorblind: bool) -> [char; BUTTON_COUNT] {
        let mut labels = ['0'; BUTTON_COUNT];
        for (digit, label) in labels.iter_mut().enumerate() {
            if let Some(l) = self.label(digit, colorblind) {
                *label = l;
            }
        }
        labels
    }
}

/// Physical `(column, row)` of a digit button on the keypad, row 0 at the top.
///
/// ```text
/// 1 2 3
/// 4 5 6
/// 7 8 9
///   0
/// ```
pub fn keypad_position(digit: usize) -> Option<(usize, usize)> {
    match digit {
        0 => Some((1, 3)),
        1..=9 => Some(((digit - 1) % 3, (digit - 1) / 3)),
        _ => None,
    }
}
