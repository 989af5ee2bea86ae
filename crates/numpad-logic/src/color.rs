//! Button colors.
//!
//! The discriminants are the indices the module has always used for its
//! color table, so grids written out as `u8` stay stable.

use serde::{Deserialize, Serialize};

/// Color painted on a keypad button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonColor {
    White = 0,
    Green = 1,
    Yellow = 2,
    Blue = 3,
    Red = 4,
}

impl ButtonColor {
    /// Number of distinct colors.
    pub const COUNT: usize = 5;

    pub fn all() -> &'static [ButtonColor] {
        &[
            ButtonColor::White,
            ButtonColor::Green,
            ButtonColor::Yellow,
            ButtonColor::Blue,
            ButtonColor::Red,
        ]
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::all().get(index as usize).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ButtonColor::White => "White",
            ButtonColor::Green => "Green",
            ButtonColor::Yellow => "Yellow",
            ButtonColor::Blue => "Blue",
            ButtonColor::Red => "Red",
        }
    }

    /// Uppercase first letter, shown on the button while the colorblind
    /// overlay is active.
    pub fn initial(self) -> char {
        match self {
            ButtonColor::White => 'W',
            ButtonColor::Green => 'G',
            ButtonColor::Yellow => 'Y',
            ButtonColor::Blue => 'B',
            ButtonColor::Red => 'R',
        }
    }
}

impl std::fmt::Display for ButtonColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
