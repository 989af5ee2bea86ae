//! Pure solution-derivation logic for the Number Pad module.
//!
//! This crate contains everything about the puzzle that is independent of
//! the game host. Functions take plain data and return results, making them
//! unit-testable and usable from the module runtime, the headless harness,
//! and any future host.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`assembler`] | Solution derivation entry point (4 levels, swap, parity reversal) |
//! | [`code`] | Digit code buffer and the frozen 4-digit [`code::SolutionCode`] |
//! | [`color`] | The five button colors |
//! | [`commands`] | Chat command grammar and scheduled input sequences |
//! | [`decision`] | 4-level decision tree over the color grid and bomb snapshot |
//! | [`error`] | Contract-violation errors raised during derivation |
//! | [`grid`] | Randomly assigned 10-button color grid and keypad layout |
//! | [`snapshot`] | Bomb-wide facts captured once at activation |
//! | [`wheel`] | Reference wheel constant and the slicing primitive |
//!
//! ```
//! use numpad_logic::assembler::derive_solution;
//! use numpad_logic::color::ButtonColor;
//! use numpad_logic::grid::ButtonColorGrid;
//! use numpad_logic::snapshot::PuzzleStateSnapshot;
//!
//! let grid = ButtonColorGrid::from_colors([ButtonColor::Red; 10]);
//! let snapshot = PuzzleStateSnapshot::new("BCD5F1", 0, 0, 0).unwrap();
//! let code = derive_solution(&grid, &snapshot).unwrap();
//! assert_eq!(code.to_string(), "9763");
//! ```

pub mod assembler;
pub mod code;
pub mod color;
pub mod commands;
pub mod decision;
pub mod error;
pub mod grid;
pub mod snapshot;
pub mod wheel;
