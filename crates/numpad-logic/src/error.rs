//! Errors raised while building puzzle inputs and deriving a solution.
//!
//! None of these are player-facing. A [`SliceError`] means the reference
//! wheel or the decision tree is broken, and derivation must stop instead of
//! producing a wrong code.

use thiserror::Error;

/// Invalid arguments passed to [`crate::wheel::pick_from`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SliceError {
    #[error("choice count must be positive")]
    NoChoices,
    #[error("choice {choice} out of range for {choices} choices")]
    ChoiceOutOfRange { choice: usize, choices: usize },
    #[error("wheel length {len} is not divisible by the choice count {choices}")]
    UnevenSplit { len: usize, choices: usize },
    #[error("wheel character {found:?} at offset {offset} is not a decimal digit")]
    NotADigit { found: char, offset: usize },
}

/// Rejected bomb facts while building a [`crate::snapshot::PuzzleStateSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("serial number is empty")]
    EmptySerial,
    #[error("serial number {serial:?} does not end in a digit")]
    SerialWithoutTrailingDigit { serial: String },
}

/// Text that is not a 4-digit code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeParseError {
    #[error("expected 4 digits, found {found} characters")]
    WrongLength { found: usize },
    #[error("{found:?} is not a decimal digit")]
    NotADigit { found: char },
    #[error("{found} is not a decimal digit value")]
    DigitOutOfRange { found: u8 },
}

/// Failure of the whole derivation run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    #[error("slicing the wheel at level {level} failed: {source}")]
    Slice {
        level: usize,
        #[source]
        source: SliceError,
    },
    #[error("decision tree has no level {level}")]
    UnknownLevel { level: usize },
    #[error("digit position {position} is outside a code of length {len}")]
    PositionOutOfRange { position: usize, len: usize },
    #[error("code is full; cannot append another digit")]
    CodeFull,
    #[error("derivation produced {len} digits instead of 4")]
    Incomplete { len: usize },
}
