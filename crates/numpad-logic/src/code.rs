//! Digit code buffer and the frozen solution.
//!
//! [`DigitCode`] is the working buffer while the solution is assembled: a
//! fixed array of up to four digits with bounds-checked positional writes.
//! Once all four digits are placed it is frozen into a [`SolutionCode`],
//! which is what player input is compared against.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CodeParseError, DerivationError};

/// Digits in a complete code.
pub const CODE_LEN: usize = 4;

/// Add one, wrapping 9 to 0.
pub fn increment_digit(digit: u8) -> u8 {
    (digit + 1) % 10
}

/// Subtract one, wrapping 0 to 9.
pub fn decrement_digit(digit: u8) -> u8 {
    (digit + 9) % 10
}

/// A code under construction (0 to 4 digits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DigitCode {
    digits: [u8; CODE_LEN],
    len: usize,
}

impl DigitCode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == CODE_LEN
    }

    pub fn digits(&self) -> &[u8] {
        &self.digits[..self.len]
    }

    /// Append a digit at the end.
    pub fn push(&mut self, digit: u8) -> Result<(), DerivationError> {
        debug_assert!(digit < 10, "not a decimal digit: {}", digit);
        if self.is_full() {
            return Err(DerivationError::CodeFull);
        }
        self.digits[self.len] = digit;
        self.len += 1;
        Ok(())
    }

    fn check(&self, position: usize) -> Result<(), DerivationError> {
        if position < self.len {
            Ok(())
        } else {
            Err(DerivationError::PositionOutOfRange {
                position,
                len: self.len,
            })
        }
    }

    pub fn increment_at(&mut self, position: usize) -> Result<(), DerivationError> {
        self.check(position)?;
        self.digits[position] = increment_digit(self.digits[position]);
        Ok(())
    }

    pub fn decrement_at(&mut self, position: usize) -> Result<(), DerivationError> {
        self.check(position)?;
        self.digits[position] = decrement_digit(self.digits[position]);
        Ok(())
    }

    /// Add one (mod 10) to every digit placed so far.
    pub fn increment_all(&mut self) {
        for digit in &mut self.digits[..self.len] {
            *digit = increment_digit(*digit);
        }
    }

    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), DerivationError> {
        self.check(a)?;
        self.check(b)?;
        self.digits.swap(a, b);
        Ok(())
    }

    /// Reverse the digits placed so far.
    pub fn reverse(&mut self) {
        self.digits[..self.len].reverse();
    }

    pub fn digit_sum(&self) -> u32 {
        self.digits().iter().map(|d| *d as u32).sum()
    }

    /// Lock the code. Fails unless exactly four digits are present.
    pub fn freeze(self) -> Result<SolutionCode, DerivationError> {
        if !self.is_full() {
            return Err(DerivationError::Incomplete { len: self.len });
        }
        Ok(SolutionCode(self.digits))
    }
}

impl fmt::Display for DigitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for digit in self.digits() {
            write!(f, "{}", digit)?;
        }
        Ok(())
    }
}

/// A complete, immutable 4-digit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u8; CODE_LEN]")]
pub struct SolutionCode([u8; CODE_LEN]);

impl SolutionCode {
    /// Returns `None` if any value is not a decimal digit.
    pub fn from_digits(digits: [u8; CODE_LEN]) -> Option<Self> {
        Self::try_from(digits).ok()
    }

    pub fn digits(&self) -> [u8; CODE_LEN] {
        self.0
    }

    /// Compare against what the player typed.
    pub fn matches(&self, entered: &str) -> bool {
        entered.parse::<SolutionCode>().is_ok_and(|c| c == *self)
    }
}

impl fmt::Display for SolutionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for digit in self.0 {
            write!(f, "{}", digit)?;
        }
        Ok(())
    }
}

impl TryFrom<[u8; CODE_LEN]> for SolutionCode {
    type Error = CodeParseError;

    fn try_from(digits: [u8; CODE_LEN]) -> Result<Self, Self::Error> {
        match digits.iter().find(|d| **d > 9) {
            Some(&found) => Err(CodeParseError::DigitOutOfRange { found }),
            None => Ok(Self(digits)),
        }
    }
}

impl FromStr for SolutionCode {
    type Err = CodeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let count = s.chars().count();
        if count != CODE_LEN {
            return Err(CodeParseError::WrongLength { found: count });
        }
        let mut digits = [0u8; CODE_LEN];
        for (slot, ch) in digits.iter_mut().zip(s.chars()) {
            *slot = ch.to_digit(10).ok_or(CodeParseError::NotADigit { found: ch })? as u8;
        }
        Ok(Self(digits))
    }
}
