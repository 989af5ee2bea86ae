//! Reference wheel and the slicing primitive.
//!
//! Every solution digit is cut out of one fixed digit string. Level 0 splits
//! the whole wheel into 4 shares, takes the head digit of the chosen share
//! and hands the rest of that share to level 1, and so on:
//!
//! | Level | Choices | Input length | Share | Remainder |
//! |-------|---------|--------------|-------|-----------|
//! | 0 | 4 | 116 | 29 | 28 |
//! | 1 | 4 | 28 | 7 | 6 |
//! | 2 | 2 | 6 | 3 | 2 |
//! | 3 | 2 | 2 | 1 | 0 |
//!
//! If the wheel is ever changed, [`validate_wheel`] must still pass.

use crate::error::SliceError;

/// The fixed reference digit string.
pub const REFERENCE_WHEEL: &str =
    "22468313395143690979890789940526034176635285026086097984297491480871855832860082003490389675061692920733696061238335";

/// Number of paths at each decision level.
pub const CHOICES_PER_LEVEL: [usize; 4] = [4, 4, 2, 2];

/// Select share `choice` of `choices` equal shares of `input`.
///
/// Returns the share's first digit and the rest of the share (the digit
/// itself is not part of the remainder).
///
/// ```
/// use numpad_logic::wheel::pick_from;
///
/// let (digit, rest) = pick_from("123456", 1, 2).unwrap();
/// assert_eq!(digit, 4);
/// assert_eq!(rest, "56");
/// ```
pub fn pick_from(input: &str, choice: usize, choices: usize) -> Result<(u8, &str), SliceError> {
    if choices == 0 {
        return Err(SliceError::NoChoices);
    }
    if choice >= choices {
        return Err(SliceError::ChoiceOutOfRange { choice, choices });
    }
    if let Some((offset, found)) = input.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
        return Err(SliceError::NotADigit { found, offset });
    }
    // All ASCII from here on, so byte offsets are character offsets.
    let len = input.len();
    if len % choices != 0 {
        return Err(SliceError::UnevenSplit { len, choices });
    }

    let span = len / choices;
    let offset = span * choice;
    let digit = input.as_bytes()[offset] - b'0';
    Ok((digit, &input[offset + 1..offset + span]))
}

/// Check that `wheel` survives every slicing stage whatever path is taken.
///
/// All shares at a level have the same length, so following path 0 is
/// enough to check every branch.
pub fn validate_wheel(wheel: &str) -> Result<(), SliceError> {
    let mut rest = wheel;
    for choices in CHOICES_PER_LEVEL {
        let (_, next) = pick_from(rest, 0, choices)?;
        rest = next;
    }
    Ok(())
}
