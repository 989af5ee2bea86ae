//! Bomb-wide facts captured once, when the module activates.
//!
//! The snapshot is read-only after construction. The runtime never re-queries
//! the bomb afterwards, so a code derived from it stays valid for the whole
//! session even if the host later reports different widget values.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;

const VOWELS: &[char] = &['A', 'E', 'I', 'O', 'U'];

/// Widget-derived inputs to the decision tree.
///
/// Deserializing goes through [`PuzzleStateSnapshot::new`], so the last
/// serial digit is always recomputed from the serial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SnapshotFields")]
pub struct PuzzleStateSnapshot {
    serial_number: String,
    last_serial_digit: u8,
    battery_count: u32,
    port_count: u32,
    solved_module_count: u32,
    lit_indicator_labels: BTreeSet<String>,
}

/// Unchecked snapshot fields as they appear in serialized form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SnapshotFields {
    pub serial_number: String,
    pub battery_count: u32,
    pub port_count: u32,
    pub solved_module_count: u32,
    pub lit_indicator_labels: BTreeSet<String>,
}

impl TryFrom<SnapshotFields> for PuzzleStateSnapshot {
    type Error = SnapshotError;

    fn try_from(fields: SnapshotFields) -> Result<Self, Self::Error> {
        Ok(Self::new(
            &fields.serial_number,
            fields.battery_count,
            fields.port_count,
            fields.solved_module_count,
        )?
        .with_lit_indicators(fields.lit_indicator_labels))
    }
}

impl PuzzleStateSnapshot {
    /// Build a snapshot. The serial number must end in a decimal digit.
    pub fn new(
        serial_number: &str,
        battery_count: u32,
        port_count: u32,
        solved_module_count: u32,
    ) -> Result<Self, SnapshotError> {
        let last = serial_number
            .chars()
            .last()
            .ok_or(SnapshotError::EmptySerial)?;
        let last_serial_digit = match last.to_digit(10) {
            Some(d) => d as u8,
            None => {
                return Err(SnapshotError::SerialWithoutTrailingDigit {
                    serial: serial_number.to_string(),
                })
            }
        };

        Ok(Self {
            serial_number: serial_number.to_string(),
            last_serial_digit,
            battery_count,
            port_count,
            solved_module_count,
            lit_indicator_labels: BTreeSet::new(),
        })
    }

    /// Attach the labels of lit indicators.
    pub fn with_lit_indicators<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lit_indicator_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn last_serial_digit(&self) -> u8 {
        self.last_serial_digit
    }

    pub fn battery_count(&self) -> u32 {
        self.battery_count
    }

    pub fn port_count(&self) -> u32 {
        self.port_count
    }

    pub fn solved_module_count(&self) -> u32 {
        self.solved_module_count
    }

    pub fn lit_indicator_labels(&self) -> &BTreeSet<String> {
        &self.lit_indicator_labels
    }

    pub fn is_indicator_lit(&self, label: &str) -> bool {
        self.lit_indicator_labels.contains(label)
    }

    /// Whether the serial number contains A, E, I, O or U (uppercase only,
    /// serials are always uppercase).
    pub fn serial_has_vowel(&self) -> bool {
        self.serial_number.chars().any(|c| VOWELS.contains(&c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_digit_taken_from_serial() {
        let s = PuzzleStateSnapshot::new("AB1CD3", 2, 3, 0).unwrap();
        assert_eq!(s.last_serial_digit(), 3);
        assert_eq!(s.serial_number(), "AB1CD3");
        assert_eq!(s.battery_count(), 2);
        assert_eq!(s.port_count(), 3);
    }

    #[test]
    fn test_serial_must_end_in_digit() {
        assert_eq!(
            PuzzleStateSnapshot::new("", 0, 0, 0),
            Err(SnapshotError::EmptySerial)
        );
        assert!(matches!(
            PuzzleStateSnapshot::new("AB1CDE", 0, 0, 0),
            Err(SnapshotError::SerialWithoutTrailingDigit { .. })
        ));
    }

    #[test]
    fn test_deserialize_recomputes_last_digit() {
        let s: PuzzleStateSnapshot = serde_json::from_str(
            r#"{ "serial_number": "AB1CD7", "last_serial_digit": 4, "battery_count": 2 }"#,
        )
        .unwrap();
        assert_eq!(s.last_serial_digit(), 7);
        assert_eq!(s.battery_count(), 2);

        let original = PuzzleStateSnapshot::new("XK2ZT8", 1, 4, 3)
            .unwrap()
            .with_lit_indicators(["FRK"]);
        let json = serde_json::to_string(&original).unwrap();
        assert_eq!(
            serde_json::from_str::<PuzzleStateSnapshot>(&json).unwrap(),
            original
        );

        assert!(serde_json::from_str::<PuzzleStateSnapshot>(r#"{ "serial_number": "AB1CDE" }"#)
            .is_err());
    }

    #[test]
    fn test_vowel_detection() {
        let with = PuzzleStateSnapshot::new("QEZ9R4", 0, 0, 0).unwrap();
        let without = PuzzleStateSnapshot::new("XK2ZT7", 0, 0, 0).unwrap();
        let lowercase = PuzzleStateSnapshot::new("xa2zt7", 0, 0, 0).unwrap();
        assert!(with.serial_has_vowel());
        assert!(!without.serial_has_vowel());
        assert!(!lowercase.serial_has_vowel());
    }

    #[test]
    fn test_lit_indicators() {
        let s = PuzzleStateSnapshot::new("XK2ZT7", 0, 0, 0)
            .unwrap()
            .with_lit_indicators(["FRK", "CAR"]);
        assert!(s.is_indicator_lit("FRK"));
        assert!(s.is_indicator_lit("CAR"));
        assert!(!s.is_indicator_lit("BOB"));
        assert_eq!(s.lit_indicator_labels().len(), 2);
    }
}
