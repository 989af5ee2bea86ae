//! Keypad buttons and the chat command grammar.
//!
//! Hosts wire every physical button to one handler through [`Button`], and
//! chat automation is turned into a list of timed presses the host plays
//! back through the same handler.
//!
//! Recognized commands (case-insensitive):
//!
//! - `submit 1234` / `press 1234` (digits may be space separated)
//! - `colorblind` / `cb`

use serde::{Deserialize, Serialize};

use crate::code::CODE_LEN;

/// Help text shown by chat hosts. `{0}` is replaced with the module's id.
pub const HELP_MESSAGE: &str =
    "Submit a code with !{0} submit 1234 (or !{0} press 1234). Show color initials with !{0} colorblind (or !{0} cb).";

/// A keypad button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    Digit(u8),
    Clear,
    Submit,
}

impl Button {
    /// Buttons 0–9 are the digits, 10 is clear, 11 is submit.
    pub const COUNT: usize = 12;

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0..=9 => Some(Button::Digit(index as u8)),
            10 => Some(Button::Clear),
            11 => Some(Button::Submit),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Button::Digit(d) => d as usize,
            Button::Clear => 10,
            Button::Submit => 11,
        }
    }

    /// Map a scene object name (`Button0`…`Button9`, `ButtonClear`,
    /// `ButtonSubmit`) to its button.
    pub fn from_object_name(name: &str) -> Option<Self> {
        let suffix = name.strip_prefix("Button")?;
        match suffix {
            "Clear" => Some(Button::Clear),
            "Submit" => Some(Button::Submit),
            _ => {
                let mut chars = suffix.chars();
                let digit = chars.next()?.to_digit(10)?;
                if chars.next().is_some() {
                    return None;
                }
                Some(Button::Digit(digit as u8))
            }
        }
    }
}

/// A parsed chat command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Clear, type the digits, submit.
    Submit([u8; CODE_LEN]),
    ToggleColorblind,
}

/// A press the host should perform after waiting `delay_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledInput {
    pub button: Button,
    pub delay_secs: f64,
}

/// Parse one chat message. Anything unrecognized is `None`.
pub fn parse_command(input: &str) -> Option<Command> {
    let lowered = input.trim().to_lowercase();
    let mut words = lowered.split_whitespace();
    let verb = words.next()?;

    match verb {
        "colorblind" | "cb" => {
            if words.next().is_some() {
                return None;
            }
            Some(Command::ToggleColorblind)
        }
        "submit" | "press" => {
            let entered: String = words.collect();
            if entered.len() != CODE_LEN || !entered.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let mut digits = [0u8; CODE_LEN];
            for (slot, b) in digits.iter_mut().zip(entered.bytes()) {
                *slot = b - b'0';
            }
            Some(Command::Submit(digits))
        }
        _ => None,
    }
}

/// Presses that enter `digits`: clear first, then each digit, then submit.
/// The first press happens immediately.
pub fn submit_sequence(digits: [u8; CODE_LEN], press_delay_secs: f64) -> Vec<ScheduledInput> {
    let mut presses = Vec::with_capacity(CODE_LEN + 2);
    presses.push(ScheduledInput {
        button: Button::Clear,
        delay_secs: 0.0,
    });
    for d in digits {
        presses.push(ScheduledInput {
            button: Button::Digit(d),
            delay_secs: press_delay_secs,
        });
    }
    presses.push(ScheduledInput {
        button: Button::Submit,
        delay_secs: press_delay_secs,
    });
    presses
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_indices() {
        for i in 0..Button::COUNT {
            assert_eq!(Button::from_index(i).unwrap().index(), i);
        }
        assert_eq!(Button::from_index(12), None);
    }

    #[test]
    fn test_object_names() {
        assert_eq!(Button::from_object_name("Button7"), Some(Button::Digit(7)));
        assert_eq!(Button::from_object_name("ButtonClear"), Some(Button::Clear));
        assert_eq!(Button::from_object_name("ButtonSubmit"), Some(Button::Submit));
        assert_eq!(Button::from_object_name("Button"), None);
        assert_eq!(Button::from_object_name("Button12"), None);
        assert_eq!(Button::from_object_name("Lever3"), None);
    }

    #[test]
    fn test_parse_submit_forms() {
        assert_eq!(parse_command("submit 1234"), Some(Command::Submit([1, 2, 3, 4])));
        assert_eq!(parse_command("PRESS 0917"), Some(Command::Submit([0, 9, 1, 7])));
        assert_eq!(parse_command("  press 1 2 3 4 "), Some(Command::Submit([1, 2, 3, 4])));
    }

    #[test]
    fn test_parse_colorblind() {
        assert_eq!(parse_command("colorblind"), Some(Command::ToggleColorblind));
        assert_eq!(parse_command("CB"), Some(Command::ToggleColorblind));
        assert_eq!(parse_command("cb now"), None);
    }

    #[test]
    fn test_unrecognized_is_none() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("submit"), None);
        assert_eq!(parse_command("submit 123"), None);
        assert_eq!(parse_command("submit 12345"), None);
        assert_eq!(parse_command("submit 12a4"), None);
        assert_eq!(parse_command("cut the red wire"), None);
    }

    #[test]
    fn test_submit_sequence_order_and_delays() {
        let seq = submit_sequence([5, 0, 5, 3], 0.1);
        let buttons: Vec<Button> = seq.iter().map(|s| s.button).collect();
        assert_eq!(
            buttons,
            vec![
                Button::Clear,
                Button::Digit(5),
                Button::Digit(0),
                Button::Digit(5),
                Button::Digit(3),
                Button::Submit,
            ]
        );
        assert_eq!(seq[0].delay_secs, 0.0);
        assert!(seq[1..].iter().all(|s| s.delay_secs == 0.1));
    }
}
