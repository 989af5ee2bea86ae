//! Property-based tests for slicing, digit transforms and derivation.

use proptest::prelude::*;

use numpad_logic::assembler::{derive_solution, derive_traced, FinalSwap};
use numpad_logic::code::{increment_digit, DigitCode};
use numpad_logic::error::SliceError;
use numpad_logic::grid::ButtonColorGrid;
use numpad_logic::snapshot::PuzzleStateSnapshot;
use numpad_logic::wheel::pick_from;

/// Strategy: a random color grid.
fn grid_strategy() -> impl Strategy<Value = ButtonColorGrid> {
    prop::array::uniform10(0u8..5).prop_map(|idx| ButtonColorGrid::from_indices(idx).unwrap())
}

/// Strategy: a snapshot with a serial ending in a digit.
fn snapshot_strategy() -> impl Strategy<Value = PuzzleStateSnapshot> {
    ("[A-Z0-9]{5}[0-9]", 0u32..8, 0u32..8, 0u32..20).prop_map(|(serial, bat, ports, solved)| {
        PuzzleStateSnapshot::new(&serial, bat, ports, solved).unwrap()
    })
}

/// Strategy: a digit string that splits evenly into `choices` shares.
fn wheel_strategy() -> impl Strategy<Value = (String, usize)> {
    (1usize..=6, 1usize..=10).prop_flat_map(|(choices, span)| {
        (
            prop::collection::vec(0u8..10, choices * span)
                .prop_map(|d| d.iter().map(|x| char::from(b'0' + x)).collect::<String>()),
            Just(choices),
        )
    })
}

fn code_from(digits: [u8; 4]) -> DigitCode {
    let mut code = DigitCode::new();
    for d in digits {
        code.push(d).unwrap();
    }
    code
}

proptest! {
    // 1. Shares tile the input with no gap or overlap
    #[test]
    fn slices_tile_input((input, choices) in wheel_strategy()) {
        let span = input.len() / choices;
        let mut rebuilt = String::new();
        for choice in 0..choices {
            let (digit, rest) = pick_from(&input, choice, choices).unwrap();
            prop_assert_eq!(rest.len(), span - 1);
            rebuilt.push(char::from(b'0' + digit));
            rebuilt.push_str(rest);
        }
        prop_assert_eq!(rebuilt, input);
    }

    // 2. Out-of-range choices always fail
    #[test]
    fn slice_rejects_bad_choice((input, choices) in wheel_strategy(), extra in 0usize..5) {
        let result = pick_from(&input, choices + extra, choices);
        prop_assert_eq!(
            result,
            Err(SliceError::ChoiceOutOfRange { choice: choices + extra, choices })
        );
    }

    // 3. Lengths that don't divide always fail
    #[test]
    fn slice_rejects_uneven_length(
        digits in prop::collection::vec(0u8..10, 1..40),
        choices in 2usize..6,
    ) {
        let input: String = digits.iter().map(|x| char::from(b'0' + x)).collect();
        prop_assume!(input.len() % choices != 0);
        let is_uneven = matches!(
            pick_from(&input, 0, choices),
            Err(SliceError::UnevenSplit { .. })
        );
        prop_assert!(is_uneven);
    }

    // 4. Ten increments return every digit to itself
    #[test]
    fn increment_cycles(d in 0u8..10) {
        let mut x = d;
        for _ in 0..10 {
            x = increment_digit(x);
        }
        prop_assert_eq!(x, d);
    }

    // 5. Swapping or reversing twice is the identity
    #[test]
    fn swap_and_reverse_are_involutions(
        digits in prop::array::uniform4(0u8..10),
        a in 0usize..4,
        b in 0usize..4,
    ) {
        let original = code_from(digits);
        let mut code = original;
        code.swap(a, b).unwrap();
        code.swap(a, b).unwrap();
        prop_assert_eq!(code, original);
        code.reverse();
        code.reverse();
        prop_assert_eq!(code, original);
    }

    // 6. Derivation is a pure function of its inputs
    #[test]
    fn derivation_deterministic(grid in grid_strategy(), snap in snapshot_strategy()) {
        let a = derive_solution(&grid, &snap).unwrap();
        let b = derive_solution(&grid, &snap).unwrap();
        prop_assert_eq!(a, b);
    }

    // 7. Exactly one swap fires, and the rest is at most a reversal
    #[test]
    fn single_swap_then_parity_reversal(grid in grid_strategy(), snap in snapshot_strategy()) {
        let trace = derive_traced(&grid, &snap).unwrap();

        let expected_swap = if snap.last_serial_digit() % 2 == 0 {
            FinalSwap::EvenSerialDigit
        } else if snap.battery_count() % 2 == 1 {
            FinalSwap::OddBatteryCount
        } else {
            FinalSwap::Fallback
        };
        prop_assert_eq!(trace.swap, expected_swap);

        let mut code = trace.assembled;
        let (a, b) = trace.swap.positions();
        code.swap(a, b).unwrap();
        let even = code.digit_sum() % 2 == 0;
        prop_assert_eq!(trace.reversed, even);
        if even {
            code.reverse();
        }
        prop_assert_eq!(code.freeze().unwrap(), trace.solution);
    }

    // 8. Every level consumes the expected share of the wheel
    #[test]
    fn remaining_wheel_lengths(grid in grid_strategy(), snap in snapshot_strategy()) {
        let trace = derive_traced(&grid, &snap).unwrap();
        let remaining: Vec<usize> = trace.steps.iter().map(|s| s.remaining).collect();
        prop_assert_eq!(remaining, vec![28, 6, 2, 0]);
    }
}
