//! Number Pad Headless Validation Harness
//!
//! Validates the derivation pipeline and the module runtime without a game
//! host. Runs entirely in-process: no rendering, no chat, no real clock.
//!
//! Usage:
//!   cargo run -p numpad-simtest
//!   cargo run -p numpad-simtest -- --verbose

use std::collections::HashSet;

use numpad_core::config::ModuleConfig;
use numpad_core::engine::{ModuleState, NumberPadModule, PressOutcome};
use numpad_core::host::{ModuleId, RecordingHost};
use numpad_core::widgets::{capture_snapshot, StaticBombInfo};
use numpad_logic::assembler::{derive_traced, FinalSwap};
use numpad_logic::code::CODE_LEN;
use numpad_logic::color::ButtonColor;
use numpad_logic::commands::{parse_command, Button, Command};
use numpad_logic::error::SnapshotError;
use numpad_logic::grid::ButtonColorGrid;
use numpad_logic::snapshot::PuzzleStateSnapshot;
use numpad_logic::wheel::{pick_from, validate_wheel, CHOICES_PER_LEVEL, REFERENCE_WHEEL};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

// ── Scenario fixtures (same JSON the integration tests use) ─────────────
const SCENARIOS_JSON: &str = include_str!("../../../data/scenarios.json");

#[derive(Debug, Deserialize)]
struct Scenario {
    name: String,
    grid: [ButtonColor; 10],
    serial: String,
    batteries: u32,
    ports: u32,
    lit_indicators: Vec<String>,
    paths: Vec<usize>,
    expected: String,
}

const SWEEP_SEED: u64 = 0x4e55_4d50;
const SWEEP_GRIDS: usize = 2000;
const SESSION_COUNT: usize = 200;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Number Pad Validation Harness ===\n");

    let mut results = Vec::new();

    // 1. Reference wheel shape
    results.extend(validate_reference_wheel(verbose));

    // 2. Fixture scenarios
    results.extend(validate_scenarios(verbose));

    // 3. Seeded random grid sweep
    results.extend(validate_random_sweep(verbose));

    // 4. Module sessions against a recording host
    results.extend(validate_module_sessions(verbose));

    // 5. Chat command grammar
    results.extend(validate_command_grammar(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Reference Wheel ──────────────────────────────────────────────────

fn validate_reference_wheel(verbose: bool) -> Vec<TestResult> {
    println!("--- Reference Wheel ---");
    let mut results = Vec::new();

    let check = validate_wheel(REFERENCE_WHEEL);
    results.push(TestResult {
        name: "wheel_splits_evenly".into(),
        passed: check.is_ok(),
        detail: match &check {
            Ok(()) => format!("{} digits", REFERENCE_WHEEL.len()),
            Err(e) => e.to_string(),
        },
    });

    // Walk every path through the wheel and record the share widths.
    let mut widths = Vec::new();
    let mut frontier = vec![REFERENCE_WHEEL];
    let mut leaf_count = 0;
    let mut walk_ok = true;
    for &choices in &CHOICES_PER_LEVEL {
        let mut next = Vec::new();
        for input in &frontier {
            for choice in 0..choices {
                match pick_from(input, choice, choices) {
                    Ok((_, rest)) => next.push(rest),
                    Err(_) => walk_ok = false,
                }
            }
        }
        widths.push(frontier.first().map_or(0, |s| s.len() / choices));
        leaf_count = next.len();
        frontier = next;
    }
    results.push(TestResult {
        name: "wheel_every_path_slices".into(),
        passed: walk_ok && leaf_count == 64,
        detail: format!("{} leaf paths, share widths {:?}", leaf_count, widths),
    });

    results.push(TestResult {
        name: "wheel_share_widths".into(),
        passed: widths == vec![29, 7, 3, 1],
        detail: format!("{:?}", widths),
    });

    if verbose {
        let firsts: Vec<String> = (0..4)
            .filter_map(|c| pick_from(REFERENCE_WHEEL, c, 4).ok())
            .map(|(d, _)| d.to_string())
            .collect();
        println!("  Level 0 digits: {}", firsts.join(" "));
    }

    results
}

// ── 2. Fixture Scenarios ────────────────────────────────────────────────

fn validate_scenarios(verbose: bool) -> Vec<TestResult> {
    println!("--- Fixture Scenarios ---");
    let mut results = Vec::new();

    let scenarios: Vec<Scenario> = match serde_json::from_str(SCENARIOS_JSON) {
        Ok(s) => s,
        Err(e) => {
            results.push(TestResult {
                name: "scenarios_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "scenarios_not_empty".into(),
        passed: !scenarios.is_empty(),
        detail: format!("{} scenarios loaded", scenarios.len()),
    });

    for s in &scenarios {
        let grid = ButtonColorGrid::from_colors(s.grid);
        let snapshot = match PuzzleStateSnapshot::new(&s.serial, s.batteries, s.ports, 0) {
            Ok(snap) => snap.with_lit_indicators(s.lit_indicators.iter().cloned()),
            Err(e) => {
                results.push(TestResult {
                    name: format!("scenario_{}", s.name),
                    passed: false,
                    detail: e.to_string(),
                });
                continue;
            }
        };

        let (passed, detail) = match derive_traced(&grid, &snapshot) {
            Ok(trace) => {
                let code = trace.solution.to_string();
                let paths = trace.paths();
                (
                    code == s.expected && paths == s.paths,
                    format!(
                        "paths {:?} -> {} (expected {:?} -> {})",
                        paths, code, s.paths, s.expected
                    ),
                )
            }
            Err(e) => (false, e.to_string()),
        };
        results.push(TestResult {
            name: format!("scenario_{}", s.name),
            passed,
            detail,
        });
    }

    // The same bombs described as widget records must capture identically.
    let mismatched: Vec<&str> = scenarios
        .iter()
        .filter(|s| {
            let mut bomb = StaticBombInfo::new(&s.serial).with_batteries(&[s.batteries]);
            bomb.port_plates = vec![vec!["Serial".to_string(); s.ports as usize]];
            for label in &s.lit_indicators {
                bomb = bomb.with_indicator(label, true);
            }
            let direct = PuzzleStateSnapshot::new(&s.serial, s.batteries, s.ports, 0)
                .map(|snap| snap.with_lit_indicators(s.lit_indicators.iter().cloned()));
            match (capture_snapshot(&bomb, None), direct) {
                (Ok(captured), Ok(direct)) => captured != direct,
                _ => true,
            }
        })
        .map(|s| s.name.as_str())
        .collect();
    results.push(TestResult {
        name: "scenarios_widget_capture".into(),
        passed: mismatched.is_empty(),
        detail: if mismatched.is_empty() {
            "widget records capture the same snapshots".into()
        } else {
            format!("capture differs for: {}", mismatched.join(", "))
        },
    });

    if verbose {
        println!("  Scenario codes:");
        for s in &scenarios {
            println!("    {:32}: {}", s.name, s.expected);
        }
    }

    results
}

// ── 3. Random Sweep ─────────────────────────────────────────────────────

fn random_snapshot(rng: &mut impl Rng) -> Result<PuzzleStateSnapshot, SnapshotError> {
    const SERIAL_CHARS: &[u8] = b"ABCDEFGHIJKLMNPQRSTUVWXZ0123456789";
    let mut serial: String = (0..5)
        .map(|_| char::from(SERIAL_CHARS[rng.gen_range(0..SERIAL_CHARS.len())]))
        .collect();
    serial.push(char::from(b'0' + rng.gen_range(0..10u8)));
    PuzzleStateSnapshot::new(
        &serial,
        rng.gen_range(0..7),
        rng.gen_range(0..7),
        rng.gen_range(0..12),
    )
}

fn validate_random_sweep(verbose: bool) -> Vec<TestResult> {
    println!("--- Random Sweep ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(SWEEP_SEED);

    let mut errors = 0;
    let mut nondeterministic = 0;
    let mut bad_remaining = 0;
    let mut bad_swap = 0;
    let mut path_counts = [[0usize; 4]; 4];
    let mut reversed = 0;
    let mut codes = HashSet::new();

    for _ in 0..SWEEP_GRIDS {
        let grid = ButtonColorGrid::random(&mut rng);
        let Ok(snapshot) = random_snapshot(&mut rng) else {
            errors += 1;
            continue;
        };

        let trace = match derive_traced(&grid, &snapshot) {
            Ok(t) => t,
            Err(_) => {
                errors += 1;
                continue;
            }
        };
        match derive_traced(&grid, &snapshot) {
            Ok(again) if again == trace => {}
            _ => nondeterministic += 1,
        }

        let remaining: Vec<usize> = trace.steps.iter().map(|s| s.remaining).collect();
        if remaining != [28, 6, 2, 0] {
            bad_remaining += 1;
        }

        let expected_swap = if snapshot.last_serial_digit() % 2 == 0 {
            FinalSwap::EvenSerialDigit
        } else if snapshot.battery_count() % 2 == 1 {
            FinalSwap::OddBatteryCount
        } else {
            FinalSwap::Fallback
        };
        if trace.swap != expected_swap {
            bad_swap += 1;
        }

        for step in &trace.steps {
            path_counts[step.level][step.decision.path] += 1;
        }
        if trace.reversed {
            reversed += 1;
        }
        codes.insert(trace.solution);
    }

    results.push(TestResult {
        name: "sweep_no_errors".into(),
        passed: errors == 0,
        detail: format!("{} derivation errors over {} grids", errors, SWEEP_GRIDS),
    });
    results.push(TestResult {
        name: "sweep_deterministic".into(),
        passed: nondeterministic == 0,
        detail: format!("{} repeat derivations differed", nondeterministic),
    });
    results.push(TestResult {
        name: "sweep_remaining_lengths".into(),
        passed: bad_remaining == 0,
        detail: format!("{} traces with unexpected remainder lengths", bad_remaining),
    });
    results.push(TestResult {
        name: "sweep_single_swap".into(),
        passed: bad_swap == 0,
        detail: format!("{} traces with the wrong swap", bad_swap),
    });

    // Every branch of every level should be reachable from random input.
    let unreached: Vec<String> = path_counts
        .iter()
        .enumerate()
        .flat_map(|(level, counts)| {
            counts
                .iter()
                .take(CHOICES_PER_LEVEL[level])
                .enumerate()
                .filter(|&(_, &n)| n == 0)
                .map(move |(path, _)| format!("L{}P{}", level, path))
        })
        .collect();
    results.push(TestResult {
        name: "sweep_all_paths_reached".into(),
        passed: unreached.is_empty(),
        detail: if unreached.is_empty() {
            "every path taken at least once".into()
        } else {
            format!("never taken: {}", unreached.join(", "))
        },
    });

    results.push(TestResult {
        name: "sweep_both_parities".into(),
        passed: reversed > 0 && reversed < SWEEP_GRIDS - errors,
        detail: format!("{} of {} codes reversed", reversed, SWEEP_GRIDS - errors),
    });

    if verbose {
        println!("  Path distribution over {} grids:", SWEEP_GRIDS);
        for (level, counts) in path_counts.iter().enumerate() {
            println!(
                "    level {}: {:?}",
                level,
                &counts[..CHOICES_PER_LEVEL[level]]
            );
        }
        println!("  {} distinct codes", codes.len());
    }

    results
}

// ── 4. Module Sessions ──────────────────────────────────────────────────

fn wrong_code(code: [u8; CODE_LEN]) -> [u8; CODE_LEN] {
    let mut wrong = code;
    wrong[0] = (wrong[0] + 1) % 10;
    wrong
}

fn enter(
    module: &mut NumberPadModule,
    digits: [u8; CODE_LEN],
    now: f64,
    host: &mut RecordingHost,
) -> PressOutcome {
    for d in digits {
        module.press(Button::Digit(d), now, host);
    }
    module.press(Button::Submit, now, host)
}

fn validate_module_sessions(_verbose: bool) -> Vec<TestResult> {
    println!("--- Module Sessions ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(SWEEP_SEED ^ 0xff);
    let config = ModuleConfig::default();
    let cooldown = config.strike_cooldown_secs;

    let mut activation_failures = 0;
    let mut strike_failures = 0;
    let mut cooldown_failures = 0;
    let mut solve_failures = 0;
    let mut host = RecordingHost::default();

    for i in 0..SESSION_COUNT {
        let mut module = NumberPadModule::new(ModuleId(i as u32), config.clone(), &mut rng);
        let Ok(snapshot) = random_snapshot(&mut rng) else {
            activation_failures += 1;
            continue;
        };
        let mut bomb = StaticBombInfo::new(snapshot.serial_number())
            .with_batteries(&[snapshot.battery_count()]);
        bomb.port_plates = vec![vec!["DVI".to_string(); snapshot.port_count() as usize]];

        let solution = match module.activate(&bomb, &mut host).ok().and(module.solution()) {
            Some(code) => code,
            None => {
                activation_failures += 1;
                continue;
            }
        };
        let code = solution.digits();
        let mut now = 1.0;

        // A wrong entry strikes, a repeat within the cooldown does not.
        let first = enter(&mut module, wrong_code(code), now, &mut host);
        let repeat = module.press(Button::Submit, now + cooldown / 2.0, &mut host);
        if first != PressOutcome::Strike || repeat != PressOutcome::Ignored {
            strike_failures += 1;
        }

        now += cooldown;
        module.tick(now);
        if !module.display().is_empty() {
            cooldown_failures += 1;
        }

        let Some(inputs) = module.handle_command(&format!("submit {}", solution), now) else {
            solve_failures += 1;
            continue;
        };
        let (outcomes, _) = module.play(&inputs, now, &mut host);
        if outcomes.last() != Some(&PressOutcome::Pass) || module.state() != ModuleState::Solved
        {
            solve_failures += 1;
        }
    }

    results.push(TestResult {
        name: "session_activation".into(),
        passed: activation_failures == 0,
        detail: format!(
            "{} of {} modules failed to activate",
            activation_failures, SESSION_COUNT
        ),
    });
    results.push(TestResult {
        name: "session_strike_and_cooldown".into(),
        passed: strike_failures == 0 && cooldown_failures == 0,
        detail: format!(
            "{} bad strike sequences, {} displays not cleared",
            strike_failures, cooldown_failures
        ),
    });
    results.push(TestResult {
        name: "session_command_solves".into(),
        passed: solve_failures == 0,
        detail: format!("{} sessions not solved by command", solve_failures),
    });
    results.push(TestResult {
        name: "session_host_callbacks".into(),
        passed: host.passes as usize == SESSION_COUNT && host.strikes as usize == SESSION_COUNT,
        detail: format!("{} passes, {} strikes", host.passes, host.strikes),
    });

    results
}

// ── 5. Command Grammar ──────────────────────────────────────────────────

fn validate_command_grammar(_verbose: bool) -> Vec<TestResult> {
    println!("--- Command Grammar ---");
    let mut results = Vec::new();

    let cases: [(&str, Option<Command>); 9] = [
        ("submit 1234", Some(Command::Submit([1, 2, 3, 4]))),
        ("PRESS 9 7 6 3", Some(Command::Submit([9, 7, 6, 3]))),
        ("  submit 0000 ", Some(Command::Submit([0, 0, 0, 0]))),
        ("colorblind", Some(Command::ToggleColorblind)),
        ("CB", Some(Command::ToggleColorblind)),
        ("submit 123", None),
        ("submit 12345", None),
        ("submit 12a4", None),
        ("cut the red wire", None),
    ];

    let wrong: Vec<String> = cases
        .iter()
        .filter(|(input, expected)| parse_command(input) != *expected)
        .map(|(input, _)| format!("{:?}", input))
        .collect();
    results.push(TestResult {
        name: "grammar_cases".into(),
        passed: wrong.is_empty(),
        detail: if wrong.is_empty() {
            format!("{} inputs parsed as expected", cases.len())
        } else {
            format!("misparsed: {}", wrong.join(", "))
        },
    });

    let unmapped: Vec<usize> = (0..Button::COUNT)
        .filter(|&i| Button::from_index(i).map(Button::index) != Some(i))
        .collect();
    results.push(TestResult {
        name: "grammar_button_indices".into(),
        passed: unmapped.is_empty() && Button::from_index(Button::COUNT).is_none(),
        detail: format!("{} buttons mapped", Button::COUNT - unmapped.len()),
    });

    results
}
