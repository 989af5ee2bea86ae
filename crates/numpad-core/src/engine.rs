//! Module engine - main entry point for running one Number Pad.
//!
//! The host owns the clock and the event loop. It builds the module, calls
//! [`NumberPadModule::activate`] once when the bomb starts, forwards every
//! button press through [`NumberPadModule::press`] and calls
//! [`NumberPadModule::tick`] every frame. Time is always passed in as
//! monotonic seconds.

use numpad_logic::assembler::derive_traced;
use numpad_logic::code::{SolutionCode, CODE_LEN};
use numpad_logic::commands::{parse_command, submit_sequence, Button, Command, ScheduledInput};
use numpad_logic::error::DerivationError;
use numpad_logic::grid::{ButtonColorGrid, BUTTON_COUNT};
use numpad_logic::snapshot::PuzzleStateSnapshot;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ModuleConfig;
use crate::host::{ModuleHost, ModuleId};
use crate::widgets::{capture_snapshot, BombInfo, WidgetError};

/// Shown on the display when an internal error auto-solves the module.
pub const ERROR_DISPLAY: &str = "ERROR";

/// Lifecycle of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleState {
    /// Built, waiting for the bomb to start. Presses do nothing.
    Inactive,
    /// Solution derived, accepting input.
    Active,
    /// Correct code entered. Terminal.
    Solved,
}

/// What a single press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    Ignored,
    Entered,
    Cleared,
    Pass,
    Strike,
}

/// Activation could not produce a solution.
#[derive(Debug, Error)]
pub enum ActivationError {
    #[error("could not read the bomb: {0}")]
    Widget(#[from] WidgetError),
    #[error("could not derive a solution: {0}")]
    Derivation(#[from] DerivationError),
}

/// One Number Pad on a bomb.
#[derive(Debug, Clone)]
pub struct NumberPadModule {
    id: ModuleId,
    config: ModuleConfig,
    grid: ButtonColorGrid,
    state: ModuleState,
    snapshot: Option<PuzzleStateSnapshot>,
    solution: Option<SolutionCode>,
    display: String,
    last_strike: Option<f64>,
    colorblind_until: Option<f64>,
}

impl NumberPadModule {
    /// Build a module with a freshly drawn color grid.
    pub fn new(id: ModuleId, config: ModuleConfig, rng: &mut impl Rng) -> Self {
        Self::with_grid(id, config, ButtonColorGrid::random(rng))
    }

    pub fn with_grid(id: ModuleId, config: ModuleConfig, grid: ButtonColorGrid) -> Self {
        Self {
            id,
            config,
            grid,
            state: ModuleState::Inactive,
            snapshot: None,
            solution: None,
            display: String::with_capacity(ERROR_DISPLAY.len()),
            last_strike: None,
            colorblind_until: None,
        }
    }

    fn label(&self) -> String {
        format!("[Number Pad {}]", self.id)
    }

    /// Query the bomb once and derive the solution.
    ///
    /// Only the first call does anything. On failure the module stays
    /// inactive, unless `pass_on_internal_error` is set, in which case it
    /// shows [`ERROR_DISPLAY`] and solves itself.
    pub fn activate(
        &mut self,
        info: &impl BombInfo,
        host: &mut impl ModuleHost,
    ) -> Result<(), ActivationError> {
        if self.state != ModuleState::Inactive {
            log::warn!("{} Module already activated!", self.label());
            return Ok(());
        }

        match capture_snapshot(info, self.config.fallback_serial.as_deref()) {
            Ok(snapshot) => self.activate_with_snapshot(snapshot, host),
            Err(e) => self.fail_activation(e.into(), host),
        }
    }

    /// Derive the solution from an already captured snapshot.
    pub fn activate_with_snapshot(
        &mut self,
        snapshot: PuzzleStateSnapshot,
        host: &mut impl ModuleHost,
    ) -> Result<(), ActivationError> {
        if self.state != ModuleState::Inactive {
            log::warn!("{} Module already activated!", self.label());
            return Ok(());
        }

        let trace = match derive_traced(&self.grid, &snapshot) {
            Ok(t) => t,
            Err(e) => return self.fail_activation(e.into(), host),
        };

        let label = self.label();
        log::info!(
            "{} Colors: {}",
            label,
            self.grid
                .colors()
                .iter()
                .map(|c| c.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        log::info!(
            "{} Serial {}, {} batteries, {} ports",
            label,
            snapshot.serial_number(),
            snapshot.battery_count(),
            snapshot.port_count()
        );
        for step in &trace.steps {
            log::debug!(
                "{} Level {}: path {}, digit {}, code so far {}",
                label,
                step.level,
                step.decision.path,
                step.digit,
                step.code_after
            );
        }
        log::debug!(
            "{} Assembled {}, swap {:?}, reversed: {}",
            label,
            trace.assembled,
            trace.swap,
            trace.reversed
        );
        log::info!("{} Solution is {}", label, trace.solution);

        self.snapshot = Some(snapshot);
        self.solution = Some(trace.solution);
        self.state = ModuleState::Active;
        Ok(())
    }

    fn fail_activation(
        &mut self,
        err: ActivationError,
        host: &mut impl ModuleHost,
    ) -> Result<(), ActivationError> {
        log::error!("{} {}", self.label(), err);
        if !self.config.pass_on_internal_error {
            return Err(err);
        }

        log::warn!("{} Awarding a pass after internal error", self.label());
        self.display = ERROR_DISPLAY.to_string();
        self.state = ModuleState::Solved;
        host.handle_pass();
        Ok(())
    }

    /// Handle a press of the button at `index` (0–9 digits, 10 clear,
    /// 11 submit). Unknown indices are ignored.
    pub fn press_index(
        &mut self,
        index: usize,
        now: f64,
        host: &mut impl ModuleHost,
    ) -> PressOutcome {
        match Button::from_index(index) {
            Some(button) => self.press(button, now, host),
            None => PressOutcome::Ignored,
        }
    }

    /// Handle one button press.
    pub fn press(&mut self, button: Button, now: f64, host: &mut impl ModuleHost) -> PressOutcome {
        self.tick(now);
        if self.state != ModuleState::Active {
            return PressOutcome::Ignored;
        }

        match button {
            Button::Digit(d) => {
                if d > 9 || self.display.len() >= CODE_LEN {
                    return PressOutcome::Ignored;
                }
                self.display.push(char::from(b'0' + d));
                PressOutcome::Entered
            }
            Button::Clear => {
                self.display.clear();
                PressOutcome::Cleared
            }
            Button::Submit => self.submit(now, host),
        }
    }

    fn submit(&mut self, now: f64, host: &mut impl ModuleHost) -> PressOutcome {
        if self.display.len() < CODE_LEN {
            return PressOutcome::Ignored;
        }
        if self.in_strike_cooldown(now) {
            log::debug!("{} Ignoring submit during strike cooldown", self.label());
            return PressOutcome::Ignored;
        }
        let Some(solution) = self.solution else {
            return PressOutcome::Ignored;
        };

        if solution.matches(&self.display) {
            log::info!("{} Entered {}. Module solved.", self.label(), self.display);
            self.state = ModuleState::Solved;
            host.handle_pass();
            PressOutcome::Pass
        } else {
            log::info!(
                "{} Entered {}, expected {}. Strike!",
                self.label(),
                self.display,
                solution
            );
            self.last_strike = Some(now);
            host.handle_strike();
            PressOutcome::Strike
        }
    }

    fn in_strike_cooldown(&self, now: f64) -> bool {
        self.last_strike
            .is_some_and(|t| now - t < self.config.strike_cooldown_secs)
    }

    /// Per-frame update: expire the strike cooldown (clearing the display)
    /// and the colorblind overlay.
    pub fn tick(&mut self, now: f64) {
        if let Some(t) = self.last_strike {
            if now - t >= self.config.strike_cooldown_secs {
                self.display.clear();
                self.last_strike = None;
            }
        }
        if let Some(until) = self.colorblind_until {
            if now >= until {
                self.colorblind_until = None;
            }
        }
    }

    /// Run a chat command.
    ///
    /// Returns the presses the host should play back (empty for commands
    /// that act immediately), or `None` if the text is not a command.
    pub fn handle_command(&mut self, text: &str, now: f64) -> Option<Vec<ScheduledInput>> {
        match parse_command(text)? {
            Command::ToggleColorblind => {
                self.toggle_colorblind(now);
                Some(Vec::new())
            }
            Command::Submit(digits) => Some(submit_sequence(digits, self.config.press_delay_secs)),
        }
    }

    /// Play back scheduled presses starting at `start`, advancing the clock
    /// by each press's delay. Returns every outcome and the time of the last
    /// press.
    pub fn play(
        &mut self,
        inputs: &[ScheduledInput],
        start: f64,
        host: &mut impl ModuleHost,
    ) -> (Vec<PressOutcome>, f64) {
        let mut now = start;
        let mut outcomes = Vec::with_capacity(inputs.len());
        for input in inputs {
            now += input.delay_secs;
            outcomes.push(self.press(input.button, now, host));
        }
        (outcomes, now)
    }

    pub fn toggle_colorblind(&mut self, now: f64) {
        self.colorblind_until = if self.is_colorblind_active(now) {
            None
        } else {
            Some(now + self.config.colorblind_duration_secs)
        };
    }

    pub fn is_colorblind_active(&self, now: f64) -> bool {
        self.colorblind_until.is_some_and(|until| now < until)
    }

    /// Text on each digit button right now.
    pub fn labels(&self, now: f64) -> [char; BUTTON_COUNT] {
        self.grid.labels(self.is_colorblind_active(now))
    }

    pub fn id(&self) -> ModuleId {
        self.id
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    pub fn grid(&self) -> &ButtonColorGrid {
        &self.grid
    }

    pub fn state(&self) -> ModuleState {
        self.state
    }

    pub fn snapshot(&self) -> Option<&PuzzleStateSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn solution(&self) -> Option<SolutionCode> {
        self.solution
    }

    pub fn display(&self) -> &str {
        &self.display
    }
}
