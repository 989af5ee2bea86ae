//! The game-host side of the module lifecycle.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier assigned by whatever creates module instances. Used only to
/// label log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId(pub u32);

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Callbacks into the game when the player solves the module or earns a
/// strike.
pub trait ModuleHost {
    fn handle_pass(&mut self);
    fn handle_strike(&mut self);
}

/// Host that only counts callbacks. Used by tests and the headless harness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordingHost {
    pub passes: u32,
    pub strikes: u32,
}

impl ModuleHost for RecordingHost {
    fn handle_pass(&mut self) {
        self.passes += 1;
    }

    fn handle_strike(&mut self) {
        self.strikes += 1;
    }
}
