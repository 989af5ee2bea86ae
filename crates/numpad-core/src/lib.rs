//! Number Pad Core - module runtime on top of `numpad-logic`.
//!
//! Owns everything stateful about a single Number Pad: reading the bomb's
//! widgets once at activation, the display buffer, submission and strikes,
//! the colorblind overlay and chat commands. Solution derivation itself
//! lives in `numpad-logic`.
//!
//! # Example
//!
//! ```
//! use numpad_core::prelude::*;
//! use numpad_logic::color::ButtonColor;
//! use numpad_logic::grid::ButtonColorGrid;
//!
//! let grid = ButtonColorGrid::from_colors([ButtonColor::Red; 10]);
//! let mut module = NumberPadModule::with_grid(ModuleId(1), ModuleConfig::default(), grid);
//! let mut host = RecordingHost::default();
//!
//! module.activate(&StaticBombInfo::new("BCD5F1"), &mut host).unwrap();
//!
//! let inputs = module.handle_command("submit 9763", 0.0).unwrap();
//! module.play(&inputs, 0.0, &mut host);
//! assert_eq!(module.state(), ModuleState::Solved);
//! assert_eq!(host.passes, 1);
//! ```

pub mod config;
pub mod engine;
pub mod host;
pub mod widgets;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::config::ModuleConfig;
    pub use crate::engine::{ModuleState, NumberPadModule, PressOutcome};
    pub use crate::host::{ModuleHost, ModuleId, RecordingHost};
    pub use crate::widgets::{BombInfo, StaticBombInfo};
}
