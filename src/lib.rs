//! Wave Shooter - a single-screen arcade shooter core.
//!
//! Core modules:
//! - `entities`: data model and the session state aggregate
//! - `compute`: movement, combat and progression subsystems
//! - `session`: lifecycle state machine and periodic drivers
//! - `config`: difficulty table and tunable settings
//! - `events`: side-effect events for audio and UI collaborators

pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod session;

pub use config::{Difficulty, Settings};
pub use entities::{Frame, GameState, SessionPhase};
pub use error::{ConfigError, SessionError};
pub use events::{AudioCue, EventSink, GameEvent};
pub use session::{Direction, Input, Session};
