//! Movement commands issued to the platform actuator.
//!
//! The actuator collaborator accepts a command name plus up to two numeric
//! parameters.  [`MovementCommand`] is the typed form; [`MovementCommand::name`]
//! and [`MovementCommand::params`] give the wire form.

use std::fmt;

use crate::Position;

/// One command for the flight platform.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementCommand {
    Takeoff,
    Land,
    MoveToGps(Position),
    MoveToAltitude(f64),
}

impl MovementCommand {
    /// Wire name understood by platform drivers.
    pub fn name(&self) -> &'static str {
        match self {
            MovementCommand::Takeoff           => "takeoff",
            MovementCommand::Land              => "land",
            MovementCommand::MoveToGps(_)      => "move_to_gps",
            MovementCommand::MoveToAltitude(_) => "move_to_altitude",
        }
    }

    /// Numeric parameters, at most two.
    pub fn params(&self) -> Vec<f64> {
        match *self {
            MovementCommand::Takeoff | MovementCommand::Land => Vec::new(),
            MovementCommand::MoveToGps(p)                    => vec![p.lat, p.lon],
            MovementCommand::MoveToAltitude(alt)             => vec![alt],
        }
    }
}

impl fmt::Display for MovementCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovementCommand::MoveToGps(p)        => write!(f, "move_to_gps{p}"),
            MovementCommand::MoveToAltitude(alt) => write!(f, "move_to_altitude({alt:.2})"),
            other                                => f.write_str(other.name()),
        }
    }
}

// ── Actuator ──────────────────────────────────────────────────────────────────

/// Sink for movement commands.  Commands are fire-and-forget; progress is
/// observed through telemetry on later ticks.
pub trait Actuator {
    fn execute(&mut self, command: MovementCommand);
}

impl<A: Actuator + ?Sized> Actuator for &mut A {
    #[inline]
    fn execute(&mut self, command: MovementCommand) {
        (**self).execute(command)
    }
}

/// An [`Actuator`] that records every command it receives.
#[derive(Debug, Default, Clone)]
pub struct CommandLog {
    pub commands: Vec<MovementCommand>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&MovementCommand> {
        self.commands.last()
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&mut self) -> Vec<MovementCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Actuator for CommandLog {
    fn execute(&mut self, command: MovementCommand) {
        self.commands.push(command);
    }
}
