//! Simulated flight platform: just enough kinematics to close the loop
//! between movement commands and telemetry.
//!
//! A platform flies straight at constant ground speed towards its GPS
//! target and climbs or descends at constant vertical speed towards its
//! altitude target.  The horizontal and vertical axes are independent.
//! A target counts as reached once within [`PlatformParams::arrival_tolerance_m`]
//! (horizontal) or [`PlatformParams::altitude_tolerance_m`] (vertical).

use swarm_core::{Actuator, MovementCommand, Position};
use swarm_readiness::Telemetry;
use tracing::trace;

/// Flight performance shared by every simulated platform.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlatformParams {
    pub ground_speed_mps:     f64,
    pub climb_rate_mps:       f64,
    pub takeoff_altitude_m:   f64,
    pub arrival_tolerance_m:  f64,
    pub altitude_tolerance_m: f64,
}

impl Default for PlatformParams {
    fn default() -> Self {
        Self {
            ground_speed_mps:     5.0,
            climb_rate_mps:       1.0,
            takeoff_altitude_m:   2.0,
            arrival_tolerance_m:  0.25,
            altitude_tolerance_m: 0.1,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimPlatform {
    params:          PlatformParams,
    position:        Position,
    altitude_m:      f64,
    target:          Option<Position>,
    target_altitude: Option<f64>,
    commands:        u64,
}

impl SimPlatform {
    /// A grounded platform at `position`.
    pub fn new(position: Position, params: PlatformParams) -> Self {
        Self {
            params,
            position,
            altitude_m:      0.0,
            target:          None,
            target_altitude: None,
            commands:        0,
        }
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    #[inline]
    pub fn altitude_m(&self) -> f64 {
        self.altitude_m
    }

    #[inline]
    pub fn target(&self) -> Option<Position> {
        self.target
    }

    /// Commands executed so far.
    #[inline]
    pub fn commands(&self) -> u64 {
        self.commands
    }

    pub fn gps_target_reached(&self) -> bool {
        self.target
            .is_some_and(|t| self.position.distance_m(t) <= self.params.arrival_tolerance_m)
    }

    pub fn altitude_reached(&self) -> bool {
        self.target_altitude
            .is_some_and(|a| (self.altitude_m - a).abs() <= self.params.altitude_tolerance_m)
    }

    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            position:           self.position,
            altitude_m:         self.altitude_m,
            gps_target_reached: self.gps_target_reached(),
            altitude_reached:   self.altitude_reached(),
        }
    }

    /// Advance the kinematics by `dt_secs`.
    pub fn step(&mut self, dt_secs: f64) {
        if let Some(target) = self.target {
            let remaining = self.position.distance_m(target);
            let reach = self.params.ground_speed_mps * dt_secs;
            self.position = if remaining <= reach || remaining == 0.0 {
                target
            } else {
                self.position.lerp(target, reach / remaining)
            };
        }
        if let Some(goal) = self.target_altitude {
            let climb = self.params.climb_rate_mps * dt_secs;
            let delta = goal - self.altitude_m;
            self.altitude_m = if delta.abs() <= climb { goal } else { self.altitude_m + climb * delta.signum() };
        }
    }
}

impl Actuator for SimPlatform {
    fn execute(&mut self, command: MovementCommand) {
        trace!(%command, "platform command");
        self.commands += 1;
        match command {
            MovementCommand::Takeoff            => self.target_altitude = Some(self.params.takeoff_altitude_m),
            MovementCommand::Land               => self.target_altitude = Some(0.0),
            MovementCommand::MoveToGps(target)  => self.target = Some(target),
            MovementCommand::MoveToAltitude(a)  => self.target_altitude = Some(a),
        }
    }
}
