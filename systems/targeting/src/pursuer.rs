//! Pursuer state owned by the world and updated by the targeting system.

use std::time::Duration;

use maze_chase_core::{Body, BodyKind, Direction, PursuerId, PursuerSnapshot, PursuitPhase, Tile};

use crate::strategy::{Behaviour, Profile};

/// Heading every pursuer has when it enters the board.
const SPAWN_DIRECTION: Direction = Direction::Up;

/// A body steered by a targeting strategy.
#[derive(Clone, Debug, PartialEq)]
pub struct Pursuer {
    profile: Profile,
    body: Body,
    spawn: Tile,
    target: Tile,
    vulnerable: bool,
    last_evaluation: Option<Duration>,
}

impl Pursuer {
    /// Places a running pursuer on its spawn tile, facing up.
    #[must_use]
    pub fn spawn(profile: Profile, spawn: Tile, speed: f32, tile_length: f32) -> Self {
        Self {
            profile,
            body: fresh_body(spawn, speed, tile_length),
            spawn,
            target: profile.home_corner(),
            vulnerable: false,
            last_evaluation: None,
        }
    }

    /// Identifier of the pursuer.
    #[must_use]
    pub const fn id(&self) -> PursuerId {
        self.profile.id()
    }

    /// Targeting profile.
    #[must_use]
    pub const fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Kinematic state.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Mutable access to the kinematic state.
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Tile the pursuer is steering toward.
    #[must_use]
    pub const fn target(&self) -> Tile {
        self.target
    }

    /// Replaces the target tile.
    pub fn set_target(&mut self, target: Tile) {
        self.target = target;
    }

    /// Reports whether the player may capture the pursuer.
    #[must_use]
    pub const fn is_vulnerable(&self) -> bool {
        self.vulnerable
    }

    /// Timestamp of the most recent direction evaluation.
    #[must_use]
    pub const fn last_evaluation(&self) -> Option<Duration> {
        self.last_evaluation
    }

    /// Records a direction evaluation at `now`.
    pub fn mark_evaluation(&mut self, now: Duration) {
        self.last_evaluation = Some(now);
    }

    /// Behaviour given the active pursuit phase.
    #[must_use]
    pub fn behaviour(&self, phase: PursuitPhase) -> Behaviour {
        if self.vulnerable {
            return Behaviour::Fleeing;
        }
        match phase {
            PursuitPhase::Scatter => Behaviour::Scattering,
            PursuitPhase::Chase => Behaviour::Hunting,
        }
    }

    /// Turns the pursuer around and makes it capturable.
    pub fn frighten(&mut self) {
        self.body.reverse();
        self.vulnerable = true;
    }

    /// Ends vulnerability without moving the pursuer.
    pub fn calm(&mut self) {
        self.vulnerable = false;
    }

    /// Sends the pursuer back to its spawn tile in its initial state.
    pub fn reset(&mut self) {
        self.body = fresh_body(self.spawn, self.body.speed(), self.body.tile_length());
        self.target = self.profile.home_corner();
        self.vulnerable = false;
        self.last_evaluation = None;
    }

    /// Captures the externally visible state of the pursuer.
    #[must_use]
    pub fn snapshot(&self) -> PursuerSnapshot {
        PursuerSnapshot {
            id: self.id(),
            body: self.body.snapshot(),
            target: self.target,
            vulnerable: self.vulnerable,
        }
    }
}

fn fresh_body(spawn: Tile, speed: f32, tile_length: f32) -> Body {
    let mut body = Body::spawn(BodyKind::Pursuer, spawn, SPAWN_DIRECTION, speed, tile_length);
    body.set_running(true);
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blinky() -> Pursuer {
        Pursuer::spawn(Profile::new(PursuerId::Blinky, 28, 31), Tile::new(12, 14), 75.0, 16.0)
    }

    #[test]
    fn behaviour_prefers_fleeing_over_the_phase() {
        let mut pursuer = blinky();
        assert_eq!(pursuer.behaviour(PursuitPhase::Chase), Behaviour::Hunting);
        assert_eq!(pursuer.behaviour(PursuitPhase::Scatter), Behaviour::Scattering);

        pursuer.frighten();
        assert_eq!(pursuer.behaviour(PursuitPhase::Chase), Behaviour::Fleeing);
        assert_eq!(pursuer.body().direction(), Direction::Down);
    }

    #[test]
    fn reset_restores_the_spawn_state() {
        let mut pursuer = blinky();
        pursuer.frighten();
        pursuer.mark_evaluation(Duration::from_secs(3));
        pursuer.body_mut().center_on(Tile::new(1, 1));

        pursuer.reset();

        assert_eq!(pursuer.body().tile(), Tile::new(12, 14));
        assert_eq!(pursuer.body().direction(), Direction::Up);
        assert!(pursuer.body().is_running());
        assert!(!pursuer.is_vulnerable());
        assert_eq!(pursuer.last_evaluation(), None);
    }
}
