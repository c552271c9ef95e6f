//! Tunable session parameters.

use std::time::Duration;

use maze_chase_system_maze_generation::{GeneratorConfig, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use maze_chase_system_movement::Config as MovementConfig;
use maze_chase_system_targeting::Config as TargetingConfig;
use serde::{Deserialize, Serialize};

/// Every knob of a play session. Durations are expressed in milliseconds.
///
/// Missing fields fall back to their defaults when deserialized, so a config
/// file only needs to name the values it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Side length of a tile in world units.
    pub tile_length: f32,
    /// Fraction of a tile a body may be off-centre and still turn.
    pub turn_margin_ratio: f32,
    /// Minimum time between two tunnel crossings of the same body.
    pub teleport_cooldown_ms: u64,
    /// Minimum time between two direction evaluations of a pursuer.
    pub direction_change_cooldown_ms: u64,
    /// Player speed in world units per second.
    pub player_speed: f32,
    /// Pursuer speed in world units per second.
    pub pursuer_speed: f32,
    /// Speed added to the player while empowered.
    pub empowered_speed_bonus: f32,
    /// Length of the empowerment window.
    pub empowerment_ms: u64,
    /// Time added to the empowerment window by every capture.
    pub capture_extension_ms: u64,
    /// Captures closer together than this double the capture multiplier.
    pub combo_window_ms: u64,
    /// Points for a small pellet.
    pub small_pellet_points: u32,
    /// Points for a big pellet.
    pub big_pellet_points: u32,
    /// Base points for capturing a pursuer.
    pub capture_points: u32,
    /// Lives at the start of a game.
    pub starting_lives: u32,
    /// Distance in tiles below which the shy pursuer retreats.
    pub shy_radius: f32,
    /// Big pellets placed on generated boards.
    pub generated_big_pellets: usize,
    /// Width of generated boards.
    pub generated_width: u32,
    /// Height of generated boards.
    pub generated_height: u32,
    /// Longest frame the simulation will integrate in one step.
    pub max_frame_ms: u64,
    /// Alternating scatter and chase phase lengths, starting with scatter.
    /// Pursuers chase indefinitely once the list is exhausted.
    pub scatter_chase_ms: Vec<u64>,
    /// Seed of the maze generator.
    pub seed: u64,
}

impl SessionConfig {
    pub(crate) fn movement(&self) -> MovementConfig {
        MovementConfig::new(
            self.tile_length,
            self.turn_margin_ratio,
            millis(self.teleport_cooldown_ms),
        )
    }

    pub(crate) fn targeting(&self) -> TargetingConfig {
        TargetingConfig::new(millis(self.direction_change_cooldown_ms), self.shy_radius)
    }

    pub(crate) fn generator(&self) -> GeneratorConfig {
        GeneratorConfig::new(
            self.generated_width,
            self.generated_height,
            self.generated_big_pellets,
        )
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tile_length: 16.0,
            turn_margin_ratio: 0.1,
            teleport_cooldown_ms: 500,
            direction_change_cooldown_ms: 100,
            player_speed: 80.0,
            pursuer_speed: 75.0,
            empowered_speed_bonus: 20.0,
            empowerment_ms: 5_000,
            capture_extension_ms: 1_000,
            combo_window_ms: 2_000,
            small_pellet_points: 10,
            big_pellet_points: 50,
            capture_points: 200,
            starting_lives: 3,
            shy_radius: 8.0,
            generated_big_pellets: 4,
            generated_width: DEFAULT_WIDTH,
            generated_height: DEFAULT_HEIGHT,
            max_frame_ms: 50,
            scatter_chase_ms: vec![7_000, 20_000, 7_000, 20_000, 5_000],
            seed: 0,
        }
    }
}

pub(crate) const fn millis(value: u64) -> Duration {
    Duration::from_millis(value)
}
