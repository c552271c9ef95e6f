#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Chase.
//!
//! The world owns the board, the player, the pursuers and the session
//! bookkeeping. Every frame runs the same fixed pipeline: the held direction
//! is attempted, the player moves, each pursuer picks a target and a heading,
//! the pursuers move, pellets are eaten, the empowerment timer is checked,
//! and finally player/pursuer contacts are resolved. Timers read the injected
//! [`Clock`] minus any time spent paused.

mod collision;
mod config;
mod mode;
mod pellets;
mod schedule;

use std::time::Duration;

use maze_chase_core::{
    Actor, Body, BodyKind, Clock, Command, Direction, Event, Layout, MazeKind, PelletKind,
    PursuerId, PursuitPhase, SessionPhase,
};
use maze_chase_system_maze_generation::{build_layout, MazeError};
use maze_chase_system_movement::Movement;
use maze_chase_system_targeting::{Profile, Pursuer, Scene, Targeting};
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use thiserror::Error;
use tracing::{debug, info, warn};

use collision::Contact;
use config::millis;
use mode::ModeController;
use schedule::PursuitSchedule;

pub use config::SessionConfig;
pub use pellets::PelletSet;

const PLAYER_SPAWN_DIRECTION: Direction = Direction::Left;

/// Errors raised while constructing a world.
#[derive(Debug, Error)]
pub enum WorldError {
    /// The initial board could not be built.
    #[error("failed to build the {kind:?} board")]
    Board {
        /// Requested maze source.
        kind: MazeKind,
        /// Underlying generator failure.
        #[source]
        source: MazeError,
    },
}

/// Represents the authoritative Maze Chase world state.
#[derive(Debug)]
pub struct World {
    config: SessionConfig,
    clock: Box<dyn Clock>,
    movement: Movement,
    targeting: Targeting,
    rng: ChaCha8Rng,
    maze: MazeKind,
    custom: Option<Layout>,
    layout: Layout,
    pellets: PelletSet,
    player: Body,
    held: Option<Direction>,
    pursuers: Vec<Pursuer>,
    mode: ModeController,
    schedule: PursuitSchedule,
    pursuit: PursuitPhase,
    phase: SessionPhase,
    score: u64,
    lives: u32,
    level: u32,
    level_started_at: Duration,
    paused_at: Option<Duration>,
    paused_total: Duration,
}

impl World {
    /// Creates a world on a board of the requested kind.
    ///
    /// Generated boards draw from a generator seeded with
    /// [`SessionConfig::seed`]. [`MazeKind::Custom`] is rejected; use
    /// [`World::with_layout`] instead.
    pub fn new(
        config: SessionConfig,
        maze: MazeKind,
        clock: Box<dyn Clock>,
    ) -> Result<Self, WorldError> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let layout = build_layout(maze, &config.generator(), &mut rng)
            .map_err(|source| WorldError::Board { kind: maze, source })?;
        Ok(Self::assemble(config, maze, None, layout, rng, clock))
    }

    /// Creates a world playing a caller-provided layout on every level.
    #[must_use]
    pub fn with_layout(config: SessionConfig, layout: Layout, clock: Box<dyn Clock>) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::assemble(
            config,
            MazeKind::Custom,
            Some(layout.clone()),
            layout,
            rng,
            clock,
        )
    }

    fn assemble(
        config: SessionConfig,
        maze: MazeKind,
        custom: Option<Layout>,
        layout: Layout,
        rng: ChaCha8Rng,
        clock: Box<dyn Clock>,
    ) -> Self {
        let player = Body::spawn(
            BodyKind::Player,
            layout.player_spawn(),
            PLAYER_SPAWN_DIRECTION,
            config.player_speed,
            config.tile_length,
        );
        let mode = ModeController::new(
            millis(config.empowerment_ms),
            millis(config.capture_extension_ms),
            millis(config.combo_window_ms),
        );
        let schedule =
            PursuitSchedule::new(config.scatter_chase_ms.iter().copied().map(millis).collect());

        let mut world = Self {
            movement: Movement::new(config.movement()),
            targeting: Targeting::new(config.targeting()),
            lives: config.starting_lives,
            config,
            clock,
            rng,
            maze,
            custom,
            pellets: PelletSet::default(),
            layout: layout.clone(),
            player,
            held: None,
            pursuers: Vec::new(),
            mode,
            pursuit: schedule.phase_at(Duration::ZERO),
            schedule,
            phase: SessionPhase::Playing,
            score: 0,
            level: 1,
            level_started_at: Duration::ZERO,
            paused_at: None,
            paused_total: Duration::ZERO,
        };
        world.start_level(layout);
        world
    }

    /// Simulation time: clock time minus time spent paused.
    fn sim_now(&self) -> Duration {
        self.clock.now().saturating_sub(self.paused_total)
    }

    fn next_board(&mut self) -> Option<Layout> {
        match self.maze {
            MazeKind::Custom => self.custom.clone(),
            kind => match build_layout(kind, &self.config.generator(), &mut self.rng) {
                Ok(layout) => Some(layout),
                Err(error) => {
                    warn!(%error, ?kind, "board generation failed, replaying the current board");
                    None
                }
            },
        }
    }

    fn begin_level(&mut self, out_events: &mut Vec<Event>) {
        let layout = self.next_board().unwrap_or_else(|| self.layout.clone());
        self.start_level(layout);
        info!(level = self.level, maze = ?self.maze, "level started");
        out_events.push(Event::LevelStarted {
            level: self.level,
            maze: self.maze,
        });
    }

    /// Rebuilds the current level on the selected maze. A finished game keeps
    /// the selection for the next [`Command::NewGame`] instead.
    fn restart_unless_over(&mut self, out_events: &mut Vec<Event>) {
        if self.phase == SessionPhase::GameOver {
            warn!(maze = ?self.maze, "game is over, maze applies to the next game");
            return;
        }
        self.begin_level(out_events);
    }

    fn start_level(&mut self, layout: Layout) {
        self.finish_pause();
        self.pellets = PelletSet::from_layout(&layout);
        self.layout = layout;
        self.level_started_at = self.sim_now();
        self.pursuit = self.schedule.phase_at(Duration::ZERO);
        self.phase = SessionPhase::Playing;
        self.held = None;
        self.spawn_bodies();
    }

    /// Places every body on its spawn tile and returns to normal mode.
    fn spawn_bodies(&mut self) {
        self.mode.reset();
        self.player = Body::spawn(
            BodyKind::Player,
            self.layout.player_spawn(),
            PLAYER_SPAWN_DIRECTION,
            self.config.player_speed,
            self.config.tile_length,
        );

        let (width, height) = self.layout.size();
        let layout = &self.layout;
        let config = &self.config;
        self.pursuers = PursuerId::ALL
            .iter()
            .filter_map(|id| {
                let spawn = layout.pursuer_spawn(*id)?;
                Some(Pursuer::spawn(
                    Profile::new(*id, width, height),
                    spawn,
                    config.pursuer_speed,
                    config.tile_length,
                ))
            })
            .collect();
    }

    fn finish_pause(&mut self) {
        if let Some(paused_at) = self.paused_at.take() {
            let paused = self.clock.now().saturating_sub(paused_at);
            self.paused_total = self.paused_total.saturating_add(paused);
        }
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.phase != SessionPhase::Playing {
            return;
        }

        let dt = dt.min(millis(self.config.max_frame_ms));
        out_events.push(Event::TimeAdvanced { dt });
        let now = self.sim_now();

        self.update_pursuit(now, out_events);
        self.move_player(dt, now, out_events);
        self.steer_pursuers(now);
        self.move_pursuers(dt, now, out_events);
        self.eat_pellets(now, out_events);
        self.update_mode(now, out_events);

        if self.pellets.is_cleared() {
            self.phase = SessionPhase::LevelCleared;
            info!(level = self.level, score = self.score, "level cleared");
            out_events.push(Event::LevelCleared { level: self.level });
            return;
        }

        self.resolve_contacts(now, out_events);
    }

    fn update_pursuit(&mut self, now: Duration, out_events: &mut Vec<Event>) {
        let phase = self
            .schedule
            .phase_at(now.saturating_sub(self.level_started_at));
        if phase != self.pursuit {
            self.pursuit = phase;
            debug!(?phase, "pursuit phase changed");
            out_events.push(Event::PursuitPhaseChanged { phase });
        }
    }

    fn move_player(&mut self, dt: Duration, now: Duration, out_events: &mut Vec<Event>) {
        if let Some(direction) = self.held {
            if self.movement.try_turn(&mut self.player, &self.layout, direction) {
                out_events.push(Event::PlayerTurned { direction });
            }
        }

        if let Some(teleport) = self.movement.advance(&mut self.player, &self.layout, dt, now) {
            out_events.push(Event::Teleported {
                actor: Actor::Player,
                from: teleport.from,
                to: teleport.to,
            });
        }
    }

    fn steer_pursuers(&mut self, now: Duration) {
        let leader_tile = self
            .pursuers
            .iter()
            .find(|pursuer| pursuer.id() == PursuerId::Blinky)
            .map_or(self.player.tile(), |pursuer| pursuer.body().tile());
        let scene = Scene {
            player_tile: self.player.tile(),
            player_direction: self.player.direction(),
            leader_tile,
            phase: self.pursuit,
        };

        for pursuer in &mut self.pursuers {
            let _ = self.targeting.retarget(pursuer, &scene);
            let _ = self
                .targeting
                .select_direction(&self.movement, pursuer, &self.layout, now);
        }
    }

    fn move_pursuers(&mut self, dt: Duration, now: Duration, out_events: &mut Vec<Event>) {
        for pursuer in &mut self.pursuers {
            if let Some(teleport) = self
                .movement
                .advance(pursuer.body_mut(), &self.layout, dt, now)
            {
                out_events.push(Event::Teleported {
                    actor: Actor::Pursuer(pursuer.id()),
                    from: teleport.from,
                    to: teleport.to,
                });
            }
        }
    }

    fn eat_pellets(&mut self, now: Duration, out_events: &mut Vec<Event>) {
        let tile = self.player.tile();
        let Some(kind) = self.pellets.eat(tile) else {
            return;
        };

        let points = match kind {
            PelletKind::Small => self.config.small_pellet_points,
            PelletKind::Big => self.config.big_pellet_points,
        };
        self.score = self.score.saturating_add(u64::from(points));
        out_events.push(Event::PelletEaten { tile, kind, points });

        if kind == PelletKind::Big {
            self.empower(now, out_events);
        }
    }

    fn empower(&mut self, now: Duration, out_events: &mut Vec<Event>) {
        self.mode.empower(now);
        self.player
            .set_speed(self.config.player_speed + self.config.empowered_speed_bonus);
        for pursuer in &mut self.pursuers {
            if !pursuer.is_vulnerable() {
                pursuer.frighten();
            }
        }
        debug!(?now, "player empowered");
        out_events.push(Event::PlayerEmpowered);
    }

    fn update_mode(&mut self, now: Duration, out_events: &mut Vec<Event>) {
        if !self.mode.expire(now) {
            return;
        }

        self.player.set_speed(self.config.player_speed);
        for pursuer in &mut self.pursuers {
            pursuer.calm();
        }
        debug!(?now, "empowerment expired");
        out_events.push(Event::EmpowermentExpired);
    }

    fn resolve_contacts(&mut self, now: Duration, out_events: &mut Vec<Event>) {
        let contacts = collision::contacts(&self.player, &self.pursuers, self.mode.is_empowered());
        for contact in contacts {
            match contact {
                Contact::Capture(index) => {
                    let multiplier = self.mode.record_capture(now);
                    let points = self.config.capture_points.saturating_mul(multiplier);
                    self.score = self.score.saturating_add(u64::from(points));
                    if let Some(pursuer) = self.pursuers.get_mut(index) {
                        pursuer.reset();
                        debug!(pursuer = ?pursuer.id(), points, multiplier, "pursuer captured");
                        out_events.push(Event::PursuerCaptured {
                            pursuer: pursuer.id(),
                            points,
                            multiplier,
                        });
                    }
                }
                Contact::Caught(index) => {
                    if let Some(pursuer) = self.pursuers.get(index) {
                        let id = pursuer.id();
                        self.lose_life(id, out_events);
                    }
                    return;
                }
            }
        }
    }

    fn lose_life(&mut self, pursuer: PursuerId, out_events: &mut Vec<Event>) {
        self.lives = self.lives.saturating_sub(1);
        info!(?pursuer, lives = self.lives, "life lost");
        out_events.push(Event::LifeLost {
            pursuer,
            lives_remaining: self.lives,
        });

        if self.lives == 0 {
            self.phase = SessionPhase::GameOver;
            info!(score = self.score, "game over");
            out_events.push(Event::GameOver { score: self.score });
            return;
        }

        self.spawn_bodies();
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Steer { direction } => {
            world.held = direction;
        }
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::Pause => {
            if world.phase == SessionPhase::Playing {
                world.paused_at = Some(world.clock.now());
                world.phase = SessionPhase::Paused;
                out_events.push(Event::Paused);
            }
        }
        Command::Resume => {
            if world.phase == SessionPhase::Paused {
                world.finish_pause();
                world.phase = SessionPhase::Playing;
                out_events.push(Event::Resumed);
            }
        }
        Command::AdvanceLevel => {
            if world.phase == SessionPhase::LevelCleared {
                world.level = world.level.saturating_add(1);
                world.begin_level(out_events);
            }
        }
        Command::NewGame => {
            world.score = 0;
            world.lives = world.config.starting_lives;
            world.level = 1;
            world.begin_level(out_events);
        }
        Command::SelectMaze { kind } => {
            if kind == MazeKind::Custom && world.custom.is_none() {
                warn!("no custom layout loaded, keeping the current maze");
                return;
            }
            world.maze = kind;
            world.restart_unless_over(out_events);
        }
        Command::LoadLayout { layout } => {
            world.custom = Some(*layout);
            world.maze = MazeKind::Custom;
            world.restart_unless_over(out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use maze_chase_core::{
        GameMode, Layout, PlayerSnapshot, SessionPhase, Snapshot, WELCOME_BANNER,
    };

    use super::{PelletSet, SessionConfig, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(_world: &World) -> &'static str {
        WELCOME_BANNER
    }

    /// Captures everything a renderer or HUD needs for the current frame.
    #[must_use]
    pub fn snapshot(world: &World) -> Snapshot {
        let mode = world.mode.mode();
        Snapshot {
            player: PlayerSnapshot {
                body: world.player.snapshot(),
                empowered: mode == GameMode::PlayerEmpowered,
            },
            pursuers: world.pursuers.iter().map(|pursuer| pursuer.snapshot()).collect(),
            small_pellets: world.pellets.small().len(),
            big_pellets: world.pellets.big().len(),
            score: world.score,
            lives: world.lives,
            level: world.level,
            maze: world.maze,
            mode,
            pursuit: world.pursuit,
            phase: world.phase,
        }
    }

    /// Provides read-only access to the current board.
    #[must_use]
    pub fn layout(world: &World) -> &Layout {
        &world.layout
    }

    /// Provides read-only access to the pellets still on the board.
    #[must_use]
    pub fn pellets(world: &World) -> &PelletSet {
        &world.pellets
    }

    /// Reports the session lifecycle phase.
    #[must_use]
    pub fn phase(world: &World) -> SessionPhase {
        world.phase
    }

    /// Provides read-only access to the session configuration.
    #[must_use]
    pub fn config(world: &World) -> &SessionConfig {
        &world.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::ManualClock;

    fn corridor_world(clock: &ManualClock) -> World {
        let layout = Layout::parse(&[
            "#########",
            "#Po.....#",
            "#########",
            "#1#2#3#4#",
            "#########",
        ])
        .expect("layout parses");
        let config = SessionConfig {
            scatter_chase_ms: Vec::new(),
            ..SessionConfig::default()
        };
        World::with_layout(config, layout, Box::new(clock.clone()))
    }

    #[test]
    fn ticks_are_clamped_to_the_longest_frame() {
        let clock = ManualClock::new();
        let mut world = corridor_world(&clock);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(3),
            },
            &mut events,
        );

        assert_eq!(
            events.first(),
            Some(&Event::TimeAdvanced {
                dt: Duration::from_millis(50)
            })
        );
    }

    #[test]
    fn paused_time_is_excluded_from_the_simulation_clock() {
        let clock = ManualClock::new();
        let mut world = corridor_world(&clock);
        let mut events = Vec::new();

        clock.advance(Duration::from_secs(1));
        apply(&mut world, Command::Pause, &mut events);
        clock.advance(Duration::from_secs(10));
        apply(&mut world, Command::Resume, &mut events);

        assert_eq!(events, vec![Event::Paused, Event::Resumed]);
        assert_eq!(world.sim_now(), Duration::from_secs(1));
    }

    #[test]
    fn custom_maze_requires_a_loaded_layout() {
        let clock = ManualClock::new();
        let mut world = World::new(
            SessionConfig::default(),
            MazeKind::Classic,
            Box::new(clock.clone()),
        )
        .expect("classic world builds");
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SelectMaze {
                kind: MazeKind::Custom,
            },
            &mut events,
        );

        assert!(events.is_empty());
        assert_eq!(query::snapshot(&world).maze, MazeKind::Classic);
    }
}
