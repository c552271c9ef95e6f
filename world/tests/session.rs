use std::time::Duration;

use maze_chase_core::{
    Command, Direction, Event, GameMode, Layout, ManualClock, MazeKind, PelletKind, PursuerId,
    SessionPhase, Tile,
};
use maze_chase_world::{apply, query, SessionConfig, World};

const FRAME: Duration = Duration::from_millis(50);

struct Host {
    world: World,
    clock: ManualClock,
}

impl Host {
    fn new(rows: &[&str], config: SessionConfig) -> Self {
        let layout = Layout::parse(rows).expect("layout parses");
        let clock = ManualClock::new();
        let world = World::with_layout(config, layout, Box::new(clock.clone()));
        Self { world, clock }
    }

    fn send(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(&mut self.world, command, &mut events);
        events
    }

    fn tick(&mut self) -> Vec<Event> {
        self.clock.advance(FRAME);
        self.send(Command::Tick { dt: FRAME })
    }

    /// Ticks until an event matches, returning every event of that frame.
    fn tick_until(&mut self, limit: usize, matches: impl Fn(&Event) -> bool) -> Vec<Event> {
        for _ in 0..limit {
            let events = self.tick();
            if events.iter().any(&matches) {
                return events;
            }
        }
        panic!("no matching event within {limit} frames");
    }
}

fn chase_only() -> SessionConfig {
    SessionConfig {
        scatter_chase_ms: Vec::new(),
        ..SessionConfig::default()
    }
}

const SEALED_POCKETS: [&str; 5] = [
    "#########",
    "#Po.....#",
    "#########",
    "#1#2#3#4#",
    "#########",
];

#[test]
fn big_pellet_empowers_the_player_and_reverses_every_pursuer() {
    let mut host = Host::new(&SEALED_POCKETS, chase_only());
    let before = query::snapshot(&host.world);
    assert_eq!(before.big_pellets, 1);
    assert!(before
        .pursuers
        .iter()
        .all(|pursuer| pursuer.body.direction == Direction::Up));

    let _ = host.send(Command::Steer {
        direction: Some(Direction::Right),
    });
    let events = host.tick_until(20, |event| matches!(event, Event::PelletEaten { .. }));

    assert!(events.contains(&Event::PelletEaten {
        tile: Tile::new(2, 1),
        kind: PelletKind::Big,
        points: 50,
    }));
    assert!(events.contains(&Event::PlayerEmpowered));

    let after = query::snapshot(&host.world);
    assert_eq!(after.big_pellets, 0);
    assert_eq!(after.small_pellets, before.small_pellets);
    assert_eq!(after.score, 50);
    assert_eq!(after.mode, GameMode::PlayerEmpowered);
    assert!(after.player.empowered);
    for pursuer in &after.pursuers {
        assert_eq!(pursuer.body.direction, Direction::Down);
        assert!(pursuer.vulnerable);
    }
}

/// The last pellet is walled off so the board is never cleared.
const UNREACHABLE_PELLET: [&str; 5] = [
    "#########",
    "#Po   #.#",
    "#########",
    "#1#2#3#4#",
    "#########",
];

#[test]
fn empowerment_expires_after_its_window() {
    let mut host = Host::new(&UNREACHABLE_PELLET, chase_only());
    let _ = host.send(Command::Steer {
        direction: Some(Direction::Right),
    });
    let _ = host.tick_until(20, |event| *event == Event::PlayerEmpowered);

    let events = host.tick_until(200, |event| *event == Event::EmpowermentExpired);
    assert!(!events.contains(&Event::PlayerEmpowered));

    let snapshot = query::snapshot(&host.world);
    assert_eq!(snapshot.mode, GameMode::Normal);
    assert!(snapshot.pursuers.iter().all(|pursuer| !pursuer.vulnerable));
}

#[test]
fn paused_time_does_not_count_against_empowerment() {
    let mut host = Host::new(&UNREACHABLE_PELLET, chase_only());
    let _ = host.send(Command::Steer {
        direction: Some(Direction::Right),
    });
    let _ = host.tick_until(20, |event| *event == Event::PlayerEmpowered);

    assert_eq!(host.send(Command::Pause), vec![Event::Paused]);
    host.clock.advance(Duration::from_secs(60));
    assert!(host.tick().is_empty());
    assert_eq!(host.send(Command::Resume), vec![Event::Resumed]);

    let events = host.tick();
    assert!(!events.contains(&Event::EmpowermentExpired));
    assert_eq!(query::snapshot(&host.world).mode, GameMode::PlayerEmpowered);
}

#[test]
fn clearing_the_board_fires_once_and_waits_for_the_next_level() {
    let mut host = Host::new(
        &[
            "#########",
            "#P..    #",
            "#########",
            "#1#2#3#4#",
            "#########",
        ],
        chase_only(),
    );
    let _ = host.send(Command::Steer {
        direction: Some(Direction::Right),
    });

    let mut cleared = 0;
    for _ in 0..100 {
        cleared += host
            .tick()
            .iter()
            .filter(|event| matches!(event, Event::LevelCleared { .. }))
            .count();
    }

    assert_eq!(cleared, 1);
    assert_eq!(query::phase(&host.world), SessionPhase::LevelCleared);
    assert_eq!(query::snapshot(&host.world).score, 20);
    assert!(host.tick().is_empty());

    let events = host.send(Command::AdvanceLevel);
    assert_eq!(
        events,
        vec![Event::LevelStarted {
            level: 2,
            maze: MazeKind::Custom,
        }]
    );
    let snapshot = query::snapshot(&host.world);
    assert_eq!(snapshot.phase, SessionPhase::Playing);
    assert_eq!(snapshot.small_pellets, 2);
    assert_eq!(snapshot.score, 20);
    assert_eq!(snapshot.player.body.tile, Tile::new(1, 1));
}

const LONE_HUNTER: [&str; 5] = [
    "#########",
    "#P    5.#",
    "#########",
    "#2#3#4###",
    "#########",
];

#[test]
fn caught_players_lose_a_life_and_respawn() {
    let mut host = Host::new(&LONE_HUNTER, chase_only());

    let events = host.tick_until(100, |event| matches!(event, Event::LifeLost { .. }));

    assert!(events.contains(&Event::LifeLost {
        pursuer: PursuerId::Blinky,
        lives_remaining: 2,
    }));
    let snapshot = query::snapshot(&host.world);
    assert_eq!(snapshot.lives, 2);
    assert_eq!(snapshot.phase, SessionPhase::Playing);
    assert_eq!(snapshot.player.body.tile, Tile::new(1, 1));
    assert_eq!(snapshot.pursuers[0].id, PursuerId::Blinky);
    assert_eq!(snapshot.pursuers[0].body.tile, Tile::new(6, 1));
}

#[test]
fn losing_the_last_life_ends_the_game() {
    let config = SessionConfig {
        starting_lives: 1,
        ..chase_only()
    };
    let mut host = Host::new(&LONE_HUNTER, config);

    let events = host.tick_until(100, |event| matches!(event, Event::GameOver { .. }));
    assert!(events.contains(&Event::LifeLost {
        pursuer: PursuerId::Blinky,
        lives_remaining: 0,
    }));
    assert!(events.contains(&Event::GameOver { score: 0 }));
    assert_eq!(query::phase(&host.world), SessionPhase::GameOver);
    assert!(host.tick().is_empty());

    let restarted = host.send(Command::NewGame);
    assert_eq!(
        restarted,
        vec![Event::LevelStarted {
            level: 1,
            maze: MazeKind::Custom,
        }]
    );
    assert_eq!(query::snapshot(&host.world).lives, 1);
}

#[test]
fn finished_games_only_restart_through_new_game() {
    let config = SessionConfig {
        starting_lives: 1,
        ..chase_only()
    };
    let mut host = Host::new(&LONE_HUNTER, config);
    let _ = host.tick_until(100, |event| matches!(event, Event::GameOver { .. }));

    let selected = host.send(Command::SelectMaze {
        kind: MazeKind::Classic,
    });
    assert!(selected.is_empty());
    let loaded = host.send(Command::LoadLayout {
        layout: Box::new(Layout::parse(&SEALED_POCKETS).expect("layout parses")),
    });
    assert!(loaded.is_empty());
    let over = query::snapshot(&host.world);
    assert_eq!(over.phase, SessionPhase::GameOver);
    assert_eq!(over.lives, 0);
    assert!(host.tick().is_empty());

    let restarted = host.send(Command::NewGame);
    assert_eq!(
        restarted,
        vec![Event::LevelStarted {
            level: 1,
            maze: MazeKind::Custom,
        }]
    );
    assert_eq!(query::layout(&host.world).size(), (9, 5));
    assert_eq!(query::snapshot(&host.world).big_pellets, 1);
    assert_eq!(query::snapshot(&host.world).lives, 1);
}

#[test]
fn empowered_players_capture_vulnerable_pursuers() {
    let mut host = Host::new(
        &[
            "#########",
            "#Po   5.#",
            "#########",
            "#2#3#4###",
            "#########",
        ],
        chase_only(),
    );
    let _ = host.send(Command::Steer {
        direction: Some(Direction::Right),
    });

    let events = host.tick_until(100, |event| matches!(event, Event::PursuerCaptured { .. }));

    assert!(events.contains(&Event::PursuerCaptured {
        pursuer: PursuerId::Blinky,
        points: 200,
        multiplier: 1,
    }));
    let snapshot = query::snapshot(&host.world);
    assert_eq!(snapshot.score, 250);
    assert_eq!(snapshot.lives, 3);
    assert_eq!(snapshot.mode, GameMode::PlayerEmpowered);
    assert_eq!(snapshot.pursuers[0].body.tile, Tile::new(6, 1));
    assert!(!snapshot.pursuers[0].vulnerable);
}

#[test]
fn loading_a_layout_restarts_the_level_on_it() {
    let clock = ManualClock::new();
    let mut world = World::new(chase_only(), MazeKind::Classic, Box::new(clock))
        .expect("classic world builds");
    assert_eq!(query::layout(&world).size(), (28, 31));

    let layout = Layout::parse(&SEALED_POCKETS).expect("layout parses");
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::LoadLayout {
            layout: Box::new(layout.clone()),
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::LevelStarted {
            level: 1,
            maze: MazeKind::Custom,
        }]
    );
    assert_eq!(query::layout(&world), &layout);
    assert_eq!(query::snapshot(&world).big_pellets, 1);
}

#[test]
fn selecting_a_generated_maze_builds_a_fresh_board() {
    let clock = ManualClock::new();
    let mut world = World::new(chase_only(), MazeKind::Classic, Box::new(clock))
        .expect("classic world builds");
    let mut events = Vec::new();

    apply(
        &mut world,
        Command::SelectMaze {
            kind: MazeKind::WallGrowth,
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::LevelStarted {
            level: 1,
            maze: MazeKind::WallGrowth,
        }]
    );
    let layout = query::layout(&world);
    assert_ne!(layout, &Layout::classic());
    assert_eq!(layout.big_pellets().len(), 4);
    assert_eq!(query::snapshot(&world).maze, MazeKind::WallGrowth);
}

#[test]
fn scatter_phases_alternate_with_chase() {
    let config = SessionConfig {
        scatter_chase_ms: vec![200, 200],
        ..SessionConfig::default()
    };
    let mut host = Host::new(&SEALED_POCKETS, config);
    assert_eq!(
        query::snapshot(&host.world).pursuit,
        maze_chase_core::PursuitPhase::Scatter
    );

    let events = host.tick_until(10, |event| matches!(event, Event::PursuitPhaseChanged { .. }));
    assert!(events.contains(&Event::PursuitPhaseChanged {
        phase: maze_chase_core::PursuitPhase::Chase,
    }));
    assert_eq!(query::snapshot(&host.world).pursuers[0].target, Tile::new(1, 1));
}

fn replay(maze: MazeKind, seed: u64) -> (Vec<Event>, maze_chase_core::Snapshot) {
    let clock = ManualClock::new();
    let config = SessionConfig {
        seed,
        ..SessionConfig::default()
    };
    let mut world =
        World::new(config, maze, Box::new(clock.clone())).expect("world builds");
    let script = [
        (0, Direction::Left),
        (40, Direction::Up),
        (80, Direction::Right),
        (120, Direction::Down),
    ];

    let mut events = Vec::new();
    for frame in 0..200 {
        if let Some((_, direction)) = script.iter().find(|(at, _)| *at == frame) {
            apply(
                &mut world,
                Command::Steer {
                    direction: Some(*direction),
                },
                &mut events,
            );
        }
        clock.advance(FRAME);
        apply(&mut world, Command::Tick { dt: FRAME }, &mut events);
    }
    (events, query::snapshot(&world))
}

#[test]
fn identical_inputs_replay_identically() {
    for maze in [MazeKind::Classic, MazeKind::SpanningGrowth] {
        let (first_events, first_snapshot) = replay(maze, 17);
        let (second_events, second_snapshot) = replay(maze, 17);

        assert!(!first_events.is_empty());
        assert_eq!(first_events, second_events);
        assert_eq!(first_snapshot, second_snapshot);
    }
}
