use std::collections::{HashSet, VecDeque};

use maze_chase_core::{Direction, Layout, MazeKind, PursuerId, Tile};
use maze_chase_system_maze_generation::{
    build_layout, spanning_growth, wall_growth, GeneratorConfig, MazeError, WallGrid,
    DEFAULT_HEIGHT, DEFAULT_WIDTH,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const GENERATED: [MazeKind; 2] = [MazeKind::SpanningGrowth, MazeKind::WallGrowth];

fn assert_border_walls(grid: &WallGrid) {
    for tile in grid.tiles().filter(|tile| grid.is_border(*tile)) {
        assert!(grid.is_wall(tile), "border tile {tile:?} is open");
    }
}

fn reachable(layout: &Layout, start: Tile) -> HashSet<Tile> {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(tile) = queue.pop_front() {
        for direction in Direction::ALL {
            let next = tile.step(direction);
            if layout.is_accessible(next) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

#[test]
fn spanning_growth_connects_every_open_tile() {
    for seed in 0..16 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let grid = spanning_growth(DEFAULT_WIDTH, DEFAULT_HEIGHT, &mut rng).expect("maze grows");

        assert!(grid.is_connected(), "seed {seed} left isolated tiles");
        assert_border_walls(&grid);
        for row in (1..DEFAULT_HEIGHT as i32 - 1).step_by(2) {
            for column in (1..DEFAULT_WIDTH as i32 - 1).step_by(2) {
                assert!(grid.is_open(Tile::new(column, row)));
            }
        }
    }
}

#[test]
fn wall_growth_connects_every_open_tile() {
    for seed in 0..16 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let grid = wall_growth(DEFAULT_WIDTH, DEFAULT_HEIGHT, &mut rng).expect("maze grows");

        assert!(grid.is_connected(), "seed {seed} left isolated tiles");
        assert_border_walls(&grid);
        assert!(grid.open_tiles().len() < grid.tiles().count() - 2 * 28 - 2 * 29);
    }
}

#[test]
fn generated_layouts_are_playable() {
    let config = GeneratorConfig::default();
    for kind in GENERATED {
        for seed in 0..8 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let layout = build_layout(kind, &config, &mut rng).expect("layout builds");

            assert_eq!(layout.size(), (28, 31));
            assert!(layout.tunnels().is_empty());

            let mut spawns = HashSet::new();
            for pursuer in PursuerId::ALL {
                let spawn = layout.pursuer_spawn(pursuer).expect("pursuer spawn");
                assert!(layout.is_accessible(spawn));
                assert!(!layout.is_ghost_only(spawn));
                assert!(spawns.insert(spawn), "{kind:?}/{seed}: shared pursuer spawn");
            }
            assert!(!spawns.contains(&layout.player_spawn()));

            assert_eq!(layout.big_pellets().len(), config.big_pellets());
            assert!(layout.big_pellets().is_disjoint(layout.pellets()));
            assert!(!layout.pellets().contains(&layout.player_spawn()));
            assert_eq!(
                layout.pellets().len() + layout.big_pellets().len() + 5,
                layout.accessible().len()
            );

            let region = reachable(&layout, layout.player_spawn());
            assert_eq!(region.len(), layout.accessible().len());
        }
    }
}

#[test]
fn equal_seeds_reproduce_equal_layouts() {
    let config = GeneratorConfig::default();
    for kind in GENERATED {
        let first = build_layout(kind, &config, &mut ChaCha8Rng::seed_from_u64(99));
        let second = build_layout(kind, &config, &mut ChaCha8Rng::seed_from_u64(99));
        assert_eq!(first, second);
    }
}

#[test]
fn classic_and_custom_kinds_are_not_generated() {
    let config = GeneratorConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    assert_eq!(
        build_layout(MazeKind::Classic, &config, &mut rng),
        Ok(Layout::classic())
    );
    assert_eq!(
        build_layout(MazeKind::Custom, &config, &mut rng),
        Err(MazeError::NotGenerated {
            kind: MazeKind::Custom
        })
    );
}

#[test]
fn tiny_boards_report_missing_room() {
    let config = GeneratorConfig::new(5, 5, 4);
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    assert!(matches!(
        build_layout(MazeKind::SpanningGrowth, &config, &mut rng),
        Err(MazeError::NotEnoughRoom { required: 9, .. })
    ));
}
