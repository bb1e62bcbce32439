use rand::SeedableRng;
use rand::rngs::SmallRng;
use tombstone_bot::{NoopSink, Opponent, OpponentParams, Signal};
use tombstone_core::grid::{Action, ActionKind, Cell};
use tombstone_core::maze::{MazeGenerator, WallLayout};

/// Plays the opponent alone in `layout` and returns the action codes it emitted
/// together with whether it reached the goal.
fn play(layout: &WallLayout, seed: u64, max_turns: usize) -> (Vec<u8>, bool) {
    let mut opponent = Opponent::with_rng(
        NoopSink,
        layout,
        OpponentParams::default(),
        SmallRng::seed_from_u64(seed),
    );
    let mut at = Cell::START;
    let mut codes = Vec::new();

    for _ in 0..max_turns {
        let action = opponent.act();
        codes.push(action.code());
        match action.kind {
            ActionKind::Walk { steps } => {
                for _ in 0..steps {
                    match layout.passage(at, action.direction) {
                        Some(next) => at = next,
                        None => break,
                    }
                }
            }
            ActionKind::Probe => match layout.passage(at, action.direction) {
                Some(dug) if dug == Cell::GOAL => return (codes, true),
                Some(_) => opponent.narrow(Signal::Confirmed(at)),
                None => opponent.narrow(Signal::Unresolved),
            },
        }
    }
    (codes, false)
}

#[test]
fn every_emitted_code_decodes() {
    for seed in 0..20 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let layout = MazeGenerator::default().generate(&mut rng);
        let (codes, _) = play(&layout, seed, 200);
        assert!(!codes.is_empty());
        for code in codes {
            assert!(Action::from_code(code).is_some(), "seed {seed} emitted {code}");
        }
    }
}

#[test]
fn same_seed_same_episode() {
    let mut rng = SmallRng::seed_from_u64(99);
    let layout = MazeGenerator::default().generate(&mut rng);
    assert_eq!(play(&layout, 5, 150), play(&layout, 5, 150));
}

#[test]
fn open_maze_is_solved() {
    let (codes, won) = play(&WallLayout::fully_open(), 3, 400);
    assert!(won, "no goal after {} actions", codes.len());
}
