//! End-to-end battle rounds driven through scripted frames.

use rbg_battle::battle::combat::{BattleAction, Character, PartyActionResult, CHARACTERS};
use rbg_battle::battle::grid::{Grid, GridPos, SphereType, GRID_H, GRID_W};
use rbg_battle::battle::machine::{Battle, Phase, StateMachine};
use rbg_battle::battle::presentation::NullSink;
use rbg_battle::battle::presenter::TerminalPresenter;
use rbg_battle::battle::rng::SequenceRng;
use rbg_battle::battle::BattleGame;
use rbg_battle::config::BattleConfig;
use rbg_battle::input::{Button, FrameInput, PointerTarget};

/// Board with no two equal neighbours and no Red anywhere.
fn quiet_grid() -> Grid {
    let colours = [SphereType::Cyan, SphereType::Green, SphereType::Yellow, SphereType::Key];
    let mut grid = Grid::empty();
    for y in 0..GRID_H {
        for x in 0..GRID_W {
            grid.set(x, y, Some(colours[(x + 2 * y) % 4]));
        }
    }
    grid
}

fn game(config: &BattleConfig, grid: Grid, rng: Vec<u32>) -> BattleGame<NullSink> {
    let battle = Battle::with_grid(config, grid, Box::new(SequenceRng::new(rng)));
    BattleGame::from_parts(battle, StateMachine::new(), NullSink)
}

fn idle() -> FrameInput {
    FrameInput::idle()
}

fn press(button: Button) -> FrameInput {
    FrameInput::idle().with_pressed(button)
}

fn click_action(action: BattleAction) -> FrameInput {
    FrameInput::idle().with_pointer_press(PointerTarget::Action(action))
}

#[test]
fn keyboard_round_resolves_attack_and_counter() {
    let mut g = game(&BattleConfig::default(), quiet_grid(), vec![1, 0]);
    g.battle.state.stock.set(SphereType::Red, 2);
    g.battle.state.stock.set(SphereType::Key, 1);

    g.frame(&idle(), 16.0).unwrap();
    assert_eq!(*g.phase(), Phase::ActionChoice { index: 0 });

    // Rojo attacks (menu starts on Attack).
    g.frame(&press(Button::Confirm), 16.0).unwrap();
    // Blue flips to Defend, then confirms.
    g.frame(&press(Button::Right), 16.0).unwrap();
    g.frame(&press(Button::Confirm), 16.0).unwrap();
    // Midori defends by click.
    g.frame(&click_action(BattleAction::Defend), 16.0).unwrap();
    assert_eq!(*g.phase(), Phase::MovePhase { to: None });
    assert!(g.confirm_holds());

    g.frame(&press(Button::Solve), 16.0).unwrap();

    let result = g.battle.last_result.clone().unwrap();
    assert_eq!(
        result.party[Character::Rojo.index()],
        Some(PartyActionResult::Attack {
            character: Character::Rojo,
            damage: 73,
            death: false,
        })
    );
    assert_eq!(g.battle.state.enemy.hp, 427);
    let enemy = result.enemy.unwrap();
    assert_eq!(enemy.target, Character::Blue);
    assert_eq!(enemy.damage, 30);
    assert_eq!(g.battle.state.member(Character::Blue).hp, 63);
    assert_eq!(g.battle.state.stock.get(SphereType::Red), 0);
    assert_eq!(g.battle.state.stock.get(SphereType::Key), 0);

    // Nothing matched, so the board is untouched and the next round starts.
    assert_eq!(g.battle.grid, quiet_grid());
    assert!(g.battle.last_resolution.as_ref().unwrap().is_empty());
    assert_eq!(g.battle.round, 1);
    assert_eq!(*g.phase(), Phase::ActionChoice { index: 0 });
    assert_eq!(g.battle.turn_inputs.entries().count(), 0);
}

#[test]
fn swap_into_match_fills_stock() {
    let mut grid = quiet_grid();
    for x in [0, 1, 3] {
        grid.set(x, 0, Some(SphereType::Red));
    }
    let config = BattleConfig::default();
    // Refill draws Cyan three times, then the enemy targets Blue for 30.
    let battle = Battle::with_grid(&config, grid, Box::new(SequenceRng::new(vec![1, 1, 1, 1, 0])));
    let mut g = BattleGame::from_parts(
        battle,
        StateMachine::starting_at(Phase::MovePhase { to: Some(GridPos::new(3, 0)) }),
        NullSink,
    );
    for c in CHARACTERS {
        g.battle.turn_inputs.set(c, BattleAction::Defend);
    }

    g.frame(&idle(), 16.0).unwrap();
    g.frame(&press(Button::Confirm), 16.0).unwrap();
    assert_eq!(*g.phase(), Phase::SwapChoice { from: GridPos::new(3, 0) });

    let left = FrameInput::idle().with_held(Button::Confirm).with_pressed(Button::Left);
    g.frame(&left, 16.0).unwrap();
    assert_eq!(g.battle.grid.sphere(GridPos::new(2, 0)), Some(SphereType::Red));
    assert_eq!(*g.phase(), Phase::SwapChoice { from: GridPos::new(2, 0) });

    // Releasing Confirm puts the sphere down.
    g.frame(&idle(), 16.0).unwrap();
    assert_eq!(*g.phase(), Phase::MovePhase { to: None });
    assert_eq!(g.battle.selected, None);

    g.frame(&press(Button::Solve), 16.0).unwrap();
    let resolution = g.battle.last_resolution.clone().unwrap();
    assert_eq!(resolution.cleared_by_type, [3, 0, 0, 0, 0]);
    assert_eq!(g.battle.state.stock.get(SphereType::Red), 3);
    assert!(g.battle.grid.is_full());
    assert!(g.battle.grid.cells().all(|c| c.sphere != Some(SphereType::Red)));
    assert_eq!(g.battle.state.member(Character::Blue).hp, 63);
}

#[test]
fn pick_up_and_release_leaves_board_alone() {
    let mut g = game(&BattleConfig::default(), quiet_grid(), vec![0]);
    g.machine = StateMachine::starting_at(Phase::MovePhase { to: Some(GridPos::new(4, 4)) });
    g.frame(&idle(), 16.0).unwrap();

    let grab = FrameInput::idle().with_pointer_press(PointerTarget::Cell(GridPos::new(4, 4)));
    g.frame(&grab, 16.0).unwrap();
    assert_eq!(*g.phase(), Phase::SwapChoice { from: GridPos::new(4, 4) });
    assert_eq!(g.battle.selected, Some(GridPos::new(4, 4)));

    g.frame(&idle(), 16.0).unwrap();
    assert_eq!(*g.phase(), Phase::MovePhase { to: None });
    assert_eq!(g.battle.selected, None);
    assert_eq!(g.battle.grid, quiet_grid());
}

#[test]
fn cancel_drops_held_sphere() {
    let mut g = game(&BattleConfig::default(), quiet_grid(), vec![0]);
    g.machine = StateMachine::starting_at(Phase::SwapChoice { from: GridPos::new(2, 2) });
    g.frame(&press(Button::Cancel), 16.0).unwrap();
    assert_eq!(*g.phase(), Phase::MovePhase { to: None });
    assert_eq!(g.battle.grid, quiet_grid());
}

#[test]
fn drag_swaps_neighbour() {
    let mut g = game(&BattleConfig::default(), quiet_grid(), vec![0]);
    g.machine = StateMachine::starting_at(Phase::SwapChoice { from: GridPos::new(4, 4) });
    let (a, b) = (
        g.battle.grid.sphere(GridPos::new(4, 4)),
        g.battle.grid.sphere(GridPos::new(4, 5)),
    );

    let drag = FrameInput::idle().with_pointer_drag(PointerTarget::Cell(GridPos::new(4, 7)));
    g.frame(&drag, 16.0).unwrap();
    assert_eq!(g.battle.grid.sphere(GridPos::new(4, 5)), a);
    assert_eq!(g.battle.grid.sphere(GridPos::new(4, 4)), b);
    assert_eq!(g.battle.cursor, GridPos::new(4, 5));
    // The drag is still held, so the sphere stays in hand at its new cell.
    assert_eq!(*g.phase(), Phase::SwapChoice { from: GridPos::new(4, 5) });
}

#[test]
fn all_out_attack_wins() {
    let mut config = BattleConfig::default();
    config.enemy.hp = Some(50);
    let mut g = game(&config, quiet_grid(), vec![0]);

    g.frame(&idle(), 16.0).unwrap();
    for _ in CHARACTERS {
        g.frame(&press(Button::Confirm), 16.0).unwrap();
    }
    g.frame(&press(Button::Solve), 16.0).unwrap();

    assert_eq!(*g.phase(), Phase::Victory);
    assert!(g.is_over());
    assert_eq!(g.battle.last_result.as_ref().unwrap().enemy, None);

    // The battle is over: further input changes nothing.
    g.frame(&press(Button::Confirm), 16.0).unwrap();
    g.frame(&press(Button::Solve), 16.0).unwrap();
    assert_eq!(*g.phase(), Phase::Victory);
    assert_eq!(g.battle.round, 1);
}

#[test]
fn party_falls_one_by_one_to_game_over() {
    let mut config = BattleConfig::default();
    for m in [&mut config.rojo, &mut config.blue, &mut config.midori] {
        m.hp = Some(1);
    }
    let mut g = game(&config, quiet_grid(), vec![0, 0]);
    g.frame(&idle(), 16.0).unwrap();

    let mut rounds = 0;
    while !g.is_over() && rounds < 10 {
        let active = g.battle.state.active_characters().len();
        for _ in 0..active {
            g.frame(&click_action(BattleAction::Defend), 16.0).unwrap();
        }
        g.frame(&press(Button::Solve), 16.0).unwrap();
        rounds += 1;
        assert_eq!(g.battle.state.active_characters().len(), 3 - rounds);
    }

    assert_eq!(rounds, 3);
    assert_eq!(*g.phase(), Phase::GameOver);
    assert!(g.battle.state.is_game_over());
}

#[test]
fn presenter_timing_gates_intro() {
    let battle = Battle::with_grid(
        &BattleConfig::default(),
        quiet_grid(),
        Box::new(SequenceRng::new(vec![0])),
    );
    let mut g = BattleGame::from_parts(battle, StateMachine::new(), TerminalPresenter::new());

    g.frame(&idle(), 0.0).unwrap();
    assert_eq!(*g.phase(), Phase::Intro);
    g.frame(&idle(), 999.0).unwrap();
    assert_eq!(*g.phase(), Phase::Intro);
    g.frame(&idle(), 1.0).unwrap();
    assert_eq!(*g.phase(), Phase::StartActionChoice);

    // Input during the fade is ignored.
    g.frame(&press(Button::Confirm), 100.0).unwrap();
    assert_eq!(g.battle.turn_inputs.entries().count(), 0);
    g.frame(&idle(), 300.0).unwrap();
    assert_eq!(*g.phase(), Phase::ActionChoice { index: 0 });
    assert!(g.sink.dialog.full_text().contains("Press action"));
}
