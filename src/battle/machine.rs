//! Battle phase state machine.
//!
//! The machine owns only the current [`Phase`]; everything the phases
//! share lives in [`Battle`]. Entering a phase returns an [`Enter`] command
//! instead of transitioning from inside the handler, and [`StateMachine::step`]
//! drives the resulting chain within a single frame.
//!
//! Presentation tasks returned by the sink gate the machine: while any is
//! pending, input is not read and no delayed transition fires. A transition
//! cancels every task still outstanding from the phase it leaves.

use super::combat::{BattleAction, BattleState, Character, TurnInputs, TurnResult};
use super::grid::{Direction, Grid, GridPos, GRID_H, GRID_W, SPHERE_TYPES};
use super::presentation::{PresentationSink, Task};
use super::rng::RandomSource;
use super::solver::{self, Resolution};
use crate::config::BattleConfig;
use crate::console;
use crate::error::BattleError;
use crate::input::{Button, FrameInput, PointerTarget};

/// Upper bound on transitions processed in one frame.
pub const MAX_CHAIN: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Intro,
    StartActionChoice,
    /// Index into the active roster at the time of entry.
    ActionChoice { index: usize },
    StartMovePhase,
    /// `to` repositions the cursor on entry.
    MovePhase { to: Option<GridPos> },
    SwapChoice { from: GridPos },
    Swap { from: GridPos, direction: Direction },
    Solve,
    TurnResult,
    Victory,
    GameOver,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Intro => "intro",
            Phase::StartActionChoice => "startActionChoice",
            Phase::ActionChoice { .. } => "actionChoice",
            Phase::StartMovePhase => "startMovePhase",
            Phase::MovePhase { .. } => "movePhase",
            Phase::SwapChoice { .. } => "swapChoice",
            Phase::Swap { .. } => "swap",
            Phase::Solve => "solve",
            Phase::TurnResult => "turnResult",
            Phase::Victory => "victory",
            Phase::GameOver => "gameOver",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Victory | Phase::GameOver)
    }
}

/// What a phase asks for once entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Enter {
    /// Wait for input.
    Stay,
    /// Transition immediately, in the same frame.
    Goto(Phase),
    /// Transition once every presentation task has settled.
    After(Phase),
}

// ── Shared battle models ────────────────────────────────────

pub struct Battle {
    pub grid: Grid,
    pub state: BattleState,
    pub turn_inputs: TurnInputs,
    pub cursor: GridPos,
    /// Sphere picked up in swap choice.
    pub selected: Option<GridPos>,
    pub menu_cursor: BattleAction,
    /// Completed turns.
    pub round: u32,
    pub last_resolution: Option<Resolution>,
    pub last_result: Option<TurnResult>,
    rng: Box<dyn RandomSource>,
}

impl Battle {
    pub fn new(config: &BattleConfig, mut rng: Box<dyn RandomSource>) -> Self {
        let grid = Grid::random(rng.as_mut());
        Self::with_grid(config, grid, rng)
    }

    pub fn with_grid(config: &BattleConfig, grid: Grid, rng: Box<dyn RandomSource>) -> Self {
        Self {
            grid,
            state: BattleState::from_config(config),
            turn_inputs: TurnInputs::default(),
            cursor: GridPos::new(0, 0),
            selected: None,
            menu_cursor: BattleAction::Attack,
            round: 0,
            last_resolution: None,
            last_result: None,
            rng,
        }
    }

    /// Character choosing at `index` of the active roster.
    pub fn chooser(&self, index: usize) -> Option<Character> {
        self.state.active_characters().get(index).copied()
    }
}

// ── Driver ──────────────────────────────────────────────────

pub struct StateMachine {
    current: Phase,
    started: bool,
    awaiting: Vec<Task>,
    after: Option<Phase>,
    queued: Option<Phase>,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    pub fn new() -> Self {
        Self::starting_at(Phase::Intro)
    }

    /// Machine whose first step enters `phase`.
    pub fn starting_at(phase: Phase) -> Self {
        Self {
            current: phase,
            started: false,
            awaiting: Vec::new(),
            after: None,
            queued: None,
        }
    }

    pub fn current(&self) -> &Phase {
        &self.current
    }

    /// True while a presentation task holds the machine.
    pub fn is_waiting(&self) -> bool {
        self.awaiting.iter().any(|t| !t.is_settled())
    }

    /// Advance one frame: drain pending transitions, then read input at
    /// most once.
    pub fn step(
        &mut self,
        battle: &mut Battle,
        sink: &mut dyn PresentationSink,
        input: &FrameInput,
    ) -> Result<(), BattleError> {
        let mut chain = 0;
        let mut executed = false;

        if !self.started {
            self.started = true;
            let first = self.current;
            self.validate(&first, battle)?;
            console::log(&format!("battle: enter {}", first.name()));
            self.enter(battle, sink, input)?;
        }

        loop {
            if let Some(next) = self.queued.take() {
                chain += 1;
                if chain > MAX_CHAIN {
                    return Err(BattleError::TransitionLoop(MAX_CHAIN));
                }
                self.transition(next, battle, sink, input)?;
                continue;
            }

            if self.is_waiting() {
                return Ok(());
            }
            self.awaiting.clear();

            if let Some(next) = self.after.take() {
                self.queued = Some(next);
                continue;
            }

            if executed {
                return Ok(());
            }
            executed = true;
            match execute(&self.current, battle, input) {
                Some(next) => self.queued = Some(next),
                None => return Ok(()),
            }
        }
    }

    fn transition(
        &mut self,
        next: Phase,
        battle: &mut Battle,
        sink: &mut dyn PresentationSink,
        input: &FrameInput,
    ) -> Result<(), BattleError> {
        if self.current.is_terminal() {
            return Err(invalid(&self.current, &next, "battle already ended"));
        }
        self.validate(&next, battle)?;

        exit(&self.current, battle);
        sink.on_exit_state(&self.current);
        for task in self.awaiting.drain(..) {
            task.cancel();
        }
        self.after = None;

        console::log(&format!("battle: {} -> {}", self.current.name(), next.name()));
        self.current = next;
        self.enter(battle, sink, input)
    }

    /// Reject entry arguments the target phase cannot accept.
    fn validate(&self, next: &Phase, battle: &Battle) -> Result<(), BattleError> {
        match *next {
            Phase::ActionChoice { index } => {
                let active = battle.state.active_characters().len();
                if index >= active {
                    return Err(invalid(
                        &self.current,
                        next,
                        format!("character index {index} but only {active} active"),
                    ));
                }
            }
            Phase::MovePhase { to: Some(pos) } | Phase::SwapChoice { from: pos } => {
                if !pos.in_bounds() {
                    return Err(invalid(&self.current, next, format!("{pos:?} is off the grid")));
                }
            }
            Phase::Swap { from, direction } => {
                if !from.in_bounds() || from.step(direction).is_none() {
                    return Err(invalid(
                        &self.current,
                        next,
                        format!("cannot swap {from:?} {direction:?}"),
                    ));
                }
            }
            Phase::TurnResult => {
                let active = battle.state.active_characters();
                if !battle.turn_inputs.covers_exactly(&active) {
                    return Err(invalid(
                        &self.current,
                        next,
                        "turn inputs do not match the active party",
                    ));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn enter(
        &mut self,
        battle: &mut Battle,
        sink: &mut dyn PresentationSink,
        input: &FrameInput,
    ) -> Result<(), BattleError> {
        let phase = self.current;
        let mut tasks = vec![sink.on_enter_state(&phase)];
        let command = enter(&phase, battle, sink, input, &mut tasks)?;
        self.awaiting = tasks;
        match command {
            Enter::Stay => {}
            Enter::Goto(next) => self.queued = Some(next),
            Enter::After(next) => self.after = Some(next),
        }
        Ok(())
    }
}

fn invalid(from: &Phase, to: &Phase, reason: impl Into<String>) -> BattleError {
    BattleError::InvalidTransition {
        from: from.name(),
        to: to.name(),
        reason: reason.into(),
    }
}

// ── Phase handlers ──────────────────────────────────────────

fn enter(
    phase: &Phase,
    battle: &mut Battle,
    sink: &mut dyn PresentationSink,
    input: &FrameInput,
    tasks: &mut Vec<Task>,
) -> Result<Enter, BattleError> {
    let command = match *phase {
        Phase::Intro => Enter::After(Phase::StartActionChoice),

        Phase::StartActionChoice => {
            if battle.state.is_game_over() {
                Enter::After(Phase::GameOver)
            } else {
                Enter::After(Phase::ActionChoice { index: 0 })
            }
        }

        Phase::ActionChoice { index } => {
            if index == 0 {
                battle.turn_inputs.clear();
            }
            battle.menu_cursor = BattleAction::Attack;
            Enter::Stay
        }

        Phase::StartMovePhase => Enter::Goto(Phase::MovePhase { to: None }),

        Phase::MovePhase { to } => {
            if let Some(pos) = to {
                battle.cursor = pos;
            }
            // Confirm or a drag still held from before this frame keeps the
            // sphere in hand.
            let confirm_held = input.is_down(Button::Confirm) && !input.pressed(Button::Confirm);
            let dragging = input.pointer_down()
                && !input.pointer_pressed()
                && matches!(input.pointer_target(), Some(PointerTarget::Cell(_)));
            if confirm_held || dragging {
                Enter::Goto(Phase::SwapChoice { from: battle.cursor })
            } else {
                Enter::Stay
            }
        }

        Phase::SwapChoice { from } => {
            battle.selected = Some(from);
            Enter::Stay
        }

        Phase::Swap { from, direction } => {
            let Some(to) = from.step(direction) else {
                return Err(BattleError::InvalidTransition {
                    from: phase.name(),
                    to: "movePhase",
                    reason: format!("no cell {direction:?} of {from:?}"),
                });
            };
            battle.grid.swap(from, to);
            tasks.push(sink.on_cells_swapped(from, direction));
            Enter::After(Phase::MovePhase { to: Some(to) })
        }

        Phase::Solve => {
            let resolution = solver::resolve(&mut battle.grid, battle.rng.as_mut());
            if resolution.is_empty() {
                battle.last_resolution = Some(resolution);
                return Ok(Enter::Goto(Phase::TurnResult));
            }

            battle.state.stock.add_all(&resolution.cleared_by_type);
            for sphere in SPHERE_TYPES {
                let cells = resolution.cells_of(sphere);
                if !cells.is_empty() {
                    tasks.push(sink.on_group_cleared(sphere, &cells));
                }
            }
            for refill in &resolution.refills {
                tasks.push(sink.on_column_refilled(refill.x, &refill.changes));
            }
            battle.last_resolution = Some(resolution);
            Enter::After(Phase::TurnResult)
        }

        Phase::TurnResult => {
            let inputs = battle.turn_inputs;
            let result = battle.state.execute_turn(&inputs, battle.rng.as_mut());
            tasks.push(sink.on_turn_resolved(&result));
            battle.last_result = Some(result);
            battle.round += 1;
            if battle.state.is_victory() {
                Enter::After(Phase::Victory)
            } else {
                Enter::After(Phase::StartActionChoice)
            }
        }

        Phase::Victory | Phase::GameOver => Enter::Stay,
    };
    Ok(command)
}

fn exit(phase: &Phase, battle: &mut Battle) {
    if let Phase::SwapChoice { .. } = phase {
        battle.selected = None;
    }
}

fn execute(phase: &Phase, battle: &mut Battle, input: &FrameInput) -> Option<Phase> {
    match *phase {
        Phase::ActionChoice { index } => execute_action_choice(index, battle, input),
        Phase::MovePhase { .. } => execute_move_phase(battle, input),
        Phase::SwapChoice { from } => execute_swap_choice(from, input),
        _ => None,
    }
}

fn execute_action_choice(index: usize, battle: &mut Battle, input: &FrameInput) -> Option<Phase> {
    let character = battle.chooser(index)?;

    let mut chosen = None;
    if input.pointer_pressed() {
        if let Some(PointerTarget::Action(action)) = input.pointer_target() {
            chosen = Some(action);
        }
    }
    if chosen.is_none() {
        if input.pointer_moved() {
            if let Some(PointerTarget::Action(action)) = input.pointer_target() {
                battle.menu_cursor = action;
            }
        }
        // Two-item horizontal menu: either direction flips the cursor.
        if input.pressed(Button::Left) || input.pressed(Button::Right) {
            battle.menu_cursor = match battle.menu_cursor {
                BattleAction::Attack => BattleAction::Defend,
                BattleAction::Defend => BattleAction::Attack,
            };
        }
        if input.pressed(Button::Confirm) {
            chosen = Some(battle.menu_cursor);
        }
    }

    let action = chosen?;
    battle.turn_inputs.set(character, action);
    if index + 1 < battle.state.active_characters().len() {
        Some(Phase::ActionChoice { index: index + 1 })
    } else {
        Some(Phase::StartMovePhase)
    }
}

fn execute_move_phase(battle: &mut Battle, input: &FrameInput) -> Option<Phase> {
    if input.pressed(Button::Confirm) {
        return Some(Phase::SwapChoice { from: battle.cursor });
    }
    if input.pressed(Button::Solve) {
        return Some(Phase::Solve);
    }

    match (input.pointer_pressed(), input.pointer_target()) {
        (true, Some(PointerTarget::Cell(pos))) => {
            battle.cursor = pos;
            return Some(Phase::SwapChoice { from: pos });
        }
        (true, Some(PointerTarget::Play)) => return Some(Phase::Solve),
        (false, Some(PointerTarget::Cell(pos))) if input.pointer_moved() => {
            battle.cursor = pos;
        }
        _ => {}
    }

    let cursor = battle.cursor;
    if input.pressed_or_repeat(Button::Right) && cursor.x < GRID_W - 1 {
        battle.cursor = battle.cursor.clamped_offset(1, 0);
    }
    if input.pressed_or_repeat(Button::Left) && cursor.x > 0 {
        battle.cursor = battle.cursor.clamped_offset(-1, 0);
    }
    if input.pressed_or_repeat(Button::Up) && cursor.y > 0 {
        battle.cursor = battle.cursor.clamped_offset(0, -1);
    }
    if input.pressed_or_repeat(Button::Down) && cursor.y < GRID_H - 1 {
        battle.cursor = battle.cursor.clamped_offset(0, 1);
    }
    None
}

fn execute_swap_choice(from: GridPos, input: &FrameInput) -> Option<Phase> {
    if input.pressed(Button::Cancel) {
        return Some(Phase::MovePhase { to: None });
    }
    if !input.is_down(Button::Confirm) && !input.pointer_down() {
        return Some(Phase::MovePhase { to: None });
    }

    let swap = |direction| Some(Phase::Swap { from, direction });

    if input.pointer_down() {
        if let Some(PointerTarget::Cell(p)) = input.pointer_target() {
            if p.y < from.y && from.y > 0 {
                return swap(Direction::Up);
            }
            if p.y > from.y && from.y < GRID_H - 1 {
                return swap(Direction::Down);
            }
            if p.x < from.x && from.x > 0 {
                return swap(Direction::Left);
            }
            if p.x > from.x && from.x < GRID_W - 1 {
                return swap(Direction::Right);
            }
        }
    }

    let held = [
        (Button::Up, Direction::Up),
        (Button::Down, Direction::Down),
        (Button::Left, Direction::Left),
        (Button::Right, Direction::Right),
    ];
    for (button, direction) in held {
        if input.is_down(button) && from.step(direction).is_some() {
            return swap(direction);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::grid::SphereType;
    use crate::battle::presentation::NullSink;
    use crate::battle::rng::SequenceRng;

    fn battle() -> Battle {
        let rng = Box::new(SequenceRng::new(vec![0, 1, 2, 3, 4, 2]));
        Battle::new(&BattleConfig::default(), rng)
    }

    fn at(phase: Phase, battle: &mut Battle) -> StateMachine {
        let mut machine = StateMachine::starting_at(phase);
        machine
            .step(battle, &mut NullSink, &FrameInput::idle())
            .unwrap();
        machine
    }

    #[test]
    fn intro_chains_to_first_action_choice() {
        let mut b = battle();
        let machine = at(Phase::Intro, &mut b);
        assert_eq!(*machine.current(), Phase::ActionChoice { index: 0 });
        assert_eq!(b.menu_cursor, BattleAction::Attack);
    }

    /// Sink that hands back `task` when `phase` is entered.
    struct HoldOn {
        phase: Phase,
        task: Task,
    }

    impl PresentationSink for HoldOn {
        fn on_enter_state(&mut self, phase: &Phase) -> Task {
            if *phase == self.phase {
                self.task.clone()
            } else {
                Task::done()
            }
        }

        fn on_exit_state(&mut self, _phase: &Phase) {}

        fn on_group_cleared(&mut self, _sphere: SphereType, _cells: &[GridPos]) -> Task {
            Task::done()
        }

        fn on_column_refilled(&mut self, _x: usize, _changes: &[solver::CellChange]) -> Task {
            Task::done()
        }

        fn on_cells_swapped(&mut self, _from: GridPos, _direction: Direction) -> Task {
            Task::done()
        }

        fn on_turn_resolved(&mut self, _result: &TurnResult) -> Task {
            Task::done()
        }
    }

    #[test]
    fn pending_task_gates_transition() {
        let mut b = battle();
        let intro = Task::pending();
        let mut sink = HoldOn {
            phase: Phase::Intro,
            task: intro.clone(),
        };
        let mut machine = StateMachine::new();
        machine.step(&mut b, &mut sink, &FrameInput::idle()).unwrap();
        assert_eq!(*machine.current(), Phase::Intro);
        assert!(machine.is_waiting());

        intro.complete();
        machine.step(&mut b, &mut sink, &FrameInput::idle()).unwrap();
        assert_eq!(*machine.current(), Phase::ActionChoice { index: 0 });
    }

    #[test]
    fn transition_cancels_pending_enter_task() {
        let mut b = battle();
        let task = Task::pending();
        let mut sink = HoldOn {
            phase: Phase::StartMovePhase,
            task: task.clone(),
        };
        let mut machine = StateMachine::starting_at(Phase::StartMovePhase);
        machine.step(&mut b, &mut sink, &FrameInput::idle()).unwrap();

        assert!(task.is_cancelled());
        assert_eq!(*machine.current(), Phase::MovePhase { to: None });
        assert!(!machine.is_waiting());

        // Completing a cancelled task does not revive it.
        task.complete();
        assert!(task.is_cancelled());
    }

    #[test]
    fn action_choice_menu_flips_and_selects() {
        let mut b = battle();
        let mut machine = at(Phase::Intro, &mut b);
        let right = FrameInput::idle().with_pressed(Button::Right);
        machine.step(&mut b, &mut NullSink, &right).unwrap();
        assert_eq!(b.menu_cursor, BattleAction::Defend);

        let confirm = FrameInput::idle().with_pressed(Button::Confirm);
        machine.step(&mut b, &mut NullSink, &confirm).unwrap();
        assert_eq!(b.turn_inputs.get(Character::Rojo), Some(BattleAction::Defend));
        assert_eq!(*machine.current(), Phase::ActionChoice { index: 1 });
        // Menu cursor resets to Attack for the next character.
        assert_eq!(b.menu_cursor, BattleAction::Attack);
    }

    #[test]
    fn pointer_selects_action_directly() {
        let mut b = battle();
        let mut machine = at(Phase::ActionChoice { index: 2 }, &mut b);
        let click = FrameInput::idle().with_pointer_press(PointerTarget::Action(BattleAction::Defend));
        machine.step(&mut b, &mut NullSink, &click).unwrap();
        assert_eq!(b.turn_inputs.get(Character::Midori), Some(BattleAction::Defend));
        // Last chooser: start move phase and settle in move phase.
        assert_eq!(*machine.current(), Phase::MovePhase { to: None });
    }

    #[test]
    fn action_choice_past_roster_is_invalid() {
        let mut b = battle();
        b.state.member_mut(Character::Midori).hp = 0;
        let mut machine = StateMachine::starting_at(Phase::ActionChoice { index: 2 });
        let err = machine
            .step(&mut b, &mut NullSink, &FrameInput::idle())
            .unwrap_err();
        assert!(matches!(err, BattleError::InvalidTransition { to: "actionChoice", .. }));
    }

    #[test]
    fn cursor_moves_and_clamps() {
        let mut b = battle();
        let mut machine = at(Phase::MovePhase { to: None }, &mut b);
        machine
            .step(&mut b, &mut NullSink, &FrameInput::idle().with_pressed(Button::Up))
            .unwrap();
        assert_eq!(b.cursor, GridPos::new(0, 0));
        machine
            .step(&mut b, &mut NullSink, &FrameInput::idle().with_pressed(Button::Right))
            .unwrap();
        machine
            .step(&mut b, &mut NullSink, &FrameInput::idle().with_pressed(Button::Down))
            .unwrap();
        assert_eq!(b.cursor, GridPos::new(1, 1));
    }

    #[test]
    fn move_phase_entry_repositions_cursor() {
        let mut b = battle();
        at(Phase::MovePhase { to: Some(GridPos::new(5, 6)) }, &mut b);
        assert_eq!(b.cursor, GridPos::new(5, 6));
    }

    #[test]
    fn confirm_picks_up_and_release_drops() {
        let mut b = battle();
        let before = b.grid.clone();
        let mut machine = at(Phase::MovePhase { to: Some(GridPos::new(3, 3)) }, &mut b);

        machine
            .step(&mut b, &mut NullSink, &FrameInput::idle().with_pressed(Button::Confirm))
            .unwrap();
        assert_eq!(*machine.current(), Phase::SwapChoice { from: GridPos::new(3, 3) });
        assert_eq!(b.selected, Some(GridPos::new(3, 3)));

        machine.step(&mut b, &mut NullSink, &FrameInput::idle()).unwrap();
        assert_eq!(*machine.current(), Phase::MovePhase { to: None });
        assert_eq!(b.selected, None);
        assert_eq!(b.grid, before);
    }

    #[test]
    fn held_direction_swaps_and_keeps_hold() {
        let mut b = battle();
        let from = GridPos::new(3, 3);
        let to = GridPos::new(3, 2);
        let (a, c) = (b.grid.sphere(from), b.grid.sphere(to));
        let mut machine = StateMachine::starting_at(Phase::SwapChoice { from });

        let frame = FrameInput::idle().with_held(Button::Confirm).with_held(Button::Up);
        machine.step(&mut b, &mut NullSink, &frame).unwrap();
        assert_eq!(b.grid.sphere(from), c);
        assert_eq!(b.grid.sphere(to), a);
        // Confirm is still held, so the swapped sphere stays in hand.
        assert_eq!(*machine.current(), Phase::SwapChoice { from: to });
        assert_eq!(b.cursor, to);
    }

    #[test]
    fn edge_direction_is_ignored() {
        let mut b = battle();
        let corner = GridPos::new(0, 0);
        let mut machine = StateMachine::starting_at(Phase::SwapChoice { from: corner });
        let frame = FrameInput::idle()
            .with_held(Button::Confirm)
            .with_held(Button::Up)
            .with_held(Button::Left);
        machine.step(&mut b, &mut NullSink, &frame).unwrap();
        assert_eq!(*machine.current(), Phase::SwapChoice { from: corner });
    }

    #[test]
    fn pointer_drag_chooses_direction() {
        let mut b = battle();
        let from = GridPos::new(4, 4);
        let mut machine = StateMachine::starting_at(Phase::SwapChoice { from });
        let drag = FrameInput::idle().with_pointer_drag(PointerTarget::Cell(GridPos::new(6, 4)));
        machine.step(&mut b, &mut NullSink, &drag).unwrap();
        // Drag is still held on arrival, so the sphere is picked up again at the new cell.
        assert_eq!(*machine.current(), Phase::SwapChoice { from: GridPos::new(5, 4) });
    }

    #[test]
    fn swap_off_grid_is_invalid() {
        let mut b = battle();
        let mut machine = StateMachine::starting_at(Phase::Swap {
            from: GridPos::new(0, 0),
            direction: Direction::Left,
        });
        let err = machine
            .step(&mut b, &mut NullSink, &FrameInput::idle())
            .unwrap_err();
        assert!(matches!(err, BattleError::InvalidTransition { .. }));
    }

    #[test]
    fn turn_result_requires_complete_inputs() {
        let mut b = battle();
        b.turn_inputs.set(Character::Rojo, BattleAction::Attack);
        let mut machine = StateMachine::starting_at(Phase::TurnResult);
        assert!(machine
            .step(&mut b, &mut NullSink, &FrameInput::idle())
            .is_err());
    }

    #[test]
    fn terminal_phase_ignores_input() {
        let mut b = battle();
        let mut machine = at(Phase::Victory, &mut b);
        let frame = FrameInput::idle()
            .with_pressed(Button::Confirm)
            .with_pressed(Button::Solve);
        machine.step(&mut b, &mut NullSink, &frame).unwrap();
        assert_eq!(*machine.current(), Phase::Victory);
    }
}
