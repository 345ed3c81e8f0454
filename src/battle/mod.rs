/// Sphere Battle: a match-3 board driving a turn-based party fight.

pub mod actions;
pub mod combat;
pub mod dialog;
pub mod grid;
pub mod machine;
pub mod presentation;
pub mod presenter;
pub mod render;
pub mod rng;
pub mod solver;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::config::BattleConfig;
use crate::error::BattleError;
use crate::input::{ClickState, FrameInput};

use machine::{Battle, Phase, StateMachine};
use presentation::PresentationSink;
use presenter::TerminalPresenter;
use rng::RandomSource;

/// One battle: model, state machine and the sink that presents it.
pub struct BattleGame<S: PresentationSink> {
    pub battle: Battle,
    pub machine: StateMachine,
    pub sink: S,
}

impl<S: PresentationSink> BattleGame<S> {
    pub fn new(config: &BattleConfig, rng: Box<dyn RandomSource>, sink: S) -> Self {
        Self {
            battle: Battle::new(config, rng),
            machine: StateMachine::new(),
            sink,
        }
    }

    pub fn from_parts(battle: Battle, machine: StateMachine, sink: S) -> Self {
        Self { battle, machine, sink }
    }

    /// Advance animations by `delta_ms`, then run one machine step.
    /// A dialog script the sink failed to parse halts the battle.
    pub fn frame(&mut self, input: &FrameInput, delta_ms: f64) -> Result<(), BattleError> {
        self.sink.update(delta_ms);
        self.machine.step(&mut self.battle, &mut self.sink, input)?;
        match self.sink.take_error() {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    pub fn phase(&self) -> &Phase {
        self.machine.current()
    }

    /// Whether Confirm behaves as a held button in the current phase.
    pub fn confirm_holds(&self) -> bool {
        matches!(self.phase(), Phase::MovePhase { .. } | Phase::SwapChoice { .. })
    }

    pub fn is_over(&self) -> bool {
        self.phase().is_terminal()
    }
}

impl BattleGame<TerminalPresenter> {
    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(&self.battle, self.phase(), &self.sink, f, area, click_state);
    }
}
