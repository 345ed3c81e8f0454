//! Contract between the battle core and whatever draws it.
//!
//! The core reports what happened through [`PresentationSink`]; each call
//! hands back a [`Task`] the state machine can wait on before it accepts
//! more input. Tasks are shared handles: the sink completes them when its
//! animation ends, the machine cancels them when a newer phase supersedes
//! them.

use std::cell::Cell;
use std::rc::Rc;

use super::combat::TurnResult;
use super::dialog::ScriptError;
use super::grid::{Direction, GridPos, SphereType};
use super::machine::Phase;
use super::solver::CellChange;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Done,
    Cancelled,
}

/// Completion signal for a presentation step.
#[derive(Clone, Debug)]
pub struct Task(Rc<Cell<TaskStatus>>);

impl Task {
    pub fn pending() -> Self {
        Task(Rc::new(Cell::new(TaskStatus::Pending)))
    }

    /// An already-finished task, for sinks with nothing to animate.
    pub fn done() -> Self {
        Task(Rc::new(Cell::new(TaskStatus::Done)))
    }

    pub fn status(&self) -> TaskStatus {
        self.0.get()
    }

    /// Mark finished. Has no effect on a cancelled task.
    pub fn complete(&self) {
        if self.0.get() == TaskStatus::Pending {
            self.0.set(TaskStatus::Done);
        }
    }

    /// Abandon the task. Has no effect on a finished task.
    pub fn cancel(&self) {
        if self.0.get() == TaskStatus::Pending {
            self.0.set(TaskStatus::Cancelled);
        }
    }

    pub fn is_settled(&self) -> bool {
        self.0.get() != TaskStatus::Pending
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get() == TaskStatus::Cancelled
    }
}

pub trait PresentationSink {
    fn on_enter_state(&mut self, phase: &Phase) -> Task;

    fn on_exit_state(&mut self, phase: &Phase);

    fn on_group_cleared(&mut self, sphere: SphereType, cells: &[GridPos]) -> Task;

    fn on_column_refilled(&mut self, x: usize, changes: &[CellChange]) -> Task;

    fn on_cells_swapped(&mut self, from: GridPos, direction: Direction) -> Task;

    fn on_turn_resolved(&mut self, result: &TurnResult) -> Task;

    /// Advance animations by one frame.
    fn update(&mut self, _delta_ms: f64) {}

    /// First dialog script failure since the last call, if any.
    fn take_error(&mut self) -> Option<ScriptError> {
        None
    }
}

/// Sink that draws nothing and finishes every task immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl PresentationSink for NullSink {
    fn on_enter_state(&mut self, _phase: &Phase) -> Task {
        Task::done()
    }

    fn on_exit_state(&mut self, _phase: &Phase) {}

    fn on_group_cleared(&mut self, _sphere: SphereType, _cells: &[GridPos]) -> Task {
        Task::done()
    }

    fn on_column_refilled(&mut self, _x: usize, _changes: &[CellChange]) -> Task {
        Task::done()
    }

    fn on_cells_swapped(&mut self, _from: GridPos, _direction: Direction) -> Task {
        Task::done()
    }

    fn on_turn_resolved(&mut self, _result: &TurnResult) -> Task {
        Task::done()
    }
}
