//! Terminal presenter: turns battle events into timed visual state for the
//! renderer, narration for the dialog box and console logs.

use super::combat::{PartyActionResult, TurnResult};
use super::dialog::{DialogPlayer, ScriptError, CHAR_DELAY_MS};
use super::grid::{Direction, GridPos, SphereType};
use super::machine::Phase;
use super::presentation::{PresentationSink, Task};
use super::solver::CellChange;
use crate::console;

// ── Timings (ms) ────────────────────────────────────────────

const INTRO_MS: f64 = 1000.0;
const FADE_MS: f64 = 400.0;
const SWAP_MS: f64 = 150.0;
const CLEAR_MS: f64 = 300.0;
const REFILL_MS: f64 = 300.0;
/// Hold after the turn narration finishes typing.
const TURN_HOLD_MS: f64 = 800.0;

const MAX_LOG: usize = 6;

const TUTORIAL_ACTION: &str = "-Press action or use \n  arrows and spacebar.";
const TUTORIAL_MOVE: &str = "-Match 3 or more\n  to buff actions.<delay>\
                             -Click and drag or hold\n  space to move sphere.<delay>\
                             -Press Play button or\n  Enter to continue.";
const GAME_OVER_TEXT: &str = "GAME OVER\nRefresh to try again";
const VICTORY_TEXT: &str = "You won!\nThank you for playing!";

struct Timer {
    task: Task,
    remaining: f64,
}

pub struct TerminalPresenter {
    timers: Vec<Timer>,
    pub dialog: DialogPlayer,
    first_round: bool,
    /// Cells flashing after a clear.
    pub flashing: Vec<GridPos>,
    /// Cells mid-swap.
    pub swapping: Option<(GridPos, Direction)>,
    /// Recent battle log lines, oldest first.
    pub log: Vec<String>,
    pub end_text: Option<&'static str>,
    error: Option<ScriptError>,
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self {
            timers: Vec::new(),
            dialog: DialogPlayer::new(),
            first_round: true,
            flashing: Vec::new(),
            swapping: None,
            log: Vec::new(),
            end_text: None,
            error: None,
        }
    }

    fn timed(&mut self, ms: f64) -> Task {
        let task = Task::pending();
        self.timers.push(Timer {
            task: task.clone(),
            remaining: ms,
        });
        task
    }

    fn push_log(&mut self, line: String) {
        self.log.push(line);
        if self.log.len() > MAX_LOG {
            self.log.remove(0);
        }
    }

    fn play(&mut self, script: &str) {
        if let Err(e) = self.dialog.play(script) {
            self.fail(e);
        }
    }

    fn set_text(&mut self, script: &str) {
        if let Err(e) = self.dialog.set_text(script) {
            self.fail(e);
        }
    }

    /// Keep the first script failure for the driver to surface.
    fn fail(&mut self, e: ScriptError) {
        console::error(&format!("dialog: {e}"));
        self.error.get_or_insert(e);
    }

    /// True while any timed animation is still running.
    pub fn is_animating(&self) -> bool {
        self.timers.iter().any(|t| !t.task.is_settled())
    }
}

/// Narration for a resolved turn, as a dialog script.
pub fn narration(result: &TurnResult) -> String {
    let mut parts = Vec::new();
    if result.any_attack() {
        parts.push("-Attack!");
    }
    if result.enemy.is_some() {
        parts.push(if result.any_attack() {
            "-The <red>Enemy</red> strikes\n  back!"
        } else {
            "-The <red>Enemy</red> attacks!"
        });
    }
    parts.join("<delay>")
}

impl PresentationSink for TerminalPresenter {
    fn on_enter_state(&mut self, phase: &Phase) -> Task {
        match phase {
            Phase::Intro => self.timed(INTRO_MS),
            Phase::StartActionChoice => {
                if self.first_round {
                    self.play(TUTORIAL_ACTION);
                }
                self.timed(FADE_MS)
            }
            Phase::StartMovePhase => {
                if self.first_round {
                    self.play(TUTORIAL_MOVE);
                }
                Task::done()
            }
            Phase::Solve => {
                self.set_text("");
                Task::done()
            }
            Phase::Victory => {
                self.end_text = Some(VICTORY_TEXT);
                self.set_text(VICTORY_TEXT);
                Task::done()
            }
            Phase::GameOver => {
                self.end_text = Some(GAME_OVER_TEXT);
                self.set_text(GAME_OVER_TEXT);
                Task::done()
            }
            _ => Task::done(),
        }
    }

    fn on_exit_state(&mut self, phase: &Phase) {
        if let Phase::Swap { .. } = phase {
            self.swapping = None;
        }
    }

    fn on_group_cleared(&mut self, sphere: SphereType, cells: &[GridPos]) -> Task {
        self.flashing.extend_from_slice(cells);
        self.push_log(format!("+{} {}", cells.len(), sphere.name()));
        self.timed(CLEAR_MS)
    }

    fn on_column_refilled(&mut self, _x: usize, changes: &[CellChange]) -> Task {
        self.timed(REFILL_MS + changes.len() as f64 * 20.0)
    }

    fn on_cells_swapped(&mut self, from: GridPos, direction: Direction) -> Task {
        self.swapping = Some((from, direction));
        self.timed(SWAP_MS)
    }

    fn on_turn_resolved(&mut self, result: &TurnResult) -> Task {
        match serde_json::to_string(result) {
            Ok(json) => console::log(&format!("turn: {json}")),
            Err(e) => console::warn(&format!("turn: could not serialize result: {e}")),
        }

        for r in result.party.iter().flatten() {
            match r {
                PartyActionResult::Attack { character, damage, death } => {
                    let tail = if *death { " The enemy falls!" } else { "" };
                    self.push_log(format!("{} hits for {damage}.{tail}", character.name()));
                }
                PartyActionResult::Defend { character } => {
                    self.push_log(format!("{} defends.", character.name()));
                }
            }
        }
        if let Some(enemy) = result.enemy {
            let tail = if enemy.death { " They fall!" } else { "" };
            self.push_log(format!(
                "Enemy hits {} for {}.{tail}",
                enemy.target.name(),
                enemy.damage
            ));
        }

        let script = narration(result);
        let chars = script.replace("<delay>", "").replace("<red>", "").replace("</red>", "");
        self.play(&script);
        self.first_round = false;
        self.timed(chars.chars().count() as f64 * CHAR_DELAY_MS + TURN_HOLD_MS)
    }

    fn take_error(&mut self) -> Option<ScriptError> {
        self.error.take()
    }

    fn update(&mut self, delta_ms: f64) {
        self.dialog.update(delta_ms);
        for timer in &mut self.timers {
            timer.remaining -= delta_ms;
            if timer.remaining <= 0.0 {
                timer.task.complete();
            }
        }
        self.timers.retain(|t| !t.task.is_settled());
        if self.timers.is_empty() {
            self.flashing.clear();
        }
    }
}
