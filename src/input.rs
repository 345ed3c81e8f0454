//! Input handling: per-frame button snapshots, pointer state and click targets.
//!
//! Browser handlers write into [`InputState`] as events arrive; once per
//! frame the game takes a [`FrameInput`] snapshot, which is the only input
//! the battle state machine ever sees.

use ratzilla::ratatui::layout::Rect;

use crate::battle::combat::BattleAction;
use crate::battle::grid::GridPos;

/// Hold time before a held direction starts repeating.
pub const REPEAT_DELAY_MS: f64 = 500.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Cancel,
    Solve,
}

const BUTTON_COUNT: usize = 7;

impl Button {
    fn slot(self) -> usize {
        self as usize
    }
}

/// What the pointer is over, resolved from registered click targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerTarget {
    Cell(GridPos),
    Action(BattleAction),
    Play,
}

// ── Frame snapshot ──────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct ButtonFrame {
    down: bool,
    pressed: bool,
    repeat: bool,
}

/// Input as seen by one frame of game logic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    buttons: [ButtonFrame; BUTTON_COUNT],
    pointer_down: bool,
    pointer_pressed: bool,
    pointer_moved: bool,
    pointer_target: Option<PointerTarget>,
}

impl FrameInput {
    /// No buttons held, pointer up.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_down(&self, button: Button) -> bool {
        self.buttons[button.slot()].down
    }

    /// Went down since the previous frame.
    pub fn pressed(&self, button: Button) -> bool {
        self.buttons[button.slot()].pressed
    }

    /// Went down this frame, or has been held long enough to repeat.
    pub fn pressed_or_repeat(&self, button: Button) -> bool {
        let b = self.buttons[button.slot()];
        b.pressed || b.repeat
    }

    pub fn pointer_down(&self) -> bool {
        self.pointer_down
    }

    pub fn pointer_pressed(&self) -> bool {
        self.pointer_pressed
    }

    pub fn pointer_moved(&self) -> bool {
        self.pointer_moved
    }

    pub fn pointer_target(&self) -> Option<PointerTarget> {
        self.pointer_target
    }

    // Builders for scripted frames.

    /// Button held from an earlier frame.
    pub fn with_held(mut self, button: Button) -> Self {
        self.buttons[button.slot()].down = true;
        self
    }

    /// Button pressed this frame.
    pub fn with_pressed(mut self, button: Button) -> Self {
        let b = &mut self.buttons[button.slot()];
        b.down = true;
        b.pressed = true;
        self
    }

    pub fn with_pointer_press(mut self, target: PointerTarget) -> Self {
        self.pointer_down = true;
        self.pointer_pressed = true;
        self.pointer_target = Some(target);
        self
    }

    /// Pointer held and dragged over `target`.
    pub fn with_pointer_drag(mut self, target: PointerTarget) -> Self {
        self.pointer_down = true;
        self.pointer_moved = true;
        self.pointer_target = Some(target);
        self
    }

    pub fn with_pointer_hover(mut self, target: PointerTarget) -> Self {
        self.pointer_moved = true;
        self.pointer_target = Some(target);
        self
    }
}

// ── Live state ──────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default)]
struct ButtonTrack {
    down: bool,
    pressed: bool,
    tapped: bool,
    next_repeat: f64,
}

/// Accumulates events between frames.
#[derive(Debug, Default)]
pub struct InputState {
    buttons: [ButtonTrack; BUTTON_COUNT],
    pointer_down: bool,
    pointer_pressed: bool,
    pointer_moved: bool,
    pointer_target: Option<PointerTarget>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, button: Button, now_ms: f64) {
        let b = &mut self.buttons[button.slot()];
        if !b.down {
            b.down = true;
            b.pressed = true;
            b.next_repeat = now_ms + REPEAT_DELAY_MS;
        }
    }

    pub fn release(&mut self, button: Button) {
        self.buttons[button.slot()].down = false;
    }

    /// Press that releases itself after the next snapshot, for sources
    /// that only report key-down.
    pub fn tap(&mut self, button: Button, now_ms: f64) {
        self.press(button, now_ms);
        self.buttons[button.slot()].tapped = true;
    }

    /// Flip between held and released.
    pub fn toggle(&mut self, button: Button, now_ms: f64) {
        if self.is_down(button) {
            self.release(button);
        } else {
            self.press(button, now_ms);
        }
    }

    pub fn is_down(&self, button: Button) -> bool {
        self.buttons[button.slot()].down
    }

    pub fn pointer_press(&mut self, target: Option<PointerTarget>) {
        self.pointer_down = true;
        self.pointer_pressed = true;
        self.pointer_target = target;
    }

    pub fn pointer_move(&mut self, target: Option<PointerTarget>) {
        if self.pointer_target != target {
            self.pointer_moved = true;
        }
        self.pointer_target = target;
    }

    pub fn pointer_release(&mut self) {
        self.pointer_down = false;
    }

    /// Take this frame's view and reset edge flags.
    pub fn snapshot(&mut self, now_ms: f64) -> FrameInput {
        let mut frame = FrameInput {
            pointer_down: self.pointer_down || self.pointer_pressed,
            pointer_pressed: self.pointer_pressed,
            pointer_moved: self.pointer_moved,
            pointer_target: self.pointer_target,
            ..FrameInput::default()
        };

        for (track, out) in self.buttons.iter_mut().zip(frame.buttons.iter_mut()) {
            let repeat = track.down && !track.pressed && now_ms >= track.next_repeat;
            if repeat {
                track.next_repeat = now_ms + REPEAT_DELAY_MS;
            }
            *out = ButtonFrame {
                down: track.down || track.pressed,
                pressed: track.pressed,
                repeat,
            };
            track.pressed = false;
            if track.tapped {
                track.down = false;
                track.tapped = false;
            }
        }

        self.pointer_pressed = false;
        self.pointer_moved = false;
        frame
    }
}

// ── Click targets ───────────────────────────────────────────

/// A region on screen that can be clicked to trigger an action.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    pub rect: Rect,
    pub action_id: u16,
}

/// Shared state between the render loop and mouse handler.
#[derive(Debug, Default)]
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// Action ID under a terminal cell. Later targets win where they overlap.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            if col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height {
                Some(t.action_id)
            } else {
                None
            }
        })
    }
}

/// Determine whether a screen width (in columns) should use narrow layout.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

/// Convert a pixel Y coordinate (relative to the terminal's top edge) to a row.
pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    if grid_height <= 0.0 || terminal_rows == 0 || click_y < 0.0 {
        return None;
    }
    let cell_height = grid_height / terminal_rows as f64;
    let row = (click_y / cell_height) as u16;
    if row >= terminal_rows { None } else { Some(row) }
}

/// Convert a pixel X coordinate to a terminal column index.
pub fn pixel_x_to_col(click_x: f64, grid_width: f64, terminal_cols: u16) -> Option<u16> {
    if grid_width <= 0.0 || terminal_cols == 0 || click_x < 0.0 {
        return None;
    }
    let cell_width = grid_width / terminal_cols as f64;
    let col = (click_x / cell_width) as u16;
    if col >= terminal_cols { None } else { Some(col) }
}
