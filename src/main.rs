use std::{cell::RefCell, io, rc::Rc};

use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

use rbg_battle::battle::actions;
use rbg_battle::battle::presenter::TerminalPresenter;
use rbg_battle::battle::rng::Lcg;
use rbg_battle::battle::BattleGame;
use rbg_battle::config::load_config;
use rbg_battle::console;
use rbg_battle::input::{pixel_x_to_col, pixel_y_to_row, Button, ClickState, InputState, PointerTarget};
use rbg_battle::time::{now_ms, FrameClock};

/// Query the grid container's bounding rect and convert pixel coordinates to a cell.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let click_x = mouse_x as f64 - rect.left();
    let click_y = mouse_y as f64 - rect.top();

    let col = pixel_x_to_col(click_x, rect.width(), cs.terminal_cols)?;
    let row = pixel_y_to_row(click_y, rect.height(), cs.terminal_rows)?;
    Some((col, row))
}

fn pointer_target_at(mouse_x: u32, mouse_y: u32, click_state: &Rc<RefCell<ClickState>>) -> Option<PointerTarget> {
    let cs = click_state.borrow();
    if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
        return None;
    }
    let (col, row) = dom_pixel_to_cell(mouse_x, mouse_y, &cs)?;
    cs.hit_test(col, row).and_then(actions::pointer_target)
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let config = load_config();
    if let Err(e) = config.validate() {
        console::error(&format!("config: {e}"));
        return Ok(());
    }
    let rng = match config.seed {
        Some(seed) => Lcg::new(seed),
        None => Lcg::from_clock(),
    };
    let game = Rc::new(RefCell::new(BattleGame::new(
        &config,
        Box::new(rng),
        TerminalPresenter::new(),
    )));
    let input = Rc::new(RefCell::new(InputState::new()));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let halted = Rc::new(RefCell::new(false));

    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch: press picks up, move drags or hovers, release drops
    terminal.on_mouse_event({
        let input = input.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.button != MouseButton::Left && mouse_event.event == MouseEventKind::Pressed {
                return;
            }
            let target = pointer_target_at(mouse_event.x, mouse_event.y, &click_state);
            let mut input = input.borrow_mut();
            match mouse_event.event {
                MouseEventKind::Pressed => input.pointer_press(target),
                MouseEventKind::Moved => input.pointer_move(target),
                MouseEventKind::Released => input.pointer_release(),
                _ => {}
            }
        }
    });

    // Keyboard: the browser only reports key-down, so space toggles the
    // hold where the board reads Confirm as held.
    terminal.on_key_event({
        let input = input.clone();
        let game = game.clone();
        move |key_event| {
            let now = now_ms();
            let holds = game.borrow().confirm_holds();
            let mut input = input.borrow_mut();
            match key_event.code {
                KeyCode::Char(' ') if holds => input.toggle(Button::Confirm, now),
                KeyCode::Char(' ') => input.tap(Button::Confirm, now),
                KeyCode::Enter | KeyCode::Char('p') => input.tap(Button::Solve, now),
                KeyCode::Esc => input.tap(Button::Cancel, now),
                KeyCode::Left => input.tap(Button::Left, now),
                KeyCode::Right => input.tap(Button::Right, now),
                KeyCode::Up => input.tap(Button::Up, now),
                KeyCode::Down => input.tap(Button::Down, now),
                _ => {}
            }
        }
    });

    terminal.draw_web({
        let mut clock = FrameClock::new();
        move |f| {
            let size = f.area();
            {
                let mut cs = click_state.borrow_mut();
                cs.terminal_cols = size.width;
                cs.terminal_rows = size.height;
                cs.clear_targets();
            }

            let now = now_ms();
            let delta = clock.update(now);
            let mut game = game.borrow_mut();

            if !*halted.borrow() {
                let frame = {
                    let mut input = input.borrow_mut();
                    if !game.confirm_holds() && input.is_down(Button::Confirm) {
                        input.release(Button::Confirm);
                    }
                    input.snapshot(now)
                };
                if let Err(e) = game.frame(&frame, delta) {
                    console::error(&format!("battle halted: {e}"));
                    *halted.borrow_mut() = true;
                }
            }

            game.render(f, size, &click_state);
        }
    });

    Ok(())
}
