//! Battle rendering: enemy and party status, stock, sphere grid, action
//! menu, dialog box and battle log.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction as LayoutDir, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};

use super::actions::*;
use super::combat::{BattleAction, Character, CHARACTERS};
use super::dialog::TintColor;
use super::grid::{GridPos, SphereType, GRID_H, GRID_W, SPHERE_TYPES};
use super::machine::{Battle, Phase};
use super::presenter::TerminalPresenter;

/// Terminal columns per sphere.
const CELL_W: u16 = 3;

pub fn render(
    battle: &Battle,
    phase: &Phase,
    presenter: &TerminalPresenter,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let grid_w = GRID_W as u16 * CELL_W + 2;
    let grid_h = GRID_H as u16 + 2;

    let rows = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([
            Constraint::Length(3), // Enemy
            Constraint::Length(5), // Party
            Constraint::Length(grid_h + 3), // Grid + play button
            Constraint::Length(4), // Dialog
            Constraint::Min(3), // Log
        ])
        .split(area);

    render_enemy(battle, f, rows[0]);
    render_party(battle, phase, f, rows[1], click_state);

    let (grid_area, side_area) = if is_narrow_layout(area.width) {
        (rows[2], None)
    } else {
        let cols = Layout::default()
            .direction(LayoutDir::Horizontal)
            .constraints([Constraint::Length(grid_w), Constraint::Min(14)])
            .split(rows[2]);
        (cols[0], Some(cols[1]))
    };
    render_grid(battle, phase, presenter, f, grid_area, click_state);
    if let Some(side) = side_area {
        render_stock(battle, f, side);
    }

    render_dialog(presenter, f, rows[3]);
    render_log(presenter, f, rows[4]);
}

// ── Helpers ─────────────────────────────────────────────────

fn hp_bar(current: u32, max: u32, width: usize) -> (String, Color) {
    let ratio = if max > 0 { current as f64 / max as f64 } else { 0.0 };
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    let bar = "\u{2588}".repeat(filled) + &"\u{2591}".repeat(empty);
    let color = if ratio > 0.5 { Color::Green } else if ratio > 0.25 { Color::Yellow } else { Color::Red };
    (bar, color)
}

fn sphere_color(sphere: SphereType) -> Color {
    match sphere {
        SphereType::Red => Color::Red,
        SphereType::Cyan => Color::Cyan,
        SphereType::Green => Color::Green,
        SphereType::Yellow => Color::Yellow,
        SphereType::Key => Color::Magenta,
    }
}

fn sphere_glyph(sphere: SphereType) -> &'static str {
    match sphere {
        SphereType::Key => "\u{2666}",
        _ => "\u{25cf}",
    }
}

fn character_color(character: Character) -> Color {
    sphere_color(character.sphere_type())
}

fn tint_color(tint: TintColor) -> Color {
    match tint {
        TintColor::Red => Color::Red,
        TintColor::Green => Color::Green,
        TintColor::Blue => Color::Cyan,
    }
}

// ── Status ──────────────────────────────────────────────────

fn render_enemy(battle: &Battle, f: &mut Frame, area: Rect) {
    let enemy = battle.state.enemy;
    let (bar, color) = hp_bar(enemy.hp, enemy.max_hp, 20);
    let line = Line::from(vec![
        Span::styled(" Skelly ", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Span::styled(bar, Style::default().fg(color)),
        Span::raw(format!(" {}/{}", enemy.hp, enemy.max_hp)),
    ]);
    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(format!(" Round {} ", battle.round + 1)),
    );
    f.render_widget(widget, area);
}

fn render_party(
    battle: &Battle,
    phase: &Phase,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let chooser = match phase {
        Phase::ActionChoice { index } => battle.chooser(*index),
        _ => None,
    };

    let mut lines = Vec::new();
    let mut menu_row = None;
    for (i, character) in CHARACTERS.iter().enumerate() {
        let status = battle.state.member(*character);
        let (bar, color) = hp_bar(status.hp, status.max_hp, 10);
        let name_style = if status.hp == 0 {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(character_color(*character)).add_modifier(Modifier::BOLD)
        };
        let mut spans = vec![
            Span::styled(format!(" {:<7}", character.name()), name_style),
            Span::styled(bar, Style::default().fg(color)),
            Span::raw(format!(" {:>3}/{:<3} ", status.hp, status.max_hp)),
        ];

        if chooser == Some(*character) {
            menu_row = Some(area.y + 1 + i as u16);
            for action in [BattleAction::Defend, BattleAction::Attack] {
                let label = match action {
                    BattleAction::Defend => "[Defend]",
                    BattleAction::Attack => "[Attack]",
                };
                let style = if battle.menu_cursor == action {
                    Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Yellow)
                };
                spans.push(Span::styled(label, style));
                spans.push(Span::raw(" "));
            }
        } else if let Some(action) = battle.turn_inputs.get(*character) {
            let label = match action {
                BattleAction::Defend => " Defend",
                BattleAction::Attack => " Attack",
            };
            spans.push(Span::styled(label, Style::default().fg(Color::DarkGray)));
        }
        lines.push(Line::from(spans));
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .title(" Party "),
    );
    f.render_widget(widget, area);

    // Menu labels start after " name(7) " + bar(10) + " hhh/mmm " = 1+7+10+9.
    if let Some(row) = menu_row {
        let x = area.x + 1 + 27;
        let mut cs = click_state.borrow_mut();
        cs.add_click_target(Rect::new(x, row, 8, 1), ACTION_DEFEND);
        cs.add_click_target(Rect::new(x + 9, row, 8, 1), ACTION_ATTACK);
    }
}

fn render_stock(battle: &Battle, f: &mut Frame, area: Rect) {
    let lines: Vec<Line> = SPHERE_TYPES
        .iter()
        .map(|s| {
            Line::from(vec![
                Span::styled(format!(" {} ", sphere_glyph(*s)), Style::default().fg(sphere_color(*s))),
                Span::styled(format!("{:<7}", s.name()), Style::default().fg(Color::Gray)),
                Span::styled(
                    format!("{:>2}", battle.state.stock.get(*s)),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
            ])
        })
        .collect();
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Stock "),
    );
    f.render_widget(widget, area);
}

// ── Grid ────────────────────────────────────────────────────

fn render_grid(
    battle: &Battle,
    phase: &Phase,
    presenter: &TerminalPresenter,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let interactive = matches!(phase, Phase::MovePhase { .. } | Phase::SwapChoice { .. });

    let mut lines: Vec<Line> = Vec::new();
    for y in 0..GRID_H {
        let mut spans: Vec<Span> = Vec::new();
        for x in 0..GRID_W {
            let pos = GridPos::new(x, y);
            let sphere = battle.grid.sphere(pos);
            let glyph = match sphere {
                Some(_) if presenter.flashing.contains(&pos) => "*",
                Some(s) => sphere_glyph(s),
                None => " ",
            };
            let mut style = sphere.map_or(Style::default(), |s| Style::default().fg(sphere_color(s)));
            if !interactive {
                style = style.add_modifier(Modifier::DIM);
            }
            let (left, right) = if battle.selected == Some(pos) {
                style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
                ("<", ">")
            } else if interactive && battle.cursor == pos {
                style = style.add_modifier(Modifier::BOLD);
                ("[", "]")
            } else {
                (" ", " ")
            };
            spans.push(Span::styled(format!("{left}{glyph}{right}"), style));
        }
        lines.push(Line::from(spans));
    }

    let chunks = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([Constraint::Length(GRID_H as u16 + 2), Constraint::Length(3)])
        .split(area);

    let grid = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if interactive { Color::Yellow } else { Color::DarkGray })),
    );
    f.render_widget(grid, chunks[0]);

    let play_style = if interactive {
        Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let play = Paragraph::new(Line::from(Span::styled(" \u{25b6} Play [Enter] ", play_style)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
    f.render_widget(play, chunks[1]);

    let mut cs = click_state.borrow_mut();
    if interactive {
        cs.add_click_target(chunks[1], PLAY);
    }
    let inner_x = chunks[0].x + 1;
    let inner_y = chunks[0].y + 1;
    for y in 0..GRID_H {
        for x in 0..GRID_W {
            let rect = Rect::new(inner_x + x as u16 * CELL_W, inner_y + y as u16, CELL_W, 1);
            cs.add_click_target(rect, cell_id(GridPos::new(x, y)));
        }
    }
}

// ── Dialog + log ────────────────────────────────────────────

fn render_dialog(presenter: &TerminalPresenter, f: &mut Frame, area: Rect) {
    let text = presenter.dialog.visible_text();
    let mut lines: Vec<Line> = Vec::new();
    let mut spans: Vec<Span> = Vec::new();
    for (i, ch) in text.chars().enumerate() {
        if ch == '\n' {
            lines.push(Line::from(std::mem::take(&mut spans)));
            continue;
        }
        let style = match presenter.dialog.tint_at(i) {
            Some(tint) => Style::default().fg(tint_color(tint)).add_modifier(Modifier::BOLD),
            None => Style::default().fg(Color::LightYellow),
        };
        spans.push(Span::styled(ch.to_string(), style));
    }
    lines.push(Line::from(spans));

    let alignment = if presenter.end_text.is_some() { Alignment::Center } else { Alignment::Left };
    let widget = Paragraph::new(lines)
        .alignment(alignment)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_log(presenter: &TerminalPresenter, f: &mut Frame, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let start = presenter.log.len().saturating_sub(visible);
    let lines: Vec<Line> = presenter.log[start..]
        .iter()
        .map(|entry| Line::from(Span::styled(entry.as_str(), Style::default().fg(Color::Gray))))
        .collect();
    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Log "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}
