//! Maps terminal events onto game commands

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};

use crate::game::Game;
use crate::render::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Jump,
    Restart,
    Quit,
    /// Terminal was resized to `cols` x `rows`
    Resize(u16, u16),
}

pub fn map_event(event: &Event, view: &Viewport, game: &Game) -> Option<Command> {
    match event {
        Event::Key(key) => map_key(key),
        Event::Mouse(mouse) => map_mouse(mouse, view, game),
        Event::Resize(cols, rows) => Some(Command::Resize(*cols, *rows)),
        _ => None,
    }
}

fn map_key(key: &KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Char(' ') | KeyCode::Up => Some(Command::Jump),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

/// A left click restarts when it lands on the restart button and jumps
/// everywhere else.
fn map_mouse(mouse: &MouseEvent, view: &Viewport, game: &Game) -> Option<Command> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return None;
    }
    let (x, y) = view.cell_to_world(mouse.column, mouse.row);
    if game.hits_restart_button(x, y) {
        Some(Command::Restart)
    } else {
        Some(Command::Jump)
    }
}
