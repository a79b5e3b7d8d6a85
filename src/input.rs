use crate::sim::Direction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks for, independent of the current screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    /// Space or Enter: start, pause, resume, play again.
    Confirm,
    /// `q`: back to the title screen (or quit from it).
    Back,
    /// Esc or Ctrl-C: leave the program.
    Exit,
}

impl Command {
    pub fn from_key_event(key: KeyEvent) -> Option<Command> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Exit);
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                Some(Command::Turn(Direction::Up))
            }
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                Some(Command::Turn(Direction::Down))
            }
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                Some(Command::Turn(Direction::Left))
            }
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                Some(Command::Turn(Direction::Right))
            }
            KeyCode::Char(' ') | KeyCode::Enter => Some(Command::Confirm),
            KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Back),
            KeyCode::Esc => Some(Command::Exit),
            _ => None,
        }
    }
}
