use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Command, Direction};

/// Translates terminal key presses into session commands
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> Option<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        let command: Command = match key.code {
            KeyCode::Up => Direction::Up.into(),
            KeyCode::Down => Direction::Down.into(),
            KeyCode::Left => Direction::Left.into(),
            KeyCode::Right => Direction::Right.into(),

            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'w' => Direction::Up.into(),
                's' => Direction::Down.into(),
                'a' => Direction::Left.into(),
                'd' => Direction::Right.into(),
                'p' | ' ' => Command::TogglePause,
                'r' => Command::Reset,
                'q' => Command::Quit,
                _ => return None,
            },

            KeyCode::Enter => Command::Start,
            KeyCode::Esc => Command::Quit,

            _ => return None,
        };

        Some(command)
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Up)),
            Some(Command::SetDirection(Direction::Up))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Down)),
            Some(Command::SetDirection(Direction::Down))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Left)),
            Some(Command::SetDirection(Direction::Left))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Right)),
            Some(Command::SetDirection(Direction::Right))
        );
    }

    #[test]
    fn test_wasd_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('w'))),
            Some(Command::SetDirection(Direction::Up))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('a'))),
            Some(Command::SetDirection(Direction::Left))
        );

        let s_upper = KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT);
        assert_eq!(
            handler.handle_key_event(s_upper),
            Some(Command::SetDirection(Direction::Down))
        );
    }

    #[test]
    fn test_lifecycle_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char(' '))),
            Some(Command::TogglePause)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('p'))),
            Some(Command::TogglePause)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('R'))),
            Some(Command::Reset)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Enter)),
            Some(Command::Start)
        );
    }

    #[test]
    fn test_quit_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('q'))),
            Some(Command::Quit)
        );
        assert_eq!(handler.handle_key_event(press(KeyCode::Esc)), Some(Command::Quit));

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), Some(Command::Quit));
    }

    #[test]
    fn test_unknown_key() {
        let handler = InputHandler::new();
        assert_eq!(handler.handle_key_event(press(KeyCode::Char('x'))), None);
        assert_eq!(handler.handle_key_event(press(KeyCode::Tab)), None);
    }
}
