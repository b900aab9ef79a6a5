use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

/// User actions from keyboard events
#[derive(Debug, PartialEq)]
pub enum Action {
    Quit,
    /// End the search, or quit when not searching
    Escape,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Home,
    End,
    /// Enter on the current row
    Activate,
    ToggleSelect,
    DeleteSelected,
    CopyUrl,
    Refresh,
    UpdateSearch(char),
    DeleteChar,
    None,
}

/// Poll for keyboard events and convert to actions
pub fn poll_event(timeout: Duration) -> anyhow::Result<Action> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
    {
        return Ok(key_to_action(key));
    }
    Ok(Action::None)
}

fn key_to_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Esc, _) => Action::Escape,

        (KeyCode::Char('p'), KeyModifiers::CONTROL) | (KeyCode::Up, _) => Action::MoveUp,
        (KeyCode::Char('n'), KeyModifiers::CONTROL) | (KeyCode::Down, _) => Action::MoveDown,
        (KeyCode::PageUp, _) => Action::PageUp,
        (KeyCode::PageDown, _) => Action::PageDown,
        (KeyCode::Home, _) => Action::Home,
        (KeyCode::End, _) => Action::End,

        (KeyCode::Enter, _) => Action::Activate,
        (KeyCode::Tab, _) => Action::ToggleSelect,
        (KeyCode::Char('d'), KeyModifiers::CONTROL) | (KeyCode::Delete, _) => {
            Action::DeleteSelected
        }
        (KeyCode::Char('y'), KeyModifiers::CONTROL) => Action::CopyUrl,
        (KeyCode::Char('r'), KeyModifiers::CONTROL) => Action::Refresh,

        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Action::UpdateSearch(c)
        }
        (KeyCode::Backspace, _) => Action::DeleteChar,

        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Action {
        key_to_action(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_quit_and_escape() {
        assert_eq!(key(KeyCode::Char('c'), KeyModifiers::CONTROL), Action::Quit);
        assert_eq!(key(KeyCode::Esc, KeyModifiers::NONE), Action::Escape);
    }

    #[test]
    fn test_navigation() {
        assert_eq!(key(KeyCode::Char('p'), KeyModifiers::CONTROL), Action::MoveUp);
        assert_eq!(key(KeyCode::Char('n'), KeyModifiers::CONTROL), Action::MoveDown);
        assert_eq!(key(KeyCode::Up, KeyModifiers::NONE), Action::MoveUp);
        assert_eq!(key(KeyCode::Down, KeyModifiers::NONE), Action::MoveDown);
        assert_eq!(key(KeyCode::PageDown, KeyModifiers::NONE), Action::PageDown);
        assert_eq!(key(KeyCode::End, KeyModifiers::NONE), Action::End);
    }

    #[test]
    fn test_list_actions() {
        assert_eq!(key(KeyCode::Enter, KeyModifiers::NONE), Action::Activate);
        assert_eq!(key(KeyCode::Tab, KeyModifiers::NONE), Action::ToggleSelect);
        assert_eq!(key(KeyCode::Char('d'), KeyModifiers::CONTROL), Action::DeleteSelected);
        assert_eq!(key(KeyCode::Delete, KeyModifiers::NONE), Action::DeleteSelected);
        assert_eq!(key(KeyCode::Char('y'), KeyModifiers::CONTROL), Action::CopyUrl);
        assert_eq!(key(KeyCode::Char('r'), KeyModifiers::CONTROL), Action::Refresh);
    }

    #[test]
    fn test_search_input() {
        assert_eq!(key(KeyCode::Char('a'), KeyModifiers::NONE), Action::UpdateSearch('a'));
        assert_eq!(key(KeyCode::Char('A'), KeyModifiers::SHIFT), Action::UpdateSearch('A'));
        assert_eq!(key(KeyCode::Backspace, KeyModifiers::NONE), Action::DeleteChar);
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(key(KeyCode::F(1), KeyModifiers::NONE), Action::None);
    }
}
