use crossterm::event::{KeyCode, KeyEvent as TerminalKeyEvent, KeyEventKind, KeyModifiers};

use super::{KeyEvent, Modifiers};

impl KeyEvent {
    /// Convert a terminal key event into the engine's vocabulary.
    ///
    /// Release events and keys without a browser equivalent yield `None`.
    /// `BackTab` is reported as `Shift+Tab`.
    pub fn from_terminal(event: &TerminalKeyEvent) -> Option<Self> {
        if event.kind == KeyEventKind::Release {
            return None;
        }

        let mut modifiers = Modifiers {
            ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
            shift: event.modifiers.contains(KeyModifiers::SHIFT),
            alt: event.modifiers.contains(KeyModifiers::ALT),
            meta: event
                .modifiers
                .intersects(KeyModifiers::SUPER | KeyModifiers::META),
        };

        let key = match event.code {
            KeyCode::Char(ch) => ch.to_string(),
            KeyCode::Up => "ArrowUp".to_string(),
            KeyCode::Down => "ArrowDown".to_string(),
            KeyCode::Left => "ArrowLeft".to_string(),
            KeyCode::Right => "ArrowRight".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Esc => "Escape".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => {
                modifiers.shift = true;
                "Tab".to_string()
            }
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            KeyCode::Insert => "Insert".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::F(n) => format!("F{n}"),
            _ => return None,
        };

        Some(Self::new(key, modifiers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_map_to_browser_names() {
        let event = TerminalKeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(
            KeyEvent::from_terminal(&event),
            Some(KeyEvent::plain("ArrowUp"))
        );
    }

    #[test]
    fn modifiers_carry_over() {
        let event = TerminalKeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert_eq!(
            KeyEvent::from_terminal(&event),
            Some(KeyEvent::new("a", Modifiers::CTRL))
        );

        let back_tab = TerminalKeyEvent::new(KeyCode::BackTab, KeyModifiers::NONE);
        assert_eq!(
            KeyEvent::from_terminal(&back_tab),
            Some(KeyEvent::new("Tab", Modifiers::SHIFT))
        );
    }

    #[test]
    fn release_and_unsupported_keys_are_dropped() {
        let release = TerminalKeyEvent::new_with_kind(
            KeyCode::Enter,
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );
        assert!(KeyEvent::from_terminal(&release).is_none());

        let caps = TerminalKeyEvent::new(KeyCode::CapsLock, KeyModifiers::NONE);
        assert!(KeyEvent::from_terminal(&caps).is_none());
    }
}
