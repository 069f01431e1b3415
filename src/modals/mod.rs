//! Modal dialog state and input handling.
//!
//! Every modal implements [`Modal`]: the host feeds it [`ModalEvent`]s one at a
//! time through [`Modal::update`] and draws whatever [`Modal::render`] returns.
//! A modal never performs the action it collects; it hands the host a
//! [`Request`] inside [`ModalCommand::Submit`] once its form is valid.

pub mod confirm;
pub mod issue_picker;
pub mod new_session;
pub mod session_actions;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

use crate::nav::Direction;

pub use confirm::ConfirmModal;
pub use issue_picker::IssuePickerModal;
pub use new_session::{NewSessionModal, NewSessionOptions};
pub use session_actions::{MergeMethod, SessionAction, SessionActionsModal};

/// Non-text keys a modal can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Tab,
    BackTab,
    Space,
    Enter,
    Esc,
    Backspace,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
}

/// A single input event delivered to the active modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalEvent {
    Key(Key),
    Char(char),
}

impl ModalEvent {
    /// Translate a terminal key event. Releases and Ctrl/Alt chords yield `None`.
    pub fn from_key_event(key: KeyEvent) -> Option<Self> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return None;
        }

        let event = match key.code {
            KeyCode::Up => Self::Key(Key::Up),
            KeyCode::Down => Self::Key(Key::Down),
            KeyCode::Left => Self::Key(Key::Left),
            KeyCode::Right => Self::Key(Key::Right),
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Self::Key(Key::BackTab),
            KeyCode::Tab => Self::Key(Key::Tab),
            KeyCode::BackTab => Self::Key(Key::BackTab),
            KeyCode::Enter => Self::Key(Key::Enter),
            KeyCode::Esc => Self::Key(Key::Esc),
            KeyCode::Backspace => Self::Key(Key::Backspace),
            KeyCode::Delete => Self::Key(Key::Delete),
            KeyCode::Home => Self::Key(Key::Home),
            KeyCode::End => Self::Key(Key::End),
            KeyCode::PageUp => Self::Key(Key::PageUp),
            KeyCode::PageDown => Self::Key(Key::PageDown),
            KeyCode::Char(' ') => Self::Key(Key::Space),
            KeyCode::Char(c) => Self::Char(c),
            _ => return None,
        };
        Some(event)
    }
}

/// Fields collected by the new-session modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSessionRequest {
    pub repo: String,
    pub base: String,
    /// `None` when the agent runs autonomously and names its own branch.
    pub branch: Option<String>,
    pub autonomous: bool,
    pub container: bool,
}

/// Business action a modal asks the host to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    CreateSession(NewSessionRequest),
    Attach { session: String },
    SendPrompt { session: String, prompt: String },
    CreatePullRequest { session: String, merge: MergeMethod },
    /// Ask the user before deleting; the host answers by opening a confirmation.
    ConfirmDelete { session: String },
    DeleteSession { session: String },
    LinkIssues { session: String, issues: Vec<u64> },
}

/// Follow-up returned from [`Modal::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalCommand {
    /// Close without doing anything.
    Close,
    /// Close and perform the request.
    Submit(Request),
}

/// Contract shared by every modal.
pub trait Modal {
    fn title(&self) -> String;

    /// One-line legend of the keys that currently do something.
    fn help(&self) -> String;

    /// Body text. Reads state only.
    fn render(&self) -> Text<'static>;

    /// Apply one event. Unrecognized events are ignored.
    fn update(&mut self, event: ModalEvent) -> Option<ModalCommand>;
}

/// The modal currently on screen, owned by the host.
#[derive(Debug)]
pub enum ActiveModal {
    NewSession(NewSessionModal),
    SessionActions(SessionActionsModal),
    IssuePicker(IssuePickerModal),
    Confirm(ConfirmModal),
}

impl ActiveModal {
    pub fn as_modal(&self) -> &dyn Modal {
        match self {
            Self::NewSession(m) => m,
            Self::SessionActions(m) => m,
            Self::IssuePicker(m) => m,
            Self::Confirm(m) => m,
        }
    }

    pub fn as_modal_mut(&mut self) -> &mut dyn Modal {
        match self {
            Self::NewSession(m) => m,
            Self::SessionActions(m) => m,
            Self::IssuePicker(m) => m,
            Self::Confirm(m) => m,
        }
    }

    /// Short name for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NewSession(_) => "new_session",
            Self::SessionActions(_) => "session_actions",
            Self::IssuePicker(_) => "issue_picker",
            Self::Confirm(_) => "confirm",
        }
    }
}

/// Map vertical keys (and their vi letters) to a direction.
pub(crate) fn vertical(event: ModalEvent) -> Option<Direction> {
    match event {
        ModalEvent::Key(Key::Up) | ModalEvent::Char('k') => Some(Direction::Backward),
        ModalEvent::Key(Key::Down) | ModalEvent::Char('j') => Some(Direction::Forward),
        _ => None,
    }
}

pub(crate) fn label_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub(crate) fn error_style() -> Style {
    Style::default().fg(Color::Yellow)
}

/// `[x] label` row. Disabled rows are dimmed but still show their value.
pub(crate) fn checkbox_line(
    label: &str,
    checked: bool,
    focused: bool,
    enabled: bool,
) -> Line<'static> {
    let mark = if checked { "[x]" } else { "[ ]" };
    let style = if !enabled {
        Style::default().fg(Color::DarkGray)
    } else if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{mark} {label}"), style),
    ])
}

/// A list row with a selection marker. The marker is only drawn while the
/// list itself has focus.
pub(crate) fn list_row(text: String, selected: bool, list_focused: bool) -> Line<'static> {
    let (marker, style) = match (selected, list_focused) {
        (true, true) => (
            "> ",
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        (true, false) => ("> ", Style::default().fg(Color::Cyan)),
        (false, _) => ("  ", Style::default().fg(Color::White)),
    };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{marker}{text}"), style),
    ])
}

pub(crate) fn legend(parts: &[&str]) -> String {
    parts.join(" · ")
}

#[cfg(test)]
pub(crate) fn text_to_string(text: &Text<'_>) -> String {
    text.lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|s| s.content.as_ref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_from_key_event_navigation_keys() {
        assert_eq!(
            ModalEvent::from_key_event(key(KeyCode::Down, KeyModifiers::NONE)),
            Some(ModalEvent::Key(Key::Down))
        );
        assert_eq!(
            ModalEvent::from_key_event(key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(ModalEvent::Key(Key::Esc))
        );
    }

    #[test]
    fn test_shift_tab_becomes_backtab() {
        assert_eq!(
            ModalEvent::from_key_event(key(KeyCode::Tab, KeyModifiers::SHIFT)),
            Some(ModalEvent::Key(Key::BackTab))
        );
        assert_eq!(
            ModalEvent::from_key_event(key(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(ModalEvent::Key(Key::BackTab))
        );
    }

    #[test]
    fn test_space_is_a_key_and_letters_are_text() {
        assert_eq!(
            ModalEvent::from_key_event(key(KeyCode::Char(' '), KeyModifiers::NONE)),
            Some(ModalEvent::Key(Key::Space))
        );
        assert_eq!(
            ModalEvent::from_key_event(key(KeyCode::Char('H'), KeyModifiers::SHIFT)),
            Some(ModalEvent::Char('H'))
        );
    }

    #[test]
    fn test_chords_and_releases_are_dropped() {
        assert_eq!(
            ModalEvent::from_key_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            None
        );
        let mut release = key(KeyCode::Enter, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(ModalEvent::from_key_event(release), None);
        assert_eq!(
            ModalEvent::from_key_event(key(KeyCode::F(1), KeyModifiers::NONE)),
            None
        );
    }

    #[test]
    fn test_vertical_maps_arrows_and_vi_keys() {
        assert_eq!(vertical(ModalEvent::Char('j')), Some(Direction::Forward));
        assert_eq!(
            vertical(ModalEvent::Key(Key::Up)),
            Some(Direction::Backward)
        );
        assert_eq!(vertical(ModalEvent::Char('x')), None);
    }

    #[test]
    fn test_legend_joins_parts() {
        assert_eq!(legend(&["tab next", "esc cancel"]), "tab next · esc cancel");
    }
}
