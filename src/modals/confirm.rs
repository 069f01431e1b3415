//! Yes/no confirmation for destructive actions.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

use super::{Key, Modal, ModalCommand, ModalEvent, Request, legend};
use crate::nav::{Cycle, Direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmButton {
    Confirm,
    Cancel,
}

impl Cycle for ConfirmButton {
    const ALL: &'static [Self] = &[Self::Confirm, Self::Cancel];
}

/// Asks the user to confirm `on_confirm` before the host performs it.
#[derive(Debug, Clone)]
pub struct ConfirmModal {
    title: String,
    message: String,
    focus: ConfirmButton,
    on_confirm: Request,
}

impl ConfirmModal {
    pub fn new(title: impl Into<String>, message: impl Into<String>, on_confirm: Request) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            focus: ConfirmButton::Confirm,
            on_confirm,
        }
    }

    pub fn focused(&self) -> ConfirmButton {
        self.focus
    }

    fn confirm(&self) -> Option<ModalCommand> {
        Some(ModalCommand::Submit(self.on_confirm.clone()))
    }

    fn button(label: &str, focused: bool) -> Span<'static> {
        let style = if focused {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        Span::styled(format!("[ {label} ]"), style)
    }
}

impl Modal for ConfirmModal {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn help(&self) -> String {
        legend(&["y confirm", "n/esc cancel", "tab switch", "enter select"])
    }

    fn render(&self) -> Text<'static> {
        let mut lines = Vec::new();
        for line in self.message.lines() {
            lines.push(Line::from(format!("  {line}")));
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::raw("  "),
            Self::button("Confirm", self.focus == ConfirmButton::Confirm),
            Span::raw("  "),
            Self::button("Cancel", self.focus == ConfirmButton::Cancel),
        ]));
        Text::from(lines)
    }

    fn update(&mut self, event: ModalEvent) -> Option<ModalCommand> {
        match event {
            ModalEvent::Char('y') | ModalEvent::Char('Y') => self.confirm(),
            ModalEvent::Char('n') | ModalEvent::Char('N') | ModalEvent::Key(Key::Esc) => {
                Some(ModalCommand::Close)
            }
            ModalEvent::Key(Key::Enter) => match self.focus {
                ConfirmButton::Confirm => self.confirm(),
                ConfirmButton::Cancel => Some(ModalCommand::Close),
            },
            ModalEvent::Key(Key::Tab | Key::Right) | ModalEvent::Char('l') => {
                self.focus = self.focus.step_wrapping(Direction::Forward);
                None
            }
            ModalEvent::Key(Key::BackTab | Key::Left) | ModalEvent::Char('h') => {
                self.focus = self.focus.step_wrapping(Direction::Backward);
                None
            }
            _ => None,
        }
    }
}
