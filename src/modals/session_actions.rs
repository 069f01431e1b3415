//! Actions on an existing session.
//!
//! The action selector is one value driven by two controls: `h`/`l` (and the
//! arrow keys) stop at the first and last action, tab/shift-tab wrap around.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use tracing::debug;

use super::{Key, Modal, ModalCommand, ModalEvent, Request, label_style, legend, vertical};
use crate::nav::{Cycle, Direction, FocusRing};
use crate::text_input::TextInput;
use crate::ui::truncate_str;

/// What to do with the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Attach,
    SendPrompt,
    CreatePr,
    Delete,
}

impl Cycle for SessionAction {
    const ALL: &'static [Self] = &[
        Self::Attach,
        Self::SendPrompt,
        Self::CreatePr,
        Self::Delete,
    ];
}

impl SessionAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Attach => "Attach",
            Self::SendPrompt => "Send prompt",
            Self::CreatePr => "Create PR",
            Self::Delete => "Delete",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::Attach => "Open the session's agent terminal.",
            Self::SendPrompt => "Send a follow-up prompt to the running agent.",
            Self::CreatePr => "Push the branch and open a pull request.",
            Self::Delete => "Remove the worktree and stop the agent.",
        }
    }
}

/// How the pull request will be merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMethod {
    Squash,
    Merge,
    Rebase,
}

impl Cycle for MergeMethod {
    const ALL: &'static [Self] = &[Self::Squash, Self::Merge, Self::Rebase];
}

impl MergeMethod {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Squash => "squash",
            Self::Merge => "merge",
            Self::Rebase => "rebase",
        }
    }
}

/// Which row is focused in the actions modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionField {
    Action,
    /// Only reachable while the action is [`SessionAction::CreatePr`].
    Merge,
}

const FIELDS: &[ActionField] = &[ActionField::Action, ActionField::Merge];

/// Whether `field` is live for the given action.
fn field_enabled(action: SessionAction, field: ActionField) -> bool {
    match field {
        ActionField::Action => true,
        ActionField::Merge => action == SessionAction::CreatePr,
    }
}

/// State for the session actions modal.
#[derive(Debug, Clone)]
pub struct SessionActionsModal {
    session: String,
    focus: FocusRing<ActionField>,
    action: SessionAction,
    merge: MergeMethod,
    prompt: TextInput,
    column_width: usize,
}

impl SessionActionsModal {
    pub fn new(session: impl Into<String>, column_width: usize) -> Self {
        Self {
            session: session.into(),
            focus: FocusRing::new(FIELDS, ActionField::Action),
            action: SessionAction::Attach,
            merge: MergeMethod::Squash,
            prompt: TextInput::new(),
            column_width,
        }
    }

    pub fn action(&self) -> SessionAction {
        self.action
    }

    pub fn merge(&self) -> MergeMethod {
        self.merge
    }

    pub fn focused(&self) -> ActionField {
        self.focus.current()
    }

    pub fn prompt(&self) -> &TextInput {
        &self.prompt
    }

    /// Switch action. Entering `SendPrompt` focuses the prompt input and
    /// leaving it blurs the input, in the same step.
    fn set_action(&mut self, next: SessionAction) {
        if next == self.action {
            return;
        }
        let leaving = self.action;
        self.action = next;
        if leaving == SessionAction::SendPrompt {
            self.prompt.blur();
        }
        if next == SessionAction::SendPrompt {
            self.prompt.focus();
        }
        debug!(from = ?leaving, to = ?next, "session_action_changed");
    }

    fn step_focus(&mut self, direction: Direction) {
        let action = self.action;
        match direction {
            Direction::Forward => self.focus.next(|f| field_enabled(action, f)),
            Direction::Backward => self.focus.prev(|f| field_enabled(action, f)),
        };
    }

    /// Letter/arrow stepping: clamps at both ends.
    fn step_focused_clamped(&mut self, direction: Direction) {
        match self.focus.current() {
            ActionField::Action => self.set_action(self.action.step_clamped(direction)),
            ActionField::Merge if field_enabled(self.action, ActionField::Merge) => {
                self.merge = self.merge.step_clamped(direction);
            }
            ActionField::Merge => {}
        }
    }

    fn blocking_reason(&self) -> Option<&'static str> {
        if self.action == SessionAction::SendPrompt && self.prompt.is_blank() {
            Some("prompt required")
        } else {
            None
        }
    }

    fn submit(&self) -> Option<ModalCommand> {
        if let Some(reason) = self.blocking_reason() {
            debug!(reason, "session_action_submit_blocked");
            return None;
        }
        let session = self.session.clone();
        let request = match self.action {
            SessionAction::Attach => Request::Attach { session },
            SessionAction::SendPrompt => Request::SendPrompt {
                session,
                prompt: self.prompt.value().trim().to_string(),
            },
            SessionAction::CreatePr => Request::CreatePullRequest {
                session,
                merge: self.merge,
            },
            SessionAction::Delete => Request::ConfirmDelete { session },
        };
        Some(ModalCommand::Submit(request))
    }

    fn edit_prompt(&mut self, event: ModalEvent) {
        match event {
            ModalEvent::Char(c) => {
                self.prompt.insert_char(c);
            }
            ModalEvent::Key(Key::Space) => {
                self.prompt.insert_char(' ');
            }
            ModalEvent::Key(Key::Backspace) => {
                self.prompt.delete_char_before();
            }
            ModalEvent::Key(Key::Delete) => {
                self.prompt.delete_char_at();
            }
            ModalEvent::Key(Key::Left) => self.prompt.cursor_left(),
            ModalEvent::Key(Key::Right) => self.prompt.cursor_right(),
            ModalEvent::Key(Key::Home) => self.prompt.cursor_home(),
            ModalEvent::Key(Key::End) => self.prompt.cursor_end(),
            // letters were handled above, so only the arrow keys get here
            _ => {
                if let Some(direction) = vertical(event) {
                    self.step_focus(direction);
                }
            }
        }
    }

    fn enter_label(&self) -> String {
        match self.blocking_reason() {
            Some(reason) => format!("enter: {reason}"),
            None => match self.action {
                SessionAction::Attach => "enter attach".to_string(),
                SessionAction::SendPrompt => "enter send".to_string(),
                SessionAction::CreatePr => "enter create PR".to_string(),
                SessionAction::Delete => "enter delete…".to_string(),
            },
        }
    }
}

impl Modal for SessionActionsModal {
    fn title(&self) -> String {
        format!("Session: {}", truncate_str(&self.session, 40))
    }

    fn help(&self) -> String {
        let enter = self.enter_label();
        if self.prompt.is_focused() {
            return legend(&["type prompt", "tab/shift-tab action", &enter, "esc cancel"]);
        }
        let step_keys = match self.focus.current() {
            ActionField::Merge if field_enabled(self.action, ActionField::Merge) => {
                "h/l merge method"
            }
            _ => "h/l action",
        };
        if field_enabled(self.action, ActionField::Merge) {
            legend(&[step_keys, "tab cycle", "↑/↓ field", &enter, "esc cancel"])
        } else {
            legend(&[step_keys, "tab cycle", &enter, "esc cancel"])
        }
    }

    fn render(&self) -> Text<'static> {
        let mut lines: Vec<Line<'static>> = Vec::new();
        let action_focused = self.focus.is_focused(ActionField::Action);

        let mut action_spans = vec![Span::styled("  Action:  ", label_style(action_focused))];
        for (i, action) in SessionAction::ALL.iter().enumerate() {
            if i > 0 {
                action_spans.push(Span::raw("  "));
            }
            let style = if *action == self.action && action_focused {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else if *action == self.action {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            action_spans.push(Span::styled(format!(" {} ", action.label()), style));
        }
        lines.push(Line::from(action_spans));
        lines.push(Line::from(Span::styled(
            format!("           {}", self.action.description()),
            label_style(false),
        )));
        lines.push(Line::raw(""));

        match self.action {
            SessionAction::CreatePr => {
                let merge_focused = self.focus.is_focused(ActionField::Merge);
                let value = if merge_focused {
                    format!("< {} >", self.merge.label())
                } else {
                    self.merge.label().to_string()
                };
                let value_style = if merge_focused {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::White)
                };
                lines.push(Line::from(vec![
                    Span::styled("  Merge:   ", label_style(merge_focused)),
                    Span::styled(value, value_style),
                ]));
            }
            SessionAction::SendPrompt => {
                let width = self.column_width.saturating_sub(13);
                let mut spans = vec![Span::styled(
                    "  Prompt:  ",
                    label_style(self.prompt.is_focused()),
                )];
                spans.extend(self.prompt.spans(width, "(type a prompt)"));
                lines.push(Line::from(spans));
            }
            SessionAction::Attach | SessionAction::Delete => {}
        }

        Text::from(lines)
    }

    fn update(&mut self, event: ModalEvent) -> Option<ModalCommand> {
        match event {
            ModalEvent::Key(Key::Esc) => return Some(ModalCommand::Close),
            ModalEvent::Key(Key::Enter) => return self.submit(),
            ModalEvent::Key(Key::Tab) => {
                self.set_action(self.action.step_wrapping(Direction::Forward));
            }
            ModalEvent::Key(Key::BackTab) => {
                self.set_action(self.action.step_wrapping(Direction::Backward));
            }
            _ if self.prompt.is_focused() => self.edit_prompt(event),
            ModalEvent::Char('h') | ModalEvent::Key(Key::Left) => {
                self.step_focused_clamped(Direction::Backward);
            }
            ModalEvent::Char('l') | ModalEvent::Key(Key::Right) => {
                self.step_focused_clamped(Direction::Forward);
            }
            _ => {
                if let Some(direction) = vertical(event) {
                    self.step_focus(direction);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modals::text_to_string;

    fn modal() -> SessionActionsModal {
        SessionActionsModal::new("arbor:fix-scroll", 60)
    }

    fn send(modal: &mut SessionActionsModal, events: &[ModalEvent]) {
        for event in events {
            modal.update(*event);
        }
    }

    const L: ModalEvent = ModalEvent::Char('l');
    const H: ModalEvent = ModalEvent::Char('h');
    const TAB: ModalEvent = ModalEvent::Key(Key::Tab);
    const BACKTAB: ModalEvent = ModalEvent::Key(Key::BackTab);

    #[test]
    fn test_l_clamps_at_last_action_and_tab_wraps() {
        let mut modal = modal();
        send(&mut modal, &[L, L, L]);
        assert_eq!(modal.action(), SessionAction::Delete);
        send(&mut modal, &[L]);
        assert_eq!(modal.action(), SessionAction::Delete);
        send(&mut modal, &[TAB]);
        assert_eq!(modal.action(), SessionAction::Attach);
    }

    #[test]
    fn test_h_clamps_at_first_and_backtab_wraps() {
        let mut modal = modal();
        send(&mut modal, &[H, H]);
        assert_eq!(modal.action(), SessionAction::Attach);
        send(&mut modal, &[BACKTAB]);
        assert_eq!(modal.action(), SessionAction::Delete);
    }

    #[test]
    fn test_tab_cycle_returns_home() {
        let mut modal = modal();
        for _ in 0..SessionAction::ALL.len() {
            send(&mut modal, &[TAB]);
        }
        assert_eq!(modal.action(), SessionAction::Attach);
    }

    #[test]
    fn test_entering_send_prompt_focuses_input() {
        let mut modal = modal();
        send(&mut modal, &[L]);
        assert_eq!(modal.action(), SessionAction::SendPrompt);
        assert!(modal.prompt().is_focused());

        // h and l are text now, not navigation
        send(&mut modal, &[H, ModalEvent::Char('i'), L, L]);
        assert_eq!(modal.prompt().value(), "hill");
        assert_eq!(modal.action(), SessionAction::SendPrompt);

        send(&mut modal, &[TAB]);
        assert_eq!(modal.action(), SessionAction::CreatePr);
        assert!(!modal.prompt().is_focused());
        assert_eq!(modal.prompt().value(), "hill");
    }

    #[test]
    fn test_backtab_out_of_send_prompt_blurs() {
        let mut modal = modal();
        send(&mut modal, &[TAB]);
        assert!(modal.prompt().is_focused());
        send(&mut modal, &[BACKTAB]);
        assert_eq!(modal.action(), SessionAction::Attach);
        assert!(!modal.prompt().is_focused());
    }

    #[test]
    fn test_send_prompt_requires_text() {
        let mut modal = modal();
        send(&mut modal, &[TAB, ModalEvent::Key(Key::Space)]);
        assert_eq!(modal.update(ModalEvent::Key(Key::Enter)), None);
        assert!(modal.help().contains("prompt required"));

        send(
            &mut modal,
            &[
                ModalEvent::Char('g'),
                ModalEvent::Char('o'),
                ModalEvent::Key(Key::Space),
            ],
        );
        assert_eq!(
            modal.update(ModalEvent::Key(Key::Enter)),
            Some(ModalCommand::Submit(Request::SendPrompt {
                session: "arbor:fix-scroll".to_string(),
                prompt: "go".to_string(),
            }))
        );
    }

    #[test]
    fn test_merge_field_only_reachable_for_create_pr() {
        let mut modal = modal();
        send(&mut modal, &[ModalEvent::Key(Key::Down)]);
        assert_eq!(modal.focused(), ActionField::Action);

        send(&mut modal, &[TAB, TAB]);
        assert_eq!(modal.action(), SessionAction::CreatePr);
        send(&mut modal, &[ModalEvent::Key(Key::Down)]);
        assert_eq!(modal.focused(), ActionField::Merge);

        send(&mut modal, &[L, L, L]);
        assert_eq!(modal.merge(), MergeMethod::Rebase);
        send(&mut modal, &[H]);
        assert_eq!(modal.merge(), MergeMethod::Merge);
        assert_eq!(modal.action(), SessionAction::CreatePr);

        assert_eq!(
            modal.update(ModalEvent::Key(Key::Enter)),
            Some(ModalCommand::Submit(Request::CreatePullRequest {
                session: "arbor:fix-scroll".to_string(),
                merge: MergeMethod::Merge,
            }))
        );
    }

    #[test]
    fn test_leaving_create_pr_does_not_move_focus_until_next_step() {
        let mut modal = modal();
        send(&mut modal, &[TAB, TAB, ModalEvent::Key(Key::Down)]);
        assert_eq!(modal.focused(), ActionField::Merge);

        send(&mut modal, &[TAB]);
        assert_eq!(modal.action(), SessionAction::Delete);
        assert_eq!(modal.focused(), ActionField::Merge);

        // merge is hidden, so h/l do nothing until focus moves
        send(&mut modal, &[L]);
        assert_eq!(modal.action(), SessionAction::Delete);
        assert_eq!(modal.merge(), MergeMethod::Squash);

        send(&mut modal, &[ModalEvent::Key(Key::Up)]);
        assert_eq!(modal.focused(), ActionField::Action);
    }

    #[test]
    fn test_delete_asks_for_confirmation() {
        let mut modal = modal();
        send(&mut modal, &[BACKTAB]);
        assert_eq!(
            modal.update(ModalEvent::Key(Key::Enter)),
            Some(ModalCommand::Submit(Request::ConfirmDelete {
                session: "arbor:fix-scroll".to_string(),
            }))
        );
    }

    #[test]
    fn test_attach_is_default_action() {
        let mut modal = modal();
        assert_eq!(
            modal.update(ModalEvent::Key(Key::Enter)),
            Some(ModalCommand::Submit(Request::Attach {
                session: "arbor:fix-scroll".to_string(),
            }))
        );
    }

    #[test]
    fn test_render_shows_merge_row_only_for_create_pr() {
        let mut modal = modal();
        assert!(!text_to_string(&modal.render()).contains("Merge:"));
        send(&mut modal, &[TAB, TAB]);
        assert!(text_to_string(&modal.render()).contains("Merge:   squash"));
        send(&mut modal, &[ModalEvent::Key(Key::Down)]);
        assert!(text_to_string(&modal.render()).contains("< squash >"));
    }

    #[test]
    fn test_help_tracks_focus() {
        let mut modal = modal();
        assert!(modal.help().starts_with("h/l action"));
        send(&mut modal, &[TAB, TAB, ModalEvent::Key(Key::Down)]);
        assert!(modal.help().starts_with("h/l merge method"));
        send(&mut modal, &[BACKTAB]);
        assert!(modal.help().starts_with("type prompt"));
    }
}
