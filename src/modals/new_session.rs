//! New session dialog.

use ratatui::text::{Line, Span, Text};
use tracing::debug;

use super::{
    Key, Modal, ModalCommand, ModalEvent, NewSessionRequest, Request, checkbox_line, error_style,
    label_style, legend, list_row, vertical,
};
use crate::nav::{Boundary, Direction, FocusRing, ListNav};
use crate::text_input::TextInput;
use crate::ui::truncate_str;
use crate::validators::{validate_base_branch, validate_branch_name};

/// Which field is focused in the new session modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NewSessionField {
    Repo,
    Base,
    Autonomous,
    Branch,
    Container,
}

const FIELDS: &[NewSessionField] = &[
    NewSessionField::Repo,
    NewSessionField::Base,
    NewSessionField::Autonomous,
    NewSessionField::Branch,
    NewSessionField::Container,
];

const LABEL_WIDTH: usize = 14;

/// Host-supplied inputs for opening the modal.
#[derive(Debug, Clone)]
pub struct NewSessionOptions {
    pub repos: Vec<String>,
    /// When set, the repository is fixed and the repo list is not shown.
    pub locked_repo: Option<String>,
    pub default_base: String,
    pub containers_enabled: bool,
    /// Rows available to the repository list.
    pub list_rows: usize,
    /// Columns available for list rows and text fields.
    pub column_width: usize,
}

/// Snapshot of the flags that decide which fields take part in navigation.
#[derive(Debug, Clone, Copy)]
struct FieldGate {
    locked: bool,
    autonomous: bool,
    containers: bool,
}

impl FieldGate {
    fn enabled(self, field: NewSessionField) -> bool {
        match field {
            NewSessionField::Repo => !self.locked,
            NewSessionField::Base | NewSessionField::Autonomous => true,
            NewSessionField::Branch => !self.autonomous,
            NewSessionField::Container => self.containers && !self.autonomous,
        }
    }
}

/// State for the new session modal.
#[derive(Debug, Clone)]
pub struct NewSessionModal {
    focus: FocusRing<NewSessionField>,
    repos: Vec<String>,
    repo_list: ListNav,
    locked_repo: Option<String>,
    base: TextInput,
    autonomous: bool,
    branch: TextInput,
    /// Kept as-is while hidden by autonomous mode.
    use_container: bool,
    containers_enabled: bool,
    column_width: usize,
}

impl NewSessionModal {
    pub fn new(options: NewSessionOptions) -> Self {
        let gate = FieldGate {
            locked: options.locked_repo.is_some(),
            autonomous: false,
            containers: options.containers_enabled,
        };
        let repo_list = ListNav::new(options.repos.len(), options.list_rows);
        let mut modal = Self {
            focus: FocusRing::first_enabled(FIELDS, |f| gate.enabled(f)),
            repos: options.repos,
            repo_list,
            locked_repo: options.locked_repo,
            base: TextInput::with_value(options.default_base),
            autonomous: false,
            branch: TextInput::new(),
            use_container: false,
            containers_enabled: options.containers_enabled,
            column_width: options.column_width,
        };
        modal.sync_text_focus();
        modal
    }

    fn gate(&self) -> FieldGate {
        FieldGate {
            locked: self.locked_repo.is_some(),
            autonomous: self.autonomous,
            containers: self.containers_enabled,
        }
    }

    /// Whether `field` currently takes part in focus navigation.
    pub fn is_enabled(&self, field: NewSessionField) -> bool {
        self.gate().enabled(field)
    }

    pub fn focused(&self) -> NewSessionField {
        self.focus.current()
    }

    pub fn selected_repo(&self) -> Option<&str> {
        match &self.locked_repo {
            Some(repo) => Some(repo.as_str()),
            None => self
                .repos
                .get(self.repo_list.selected())
                .map(String::as_str),
        }
    }

    pub fn repo_list(&self) -> &ListNav {
        &self.repo_list
    }

    pub fn autonomous(&self) -> bool {
        self.autonomous
    }

    pub fn use_container(&self) -> bool {
        self.use_container
    }

    pub fn base(&self) -> &TextInput {
        &self.base
    }

    pub fn branch(&self) -> &TextInput {
        &self.branch
    }

    /// Flip autonomous mode. Focus stays where it is; dependent fields keep
    /// their values and are skipped by the next focus step.
    pub fn toggle_autonomous(&mut self) {
        self.autonomous = !self.autonomous;
    }

    fn step_focus(&mut self, direction: Direction, boundary: Boundary) {
        let gate = self.gate();
        let leaving = self.focus.current();
        if self.focus.step(direction, boundary, |f| gate.enabled(f)) {
            debug!(from = ?leaving, to = ?self.focus.current(), "new_session_focus");
            self.sync_text_focus();
        }
    }

    /// Only the focused text field receives edits.
    fn sync_text_focus(&mut self) {
        let current = self.focus.current();
        for (field, input) in [
            (NewSessionField::Base, &mut self.base),
            (NewSessionField::Branch, &mut self.branch),
        ] {
            let focused = current == field;
            if focused && !input.is_focused() {
                input.focus();
            } else if !focused && input.is_focused() {
                input.blur();
            }
        }
    }

    fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus.current() {
            NewSessionField::Base => Some(&mut self.base),
            NewSessionField::Branch if !self.autonomous => Some(&mut self.branch),
            _ => None,
        }
    }

    /// Why the form cannot be submitted yet, if anything blocks it.
    pub fn blocking_reason(&self) -> Option<String> {
        if self.selected_repo().is_none() {
            return Some("No repository configured".to_string());
        }
        if let Some(err) = validate_base_branch(self.base.value()) {
            return Some(err);
        }
        if !self.autonomous
            && let Some(err) = validate_branch_name(self.branch.value())
        {
            return Some(err);
        }
        None
    }

    pub fn is_valid(&self) -> bool {
        self.blocking_reason().is_none()
    }

    fn submit(&self) -> Option<ModalCommand> {
        if let Some(reason) = self.blocking_reason() {
            debug!(reason = %reason, "new_session_submit_blocked");
            return None;
        }
        let repo = self.selected_repo()?.to_string();
        let branch = if self.autonomous {
            None
        } else {
            Some(self.branch.value().to_string())
        };
        Some(ModalCommand::Submit(Request::CreateSession(
            NewSessionRequest {
                repo,
                base: self.base.value().trim().to_string(),
                branch,
                autonomous: self.autonomous,
                container: self.containers_enabled && self.use_container,
            },
        )))
    }

    fn toggle_focused_checkbox(&mut self) {
        let gate = self.gate();
        match self.focus.current() {
            NewSessionField::Autonomous => self.toggle_autonomous(),
            NewSessionField::Container if gate.enabled(NewSessionField::Container) => {
                self.use_container = !self.use_container;
            }
            _ => {}
        }
    }

    fn text_field_line(
        &self,
        label: &str,
        field: NewSessionField,
        input: &TextInput,
        placeholder: &str,
    ) -> Line<'static> {
        let focused = self.focus.is_focused(field);
        let width = self.column_width.saturating_sub(LABEL_WIDTH + 2);
        let mut spans = vec![Span::styled(
            format!("  {label:<width$}", width = LABEL_WIDTH),
            label_style(focused),
        )];
        spans.extend(input.spans(width, placeholder));
        Line::from(spans)
    }
}

impl Modal for NewSessionModal {
    fn title(&self) -> String {
        "New Session".to_string()
    }

    fn help(&self) -> String {
        let enter = match self.blocking_reason() {
            None => "enter create".to_string(),
            Some(reason) => format!("enter: {}", reason.to_lowercase()),
        };
        let field_keys = match self.focus.current() {
            NewSessionField::Repo => "↑/↓ select repo",
            NewSessionField::Base | NewSessionField::Branch => "type to edit",
            NewSessionField::Autonomous | NewSessionField::Container => "space toggle",
        };
        legend(&[field_keys, "tab next field", &enter, "esc cancel"])
    }

    fn render(&self) -> Text<'static> {
        let mut lines: Vec<Line<'static>> = Vec::new();
        let row_width = self.column_width.saturating_sub(6);

        match &self.locked_repo {
            Some(repo) => {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {:<width$}", "Repository:", width = LABEL_WIDTH),
                        label_style(false),
                    ),
                    Span::raw(truncate_str(repo, row_width.saturating_sub(LABEL_WIDTH))),
                    Span::styled(" (locked)", label_style(false)),
                ]));
            }
            None => {
                let list_focused = self.focus.is_focused(NewSessionField::Repo);
                lines.push(Line::from(Span::styled(
                    "  Repository:",
                    label_style(list_focused),
                )));
                if self.repos.is_empty() {
                    lines.push(Line::from(Span::styled(
                        "    (no repositories configured)",
                        error_style(),
                    )));
                }
                let viewport = self.repo_list.viewport();
                for index in viewport.visible_range() {
                    lines.push(list_row(
                        truncate_str(&self.repos[index], row_width),
                        index == self.repo_list.selected(),
                        list_focused,
                    ));
                }
                if let Some(hint) = viewport.scroll_hint() {
                    lines.push(Line::from(Span::styled(
                        format!("    {hint}"),
                        label_style(false),
                    )));
                }
            }
        }

        lines.push(Line::raw(""));
        lines.push(self.text_field_line(
            "Base branch:",
            NewSessionField::Base,
            &self.base,
            "(required)",
        ));
        if let Some(err) = validate_base_branch(self.base.value()) {
            lines.push(Line::from(Span::styled(
                format!("  {:width$}\u{26a0} {err}", "", width = LABEL_WIDTH),
                error_style(),
            )));
        }

        lines.push(checkbox_line(
            "Autonomous (agent names the branch)",
            self.autonomous,
            self.focus.is_focused(NewSessionField::Autonomous),
            true,
        ));

        if self.autonomous {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<width$}", "Branch name:", width = LABEL_WIDTH),
                    label_style(false),
                ),
                Span::styled("(chosen by agent)", label_style(false)),
            ]));
        } else {
            lines.push(self.text_field_line(
                "Branch name:",
                NewSessionField::Branch,
                &self.branch,
                "(required)",
            ));
            if !self.branch.value().is_empty()
                && let Some(err) = validate_branch_name(self.branch.value())
            {
                lines.push(Line::from(Span::styled(
                    format!("  {:width$}\u{26a0} {err}", "", width = LABEL_WIDTH),
                    error_style(),
                )));
            }
        }

        if self.containers_enabled {
            lines.push(checkbox_line(
                "Run in container",
                self.use_container,
                self.focus.is_focused(NewSessionField::Container),
                !self.autonomous,
            ));
        }

        Text::from(lines)
    }

    fn update(&mut self, event: ModalEvent) -> Option<ModalCommand> {
        let focus = self.focus.current();
        let on_list = focus == NewSessionField::Repo && self.is_enabled(NewSessionField::Repo);
        let on_checkbox = matches!(
            focus,
            NewSessionField::Autonomous | NewSessionField::Container
        );

        match event {
            ModalEvent::Key(Key::Esc) => return Some(ModalCommand::Close),
            ModalEvent::Key(Key::Enter) => return self.submit(),
            ModalEvent::Key(Key::Tab) => self.step_focus(Direction::Forward, Boundary::Wrap),
            ModalEvent::Key(Key::BackTab) => self.step_focus(Direction::Backward, Boundary::Wrap),

            // The repo list owns vertical movement while focused; elsewhere
            // up/down walk the fields without wrapping.
            ModalEvent::Key(Key::Up | Key::Down) if !on_list => {
                let direction = vertical(event).unwrap_or(Direction::Forward);
                self.step_focus(direction, Boundary::Clamp);
            }
            _ if on_list => match event {
                ModalEvent::Key(Key::PageUp) => {
                    self.repo_list.page(Direction::Backward);
                }
                ModalEvent::Key(Key::PageDown) => {
                    self.repo_list.page(Direction::Forward);
                }
                ModalEvent::Key(Key::Home) => self.repo_list.first(),
                ModalEvent::Key(Key::End) => self.repo_list.last(),
                _ => {
                    if let Some(direction) = vertical(event) {
                        self.repo_list.step(direction);
                    }
                }
            },

            ModalEvent::Key(Key::Space | Key::Left | Key::Right) if on_checkbox => {
                self.toggle_focused_checkbox();
            }

            _ => {
                if let Some(input) = self.focused_input() {
                    match event {
                        ModalEvent::Char(c) => {
                            input.insert_char(c);
                        }
                        ModalEvent::Key(Key::Space) => {
                            input.insert_char(' ');
                        }
                        ModalEvent::Key(Key::Backspace) => {
                            input.delete_char_before();
                        }
                        ModalEvent::Key(Key::Delete) => {
                            input.delete_char_at();
                        }
                        ModalEvent::Key(Key::Left) => input.cursor_left(),
                        ModalEvent::Key(Key::Right) => input.cursor_right(),
                        ModalEvent::Key(Key::Home) => input.cursor_home(),
                        ModalEvent::Key(Key::End) => input.cursor_end(),
                        _ => {}
                    }
                }
            }
        }
        None
    }
}
