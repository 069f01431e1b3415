//! Pick tracker issues to link to a session.

use std::collections::BTreeSet;

use ratatui::text::{Line, Span, Text};
use tracing::debug;

use super::{
    Key, Modal, ModalCommand, ModalEvent, Request, error_style, label_style, legend, list_row,
    vertical,
};
use crate::nav::{Direction, ListNav};
use crate::session::Issue;
use crate::ui::truncate_str;

/// State for the issue picker modal.
///
/// Opens empty in a loading state; the host replaces the whole list with
/// [`IssuePickerModal::set_items`] once the load finishes.
#[derive(Debug, Clone)]
pub struct IssuePickerModal {
    session: String,
    issues: Vec<Issue>,
    /// Issue numbers checked by the user.
    checked: BTreeSet<u64>,
    list: ListNav,
    loading: bool,
    error: Option<String>,
    column_width: usize,
}

impl IssuePickerModal {
    pub fn new(session: impl Into<String>, list_rows: usize, column_width: usize) -> Self {
        Self {
            session: session.into(),
            issues: Vec::new(),
            checked: BTreeSet::new(),
            list: ListNav::new(0, list_rows),
            loading: true,
            error: None,
            column_width,
        }
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn list(&self) -> &ListNav {
        &self.list
    }

    pub fn checked(&self) -> Vec<u64> {
        let mut seen = BTreeSet::new();
        self.issues
            .iter()
            .map(|issue| issue.number)
            .filter(|number| self.checked.contains(number) && seen.insert(*number))
            .collect()
    }

    /// Replace the issue list. Checks on issues that are still present are
    /// kept; cursor and viewport are re-clamped against the new count.
    pub fn set_items(&mut self, issues: Vec<Issue>) {
        self.checked
            .retain(|number| issues.iter().any(|issue| issue.number == *number));
        self.list.set_count(issues.len());
        self.issues = issues;
        self.loading = false;
        self.error = None;
        debug!(count = self.issues.len(), "issue_picker_items_set");
    }

    /// Show a load failure in place of the list.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    fn toggle_current(&mut self) {
        let Some(issue) = self.issues.get(self.list.selected()) else {
            return;
        };
        if !self.checked.remove(&issue.number) {
            self.checked.insert(issue.number);
        }
    }

    /// Check every issue, or clear all checks when everything is checked.
    fn toggle_all(&mut self) {
        // compare against distinct numbers, the file may list an issue twice
        let all: BTreeSet<u64> = self.issues.iter().map(|issue| issue.number).collect();
        if !all.is_empty() && self.checked == all {
            self.checked.clear();
        } else {
            self.checked = all;
        }
    }

    fn submit(&self) -> Option<ModalCommand> {
        let issues = self.checked();
        if issues.is_empty() {
            debug!("issue_picker_submit_blocked");
            return None;
        }
        Some(ModalCommand::Submit(Request::LinkIssues {
            session: self.session.clone(),
            issues,
        }))
    }

    fn row_text(&self, issue: &Issue) -> String {
        let mark = if self.checked.contains(&issue.number) {
            "[x]"
        } else {
            "[ ]"
        };
        let mut text = format!("{mark} #{} {}", issue.number, issue.title);
        if !issue.labels.is_empty() {
            text.push_str(&format!(" ({})", issue.labels.join(", ")));
        }
        truncate_str(&text, self.column_width.saturating_sub(6))
    }
}

impl Modal for IssuePickerModal {
    fn title(&self) -> String {
        format!("Link Issues: {}", truncate_str(&self.session, 40))
    }

    fn help(&self) -> String {
        if self.loading || self.issues.is_empty() {
            return legend(&["esc cancel"]);
        }
        let enter = if self.checked.is_empty() {
            "enter: select at least one issue".to_string()
        } else {
            format!("enter link {}", self.checked.len())
        };
        legend(&["↑/↓ move", "space select", "a all", &enter, "esc cancel"])
    }

    fn render(&self) -> Text<'static> {
        let mut lines: Vec<Line<'static>> = Vec::new();

        if self.loading {
            lines.push(Line::from(Span::styled(
                "  Loading issues…",
                label_style(false),
            )));
            return Text::from(lines);
        }
        if let Some(err) = &self.error {
            lines.push(Line::from(Span::styled(
                format!("  \u{26a0} {err}"),
                error_style(),
            )));
            return Text::from(lines);
        }
        if self.issues.is_empty() {
            lines.push(Line::from(Span::styled(
                "  (no open issues)",
                label_style(false),
            )));
            return Text::from(lines);
        }

        let viewport = self.list.viewport();
        for index in viewport.visible_range() {
            lines.push(list_row(
                self.row_text(&self.issues[index]),
                index == self.list.selected(),
                true,
            ));
        }

        let mut footer = format!("  {} selected", self.checked.len());
        if let Some(hint) = viewport.scroll_hint() {
            footer.push_str(&format!(" · {hint}"));
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(footer, label_style(false))));

        Text::from(lines)
    }

    fn update(&mut self, event: ModalEvent) -> Option<ModalCommand> {
        match event {
            ModalEvent::Key(Key::Esc) => return Some(ModalCommand::Close),
            ModalEvent::Key(Key::Enter) => return self.submit(),
            ModalEvent::Key(Key::Space) => self.toggle_current(),
            ModalEvent::Char('a') => self.toggle_all(),
            ModalEvent::Key(Key::PageUp) => {
                self.list.page(Direction::Backward);
            }
            ModalEvent::Key(Key::PageDown) => {
                self.list.page(Direction::Forward);
            }
            ModalEvent::Key(Key::Home) => self.list.first(),
            ModalEvent::Key(Key::End) => self.list.last(),
            _ => {
                if let Some(direction) = vertical(event) {
                    self.list.step(direction);
                }
            }
        }
        None
    }
}
