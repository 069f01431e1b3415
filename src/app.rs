//! Application state and core logic.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, info, warn};

use crate::config::{Config, ConfigLoadStatus, LoadedConfig};
use crate::modals::{
    ActiveModal, ConfirmModal, IssuePickerModal, ModalCommand, ModalEvent, NewSessionModal,
    NewSessionOptions, NewSessionRequest, Request, SessionActionsModal,
};
use crate::nav::{Direction, ListNav};
use crate::session::{Issue, Session, SessionStatus, load_issues, session_name};

/// Result of a background issue load, tagged with the picker that asked for it.
struct IssueLoad {
    token: u64,
    result: Result<Vec<Issue>>,
}

/// Main application state.
pub struct App {
    pub config: Config,
    /// Session ID for this arbor invocation.
    pub session_id: String,
    pub sessions: Vec<Session>,
    /// Selection and scroll state of the session list.
    pub session_list: ListNav,
    pub modal: Option<ActiveModal>,
    /// Message shown on the right of the command panel.
    pub status_message: Option<String>,
    pub should_quit: bool,
    /// Token of the open issue picker, if any.
    issue_token: Option<u64>,
    next_issue_token: u64,
    issue_tx: Sender<IssueLoad>,
    issue_rx: Receiver<IssueLoad>,
}

impl App {
    pub fn new(session_id: String, loaded_config: LoadedConfig) -> Self {
        let (issue_tx, issue_rx) = mpsc::channel();
        let status_message = match &loaded_config.status {
            ConfigLoadStatus::Loaded => None,
            ConfigLoadStatus::Created => Some(format!(
                "Created config at {}",
                loaded_config.config_path.display()
            )),
            ConfigLoadStatus::Error(e) => Some(format!("Config error: {e}")),
        };
        Self {
            session_list: ListNav::new(0, loaded_config.config.ui.list_rows),
            config: loaded_config.config,
            session_id,
            sessions: Vec::new(),
            modal: None,
            status_message,
            should_quit: false,
            issue_token: None,
            next_issue_token: 0,
            issue_tx,
            issue_rx,
        }
    }

    pub fn selected_session(&self) -> Option<&Session> {
        self.sessions.get(self.session_list.selected())
    }

    fn find_session_mut(&mut self, name: &str) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.name == name)
    }

    /// Match the session list window to the rows the UI has available.
    pub fn fit_session_list(&mut self, rows: usize) {
        self.session_list.set_capacity(rows);
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Route a key press to the open modal, or to the main screen.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if let Some(modal) = self.modal.as_mut() {
            let Some(event) = ModalEvent::from_key_event(key) else {
                return;
            };
            if let Some(command) = modal.as_modal_mut().update(event) {
                self.handle_command(command);
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('n') => self.open_new_session(),
            KeyCode::Char('a') | KeyCode::Enter => self.open_session_actions(),
            KeyCode::Char('i') => self.open_issue_picker(),
            KeyCode::Char('d') => self.open_delete_confirm(),
            KeyCode::Char('j') | KeyCode::Down => {
                self.session_list.step(Direction::Forward);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.session_list.step(Direction::Backward);
            }
            KeyCode::PageDown => {
                self.session_list.page(Direction::Forward);
            }
            KeyCode::PageUp => {
                self.session_list.page(Direction::Backward);
            }
            KeyCode::Home | KeyCode::Char('g') => self.session_list.first(),
            KeyCode::End | KeyCode::Char('G') => self.session_list.last(),
            _ => {}
        }
    }

    fn open_modal(&mut self, modal: ActiveModal) {
        debug!(modal = modal.kind(), "modal_opened");
        self.modal = Some(modal);
    }

    fn close_modal(&mut self) {
        if let Some(modal) = self.modal.take() {
            debug!(modal = modal.kind(), "modal_closed");
        }
        self.issue_token = None;
    }

    fn handle_command(&mut self, command: ModalCommand) {
        self.close_modal();
        if let ModalCommand::Submit(request) = command {
            self.perform(request);
        }
    }

    pub fn open_new_session(&mut self) {
        let sessions = &self.config.sessions;
        let modal = NewSessionModal::new(NewSessionOptions {
            repos: sessions.repos.clone(),
            locked_repo: sessions.locked_repo.clone(),
            default_base: sessions.default_base.clone(),
            containers_enabled: sessions.containers_enabled,
            list_rows: self.config.ui.list_rows,
            column_width: self.config.ui.column_width,
        });
        self.open_modal(ActiveModal::NewSession(modal));
    }

    pub fn open_session_actions(&mut self) {
        let Some(name) = self.selected_session().map(|s| s.name.clone()) else {
            self.set_status("No session selected");
            return;
        };
        let modal = SessionActionsModal::new(name, self.config.ui.column_width);
        self.open_modal(ActiveModal::SessionActions(modal));
    }

    pub fn open_delete_confirm(&mut self) {
        let Some(name) = self.selected_session().map(|s| s.name.clone()) else {
            self.set_status("No session selected");
            return;
        };
        self.open_modal(ActiveModal::Confirm(delete_confirmation(name)));
    }

    /// Open the issue picker and start loading issues in the background.
    pub fn open_issue_picker(&mut self) {
        let Some(name) = self.selected_session().map(|s| s.name.clone()) else {
            self.set_status("No session selected");
            return;
        };
        let mut picker = IssuePickerModal::new(
            name,
            self.config.ui.list_rows,
            self.config.ui.column_width,
        );

        let token = self.next_issue_token;
        self.next_issue_token += 1;

        match self.config.issues_path() {
            Some(path) => {
                let tx = self.issue_tx.clone();
                debug!(token, path = %path.display(), "issue_load_started");
                thread::spawn(move || {
                    let result = load_issues(&path);
                    // The app may have exited; nobody to tell then.
                    let _ = tx.send(IssueLoad { token, result });
                });
            }
            None => picker.set_error("No issues file configured (sessions.issues_file)"),
        }

        self.open_modal(ActiveModal::IssuePicker(picker));
        self.issue_token = Some(token);
    }

    /// Deliver finished issue loads to the picker that requested them.
    pub fn poll_issue_loads(&mut self) {
        loop {
            let load = match self.issue_rx.try_recv() {
                Ok(load) => load,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return,
            };

            let Some(ActiveModal::IssuePicker(picker)) = self.modal.as_mut() else {
                debug!(token = load.token, "stale_issue_load_dropped");
                continue;
            };
            if self.issue_token != Some(load.token) {
                debug!(token = load.token, "stale_issue_load_dropped");
                continue;
            }

            match load.result {
                Ok(issues) => {
                    debug!(token = load.token, count = issues.len(), "issue_load_finished");
                    picker.set_items(issues);
                }
                Err(e) => {
                    warn!(token = load.token, error = %format!("{e:#}"), "issue_load_failed");
                    picker.set_error(format!("{e:#}"));
                }
            }
        }
    }

    /// Carry out a request collected by a modal.
    fn perform(&mut self, request: Request) {
        match request {
            Request::CreateSession(request) => self.create_session(request),
            Request::Attach { session } => match self.find_session_mut(&session) {
                Some(s) => {
                    let repo = s.repo.clone();
                    info!(session = %session, repo = %repo, "session_attach");
                    self.set_status(format!("Attached to {session} ({repo})"));
                }
                None => self.session_missing(&session),
            },
            Request::SendPrompt { session, prompt } => match self.find_session_mut(&session) {
                Some(s) => {
                    s.last_prompt = Some(prompt);
                    s.status = SessionStatus::Running;
                    info!(session = %session, "session_prompt_sent");
                    self.set_status(format!("Prompt sent to {session}"));
                }
                None => self.session_missing(&session),
            },
            Request::CreatePullRequest { session, merge } => {
                match self.find_session_mut(&session) {
                    Some(s) => {
                        s.pull_request = Some(merge);
                        s.status = SessionStatus::InReview;
                        info!(session = %session, merge = merge.label(), "pull_request_created");
                        self.set_status(format!("Pull request opened ({})", merge.label()));
                    }
                    None => self.session_missing(&session),
                }
            }
            Request::ConfirmDelete { session } => {
                self.open_modal(ActiveModal::Confirm(delete_confirmation(session)));
            }
            Request::DeleteSession { session } => {
                let before = self.sessions.len();
                self.sessions.retain(|s| s.name != session);
                if self.sessions.len() == before {
                    self.session_missing(&session);
                    return;
                }
                self.session_list.set_count(self.sessions.len());
                info!(session = %session, "session_deleted");
                self.set_status(format!("Deleted {session}"));
            }
            Request::LinkIssues { session, issues } => match self.find_session_mut(&session) {
                Some(s) => {
                    for number in &issues {
                        if !s.linked_issues.contains(number) {
                            s.linked_issues.push(*number);
                        }
                    }
                    info!(session = %session, issues = ?issues, "issues_linked");
                    self.set_status(format!("Linked {} issue(s)", issues.len()));
                }
                None => self.session_missing(&session),
            },
        }
    }

    fn create_session(&mut self, request: NewSessionRequest) {
        let name = session_name(&request.repo, request.branch.as_deref());
        if self.sessions.iter().any(|s| s.name == name) {
            warn!(session = %name, "session_exists");
            self.set_status(format!("Session {name} already exists"));
            return;
        }

        info!(
            session = %name,
            repo = %request.repo,
            base = %request.base,
            autonomous = request.autonomous,
            container = request.container,
            "session_created"
        );
        self.sessions.push(Session {
            name: name.clone(),
            repo: request.repo,
            base: request.base,
            branch: request.branch,
            autonomous: request.autonomous,
            container: request.container,
            status: SessionStatus::Running,
            pull_request: None,
            linked_issues: Vec::new(),
            last_prompt: None,
        });
        self.session_list.set_count(self.sessions.len());
        self.session_list.last();
        self.set_status(format!("Created {name}"));
    }

    fn session_missing(&mut self, name: &str) {
        warn!(session = %name, "session_not_found");
        self.set_status(format!("Session {name} not found"));
    }
}

fn delete_confirmation(session: String) -> ConfirmModal {
    ConfirmModal::new(
        "Delete Session",
        format!("Delete {session}?\nThe worktree and its agent will be removed."),
        Request::DeleteSession { session },
    )
}
