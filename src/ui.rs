//! UI rendering functions.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::App;
use crate::modal_ui::draw_modal;
use crate::modals::list_row;
use crate::session::{Session, SessionStatus};

const SHORTCUTS: &str = "[n] New  [enter] Actions  [i] Issues  [d] Delete  [q] Quit";

/// Truncates a string to the given display width, appending "..." if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    // Replace newlines with spaces for single-line display
    let single_line: String = s.chars().map(|c| if c == '\n' { ' ' } else { c }).collect();

    if single_line.width() <= max_width {
        return single_line;
    }

    let budget = max_width.saturating_sub(3);
    let mut out = String::new();
    let mut width = 0;
    for c in single_line.chars() {
        let cw = c.width().unwrap_or(0);
        if width + cw > budget {
            break;
        }
        out.push(c);
        width += cw;
    }
    out.push_str("...");
    out
}

/// Calculate a centered rectangle within the given area.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn status_color(status: SessionStatus) -> Color {
    match status {
        SessionStatus::Idle => Color::DarkGray,
        SessionStatus::Running => Color::Green,
        SessionStatus::InReview => Color::Magenta,
    }
}

/// One line of the session list, without the selection marker.
fn session_summary(session: &Session) -> String {
    let branch = session.branch.as_deref().unwrap_or("(agent picks)");
    let mut text = format!(
        "{:<28} {:<10} {} -> {}",
        session.name,
        session.status.label(),
        session.base,
        branch
    );
    if session.autonomous {
        text.push_str(" [auto]");
    }
    if session.container {
        text.push_str(" [container]");
    }
    if let Some(merge) = session.pull_request {
        text.push_str(&format!(" PR({})", merge.label()));
    }
    if !session.linked_issues.is_empty() {
        let issues: Vec<String> = session
            .linked_issues
            .iter()
            .map(|n| format!("#{n}"))
            .collect();
        text.push_str(&format!(" {}", issues.join(" ")));
    }
    text
}

/// Draw the main UI.
pub fn draw_ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Session list (flexible)
            Constraint::Length(3), // Command panel (border + 1 content row + border)
        ])
        .split(f.area());

    let list_area = chunks[0];
    let rows = list_area.height.saturating_sub(2) as usize;
    app.fit_session_list(rows);

    let row_width = list_area.width.saturating_sub(8) as usize;
    let viewport = *app.session_list.viewport();
    let list_focused = app.modal.is_none();

    let content: Vec<Line> = if app.sessions.is_empty() {
        vec![Line::from(Span::styled(
            "  No sessions. Press n to create one.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        viewport
            .visible_range()
            .map(|index| {
                let session = &app.sessions[index];
                let mut line = list_row(
                    truncate_str(&session_summary(session), row_width),
                    index == app.session_list.selected(),
                    list_focused,
                );
                line.spans.push(Span::styled(
                    " ●",
                    Style::default().fg(status_color(session.status)),
                ));
                line
            })
            .collect()
    };

    let mut list_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(format!(" arbor · {} ", app.session_id)).left_aligned())
        .title(Line::from(format!(" {} sessions ", app.sessions.len())).right_aligned());
    if let Some(hint) = viewport.scroll_hint() {
        list_block = list_block.title_bottom(Line::from(format!(" {hint} ")).right_aligned());
    }

    f.render_widget(Paragraph::new(content).block(list_block), list_area);

    // Shortcuts (left) and status message (right)
    let status = app.status_message.as_deref().unwrap_or("");
    let inner_width = chunks[1].width.saturating_sub(2) as usize;
    let status = truncate_str(status, inner_width.saturating_sub(SHORTCUTS.width() + 1));
    let spacing = inner_width.saturating_sub(SHORTCUTS.width() + status.width());

    let command_line = Line::from(vec![
        Span::styled(SHORTCUTS, Style::default().fg(Color::DarkGray)),
        Span::raw(" ".repeat(spacing)),
        Span::styled(status, Style::default().fg(Color::Yellow)),
    ]);

    let command_panel = Paragraph::new(command_line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(command_panel, chunks[1]);

    if let Some(modal) = &app.modal {
        draw_modal(f, modal.as_modal(), app.config.ui.column_width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // truncate_str tests

    #[test]
    fn test_truncate_str_short_string() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_str_long_string() {
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hello world", 10), "hello w...");
    }

    #[test]
    fn test_truncate_str_with_newlines() {
        assert_eq!(truncate_str("hello\nworld", 20), "hello world");
        assert_eq!(truncate_str("hello\nworld", 8), "hello...");
    }

    #[test]
    fn test_truncate_str_empty() {
        assert_eq!(truncate_str("", 10), "");
    }

    #[test]
    fn test_truncate_str_small_max_len() {
        assert_eq!(truncate_str("hello", 2), "...");
        assert_eq!(truncate_str("hello", 3), "...");
        assert_eq!(truncate_str("hello", 4), "h...");
    }

    #[test]
    fn test_truncate_str_counts_display_width() {
        // Each CJK character occupies two cells.
        assert_eq!(truncate_str("日本語のブランチ", 16), "日本語のブランチ");
        assert_eq!(truncate_str("日本語のブランチ", 9), "日本語...");
        assert_eq!(truncate_str("日本語のブランチ", 8), "日本...");
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect(60, 20, area), Rect::new(20, 10, 60, 20));
        // Larger than the area: clamped to it.
        assert_eq!(centered_rect(120, 50, area), Rect::new(0, 0, 100, 40));
    }

    #[test]
    fn test_session_summary() {
        let session = Session {
            name: "arbor:fix-scroll".to_string(),
            repo: "/work/arbor".to_string(),
            base: "main".to_string(),
            branch: Some("fix-scroll".to_string()),
            autonomous: false,
            container: true,
            status: SessionStatus::Running,
            pull_request: None,
            linked_issues: vec![12, 14],
            last_prompt: None,
        };
        let summary = session_summary(&session);
        assert!(summary.starts_with("arbor:fix-scroll"));
        assert!(summary.contains("running"));
        assert!(summary.contains("main -> fix-scroll [container] #12 #14"));
    }
}
