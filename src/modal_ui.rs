//! Modal UI rendering.

use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use crate::modals::Modal;
use crate::ui::{centered_rect, truncate_str};

/// Outer size of a modal whose body is `body` and whose rows are laid out in
/// `column_width` columns: borders, body, a spacer and the help line.
pub fn modal_size(body: &Text<'_>, column_width: usize) -> (u16, u16) {
    let width = column_width.saturating_add(6).min(u16::MAX as usize) as u16;
    let height = body.lines.len().saturating_add(4).min(u16::MAX as usize) as u16;
    (width, height)
}

/// Draw any modal centered over the main UI.
pub fn draw_modal(f: &mut Frame, modal: &dyn Modal, column_width: usize) {
    let body = modal.render();
    let (width, height) = modal_size(&body, column_width);
    let modal_area = centered_rect(width, height, f.area());

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let inner_width = modal_area.width.saturating_sub(4) as usize;
    let mut content = body;
    content.lines.push(Line::from(""));
    content.lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            truncate_str(&modal.help(), inner_width),
            Style::default().fg(Color::DarkGray),
        ),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(" {} ", modal.title()))
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Color::White));

    f.render_widget(Paragraph::new(content).block(block), modal_area);
}
