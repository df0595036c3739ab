use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, date_label: &str, display_name: &str) {
    let title_line = Line::from(vec![Span::styled(
        "  ◉ groove  ",
        theme::accent().add_modifier(Modifier::BOLD),
    )]);

    let mut date_spans = vec![Span::styled(date_label.to_string(), theme::sand())];
    if !display_name.is_empty() {
        date_spans.push(Span::styled("  ·  ", theme::dim()));
        date_spans.push(Span::styled(display_name.to_string(), theme::dim()));
    }

    let text = vec![title_line, Line::from(""), Line::from(date_spans)];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::accent())
        .style(theme::base());

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
