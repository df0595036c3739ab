use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::DailyStats;
use crate::tui::theme;

/// Seven-day completion strip, oldest day first.
pub fn render(frame: &mut Frame, area: Rect, daily: &[DailyStats]) {
    let block = Block::default()
        .title(Span::styled(" This Week ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(ratatui::style::Style::default().fg(theme::BORDER))
        .style(theme::surface());

    let mut dot_spans = vec![Span::styled("  ", theme::dim())];
    let mut label_spans = vec![Span::styled("  ", theme::dim())];

    for stat in daily.iter().take(7) {
        let ratio = stat.completion_ratio();
        let (dot, style) = if stat.is_perfect() {
            ("●", theme::green().add_modifier(Modifier::BOLD))
        } else if ratio >= 0.5 {
            ("●", theme::sand())
        } else if stat.done > 0 {
            ("◑", theme::sand())
        } else {
            ("○", theme::dim())
        };
        dot_spans.push(Span::styled(dot, style));
        dot_spans.push(Span::styled("  ", theme::dim()));

        // "2025-06-09" → day of month
        let day = stat.date.get(8..10).unwrap_or("??").to_string();
        label_spans.push(Span::styled(day, theme::dim()));
        label_spans.push(Span::styled(" ", theme::dim()));
    }

    let perfect = daily.iter().filter(|d| d.is_perfect()).count();
    let meta = Line::from(Span::styled(
        format!("  Perfect days: {}/7", perfect),
        theme::dim(),
    ));

    let text = vec![
        Line::from(""),
        Line::from(dot_spans),
        Line::from(label_spans),
        meta,
    ];
    frame.render_widget(Paragraph::new(text).block(block), area);
}
