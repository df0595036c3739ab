use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use tui_big_text::{BigText, PixelSize};

use crate::tui::theme;

/// Big-digit current streak (the strongest habit), with best underneath.
pub fn render(frame: &mut Frame, area: Rect, current: u32, best: u32) {
    let block = Block::default()
        .title(Span::styled(" Streak ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(ratatui::style::Style::default().fg(theme::BORDER))
        .style(theme::surface());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 4 {
        let line = Line::from(vec![
            Span::styled(format!("  {} days", current), theme::green()),
            Span::styled(format!("  · best {}", best), theme::dim()),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
        return;
    }

    let digits_area = Rect {
        height: inner.height.saturating_sub(1),
        ..inner
    };
    let caption_area = Rect {
        y: inner.y + inner.height - 1,
        height: 1,
        ..inner
    };

    let digits = BigText::builder()
        .pixel_size(PixelSize::Quadrant)
        .style(theme::green())
        .lines(vec![Line::from(format!("  {}", current))])
        .build();
    frame.render_widget(digits, digits_area);

    let caption = Line::from(vec![
        Span::styled("  day streak", theme::dim()),
        Span::styled(format!("  ·  best {}", best), theme::dim()),
    ]);
    frame.render_widget(Paragraph::new(caption), caption_area);
}
