use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

use crate::tui::theme;
use crate::tui::widgets::{HabitRow, RowState};
use crate::utils::format::truncate_name;

pub fn render(frame: &mut Frame, area: Rect, rows: &[HabitRow], focused_idx: usize) {
    let block = Block::default()
        .title(Span::styled(" Today ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::BORDER_FOCUS))
        .style(theme::surface());

    // Leave room for borders, indent, icon and the streak column.
    let name_width = (area.width as usize).saturating_sub(18).max(8);

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let is_focused = i == focused_idx;

            let (icon, icon_style) = match row.state {
                RowState::Done => ("●", theme::green()),
                RowState::Skipped => ("✗", theme::red()),
                RowState::Pending => ("○", theme::dim()),
            };

            let indent = "  ".repeat(row.depth);
            let chain = if row.depth > 0 { "↳ " } else { "" };

            let name_style = if is_focused {
                theme::accent().add_modifier(Modifier::BOLD)
            } else if row.state == RowState::Done {
                theme::dim()
            } else {
                theme::bold()
            };

            let mut spans = vec![
                Span::styled(format!("  {}{}", indent, chain), theme::dim()),
                Span::styled(icon, icon_style),
                Span::styled(
                    format!(" {:<width$}", truncate_name(&row.label, name_width), width = name_width),
                    name_style,
                ),
            ];

            if let Some(value) = &row.value_label {
                spans.push(Span::styled(value.clone(), theme::sand()));
            } else if let Some(target) = &row.target_label {
                spans.push(Span::styled(target.clone(), theme::dim()));
            }

            if row.current_streak > 0 {
                spans.push(Span::styled(
                    format!("  {}d", row.current_streak),
                    theme::sand(),
                ));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
