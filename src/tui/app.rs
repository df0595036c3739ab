use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use rusqlite::Connection;
use std::collections::HashMap;

use crate::config::AppConfig;
use crate::db::repository::{EntryRepo, HabitRepo, StatsRepo};
use crate::models::{DailyStats, Habit, StreakSummary};
use crate::stats::achievements::Category;
use crate::stats::{calculate_achievements, local_today, organize_habits, EarnedAchievement};
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::{habits, header, statusbar, streak, week, HabitRow, RowState};
use crate::utils::format::{format_value, progress_bar};

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Dashboard,
    Stats,
    Achievements,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    ValueInput,
}

pub struct App {
    pub view: View,
    pub config: AppConfig,
    pub focus_idx: usize,
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub input_error: Option<String>, // shown in the value popup on bad input

    // Cached state (refreshed on action and on day rollover)
    pub today: NaiveDate,
    pub today_label: String,
    pub habits: Vec<Habit>,
    pub rows: Vec<HabitRow>,
    pub summaries: HashMap<i64, StreakSummary>,
    pub weekly: Vec<DailyStats>,
    pub achievements: Vec<EarnedAchievement>,
    pub earned_count: usize,
    pub top_current: u32,
    pub top_best: u32,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let today = local_today(config.profile.day_rollover_hour);
        App {
            view: View::Dashboard,
            config,
            focus_idx: 0,
            should_quit: false,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            input_error: None,
            today,
            today_label: today.format("%A, %b %d, %Y").to_string(),
            habits: Vec::new(),
            rows: Vec::new(),
            summaries: HashMap::new(),
            weekly: Vec::new(),
            achievements: Vec::new(),
            earned_count: 0,
            top_current: 0,
            top_best: 0,
        }
    }

    pub fn load(&mut self, conn: &Connection) -> Result<()> {
        self.today = local_today(self.config.profile.day_rollover_hour);
        self.today_label = self.today.format("%A, %b %d, %Y").to_string();

        let habits = HabitRepo::get_active(conn)?;
        let entries = EntryRepo::get_by_date(conn, self.today)?;
        let entry_for = |id: i64| entries.iter().find(|e| e.habit_id == id);

        let mut summaries = HashMap::new();
        for habit in &habits {
            summaries.insert(
                habit.id,
                StatsRepo::summary_for_habit(conn, habit.id, self.today)?,
            );
        }

        let rows: Vec<HabitRow> = organize_habits(&habits)
            .into_iter()
            .map(|stacked| {
                let habit = stacked.habit;
                let entry = entry_for(habit.id);
                let state = match entry {
                    Some(e) if e.completed => RowState::Done,
                    Some(_) => RowState::Skipped,
                    None => RowState::Pending,
                };
                let unit = habit.target_unit.as_deref().unwrap_or("");
                HabitRow {
                    habit_id: habit.id,
                    label: format!("{} {}", habit.display_icon(), habit.name),
                    depth: stacked.depth,
                    state,
                    value_label: entry
                        .and_then(|e| e.value)
                        .map(|v| format!("{}{}", format_value(v), unit)),
                    current_streak: summaries
                        .get(&habit.id)
                        .map(|s| s.current_streak)
                        .unwrap_or(0),
                    wants_value: habit.tracking_type.wants_value(),
                    target_label: habit
                        .target_value
                        .map(|t| format!("goal {}{}", format_value(t), unit)),
                }
            })
            .collect();

        self.weekly = StatsRepo::daily_stats_range(
            conn,
            self.today - chrono::Duration::days(6),
            self.today,
            habits.len() as u32,
        )?;

        let user_stats = StatsRepo::user_stats(conn, self.today)?;
        self.achievements = calculate_achievements(&user_stats);
        self.earned_count = self.achievements.iter().filter(|e| e.earned).count();

        self.top_current = summaries.values().map(|s| s.current_streak).max().unwrap_or(0);
        self.top_best = summaries.values().map(|s| s.best_streak).max().unwrap_or(0);

        if self.focus_idx >= rows.len() {
            self.focus_idx = rows.len().saturating_sub(1);
        }
        self.habits = habits;
        self.rows = rows;
        self.summaries = summaries;
        Ok(())
    }

    pub fn tick(&mut self, conn: &Connection) {
        // Reload when the (rollover-adjusted) day changes under us.
        if local_today(self.config.profile.day_rollover_hour) != self.today {
            let _ = self.load(conn);
        }
    }

    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent, conn: &Connection) {
        // Only handle actual key presses — ignore release/repeat events from some terminals
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.input_mode {
            InputMode::ValueInput => self.handle_value_input(key, conn),
            InputMode::Normal => match self.view {
                View::Dashboard => self.handle_dashboard_key(key, conn),
                View::Stats => self.handle_return_key(key, KeyCode::Char('s')),
                View::Achievements => self.handle_return_key(key, KeyCode::Char('a')),
                View::Help => self.handle_return_key(key, KeyCode::Char('?')),
            },
        }
    }

    fn handle_dashboard_key(&mut self, key: crossterm::event::KeyEvent, conn: &Connection) {
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.view = View::Help;
            }
            KeyCode::Char('s') => {
                self.view = View::Stats;
            }
            KeyCode::Char('a') => {
                self.view = View::Achievements;
            }
            KeyCode::Up => {
                if self.focus_idx > 0 {
                    self.focus_idx -= 1;
                }
            }
            KeyCode::Down => {
                if self.focus_idx + 1 < self.rows.len() {
                    self.focus_idx += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('m') => {
                self.toggle_focused(conn);
            }
            KeyCode::Char('x') => {
                if let Some(row) = self.rows.get(self.focus_idx) {
                    let _ = EntryRepo::upsert(conn, row.habit_id, self.today, false, None, None);
                    let _ = self.load(conn);
                }
            }
            KeyCode::Char('u') => {
                if let Some(row) = self.rows.get(self.focus_idx) {
                    let _ = EntryRepo::clear(conn, row.habit_id, self.today);
                    let _ = self.load(conn);
                }
            }
            _ => {}
        }
    }

    fn handle_return_key(&mut self, key: crossterm::event::KeyEvent, toggle: KeyCode) {
        if key.code == KeyCode::Esc || key.code == toggle {
            self.view = View::Dashboard;
        }
    }

    fn toggle_focused(&mut self, conn: &Connection) {
        let Some(row) = self.rows.get(self.focus_idx) else {
            return;
        };

        if row.state == RowState::Done {
            // Checking a done habit un-checks it.
            let _ = EntryRepo::clear(conn, row.habit_id, self.today);
            let _ = self.load(conn);
            return;
        }

        if row.wants_value {
            self.input_mode = InputMode::ValueInput;
            self.input_buffer.clear();
            self.input_error = None;
            return;
        }

        let _ = EntryRepo::upsert(conn, row.habit_id, self.today, true, None, None);
        let _ = self.load(conn);
    }

    fn handle_value_input(&mut self, key: crossterm::event::KeyEvent, conn: &Connection) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                self.input_error = None;
            }
            KeyCode::Enter => {
                let trimmed = self.input_buffer.trim().to_string();
                if trimmed.is_empty() {
                    self.input_error = Some("Enter a number first (e.g. 8 or 2.5)".to_string());
                    return;
                }
                match trimmed.parse::<f64>() {
                    Ok(value) if value > 0.0 => {
                        self.submit_value(conn, value);
                    }
                    Ok(_) => {
                        self.input_error = Some("Value must be greater than 0".to_string());
                    }
                    Err(_) => {
                        self.input_error = Some(format!("'{}' is not a valid number", trimmed));
                    }
                }
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
                self.input_error = None;
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                self.input_buffer.push(c);
                self.input_error = None;
            }
            _ => {}
        }
    }

    fn submit_value(&mut self, conn: &Connection, value: f64) {
        let Some(row) = self.rows.get(self.focus_idx) else {
            return;
        };
        let completed = self
            .habits
            .iter()
            .find(|h| h.id == row.habit_id)
            .and_then(|h| h.target_value)
            .map(|target| value >= target)
            .unwrap_or(true);

        let _ = EntryRepo::upsert(conn, row.habit_id, self.today, completed, Some(value), None);
        let _ = self.load(conn);
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
        self.input_error = None;
    }

    pub fn draw(&self, frame: &mut Frame) {
        match self.view {
            View::Dashboard => self.draw_dashboard(frame),
            View::Stats => self.draw_stats(frame),
            View::Achievements => self.draw_achievements(frame),
            View::Help => {
                self.draw_dashboard(frame);
                self.draw_help_overlay(frame);
            }
        }

        if self.input_mode == InputMode::ValueInput {
            self.draw_value_input(frame);
        }
    }

    fn draw_dashboard(&self, frame: &mut Frame) {
        let area = frame.area();

        frame.render_widget(Block::default().style(theme::base()), area);

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(
            frame,
            outer_chunks[0],
            &self.today_label,
            &self.config.profile.display_name,
        );
        statusbar::render(frame, outer_chunks[2]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
            .split(outer_chunks[1]);

        habits::render(frame, columns[0], &self.rows, self.focus_idx);

        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(8), // streak digits
                Constraint::Length(6), // week strip
                Constraint::Min(0),    // today summary
            ])
            .split(columns[1]);

        streak::render(frame, right_chunks[0], self.top_current, self.top_best);
        week::render(frame, right_chunks[1], &self.weekly);
        self.draw_today_panel(frame, right_chunks[2]);
    }

    fn draw_today_panel(&self, frame: &mut Frame, area: Rect) {
        let done = self
            .rows
            .iter()
            .filter(|r| r.state == RowState::Done)
            .count() as u32;
        let total = self.rows.len() as u32;

        let lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  ", theme::dim()),
                Span::styled(progress_bar(done, total, 12), theme::green()),
                Span::styled(
                    format!("  {}/{} done", done, total),
                    theme::bold(),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    "  Badges: {}/{} earned",
                    self.earned_count,
                    self.achievements.len()
                ),
                theme::dim(),
            )),
        ];

        let block = Block::default()
            .title(Span::styled(" Today ", theme::accent()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(ratatui::style::Style::default().fg(theme::BORDER))
            .style(theme::surface());
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_stats(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let title = Paragraph::new(Line::from(vec![
            Span::styled("  Stats  ", theme::accent().add_modifier(Modifier::BOLD)),
            Span::styled("  [Esc] back", theme::dim()),
        ]));
        frame.render_widget(title, chunks[0]);

        let mut lines = vec![Line::from("")];
        for habit in &self.habits {
            let Some(s) = self.summaries.get(&habit.id) else {
                continue;
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<22}", habit.name), theme::bold()),
                Span::styled(
                    format!("{:>3}d current  {:>3}d best", s.current_streak, s.best_streak),
                    theme::green(),
                ),
            ]));
            lines.push(Line::from(vec![
                Span::styled("    7d  ", theme::dim()),
                Span::styled(progress_bar(s.completion_rate_7_days, 100, 12), theme::sand()),
                Span::styled(format!(" {:>3}%", s.completion_rate_7_days), theme::dim()),
                Span::styled("   30d  ", theme::dim()),
                Span::styled(
                    progress_bar(s.completion_rate_30_days, 100, 12),
                    theme::sand(),
                ),
                Span::styled(format!(" {:>3}%", s.completion_rate_30_days), theme::dim()),
            ]));
            lines.push(Line::from(Span::styled(
                format!(
                    "    all time {}%  ·  {} of {} check-ins",
                    s.completion_rate_all_time, s.total_completed, s.total_days
                ),
                theme::dim(),
            )));
            lines.push(Line::from(""));
        }

        if self.habits.is_empty() {
            lines.push(Line::from(Span::styled(
                "  No habits yet — add one with `groove add`",
                theme::dim(),
            )));
        }

        frame.render_widget(Paragraph::new(lines), chunks[1]);
        statusbar::render(frame, chunks[2]);
    }

    fn draw_achievements(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                "  Achievements  ",
                theme::accent().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{}/{} earned", self.earned_count, self.achievements.len()),
                theme::dim(),
            ),
            Span::styled("    [Esc] back", theme::dim()),
        ]));
        frame.render_widget(title, chunks[0]);

        let mut lines = vec![Line::from("")];
        for (category, label) in [
            (Category::Streak, "Streak"),
            (Category::Completion, "Completion"),
            (Category::Consistency, "Consistency"),
            (Category::Special, "Special"),
        ] {
            lines.push(Line::from(Span::styled(
                format!("  {}", label),
                theme::accent(),
            )));
            for e in self
                .achievements
                .iter()
                .filter(|e| e.achievement.category == category)
            {
                let a = e.achievement;
                if e.earned {
                    lines.push(Line::from(vec![
                        Span::styled(format!("    {} ", a.icon), theme::tier(a.tier)),
                        Span::styled(format!("{:<20}", a.name), theme::tier(a.tier)),
                        Span::styled(format!("✓ {}", a.description), theme::dim()),
                    ]));
                } else {
                    lines.push(Line::from(vec![
                        Span::styled(format!("    {} ", a.icon), theme::dim()),
                        Span::styled(format!("{:<20}", a.name), theme::dim()),
                        Span::styled(progress_bar(e.progress, 100, 10), theme::dim()),
                        Span::styled(format!(" {:>3}%", e.progress), theme::dim()),
                    ]));
                }
            }
            lines.push(Line::from(""));
        }

        frame.render_widget(Paragraph::new(lines), chunks[1]);
        statusbar::render(frame, chunks[2]);
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();

        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 4,
            width: area.width / 2,
            height: area.height / 2,
        };

        frame.render_widget(Clear, popup_area);

        let help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::accent().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  [Enter] / Space  ", theme::accent()),
                Span::styled("Check habit (asks for a value when needed)", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [x]              ", theme::accent()),
                Span::styled("Mark skipped", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [u]              ", theme::accent()),
                Span::styled("Undo today's record", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [s]              ", theme::accent()),
                Span::styled("Stats view", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [a]              ", theme::accent()),
                Span::styled("Achievements view", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [↑ ↓]            ", theme::accent()),
                Span::styled("Navigate habits", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [?]              ", theme::accent()),
                Span::styled("Toggle help", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [Esc]            ", theme::accent()),
                Span::styled("Quit", theme::dim()),
            ]),
        ];

        let block = Block::default()
            .title(Span::styled(" Help ", theme::accent()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::accent())
            .style(theme::surface());

        frame.render_widget(Paragraph::new(help_text).block(block), popup_area);
    }

    fn draw_value_input(&self, frame: &mut Frame) {
        let area = frame.area();
        let height = if self.input_error.is_some() { 7 } else { 5 };

        let popup_area = Rect {
            x: area.width / 4,
            y: (area.height / 2).saturating_sub(3),
            width: area.width / 2,
            height,
        };

        frame.render_widget(Clear, popup_area);

        let target_hint = self
            .rows
            .get(self.focus_idx)
            .and_then(|r| r.target_label.clone())
            .map(|t| format!("  ({})", t))
            .unwrap_or_default();

        let mut text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("  Value{}: ", target_hint), theme::dim()),
                Span::styled(
                    self.input_buffer.as_str(),
                    theme::accent().add_modifier(Modifier::BOLD),
                ),
                Span::styled("█", theme::sand()), // block cursor
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "  Type a number, then [Enter]  ·  [Esc] cancel",
                theme::dim(),
            )),
        ];

        if let Some(err) = &self.input_error {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(format!("  ✗ {}", err), theme::red())));
        }

        let border_style = if self.input_error.is_some() {
            theme::red()
        } else {
            theme::sand()
        };

        let block = Block::default()
            .title(Span::styled(" Log Value ", theme::accent()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .style(theme::surface());

        frame.render_widget(Paragraph::new(text).block(block), popup_area);
    }
}

/// Run the TUI event loop.
pub fn run(conn: Connection, config: AppConfig) -> Result<()> {
    let mut app = App::new(config);
    app.load(&conn)?;

    let mut terminal = ratatui::init();
    let events = EventHandler::new(500);

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        match events.next()? {
            Event::Key(key) => {
                app.handle_key(key, &conn);
                if app.should_quit {
                    break;
                }
            }
            Event::Tick => {
                app.tick(&conn);
            }
        }
    }

    ratatui::restore();
    Ok(())
}
