// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use daybook_app::{
    AppCommand, AppEvent, AppMode, AppState, FormField, GridCell, Task, TaskFormInput,
    WEEKDAY_LABELS, weeks,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::Date;

const POLL_INTERVAL: Duration = Duration::from_millis(120);
const STATUS_TTL: Duration = Duration::from_secs(4);
const DAY_COLUMN_WIDTH: u16 = 5;
const PENDING_MARK: &str = "•";
const DONE_MARK: &str = "[x]";
const OPEN_MARK: &str = "[ ]";
const CURSOR_MARK: &str = ">";

/// Host services the terminal loop needs from the outside world.
pub trait AppRuntime {
    /// The current local calendar date.
    fn today(&mut self) -> Result<Date>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    help_visible: bool,
    status_token: u64,
    clock_failed: bool,
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();
    tracing::info!(today = %state.today, tasks = state.tasks.len(), "session started");

    let mut result = Ok(());
    loop {
        process_internal_events(state, &view_data, &internal_rx);
        refresh_today(state, runtime, &mut view_data);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(POLL_INTERVAL).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if !has_event {
            continue;
        }
        match event::read().context("read event") {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                if handle_key_event(state, &mut view_data, &internal_tx, key) {
                    break;
                }
            }
            Ok(_) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    tracing::info!(tasks = state.tasks.len(), "session ended");
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn refresh_today<R: AppRuntime>(state: &mut AppState, runtime: &mut R, view_data: &mut ViewData) {
    match runtime.today() {
        Ok(today) => {
            view_data.clock_failed = false;
            if !state.dispatch(AppCommand::SetToday(today)).is_empty() {
                tracing::info!(%today, "date rolled over");
            }
        }
        Err(error) => {
            if !view_data.clock_failed {
                tracing::warn!("read clock: {error:#}");
            }
            view_data.clock_failed = true;
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_TTL);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    dispatch_all(
        state,
        view_data,
        internal_tx,
        vec![AppCommand::SetStatus(message.into())],
    );
}

fn dispatch_all(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    commands: Vec<AppCommand>,
) {
    for command in commands {
        let events = state.dispatch(command);
        if events
            .iter()
            .any(|event| matches!(event, AppEvent::StatusUpdated(_)))
        {
            view_data.status_token = view_data.status_token.saturating_add(1);
            schedule_status_clear(internal_tx, view_data.status_token);
        }
    }
}

/// Applies one key press. Returns true when the user asked to quit.
fn handle_key_event(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c')) {
        return true;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
            emit_status(state, view_data, internal_tx, "help hidden");
        }
        return false;
    }

    if state.mode != AppMode::Form {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('?') => {
                view_data.help_visible = true;
                return false;
            }
            _ => {}
        }
    }

    let commands = match state.mode {
        AppMode::Calendar => calendar_commands_for_key(state, key),
        AppMode::Tasks => task_command_for_key(key).into_iter().collect(),
        AppMode::Form => form_command_for_key(key).into_iter().collect(),
    };
    dispatch_all(state, view_data, internal_tx, commands);
    false
}

fn calendar_commands_for_key(state: &AppState, key: KeyEvent) -> Vec<AppCommand> {
    let month_step = |delta: i32| {
        vec![
            AppCommand::ChangeMonth(delta),
            AppCommand::SelectDay(state.selected.day()),
        ]
    };

    match key.code {
        KeyCode::Char('h') | KeyCode::Left => vec![AppCommand::MoveSelection(-1)],
        KeyCode::Char('l') | KeyCode::Right => vec![AppCommand::MoveSelection(1)],
        KeyCode::Char('j') | KeyCode::Down => vec![AppCommand::MoveSelection(7)],
        KeyCode::Char('k') | KeyCode::Up => vec![AppCommand::MoveSelection(-7)],
        KeyCode::Char('H') | KeyCode::Char('<') | KeyCode::PageUp => month_step(-1),
        KeyCode::Char('L') | KeyCode::Char('>') | KeyCode::PageDown => month_step(1),
        KeyCode::Char('[') => month_step(-12),
        KeyCode::Char(']') => month_step(12),
        KeyCode::Char('t') => vec![AppCommand::GoToToday],
        KeyCode::Char('a') => vec![AppCommand::OpenAddTask],
        KeyCode::Tab | KeyCode::Enter => vec![AppCommand::FocusTasks],
        _ => Vec::new(),
    }
}

fn task_command_for_key(key: KeyEvent) -> Option<AppCommand> {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Some(AppCommand::MoveTaskCursor(1)),
        KeyCode::Char('k') | KeyCode::Up => Some(AppCommand::MoveTaskCursor(-1)),
        KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Enter => {
            Some(AppCommand::ToggleSelectedTask)
        }
        KeyCode::Char('a') => Some(AppCommand::OpenAddTask),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Esc | KeyCode::Char('h') => {
            Some(AppCommand::FocusCalendar)
        }
        _ => None,
    }
}

fn form_command_for_key(key: KeyEvent) -> Option<AppCommand> {
    match key.code {
        KeyCode::Esc => Some(AppCommand::CancelAddTask),
        KeyCode::Enter => Some(AppCommand::SubmitAddTask),
        KeyCode::Tab | KeyCode::BackTab => Some(AppCommand::FormNextField),
        KeyCode::Backspace => Some(AppCommand::FormBackspace),
        KeyCode::Char(value) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(AppCommand::FormInput(value))
        }
        _ => None,
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let grid = state.grid();
    let week_rows = weeks(&grid);
    let calendar_height = u16::try_from(week_rows.len()).unwrap_or(6) + 3;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(calendar_height),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(render_header_text(state))
        .style(Style::default().fg(Color::White))
        .block(Block::default().title("daybook").borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    let pending = state.tasks.days_with_pending(state.view);
    let weekday_row = Row::new(WEEKDAY_LABELS.iter().map(|label| Cell::from(*label))).style(
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );
    let body = week_rows.iter().map(|week| {
        Row::new(week.iter().map(|cell| {
            let has_pending = cell
                .day()
                .is_some_and(|day| pending.binary_search(&day.day).is_ok());
            Cell::from(grid_cell_label(cell, has_pending)).style(grid_cell_style(cell))
        }))
    });
    let calendar_border = if state.mode == AppMode::Calendar {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let calendar = Table::new(body, [Constraint::Length(DAY_COLUMN_WIDTH); 7])
        .header(weekday_row)
        .column_spacing(1)
        .block(
            Block::default()
                .title(state.view.label())
                .borders(Borders::ALL)
                .border_style(calendar_border),
        );
    frame.render_widget(calendar, layout[1]);

    let tasks_border = if state.mode == AppMode::Tasks {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let tasks = Paragraph::new(task_lines(state)).block(
        Block::default()
            .title(render_tasks_title(state))
            .borders(Borders::ALL)
            .border_style(tasks_border),
    );
    frame.render_widget(tasks, layout[2]);

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[3]);

    if state.mode == AppMode::Form {
        let area = centered_rect(60, 40, frame.area());
        frame.render_widget(Clear, area);
        let form = Paragraph::new(render_form_text(&state.form, state.selected))
            .block(Block::default().title("add task").borders(Borders::ALL));
        frame.render_widget(form, area);
    }

    if view_data.help_visible {
        let area = centered_rect(70, 70, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_header_text(state: &AppState) -> String {
    format!(
        "< {} >   today {}   selected {}",
        state.view, state.today, state.selected
    )
}

fn grid_cell_label(cell: &GridCell, has_pending: bool) -> String {
    match cell {
        GridCell::Padding => String::new(),
        GridCell::Day(day) => {
            let mark = if has_pending { PENDING_MARK } else { " " };
            format!("{:>3}{mark}", day.day)
        }
    }
}

fn grid_cell_style(cell: &GridCell) -> Style {
    let GridCell::Day(day) = cell else {
        return Style::default();
    };

    let mut style = Style::default();
    if day.is_today {
        style = style
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    if day.is_selected {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

fn render_tasks_title(state: &AppState) -> String {
    let tasks = state.tasks_for_selected();
    let open = tasks.iter().filter(|task| !task.completed).count();
    format!("tasks for {} ({open}/{} open)", state.selected, tasks.len())
}

fn render_task_line(task: &Task, focused: bool) -> String {
    let cursor = if focused { CURSOR_MARK } else { " " };
    let mark = if task.completed { DONE_MARK } else { OPEN_MARK };
    format!("{cursor} {mark} {}  {}", task.time, task.title)
}

fn task_lines(state: &AppState) -> Vec<Line<'static>> {
    let tasks = state.tasks_for_selected();
    if tasks.is_empty() {
        return vec![Line::from(Span::styled(
            "  no tasks for this date -- press a to add one",
            Style::default().fg(Color::DarkGray),
        ))];
    }

    tasks
        .iter()
        .enumerate()
        .map(|(index, task)| {
            let focused = state.mode == AppMode::Tasks && index == state.task_cursor;
            let mut style = Style::default();
            if task.completed {
                style = style
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT);
            }
            if focused {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Line::from(Span::styled(render_task_line(task, focused), style))
        })
        .collect()
}

fn render_form_text(form: &TaskFormInput, date: Date) -> String {
    let marker = |field: FormField| {
        if form.field == field {
            CURSOR_MARK
        } else {
            " "
        }
    };
    let caret = |field: FormField| if form.field == field { "_" } else { "" };

    [
        format!("  date:  {date}"),
        format!(
            "{} {}: {}{}",
            marker(FormField::Title),
            FormField::Title.label(),
            form.title,
            caret(FormField::Title)
        ),
        format!(
            "{} {}:  {}{}",
            marker(FormField::Time),
            FormField::Time.label(),
            form.time,
            caret(FormField::Time)
        ),
        String::new(),
        "tab switch field | enter save | esc cancel".to_owned(),
    ]
    .join("\n")
}

fn help_overlay_text() -> &'static str {
    "calendar\n  h/l        previous/next day\n  j/k        next/previous week\n  H/L  < >   previous/next month\n  [ ]        previous/next year\n  t          jump to today\n  a          add task on selected date\n  tab/enter  focus task list\n\ntasks\n  j/k        move\n  space/x    toggle done\n  tab/esc    back to calendar\n\nq or ctrl+q quits | ? or esc closes help"
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if view_data.help_visible {
        return String::new();
    }

    let mode = state.mode.label().to_ascii_uppercase();
    let hints = match state.mode {
        AppMode::Calendar => {
            "h/l day | j/k week | H/L month | [/] year | t today | a add | tab tasks | ? | q"
        }
        AppMode::Tasks => "j/k move | space toggle | a add | tab calendar | ? | q",
        AppMode::Form => "tab field | enter save | esc cancel",
    };
    match &state.status_line {
        Some(status) => format!("{mode} | {status} | {hints}"),
        None => format!("{mode} | {hints}"),
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
