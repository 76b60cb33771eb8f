// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::{Date, Duration};

use crate::calendar::{GridCell, MonthView, build_grid};
use crate::forms::TaskFormInput;
use crate::tasks::TaskStore;
use crate::{AppMode, Task, TaskId, TaskTime};

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub view: MonthView,
    pub selected: Date,
    pub today: Date,
    pub tasks: TaskStore,
    pub form: TaskFormInput,
    /// Prefilled in the form; follows the time of the last added task.
    pub default_time: TaskTime,
    pub task_cursor: usize,
    pub status_line: Option<String>,
}

impl AppState {
    pub fn new(today: Date) -> Self {
        Self {
            mode: AppMode::Calendar,
            view: MonthView::containing(today),
            selected: today,
            today,
            tasks: TaskStore::new(),
            form: TaskFormInput::blank(TaskTime::DEFAULT),
            default_time: TaskTime::DEFAULT,
            task_cursor: 0,
            status_line: None,
        }
    }

    pub fn with_default_time(mut self, default_time: TaskTime) -> Self {
        self.default_time = default_time;
        self.form = TaskFormInput::blank(default_time);
        self
    }

    /// Opens on `date` instead of today; the view follows it.
    pub fn with_selected(mut self, date: Date) -> Self {
        self.selected = date;
        self.view = MonthView::containing(date);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    AddTask {
        title: String,
        date: Date,
        time: TaskTime,
    },
    ToggleTask(TaskId),
    SelectDate(Date),
    ChangeMonth(i32),
    SelectDay(u8),
    MoveSelection(i64),
    GoToToday,
    SetToday(Date),
    OpenAddTask,
    CancelAddTask,
    SubmitAddTask,
    FormInput(char),
    FormBackspace,
    FormNextField,
    FocusTasks,
    FocusCalendar,
    MoveTaskCursor(isize),
    ToggleSelectedTask,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    MonthChanged(MonthView),
    SelectedDateChanged(Date),
    TodayChanged(Date),
    TaskAdded(TaskId),
    TaskToggled { id: TaskId, completed: bool },
    FormEdited,
    TaskCursorMoved(usize),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        tracing::trace!(?command, "dispatch");
        match command {
            AppCommand::AddTask { title, date, time } => self.add_task(&title, date, time),
            AppCommand::ToggleTask(id) => self.toggle_task(id),
            AppCommand::SelectDate(date) => self.select_date(date),
            AppCommand::ChangeMonth(delta) => {
                self.view = self.view.shift(delta);
                vec![AppEvent::MonthChanged(self.view)]
            }
            AppCommand::SelectDay(day) => {
                let day = day.clamp(1, self.view.days());
                match self.view.date(day) {
                    Some(date) => self.select_date(date),
                    None => Vec::new(),
                }
            }
            AppCommand::MoveSelection(days) => {
                let target = days
                    .checked_mul(SECONDS_PER_DAY)
                    .map(Duration::seconds)
                    .and_then(|step| self.selected.checked_add(step));
                match target {
                    Some(date) => self.select_and_follow(date),
                    None => Vec::new(),
                }
            }
            AppCommand::GoToToday => self.select_and_follow(self.today),
            AppCommand::SetToday(date) => {
                if date == self.today {
                    return Vec::new();
                }
                self.today = date;
                vec![AppEvent::TodayChanged(date)]
            }
            AppCommand::OpenAddTask => {
                self.form = TaskFormInput::blank(self.default_time);
                self.mode = AppMode::Form;
                vec![
                    AppEvent::ModeChanged(self.mode),
                    self.set_status(&format!("new task for {}", self.selected)),
                ]
            }
            AppCommand::CancelAddTask => {
                self.form = TaskFormInput::blank(self.default_time);
                self.mode = AppMode::Calendar;
                vec![
                    AppEvent::ModeChanged(self.mode),
                    self.set_status("add canceled"),
                ]
            }
            AppCommand::SubmitAddTask => self.submit_form(),
            AppCommand::FormInput(value) => {
                self.form.push_char(value);
                vec![AppEvent::FormEdited]
            }
            AppCommand::FormBackspace => {
                self.form.backspace();
                vec![AppEvent::FormEdited]
            }
            AppCommand::FormNextField => {
                self.form.next_field();
                vec![AppEvent::FormEdited]
            }
            AppCommand::FocusTasks => {
                if self.tasks_for_selected().is_empty() {
                    return vec![self.set_status("no tasks for this date")];
                }
                self.mode = AppMode::Tasks;
                self.task_cursor = 0;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::FocusCalendar => {
                self.mode = AppMode::Calendar;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::MoveTaskCursor(delta) => {
                let len = self.tasks_for_selected().len();
                if len == 0 {
                    return Vec::new();
                }
                let max = len.saturating_sub(1) as isize;
                self.task_cursor = (self.task_cursor as isize)
                    .saturating_add(delta)
                    .clamp(0, max) as usize;
                vec![AppEvent::TaskCursorMoved(self.task_cursor)]
            }
            AppCommand::ToggleSelectedTask => match self.selected_task().map(|task| task.id) {
                Some(id) => self.toggle_task(id),
                None => Vec::new(),
            },
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    pub fn grid(&self) -> Vec<GridCell> {
        build_grid(self.view, self.selected, self.today)
    }

    pub fn tasks_for_selected(&self) -> Vec<&Task> {
        self.tasks.tasks_for_date(self.selected)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks_for_selected().get(self.task_cursor).copied()
    }

    fn add_task(&mut self, title: &str, date: Date, time: TaskTime) -> Vec<AppEvent> {
        match self.tasks.add_task(title, date, time) {
            Some(id) => {
                tracing::debug!(%id, %date, %time, "task added");
                vec![AppEvent::TaskAdded(id)]
            }
            None => Vec::new(),
        }
    }

    fn toggle_task(&mut self, id: TaskId) -> Vec<AppEvent> {
        match self.tasks.toggle_completion(id) {
            Some(completed) => vec![AppEvent::TaskToggled { id, completed }],
            None => Vec::new(),
        }
    }

    fn submit_form(&mut self) -> Vec<AppEvent> {
        if !self.form.has_title() {
            return Vec::new();
        }
        let time = match self.form.validate() {
            Ok(time) => time,
            Err(error) => return vec![self.set_status(&format!("{error:#}"))],
        };
        let title = self.form.title.clone();
        let mut events = self.add_task(&title, self.selected, time);
        if events.is_empty() {
            return events;
        }

        self.default_time = time;
        self.form = TaskFormInput::blank(time);
        self.mode = AppMode::Calendar;
        events.push(AppEvent::ModeChanged(self.mode));
        events.push(self.set_status("task added"));
        events
    }

    fn select_date(&mut self, date: Date) -> Vec<AppEvent> {
        self.selected = date;
        self.task_cursor = 0;
        vec![AppEvent::SelectedDateChanged(date)]
    }

    fn select_and_follow(&mut self, date: Date) -> Vec<AppEvent> {
        let mut events = self.select_date(date);
        let view = MonthView::containing(date);
        if view != self.view {
            self.view = view;
            events.push(AppEvent::MonthChanged(view));
        }
        events
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
