// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};

use crate::TaskTime;

const TIME_FIELD_MAX_CHARS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Time,
}

impl FormField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Time => "time",
        }
    }
}

/// Text buffers behind the add-task form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFormInput {
    pub title: String,
    pub time: String,
    pub field: FormField,
}

impl TaskFormInput {
    pub fn blank(default_time: TaskTime) -> Self {
        Self {
            title: String::new(),
            time: default_time.to_string(),
            field: FormField::Title,
        }
    }

    pub fn push_char(&mut self, value: char) {
        match self.field {
            FormField::Title => {
                if !value.is_control() {
                    self.title.push(value);
                }
            }
            FormField::Time => {
                if (value.is_ascii_digit() || value == ':')
                    && self.time.chars().count() < TIME_FIELD_MAX_CHARS
                {
                    self.time.push(value);
                }
            }
        }
    }

    pub fn backspace(&mut self) {
        match self.field {
            FormField::Title => {
                self.title.pop();
            }
            FormField::Time => {
                self.time.pop();
            }
        }
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            FormField::Title => FormField::Time,
            FormField::Time => FormField::Title,
        };
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Checks the time field and returns the parsed time. Blank titles are
    /// not an error here; submitting one is silently ignored.
    pub fn validate(&self) -> Result<TaskTime> {
        TaskTime::parse(&self.time).context("task time")
    }
}

#[cfg(test)]
mod tests {
    use super::{FormField, TaskFormInput};
    use crate::TaskTime;

    #[test]
    fn blank_form_starts_on_title_with_default_time() {
        let form = TaskFormInput::blank(TaskTime::default());
        assert_eq!(form.field, FormField::Title);
        assert_eq!(form.time, "09:00");
        assert!(form.title.is_empty());
        assert!(!form.has_title());
    }

    #[test]
    fn typing_goes_to_focused_field() -> anyhow::Result<()> {
        let mut form = TaskFormInput::blank(TaskTime::default());
        for c in "Buy milk".chars() {
            form.push_char(c);
        }
        form.next_field();
        form.backspace();
        form.backspace();
        form.push_char('3');
        form.push_char('0');

        assert_eq!(form.title, "Buy milk");
        assert_eq!(form.time, "09:30");
        assert_eq!(form.validate()?.to_string(), "09:30");
        Ok(())
    }

    #[test]
    fn time_field_ignores_letters_and_overflow() {
        let mut form = TaskFormInput::blank(TaskTime::default());
        form.next_field();
        form.push_char('x');
        form.push_char('1');
        assert_eq!(form.time, "09:00");
    }

    #[test]
    fn title_field_ignores_control_characters() {
        let mut form = TaskFormInput::blank(TaskTime::default());
        form.push_char('\t');
        form.push_char('a');
        assert_eq!(form.title, "a");
    }

    #[test]
    fn next_field_cycles() {
        let mut form = TaskFormInput::blank(TaskTime::default());
        form.next_field();
        assert_eq!(form.field, FormField::Time);
        form.next_field();
        assert_eq!(form.field, FormField::Title);
    }

    #[test]
    fn validate_reports_bad_time() {
        let mut form = TaskFormInput::blank(TaskTime::default());
        form.time = "9".to_owned();
        let error = form.validate().expect_err("bad time should fail");
        assert!(format!("{error:#}").contains("HH:MM"));
    }

    #[test]
    fn blank_title_still_validates() {
        let form = TaskFormInput::blank(TaskTime::default());
        assert!(form.validate().is_ok());
    }
}
