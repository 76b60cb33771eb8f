// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use time::macros::time;
use time::{Date, Time};

use crate::ids::TaskId;

/// Time of day for a task, kept at minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskTime(Time);

impl TaskTime {
    pub const DEFAULT: Self = Self(time!(9:00));

    pub fn from_hm(hour: u8, minute: u8) -> Result<Self> {
        match Time::from_hms(hour, minute, 0) {
            Ok(time) => Ok(Self(time)),
            Err(_) => bail!("time {hour:02}:{minute:02} is out of range; use 00:00 through 23:59"),
        }
    }

    /// Parses `H:MM` or `HH:MM` on a 24 hour clock.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let Some((hour, minute)) = trimmed.split_once(':') else {
            bail!("invalid time {raw:?}; use HH:MM (for example 09:00)");
        };
        let well_formed = (1..=2).contains(&hour.len())
            && minute.len() == 2
            && hour.chars().chain(minute.chars()).all(|c| c.is_ascii_digit());
        if !well_formed {
            bail!("invalid time {raw:?}; use HH:MM (for example 09:00)");
        }

        let hour: u8 = hour.parse()?;
        let minute: u8 = minute.parse()?;
        Self::from_hm(hour, minute)
    }

    pub fn hour(self) -> u8 {
        self.0.hour()
    }

    pub fn minute(self) -> u8 {
        self.0.minute()
    }
}

impl Default for TaskTime {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for TaskTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub date: Date,
    pub time: TaskTime,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppMode {
    Calendar,
    Tasks,
    Form,
}

impl AppMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::Tasks => "tasks",
            Self::Form => "add",
        }
    }
}
