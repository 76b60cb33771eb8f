// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use daybook_app::{TaskId, TaskStore, TaskTime};
use time::{Date, Duration, Month};

const REFERENCE_YEAR: i32 = 2024;

const VERBS: [&str; 14] = [
    "Call", "Email", "Buy", "Pick up", "Drop off", "Book", "Review", "Pay", "Clean", "Plan",
    "Water", "Fix", "Renew", "Return",
];

const OBJECTS: [&str; 16] = [
    "groceries",
    "the plumber",
    "library books",
    "plants",
    "rent",
    "car insurance",
    "train tickets",
    "the garage",
    "birthday gift",
    "dentist visit",
    "passport",
    "quarterly report",
    "gym membership",
    "dry cleaning",
    "the bike",
    "team offsite",
];

/// A task as generated, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeTask {
    pub title: String,
    pub date: Date,
    pub time: TaskTime,
    pub completed: bool,
}

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn one_in(&mut self, n: usize) -> bool {
        self.int_n(n) == 0
    }
}

/// Seeded generator of plausible tasks; the same seed always yields the same tasks.
#[derive(Debug, Clone)]
pub struct TaskFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl TaskFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn title(&mut self) -> String {
        format!("{} {}", self.pick(&VERBS), self.pick(&OBJECTS))
    }

    /// Quarter-hour times between 06:00 and 21:45.
    pub fn time(&mut self) -> TaskTime {
        let hour = 6 + self.rng.int_n(16) as u8;
        let minute = 15 * self.rng.int_n(4) as u8;
        TaskTime::from_hm(hour, minute).unwrap_or_default()
    }

    pub fn date_in_month(&mut self, year: i32, month: Month) -> Date {
        let first = fixture_date(year, month, 1);
        let days = daybook_app::days_in_month(year, month);
        let offset = self.rng.int_n(usize::from(days)) as i64;
        first.checked_add(Duration::days(offset)).unwrap_or(first)
    }

    pub fn task_on(&mut self, date: Date) -> FakeTask {
        FakeTask {
            title: self.title(),
            date,
            time: self.time(),
            completed: self.rng.one_in(4),
        }
    }

    pub fn task_in_month(&mut self, year: i32, month: Month) -> FakeTask {
        let date = self.date_in_month(year, month);
        self.task_on(date)
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

/// Adds `tasks` to `store` in order, returning the assigned ids.
pub fn populate(store: &mut TaskStore, tasks: &[FakeTask]) -> Result<Vec<TaskId>> {
    let mut ids = Vec::with_capacity(tasks.len());
    for task in tasks {
        let id = store
            .add_task(&task.title, task.date, task.time)
            .with_context(|| format!("fake task {:?} was rejected", task.title))?;
        if task.completed {
            store.toggle_completion(id);
        }
        ids.push(id);
    }
    Ok(ids)
}

pub fn fixture_date(year: i32, month: Month, day: u8) -> Date {
    Date::from_calendar_date(year, month, day).expect("valid calendar date")
}

pub fn fixture_time(raw: &str) -> TaskTime {
    TaskTime::parse(raw).expect("valid fixture time")
}

/// The date most fixtures treat as "today".
pub fn fixture_today() -> Date {
    fixture_date(REFERENCE_YEAR, Month::March, 5)
}

#[cfg(test)]
mod tests {
    use super::{TaskFaker, fixture_today, populate};
    use daybook_app::TaskStore;
    use time::Month;

    #[test]
    fn new_deterministic_seed() {
        let mut left = TaskFaker::new(42);
        let mut right = TaskFaker::new(42);

        for _ in 0..10 {
            assert_eq!(
                left.task_in_month(2024, Month::March),
                right.task_in_month(2024, Month::March)
            );
        }
    }

    #[test]
    fn zero_seed_is_normalized() {
        assert_eq!(TaskFaker::new(0).seed(), 1);
    }

    #[test]
    fn dates_stay_inside_month() {
        let mut faker = TaskFaker::new(7);
        for _ in 0..200 {
            let date = faker.date_in_month(2024, Month::February);
            assert_eq!(date.month(), Month::February);
            assert!((1..=29).contains(&date.day()));
        }
    }

    #[test]
    fn times_land_on_quarter_hours() {
        let mut faker = TaskFaker::new(9);
        for _ in 0..200 {
            let time = faker.time();
            assert!((6..=21).contains(&time.hour()));
            assert_eq!(time.minute() % 15, 0);
        }
    }

    #[test]
    fn populate_stores_every_task() -> anyhow::Result<()> {
        let mut faker = TaskFaker::new(3);
        let tasks = (0..12)
            .map(|_| faker.task_on(fixture_today()))
            .collect::<Vec<_>>();

        let mut store = TaskStore::new();
        let ids = populate(&mut store, &tasks)?;
        assert_eq!(ids.len(), 12);
        assert_eq!(store.tasks_for_date(fixture_today()).len(), 12);
        let completed = tasks.iter().filter(|task| task.completed).count();
        assert_eq!(store.iter().filter(|task| task.completed).count(), completed);
        Ok(())
    }
}
