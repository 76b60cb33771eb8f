// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::{Date, Duration};

use crate::{MonthView, Task, TaskId, TaskTime};

/// In-memory task collection, kept in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    last_id: i64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a task and returns its id. Blank titles are refused with `None`.
    pub fn add_task(&mut self, title: &str, date: Date, time: TaskTime) -> Option<TaskId> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }

        self.last_id += 1;
        let id = TaskId::new(self.last_id);
        self.tasks.push(Task {
            id,
            title: title.to_owned(),
            date,
            time,
            completed: false,
        });
        Some(id)
    }

    /// Flips the completed flag and returns the new value, or `None` for an unknown id.
    pub fn toggle_completion(&mut self, id: TaskId) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        task.completed = !task.completed;
        Some(task.completed)
    }

    /// Tasks due on `date`, earliest first. Equal times keep insertion order.
    pub fn tasks_for_date(&self, date: Date) -> Vec<&Task> {
        let mut tasks = self
            .tasks
            .iter()
            .filter(|task| task.date == date)
            .collect::<Vec<_>>();
        tasks.sort_by_key(|task| task.time);
        tasks
    }

    pub fn pending_count_for_date(&self, date: Date) -> usize {
        self.tasks
            .iter()
            .filter(|task| task.date == date && !task.completed)
            .count()
    }

    /// Days of `view` that carry at least one open task.
    pub fn days_with_pending(&self, view: MonthView) -> Vec<u8> {
        let mut days = self
            .tasks
            .iter()
            .filter(|task| !task.completed && view.contains(task.date))
            .map(|task| task.date.day())
            .collect::<Vec<_>>();
        days.sort_unstable();
        days.dedup();
        days
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Fills the store with a small agenda around `today` for demo sessions.
    pub fn seed_demo(&mut self, today: Date) {
        const DEMO_TASKS: [(i64, u8, u8, &str, bool); 8] = [
            (-2, 18, 0, "Return library books", true),
            (-1, 7, 30, "Morning run", true),
            (0, 9, 0, "Team stand-up", false),
            (0, 12, 30, "Lunch with Sam", false),
            (0, 16, 45, "Pick up dry cleaning", false),
            (1, 8, 15, "Dentist appointment", false),
            (3, 19, 0, "Book club", false),
            (9, 10, 0, "Renew car registration", false),
        ];

        for (offset, hour, minute, title, completed) in DEMO_TASKS {
            let Some(date) = today.checked_add(Duration::days(offset)) else {
                continue;
            };
            let Ok(time) = TaskTime::from_hm(hour, minute) else {
                continue;
            };
            if let Some(id) = self.add_task(title, date, time)
                && completed
            {
                self.toggle_completion(id);
            }
        }
        tracing::debug!(count = self.len(), %today, "seeded demo tasks");
    }
}

#[cfg(test)]
mod tests {
    use super::TaskStore;
    use crate::{MonthView, TaskId, TaskTime};
    use anyhow::Result;
    use time::{Date, Month};

    fn march(day: u8) -> Date {
        Date::from_calendar_date(2024, Month::March, day).expect("valid march date")
    }

    fn times(store: &TaskStore, date: Date) -> Vec<String> {
        store
            .tasks_for_date(date)
            .iter()
            .map(|task| task.time.to_string())
            .collect()
    }

    #[test]
    fn add_task_rejects_blank_titles() -> Result<()> {
        let mut store = TaskStore::new();
        assert_eq!(store.add_task("", march(5), TaskTime::parse("09:00")?), None);
        assert_eq!(store.add_task("   \t", march(5), TaskTime::parse("09:00")?), None);
        assert!(store.is_empty());
        Ok(())
    }

    #[test]
    fn add_task_creates_open_task() -> Result<()> {
        let mut store = TaskStore::new();
        let id = store
            .add_task("Buy milk", march(5), TaskTime::parse("09:00")?)
            .expect("task created");

        assert_eq!(store.len(), 1);
        let task = store.get(id).expect("task stored");
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.date, march(5));
        assert_eq!(task.time.to_string(), "09:00");
        assert!(!task.completed);
        Ok(())
    }

    #[test]
    fn identical_tasks_are_kept_as_distinct_entries() -> Result<()> {
        let mut store = TaskStore::new();
        let time = TaskTime::parse("10:00")?;
        let first = store.add_task("Call mom", march(5), time);
        let second = store.add_task("Call mom", march(5), time);

        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
        Ok(())
    }

    #[test]
    fn titles_are_trimmed() -> Result<()> {
        let mut store = TaskStore::new();
        let id = store
            .add_task("  Water plants \n", march(5), TaskTime::default())
            .expect("task created");
        assert_eq!(store.get(id).map(|task| task.title.as_str()), Some("Water plants"));
        Ok(())
    }

    #[test]
    fn toggle_twice_restores_state() -> Result<()> {
        let mut store = TaskStore::new();
        let id = store
            .add_task("Buy milk", march(5), TaskTime::default())
            .expect("task created");

        assert_eq!(store.toggle_completion(id), Some(true));
        assert_eq!(store.toggle_completion(id), Some(false));
        assert_eq!(store.get(id).map(|task| task.completed), Some(false));
        Ok(())
    }

    #[test]
    fn toggle_unknown_id_changes_nothing() {
        let mut store = TaskStore::new();
        store.add_task("Buy milk", march(5), TaskTime::default());
        let before = store.clone();

        assert_eq!(store.toggle_completion(TaskId::new(404)), None);
        assert_eq!(store, before);
    }

    #[test]
    fn tasks_for_date_sorts_by_time_and_keeps_ties_stable() -> Result<()> {
        let mut store = TaskStore::new();
        store.add_task("late", march(5), TaskTime::parse("10:00")?);
        store.add_task("first nine", march(5), TaskTime::parse("09:00")?);
        store.add_task("second nine", march(5), TaskTime::parse("09:00")?);

        let titles = store
            .tasks_for_date(march(5))
            .iter()
            .map(|task| task.title.as_str())
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["first nine", "second nine", "late"]);
        Ok(())
    }

    #[test]
    fn tasks_for_date_filters_other_days() -> Result<()> {
        let mut store = TaskStore::new();
        store.add_task("Meeting", march(5), TaskTime::parse("14:00")?);
        store.add_task("Breakfast", march(5), TaskTime::parse("08:30")?);

        assert_eq!(times(&store, march(5)), vec!["08:30", "14:00"]);
        assert!(store.tasks_for_date(march(6)).is_empty());
        Ok(())
    }

    #[test]
    fn pending_markers_skip_completed_tasks() -> Result<()> {
        let mut store = TaskStore::new();
        let done = store
            .add_task("Done", march(2), TaskTime::default())
            .expect("task created");
        store.toggle_completion(done);
        store.add_task("Open", march(9), TaskTime::default());
        store.add_task("Open again", march(9), TaskTime::default());
        store.add_task(
            "Next month",
            Date::from_calendar_date(2024, Month::April, 9)?,
            TaskTime::default(),
        );

        assert_eq!(store.pending_count_for_date(march(2)), 0);
        assert_eq!(store.pending_count_for_date(march(9)), 2);
        assert_eq!(
            store.days_with_pending(MonthView::new(2024, Month::March)),
            vec![9]
        );
        Ok(())
    }

    #[test]
    fn seed_demo_populates_today() {
        let mut store = TaskStore::new();
        store.seed_demo(march(5));

        assert!(!store.is_empty());
        assert!(!store.tasks_for_date(march(5)).is_empty());
        assert!(store.iter().any(|task| task.completed));
    }
}
