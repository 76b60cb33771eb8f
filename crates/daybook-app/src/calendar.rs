// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Month grid arithmetic. Weeks start on Sunday.

use serde::{Deserialize, Serialize};
use std::fmt;
use time::{Date, Month};

pub const DAYS_PER_WEEK: usize = 7;

pub const WEEKDAY_LABELS: [&str; DAYS_PER_WEEK] =
    ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const MIN_YEAR: i32 = -9999;
const MAX_YEAR: i32 = 9999;

/// The month shown in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthView {
    pub year: i32,
    pub month: Month,
}

impl MonthView {
    pub const fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    pub fn containing(date: Date) -> Self {
        Self::new(date.year(), date.month())
    }

    /// Moves the view by `delta` months, rolling over year boundaries.
    /// Results past the supported year range stick to the first or last month.
    pub fn shift(self, delta: i32) -> Self {
        let base = i64::from(self.year) * 12 + i64::from(self.month as u8) - 1;
        let lowest = i64::from(MIN_YEAR) * 12;
        let highest = i64::from(MAX_YEAR) * 12 + 11;
        let total = (base + i64::from(delta)).clamp(lowest, highest);

        let year = total.div_euclid(12) as i32;
        let month_index = total.rem_euclid(12) as u8;
        let month = Month::January.nth_next(month_index);
        Self::new(year, month)
    }

    pub fn first_day(self) -> Date {
        month_start(self.year, self.month)
    }

    /// Date for `day` in this month, or `None` when the month is shorter.
    pub fn date(self, day: u8) -> Option<Date> {
        Date::from_calendar_date(self.year, self.month, day).ok()
    }

    pub fn days(self) -> u8 {
        days_in_month(self.year, self.month)
    }

    pub fn contains(self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn label(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MonthView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: Date,
    pub day: u8,
    pub is_today: bool,
    pub is_selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCell {
    Padding,
    Day(DayCell),
}

impl GridCell {
    pub fn day(&self) -> Option<&DayCell> {
        match self {
            Self::Padding => None,
            Self::Day(cell) => Some(cell),
        }
    }
}

/// Day count of `month`, read off the last day before the next month starts.
pub fn days_in_month(year: i32, month: Month) -> u8 {
    let next = MonthView::new(year, month).shift(1);
    if next == MonthView::new(year, month) {
        // December of the last supported year.
        return 31;
    }
    let last = next.first_day().previous_day().unwrap_or_else(|| next.first_day());
    last.day()
}

/// Weekday index of the first of the month, 0 for Sunday through 6 for Saturday.
pub fn first_weekday_offset(year: i32, month: Month) -> u8 {
    month_start(year, month).weekday().number_days_from_sunday()
}

/// Builds the grid for `view`: leading padding up to the first weekday, then
/// one cell per day of the month.
pub fn build_grid(view: MonthView, selected: Date, today: Date) -> Vec<GridCell> {
    let offset = usize::from(first_weekday_offset(view.year, view.month));
    let days = view.days();

    let mut cells = Vec::with_capacity(offset + usize::from(days));
    cells.extend(std::iter::repeat_n(GridCell::Padding, offset));
    for day in 1..=days {
        let Some(date) = view.date(day) else {
            continue;
        };
        cells.push(GridCell::Day(DayCell {
            date,
            day,
            is_today: date == today,
            is_selected: date == selected,
        }));
    }
    cells
}

/// Splits grid cells into week rows, padding the last row out to seven cells.
pub fn weeks(cells: &[GridCell]) -> Vec<[GridCell; DAYS_PER_WEEK]> {
    cells
        .chunks(DAYS_PER_WEEK)
        .map(|chunk| {
            let mut row = [GridCell::Padding; DAYS_PER_WEEK];
            row[..chunk.len()].copy_from_slice(chunk);
            row
        })
        .collect()
}

fn month_start(year: i32, month: Month) -> Date {
    Date::from_calendar_date(year.clamp(MIN_YEAR, MAX_YEAR), month, 1).unwrap_or(Date::MIN)
}

#[cfg(test)]
mod tests {
    use super::{GridCell, MonthView, build_grid, days_in_month, first_weekday_offset, weeks};
    use time::{Date, Month};

    fn date(year: i32, month: Month, day: u8) -> Date {
        Date::from_calendar_date(year, month, day).expect("valid test date")
    }

    #[test]
    fn days_in_month_handles_leap_years_and_short_months() {
        assert_eq!(days_in_month(2024, Month::February), 29);
        assert_eq!(days_in_month(2023, Month::February), 28);
        assert_eq!(days_in_month(2024, Month::April), 30);
        assert_eq!(days_in_month(2024, Month::December), 31);
        assert_eq!(days_in_month(1900, Month::February), 28);
        assert_eq!(days_in_month(2000, Month::February), 29);
    }

    #[test]
    fn first_weekday_offset_counts_from_sunday() {
        // 2024-03-01 was a Friday, 2026-11-01 a Sunday.
        assert_eq!(first_weekday_offset(2024, Month::March), 5);
        assert_eq!(first_weekday_offset(2026, Month::November), 0);
        assert_eq!(first_weekday_offset(2026, Month::October), 4);
    }

    #[test]
    fn grid_length_is_offset_plus_days_for_every_month_of_a_year() {
        for month_number in 1..=12_u8 {
            let month = Month::try_from(month_number).expect("valid month");
            let view = MonthView::new(2025, month);
            let anchor = date(2025, Month::January, 1);
            let cells = build_grid(view, anchor, anchor);

            let offset = usize::from(first_weekday_offset(2025, month));
            let days = usize::from(days_in_month(2025, month));
            assert_eq!(cells.len(), offset + days, "month {month}");
            assert!(cells[..offset].iter().all(|cell| *cell == GridCell::Padding));

            let numbered = cells
                .iter()
                .filter_map(GridCell::day)
                .map(|cell| usize::from(cell.day))
                .collect::<Vec<_>>();
            assert_eq!(numbered, (1..=days).collect::<Vec<_>>(), "month {month}");
        }
    }

    #[test]
    fn grid_flags_today_and_selected_by_full_date() {
        let view = MonthView::new(2024, Month::March);
        let cells = build_grid(view, date(2024, Month::March, 15), date(2024, Month::March, 5));

        let today = cells
            .iter()
            .filter_map(GridCell::day)
            .filter(|c| c.is_today)
            .collect::<Vec<_>>();
        let selected = cells
            .iter()
            .filter_map(GridCell::day)
            .filter(|c| c.is_selected)
            .collect::<Vec<_>>();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].day, 5);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].day, 15);
    }

    #[test]
    fn selection_in_another_month_marks_nothing() {
        let view = MonthView::new(2024, Month::April);
        let cells = build_grid(view, date(2024, Month::March, 15), date(2024, Month::March, 5));
        assert!(
            cells
                .iter()
                .filter_map(GridCell::day)
                .all(|cell| !cell.is_selected && !cell.is_today)
        );
    }

    #[test]
    fn shift_rolls_over_year_boundaries() {
        let december = MonthView::new(2024, Month::December);
        assert_eq!(december.shift(1), MonthView::new(2025, Month::January));
        assert_eq!(december.shift(-12), MonthView::new(2023, Month::December));

        let january = MonthView::new(2024, Month::January);
        assert_eq!(january.shift(-1), MonthView::new(2023, Month::December));
        assert_eq!(january.shift(25), MonthView::new(2026, Month::February));
        assert_eq!(january.shift(-25), MonthView::new(2021, Month::December));
    }

    #[test]
    fn shift_is_invertible() {
        let views = [
            MonthView::new(2024, Month::January),
            MonthView::new(2024, Month::February),
            MonthView::new(1999, Month::December),
        ];
        for view in views {
            for delta in [-13, -1, 1, 12, 40] {
                assert_eq!(view.shift(delta).shift(-delta), view, "{view} by {delta}");
            }
        }
    }

    #[test]
    fn shift_saturates_at_supported_range() {
        let last = MonthView::new(9999, Month::December);
        assert_eq!(last.shift(1), last);
        assert_eq!(days_in_month(9999, Month::December), 31);
        let first = MonthView::new(-9999, Month::January);
        assert_eq!(first.shift(-3), first);
    }

    #[test]
    fn weeks_pads_the_final_row() {
        let view = MonthView::new(2024, Month::March);
        let first = date(2024, Month::March, 1);
        let cells = build_grid(view, first, first);
        let rows = weeks(&cells);

        // 5 padding cells + 31 days = 36 cells -> 6 rows.
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0][5].day().map(|cell| cell.day), Some(1));
        assert_eq!(rows[5][0].day().map(|cell| cell.day), Some(31));
        assert!(rows[5][1..].iter().all(|cell| *cell == GridCell::Padding));
    }

    #[test]
    fn label_spells_out_month_and_year() {
        assert_eq!(MonthView::new(2026, Month::October).label(), "October 2026");
    }
}
