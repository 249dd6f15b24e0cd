//! Month-grid arithmetic for the calendar view
//!
//! Everything here works on plain calendar dates (year/month/day triples).
//! Two tasks are "on the same day" exactly when those triples are equal;
//! no timezone or time-of-day is ever involved.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

use crate::task::Task;

/// The rendered days of one month: every date of the month in ascending order,
/// plus how many blank slots a week-aligned rendering needs before the 1st.
/// Weeks start on Sunday.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthGrid {
    year: i32,
    month: u32,
    days: Vec<NaiveDate>,
}

impl MonthGrid {
    /// Build the grid for a given month, or None if `month` is not in 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let day_count = days_in_month(year, month)? as usize;
        let days: Vec<NaiveDate> = first.iter_days().take(day_count).collect();
        Some(Self { year, month, days })
    }

    /// The grid of the month containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
            .unwrap(/* this cannot panic since the year and month come from a valid date */)
    }

    pub fn year(&self) -> i32           { self.year }
    pub fn month(&self) -> u32          { self.month }
    pub fn days(&self) -> &[NaiveDate]  { &self.days }

    /// How many blank slots precede the 1st in a Sunday-aligned week row
    pub fn leading_blanks(&self) -> usize {
        self.days[0].weekday().num_days_from_sunday() as usize
    }

    /// The month chunked into week rows of 7 slots, None for the blanks
    /// before the 1st and after the last day
    pub fn weeks(&self) -> Vec<Vec<Option<NaiveDate>>> {
        let mut slots: Vec<Option<NaiveDate>> = Vec::new();
        slots.resize(self.leading_blanks(), None);
        slots.extend(self.days.iter().map(|day| Some(*day)));
        while slots.len() % 7 != 0 {
            slots.push(None);
        }

        slots.chunks(7).map(|week| week.to_vec()).collect()
    }
}

/// The number of days in a month, or None if `month` is not in 1..=12
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = match month {
        12 => NaiveDate::from_ymd_opt(year + 1, 1, 1)?,
        _ => NaiveDate::from_ymd_opt(year, month + 1, 1)?,
    };
    Some(next_first.signed_duration_since(first).num_days() as u32)
}

/// The subset of `tasks` due on `date`, in the order they appear in `tasks`.
///
/// This is always recomputed from the full collection, never stored, so it
/// cannot diverge from it.
pub fn tasks_on(tasks: &[Task], date: NaiveDate) -> Vec<&Task> {
    tasks.iter().filter(|task| task.due_date() == Some(date)).collect()
}

/// Every day at least one task is due on. Used for the day-has-task markers.
pub fn days_with_tasks(tasks: &[Task]) -> HashSet<NaiveDate> {
    tasks.iter().filter_map(|task| task.due_date()).collect()
}
