//! Some utility functions

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

use crate::analytics::AnalyticsOverview;
use crate::calendar::MonthGrid;
use crate::task::Task;

/// A debug utility that pretty-prints a task
pub fn print_task(task: &Task) {
    let completion = if task.completed() { "✓" } else { " " };
    let due = match task.due_date() {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => String::from("          "),
    };
    println!("    {} {}  {}\t(id {})", completion, due, task.title(), task.id());
}

/// A debug utility that pretty-prints a whole task list
pub fn print_task_list(tasks: &[Task]) {
    for task in tasks {
        print_task(task);
    }
}

/// A debug utility that prints a month grid, marking the days that have tasks with a `*`
pub fn print_month(grid: &MonthGrid, busy_days: &HashSet<NaiveDate>) {
    println!("{:^28}", grid.days()[0].format("%B %Y"));
    println!(" Sun Mon Tue Wed Thu Fri Sat");

    for week in grid.weeks() {
        let mut line = String::new();
        for slot in week {
            match slot {
                None => line.push_str("    "),
                Some(day) => {
                    let marker = if busy_days.contains(&day) { '*' } else { ' ' };
                    line.push_str(&format!(" {:>2}{}", day.day(), marker));
                }
            }
        }
        println!("{}", line);
    }
}

/// A debug utility that prints the analytics overview with a text bar chart
pub fn print_overview(overview: &AnalyticsOverview) {
    println!(
        "{} tasks: {} completed, {} pending, {} overdue",
        overview.total_tasks(),
        overview.completed_tasks(),
        overview.pending_tasks(),
        overview.overdue_tasks(),
    );

    let heights = overview.bar_heights(30);
    for ((date, count), (_, height)) in overview.weekly_histogram().iter().zip(heights.iter()) {
        println!("    {} {:>3} {}", date, count, "#".repeat(*height as usize));
    }
}
