//! The backend-computed completion summary
//!
//! Every number here was aggregated server-side; the only work this module does
//! is reshaping for display (an ordered histogram, proportional bar heights).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One user's aggregate task statistics, as served by the analytics endpoint
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsOverview {
    total_tasks: u32,
    completed_tasks: u32,
    pending_tasks: u32,
    overdue_tasks: u32,

    /// How many tasks were created on each of the last days, keyed by calendar date
    #[serde(default)]
    weekly_task_distribution: BTreeMap<NaiveDate, u32>,
}

impl AnalyticsOverview {
    pub fn total_tasks(&self) -> u32     { self.total_tasks }
    pub fn completed_tasks(&self) -> u32 { self.completed_tasks }
    pub fn pending_tasks(&self) -> u32   { self.pending_tasks }
    pub fn overdue_tasks(&self) -> u32   { self.overdue_tasks }

    /// The week's creation counts, oldest day first
    pub fn weekly_histogram(&self) -> Vec<(NaiveDate, u32)> {
        self.weekly_task_distribution
            .iter()
            .map(|(date, count)| (*date, *count))
            .collect()
    }

    /// Scale the histogram so the busiest day is exactly `max_height` units tall.
    /// Days with no tasks stay at zero; days with any task are never flattened to zero.
    pub fn bar_heights(&self, max_height: u32) -> Vec<(NaiveDate, u32)> {
        let busiest = self
            .weekly_task_distribution
            .values()
            .copied()
            .max()
            .unwrap_or(0);
        if busiest == 0 {
            return self.weekly_histogram();
        }

        self.weekly_histogram()
            .into_iter()
            .map(|(date, count)| {
                // ceiling division keeps small nonzero counts visible
                (date, (count * max_height + busiest - 1) / busiest)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overview() -> AnalyticsOverview {
        serde_json::from_value(serde_json::json!({
            "total_tasks": 12,
            "completed_tasks": 5,
            "pending_tasks": 7,
            "overdue_tasks": 2,
            "weekly_task_distribution": {
                "2024-03-13": 4,
                "2024-03-11": 1,
                "2024-03-12": 0
            },
            "username": "john",
            "user_id": 3
        }))
        .unwrap()
    }

    #[test]
    fn parses_the_backend_payload_and_orders_the_week() {
        let overview = overview();
        assert_eq!(overview.total_tasks(), 12);
        assert_eq!(overview.overdue_tasks(), 2);

        let days: Vec<u32> = overview.weekly_histogram().iter().map(|(_, count)| *count).collect();
        assert_eq!(days, [1, 0, 4]); // oldest first, regardless of payload order
    }

    #[test]
    fn bar_heights_scale_to_the_busiest_day() {
        let heights: Vec<u32> = overview().bar_heights(20).iter().map(|(_, height)| *height).collect();
        assert_eq!(heights, [5, 0, 20]);
    }

    #[test]
    fn an_empty_week_stays_flat() {
        let overview: AnalyticsOverview = serde_json::from_value(serde_json::json!({
            "total_tasks": 0,
            "completed_tasks": 0,
            "pending_tasks": 0,
            "overdue_tasks": 0
        }))
        .unwrap();
        assert!(overview.bar_heights(20).is_empty());
    }
}
