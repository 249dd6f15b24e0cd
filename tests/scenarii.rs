//! Shared helpers that populate a mock server for the planner scenarios

use chrono::NaiveDate;

use corkboard::mock_server::MockServer;
use corkboard::planner::Planner;
use corkboard::task::NewTask;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub struct SeededTask {
    pub title: &'static str,
    pub due: Option<(i32, u32, u32)>,
    pub completed: bool,
}

/// What the user's March 2024 looks like before each scenario:
/// two tasks on the 15th, one on the 1st, one completed on the 8th,
/// and one floating task with no due date.
pub fn march_backlog() -> Vec<SeededTask> {
    vec![
        SeededTask { title: "Pay rent",      due: Some((2024, 3, 1)),  completed: false },
        SeededTask { title: "Write report",  due: Some((2024, 3, 15)), completed: false },
        SeededTask { title: "Review report", due: Some((2024, 3, 15)), completed: false },
        SeededTask { title: "Book dentist",  due: Some((2024, 3, 8)),  completed: true },
        SeededTask { title: "Someday: learn to juggle", due: None,     completed: false },
    ]
}

pub fn populate_server(seeds: &[SeededTask]) -> MockServer {
    let server = MockServer::new();
    for seed in seeds {
        let mut new_task = NewTask::new(seed.title);
        if let Some((year, month, day)) = seed.due {
            new_task = new_task.with_due_date(date(year, month, day));
        }
        server.seed_task(new_task, seed.completed);
    }
    server
}

/// A planner over the seeded server, displaying March 2024, with the initial fetch done
pub async fn planner_showing_march(server: MockServer) -> Planner<MockServer> {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut planner = Planner::new_displaying(server, date(2024, 3, 1));
    planner.refresh().await.unwrap();
    planner
}
