//! An in-memory stand-in for the task-planner server
//!
//! Tests (of this crate, and of programs built on it) use a [`MockServer`]
//! where production code uses the HTTP [`Client`](crate::client::Client).
//! It assigns ids the way the real server does, and its
//! [`MockBehaviour`] can make any operation fail on demand.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::Error;
use crate::mock_behaviour::MockBehaviour;
use crate::task::{CompletionStatus, NewTask, Task, TaskId, TaskPatch};
use crate::traits::TaskSource;

#[derive(Debug, Default)]
struct MockState {
    tasks: Vec<Task>,
    last_id: i64,
    list_calls: u32,
}

impl MockState {
    fn next_id(&mut self) -> TaskId {
        self.last_id += 1;
        TaskId::from(self.last_id)
    }
}

/// An in-memory [`TaskSource`]
#[derive(Debug, Default)]
pub struct MockServer {
    state: Mutex<MockState>,
    behaviour: Mutex<MockBehaviour>,
}

impl MockServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behaviour(behaviour: MockBehaviour) -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            behaviour: Mutex::new(behaviour),
        }
    }

    /// Swap the failure-injection behaviour mid-test
    pub fn set_behaviour(&self, behaviour: MockBehaviour) {
        *self.behaviour.lock().unwrap() = behaviour;
    }

    /// Insert a task as if it had been created earlier, bypassing any mocked failure
    pub fn seed_task(&self, new_task: NewTask, completed: bool) -> Task {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let completion_status = if completed {
            CompletionStatus::Completed(Some(Utc::now()))
        } else {
            CompletionStatus::Pending
        };
        let task = Task::new_with_parameters(
            id,
            new_task.title().to_string(),
            new_task.due_date(),
            completion_status,
            Some(Utc::now()),
        );
        state.tasks.push(task.clone());
        task
    }

    /// A copy of what the server currently stores
    pub fn task_snapshot(&self) -> Vec<Task> {
        self.state.lock().unwrap().tasks.clone()
    }

    /// How many times `list_tasks` was called (so tests can assert that month
    /// navigation does not refetch)
    pub fn list_call_count(&self) -> u32 {
        self.state.lock().unwrap().list_calls
    }
}

#[async_trait]
impl TaskSource for MockServer {
    async fn list_tasks(&self) -> Result<Vec<Task>, Error> {
        self.behaviour.lock().unwrap().can_list_tasks()?;

        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        Ok(state.tasks.clone())
    }

    async fn create_task(&self, new_task: NewTask) -> Result<Task, Error> {
        if new_task.title().trim().is_empty() {
            return Err(Error::Validation(String::from("the task title must not be empty")));
        }
        self.behaviour.lock().unwrap().can_create_task()?;

        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let task = Task::new_with_parameters(
            id,
            new_task.title().trim().to_string(),
            new_task.due_date(),
            CompletionStatus::Pending,
            Some(Utc::now()),
        );
        state.tasks.push(task.clone());
        log::debug!("Mock server: created task {}", task.id());
        Ok(task)
    }

    async fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<(), Error> {
        self.behaviour.lock().unwrap().can_update_task()?;

        let mut state = self.state.lock().unwrap();
        match state.tasks.iter_mut().find(|task| task.id() == id) {
            None => Err(Error::NotFound(id)),
            Some(task) => {
                task.apply_patch(&patch);
                // the real server stamps the completion time itself
                if task.completed() {
                    task.set_completion_status(CompletionStatus::Completed(Some(Utc::now())));
                }
                Ok(())
            }
        }
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), Error> {
        self.behaviour.lock().unwrap().can_delete_task()?;

        let mut state = self.state.lock().unwrap();
        let before = state.tasks.len();
        state.tasks.retain(|task| task.id() != id);
        if state.tasks.len() == before {
            return Err(Error::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn assigns_increasing_ids() {
        let server = MockServer::new();
        let first = server.create_task(NewTask::new("Buy milk")).await.unwrap();
        let second = server.create_task(NewTask::new("Pay rent")).await.unwrap();
        assert!(first.id() < second.id());
    }

    #[tokio::test]
    async fn mutating_a_missing_task_is_not_found() {
        let server = MockServer::new();
        let missing = TaskId::from(999);

        match server.update_task(missing, TaskPatch::new().with_title("ghost")).await {
            Err(Error::NotFound(id)) => assert_eq!(id, missing),
            other => panic!("expected NotFound, got {:?}", other),
        }
        match server.delete_task(missing).await {
            Err(Error::NotFound(id)) => assert_eq!(id, missing),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn injected_failures_fire_then_clear() {
        let server = MockServer::with_behaviour(MockBehaviour::fail_now(1));
        assert!(server.list_tasks().await.is_err());
        assert!(server.list_tasks().await.is_ok());
    }
}
