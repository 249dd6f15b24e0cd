//! The seam between the planner and whatever provides its tasks

use async_trait::async_trait;

use crate::error::Error;
use crate::task::{NewTask, Task, TaskId, TaskPatch};

/// A source of tasks for the authenticated user.
///
/// The planner is generic over this trait: the real implementation is the HTTP
/// [`Client`](crate::client::Client), and tests use the in-memory
/// [`MockServer`](crate::mock_server::MockServer).
#[async_trait]
pub trait TaskSource {
    /// Returns every task belonging to the authenticated user.
    /// This is a network round-trip in the real implementation: it can be a long process, and it can fail
    /// (with [`Error::Auth`] when the credential is missing or expired, [`Error::Network`] on transport failure).
    async fn list_tasks(&self) -> Result<Vec<Task>, Error>;

    /// Create a task and return it as the server recorded it
    /// (server-assigned id and timestamps, server-computed suggestions).
    /// Empty titles are rejected with [`Error::Validation`] before any call is made.
    async fn create_task(&self, new_task: NewTask) -> Result<Task, Error>;

    /// Apply a partial update to an existing task.
    /// The caller must merge the patch into its local copy only after this succeeds.
    /// Fails with [`Error::NotFound`] when the id no longer exists server-side.
    async fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<(), Error>;

    /// Delete a task.
    /// The caller must remove it from its local collection only after this succeeds.
    /// Fails with [`Error::NotFound`] when the id no longer exists server-side.
    async fn delete_task(&self, id: TaskId) -> Result<(), Error>;
}
