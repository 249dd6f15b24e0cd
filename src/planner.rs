//! The calendar view model
//!
//! A [`Planner`] owns the in-memory task collection, the displayed month and the
//! current selection, and coordinates every change with a [`TaskSource`]. \
//! Mutations are round-tripped through the source first: the owned collection is
//! only touched in the success continuation, so a failed call leaves the planner
//! exactly as it was and the user can retry.

use std::collections::HashSet;

use chrono::{Datelike, Months, NaiveDate, Utc};

use crate::calendar::{self, MonthGrid};
use crate::error::Error;
use crate::overlay::{DayOverlay, OverlaySubmit};
use crate::task::{CompletionStatus, NewTask, Task, TaskId, TaskPatch};
use crate::traits::TaskSource;

/// Where the planner currently is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlannerState {
    /// A task refresh is in flight (initial load, or an explicit [`Planner::refresh`])
    Loading,
    /// Showing the month grid, no overlay open
    Idle,
    /// The last refresh failed; the collection is empty until a manual retry succeeds
    LoadFailed,
    /// A date is selected and its overlay is open (see [`Planner::overlay`] for the sub-mode)
    OverlayOpen,
}

/// The calendar view model. Generic over its source, so that tests can swap the
/// HTTP [`Client`](crate::client::Client) for a [`MockServer`](crate::mock_server::MockServer).
pub struct Planner<S>
where
    S: TaskSource + Sync + Send,
{
    source: S,

    /// The one authoritative in-memory copy of the user's tasks.
    /// Nothing else in this crate stores tasks; views are derived on demand.
    tasks: Vec<Task>,

    /// The first day of the displayed month
    displayed_month: NaiveDate,
    selected_day: Option<NaiveDate>,
    overlay: Option<DayOverlay>,
    state: PlannerState,
}

impl<S> Planner<S>
where
    S: TaskSource + Sync + Send,
{
    /// Create a planner showing the current month. Call [`Planner::refresh`] next.
    pub fn new(source: S) -> Self {
        Self::new_displaying(source, chrono::Local::now().date_naive())
    }

    /// Create a planner showing the month containing `anchor` (tests pass a fixed date)
    pub fn new_displaying(source: S, anchor: NaiveDate) -> Self {
        Self {
            source,
            tasks: Vec::new(),
            displayed_month: first_of_month(anchor),
            selected_day: None,
            overlay: None,
            state: PlannerState::Loading,
        }
    }

    pub fn source(&self) -> &S                      { &self.source }
    pub fn state(&self) -> PlannerState             { self.state }
    pub fn tasks(&self) -> &[Task]                  { &self.tasks }
    pub fn displayed_month(&self) -> NaiveDate      { self.displayed_month }
    pub fn selected_day(&self) -> Option<NaiveDate> { self.selected_day }
    pub fn overlay(&self) -> Option<&DayOverlay>    { self.overlay.as_ref() }
    pub fn overlay_mut(&mut self) -> Option<&mut DayOverlay> { self.overlay.as_mut() }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// The grid of the displayed month
    pub fn month_grid(&self) -> MonthGrid {
        MonthGrid::containing(self.displayed_month)
    }

    /// The days of any month that should carry a task marker
    pub fn days_with_tasks(&self) -> HashSet<NaiveDate> {
        calendar::days_with_tasks(&self.tasks)
    }

    /// The tasks due on `date`, in collection order
    pub fn tasks_on(&self, date: NaiveDate) -> Vec<&Task> {
        calendar::tasks_on(&self.tasks, date)
    }

    /// The tasks of the currently selected day (empty when nothing is selected)
    pub fn selected_tasks(&self) -> Vec<&Task> {
        match self.selected_day {
            None => Vec::new(),
            Some(date) => self.tasks_on(date),
        }
    }

    /// Replace the collection with what the source currently holds.
    ///
    /// On failure the collection is left empty and the planner parks in
    /// [`PlannerState::LoadFailed`]; there is no automatic retry.
    pub async fn refresh(&mut self) -> Result<(), Error> {
        self.state = PlannerState::Loading;
        match self.source.list_tasks().await {
            Ok(tasks) => {
                log::debug!("Fetched {} tasks", tasks.len());
                self.tasks = tasks;
                self.state = PlannerState::Idle;
                Ok(())
            }
            Err(err) => {
                log::warn!("Unable to fetch tasks: {}", err);
                self.tasks.clear();
                self.state = PlannerState::LoadFailed;
                Err(err)
            }
        }
    }

    /// Show the previous month. This only changes which days are rendered,
    /// the collection already covers every month.
    pub fn prev_month(&mut self) {
        self.displayed_month = self
            .displayed_month
            .checked_sub_months(Months::new(1))
            .unwrap_or(self.displayed_month);
    }

    /// Show the next month. Same as [`Planner::prev_month`], no refetch.
    pub fn next_month(&mut self) {
        self.displayed_month = self
            .displayed_month
            .checked_add_months(Months::new(1))
            .unwrap_or(self.displayed_month);
    }

    /// Jump to a month. Invalid months are ignored.
    pub fn show_month(&mut self, year: i32, month: u32) {
        if let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) {
            self.displayed_month = first;
        }
    }

    /// Select a date and open its overlay (in viewing mode)
    pub fn open_day(&mut self, date: NaiveDate) {
        self.selected_day = Some(date);
        self.overlay = Some(DayOverlay::new(date));
        self.state = PlannerState::OverlayOpen;
    }

    /// Close the overlay from any mode, discarding any unsaved draft
    pub fn close_overlay(&mut self) {
        self.overlay = None;
        if self.state == PlannerState::OverlayOpen {
            self.state = PlannerState::Idle;
        }
    }

    /// The overlay's "add new" affordance. Does nothing when no overlay is open.
    pub fn begin_create(&mut self) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.start_create();
        }
    }

    /// The per-row "edit" affordance. Does nothing when no overlay is open.
    pub fn begin_edit(&mut self, id: TaskId) {
        let task = match self.tasks.iter().find(|task| task.id() == id) {
            None => {
                log::warn!("Cannot edit unknown task {}", id);
                return;
            }
            Some(task) => task,
        };
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.start_edit(task);
        }
    }

    /// Submit whatever the overlay is drafting.
    ///
    /// On success the overlay closes. On failure nothing changes: the draft and
    /// its mode are kept so the user can retry, and the error propagates to be
    /// surfaced by the caller.
    pub async fn submit_overlay(&mut self) -> Result<(), Error> {
        let submit = match &self.overlay {
            None => return Err(Error::Validation(String::from("no overlay is open"))),
            Some(overlay) => overlay.submit()?,
        };

        match submit {
            OverlaySubmit::Create { title, due_date } => {
                self.create_task(NewTask::new(title).with_due_date(due_date)).await?;
            }
            OverlaySubmit::Edit { id, title } => {
                self.rename_task(id, title).await?;
            }
        }

        self.close_overlay();
        Ok(())
    }

    /// Create a task and adopt the server's version of it into the collection
    pub async fn create_task(&mut self, new_task: NewTask) -> Result<&Task, Error> {
        if new_task.title().trim().is_empty() {
            return Err(Error::Validation(String::from("the task title must not be empty")));
        }

        let created = match self.source.create_task(new_task).await {
            Err(err) => {
                log::warn!("Unable to create the task: {}", err);
                return Err(err);
            }
            Ok(task) => task,
        };
        log::info!("Created task {} ({:?})", created.id(), created.title());
        self.tasks.push(created);
        Ok(self.tasks.last().unwrap(/* this cannot panic since we've just pushed an element */))
    }

    /// Rename a task, merging locally only once the source acknowledged
    pub async fn rename_task(&mut self, id: TaskId, new_title: String) -> Result<(), Error> {
        let patch = TaskPatch::new().with_title(new_title);
        if let Err(err) = self.source.update_task(id, patch.clone()).await {
            log::warn!("Unable to rename task {}: {}", id, err);
            return Err(err);
        }
        self.apply_local_patch(id, &patch);
        Ok(())
    }

    /// Flip a task's completion flag, merging locally only once the source acknowledged
    pub async fn toggle_completion(&mut self, id: TaskId) -> Result<(), Error> {
        let currently_completed = match self.task(id) {
            None => return Err(Error::NotFound(id)),
            Some(task) => task.completed(),
        };
        let new_status = if currently_completed {
            CompletionStatus::Pending
        } else {
            CompletionStatus::Completed(Some(Utc::now()))
        };

        let outcome = self
            .source
            .update_task(id, TaskPatch::new().with_completion(&new_status))
            .await;
        if let Err(err) = outcome {
            log::warn!("Unable to toggle task {}: {}", id, err);
            return Err(err);
        }

        if let Some(task) = self.tasks.iter_mut().find(|task| task.id() == id) {
            task.set_completion_status(new_status);
        }
        Ok(())
    }

    /// Delete a task; it leaves the collection (and thus every derived view)
    /// only once the source confirmed. Closes the overlay on success.
    pub async fn delete_task(&mut self, id: TaskId) -> Result<(), Error> {
        if let Err(err) = self.source.delete_task(id).await {
            log::warn!("Unable to delete task {}: {}", id, err);
            return Err(err);
        }
        self.tasks.retain(|task| task.id() != id);
        self.close_overlay();
        Ok(())
    }

    fn apply_local_patch(&mut self, id: TaskId, patch: &TaskPatch) {
        match self.tasks.iter_mut().find(|task| task.id() == id) {
            None => log::warn!("Task {} vanished from the collection before its patch applied", id),
            Some(task) => task.apply_patch(patch),
        }
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .unwrap(/* this cannot panic since the year and month come from a valid date */)
}
