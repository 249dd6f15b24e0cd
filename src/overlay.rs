//! The day overlay: viewing, creating and editing the tasks of a selected date

use chrono::NaiveDate;

use crate::error::Error;
use crate::task::{Task, TaskId};

/// What the overlay is currently doing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayMode {
    /// Listing the day's tasks, with edit/delete affordances per row
    Viewing,
    /// A new task is being typed for this day
    Creating,
    /// An existing task's title is being edited
    Editing(TaskId),
}

/// What a submitted overlay asks the planner to do
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverlaySubmit {
    Create { title: String, due_date: NaiveDate },
    Edit { id: TaskId, title: String },
}

/// The modal-like view over one selected date.
///
/// It owns nothing but its transient title buffer: the tasks it lists are
/// borrowed from the planner, and closing it discards the buffer with no
/// confirmation.
#[derive(Clone, Debug, PartialEq)]
pub struct DayOverlay {
    date: NaiveDate,
    mode: OverlayMode,
    title_buffer: String,
}

impl DayOverlay {
    /// Open an overlay on a date, in viewing mode
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            mode: OverlayMode::Viewing,
            title_buffer: String::new(),
        }
    }

    pub fn date(&self) -> NaiveDate      { self.date }
    pub fn mode(&self) -> OverlayMode    { self.mode }
    pub fn title_buffer(&self) -> &str   { &self.title_buffer }

    /// Switch to creating a new task for this day. The buffer starts empty.
    pub fn start_create(&mut self) {
        self.mode = OverlayMode::Creating;
        self.title_buffer.clear();
    }

    /// Switch to editing a task. The buffer is pre-filled with its current title.
    pub fn start_edit(&mut self, task: &Task) {
        self.mode = OverlayMode::Editing(task.id());
        self.title_buffer = task.title().to_string();
    }

    /// Abandon the current draft and go back to the task list, discarding the buffer
    pub fn back_to_viewing(&mut self) {
        self.mode = OverlayMode::Viewing;
        self.title_buffer.clear();
    }

    /// Replace the title buffer with what the user typed so far
    pub fn set_title_buffer<S: ToString>(&mut self, text: S) {
        self.title_buffer = text.to_string();
    }

    /// Turn the current draft into a submission.
    ///
    /// An empty (or whitespace-only) title is rejected here, before any network
    /// call is made; the overlay is left untouched so the user can fix it and retry.
    pub fn submit(&self) -> Result<OverlaySubmit, Error> {
        let title = self.title_buffer.trim();

        match self.mode {
            OverlayMode::Viewing => {
                Err(Error::Validation(String::from("nothing is being created or edited")))
            }
            OverlayMode::Creating => {
                if title.is_empty() {
                    return Err(Error::Validation(String::from("the task title must not be empty")));
                }
                Ok(OverlaySubmit::Create {
                    title: title.to_string(),
                    due_date: self.date,
                })
            }
            OverlayMode::Editing(id) => {
                if title.is_empty() {
                    return Err(Error::Validation(String::from("the task title must not be empty")));
                }
                Ok(OverlaySubmit::Edit { id, title: title.to_string() })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{CompletionStatus, Task, TaskId};

    fn march_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn creating_submits_the_selected_date() {
        let mut overlay = DayOverlay::new(march_15());
        overlay.start_create();
        overlay.set_title_buffer("  Write report ");

        let submit = overlay.submit().unwrap();
        assert_eq!(
            submit,
            OverlaySubmit::Create { title: String::from("Write report"), due_date: march_15() }
        );
    }

    #[test]
    fn empty_titles_are_rejected_without_leaving_the_mode() {
        let mut overlay = DayOverlay::new(march_15());
        overlay.start_create();
        overlay.set_title_buffer("   ");

        match overlay.submit() {
            Err(Error::Validation(_)) => (),
            other => panic!("expected a validation error, got {:?}", other),
        }
        assert_eq!(overlay.mode(), OverlayMode::Creating);
    }

    #[test]
    fn editing_prefills_the_buffer() {
        let task = Task::new_with_parameters(
            TaskId::from(4),
            String::from("Pay rent"),
            Some(march_15()),
            CompletionStatus::Pending,
            None,
        );

        let mut overlay = DayOverlay::new(march_15());
        overlay.start_edit(&task);
        assert_eq!(overlay.title_buffer(), "Pay rent");

        overlay.set_title_buffer("Pay rent early");
        let submit = overlay.submit().unwrap();
        assert_eq!(
            submit,
            OverlaySubmit::Edit { id: TaskId::from(4), title: String::from("Pay rent early") }
        );
    }

    #[test]
    fn going_back_to_viewing_discards_the_draft() {
        let mut overlay = DayOverlay::new(march_15());
        overlay.start_create();
        overlay.set_title_buffer("half-typed");
        overlay.back_to_viewing();

        assert_eq!(overlay.mode(), OverlayMode::Viewing);
        assert_eq!(overlay.title_buffer(), "");
    }
}
