//! To-do tasks, as the task-planner server stores them

use std::fmt::{Display, Formatter};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The `status` value the server uses for completed tasks.
/// Every other value ("pending", "urgent", ...) counts as not completed.
const COMPLETED_STATUS: &str = "completed";

/// The server-assigned task identifier.
/// It is opaque to this crate: it is only ever compared and echoed back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}
impl From<i64> for TaskId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}
impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.0)
    }
}

/// The server stores completion as a `status` string plus an optional `completed_at` timestamp,
/// yet some combinations make no sense (a completion date on a pending task).
/// This enum provides an API that forbids such impossible combinations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CompletionStatus {
    Completed(Option<DateTime<Utc>>),
    Pending,
}
impl CompletionStatus {
    pub fn is_completed(&self) -> bool {
        match self {
            CompletionStatus::Completed(_) => true,
            _ => false,
        }
    }
}

/// A to-do task.
///
/// Instances come from the server (or from a [`MockServer`](crate::mock_server::MockServer)):
/// the client never makes up identifiers or timestamps on its own.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    /// The server-assigned identifier, stable for the task's lifetime
    id: TaskId,

    /// The display title of the task. Never persisted empty.
    title: String,

    /// The day this task is due, if any. This is a calendar date (no time-of-day):
    /// the server may serialize it as a bare date or as a datetime, both are accepted.
    #[serde(default, with = "loose_date", skip_serializing_if = "Option::is_none")]
    due_date: Option<NaiveDate>,

    /// The server-side workflow status ("pending", "completed", "urgent", ...).
    /// Apart from the completion check, this crate passes it through unmodified.
    #[serde(default = "default_status")]
    status: String,

    /// The time the server recorded the creation. Can be None for tasks predating that server field.
    #[serde(default, with = "loose_datetime", skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,

    /// When this task was completed. Only meaningful together with a completed `status`.
    #[serde(default, with = "loose_datetime", skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,

    /// Server-computed priority. Kept as raw JSON: the server has emitted both numbers and strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    priority: Option<serde_json::Value>,

    /// Server-computed follow-up suggestions. Read-only from the client's perspective.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    suggestions: Vec<String>,

    /// Fields this crate does not model (because it does not need them (yet)).
    /// They are kept so that serializing a task loses nothing the server sent.
    #[serde(flatten)]
    extra_fields: serde_json::Map<String, serde_json::Value>,
}

fn default_status() -> String {
    String::from("pending")
}

impl Task {
    /// Create a Task instance from its parts, the way a server reply would describe it
    pub fn new_with_parameters(
        id: TaskId,
        title: String,
        due_date: Option<NaiveDate>,
        completion_status: CompletionStatus,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        let (status, completed_at) = match completion_status {
            CompletionStatus::Completed(when) => (String::from(COMPLETED_STATUS), when),
            CompletionStatus::Pending => (default_status(), None),
        };
        Self {
            id,
            title,
            due_date,
            status,
            created_at,
            completed_at,
            priority: None,
            suggestions: Vec::new(),
            extra_fields: serde_json::Map::new(),
        }
    }

    pub fn id(&self) -> TaskId      { self.id }
    pub fn title(&self) -> &str     { &self.title }
    pub fn status(&self) -> &str    { &self.status }
    pub fn completed(&self) -> bool { self.completion_status().is_completed() }
    pub fn due_date(&self) -> Option<NaiveDate>             { self.due_date }
    pub fn created_at(&self) -> Option<&DateTime<Utc>>      { self.created_at.as_ref() }
    pub fn priority(&self) -> Option<&serde_json::Value>    { self.priority.as_ref() }
    pub fn suggestions(&self) -> &[String]                  { &self.suggestions }

    pub fn completion_status(&self) -> CompletionStatus {
        if self.status == COMPLETED_STATUS {
            CompletionStatus::Completed(self.completed_at)
        } else {
            CompletionStatus::Pending
        }
    }

    /// Rename a task. The new title is expected to be validated (non-empty) already.
    pub fn set_title(&mut self, new_title: String) {
        self.title = new_title;
    }

    /// Set the completion status, keeping `status` and `completed_at` consistent
    pub fn set_completion_status(&mut self, new_completion_status: CompletionStatus) {
        match new_completion_status {
            CompletionStatus::Completed(when) => {
                self.status = String::from(COMPLETED_STATUS);
                self.completed_at = when;
            }
            CompletionStatus::Pending => {
                self.status = default_status();
                self.completed_at = None;
            }
        }
    }

    /// Merge a patch the server has acknowledged into this local copy
    pub fn apply_patch(&mut self, patch: &TaskPatch) {
        if let Some(title) = patch.title() {
            self.title = title.to_string();
        }
        if let Some(due_date) = patch.due_date() {
            self.due_date = Some(due_date);
        }
        if let Some(status) = patch.status() {
            self.status = status.to_string();
            if self.status != COMPLETED_STATUS {
                self.completed_at = None;
            }
        }
    }

    /// Compare what a user would observe of two tasks.
    /// Server-managed timestamps are ignored (servers and mocks do not stamp them identically).
    pub fn has_same_observable_content_as(&self, other: &Task) -> bool {
           self.id == other.id
        && self.title == other.title
        && self.due_date == other.due_date
        && self.completed() == other.completed()
    }
}

/// What the client sends to create a task. The server answers with the full [`Task`].
#[derive(Clone, Debug, Serialize)]
pub struct NewTask {
    title: String,
    #[serde(serialize_with = "loose_date::serialize", skip_serializing_if = "Option::is_none")]
    due_date: Option<NaiveDate>,
}

impl NewTask {
    pub fn new<S: ToString>(title: S) -> Self {
        Self { title: title.to_string(), due_date: None }
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn title(&self) -> &str { &self.title }
    pub fn due_date(&self) -> Option<NaiveDate> { self.due_date }
}

/// A partial update. Absent fields mean "leave unchanged", both on the wire and
/// when merging into the local copy.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(serialize_with = "loose_date::serialize", skip_serializing_if = "Option::is_none")]
    due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
}

impl TaskPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title<S: ToString>(mut self, title: S) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_status<S: ToString>(mut self, status: S) -> Self {
        self.status = Some(status.to_string());
        self
    }

    /// The status change matching a completion state
    pub fn with_completion(self, completion_status: &CompletionStatus) -> Self {
        let status = match completion_status {
            CompletionStatus::Completed(_) => COMPLETED_STATUS,
            CompletionStatus::Pending => "pending",
        };
        self.with_status(status)
    }

    pub fn title(&self) -> Option<&str>         { self.title.as_deref() }
    pub fn status(&self) -> Option<&str>        { self.status.as_deref() }
    pub fn due_date(&self) -> Option<NaiveDate> { self.due_date }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.due_date.is_none() && self.status.is_none()
    }
}

/// Serde support for due dates.
///
/// The server's schema is "graceful": depending on the code path it emits `"2024-03-15"`,
/// `"2024-03-15T00:00:00"` or an RFC 3339 datetime. All of them normalize to the same
/// year/month/day triple here, and we always serialize the bare date back.
pub(crate) mod loose_date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(text: &str) -> Option<NaiveDate> {
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return Some(date);
        }
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(datetime.date());
        }
        DateTime::parse_from_rfc3339(text).ok().map(|datetime| datetime.date_naive())
    }

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(text) => match parse(&text) {
                Some(date) => Ok(Some(date)),
                None => Err(serde::de::Error::custom(format!("invalid calendar date: {:?}", text))),
            },
        }
    }
}

/// Serde support for server timestamps, which come back naive (no offset) from some
/// code paths and RFC 3339 from others. Naive timestamps are taken as UTC.
pub(crate) mod loose_datetime {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(text: &str) -> Option<DateTime<Utc>> {
        if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
            return Some(datetime.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| Utc.from_utc_datetime(&naive))
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(datetime) => serializer.serialize_str(&datetime.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(text) => match parse(&text) {
                Some(datetime) => Ok(Some(datetime)),
                None => Err(serde::de::Error::custom(format!("invalid timestamp: {:?}", text))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn march_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn parses_a_server_reply() {
        let task: Task = serde_json::from_value(serde_json::json!({
            "id": 7,
            "title": "Write report",
            "due_date": "2024-03-15T00:00:00",
            "status": "pending",
            "created_at": "2024-03-01T10:30:00",
            "completed_at": null,
            "priority": 2,
            "suggestions": ["Outline first"],
            "user_id": 3,
            "complimentary_tasks": ["Review notes"]
        }))
        .unwrap();

        assert_eq!(task.id(), TaskId::from(7));
        assert_eq!(task.title(), "Write report");
        assert_eq!(task.due_date(), Some(march_15()));
        assert_eq!(task.completed(), false);
        assert_eq!(task.suggestions(), ["Outline first".to_string()]);

        // unmodeled fields survive a round-trip, and the due date is normalized
        let echoed = serde_json::to_value(&task).unwrap();
        assert_eq!(echoed["user_id"], serde_json::json!(3));
        assert_eq!(echoed["due_date"], serde_json::json!("2024-03-15"));
    }

    #[test]
    fn date_only_and_datetime_due_dates_are_the_same_day() {
        for text in &["2024-03-15", "2024-03-15T00:00:00", "2024-03-15T23:59:59+00:00"] {
            assert_eq!(loose_date::parse(text), Some(march_15()), "failed on {}", text);
        }
        assert_eq!(loose_date::parse("not a date"), None);
    }

    #[test]
    fn completion_status_is_derived_from_the_status_string() {
        let mut task = Task::new_with_parameters(
            TaskId::from(1),
            String::from("Buy milk"),
            None,
            CompletionStatus::Pending,
            None,
        );
        assert_eq!(task.completed(), false);

        task.set_completion_status(CompletionStatus::Completed(None));
        assert_eq!(task.status(), "completed");
        assert!(task.completed());

        task.set_completion_status(CompletionStatus::Pending);
        assert_eq!(task.status(), "pending");
        assert_eq!(task.completed(), false);
    }

    #[test]
    fn a_patch_only_touches_what_it_names() {
        let mut task = Task::new_with_parameters(
            TaskId::from(1),
            String::from("Buy milk"),
            Some(march_15()),
            CompletionStatus::Pending,
            None,
        );

        task.apply_patch(&TaskPatch::new().with_title("Buy oat milk"));
        assert_eq!(task.title(), "Buy oat milk");
        assert_eq!(task.due_date(), Some(march_15()));
        assert_eq!(task.status(), "pending");

        let wire = serde_json::to_value(&TaskPatch::new().with_status("completed")).unwrap();
        assert_eq!(wire, serde_json::json!({"status": "completed"}));
    }
}
