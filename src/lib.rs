//! This crate provides a typed client for a task-planner server.
//!
//! The HTTP gateway lives in the [`client`] module, that can be used as a stand-alone module.
//!
//! Because a user-friendly app is mostly a calendar, this crate also provides the month-calendar
//! view model in the [`planner`] module: it owns the in-memory task collection, derives the
//! per-day views, and coordinates every change with the server through the
//! [`TaskSource`](traits::TaskSource) seam. \
//! The [`session`] module keeps the authenticated session in a local file, so that restarting
//! the app does not require logging in again.
//!
//! Tests (including yours) can swap the HTTP client for the in-memory [`mock_server`].

pub mod config;

mod error;
pub use error::Error;

pub mod task;
pub use task::{CompletionStatus, NewTask, Task, TaskId, TaskPatch};

pub mod session;
pub use session::{Session, SessionStore, StartupView, UserIdentity};

pub mod traits;

pub mod client;
pub use client::Client;

pub mod calendar;
pub use calendar::MonthGrid;

pub mod overlay;
pub use overlay::{DayOverlay, OverlayMode};

pub mod planner;
pub use planner::{Planner, PlannerState};

pub mod analytics;
pub use analytics::AnalyticsOverview;

pub mod mock_behaviour;
pub mod mock_server;

pub mod utils;
