//! This module provides a client to connect to the task-planner server

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::analytics::AnalyticsOverview;
use crate::config;
use crate::error::Error;
use crate::session::{Session, UserIdentity};
use crate::task::{NewTask, Task, TaskId, TaskPatch};
use crate::traits::TaskSource;

/// The server's reply to a successful login
#[derive(Debug, Deserialize)]
struct LoginReply {
    #[serde(alias = "access_token")]
    token: String,
    /// Older server versions reply with the token alone
    #[serde(default)]
    user: Option<UserIdentity>,
}

/// What the server answers to a registration: an immediate session, or just a
/// confirmation message (in which case the user logs in separately)
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RegisterOutcome {
    Session(Session),
    Message { message: String },
}

/// Whatever details the server puts in an error reply body
#[derive(Debug, Deserialize)]
struct ErrorReply {
    message: String,
}

/// A [`TaskSource`] that fetches its data from the task-planner server.
///
/// The session is injected explicitly: its bearer credential is attached to
/// every request. The client never caches anything.
pub struct Client {
    base_url: Url,
    session: Session,
    http: reqwest::Client,
}

impl Client {
    /// Create a client bound to an authenticated session. This does not start a connection.
    pub fn new<S: AsRef<str>>(base_url: S, session: Session) -> Result<Self, Error> {
        let base_url = Url::parse(base_url.as_ref())?;

        Ok(Self {
            base_url,
            session,
            http: default_http_client()?,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Exchange credentials for a [`Session`].
    /// This is an associated function: no session exists yet at this point.
    pub async fn login<S: AsRef<str>, T: ToString, U: ToString>(
        base_url: S,
        email: T,
        password: U,
    ) -> Result<Session, Error> {
        let url = Url::parse(base_url.as_ref())?.join("auth/login")?;
        let email = email.to_string();
        log::debug!("POST {}", url);

        let response = default_http_client()?
            .post(url)
            .json(&serde_json::json!({ "email": email, "password": password.to_string() }))
            .send()
            .await?;
        let response = fail_on_status(response, None).await?;

        let reply: LoginReply = response.json().await?;
        let user = match reply.user {
            Some(user) => user,
            None => identity_from_email(&email),
        };
        Ok(Session::new(reply.token, user))
    }

    /// Register a new account. Depending on the server version this either
    /// logs the user in right away or asks them to log in separately.
    pub async fn register<S: AsRef<str>, T: ToString, U: ToString, V: ToString>(
        base_url: S,
        username: T,
        email: U,
        password: V,
    ) -> Result<RegisterOutcome, Error> {
        let url = Url::parse(base_url.as_ref())?.join("auth/register")?;
        log::debug!("POST {}", url);

        let response = default_http_client()?
            .post(url)
            .json(&serde_json::json!({
                "username": username.to_string(),
                "email": email.to_string(),
                "password": password.to_string(),
            }))
            .send()
            .await?;
        let response = fail_on_status(response, None).await?;

        Ok(response.json().await?)
    }

    /// The authenticated user's identity, as the server sees it
    pub async fn profile(&self) -> Result<UserIdentity, Error> {
        let response = self.get("auth/profile").await?;
        Ok(response.json().await?)
    }

    /// The backend-computed completion summary. Read-only: every number in
    /// there was aggregated server-side.
    pub async fn analytics_overview(&self) -> Result<AnalyticsOverview, Error> {
        let response = self.get("analytics/overview").await?;
        Ok(response.json().await?)
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, Error> {
        let url = self.endpoint(path)?;
        log::debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .bearer_auth(self.session.bearer_token())
            .send()
            .await?;
        fail_on_status(response, None).await
    }
}

#[async_trait]
impl TaskSource for Client {
    async fn list_tasks(&self) -> Result<Vec<Task>, Error> {
        let response = self.get("tasks/").await?;
        Ok(response.json().await?)
    }

    async fn create_task(&self, new_task: NewTask) -> Result<Task, Error> {
        if new_task.title().trim().is_empty() {
            return Err(Error::Validation(String::from("the task title must not be empty")));
        }

        let url = self.endpoint("tasks/")?;
        log::debug!("POST {}", url);

        let response = self
            .http
            .post(url)
            .bearer_auth(self.session.bearer_token())
            .json(&new_task)
            .send()
            .await?;
        let response = fail_on_status(response, None).await?;

        Ok(response.json().await?)
    }

    async fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<(), Error> {
        let url = self.endpoint(&format!("tasks/{}", id))?;
        log::debug!("PUT {}", url);

        let response = self
            .http
            .put(url)
            .bearer_auth(self.session.bearer_token())
            .json(&patch)
            .send()
            .await?;
        fail_on_status(response, Some(id)).await?;

        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), Error> {
        let url = self.endpoint(&format!("tasks/{}", id))?;
        log::debug!("DELETE {}", url);

        let response = self
            .http
            .delete(url)
            .bearer_auth(self.session.bearer_token())
            .send()
            .await?;
        fail_on_status(response, Some(id)).await?;

        Ok(())
    }
}

fn default_http_client() -> Result<reqwest::Client, Error> {
    Ok(reqwest::Client::builder()
        .user_agent(config::user_agent())
        .build()?)
}

/// Some server versions do not echo the user back on login; derive a display
/// identity from the address that just authenticated.
fn identity_from_email(email: &str) -> UserIdentity {
    let username = email.split('@').next().unwrap_or(email);
    UserIdentity::new(username, email)
}

/// Map a non-success reply onto the error taxonomy.
/// `looked_up` is the task the request was about, if any, so a 404 can name it.
async fn fail_on_status(
    response: reqwest::Response,
    looked_up: Option<TaskId>,
) -> Result<reqwest::Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = error_message(response).await;
    log::warn!("Server rejected a request: HTTP {} ({})", status, message);

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(Error::Auth(message));
    }
    if status == StatusCode::NOT_FOUND {
        if let Some(id) = looked_up {
            return Err(Error::NotFound(id));
        }
    }
    Err(Error::Server { status: status.as_u16(), message })
}

async fn error_message(response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorReply>(&body) {
        Ok(reply) => reply.message,
        Err(_) => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_reply_accepts_both_token_spellings() {
        let modern: LoginReply = serde_json::from_value(serde_json::json!({
            "token": "tok-1",
            "user": {"username": "john", "email": "john@example.com"}
        }))
        .unwrap();
        assert_eq!(modern.token, "tok-1");
        assert_eq!(modern.user.unwrap().username(), "john");

        let legacy: LoginReply =
            serde_json::from_value(serde_json::json!({"access_token": "tok-2"})).unwrap();
        assert_eq!(legacy.token, "tok-2");
        assert!(legacy.user.is_none());
    }

    #[test]
    fn register_outcome_covers_both_server_shapes() {
        let with_session: RegisterOutcome = serde_json::from_value(serde_json::json!({
            "token": "tok-3",
            "user": {"username": "ada", "email": "ada@example.com"}
        }))
        .unwrap();
        match with_session {
            RegisterOutcome::Session(session) => assert_eq!(session.bearer_token(), "tok-3"),
            other => panic!("expected a session, got {:?}", other),
        }

        let with_message: RegisterOutcome =
            serde_json::from_value(serde_json::json!({"message": "User registered successfully"}))
                .unwrap();
        match with_message {
            RegisterOutcome::Message { message } => {
                assert_eq!(message, "User registered successfully")
            }
            other => panic!("expected a message, got {:?}", other),
        }
    }

    #[test]
    fn derived_identities_use_the_mailbox_name() {
        let identity = identity_from_email("john@example.com");
        assert_eq!(identity.username(), "john");
        assert_eq!(identity.email(), "john@example.com");
    }
}
