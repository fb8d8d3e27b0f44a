use crate::errors::SyncError;
use crate::models::{Ack, CompletionRequest, NewHabit, ProfileUpdate, SettingsUpdate, Snapshot};
use reqwest::{Client, Response};
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Transport seam between the controller and the habit server.
pub trait HabitApi {
    fn fetch_snapshot(&self) -> impl Future<Output = Result<Snapshot, SyncError>> + Send;

    fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> impl Future<Output = Result<(), SyncError>> + Send;

    fn set_completion(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<(), SyncError>> + Send;

    fn create_habit(&self, habit: &NewHabit) -> impl Future<Output = Result<(), SyncError>> + Send;

    fn delete_habit(&self, habit_id: i64) -> impl Future<Output = Result<(), SyncError>> + Send;

    fn update_settings(
        &self,
        update: &SettingsUpdate,
    ) -> impl Future<Output = Result<(), SyncError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, SyncError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<(), SyncError> {
        debug!("POST {path}");
        let response = self.client.post(self.url(path)).json(body).send().await?;
        acknowledge(response).await
    }
}

impl HabitApi for HttpApi {
    async fn fetch_snapshot(&self) -> Result<Snapshot, SyncError> {
        debug!("GET /api/data");
        let response = self.client.get(self.url("/api/data")).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(SyncError::from_status(status, error_message(&bytes)));
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), SyncError> {
        self.post("/api/profile", update).await
    }

    async fn set_completion(&self, request: &CompletionRequest) -> Result<(), SyncError> {
        self.post("/api/complete", request).await
    }

    async fn create_habit(&self, habit: &NewHabit) -> Result<(), SyncError> {
        self.post("/api/habits", habit).await
    }

    async fn delete_habit(&self, habit_id: i64) -> Result<(), SyncError> {
        let path = format!("/api/habits/{habit_id}");
        debug!("DELETE {path}");
        let response = self.client.delete(self.url(&path)).send().await?;
        acknowledge(response).await
    }

    async fn update_settings(&self, update: &SettingsUpdate) -> Result<(), SyncError> {
        self.post("/api/settings", update).await
    }
}

async fn acknowledge(response: Response) -> Result<(), SyncError> {
    let status = response.status();
    let bytes = response.bytes().await?;
    if !status.is_success() {
        return Err(SyncError::from_status(status, error_message(&bytes)));
    }
    // Some deployments answer writes with an empty body.
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(());
    }
    let ack: Ack = serde_json::from_slice(&bytes)?;
    if ack.is_success() {
        Ok(())
    } else {
        Err(SyncError::from_status(
            reqwest::StatusCode::UNPROCESSABLE_ENTITY,
            ack.message.unwrap_or(ack.status),
        ))
    }
}

fn error_message(body: &[u8]) -> String {
    match serde_json::from_slice::<Ack>(body) {
        Ok(Ack {
            message: Some(message),
            ..
        }) => message,
        _ => String::from_utf8_lossy(body).trim().to_string(),
    }
}
