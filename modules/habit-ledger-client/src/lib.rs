//! Typed HTTP client for the habit ledger service, plus the windowed
//! range fetcher that assembles calendar views out of repeated
//! single-date lookups.

pub mod range;

use habit_ledger_types::*;
use range::RangeView;
use thiserror::Error;

/// Default service URL
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:9205";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("not logged in")]
    NotAuthenticated,
}

pub struct HabitClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HabitClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    /// Exchange credentials for a bearer token used by all later calls.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(format!("{}/api/login", self.base_url))
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        let body: LoginResponse = check(resp).await?.json().await?;
        self.token = Some(body.token);
        Ok(())
    }

    fn bearer(&self) -> Result<&str, ClientError> {
        self.token.as_deref().ok_or(ClientError::NotAuthenticated)
    }

    /// All records for one date, possibly empty.
    pub async fn list(&self, date: &str) -> Result<Vec<Habit>, ClientError> {
        let resp = self
            .http
            .get(format!("{}/api/habits/{}", self.base_url, date))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Record one habit completion; returns the assigned id.
    pub async fn create(&self, req: &CreateHabitRequest) -> Result<String, ClientError> {
        let resp = self
            .http
            .post(format!("{}/api/habits", self.base_url))
            .bearer_auth(self.bearer()?)
            .json(req)
            .send()
            .await?;
        let body: CreateHabitResponse = check(resp).await?.json().await?;
        Ok(body.id)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let resp = self
            .http
            .delete(format!("{}/api/habits/{}", self.base_url, id))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    /// Completed-record counts per day, most recent first, at most 30.
    pub async fn trends(&self) -> Result<Vec<TrendPoint>, ClientError> {
        let resp = self
            .http
            .get(format!("{}/api/trends", self.base_url))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// Deduplicated name/note catalog, name ascending.
    pub async fn suggestions(&self) -> Result<Vec<Suggestion>, ClientError> {
        let resp = self
            .http
            .get(format!("{}/api/habits/suggestions", self.base_url))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// One calendar month assembled from per-date lookups. Dates whose
    /// lookup fails show up empty rather than failing the whole view.
    pub async fn fetch_month(&self, year: i32, month: u32) -> RangeView {
        let dates = range::month_dates(year, month);
        range::merge_range(dates, |date| async move { self.list(&date).await }).await
    }

    /// The trailing 365 days ending today, assembled the same way.
    pub async fn fetch_trailing_year(&self) -> RangeView {
        let dates = range::trailing_dates(chrono::Utc::now().date_naive(), 365);
        range::merge_range(dates, |date| async move { self.list(&date).await }).await
    }
}

/// Map non-2xx replies onto the API error payload when one is present.
async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp
        .json::<ErrorResponse>()
        .await
        .map(|e| e.error)
        .unwrap_or_else(|_| status.to_string());
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn calls_before_login_fail_locally() {
        let client = HabitClient::new(DEFAULT_BASE_URL);
        assert!(matches!(
            client.list("2024-01-05").await,
            Err(ClientError::NotAuthenticated)
        ));
        assert!(matches!(
            client.delete("some-id").await,
            Err(ClientError::NotAuthenticated)
        ));
        assert!(matches!(
            client.trends().await,
            Err(ClientError::NotAuthenticated)
        ));
    }
}
