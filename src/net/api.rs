//! HTTP transport for the answer service.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is returned as an [`AskError`] value; nothing here panics or
//! retries. Statuses outside 200-299 fail before the body is looked at.

use async_trait::async_trait;

use super::types::{AnswerResult, AskError, AskRequest, RootMessage, parse_answer};
use crate::config::ClientConfig;

/// The one remote operation a form performs.
#[async_trait]
pub trait AskBackend: Send + Sync {
    /// Send `query` and return the parsed answer.
    async fn ask(&self, query: &str) -> Result<AnswerResult, AskError>;
}

pub struct HttpBackend {
    http: reqwest::Client,
    ask_url: reqwest::Url,
    root_url: reqwest::Url,
}

impl HttpBackend {
    /// # Errors
    ///
    /// Returns [`AskError::ClientBuild`] when the config URLs are invalid or
    /// the reqwest client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, AskError> {
        let ask_url = config.ask_url().map_err(|e| AskError::ClientBuild(e.to_string()))?;
        let root_url = config.root_url().map_err(|e| AskError::ClientBuild(e.to_string()))?;

        let mut builder = reqwest::Client::builder().connect_timeout(config.timeouts.connect());
        if let Some(timeout) = config.timeouts.request() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| AskError::ClientBuild(e.to_string()))?;
        Ok(Self { http, ask_url, root_url })
    }

    pub fn ask_url(&self) -> &reqwest::Url {
        &self.ask_url
    }

    /// Probe `GET /` and return the backend's greeting message.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`AskBackend::ask`].
    pub async fn ping(&self) -> Result<String, AskError> {
        let response = self
            .http
            .get(self.root_url.clone())
            .send()
            .await
            .map_err(|e| AskError::from_reqwest(&e))?;
        let text = read_success_body(response).await?;
        let root: RootMessage = serde_json::from_str(&text).map_err(|e| AskError::Parse(e.to_string()))?;
        Ok(root.message)
    }
}

#[async_trait]
impl AskBackend for HttpBackend {
    async fn ask(&self, query: &str) -> Result<AnswerResult, AskError> {
        tracing::debug!(url = %self.ask_url, query_len = query.len(), "posting question");
        let response = self
            .http
            .post(self.ask_url.clone())
            .json(&AskRequest { query })
            .send()
            .await
            .map_err(|e| AskError::from_reqwest(&e))?;
        let text = read_success_body(response).await?;
        parse_answer(&text)
    }
}

/// Reject non-2xx statuses, then read the body as text.
async fn read_success_body(response: reqwest::Response) -> Result<String, AskError> {
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), url = %response.url(), "answer service returned error status");
        return Err(AskError::Status { status: status.as_u16() });
    }
    response.text().await.map_err(|e| AskError::from_reqwest(&e))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
