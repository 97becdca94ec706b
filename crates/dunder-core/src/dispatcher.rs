use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::DispatchError;
use crate::reply::{parse_reply, NormalizedReply};

#[derive(Serialize)]
struct AgentRequest<'a> {
    message: &'a str,
}

/// Posts user utterances to the agent backend.
#[derive(Clone)]
pub struct Dispatcher {
    client: Client,
    base_url: String,
}

impl Dispatcher {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Send one utterance and wait for the reply.
    ///
    /// There is no timeout: the call settles when the transport does.
    pub async fn send(
        &self,
        endpoint: &str,
        utterance: &str,
    ) -> Result<NormalizedReply, DispatchError> {
        let message = utterance.trim();
        if message.is_empty() {
            return Err(DispatchError::EmptyUtterance);
        }

        let url = self.url_for(endpoint);
        debug!(%url, chars = message.chars().count(), "dispatching message");

        let result = self.post(&url, message).await;
        if let Err(e) = &result {
            warn!(%url, error = %e, "agent request failed");
        }
        result
    }

    async fn post(&self, url: &str, message: &str) -> Result<NormalizedReply, DispatchError> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&AgentRequest { message })
            .send()
            .await?;

        // The backend reports its own failures in the JSON body, so the status
        // code alone decides nothing.
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        parse_reply(status, &body)
    }
}
