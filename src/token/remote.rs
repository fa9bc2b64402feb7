use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{TokenIssuer, TokenPayload};
use crate::{Error, IssueError, Result};

#[derive(Serialize)]
struct IssueRequest<'a> {
    account_id: &'a str,
    payload: &'a TokenPayload,
}

#[derive(Deserialize)]
struct IssueResponse {
    token: String,
}

/// Token issuer backed by an external signing service.
#[derive(Debug, Clone)]
pub struct RemoteTokenIssuer {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl RemoteTokenIssuer {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    fn map_error(&self, e: reqwest::Error) -> IssueError {
        if e.is_timeout() {
            IssueError::Timeout(self.timeout.as_millis() as u64)
        } else {
            e.into()
        }
    }
}

impl TokenIssuer for RemoteTokenIssuer {
    async fn issue(
        &self,
        account_id: &str,
        payload: &TokenPayload,
    ) -> std::result::Result<String, IssueError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&IssueRequest {
                account_id,
                payload,
            })
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IssueError::Rejected {
                status: status.as_u16(),
            });
        }

        let body: IssueResponse = response.json().await.map_err(|e| self.map_error(e))?;
        if body.token.is_empty() {
            return Err(IssueError::InvalidResponse("empty token".to_string()));
        }

        tracing::debug!("Issued token for video {}", payload.identifier);
        Ok(body.token)
    }
}
