use std::future::Future;

use serde::{Deserialize, Serialize};

use super::{HmacTokenIssuer, RemoteTokenIssuer};
use crate::{IssueError, Result, config::FilterConfig, filter::UserInfo};

/// Claims the token service is asked to sign for one link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// Video id the token is bound to.
    pub identifier: String,
    pub fullname: String,
    pub email: String,
}

impl TokenPayload {
    pub fn new(video_id: &str, user: &UserInfo) -> Self {
        Self {
            identifier: video_id.to_string(),
            fullname: user.display_name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Source of signed playback tokens.
///
/// Implementations own their timeout policy; a timeout is reported as
/// [`IssueError::Timeout`].
pub trait TokenIssuer: Send + Sync {
    fn issue(
        &self,
        account_id: &str,
        payload: &TokenPayload,
    ) -> impl Future<Output = std::result::Result<String, IssueError>> + Send;
}

/// The issuer selected by configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredIssuer {
    Hmac(HmacTokenIssuer),
    Remote(RemoteTokenIssuer),
}

impl ConfiguredIssuer {
    /// A remote endpoint takes precedence over the local signing key.
    pub fn from_config(config: &FilterConfig) -> Result<Self> {
        match &config.token_endpoint {
            Some(endpoint) => {
                tracing::info!("Issuing tokens through {}", endpoint);
                Ok(Self::Remote(RemoteTokenIssuer::new(
                    endpoint.clone(),
                    config.token_timeout,
                )?))
            }
            None => Ok(Self::Hmac(HmacTokenIssuer::new(
                config.signing_key.clone(),
                config.token_ttl,
            ))),
        }
    }
}

impl TokenIssuer for ConfiguredIssuer {
    async fn issue(
        &self,
        account_id: &str,
        payload: &TokenPayload,
    ) -> std::result::Result<String, IssueError> {
        match self {
            Self::Hmac(issuer) => issuer.issue(account_id, payload).await,
            Self::Remote(issuer) => issuer.issue(account_id, payload).await,
        }
    }
}
