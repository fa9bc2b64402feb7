use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::filter::{Dimension, FailureReport, RenderMode, UserInfo};

/// Body of a POST /filter request.
#[derive(Debug, Deserialize)]
pub struct FilterParams {
    /// Content to filter. Anything other than a JSON string is echoed back.
    pub text: Value,

    /// Short name of the course the content belongs to.
    #[serde(default)]
    pub course_identifier: Option<String>,

    /// Requester the tokens are issued for.
    pub user: UserInfo,

    /// Overrides the configured player width.
    #[serde(default)]
    pub player_width: Option<Dimension>,

    /// Overrides the configured player height.
    #[serde(default)]
    pub player_height: Option<Dimension>,
}

#[derive(Debug, Serialize)]
pub struct FilterResponse {
    pub text: Value,
    pub mode: RenderMode,
    pub rewritten: usize,
    pub failures: Vec<FailureReport>,
}
