use std::time::Instant;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::Value;

use crate::{
    Error, Result,
    filter::{FailureReport, FilterContext},
    logging::FilterLogRecord,
    server::{
        params::{FilterParams, FilterResponse},
        state::AppState,
    },
};

/// Handle POST /filter requests.
pub async fn handle_filter(
    State(state): State<AppState>,
    payload: std::result::Result<Json<FilterParams>, JsonRejection>,
) -> Result<Json<FilterResponse>> {
    let started = Instant::now();
    let Json(params) = payload.map_err(|e| Error::InvalidRequest(e.body_text()))?;

    let context = FilterContext::new(
        params.course_identifier,
        params.player_width.unwrap_or(state.player_width),
        params.player_height.unwrap_or(state.player_height),
        params.user,
    );
    let record = FilterLogRecord::new(context.course_identifier.as_deref());

    let (response, record) = match params.text {
        Value::String(text) => {
            let outcome = state.filter.filter(&text, &context).await;
            let record = record.with_input(true, text.len()).with_outcome(&outcome);
            let response = FilterResponse {
                mode: outcome.mode,
                rewritten: outcome.rewritten,
                failures: outcome.failures.iter().map(FailureReport::from).collect(),
                text: Value::String(outcome.text),
            };
            (response, record)
        }
        other => {
            tracing::debug!("Passing non-textual content through unchanged");
            let mode = state.filter.resolve_mode(&context);
            let response = FilterResponse {
                text: other,
                mode,
                rewritten: 0,
                failures: Vec::new(),
            };
            (response, record.with_input(false, 0).with_mode(mode))
        }
    };

    record
        .with_elapsed(started.elapsed().as_millis() as i64)
        .emit();

    Ok(Json(response))
}
