use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;
use crate::AppState;

pub const NO_TEXT_PROVIDED: &str = "No text provided";
pub const INVALID_JSON: &str = "Invalid JSON";

fn error_body(message: &str) -> Response {
    Json(json!({ "error": message })).into_response()
}

fn analyze(state: &AppState, text: &str) -> Response {
    let analysis = state.scorer.analyze(text);
    debug!(
        "Scored {} chars with {}: {} ({})",
        text.len(),
        state.scorer.name(),
        analysis.classification,
        analysis.scores.compound
    );
    Json(analysis).into_response()
}

/// First non-empty `text` value of the query string, if any.
fn text_param(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, value)| key == "text" && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

pub async fn analyze_query(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Response {
    match text_param(query.as_deref()) {
        Some(text) => analyze(&state, &text),
        None => error_body(NO_TEXT_PROVIDED),
    }
}

pub async fn analyze_body(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            debug!("Rejecting request body: {}", e);
            return error_body(INVALID_JSON);
        }
    };

    let Some(fields) = payload.as_object() else {
        return error_body(INVALID_JSON);
    };

    match fields.get("text") {
        None | Some(Value::Null) => error_body(NO_TEXT_PROVIDED),
        Some(Value::String(text)) if text.is_empty() => error_body(NO_TEXT_PROVIDED),
        Some(Value::String(text)) => analyze(&state, text),
        Some(_) => error_body(INVALID_JSON),
    }
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "status": "ok", "scorer": state.scorer.name() }))
}

#[cfg(test)]
mod tests {
    use super::text_param;

    #[test]
    fn test_text_param() {
        assert_eq!(text_param(None), None);
        assert_eq!(text_param(Some("")), None);
        assert_eq!(text_param(Some("text=")), None);
        assert_eq!(text_param(Some("other=1")), None);
        assert_eq!(
            text_param(Some("text=great%20news+today")).as_deref(),
            Some("great news today")
        );
        assert_eq!(text_param(Some("text=&text=second")).as_deref(), Some("second"));
    }
}
