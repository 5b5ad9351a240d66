//! Suggestion endpoint
//!
//! Wraps the hosted text-completion model. Always answers 200; upstream
//! failures degrade to an empty completion.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRequest {
    pub partial_description: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub completion: String,
}

/// POST /suggest - Suggest a continuation for a partial todo description
async fn suggest_completion(
    State(state): State<AppState>,
    Json(req): Json<SuggestRequest>,
) -> Json<SuggestResponse> {
    let completion = state
        .suggest_client()
        .complete(&req.partial_description)
        .await;

    Json(SuggestResponse { completion })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/suggest", post(suggest_completion))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_suggest_never_fails() {
        let temp_dir = TempDir::new().unwrap();
        let state = AppState::new(temp_dir.path().to_path_buf()).await.unwrap();

        // No upstream configured in tests: the endpoint still answers with an
        // empty completion rather than an error.
        let resp = suggest_completion(
            State(state),
            Json(SuggestRequest {
                partial_description: "Explore Todo Bl".to_string(),
            }),
        )
        .await;

        assert_eq!(resp.0.completion, "");
    }
}
