//! Todo API endpoints
//!
//! RESTful API for todo CRUD operations.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use bloom_core::todo::{ordering, Todo, TodoRepository};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    pub text: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    /// Absent leaves the due date alone; explicit null clears it
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    /// Target position among active todos (move-to-position)
    #[serde(default)]
    pub order: Option<i64>,
}

/// Distinguishes a missing field from an explicit null
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /todos - List all todos, active (by rank) before completed
async fn list_todos(
    State(state): State<AppState>,
) -> Result<Json<Vec<Todo>>, (StatusCode, Json<ErrorResponse>)> {
    let todos = state.todo_store().list().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    Ok(Json(todos))
}

/// POST /todos - Create a new todo
async fn create_todo(
    State(state): State<AppState>,
    Json(req): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Todo>), (StatusCode, Json<ErrorResponse>)> {
    // Validate input
    if req.text.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Text is required".to_string(),
            }),
        ));
    }

    let active = state.todo_store().list_active().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    let mut todo = Todo::new(req.text).with_order(ordering::next_order(&active));

    if let Some(due_date) = req.due_date {
        todo = todo.with_due_date(due_date);
    }

    let created = state.todo_store().create(todo).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /todos/:id - Update a todo
///
/// Unknown ids surface as 500, not 404: legacy behavior the clients observe
/// and depend on.
async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTodoRequest>,
) -> Result<Json<Todo>, (StatusCode, Json<ErrorResponse>)> {
    let existing = state.todo_store().get(id).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    let mut todo = match existing {
        Some(t) => t,
        None => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update todo".to_string(),
                }),
            ))
        }
    };

    // Apply updates
    if let Some(text) = req.text {
        if text.trim().is_empty() {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Text is required".to_string(),
                }),
            ));
        }
        todo.text = text;
    }

    if let Some(completed) = req.completed {
        todo.set_completed(completed);
    }

    if let Some(due_date) = req.due_date {
        todo.due_date = due_date;
    }

    if let Some(position) = req.order {
        if todo.is_active() {
            move_active_todo(&state, &mut todo, position).await?;
        } else {
            // Completed todos are outside the ordering space; store the value
            // verbatim, nothing reads it.
            todo.order = position;
        }
    }

    let updated = state.todo_store().update(todo).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    Ok(Json(updated))
}

/// Move an active todo to a target position, renumbering the whole active
/// list so that rank order matches the intended sequence. `todo.order` is
/// updated in place; the other affected todos are persisted here.
async fn move_active_todo(
    state: &AppState,
    todo: &mut Todo,
    position: i64,
) -> Result<(), (StatusCode, Json<ErrorResponse>)> {
    let mut active = state.todo_store().list_active().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    // The same request may have just reactivated this todo; the stored
    // active list does not contain it yet in that case.
    match active.iter_mut().find(|t| t.id == todo.id) {
        Some(stored) => *stored = todo.clone(),
        None => active.push(todo.clone()),
    }

    let position = position.max(0) as usize;
    let changes = ordering::plan_move(&active, todo.id, position);

    let mut others = Vec::with_capacity(changes.len());
    for (changed_id, order) in changes {
        if changed_id == todo.id {
            todo.order = order;
        } else {
            others.push((changed_id, order));
        }
    }

    state.todo_store().apply_orders(&others).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })
}

/// DELETE /todos/:id - Delete a todo permanently
///
/// Unknown ids surface as 500 here too, with no side effect either way.
async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, (StatusCode, Json<ErrorResponse>)> {
    let deleted = state.todo_store().delete(id).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    if deleted {
        Ok(Json(DeleteResponse { success: true }))
    } else {
        Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to delete todo".to_string(),
            }),
        ))
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;

    async fn test_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let state = AppState::new(temp_dir.path().to_path_buf()).await.unwrap();
        (state, temp_dir)
    }

    async fn create(state: &AppState, text: &str) -> Todo {
        let result = create_todo(
            State(state.clone()),
            Json(CreateTodoRequest {
                text: text.to_string(),
                due_date: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(result.0, StatusCode::CREATED);
        result.1 .0
    }

    fn update_request() -> UpdateTodoRequest {
        UpdateTodoRequest {
            text: None,
            completed: None,
            due_date: None,
            order: None,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_orders() {
        let (state, _temp) = test_state().await;

        let first = create(&state, "Buy milk").await;
        let second = create(&state, "Walk dog").await;

        assert_eq!(first.order, 0);
        assert_eq!(second.order, 1);
        assert!(!first.completed);
        assert!(first.completed_at.is_none());

        let todos = list_todos(State(state)).await.unwrap().0;
        assert_eq!(todos.len(), 2);
    }

    #[tokio::test]
    async fn test_create_empty_text_rejected() {
        let (state, _temp) = test_state().await;

        let result = create_todo(
            State(state),
            Json(CreateTodoRequest {
                text: "   ".to_string(),
                due_date: None,
            }),
        )
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_order_skips_completed() {
        let (state, _temp) = test_state().await;

        let first = create(&state, "Buy milk").await;
        create(&state, "Walk dog").await;

        // Complete the first todo; its rank leaves the active space.
        let mut req = update_request();
        req.completed = Some(true);
        update_todo(State(state.clone()), Path(first.id), Json(req))
            .await
            .unwrap();

        let third = create(&state, "Water plants").await;
        assert_eq!(third.order, 2);
    }

    #[tokio::test]
    async fn test_toggle_completed_maintains_completed_at() {
        let (state, _temp) = test_state().await;
        let todo = create(&state, "Buy milk").await;

        let mut req = update_request();
        req.completed = Some(true);
        let completed = update_todo(State(state.clone()), Path(todo.id), Json(req))
            .await
            .unwrap()
            .0;
        assert!(completed.completed);
        let first_stamp = completed.completed_at.expect("completed_at set");

        let mut req = update_request();
        req.completed = Some(false);
        let reactivated = update_todo(State(state.clone()), Path(todo.id), Json(req))
            .await
            .unwrap()
            .0;
        assert!(!reactivated.completed);
        assert!(reactivated.completed_at.is_none());

        let mut req = update_request();
        req.completed = Some(true);
        let recompleted = update_todo(State(state), Path(todo.id), Json(req))
            .await
            .unwrap()
            .0;
        assert!(recompleted.completed_at.expect("fresh stamp") >= first_stamp);
    }

    #[tokio::test]
    async fn test_update_empty_text_leaves_store_unchanged() {
        let (state, _temp) = test_state().await;
        let todo = create(&state, "Buy milk").await;

        let mut req = update_request();
        req.text = Some("".to_string());
        let err = update_todo(State(state.clone()), Path(todo.id), Json(req))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);

        let stored = state.todo_store().get(todo.id).await.unwrap().unwrap();
        assert_eq!(stored.text, "Buy milk");
    }

    #[tokio::test]
    async fn test_update_unknown_id_returns_500() {
        let (state, _temp) = test_state().await;

        let err = update_todo(State(state), Path(Uuid::new_v4()), Json(update_request()))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_update_clears_due_date_on_null() {
        let (state, _temp) = test_state().await;

        let created = create_todo(
            State(state.clone()),
            Json(CreateTodoRequest {
                text: "Buy milk".to_string(),
                due_date: Some(Utc::now()),
            }),
        )
        .await
        .unwrap()
        .1
         .0;
        assert!(created.due_date.is_some());

        let mut req = update_request();
        req.due_date = Some(None);
        let updated = update_todo(State(state), Path(created.id), Json(req))
            .await
            .unwrap()
            .0;
        assert!(updated.due_date.is_none());
    }

    #[tokio::test]
    async fn test_delete_then_delete_again() {
        let (state, _temp) = test_state().await;
        let todo = create(&state, "Buy milk").await;

        let resp = delete_todo(State(state.clone()), Path(todo.id)).await.unwrap();
        assert!(resp.0.success);

        let todos = list_todos(State(state.clone())).await.unwrap().0;
        assert!(todos.is_empty());

        // Second delete is a no-op error, not a success.
        let err = delete_todo(State(state), Path(todo.id)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_list_active_before_completed() {
        let (state, _temp) = test_state().await;

        let milk = create(&state, "Buy milk").await;
        create(&state, "Walk dog").await;

        let mut req = update_request();
        req.completed = Some(true);
        update_todo(State(state.clone()), Path(milk.id), Json(req))
            .await
            .unwrap();

        let todos = list_todos(State(state)).await.unwrap().0;
        assert_eq!(todos[0].text, "Walk dog");
        assert!(!todos[0].completed);
        assert_eq!(todos[1].text, "Buy milk");
        assert!(todos[1].completed);
        assert!(todos[1].completed_at.is_some());
    }

    #[tokio::test]
    async fn test_reorder_moves_todo_before_another() {
        let (state, _temp) = test_state().await;

        let a = create(&state, "a").await;
        let b = create(&state, "b").await;
        let c = create(&state, "c").await;

        let mut done = update_request();
        done.completed = Some(true);
        let completed = update_todo(State(state.clone()), Path(c.id), Json(done))
            .await
            .unwrap()
            .0;

        // Move b to the front, immediately before a.
        let mut req = update_request();
        req.order = Some(0);
        update_todo(State(state.clone()), Path(b.id), Json(req))
            .await
            .unwrap();

        let todos = list_todos(State(state)).await.unwrap().0;
        assert_eq!(todos[0].id, b.id);
        assert_eq!(todos[1].id, a.id);
        // Completed todo untouched, still last.
        assert_eq!(todos[2].id, c.id);
        assert_eq!(todos[2].order, completed.order);
    }

    #[tokio::test]
    async fn test_reactivate_and_reorder_in_one_request() {
        let (state, _temp) = test_state().await;

        let a = create(&state, "a").await;
        create(&state, "b").await;

        let mut done = update_request();
        done.completed = Some(true);
        update_todo(State(state.clone()), Path(a.id), Json(done))
            .await
            .unwrap();

        // One request both reactivates a and moves it behind b.
        let mut req = update_request();
        req.completed = Some(false);
        req.order = Some(1);
        let updated = update_todo(State(state.clone()), Path(a.id), Json(req))
            .await
            .unwrap()
            .0;
        assert!(!updated.completed);
        assert_eq!(updated.order, 1);

        let todos = list_todos(State(state)).await.unwrap().0;
        let texts: Vec<&str> = todos.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_reorder_completed_todo_sets_field_verbatim() {
        let (state, _temp) = test_state().await;

        let a = create(&state, "a").await;
        let b = create(&state, "b").await;

        let mut done = update_request();
        done.completed = Some(true);
        update_todo(State(state.clone()), Path(a.id), Json(done))
            .await
            .unwrap();

        let mut req = update_request();
        req.order = Some(9);
        let updated = update_todo(State(state.clone()), Path(a.id), Json(req))
            .await
            .unwrap()
            .0;
        assert_eq!(updated.order, 9);

        // The active todo's rank is untouched.
        let stored = state.todo_store().get(b.id).await.unwrap().unwrap();
        assert_eq!(stored.order, b.order);
    }

    #[tokio::test]
    async fn test_put_null_due_date_clears_it_over_the_wire() {
        let (state, _temp) = test_state().await;

        let created = create_todo(
            State(state.clone()),
            Json(CreateTodoRequest {
                text: "Buy milk".to_string(),
                due_date: Some(Utc::now()),
            }),
        )
        .await
        .unwrap()
        .1
         .0;

        let app = router().with_state(state);

        // A payload without the field leaves the due date alone.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/todos/{}", created.id))
                    .header("Content-Type", "application/json")
                    .body(Body::from(json!({"completed": true}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: Value = serde_json::from_slice(&body).unwrap();
        assert!(payload["dueDate"].is_string());

        // An explicit null clears it.
        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/todos/{}", created.id))
                    .header("Content-Type", "application/json")
                    .body(Body::from(json!({"dueDate": null}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: Value = serde_json::from_slice(&body).unwrap();
        assert!(payload["dueDate"].is_null());
    }

    #[tokio::test]
    async fn test_unknown_id_returns_500_over_the_wire() {
        let (state, _temp) = test_state().await;
        let app = router().with_state(state);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/todos/{}", Uuid::new_v4()))
                    .header("Content-Type", "application/json")
                    .body(Body::from(json!({"completed": true}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: Value = serde_json::from_slice(&body).unwrap();
        assert!(payload["error"].is_string());

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/todos/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
