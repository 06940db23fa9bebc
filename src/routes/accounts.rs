use crate::{
    errors::{AppError, RequestError},
    state::AppState,
    structs::accounts::{Account, AccountListing, NewAccount},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, put},
    Json, Router,
};
use uuid::Uuid;

pub fn new() -> Router<AppState> {
    Router::new()
        .route("/", get(get_accounts).post(create_account))
        .route("/{id}", put(update_account).delete(delete_account))
}

/// 取客戶清單, 包含已停用的, 以及區域 / 頻率無法解析的舊資料
async fn get_accounts(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<AccountListing>, AppError> {
    let listing = state.accounts.list_accounts(user_id).await?;
    if !listing.invalid.is_empty() {
        tracing::warn!(
            "user {} has {} accounts that need fixing",
            user_id,
            listing.invalid.len()
        );
    }

    Ok(Json(listing))
}

async fn create_account(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    payload: Result<Json<NewAccount>, JsonRejection>,
) -> Result<Json<Account>, AppError> {
    let Json(payload) = payload?;
    payload.validate().map_err(RequestError::InvalidContent)?;

    let account = state.accounts.create_account(user_id, payload).await?;
    tracing::info!("user {} created account {}", user_id, account.id);

    Ok(Json(account))
}

async fn update_account(
    State(state): State<AppState>,
    Path((user_id, id)): Path<(Uuid, Uuid)>,
    payload: Result<Json<NewAccount>, JsonRejection>,
) -> Result<Json<Account>, AppError> {
    let Json(payload) = payload?;
    payload.validate().map_err(RequestError::InvalidContent)?;

    let account = state.accounts.update_account(user_id, id, payload).await?;

    Ok(Json(account))
}

/// 軟刪除
async fn delete_account(
    State(state): State<AppState>,
    Path((user_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<()>, AppError> {
    state.accounts.deactivate_account(user_id, id).await?;
    tracing::info!("user {} deactivated account {}", user_id, id);

    Ok(Json(()))
}

#[cfg(test)]
mod tests {
    use crate::{
        config::AppConfig, repositories::memory::MemoryStore, routes::app, state::AppState,
        structs::accounts::Account,
    };
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn test_app() -> Router {
        let store = Arc::new(MemoryStore::default());
        app(AppState::with_repositories(
            AppConfig::default(),
            store.clone(),
            store,
        ))
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn create_update_and_deactivate_account() {
        let app = test_app();
        let user_id = Uuid::new_v4();
        let base = format!("/users/{user_id}/accounts");

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &base,
                json!({
                    "name": "Celebration",
                    "address": "701 Front St, Celebration, FL",
                    "region": "Orlando",
                    "tags": ["firstStop"]
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created: Account = serde_json::from_value(body_json(response).await).unwrap();
        assert!(created.is_active);

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("{base}/{}", created.id),
                json!({
                    "name": "Celebration Market",
                    "address": "701 Front St, Celebration, FL",
                    "region": "Orlando",
                    "frequency": "biweekly"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["name"], json!("Celebration Market"));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("{base}/{}", created.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::builder().uri(&base).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let listed = body_json(response).await;
        assert_eq!(listed["accounts"].as_array().unwrap().len(), 1);
        assert_eq!(listed["accounts"][0]["isActive"], json!(false));
        assert_eq!(listed["invalid"], json!([]));
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let response = test_app()
            .oneshot(json_request(
                "POST",
                &format!("/users/{}/accounts", Uuid::new_v4()),
                json!({ "name": " ", "address": "1 Main St", "region": "Tampa" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"]
            .as_str()
            .unwrap()
            .contains("name"));
    }

    #[tokio::test]
    async fn unknown_region_is_json_bad_request() {
        let response = test_app()
            .oneshot(json_request(
                "POST",
                &format!("/users/{}/accounts", Uuid::new_v4()),
                json!({ "name": "Legends", "address": "1 Main St", "region": "DTE Legends" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn updating_missing_account_is_404() {
        let response = test_app()
            .oneshot(json_request(
                "PUT",
                &format!("/users/{}/accounts/{}", Uuid::new_v4(), Uuid::new_v4()),
                json!({ "name": "A", "address": "1 Main St", "region": "Ocala" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
