use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Minimum a check payload must carry; everything else is stored as sent.
#[derive(Deserialize)]
pub struct CheckInput {
    pub name: String,
    #[serde(rename = "checkType")]
    pub check_type: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl CheckInput {
    fn into_stored(self, id: Uuid, created_at: Value) -> Value {
        let mut check = self.rest;
        check.insert("id".to_string(), Value::String(id.to_string()));
        check.insert("name".to_string(), Value::String(self.name));
        check.insert("checkType".to_string(), Value::String(self.check_type));
        check.insert("created_at".to_string(), created_at);
        Value::Object(check)
    }
}

pub type Db = Arc<RwLock<HashMap<Uuid, Value>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/v1/checks", post(create_check))
        .route(
            "/v1/checks/{id}",
            get(get_check).put(update_check).delete(delete_check),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn authorize(headers: &HeaderMap) -> Result<(), StatusCode> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .unwrap_or_default();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(())
}

fn now() -> Value {
    Value::String(chrono::Utc::now().to_rfc3339())
}

async fn create_check(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CheckInput>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    authorize(&headers)?;
    let id = Uuid::new_v4();
    let check = input.into_stored(id, now());
    db.write().await.insert(id, check.clone());
    tracing::debug!(%id, "created check");
    Ok((StatusCode::CREATED, Json(check)))
}

async fn get_check(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, StatusCode> {
    authorize(&headers)?;
    let checks = db.read().await;
    checks.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_check(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(input): Json<CheckInput>,
) -> Result<Json<Value>, StatusCode> {
    authorize(&headers)?;
    let mut checks = db.write().await;
    let existing = checks.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    let created_at = existing.get("created_at").cloned().unwrap_or_else(now);
    let mut replaced = input.into_stored(id, created_at);
    if let Value::Object(fields) = &mut replaced {
        fields.insert("updated_at".to_string(), now());
    }
    *existing = replaced;
    Ok(Json(existing.clone()))
}

async fn delete_check(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    authorize(&headers)?;
    let mut checks = db.write().await;
    checks.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}
