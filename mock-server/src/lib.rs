use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

const AUTH_PREFIX: &str = "GoogleLogin auth=";

/// Body of `POST /submit` as the service reads it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitJob {
    pub printerid: String,
    #[serde(default)]
    pub title: String,
    pub content: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
    #[serde(rename = "contentTransferEncoding", default, skip_serializing_if = "Option::is_none")]
    pub content_transfer_encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<String>,
}

/// A job the mock has accepted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub printerid: String,
    pub title: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
    pub content: String,
    #[serde(rename = "contentTransferEncoding", skip_serializing_if = "Option::is_none")]
    pub content_transfer_encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<String>,
}

#[derive(Debug, Default)]
pub struct Service {
    pub printers: Vec<Value>,
    pub jobs: Vec<Job>,
}

pub type Db = Arc<RwLock<Service>>;

/// Printers every fresh `app()` starts with.
pub fn default_printers() -> Vec<Value> {
    vec![
        json!({"id": "printer-1", "name": "Office LaserJet", "connectionStatus": "ONLINE"}),
        json!({"id": "printer-2", "name": "Save to Google Drive", "connectionStatus": "ONLINE"}),
    ]
}

pub fn app() -> Router {
    app_with_printers(default_printers())
}

pub fn app_with_printers(printers: Vec<Value>) -> Router {
    let db: Db = Arc::new(RwLock::new(Service {
        printers,
        jobs: Vec::new(),
    }));
    Router::new()
        .route("/search", get(search))
        .route("/submit", post(submit))
        .route("/jobs", get(jobs))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

type Rejection = (StatusCode, String);

fn authorize(headers: &HeaderMap) -> Result<(), Rejection> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(AUTH_PREFIX))
        .unwrap_or("");
    if token.is_empty() {
        return Err((StatusCode::FORBIDDEN, "Authentication required".to_string()));
    }
    Ok(())
}

async fn search(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Value>, Rejection> {
    authorize(&headers)?;
    let service = db.read().await;
    Ok(Json(json!({
        "success": true,
        "printers": service.printers,
    })))
}

async fn submit(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<SubmitJob>,
) -> Result<Json<Value>, Rejection> {
    authorize(&headers)?;
    let mut service = db.write().await;

    let known = service
        .printers
        .iter()
        .any(|p| p.get("id").and_then(Value::as_str) == Some(input.printerid.as_str()));
    if !known {
        return Ok(Json(json!({
            "success": false,
            "message": "Invalid printer",
            "errorCode": 413,
        })));
    }

    let job = Job {
        id: Uuid::new_v4(),
        printerid: input.printerid,
        title: input.title,
        content_type: input.content_type,
        content: input.content,
        content_transfer_encoding: input.content_transfer_encoding,
        ticket: input.ticket,
    };
    info!(job_id = %job.id, printer = %job.printerid, "print job accepted");
    service.jobs.push(job.clone());
    Ok(Json(json!({
        "success": true,
        "message": "Print job added.",
        "job": job,
    })))
}

async fn jobs(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Value>, Rejection> {
    authorize(&headers)?;
    let service = db.read().await;
    Ok(Json(json!({
        "success": true,
        "jobs": service.jobs,
    })))
}
