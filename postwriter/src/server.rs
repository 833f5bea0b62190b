use std::sync::Arc;

use anyhow::{anyhow, Result};
use rocket::figment::Figment;
use rocket::http::Status;
use rocket::request::Request;
use rocket::serde::json::Json;
use rocket::{catch, catchers, get, post, routes, Build, Rocket, State};
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use common::ServerConfig;

use crate::error::{ContentError, ErrorBody};
use crate::generator::{ContentGenerator, GeneratedContent};

/// Application state stored inside Rocket managed state.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<ContentGenerator>,
}

/// Request body for `/generate-post`.
#[derive(Debug, Deserialize)]
pub struct TopicRequest {
    pub topic: String,
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Serialize)]
struct HeartbeatResponse {
    status: &'static str,
}

#[get("/")]
async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Service is running",
    })
}

#[get("/heartbeat")]
async fn heartbeat() -> Json<HeartbeatResponse> {
    Json(HeartbeatResponse { status: "OK" })
}

/// Generate title, meta description and article body for a topic.
#[post("/generate-post", data = "<body>")]
async fn generate_post(
    state: &State<AppState>,
    body: Json<TopicRequest>,
) -> Result<Json<GeneratedContent>, ContentError> {
    let topic = body.into_inner().topic;
    let span = tracing::info_span!(
        "generate_post",
        request_id = %uuid::Uuid::new_v4(),
        topic = %topic
    );

    async move {
        tracing::info!("generating post");
        let content = state.generator.generate_content(&topic).await?;
        tracing::info!("post generated");
        Ok::<_, ContentError>(Json(content))
    }
    .instrument(span)
    .await
}

/// Every error outside the handler's own (bad JSON, unknown route, panic) still gets a
/// `{"detail": ...}` body.
#[catch(default)]
fn default_catcher(status: Status, req: &Request<'_>) -> (Status, Json<ErrorBody>) {
    let detail = status.reason().unwrap_or("Unknown error").to_string();
    tracing::warn!(status = status.code, uri = %req.uri(), "request failed: {}", detail);
    (status, Json(ErrorBody { detail }))
}

/// Build the Rocket instance without launching it.
pub fn build_rocket(state: AppState, figment: Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .manage(state)
        .mount("/", routes![root, heartbeat, generate_post])
        .register("/", catchers![default_catcher])
}

/// Launch the HTTP server bound to `server.address`/`server.port`.
///
/// This function blocks until the Rocket server shuts down (it awaits `rocket.launch().await`)
/// and returns an error if Rocket fails to start.
pub async fn launch_rocket(state: AppState, server: &ServerConfig) -> Result<()> {
    let fig = rocket::Config::figment()
        .merge(("address", server.address().to_string()))
        .merge(("port", server.port()));

    tracing::info!(address = server.address(), port = server.port(), "Starting Rocket HTTP server");
    build_rocket(state, fig)
        .launch()
        .await
        .map_err(|e| anyhow!("Rocket failed: {}", e))?;

    tracing::info!("Rocket HTTP server has shut down");
    Ok(())
}
