//! HTTP surface: the inbound webhook and a health probe.
//!
//! The webhook always acknowledges with 200 "ok", whatever happened inside.
//! Anything else would make the messaging platform redeliver the update
//! indefinitely; failures are observable only through logs.

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{error, info, warn};

use crate::core::IngestionController;
use crate::domain::ChannelUpdate;

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<IngestionController>,
}

impl AppState {
    pub fn new(controller: Arc<IngestionController>) -> Self {
        Self { controller }
    }
}

/// Route table for the service
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/webhook", web::post().to(webhook))
        .route("/health", web::get().to(health));
}

/// Inbound messaging-platform update.
///
/// The body is parsed manually rather than through the JSON extractor: a
/// payload that fails to parse must still be acknowledged, not rejected
/// with a 400.
pub async fn webhook(state: web::Data<AppState>, body: web::Bytes) -> HttpResponse {
    let update: ChannelUpdate = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, "Unparseable webhook payload, acknowledging anyway");
            return ack();
        }
    };

    let update_id = update.update_id;
    match state.controller.handle_event(update.into_event()).await {
        Ok(outcome) => info!(?update_id, ?outcome, "Update handled"),
        Err(e) => error!(?update_id, error = ?e, "Update failed"),
    }

    ack()
}

/// Liveness probe
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

fn ack() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}
