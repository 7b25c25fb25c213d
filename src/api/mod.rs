// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! JSON API server.
//!
//! Handlers are grouped per resource:
//! - categories: list, create, rename/toggle, soft delete
//! - transactions: list, create, update, delete, bulk import
//! - budgets: list and upsert for one month
//! - reports: monthly summary

pub mod budgets;
pub mod categories;
pub mod reports;
pub mod transactions;

use crate::config::ServerConfig;
use crate::db;
use crate::error::{ApiError, ApiResult};
use anyhow::Context;
use axum::{
    Json, Router,
    routing::{get, post, put},
};
use log::info;
use rusqlite::Connection;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Shared handler state. Handlers keep no memory between requests; the
/// connection is the only thing they share.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    /// Poisoning is ignored: every statement commits on its own.
    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/api/categories/:id",
            put(categories::update).delete(categories::remove),
        )
        .route(
            "/api/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route("/api/transactions/import", post(transactions::import))
        .route(
            "/api/transactions/:id",
            put(transactions::update).delete(transactions::remove),
        )
        .route("/api/budgets", get(budgets::list).post(budgets::save))
        .route("/api/reports/summary", get(reports::summary))
        .fallback(not_found)
        .layer(cors)
        .with_state(state)
}

pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let conn = db::open_or_init(&config.db_path)?;
    info!("using database {}", config.db_path.display());
    let app = router(AppState::new(conn));

    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("Bind {}", config.listen))?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for ctrl-c: {}", e);
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".into())
}

// ==================== Validation helpers ====================

pub(crate) fn required<T>(v: Option<T>, field: &str) -> ApiResult<T> {
    v.ok_or_else(|| ApiError::missing(field))
}

/// Present and non-blank; returned trimmed.
pub(crate) fn required_text(v: Option<String>, field: &str) -> ApiResult<String> {
    let s = required(v, field)?;
    let s = s.trim();
    if s.is_empty() {
        return Err(ApiError::missing(field));
    }
    Ok(s.to_string())
}

pub(crate) fn month_param(v: Option<String>) -> ApiResult<String> {
    let raw = required_text(v, "month")?;
    crate::utils::parse_month(&raw)
        .map_err(|_| ApiError::validation(format!("Invalid month '{}', expected YYYY-MM", raw)))
}

pub(crate) fn ensure_category(conn: &Connection, id: i64) -> ApiResult<()> {
    if crate::store::categories::exists(conn, id)? {
        Ok(())
    } else {
        Err(ApiError::validation(format!("Category {} does not exist", id)))
    }
}
