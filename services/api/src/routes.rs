use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Extension;
use axum::Json;
use permit_view::errands::{errand_router, CaseBackend, ErrandService};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_errand_routes<B>(service: Arc<ErrandService<B>>) -> axum::Router
where
    B: CaseBackend + 'static,
{
    let stats_service = service.clone();
    errand_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/cache/stats",
            get(move || cache_stats_endpoint(stats_service.clone())),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn cache_stats_endpoint<B>(
    service: Arc<ErrandService<B>>,
) -> Json<serde_json::Value>
where
    B: CaseBackend + 'static,
{
    let caches: Vec<serde_json::Value> = service
        .cache_stats()
        .into_iter()
        .map(|(name, stats)| {
            json!({
                "name": name,
                "hits": stats.hits,
                "misses": stats.misses,
                "entries": stats.entries,
            })
        })
        .collect();

    Json(json!({ "caches": caches }))
}
