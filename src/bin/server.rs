use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use cut_planner::api::{self, PlanRequest, PlanResponse, RequestError};
use cut_planner::error::PlanError;
use cut_planner::plan::DEFAULT_MAX_INSTANCES;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Clone)]
struct AppConfig {
    max_instances: usize,
}

fn status_for(err: &RequestError) -> StatusCode {
    match err {
        RequestError::NoPieces => StatusCode::BAD_REQUEST,
        RequestError::Plan(PlanError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        RequestError::Plan(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

async fn plan(
    State(config): State<AppConfig>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /plan"
    );

    api::handle(req, config.max_instances)
        .map(Json)
        .map_err(|e| {
            let status = status_for(&e);
            if status == StatusCode::INTERNAL_SERVER_ERROR {
                tracing::error!(error = %e, "planner failed");
                sentry::capture_error(&e);
            } else {
                tracing::warn!(error = %e, "rejected plan request");
            }
            (status, e.to_string())
        })
}

fn main() -> std::io::Result<()> {
    let _sentry = sentry::init((
        std::env::var("SENTRY_DSN").ok(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let log_path = std::env::var("LOG_FILE").unwrap_or_else(|_| "development.log".to_string());
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let max_instances = std::env::var("MAX_INSTANCES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_INSTANCES);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(serve(AppConfig { max_instances }))
}

async fn serve(config: AppConfig) -> std::io::Result<()> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/plan", post(plan))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(config);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    eprintln!("Listening on {addr}");
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use cut_planner::types::{PieceSpec, Rect};

    fn request(pieces: Vec<PieceSpec>) -> PlanRequest {
        PlanRequest {
            sheet: Rect::new(10, 10),
            pieces,
        }
    }

    fn config() -> State<AppConfig> {
        State(AppConfig {
            max_instances: DEFAULT_MAX_INSTANCES,
        })
    }

    #[tokio::test]
    async fn test_plan_ok() {
        let Json(resp) = plan(config(), Json(request(vec![PieceSpec::new(5, 10, 2)])))
            .await
            .unwrap();
        assert_eq!(resp.total_sheets, 1);
        assert_eq!(resp.overall_utilization.to_string(), "100.00%");
    }

    #[tokio::test]
    async fn test_plan_status_codes() {
        let (status, _) = plan(config(), Json(request(vec![]))).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, msg) = plan(config(), Json(request(vec![PieceSpec::new(11, 1, 1)])))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(msg.contains("11x1"));
    }
}
