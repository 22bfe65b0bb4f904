use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::ServerConfig;
use crate::dashboard::{Dashboard, DisplayState};
use crate::models::map::escape_html;

const DASHBOARD_TEMPLATE: &str = include_str!("../assets/dashboard.html");

/// Full application router: dashboard page, current map and the JSON API
pub fn app(dashboard: Arc<Dashboard>, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/map", get(current_map))
        .nest("/api", api::router())
        .with_state(dashboard)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn run(config: &ServerConfig, dashboard: Arc<Dashboard>, request_timeout: Duration) -> Result<()> {
    let app = app(dashboard, request_timeout);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Dashboard running at http://localhost:{}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server failed")?;

    tracing::info!("Dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn index(State(dashboard): State<Arc<Dashboard>>) -> Html<String> {
    let control = dashboard.control();
    let selected = control.selection().value;
    let settings = dashboard.settings();

    let options = control
        .options()
        .iter()
        .map(|option| {
            let marker = if *option == selected { " selected" } else { "" };
            let option = escape_html(option);
            format!("    <option value=\"{option}\"{marker}>{option}</option>")
        })
        .collect::<Vec<_>>()
        .join("\n");

    Html(
        DASHBOARD_TEMPLATE
            .replace("{{CONTROL_NAME}}", &escape_html(control.name()))
            .replace("{{OPTIONS}}", &options)
            .replace("{{WIDTH}}", &settings.width.to_string())
            .replace("{{HEIGHT}}", &settings.height.to_string()),
    )
}

/// Whatever the display surface holds right now
async fn current_map(State(dashboard): State<Arc<Dashboard>>) -> Response {
    match dashboard.surface().current() {
        DisplayState::Ready { object, .. } => Html(object.to_html()).into_response(),
        DisplayState::Pending => {
            Html("<!DOCTYPE html><html><body><p>Loading…</p></body></html>".to_string())
                .into_response()
        }
        DisplayState::Failed { message, error, .. } => (
            api::status_for(&error),
            Html(format!(
                "<!DOCTYPE html><html><body><p>{}</p></body></html>",
                escape_html(&message)
            )),
        )
            .into_response(),
    }
}
