use axum::http::{header, HeaderValue, Method};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};

use studio::api;
use studio::app_state::AppState;
use studio::clients::Clients;
use studio::config::StudioConfig;

fn load_env_file() {
    let cwd = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::warn!(error = %e, "Could not determine current directory for .env lookup");
            return;
        }
    };

    // Search the current directory and ancestors so running from `studio/`
    // still picks up a repo-root `.env`.
    let mut current = cwd.clone();
    loop {
        let candidate = current.join(".env");
        if candidate.exists() {
            match dotenvy::from_path(&candidate) {
                Ok(_) => {
                    tracing::info!(path = %candidate.display(), "Loaded environment from .env");
                }
                Err(e) => {
                    tracing::warn!(
                        path = %candidate.display(),
                        error = %e,
                        "Failed to load .env file"
                    );
                }
            }
            return;
        }

        if !current.pop() {
            break;
        }
    }

    tracing::info!(
        cwd = %cwd.display(),
        "No .env file found in current directory or ancestors; using process environment only"
    );
}

fn cors_layer() -> CorsLayer {
    let origins = std::env::var("STUDIO_CORS_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());
    let allowed = origins
        .split(',')
        .filter_map(|origin| HeaderValue::from_str(origin.trim()).ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::PATCH,
            Method::PUT,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .max_age(std::time::Duration::from_secs(3600))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    load_env_file();

    tracing::info!("Starting Siteloom Studio");

    let config = StudioConfig::from_env();
    tracing::info!(
        planner = %config.planner_url,
        store = %config.store_url,
        media = %config.media_url,
        preview = %config.preview_base_url,
        "Collaborator endpoints configured"
    );

    let clients = Clients::http(
        config.planner_url.clone(),
        config.store_url.clone(),
        config.media_url.clone(),
    );

    let bind_addr = config.bind_addr.clone();
    let app_state = Arc::new(AppState::new(clients, config));
    app_state
        .ensure_supervisor()
        .await
        .expect("Failed to spawn StudioSupervisor");

    let api_state = api::ApiState { app_state };
    let app = api::router().with_state(api_state).layer(cors_layer());

    tracing::info!(addr = %bind_addr, "Starting HTTP server");
    let listener = TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}
