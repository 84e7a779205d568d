//! # Animoshi API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[cfg(feature = "rate-limit")]
use middleware::rate_limit::RateLimitMiddleware;

/// How often idle rate-limit buckets are dropped.
#[cfg(feature = "rate-limit")]
const RATE_LIMIT_PRUNE_INTERVAL: std::time::Duration = std::time::Duration::from_secs(5 * 60);

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Animoshi API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to build application state");
        std::io::Error::other(e.to_string())
    })?;

    #[cfg(feature = "rate-limit")]
    {
        let limiter = state.rate_limiter.clone();
        actix_rt::spawn(async move {
            let mut interval = actix_rt::time::interval(RATE_LIMIT_PRUNE_INTERVAL);
            loop {
                interval.tick().await;
                limiter.prune();
            }
        });
    }

    let bind = (config.host.clone(), config.port);

    HttpServer::new(move || {
        let app = App::new();

        #[cfg(feature = "rate-limit")]
        let app = app.wrap(RateLimitMiddleware::new(state.rate_limiter.clone()));

        app.wrap(middleware::cors::cors(&config.cors_allowed_origins))
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(config.forwarded_headers)
            .configure(handlers::configure_routes)
    })
    .bind(bind)?
    .run()
    .await
}
