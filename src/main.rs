use std::net::SocketAddr;
use std::sync::Arc;

use diesel::prelude::*;

use rental_booking_backend::config::AppConfig;
use rental_booking_backend::db;
use rental_booking_backend::handlers::{self, AppState};
use rental_booking_backend::postgres::PostgresRepository;
use rental_booking_backend::repository::{BookingRepository, PropertyRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let config = AppConfig::load()?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    // Fail fast when the database is unreachable.
    let mut conn = db::establish_connection(&config.database_url)
        .map_err(|e| format!("failed to connect to database: {}", e))?;
    let test_query: i32 = diesel::select(diesel::dsl::sql::<diesel::sql_types::Integer>("1"))
        .get_result(&mut conn)?;
    log::info!("database test query result: {}", test_query);
    drop(conn);

    let repo = Arc::new(PostgresRepository::new(config.database_url.clone()));
    let bookings: Arc<dyn BookingRepository> = repo.clone();
    let properties: Arc<dyn PropertyRepository> = repo;
    let state = AppState {
        config,
        bookings,
        properties,
    };
    let app = handlers::router(state);

    log::info!("starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("server stopped");

    Ok(())
}

/// Resolves on SIGINT or SIGTERM so in-flight requests drain before exit.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to register SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
    }
    log::info!("shutdown signal received");
}
