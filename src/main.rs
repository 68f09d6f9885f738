use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use truxtok::config::{database, EnvironmentConfig};
use truxtok::create_app;
use truxtok::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,truxtok=debug")),
        )
        .init();

    info!("🚚 TruXtoK API");
    info!("==============");

    let config = match EnvironmentConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Invalid configuration: {}", e);
            return Err(anyhow::anyhow!("configuration error: {}", e));
        }
    };
    info!("🌍 Environment: {}", config.environment);

    let pool = match database::create_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Could not connect to the database: {}", e);
            return Err(anyhow::anyhow!("database error: {}", e));
        }
    };
    info!(
        "✅ Connected to {}",
        database::mask_database_url(&config.database_url)
    );

    if config.run_migrations {
        database::run_migrations(&pool).await?;
        info!("✅ Migrations applied");
    } else if config.is_development() {
        warn!("⚠️  RUN_MIGRATIONS is off, make sure the schema is up to date");
    }

    let addr = config.server_url();
    let app = create_app(AppState::new(pool, config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Listening on http://{}", addr);
    info!("🔐 Auth:       POST /api/auth/login, POST /api/auth/logout, GET /api/auth/me");
    info!("🛠️  Technician: /api/technician/trucks/:id/bins/:bin_id");
    info!("📦 Orders:     /api/orders, /api/invoice/:id");
    info!("💳 Credits:    /api/credits, /api/credits/redeem");
    info!("👑 Admin:      /api/admin/*");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Server error: {}", e);
            e
        })?;

    info!("👋 Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ Failed to install the SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("🛑 Ctrl+C received, shutting down..."),
        _ = terminate => info!("🛑 SIGTERM received, shutting down..."),
    }
}
