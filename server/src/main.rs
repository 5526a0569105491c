use tokio::net::TcpListener;
use todo_server::{Config, StartupError, TodoStore, ENDPOINTS};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,todo_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let store = TodoStore::open(&config.database_path).inspect_err(|e| {
        tracing::error!(path = %config.database_path.display(), error = %e, "cannot open database");
    })?;
    tracing::info!(path = %config.database_path.display(), "database ready");

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("todo API listening on http://{addr}");
    for endpoint in ENDPOINTS {
        tracing::info!("  {endpoint}");
    }

    todo_server::run(listener, store, shutdown_signal()).await?;

    tracing::info!("server stopped, database closed");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "cannot listen for ctrl-c, running until killed");
            std::future::pending::<()>().await;
        }
    }
}
