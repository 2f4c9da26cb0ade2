#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use planner_recurrence::{JsonFileStore, Planner, PlannerConfig, TaskStore, http_api};

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = PlannerConfig::from_env()?;
    let addr: SocketAddr = config.http_addr.parse()?;

    let state = match config.store_path.clone() {
        Some(path) => {
            let store = JsonFileStore::new(&path);
            let tasks = store.load_tasks()?.unwrap_or_default();
            tracing::info!(count = tasks.len(), path = %path.display(), "loaded tasks");
            let planner = Planner::from_tasks(tasks, config)?;
            http_api::AppState::new(planner).with_store(Arc::new(store))
        }
        None => {
            tracing::info!("no store_path configured, tasks are kept in memory only");
            http_api::AppState::new(Planner::with_config(config))
        }
    };

    http_api::serve(addr, state).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
