use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use world_details_client::WorldDetailsClient;
use worldview_common::{Config, Dashboard};
use worldview_web::{load_records, router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("worldview=info".parse()?)
                .add_directive("world_details_client=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    let client = WorldDetailsClient::new(&config.world_api_url)?;

    let mut dashboard = Dashboard::new();
    dashboard.subscribe(|view| {
        info!(
            records = view.record_count,
            total = view.total_records,
            active_filters = view.filters.active().count(),
            "Dashboard view updated"
        );
    });

    let state = AppState::new(dashboard, Arc::new(client));

    // Single initial fetch; requests answer "loading" until it resolves.
    tokio::spawn(load_records(Arc::clone(&state)));

    let app = router(state);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("Worldview dashboard starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
