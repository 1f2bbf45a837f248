use tradebook_server::{
    api::app_router, build_state, config::Config, init_tracing, run_startup_routine,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing();
    let state = build_state(&config).await?;

    let report = run_startup_routine(&state, &config).await;
    tracing::info!(
        "Startup complete: healthy={}, repaired={}, seeded={}",
        report.integrity.is_healthy,
        report.repaired,
        report.seeded
    );

    let router = app_router(state, &config);
    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
