//! NIDS Dashboard - server entry point

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use nids_core::{evaluate, top_features, ForestModel, SamplePool, TrafficSimulator};
use nids_dashboard::{config::Config, create_router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    init_tracing(Config::log_json_from_env());
    let config = Config::from_env();

    tracing::info!("NIDS Dashboard starting...");

    let pool = SamplePool::load(&config.pool_path)
        .with_context(|| format!("failed to load sample pool from {}", config.pool_path.display()))?;
    let model = ForestModel::load(&config.model_path)
        .with_context(|| format!("failed to load model from {}", config.model_path.display()))?;

    if config.evaluate_on_startup {
        log_evaluation(&model, &pool);
    }

    let pool = Arc::new(pool);
    let model = Arc::new(model);

    let simulator = TrafficSimulator::from_seed(pool, model.clone(), config.simulation_seed)
        .context("failed to initialize traffic simulator")?;

    // Seed the feed so the first poll already has history
    tracing::info!("Initializing simulation...");
    simulator
        .prewarm(config.prewarm_samples)
        .context("failed to pre-warm simulation")?;

    let state = AppState::new(Arc::new(simulator), model);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Dashboard listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(log_json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "nids_dashboard=debug,nids_core=info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Held-out accuracy and top indicators, like the training report
fn log_evaluation(model: &ForestModel, pool: &SamplePool) {
    if !pool.is_labeled() {
        tracing::info!("Sample pool has no labels, skipping evaluation");
        return;
    }

    match evaluate(model, pool) {
        Ok(report) => {
            for line in report.to_string().lines() {
                tracing::info!("{}", line);
            }
        }
        Err(e) => {
            tracing::warn!("Evaluation failed: {}", e);
            return;
        }
    }

    tracing::info!("TOP 5 INDICATORS OF ATTACK:");
    for (rank, feature) in top_features(model, 5).iter().enumerate() {
        tracing::info!("{}. {} ({:.4})", rank + 1, feature.name, feature.importance);
    }
}
