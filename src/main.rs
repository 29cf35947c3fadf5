use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use orchestra_records::infrastructure::AppState;
use orchestra_records::{config, db, seed, server};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orchestra_records=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize database
    let db = db::init_db(&config.database_url)
        .await
        .expect("Failed to initialize database");

    if let Err(e) = tokio::fs::create_dir_all(&config.media_root).await {
        tracing::error!(
            "Cannot create media directory {}: {}",
            config.media_root.display(),
            e
        );
    }

    let state = AppState::new(db, config.media_root.clone());

    if config.seed_demo {
        tracing::info!("Seeding demo data...");
        if let Err(e) = seed::seed_demo_data(&state).await {
            tracing::error!("Failed to seed data: {}", e);
        } else {
            tracing::info!("Demo data seeded successfully.");
        }
    }

    let app = server::build_router(state);

    let (listener, port) = server::bind(config.port)
        .await
        .expect("Failed to bind HTTP listener");
    tracing::info!("Orchestra Records listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await.expect("Server error");
}
