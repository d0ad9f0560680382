use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arcade::player::{InMemoryPlayerRepository, PlayerRepository, PostgresPlayerRepository};
use arcade::round::InMemoryRoundStore;
use arcade::score::{
    InMemoryScoreRepository, PostgresScoreRepository, ScoreRepository, ScoreService,
};
use arcade::shared::AppState;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arcade=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting casual games server");

    // In-memory repositories by default; Postgres when DATABASE_URL is set
    let (player_repository, score_repository): (
        Arc<dyn PlayerRepository + Send + Sync>,
        Arc<dyn ScoreRepository + Send + Sync>,
    ) = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = sqlx::PgPool::connect(&database_url)
                .await
                .expect("Failed to connect to database");
            info!("Using PostgreSQL repositories");
            (
                Arc::new(PostgresPlayerRepository::new(pool.clone())),
                Arc::new(PostgresScoreRepository::new(pool)),
            )
        }
        Err(_) => {
            info!("DATABASE_URL not set, using in-memory repositories");
            (
                Arc::new(InMemoryPlayerRepository::new()),
                Arc::new(InMemoryScoreRepository::new()),
            )
        }
    };

    let state = AppState::new(
        player_repository,
        Arc::new(InMemoryRoundStore::new()),
        Arc::new(ScoreService::new(score_repository)),
    );

    let app = arcade::app(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    info!("Server running on http://localhost:3000");
    axum::serve(listener, app).await.unwrap();
}
