use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use review_server::api::AppState;
use review_server::{create_app, db};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "review_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Get data path from environment or use default
    let data_path = std::env::var("REVIEW_SERVER_DATA_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir().join("review-server"));

    // Initialize database
    let db_path = data_path.join("review.db");
    let db = db::init_database(&db_path)
        .await
        .expect("Failed to initialize database");
    tracing::info!("Database initialized at {:?}", db_path);

    let state = Arc::new(AppState::new(db));

    // Ensure default admin user exists (for bootstrapping)
    state
        .auth
        .ensure_admin_user("admin", "admin")
        .await
        .expect("Failed to create admin user");

    let app = create_app(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = std::env::var("REVIEW_SERVER_ADDR")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8080)));

    tracing::info!("Review server starting on http://{}", addr);
    tracing::info!("Default admin: admin/admin");
    tracing::info!("");
    tracing::info!("Pages:");
    tracing::info!("  /                      - published reviews, newest updates first");
    tracing::info!("  /tag/<tag>             - reviews carrying a tag");
    tracing::info!("  /<y>/<m>/<d>/<slug>    - review detail and discussion");
    tracing::info!("  /admin/reviews         - authoring and moderation (admin only)");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
