use axum::{
    http::HeaderValue,
    routing::{get, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use studytrack_api::config::{self, Environment};
use studytrack_api::database::manager::DatabaseManager;
use studytrack_api::middleware::auth::jwt_auth_middleware;
use studytrack_api::middleware::resolve_user::resolve_user_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, STUDYTRACK_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting studytrack API in {:?} mode", config.environment);

    // The server still comes up if the database is down; /health reports it.
    if let Err(e) = DatabaseManager::migrate().await {
        tracing::warn!("migrations not applied at startup: {}", e);
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("STUDYTRACK_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("studytrack API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Identity-provider hooks (public - called by the provider, not users)
        .merge(hook_routes())
        // Protected API
        .merge(api_routes())
        // Global middleware
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn hook_routes() -> Router {
    use axum::routing::post;
    use studytrack_api::handlers::public::users;

    Router::new().route("/hooks/users", post(users::provision).put(users::update))
}

fn api_routes() -> Router {
    use studytrack_api::handlers::protected::{
        cards, decks, profile, progress, revision, subjects, tasks, tests,
    };

    Router::new()
        // Current user's profile
        .route("/api/profile", get(profile::get).patch(profile::update))
        // Subjects
        .route("/api/subjects", get(subjects::list).post(subjects::create))
        .route(
            "/api/subjects/:id",
            get(subjects::get)
                .patch(subjects::update)
                .delete(subjects::delete),
        )
        .route("/api/subjects/:id/progress", put(subjects::update_progress))
        // Tasks
        .route("/api/tasks", get(tasks::list).post(tasks::create))
        .route(
            "/api/tasks/:id",
            get(tasks::get).patch(tasks::update).delete(tasks::delete),
        )
        .route("/api/tasks/:id/status", put(tasks::update_status))
        // Tests and the trend view
        .route("/api/tests", get(tests::list).post(tests::create))
        .route("/api/tests/trends", get(tests::trends))
        .route(
            "/api/tests/:id",
            get(tests::get).patch(tests::update).delete(tests::delete),
        )
        .route("/api/tests/:id/result", put(tests::log_result))
        // Flashcard decks and cards
        .route("/api/decks", get(decks::list).post(decks::create))
        .route(
            "/api/decks/:id",
            get(decks::get).patch(decks::update).delete(decks::delete),
        )
        .route("/api/decks/:id/cards", get(cards::list).post(cards::create))
        .route(
            "/api/cards/:id",
            get(cards::get).patch(cards::update).delete(cards::delete),
        )
        // Aggregation views
        .route("/api/progress", get(progress::overview))
        .route("/api/revision/weak-topics", get(revision::get_weak_topics))
        .route(
            "/api/revision/recommendations",
            get(revision::get_recommendations),
        )
        // Resolve the caller once per request, after JWT validation
        .layer(axum::middleware::from_fn(resolve_user_middleware))
        .layer(axum::middleware::from_fn(jwt_auth_middleware))
}

fn cors_layer() -> CorsLayer {
    let security = &config::config().security;
    if !security.enable_cors {
        return CorsLayer::new();
    }

    match config::config().environment {
        Environment::Development => CorsLayer::permissive(),
        _ => {
            let origins: Vec<HeaderValue> = security
                .cors_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "studytrack API",
            "version": version,
            "description": "Backend API for a personal exam-prep study tracking dashboard",
            "endpoints": {
                "home": "/ (public)",
                "hooks": "/hooks/users (public - identity provider provisioning)",
                "profile": "/api/profile (protected)",
                "subjects": "/api/subjects[/:id] (protected)",
                "tasks": "/api/tasks[/:id] (protected)",
                "tests": "/api/tests[/:id], /api/tests/trends (protected)",
                "flashcards": "/api/decks[/:id], /api/decks/:id/cards, /api/cards/:id (protected)",
                "progress": "/api/progress (protected)",
                "revision": "/api/revision/* (protected)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
