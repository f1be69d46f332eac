use std::net::SocketAddr;
use std::sync::Arc;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::{self, TraceLayer};
use tracing::{Level, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use dialogue_cell::DialogueState;
use scheduling_cell::{ClinicSchedule, ScheduleStore, SchedulingState};
use shared_config::AppConfig;

#[tokio::main]
async fn main() {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting clinic scheduling assistant API server");

    // Load configuration
    let config = AppConfig::from_env();

    // Open the clinic schedule document
    let store = match ScheduleStore::load(&config.schedule_data_path, ClinicSchedule::default()) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!("Failed to open schedule store at {}: {}", config.schedule_data_path, e);
            std::process::exit(1);
        }
    };

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Create shared state
    let scheduling_state = Arc::new(SchedulingState {
        config: config.clone(),
        store: Arc::clone(&store),
    });
    let dialogue_state = Arc::new(DialogueState::new(&config, store));

    // Build the application router
    let app = router::create_router(scheduling_state, dialogue_state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new()
                    .level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new()
                    .level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app)
        .await
        .unwrap();
}
