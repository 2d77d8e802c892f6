use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use concierge::config::AppConfig;
use concierge::db;
use concierge::handlers;
use concierge::services::ai::gemini::GeminiProvider;
use concierge::services::ai::groq::GroqProvider;
use concierge::services::ai::ollama::OllamaProvider;
use concierge::services::ai::LlmProvider;
use concierge::services::hotel::sqlite::SqliteHotel;
use concierge::services::session::{self, InMemorySessionStore, SessionStore};
use concierge::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    let hotel = SqliteHotel::new(Arc::new(Mutex::new(conn)));

    if let Some((email, token)) = config.guest_email.as_deref().zip(config.guest_token.as_deref()) {
        hotel.register_guest(email, token)?;
        tracing::info!(email, "registered guest account");
    }

    let llm: Box<dyn LlmProvider> = match config.llm_provider.as_str() {
        "groq" => {
            anyhow::ensure!(!config.groq_api_key.is_empty(), "GROQ_API_KEY must be set when LLM_PROVIDER=groq");
            tracing::info!("using Groq LLM provider (model: {})", config.groq_model);
            Box::new(GroqProvider::new(config.groq_api_key.clone(), config.groq_model.clone())?)
        }
        "gemini" => {
            anyhow::ensure!(!config.gemini_api_key.is_empty(), "GEMINI_API_KEY must be set when LLM_PROVIDER=gemini");
            tracing::info!("using Gemini LLM provider (model: {})", config.gemini_model);
            Box::new(GeminiProvider::new(config.gemini_api_key.clone(), config.gemini_model.clone())?)
        }
        _ => {
            tracing::info!("using Ollama LLM provider (url: {})", config.ollama_url);
            Box::new(OllamaProvider::new(config.ollama_url.clone(), config.ollama_model.clone())?)
        }
    };

    let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(
        Duration::from_secs(config.session_ttl_minutes * 60),
    ));
    session::spawn_sweeper(
        Arc::clone(&sessions),
        Duration::from_secs(config.session_sweep_seconds),
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        llm,
        sessions,
        rooms: Box::new(hotel.clone()),
        bookings: Box::new(hotel.clone()),
        accounts: Box::new(hotel.clone()),
        identity: Box::new(hotel),
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
