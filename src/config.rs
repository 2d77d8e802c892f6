use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub hotel_name: String,
    pub llm_provider: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub groq_api_key: String,
    pub groq_model: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub session_ttl_minutes: u64,
    pub session_sweep_seconds: u64,
    pub payment_url: String,
    pub guest_email: Option<String>,
    pub guest_token: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "concierge.db".to_string()),
            hotel_name: env::var("HOTEL_NAME")
                .unwrap_or_else(|_| "Bhagat Singh Resort".to_string()),
            llm_provider: env::var("LLM_PROVIDER").unwrap_or_else(|_| "ollama".to_string()),
            ollama_url: env::var("OLLAMA_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            ollama_model: env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".to_string()),
            groq_api_key: env::var("GROQ_API_KEY").unwrap_or_default(),
            groq_model: env::var("GROQ_MODEL")
                .unwrap_or_else(|_| "llama-3.1-8b-instant".to_string()),
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            session_ttl_minutes: env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &u64| *v > 0)
                .unwrap_or(30),
            session_sweep_seconds: env::var("SESSION_SWEEP_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &u64| *v > 0)
                .unwrap_or(60),
            payment_url: env::var("PAYMENT_URL").unwrap_or_default(),
            guest_email: env::var("GUEST_EMAIL").ok().filter(|v| !v.is_empty()),
            guest_token: env::var("GUEST_TOKEN").ok().filter(|v| !v.is_empty()),
        }
    }
}
