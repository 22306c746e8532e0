use std::env;

/// Environment-driven settings. Required secrets fail fast at startup;
/// everything else has a default.
#[derive(Clone, Debug)]
pub struct Settings {
    pub supabase_url: String,
    pub supabase_service_role_key: String,
    /// Absent means retrieval degrades to lexical-only search.
    pub openai_api_key: Option<String>,
    pub openai_embedding_model: String,
    pub retrieval_top_k: u32,
    pub enable_vector_search: bool,
    pub bind_addr: String,
}

impl Settings {
    pub fn from_env() -> Self {
        // Load .env if present (ignored in production where env vars are set directly).
        let _ = dotenvy::dotenv();

        Self {
            supabase_url: env::var("SUPABASE_URL").expect("SUPABASE_URL must be set"),
            supabase_service_role_key: env::var("SUPABASE_SERVICE_ROLE_KEY")
                .expect("SUPABASE_SERVICE_ROLE_KEY must be set"),
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|key| !key.is_empty()),
            openai_embedding_model: env_or("OPENAI_EMBEDDING_MODEL", "text-embedding-3-small"),
            retrieval_top_k: env::var("RETRIEVAL_TOP_K")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(6),
            enable_vector_search: env::var("ENABLE_VECTOR_SEARCH")
                .ok()
                .map(|v| parse_bool(&v))
                .unwrap_or(true),
            bind_addr: env_or("BIND_ADDR", "127.0.0.1:8000"),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(value: &str) -> bool {
    !matches!(value.trim().to_lowercase().as_str(), "false" | "0" | "no" | "off" | "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_and_falsy_flags() {
        for truthy in ["true", "TRUE", "1", "yes", "on", "anything"] {
            assert!(parse_bool(truthy), "{truthy} should be true");
        }
        for falsy in ["false", "FALSE", "0", "no", "off", "", "  "] {
            assert!(!parse_bool(falsy), "{falsy:?} should be false");
        }
    }
}
