use std::env;

/// Allowed browser origins for the dashboard frontend.
#[derive(Clone, Debug)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        let origins = env::var("FRONTEND_ORIGIN")
            .or_else(|_| env::var("FRONTEND_URL"))
            .unwrap_or_else(|_| "http://localhost:5173".to_string());

        Self {
            allowed_origins: origins
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
        }
    }
}
