use std::env;

/// Listener address and cookie hardening flags.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Refresh cookie carries the `Secure` attribute in production.
    pub cookie_secure: bool,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(3000);

        let environment =
            env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        Self {
            bind_addr: format!("0.0.0.0:{port}"),
            cookie_secure: environment == "production",
        }
    }
}
