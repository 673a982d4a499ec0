use std::path::PathBuf;

use tracing::warn;

#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    pub public_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env_string("PORT")
            .map(|raw| {
                raw.parse().unwrap_or_else(|_| {
                    warn!("invalid PORT value {raw:?}; using default 3000");
                    3000
                })
            })
            .unwrap_or(3000);
        let public_dir = env_string("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("public"));

        AppConfig { port, public_dir }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
