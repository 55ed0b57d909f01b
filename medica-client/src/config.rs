use serde::{Deserialize, Serialize};

const APP_DIR: &str = "medica";
const CONFIG_FILE: &str = "config.json";

/// Client configuration persisted under the platform config directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// GraphQL endpoint of the records backend.
    pub server_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3001/graphql".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Loads the saved configuration, falling back to defaults when the file
    /// is absent or unreadable.
    pub fn load() -> Self {
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join(APP_DIR).join(CONFIG_FILE);
            if config_path.exists()
                && let Ok(content) = std::fs::read_to_string(&config_path)
                && let Ok(config) = serde_json::from_str(&content)
            {
                return config;
            }
        }
        Self::default()
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(config_dir) = dirs::config_dir() {
            let app_dir = config_dir.join(APP_DIR);
            std::fs::create_dir_all(&app_dir)?;
            let config_path = app_dir.join(CONFIG_FILE);
            let content = serde_json::to_string_pretty(self)?;
            std::fs::write(config_path, content)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.server_url, "http://localhost:3001/graphql");
        assert_eq!(config.request_timeout_secs, 30);
    }
}
