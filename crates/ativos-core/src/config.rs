use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

/// Top-level configuration for an Ativos deployment.
///
/// Loaded from `~/.ativos/config.toml` by default. Each section corresponds
/// to a feature area or cross-cutting concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtivosConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

impl Default for AtivosConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            assistant: AssistantConfig::default(),
        }
    }
}

impl AtivosConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AtivosConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level the host should install: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// AI assistant widget settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Local kill switch. When false the widget never contacts the backend
    /// and resolves unavailable at mount.
    pub enabled: bool,
    /// First assistant message of every new session. Empty disables the
    /// greeting entirely.
    pub greeting: String,
    /// Suggested prompts offered by the surface; tapping one fills the
    /// input buffer without submitting.
    pub quick_prompts: Vec<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            greeting: "Olá! Como posso ajudar com o inventário hoje?".to_string(),
            quick_prompts: vec![
                "Quantos notebooks estão em uso?".to_string(),
                "Liste todos os equipamentos em estoque.".to_string(),
                "Quais licenças expiram nos próximos 30 dias?".to_string(),
                "Qual equipamento está com o usuário 'Marcelo Reis'?".to_string(),
            ],
        }
    }
}
