use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Defaults applied when a generate request leaves them unset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub include_optional: bool,
    pub default_service_name: String,
    pub default_service_type: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            include_optional: true,
            default_service_name: "Digital marketing agency".to_string(),
            default_service_type: "Marketing Agency".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and config file
    pub fn load() -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        config = config.add_source(config::File::with_name("config").required(false));

        // SEO_SERVER__PORT=8080, SEO_GENERATOR__INCLUDE_OPTIONAL=false
        config = config.add_source(
            config::Environment::with_prefix("SEO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = config.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        Ok(app_config)
    }

    /// Get the server bind address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server_address(), "127.0.0.1:3001");
        assert!(config.generator.include_optional);
        assert_eq!(config.generator.default_service_type, "Marketing Agency");
    }

    #[test]
    fn test_defaults_survive_config_builder() {
        let built = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default()).unwrap())
            .build()
            .unwrap();
        let loaded: AppConfig = built.try_deserialize().unwrap();
        assert_eq!(loaded.server.port, 3001);
        assert_eq!(loaded.generator, GeneratorConfig::default());
    }
}
