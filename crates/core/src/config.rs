use serde::Deserialize;

/// Root application configuration. Loaded from environment variables with
/// the prefix `ADFORGE__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// Cap on ad groups created per request.
    #[serde(default = "default_max_ad_groups")]
    pub max_ad_groups: usize,
    /// Cap on ranked keywords kept per product.
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,
    #[serde(default = "default_max_headlines")]
    pub max_headlines: usize,
    #[serde(default = "default_max_descriptions")]
    pub max_descriptions: usize,
    /// Units of work allowed in flight at once. 1 keeps generation strictly
    /// sequential and progress ordering deterministic.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

fn default_max_ad_groups() -> usize {
    10
}
fn default_max_keywords() -> usize {
    20
}
fn default_max_headlines() -> usize {
    15
}
fn default_max_descriptions() -> usize {
    4
}
fn default_max_in_flight() -> usize {
    1
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_ad_groups: default_max_ad_groups(),
            max_keywords: default_max_keywords(),
            max_headlines: default_max_headlines(),
            max_descriptions: default_max_descriptions(),
            max_in_flight: default_max_in_flight(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("ADFORGE")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.generation.max_ad_groups, 10);
        assert_eq!(config.generation.max_keywords, 20);
        assert_eq!(config.generation.max_in_flight, 1);
        assert_eq!(config.generation.max_headlines, 15);
    }
}
