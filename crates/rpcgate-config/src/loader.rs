use std::path::Path;

use http::HeaderName;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, TOML parsing fails, or
    /// validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let config: Self = toml::from_str(&raw).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the health path or metadata header prefix is
    /// unusable
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_health_config()?;
        self.validate_gateway_config()?;
        Ok(())
    }

    fn validate_health_config(&self) -> anyhow::Result<()> {
        let health = &self.server.health;

        if health.enabled && !health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/' (got '{}')", health.path);
        }

        Ok(())
    }

    /// The prefix must form a valid header name on its own
    fn validate_gateway_config(&self) -> anyhow::Result<()> {
        let prefix = &self.gateway.metadata_header_prefix;

        if prefix.is_empty() {
            anyhow::bail!("gateway.metadata_header_prefix must not be empty");
        }

        HeaderName::try_from(prefix.as_str())
            .map_err(|e| anyhow::anyhow!("gateway.metadata_header_prefix '{prefix}' is not a valid header name: {e}"))?;

        Ok(())
    }
}
