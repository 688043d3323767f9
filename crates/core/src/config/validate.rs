use super::{types::Config, CloudBackend, ConfigError, SearchBackend};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Backend sections are present and complete when selected
/// - Monitor poll interval is non-zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if let Some(search) = &config.search {
        match search.backend {
            SearchBackend::Jackett => {
                let jackett = search.jackett.as_ref().ok_or_else(|| {
                    ConfigError::ValidationError(
                        "search.backend is \"jackett\" but [search.jackett] is missing".to_string(),
                    )
                })?;
                if jackett.url.is_empty() {
                    return Err(ConfigError::ValidationError(
                        "search.jackett.url cannot be empty".to_string(),
                    ));
                }
            }
        }
    }

    if let Some(cloud) = &config.cloud {
        match cloud.backend {
            CloudBackend::Pikpak => {
                let pikpak = cloud.pikpak.as_ref().ok_or_else(|| {
                    ConfigError::ValidationError(
                        "cloud.backend is \"pikpak\" but [cloud.pikpak] is missing".to_string(),
                    )
                })?;
                if pikpak.username.is_empty() {
                    return Err(ConfigError::ValidationError(
                        "cloud.pikpak.username cannot be empty".to_string(),
                    ));
                }
            }
        }
    }

    if config.monitor.poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "monitor.poll_interval_ms cannot be 0".to_string(),
        ));
    }

    Ok(())
}
