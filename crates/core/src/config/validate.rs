use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - API key is set and timeout is not 0
/// - min_score lies in [0, 1]
/// - Weights are non-negative with at least one positive
/// - Concurrency is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // API validation
    if config.api.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "api.api_key cannot be empty".to_string(),
        ));
    }
    if config.api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "api.timeout_secs cannot be 0".to_string(),
        ));
    }

    // Matching validation
    let matching = &config.matching;
    if !(0.0..=1.0).contains(&matching.min_score) {
        return Err(ConfigError::ValidationError(format!(
            "matching.min_score must be between 0 and 1, got {}",
            matching.min_score
        )));
    }

    let weights = [
        ("artist", matching.weights.artist),
        ("title", matching.weights.title),
        ("year", matching.weights.year),
        ("media", matching.weights.media),
        ("format", matching.weights.format),
    ];
    if let Some((name, weight)) = weights.iter().find(|(_, w)| *w < 0.0) {
        return Err(ConfigError::ValidationError(format!(
            "matching.weights.{} cannot be negative, got {}",
            name, weight
        )));
    }
    if !matching.weights.is_usable() {
        return Err(ConfigError::ValidationError(
            "matching.weights needs at least one positive weight".to_string(),
        ));
    }

    if matching.concurrency == 0 {
        return Err(ConfigError::ValidationError(
            "matching.concurrency cannot be 0".to_string(),
        ));
    }

    Ok(())
}
