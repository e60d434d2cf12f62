//! Runtime configuration read from the Lambda environment.

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("DEST_BUCKET is not set: {0}")]
    Missing(#[from] envy::Error),

    #[error("DEST_BUCKET must name a destination bucket")]
    EmptyDestination,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct HandlerConfig {
    pub dest_bucket: String,
}

impl HandlerConfig {
    pub fn new(dest_bucket: impl Into<String>) -> Result<Self, ConfigError> {
        Self {
            dest_bucket: dest_bucket.into(),
        }
        .validate()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Same as [`HandlerConfig::from_env`] but over an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let raw = envy::from_iter::<_, HandlerConfig>(vars)?;
        Self::new(raw.dest_bucket)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.dest_bucket.trim().is_empty() {
            return Err(ConfigError::EmptyDestination);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn reads_destination_bucket() {
        let config = HandlerConfig::from_vars(vars(&[("DEST_BUCKET", "thumbs")])).unwrap();
        assert_eq!(config.dest_bucket, "thumbs");
    }

    #[test]
    fn missing_destination_is_rejected() {
        let err = HandlerConfig::from_vars(vars(&[("OTHER", "x")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn blank_destination_is_rejected() {
        let err = HandlerConfig::from_vars(vars(&[("DEST_BUCKET", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyDestination));

        let err = HandlerConfig::from_vars(vars(&[("DEST_BUCKET", "")])).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyDestination));
    }

    #[test]
    fn injected_config_is_validated() {
        assert_eq!(HandlerConfig::new("thumbs").unwrap().dest_bucket, "thumbs");
        assert!(matches!(
            HandlerConfig::new("  "),
            Err(ConfigError::EmptyDestination)
        ));
    }
}
