use thiserror::Error;

/// Errors raised while reading configuration at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingEnv(&'static str),
}
