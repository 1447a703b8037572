/// Errors raised while resolving startup configuration.
///
/// These are fatal: no network request may be issued until configuration resolves.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}. Please check your .env file.", .0.join(", "))]
    MissingVariables(Vec<&'static str>),
    #[error("invalid BASE_URL {value:?}: {source}")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("BASE_URL must use http or https, got {0:?}")]
    UnsupportedScheme(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
