use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file {0}: {1}")]
    Io(String, std::io::Error),
    #[error("parsing TOML in {0}: {1}")]
    Parse(String, toml::de::Error),
    #[error("missing required field `{0}`")]
    MissingField(String),
    #[error("invalid value for `{0}`: {1}")]
    InvalidValue(String, String),
    #[error("${{ENV:{0}}} referenced but environment variable is not set")]
    MissingEnv(String),
}
