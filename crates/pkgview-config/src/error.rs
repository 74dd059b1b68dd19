use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(pkgview_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(pkgview_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Configuration file already exists: {0}")]
    #[diagnostic(
        code(pkgview_config::already_exists),
        help("Remove the existing config file or use a different location")
    )]
    ConfigAlreadyExists(String),

    #[error("Invalid URL for `{field}`: {value}")]
    #[diagnostic(
        code(pkgview_config::invalid_url),
        help("Use an absolute URL such as https://example.com/repo_list.json")
    )]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("`{0}` must not be empty")]
    #[diagnostic(code(pkgview_config::empty_value))]
    EmptyValue(&'static str),

    #[error("Unclosed variable expression starting at `{0}`")]
    #[diagnostic(code(pkgview_config::unclosed_variable))]
    UnclosedVariable(String),

    #[error("Environment variable `{var}` not set in `{input}`")]
    #[diagnostic(
        code(pkgview_config::missing_env_var),
        help("Export the variable or use an absolute path")
    )]
    MissingEnvVar { var: String, input: String },

    #[error("IO error: {0}")]
    #[diagnostic(code(pkgview_config::io))]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
