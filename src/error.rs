use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid config file '{path}': {source}")]
    ConfigParse {
        path: String,
        source: toml::de::Error,
    },
    #[error(transparent)]
    Core(#[from] roadgraph_core::Error),
    #[error("Failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}
