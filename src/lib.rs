//! Lungcare prediction service core library
//!
//! This module exports the request pipeline and HTTP surface of the
//! lung cancer risk prediction service.

pub mod api;
pub mod core;
pub mod error;
pub mod models;
pub mod telemetry;

/// Application configuration
pub mod config {
    use std::path::{Path, PathBuf};

    use serde::Deserialize;

    pub const DEFAULT_PIPELINE_PATH: &str = "pipeline/lung_cancer_prediction.json";

    #[derive(Debug, Clone, Deserialize)]
    pub struct Config {
        pub server: ServerConfig,
        pub pipeline: PipelineConfig,
        pub log: LogConfig,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ServerConfig {
        pub host: String,
        pub port: u16,
        /// Serve `/docs`, `/openapi.json` and redirect `/` to the docs.
        pub expose_docs: bool,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct PipelineConfig {
        pub path: PathBuf,
        /// Exit at startup when the artifact cannot be loaded.
        pub required: bool,
        pub on_failure: FailurePolicy,
    }

    /// What to do when the model call fails.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum FailurePolicy {
        /// Answer the request with a 500.
        #[default]
        Respond,
        /// Log and terminate the process.
        Abort,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct LogConfig {
        pub format: LogFormat,
        pub level: String,
    }

    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum LogFormat {
        #[default]
        Pretty,
        Json,
    }

    /// Load configuration from defaults, files and the environment
    pub fn load_config() -> Result<Config, ::config::ConfigError> {
        load_config_from(Path::new("config"))
    }

    /// Same as [`load_config`] with the settings files looked up in `dir`.
    pub fn load_config_from(dir: &Path) -> Result<Config, ::config::ConfigError> {
        let env = std::env::var("LUNGCARE_ENV").unwrap_or_else(|_| "development".into());
        let default_file = dir.join("default");
        let env_file = dir.join(&env);

        let mut config: Config = ::config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("server.expose_docs", true)?
            .set_default("pipeline.path", DEFAULT_PIPELINE_PATH)?
            .set_default("pipeline.required", true)?
            .set_default("pipeline.on_failure", "respond")?
            .set_default("log.format", "pretty")?
            .set_default("log.level", "info")?
            // Start with the shared settings file
            .add_source(
                ::config::File::with_name(&default_file.to_string_lossy()).required(false),
            )
            // Override with environment-specific settings
            .add_source(::config::File::with_name(&env_file.to_string_lossy()).required(false))
            // Override with environment variables, e.g. LUNGCARE_SERVER__PORT
            .add_source(
                ::config::Environment::with_prefix("LUNGCARE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        if let Ok(path) = std::env::var("PIPELINE_PATH") {
            config.pipeline.path = PathBuf::from(path);
        }

        Ok(config)
    }

}
