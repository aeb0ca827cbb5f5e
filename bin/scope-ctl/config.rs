use config::{Config, ConfigError, Environment, File};
use rigol_scope::{AcquisitionSettings, ConnectionConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub scope: ScopeConfig,
    #[serde(default)]
    pub acquisition: AcquisitionSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// Reject values that would only fail later on the wire
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scope.host.trim().is_empty() {
            return Err(ConfigError::Message("scope.host must not be empty".to_string()));
        }
        if self.scope.receive_buffer_size == 0 {
            return Err(ConfigError::Message(
                "scope.receive_buffer_size must be positive".to_string(),
            ));
        }
        for (name, secs) in [
            ("connect_timeout_secs", self.scope.connect_timeout_secs),
            ("read_timeout_secs", self.scope.read_timeout_secs),
            ("write_timeout_secs", self.scope.write_timeout_secs),
        ] {
            if !(secs.is_finite() && secs > 0.0) {
                return Err(ConfigError::Message(format!(
                    "scope.{name} must be a positive number of seconds"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScopeConfig {
    pub host: String,
    pub port: u16,
    pub connect_timeout_secs: f64,
    pub read_timeout_secs: f64,
    pub write_timeout_secs: f64,
    pub receive_buffer_size: usize,
}

impl ScopeConfig {
    pub fn connection(&self) -> ConnectionConfig {
        ConnectionConfig {
            connect_timeout: Duration::from_secs_f64(self.connect_timeout_secs),
            read_timeout: Duration::from_secs_f64(self.read_timeout_secs),
            write_timeout: Duration::from_secs_f64(self.write_timeout_secs),
            receive_buffer_size: self.receive_buffer_size,
        }
    }
}

impl Default for ScopeConfig {
    fn default() -> Self {
        let connection = ConnectionConfig::default();
        Self {
            host: "10.0.0.17".to_string(),
            port: 5555,
            connect_timeout_secs: connection.connect_timeout.as_secs_f64(),
            read_timeout_secs: connection.read_timeout.as_secs_f64(),
            write_timeout_secs: connection.write_timeout.as_secs_f64(),
            receive_buffer_size: connection.receive_buffer_size,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OutputConfig {
    pub plot_width: usize,
    pub plot_height: usize,
    /// Directory for JSON captures; nothing is saved when unset
    pub capture_dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            plot_width: 140,
            plot_height: 60,
            capture_dir: None,
        }
    }
}

/// Load configuration: defaults, then the TOML file, then `RIGOL_SCOPE__*` variables
pub fn load_config(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

    if let Some(path) = config_path {
        if !path.exists() {
            return Err(ConfigError::Message(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        builder = builder.add_source(File::from(path));
    } else if Path::new("scope.toml").exists() {
        builder = builder.add_source(File::with_name("scope.toml"));
    }

    // e.g. RIGOL_SCOPE__SCOPE__HOST=192.168.1.50
    builder = builder.add_source(
        Environment::with_prefix("RIGOL_SCOPE")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let app_config = builder.build()?.try_deserialize::<AppConfig>()?;
    app_config.validate()?;

    Ok(app_config)
}
