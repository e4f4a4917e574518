//! # mb-config
//!
//! Runtime settings, layered as built-in defaults, then `MB_*` environment
//! variables.
//!
//! | Variable          | Default          |
//! |-------------------|------------------|
//! | `MB_STORAGE_PATH` | `messages.json`  |
//! | `MB_HOST`         | `127.0.0.1`      |
//! | `MB_PORT`         | `8080`           |
//! | `MB_BOARD_TITLE`  | `Message Board`  |
//! | `MB_MAX_FORM_BYTES` | `65536`        |

use std::path::PathBuf;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

const ENV_PREFIX: &str = "MB";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Location of the JSON snapshot
    pub storage_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub board_title: String,
    /// Cap on a `POST /` body, either encoding
    pub max_form_bytes: usize,
}

impl Settings {
    /// Reads the process environment. Callers load `.env` beforehand.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::with_prefix(ENV_PREFIX))
    }

    /// Builds settings from an explicit environment source.
    pub fn from_environment(env: Environment) -> Result<Self, ConfigError> {
        let settings: Self = Config::builder()
            .set_default("storage_path", "messages.json")?
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("board_title", "Message Board")?
            .set_default("max_form_bytes", 64 * 1024)?
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        log::debug!("Loaded settings: {settings:?}");
        Ok(settings)
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_path.as_os_str().is_empty() {
            return Err(ConfigError::Message("storage_path must not be empty".into()));
        }
        if self.host.trim().is_empty() {
            return Err(ConfigError::Message("host must not be empty".into()));
        }
        if self.max_form_bytes == 0 {
            return Err(ConfigError::Message("max_form_bytes must be positive".into()));
        }
        Ok(())
    }
}
