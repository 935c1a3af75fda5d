use std::path::PathBuf;

use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use parkcheck_chat::cohere::{COHERE_CHAT_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE};

use crate::session::DEFAULT_SESSION_TTL;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

/// Path of an optional JSON config file.
pub const CONFIG_PATH_VAR: &str = "PARKCHECK_CONFIG";
pub const BIND_VAR: &str = "PARKCHECK_BIND";
pub const MODEL_PATH_VAR: &str = "PARKCHECK_MODEL_PATH";
pub const SCALER_PATH_VAR: &str = "PARKCHECK_SCALER_PATH";
pub const SESSION_TTL_VAR: &str = "PARKCHECK_SESSION_TTL_SECS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    #[serde(default = "default_scaler_path")]
    pub scaler_path: PathBuf,
    /// Seconds a session may sit idle before it is dropped.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    #[serde(default)]
    pub chat: ChatConfig,
    /// Emit logs as JSON lines instead of human-readable text.
    #[serde(default)]
    pub json_logs: bool,
}

/// Hosted chat settings. The API key is never read from the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_chat_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_model_path() -> PathBuf {
    PathBuf::from("artifacts/model.json")
}

fn default_scaler_path() -> PathBuf {
    PathBuf::from("artifacts/scaler.json")
}

fn default_session_ttl_secs() -> u64 {
    DEFAULT_SESSION_TTL.as_secs().unsigned_abs()
}

fn default_chat_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_endpoint() -> String {
    COHERE_CHAT_URL.to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: default_chat_model(),
            temperature: default_temperature(),
            endpoint: default_endpoint(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            bind: default_bind(),
            model_path: default_model_path(),
            scaler_path: default_scaler_path(),
            session_ttl_secs: default_session_ttl_secs(),
            chat: ChatConfig::default(),
            json_logs: false,
        }
    }
}

impl ServerConfig {
    /// Load from the file named by [`CONFIG_PATH_VAR`] (defaults if unset),
    /// then apply environment overrides.
    pub fn load() -> eyre::Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => {
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| eyre::eyre!("failed to read config at {path}: {e}"))?;
                Self::from_json(&contents)?
            }
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a config document, migrating older versions first.
    pub fn from_json(contents: &str) -> eyre::Result<Self> {
        // Parse as raw JSON so we can run migrations before deserializing.
        let json: serde_json::Value = serde_json::from_str(contents)?;
        let on_disk_version = json
            .get("config_version")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32;

        let migrated = migrate(json, on_disk_version)?;
        let config: ServerConfig = serde_json::from_value(migrated)?;
        Ok(config)
    }

    /// Override file settings with values from `lookup` (the process
    /// environment in production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = lookup(BIND_VAR) {
            self.bind = bind;
        }
        if let Some(path) = lookup(MODEL_PATH_VAR) {
            self.model_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(SCALER_PATH_VAR) {
            self.scaler_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(SESSION_TTL_VAR) {
            match raw.trim().parse() {
                Ok(secs) => self.session_ttl_secs = secs,
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid {SESSION_TTL_VAR}"),
            }
        }
    }

    pub fn session_ttl(&self) -> SignedDuration {
        SignedDuration::from_secs(i64::try_from(self.session_ttl_secs).unwrap_or(i64::MAX))
    }
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update parkcheck."
        ));
    }

    let obj = json
        .as_object_mut()
        .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;

    // v0 → v1: chat settings moved from top-level `chat_model` into `chat`.
    if from_version < 1 {
        if let Some(model) = obj.remove("chat_model") {
            let chat = obj
                .entry("chat")
                .or_insert_with(|| serde_json::Value::Object(Default::default()));
            if let Some(chat) = chat.as_object_mut() {
                chat.entry("model").or_insert(model);
            }
        }
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (nested chat settings)");
    }

    Ok(json)
}
