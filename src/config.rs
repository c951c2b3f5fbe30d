use crate::error::Error;
use serde::Deserialize;
use std::{
    env, fmt,
    io::ErrorKind,
    path::{Path, PathBuf},
};

const API_KEY_VAR: &str = "PINATA_API_KEY";
const SECRET_API_KEY_VAR: &str = "PINATA_SECRET_API_KEY";
const WORKFLOW_VAR: &str = "GITHUB_WORKFLOW";
const RUN_ID_VAR: &str = "GITHUB_RUN_ID";

pub const NOT_AVAILABLE: &str = "N/A";

const DEFAULT_SETTINGS_FILE_NAME: &str = "pinata-deploy.yaml";
const DEFAULT_SOURCE_DIR: &str = "./build";
const DEFAULT_PIN_NAME: &str = "GitHub Action Deployment";
const DEFAULT_ENDPOINT: &str = "https://api.pinata.cloud/pinning/pinFileToIPFS";
const DEFAULT_GATEWAY: &str = "https://gateway.pinata.cloud";

pub struct Config {
    pub credentials: Credentials,
    pub settings: Settings,
    pub context: RunContext,
}

impl Config {
    pub async fn load() -> Result<Config, Error> {
        let settings = Settings::load(DEFAULT_SETTINGS_FILE_NAME).await?;

        Ok(Config::from_lookup(settings, |key| env::var(key).ok()))
    }

    /// Builds the config with `lookup` standing in for the process environment.
    pub fn from_lookup<F>(settings: Settings, lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        Config {
            credentials: Credentials::new(
                lookup(API_KEY_VAR).unwrap_or_default(),
                lookup(SECRET_API_KEY_VAR).unwrap_or_default(),
            ),
            settings,
            context: RunContext::new(lookup(WORKFLOW_VAR), lookup(RUN_ID_VAR)),
        }
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub secret_api_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, secret_api_key: impl Into<String>) -> Self {
        Credentials {
            api_key: api_key.into(),
            secret_api_key: secret_api_key.into(),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        let missing: Vec<&str> = [
            (API_KEY_VAR, &self.api_key),
            (SECRET_API_KEY_VAR, &self.secret_api_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingCredentials(missing.join(", ")))
        }
    }
}

// keeps the secret out of debug logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret_api_key", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub workflow: String,
    pub run_id: String,
}

impl RunContext {
    pub fn new(workflow: Option<String>, run_id: Option<String>) -> Self {
        RunContext {
            workflow: or_not_available(workflow),
            run_id: or_not_available(run_id),
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        RunContext::new(None, None)
    }
}

fn or_not_available(value: Option<String>) -> String {
    value
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_owned())
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default = "Settings::default_source_dir")]
    pub source_dir: PathBuf,
    #[serde(default = "Settings::default_pin_name")]
    pub pin_name: String,
    #[serde(default = "Settings::default_endpoint")]
    pub endpoint: String,
    #[serde(default = "Settings::default_gateway")]
    pub gateway: String,
}

impl Settings {
    /// Reads the settings file at `path`, falling back to the defaults when it does not exist.
    pub async fn load(path: impl AsRef<Path>) -> Result<Settings, Error> {
        let path = path.as_ref();

        let settings_string = match tokio::fs::read_to_string(path).await {
            Ok(settings_string) => settings_string,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("no settings file at {}, using defaults", path.display());
                return Ok(Settings::default());
            }
            Err(err) => return Err(err.into()),
        };

        Settings::parse(&settings_string).map_err(|cause| Error::InvalidSettings {
            path: path.to_path_buf(),
            cause,
        })
    }

    fn parse(settings_string: &str) -> Result<Settings, serde_yaml::Error> {
        // an empty document deserializes to unit, not to an empty mapping
        if settings_string.trim().is_empty() {
            return Ok(Settings::default());
        }

        serde_yaml::from_str::<Settings>(settings_string)
    }

    pub fn gateway_url(&self, cid: &str) -> String {
        format!("{}/ipfs/{}", self.gateway.trim_end_matches('/'), cid)
    }

    fn default_source_dir() -> PathBuf {
        PathBuf::from(DEFAULT_SOURCE_DIR)
    }

    fn default_pin_name() -> String {
        DEFAULT_PIN_NAME.to_owned()
    }

    fn default_endpoint() -> String {
        DEFAULT_ENDPOINT.to_owned()
    }

    fn default_gateway() -> String {
        DEFAULT_GATEWAY.to_owned()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            source_dir: Settings::default_source_dir(),
            pin_name: Settings::default_pin_name(),
            endpoint: Settings::default_endpoint(),
            gateway: Settings::default_gateway(),
        }
    }
}
