use std::fmt;
use std::path::{Path, PathBuf};

use azfs_store::{validate_container_name, LocalBlobStore, StoreResult};
use clap::error::ErrorKind;
use clap::CommandFactory;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Cli;

/// Default store directory, relative to the working directory.
pub const DEFAULT_ROOT: &str = ".azfs";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing storage account: pass --account or set AZURE_STORAGE_ACCOUNT")]
    MissingAccount,

    #[error("missing access key: pass --access-key or set AZURE_STORAGE_ACCESS_KEY")]
    MissingAccessKey,

    #[error("invalid storage account {0:?}")]
    InvalidAccount(String),

    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    /// `true` for errors the user fixes by changing the command line.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            ConfigError::MissingAccount
                | ConfigError::MissingAccessKey
                | ConfigError::InvalidAccount(_)
        )
    }

    /// Convert a usage error into the clap error `main` exits with (status 2).
    /// Any other error is handed back unchanged.
    pub fn into_usage_error(self) -> Result<clap::Error, Self> {
        if !self.is_usage() {
            return Err(self);
        }
        let kind = match self {
            ConfigError::InvalidAccount(_) => ErrorKind::InvalidValue,
            _ => ErrorKind::MissingRequiredArgument,
        };
        Ok(Cli::command().error(kind, self))
    }
}

/// Optional defaults read from a TOML file. Flags and environment
/// variables take precedence over every field.
///
/// ```toml
/// account = "devstore"
/// access_key = "..."
/// root = "/var/lib/azfs"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub account: Option<String>,
    pub access_key: Option<String>,
    pub root: Option<PathBuf>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }
}

/// The two credentials every invocation must supply.
///
/// The access key is never serialized.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub account: String,
    #[serde(skip_serializing)]
    pub access_key: String,
}

impl Credentials {
    /// Build credentials from optional values; empty strings count as missing.
    pub fn resolve(
        account: Option<String>,
        access_key: Option<String>,
    ) -> Result<Self, ConfigError> {
        let account = account
            .filter(|a| !a.is_empty())
            .ok_or(ConfigError::MissingAccount)?;
        let access_key = access_key
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingAccessKey)?;
        // The account names a directory under the store root.
        validate_container_name(&account)
            .map_err(|_| ConfigError::InvalidAccount(account.clone()))?;
        Ok(Self { account, access_key })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account", &self.account)
            .field("access_key", &"<redacted>")
            .finish()
    }
}

/// Everything needed to open a store client for one invocation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    pub credentials: Credentials,
    pub root: PathBuf,
}

impl ClientConfig {
    pub fn new(credentials: Credentials, root: impl Into<PathBuf>) -> Self {
        Self {
            credentials,
            root: root.into(),
        }
    }

    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::layered(cli.account.clone(), cli.access_key.clone(), cli.root.clone(), file)
    }

    /// Merge explicit values over file defaults over built-in defaults.
    pub fn layered(
        account: Option<String>,
        access_key: Option<String>,
        root: Option<PathBuf>,
        file: FileConfig,
    ) -> Result<Self, ConfigError> {
        let credentials = Credentials::resolve(
            account.or(file.account),
            access_key.or(file.access_key),
        )?;
        let root = root
            .or(file.root)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT));
        Ok(Self::new(credentials, root))
    }

    /// Directory holding this account's containers.
    pub fn account_root(&self) -> PathBuf {
        self.root.join(&self.credentials.account)
    }

    /// Open the store client. Called once per invocation.
    pub fn connect(&self) -> StoreResult<LocalBlobStore> {
        tracing::debug!(
            account = %self.credentials.account,
            root = %self.root.display(),
            "connecting"
        );
        LocalBlobStore::open(self.account_root())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
